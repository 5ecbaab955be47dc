//! Mass and energy balances of the vessel.
//!
//! A [`Formulation`] turns a state and the boundary conditions at time `t`
//! into the time derivative the integrator needs. Two formulations share the
//! same physics:
//!
//! - [`Conserved`] integrates `(n, n·h)` and recovers `(T, P)` at every call.
//! - [`Primitive`] integrates `(T, P)` directly by solving a 2×2 system built
//!   from the property derivatives.

mod conserved;
mod primitive;

use std::fmt::Debug;

use twine_core::StepIntegrable;
use uom::si::f64::{AmountOfSubstance, Mass, Pressure, ThermodynamicTemperature, Time};

use super::{Diagnostic, VesselError, state::VesselState};

pub use conserved::Conserved;
pub use primitive::Primitive;

/// State variables and balance equations integrated by a simulator.
pub trait Formulation {
    /// Integrated state.
    type State: Clone + Debug + StepIntegrable<Time, Derivative = Self::Rate> + VesselState;

    /// Time derivative of [`Self::State`].
    type Rate: Clone + Debug;

    /// Builds the state of a tank at `(T, P)`.
    ///
    /// # Errors
    ///
    /// Returns a [`VesselError`] if the point can't be resolved.
    fn initial_state(
        &self,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    ) -> Result<Self::State, VesselError>;

    /// Evaluates the balances at `(time, state)`.
    ///
    /// `seed` is a temperature guess carried over from the previous
    /// evaluation. It only affects how quickly `(T, P)` is found.
    ///
    /// # Errors
    ///
    /// Returns a [`VesselError`] for conditions the configured policies
    /// don't absorb.
    fn derivative(
        &self,
        time: Time,
        state: &Self::State,
        seed: Option<ThermodynamicTemperature>,
    ) -> Result<Evaluation<Self::Rate>, VesselError>;

    /// Applies guards to a state after an accepted step.
    fn saturate(&self, state: Self::State) -> Self::State {
        state
    }

    /// Converts a state to physical variables.
    ///
    /// `previous` is the preceding sample, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`VesselError`] if the state can't be resolved and there is
    /// nothing to fall back on.
    fn sample(
        &self,
        state: &Self::State,
        previous: Option<&TankPoint>,
    ) -> Result<Sampled, VesselError>;
}

/// Result of one balance evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<R> {
    pub rate: R,

    /// Tank temperature the rate was computed at.
    pub temperature: ThermodynamicTemperature,

    pub diagnostic: Option<Diagnostic>,
}

/// How a [`TankPoint`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointStatus {
    /// Read directly from the integrated state.
    Exact,
    /// State recovery converged.
    Converged,
    /// State recovery kept its last temperature after a lookup failure.
    FrozenOnFailure,
    /// State recovery ran out of iterations.
    NotConverged,
    /// The tank is at or below the empty floor.
    Empty,
    /// The holdup could not be evaluated; the previous sample's was reused.
    Stale,
}

/// Physical variables of the tank at one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankPoint {
    pub temperature: ThermodynamicTemperature,
    pub pressure: Pressure,
    pub amount: AmountOfSubstance,
    pub mass: Mass,
    pub status: PointStatus,
}

/// A [`TankPoint`] and the diagnostic raised while computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sampled {
    pub point: TankPoint,
    pub diagnostic: Option<Diagnostic>,
}

/// What the primitive formulation does when its balance can't be solved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StallPolicy {
    /// Return a zero rate and report a [`Diagnostic`].
    #[default]
    Freeze,

    /// Return the underlying [`VesselError`].
    Fail,
}
