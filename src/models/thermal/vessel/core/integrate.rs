//! Time integration of a [`Formulation`].
//!
//! The [`Integrator`] trait is the seam between the vessel balances and an
//! ODE backend. [`EulerIntegrator`] drives the Twine forward Euler solver
//! and [`RadauIntegrator`] an adaptive implicit Runge-Kutta method; other
//! backends plug in by implementing the trait.

mod euler;
mod problem;
mod radau;

use thiserror::Error;
use twine_core::Observer;
use uom::si::f64::Time;

use super::{Action, Event, TimedDiagnostic, balance::Formulation};

pub use euler::{EulerConfig, EulerIntegrator};
pub use problem::{BalanceInput, BalanceModel};
pub use radau::{RadauConfig, RadauIntegrator};

/// Advances a formulation through a sequence of evaluation times.
pub trait Integrator {
    /// Integrates from `initial` at `times[0]` and returns the state at each
    /// evaluation time reached.
    ///
    /// The observer receives an [`Event::Sample`] at every evaluation time and
    /// an [`Event::Diagnostic`] for every diagnostic raised while stepping.
    /// Returning [`Action::StopEarly`] ends the run with
    /// [`Status::StoppedByObserver`].
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationFailure`] if a balance evaluation fails or the
    /// state stops being finite.
    fn integrate<F, Obs>(
        &self,
        formulation: &F,
        initial: F::State,
        times: &[Time],
        observer: &mut Obs,
    ) -> Result<Integration<F::State>, IntegrationFailure>
    where
        F: Formulation,
        Obs: Observer<Event<F::State>, Action>;
}

/// How an integration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Every evaluation time was reached.
    Complete,

    /// The observer returned [`Action::StopEarly`].
    StoppedByObserver,
}

/// States at the evaluation times an integrator reached.
#[derive(Debug, Clone)]
pub struct Integration<S> {
    pub times: Vec<Time>,
    pub states: Vec<S>,
    pub status: Status,
    pub diagnostics: Vec<TimedDiagnostic>,
}

impl<S> Integration<S> {
    fn new(capacity: usize) -> Self {
        Self {
            times: Vec::with_capacity(capacity),
            states: Vec::with_capacity(capacity),
            status: Status::Complete,
            diagnostics: Vec::new(),
        }
    }
}

/// An integrator did not finish.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("integration failed at {time:?}: {message}")]
pub struct IntegrationFailure {
    pub time: Time,
    pub message: String,
}

/// Stores a sample and reports it; returns `true` if the observer stopped the run.
fn record<S, Obs>(
    integration: &mut Integration<S>,
    observer: &mut Obs,
    input: &BalanceInput<S>,
) -> bool
where
    S: Clone,
    Obs: Observer<Event<S>, Action>,
{
    integration.times.push(input.time);
    integration.states.push(input.state.clone());

    let event = Event::Sample {
        time: input.time,
        state: input.state.clone(),
    };
    if let Some(Action::StopEarly) = observer.observe(&event) {
        integration.status = Status::StoppedByObserver;
        return true;
    }
    false
}
