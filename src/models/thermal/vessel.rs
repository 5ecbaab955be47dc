//! Lumped model of a pressure vessel storing a single pure gas.
//!
//! The vessel exchanges mass through an inlet and an outlet and heat with its
//! surroundings through the wall. Its state is integrated in one of two
//! [`Formulation`]s:
//!
//! - [`Conserved`]: holdup `(n, n·h)`, with `(T, P)` recovered at every
//!   evaluation by [`StateRecovery`] against an equation of state.
//! - [`Primitive`]: `(T, P)` directly, from the property derivatives.
//!
//! [`TankSimulator`] runs a formulation through an [`Integrator`], either the
//! fixed-step [`EulerIntegrator`] or the adaptive [`RadauIntegrator`], and
//! reports a [`Trajectory`] of temperature, pressure, amount and mass. Recoverable
//! conditions (a property lookup outside the backend's range, a recovery that
//! did not converge, a singular balance) become [`Diagnostic`]s instead of
//! aborting the run, unless the configured policies say otherwise.
//!
//! [`BalanceModel`] exposes the balances as a [`twine_core::Model`] for use
//! with other Twine solvers.

mod core;

pub use self::core::{
    Action, BalanceInput, BalanceModel, BoundaryConditions, Conserved, ConservedRate,
    ConservedState, Diagnostic, ElongatedSphere, EulerConfig, EulerIntegrator, Evaluation, Event,
    FARADAY, FlowSchedule, Flows, Formulation, FuelCellDemand, InitialCondition, InletConditions,
    InletStream, Integration, IntegrationFailure, Integrator, NonConvergencePolicy, PointStatus,
    Primitive, PrimitiveRate, PrimitiveState, PropertyQuery, RadauConfig, RadauIntegrator,
    Recovery, RecoveryConfig, Sample, Sampled, Sampling, SimulationConfig, StallPolicy, StateRecovery, Status, SurfaceArea,
    TankGeometry, TankPoint, TankSimulator, ThermoPoint, TimedDiagnostic, Trajectory, Vessel,
    VesselConfig, VesselError, VesselState, VesselThermoModel,
};
