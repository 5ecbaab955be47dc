//! Recoverable conditions reported during a run.

use uom::si::f64::{TemperatureInterval, ThermodynamicTemperature, Time};

/// A recoverable condition met while evaluating the balances.
///
/// Diagnostics never abort a run. They are collected in the
/// [`Trajectory`](super::Trajectory) and forwarded to the observer as
/// [`Event::Diagnostic`].
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// State recovery hit a backend or equation-of-state failure and kept its
    /// last temperature iterate.
    FrozenOnFailure {
        temperature: ThermodynamicTemperature,
        iters: usize,
        reason: String,
    },

    /// State recovery used its whole iteration budget; the last iterate was kept.
    NotConverged {
        temperature: ThermodynamicTemperature,
        iters: usize,
        step: TemperatureInterval,
    },

    /// A property lookup failed and the `(T, P)` rates were frozen at zero,
    /// or a sample reused the previous holdup.
    PropertyLookup { reason: String },

    /// The `(T, P)` balance matrix was singular and the rates were frozen at zero.
    SingularSystem { determinant: f64 },
}

/// A [`Diagnostic`] with the simulation time it was raised at.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedDiagnostic {
    pub time: Time,
    pub diagnostic: Diagnostic,
}

/// Events delivered to a simulation observer.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<S> {
    /// The integrator reached an evaluation time.
    Sample { time: Time, state: S },

    /// A recoverable condition was reported.
    Diagnostic(TimedDiagnostic),
}

/// Control actions an observer may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the run and return the trajectory sampled so far.
    StopEarly,
}
