use std::error::Error as StdError;

use thiserror::Error;
use uom::si::f64::TemperatureInterval;

use crate::support::{constraint::ConstraintError, thermo::eos::EosError};

use super::integrate::IntegrationFailure;

/// Errors returned by the vessel model and simulator.
#[derive(Debug, Error)]
pub enum VesselError {
    /// The property backend could not resolve a state.
    #[error("property lookup failed while {context}")]
    PropertyLookup {
        context: &'static str,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The `(T, P)` balance matrix has no usable inverse.
    #[error("balance matrix is singular (determinant {determinant:e})")]
    SingularSystem { determinant: f64 },

    /// State recovery used its whole iteration budget.
    #[error("state recovery did not converge in {iters} iterations (last update {step:?})")]
    NonConvergence {
        iters: usize,
        step: TemperatureInterval,
    },

    /// The integrator did not finish.
    #[error(transparent)]
    Integration(#[from] IntegrationFailure),

    /// The equation of state was evaluated outside its domain.
    #[error("equation of state: {0}")]
    InvalidEos(#[from] EosError),

    /// A configuration value violates its numeric constraint.
    #[error("invalid {context}: {source}")]
    Constraint {
        context: &'static str,
        #[source]
        source: ConstraintError,
    },

    /// A flow schedule or sampling grid is malformed.
    #[error("invalid {context}: {reason}")]
    InvalidInput {
        context: &'static str,
        reason: &'static str,
    },
}

impl VesselError {
    /// Wraps a backend error raised while doing `context`.
    pub(crate) fn lookup<E>(context: &'static str, error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::PropertyLookup {
            context,
            source: Box::new(error),
        }
    }

    /// Returns a mapper for constraint violations on the named value.
    pub(crate) fn constraint(context: &'static str) -> impl FnOnce(ConstraintError) -> Self {
        move |source| Self::Constraint { context, source }
    }
}
