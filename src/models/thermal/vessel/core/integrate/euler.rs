use twine_core::Observer;
use twine_solvers::transient::euler;
use uom::si::{f64::Time, time::second};

use crate::models::thermal::vessel::core::{
    Action, Event, TimedDiagnostic, VesselError,
    balance::{Evaluation, Formulation},
    state::VesselState,
};
use crate::support::constraint::StrictlyPositive;

use super::{
    Integration, IntegrationFailure, Integrator, Status,
    problem::{BalanceInput, BalanceModel, VesselProblem},
    record,
};

/// Step-size controls for [`EulerIntegrator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerConfig {
    /// Largest step taken between two evaluation times.
    pub max_step: Time,
}

impl Default for EulerConfig {
    fn default() -> Self {
        Self {
            max_step: Time::new::<second>(1.0),
        }
    }
}

/// Fixed-step forward Euler integration.
///
/// Each interval between evaluation times is split into the fewest equal
/// steps no longer than `max_step`, so every evaluation time is hit exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EulerIntegrator {
    config: EulerConfig,
}

impl EulerIntegrator {
    /// Creates an integrator with the given step controls.
    ///
    /// # Errors
    ///
    /// Returns [`VesselError::Constraint`] if `max_step` is not strictly positive.
    pub fn new(config: EulerConfig) -> Result<Self, VesselError> {
        StrictlyPositive::new(config.max_step).map_err(VesselError::constraint("max step"))?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &EulerConfig {
        &self.config
    }

    /// Returns the step count and step size covering `span`.
    fn steps(&self, span: Time) -> (usize, Time) {
        let ratio = (span / self.config.max_step).value.ceil().max(1.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = ratio as usize;
        (steps, span / ratio)
    }
}

impl Integrator for EulerIntegrator {
    fn integrate<F, Obs>(
        &self,
        formulation: &F,
        initial: F::State,
        times: &[Time],
        observer: &mut Obs,
    ) -> Result<Integration<F::State>, IntegrationFailure>
    where
        F: Formulation,
        Obs: Observer<Event<F::State>, Action>,
    {
        let mut integration = Integration::new(times.len());
        let Some((&start, targets)) = times.split_first() else {
            return Ok(integration);
        };

        let model = BalanceModel::new(formulation);
        let problem = VesselProblem::new(formulation);

        let mut current = BalanceInput {
            time: start,
            state: formulation.saturate(initial),
            seed: None,
        };
        if !current.state.is_finite() {
            return Err(IntegrationFailure {
                time: start,
                message: "initial state is not finite".to_string(),
            });
        }
        if record(&mut integration, observer, &current) {
            return Ok(integration);
        }

        for (segment, &target) in targets.iter().enumerate() {
            let span = target - current.time;
            if span.value.is_nan() || span.value <= 0.0 {
                return Err(IntegrationFailure {
                    time: current.time,
                    message: format!("evaluation time {target:?} does not advance"),
                });
            }
            let (steps, dt) = self.steps(span);

            let mut failure = None;
            let diagnostics = &mut integration.diagnostics;
            let step_observer =
                |event: &euler::Event<BalanceInput<F::State>, Evaluation<F::Rate>>| {
                    let snapshot = &event.snapshot;

                    // A segment starts where the previous one ended.
                    if event.step == 0 && segment > 0 {
                        return None;
                    }

                    if !snapshot.input.state.is_finite() {
                        failure = Some(IntegrationFailure {
                            time: snapshot.input.time,
                            message: "state is no longer finite".to_string(),
                        });
                        return Some(euler::Action::StopEarly);
                    }

                    let diagnostic = snapshot.output.diagnostic.clone()?;
                    let timed = TimedDiagnostic {
                        time: snapshot.input.time,
                        diagnostic,
                    };
                    diagnostics.push(timed.clone());
                    match observer.observe(&Event::Diagnostic(timed)) {
                        Some(Action::StopEarly) => Some(euler::Action::StopEarly),
                        None => None,
                    }
                };

            let solution = euler::solve(&model, &problem, current.clone(), dt, steps, step_observer)
                .map_err(|error| IntegrationFailure {
                    time: current.time,
                    message: error.to_string(),
                })?;

            if let Some(failure) = failure {
                return Err(failure);
            }
            if solution.status == euler::Status::StoppedByObserver {
                integration.status = Status::StoppedByObserver;
                return Ok(integration);
            }

            let Some(last) = solution.history.into_iter().last() else {
                return Err(IntegrationFailure {
                    time: current.time,
                    message: "solver returned no history".to_string(),
                });
            };
            current = last.input;
            current.time = target;

            if record(&mut integration, observer, &current) {
                return Ok(integration);
            }
        }

        Ok(integration)
    }
}
