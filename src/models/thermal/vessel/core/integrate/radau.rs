use std::cell::{Cell, RefCell};

use differential_equations::methods::ImplicitRungeKutta;
use differential_equations::ode::{ODE, ODEProblem};
use nalgebra::SVector;
use twine_core::Observer;
use uom::si::{
    f64::{ThermodynamicTemperature, Time},
    time::second,
};

use crate::models::thermal::vessel::core::{
    Action, Event, TimedDiagnostic, VesselError, balance::Formulation, state::VesselState,
};
use crate::support::constraint::StrictlyPositive;

use super::{Integration, IntegrationFailure, Integrator, Status, problem::BalanceInput, record};

/// Error controls for [`RadauIntegrator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadauConfig {
    /// Relative tolerance on each state component.
    pub rtol: f64,

    /// Absolute tolerance on each state component, in base SI units.
    pub atol: f64,
}

impl Default for RadauConfig {
    fn default() -> Self {
        Self {
            rtol: 1e-6,
            atol: 1e-8,
        }
    }
}

/// Adaptive integration with the fifth-order Radau IIA method.
///
/// Step sizes follow the solver's local error estimate. Each interval between
/// evaluation times is solved on its own, so every evaluation time is hit
/// exactly and the formulation's guards run at each of them.
///
/// Diagnostics are reported for the balance evaluated at the start of each
/// interval; trial points the solver rejects are not reported.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RadauIntegrator {
    config: RadauConfig,
}

impl RadauIntegrator {
    /// Creates an integrator with the given tolerances.
    ///
    /// # Errors
    ///
    /// Returns [`VesselError::Constraint`] if a tolerance is not strictly positive.
    pub fn new(config: RadauConfig) -> Result<Self, VesselError> {
        StrictlyPositive::new(config.rtol).map_err(VesselError::constraint("relative tolerance"))?;
        StrictlyPositive::new(config.atol).map_err(VesselError::constraint("absolute tolerance"))?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &RadauConfig {
        &self.config
    }
}

impl Integrator for RadauIntegrator {
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

        for &target in targets {
            let span = target - current.time;
            if span.value.is_nan() || span.value <= 0.0 {
                return Err(IntegrationFailure {
                    time: current.time,
                    message: format!("evaluation time {target:?} does not advance"),
                });
            }

            let Some(seed) = evaluate(formulation, &current, &mut integration, observer)? else {
                return Ok(integration);
            };

            let ode = BalanceOde {
                formulation,
                seed: Cell::new(Some(seed)),
                failure: RefCell::new(None),
            };
            let y0 = current.state.components();
            let problem = ODEProblem::new(
                &ode,
                current.time.get::<second>(),
                target.get::<second>(),
                SVector::<f64, 2>::new(y0[0], y0[1]),
            );
            let mut solver = ImplicitRungeKutta::radau5()
                .rtol(self.config.rtol)
                .atol(self.config.atol);
            let solution = problem.solve(&mut solver);

            if let Some(failure) = ode.failure.take() {
                return Err(failure);
            }
            let solution = solution.map_err(|error| IntegrationFailure {
                time: current.time,
                message: error.to_string(),
            })?;
            let Some(last) = solution.y.last() else {
                return Err(IntegrationFailure {
                    time: current.time,
                    message: "solver returned no history".to_string(),
                });
            };

            let state = formulation.saturate(F::State::from_components([last[0], last[1]]));
            if !state.is_finite() {
                return Err(IntegrationFailure {
                    time: target,
                    message: "state is no longer finite".to_string(),
                });
            }
            current = BalanceInput {
                time: target,
                state,
                seed: ode.seed.get(),
            };

            if record(&mut integration, observer, &current) {
                return Ok(integration);
            }
        }

        Ok(integration)
    }
}

/// Evaluates the balances at an accepted point and reports its diagnostic.
///
/// Returns the temperature found, or `None` if the observer stopped the run.
fn evaluate<F, Obs>(
    formulation: &F,
    input: &BalanceInput<F::State>,
    integration: &mut Integration<F::State>,
    observer: &mut Obs,
) -> Result<Option<ThermodynamicTemperature>, IntegrationFailure>
where
    F: Formulation,
    Obs: Observer<Event<F::State>, Action>,
{
    let evaluation = formulation
        .derivative(input.time, &input.state, input.seed)
        .map_err(|error| IntegrationFailure {
            time: input.time,
            message: error.to_string(),
        })?;

    if let Some(diagnostic) = evaluation.diagnostic {
        let timed = TimedDiagnostic {
            time: input.time,
            diagnostic,
        };
        integration.diagnostics.push(timed.clone());
        if let Some(Action::StopEarly) = observer.observe(&Event::Diagnostic(timed)) {
            integration.status = Status::StoppedByObserver;
            return Ok(None);
        }
    }

    Ok(Some(evaluation.temperature))
}

/// A formulation seen as a right-hand side over base SI components.
///
/// The solver can't take errors from the right-hand side, so the first one is
/// kept here and the rate is poisoned with NaN to end the solve.
struct BalanceOde<'a, F> {
    formulation: &'a F,
    seed: Cell<Option<ThermodynamicTemperature>>,
    failure: RefCell<Option<IntegrationFailure>>,
}

impl<F: Formulation> ODE<f64, SVector<f64, 2>> for BalanceOde<'_, F> {
    fn diff(&self, t: f64, y: &SVector<f64, 2>, dydt: &mut SVector<f64, 2>) {
        let time = Time::new::<second>(t);
        let state = F::State::from_components([y[0], y[1]]);

        match self.formulation.derivative(time, &state, self.seed.get()) {
            Ok(evaluation) => {
                let rate = F::State::rate_components(&evaluation.rate);
                dydt[0] = rate[0];
                dydt[1] = rate[1];
                self.seed.set(Some(evaluation.temperature));
            }
            Err(error) => {
                dydt.fill(f64::NAN);
                let mut failure = self.failure.borrow_mut();
                if failure.is_none() {
                    *failure = Some(IntegrationFailure {
                        time,
                        message: error.to_string(),
                    });
                }
            }
        }
    }
}
