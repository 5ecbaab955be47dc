use std::convert::Infallible;

use twine_core::{DerivativeOf, Model, OdeProblem};
use uom::si::f64::{ThermodynamicTemperature, Time};

use crate::models::thermal::vessel::core::{
    VesselError,
    balance::{Evaluation, Formulation},
};

/// Input of a [`BalanceModel`]: the state, its time, and the temperature
/// seed carried over from the previous accepted step.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceInput<S> {
    pub time: Time,
    pub state: S,
    pub seed: Option<ThermodynamicTemperature>,
}

/// Evaluates the balances of a [`Formulation`] as a Twine [`Model`].
///
/// This is the model the bundled integrator steps; it is public so other
/// Twine solvers can drive a vessel directly.
#[derive(Debug)]
pub struct BalanceModel<'a, F> {
    formulation: &'a F,
}

impl<'a, F> BalanceModel<'a, F> {
    #[must_use]
    pub fn new(formulation: &'a F) -> Self {
        Self { formulation }
    }
}

impl<F: Formulation> Model for BalanceModel<'_, F> {
    type Input = BalanceInput<F::State>;
    type Output = Evaluation<F::Rate>;
    type Error = VesselError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.formulation
            .derivative(input.time, &input.state, input.seed)
    }
}

/// Exposes a formulation's state and rate to Twine ODE solvers.
pub(super) struct VesselProblem<'a, F> {
    formulation: &'a F,
}

impl<'a, F> VesselProblem<'a, F> {
    pub(super) fn new(formulation: &'a F) -> Self {
        Self { formulation }
    }
}

impl<F: Formulation> OdeProblem for VesselProblem<'_, F> {
    type Input = BalanceInput<F::State>;
    type Output = Evaluation<F::Rate>;
    type Delta = Time;
    type State = F::State;
    type Error = Infallible;

    fn state(&self, input: &Self::Input) -> Result<Self::State, Self::Error> {
        Ok(input.state.clone())
    }

    fn derivative(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<DerivativeOf<Self::State, Self::Delta>, Self::Error> {
        Ok(output.rate.clone())
    }

    fn build_input(
        &self,
        base: &Self::Input,
        state: &Self::State,
        delta: &Self::Delta,
    ) -> Result<Self::Input, Self::Error> {
        Ok(BalanceInput {
            time: base.time + *delta,
            state: state.clone(),
            seed: base.seed,
        })
    }

    /// Applies the formulation's guards and seeds the next evaluation with the
    /// temperature found at the start of the step.
    fn finalize_step(
        &self,
        next_input: Self::Input,
        _prev_input: &Self::Input,
        prev_output: &Self::Output,
        _step_delta: &Self::Delta,
    ) -> Result<Self::Input, Self::Error> {
        Ok(BalanceInput {
            time: next_input.time,
            state: self.formulation.saturate(next_input.state),
            seed: Some(prev_output.temperature),
        })
    }
}
