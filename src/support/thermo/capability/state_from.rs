use crate::support::thermo::State;

use super::ThermoModel;

/// Capability for constructing a [`State`] from a typed input.
///
/// Inputs are plain Rust tuples naming the independent variables, led by the
/// fluid value. The vessel model relies on two of them:
///
/// - `(Fluid, ThermodynamicTemperature, Pressure)`, to size the initial
///   holdup and evaluate the inlet stream;
/// - `(Fluid, Pressure, SpecificEnthalpy)`, to invert the energy balance for
///   temperature.
///
/// A model that can't build a state from some input simply doesn't implement
/// `StateFrom` for it.
pub trait StateFrom<Input>: ThermoModel {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a thermodynamic state from the provided input.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the state cannot be created from `input`.
    fn state_from(&self, input: Input) -> Result<State<Self::Fluid>, Self::Error>;
}

/// Builds a state from `(A, B)` using `Fluid::default()` for marker fluids.
impl<M, A, B> StateFrom<(A, B)> for M
where
    M: ThermoModel + StateFrom<(<M as ThermoModel>::Fluid, A, B)>,
    <M as ThermoModel>::Fluid: Default,
{
    type Error = <M as StateFrom<(<M as ThermoModel>::Fluid, A, B)>>::Error;

    fn state_from(&self, (a, b): (A, B)) -> Result<State<Self::Fluid>, Self::Error> {
        self.state_from((<M as ThermoModel>::Fluid::default(), a, b))
    }
}
