use crate::support::thermo::{PropertyError, State};
use crate::support::units::{
    DensityPressureDerivative, DensityTemperatureDerivative, EnthalpyPressureDerivative,
};

use super::ThermoModel;

/// First partial derivatives of a single-phase state, on a mass basis.
///
/// These are the coefficients of the `(T, P)` form of the mass and energy
/// balances of a rigid control volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartialDerivatives {
    /// `∂ρ/∂T` at constant pressure.
    pub density_temperature: DensityTemperatureDerivative,
    /// `∂ρ/∂P` at constant temperature.
    pub density_pressure: DensityPressureDerivative,
    /// `∂h/∂P` at constant temperature.
    pub enthalpy_pressure: EnthalpyPressureDerivative,
}

pub trait HasPartialDerivatives: ThermoModel {
    /// Returns the first partial derivatives at the given state.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if any derivative cannot be calculated.
    fn partial_derivatives(
        &self,
        state: &State<Self::Fluid>,
    ) -> Result<PartialDerivatives, PropertyError>;
}
