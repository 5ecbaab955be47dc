//! Calorically perfect gas model.
//!
//! `PerfectGas` pairs the ideal gas equation of state with a constant `cp`.
//! For a vessel model this gives closed-form answers everywhere: enthalpy is
//! independent of pressure, temperature follows directly from `(P, h)`, and
//! the partial derivatives are analytic.
//!
//! # Assumptions
//!
//! - Ideal gas equation of state: `p = ρ·R·T`
//! - Calorically perfect: `cp` is constant
//!
//! Use it for fast engineering estimates and as an analytic reference for
//! the real-gas backends; enable the `coolprop` feature for real-fluid
//! behavior.
//!
//! # Reference State
//!
//! Enthalpy is reported relative to a configurable reference
//! (`T_ref`, `p_ref`, `h_ref`).

use std::{convert::Infallible, marker::PhantomData};

use thiserror::Error;
use uom::{
    ConstZero,
    si::{
        f64::{MassDensity, Pressure, SpecificHeatCapacity, ThermodynamicTemperature},
        mass_density::kilogram_per_cubic_meter,
        pressure::{atmosphere, pascal},
        specific_heat_capacity::joule_per_kilogram_kelvin,
        thermodynamic_temperature::{degree_celsius, kelvin},
    },
};

use crate::support::units::{
    SpecificEnthalpy, SpecificGasConstant, TemperatureDifference, si_quantity,
};
use crate::support::{
    constraint::{Constraint, StrictlyPositive},
    thermo::{
        PropertyError, State,
        capability::{
            HasCp, HasEnthalpy, HasPartialDerivatives, PartialDerivatives, StateFrom, ThermoModel,
        },
    },
};

use super::ideal_gas_eos;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PerfectGasParametersError {
    #[error("invalid gas constant R: {r:?}")]
    GasConstant { r: SpecificGasConstant },
    #[error("invalid cp: {cp:?}")]
    Cp { cp: SpecificHeatCapacity },
    #[error("invalid reference temperature: {t_ref:?}")]
    ReferenceTemperature { t_ref: ThermodynamicTemperature },
    #[error("invalid reference pressure: {p_ref:?}")]
    ReferencePressure { p_ref: Pressure },
    #[error("non-physical heat capacities: cv = cp - R must be > 0; cp={cp:?}, R={r:?}")]
    NonPhysicalCv {
        r: SpecificGasConstant,
        cp: SpecificHeatCapacity,
    },
}

/// Reference values defining the enthalpy offset of a [`PerfectGas`] model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerfectGasReference {
    pub temperature: ThermodynamicTemperature,
    pub pressure: Pressure,
    pub enthalpy: SpecificEnthalpy,
}

impl PerfectGasReference {
    /// Returns a standard reference: 0°C, 1 atm, `h_ref = 0`.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            temperature: ThermodynamicTemperature::new::<degree_celsius>(0.0),
            pressure: Pressure::new::<atmosphere>(1.0),
            enthalpy: SpecificEnthalpy::ZERO,
        }
    }
}

/// Constant parameters for the [`PerfectGas`] model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerfectGasParameters {
    pub gas_constant: SpecificGasConstant,
    pub cp: SpecificHeatCapacity,
    pub reference: PerfectGasReference,
}

impl PerfectGasParameters {
    #[must_use]
    pub fn new(gas_constant: SpecificGasConstant, cp: SpecificHeatCapacity) -> Self {
        Self {
            gas_constant,
            cp,
            reference: PerfectGasReference::standard(),
        }
    }

    #[must_use]
    pub fn with_reference(mut self, reference: PerfectGasReference) -> Self {
        self.reference = reference;
        self
    }
}

/// Fluid constants required by the [`PerfectGas`] model.
pub trait PerfectGasFluid {
    /// Returns the constant parameters for use with [`PerfectGas`].
    fn parameters() -> PerfectGasParameters;
}

/// Perfect gas model (constant `cp`) using the ideal gas equation of state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerfectGas<Fluid> {
    r: SpecificGasConstant,
    cp: SpecificHeatCapacity,
    t_ref: ThermodynamicTemperature,
    h_ref: SpecificEnthalpy,
    _marker: PhantomData<Fluid>,
}

impl<Fluid> ThermoModel for PerfectGas<Fluid> {
    type Fluid = Fluid;
}

impl<Fluid: PerfectGasFluid> PerfectGas<Fluid> {
    /// Creates a perfect gas model using constants defined by `Fluid`.
    ///
    /// # Errors
    ///
    /// Returns [`PerfectGasParametersError`] if any constant is invalid or if
    /// `cv = cp - R` is non-physical.
    pub fn new() -> Result<Self, PerfectGasParametersError> {
        Self::with_parameters(Fluid::parameters())
    }
}

impl<Fluid> PerfectGas<Fluid> {
    /// Creates a perfect gas model from explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PerfectGasParametersError`] if any constant is invalid or if
    /// `cv = cp - R` is non-physical.
    pub fn with_parameters(
        parameters: PerfectGasParameters,
    ) -> Result<Self, PerfectGasParametersError> {
        let PerfectGasParameters {
            gas_constant: r,
            cp,
            reference,
        } = parameters;

        if StrictlyPositive::check(&r.get::<joule_per_kilogram_kelvin>()).is_err() {
            return Err(PerfectGasParametersError::GasConstant { r });
        }
        if StrictlyPositive::check(&cp.get::<joule_per_kilogram_kelvin>()).is_err() {
            return Err(PerfectGasParametersError::Cp { cp });
        }
        if StrictlyPositive::check(&reference.temperature.get::<kelvin>()).is_err() {
            return Err(PerfectGasParametersError::ReferenceTemperature {
                t_ref: reference.temperature,
            });
        }
        if StrictlyPositive::check(&reference.pressure.get::<pascal>()).is_err() {
            return Err(PerfectGasParametersError::ReferencePressure {
                p_ref: reference.pressure,
            });
        }
        if StrictlyPositive::check(&(cp - r).get::<joule_per_kilogram_kelvin>()).is_err() {
            return Err(PerfectGasParametersError::NonPhysicalCv { r, cp });
        }

        Ok(Self {
            r,
            cp,
            t_ref: reference.temperature,
            h_ref: reference.enthalpy,
            _marker: PhantomData,
        })
    }

    /// Computes pressure with `P = ρ·R·T`.
    #[must_use]
    pub fn pressure(&self, state: &State<Fluid>) -> Pressure {
        ideal_gas_eos::pressure(state.temperature, state.density, self.r)
    }
}

impl<Fluid> HasEnthalpy for PerfectGas<Fluid> {
    /// Computes enthalpy with `h = h₀ + cp·(T − T₀)`.
    fn enthalpy(&self, state: &State<Fluid>) -> Result<SpecificEnthalpy, PropertyError> {
        Ok(self.h_ref + self.cp * state.temperature.minus(self.t_ref))
    }
}

impl<Fluid> HasCp for PerfectGas<Fluid> {
    /// Returns the constant `cp` of the fluid.
    fn cp(&self, _state: &State<Fluid>) -> Result<SpecificHeatCapacity, PropertyError> {
        Ok(self.cp)
    }
}

impl<Fluid> HasPartialDerivatives for PerfectGas<Fluid> {
    /// Returns `∂ρ/∂T = −ρ/T`, `∂ρ/∂P = 1/(R·T)` and `∂h/∂P = 0`.
    fn partial_derivatives(&self, state: &State<Fluid>) -> Result<PartialDerivatives, PropertyError> {
        let t = state.temperature.get::<kelvin>();
        let rho = state.density.get::<kilogram_per_cubic_meter>();
        let r = self.r.get::<joule_per_kilogram_kelvin>();

        if t <= 0.0 {
            return Err(PropertyError::OutOfDomain {
                context: format!("temperature {t} K must be positive"),
            });
        }

        Ok(PartialDerivatives {
            density_temperature: si_quantity(-rho / t),
            density_pressure: si_quantity(1.0 / (r * t)),
            enthalpy_pressure: si_quantity(0.0),
        })
    }
}

impl<Fluid> StateFrom<(Fluid, ThermodynamicTemperature, MassDensity)> for PerfectGas<Fluid> {
    type Error = Infallible;

    fn state_from(
        &self,
        (fluid, temperature, density): (Fluid, ThermodynamicTemperature, MassDensity),
    ) -> Result<State<Fluid>, Self::Error> {
        Ok(State::new(temperature, density, fluid))
    }
}

impl<Fluid> StateFrom<(Fluid, ThermodynamicTemperature, Pressure)> for PerfectGas<Fluid> {
    type Error = Infallible;

    fn state_from(
        &self,
        (fluid, temperature, pressure): (Fluid, ThermodynamicTemperature, Pressure),
    ) -> Result<State<Fluid>, Self::Error> {
        let density = ideal_gas_eos::density(temperature, pressure, self.r);
        Ok(State::new(temperature, density, fluid))
    }
}

impl<Fluid> StateFrom<(Fluid, Pressure, SpecificEnthalpy)> for PerfectGas<Fluid> {
    type Error = PropertyError;

    /// Inverts `h = h_ref + cp·(T − T_ref)` for temperature.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::OutOfDomain`] if the enthalpy maps to a
    /// temperature at or below absolute zero.
    fn state_from(
        &self,
        (fluid, pressure, enthalpy): (Fluid, Pressure, SpecificEnthalpy),
    ) -> Result<State<Fluid>, Self::Error> {
        let temperature = self.t_ref + (enthalpy - self.h_ref) / self.cp;
        let t = temperature.get::<kelvin>();
        if t.is_nan() || t <= 0.0 {
            return Err(PropertyError::OutOfDomain {
                context: format!("enthalpy maps to temperature {t} K, which must be positive"),
            });
        }
        let density = ideal_gas_eos::density(temperature, pressure, self.r);
        Ok(State::new(temperature, density, fluid))
    }
}
