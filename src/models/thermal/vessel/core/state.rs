//! Integrated state variables and their time derivatives.

use twine_core::StepIntegrable;
use uom::si::{
    amount_of_substance::mole,
    energy::joule,
    f64::{AmountOfSubstance, Energy, Power, Pressure, ThermodynamicTemperature, Time},
    power::watt,
    pressure::pascal,
    thermodynamic_temperature::kelvin,
};

use crate::support::units::{AmountRate, PressureRate, TemperatureRate};

/// A vessel state the integrator can advance and check.
///
/// Both formulations carry two scalars. The component views expose them in
/// base SI units for solvers that work on plain vectors.
pub trait VesselState: StepIntegrable<Time> + Sized {
    /// Returns `true` if every component is finite.
    fn is_finite(&self) -> bool;

    fn components(&self) -> [f64; 2];

    fn from_components(components: [f64; 2]) -> Self;

    /// Components of a rate, per second.
    fn rate_components(rate: &Self::Derivative) -> [f64; 2];
}

/// Conserved holdup: amount `n` and total enthalpy `n·h`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConservedState {
    pub amount: AmountOfSubstance,
    pub enthalpy: Energy,
}

/// Time derivative of a [`ConservedState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConservedRate {
    pub amount: AmountRate,
    pub enthalpy: Power,
}

impl StepIntegrable<Time> for ConservedState {
    type Derivative = ConservedRate;

    fn step(&self, derivative: ConservedRate, dt: Time) -> Self {
        Self {
            amount: self.amount + derivative.amount * dt,
            enthalpy: self.enthalpy + derivative.enthalpy * dt,
        }
    }
}

impl VesselState for ConservedState {
    fn is_finite(&self) -> bool {
        self.amount.is_finite() && self.enthalpy.is_finite()
    }

    fn components(&self) -> [f64; 2] {
        [self.amount.get::<mole>(), self.enthalpy.get::<joule>()]
    }

    fn from_components([amount, enthalpy]: [f64; 2]) -> Self {
        Self {
            amount: AmountOfSubstance::new::<mole>(amount),
            enthalpy: Energy::new::<joule>(enthalpy),
        }
    }

    fn rate_components(rate: &ConservedRate) -> [f64; 2] {
        [rate.amount.value, rate.enthalpy.get::<watt>()]
    }
}

/// Primitive state: temperature and pressure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveState {
    pub temperature: ThermodynamicTemperature,
    pub pressure: Pressure,
}

/// Time derivative of a [`PrimitiveState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveRate {
    pub temperature: TemperatureRate,
    pub pressure: PressureRate,
}

impl StepIntegrable<Time> for PrimitiveState {
    type Derivative = PrimitiveRate;

    fn step(&self, derivative: PrimitiveRate, dt: Time) -> Self {
        // Absolute temperature plus a rate times a duration has no typed `Add`.
        let temperature = self.temperature.get::<kelvin>() + derivative.temperature.value * dt.value;

        Self {
            temperature: ThermodynamicTemperature::new::<kelvin>(temperature),
            pressure: self.pressure + derivative.pressure * dt,
        }
    }
}

impl VesselState for PrimitiveState {
    fn is_finite(&self) -> bool {
        self.temperature.is_finite() && self.pressure.is_finite()
    }

    fn components(&self) -> [f64; 2] {
        [self.temperature.get::<kelvin>(), self.pressure.get::<pascal>()]
    }

    fn from_components([temperature, pressure]: [f64; 2]) -> Self {
        Self {
            temperature: ThermodynamicTemperature::new::<kelvin>(temperature),
            pressure: Pressure::new::<pascal>(pressure),
        }
    }

    fn rate_components(rate: &PrimitiveRate) -> [f64; 2] {
        [rate.temperature.value, rate.pressure.value]
    }
}
