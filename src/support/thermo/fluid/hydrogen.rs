use uom::si::{
    f64::{MolarMass, Pressure, SpecificHeatCapacity, ThermodynamicTemperature},
    molar_mass::kilogram_per_mole,
    pressure::pascal,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::support::thermo::{
    eos::{CriticalPoint, GAS_CONSTANT},
    model::perfect_gas::{PerfectGasFluid, PerfectGasParameters},
};
use crate::support::units::SpecificGasConstant;

use super::SpeciesConstants;

/// Canonical identifier for normal hydrogen (H₂).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hydrogen;

const MOLAR_MASS: f64 = 2.015_88e-3;

impl SpeciesConstants for Hydrogen {
    fn molar_mass() -> MolarMass {
        MolarMass::new::<kilogram_per_mole>(MOLAR_MASS)
    }

    fn critical_point() -> CriticalPoint {
        CriticalPoint {
            temperature: ThermodynamicTemperature::new::<kelvin>(33.19),
            pressure: Pressure::new::<pascal>(1.296e6),
        }
    }
}

impl PerfectGasFluid for Hydrogen {
    /// Room-temperature `cp`; adequate between roughly 250 K and 400 K.
    fn parameters() -> PerfectGasParameters {
        PerfectGasParameters::new(
            SpecificGasConstant::new::<joule_per_kilogram_kelvin>(GAS_CONSTANT / MOLAR_MASS),
            SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(14_300.0),
        )
    }
}

#[cfg(feature = "coolprop")]
impl crate::support::thermo::model::coolprop::CoolPropFluid for Hydrogen {
    const BACKEND: &'static str = "HEOS";
    const NAME: &'static str = "Hydrogen";
}
