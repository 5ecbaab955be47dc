//! Pressure-volume-temperature equations of state.
//!
//! An [`EquationOfState`] closes the conserved-variable vessel balance: given
//! the holdup `n` in a volume `V` at temperature `T`, it returns the pressure.
//! Implementations are interchangeable strategies selected when a vessel is
//! built:
//!
//! - [`IdealGas`]: `P = R·T/v`
//! - [`RedlichKwong`]: `P = R·T/(v − b) − a/(√T·v·(v + b))`
//!
//! Both work on the molar volume `v = V/n` and share the molar gas constant
//! [`GAS_CONSTANT`].

mod error;
mod ideal_gas;
mod redlich_kwong;

use uom::si::{
    amount_of_substance::mole,
    f64::{AmountOfSubstance, MolarHeatCapacity, Pressure, ThermodynamicTemperature, Volume},
    molar_heat_capacity::joule_per_kelvin_mole,
    pressure::pascal,
    thermodynamic_temperature::kelvin,
    volume::cubic_meter,
};

use crate::support::units::MolarVolume;

pub use error::EosError;
pub use ideal_gas::IdealGas;
pub use redlich_kwong::{CriticalPoint, RedlichKwong};

/// Molar gas constant, J/(mol·K).
pub const GAS_CONSTANT: f64 = 8.314_462_618;

/// Returns the molar gas constant as a typed quantity.
#[must_use]
pub fn gas_constant() -> MolarHeatCapacity {
    MolarHeatCapacity::new::<joule_per_kelvin_mole>(GAS_CONSTANT)
}

/// A pressure-explicit equation of state for a pure gas.
pub trait EquationOfState {
    /// Returns the pressure at temperature `T` and molar volume `v`.
    ///
    /// # Errors
    ///
    /// Returns [`EosError`] if the state lies outside the equation's domain.
    fn pressure_at(
        &self,
        temperature: ThermodynamicTemperature,
        molar_volume: MolarVolume,
    ) -> Result<Pressure, EosError>;

    /// Returns the molar volume at temperature `T` and pressure `P`.
    ///
    /// # Errors
    ///
    /// Returns [`EosError`] if the inputs are non-positive or no volume
    /// satisfies the equation.
    fn molar_volume(
        &self,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    ) -> Result<MolarVolume, EosError>;

    /// Returns the pressure of `n` moles held in volume `V` at temperature `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EosError::NonPositive`] if any argument is not strictly
    /// positive, or whatever [`pressure_at`](Self::pressure_at) reports.
    fn pressure(
        &self,
        temperature: ThermodynamicTemperature,
        amount: AmountOfSubstance,
        volume: Volume,
    ) -> Result<Pressure, EosError> {
        ensure_positive("temperature", temperature.get::<kelvin>())?;
        ensure_positive("amount of substance", amount.get::<mole>())?;
        ensure_positive("volume", volume.get::<cubic_meter>())?;

        self.pressure_at(temperature, volume / amount)
    }
}

/// Checks that `value` is strictly positive and finite.
pub(crate) fn ensure_positive(quantity: &'static str, value: f64) -> Result<(), EosError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(EosError::NonPositive { quantity, value })
    }
}

/// Checks the `(T, P)` inputs of a molar volume lookup.
fn ensure_positive_tp(
    temperature: ThermodynamicTemperature,
    pressure: Pressure,
) -> Result<(), EosError> {
    ensure_positive("temperature", temperature.get::<kelvin>())?;
    ensure_positive("pressure", pressure.get::<pascal>())
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::support::thermo::fluid::{Hydrogen, SpeciesConstants};

    fn strategies() -> Vec<Box<dyn EquationOfState>> {
        vec![
            Box::new(IdealGas),
            Box::new(RedlichKwong::for_species::<Hydrogen>().unwrap()),
        ]
    }

    #[test]
    fn strategies_share_a_call_signature() {
        let t = ThermodynamicTemperature::new::<kelvin>(313.15);
        let n = AmountOfSubstance::new::<mole>(2000.0);
        let v = Volume::new::<cubic_meter>(1.0);

        for eos in strategies() {
            let p = eos.pressure(t, n, v).unwrap();
            assert!(p.get::<pascal>() > 4.0e6 && p.get::<pascal>() < 6.0e6);
        }
    }

    #[test]
    fn non_positive_inputs_are_rejected() {
        let t = ThermodynamicTemperature::new::<kelvin>(300.0);
        let n = AmountOfSubstance::new::<mole>(1.0);
        let v = Volume::new::<cubic_meter>(1.0);

        for eos in strategies() {
            assert!(matches!(
                eos.pressure(t, AmountOfSubstance::new::<mole>(0.0), v),
                Err(EosError::NonPositive { quantity: "amount of substance", .. })
            ));
            assert!(matches!(
                eos.pressure(t, n, Volume::new::<cubic_meter>(-1.0)),
                Err(EosError::NonPositive { quantity: "volume", .. })
            ));
            assert!(matches!(
                eos.pressure(ThermodynamicTemperature::new::<kelvin>(0.0), n, v),
                Err(EosError::NonPositive { quantity: "temperature", .. })
            ));
            assert!(matches!(
                eos.molar_volume(t, Pressure::new::<pascal>(0.0)),
                Err(EosError::NonPositive { quantity: "pressure", .. })
            ));
        }
    }

    #[test]
    fn molar_volume_inverts_pressure() {
        let t = ThermodynamicTemperature::new::<kelvin>(313.15);
        let p = Pressure::new::<pascal>(7.0e6);

        for eos in strategies() {
            let v = eos.molar_volume(t, p).unwrap();
            let roundtrip = eos.pressure_at(t, v).unwrap();
            assert_relative_eq!(
                roundtrip.get::<pascal>(),
                p.get::<pascal>(),
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn gas_constant_matches_hydrogen_ideal_density() {
        let r = gas_constant().get::<joule_per_kelvin_mole>();
        let m = Hydrogen::molar_mass().value;
        let rho = 1.0e5 * m / (r * 273.15);
        assert_relative_eq!(rho, 0.08876, max_relative = 1e-3);
    }
}
