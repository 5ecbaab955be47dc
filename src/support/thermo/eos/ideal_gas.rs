use uom::si::{
    f64::{Pressure, ThermodynamicTemperature},
    pressure::pascal,
    thermodynamic_temperature::kelvin,
};

use crate::support::units::{MolarVolume, si_quantity};

use super::{EosError, EquationOfState, GAS_CONSTANT, ensure_positive, ensure_positive_tp};

/// Ideal gas equation of state, `P = R·T/v`.
///
/// Singular only at `v = 0`, which [`EquationOfState::pressure`] rules out by
/// rejecting non-positive holdups and volumes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdealGas;

impl EquationOfState for IdealGas {
    fn pressure_at(
        &self,
        temperature: ThermodynamicTemperature,
        molar_volume: MolarVolume,
    ) -> Result<Pressure, EosError> {
        let v = molar_volume.value;
        ensure_positive("molar volume", v)?;

        Ok(Pressure::new::<pascal>(
            GAS_CONSTANT * temperature.get::<kelvin>() / v,
        ))
    }

    fn molar_volume(
        &self,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    ) -> Result<MolarVolume, EosError> {
        ensure_positive_tp(temperature, pressure)?;

        Ok(si_quantity(
            GAS_CONSTANT * temperature.get::<kelvin>() / pressure.get::<pascal>(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        amount_of_substance::mole,
        f64::{AmountOfSubstance, Volume},
        pressure::megapascal,
        volume::cubic_meter,
    };

    #[test]
    fn pressure_of_one_mole_in_a_cubic_meter() {
        let p = IdealGas
            .pressure(
                ThermodynamicTemperature::new::<kelvin>(300.0),
                AmountOfSubstance::new::<mole>(1.0),
                Volume::new::<cubic_meter>(1.0),
            )
            .unwrap();

        assert_relative_eq!(p.get::<pascal>(), GAS_CONSTANT * 300.0);
    }

    #[test]
    fn molar_volume_at_fill_conditions() {
        let v = IdealGas
            .molar_volume(
                ThermodynamicTemperature::new::<kelvin>(313.15),
                Pressure::new::<megapascal>(7.0),
            )
            .unwrap();

        assert_relative_eq!(v.value, 3.719_534_241e-4, max_relative = 1e-9);
    }
}
