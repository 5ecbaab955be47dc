//! Extensions to [`uom`].
//!
//! This crate uses [`uom`] for all physical quantities. This module adds the
//! dimensions a lumped vessel model needs that [`uom`] doesn't name, and a
//! [`TemperatureDifference`] extension for subtracting absolute temperatures:
//!
//! ```
//! use uom::si::f64::ThermodynamicTemperature;
//! use uom::si::thermodynamic_temperature::kelvin;
//! use twine_vessel::support::units::TemperatureDifference;
//!
//! let tank = ThermodynamicTemperature::new::<kelvin>(313.15);
//! let ambient = ThermodynamicTemperature::new::<kelvin>(298.15);
//! let excess = tank.minus(ambient);
//! // `excess` is a TemperatureInterval, not a ThermodynamicTemperature
//! ```

mod quantities;

use std::marker::PhantomData;

use uom::si::{
    Dimension, Quantity, SI,
    f64::{TemperatureInterval, ThermodynamicTemperature},
    temperature_interval::kelvin as delta_kelvin,
    thermodynamic_temperature::kelvin as abs_kelvin,
};

pub use quantities::{
    AmountRate, DensityPressureDerivative, DensityTemperatureDerivative,
    EnthalpyPressureDerivative, MolarVolume, PressureRate, SpecificEnthalpy,
    SpecificGasConstant, TemperatureRate,
};

/// Builds a quantity from its value in base SI units.
///
/// Used for the crate-specific dimensions above, which have no named units.
#[must_use]
pub fn si_quantity<D>(value: f64) -> Quantity<D, SI<f64>, f64>
where
    D: Dimension + ?Sized,
{
    Quantity {
        dimension: PhantomData,
        units: PhantomData,
        value,
    }
}

/// Extension trait for computing temperature differences.
///
/// Subtracting two [`ThermodynamicTemperature`] values directly in [`uom`]
/// yields another absolute temperature; this trait returns the
/// [`TemperatureInterval`] instead. See
/// [#380](https://github.com/iliekturtles/uom/issues/380).
pub trait TemperatureDifference {
    /// Returns the temperature difference `self - other`.
    fn minus(self, other: Self) -> TemperatureInterval;
}

impl TemperatureDifference for ThermodynamicTemperature {
    fn minus(self, other: Self) -> TemperatureInterval {
        TemperatureInterval::new::<delta_kelvin>(
            self.get::<abs_kelvin>() - other.get::<abs_kelvin>(),
        )
    }
}
