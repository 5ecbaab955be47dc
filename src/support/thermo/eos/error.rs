use thiserror::Error;
use uom::si::f64::{Pressure, ThermodynamicTemperature};

use crate::support::units::MolarVolume;

/// Errors returned when an equation of state is evaluated outside its domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EosError {
    /// A temperature, amount, volume, or pressure was zero, negative, or not finite.
    #[error("{quantity} must be strictly positive, got {value}")]
    NonPositive { quantity: &'static str, value: f64 },

    /// The molar volume is at or below the co-volume `b`.
    ///
    /// The repulsive term is singular there, so the state is not physical.
    #[error("molar volume {molar_volume:?} is at or below the co-volume {co_volume:?}")]
    CoVolume {
        molar_volume: MolarVolume,
        co_volume: MolarVolume,
    },

    /// No molar volume reproduces the requested pressure.
    #[error("no molar volume found for {pressure:?} at {temperature:?}")]
    NoRoot {
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    },
}
