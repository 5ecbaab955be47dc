//! Canonical fluid identifiers.
//!
//! A fluid type names a substance. Each property model decides how to
//! interpret that name through trait implementations: constants for
//! [`PerfectGas`](crate::support::thermo::model::PerfectGas), backend
//! identifiers for `CoolProp`, and [`SpeciesConstants`] for anything that
//! needs molar quantities or a critical point.

mod hydrogen;

use uom::si::f64::MolarMass;

use crate::support::thermo::eos::CriticalPoint;

pub use hydrogen::Hydrogen;

/// Molecular constants of a pure species.
pub trait SpeciesConstants {
    /// Returns the molar mass.
    fn molar_mass() -> MolarMass;

    /// Returns the critical point used by cubic equations of state.
    fn critical_point() -> CriticalPoint;
}
