//! Capability traits used to query and construct thermodynamic states.
//!
//! A property model implements only the capabilities it can provide. The
//! vessel model asks for exactly the set it needs through a single bound
//! (see `VesselThermoModel`), so an unsupported backend is a compile error
//! rather than a runtime failure.

mod base;
mod partials;
mod properties;
mod state_from;

pub use base::ThermoModel;
pub use partials::{HasPartialDerivatives, PartialDerivatives};
pub use properties::{HasCp, HasEnthalpy};
pub use state_from::StateFrom;
