//! Thermodynamic property modeling for the vessel model.
//!
//! - [`capability`]: traits a property model implements (enthalpy, `cp`,
//!   partial derivatives, state construction).
//! - [`eos`]: pressure-volume-temperature equations of state used to close
//!   the conserved-variable balance.
//! - [`fluid`]: fluid identifiers and species constants.
//! - [`model`]: concrete property models.

mod error;
mod state;

pub mod capability;
pub mod eos;
pub mod fluid;
pub mod model;

pub use error::PropertyError;
pub use state::State;
