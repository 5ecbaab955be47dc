//! Supporting utilities used by the vessel model.
//!
//! Modules here are public because they are useful on their own (for example,
//! evaluating an equation of state outside of a simulation), but their APIs
//! are not stable.

pub mod constraint;
pub mod thermo;
pub mod units;
