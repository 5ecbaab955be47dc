//! Thermal systems models.
//!
//! This module contains models of thermal systems, currently transient
//! pressure vessels.

pub mod vessel;
