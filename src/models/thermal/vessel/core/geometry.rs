//! Tank volume and wall area.

use std::f64::consts::PI;

use uom::si::{
    area::square_meter,
    f64::{Area, Mass, MassDensity, Volume},
    volume::cubic_meter,
};

use crate::support::constraint::{Constrained, StrictlyPositive};

use super::VesselError;

/// Rule deriving the heat-transfer area of a tank from its volume.
pub trait SurfaceArea {
    /// Returns the wall area exposed to ambient for a tank of `volume`.
    fn surface_area(&self, volume: Volume) -> Area;
}

/// A sphere of diameter `d` elongated by a cylindrical section `L = 3·d`.
///
/// The diameter follows from the volume as `d = (4·V/(3·π))^(1/3)`, and the
/// area counts the two hemispherical caps and the cylinder wall:
/// `A = 2·π·r² + 2·π·r·L` with `r = d/2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElongatedSphere;

impl SurfaceArea for ElongatedSphere {
    fn surface_area(&self, volume: Volume) -> Area {
        let d = (4.0 * volume.get::<cubic_meter>() / (3.0 * PI)).cbrt();
        let r = d / 2.0;
        let l = 3.0 * d;
        Area::new::<square_meter>(2.0 * PI * r * r + 2.0 * PI * r * l)
    }
}

/// Fixed tank volume and wall area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankGeometry {
    volume: Constrained<Volume, StrictlyPositive>,
    area: Area,
}

impl TankGeometry {
    /// Builds a geometry with the area given by `rule`.
    ///
    /// # Errors
    ///
    /// Returns [`VesselError::Constraint`] if the volume or the derived area
    /// is not strictly positive.
    pub fn new(volume: Volume, rule: &impl SurfaceArea) -> Result<Self, VesselError> {
        let volume = StrictlyPositive::new(volume).map_err(VesselError::constraint("volume"))?;
        let area = rule.surface_area(volume.into_inner());
        Self::with_area(volume.into_inner(), area)
    }

    /// Builds a geometry with an explicit wall area.
    ///
    /// # Errors
    ///
    /// Returns [`VesselError::Constraint`] if either value is not strictly positive.
    pub fn with_area(volume: Volume, area: Area) -> Result<Self, VesselError> {
        let volume = StrictlyPositive::new(volume).map_err(VesselError::constraint("volume"))?;
        let area = StrictlyPositive::new(area)
            .map_err(VesselError::constraint("surface area"))?
            .into_inner();
        Ok(Self { volume, area })
    }

    /// Sizes the tank to hold `mass` at the fill `density`, `V = m/ρ`.
    ///
    /// # Errors
    ///
    /// Returns [`VesselError::Constraint`] if the mass or density is not
    /// strictly positive.
    pub fn sized_for_mass(
        mass: Mass,
        density: MassDensity,
        rule: &impl SurfaceArea,
    ) -> Result<Self, VesselError> {
        let mass = StrictlyPositive::new(mass).map_err(VesselError::constraint("fill mass"))?;
        let density =
            StrictlyPositive::new(density).map_err(VesselError::constraint("fill density"))?;
        Self::new(mass.into_inner() / density.into_inner(), rule)
    }

    #[must_use]
    pub fn volume(&self) -> Volume {
        self.volume.into_inner()
    }

    #[must_use]
    pub fn area(&self) -> Area {
        self.area
    }
}
