//! Hydrogen demand of a fuel-cell plant, used to size a tank.

use uom::si::{
    area::square_meter,
    electric_current_density::ampere_per_square_meter,
    f64::{Area, ElectricCurrentDensity as CurrentDensity, Mass, MassRate, MolarMass, Time},
    mass_rate::kilogram_per_second,
    molar_mass::kilogram_per_mole,
};

use crate::support::constraint::{NonNegative, StrictlyPositive};

use super::VesselError;

/// Faraday constant, C/mol.
pub const FARADAY: f64 = 96_485.0;

/// A fuel-cell plant drawing hydrogen at a constant current.
///
/// The plant is `modules × arrays_per_module × stacks_per_array ×
/// cells_per_stack` identical cells. Each consumes hydrogen at
///
/// ```text
/// ṁ_cell = |ν|·i·A_cell·M / (z·F·UF)
/// ```
///
/// where `ν` is the hydrogen stoichiometric coefficient, `z` the electrons
/// transferred per molecule and `UF` the fuel utilization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelCellDemand {
    /// Operating window the tank must cover.
    pub duration: Time,
    pub stoichiometry: f64,
    pub current_density: CurrentDensity,
    pub cell_area: Area,
    pub electrons: f64,
    pub utilization: f64,
    pub cells_per_stack: u32,
    pub stacks_per_array: u32,
    pub arrays_per_module: u32,
    pub modules: u32,
}

impl FuelCellDemand {
    /// Total number of cells in the plant.
    #[must_use]
    pub fn cells(&self) -> u64 {
        u64::from(self.cells_per_stack)
            * u64::from(self.stacks_per_array)
            * u64::from(self.arrays_per_module)
            * u64::from(self.modules)
    }

    /// Hydrogen mass flow drawn by the whole plant.
    ///
    /// # Errors
    ///
    /// Returns [`VesselError::Constraint`] if a physical input is negative or
    /// a divisor is not strictly positive, and [`VesselError::InvalidInput`]
    /// if the utilization exceeds one.
    pub fn consumption_rate(&self, molar_mass: MolarMass) -> Result<MassRate, VesselError> {
        let current_density = NonNegative::new(self.current_density)
            .map_err(VesselError::constraint("current density"))?;
        let cell_area =
            NonNegative::new(self.cell_area).map_err(VesselError::constraint("cell area"))?;
        let electrons =
            StrictlyPositive::new(self.electrons).map_err(VesselError::constraint("electrons"))?;
        let utilization = StrictlyPositive::new(self.utilization)
            .map_err(VesselError::constraint("fuel utilization"))?;
        let molar_mass =
            StrictlyPositive::new(molar_mass).map_err(VesselError::constraint("molar mass"))?;

        if utilization.into_inner() > 1.0 {
            return Err(VesselError::InvalidInput {
                context: "fuel utilization",
                reason: "must not exceed one",
            });
        }

        let per_cell = self.stoichiometry.abs()
            * current_density
                .into_inner()
                .get::<ampere_per_square_meter>()
            * cell_area.into_inner().get::<square_meter>()
            * molar_mass.into_inner().get::<kilogram_per_mole>()
            / (electrons.into_inner() * FARADAY * utilization.into_inner());

        #[allow(clippy::cast_precision_loss)]
        let cells = self.cells() as f64;
        Ok(MassRate::new::<kilogram_per_second>(per_cell * cells))
    }

    /// Hydrogen mass consumed over [`duration`](Self::duration).
    ///
    /// # Errors
    ///
    /// Returns [`VesselError::Constraint`] if the duration is negative, or
    /// any error from [`consumption_rate`](Self::consumption_rate).
    pub fn hydrogen_mass(&self, molar_mass: MolarMass) -> Result<Mass, VesselError> {
        let duration =
            NonNegative::new(self.duration).map_err(VesselError::constraint("duration"))?;
        Ok(self.consumption_rate(molar_mass)? * duration.into_inner())
    }
}
