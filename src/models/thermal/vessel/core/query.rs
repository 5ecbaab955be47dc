//! Property lookups on a molar basis.

use uom::si::f64::{
    MassDensity, MolarEnergy, MolarMass, Pressure, SpecificHeatCapacity,
    ThermodynamicTemperature,
};

use crate::support::{
    thermo::{State, capability::PartialDerivatives},
    units::SpecificEnthalpy,
};

use super::{VesselError, traits::VesselThermoModel};

/// Thermodynamic properties at one `(T, P)` point.
///
/// Computed on demand and never cached: an integrator may evaluate trial
/// states it later rejects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermoPoint {
    pub temperature: ThermodynamicTemperature,
    pub pressure: Pressure,
    pub density: MassDensity,
    pub enthalpy: SpecificEnthalpy,
    pub molar_enthalpy: MolarEnergy,
    pub cp: SpecificHeatCapacity,
}

/// Adapter from molar vessel quantities to a mass-basis property model.
///
/// Backend failures surface as [`VesselError::PropertyLookup`].
#[derive(Debug)]
pub struct PropertyQuery<'a, Thermo, Fluid> {
    thermo: &'a Thermo,
    fluid: &'a Fluid,
    molar_mass: MolarMass,
}

impl<Thermo, Fluid> Clone for PropertyQuery<'_, Thermo, Fluid> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Thermo, Fluid> Copy for PropertyQuery<'_, Thermo, Fluid> {}

impl<'a, Thermo, Fluid> PropertyQuery<'a, Thermo, Fluid>
where
    Thermo: VesselThermoModel<Fluid>,
    Fluid: Clone,
{
    pub(super) fn new(thermo: &'a Thermo, fluid: &'a Fluid, molar_mass: MolarMass) -> Self {
        Self {
            thermo,
            fluid,
            molar_mass,
        }
    }

    #[must_use]
    pub fn molar_mass(&self) -> MolarMass {
        self.molar_mass
    }

    /// Evaluates density, enthalpy and `cp` at `(T, P)`.
    ///
    /// # Errors
    ///
    /// Returns [`VesselError::PropertyLookup`] if the backend rejects the point.
    pub fn point(
        &self,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    ) -> Result<ThermoPoint, VesselError> {
        let state = self.state(temperature, pressure)?;
        self.point_at(&state, pressure)
    }

    /// Evaluates the point and the partial derivatives at `(T, P)`.
    ///
    /// # Errors
    ///
    /// Returns [`VesselError::PropertyLookup`] if any lookup fails.
    pub fn point_and_partials(
        &self,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    ) -> Result<(ThermoPoint, PartialDerivatives), VesselError> {
        let state = self.state(temperature, pressure)?;
        let point = self.point_at(&state, pressure)?;
        let partials = self
            .thermo
            .partial_derivatives(&state)
            .map_err(|error| VesselError::lookup("evaluating partial derivatives", error))?;
        Ok((point, partials))
    }

    /// Returns the density at `(T, P)`.
    ///
    /// # Errors
    ///
    /// Returns [`VesselError::PropertyLookup`] if the backend rejects the point.
    pub fn density(
        &self,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    ) -> Result<MassDensity, VesselError> {
        Ok(self.state(temperature, pressure)?.density)
    }

    /// Returns the molar enthalpy at `(T, P)`.
    ///
    /// # Errors
    ///
    /// Returns [`VesselError::PropertyLookup`] if the backend rejects the point.
    pub fn molar_enthalpy(
        &self,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    ) -> Result<MolarEnergy, VesselError> {
        let state = self.state(temperature, pressure)?;
        let enthalpy = self
            .thermo
            .enthalpy(&state)
            .map_err(|error| VesselError::lookup("evaluating enthalpy", error))?;
        Ok(enthalpy * self.molar_mass)
    }

    /// Inverts `(h, P)` for temperature, with `h` on a molar basis.
    ///
    /// # Errors
    ///
    /// Returns [`VesselError::PropertyLookup`] if the backend can't resolve
    /// the state.
    pub fn temperature(
        &self,
        molar_enthalpy: MolarEnergy,
        pressure: Pressure,
    ) -> Result<ThermodynamicTemperature, VesselError> {
        let enthalpy: SpecificEnthalpy = molar_enthalpy / self.molar_mass;
        let state = self
            .thermo
            .state_from((self.fluid.clone(), pressure, enthalpy))
            .map_err(|error| VesselError::lookup("inverting (h, P) for temperature", error))?;
        Ok(state.temperature)
    }

    fn state(
        &self,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    ) -> Result<State<Fluid>, VesselError> {
        self.thermo
            .state_from((self.fluid.clone(), temperature, pressure))
            .map_err(|error| VesselError::lookup("resolving (T, P)", error))
    }

    fn point_at(&self, state: &State<Fluid>, pressure: Pressure) -> Result<ThermoPoint, VesselError> {
        let enthalpy = self
            .thermo
            .enthalpy(state)
            .map_err(|error| VesselError::lookup("evaluating enthalpy", error))?;
        let cp = self
            .thermo
            .cp(state)
            .map_err(|error| VesselError::lookup("evaluating cp", error))?;

        Ok(ThermoPoint {
            temperature: state.temperature,
            pressure,
            density: state.density,
            enthalpy,
            molar_enthalpy: enthalpy * self.molar_mass,
            cp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        mass_density::kilogram_per_cubic_meter, molar_energy::joule_per_mole,
        pressure::megapascal, thermodynamic_temperature::kelvin,
    };

    use crate::models::thermal::vessel::core::test_support::{BoundedGas, TestFluid, molar_mass};

    #[test]
    fn molar_enthalpy_scales_by_molar_mass() {
        let thermo = BoundedGas::new();
        let query = PropertyQuery::new(&thermo, &TestFluid, molar_mass());

        let t = ThermodynamicTemperature::new::<kelvin>(300.0);
        let p = Pressure::new::<megapascal>(1.0);
        let point = query.point(t, p).unwrap();

        assert_relative_eq!(
            point.molar_enthalpy.get::<joule_per_mole>(),
            point.enthalpy.value * molar_mass().value,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            query.molar_enthalpy(t, p).unwrap().get::<joule_per_mole>(),
            point.molar_enthalpy.get::<joule_per_mole>()
        );
        assert!(point.density.get::<kilogram_per_cubic_meter>() > 0.0);
    }

    #[test]
    fn temperature_inverts_molar_enthalpy() {
        let thermo = BoundedGas::new();
        let query = PropertyQuery::new(&thermo, &TestFluid, molar_mass());

        let p = Pressure::new::<megapascal>(2.0);
        let h = query
            .molar_enthalpy(ThermodynamicTemperature::new::<kelvin>(350.0), p)
            .unwrap();

        let t = query.temperature(h, p).unwrap();
        assert_relative_eq!(t.get::<kelvin>(), 350.0, epsilon = 1e-9);
    }

    #[test]
    fn backend_failures_become_lookup_errors() {
        let thermo = BoundedGas::new();
        let query = PropertyQuery::new(&thermo, &TestFluid, molar_mass());

        let result = query.point(
            ThermodynamicTemperature::new::<kelvin>(10.0),
            Pressure::new::<megapascal>(1.0),
        );
        assert!(matches!(
            result,
            Err(VesselError::PropertyLookup {
                context: "resolving (T, P)",
                ..
            })
        ));
    }
}
