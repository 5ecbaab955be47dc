use uom::si::{
    f64::{
        HeatTransfer, MassDensity, MassRate, MolarMass, Pressure, SpecificHeatCapacity,
        ThermodynamicTemperature, Volume,
    },
    heat_transfer::watt_per_square_meter_kelvin,
    mass_density::kilogram_per_cubic_meter,
    mass_rate::kilogram_per_second,
    molar_mass::kilogram_per_mole,
    pressure::pascal,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermodynamic_temperature::kelvin,
    volume::cubic_meter,
};

use crate::support::{
    thermo::{
        PropertyError, State,
        capability::{
            HasCp, HasEnthalpy, HasPartialDerivatives, PartialDerivatives, StateFrom, ThermoModel,
        },
        eos::{EquationOfState, GAS_CONSTANT, IdealGas},
    },
    units::{SpecificEnthalpy, TemperatureDifference, si_quantity},
};

use super::{
    ElongatedSphere, FlowSchedule, InletConditions, RecoveryConfig, StallPolicy, TankGeometry,
    Vessel, VesselConfig,
};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct TestFluid;

pub(crate) fn molar_mass() -> MolarMass {
    MolarMass::new::<kilogram_per_mole>(2.015_88e-3)
}

/// Perfect gas with hydrogen-like constants that refuses states outside
/// `[min_temperature, max_temperature]`, the way a tabulated backend does.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BoundedGas {
    cp: SpecificHeatCapacity,
    min_temperature: f64,
    max_temperature: f64,
}

impl BoundedGas {
    pub(crate) fn new() -> Self {
        Self {
            cp: SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(14_300.0),
            min_temperature: 20.0,
            max_temperature: 1000.0,
        }
    }

    /// Specific gas constant, J/(kg·K).
    pub(crate) fn r(&self) -> f64 {
        GAS_CONSTANT / molar_mass().value
    }

    pub(crate) fn cp(&self) -> SpecificHeatCapacity {
        self.cp
    }

    fn check(&self, temperature: f64, pressure: f64) -> Result<(), PropertyError> {
        if !(self.min_temperature..=self.max_temperature).contains(&temperature) {
            return Err(PropertyError::OutOfDomain {
                context: format!("temperature {temperature} K outside table"),
            });
        }
        if !(pressure > 0.0 && pressure.is_finite()) {
            return Err(PropertyError::OutOfDomain {
                context: format!("pressure {pressure} Pa outside table"),
            });
        }
        Ok(())
    }

    fn pressure(&self, state: &State<TestFluid>) -> f64 {
        state.density.get::<kilogram_per_cubic_meter>() * self.r() * state.temperature.get::<kelvin>()
    }
}

impl ThermoModel for BoundedGas {
    type Fluid = TestFluid;
}

impl HasEnthalpy for BoundedGas {
    fn enthalpy(&self, state: &State<Self::Fluid>) -> Result<SpecificEnthalpy, PropertyError> {
        self.check(state.temperature.get::<kelvin>(), self.pressure(state))?;
        let t_ref = ThermodynamicTemperature::new::<kelvin>(0.0);
        Ok(self.cp * state.temperature.minus(t_ref))
    }
}

impl HasCp for BoundedGas {
    fn cp(&self, state: &State<Self::Fluid>) -> Result<SpecificHeatCapacity, PropertyError> {
        self.check(state.temperature.get::<kelvin>(), self.pressure(state))?;
        Ok(self.cp)
    }
}

impl HasPartialDerivatives for BoundedGas {
    fn partial_derivatives(
        &self,
        state: &State<Self::Fluid>,
    ) -> Result<PartialDerivatives, PropertyError> {
        let t = state.temperature.get::<kelvin>();
        self.check(t, self.pressure(state))?;
        let rho = state.density.get::<kilogram_per_cubic_meter>();

        Ok(PartialDerivatives {
            density_temperature: si_quantity(-rho / t),
            density_pressure: si_quantity(1.0 / (self.r() * t)),
            enthalpy_pressure: si_quantity(0.0),
        })
    }
}

impl StateFrom<(TestFluid, ThermodynamicTemperature, Pressure)> for BoundedGas {
    type Error = PropertyError;

    fn state_from(
        &self,
        (fluid, temperature, pressure): (TestFluid, ThermodynamicTemperature, Pressure),
    ) -> Result<State<TestFluid>, Self::Error> {
        let t = temperature.get::<kelvin>();
        let p = pressure.get::<pascal>();
        self.check(t, p)?;
        let density = MassDensity::new::<kilogram_per_cubic_meter>(p / (self.r() * t));
        Ok(State::new(temperature, density, fluid))
    }
}

impl StateFrom<(TestFluid, Pressure, SpecificEnthalpy)> for BoundedGas {
    type Error = PropertyError;

    fn state_from(
        &self,
        (fluid, pressure, enthalpy): (TestFluid, Pressure, SpecificEnthalpy),
    ) -> Result<State<TestFluid>, Self::Error> {
        let temperature = ThermodynamicTemperature::new::<kelvin>(0.0) + enthalpy / self.cp;
        self.state_from((fluid, temperature, pressure))
    }
}

/// [`BoundedGas`] whose density does not respond to temperature or pressure,
/// which leaves the primitive balance matrix without an inverse.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RigidGas(pub(crate) BoundedGas);

impl ThermoModel for RigidGas {
    type Fluid = TestFluid;
}

impl HasEnthalpy for RigidGas {
    fn enthalpy(&self, state: &State<Self::Fluid>) -> Result<SpecificEnthalpy, PropertyError> {
        self.0.enthalpy(state)
    }
}

impl HasCp for RigidGas {
    fn cp(&self, state: &State<Self::Fluid>) -> Result<SpecificHeatCapacity, PropertyError> {
        HasCp::cp(&self.0, state)
    }
}

impl HasPartialDerivatives for RigidGas {
    fn partial_derivatives(
        &self,
        _state: &State<Self::Fluid>,
    ) -> Result<PartialDerivatives, PropertyError> {
        Ok(PartialDerivatives {
            density_temperature: si_quantity(0.0),
            density_pressure: si_quantity(0.0),
            enthalpy_pressure: si_quantity(0.0),
        })
    }
}

impl StateFrom<(TestFluid, ThermodynamicTemperature, Pressure)> for RigidGas {
    type Error = PropertyError;

    fn state_from(
        &self,
        input: (TestFluid, ThermodynamicTemperature, Pressure),
    ) -> Result<State<TestFluid>, Self::Error> {
        self.0.state_from(input)
    }
}

impl StateFrom<(TestFluid, Pressure, SpecificEnthalpy)> for RigidGas {
    type Error = PropertyError;

    fn state_from(
        &self,
        input: (TestFluid, Pressure, SpecificEnthalpy),
    ) -> Result<State<TestFluid>, Self::Error> {
        self.0.state_from(input)
    }
}

/// A hydrogen-sized tank at ambient 298.15 K fed from a 293.15 K, 10 MPa
/// supply, with the given volume, outlet rate and wall coefficient.
pub(crate) fn config(volume: f64, outlet: f64, heat_transfer: f64) -> VesselConfig {
    VesselConfig {
        geometry: TankGeometry::new(Volume::new::<cubic_meter>(volume), &ElongatedSphere)
            .expect("test volumes are positive"),
        ambient_temperature: ThermodynamicTemperature::new::<kelvin>(298.15),
        heat_transfer: HeatTransfer::new::<watt_per_square_meter_kelvin>(heat_transfer),
        inlet: InletConditions {
            temperature: ThermodynamicTemperature::new::<kelvin>(293.15),
            pressure: Pressure::new::<pascal>(1.0e7),
        },
        inlet_flow: FlowSchedule::none(),
        outlet_flow: FlowSchedule::constant(MassRate::new::<kilogram_per_second>(outlet))
            .expect("test rates are non-negative"),
        recovery: RecoveryConfig::default(),
        stall_policy: StallPolicy::default(),
    }
}

pub(crate) fn vessel<Eos: EquationOfState>(
    config: VesselConfig,
    eos: Eos,
) -> Vessel<BoundedGas, TestFluid, Eos> {
    Vessel::new(config, BoundedGas::new(), TestFluid, molar_mass(), eos)
        .expect("test configurations are valid")
}

pub(crate) fn rigid_vessel(config: VesselConfig) -> Vessel<RigidGas, TestFluid, IdealGas> {
    Vessel::new(config, RigidGas(BoundedGas::new()), TestFluid, molar_mass(), IdealGas)
        .expect("test configurations are valid")
}
