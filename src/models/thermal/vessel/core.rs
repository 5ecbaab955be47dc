mod balance;
mod boundary;
mod demand;
mod diagnostic;
mod error;
mod geometry;
mod integrate;
mod query;
mod recovery;
mod simulate;
mod state;
mod traits;

#[cfg(test)]
mod test_support;

use uom::si::{
    f64::{HeatTransfer, MolarMass, ThermodynamicTemperature},
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    constraint::{NonNegative, StrictlyPositive},
    thermo::eos::EquationOfState,
};

pub use balance::{
    Conserved, Evaluation, Formulation, PointStatus, Primitive, Sampled, StallPolicy, TankPoint,
};
pub use boundary::{BoundaryConditions, FlowSchedule, Flows, InletConditions, InletStream};
pub use demand::{FARADAY, FuelCellDemand};
pub use diagnostic::{Action, Diagnostic, Event, TimedDiagnostic};
pub use error::VesselError;
pub use geometry::{ElongatedSphere, SurfaceArea, TankGeometry};
pub use integrate::{
    BalanceInput, BalanceModel, EulerConfig, EulerIntegrator, Integration, IntegrationFailure,
    Integrator, RadauConfig, RadauIntegrator, Status,
};
pub use query::{PropertyQuery, ThermoPoint};
pub use recovery::{NonConvergencePolicy, Recovery, RecoveryConfig, StateRecovery};
pub use simulate::{
    InitialCondition, Sample, Sampling, SimulationConfig, TankSimulator, Trajectory,
};
pub use state::{ConservedRate, ConservedState, PrimitiveRate, PrimitiveState, VesselState};
pub use traits::VesselThermoModel;

/// Tank and boundary configuration.
#[derive(Debug, Clone)]
pub struct VesselConfig {
    pub geometry: TankGeometry,
    pub ambient_temperature: ThermodynamicTemperature,

    /// Wall heat-transfer coefficient `U`.
    pub heat_transfer: HeatTransfer,

    pub inlet: InletConditions,
    pub inlet_flow: FlowSchedule,
    pub outlet_flow: FlowSchedule,
    pub recovery: RecoveryConfig,
    pub stall_policy: StallPolicy,
}

/// A pressure vessel holding one pure gas.
///
/// Bundles the validated configuration with the property backend, the fluid
/// it describes, and the equation of state used to recover pressure from the
/// holdup. Formulations borrow a `Vessel` to evaluate the balances.
#[derive(Debug, Clone)]
pub struct Vessel<Thermo, Fluid, Eos> {
    thermo: Thermo,
    fluid: Fluid,
    molar_mass: MolarMass,
    eos: Eos,
    geometry: TankGeometry,
    boundary: BoundaryConditions,
    recovery: RecoveryConfig,
    stall_policy: StallPolicy,
}

impl<Thermo, Fluid, Eos> Vessel<Thermo, Fluid, Eos>
where
    Thermo: VesselThermoModel<Fluid>,
    Fluid: Clone,
    Eos: EquationOfState,
{
    /// Validates `config` and evaluates the inlet stream.
    ///
    /// # Errors
    ///
    /// Returns [`VesselError::Constraint`] or [`VesselError::InvalidInput`]
    /// for an invalid configuration, and [`VesselError::PropertyLookup`] if
    /// the backend can't resolve the inlet conditions.
    pub fn new(
        config: VesselConfig,
        thermo: Thermo,
        fluid: Fluid,
        molar_mass: MolarMass,
        eos: Eos,
    ) -> Result<Self, VesselError> {
        let VesselConfig {
            geometry,
            ambient_temperature,
            heat_transfer,
            inlet,
            inlet_flow,
            outlet_flow,
            recovery,
            stall_policy,
        } = config;

        let molar_mass = StrictlyPositive::new(molar_mass)
            .map_err(VesselError::constraint("molar mass"))?
            .into_inner();
        StrictlyPositive::new(ambient_temperature.get::<kelvin>())
            .map_err(VesselError::constraint("ambient temperature"))?;
        let heat_transfer = NonNegative::new(heat_transfer)
            .map_err(VesselError::constraint("heat-transfer coefficient"))?
            .into_inner();
        StrictlyPositive::new(recovery.tolerance)
            .map_err(VesselError::constraint("recovery tolerance"))?;
        StrictlyPositive::new(recovery.floor)
            .map_err(VesselError::constraint("empty-tank floor"))?;
        if recovery.max_iters == 0 {
            return Err(VesselError::InvalidInput {
                context: "recovery",
                reason: "needs at least one iteration",
            });
        }

        let point = PropertyQuery::new(&thermo, &fluid, molar_mass)
            .point(inlet.temperature, inlet.pressure)?;
        let inlet = InletStream {
            temperature: inlet.temperature,
            pressure: inlet.pressure,
            enthalpy: point.enthalpy,
            molar_enthalpy: point.molar_enthalpy,
        };

        Ok(Self {
            thermo,
            fluid,
            molar_mass,
            eos,
            geometry,
            boundary: BoundaryConditions {
                ambient_temperature,
                heat_transfer,
                inlet,
                inlet_flow,
                outlet_flow,
            },
            recovery,
            stall_policy,
        })
    }

    /// Property lookups on a molar basis.
    #[must_use]
    pub fn query(&self) -> PropertyQuery<'_, Thermo, Fluid> {
        PropertyQuery::new(&self.thermo, &self.fluid, self.molar_mass)
    }

    /// `(n, n·h) → (T, P)` inversion for this tank.
    #[must_use]
    pub fn state_recovery(&self) -> StateRecovery<'_, Thermo, Fluid, Eos> {
        StateRecovery::new(
            self.query(),
            &self.eos,
            self.geometry.volume(),
            self.boundary.ambient_temperature,
            &self.recovery,
        )
    }
}

impl<Thermo, Fluid, Eos> Vessel<Thermo, Fluid, Eos> {
    #[must_use]
    pub fn thermo(&self) -> &Thermo {
        &self.thermo
    }

    #[must_use]
    pub fn fluid(&self) -> &Fluid {
        &self.fluid
    }

    #[must_use]
    pub fn molar_mass(&self) -> MolarMass {
        self.molar_mass
    }

    #[must_use]
    pub fn eos(&self) -> &Eos {
        &self.eos
    }

    #[must_use]
    pub fn geometry(&self) -> &TankGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn boundary(&self) -> &BoundaryConditions {
        &self.boundary
    }

    #[must_use]
    pub fn recovery_config(&self) -> &RecoveryConfig {
        &self.recovery
    }

    #[must_use]
    pub fn stall_policy(&self) -> StallPolicy {
        self.stall_policy
    }
}
