use uom::{
    ConstZero,
    si::f64::{Energy, MolarEnergy, Power, Pressure, ThermodynamicTemperature, Time},
};

use crate::models::thermal::vessel::core::{
    ConservedRate, ConservedState, Vessel, VesselError, traits::VesselThermoModel,
};
use crate::support::{thermo::eos::EquationOfState, units::AmountRate};

use super::{Evaluation, Formulation, PointStatus, Sampled, TankPoint};

/// Balances on the conserved holdup `(n, n·h)`.
///
/// ```text
/// dn/dt     = (ṁ_in − ṁ_out) / M
/// d(nh)/dt  = ṅ_in·h_in − ṅ_out·h − U·A·(T − T_amb)
/// ```
///
/// `(T, P)` come from [`StateRecovery`](crate::models::thermal::vessel::StateRecovery)
/// at every evaluation. A holdup at or below the empty floor is pinned to the
/// floor with zero enthalpy.
#[derive(Debug)]
pub struct Conserved<'v, Thermo, Fluid, Eos> {
    vessel: &'v Vessel<Thermo, Fluid, Eos>,
}

impl<Thermo, Fluid, Eos> Clone for Conserved<'_, Thermo, Fluid, Eos> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Thermo, Fluid, Eos> Copy for Conserved<'_, Thermo, Fluid, Eos> {}

impl<'v, Thermo, Fluid, Eos> Conserved<'v, Thermo, Fluid, Eos> {
    #[must_use]
    pub fn new(vessel: &'v Vessel<Thermo, Fluid, Eos>) -> Self {
        Self { vessel }
    }
}

impl<Thermo, Fluid, Eos> Formulation for Conserved<'_, Thermo, Fluid, Eos>
where
    Thermo: VesselThermoModel<Fluid>,
    Fluid: Clone,
    Eos: EquationOfState,
{
    type State = ConservedState;
    type Rate = ConservedRate;

    /// Sizes the holdup from the backend density, `n₀ = ρ₀·V/M`.
    fn initial_state(
        &self,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    ) -> Result<ConservedState, VesselError> {
        let point = self.vessel.query().point(temperature, pressure)?;
        let amount = point.density * self.vessel.geometry().volume() / self.vessel.molar_mass();

        Ok(self.saturate(ConservedState {
            amount,
            enthalpy: amount * point.molar_enthalpy,
        }))
    }

    fn derivative(
        &self,
        time: Time,
        state: &ConservedState,
        seed: Option<ThermodynamicTemperature>,
    ) -> Result<Evaluation<ConservedRate>, VesselError> {
        let state = self.saturate(*state);
        let recovery = self
            .vessel
            .state_recovery()
            .recover(state.amount, state.enthalpy, seed)?;
        let temperature = recovery.temperature();

        let boundary = self.vessel.boundary();
        let flows = boundary.flows(time);
        let inflow: AmountRate = flows.inlet / self.vessel.molar_mass();
        let outflow: AmountRate = flows.outlet / self.vessel.molar_mass();

        let molar_enthalpy: MolarEnergy = state.enthalpy / state.amount;
        let heat_loss = boundary.heat_loss(self.vessel.geometry().area(), temperature);
        let enthalpy_rate: Power =
            inflow * boundary.inlet().molar_enthalpy - outflow * molar_enthalpy - heat_loss;

        Ok(Evaluation {
            rate: ConservedRate {
                amount: inflow - outflow,
                enthalpy: enthalpy_rate,
            },
            temperature,
            diagnostic: recovery.diagnostic(),
        })
    }

    fn saturate(&self, state: ConservedState) -> ConservedState {
        let floor = self.vessel.recovery_config().floor;
        if state.amount <= floor {
            ConservedState {
                amount: floor,
                enthalpy: Energy::ZERO,
            }
        } else {
            state
        }
    }

    /// Recovers `(T, P)` seeded with the previous sample's temperature.
    fn sample(
        &self,
        state: &ConservedState,
        previous: Option<&TankPoint>,
    ) -> Result<Sampled, VesselError> {
        let state = self.saturate(*state);
        let recovery = self.vessel.state_recovery().recover(
            state.amount,
            state.enthalpy,
            previous.map(|point| point.temperature),
        )?;

        Ok(Sampled {
            point: TankPoint {
                temperature: recovery.temperature(),
                pressure: recovery.pressure(),
                amount: state.amount,
                mass: state.amount * self.vessel.molar_mass(),
                status: recovery.status(),
            },
            diagnostic: recovery.diagnostic(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        amount_of_substance::mole, energy::joule, f64::AmountOfSubstance, f64::MassRate,
        mass::kilogram, mass_rate::kilogram_per_second, power::watt, pressure::megapascal,
        thermodynamic_temperature::kelvin,
    };

    use crate::models::thermal::vessel::core::{
        Diagnostic, FlowSchedule,
        test_support::{config, molar_mass, vessel},
    };
    use crate::support::thermo::eos::IdealGas;

    fn temp(value: f64) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<kelvin>(value)
    }

    #[test]
    fn closed_tank_at_ambient_is_at_rest() {
        let vessel = vessel(config(1.0, 0.0, 5.0), IdealGas);
        let formulation = Conserved::new(&vessel);

        let state = formulation
            .initial_state(temp(298.15), Pressure::new::<megapascal>(7.0))
            .unwrap();
        let evaluation = formulation.derivative(Time::ZERO, &state, None).unwrap();

        assert_relative_eq!(evaluation.rate.amount.value, 0.0);
        assert_relative_eq!(evaluation.rate.enthalpy.get::<watt>(), 0.0, epsilon = 1e-6);
        assert_relative_eq!(evaluation.temperature.get::<kelvin>(), 298.15, epsilon = 1e-3);
        assert!(evaluation.diagnostic.is_none());
    }

    #[test]
    fn discharge_removes_holdup_at_tank_enthalpy() {
        let vessel = vessel(config(14.3, 0.01, 0.0), IdealGas);
        let formulation = Conserved::new(&vessel);

        let state = formulation
            .initial_state(temp(313.15), Pressure::new::<megapascal>(7.0))
            .unwrap();
        let evaluation = formulation
            .derivative(Time::ZERO, &state, Some(temp(313.15)))
            .unwrap();

        let outflow = 0.01 / molar_mass().value;
        let molar_enthalpy = state.enthalpy.value / state.amount.value;
        assert_relative_eq!(evaluation.rate.amount.value, -outflow, max_relative = 1e-12);
        assert_relative_eq!(
            evaluation.rate.enthalpy.get::<watt>(),
            -outflow * molar_enthalpy,
            max_relative = 1e-12
        );
    }

    #[test]
    fn warm_tank_loses_heat_to_ambient() {
        let vessel = vessel(config(1.0, 0.0, 5.0), IdealGas);
        let formulation = Conserved::new(&vessel);

        let state = formulation
            .initial_state(temp(313.15), Pressure::new::<megapascal>(7.0))
            .unwrap();
        let evaluation = formulation.derivative(Time::ZERO, &state, None).unwrap();

        let expected = 5.0 * vessel.geometry().area().value * 15.0;
        assert_relative_eq!(
            evaluation.rate.enthalpy.get::<watt>(),
            -expected,
            max_relative = 1e-4
        );
    }

    #[test]
    fn inflow_adds_inlet_enthalpy() {
        let mut config = config(1.0, 0.0, 0.0);
        config.inlet_flow =
            FlowSchedule::constant(MassRate::new::<kilogram_per_second>(0.002)).unwrap();
        let vessel = vessel(config, IdealGas);
        let formulation = Conserved::new(&vessel);

        let state = formulation
            .initial_state(temp(298.15), Pressure::new::<megapascal>(1.0))
            .unwrap();
        let evaluation = formulation.derivative(Time::ZERO, &state, None).unwrap();

        let inflow = 0.002 / molar_mass().value;
        let h_in = vessel.boundary().inlet().molar_enthalpy.value;
        assert_relative_eq!(evaluation.rate.amount.value, inflow, max_relative = 1e-12);
        assert_relative_eq!(
            evaluation.rate.enthalpy.get::<watt>(),
            inflow * h_in,
            max_relative = 1e-12
        );
    }

    #[test]
    fn depleted_state_is_saturated_to_the_floor() {
        let vessel = vessel(config(1.0, 0.01, 5.0), IdealGas);
        let formulation = Conserved::new(&vessel);
        let floor = vessel.recovery_config().floor;

        let state = ConservedState {
            amount: AmountOfSubstance::new::<mole>(-0.3),
            enthalpy: Energy::new::<joule>(-10.0),
        };
        let saturated = formulation.saturate(state);
        assert_eq!(saturated.amount, floor);
        assert_eq!(saturated.enthalpy, Energy::ZERO);

        let evaluation = formulation.derivative(Time::ZERO, &state, None).unwrap();
        assert_eq!(evaluation.temperature, temp(298.15));
        assert_relative_eq!(evaluation.rate.enthalpy.get::<watt>(), 0.0);
        assert!(evaluation.rate.amount.value.is_finite());

        let sampled = formulation.sample(&state, None).unwrap();
        assert_eq!(sampled.point.status, PointStatus::Empty);
        assert_eq!(sampled.point.pressure, Pressure::ZERO);
        assert!(sampled.point.mass.get::<kilogram>() < 1e-8);
    }

    #[test]
    fn sample_reports_mass_and_frozen_diagnostics() {
        let vessel = vessel(config(1.0, 0.0, 0.0), IdealGas);
        let formulation = Conserved::new(&vessel);

        let state = formulation
            .initial_state(temp(313.15), Pressure::new::<megapascal>(7.0))
            .unwrap();
        let sampled = formulation.sample(&state, None).unwrap();
        assert_eq!(sampled.point.status, PointStatus::Converged);
        assert_relative_eq!(
            sampled.point.mass.get::<kilogram>(),
            state.amount.get::<mole>() * molar_mass().value,
            max_relative = 1e-12
        );

        // Enthalpy of a 5 K gas is outside the backend's table.
        let cold = ConservedState {
            amount: state.amount,
            enthalpy: state.enthalpy * (5.0 / 313.15),
        };
        let previous = sampled.point;
        let sampled = formulation.sample(&cold, Some(&previous)).unwrap();
        assert_eq!(sampled.point.status, PointStatus::FrozenOnFailure);
        assert_eq!(sampled.point.temperature, previous.temperature);
        assert!(matches!(
            sampled.diagnostic,
            Some(Diagnostic::FrozenOnFailure { .. })
        ));
    }
}
