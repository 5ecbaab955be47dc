//! Running a vessel through time.

use std::mem::discriminant;

use twine_core::Observer;
use uom::si::f64::{Pressure, ThermodynamicTemperature, Time};

use super::{
    Action, Event, TimedDiagnostic, VesselError,
    balance::{Formulation, TankPoint},
    integrate::{Integrator, Status},
};

/// Where a run starts.
#[derive(Debug, Clone, PartialEq)]
pub enum InitialCondition<S> {
    /// A tank filled at `(T, P)`; the state is derived through the property
    /// backend.
    TemperaturePressure {
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    },

    /// A state given directly.
    State(S),
}

/// Strictly increasing times at which the trajectory is reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Sampling {
    times: Vec<Time>,
}

impl Sampling {
    /// Evenly spaced times from `start` to `end`, both included.
    ///
    /// # Errors
    ///
    /// Returns [`VesselError::InvalidInput`] if fewer than two samples are
    /// requested or `end` does not come after `start`.
    pub fn uniform(start: Time, end: Time, samples: usize) -> Result<Self, VesselError> {
        if samples < 2 {
            return Err(VesselError::InvalidInput {
                context: "sampling",
                reason: "needs at least two samples",
            });
        }
        if !(start.is_finite() && end.is_finite()) || end <= start {
            return Err(VesselError::InvalidInput {
                context: "sampling",
                reason: "end must be finite and after start",
            });
        }

        #[allow(clippy::cast_precision_loss)]
        let intervals = (samples - 1) as f64;
        let spacing = (end - start) / intervals;
        let times = (0..samples)
            .map(|i| {
                if i == samples - 1 {
                    end
                } else {
                    #[allow(clippy::cast_precision_loss)]
                    let i = i as f64;
                    start + spacing * i
                }
            })
            .collect();

        Ok(Self { times })
    }

    /// Explicit evaluation times.
    ///
    /// # Errors
    ///
    /// Returns [`VesselError::InvalidInput`] if `times` is empty, contains a
    /// non-finite value, or is not strictly increasing.
    pub fn at(times: impl IntoIterator<Item = Time>) -> Result<Self, VesselError> {
        let times: Vec<_> = times.into_iter().collect();

        if times.is_empty() {
            return Err(VesselError::InvalidInput {
                context: "sampling",
                reason: "needs at least one time",
            });
        }
        if times.iter().any(|time| !time.is_finite()) {
            return Err(VesselError::InvalidInput {
                context: "sampling",
                reason: "times must be finite",
            });
        }
        if times.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(VesselError::InvalidInput {
                context: "sampling",
                reason: "times must be strictly increasing",
            });
        }

        Ok(Self { times })
    }

    #[must_use]
    pub fn times(&self) -> &[Time] {
        &self.times
    }
}

/// Inputs of a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig<S> {
    pub initial: InitialCondition<S>,
    pub sampling: Sampling,
}

/// The tank at one evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<S> {
    pub time: Time,
    pub state: S,
    pub point: TankPoint,
}

/// Samples produced by a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory<S> {
    samples: Vec<Sample<S>>,
    diagnostics: Vec<TimedDiagnostic>,
    status: Status,
}

impl<S> Trajectory<S> {
    /// Samples in time order.
    #[must_use]
    pub fn samples(&self) -> &[Sample<S>] {
        &self.samples
    }

    /// Diagnostics raised while integrating and sampling, in time order.
    #[must_use]
    pub fn diagnostics(&self) -> &[TimedDiagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn final_sample(&self) -> Option<&Sample<S>> {
        self.samples.last()
    }

    /// Iterates over the physical variables of each sample.
    pub fn points(&self) -> impl Iterator<Item = (Time, &TankPoint)> {
        self.samples.iter().map(|sample| (sample.time, &sample.point))
    }
}

/// Drives a [`Formulation`] with an [`Integrator`] and reports a [`Trajectory`].
///
/// # Example
///
/// ```
/// use twine_vessel::models::thermal::vessel::{
///     Conserved, ElongatedSphere, EulerIntegrator, FlowSchedule, InitialCondition,
///     InletConditions, RecoveryConfig, Sampling, StallPolicy, TankGeometry, TankSimulator,
///     Vessel, VesselConfig,
/// };
/// use twine_vessel::support::thermo::{
///     eos::IdealGas,
///     fluid::{Hydrogen, SpeciesConstants},
///     model::perfect_gas::PerfectGas,
/// };
/// use uom::si::{
///     f64::{HeatTransfer, MassRate, Pressure, ThermodynamicTemperature, Time, Volume},
///     heat_transfer::watt_per_square_meter_kelvin,
///     mass_rate::kilogram_per_second,
///     pressure::megapascal,
///     thermodynamic_temperature::kelvin,
///     time::second,
///     volume::cubic_meter,
/// };
///
/// let config = VesselConfig {
///     geometry: TankGeometry::new(Volume::new::<cubic_meter>(1.0), &ElongatedSphere).unwrap(),
///     ambient_temperature: ThermodynamicTemperature::new::<kelvin>(298.15),
///     heat_transfer: HeatTransfer::new::<watt_per_square_meter_kelvin>(5.0),
///     inlet: InletConditions {
///         temperature: ThermodynamicTemperature::new::<kelvin>(293.15),
///         pressure: Pressure::new::<megapascal>(10.0),
///     },
///     inlet_flow: FlowSchedule::none(),
///     outlet_flow: FlowSchedule::constant(MassRate::new::<kilogram_per_second>(0.001)).unwrap(),
///     recovery: RecoveryConfig::default(),
///     stall_policy: StallPolicy::default(),
/// };
/// let vessel = Vessel::new(
///     config,
///     PerfectGas::<Hydrogen>::new().unwrap(),
///     Hydrogen,
///     Hydrogen::molar_mass(),
///     IdealGas,
/// )
/// .unwrap();
///
/// let simulator = TankSimulator::new(Conserved::new(&vessel), EulerIntegrator::default());
/// let sampling =
///     Sampling::uniform(Time::new::<second>(0.0), Time::new::<second>(30.0), 4).unwrap();
/// let initial = InitialCondition::TemperaturePressure {
///     temperature: ThermodynamicTemperature::new::<kelvin>(313.15),
///     pressure: Pressure::new::<megapascal>(7.0),
/// };
///
/// let trajectory = simulator.run(initial, &sampling).unwrap();
/// let first = &trajectory.samples()[0].point;
/// let last = &trajectory.final_sample().unwrap().point;
/// assert!(last.pressure < first.pressure);
/// assert!(last.mass < first.mass);
/// ```
#[derive(Debug, Clone)]
pub struct TankSimulator<F, I> {
    formulation: F,
    integrator: I,
}

impl<F, I> TankSimulator<F, I>
where
    F: Formulation,
    I: Integrator,
{
    #[must_use]
    pub fn new(formulation: F, integrator: I) -> Self {
        Self {
            formulation,
            integrator,
        }
    }

    #[must_use]
    pub fn formulation(&self) -> &F {
        &self.formulation
    }

    /// Runs a [`SimulationConfig`].
    ///
    /// # Errors
    ///
    /// See [`TankSimulator::run_observed`].
    pub fn simulate(
        &self,
        config: SimulationConfig<F::State>,
    ) -> Result<Trajectory<F::State>, VesselError> {
        self.run(config.initial, &config.sampling)
    }

    /// Runs from `initial` over `sampling` without an observer.
    ///
    /// # Errors
    ///
    /// See [`TankSimulator::run_observed`].
    pub fn run(
        &self,
        initial: InitialCondition<F::State>,
        sampling: &Sampling,
    ) -> Result<Trajectory<F::State>, VesselError> {
        self.run_observed(initial, sampling, &mut ())
    }

    /// Runs from `initial` over `sampling`, reporting to `observer`.
    ///
    /// Each sample is post-processed to physical variables; conserved states
    /// are recovered with the previous sample's temperature as the seed. A
    /// diagnostic raised while sampling is dropped if the integrator already
    /// reported the same kind at that time.
    ///
    /// # Errors
    ///
    /// Returns [`VesselError::Integration`] if the integrator fails, or the
    /// error raised while building the initial state or sampling.
    pub fn run_observed<Obs>(
        &self,
        initial: InitialCondition<F::State>,
        sampling: &Sampling,
        observer: &mut Obs,
    ) -> Result<Trajectory<F::State>, VesselError>
    where
        Obs: Observer<Event<F::State>, Action>,
    {
        let initial = match initial {
            InitialCondition::TemperaturePressure {
                temperature,
                pressure,
            } => self.formulation.initial_state(temperature, pressure)?,
            InitialCondition::State(state) => state,
        };

        let integration =
            self.integrator
                .integrate(&self.formulation, initial, sampling.times(), observer)?;

        let mut diagnostics = integration.diagnostics;
        let stepped = diagnostics.len();
        let mut samples = Vec::with_capacity(integration.states.len());
        let mut previous: Option<TankPoint> = None;

        for (time, state) in integration.times.into_iter().zip(integration.states) {
            let sampled = self.formulation.sample(&state, previous.as_ref())?;
            if let Some(diagnostic) = sampled.diagnostic {
                // The integrator may already have reported this condition here.
                let reported = diagnostics[..stepped].iter().any(|seen| {
                    seen.time == time && discriminant(&seen.diagnostic) == discriminant(&diagnostic)
                });
                if !reported {
                    diagnostics.push(TimedDiagnostic { time, diagnostic });
                }
            }
            previous = Some(sampled.point);
            samples.push(Sample {
                time,
                state,
                point: sampled.point,
            });
        }
        diagnostics.sort_by(|a, b| a.time.value.total_cmp(&b.time.value));

        Ok(Trajectory {
            samples,
            diagnostics,
            status: integration.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        amount_of_substance::mole,
        energy::joule,
        f64::{AmountOfSubstance, Energy},
        pressure::megapascal,
        thermodynamic_temperature::kelvin,
        time::second,
    };

    use crate::models::thermal::vessel::core::{
        Conserved, ConservedState, Diagnostic, EulerIntegrator, PointStatus, Primitive,
        PrimitiveState, StallPolicy,
        test_support::{BoundedGas, config, molar_mass, vessel},
    };
    use crate::support::thermo::eos::IdealGas;

    fn seconds(value: f64) -> Time {
        Time::new::<second>(value)
    }

    #[test]
    fn uniform_sampling_includes_both_ends() {
        let sampling = Sampling::uniform(seconds(0.0), seconds(300.0), 7).unwrap();
        let times: Vec<f64> = sampling.times().iter().map(|t| t.get::<second>()).collect();
        assert_eq!(times, vec![0.0, 50.0, 100.0, 150.0, 200.0, 250.0, 300.0]);
    }

    #[test]
    fn invalid_sampling_is_rejected() {
        assert!(Sampling::uniform(seconds(0.0), seconds(10.0), 1).is_err());
        assert!(Sampling::uniform(seconds(10.0), seconds(10.0), 5).is_err());
        assert!(Sampling::at([]).is_err());
        assert!(Sampling::at([seconds(2.0), seconds(1.0)]).is_err());
        assert!(Sampling::at([seconds(0.0), seconds(f64::NAN)]).is_err());
        assert!(Sampling::at([seconds(0.0), seconds(0.5), seconds(3.0)]).is_ok());
    }

    #[test]
    fn closed_tank_holds_its_state() {
        let vessel = vessel(config(1.0, 0.0, 0.0), IdealGas);
        let simulator = TankSimulator::new(Conserved::new(&vessel), EulerIntegrator::default());
        let config = SimulationConfig {
            initial: InitialCondition::TemperaturePressure {
                temperature: ThermodynamicTemperature::new::<kelvin>(313.15),
                pressure: Pressure::new::<megapascal>(7.0),
            },
            sampling: Sampling::uniform(seconds(0.0), seconds(20.0), 5).unwrap(),
        };

        let trajectory = simulator.simulate(config).unwrap();

        assert_eq!(trajectory.status(), Status::Complete);
        assert_eq!(trajectory.samples().len(), 5);
        assert!(trajectory.diagnostics().is_empty());
        let first = trajectory.samples()[0].point;
        for (_, point) in trajectory.points() {
            assert_relative_eq!(point.temperature.get::<kelvin>(), 313.15, epsilon = 1e-6);
            assert_relative_eq!(point.pressure.get::<megapascal>(), 7.0, max_relative = 1e-9);
            assert_relative_eq!(point.amount.get::<mole>(), first.amount.get::<mole>());
            assert_eq!(point.status, PointStatus::Converged);
        }
    }

    #[test]
    fn explicit_state_skips_the_backend() {
        let vessel = vessel(config(1.0, 0.0, 0.0), IdealGas);
        let simulator = TankSimulator::new(Conserved::new(&vessel), EulerIntegrator::default());
        let state = ConservedState {
            amount: AmountOfSubstance::new::<mole>(0.0),
            enthalpy: Energy::new::<joule>(0.0),
        };

        let trajectory = simulator
            .run(
                InitialCondition::State(state),
                &Sampling::at([seconds(0.0), seconds(1.0)]).unwrap(),
            )
            .unwrap();

        let last = trajectory.final_sample().unwrap();
        assert_eq!(last.point.status, PointStatus::Empty);
        assert_eq!(last.state.amount, vessel.recovery_config().floor);
    }

    #[test]
    fn primitive_run_needs_a_resolvable_first_sample() {
        let vessel = vessel(config(1.0, 0.01, 5.0), IdealGas);
        let simulator = TankSimulator::new(Primitive::new(&vessel), EulerIntegrator::default());
        let initial = PrimitiveState {
            temperature: ThermodynamicTemperature::new::<kelvin>(5.0),
            pressure: Pressure::new::<megapascal>(1.0),
        };

        let result = simulator.run(
            InitialCondition::State(initial),
            &Sampling::at([seconds(0.0), seconds(1.0)]).unwrap(),
        );

        // Nothing to fall back on at the first sample.
        assert!(matches!(result, Err(VesselError::PropertyLookup { .. })));
    }

    #[test]
    fn failing_policy_surfaces_as_integration_error() {
        let mut config = config(1.0, 0.01, 5.0);
        config.stall_policy = StallPolicy::Fail;
        let vessel = vessel(config, IdealGas);
        let simulator = TankSimulator::new(Primitive::new(&vessel), EulerIntegrator::default());
        let initial = PrimitiveState {
            temperature: ThermodynamicTemperature::new::<kelvin>(5.0),
            pressure: Pressure::new::<megapascal>(1.0),
        };

        let result = simulator.run(
            InitialCondition::State(initial),
            &Sampling::at([seconds(0.0), seconds(1.0)]).unwrap(),
        );

        let Err(VesselError::Integration(failure)) = result else {
            panic!("expected an integration failure, got {result:?}");
        };
        assert!(failure.message.contains("model error"));
    }

    #[test]
    fn frozen_samples_are_reported_once_per_time() {
        let vessel = vessel(config(1.0, 0.0, 0.0), IdealGas);
        let simulator = TankSimulator::new(Conserved::new(&vessel), EulerIntegrator::default());

        // Enthalpy of a 10 K gas lies below the backend's table, so every
        // recovery freezes at the ambient seed.
        let amount = AmountOfSubstance::new::<mole>(10.0);
        let molar_enthalpy = BoundedGas::new().cp().value * molar_mass().value * 10.0;
        let state = ConservedState {
            amount,
            enthalpy: Energy::new::<joule>(10.0 * molar_enthalpy),
        };

        let trajectory = simulator
            .run(
                InitialCondition::State(state),
                &Sampling::at([seconds(0.0), seconds(2.0)]).unwrap(),
            )
            .unwrap();

        for (_, point) in trajectory.points() {
            assert_eq!(point.status, PointStatus::FrozenOnFailure);
        }
        let times: Vec<f64> = trajectory
            .diagnostics()
            .iter()
            .map(|d| d.time.get::<second>())
            .collect();
        assert_eq!(times, vec![0.0, 1.0, 2.0]);
        assert!(
            trajectory
                .diagnostics()
                .iter()
                .all(|d| matches!(d.diagnostic, Diagnostic::FrozenOnFailure { .. }))
        );
    }
}
