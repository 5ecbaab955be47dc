#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Twine Vessel
//!
//! Transient models of a closed pressure vessel holding a single real gas,
//! built on [Twine](https://github.com/isentropic-dev/twine).
//!
//! ## Crate layout
//!
//! - [`models`]: The lumped vessel model, its balance formulations, and the
//!   simulator that drives an integrator over them.
//! - [`support`]: Units, numeric constraints, equations of state, and
//!   thermodynamic property models used by the vessel model.
//!
//! ## Quick start
//!
//! ```
//! use twine_vessel::models::thermal::vessel::{
//!     Conserved, ElongatedSphere, EulerIntegrator, FlowSchedule, InitialCondition,
//!     InletConditions, RecoveryConfig, Sampling, StallPolicy, TankGeometry, TankSimulator,
//!     Vessel, VesselConfig,
//! };
//! use twine_vessel::support::thermo::{
//!     eos::IdealGas,
//!     fluid::{Hydrogen, SpeciesConstants},
//!     model::PerfectGas,
//! };
//! use uom::si::{
//!     f64::{HeatTransfer, MassRate, Pressure, ThermodynamicTemperature, Time, Volume},
//!     heat_transfer::watt_per_square_meter_kelvin,
//!     mass_rate::kilogram_per_second,
//!     pressure::megapascal,
//!     thermodynamic_temperature::kelvin,
//!     time::second,
//!     volume::cubic_meter,
//! };
//!
//! let config = VesselConfig {
//!     geometry: TankGeometry::new(Volume::new::<cubic_meter>(1.0), &ElongatedSphere).unwrap(),
//!     ambient_temperature: ThermodynamicTemperature::new::<kelvin>(298.15),
//!     heat_transfer: HeatTransfer::new::<watt_per_square_meter_kelvin>(5.0),
//!     inlet: InletConditions {
//!         temperature: ThermodynamicTemperature::new::<kelvin>(293.15),
//!         pressure: Pressure::new::<megapascal>(0.1),
//!     },
//!     inlet_flow: FlowSchedule::none(),
//!     outlet_flow: FlowSchedule::constant(MassRate::new::<kilogram_per_second>(0.001)).unwrap(),
//!     recovery: RecoveryConfig::default(),
//!     stall_policy: StallPolicy::default(),
//! };
//!
//! let vessel = Vessel::new(
//!     config,
//!     PerfectGas::<Hydrogen>::new().unwrap(),
//!     Hydrogen,
//!     Hydrogen::molar_mass(),
//!     IdealGas,
//! )
//! .unwrap();
//!
//! let simulator = TankSimulator::new(Conserved::new(&vessel), EulerIntegrator::default());
//! let sampling = Sampling::uniform(
//!     Time::new::<second>(0.0),
//!     Time::new::<second>(60.0),
//!     7,
//! )
//! .unwrap();
//!
//! let trajectory = simulator
//!     .run(
//!         InitialCondition::TemperaturePressure {
//!             temperature: ThermodynamicTemperature::new::<kelvin>(313.15),
//!             pressure: Pressure::new::<megapascal>(7.0),
//!         },
//!         &sampling,
//!     )
//!     .unwrap();
//!
//! assert_eq!(trajectory.samples().len(), 7);
//! ```

pub mod models;
pub mod support;
