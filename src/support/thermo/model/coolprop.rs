//! CoolProp-backed fluid property model.
//!
//! Wraps a single `CoolProp` `AbstractState` behind a mutex. Every property
//! call updates the state from its inputs and reads the outputs while holding
//! the lock, so update/query pairs never interleave.
//!
//! The partial derivatives the vessel's `(T, P)` balance needs are taken by
//! central differences over `(P, T)` updates with a relative step of
//! [`DIFFERENCE_STEP`].

mod error;

use std::{marker::PhantomData, sync::Mutex};

use rfluids::{
    io::{FluidInputPair, FluidParam, FluidTrivialParam},
    native::AbstractState,
};
use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{MassDensity, MolarMass, Pressure, SpecificHeatCapacity, ThermodynamicTemperature},
    mass_density::kilogram_per_cubic_meter,
    molar_mass::kilogram_per_mole,
    pressure::pascal,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::support::thermo::{
    PropertyError, State,
    capability::{
        HasCp, HasEnthalpy, HasPartialDerivatives, PartialDerivatives, StateFrom, ThermoModel,
    },
};
use crate::support::units::{SpecificEnthalpy, si_quantity};

pub use error::CoolPropError;

/// Relative perturbation used for finite-difference partial derivatives.
pub const DIFFERENCE_STEP: f64 = 1e-5;

/// Trait used to mark fluids as usable with the [`CoolProp`] model.
///
/// Implementors provide the backend and fluid identifiers needed to construct a
/// `CoolProp` `AbstractState`.
#[cfg_attr(docsrs, doc(cfg(feature = "coolprop")))]
pub trait CoolPropFluid: Default + Send + Sync + 'static {
    const BACKEND: &'static str;
    const NAME: &'static str;
}

/// A fluid property model backed by `CoolProp`.
#[cfg_attr(docsrs, doc(cfg(feature = "coolprop")))]
pub struct CoolProp<F: CoolPropFluid> {
    state: Mutex<AbstractState>,
    _f: PhantomData<F>,
}

impl<F: CoolPropFluid> ThermoModel for CoolProp<F> {
    type Fluid = F;
}

/// Input pairs the model updates from, with their labels for error context.
#[derive(Debug, Clone, Copy)]
enum Inputs {
    DensityTemperature,
    PressureTemperature,
    EnthalpyPressure,
}

impl Inputs {
    fn pair(self) -> FluidInputPair {
        match self {
            Inputs::DensityTemperature => FluidInputPair::DMassT,
            Inputs::PressureTemperature => FluidInputPair::PT,
            Inputs::EnthalpyPressure => FluidInputPair::HMassP,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Inputs::DensityTemperature => "(density, temperature)",
            Inputs::PressureTemperature => "(pressure, temperature)",
            Inputs::EnthalpyPressure => "(enthalpy, pressure)",
        }
    }
}

impl<F: CoolPropFluid> CoolProp<F> {
    /// Construct a new CoolProp-backed model instance.
    ///
    /// # Errors
    ///
    /// Returns [`CoolPropError`] if the underlying `AbstractState` cannot be
    /// created for the given `F::BACKEND` and `F::NAME`.
    pub fn new() -> Result<Self, CoolPropError> {
        let state = AbstractState::new(F::BACKEND, F::NAME)?;
        Ok(Self {
            state: Mutex::new(state),
            _f: PhantomData,
        })
    }

    /// Returns the molar mass of the fluid.
    ///
    /// # Errors
    ///
    /// Returns [`CoolPropError`] if the call fails.
    pub fn molar_mass(&self) -> Result<MolarMass, CoolPropError> {
        let abstract_state = self.state.lock()?;
        let molar_mass = abstract_state.keyed_output(FluidTrivialParam::MolarMass)?;
        Ok(MolarMass::new::<kilogram_per_mole>(molar_mass))
    }

    /// Updates the shared state from `inputs` and reads `outputs` under one lock.
    fn evaluate<const K: usize>(
        &self,
        inputs: Inputs,
        first: f64,
        second: f64,
        outputs: [FluidParam; K],
    ) -> Result<[f64; K], CoolPropError> {
        let mut abstract_state = self.state.lock()?;
        abstract_state
            .update(inputs.pair(), first, second)
            .map_err(|source| CoolPropError::Update {
                inputs: inputs.label(),
                source,
            })?;

        let mut values = [0.0; K];
        for (value, param) in values.iter_mut().zip(outputs) {
            *value = abstract_state.keyed_output(param)?;
        }
        Ok(values)
    }

    fn from_density_temperature<const K: usize>(
        &self,
        state: &State<F>,
        outputs: [FluidParam; K],
    ) -> Result<[f64; K], CoolPropError> {
        self.evaluate(
            Inputs::DensityTemperature,
            state.density.get::<kilogram_per_cubic_meter>(),
            state.temperature.get::<kelvin>(),
            outputs,
        )
    }

    fn from_pressure_temperature<const K: usize>(
        &self,
        pressure: f64,
        temperature: f64,
        outputs: [FluidParam; K],
    ) -> Result<[f64; K], CoolPropError> {
        self.evaluate(Inputs::PressureTemperature, pressure, temperature, outputs)
    }
}

impl<F: CoolPropFluid> HasEnthalpy for CoolProp<F> {
    fn enthalpy(&self, state: &State<Self::Fluid>) -> Result<SpecificEnthalpy, PropertyError> {
        let [h] = self.from_density_temperature(state, [FluidParam::HMass])?;
        Ok(SpecificEnthalpy::new::<joule_per_kilogram>(h))
    }
}

impl<F: CoolPropFluid> HasCp for CoolProp<F> {
    fn cp(&self, state: &State<Self::Fluid>) -> Result<SpecificHeatCapacity, PropertyError> {
        let [cp] = self.from_density_temperature(state, [FluidParam::CpMass])?;
        Ok(SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(cp))
    }
}

impl<F: CoolPropFluid> HasPartialDerivatives for CoolProp<F> {
    fn partial_derivatives(
        &self,
        state: &State<Self::Fluid>,
    ) -> Result<PartialDerivatives, PropertyError> {
        let t = state.temperature.get::<kelvin>();
        let [p] = self.from_density_temperature(state, [FluidParam::P])?;

        let dt = t * DIFFERENCE_STEP;
        let dp = p * DIFFERENCE_STEP;
        let outputs = || [FluidParam::DMass, FluidParam::HMass];

        let [rho_t_hi, _] = self.from_pressure_temperature(p, t + dt, outputs())?;
        let [rho_t_lo, _] = self.from_pressure_temperature(p, t - dt, outputs())?;
        let [rho_p_hi, h_p_hi] = self.from_pressure_temperature(p + dp, t, outputs())?;
        let [rho_p_lo, h_p_lo] = self.from_pressure_temperature(p - dp, t, outputs())?;

        Ok(PartialDerivatives {
            density_temperature: si_quantity((rho_t_hi - rho_t_lo) / (2.0 * dt)),
            density_pressure: si_quantity((rho_p_hi - rho_p_lo) / (2.0 * dp)),
            enthalpy_pressure: si_quantity((h_p_hi - h_p_lo) / (2.0 * dp)),
        })
    }
}

impl<F: CoolPropFluid> StateFrom<(F, ThermodynamicTemperature, MassDensity)> for CoolProp<F> {
    type Error = CoolPropError;

    fn state_from(
        &self,
        (fluid, temperature, density): (F, ThermodynamicTemperature, MassDensity),
    ) -> Result<State<F>, Self::Error> {
        let state = State::new(temperature, density, fluid);
        // Validates the state; CoolProp rejects densities outside its range.
        self.from_density_temperature(&state, [])?;
        Ok(state)
    }
}

impl<F: CoolPropFluid> StateFrom<(F, ThermodynamicTemperature, Pressure)> for CoolProp<F> {
    type Error = CoolPropError;

    fn state_from(
        &self,
        (fluid, temperature, pressure): (F, ThermodynamicTemperature, Pressure),
    ) -> Result<State<F>, Self::Error> {
        let [density] = self.from_pressure_temperature(
            pressure.get::<pascal>(),
            temperature.get::<kelvin>(),
            [FluidParam::DMass],
        )?;

        Ok(State::new(
            temperature,
            MassDensity::new::<kilogram_per_cubic_meter>(density),
            fluid,
        ))
    }
}

impl<F: CoolPropFluid> StateFrom<(F, Pressure, SpecificEnthalpy)> for CoolProp<F> {
    type Error = CoolPropError;

    fn state_from(
        &self,
        (fluid, pressure, enthalpy): (F, Pressure, SpecificEnthalpy),
    ) -> Result<State<F>, Self::Error> {
        let [temperature, density] = self.evaluate(
            Inputs::EnthalpyPressure,
            enthalpy.get::<joule_per_kilogram>(),
            pressure.get::<pascal>(),
            [FluidParam::T, FluidParam::DMass],
        )?;

        Ok(State::new(
            ThermodynamicTemperature::new::<kelvin>(temperature),
            MassDensity::new::<kilogram_per_cubic_meter>(density),
            fluid,
        ))
    }
}

// CoolProp<F> must be Send + Sync for any CoolPropFluid. rfluids serializes
// CoolProp FFI calls globally; the local mutex keeps update/query pairs atomic.
#[allow(dead_code)]
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn check<F: CoolPropFluid>() {
        assert_send_sync::<CoolProp<F>>();
    }
};
