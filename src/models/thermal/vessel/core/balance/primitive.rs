use uom::si::f64::{Pressure, ThermodynamicTemperature, Time};

use crate::models::thermal::vessel::core::{
    Diagnostic, PrimitiveRate, PrimitiveState, Vessel, VesselError, traits::VesselThermoModel,
};
use crate::support::{thermo::eos::EquationOfState, units::si_quantity};

use super::{Evaluation, Formulation, PointStatus, Sampled, StallPolicy, TankPoint};

/// Relative threshold below which the balance matrix counts as singular.
const SINGULAR_RATIO: f64 = 1e-12;

/// Balances on the primitive state `(T, P)`.
///
/// Expanding `d(ρV)/dt` and `d(ρVh − PV)/dt` with the property derivatives
/// gives a 2×2 linear system on a mass basis:
///
/// ```text
/// | V·∂ρ/∂T    V·∂ρ/∂P       | |dT/dt|   | ṁ_in − ṁ_out               |
/// | ρ·V·cp     ρ·V·∂h/∂P − V | |dP/dt| = | ṁ_in·(h_in − h) − U·A·ΔT   |
/// ```
///
/// The system is solved with Cramer's rule. When the backend rejects the
/// state or the matrix is singular, [`StallPolicy`] decides between a zero
/// rate with a diagnostic and an error.
#[derive(Debug)]
pub struct Primitive<'v, Thermo, Fluid, Eos> {
    vessel: &'v Vessel<Thermo, Fluid, Eos>,
}

impl<Thermo, Fluid, Eos> Clone for Primitive<'_, Thermo, Fluid, Eos> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Thermo, Fluid, Eos> Copy for Primitive<'_, Thermo, Fluid, Eos> {}

impl<'v, Thermo, Fluid, Eos> Primitive<'v, Thermo, Fluid, Eos> {
    #[must_use]
    pub fn new(vessel: &'v Vessel<Thermo, Fluid, Eos>) -> Self {
        Self { vessel }
    }
}

impl<Thermo, Fluid, Eos> Primitive<'_, Thermo, Fluid, Eos>
where
    Thermo: VesselThermoModel<Fluid>,
    Fluid: Clone,
    Eos: EquationOfState,
{
    fn solve(&self, time: Time, state: &PrimitiveState) -> Result<PrimitiveRate, VesselError> {
        let (point, partials) = self
            .vessel
            .query()
            .point_and_partials(state.temperature, state.pressure)?;

        let boundary = self.vessel.boundary();
        let flows = boundary.flows(time);
        let heat_loss = boundary
            .heat_loss(self.vessel.geometry().area(), state.temperature)
            .value;

        let v = self.vessel.geometry().volume().value;
        let rho = point.density.value;
        let m_in = flows.inlet.value;
        let m_out = flows.outlet.value;

        let a11 = v * partials.density_temperature.value;
        let a12 = v * partials.density_pressure.value;
        let a21 = rho * v * point.cp.value;
        let a22 = rho * v * partials.enthalpy_pressure.value - v;
        let b1 = m_in - m_out;
        let b2 = m_in * (boundary.inlet().enthalpy.value - point.enthalpy.value) - heat_loss;

        let determinant = a11 * a22 - a12 * a21;
        let scale = (a11 * a22).abs() + (a12 * a21).abs();
        if !determinant.is_finite() || determinant.abs() <= SINGULAR_RATIO * scale {
            return Err(VesselError::SingularSystem { determinant });
        }

        Ok(PrimitiveRate {
            temperature: si_quantity((b1 * a22 - a12 * b2) / determinant),
            pressure: si_quantity((a11 * b2 - a21 * b1) / determinant),
        })
    }
}

impl<Thermo, Fluid, Eos> Formulation for Primitive<'_, Thermo, Fluid, Eos>
where
    Thermo: VesselThermoModel<Fluid>,
    Fluid: Clone,
    Eos: EquationOfState,
{
    type State = PrimitiveState;
    type Rate = PrimitiveRate;

    /// Checks that the backend accepts `(T, P)` and returns it as the state.
    fn initial_state(
        &self,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    ) -> Result<PrimitiveState, VesselError> {
        self.vessel.query().point(temperature, pressure)?;
        Ok(PrimitiveState {
            temperature,
            pressure,
        })
    }

    fn derivative(
        &self,
        time: Time,
        state: &PrimitiveState,
        _seed: Option<ThermodynamicTemperature>,
    ) -> Result<Evaluation<PrimitiveRate>, VesselError> {
        let (rate, diagnostic) = match self.solve(time, state) {
            Ok(rate) => (rate, None),
            Err(error) => {
                if self.vessel.stall_policy() == StallPolicy::Fail {
                    return Err(error);
                }
                let diagnostic = match &error {
                    VesselError::SingularSystem { determinant } => Diagnostic::SingularSystem {
                        determinant: *determinant,
                    },
                    VesselError::PropertyLookup { .. } => Diagnostic::PropertyLookup {
                        reason: error.to_string(),
                    },
                    _ => return Err(error),
                };
                let frozen = PrimitiveRate {
                    temperature: si_quantity(0.0),
                    pressure: si_quantity(0.0),
                };
                (frozen, Some(diagnostic))
            }
        };

        Ok(Evaluation {
            rate,
            temperature: state.temperature,
            diagnostic,
        })
    }

    /// Reports the holdup from the backend density.
    ///
    /// If the density lookup fails, the previous sample's holdup is reused
    /// and marked [`PointStatus::Stale`].
    fn sample(
        &self,
        state: &PrimitiveState,
        previous: Option<&TankPoint>,
    ) -> Result<Sampled, VesselError> {
        let molar_mass = self.vessel.molar_mass();
        let volume = self.vessel.geometry().volume();

        match self
            .vessel
            .query()
            .density(state.temperature, state.pressure)
        {
            Ok(density) => {
                let mass = density * volume;
                Ok(Sampled {
                    point: TankPoint {
                        temperature: state.temperature,
                        pressure: state.pressure,
                        amount: mass / molar_mass,
                        mass,
                        status: PointStatus::Exact,
                    },
                    diagnostic: None,
                })
            }
            Err(error) => match (previous, self.vessel.stall_policy()) {
                (Some(previous), StallPolicy::Freeze) => Ok(Sampled {
                    point: TankPoint {
                        temperature: state.temperature,
                        pressure: state.pressure,
                        amount: previous.amount,
                        mass: previous.mass,
                        status: PointStatus::Stale,
                    },
                    diagnostic: Some(Diagnostic::PropertyLookup {
                        reason: error.to_string(),
                    }),
                }),
                _ => Err(error),
            },
        }
    }
}
