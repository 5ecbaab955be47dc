use std::convert::Infallible;

use twine_core::{EquationProblem, Model};
use twine_solvers::equation::bisection;
use uom::si::{
    f64::{Pressure, ThermodynamicTemperature},
    pressure::pascal,
    thermodynamic_temperature::kelvin,
};

use crate::support::thermo::fluid::SpeciesConstants;
use crate::support::units::{MolarVolume, si_quantity};

use super::{EosError, EquationOfState, GAS_CONSTANT, ensure_positive, ensure_positive_tp};

/// Critical temperature and pressure of a pure species.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalPoint {
    pub temperature: ThermodynamicTemperature,
    pub pressure: Pressure,
}

/// Redlich–Kwong cubic equation of state.
///
/// ```text
/// P = R·T/(v − b) − a/(√T·v·(v + b))
/// a = 0.42748·R²·Tc^2.5/Pc
/// b = 0.08664·R·Tc/Pc
/// ```
///
/// The coefficients are fixed when the equation is built from a
/// [`CriticalPoint`]. Molar volumes at or below the co-volume `b` are
/// rejected with [`EosError::CoVolume`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RedlichKwong {
    a: f64,
    b: f64,
}

impl RedlichKwong {
    /// Builds the equation from a species' critical point.
    ///
    /// # Errors
    ///
    /// Returns [`EosError::NonPositive`] if the critical temperature or
    /// pressure is not strictly positive.
    pub fn new(critical: CriticalPoint) -> Result<Self, EosError> {
        let tc = critical.temperature.get::<kelvin>();
        let pc = critical.pressure.get::<pascal>();
        ensure_positive("critical temperature", tc)?;
        ensure_positive("critical pressure", pc)?;

        Ok(Self {
            a: 0.427_48 * GAS_CONSTANT.powi(2) * tc.powf(2.5) / pc,
            b: 0.086_64 * GAS_CONSTANT * tc / pc,
        })
    }

    /// Builds the equation from the critical point of species `S`.
    ///
    /// # Errors
    ///
    /// Returns [`EosError::NonPositive`] if the species constants are invalid.
    pub fn for_species<S: SpeciesConstants>() -> Result<Self, EosError> {
        Self::new(S::critical_point())
    }

    /// Returns the co-volume `b`.
    #[must_use]
    pub fn co_volume(&self) -> MolarVolume {
        si_quantity(self.b)
    }

    /// Evaluates the equation in SI units, assuming `t > 0` and `v > b`.
    fn pressure_si(&self, t: f64, v: f64) -> f64 {
        GAS_CONSTANT * t / (v - self.b) - self.a / (t.sqrt() * v * (v + self.b))
    }
}

impl EquationOfState for RedlichKwong {
    fn pressure_at(
        &self,
        temperature: ThermodynamicTemperature,
        molar_volume: MolarVolume,
    ) -> Result<Pressure, EosError> {
        let t = temperature.get::<kelvin>();
        let v = molar_volume.value;
        ensure_positive("temperature", t)?;
        ensure_positive("molar volume", v)?;

        if v <= self.b {
            return Err(EosError::CoVolume {
                molar_volume,
                co_volume: self.co_volume(),
            });
        }

        Ok(Pressure::new::<pascal>(self.pressure_si(t, v)))
    }

    /// Finds `v` on `(b, b + R·T/P]` by bisection.
    ///
    /// The attractive term is non-negative, so `P(b + R·T/P) <= P` and the
    /// bracket always holds a root.
    fn molar_volume(
        &self,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    ) -> Result<MolarVolume, EosError> {
        ensure_positive_tp(temperature, pressure)?;

        let no_root = || EosError::NoRoot {
            temperature,
            pressure,
        };

        let t = temperature.get::<kelvin>();
        let p = pressure.get::<pascal>();
        let bracket = [
            self.b * (1.0 + 1e-9),
            self.b + GAS_CONSTANT * t / p,
        ];

        let model = Isotherm {
            eos: self,
            temperature,
        };
        let problem = TargetPressure { pressure };

        let solution = bisection::solve(
            &model,
            &problem,
            bracket,
            &bisection_config(),
            |event: &bisection::Event<'_, _, _>| {
                // Volumes at the co-volume sit on the repulsive singularity.
                if event.result().is_err() {
                    return Some(bisection::Action::assume_positive());
                }
                None
            },
        )
        .map_err(|_| no_root())?;

        if solution.status != bisection::Status::Converged {
            return Err(no_root());
        }

        Ok(solution.snapshot.input)
    }
}

fn bisection_config() -> bisection::Config {
    bisection::Config {
        max_iters: 200,
        x_abs_tol: 1e-16,
        x_rel_tol: 1e-12,
        residual_tol: 1e-12,
    }
}

/// Pressure along an isotherm as a function of molar volume.
struct Isotherm<'a> {
    eos: &'a RedlichKwong,
    temperature: ThermodynamicTemperature,
}

impl Model for Isotherm<'_> {
    type Input = MolarVolume;
    type Output = Pressure;
    type Error = EosError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.eos.pressure_at(self.temperature, *input)
    }
}

/// Residual `P(v)/P_target − 1`.
struct TargetPressure {
    pressure: Pressure,
}

impl EquationProblem<1> for TargetPressure {
    type Input = MolarVolume;
    type Output = Pressure;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(si_quantity(x[0]))
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([(*output / self.pressure).value - 1.0])
    }
}
