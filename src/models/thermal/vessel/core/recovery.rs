//! Recovery of `(T, P)` from the conserved holdup.
//!
//! The conserved formulation integrates `n` and `n·h`. Temperature and
//! pressure follow from a fixed-point iteration between the equation of state
//! and the property backend:
//!
//! ```text
//! P_k     = EOS(T_k, n, V)
//! T_{k+1} = T(h, P_k)
//! ```
//!
//! The iteration stops when `|T_{k+1} − T_k|` falls below the tolerance.

use uom::{
    ConstZero,
    si::{
        amount_of_substance::mole,
        f64::{
            AmountOfSubstance, Energy, MolarEnergy, Pressure, TemperatureInterval,
            ThermodynamicTemperature, Volume,
        },
        temperature_interval::kelvin as delta_kelvin,
    },
};

use crate::support::{
    thermo::eos::{EosError, EquationOfState},
    units::TemperatureDifference,
};

use super::{
    Diagnostic, PointStatus, PropertyQuery, VesselError, traits::VesselThermoModel,
};

/// What to do when recovery uses its whole iteration budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NonConvergencePolicy {
    /// Keep the last iterate and report [`Diagnostic::NotConverged`].
    #[default]
    Accept,

    /// Return [`VesselError::NonConvergence`].
    Fail,
}

/// Iteration controls for [`StateRecovery`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecoveryConfig {
    /// Maximum number of fixed-point iterations.
    pub max_iters: usize,

    /// Convergence threshold on the temperature update.
    pub tolerance: TemperatureInterval,

    /// Holdup at or below which the tank is treated as empty.
    pub floor: AmountOfSubstance,

    pub on_non_convergence: NonConvergencePolicy,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_iters: 20,
            tolerance: TemperatureInterval::new::<delta_kelvin>(1e-3),
            floor: AmountOfSubstance::new::<mole>(1e-6),
            on_non_convergence: NonConvergencePolicy::default(),
        }
    }
}

/// Outcome of a state recovery.
#[derive(Debug, Clone, PartialEq)]
pub enum Recovery {
    /// The temperature update fell below the tolerance.
    Converged {
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
        iters: usize,
    },

    /// A lookup failed; the last consistent `(T, P)` pair was kept.
    FrozenOnFailure {
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
        iters: usize,
        reason: String,
    },

    /// The iteration budget ran out; the last iterate was kept.
    Diverged {
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
        iters: usize,
        step: TemperatureInterval,
    },

    /// The holdup is at or below the floor.
    Empty {
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    },
}

impl Recovery {
    #[must_use]
    pub fn temperature(&self) -> ThermodynamicTemperature {
        match self {
            Self::Converged { temperature, .. }
            | Self::FrozenOnFailure { temperature, .. }
            | Self::Diverged { temperature, .. }
            | Self::Empty { temperature, .. } => *temperature,
        }
    }

    #[must_use]
    pub fn pressure(&self) -> Pressure {
        match self {
            Self::Converged { pressure, .. }
            | Self::FrozenOnFailure { pressure, .. }
            | Self::Diverged { pressure, .. }
            | Self::Empty { pressure, .. } => *pressure,
        }
    }

    #[must_use]
    pub fn status(&self) -> PointStatus {
        match self {
            Self::Converged { .. } => PointStatus::Converged,
            Self::FrozenOnFailure { .. } => PointStatus::FrozenOnFailure,
            Self::Diverged { .. } => PointStatus::NotConverged,
            Self::Empty { .. } => PointStatus::Empty,
        }
    }

    /// Returns the diagnostic this outcome raises, if any.
    #[must_use]
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        match self {
            Self::Converged { .. } | Self::Empty { .. } => None,
            Self::FrozenOnFailure {
                temperature,
                iters,
                reason,
                ..
            } => Some(Diagnostic::FrozenOnFailure {
                temperature: *temperature,
                iters: *iters,
                reason: reason.clone(),
            }),
            Self::Diverged {
                temperature,
                iters,
                step,
                ..
            } => Some(Diagnostic::NotConverged {
                temperature: *temperature,
                iters: *iters,
                step: *step,
            }),
        }
    }
}

/// Inverts `(n, n·h, V)` to `(T, P)`.
#[derive(Debug)]
pub struct StateRecovery<'a, Thermo, Fluid, Eos> {
    query: PropertyQuery<'a, Thermo, Fluid>,
    eos: &'a Eos,
    volume: Volume,
    ambient_temperature: ThermodynamicTemperature,
    config: &'a RecoveryConfig,
}

impl<'a, Thermo, Fluid, Eos> StateRecovery<'a, Thermo, Fluid, Eos>
where
    Thermo: VesselThermoModel<Fluid>,
    Fluid: Clone,
    Eos: EquationOfState,
{
    pub(super) fn new(
        query: PropertyQuery<'a, Thermo, Fluid>,
        eos: &'a Eos,
        volume: Volume,
        ambient_temperature: ThermodynamicTemperature,
        config: &'a RecoveryConfig,
    ) -> Self {
        Self {
            query,
            eos,
            volume,
            ambient_temperature,
            config,
        }
    }

    /// Recovers `(T, P)` for `amount` moles with total enthalpy `enthalpy`.
    ///
    /// The iteration starts from `seed`, or from ambient temperature when no
    /// seed is given. Backend failures, and equation-of-state rejections once
    /// a pressure is known, freeze the temperature at the last consistent
    /// iterate rather than failing.
    ///
    /// # Errors
    ///
    /// Returns [`VesselError::InvalidEos`] if the equation of state rejects
    /// the holdup before any pressure is known, and
    /// [`VesselError::NonConvergence`] if the budget runs out under
    /// [`NonConvergencePolicy::Fail`].
    pub fn recover(
        &self,
        amount: AmountOfSubstance,
        enthalpy: Energy,
        seed: Option<ThermodynamicTemperature>,
    ) -> Result<Recovery, VesselError> {
        if amount <= self.config.floor {
            return Ok(Recovery::Empty {
                temperature: self.ambient_temperature,
                pressure: Pressure::ZERO,
            });
        }

        let molar_enthalpy: MolarEnergy = enthalpy / amount;
        let mut guess = seed.unwrap_or(self.ambient_temperature);
        let mut last_consistent: Option<Pressure> = None;
        let mut step = TemperatureInterval::ZERO;

        for iter in 1..=self.config.max_iters {
            let pressure = match self.eos.pressure(guess, amount, self.volume) {
                Ok(pressure) => pressure,
                Err(error) => {
                    // Nothing to freeze to on the first pass.
                    let Some(pressure) = last_consistent else {
                        return Err(error.into());
                    };
                    return Ok(frozen(guess - step, pressure, iter, &error));
                }
            };

            let next = match self.query.temperature(molar_enthalpy, pressure) {
                Ok(next) => next,
                Err(error) => {
                    return Ok(Recovery::FrozenOnFailure {
                        temperature: guess,
                        pressure,
                        iters: iter,
                        reason: error.to_string(),
                    });
                }
            };

            step = next.minus(guess);
            guess = next;
            last_consistent = Some(pressure);

            if step.abs() < self.config.tolerance {
                return Ok(match self.eos.pressure(guess, amount, self.volume) {
                    Ok(pressure) => Recovery::Converged {
                        temperature: guess,
                        pressure,
                        iters: iter,
                    },
                    Err(error) => frozen(guess - step, pressure, iter, &error),
                });
            }
        }

        if self.config.on_non_convergence == NonConvergencePolicy::Fail {
            return Err(VesselError::NonConvergence {
                iters: self.config.max_iters,
                step,
            });
        }

        match (self.eos.pressure(guess, amount, self.volume), last_consistent) {
            (Ok(pressure), _) => Ok(Recovery::Diverged {
                temperature: guess,
                pressure,
                iters: self.config.max_iters,
                step,
            }),
            (Err(error), Some(pressure)) => Ok(frozen(
                guess - step,
                pressure,
                self.config.max_iters,
                &error,
            )),
            (Err(error), None) => Err(error.into()),
        }
    }
}

/// Keeps the last `(T, P)` pair the equation of state accepted.
fn frozen(
    temperature: ThermodynamicTemperature,
    pressure: Pressure,
    iters: usize,
    error: &EosError,
) -> Recovery {
    Recovery::FrozenOnFailure {
        temperature,
        pressure,
        iters,
        reason: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        pressure::{megapascal, pascal},
        thermodynamic_temperature::kelvin,
        volume::cubic_meter,
    };

    use crate::models::thermal::vessel::core::test_support::{BoundedGas, TestFluid, molar_mass};
    use crate::support::{
        thermo::{
            eos::{CriticalPoint, IdealGas, RedlichKwong},
            fluid::{Hydrogen, SpeciesConstants},
        },
        units::MolarVolume,
    };

    fn temp(value: f64) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<kelvin>(value)
    }

    /// Ideal gas that refuses temperatures above `ceiling` kelvin.
    struct CappedGas {
        ceiling: f64,
    }

    impl EquationOfState for CappedGas {
        fn pressure_at(
            &self,
            temperature: ThermodynamicTemperature,
            molar_volume: MolarVolume,
        ) -> Result<Pressure, EosError> {
            let headroom = self.ceiling - temperature.get::<kelvin>();
            if headroom <= 0.0 {
                return Err(EosError::NonPositive {
                    quantity: "temperature headroom",
                    value: headroom,
                });
            }
            IdealGas.pressure_at(temperature, molar_volume)
        }

        fn molar_volume(
            &self,
            temperature: ThermodynamicTemperature,
            pressure: Pressure,
        ) -> Result<MolarVolume, EosError> {
            IdealGas.molar_volume(temperature, pressure)
        }
    }

    /// Holdup `(n, n·h)` of a tank at `(T, P)` under `eos`.
    fn holdup(
        eos: &impl EquationOfState,
        query: &PropertyQuery<'_, BoundedGas, TestFluid>,
        volume: Volume,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    ) -> (AmountOfSubstance, Energy) {
        let v = eos.molar_volume(temperature, pressure).unwrap();
        let amount: AmountOfSubstance = volume / v;
        let h = query.molar_enthalpy(temperature, pressure).unwrap();
        (amount, amount * h)
    }

    #[test]
    fn round_trip_with_ideal_gas() {
        let thermo = BoundedGas::new();
        let query = PropertyQuery::new(&thermo, &TestFluid, molar_mass());
        let config = RecoveryConfig::default();
        let volume = Volume::new::<cubic_meter>(1.0);
        let recovery = StateRecovery::new(query, &IdealGas, volume, temp(298.15), &config);

        let (n, nh) = holdup(
            &IdealGas,
            &query,
            volume,
            temp(313.15),
            Pressure::new::<megapascal>(7.0),
        );
        let outcome = recovery.recover(n, nh, None).unwrap();

        assert!(matches!(outcome, Recovery::Converged { .. }));
        assert_relative_eq!(outcome.temperature().get::<kelvin>(), 313.15, epsilon = 1e-3);
        assert_relative_eq!(
            outcome.pressure().get::<megapascal>(),
            7.0,
            max_relative = 1e-5
        );
        assert!(outcome.diagnostic().is_none());
    }

    #[test]
    fn round_trip_with_redlich_kwong() {
        let thermo = BoundedGas::new();
        let query = PropertyQuery::new(&thermo, &TestFluid, molar_mass());
        let config = RecoveryConfig::default();
        let eos = RedlichKwong::new(Hydrogen::critical_point()).unwrap();
        let volume = Volume::new::<cubic_meter>(14.3);
        let recovery = StateRecovery::new(query, &eos, volume, temp(298.15), &config);

        let (n, nh) = holdup(
            &eos,
            &query,
            volume,
            temp(313.15),
            Pressure::new::<megapascal>(7.0),
        );
        let outcome = recovery.recover(n, nh, Some(temp(300.0))).unwrap();

        assert_relative_eq!(outcome.temperature().get::<kelvin>(), 313.15, epsilon = 1e-3);
        assert_relative_eq!(
            outcome.pressure().get::<megapascal>(),
            7.0,
            max_relative = 1e-5
        );
    }

    #[test]
    fn empty_tank_short_circuits_to_ambient() {
        let thermo = BoundedGas::new();
        let query = PropertyQuery::new(&thermo, &TestFluid, molar_mass());
        let config = RecoveryConfig::default();
        let recovery = StateRecovery::new(
            query,
            &IdealGas,
            Volume::new::<cubic_meter>(1.0),
            temp(290.0),
            &config,
        );

        for amount in [1e-7, 0.0, -1.0] {
            let outcome = recovery
                .recover(
                    AmountOfSubstance::new::<mole>(amount),
                    Energy::ZERO,
                    Some(temp(350.0)),
                )
                .unwrap();
            assert_eq!(
                outcome,
                Recovery::Empty {
                    temperature: temp(290.0),
                    pressure: Pressure::ZERO,
                }
            );
            assert_eq!(outcome.status(), PointStatus::Empty);
        }
    }

    #[test]
    fn backend_failure_freezes_the_seed() {
        let thermo = BoundedGas::new();
        let query = PropertyQuery::new(&thermo, &TestFluid, molar_mass());
        let config = RecoveryConfig::default();
        let volume = Volume::new::<cubic_meter>(1.0);
        let recovery = StateRecovery::new(query, &IdealGas, volume, temp(298.15), &config);

        // Enthalpy of a 10 K gas lies below the backend's table.
        let n = AmountOfSubstance::new::<mole>(10.0);
        let h = thermo.cp() * molar_mass() * TemperatureInterval::new::<delta_kelvin>(10.0);
        let outcome = recovery.recover(n, n * h, Some(temp(250.0))).unwrap();

        let Recovery::FrozenOnFailure {
            temperature,
            pressure,
            iters,
            ..
        } = &outcome
        else {
            panic!("expected a frozen recovery, got {outcome:?}");
        };
        assert_relative_eq!(temperature.get::<kelvin>(), 250.0);
        assert_eq!(*iters, 1);
        let expected = IdealGas.pressure(temp(250.0), n, volume).unwrap();
        assert_relative_eq!(pressure.get::<pascal>(), expected.get::<pascal>());
        assert!(matches!(
            outcome.diagnostic(),
            Some(Diagnostic::FrozenOnFailure { .. })
        ));
    }

    #[test]
    fn exhausted_budget_follows_policy() {
        let thermo = BoundedGas::new();
        let query = PropertyQuery::new(&thermo, &TestFluid, molar_mass());
        let volume = Volume::new::<cubic_meter>(1.0);
        let (n, nh) = holdup(
            &IdealGas,
            &query,
            volume,
            temp(300.0),
            Pressure::new::<megapascal>(1.0),
        );

        let accept = RecoveryConfig {
            max_iters: 1,
            ..RecoveryConfig::default()
        };
        let recovery = StateRecovery::new(query, &IdealGas, volume, temp(250.0), &accept);
        let outcome = recovery.recover(n, nh, None).unwrap();
        let Recovery::Diverged { temperature, step, .. } = outcome else {
            panic!("expected divergence, got {outcome:?}");
        };
        assert_relative_eq!(temperature.get::<kelvin>(), 300.0, epsilon = 1e-9);
        assert_relative_eq!(step.get::<delta_kelvin>(), 50.0, epsilon = 1e-9);

        let fail = RecoveryConfig {
            on_non_convergence: NonConvergencePolicy::Fail,
            ..accept
        };
        let recovery = StateRecovery::new(query, &IdealGas, volume, temp(250.0), &fail);
        assert!(matches!(
            recovery.recover(n, nh, None),
            Err(VesselError::NonConvergence { iters: 1, .. })
        ));
    }

    #[test]
    fn co_volume_holdup_is_an_eos_error() {
        let thermo = BoundedGas::new();
        let query = PropertyQuery::new(&thermo, &TestFluid, molar_mass());
        let config = RecoveryConfig::default();
        let eos = RedlichKwong::new(CriticalPoint {
            temperature: temp(33.19),
            pressure: Pressure::new::<megapascal>(1.296),
        })
        .unwrap();
        let volume = Volume::new::<cubic_meter>(1.0e-3);
        let recovery = StateRecovery::new(query, &eos, volume, temp(300.0), &config);

        // Far more moles than fit above the co-volume.
        let n = AmountOfSubstance::new::<mole>(1.0e3);
        let result = recovery.recover(n, Energy::ZERO, None);
        assert!(matches!(result, Err(VesselError::InvalidEos(_))));
    }

    #[test]
    fn rejected_final_iterate_keeps_the_last_consistent_pair() {
        let thermo = BoundedGas::new();
        let query = PropertyQuery::new(&thermo, &TestFluid, molar_mass());
        let volume = Volume::new::<cubic_meter>(1.0);
        let (n, nh) = holdup(
            &IdealGas,
            &query,
            volume,
            temp(300.0),
            Pressure::new::<megapascal>(1.0),
        );
        let eos = CappedGas { ceiling: 280.0 };
        let config = RecoveryConfig {
            max_iters: 1,
            ..RecoveryConfig::default()
        };
        let recovery = StateRecovery::new(query, &eos, volume, temp(250.0), &config);

        let outcome = recovery.recover(n, nh, None).unwrap();

        let Recovery::FrozenOnFailure {
            temperature,
            pressure,
            iters,
            reason,
        } = &outcome
        else {
            panic!("expected a frozen recovery, got {outcome:?}");
        };
        assert_relative_eq!(temperature.get::<kelvin>(), 250.0, epsilon = 1e-9);
        assert_eq!(*iters, 1);
        let expected = IdealGas.pressure(temp(250.0), n, volume).unwrap();
        assert_relative_eq!(pressure.get::<pascal>(), expected.get::<pascal>());
        assert!(reason.contains("temperature headroom"));
        assert_eq!(outcome.status(), PointStatus::FrozenOnFailure);
    }
}
