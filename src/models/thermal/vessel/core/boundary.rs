//! Boundary conditions: ambient exchange and inlet/outlet flows.

use std::{fmt, sync::Arc};

use uom::{
    ConstZero,
    si::f64::{
        Area, HeatTransfer, MassRate, MolarEnergy, Power, Pressure, ThermodynamicTemperature,
        Time,
    },
};

use crate::support::{
    constraint::{Constrained, NonNegative},
    units::{SpecificEnthalpy, TemperatureDifference},
};

use super::VesselError;

/// Temperature and pressure of the supply feeding the tank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InletConditions {
    pub temperature: ThermodynamicTemperature,
    pub pressure: Pressure,
}

/// Inlet conditions with the stream enthalpy evaluated once at setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InletStream {
    pub temperature: ThermodynamicTemperature,
    pub pressure: Pressure,
    pub enthalpy: SpecificEnthalpy,
    pub molar_enthalpy: MolarEnergy,
}

/// Mass flow rate as a function of time.
///
/// Rates are never negative: a schedule describes flow through one port in
/// its own direction.
#[derive(Clone)]
pub struct FlowSchedule(Schedule);

#[derive(Clone)]
enum Schedule {
    Constant(MassRate),
    Piecewise(Vec<(Time, MassRate)>),
    Function(Arc<dyn Fn(Time) -> MassRate + Send + Sync>),
}

impl FlowSchedule {
    /// No flow.
    #[must_use]
    pub fn none() -> Self {
        Self(Schedule::Constant(MassRate::ZERO))
    }

    /// A constant rate.
    ///
    /// # Errors
    ///
    /// Returns [`VesselError::Constraint`] if the rate is negative or `NaN`.
    pub fn constant(rate: MassRate) -> Result<Self, VesselError> {
        let rate: Constrained<MassRate, NonNegative> =
            NonNegative::new(rate).map_err(VesselError::constraint("flow rate"))?;
        Ok(Self(Schedule::Constant(rate.into_inner())))
    }

    /// A piecewise-constant rate.
    ///
    /// Each `(start, rate)` breakpoint holds from `start` until the next
    /// breakpoint; the rate is zero before the first one.
    ///
    /// # Errors
    ///
    /// Returns [`VesselError::InvalidInput`] if there are no breakpoints or
    /// their times are not strictly increasing, and
    /// [`VesselError::Constraint`] if any rate is negative.
    pub fn piecewise(
        breakpoints: impl IntoIterator<Item = (Time, MassRate)>,
    ) -> Result<Self, VesselError> {
        let breakpoints: Vec<_> = breakpoints.into_iter().collect();

        if breakpoints.is_empty() {
            return Err(VesselError::InvalidInput {
                context: "flow schedule",
                reason: "needs at least one breakpoint",
            });
        }
        if breakpoints.windows(2).any(|pair| pair[0].0 >= pair[1].0) {
            return Err(VesselError::InvalidInput {
                context: "flow schedule",
                reason: "breakpoint times must be strictly increasing",
            });
        }
        for &(_, rate) in &breakpoints {
            NonNegative::new(rate).map_err(VesselError::constraint("flow rate"))?;
        }

        Ok(Self(Schedule::Piecewise(breakpoints)))
    }

    /// An arbitrary rate function.
    ///
    /// Negative or `NaN` values returned by `rate` are treated as zero.
    pub fn from_fn(rate: impl Fn(Time) -> MassRate + Send + Sync + 'static) -> Self {
        Self(Schedule::Function(Arc::new(rate)))
    }

    /// Returns the rate at `time`.
    #[must_use]
    pub fn rate(&self, time: Time) -> MassRate {
        match &self.0 {
            Schedule::Constant(rate) => *rate,
            Schedule::Piecewise(breakpoints) => breakpoints
                .iter()
                .take_while(|(start, _)| *start <= time)
                .last()
                .map_or(MassRate::ZERO, |&(_, rate)| rate),
            Schedule::Function(rate) => {
                let rate = rate(time);
                if rate > MassRate::ZERO {
                    rate
                } else {
                    MassRate::ZERO
                }
            }
        }
    }
}

impl fmt::Debug for FlowSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Schedule::Constant(rate) => f.debug_tuple("Constant").field(rate).finish(),
            Schedule::Piecewise(breakpoints) => {
                f.debug_tuple("Piecewise").field(breakpoints).finish()
            }
            Schedule::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Inlet and outlet mass flow rates at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flows {
    pub inlet: MassRate,
    pub outlet: MassRate,
}

/// Everything outside the tank that drives its balances.
#[derive(Debug, Clone)]
pub struct BoundaryConditions {
    pub(super) ambient_temperature: ThermodynamicTemperature,
    pub(super) heat_transfer: HeatTransfer,
    pub(super) inlet: InletStream,
    pub(super) inlet_flow: FlowSchedule,
    pub(super) outlet_flow: FlowSchedule,
}

impl BoundaryConditions {
    #[must_use]
    pub fn ambient_temperature(&self) -> ThermodynamicTemperature {
        self.ambient_temperature
    }

    #[must_use]
    pub fn inlet(&self) -> &InletStream {
        &self.inlet
    }

    /// Returns the inlet and outlet rates at `time`.
    #[must_use]
    pub fn flows(&self, time: Time) -> Flows {
        Flows {
            inlet: self.inlet_flow.rate(time),
            outlet: self.outlet_flow.rate(time),
        }
    }

    /// Returns the wall heat loss `Q = U·A·(T − T_amb)`.
    ///
    /// Positive when the tank is warmer than ambient.
    #[must_use]
    pub fn heat_loss(&self, area: Area, temperature: ThermodynamicTemperature) -> Power {
        self.heat_transfer * area * temperature.minus(self.ambient_temperature)
    }
}
