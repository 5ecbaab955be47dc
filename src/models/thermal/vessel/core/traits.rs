//! Internal traits for vessel models.

use uom::si::f64::{Pressure, ThermodynamicTemperature};

use crate::support::{
    thermo::capability::{HasCp, HasEnthalpy, HasPartialDerivatives, StateFrom, ThermoModel},
    units::SpecificEnthalpy,
};

/// Required thermo model bounds for vessel models.
#[doc(hidden)]
pub trait VesselThermoModel<Fluid>:
    ThermoModel<Fluid = Fluid>
    + HasEnthalpy
    + HasCp
    + HasPartialDerivatives
    + StateFrom<(Fluid, ThermodynamicTemperature, Pressure)>
    + StateFrom<(Fluid, Pressure, SpecificEnthalpy)>
{
}

impl<Fluid, T> VesselThermoModel<Fluid> for T where
    T: ThermoModel<Fluid = Fluid>
        + HasEnthalpy
        + HasCp
        + HasPartialDerivatives
        + StateFrom<(Fluid, ThermodynamicTemperature, Pressure)>
        + StateFrom<(Fluid, Pressure, SpecificEnthalpy)>
{
}
