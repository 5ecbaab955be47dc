use uom::si::f64::{MassDensity, ThermodynamicTemperature};

/// The thermodynamic state of a single-phase fluid.
///
/// Temperature and density fix the state of a pure substance, so they are all
/// a [`State`] carries besides the fluid itself. Every other property
/// (pressure, enthalpy, `cp`, ...) is evaluated from it through the
/// capability traits of a property model.
///
/// # Example
///
/// ```
/// use twine_vessel::support::thermo::{State, fluid::Hydrogen};
/// use uom::si::{
///     f64::{MassDensity, ThermodynamicTemperature},
///     mass_density::kilogram_per_cubic_meter,
///     thermodynamic_temperature::kelvin,
/// };
///
/// let state = State::new(
///     ThermodynamicTemperature::new::<kelvin>(313.15),
///     MassDensity::new::<kilogram_per_cubic_meter>(5.1),
///     Hydrogen,
/// );
/// assert_eq!(state.fluid, Hydrogen);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State<Fluid> {
    pub temperature: ThermodynamicTemperature,
    pub density: MassDensity,
    pub fluid: Fluid,
}

impl<Fluid> State<Fluid> {
    /// Creates a new state with the given temperature, density, and fluid.
    #[must_use]
    pub fn new(temperature: ThermodynamicTemperature, density: MassDensity, fluid: Fluid) -> Self {
        Self {
            temperature,
            density,
            fluid,
        }
    }
}
