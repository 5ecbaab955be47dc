/// Base trait for thermodynamic property models.
///
/// Names the fluid type a model understands. Every capability trait builds
/// on it so that states and models can't be mixed across fluids.
pub trait ThermoModel {
    type Fluid;
}
