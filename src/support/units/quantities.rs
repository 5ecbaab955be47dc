use uom::{
    si::{ISQ, Quantity, SI},
    typenum::{N1, N2, N3, P1, P2, P3, Z0},
};

/// Specific gas constant, J/kg·K in SI.
pub type SpecificGasConstant = Quantity<ISQ<P2, Z0, N2, Z0, N1, Z0, Z0>, SI<f64>, f64>;

/// Specific enthalpy, J/kg in SI.
pub type SpecificEnthalpy = Quantity<ISQ<P2, Z0, N2, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Molar volume, m³/mol in SI.
pub type MolarVolume = Quantity<ISQ<P3, Z0, Z0, Z0, Z0, N1, Z0>, SI<f64>, f64>;

/// Rate of change of temperature, K/s in SI.
pub type TemperatureRate = Quantity<ISQ<Z0, Z0, N1, Z0, P1, Z0, Z0>, SI<f64>, f64>;

/// Rate of change of pressure, Pa/s in SI.
pub type PressureRate = Quantity<ISQ<N1, P1, N3, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Rate of change of amount of substance, mol/s in SI.
pub type AmountRate = Quantity<ISQ<Z0, Z0, N1, Z0, Z0, P1, Z0>, SI<f64>, f64>;

/// Isobaric density derivative `∂ρ/∂T|P`, kg/(m³·K) in SI.
pub type DensityTemperatureDerivative = Quantity<ISQ<N3, P1, Z0, Z0, N1, Z0, Z0>, SI<f64>, f64>;

/// Isothermal density derivative `∂ρ/∂P|T`, kg/(m³·Pa) = s²/m² in SI.
pub type DensityPressureDerivative = Quantity<ISQ<N2, Z0, P2, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Isothermal enthalpy derivative `∂h/∂P|T`, (J/kg)/Pa = m³/kg in SI.
pub type EnthalpyPressureDerivative = Quantity<ISQ<P3, N1, Z0, Z0, Z0, Z0, Z0>, SI<f64>, f64>;
