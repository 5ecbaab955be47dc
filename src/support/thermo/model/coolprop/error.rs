use std::sync::PoisonError;

use thiserror::Error;

use crate::support::thermo::PropertyError;

/// Errors returned by the [`CoolProp`](super::CoolProp) model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoolPropError {
    /// CoolProp could not resolve a state from the given input pair.
    #[error("CoolProp rejected {inputs} inputs: {source}")]
    Update {
        inputs: &'static str,
        #[source]
        source: rfluids::native::CoolPropError,
    },
    #[error(transparent)]
    Rfluids(#[from] rfluids::native::CoolPropError),
    #[error("CoolProp abstract state mutex poisoned")]
    Poisoned,
}

impl<T> From<PoisonError<T>> for CoolPropError {
    fn from(_: PoisonError<T>) -> Self {
        CoolPropError::Poisoned
    }
}

impl From<CoolPropError> for PropertyError {
    fn from(error: CoolPropError) -> Self {
        match error {
            CoolPropError::Update { inputs, source } => {
                classify(format!("{inputs}: {source}"))
            }
            CoolPropError::Rfluids(source) => classify(source.to_string()),
            CoolPropError::Poisoned => PropertyError::Calculation {
                context: "CoolProp abstract state mutex poisoned".to_string(),
            },
        }
    }
}

/// Classifies a CoolProp message into a [`PropertyError`] variant.
///
/// `rfluids` surfaces CoolProp failures as plain strings, so the
/// classification is by substring. Unrecognized messages become
/// [`PropertyError::Calculation`] with the message kept as context.
fn classify(context: String) -> PropertyError {
    const UNDEFINED: &[&str] = &["not defined"];
    const OUT_OF_DOMAIN: &[&str] = &[
        "not in range",
        "out of range",
        "outside the range of validity",
        "must be in range",
        "must be between",
        "below the minimum",
        "above the maximum",
    ];
    const INVALID_STATE: &[&str] = &["not a valid number", "invalid state", "invalid number"];

    let lowered = context.to_lowercase();
    let found = |markers: &[&str]| markers.iter().any(|marker| lowered.contains(marker));

    if found(UNDEFINED) {
        PropertyError::Undefined { context }
    } else if found(OUT_OF_DOMAIN) {
        PropertyError::OutOfDomain { context }
    } else if found(INVALID_STATE) {
        PropertyError::InvalidState { context }
    } else {
        PropertyError::Calculation { context }
    }
}
