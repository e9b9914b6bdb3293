use thiserror::Error;

/// Errors reported by the LDA engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LdaError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Model not initialized: call initialize() first")]
    UninitializedModel,

    #[error("Conditional weights sum to {sum}, cannot normalize")]
    NumericDegeneracy { sum: f64 },

    #[error("Count statistics out of sync with topic assignments: {0}")]
    InconsistentState(String),

    #[error("Document index {index} out of range for corpus of {len} documents")]
    DocumentOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, LdaError>;
