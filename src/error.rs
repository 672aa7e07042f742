use thiserror::Error;

/// Errors surfaced while configuring or wiring up a training run.
///
/// Numeric kernels (forward/backward, optimizer updates) treat shape errors as
/// precondition violations and panic instead; these variants cover the places
/// where bad input comes from outside the crate.
#[derive(Debug, Error)]
pub enum NnError {
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: String,
        actual: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NnError {
    pub fn shape_mismatch(
        context: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        NnError::ShapeMismatch {
            context: context.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NnError>;
