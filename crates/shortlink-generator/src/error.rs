use thiserror::Error;

/// Errors surfaced by an [`IdentifierSource`][crate::IdentifierSource].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("clock moved backwards: {0}")]
    ClockRegression(String),
    #[error("identifier generator failed: {0}")]
    Generator(String),
}

impl From<shortlink_flake::Error> for IdentifierError {
    fn from(value: shortlink_flake::Error) -> Self {
        match value {
            shortlink_flake::Error::ClockRegression { .. } => {
                Self::ClockRegression(value.to_string())
            }
            other => Self::Generator(other.to_string()),
        }
    }
}
