use thiserror::Error;

/// Errors produced by the agent and its supporting types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// An action, state, or parameter outside of its domain
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A derived quantity would require dividing by zero
    #[error("division by zero: {0}")]
    Division(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
