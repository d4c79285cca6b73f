use std::error::Error as StdError;

use crate::transient::IntegrationError;

/// Errors that can occur when running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("model constraint violated: {0}")]
    Constraint(#[source] Box<dyn StdError + Send + Sync>),

    #[error("integration failed: {0}")]
    Integration(#[from] IntegrationError),
}

impl Error {
    pub(crate) fn constraint<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Constraint(Box::new(err))
    }
}
