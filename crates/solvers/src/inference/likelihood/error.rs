use contagion_core::TimeSeriesError;
use thiserror::Error;

use crate::transient::IntegrationError;

/// Errors that can occur when computing a likelihood.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum Error {
    #[error("observations have {found} elements but the model has {expected} compartments")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("integration failed: {0}")]
    Integration(#[from] IntegrationError),

    #[error("interpolation failed: {0}")]
    Interpolation(#[from] TimeSeriesError),

    #[error("covariance solve failed: {0}")]
    Covariance(#[from] CovarianceError),
}

/// Errors that can occur when inverting a covariance matrix.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CovarianceError {
    #[error("covariance matrix is {rows}x{cols}, expected a square matrix")]
    NotSquare { rows: usize, cols: usize },

    #[error("deviation has {found} elements but the covariance matrix is {expected}x{expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("covariance matrix contains non-finite entries")]
    NonFinite,

    #[error("symmetric eigen-decomposition did not converge")]
    NoConvergence,
}
