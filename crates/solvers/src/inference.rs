//! Statistical inference for compartment models.
//!
//! # Estimators
//!
//! - [`likelihood`] — negative log-likelihood of an observed trajectory under
//!   the linear noise approximation of a [`StochasticModel`]
//!
//! [`StochasticModel`]: contagion_core::StochasticModel

pub mod likelihood;

pub use likelihood::{CovarianceSolution, Likelihood, solve_covariance_inverse};
