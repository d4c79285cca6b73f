use thiserror::Error;

/// Configuration for the likelihood estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    dt: f64,
    eps: f64,
}

/// Errors that can occur when validating a likelihood config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("dt must be finite and positive")]
    StepSize,

    #[error("eps must be finite and non-negative")]
    Eps,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(0.1, 1e-13).unwrap()
    }
}

impl Config {
    /// Creates a new config.
    ///
    /// # Errors
    ///
    /// Returns an error if `dt` is not finite and positive or `eps` is not
    /// finite and non-negative.
    pub fn new(dt: f64, eps: f64) -> Result<Self, ConfigError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::StepSize);
        }
        if !eps.is_finite() || eps < 0.0 {
            return Err(ConfigError::Eps);
        }

        Ok(Self { dt, eps })
    }

    /// Returns the initial step size of each interval's integrations.
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Returns the relative rank tolerance of the covariance solve.
    ///
    /// The effective floor is `eps·max(1, max diag Σ)`. Cholesky pivots and
    /// eigenvalues at or below it are treated as zero, so `eps` acts as an
    /// absolute floor only for covariances whose diagonal stays below one.
    #[must_use]
    pub fn eps(&self) -> f64 {
        self.eps
    }
}
