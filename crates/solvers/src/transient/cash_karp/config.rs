use thiserror::Error;

/// Configuration for the Cash–Karp step-size controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    abs_tol: f64,
    rel_tol: f64,
    dt_min: f64,
    dt_max: f64,
}

/// Errors that can occur when validating a Cash–Karp config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("abs_tol must be finite and positive")]
    AbsTol,

    #[error("rel_tol must be finite and non-negative")]
    RelTol,

    #[error("dt_min must be finite and positive")]
    DtMin,

    #[error("dt_max must not be less than dt_min")]
    DtMax,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(1e-10, 1e-5, 1e-12, f64::INFINITY).unwrap()
    }
}

impl Config {
    /// Creates a new config with validated tolerances and step bounds.
    ///
    /// `dt_max` may be infinite to leave step growth unbounded.
    ///
    /// # Errors
    ///
    /// Returns an error if a tolerance is out of range, if `dt_min` is not
    /// finite and positive, or if `dt_max < dt_min`.
    pub fn new(abs_tol: f64, rel_tol: f64, dt_min: f64, dt_max: f64) -> Result<Self, ConfigError> {
        if !abs_tol.is_finite() || abs_tol <= 0.0 {
            return Err(ConfigError::AbsTol);
        }
        if !rel_tol.is_finite() || rel_tol < 0.0 {
            return Err(ConfigError::RelTol);
        }
        if !dt_min.is_finite() || dt_min <= 0.0 {
            return Err(ConfigError::DtMin);
        }
        // Also rejects NaN.
        if !(dt_max >= dt_min) {
            return Err(ConfigError::DtMax);
        }

        Ok(Self {
            abs_tol,
            rel_tol,
            dt_min,
            dt_max,
        })
    }

    /// Returns a copy of this config with different tolerances.
    ///
    /// # Errors
    ///
    /// Returns an error if either tolerance is out of range.
    pub fn with_tolerances(self, abs_tol: f64, rel_tol: f64) -> Result<Self, ConfigError> {
        Self::new(abs_tol, rel_tol, self.dt_min, self.dt_max)
    }

    /// Returns the absolute error tolerance.
    #[must_use]
    pub fn abs_tol(&self) -> f64 {
        self.abs_tol
    }

    /// Returns the relative error tolerance.
    #[must_use]
    pub fn rel_tol(&self) -> f64 {
        self.rel_tol
    }

    /// Returns the smallest step the controller will shrink to.
    #[must_use]
    pub fn dt_min(&self) -> f64 {
        self.dt_min
    }

    /// Returns the largest step the controller will take or propose.
    #[must_use]
    pub fn dt_max(&self) -> f64 {
        self.dt_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tolerances() {
        let config = Config::default();

        assert_eq!(config.abs_tol(), 1e-10);
        assert_eq!(config.rel_tol(), 1e-5);
        assert!(config.dt_max().is_infinite());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(Config::new(0.0, 1e-5, 1e-6, 1.0), Err(ConfigError::AbsTol));
        assert_eq!(Config::new(1e-8, -1.0, 1e-6, 1.0), Err(ConfigError::RelTol));
        assert_eq!(Config::new(1e-8, 1e-5, 0.0, 1.0), Err(ConfigError::DtMin));
        assert_eq!(Config::new(1e-8, 1e-5, 1e-3, 1e-4), Err(ConfigError::DtMax));
        assert_eq!(
            Config::new(1e-8, 1e-5, 1e-3, f64::NAN),
            Err(ConfigError::DtMax)
        );
    }

    #[test]
    fn with_tolerances_keeps_step_bounds() {
        let config = Config::new(1e-8, 1e-5, 1e-4, 2.0)
            .and_then(|config| config.with_tolerances(1e-6, 1e-3))
            .unwrap();

        assert_eq!(config.abs_tol(), 1e-6);
        assert_eq!(config.rel_tol(), 1e-3);
        assert_eq!(config.dt_min(), 1e-4);
        assert_eq!(config.dt_max(), 2.0);
    }
}
