//! Linear-noise likelihood of observed trajectories.
//!
//! Under the linear noise approximation, the state at `t_{i+1}` conditioned on
//! an observation at `t_i` is Gaussian. Its mean is the deterministic solution
//! started from the observation, and its covariance `Σ` solves
//!
//! ```text
//! dΣ/dt = Σ·Jᵗ + J·Σ + Q,    Σ(t_i) = 0
//! ```
//!
//! with the drift `J` and noise correlation `Q` evaluated along that mean.
//! [`Likelihood::compute`] sums the resulting Gaussian negative log-densities
//! over consecutive observation pairs.
//!
//! # Example
//!
//! ```ignore
//! use contagion_solvers::inference::Likelihood;
//!
//! let likelihood = Likelihood::new(model);
//! let nll = likelihood.compute(&observed)?;
//! ```

mod config;
mod covariance;
mod error;


pub use config::{Config, ConfigError};
pub use covariance::{CovarianceSolution, Decomposition, solve_covariance_inverse};
pub use error::{CovarianceError, Error};

use std::{cell::RefCell, f64::consts::PI, sync::Arc};

use contagion_core::{IntegratorCore, StochasticModel, TimeSeries, interpolate};
use nalgebra::{DMatrix, DMatrixView, DVector};

use crate::transient::{CashKarp54, OdeIntegrator};

/// Negative log-likelihood estimator for a [`StochasticModel`].
///
/// Every observation interval is integrated afresh, so results depend only on
/// the model, the configuration, and the core, never on previous calls.
#[derive(Debug, Clone)]
pub struct Likelihood<M> {
    model: M,
    core: Arc<dyn IntegratorCore>,
    config: Config,
}

/// Matrices reused across evaluations of the covariance derivative.
struct Scratch {
    drift: DMatrix<f64>,
    noise: DMatrix<f64>,
}

impl<M: StochasticModel> Likelihood<M> {
    /// Creates an estimator with the default config and a [`CashKarp54`] core.
    #[must_use]
    pub fn new(model: M) -> Self {
        Self::with_config(model, Config::default())
    }

    /// Creates an estimator with the given config and a [`CashKarp54`] core.
    #[must_use]
    pub fn with_config(model: M, config: Config) -> Self {
        Self {
            model,
            core: Arc::new(CashKarp54::default()),
            config,
        }
    }

    /// Replaces the integrator core used by both per-interval integrations.
    pub fn set_integrator(&mut self, core: Arc<dyn IntegratorCore>) {
        self.core = core;
    }

    #[must_use]
    pub fn get_integrator(&self) -> &dyn IntegratorCore {
        self.core.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn get_model(&self) -> &M {
        &self.model
    }

    pub fn get_model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Computes the negative log-likelihood of `observed`.
    ///
    /// For each consecutive pair of observations, the deviation `dev` of the
    /// second from the deterministic prediction started at the first
    /// contributes
    ///
    /// ```text
    /// devᵗ·Σ⁻¹·dev / 2 + ½·log det Σ + D/2·log(2π)
    /// ```
    ///
    /// where `D` is the number of compartments. Lower values indicate a better
    /// fit. Fewer than two observations give `0.0`.
    ///
    /// # Errors
    ///
    /// Returns an error if the observation dimension differs from the model's,
    /// if observation times are not increasing, or if an integration or the
    /// covariance solve fails.
    pub fn compute(&self, observed: &TimeSeries) -> Result<f64, Error> {
        let dim = self.model.num_compartments();
        if observed.get_num_elements() != dim {
            return Err(Error::DimensionMismatch {
                expected: dim,
                found: observed.get_num_elements(),
            });
        }

        let normalization = dim as f64 / 2.0 * (2.0 * PI).ln();
        let mut nll = 0.0;

        for ((t0, x0), (t1, x1)) in observed.iter().zip(observed.iter().skip(1)) {
            let trajectory = self.simulate_interval(t0, x0, t1)?;
            let dev = x1 - interpolate(&trajectory, t1)?;

            let sigma = self.estimate_cond_cov(&trajectory, t0, t1)?;
            let solution = solve_covariance_inverse(&sigma, &dev, self.config.eps())?;

            let contribution =
                solution.quadratic_form(&dev) / 2.0 + solution.half_log_det + normalization;

            tracing::debug!(
                t0,
                t1,
                contribution,
                decomposition = ?solution.decomposition,
                "likelihood interval"
            );

            nll += contribution;
        }

        Ok(nll)
    }

    /// Integrates the model from the observation `x0` at `t0` to `t1`.
    fn simulate_interval(
        &self,
        t0: f64,
        x0: &DVector<f64>,
        t1: f64,
    ) -> Result<TimeSeries, Error> {
        let model = &self.model;
        let rhs = |y: &DVector<f64>, t: f64, dydt: &mut DVector<f64>| {
            model.eval_right_hand_side(y, y, t, dydt);
        };

        let mut integrator =
            OdeIntegrator::new(Arc::clone(&self.core), t0, x0.clone(), self.config.dt());
        integrator.advance(&rhs, t1)?;

        Ok(integrator.into_result())
    }

    /// Propagates the conditional covariance from zero at `t0` to `t1` along
    /// `trajectory`.
    ///
    /// `Σ` is integrated flattened in column-major order. The mean is
    /// re-interpolated from `trajectory` at every evaluation time.
    fn estimate_cond_cov(
        &self,
        trajectory: &TimeSeries,
        t0: f64,
        t1: f64,
    ) -> Result<DMatrix<f64>, Error> {
        let dim = self.model.num_compartments();
        let model = &self.model;
        let scratch = RefCell::new(Scratch {
            drift: DMatrix::zeros(dim, dim),
            noise: DMatrix::zeros(dim, dim),
        });

        let rhs = |sigma: &DVector<f64>, t: f64, dsigma: &mut DVector<f64>| {
            let x = match interpolate(trajectory, t) {
                Ok(x) => x,
                Err(error) => {
                    tracing::warn!(t, %error, "mean is unavailable for the covariance derivative");
                    dsigma.fill(f64::NAN);
                    return;
                }
            };

            let mut scratch = scratch.borrow_mut();
            let Scratch { drift, noise } = &mut *scratch;
            model.drift(&x, &x, t, drift);
            model.noise_correlation(&x, &x, t, noise);

            let sigma = DMatrixView::from_slice(sigma.as_slice(), dim, dim);
            noise.gemm(1.0, drift, &sigma, 1.0);
            noise.gemm(1.0, &sigma, &drift.transpose(), 1.0);
            dsigma.as_mut_slice().copy_from_slice(noise.as_slice());
        };

        let mut integrator = OdeIntegrator::new(
            Arc::clone(&self.core),
            t0,
            DVector::zeros(dim * dim),
            self.config.dt(),
        );
        let sigma = integrator.advance(&rhs, t1)?;

        Ok(DMatrix::from_column_slice(dim, dim, sigma.as_slice()))
    }
}
