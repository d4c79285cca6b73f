//! Forward Euler integrator core.
//!
//! Steps the state with explicit Euler:
//!
//! ```text
//! y_{n+1} = y_n + f(y_n, t_n) * dt
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use contagion_core::IntegratorCore;
//! use contagion_solvers::transient::{Euler, OdeIntegrator};
//! use nalgebra::DVector;
//!
//! let core: Arc<dyn IntegratorCore> = Arc::new(Euler);
//! let mut integrator = OdeIntegrator::new(core, 0.0, DVector::from_element(1, 0.0), 0.25);
//!
//! let velocity = |_: &DVector<f64>, _: f64, dydt: &mut DVector<f64>| dydt.fill(2.0);
//! integrator.advance(&velocity, 1.0).unwrap();
//!
//! assert_eq!(integrator.get_result().get_num_time_points(), 5);
//! ```

use contagion_core::{DerivFunction, IntegratorCore, StepError, ensure_finite};
use nalgebra::DVector;

/// Explicit forward Euler with a fixed step size.
///
/// The proposed step size is returned unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euler;

impl IntegratorCore for Euler {
    fn step(
        &self,
        f: &DerivFunction<'_>,
        yt: &DVector<f64>,
        t: &mut f64,
        dt: &mut f64,
        ytp1: &mut DVector<f64>,
    ) -> Result<(), StepError> {
        StepError::check_dimensions(yt, ytp1)?;

        // Evaluate the derivative in place, then ytp1 = yt + dt * ytp1.
        f(yt, *t, ytp1);
        ytp1.axpy(1.0, yt, *dt);

        ensure_finite(ytp1, *t)?;
        *t += *dt;
        Ok(())
    }
}
