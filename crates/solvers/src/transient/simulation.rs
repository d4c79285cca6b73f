//! Simulation of a compartment model over time.
//!
//! A [`Simulation`] owns a model and an [`OdeIntegrator`] whose recorded
//! trajectory starts at the model's initial values. [`simulate`] is the
//! one-shot convenience entry point.
//!
//! # Example
//!
//! ```ignore
//! use contagion_solvers::transient::simulate;
//!
//! let result = simulate(0.0, 50.0, 0.1, &model, None)?;
//!
//! for (t, y) in result.iter() {
//!     println!("t={t}: {y:?}");
//! }
//! ```

mod error;

pub use error::Error;

use std::sync::Arc;

use contagion_core::{CompartmentModel, IntegratorCore, TimeSeries};
use nalgebra::DVector;

use super::{CashKarp54, IntegrationError, OdeIntegrator};

/// A compartment model advanced in time by a shared integrator core.
///
/// By default steps are taken by a [`CashKarp54`] core with default
/// tolerances. The model is re-borrowed on every call to
/// [`Simulation::advance`], so changes made through
/// [`Simulation::get_model_mut`] between calls affect subsequent steps.
#[derive(Debug, Clone)]
pub struct Simulation<M> {
    model: M,
    integrator: OdeIntegrator,
}

impl<M: CompartmentModel> Simulation<M> {
    /// Creates a simulation starting at `t0` from the model's initial values.
    ///
    /// `dt` is the initial step size. Adaptive cores may change it.
    #[must_use]
    pub fn new(model: M, t0: f64, dt: f64) -> Self {
        let core: Arc<dyn IntegratorCore> = Arc::new(CashKarp54::default());
        let integrator = OdeIntegrator::new(core, t0, model.initial_values(), dt);
        Self { model, integrator }
    }

    /// Replaces the integrator core used for subsequent steps.
    pub fn set_integrator(&mut self, core: Arc<dyn IntegratorCore>) {
        self.integrator.set_core(core);
    }

    /// Returns the integrator core.
    #[must_use]
    pub fn integrator(&self) -> &dyn IntegratorCore {
        self.integrator.core().as_ref()
    }

    /// Advances the simulation to `tmax` and returns the state reached.
    ///
    /// # Errors
    ///
    /// Returns an error if `tmax` is not after the last recorded time or if
    /// an integration step fails.
    pub fn advance(&mut self, tmax: f64) -> Result<&DVector<f64>, IntegrationError> {
        let model = &self.model;
        let rhs = |y: &DVector<f64>, t: f64, dydt: &mut DVector<f64>| {
            model.eval_right_hand_side(y, y, t, dydt);
        };
        self.integrator.advance(&rhs, tmax)
    }

    /// Returns the recorded trajectory.
    #[must_use]
    pub fn get_result(&self) -> &TimeSeries {
        self.integrator.get_result()
    }

    /// Returns the model.
    #[must_use]
    pub fn get_model(&self) -> &M {
        &self.model
    }

    /// Returns the model for modification between calls to `advance`.
    pub fn get_model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Consumes the simulation and returns the recorded trajectory.
    #[must_use]
    pub fn into_result(self) -> TimeSeries {
        self.integrator.into_result()
    }
}

/// Runs a simulation of a copy of `model` from `t0` to `tmax`.
///
/// The model's constraints are checked once before integration starts. If
/// `integrator` is `None` the default [`CashKarp54`] core is used.
///
/// # Errors
///
/// Returns [`Error::Constraint`] if the model rejects its parameters, and
/// [`Error::Integration`] if advancing to `tmax` fails.
pub fn simulate<M>(
    t0: f64,
    tmax: f64,
    dt: f64,
    model: &M,
    integrator: Option<Arc<dyn IntegratorCore>>,
) -> Result<TimeSeries, Error>
where
    M: CompartmentModel + Clone,
{
    model.check_constraints().map_err(Error::constraint)?;

    let mut sim = Simulation::new(model.clone(), t0, dt);
    if let Some(core) = integrator {
        sim.set_integrator(core);
    }
    sim.advance(tmax)?;

    Ok(sim.into_result())
}
