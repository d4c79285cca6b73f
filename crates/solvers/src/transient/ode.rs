mod error;

pub use error::IntegrationError;

use std::sync::Arc;

use contagion_core::{DerivFunction, IntegratorCore, TimeSeries};
use nalgebra::DVector;

/// Relative distance to the target below which integration stops.
const TARGET_TOLERANCE: f64 = 1e-10;

/// Drives an [`IntegratorCore`] towards target times, recording every
/// accepted step.
///
/// The recorded series always starts with the initial state and grows by one
/// entry per accepted step. The step size proposed by the core is carried
/// across calls to [`OdeIntegrator::advance`].
#[derive(Debug, Clone)]
pub struct OdeIntegrator {
    core: Arc<dyn IntegratorCore>,
    t: f64,
    dt: f64,
    y: DVector<f64>,
    result: TimeSeries,
}

impl OdeIntegrator {
    /// Creates a driver starting from `y0` at `t0` with initial step `dt`.
    #[must_use]
    pub fn new(core: Arc<dyn IntegratorCore>, t0: f64, y0: DVector<f64>, dt: f64) -> Self {
        Self {
            core,
            t: t0,
            dt,
            result: TimeSeries::from_initial(t0, y0.clone()),
            y: y0,
        }
    }

    /// Replaces the core used for subsequent steps.
    ///
    /// Steps already recorded are unaffected.
    pub fn set_core(&mut self, core: Arc<dyn IntegratorCore>) {
        self.core = core;
    }

    /// Returns the core used for stepping.
    #[must_use]
    pub fn core(&self) -> &Arc<dyn IntegratorCore> {
        &self.core
    }

    /// Returns the step size that will be proposed for the next step.
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Returns the time of the most recent state.
    #[must_use]
    pub fn current_time(&self) -> f64 {
        self.t
    }

    /// Returns the most recent state.
    #[must_use]
    pub fn current_value(&self) -> &DVector<f64> {
        &self.y
    }

    /// Returns the recorded trajectory.
    #[must_use]
    pub fn get_result(&self) -> &TimeSeries {
        &self.result
    }

    /// Consumes the driver and returns the recorded trajectory.
    #[must_use]
    pub fn into_result(self) -> TimeSeries {
        self.result
    }

    /// Integrates `f` from the current time to `tmax`.
    ///
    /// Each step is truncated so the last one lands on `tmax`. The step size
    /// proposed by the core replaces the current one, except after a
    /// truncated step that the core accepted in full, so a short final step
    /// does not shrink the steps of a later call.
    ///
    /// Returns the state at `tmax`.
    ///
    /// # Errors
    ///
    /// Returns an error if `tmax` is not after the current time, if the step
    /// size is invalid, or if a step fails. Steps accepted before a failure
    /// remain recorded.
    pub fn advance(
        &mut self,
        f: &DerivFunction<'_>,
        tmax: f64,
    ) -> Result<&DVector<f64>, IntegrationError> {
        // Negated comparison so that a NaN target is rejected.
        if !(tmax > self.t) {
            return Err(IntegrationError::TargetNotAfterCurrent {
                target: tmax,
                current: self.t,
            });
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(IntegrationError::InvalidStepSize { dt: self.dt });
        }

        let span = tmax - self.t;
        let reached = |t: f64| ((tmax - t) / span).abs() <= TARGET_TOLERANCE;
        let mut next = DVector::zeros(self.y.len());

        while !reached(self.t) {
            let remaining = tmax - self.t;
            let truncated = self.dt >= remaining;

            let mut t = self.t;
            let mut dt = self.dt.min(remaining);
            self.core.step(f, &self.y, &mut t, &mut dt, &mut next)?;

            if !(t > self.t) {
                return Err(IntegrationError::Stalled { time: self.t });
            }
            if !(truncated && reached(t)) {
                self.dt = dt;
            }

            std::mem::swap(&mut self.y, &mut next);
            self.t = t;
            self.result.add_time_point(t).copy_from(&self.y);
        }

        Ok(&self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use contagion_core::StepError;

    use crate::transient::{CashKarp54, Euler};

    fn constant(rate: f64) -> impl Fn(&DVector<f64>, f64, &mut DVector<f64>) {
        move |_y, _t, dydt| dydt.fill(rate)
    }

    fn euler(t0: f64, y0: f64, dt: f64) -> OdeIntegrator {
        OdeIntegrator::new(Arc::new(Euler), t0, DVector::from_element(1, y0), dt)
    }

    #[test]
    fn records_one_entry_per_step() {
        let mut integrator = euler(0.0, 0.0, 0.25);

        let y = integrator.advance(&constant(2.0), 1.0).unwrap();

        assert_relative_eq!(y[0], 2.0);
        let result = integrator.get_result();
        assert_eq!(result.get_num_time_points(), 5);
        assert_eq!(result.get_times(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn last_step_is_truncated_to_the_target() {
        let mut integrator = euler(0.0, 0.0, 0.4);

        integrator.advance(&constant(1.0), 1.0).unwrap();

        let result = integrator.get_result();
        assert_eq!(result.get_num_time_points(), 4);
        assert_relative_eq!(result.get_time(2).unwrap(), 0.8);
        assert_relative_eq!(result.get_last_time().unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(result.get_last_value().unwrap()[0], 1.0, epsilon = 1e-12);
        assert_eq!(integrator.dt(), 0.4, "truncation does not shrink the step");
    }

    #[test]
    fn successive_calls_extend_the_series() {
        let mut integrator = euler(1.0, 0.0, 0.5);

        integrator.advance(&constant(1.0), 2.0).unwrap();
        integrator.advance(&constant(-1.0), 4.0).unwrap();

        let result = integrator.get_result();
        assert_eq!(result.get_num_time_points(), 7);
        assert_relative_eq!(integrator.current_time(), 4.0);
        assert_relative_eq!(integrator.current_value()[0], -1.0);
    }

    #[test]
    fn target_must_be_after_current_time() {
        let mut integrator = euler(2.0, 0.0, 0.1);

        for target in [2.0, 1.0, f64::NAN] {
            let error = integrator.advance(&constant(1.0), target).unwrap_err();
            assert!(matches!(
                error,
                IntegrationError::TargetNotAfterCurrent { current, .. } if current == 2.0
            ));
        }
        assert_eq!(integrator.get_result().get_num_time_points(), 1);
    }

    #[test]
    fn invalid_step_size_is_rejected() {
        let mut integrator = euler(0.0, 0.0, 0.0);

        let error = integrator.advance(&constant(1.0), 1.0).unwrap_err();

        assert_eq!(error, IntegrationError::InvalidStepSize { dt: 0.0 });
    }

    #[test]
    fn failed_step_keeps_accepted_steps() {
        let mut integrator = euler(0.0, 1.0, 0.5);
        let poisoned = |_: &DVector<f64>, t: f64, dydt: &mut DVector<f64>| {
            dydt.fill(if t < 1.0 { 0.0 } else { f64::INFINITY });
        };

        let error = integrator.advance(&poisoned, 2.0).unwrap_err();

        assert_eq!(error, IntegrationError::Step(StepError::NonFinite { time: 1.0 }));
        assert_eq!(integrator.get_result().get_times(), &[0.0, 0.5, 1.0]);
    }

    #[test]
    fn adaptive_core_adopts_proposed_step() {
        let core: Arc<dyn IntegratorCore> = Arc::new(CashKarp54::default());
        let mut integrator = OdeIntegrator::new(core, 0.0, DVector::from_element(1, 0.0), 0.1);

        integrator.advance(&constant(1.0), 100.0).unwrap();

        // Exact steps grow geometrically, so far fewer than 1000 are needed.
        let result = integrator.get_result();
        assert!(result.get_num_time_points() < 20);
        assert!(integrator.dt() > 0.1);
        assert_relative_eq!(result.get_last_value().unwrap()[0], 100.0, max_relative = 1e-12);
    }
}
