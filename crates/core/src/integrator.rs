use std::fmt::Debug;

use nalgebra::DVector;
use thiserror::Error;

/// The derivative function integrated by an [`IntegratorCore`].
///
/// Called as `f(y, t, dydt)`, it writes the time derivative of `y` at `t`
/// into `dydt`. A derivative that cannot be evaluated should be reported by
/// filling `dydt` with NaN, which every core rejects as a failed step.
pub type DerivFunction<'a> = dyn Fn(&DVector<f64>, f64, &mut DVector<f64>) + 'a;

/// A single numerical step of a first-order ODE system `dy/dt = f(y, t)`.
///
/// Cores carry configuration only, never trajectory data, so one instance can
/// be shared behind an `Arc` by any number of simulations and swapped between
/// calls without affecting results already recorded.
pub trait IntegratorCore: Debug + Send + Sync {
    /// Advances `yt` from time `t` and writes the new state into `ytp1`.
    ///
    /// # Parameters
    ///
    /// - `f`: The derivative function.
    /// - `yt`: The state at time `t`.
    /// - `t`: On input, the current time. On success, the time reached, which
    ///   is `t + dt` for fixed-step cores and `t + h` for some accepted
    ///   `h <= dt` for adaptive cores.
    /// - `dt`: On input, the proposed step size. On output, the step size the
    ///   core proposes for the next call.
    /// - `ytp1`: Receives the state at the new `t`. Must have the same length
    ///   as `yt`.
    ///
    /// # Errors
    ///
    /// Returns a [`StepError`] if the dimensions are inconsistent or the step
    /// produced non-finite values.
    fn step(
        &self,
        f: &DerivFunction<'_>,
        yt: &DVector<f64>,
        t: &mut f64,
        dt: &mut f64,
        ytp1: &mut DVector<f64>,
    ) -> Result<(), StepError>;
}

/// Errors that can occur during a single integration step.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum StepError {
    #[error("step from t = {time} produced a non-finite state")]
    NonFinite { time: f64 },

    #[error("output holds {expected} elements but the state has {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

impl StepError {
    /// Checks that `ytp1` can receive a step of `yt`.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::DimensionMismatch`] if the lengths differ.
    pub fn check_dimensions(yt: &DVector<f64>, ytp1: &DVector<f64>) -> Result<(), Self> {
        if yt.len() == ytp1.len() {
            Ok(())
        } else {
            Err(Self::DimensionMismatch {
                expected: ytp1.len(),
                found: yt.len(),
            })
        }
    }
}

/// Returns an error if any entry of `y` is NaN or infinite.
///
/// # Errors
///
/// Returns [`StepError::NonFinite`] tagged with `time`, the start of the
/// offending step.
pub fn ensure_finite(y: &DVector<f64>, time: f64) -> Result<(), StepError> {
    if y.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(StepError::NonFinite { time })
    }
}
