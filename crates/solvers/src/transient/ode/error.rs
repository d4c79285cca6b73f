use contagion_core::StepError;
use thiserror::Error;

/// Errors that can occur while advancing an [`OdeIntegrator`](super::OdeIntegrator).
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum IntegrationError {
    #[error("target time {target} is not after the current time {current}")]
    TargetNotAfterCurrent { target: f64, current: f64 },

    #[error("step size must be finite and positive, got {dt}")]
    InvalidStepSize { dt: f64 },

    #[error("step from t = {time} did not advance time")]
    Stalled { time: f64 },

    #[error("step failed: {0}")]
    Step(#[from] StepError),
}
