//! Adaptive Cash–Karp 5(4) integrator core.
//!
//! Each attempt evaluates six stages and forms both a fifth- and an embedded
//! fourth-order solution. Their difference estimates the local error, which
//! is measured against the tolerances of a [`Config`]:
//!
//! ```text
//! err = max_i |e_i| / (abs_tol + rel_tol * (|y_i| + dt * |f_i|))
//! ```
//!
//! A step with `err > 1` is rejected and retried with a smaller step. An
//! accepted step propagates the fifth-order solution and, if the error was
//! comfortably small, proposes a larger step for the next call.

mod config;

pub use config::{Config, ConfigError};

use contagion_core::{DerivFunction, IntegratorCore, StepError, ensure_finite};
use nalgebra::DVector;

const C: [f64; 6] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 3.0 / 5.0, 1.0, 7.0 / 8.0];

const A: [&[f64]; 6] = [
    &[],
    &[1.0 / 5.0],
    &[3.0 / 40.0, 9.0 / 40.0],
    &[3.0 / 10.0, -9.0 / 10.0, 6.0 / 5.0],
    &[-11.0 / 54.0, 5.0 / 2.0, -70.0 / 27.0, 35.0 / 27.0],
    &[
        1631.0 / 55296.0,
        175.0 / 512.0,
        575.0 / 13824.0,
        44275.0 / 110_592.0,
        253.0 / 4096.0,
    ],
];

/// Fifth-order weights.
const B5: [f64; 6] = [
    37.0 / 378.0,
    0.0,
    250.0 / 621.0,
    125.0 / 594.0,
    0.0,
    512.0 / 1771.0,
];

/// Embedded fourth-order weights.
const B4: [f64; 6] = [
    2825.0 / 27648.0,
    0.0,
    18575.0 / 48384.0,
    13525.0 / 55296.0,
    277.0 / 14336.0,
    1.0 / 4.0,
];

/// Safety factor applied to every step-size change.
const SAFETY: f64 = 0.9;

/// Largest reduction of a rejected step.
const MAX_SHRINK: f64 = 0.2;

/// Accepted steps with an error ratio below this grow the next step.
const GROW_BELOW: f64 = 0.5;

/// Error ratios are floored here when growing, capping growth at `SAFETY * 5`.
const MIN_GROW_ERR: f64 = 3.2e-4;

/// Adaptive embedded Cash–Karp 5(4) integrator core.
///
/// On success `t` advances by the accepted step, which may be shorter than
/// the proposed `dt`, and `dt` holds the step proposed for the next call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CashKarp54 {
    config: Config,
}

impl CashKarp54 {
    /// Creates a core using the given controller configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Returns the controller configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Computes the scaled error ratio of an attempted step.
    fn error_ratio(&self, err: &DVector<f64>, yt: &DVector<f64>, f0: &DVector<f64>, h: f64) -> f64 {
        let (abs_tol, rel_tol) = (self.config.abs_tol(), self.config.rel_tol());

        err.iter()
            .zip(yt.iter())
            .zip(f0.iter())
            .map(|((e, y), f)| e.abs() / (abs_tol + rel_tol * (y.abs() + h * f.abs())))
            .fold(0.0, f64::max)
    }
}

impl IntegratorCore for CashKarp54 {
    fn step(
        &self,
        f: &DerivFunction<'_>,
        yt: &DVector<f64>,
        t: &mut f64,
        dt: &mut f64,
        ytp1: &mut DVector<f64>,
    ) -> Result<(), StepError> {
        StepError::check_dimensions(yt, ytp1)?;

        let t0 = *t;
        let n = yt.len();
        let (dt_min, dt_max) = (self.config.dt_min(), self.config.dt_max());

        // Steps below dt_min are only honoured when requested by the caller,
        // e.g. to land exactly on a target time.
        let mut h = dt.min(dt_max);
        let mut forced = false;

        let mut k: [DVector<f64>; 6] = std::array::from_fn(|_| DVector::zeros(n));
        let mut stage = DVector::zeros(n);
        let mut err = DVector::zeros(n);

        // The first stage does not depend on the step size.
        f(yt, t0, &mut k[0]);
        ensure_finite(&k[0], t0)?;

        loop {
            for s in 1..6 {
                let (done, rest) = k.split_at_mut(s);
                stage.copy_from(yt);
                for (kj, &a) in done.iter().zip(A[s]) {
                    stage.axpy(h * a, kj, 1.0);
                }
                f(&stage, t0 + C[s] * h, &mut rest[0]);
            }

            ytp1.copy_from(yt);
            err.fill(0.0);
            for (kj, (&b5, &b4)) in k.iter().zip(B5.iter().zip(&B4)) {
                ytp1.axpy(h * b5, kj, 1.0);
                err.axpy(h * (b5 - b4), kj, 1.0);
            }
            ensure_finite(ytp1, t0)?;

            let ratio = self.error_ratio(&err, yt, &k[0], h);

            if ratio <= 1.0 || forced {
                let next = if ratio < GROW_BELOW {
                    h * SAFETY * ratio.max(MIN_GROW_ERR).powf(-0.2)
                } else {
                    h
                };

                tracing::trace!(t = t0, dt = h, err = ratio, "accepted step");

                *t = t0 + h;
                *dt = next.clamp(dt_min, dt_max);
                return Ok(());
            }

            if h <= dt_min {
                tracing::warn!(
                    t = t0,
                    dt = h,
                    err = ratio,
                    "error tolerance not met at the minimum step size, accepting step"
                );
                forced = true;
                continue;
            }

            let shrunk = h * (SAFETY * ratio.powf(-1.0 / 3.0)).max(MAX_SHRINK);
            if shrunk < dt_min {
                tracing::warn!(
                    t = t0,
                    dt = dt_min,
                    err = ratio,
                    "step size reached the minimum, forcing a step"
                );
                h = dt_min;
                forced = true;
            } else {
                h = shrunk;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn decay(rate: f64) -> impl Fn(&DVector<f64>, f64, &mut DVector<f64>) {
        move |y, _t, dydt| dydt.copy_from(&(y * -rate))
    }

    #[test]
    fn tableau_rows_are_consistent() {
        for (row, &c) in A.iter().zip(&C) {
            assert_relative_eq!(row.iter().sum::<f64>(), c, epsilon = 1e-15);
        }
        assert_relative_eq!(B5.iter().sum::<f64>(), 1.0, epsilon = 1e-15);
        assert_relative_eq!(B4.iter().sum::<f64>(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn constant_derivative_grows_the_step() {
        let constant = |_: &DVector<f64>, _: f64, dydt: &mut DVector<f64>| dydt.fill(2.0);

        let y = DVector::from_element(1, 1.0);
        let mut out = DVector::zeros(1);
        let (mut t, mut dt) = (0.0, 0.1);

        CashKarp54::default()
            .step(&constant, &y, &mut t, &mut dt, &mut out)
            .unwrap();

        assert_relative_eq!(out[0], 1.2, epsilon = 1e-14);
        assert_relative_eq!(t, 0.1);
        // Zero error grows the step by the maximum factor.
        assert_relative_eq!(dt, 0.45, epsilon = 1e-12);
    }

    #[test]
    fn repeated_steps_track_exponential_decay() {
        let config = Config::new(1e-12, 1e-8, 1e-12, f64::INFINITY).unwrap();
        let core = CashKarp54::new(config);
        let f = decay(1.0);

        let mut y = DVector::from_element(1, 1.0);
        let mut out = DVector::zeros(1);
        let (mut t, mut dt) = (0.0_f64, 0.1_f64);
        while t < 2.0 {
            dt = dt.min(2.0 - t);
            core.step(&f, &y, &mut t, &mut dt, &mut out).unwrap();
            y.copy_from(&out);
        }

        assert_relative_eq!(t, 2.0, epsilon = 1e-12);
        assert_relative_eq!(y[0], (-2.0_f64).exp(), max_relative = 1e-6);
    }

    #[test]
    fn oversized_step_is_rejected_and_shrunk() {
        let core = CashKarp54::default();
        let f = decay(50.0);

        let y = DVector::from_element(1, 1.0);
        let mut out = DVector::zeros(1);
        let (mut t, mut dt) = (0.0, 1.0);

        core.step(&f, &y, &mut t, &mut dt, &mut out).unwrap();

        assert!(t > 0.0 && t < 1.0, "accepted a shortened step, t = {t}");
        assert_relative_eq!(out[0], (-50.0 * t).exp(), max_relative = 1e-4);
    }

    #[test]
    fn minimum_step_is_forced() {
        let config = Config::new(1e-12, 1e-12, 0.5, 10.0).unwrap();
        let core = CashKarp54::new(config);
        let f = decay(1000.0);

        let y = DVector::from_element(1, 1.0);
        let mut out = DVector::zeros(1);
        let (mut t, mut dt) = (0.0, 1.0);

        core.step(&f, &y, &mut t, &mut dt, &mut out).unwrap();

        assert_eq!(t, 0.5);
        assert!(out[0].is_finite());
        assert!(dt >= 0.5);
    }

    #[test]
    fn short_requested_step_is_honoured() {
        let config = Config::new(1e-10, 1e-5, 1e-3, 1.0).unwrap();
        let core = CashKarp54::new(config);
        let f = decay(1.0);

        let y = DVector::from_element(1, 1.0);
        let mut out = DVector::zeros(1);
        let (mut t, mut dt) = (0.0, 1e-6);

        core.step(&f, &y, &mut t, &mut dt, &mut out).unwrap();

        assert_eq!(t, 1e-6);
        assert!(dt >= 1e-3, "proposal is clamped to dt_min");
    }

    #[test]
    fn nan_derivative_fails() {
        let core = CashKarp54::default();
        let poisoned = |_: &DVector<f64>, t: f64, dydt: &mut DVector<f64>| {
            dydt.fill(if t > 0.0 { f64::NAN } else { 1.0 });
        };

        let y = DVector::from_element(2, 1.0);
        let mut out = DVector::zeros(2);
        let (mut t, mut dt) = (0.0, 0.1);

        let error = core
            .step(&poisoned, &y, &mut t, &mut dt, &mut out)
            .unwrap_err();

        assert_eq!(error, StepError::NonFinite { time: 0.0 });
        assert_eq!(t, 0.0);
    }
}
