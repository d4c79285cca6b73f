use contagion_core::{DerivFunction, IntegratorCore, StepError, ensure_finite};
use nalgebra::DVector;

/// Classic fourth-order Runge–Kutta with a fixed step size.
///
/// ```text
/// k1 = f(y, t)
/// k2 = f(y + dt/2 * k1, t + dt/2)
/// k3 = f(y + dt/2 * k2, t + dt/2)
/// k4 = f(y + dt * k3, t + dt)
/// y_{n+1} = y + dt/6 * (k1 + 2 k2 + 2 k3 + k4)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rk4;

impl IntegratorCore for Rk4 {
    fn step(
        &self,
        f: &DerivFunction<'_>,
        yt: &DVector<f64>,
        t: &mut f64,
        dt: &mut f64,
        ytp1: &mut DVector<f64>,
    ) -> Result<(), StepError> {
        StepError::check_dimensions(yt, ytp1)?;

        let (t0, h) = (*t, *dt);
        let n = yt.len();
        let mut k1 = DVector::zeros(n);
        let mut k2 = DVector::zeros(n);
        let mut k3 = DVector::zeros(n);
        let mut k4 = DVector::zeros(n);

        f(yt, t0, &mut k1);
        f(&(yt + &k1 * (h / 2.0)), t0 + h / 2.0, &mut k2);
        f(&(yt + &k2 * (h / 2.0)), t0 + h / 2.0, &mut k3);
        f(&(yt + &k3 * h), t0 + h, &mut k4);

        ytp1.copy_from(yt);
        ytp1.axpy(h / 6.0, &k1, 1.0);
        ytp1.axpy(h / 3.0, &k2, 1.0);
        ytp1.axpy(h / 3.0, &k3, 1.0);
        ytp1.axpy(h / 6.0, &k4, 1.0);

        ensure_finite(ytp1, t0)?;
        *t = t0 + h;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn cubic_is_integrated_exactly() {
        // dy/dt = 3t², so y(t) = t³ and RK4 carries no truncation error.
        let cubic = |_: &DVector<f64>, t: f64, dydt: &mut DVector<f64>| dydt.fill(3.0 * t * t);

        let y = DVector::from_element(1, 1.0);
        let mut out = DVector::zeros(1);
        let (mut t, mut dt) = (1.0, 0.5);

        Rk4.step(&cubic, &y, &mut t, &mut dt, &mut out).unwrap();

        assert_relative_eq!(out[0], 1.5_f64.powi(3), epsilon = 1e-14);
        assert_relative_eq!(t, 1.5);
        assert_eq!(dt, 0.5);
    }

    #[test]
    fn decay_is_fourth_order_accurate() {
        let decay = |y: &DVector<f64>, _t: f64, dydt: &mut DVector<f64>| dydt.copy_from(&(-y));

        let mut y = DVector::from_element(1, 1.0);
        let mut out = DVector::zeros(1);
        let mut t = 0.0;
        let mut dt = 0.1;
        for _ in 0..10 {
            Rk4.step(&decay, &y, &mut t, &mut dt, &mut out).unwrap();
            y.copy_from(&out);
        }

        assert_relative_eq!(t, 1.0, epsilon = 1e-12);
        assert_relative_eq!(y[0], (-1.0_f64).exp(), max_relative = 1e-6);
    }
}
