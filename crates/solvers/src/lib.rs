//! Numerical solvers for compartmental models.
//!
//! - [`transient`] — integrator cores, the [`OdeIntegrator`] driver that fills
//!   a [`TimeSeries`], and [`Simulation`]
//! - [`inference`] — the linear-noise [`Likelihood`] of observed trajectories
//!
//! [`OdeIntegrator`]: transient::OdeIntegrator
//! [`Simulation`]: transient::Simulation
//! [`Likelihood`]: inference::Likelihood
//! [`TimeSeries`]: contagion_core::TimeSeries

pub mod inference;
pub mod transient;
