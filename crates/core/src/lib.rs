//! Core traits and types for the contagion framework.
//!
//! This crate defines the shared abstractions that integrators, simulations,
//! likelihood estimators, and compartment models build on:
//!
//! - [`TimeSeries`] — an append-only record of `(time, state)` samples, with
//!   linear [`interpolate`]ion between stored points
//! - [`CompartmentModel`] — a compartmental ODE system `dy/dt = f(y, t)`
//! - [`StochasticModel`] — a compartment model that also exposes the drift and
//!   noise-correlation terms of its linear noise approximation
//! - [`IntegratorCore`] — a single numerical step of a first-order ODE system,
//!   shared between runs behind an [`std::sync::Arc`]

mod integrator;
mod model;
pub mod time_series;

pub use integrator::{DerivFunction, IntegratorCore, StepError, ensure_finite};
pub use model::{CompartmentModel, StochasticModel};
pub use time_series::{
    TimeSeries, TimeSeriesError, interpolate, interpolate_at, interpolate_at_days,
};
