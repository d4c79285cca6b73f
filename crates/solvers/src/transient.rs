//! Solvers for transient problems, advancing a compartment model in time.
//!
//! An [`IntegratorCore`] performs a single step of `dy/dt = f(y, t)`. The
//! [`OdeIntegrator`] repeatedly steps a core towards a target time and records
//! every accepted step in a [`TimeSeries`]. A [`Simulation`] couples the
//! driver to a [`CompartmentModel`].
//!
//! # Cores
//!
//! - [`Euler`] — explicit forward Euler with a fixed step
//! - [`Rk4`] — classic fixed-step fourth-order Runge–Kutta
//! - [`CashKarp54`] — adaptive embedded Cash–Karp 5(4) pair, the default
//!
//! [`IntegratorCore`]: contagion_core::IntegratorCore
//! [`TimeSeries`]: contagion_core::TimeSeries
//! [`CompartmentModel`]: contagion_core::CompartmentModel

mod ode;

pub mod cash_karp;
pub mod euler;
pub mod rk4;
pub mod simulation;

pub use cash_karp::CashKarp54;
pub use euler::Euler;
pub use ode::{IntegrationError, OdeIntegrator};
pub use rk4::Rk4;
pub use simulation::{Simulation, simulate};
