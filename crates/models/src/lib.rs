//! Compartment models for the contagion framework.
//!
//! - [`seir`] — a single-population SEIR model with damped contact patterns
//!   and a linear noise approximation

pub mod seir;
