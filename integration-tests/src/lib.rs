//! Shared helpers for the cross-crate tests.

use contagion_models::seir::{InfectionState, Model, Parameters, Populations};
use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber filtered by `RUST_LOG`, defaulting to
/// warnings.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// A SEIR outbreak in a population of 1 061 000 with a contact damping on
/// day 12.5.
#[must_use]
pub fn damped_outbreak() -> Model {
    let mut populations = Populations::default();
    populations[InfectionState::Exposed] = 10_000.0;
    populations[InfectionState::Infected] = 1_000.0;
    populations[InfectionState::Recovered] = 1_000.0;
    populations.set_difference_from_total(InfectionState::Susceptible, 1_061_000.0);

    let mut parameters = Parameters {
        time_exposed: 5.2,
        time_infected: 2.0,
        transmission_probability_on_contact: 1.0,
        ..Parameters::default()
    };
    parameters.contact_patterns.set_baseline(2.7);
    parameters.contact_patterns.add_damping(0.6, 12.5);

    Model::new(populations, parameters)
}

/// A small SEIR outbreak in a population of 8600.
#[must_use]
pub fn small_outbreak() -> Model {
    Model::new(
        Populations::new([8000.0, 300.0, 200.0, 100.0]),
        Parameters::default(),
    )
}
