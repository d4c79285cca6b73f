use thiserror::Error;

use super::InfectionState;

/// A violated constraint of the SEIR model.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConstraintError {
    #[error("{state:?} population is {value}, must be non-negative")]
    NegativePopulation { state: InfectionState, value: f64 },

    #[error("time_exposed is {value}, must be at least {min}")]
    TimeExposed { value: f64, min: f64 },

    #[error("time_infected is {value}, must be at least {min}")]
    TimeInfected { value: f64, min: f64 },

    #[error("transmission_probability_on_contact is {value}, must be within [0, 1]")]
    TransmissionProbability { value: f64 },
}
