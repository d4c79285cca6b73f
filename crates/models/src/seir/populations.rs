use std::ops::{Index, IndexMut};

use nalgebra::DVector;

use super::{ConstraintError, InfectionState};

/// The number of people in each compartment.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Populations {
    compartments: [f64; InfectionState::COUNT],
}

impl Populations {
    /// Creates populations from counts in compartment order.
    #[must_use]
    pub fn new(compartments: [f64; InfectionState::COUNT]) -> Self {
        Self { compartments }
    }

    /// Returns the total number of people.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.compartments.iter().sum()
    }

    /// Sets `state` so that the compartments add up to `total`.
    pub fn set_difference_from_total(&mut self, state: InfectionState, total: f64) {
        let others: f64 = InfectionState::ALL
            .iter()
            .filter(|&&other| other != state)
            .map(|&other| self[other])
            .sum();
        self[state] = total - others;
    }

    /// Returns the counts in compartment order.
    #[must_use]
    pub fn as_array(&self) -> &[f64; InfectionState::COUNT] {
        &self.compartments
    }

    /// Returns the counts as a state vector.
    #[must_use]
    pub fn to_vector(&self) -> DVector<f64> {
        DVector::from_column_slice(&self.compartments)
    }

    /// Checks that no compartment is negative.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::NegativePopulation`] for the first negative
    /// compartment.
    pub fn check_constraints(&self) -> Result<(), ConstraintError> {
        for state in InfectionState::ALL {
            let value = self[state];
            if value < 0.0 {
                tracing::warn!(?state, value, "negative population");
                return Err(ConstraintError::NegativePopulation { state, value });
            }
        }
        Ok(())
    }

    /// Sets negative compartments to zero.
    ///
    /// Returns `true` if any compartment was changed.
    pub fn apply_constraints(&mut self) -> bool {
        let mut corrected = false;
        for state in InfectionState::ALL {
            let value = self[state];
            if value < 0.0 {
                tracing::warn!(?state, value, "negative population set to zero");
                self[state] = 0.0;
                corrected = true;
            }
        }
        corrected
    }
}

impl Index<InfectionState> for Populations {
    type Output = f64;

    fn index(&self, state: InfectionState) -> &f64 {
        &self.compartments[state.index()]
    }
}

impl IndexMut<InfectionState> for Populations {
    fn index_mut(&mut self, state: InfectionState) -> &mut f64 {
        &mut self.compartments[state.index()]
    }
}
