use super::{ConstraintError, ContactPatterns};

/// Lower bound for the mean stay in the exposed and infected compartments.
pub const TIME_MIN: f64 = 0.1;

/// Epidemiological parameters of the SEIR model.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameters {
    /// Mean time in days spent exposed before becoming infectious.
    pub time_exposed: f64,

    /// Mean time in days spent infectious.
    pub time_infected: f64,

    /// Probability that a contact between a susceptible and an infectious
    /// person transmits the disease.
    pub transmission_probability_on_contact: f64,

    /// Daily contacts per person.
    pub contact_patterns: ContactPatterns,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            time_exposed: 5.2,
            time_infected: 6.0,
            transmission_probability_on_contact: 1.0,
            contact_patterns: ContactPatterns::default(),
        }
    }
}

impl Parameters {
    /// Checks that all parameters are within their valid ranges.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn check_constraints(&self) -> Result<(), ConstraintError> {
        if self.time_exposed < TIME_MIN {
            tracing::warn!(value = self.time_exposed, min = TIME_MIN, "time_exposed too small");
            return Err(ConstraintError::TimeExposed {
                value: self.time_exposed,
                min: TIME_MIN,
            });
        }
        if self.time_infected < TIME_MIN {
            tracing::warn!(value = self.time_infected, min = TIME_MIN, "time_infected too small");
            return Err(ConstraintError::TimeInfected {
                value: self.time_infected,
                min: TIME_MIN,
            });
        }

        let probability = self.transmission_probability_on_contact;
        if !(0.0..=1.0).contains(&probability) {
            tracing::warn!(value = probability, "transmission probability out of range");
            return Err(ConstraintError::TransmissionProbability { value: probability });
        }

        Ok(())
    }

    /// Moves out-of-range parameters to the nearest valid value.
    ///
    /// Returns `true` if any parameter was changed.
    pub fn apply_constraints(&mut self) -> bool {
        let mut corrected = false;

        if self.time_exposed < TIME_MIN {
            tracing::warn!(value = self.time_exposed, "time_exposed set to {TIME_MIN}");
            self.time_exposed = TIME_MIN;
            corrected = true;
        }
        if self.time_infected < TIME_MIN {
            tracing::warn!(value = self.time_infected, "time_infected set to {TIME_MIN}");
            self.time_infected = TIME_MIN;
            corrected = true;
        }

        let probability = self.transmission_probability_on_contact;
        if !(0.0..=1.0).contains(&probability) {
            let clamped = probability.clamp(0.0, 1.0);
            tracing::warn!(value = probability, "transmission probability set to {clamped}");
            self.transmission_probability_on_contact = clamped;
            corrected = true;
        }

        corrected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Parameters {
        Parameters {
            time_exposed: 5.2,
            time_infected: 6.0,
            transmission_probability_on_contact: 0.04,
            contact_patterns: ContactPatterns::new(10.0),
        }
    }

    #[test]
    fn valid_parameters_pass() {
        assert!(valid().check_constraints().is_ok());
        assert!(Parameters::default().check_constraints().is_ok());
    }

    #[test]
    fn each_violation_is_reported() {
        let mut params = valid();
        params.time_exposed = -5.2;
        assert!(matches!(
            params.check_constraints(),
            Err(ConstraintError::TimeExposed { .. })
        ));

        let mut params = valid();
        params.time_infected = 0.0;
        assert!(matches!(
            params.check_constraints(),
            Err(ConstraintError::TimeInfected { .. })
        ));

        let mut params = valid();
        params.transmission_probability_on_contact = 10.0;
        assert_eq!(
            params.check_constraints(),
            Err(ConstraintError::TransmissionProbability { value: 10.0 })
        );
    }

    #[test]
    fn apply_constraints_corrects_in_place() {
        let mut params = valid();
        params.time_exposed = 0.0;
        params.transmission_probability_on_contact = -0.5;

        assert!(params.apply_constraints());
        assert_eq!(params.time_exposed, TIME_MIN);
        assert_eq!(params.transmission_probability_on_contact, 0.0);
        assert!(params.check_constraints().is_ok());

        assert!(!params.apply_constraints());
    }
}
