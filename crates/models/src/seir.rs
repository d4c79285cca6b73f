//! A single-population SEIR model.
//!
//! People move through four compartments along three transitions:
//!
//! ```text
//! Susceptible --r0--> Exposed --r1--> Infected --r2--> Recovered
//! ```
//!
//! with rates
//!
//! ```text
//! r0 = c(t) * ρ / N * S * I
//! r1 = E / T_E
//! r2 = I / T_I
//! ```
//!
//! where `c(t)` is the damped contact rate, `ρ` the transmission probability
//! on contact, and `N` the total population of the model. The population is
//! closed, so the compartments always sum to `N`.
//!
//! Besides the deterministic right-hand side, [`Model`] provides the drift and
//! noise correlation of the linear noise approximation of the underlying
//! stochastic process.

mod contact;
mod error;
mod infection_state;
mod parameters;
mod populations;


pub use contact::{ContactPatterns, Damping};
pub use error::ConstraintError;
pub use infection_state::InfectionState;
pub use parameters::{Parameters, TIME_MIN};
pub use populations::Populations;

use contagion_core::{CompartmentModel, StochasticModel, TimeSeries, TimeSeriesError};
use nalgebra::{DMatrix, DVector};

use InfectionState::{Exposed, Infected, Recovered, Susceptible};

/// The `(from, to)` compartments of each transition, in rate order.
const TRANSITIONS: [(InfectionState, InfectionState); 3] = [
    (Susceptible, Exposed),
    (Exposed, Infected),
    (Infected, Recovered),
];

/// The SEIR model: initial populations and epidemiological parameters.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Model {
    pub populations: Populations,
    pub parameters: Parameters,
}

impl Model {
    #[must_use]
    pub fn new(populations: Populations, parameters: Parameters) -> Self {
        Self {
            populations,
            parameters,
        }
    }

    /// Returns `c(t)·ρ/N`, or zero for an empty population.
    fn infection_coefficient(&self, t: f64) -> f64 {
        let total = self.populations.total();
        if total > 0.0 {
            self.parameters.contact_patterns.contact_rate_at(t)
                * self.parameters.transmission_probability_on_contact
                / total
        } else {
            0.0
        }
    }

    /// Returns the rate of each transition.
    ///
    /// New infections are driven by the infectious people in `pop`.
    fn transition_rates(&self, pop: &DVector<f64>, y: &DVector<f64>, t: f64) -> [f64; 3] {
        let params = &self.parameters;
        [
            self.infection_coefficient(t) * y[Susceptible.index()] * pop[Infected.index()],
            y[Exposed.index()] / params.time_exposed,
            y[Infected.index()] / params.time_infected,
        ]
    }

    /// Returns the gradient of each transition rate with respect to the state.
    fn rate_gradients(&self, y: &DVector<f64>, t: f64) -> [[f64; InfectionState::COUNT]; 3] {
        let params = &self.parameters;
        let coefficient = self.infection_coefficient(t);

        let mut gradients = [[0.0; InfectionState::COUNT]; 3];
        gradients[0][Susceptible.index()] = coefficient * y[Infected.index()];
        gradients[0][Infected.index()] = coefficient * y[Susceptible.index()];
        gradients[1][Exposed.index()] = 1.0 / params.time_exposed;
        gradients[2][Infected.index()] = 1.0 / params.time_infected;
        gradients
    }

    /// Returns the effective reproduction number at the `index`-th point of a
    /// simulation result.
    ///
    /// ```text
    /// R_t = S(t) * T_I * c(t) * ρ / N
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::IndexOutOfRange`] for an invalid index.
    pub fn reproduction_number(&self, index: usize, ts: &TimeSeries) -> Result<f64, TimeSeriesError> {
        let t = ts.get_time(index)?;
        let value = ts.get_value(index)?;
        Ok(self.reproduction_number_of(t, value))
    }

    /// Returns the effective reproduction number at time `t`, linearly
    /// interpolated between the bracketing points of a simulation result.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::Empty`] for an empty result and
    /// [`TimeSeriesError::OutOfRange`] if `t` lies outside its time span.
    pub fn reproduction_number_at(&self, t: f64, ts: &TimeSeries) -> Result<f64, TimeSeriesError> {
        let times = ts.get_times();
        let (Some(&first), Some(&last)) = (times.first(), times.last()) else {
            return Err(TimeSeriesError::Empty);
        };
        if !(first..=last).contains(&t) {
            return Err(TimeSeriesError::OutOfRange {
                time: t,
                first,
                last,
            });
        }
        if t == first {
            return self.reproduction_number(0, ts);
        }

        // first < t <= last, so 1 <= hi <= len - 1.
        let hi = times.partition_point(|&time| time < t);
        let r_hi = self.reproduction_number(hi, ts)?;
        if times[hi] == t {
            return Ok(r_hi);
        }

        let lo = hi - 1;
        let r_lo = self.reproduction_number(lo, ts)?;
        let weight = (t - times[lo]) / (times[hi] - times[lo]);

        Ok(r_lo + weight * (r_hi - r_lo))
    }

    /// Returns the effective reproduction number at every point of a
    /// simulation result.
    #[must_use]
    pub fn reproduction_numbers(&self, ts: &TimeSeries) -> Vec<f64> {
        ts.iter()
            .map(|(t, value)| self.reproduction_number_of(t, value))
            .collect()
    }

    fn reproduction_number_of(&self, t: f64, value: &DVector<f64>) -> f64 {
        value[Susceptible.index()] * self.parameters.time_infected * self.infection_coefficient(t)
    }
}

impl CompartmentModel for Model {
    type Error = ConstraintError;

    fn num_compartments(&self) -> usize {
        InfectionState::COUNT
    }

    fn initial_values(&self) -> DVector<f64> {
        self.populations.to_vector()
    }

    fn eval_right_hand_side(
        &self,
        pop: &DVector<f64>,
        y: &DVector<f64>,
        t: f64,
        dydt: &mut DVector<f64>,
    ) {
        dydt.fill(0.0);
        for ((from, to), rate) in TRANSITIONS.into_iter().zip(self.transition_rates(pop, y, t)) {
            dydt[from.index()] -= rate;
            dydt[to.index()] += rate;
        }
    }

    fn check_constraints(&self) -> Result<(), Self::Error> {
        self.populations.check_constraints()?;
        self.parameters.check_constraints()
    }
}

impl StochasticModel for Model {
    fn drift(&self, _pop: &DVector<f64>, y: &DVector<f64>, t: f64, drift: &mut DMatrix<f64>) {
        drift.fill(0.0);
        for ((from, to), gradient) in TRANSITIONS.into_iter().zip(self.rate_gradients(y, t)) {
            for (column, partial) in gradient.into_iter().enumerate() {
                drift[(from.index(), column)] -= partial;
                drift[(to.index(), column)] += partial;
            }
        }
    }

    fn noise_correlation(
        &self,
        pop: &DVector<f64>,
        y: &DVector<f64>,
        t: f64,
        noise: &mut DMatrix<f64>,
    ) {
        noise.fill(0.0);
        for ((from, to), rate) in TRANSITIONS.into_iter().zip(self.transition_rates(pop, y, t)) {
            let (from, to) = (from.index(), to.index());
            noise[(from, from)] += rate;
            noise[(to, to)] += rate;
            noise[(from, to)] -= rate;
            noise[(to, from)] -= rate;
        }
    }
}
