/// The compartments of the SEIR model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InfectionState {
    Susceptible,
    Exposed,
    Infected,
    Recovered,
}

impl InfectionState {
    /// The number of compartments.
    pub const COUNT: usize = 4;

    /// Every state in compartment order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Susceptible,
        Self::Exposed,
        Self::Infected,
        Self::Recovered,
    ];

    /// Returns the position of this state in a state vector.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}
