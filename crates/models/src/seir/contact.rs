use std::f64::consts::PI;

/// Duration in days over which a damping takes full effect.
const RAMP_DURATION: f64 = 1.0;

/// A reduction of contacts starting at `time`.
///
/// `level` is the fraction of the way from the baseline to the minimum
/// contact rate, so `0.0` leaves contacts unchanged and `1.0` reduces them to
/// the minimum.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Damping {
    pub level: f64,
    pub time: f64,
}

/// Daily contact rate of a single population, reduced over time by dampings.
///
/// Each damping moves the damping coefficient `d` from its current value to
/// the damping's level along a cosine ramp lasting one day. The effective
/// contact rate is
///
/// ```text
/// c(t) = baseline - d(t) * (baseline - minimum)
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContactPatterns {
    baseline: f64,
    minimum: f64,
    dampings: Vec<Damping>,
}

impl Default for ContactPatterns {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl ContactPatterns {
    /// Creates contact patterns with the given baseline rate and a minimum of
    /// zero.
    #[must_use]
    pub fn new(baseline: f64) -> Self {
        Self {
            baseline,
            minimum: 0.0,
            dampings: Vec::new(),
        }
    }

    #[must_use]
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    pub fn set_baseline(&mut self, baseline: f64) {
        self.baseline = baseline;
    }

    #[must_use]
    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn set_minimum(&mut self, minimum: f64) {
        self.minimum = minimum;
    }

    /// Returns the dampings ordered by start time.
    #[must_use]
    pub fn dampings(&self) -> &[Damping] {
        &self.dampings
    }

    /// Adds a damping reaching `level` one day after `time`.
    ///
    /// Dampings are kept ordered by time. A damping added at the same time as
    /// an existing one takes effect after it.
    pub fn add_damping(&mut self, level: f64, time: f64) {
        let position = self.dampings.partition_point(|damping| damping.time <= time);
        self.dampings.insert(position, Damping { level, time });
    }

    pub fn clear_dampings(&mut self) {
        self.dampings.clear();
    }

    /// Returns the damping coefficient `d(t)`.
    #[must_use]
    pub fn damping_at(&self, t: f64) -> f64 {
        let mut active: Option<(f64, &Damping)> = None;

        for damping in self.dampings.iter().take_while(|damping| damping.time <= t) {
            let from = active.map_or(0.0, |(from, previous)| ramp(from, previous, damping.time));
            active = Some((from, damping));
        }

        active.map_or(0.0, |(from, damping)| ramp(from, damping, t))
    }

    /// Returns the effective contact rate `c(t)`.
    #[must_use]
    pub fn contact_rate_at(&self, t: f64) -> f64 {
        self.baseline - self.damping_at(t) * (self.baseline - self.minimum)
    }
}

/// Value of a damping's ramp at `t`, starting from `from` at the damping time.
fn ramp(from: f64, damping: &Damping, t: f64) -> f64 {
    let progress = ((t - damping.time) / RAMP_DURATION).clamp(0.0, 1.0);
    from + (damping.level - from) * (1.0 - (PI * progress).cos()) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn undamped_rate_is_the_baseline() {
        let contacts = ContactPatterns::new(2.7);

        assert_eq!(contacts.contact_rate_at(0.0), 2.7);
        assert_eq!(contacts.contact_rate_at(100.0), 2.7);
    }

    #[test]
    fn damping_ramps_over_one_day() {
        let mut contacts = ContactPatterns::new(2.0);
        contacts.set_minimum(0.5);
        contacts.add_damping(0.6, 12.5);

        assert_eq!(contacts.damping_at(12.0), 0.0);
        assert_eq!(contacts.damping_at(12.5), 0.0);
        assert_relative_eq!(contacts.damping_at(13.0), 0.3, epsilon = 1e-15);
        assert_relative_eq!(contacts.damping_at(13.5), 0.6);
        assert_relative_eq!(contacts.damping_at(40.0), 0.6);

        // 2.0 - 0.6 * (2.0 - 0.5)
        assert_relative_eq!(contacts.contact_rate_at(20.0), 1.1, epsilon = 1e-15);
    }

    #[test]
    fn later_damping_starts_from_the_current_coefficient() {
        let mut contacts = ContactPatterns::new(1.0);
        contacts.add_damping(0.2, 10.0);
        contacts.add_damping(0.8, 5.0);

        assert_eq!(contacts.dampings()[0].time, 5.0);
        assert_relative_eq!(contacts.damping_at(9.0), 0.8);
        assert_relative_eq!(contacts.damping_at(10.5), 0.5, epsilon = 1e-15);
        assert_relative_eq!(contacts.damping_at(11.0), 0.2, epsilon = 1e-15);
        assert_relative_eq!(contacts.contact_rate_at(11.0), 0.8, epsilon = 1e-15);
    }

    #[test]
    fn overlapping_ramps_are_continuous() {
        let mut contacts = ContactPatterns::new(1.0);
        contacts.add_damping(1.0, 0.0);
        contacts.add_damping(0.0, 0.5);

        // The second ramp starts where the first had reached.
        let at_switch = contacts.damping_at(0.5);
        assert_relative_eq!(at_switch, 0.5, epsilon = 1e-15);
        assert_relative_eq!(contacts.damping_at(0.5 + 1e-9), at_switch, epsilon = 1e-6);
        assert_relative_eq!(contacts.damping_at(1.5), 0.0);
    }
}
