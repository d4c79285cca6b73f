//! Time-indexed simulation results.
//!
//! A [`TimeSeries`] is the sole data structure exchanged between integrators,
//! simulations, and likelihood estimators. It stores an ordered sequence of
//! `(time, value)` pairs where every value has the same dimension, declared
//! when the series is created.
//!
//! The series is append-only: [`TimeSeries::add_time_point`] pushes a new
//! zero-filled value and hands back a mutable view so the caller can fill it
//! in place. The view cannot be replaced by a vector of another length, so
//! every stored value keeps the declared dimension. Entries are never removed.

mod error;
mod interpolate;

pub use error::TimeSeriesError;
pub use interpolate::{TIME_TOLERANCE, interpolate, interpolate_at, interpolate_at_days};

use nalgebra::{DVector, DVectorViewMut};

/// An ordered, append-only sequence of `(time, value)` samples.
///
/// # Invariants
///
/// - Every value has exactly [`TimeSeries::get_num_elements`] entries.
/// - Times are strictly increasing in insertion order. This is a caller
///   precondition of [`TimeSeries::add_time_point`] and is not checked.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSeries {
    num_elements: usize,
    times: Vec<f64>,
    values: Vec<DVector<f64>>,
}

impl TimeSeries {
    /// Creates an empty series whose values have `num_elements` entries.
    #[must_use]
    pub fn new(num_elements: usize) -> Self {
        Self {
            num_elements,
            times: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates an empty series with room for `capacity` time points.
    #[must_use]
    pub fn with_capacity(num_elements: usize, capacity: usize) -> Self {
        Self {
            num_elements,
            times: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Creates a series holding a single initial sample.
    ///
    /// The dimension of the series is taken from `value`.
    #[must_use]
    pub fn from_initial(t: f64, value: DVector<f64>) -> Self {
        Self {
            num_elements: value.len(),
            times: vec![t],
            values: vec![value],
        }
    }

    /// Reserves capacity for at least `additional` more time points.
    pub fn reserve(&mut self, additional: usize) {
        self.times.reserve(additional);
        self.values.reserve(additional);
    }

    /// Appends a time point and returns a view of its zero-filled value for
    /// the caller to fill.
    ///
    /// `t` must be greater than the current last time. Violating this breaks
    /// interpolation and is not detected here.
    pub fn add_time_point(&mut self, t: f64) -> DVectorViewMut<'_, f64> {
        let num_elements = self.num_elements;
        self.times.push(t);
        self.values.push(DVector::zeros(num_elements));
        let last = self.values.len() - 1;
        self.values[last].rows_mut(0, num_elements)
    }

    /// Appends a time point with a known value.
    ///
    /// The same ordering precondition as [`TimeSeries::add_time_point`] applies.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::DimensionMismatch`] if `value` does not have
    /// [`TimeSeries::get_num_elements`] entries.
    pub fn add_time_point_with(
        &mut self,
        t: f64,
        value: DVector<f64>,
    ) -> Result<DVectorViewMut<'_, f64>, TimeSeriesError> {
        if value.len() != self.num_elements {
            return Err(TimeSeriesError::DimensionMismatch {
                expected: self.num_elements,
                found: value.len(),
            });
        }

        self.times.push(t);
        self.values.push(value);
        let last = self.values.len() - 1;
        Ok(self.values[last].rows_mut(0, self.num_elements))
    }

    /// Returns the number of stored time points.
    #[must_use]
    pub fn get_num_time_points(&self) -> usize {
        self.times.len()
    }

    /// Returns the dimension of every stored value.
    #[must_use]
    pub fn get_num_elements(&self) -> usize {
        self.num_elements
    }

    /// Returns `true` if no time points have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Returns the time of the `index`-th sample.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::IndexOutOfRange`] for an invalid index.
    pub fn get_time(&self, index: usize) -> Result<f64, TimeSeriesError> {
        self.times
            .get(index)
            .copied()
            .ok_or(TimeSeriesError::IndexOutOfRange {
                index,
                len: self.times.len(),
            })
    }

    /// Returns the value of the `index`-th sample.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::IndexOutOfRange`] for an invalid index.
    pub fn get_value(&self, index: usize) -> Result<&DVector<f64>, TimeSeriesError> {
        let len = self.values.len();
        self.values
            .get(index)
            .ok_or(TimeSeriesError::IndexOutOfRange { index, len })
    }

    /// Returns a mutable reference to the value of the `index`-th sample.
    ///
    /// # Errors
    ///
    /// Returns [`TimeSeriesError::IndexOutOfRange`] for an invalid index.
    pub fn get_value_mut(&mut self, index: usize) -> Result<&mut DVector<f64>, TimeSeriesError> {
        let len = self.values.len();
        self.values
            .get_mut(index)
            .ok_or(TimeSeriesError::IndexOutOfRange { index, len })
    }

    /// Returns the most recent time, or `None` if the series is empty.
    #[must_use]
    pub fn get_last_time(&self) -> Option<f64> {
        self.times.last().copied()
    }

    /// Returns the most recent value, or `None` if the series is empty.
    #[must_use]
    pub fn get_last_value(&self) -> Option<&DVector<f64>> {
        self.values.last()
    }

    /// Returns all stored times in insertion order.
    #[must_use]
    pub fn get_times(&self) -> &[f64] {
        &self.times
    }

    /// Returns all stored values in insertion order.
    #[must_use]
    pub fn get_values(&self) -> &[DVector<f64>] {
        &self.values
    }

    /// Returns an iterator over `(time, value)` pairs.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (f64, &DVector<f64>)> {
        self.times.iter().copied().zip(self.values.iter())
    }
}
