use thiserror::Error;

/// Errors returned when reading from or interpolating a [`TimeSeries`].
///
/// [`TimeSeries`]: super::TimeSeries
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum TimeSeriesError {
    #[error("time {time} is outside the stored range [{first}, {last}]")]
    OutOfRange { time: f64, first: f64, last: f64 },

    #[error("index {index} is out of range for a series with {len} time points")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("expected a value with {expected} elements, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("time series has no time points")]
    Empty,
}
