use nalgebra::DVector;

use super::{TimeSeries, TimeSeriesError};

/// Absolute slack allowed when a query lands just past either end of a series.
///
/// Integrating towards a target time accumulates rounding error in the stored
/// times, so the last stored time may sit a few ulps short of the requested
/// target. Queries within this distance of an end resolve to that end's value.
pub const TIME_TOLERANCE: f64 = 1e-10;

/// Linearly interpolates `ts` at time `t`.
///
/// If `t` equals a stored time the stored value is returned unchanged.
/// Otherwise the bracketing pair `t_lo < t < t_hi` is found by binary search
/// and the component-wise blend
///
/// ```text
/// y_lo + (t - t_lo) / (t_hi - t_lo) * (y_hi - y_lo)
/// ```
///
/// is returned.
///
/// # Errors
///
/// - [`TimeSeriesError::Empty`] if `ts` has no time points.
/// - [`TimeSeriesError::OutOfRange`] if `t` lies outside `[t_0, t_last]`
///   (beyond [`TIME_TOLERANCE`]) or is NaN. Values are never extrapolated.
pub fn interpolate(ts: &TimeSeries, t: f64) -> Result<DVector<f64>, TimeSeriesError> {
    let times = ts.get_times();
    let values = ts.get_values();

    let (Some(&first), Some(&last)) = (times.first(), times.last()) else {
        return Err(TimeSeriesError::Empty);
    };

    let in_range = t >= first - TIME_TOLERANCE && t <= last + TIME_TOLERANCE;
    if !in_range {
        return Err(TimeSeriesError::OutOfRange { time: t, first, last });
    }

    if t <= first {
        return Ok(values[0].clone());
    }
    if t >= last {
        return Ok(values[values.len() - 1].clone());
    }

    // first < t < last, so 1 <= hi <= len - 1.
    let hi = times.partition_point(|&time| time < t);
    if times[hi] == t {
        return Ok(values[hi].clone());
    }

    let lo = hi - 1;
    let weight = (t - times[lo]) / (times[hi] - times[lo]);

    Ok(&values[lo] + (&values[hi] - &values[lo]) * weight)
}

/// Interpolates `ts` at each of `times`, collecting the results into a new
/// series.
///
/// `times` must be increasing for the result to satisfy the [`TimeSeries`]
/// ordering precondition.
///
/// # Errors
///
/// Returns the first error produced by [`interpolate`].
pub fn interpolate_at(ts: &TimeSeries, times: &[f64]) -> Result<TimeSeries, TimeSeriesError> {
    let mut result = TimeSeries::with_capacity(ts.get_num_elements(), times.len());
    for &t in times {
        result.add_time_point_with(t, interpolate(ts, t)?)?;
    }
    Ok(result)
}

/// Interpolates `ts` at every whole day it covers.
///
/// The result holds one time point for each integer `d` with
/// `t_0 <= d <= t_last` (up to [`TIME_TOLERANCE`]), which is the usual way
/// to compare adaptive-step simulation output against daily reported data.
///
/// # Errors
///
/// Returns [`TimeSeriesError::Empty`] if `ts` has no time points.
pub fn interpolate_at_days(ts: &TimeSeries) -> Result<TimeSeries, TimeSeriesError> {
    let (Some(&first), Some(last)) = (ts.get_times().first(), ts.get_last_time()) else {
        return Err(TimeSeriesError::Empty);
    };

    let first_day = (first - TIME_TOLERANCE).ceil();
    let last_day = (last + TIME_TOLERANCE).floor();

    let days: Vec<f64> = std::iter::successors(Some(first_day), |day| Some(day + 1.0))
        .take_while(|&day| day <= last_day)
        .collect();

    interpolate_at(ts, &days)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn series() -> TimeSeries {
        let mut ts = TimeSeries::new(2);
        ts.add_time_point(0.0).copy_from_slice(&[0.0, 10.0]);
        ts.add_time_point(0.5).copy_from_slice(&[1.0, 8.0]);
        ts.add_time_point(2.0).copy_from_slice(&[4.0, 2.0]);
        ts.add_time_point(3.25).copy_from_slice(&[-1.0, 0.0]);
        ts
    }

    #[test]
    fn stored_times_return_stored_values() {
        let ts = series();

        for (t, value) in ts.iter() {
            assert_eq!(&interpolate(&ts, t).unwrap(), value);
        }
    }

    #[test]
    fn midpoint_is_the_mean_of_neighbours() {
        let ts = series();

        let mid = interpolate(&ts, 1.25).unwrap();

        assert_relative_eq!(mid[0], 2.5);
        assert_relative_eq!(mid[1], 5.0);
    }

    #[test]
    fn interior_point_blends_linearly() {
        let ts = series();

        // A quarter of the way from t=2.0 to t=3.25.
        let value = interpolate(&ts, 2.3125).unwrap();

        assert_relative_eq!(value[0], 2.75);
        assert_relative_eq!(value[1], 1.5);
    }

    #[test]
    fn outside_the_span_is_out_of_range() {
        let ts = series();

        assert_eq!(
            interpolate(&ts, -0.1),
            Err(TimeSeriesError::OutOfRange {
                time: -0.1,
                first: 0.0,
                last: 3.25
            })
        );
        assert!(matches!(
            interpolate(&ts, 3.5),
            Err(TimeSeriesError::OutOfRange { .. })
        ));
        assert!(matches!(
            interpolate(&ts, f64::NAN),
            Err(TimeSeriesError::OutOfRange { .. })
        ));
    }

    #[test]
    fn rounding_slack_at_the_ends_resolves_to_end_values() {
        let mut ts = TimeSeries::new(1);
        ts.add_time_point(0.0)[0] = 1.0;
        ts.add_time_point(0.999_999_999_999_999_9)[0] = 3.0;

        assert_eq!(interpolate(&ts, 1.0).unwrap()[0], 3.0);
        assert_eq!(interpolate(&ts, -1e-12).unwrap()[0], 1.0);
    }

    #[test]
    fn empty_series_cannot_be_interpolated() {
        let ts = TimeSeries::new(2);

        assert_eq!(interpolate(&ts, 0.0), Err(TimeSeriesError::Empty));
        assert_eq!(interpolate_at_days(&ts), Err(TimeSeriesError::Empty));
    }

    #[test]
    fn interpolate_at_collects_requested_times() {
        let ts = series();

        let result = interpolate_at(&ts, &[0.25, 2.0, 3.0]).unwrap();

        assert_eq!(result.get_times(), &[0.25, 2.0, 3.0]);
        assert_eq!(result.get_num_elements(), ts.get_num_elements());
        assert_relative_eq!(result.get_value(0).unwrap()[0], 0.5, epsilon = 1e-12);
        assert_eq!(result.get_value(1).unwrap(), ts.get_value(2).unwrap());
        assert_relative_eq!(result.get_value(2).unwrap()[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn interpolate_at_days_covers_whole_days() {
        let mut ts = TimeSeries::new(1);
        ts.add_time_point(0.4)[0] = 0.4;
        ts.add_time_point(1.7)[0] = 1.7;
        ts.add_time_point(3.0)[0] = 3.0;

        let daily = interpolate_at_days(&ts).unwrap();

        assert_eq!(daily.get_times(), &[1.0, 2.0, 3.0]);
        assert_relative_eq!(daily.get_value(0).unwrap()[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(daily.get_value(1).unwrap()[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(daily.get_value(2).unwrap()[0], 3.0, epsilon = 1e-12);
    }
}
