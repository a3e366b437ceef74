//! Directional survey processing
//!
//! Converts raw survey measurements (measured depth, inclination, azimuth)
//! into 3D wellbore trajectories:
//!
//! - `minimum_curvature` - per-interval displacement via the minimum-curvature method
//! - `resample` - cumulative trajectory resampled onto a regular depth grid
//! - `table` - named-column tabular survey input (in-memory or delimited text)
//!
//! All validation happens at the API boundary before any computation starts.
//! Degenerate geometry (zero-length intervals, single-station surveys) is
//! handled by defined fallbacks, never raised as errors.

pub mod minimum_curvature;
pub mod resample;
pub mod table;

pub use minimum_curvature::{direction_vector, MinimumCurvature};
pub use resample::resample;
pub use table::SurveyTable;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while validating or processing survey input.
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("survey columns have mismatched lengths: md={md}, inc={inc}, azi={azi}")]
    MismatchedLengths { md: usize, inc: usize, azi: usize },

    #[error("measured depth must be strictly increasing (station {index}: {previous} -> {current})")]
    NonMonotonicDepth {
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("measured depth must be non-negative (station {index}: {value})")]
    NegativeDepth { index: usize, value: f64 },

    #[error("inclination must lie in [0, 180] degrees (station {index}: {value})")]
    InclinationOutOfRange { index: usize, value: f64 },

    #[error("azimuth must lie in [0, 360) degrees (station {index}: {value})")]
    AzimuthOutOfRange { index: usize, value: f64 },

    #[error("survey value is not finite ({column}, station {index})")]
    NonFiniteValue { column: &'static str, index: usize },

    #[error("resampling step must be a positive finite number, got {0}")]
    InvalidStep(f64),

    #[error("column '{0}' is not present in the survey table")]
    MissingColumn(String),

    #[error("failed to parse '{value}' as a number (line {line}, column '{column}')")]
    BadNumber {
        line: usize,
        column: String,
        value: String,
    },

    #[error("row on line {line} has {got} fields, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("delimited input contains no header row")]
    EmptyInput,
}

/// One raw directional-survey measurement.
///
/// Angles are in degrees: inclination from true vertical, azimuth clockwise
/// from north.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurveyStation {
    /// Measured depth along the wellbore
    pub md: f64,
    /// Inclination from vertical (degrees, 0 = vertical)
    pub inc: f64,
    /// Azimuth clockwise from north (degrees)
    pub azi: f64,
}

impl SurveyStation {
    pub fn new(md: f64, inc: f64, azi: f64) -> Self {
        Self { md, inc, azi }
    }
}

/// Incremental 3D displacement over one survey interval.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IntervalDelta {
    pub d_northing: f64,
    pub d_easting: f64,
    pub d_tvd: f64,
}

/// One resampled trajectory sample, relative to the survey's depth-zero point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    /// Depth along the wellbore (regular grid)
    pub md: f64,
    /// True vertical depth below the surface reference point
    pub tvd: f64,
    /// Horizontal displacement north of the surface reference point
    pub northing: f64,
    /// Horizontal displacement east of the surface reference point
    pub easting: f64,
}

/// Survey-to-displacement solver capability.
///
/// The minimum-curvature method is the provided implementation; tests can
/// substitute simpler solvers (e.g. straight-line tangent) through this seam.
pub trait SurveySolver {
    /// Compute per-interval displacements for an already-validated station
    /// sequence. A single-station survey yields an empty list.
    fn interval_deltas(&self, stations: &[SurveyStation]) -> Vec<IntervalDelta>;
}

// ============================================================================
// Input Validation
// ============================================================================

/// Validate a station sequence before any computation.
///
/// Checks monotonic depth, angle ranges, and finiteness. Runs in full before
/// the first interval is computed so construction is all-or-nothing.
pub fn validate_stations(stations: &[SurveyStation]) -> Result<(), SurveyError> {
    for (index, station) in stations.iter().enumerate() {
        if !station.md.is_finite() {
            return Err(SurveyError::NonFiniteValue { column: "md", index });
        }
        if !station.inc.is_finite() {
            return Err(SurveyError::NonFiniteValue { column: "inc", index });
        }
        if !station.azi.is_finite() {
            return Err(SurveyError::NonFiniteValue { column: "azi", index });
        }
        if station.md < 0.0 {
            return Err(SurveyError::NegativeDepth {
                index,
                value: station.md,
            });
        }
        if !(0.0..=180.0).contains(&station.inc) {
            return Err(SurveyError::InclinationOutOfRange {
                index,
                value: station.inc,
            });
        }
        if !(0.0..360.0).contains(&station.azi) {
            return Err(SurveyError::AzimuthOutOfRange {
                index,
                value: station.azi,
            });
        }
        if index > 0 {
            let previous = stations[index - 1].md;
            if station.md <= previous {
                return Err(SurveyError::NonMonotonicDepth {
                    index,
                    previous,
                    current: station.md,
                });
            }
        }
    }
    Ok(())
}

/// Build stations from parallel columns, validating lengths first.
pub fn stations_from_columns(
    md: &[f64],
    inc: &[f64],
    azi: &[f64],
) -> Result<Vec<SurveyStation>, SurveyError> {
    if md.len() != inc.len() || md.len() != azi.len() {
        return Err(SurveyError::MismatchedLengths {
            md: md.len(),
            inc: inc.len(),
            azi: azi.len(),
        });
    }

    let stations: Vec<SurveyStation> = md
        .iter()
        .zip(inc.iter())
        .zip(azi.iter())
        .map(|((&md, &inc), &azi)| SurveyStation::new(md, inc, azi))
        .collect();

    validate_stations(&stations)?;
    Ok(stations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_ordinary_survey() {
        let stations = vec![
            SurveyStation::new(0.0, 0.0, 0.0),
            SurveyStation::new(50.0, 5.0, 90.0),
            SurveyStation::new(100.0, 12.0, 95.0),
        ];
        assert!(validate_stations(&stations).is_ok());
    }

    #[test]
    fn validate_rejects_non_monotonic_depth() {
        let stations = vec![
            SurveyStation::new(0.0, 0.0, 0.0),
            SurveyStation::new(100.0, 5.0, 90.0),
            SurveyStation::new(100.0, 6.0, 90.0),
        ];
        match validate_stations(&stations) {
            Err(SurveyError::NonMonotonicDepth { index, .. }) => assert_eq!(index, 2),
            other => panic!("expected NonMonotonicDepth, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_out_of_range_angles() {
        let too_steep = vec![SurveyStation::new(0.0, 190.0, 0.0)];
        assert!(matches!(
            validate_stations(&too_steep),
            Err(SurveyError::InclinationOutOfRange { .. })
        ));

        let wrapped_azimuth = vec![SurveyStation::new(0.0, 10.0, 360.0)];
        assert!(matches!(
            validate_stations(&wrapped_azimuth),
            Err(SurveyError::AzimuthOutOfRange { .. })
        ));
    }

    #[test]
    fn validate_rejects_nan() {
        let stations = vec![SurveyStation::new(0.0, f64::NAN, 0.0)];
        assert!(matches!(
            validate_stations(&stations),
            Err(SurveyError::NonFiniteValue { column: "inc", .. })
        ));
    }

    #[test]
    fn columns_must_have_matching_lengths() {
        let err = stations_from_columns(&[0.0, 50.0], &[0.0], &[0.0, 0.0]);
        assert!(matches!(
            err,
            Err(SurveyError::MismatchedLengths { md: 2, inc: 1, azi: 2 })
        ));
    }
}
