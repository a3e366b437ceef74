//! Trajectory resampling onto a regular depth grid
//!
//! Builds the cumulative-sum trajectory at the original (irregular) survey
//! depths first, then linearly interpolates it onto the grid
//! `0, step, 2*step, ... <= md_last`. The grid always includes depth 0 and
//! never extrapolates beyond the deepest surveyed depth.

use super::{IntervalDelta, SurveyError, SurveyStation, TrajectoryPoint};

/// Cumulative position at one of the original survey depths.
#[derive(Debug, Clone, Copy)]
struct CumulativePosition {
    md: f64,
    tvd: f64,
    northing: f64,
    easting: f64,
}

/// Resample interval deltas onto a regular depth grid.
///
/// `stations` and `deltas` must come from the same survey
/// (`deltas.len() == stations.len() - 1`); the solver guarantees this.
/// A single-station survey resamples to the depth-zero point only.
pub fn resample(
    stations: &[SurveyStation],
    deltas: &[IntervalDelta],
    step: f64,
) -> Result<Vec<TrajectoryPoint>, SurveyError> {
    if !step.is_finite() || step <= 0.0 {
        return Err(SurveyError::InvalidStep(step));
    }

    if stations.is_empty() {
        return Ok(Vec::new());
    }

    let cumulative = cumulative_positions(stations, deltas);
    let md_last = stations[stations.len() - 1].md;

    // Grid 0, step, 2*step, ... stopping at or just below md_last. The small
    // epsilon keeps md_last itself on the grid when it is an exact multiple.
    let count = (md_last / step + 1e-9).floor() as usize;
    let mut points = Vec::with_capacity(count + 1);
    for i in 0..=count {
        let md = i as f64 * step;
        points.push(interpolate_at(&cumulative, md));
    }

    Ok(points)
}

/// Cumulative trajectory at the original survey depths. The first station is
/// the reference point (0, 0, 0).
fn cumulative_positions(
    stations: &[SurveyStation],
    deltas: &[IntervalDelta],
) -> Vec<CumulativePosition> {
    let mut positions = Vec::with_capacity(stations.len());
    positions.push(CumulativePosition {
        md: stations[0].md,
        tvd: 0.0,
        northing: 0.0,
        easting: 0.0,
    });

    for (i, delta) in deltas.iter().enumerate() {
        let previous = positions[i];
        positions.push(CumulativePosition {
            md: stations[i + 1].md,
            tvd: previous.tvd + delta.d_tvd,
            northing: previous.northing + delta.d_northing,
            easting: previous.easting + delta.d_easting,
        });
    }

    positions
}

/// Piecewise-linear interpolation of the cumulative trajectory at `md`.
/// Depths outside the surveyed range clamp to the boundary positions.
fn interpolate_at(cumulative: &[CumulativePosition], md: f64) -> TrajectoryPoint {
    let first = cumulative[0];
    let last = cumulative[cumulative.len() - 1];

    if md <= first.md {
        return TrajectoryPoint {
            md,
            tvd: first.tvd,
            northing: first.northing,
            easting: first.easting,
        };
    }
    if md >= last.md {
        return TrajectoryPoint {
            md,
            tvd: last.tvd,
            northing: last.northing,
            easting: last.easting,
        };
    }

    // Find the bracketing interval; depths are strictly increasing.
    let upper = cumulative
        .iter()
        .position(|p| p.md >= md)
        .unwrap_or(cumulative.len() - 1);
    let a = cumulative[upper - 1];
    let b = cumulative[upper];

    let span = b.md - a.md;
    let t = if span > 0.0 { (md - a.md) / span } else { 0.0 };

    TrajectoryPoint {
        md,
        tvd: a.tvd + t * (b.tvd - a.tvd),
        northing: a.northing + t * (b.northing - a.northing),
        easting: a.easting + t * (b.easting - a.easting),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::{MinimumCurvature, SurveySolver};

    fn vertical_survey() -> Vec<SurveyStation> {
        vec![
            SurveyStation::new(0.0, 0.0, 0.0),
            SurveyStation::new(50.0, 0.0, 0.0),
            SurveyStation::new(100.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn vertical_well_resamples_to_tvd_equal_md() {
        let stations = vertical_survey();
        let deltas = MinimumCurvature.interval_deltas(&stations);
        let points = resample(&stations, &deltas, 25.0).unwrap();

        let depths: Vec<f64> = points.iter().map(|p| p.md).collect();
        assert_eq!(depths, vec![0.0, 25.0, 50.0, 75.0, 100.0]);

        for point in &points {
            assert!((point.tvd - point.md).abs() < 1e-9);
            assert!(point.northing.abs() < 1e-9);
            assert!(point.easting.abs() < 1e-9);
        }
    }

    #[test]
    fn depths_are_strictly_increasing_from_zero() {
        let stations = vec![
            SurveyStation::new(0.0, 0.0, 0.0),
            SurveyStation::new(33.0, 8.0, 45.0),
            SurveyStation::new(87.0, 15.0, 60.0),
        ];
        let deltas = MinimumCurvature.interval_deltas(&stations);
        let points = resample(&stations, &deltas, 10.0).unwrap();

        assert_eq!(points[0].md, 0.0);
        for pair in points.windows(2) {
            assert!(pair[1].md > pair[0].md);
        }
        // No extrapolation past the deepest station.
        assert!(points.last().unwrap().md <= 87.0);
    }

    #[test]
    fn grid_stops_at_or_below_last_depth() {
        let stations = vec![
            SurveyStation::new(0.0, 0.0, 0.0),
            SurveyStation::new(95.0, 0.0, 0.0),
        ];
        let deltas = MinimumCurvature.interval_deltas(&stations);
        let points = resample(&stations, &deltas, 10.0).unwrap();
        assert_eq!(points.last().unwrap().md, 90.0);
    }

    #[test]
    fn non_positive_step_is_rejected() {
        let stations = vertical_survey();
        let deltas = MinimumCurvature.interval_deltas(&stations);
        assert!(matches!(
            resample(&stations, &deltas, 0.0),
            Err(SurveyError::InvalidStep(_))
        ));
        assert!(matches!(
            resample(&stations, &deltas, -5.0),
            Err(SurveyError::InvalidStep(_))
        ));
        assert!(matches!(
            resample(&stations, &deltas, f64::NAN),
            Err(SurveyError::InvalidStep(_))
        ));
    }

    #[test]
    fn single_station_survey_resamples_to_depth_zero_point() {
        let stations = vec![SurveyStation::new(0.0, 0.0, 0.0)];
        let deltas = MinimumCurvature.interval_deltas(&stations);
        let points = resample(&stations, &deltas, 5.0).unwrap();

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].md, 0.0);
        assert_eq!(points[0].tvd, 0.0);
    }

    #[test]
    fn interpolation_matches_interval_boundaries() {
        // Build-and-hold: vertical to 30 degrees east over 0-100, then hold.
        let stations = vec![
            SurveyStation::new(0.0, 0.0, 0.0),
            SurveyStation::new(100.0, 30.0, 90.0),
            SurveyStation::new(200.0, 30.0, 90.0),
        ];
        let deltas = MinimumCurvature.interval_deltas(&stations);
        let points = resample(&stations, &deltas, 50.0).unwrap();

        // Grid point at md=100 must match the cumulative sum of the first interval.
        let at_100 = points.iter().find(|p| p.md == 100.0).unwrap();
        assert!((at_100.tvd - deltas[0].d_tvd).abs() < 1e-9);
        assert!((at_100.easting - deltas[0].d_easting).abs() < 1e-9);
        // Midpoint of the second (straight) interval interpolates linearly.
        let at_150 = points.iter().find(|p| p.md == 150.0).unwrap();
        assert!((at_150.easting - (deltas[0].d_easting + deltas[1].d_easting / 2.0)).abs() < 1e-9);
    }
}
