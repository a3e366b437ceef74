//! Minimum-curvature desurveying
//!
//! Fits a smooth circular arc between consecutive station orientation
//! vectors instead of a straight line, which is the industry-standard way
//! to avoid curvature discontinuities in the computed well path.
//!
//! For the interval between stations 1 and 2:
//!
//! ```text
//! cos(beta) = cos(i1)cos(i2) + sin(i1)sin(i2)cos(a2 - a1)
//! RF        = (2 / beta) * tan(beta / 2)        (-> 1 as beta -> 0)
//! L         = (md2 - md1) / 2
//! dN        = L * RF * (sin(i1)cos(a1) + sin(i2)cos(a2))
//! dE        = L * RF * (sin(i1)sin(a1) + sin(i2)sin(a2))
//! dTVD      = L * RF * (cos(i1) + cos(i2))
//! ```

use super::{IntervalDelta, SurveyStation, SurveySolver};

/// Dogleg angles below this threshold are treated as straight segments.
/// tan(beta/2)/(beta/2) loses nothing measurable at this scale.
const STRAIGHT_DOGLEG_RAD: f64 = 1e-9;

/// Unit tangent vector (north, east, down) implied by a station's angles.
pub fn direction_vector(station: &SurveyStation) -> [f64; 3] {
    let inc = station.inc.to_radians();
    let azi = station.azi.to_radians();
    [
        inc.sin() * azi.cos(),
        inc.sin() * azi.sin(),
        inc.cos(),
    ]
}

/// Dogleg angle (radians) between two station orientations, via the
/// spherical law of cosines. The cosine is clamped to [-1, 1] to absorb
/// rounding before `acos`.
fn dogleg_angle(a: &SurveyStation, b: &SurveyStation) -> f64 {
    let i1 = a.inc.to_radians();
    let i2 = b.inc.to_radians();
    let da = (b.azi - a.azi).to_radians();

    let cos_beta = i1.cos() * i2.cos() + i1.sin() * i2.sin() * da.cos();
    cos_beta.clamp(-1.0, 1.0).acos()
}

/// Minimum-curvature ratio factor. Defined by continuity at beta = 0,
/// avoiding the 0/0 form for straight segments.
fn ratio_factor(beta: f64) -> f64 {
    if beta < STRAIGHT_DOGLEG_RAD {
        1.0
    } else {
        (2.0 / beta) * (beta / 2.0).tan()
    }
}

/// The minimum-curvature survey solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimumCurvature;

impl SurveySolver for MinimumCurvature {
    fn interval_deltas(&self, stations: &[SurveyStation]) -> Vec<IntervalDelta> {
        stations
            .windows(2)
            .map(|pair| interval_delta(&pair[0], &pair[1]))
            .collect()
    }
}

/// Displacement over a single interval.
fn interval_delta(a: &SurveyStation, b: &SurveyStation) -> IntervalDelta {
    let delta_md = b.md - a.md;
    // Zero-length interval: no displacement, and nothing to divide by.
    if delta_md == 0.0 {
        return IntervalDelta::default();
    }

    let beta = dogleg_angle(a, b);
    let rf = ratio_factor(beta);
    let half_length = delta_md / 2.0;

    let va = direction_vector(a);
    let vb = direction_vector(b);

    IntervalDelta {
        d_northing: half_length * rf * (va[0] + vb[0]),
        d_easting: half_length * rf * (va[1] + vb[1]),
        d_tvd: half_length * rf * (va[2] + vb[2]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn vertical_station_points_straight_down() {
        let v = direction_vector(&SurveyStation::new(0.0, 0.0, 0.0));
        assert!(v[0].abs() < EPS);
        assert!(v[1].abs() < EPS);
        assert!((v[2] - 1.0).abs() < EPS);
    }

    #[test]
    fn horizontal_east_station() {
        let v = direction_vector(&SurveyStation::new(0.0, 90.0, 90.0));
        assert!(v[0].abs() < EPS);
        assert!((v[1] - 1.0).abs() < EPS);
        assert!(v[2].abs() < EPS);
    }

    #[test]
    fn ratio_factor_is_one_for_straight_segments() {
        assert_eq!(ratio_factor(0.0), 1.0);
        assert_eq!(ratio_factor(1e-12), 1.0);
    }

    #[test]
    fn ratio_factor_exceeds_one_for_curved_segments() {
        // 30 degree dogleg: RF = (2/beta) * tan(beta/2)
        let beta = 30.0_f64.to_radians();
        let rf = ratio_factor(beta);
        assert!(rf > 1.0);
        assert!((rf - (2.0 / beta) * (beta / 2.0).tan()).abs() < EPS);
    }

    #[test]
    fn constant_orientation_degenerates_to_tangent() {
        // Constant inclination and azimuth: displacement must equal the
        // straight-line tangent displacement exactly.
        let a = SurveyStation::new(100.0, 30.0, 45.0);
        let b = SurveyStation::new(160.0, 30.0, 45.0);
        let delta = interval_delta(&a, &b);

        let v = direction_vector(&a);
        assert!((delta.d_northing - 60.0 * v[0]).abs() < 1e-9);
        assert!((delta.d_easting - 60.0 * v[1]).abs() < 1e-9);
        assert!((delta.d_tvd - 60.0 * v[2]).abs() < 1e-9);
    }

    #[test]
    fn zero_length_interval_yields_zero_displacement() {
        let a = SurveyStation::new(100.0, 10.0, 0.0);
        let b = SurveyStation::new(100.0, 40.0, 90.0);
        assert_eq!(interval_delta(&a, &b), IntervalDelta::default());
    }

    #[test]
    fn single_station_yields_no_intervals() {
        let deltas = MinimumCurvature.interval_deltas(&[SurveyStation::new(0.0, 0.0, 0.0)]);
        assert!(deltas.is_empty());
    }

    #[test]
    fn build_and_turn_interval() {
        // Vertical at surface building to 30 degrees toward east over 100 units.
        let a = SurveyStation::new(0.0, 0.0, 0.0);
        let b = SurveyStation::new(100.0, 30.0, 90.0);
        let delta = interval_delta(&a, &b);

        let beta = 30.0_f64.to_radians();
        let rf = (2.0 / beta) * (beta / 2.0).tan();

        // sin(0)cos(0) + sin(30)cos(90) = 0
        assert!(delta.d_northing.abs() < 1e-9);
        // 50 * RF * sin(30)sin(90)
        assert!((delta.d_easting - 50.0 * rf * 0.5).abs() < 1e-9);
        // 50 * RF * (1 + cos(30)); bends away from vertical, so TVD < MD
        assert!((delta.d_tvd - 50.0 * rf * (1.0 + beta.cos())).abs() < 1e-9);
        assert!(delta.d_tvd < 100.0);
    }
}
