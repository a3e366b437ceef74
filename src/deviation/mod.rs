//! Well deviation (trajectory) object
//!
//! Owns the resampled relative trajectory produced by the desurveying
//! pipeline (minimum curvature -> resampler), performs anchoring against
//! the borehole surface reference, and exposes the derived views consumed
//! by log-plotting and 3D-rendering collaborators: polar projection,
//! tabular views, arc-length depth sampling, and tube geometry.
//!
//! The relative arrays are fixed at construction. Anchoring is the one
//! secondary step: it fills the optional absolute arrays (northing,
//! easting, TVD below sea level) and hands the caller an [`AnchorUpdate`]
//! to apply to the owning borehole's metadata. Anchoring against a
//! geographic (degree-based) CRS is rejected up front -- metric offsets
//! added to angular coordinates are meaningless.

use crate::config::{ConfigError, DesurveyOptions};
use crate::crs::{BuiltinCrsRegistry, Crs, CrsRegistry};
use crate::path::{self, PathError, Point3, TubeGeometry};
use crate::survey::{
    MinimumCurvature, SurveyError, SurveySolver, SurveyStation, SurveyTable, TrajectoryPoint,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or querying a deviation.
#[derive(Debug, Error)]
pub enum DeviationError {
    #[error(
        "cannot anchor against geographic CRS '{0}', use a cartesian coordinate system"
    )]
    GeographicCrs(Crs),

    #[error("absolute coordinates requested before anchoring; call anchor() first")]
    NotAnchored,

    #[error("log values length {values} does not match depths length {depths}")]
    LogLengthMismatch { depths: usize, values: usize },

    #[error(transparent)]
    Survey(#[from] SurveyError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The borehole surface reference point a deviation is anchored to.
///
/// Supplied by the owning borehole; `x`/`y` are coordinates in `crs` and
/// `altitude_above_sea_level` is the surface elevation at the wellhead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceReference {
    pub x: f64,
    pub y: f64,
    pub crs: Crs,
    pub altitude_above_sea_level: f64,
}

/// Absolute-frame arrays filled by anchoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct AnchoredArrays {
    northing: Vec<f64>,
    easting: Vec<f64>,
    /// True vertical depth below sea level (positive above datum)
    tvdss: Vec<f64>,
}

/// The origin applied by an anchoring step, handed back so the owning
/// borehole can record it in its metadata table. Nothing is written on a
/// failed precondition check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorUpdate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// TVD below sea level at total depth
    pub tvdss_at_td: f64,
}

/// One sample of the polar projection: angle from north and horizontal
/// radial distance from the wellhead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarPoint {
    pub angle: f64,
    pub radius: f64,
}

/// A desurveyed well trajectory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deviation {
    // Raw survey measurements
    md: Vec<f64>,
    inc: Vec<f64>,
    azi: Vec<f64>,

    // Resampled relative trajectory (fixed depth grid starting at 0)
    depth: Vec<f64>,
    tvd: Vec<f64>,
    northing_rel: Vec<f64>,
    easting_rel: Vec<f64>,

    anchored: Option<AnchoredArrays>,
    reference: SurfaceReference,
    path_spacing: f64,
}

impl Deviation {
    /// Build a deviation from validated survey stations using the
    /// minimum-curvature solver.
    ///
    /// With `options.add_origin` the trajectory is anchored immediately,
    /// which requires `reference.crs` to be a projected system.
    pub fn from_stations(
        reference: SurfaceReference,
        stations: &[SurveyStation],
        options: &DesurveyOptions,
    ) -> Result<Self, DeviationError> {
        Self::from_stations_with(
            reference,
            stations,
            options,
            &MinimumCurvature,
            &BuiltinCrsRegistry,
        )
    }

    /// Same as [`from_stations`](Self::from_stations) with an injected
    /// survey solver.
    pub fn from_stations_with_solver(
        reference: SurfaceReference,
        stations: &[SurveyStation],
        options: &DesurveyOptions,
        solver: &dyn SurveySolver,
    ) -> Result<Self, DeviationError> {
        Self::from_stations_with(reference, stations, options, solver, &BuiltinCrsRegistry)
    }

    /// Same as [`from_stations`](Self::from_stations) with an injected CRS
    /// registry, for callers backed by a full CRS database.
    pub fn from_stations_with_registry(
        reference: SurfaceReference,
        stations: &[SurveyStation],
        options: &DesurveyOptions,
        registry: &dyn CrsRegistry,
    ) -> Result<Self, DeviationError> {
        Self::from_stations_with(reference, stations, options, &MinimumCurvature, registry)
    }

    /// Fully injected constructor behind the convenience variants above.
    pub fn from_stations_with(
        reference: SurfaceReference,
        stations: &[SurveyStation],
        options: &DesurveyOptions,
        solver: &dyn SurveySolver,
        registry: &dyn CrsRegistry,
    ) -> Result<Self, DeviationError> {
        options.validate()?;
        crate::survey::validate_stations(stations)?;

        // Fail the CRS precondition before any computation so construction
        // is all-or-nothing.
        if options.add_origin && registry.is_geographic(&reference.crs) {
            return Err(DeviationError::GeographicCrs(reference.crs.clone()));
        }

        let deltas = solver.interval_deltas(stations);
        let points = crate::survey::resample(stations, &deltas, options.step)?;

        let mut deviation = Self {
            md: stations.iter().map(|s| s.md).collect(),
            inc: stations.iter().map(|s| s.inc).collect(),
            azi: stations.iter().map(|s| s.azi).collect(),
            depth: points.iter().map(|p| p.md).collect(),
            tvd: points.iter().map(|p| p.tvd).collect(),
            northing_rel: points.iter().map(|p| p.northing).collect(),
            easting_rel: points.iter().map(|p| p.easting).collect(),
            anchored: None,
            reference,
            path_spacing: options.path_spacing,
        };

        if options.add_origin {
            deviation.anchor_with_registry(registry, None, None, None)?;
        }

        Ok(deviation)
    }

    /// Build a deviation from a named-column survey table.
    pub fn from_table(
        reference: SurfaceReference,
        table: &SurveyTable,
        options: &DesurveyOptions,
    ) -> Result<Self, DeviationError> {
        let stations = table.stations(
            &options.md_column,
            &options.dip_column,
            &options.azimuth_column,
        )?;
        Self::from_stations(reference, &stations, options)
    }

    /// Build a deviation from delimited survey text (header row first).
    pub fn from_delimited(
        reference: SurfaceReference,
        text: &str,
        delimiter: char,
        options: &DesurveyOptions,
    ) -> Result<Self, DeviationError> {
        let table = SurveyTable::from_delimited(text, delimiter)?;
        Self::from_table(reference, &table, options)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn reference(&self) -> &SurfaceReference {
        &self.reference
    }

    /// Raw measured depths, one per survey station.
    pub fn md(&self) -> &[f64] {
        &self.md
    }

    pub fn inc(&self) -> &[f64] {
        &self.inc
    }

    pub fn azi(&self) -> &[f64] {
        &self.azi
    }

    /// Resampled depth grid (starts at 0, fixed step).
    pub fn depth(&self) -> &[f64] {
        &self.depth
    }

    pub fn tvd(&self) -> &[f64] {
        &self.tvd
    }

    pub fn northing_rel(&self) -> &[f64] {
        &self.northing_rel
    }

    pub fn easting_rel(&self) -> &[f64] {
        &self.easting_rel
    }

    pub fn is_anchored(&self) -> bool {
        self.anchored.is_some()
    }

    /// Absolute northing, once anchored.
    pub fn northing(&self) -> Result<&[f64], DeviationError> {
        self.anchored
            .as_ref()
            .map(|a| a.northing.as_slice())
            .ok_or(DeviationError::NotAnchored)
    }

    /// Absolute easting, once anchored.
    pub fn easting(&self) -> Result<&[f64], DeviationError> {
        self.anchored
            .as_ref()
            .map(|a| a.easting.as_slice())
            .ok_or(DeviationError::NotAnchored)
    }

    /// True vertical depth below sea level, once anchored.
    pub fn tvdss(&self) -> Result<&[f64], DeviationError> {
        self.anchored
            .as_ref()
            .map(|a| a.tvdss.as_slice())
            .ok_or(DeviationError::NotAnchored)
    }

    /// Resampled relative trajectory as points.
    pub fn trajectory(&self) -> Vec<TrajectoryPoint> {
        (0..self.depth.len())
            .map(|i| TrajectoryPoint {
                md: self.depth[i],
                tvd: self.tvd[i],
                northing: self.northing_rel[i],
                easting: self.easting_rel[i],
            })
            .collect()
    }

    // ========================================================================
    // Anchoring
    // ========================================================================

    /// Anchor the trajectory to an absolute origin.
    ///
    /// Missing coordinates default to the surface reference's stored
    /// x/y/altitude. `northing = northing_rel + y`,
    /// `easting = easting_rel + x`, `tvdss = z - tvd`.
    ///
    /// The returned [`AnchorUpdate`] is for the owning borehole to record;
    /// on a failed CRS precondition nothing is written.
    pub fn anchor(
        &mut self,
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
    ) -> Result<AnchorUpdate, DeviationError> {
        self.anchor_with_registry(&BuiltinCrsRegistry, x, y, z)
    }

    /// Same as [`anchor`](Self::anchor) with an injected CRS registry.
    pub fn anchor_with_registry(
        &mut self,
        registry: &dyn CrsRegistry,
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
    ) -> Result<AnchorUpdate, DeviationError> {
        if registry.is_geographic(&self.reference.crs) {
            return Err(DeviationError::GeographicCrs(self.reference.crs.clone()));
        }

        let x = x.unwrap_or(self.reference.x);
        let y = y.unwrap_or(self.reference.y);
        let z = z.unwrap_or(self.reference.altitude_above_sea_level);

        let anchored = AnchoredArrays {
            northing: self.northing_rel.iter().map(|n| n + y).collect(),
            easting: self.easting_rel.iter().map(|e| e + x).collect(),
            tvdss: self.tvd.iter().map(|t| z - t).collect(),
        };
        let tvdss_at_td = anchored.tvdss.last().copied().unwrap_or(z);
        self.anchored = Some(anchored);

        Ok(AnchorUpdate {
            x,
            y,
            z,
            tvdss_at_td,
        })
    }

    // ========================================================================
    // Derived views
    // ========================================================================

    /// Polar projection of the horizontal displacement, one sample per
    /// resampled depth: `(atan2(easting_rel, northing_rel), sqrt(n^2 + e^2))`.
    pub fn polar_projection(&self) -> Vec<PolarPoint> {
        self.northing_rel
            .iter()
            .zip(self.easting_rel.iter())
            .map(|(&n, &e)| PolarPoint {
                angle: e.atan2(n),
                radius: (n * n + e * e).sqrt(),
            })
            .collect()
    }

    /// Tabular view of the raw survey measurements.
    pub fn survey_table(&self) -> SurveyTable {
        SurveyTable::from_parallel_columns(
            vec![
                "Measured Depth".to_string(),
                "Inclination".to_string(),
                "Azimuth".to_string(),
            ],
            vec![self.md.clone(), self.inc.clone(), self.azi.clone()],
        )
    }

    /// Tabular view of the desurveyed trajectory. Includes the absolute
    /// columns once anchored.
    pub fn desurveyed_table(&self) -> SurveyTable {
        let mut columns = vec![
            "True Vertical Depth".to_string(),
            "Northing_rel".to_string(),
            "Easting_rel".to_string(),
        ];
        let mut data = vec![
            self.tvd.clone(),
            self.northing_rel.clone(),
            self.easting_rel.clone(),
        ];
        if let Some(anchored) = &self.anchored {
            columns.push("Northing".to_string());
            columns.push("Easting".to_string());
            columns.push("True Vertical Depth Below Sea Level".to_string());
            data.push(anchored.northing.clone());
            data.push(anchored.easting.clone());
            data.push(anchored.tvdss.clone());
        }
        SurveyTable::from_parallel_columns(columns, data)
    }

    // ========================================================================
    // Path sampling
    // ========================================================================

    /// Relative-frame well path as (easting, northing, -tvd) points.
    pub fn relative_path(&self) -> Vec<Point3> {
        (0..self.depth.len())
            .map(|i| Point3::new(self.easting_rel[i], self.northing_rel[i], -self.tvd[i]))
            .collect()
    }

    /// Absolute-frame well path as (easting, northing, tvdss) points.
    /// Requires anchoring.
    pub fn absolute_path(&self) -> Result<Vec<Point3>, DeviationError> {
        let anchored = self.anchored.as_ref().ok_or(DeviationError::NotAnchored)?;
        Ok((0..self.depth.len())
            .map(|i| Point3::new(anchored.easting[i], anchored.northing[i], anchored.tvdss[i]))
            .collect())
    }

    /// The 3D position closest by arc length to each requested depth, on
    /// the relative-frame path. Equidistant candidates resolve to the
    /// shallower point.
    pub fn sample_at_depths(&self, depths: &[f64]) -> Result<Vec<Point3>, DeviationError> {
        let dense = path::resample_between_points(&self.relative_path(), self.path_spacing)?;
        Ok(path::points_along_path(&dense, depths)?)
    }

    /// Absolute-frame variant of [`sample_at_depths`](Self::sample_at_depths).
    /// Requires anchoring.
    pub fn sample_at_depths_absolute(
        &self,
        depths: &[f64],
    ) -> Result<Vec<Point3>, DeviationError> {
        let dense = path::resample_between_points(&self.absolute_path()?, self.path_spacing)?;
        Ok(path::points_along_path(&dense, depths)?)
    }

    // ========================================================================
    // Tube geometry
    // ========================================================================

    /// Tube geometry around the relative-frame path, offset by (x, y, z),
    /// with vertex elevation as the color scalar.
    pub fn tube(
        &self,
        radius: f64,
        sides: usize,
        x: f64,
        y: f64,
        z: f64,
    ) -> Result<TubeGeometry, DeviationError> {
        let offset_path: Vec<Point3> = self
            .relative_path()
            .iter()
            .map(|p| Point3::new(p.x + x, p.y + y, p.z + z))
            .collect();
        let dense = path::resample_between_points(&offset_path, self.path_spacing)?;
        Ok(path::build_tube(&dense, radius, sides, None)?)
    }

    /// Tube along the absolute-frame path carrying a log curve as color
    /// scalars: each (depth, value) pair is placed at the path point
    /// nearest that depth by arc length. Requires anchoring.
    pub fn log_tube(
        &self,
        depths: &[f64],
        values: &[f64],
        radius: f64,
        sides: usize,
    ) -> Result<TubeGeometry, DeviationError> {
        if depths.len() != values.len() {
            return Err(DeviationError::LogLengthMismatch {
                depths: depths.len(),
                values: values.len(),
            });
        }

        let points = self.sample_at_depths_absolute(depths)?;
        Ok(path::build_tube(&points, radius, sides, Some(values))?)
    }
}
