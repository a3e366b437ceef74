//! wellbore: borehole modeling and directional-survey desurveying
//!
//! Models subsurface boreholes and converts directional-survey measurements
//! (measured depth, inclination, azimuth) into 3D well trajectories.
//!
//! ## Architecture
//!
//! - **Survey**: minimum-curvature solver and fixed-step trajectory resampler
//! - **Deviation**: the trajectory object -- relative arrays, anchoring to a
//!   surface reference, polar/tabular views, arc-length depth sampling
//! - **Path**: polyline densification, nearest-point-by-arc-length lookup,
//!   and tube geometry for 3D rendering collaborators
//! - **Borehole**: typed surface reference, metadata projection, well tops,
//!   and a caller-owned registry
//!
//! The numeric core is synchronous and pure; file parsing beyond a minimal
//! delimited-text reader, CRS projection transforms, and all plotting belong
//! to external collaborators.

pub mod borehole;
pub mod config;
pub mod crs;
pub mod deviation;
pub mod path;
pub mod survey;

// Re-export the borehole entity and its collaborators
pub use borehole::{Borehole, BoreholeError, BoreholeProperties, BoreholeRegistry, WellTops};

// Re-export the trajectory object
pub use deviation::{AnchorUpdate, Deviation, DeviationError, PolarPoint, SurfaceReference};

// Re-export survey processing
pub use survey::{
    MinimumCurvature, SurveyError, SurveySolver, SurveyStation, SurveyTable, TrajectoryPoint,
};

// Re-export spatial utilities
pub use path::{build_tube, resample_between_points, PathError, Point3, TubeGeometry};

// Re-export configuration
pub use config::{ConfigError, DesurveyOptions};

// Re-export the CRS guard
pub use crs::{BuiltinCrsRegistry, Crs, CrsRegistry};
