//! Coordinate reference system guard
//!
//! Anchoring adds metric northing/easting offsets to a surface location,
//! which is only meaningful in a projected (cartesian) CRS. This module
//! carries the identifier and the "is this geographic?" predicate used to
//! block anchoring against degree-based systems.
//!
//! Projection transforms themselves are delegated to an external CRS
//! library; callers with access to one can plug it in through
//! [`CrsRegistry`]. The built-in classifier covers the EPSG geographic-2D
//! code ranges plus the common spelled-out identifiers.

use serde::{Deserialize, Serialize};

/// A coordinate reference system identifier, e.g. `EPSG:25832`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Crs(String);

impl Crs {
    pub fn new<S: Into<String>>(identifier: S) -> Self {
        Self(identifier.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this identifier names a geographic (degree-based) system,
    /// according to the built-in classifier.
    pub fn is_geographic(&self) -> bool {
        BuiltinCrsRegistry.is_geographic(self)
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Crs {
    fn from(identifier: &str) -> Self {
        Self::new(identifier)
    }
}

/// CRS classification capability.
///
/// The general contract is "reject any non-projected system". The built-in
/// registry classifies by identifier pattern; deployments with a full CRS
/// database can substitute their own implementation.
pub trait CrsRegistry {
    fn is_geographic(&self, crs: &Crs) -> bool;
}

/// Identifier-pattern classifier covering the common geographic systems.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCrsRegistry;

impl CrsRegistry for BuiltinCrsRegistry {
    fn is_geographic(&self, crs: &Crs) -> bool {
        let normalized: String = crs
            .as_str()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();

        // Spelled-out geographic identifiers
        if matches!(normalized.as_str(), "WGS84" | "CRS84" | "OGC:CRS84" | "ETRS89" | "NAD83" | "NAD27") {
            return true;
        }

        if let Some(code) = normalized.strip_prefix("EPSG:") {
            if let Ok(code) = code.parse::<u32>() {
                return is_geographic_epsg(code);
            }
        }

        false
    }
}

/// Classify an EPSG code as geographic-2D.
///
/// The 4xxx block is not uniformly geographic: it also holds projected
/// systems such as 4647 (ETRS89 / UTM zone 32N zE-N) and 4839 (ETRS89 /
/// LCC Germany). The ranges below are the contiguous geographic datum
/// blocks; geographic codes scattered between projected entries are listed
/// individually. Codes not covered classify as projected, and callers
/// needing the full EPSG database plug it in via [`CrsRegistry`].
fn is_geographic_epsg(code: u32) -> bool {
    const GEOGRAPHIC_RANGES: &[(u32, u32)] = &[
        (4001, 4035),
        (4120, 4184),
        (4188, 4216),
        (4218, 4289),
        (4291, 4326),
        (4801, 4824),
    ];
    const GEOGRAPHIC_CODES: &[u32] = &[
        4483, 4490, 4555, 4558, 4612, 4617, 4618, 4619, 4659, 4667, 4674, 4687, 4747, 4755, 4756,
        4757, 4759, 4765,
    ];

    GEOGRAPHIC_RANGES
        .iter()
        .any(|&(lo, hi)| (lo..=hi).contains(&code))
        || GEOGRAPHIC_CODES.contains(&code)
}
