//! Well tops: named stratigraphic depth markers
//!
//! A small ordered table of (name, measured depth) markers used to label
//! formation boundaries along the well. Kept sorted by depth so bracketing
//! lookups are a scan over an already-ordered list.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopsError {
    #[error("top '{name}' has invalid depth {depth}; depths must be finite and non-negative")]
    InvalidDepth { name: String, depth: f64 },
}

/// One formation top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellTop {
    pub name: String,
    pub depth: f64,
}

/// Ordered collection of formation tops for one borehole.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WellTops {
    tops: Vec<WellTop>,
}

impl WellTops {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a top, keeping the list sorted by depth.
    pub fn add<S: Into<String>>(&mut self, name: S, depth: f64) -> Result<(), TopsError> {
        let name = name.into();
        if !depth.is_finite() || depth < 0.0 {
            return Err(TopsError::InvalidDepth { name, depth });
        }

        let insert_at = self
            .tops
            .iter()
            .position(|top| top.depth > depth)
            .unwrap_or(self.tops.len());
        self.tops.insert(insert_at, WellTop { name, depth });
        Ok(())
    }

    /// All tops, shallowest first.
    pub fn tops(&self) -> &[WellTop] {
        &self.tops
    }

    pub fn len(&self) -> usize {
        self.tops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tops.is_empty()
    }

    /// The deepest top at or above the given depth -- the formation the
    /// depth lies in, assuming tops mark formation boundaries.
    pub fn top_at_depth(&self, depth: f64) -> Option<&WellTop> {
        self.tops.iter().rev().find(|top| top.depth <= depth)
    }
}
