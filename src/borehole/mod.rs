//! Borehole entity and metadata
//!
//! The borehole owns its surface reference point (location, CRS, altitude),
//! its deviation, and its well tops. Metadata is a typed record projected
//! into display rows on demand -- there is no string-keyed mutation path.
//!
//! Boreholes live in an explicit, caller-owned [`BoreholeRegistry`]; the
//! crate keeps no process-wide list of created instances.

pub mod tops;

pub use tops::{TopsError, WellTop, WellTops};

use crate::config::DesurveyOptions;
use crate::crs::Crs;
use crate::deviation::{AnchorUpdate, Deviation, DeviationError, SurfaceReference};
use crate::survey::{SurveyStation, SurveyTable};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Errors from borehole-level operations.
#[derive(Debug, Error)]
pub enum BoreholeError {
    #[error("borehole '{0}' has no properties; call init_properties first")]
    MissingProperties(String),

    #[error("borehole '{0}' has no deviation; call add_deviation first")]
    MissingDeviation(String),

    #[error(transparent)]
    Deviation(#[from] DeviationError),

    #[error(transparent)]
    Tops(#[from] TopsError),
}

/// Typed surface and identification properties of a borehole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoreholeProperties {
    /// Easting of the wellhead in `crs`
    pub x: f64,
    /// Northing of the wellhead in `crs`
    pub y: f64,
    pub crs: Crs,
    pub altitude_above_sea_level: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_depth: Option<f64>,
}

/// One display row of the metadata table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRow {
    pub label: String,
    pub value: String,
}

/// A modeled borehole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Borehole {
    name: String,
    properties: Option<BoreholeProperties>,
    deviation: Option<Deviation>,
    tops: Option<WellTops>,
    /// Desurvey origin recorded by the last anchoring step
    anchor: Option<AnchorUpdate>,
}

impl Borehole {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            properties: None,
            deviation: None,
            tops: None,
            anchor: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the surface and identification properties.
    pub fn init_properties(&mut self, properties: BoreholeProperties) {
        self.properties = Some(properties);
    }

    pub fn properties(&self) -> Option<&BoreholeProperties> {
        self.properties.as_ref()
    }

    pub fn deviation(&self) -> Option<&Deviation> {
        self.deviation.as_ref()
    }

    pub fn tops(&self) -> Option<&WellTops> {
        self.tops.as_ref()
    }

    /// The anchor origin recorded by the last anchoring step, if any.
    pub fn anchor(&self) -> Option<&AnchorUpdate> {
        self.anchor.as_ref()
    }

    /// The surface reference point consumed by the deviation.
    pub fn surface_reference(&self) -> Result<SurfaceReference, BoreholeError> {
        let properties = self
            .properties
            .as_ref()
            .ok_or_else(|| BoreholeError::MissingProperties(self.name.clone()))?;
        Ok(SurfaceReference {
            x: properties.x,
            y: properties.y,
            crs: properties.crs.clone(),
            altitude_above_sea_level: properties.altitude_above_sea_level,
        })
    }

    // ========================================================================
    // Deviation
    // ========================================================================

    /// Desurvey a station sequence and attach the resulting deviation.
    ///
    /// With `options.add_origin` the trajectory is anchored to the surface
    /// reference and the anchor origin lands in the metadata table. On any
    /// failure nothing is attached.
    pub fn add_deviation(
        &mut self,
        stations: &[SurveyStation],
        options: &DesurveyOptions,
    ) -> Result<(), BoreholeError> {
        let reference = self.surface_reference()?;

        // Anchor through the explicit step so the origin write-back is
        // captured; construction itself stays relative.
        let relative_options = DesurveyOptions {
            add_origin: false,
            ..options.clone()
        };
        let mut deviation = Deviation::from_stations(reference, stations, &relative_options)?;

        let anchor = if options.add_origin {
            Some(deviation.anchor(None, None, None)?)
        } else {
            None
        };

        info!(
            well = %self.name,
            stations = stations.len(),
            samples = deviation.depth().len(),
            anchored = anchor.is_some(),
            "added deviation"
        );

        self.deviation = Some(deviation);
        self.anchor = anchor;
        Ok(())
    }

    /// Desurvey survey data from a named-column table.
    pub fn add_deviation_from_table(
        &mut self,
        table: &SurveyTable,
        options: &DesurveyOptions,
    ) -> Result<(), BoreholeError> {
        let stations = table
            .stations(
                &options.md_column,
                &options.dip_column,
                &options.azimuth_column,
            )
            .map_err(DeviationError::from)?;
        self.add_deviation(&stations, options)
    }

    /// Desurvey survey data from delimited text.
    pub fn add_deviation_from_delimited(
        &mut self,
        text: &str,
        delimiter: char,
        options: &DesurveyOptions,
    ) -> Result<(), BoreholeError> {
        let table = SurveyTable::from_delimited(text, delimiter).map_err(DeviationError::from)?;
        self.add_deviation_from_table(&table, options)
    }

    /// Anchor the attached deviation, recording the origin in the metadata
    /// table. Missing coordinates default to the stored surface reference.
    pub fn anchor_deviation(
        &mut self,
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
    ) -> Result<(), BoreholeError> {
        let deviation = self
            .deviation
            .as_mut()
            .ok_or_else(|| BoreholeError::MissingDeviation(self.name.clone()))?;
        let update = deviation.anchor(x, y, z)?;
        self.anchor = Some(update);
        Ok(())
    }

    // ========================================================================
    // Tops
    // ========================================================================

    /// Add a formation top, creating the tops table on first use.
    pub fn add_top<S: Into<String>>(&mut self, name: S, depth: f64) -> Result<(), BoreholeError> {
        self.tops.get_or_insert_with(WellTops::new).add(name, depth)?;
        Ok(())
    }

    // ========================================================================
    // Metadata projection
    // ========================================================================

    /// Project the typed record into display rows. Recomputed on demand;
    /// never stored.
    pub fn metadata_table(&self) -> Vec<MetadataRow> {
        let mut rows = vec![row("Name", self.name.clone())];

        if let Some(p) = &self.properties {
            rows.push(row("X", format!("{}", p.x)));
            rows.push(row("Y", format!("{}", p.y)));
            rows.push(row("Coordinate Reference System", p.crs.to_string()));
            rows.push(row(
                "Altitude above sea level",
                format!("{}", p.altitude_above_sea_level),
            ));
            if let Some(address) = &p.address {
                rows.push(row("Address", address.clone()));
            }
            if let Some(year) = p.year {
                rows.push(row("Year", format!("{year}")));
            }
            if let Some(total_depth) = p.total_depth {
                rows.push(row("Total Depth", format!("{total_depth}")));
            }
        }

        rows.push(row("Well Deviation", format!("{}", self.deviation.is_some())));
        rows.push(row("Well Tops", format!("{}", self.tops.is_some())));

        if let Some(anchor) = &self.anchor {
            rows.push(row("Desurvey Origin X", format!("{}", anchor.x)));
            rows.push(row("Desurvey Origin Y", format!("{}", anchor.y)));
            rows.push(row("Desurvey Origin Altitude", format!("{}", anchor.z)));
            rows.push(row(
                "TVDSS at Total Depth",
                format!("{}", anchor.tvdss_at_td),
            ));
        }

        rows
    }
}

fn row<L: Into<String>>(label: L, value: String) -> MetadataRow {
    MetadataRow {
        label: label.into(),
        value,
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Caller-owned collection of boreholes, e.g. one per project or field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoreholeRegistry {
    boreholes: Vec<Borehole>,
}

impl BoreholeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, borehole: Borehole) {
        self.boreholes.push(borehole);
    }

    pub fn get(&self, name: &str) -> Option<&Borehole> {
        self.boreholes.iter().find(|b| b.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Borehole> {
        self.boreholes.iter_mut().find(|b| b.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Borehole> {
        self.boreholes.iter()
    }

    pub fn len(&self) -> usize {
        self.boreholes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boreholes.is_empty()
    }
}
