//! Desurveying options
//!
//! Every knob of the desurveying pipeline lives here as an explicit,
//! caller-owned options struct: resampling step, survey column names,
//! whether to anchor at construction, and the path-densification spacing.
//! Defaults match the reference behavior; a TOML file can override any
//! subset of fields.
//!
//! Options are always passed explicitly -- there is no process-wide
//! configuration state.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors from loading or validating desurveying options.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read options file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse options file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("step must be a positive finite number, got {0}")]
    InvalidStep(f64),

    #[error("path_spacing must be a positive finite number, got {0}")]
    InvalidSpacing(f64),

    #[error("{0} must not be empty")]
    EmptyColumnName(&'static str),
}

fn default_step() -> f64 {
    1.0
}

fn default_md_column() -> String {
    "MD".to_string()
}

fn default_dip_column() -> String {
    "DIP".to_string()
}

fn default_azimuth_column() -> String {
    "AZI".to_string()
}

fn default_add_origin() -> bool {
    true
}

fn default_path_spacing() -> f64 {
    0.5
}

/// Options for building a [`Deviation`](crate::deviation::Deviation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesurveyOptions {
    /// Depth step for the resampled trajectory grid
    #[serde(default = "default_step")]
    pub step: f64,

    /// Column holding measured depths
    #[serde(default = "default_md_column")]
    pub md_column: String,

    /// Column holding inclination (dip) values
    #[serde(default = "default_dip_column")]
    pub dip_column: String,

    /// Column holding azimuth values
    #[serde(default = "default_azimuth_column")]
    pub azimuth_column: String,

    /// Anchor the trajectory to the borehole surface location at construction
    #[serde(default = "default_add_origin")]
    pub add_origin: bool,

    /// Spacing for path densification in arc-length queries and tube building
    #[serde(default = "default_path_spacing")]
    pub path_spacing: f64,
}

impl Default for DesurveyOptions {
    fn default() -> Self {
        Self {
            step: default_step(),
            md_column: default_md_column(),
            dip_column: default_dip_column(),
            azimuth_column: default_azimuth_column(),
            add_origin: default_add_origin(),
            path_spacing: default_path_spacing(),
        }
    }
}

impl DesurveyOptions {
    /// Load options from a TOML file, validating after parse.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let options: Self = toml::from_str(&content)?;
        options.validate()?;
        info!(path = %path.display(), step = options.step, "loaded desurvey options");
        Ok(options)
    }

    /// Check value ranges. Runs automatically on file load; call directly
    /// for options built in code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(ConfigError::InvalidStep(self.step));
        }
        if !self.path_spacing.is_finite() || self.path_spacing <= 0.0 {
            return Err(ConfigError::InvalidSpacing(self.path_spacing));
        }
        if self.md_column.trim().is_empty() {
            return Err(ConfigError::EmptyColumnName("md_column"));
        }
        if self.dip_column.trim().is_empty() {
            return Err(ConfigError::EmptyColumnName("dip_column"));
        }
        if self.azimuth_column.trim().is_empty() {
            return Err(ConfigError::EmptyColumnName("azimuth_column"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_reference_behavior() {
        let options = DesurveyOptions::default();
        assert_eq!(options.step, 1.0);
        assert_eq!(options.md_column, "MD");
        assert_eq!(options.dip_column, "DIP");
        assert_eq!(options.azimuth_column, "AZI");
        assert!(options.add_origin);
        assert_eq!(options.path_spacing, 0.5);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let options: DesurveyOptions = toml::from_str("step = 5.0").unwrap();
        assert_eq!(options.step, 5.0);
        assert_eq!(options.md_column, "MD");
        assert!(options.add_origin);
    }

    #[test]
    fn load_from_file_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "step = 25.0\nmd_column = \"DEPTH\"\nadd_origin = false").unwrap();

        let options = DesurveyOptions::load_from_file(file.path()).unwrap();
        assert_eq!(options.step, 25.0);
        assert_eq!(options.md_column, "DEPTH");
        assert!(!options.add_origin);
    }

    #[test]
    fn invalid_step_is_rejected() {
        let options = DesurveyOptions {
            step: 0.0,
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(ConfigError::InvalidStep(_))));
    }

    #[test]
    fn empty_column_name_is_rejected() {
        let options = DesurveyOptions {
            dip_column: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(ConfigError::EmptyColumnName("dip_column"))
        ));
    }
}
