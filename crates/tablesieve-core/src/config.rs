use crate::error::SieveError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Thresholds used by the table validity classifier.
///
/// Decimal thresholds are written as quoted strings in JSON
/// (e.g. `"0.4"`) so the configured value is compared exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Grids with fewer rows are rejected.
    pub min_rows: usize,
    /// Grids with fewer columns are rejected.
    pub min_cols: usize,
    /// Minimum fraction of cells holding non-whitespace text.
    pub min_density: Decimal,
    /// Maximum mean cell length (in characters) of a single-column grid.
    pub max_single_column_mean_len: Decimal,
    /// A grid wider than this many columns...
    pub wide_table_min_cols: usize,
    /// ...must have at least this many rows.
    pub wide_table_min_rows: usize,
    /// Grids with more rows are rejected.
    pub max_rows: usize,
    /// Maximum average number of words per cell.
    pub max_words_per_cell: Decimal,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            min_rows: 2,
            min_cols: 2,
            min_density: Decimal::new(4, 1),
            max_single_column_mean_len: Decimal::from(40),
            wide_table_min_cols: 12,
            wide_table_min_rows: 3,
            max_rows: 200,
            max_words_per_cell: Decimal::from(8),
        }
    }
}

/// Tuning for the ruled-border strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeConfig {
    /// Rulings shorter than the page dimension divided by this are ignored.
    pub line_scale: f32,
    /// Rulings whose positions differ by at most this are collinear.
    pub line_tol: f32,
    /// Distance within which rulings are considered to touch.
    pub joint_tol: f32,
    /// Characters removed from every cell.
    pub strip_text: String,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        LatticeConfig {
            line_scale: 40.0,
            line_tol: 2.0,
            joint_tol: 2.0,
            strip_text: "\n".into(),
        }
    }
}

/// Tuning for the whitespace-gap strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Largest vertical gap (points) between two tabular rows of one table.
    pub edge_tol: f32,
    /// Words whose tops differ by at most this share a text row.
    pub row_tol: f32,
    /// Horizontal gap (points) that separates two columns.
    pub column_gap: f32,
    /// Characters removed from every cell.
    pub strip_text: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        StreamConfig {
            edge_tol: 50.0,
            row_tol: 2.0,
            column_gap: 6.0,
            strip_text: "\n".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub classifier: ClassifierConfig,
    pub lattice: LatticeConfig,
    pub stream: StreamConfig,
}

/// Load a pipeline config from a JSON file.
pub fn load_config(path: &Path) -> Result<PipelineConfig, SieveError> {
    let content = std::fs::read_to_string(path).map_err(|e| SieveError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: PipelineConfig =
        serde_json::from_str(&content).map_err(|e| SieveError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a pipeline config from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<PipelineConfig, SieveError> {
    let config: PipelineConfig = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that a config is usable.
pub fn validate_config(config: &PipelineConfig) -> Result<(), SieveError> {
    let c = &config.classifier;
    if c.min_rows == 0 || c.min_cols == 0 {
        return Err(SieveError::ConfigInvalid(
            "classifier.min_rows and classifier.min_cols must be at least 1".into(),
        ));
    }
    if c.min_density < Decimal::ZERO || c.min_density > Decimal::ONE {
        return Err(SieveError::ConfigInvalid(format!(
            "classifier.min_density must be between 0 and 1, got {}",
            c.min_density
        )));
    }
    if c.max_single_column_mean_len.is_sign_negative() || c.max_words_per_cell.is_sign_negative()
    {
        return Err(SieveError::ConfigInvalid(
            "classifier length and word limits must not be negative".into(),
        ));
    }

    let l = &config.lattice;
    if l.line_scale.is_nan() || l.line_scale <= 0.0 {
        return Err(SieveError::ConfigInvalid(format!(
            "lattice.line_scale must be positive, got {}",
            l.line_scale
        )));
    }
    check_tolerance("lattice.line_tol", l.line_tol)?;
    check_tolerance("lattice.joint_tol", l.joint_tol)?;

    let s = &config.stream;
    check_tolerance("stream.edge_tol", s.edge_tol)?;
    check_tolerance("stream.row_tol", s.row_tol)?;
    check_tolerance("stream.column_gap", s.column_gap)?;

    Ok(())
}

fn check_tolerance(name: &str, value: f32) -> Result<(), SieveError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SieveError::ConfigInvalid(format!(
            "{name} must be a non-negative number, got {value}"
        )))
    }
}
