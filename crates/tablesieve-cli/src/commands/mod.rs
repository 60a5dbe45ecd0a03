pub mod classify;
pub mod config;
pub mod extract;

use std::path::Path;
use tablesieve_core::config::{load_config, PipelineConfig};
use tablesieve_core::error::SieveError;

/// The configuration in `path`, or the built-in defaults.
pub fn resolve_config(path: Option<&Path>) -> Result<PipelineConfig, SieveError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(PipelineConfig::default()),
    }
}
