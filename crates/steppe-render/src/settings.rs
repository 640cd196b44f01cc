use std::path::Path;

use steppe_core::RenderSettings;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {message}")]
    ReadError { path: String, message: String },
    #[error("Failed to parse settings RON: {0}")]
    ParseError(String),
}

/// Parse renderer settings from a RON string. Optional fields may be written
/// bare (`y: 250.0`) as well as `Some(250.0)`.
pub fn load_settings_from_str(ron_str: &str) -> Result<RenderSettings, SettingsError> {
    let options = ron::Options::default()
        .with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME);
    options
        .from_str(ron_str)
        .map_err(|e| SettingsError::ParseError(e.to_string()))
}

/// Read and parse a RON settings file.
pub fn load_settings(path: impl AsRef<Path>) -> Result<RenderSettings, SettingsError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| SettingsError::ReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let settings = load_settings_from_str(&text)?;
    log::info!("Loaded render settings from {}", path.display());
    Ok(settings)
}
