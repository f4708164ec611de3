//! # Settings Loader
//!
//! Centralized loading of the demo configuration. The dashboard runs
//! entirely from built-in defaults; a `demo_settings.json` file can override
//! any of the timing constants, series parameters, or the bank list.
//!
//! ## Features
//!
//! - Load settings from specified file paths
//! - Load settings from the default location (`demo_settings.json`)
//! - Handle optional settings gracefully
//! - Fall back to `DemoSettings::default()` when no file is found
//! - Validation and error handling for malformed settings files
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! // Load settings from a specific path
//! let settings = settings_loader::load_settings("config/demo_settings.json").unwrap();
//!
//! // Load optional settings (returns None if no path is provided)
//! let path = Some(PathBuf::from("demo_settings.json"));
//! let settings = settings_loader::load_optional_settings(path.as_ref()).unwrap();
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use models::DemoSettings;

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<DemoSettings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: DemoSettings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    Ok(settings)
}

/// Loads settings from the default location (demo_settings.json in the current directory)
pub fn load_default_settings() -> Result<DemoSettings> {
    load_settings("demo_settings.json")
}

/// Loads settings from an optional path, returning None if no path is provided
pub fn load_optional_settings(path: Option<&PathBuf>) -> Result<Option<DemoSettings>> {
    match path {
        Some(settings_path) => Ok(Some(load_settings(settings_path)?)),
        None => Ok(None),
    }
}

/// Tries to load settings from the provided path, falling back to the default
/// location if the path is None or unreadable, and to the built-in defaults
/// when no settings file is found anywhere.
pub fn load_settings_with_fallback(path: Option<&PathBuf>) -> Result<DemoSettings> {
    // First try the provided path
    if let Some(settings_path) = path {
        match load_settings(settings_path) {
            Ok(settings) => return Ok(settings),
            Err(_) => {
                // If the provided path fails, fall back to checking default location
            }
        }
    }

    // Try default location, then built-in defaults
    match load_default_settings() {
        Ok(settings) => Ok(settings),
        Err(_) => Ok(DemoSettings::default()),
    }
}

/// Checks if a settings file exists at the given path
pub fn settings_file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists() && path.as_ref().is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_settings_partial_override() {
        let path = write_temp(
            "b360_settings_partial.json",
            r#"{"starting_cash": 50000.0, "timings": {"connect_ms": 10}}"#,
        );
        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.starting_cash, 50000.0);
        assert_eq!(settings.timings.connect_ms, 10);
        // Unspecified values keep their defaults
        assert_eq!(settings.unlocked_balance, 87650.0);
        assert_eq!(settings.timings.animation_steps, 60);
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_settings_malformed() {
        let path = write_temp("b360_settings_bad.json", "{not json");
        assert!(load_settings(&path).is_err());
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_optional_settings_none() {
        let loaded = load_optional_settings(None).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_fallback_to_defaults() {
        let missing = PathBuf::from("/definitely/not/here/demo_settings.json");
        let settings = load_settings_with_fallback(Some(&missing)).unwrap();
        assert_eq!(settings.starting_cash, 84849.0);
    }
}
