//! Optional YAML configuration.
//!
//! Looked up at the path given on the command line, else `kpiboard.yaml` in
//! the working directory. Every field is optional; a missing default file is
//! not an error.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{load::LoadOptions, select::DuplicatePolicy};

pub const DEFAULT_CONFIG_FILE: &str = "kpiboard.yaml";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Duplicate (perspective, sub-unit, month) handling
    #[serde(default)]
    pub duplicates: DuplicatePolicy,

    /// Worksheet to read from spreadsheet uploads
    #[serde(default)]
    pub sheet: Option<String>,

    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default)]
    pub log: Option<String>,
}

impl Config {
    /// Load `explicit`, or the default file if it exists, or defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let path: PathBuf = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !p.is_file() {
                    return Ok(Config::default());
                }
                p
            }
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Config::from_yaml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> Result<Config> {
        if text.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            duplicates: self.duplicates,
            sheet: self.sheet.clone(),
        }
    }

    pub fn log_filter(&self) -> &str {
        self.log.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}
