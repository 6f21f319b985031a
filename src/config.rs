//! Optional project configuration (`navdoc.toml`).
//!
//! Every key has a default, so an empty file (or no file) is valid.
//! Command-line flags override the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "navdoc.toml";

const DEFAULT_TITLE: &str = "Neural Network Library User Manual";
const DEFAULT_FUNCTIONS_LABEL: &str = "Descriptions of Functions";
const DEFAULT_STRUCTURES_LABEL: &str = "Data Structures";
const SYNC_ON: &str = "click to disable panel synchronisation";
const SYNC_OFF: &str = "click to enable panel synchronisation";
const INDEX_PAGE_SIZE: usize = 250;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Label of the navigation root
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_functions_label")]
    pub functions_label: String,

    #[serde(default = "default_structures_label")]
    pub structures_label: String,

    #[serde(default = "default_sync_on")]
    pub sync_on_message: String,

    #[serde(default = "default_sync_off")]
    pub sync_off_message: String,

    /// Entries per `navtreeindexN.js` page
    #[serde(default = "default_index_page_size")]
    pub index_page_size: usize,

    /// Sort group members by name instead of declaration order
    #[serde(default)]
    pub sort_members: bool,

    /// Emit the Doxygen licence notice at the top of `navtreedata.js`
    #[serde(default = "default_true")]
    pub license_banner: bool,

    /// Macros considered defined while reading sources (`NAME` or `NAME=VALUE`)
    #[serde(default)]
    pub predefined: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            title: default_title(),
            functions_label: default_functions_label(),
            structures_label: default_structures_label(),
            sync_on_message: default_sync_on(),
            sync_off_message: default_sync_off(),
            index_page_size: default_index_page_size(),
            sort_members: false,
            license_banner: true,
            predefined: Vec::new(),
        }
    }
}

impl Config {
    /// Load an explicit config file, or `navdoc.toml` from the working
    /// directory when present, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let candidate = Path::new(DEFAULT_CONFIG_FILE);
                if !candidate.is_file() {
                    return Ok(Config::default());
                }
                candidate.to_path_buf()
            }
        };
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Config::parse(&content).with_context(|| format!("invalid config: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content)?;
        if config.index_page_size == 0 {
            anyhow::bail!("index_page_size must be at least 1");
        }
        Ok(config)
    }
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_functions_label() -> String {
    DEFAULT_FUNCTIONS_LABEL.to_string()
}

fn default_structures_label() -> String {
    DEFAULT_STRUCTURES_LABEL.to_string()
}

fn default_sync_on() -> String {
    SYNC_ON.to_string()
}

fn default_sync_off() -> String {
    SYNC_OFF.to_string()
}

fn default_index_page_size() -> usize {
    INDEX_PAGE_SIZE
}

fn default_true() -> bool {
    true
}
