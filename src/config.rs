//! TOML configuration for recipe ingestion.
//!
//! Every section and key has a default, so a missing configuration file
//! yields a usable [`Config`] that scans `./recipes` and publishes to a
//! local search index. See [`load_config`] for the validation rules.

use anyhow::{bail, Context, Result};
use globset::Glob;
use reqwest::Url;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::identity::IdMode;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub ids: IdsConfig,
    #[serde(default)]
    pub markers: MarkersConfig,
}

/// Where recipe documents are read from.
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            extension: default_extension(),
            exclude_globs: Vec::new(),
            follow_symlinks: false,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("./recipes")
}
fn default_extension() -> String {
    "md".to_string()
}

/// The search index that receives the batch.
#[derive(Debug, Deserialize, Clone)]
pub struct IndexConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_uid")]
    pub uid: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// No timeout unless set; the HTTP client default applies.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            uid: default_uid(),
            api_key: None,
            timeout_secs: None,
        }
    }
}

fn default_url() -> String {
    "http://localhost:7700".to_string()
}
fn default_uid() -> String {
    "receipts".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct IdsConfig {
    #[serde(default)]
    pub mode: IdMode,
}

/// Heading keywords that route a section's content into a record field.
///
/// Matching is substring containment against the heading text.
#[derive(Debug, Deserialize, Clone)]
pub struct MarkersConfig {
    #[serde(default = "default_directions")]
    pub directions: String,
    #[serde(default = "default_ingredients")]
    pub ingredients: String,
    #[serde(default = "default_notes")]
    pub notes: String,
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            directions: default_directions(),
            ingredients: default_ingredients(),
            notes: default_notes(),
        }
    }
}

fn default_directions() -> String {
    "操作".to_string()
}
fn default_ingredients() -> String {
    "必备原料和工具".to_string()
}
fn default_notes() -> String {
    "附加内容".to_string()
}

impl IndexConfig {
    /// The documents endpoint: `<url>/indexes/<uid>/documents`.
    ///
    /// A path on the base URL is kept, so `http://host/search` becomes
    /// `http://host/search/indexes/<uid>/documents`.
    pub fn documents_url(&self) -> Result<Url> {
        let mut base = Url::parse(&self.url)
            .with_context(|| format!("Invalid index url: {}", self.url))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join(&format!("indexes/{}/documents", self.uid))
            .with_context(|| format!("Cannot build documents endpoint from {}", self.url))?;
        Ok(endpoint)
    }
}

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Resolve the configuration for a run.
///
/// An explicitly requested file must exist. The default location is
/// optional and falls back to [`Config::default`] when absent.
pub fn resolve_config(explicit: Option<&Path>, default_path: &Path) -> Result<Config> {
    match explicit {
        Some(path) => load_config(path),
        None if default_path.exists() => load_config(default_path),
        None => Ok(Config::default()),
    }
}

/// Check the invariants a run depends on. Also used after CLI overrides.
pub fn validate(config: &Config) -> Result<()> {
    let url = Url::parse(&config.index.url)
        .with_context(|| format!("index.url is not a valid URL: {}", config.index.url))?;
    match url.scheme() {
        "http" | "https" => {}
        other => bail!("index.url must use http or https, got '{}'", other),
    }

    let uid = config.index.uid.trim();
    if uid.is_empty() {
        bail!("index.uid must not be empty");
    }
    if uid.contains('/') {
        bail!("index.uid must not contain '/': {}", config.index.uid);
    }

    for (name, marker) in [
        ("directions", &config.markers.directions),
        ("ingredients", &config.markers.ingredients),
        ("notes", &config.markers.notes),
    ] {
        if marker.is_empty() {
            bail!("markers.{} must not be empty", name);
        }
    }

    if config.source.extension.trim_start_matches('.').is_empty() {
        bail!("source.extension must not be empty");
    }

    for pattern in &config.source.exclude_globs {
        Glob::new(pattern)
            .with_context(|| format!("Invalid exclude glob: {}", pattern))?;
    }

    Ok(())
}
