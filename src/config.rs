use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::controller::ScaleOptions;
use crate::data::loader::SchemaMode;
use crate::data::model::Attribute;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CAR_SCATTER_CONFIG";
/// Config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "car-scatter.json";

#[derive(Debug, Parser)]
#[command(name = "car-scatter")]
#[command(about = "Interactive scatter plot of the automotive dataset")]
pub struct Cli {
    /// CSV file to open on startup (overrides `data_path` from the config)
    pub data: Option<PathBuf>,
}

/// Viewer settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// CSV loaded on startup.
    pub data_path: Option<PathBuf>,
    pub schema: SchemaMode,
    pub x_axis: Attribute,
    pub y_axis: Attribute,
    pub y_padding: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            schema: SchemaMode::Auto,
            x_axis: Attribute::Mpg,
            y_axis: Attribute::Horsepower,
            y_padding: ScaleOptions::default().y_padding,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: ViewerConfig = serde_json::from_str(text).context("parsing viewer config")?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text)
    }

    /// `$CAR_SCATTER_CONFIG`, else `./car-scatter.json` if it exists, else defaults.
    /// A broken file is logged and replaced by defaults.
    pub fn discover() -> Self {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(p) => PathBuf::from(p),
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !local.exists() {
                    return Self::default();
                }
                local
            }
        };
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Using config {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config: {e:#}");
                Self::default()
            }
        }
    }

    /// A data path given on the command line wins over `data_path`.
    pub fn with_cli(mut self, cli: Cli) -> Self {
        if let Some(path) = cli.data {
            self.data_path = Some(path);
        }
        self
    }

    pub fn scale_options(&self) -> ScaleOptions {
        ScaleOptions {
            y_padding: self.y_padding,
            ..ScaleOptions::default()
        }
    }
}
