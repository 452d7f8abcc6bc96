use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

pub const DEFAULT_INPUT_DIR: &str = "images";
pub const DEFAULT_OUTPUT_DIR: &str = "pgm_images";
pub const DEFAULT_SIZE: u32 = 32;
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Where to read the dataset from, where to write it, and the target size.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Source file extension, matched case-sensitively and without the dot.
    pub extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl Config {
    /// Reads a config file. `.json` files go through serde_json, anything else is YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let is_json = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

        let config: Config = if is_json {
            Self::from_json(&text)
        } else {
            Self::from_yaml(&text)
        }
        .map_err(|message| Error::ConfigParse { path: path.to_path_buf(), message })?;

        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> std::result::Result<Self, String> {
        // An empty YAML document means "all defaults".
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| e.to_string())
    }

    pub fn from_json(text: &str) -> std::result::Result<Self, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Config(format!(
                "target size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.extension.is_empty() {
            return Err(Error::Config("extension must not be empty".to_string()));
        }
        if self.extension.starts_with('.') {
            return Err(Error::Config(format!(
                "extension is given without the leading dot, got {:?}",
                self.extension
            )));
        }
        Ok(())
    }
}
