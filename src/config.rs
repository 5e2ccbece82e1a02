//! Pack configuration: defaults, config file and CLI layers
//!
//! Configuration arrives in layers that are merged in order
//! (built-in defaults, then `repopack.config.json`, then CLI flags) and
//! validated once. The packer only ever sees the merged `PackConfig`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PackError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "repopack.config.json";
pub const DEFAULT_OUTPUT_FILE: &str = "repopack-output.txt";
const DEFAULT_TOP_FILES_LENGTH: usize = 5;

/// Fully merged, validated configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackConfig {
    pub output: OutputSettings,
    pub ignore: IgnoreSettings,
    /// Allow-list of paths or globs. Empty means everything not ignored.
    pub include: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSettings {
    /// Output document path, relative to the root directory unless absolute.
    pub file_path: String,
    /// Extra text placed in the document header.
    pub header_text: Option<String>,
    pub show_line_numbers: bool,
    pub remove_empty_lines: bool,
    /// How many of the largest files the summary lists.
    pub top_files_length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnoreSettings {
    pub use_gitignore: bool,
    pub use_default_patterns: bool,
    pub custom_patterns: Vec<String>,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            output: OutputSettings {
                file_path: DEFAULT_OUTPUT_FILE.to_string(),
                header_text: None,
                show_line_numbers: false,
                remove_empty_lines: false,
                top_files_length: DEFAULT_TOP_FILES_LENGTH,
            },
            ignore: IgnoreSettings {
                use_gitignore: true,
                use_default_patterns: true,
                custom_patterns: Vec::new(),
            },
            include: Vec::new(),
        }
    }
}

/// A partial configuration, as read from a config file or built from CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigLayer {
    pub output: Option<OutputLayer>,
    pub ignore: Option<IgnoreLayer>,
    pub include: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputLayer {
    pub file_path: Option<String>,
    pub header_text: Option<String>,
    pub show_line_numbers: Option<bool>,
    pub remove_empty_lines: Option<bool>,
    pub top_files_length: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnoreLayer {
    pub use_gitignore: Option<bool>,
    pub use_default_patterns: Option<bool>,
    pub custom_patterns: Option<Vec<String>>,
}

impl PackConfig {
    /// Apply a layer on top of this configuration.
    ///
    /// Scalars from the layer replace existing values; pattern lists are appended.
    pub fn merge(mut self, layer: ConfigLayer) -> Self {
        if let Some(output) = layer.output {
            if let Some(v) = output.file_path {
                self.output.file_path = v;
            }
            if output.header_text.is_some() {
                self.output.header_text = output.header_text;
            }
            if let Some(v) = output.show_line_numbers {
                self.output.show_line_numbers = v;
            }
            if let Some(v) = output.remove_empty_lines {
                self.output.remove_empty_lines = v;
            }
            if let Some(v) = output.top_files_length {
                self.output.top_files_length = v;
            }
        }
        if let Some(ignore) = layer.ignore {
            if let Some(v) = ignore.use_gitignore {
                self.ignore.use_gitignore = v;
            }
            if let Some(v) = ignore.use_default_patterns {
                self.ignore.use_default_patterns = v;
            }
            if let Some(v) = ignore.custom_patterns {
                self.ignore.custom_patterns.extend(v);
            }
        }
        if let Some(include) = layer.include {
            self.include.extend(include);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.output.file_path.trim().is_empty() {
            return Err(PackError::ConfigInvalid(
                "output.filePath must not be empty".to_string(),
            ));
        }
        if self.ignore.custom_patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(PackError::ConfigInvalid(
                "ignore.customPatterns must not contain empty patterns".to_string(),
            ));
        }
        if self.include.iter().any(|p| p.trim().is_empty()) {
            return Err(PackError::ConfigInvalid(
                "include must not contain empty patterns".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse config file text.
pub fn parse_config(path: &Path, text: &str) -> Result<ConfigLayer> {
    serde_json::from_str(text).map_err(|source| PackError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the config file layer.
///
/// An explicitly requested file must exist. The default
/// `repopack.config.json` in `root` is optional.
pub fn load_config_layer(root: &Path, explicit: Option<&Path>) -> Result<ConfigLayer> {
    let path: PathBuf = match explicit {
        Some(p) => p.to_path_buf(),
        None => root.join(DEFAULT_CONFIG_FILE),
    };

    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(err) if err.kind() == io::ErrorKind::NotFound && explicit.is_none() => {
            debug!(path = %path.display(), "no config file found, using defaults");
            return Ok(ConfigLayer::default());
        }
        Err(source) => return Err(PackError::ConfigRead { path, source }),
    };

    debug!(path = %path.display(), "loaded config file");
    parse_config(&path, &text)
}

/// Build the final configuration for packing `root`.
pub fn resolve_config(root: &Path, explicit: Option<&Path>, cli: ConfigLayer) -> Result<PackConfig> {
    let file = load_config_layer(root, explicit)?;
    let config = PackConfig::default().merge(file).merge(cli);
    config.validate()?;
    Ok(config)
}
