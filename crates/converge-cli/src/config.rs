//! `converge.toml` loading.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, OutputFormat};

/// File read from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "converge.toml";

/// Settings for the `converge` binary.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub output: OutputConfig,
    /// Container kind of the managed root built from the current file.
    pub root: RootKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Pretty-print JSON, both on stdout and in files written by `sync --write`.
    pub pretty: bool,
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            pretty: true,
            color: true,
        }
    }
}

/// Which container the managed root is created as.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RootKind {
    /// Follow the shape of the current file, or of the target when the
    /// current file is missing.
    #[default]
    Auto,
    Map,
    Sequence,
}

impl CliConfig {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] when it exists.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Command-line flags win over file values.
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(format) = cli.format {
            self.output.format = format;
        }
        if cli.compact {
            self.output.pretty = false;
        }
        if cli.no_color {
            self.output.color = false;
        }
        if let Some(root) = cli.root {
            self.root = root;
        }
    }
}
