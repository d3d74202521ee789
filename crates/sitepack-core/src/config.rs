//! Configuration types for sitepack builds.
//!
//! Values are layered: built-in defaults, then an optional `sitepack.toml`,
//! then environment variables and command-line flags (applied by the CLI).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::AppError;
use crate::text::EncodingChain;

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "sitepack.toml";

/// Paths and switches for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackConfig {
    /// Folder holding the site fragments.
    pub sites_dir: PathBuf,
    /// Pretty-printed aggregate.
    pub pretty_path: PathBuf,
    /// Compact aggregate.
    pub pack_path: PathBuf,
    /// Base64 text of the compact aggregate.
    pub bin_path: PathBuf,
    /// Reformat the fragments in place before aggregating.
    pub format_sources: bool,
    pub encodings: EncodingChain,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            sites_dir: PathBuf::from("sites"),
            pretty_path: PathBuf::from("user.sites.json"),
            pack_path: PathBuf::from("user.sites.pack.json"),
            bin_path: PathBuf::from("user.sites.bin"),
            format_sources: true,
            encodings: EncodingChain::default(),
        }
    }
}

impl PackConfig {
    /// The three output files, in the order they are produced.
    pub fn outputs(&self) -> [&Path; 3] {
        [
            self.pretty_path.as_path(),
            self.pack_path.as_path(),
            self.bin_path.as_path(),
        ]
    }

    fn apply(&mut self, file: ConfigFile) -> Result<(), AppError> {
        if let Some(sites_dir) = file.sites_dir {
            self.sites_dir = sites_dir;
        }
        if let Some(output) = file.output {
            if let Some(pretty) = output.pretty {
                self.pretty_path = pretty;
            }
            if let Some(pack) = output.pack {
                self.pack_path = pack;
            }
            if let Some(bin) = output.bin {
                self.bin_path = bin;
            }
        }
        if let Some(format_sources) = file.format_sources {
            self.format_sources = format_sources;
        }
        if let Some(labels) = file.encodings {
            self.encodings = EncodingChain::from_labels(&labels)?;
        }
        Ok(())
    }
}

/// On-disk shape of `sitepack.toml`. Every key is optional.
///
/// ```toml
/// sites_dir = "sites"
/// format_sources = true
/// encodings = ["utf-8", "gbk"]
///
/// [output]
/// pretty = "user.sites.json"
/// pack = "user.sites.pack.json"
/// bin = "user.sites.bin"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    sites_dir: Option<PathBuf>,
    format_sources: Option<bool>,
    encodings: Option<Vec<String>>,
    output: Option<OutputSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputSection {
    pretty: Option<PathBuf>,
    pack: Option<PathBuf>,
    bin: Option<PathBuf>,
}

/// Returns the default config file path, relative to the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Loads the build configuration.
///
/// With `explicit` set the file must exist. Otherwise the default path is
/// tried and silently ignored when absent.
pub fn load_pack_config(explicit: Option<&Path>) -> Result<PackConfig, AppError> {
    let mut config = PackConfig::default();
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = default_config_path();
            if !path.exists() {
                debug!("No {} found, using defaults", path.display());
                return Ok(config);
            }
            path
        }
    };

    let text = fs::read_to_string(&path).map_err(|e| {
        AppError::ConfigError(format!("cannot read {}: {}", path.display(), e))
    })?;
    config.apply(parse_config(&text, &path)?)?;
    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

fn parse_config(text: &str, path: &Path) -> Result<ConfigFile, AppError> {
    toml::from_str(text)
        .map_err(|e| AppError::ConfigError(format!("invalid {}: {}", path.display(), e)))
}
