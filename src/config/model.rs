// src/config/model.rs

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use notify::RecursiveMode;
use serde::Deserialize;

/// Configuration exactly as read from a TOML file, before validation.
///
/// ```toml
/// [watch]
/// folder = "data"
/// filter = "\\.csv$"
/// exclude = ["**/tmp/**"]
/// recursive = false
///
/// [server]
/// host = "0.0.0.0"
/// port = 8080
/// ```
///
/// Only `[watch].folder` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    pub watch: WatchSection,

    #[serde(default)]
    pub server: ServerSection,
}

/// Validated configuration. Build one via `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub watch: WatchSection,
    pub server: ServerSection,
}

impl ConfigFile {
    /// Construct without validation. Only `validate.rs` should call this.
    pub(crate) fn new_unchecked(watch: WatchSection, server: ServerSection) -> Self {
        Self { watch, server }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Directory holding the CSV files.
    ///
    /// Relative paths are resolved against the directory of the config file.
    pub folder: String,

    /// Regex a root-relative path (e.g. `"sub/a.csv"`) must match to be loaded.
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Glob patterns excluded even when `filter` matches.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether subdirectories receive live updates too. Bootstrap always
    /// walks the whole tree.
    #[serde(default)]
    pub recursive: bool,

    /// Skip re-parsing a file whose content hash did not change.
    #[serde(default)]
    pub skip_unchanged: bool,
}

fn default_filter() -> String {
    r"\.csv$".to_string()
}

impl WatchSection {
    /// Resolve `folder` against the directory containing the config file.
    pub fn resolve_folder(&self, config_path: &Path) -> PathBuf {
        let folder = PathBuf::from(&self.folder);
        if folder.is_absolute() {
            return folder;
        }
        config_path
            .parent()
            .map(|p| p.join(&folder))
            .unwrap_or(folder)
    }

    pub fn recursive_mode(&self) -> RecursiveMode {
        if self.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSection {
    /// Socket address to bind. `host` has already been validated.
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        let ip: IpAddr = self.host.parse().ok()?;
        Some(SocketAddr::new(ip, self.port))
    }
}
