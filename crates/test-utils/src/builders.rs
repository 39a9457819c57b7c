#![allow(dead_code)]

use csvwatch::config::{ConfigFile, RawConfigFile, ServerSection, WatchSection};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new(folder: &str) -> Self {
        Self {
            config: RawConfigFile {
                watch: WatchSection {
                    folder: folder.to_string(),
                    filter: r"\.csv$".to_string(),
                    exclude: vec![],
                    recursive: false,
                    skip_unchanged: false,
                },
                server: ServerSection::default(),
            },
        }
    }

    pub fn filter(mut self, regex: &str) -> Self {
        self.config.watch.filter = regex.to_string();
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.config.watch.exclude.push(pattern.to_string());
        self
    }

    pub fn recursive(mut self, val: bool) -> Self {
        self.config.watch.recursive = val;
        self
    }

    pub fn skip_unchanged(mut self, val: bool) -> Self {
        self.config.watch.skip_unchanged = val;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn host(mut self, host: &str) -> Self {
        self.config.server.host = host.to_string();
        self
    }

    /// The unvalidated config, for tests that exercise validation itself.
    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}
