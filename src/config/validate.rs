// src/config/validate.rs

use regex::Regex;

use crate::config::model::{ConfigFile, RawConfigFile, ServerSection, WatchSection};
use crate::errors::{CsvwatchError, Result};
use crate::watch::filter::build_globset;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = CsvwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.watch, raw.server))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_watch_section(&cfg.watch)?;
    validate_server_section(&cfg.server)?;
    Ok(())
}

fn validate_watch_section(watch: &WatchSection) -> Result<()> {
    if watch.folder.trim().is_empty() {
        return Err(CsvwatchError::Config(
            "[watch].folder must not be empty".to_string(),
        ));
    }

    Regex::new(&watch.filter).map_err(|e| {
        CsvwatchError::Config(format!(
            "[watch].filter is not a valid regex ({:?}): {e}",
            watch.filter
        ))
    })?;

    build_globset(&watch.exclude).map_err(|e| {
        CsvwatchError::Config(format!("[watch].exclude contains an invalid glob: {e}"))
    })?;

    Ok(())
}

fn validate_server_section(server: &ServerSection) -> Result<()> {
    if server.port == 0 {
        return Err(CsvwatchError::Config(
            "[server].port must be >= 1 (got 0)".to_string(),
        ));
    }

    if server.socket_addr().is_none() {
        return Err(CsvwatchError::Config(format!(
            "[server].host must be an IP address (got {:?})",
            server.host
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(folder: &str, filter: &str) -> RawConfigFile {
        RawConfigFile {
            watch: WatchSection {
                folder: folder.to_string(),
                filter: filter.to_string(),
                exclude: Vec::new(),
                recursive: false,
                skip_unchanged: false,
            },
            server: ServerSection::default(),
        }
    }

    #[test]
    fn accepts_minimal_config() {
        let cfg = ConfigFile::try_from(raw("data", r"\.csv$")).unwrap();
        assert_eq!(cfg.watch.folder, "data");
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn rejects_blank_folder() {
        let err = ConfigFile::try_from(raw("  ", r"\.csv$")).unwrap_err();
        assert!(matches!(err, CsvwatchError::Config(msg) if msg.contains("folder")));
    }

    #[test]
    fn rejects_invalid_filter_regex() {
        let err = ConfigFile::try_from(raw("data", "(unclosed")).unwrap_err();
        assert!(matches!(err, CsvwatchError::Config(msg) if msg.contains("filter")));
    }

    #[test]
    fn rejects_invalid_exclude_glob() {
        let mut cfg = raw("data", r"\.csv$");
        cfg.watch.exclude.push("a[".to_string());
        let err = ConfigFile::try_from(cfg).unwrap_err();
        assert!(matches!(err, CsvwatchError::Config(msg) if msg.contains("exclude")));
    }

    #[test]
    fn rejects_port_zero_and_bad_host() {
        let mut cfg = raw("data", r"\.csv$");
        cfg.server.port = 0;
        assert!(ConfigFile::try_from(cfg).is_err());

        let mut cfg = raw("data", r"\.csv$");
        cfg.server.host = "localhost:80".to_string();
        let err = ConfigFile::try_from(cfg).unwrap_err();
        assert!(matches!(err, CsvwatchError::Config(msg) if msg.contains("host")));
    }
}
