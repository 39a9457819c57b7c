// src/watch/filter.rs

use std::fmt;

use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;

use crate::config::model::WatchSection;
use crate::errors::Result;

/// Decides whether a root-relative key (e.g. `"sub/a.csv"`) takes part in
/// loading and watching.
///
/// The same instance must be used for the bootstrap walk and for live
/// events, otherwise the initial snapshot and live updates disagree.
pub trait PathFilter: Send + Sync {
    fn matches(&self, rel_path: &str) -> bool;
}

impl<F> PathFilter for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn matches(&self, rel_path: &str) -> bool {
        self(rel_path)
    }
}

/// Regex include plus optional glob excludes.
#[derive(Clone)]
pub struct WatchFilter {
    include: Regex,
    exclude: Option<GlobSet>,
}

impl fmt::Debug for WatchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchFilter")
            .field("include", &self.include.as_str())
            .finish_non_exhaustive()
    }
}

impl WatchFilter {
    pub fn new(include: &str, exclude: &[String]) -> Result<Self> {
        let include = Regex::new(include)?;
        let exclude = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude)?)
        };
        Ok(Self { include, exclude })
    }

    pub fn from_config(watch: &WatchSection) -> Result<Self> {
        Self::new(&watch.filter, &watch.exclude)
    }
}

impl PathFilter for WatchFilter {
    fn matches(&self, rel_path: &str) -> bool {
        if !self.include.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }
}

/// Build a GlobSet from simple string patterns.
pub fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat)?);
    }
    Ok(builder.build()?)
}
