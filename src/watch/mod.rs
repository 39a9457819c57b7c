// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Deciding which files participate (`filter`).
//! - Seeding the registry with a recursive walk at startup (`bootstrap`).
//! - Wiring up a cross-platform filesystem watcher (`notify`) and turning
//!   create/write events into registry reloads (`watcher`, `event_handler`).
//!
//! It does **not** know about HTTP or rendering; it only keeps the
//! [`Registry`](crate::registry::Registry) in sync with the directory.

pub mod bootstrap;
pub mod event_handler;
pub mod filter;
pub mod path_utils;
pub mod watcher;

pub use bootstrap::{bootstrap, BootstrapReport};
pub use filter::{PathFilter, WatchFilter};
pub use watcher::{spawn_watcher, WatcherHandle};
