// src/lib.rs

pub mod cli;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod registry;
pub mod render;
pub mod server;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{load_and_validate, ConfigFile};
use crate::fs::RealFileSystem;
use crate::registry::Registry;
use crate::server::AppState;
use crate::watch::{PathFilter, WatchFilter};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the initial directory walk
/// - the file watcher
/// - the HTTP server, until Ctrl-C
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading config {config_path:?}"))?;

    let folder = cfg.watch.resolve_folder(&config_path);
    // Event paths from notify are absolute, so keys must be computed
    // against an absolute root.
    let root = match std::fs::canonicalize(&folder) {
        Ok(p) => p,
        Err(e) => {
            warn!(folder = ?folder, "cannot canonicalize watch folder: {e}");
            folder
        }
    };

    let filter: Arc<dyn PathFilter> = Arc::new(WatchFilter::from_config(&cfg.watch)?);
    let registry = Arc::new(
        Registry::new(root, Arc::new(RealFileSystem))
            .with_skip_unchanged(cfg.watch.skip_unchanged),
    );

    let report = watch::bootstrap(&registry, filter.as_ref())?;
    debug!(?report, "bootstrap report");

    if args.dry_run {
        print_dry_run(&cfg, &registry);
        return Ok(());
    }

    let watcher = watch::spawn_watcher(
        Arc::clone(&registry),
        Arc::clone(&filter),
        cfg.watch.recursive_mode(),
    )?;

    let mut server_cfg = cfg.server.clone();
    if let Some(port) = args.port {
        server_cfg.port = port;
    }
    let addr = server_cfg
        .socket_addr()
        .with_context(|| format!("invalid listen address {}:{}", server_cfg.host, server_cfg.port))?;

    let app = server::router(AppState::new(Arc::clone(&registry)));
    let served = server::serve(addr, app, shutdown_signal()).await;

    watcher.shutdown().await;
    served?;

    info!("csvwatch stopped");
    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

/// Print the resolved config and every loaded dataset.
fn print_dry_run(cfg: &ConfigFile, registry: &Registry) {
    println!("csvwatch dry-run");
    println!("  watch.folder = {:?}", registry.root());
    println!("  watch.filter = {}", cfg.watch.filter);
    if !cfg.watch.exclude.is_empty() {
        println!("  watch.exclude = {:?}", cfg.watch.exclude);
    }
    println!("  watch.recursive = {}", cfg.watch.recursive);
    println!("  server = {}:{}", cfg.server.host, cfg.server.port);
    println!();

    let snapshot = registry.snapshot();
    println!("datasets ({}):", snapshot.len());
    for (key, dataset) in &snapshot {
        println!(
            "  - {key} ({} columns, {} rows)",
            dataset.header().len(),
            dataset.len()
        );
    }

    debug!("dry-run complete (not serving)");
}
