// Hide console window on Windows release builds
#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use anyhow::{Context, Result};
use fontpeek::cli;
use fontpeek::logging::{self, LogContext};
use fontpeek_config::Config;

fn main() -> Result<()> {
    // Process CLI arguments first (before logging init for cleaner output)
    let options = cli::process_cli();

    // An explicit --config must exist; the default location is optional
    let mut config_warning = None;
    let mut config = match options.config_path {
        Some(ref path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load().unwrap_or_else(|e| {
            config_warning = Some(format!("Ignoring invalid config file: {e}"));
            Config::default()
        }),
    };
    options.apply_to(&mut config);

    let rust_log = std::env::var("RUST_LOG").ok();
    let level = logging::resolve_level(options.log_level, rust_log.as_deref(), config.log_level);
    let log = LogContext::init(&config.log_path(), level)?;

    log::info!("Starting fontpeek v{}", fontpeek::VERSION);
    if let Some(path) = log.path() {
        log::info!("Logging to {} at level {}", path.display(), log.level());
    }
    if let Some(warning) = config_warning {
        log::warn!("{}", warning);
    }

    let result = fontpeek::app::run(config, options.folder.clone());
    if let Err(ref e) = result {
        log::error!("fontpeek failed: {e:#}");
        eprintln!("fontpeek: error: {e:#}");
    }
    log.flush();

    // Return the original error so main exits with code 1 (anyhow default)
    result
}
