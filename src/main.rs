// TextureCatalog - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading (config.toml) and logging initialisation
// 3. Data file resolution and catalog loading
// 4. Command dispatch

mod cli;

use clap::Parser;
use cli::Cli;
use texture_catalog::app::catalog::Catalog;
use texture_catalog::app::store::RecordStore;
use texture_catalog::core::export::DocumentLayout;
use texture_catalog::platform::config::{self, PlatformPaths};
use texture_catalog::util;

fn main() {
    let cli = Cli::parse();

    let platform_paths = PlatformPaths::resolve();
    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| platform_paths.config_dir.clone());

    // Config is read before logging so that [logging] can take effect.
    let (app_config, config_warnings) = config::load_config(&config_dir);

    util::logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        app_config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "{} starting",
        util::constants::APP_NAME
    );
    for warning in &config_warnings {
        tracing::warn!("{warning}");
    }

    // Data file: CLI override > config > platform default
    let data_file = cli
        .data_file
        .clone()
        .or_else(|| app_config.data_file.clone())
        .unwrap_or_else(|| platform_paths.default_data_file());

    let layout = DocumentLayout {
        page_lines: app_config.page_lines,
        line_width: app_config.line_width,
    };

    let result = Catalog::open(RecordStore::new(data_file))
        .and_then(|mut catalog| cli::run(cli.command, &mut catalog, &layout));

    if let Err(e) = result {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
