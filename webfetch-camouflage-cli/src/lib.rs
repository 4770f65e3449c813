//! WebFetch Camouflage CLI
//!
//! Argument parsing, logging setup and subcommand dispatch for the
//! `webfetch-camouflage` binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod signal_handler;

use cli::{Cli, Commands};
use error::{handle_cli_result, CliResult};
use webfetch_camouflage_config::{ConfigProvider, ServerConfig};

/// Load configuration, layering the `--config` file when given
pub fn load_config(cli: &Cli) -> CliResult<ServerConfig> {
    let provider = match &cli.config {
        Some(path) => ConfigProvider::new().with_config_file(path),
        None => ConfigProvider::new(),
    };
    Ok(provider.load()?)
}

/// Run the parsed command line and return the process exit code
pub async fn run(cli: Cli) -> i32 {
    let config = load_config(&cli);

    let configured_filter = config
        .as_ref()
        .ok()
        .and_then(|config| config.logging.filter.clone());
    logging::configure_logging(cli.debug, cli.quiet, configured_filter.as_deref());

    let config = match config {
        Ok(config) => config,
        Err(e) => return handle_cli_result::<()>(Err(e)),
    };
    tracing::debug!(
        default_impersonate = %config.default_impersonate,
        "Configuration loaded"
    );

    let result = match &cli.command {
        None | Some(Commands::Serve { subcommand: None }) => {
            commands::serve::handle_command(None, &config).await
        }
        Some(Commands::Serve {
            subcommand: Some(subcommand),
        }) => commands::serve::handle_command(Some(subcommand), &config).await,
        Some(Commands::Fetch { url, impersonate }) => {
            commands::fetch::handle_command(&config, url, impersonate.as_deref()).await
        }
        Some(Commands::Profiles { json }) => commands::profiles::handle_command(*json),
    };

    handle_cli_result(result)
}
