//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function sets up logging and routes the parsed CLI to
//! the appropriate subcommand handler: [`ping`], [`lookup`], [`health`],
//! or [`validate`]. Each handler lives in its own submodule.

pub mod health;
pub mod lookup;
pub mod ping;
pub mod validate;

use std::sync::Arc;

use crate::cli::{Cli, Commands};
use crate::client::{build_http_client, HttpClient};
use crate::config::model::Config;
use crate::error::ClientError;
use crate::logging;
use crate::tokenx::{OAuth2TokenService, TokenProvider};

pub async fn dispatch(cli: Cli) -> Result<(), ClientError> {
    let common = cli.common;
    logging::init(
        &common.log_level,
        logging::resolve_format(common.pretty, common.json_logs),
    );

    match cli.command {
        Some(Commands::Ping) => ping::execute(&common.config).await,
        Some(Commands::Lookup(args)) => lookup::execute(&common.config, args).await,
        Some(Commands::Health(args)) => health::execute(&common.config, &args).await,
        Some(Commands::Validate(ref args)) => validate::execute(&common.config, args),
        None => {
            print_welcome();
            Ok(())
        }
    }
}

/// Shared transport and token provider for one process.
pub(crate) fn transport(config: &Config) -> (HttpClient, Arc<dyn TokenProvider>) {
    let http = build_http_client();
    let provider = Arc::new(OAuth2TokenService::new(http.clone(), config.pdl.timeout()));
    (http, provider)
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  pdl-client v{version} - PDL lookups with token exchange\n\n  \
         No command provided. To get started:\n\n    \
         pdl-client validate                     Check ./pdl-client.yaml\n    \
         pdl-client ping                         Ping the PDL liveness endpoint\n    \
         pdl-client lookup --ident <fnr>         Look up a name\n    \
         pdl-client --help                       See all commands and options\n"
    );
}
