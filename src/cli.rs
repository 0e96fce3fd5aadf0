//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (ping, lookup, health, validate), and their associated
//! argument structs. Every flag has an environment variable equivalent
//! for container deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "pdl-client",
    version,
    about = "PDL lookups with token exchange and correlation headers",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        pdl-client validate                        Check ./pdl-client.yaml\n  \
        pdl-client ping                            Ping PDL\n  \
        pdl-client lookup --ident 08089403198      Look up a name"
)]
pub struct Cli {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args)]
pub struct CommonArgs {
    /// Config file path (.yaml, .json, .toml)
    #[arg(
        short,
        long,
        env = "PDL_CLIENT_CONFIG",
        default_value = "pdl-client.yaml",
        global = true
    )]
    pub config: PathBuf,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty", global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ping the PDL liveness endpoint and print the body
    Ping,

    /// Look up a person's name
    Lookup(LookupArgs),

    /// Report PDL health
    Health(HealthArgs),

    /// Validate a config file without calling PDL
    Validate(ValidateArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        pdl-client lookup --ident 08089403198 --subject-token $TOKEN   As the user\n  \
        pdl-client lookup --ident 08089403198 --system                 As the application")]
pub struct LookupArgs {
    /// National identity number to look up
    #[arg(long, env = "PDL_IDENT")]
    pub ident: String,

    /// The user's own access token, exchanged for a PDL token
    #[arg(long, env = "SUBJECT_TOKEN", hide_env_values = true)]
    pub subject_token: Option<String>,

    /// Propagate this call id instead of generating one
    #[arg(long, env = "NAV_CALL_ID")]
    pub call_id: Option<String>,

    /// Consumer id sent instead of the application name
    #[arg(long, env = "NAV_CONSUMER_ID")]
    pub consumer_id: Option<String>,

    /// Use the system client (client credentials) instead of token exchange
    #[arg(long, conflicts_with = "subject_token")]
    pub system: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct HealthArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}
