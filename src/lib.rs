//! Outbound client for PDL, the population-data registry.
//!
//! Every request leaves through a [`WebClient`](client::WebClient) that
//! runs an ordered filter pipeline before transmission: correlation
//! headers (`Nav-Consumer-Id`, `Nav-Call-Id`), the `TEMA` tenant tag, and a
//! bearer token obtained through token exchange for the target host.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (ping, lookup, health, validate).
//! - [`config`] -- Configuration model, loading, overrides, and validation.
//! - [`context`] -- Per-call [`CallContext`](context::CallContext): call id,
//!   consumer id, and principal.
//! - [`filter`] -- The [`RequestFilter`](filter::RequestFilter) trait and the
//!   correlation, tenant, and token filters.
//! - [`tokenx`] -- Credential matching by host and OAuth2 token acquisition.
//! - [`client`] -- Shared hyper client and the filter-running [`WebClient`](client::WebClient).
//! - [`connection`] -- [`Pingable`](connection::Pingable) and
//!   [`Named`](connection::Named) capabilities of an upstream dependency.
//! - [`pdl`] -- Client assembly and the name lookup service.
//! - [`health`] -- Health reports built from pings.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |

#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod client;
pub mod cmd;
pub mod config;
pub mod connection;
pub mod context;
pub mod error;
pub mod filter;
pub mod health;
pub mod logging;
pub mod pdl;
pub mod tokenx;
