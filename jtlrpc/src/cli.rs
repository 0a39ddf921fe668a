//! # CLI
//!
//! This module defines the command-line interface of `jtlrpc` using `clap`.
//!
//! It is responsible for parsing user input and performing validation (e.g., ensuring push bodies are JSON arrays).
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use jtlrpc_core::{ResponseFormat, client::DEFAULT_PULL_LIMIT};

#[derive(Parser)]
#[command(name = "jtlrpc", version, about = "Command-line client for jtlrpc connector endpoints")]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// How controller results are printed (object, array or json)
    #[arg(short, long, global = true, default_value = "array", value_parser = parse_format)]
    pub format: ResponseFormat,

    /// Log protocol traffic to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Default)]
pub struct ConnectionArgs {
    /// Connector endpoint URL (e.g. https://shop.example/jtlconnector/)
    #[arg(short, long, global = true)]
    pub url: Option<String>,

    /// Connector token
    #[arg(short, long, global = true, env = "JTLRPC_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Saved profile to take the URL and token from
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_parser = parse_timeout)]
    pub timeout: Option<Duration>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open a session and report whether the connector accepts it
    Auth,

    /// Show the connector's platform and version information
    Identify,

    /// List the entities and flags the connector supports
    Features,

    /// Clear the connector's linking table
    Clear,

    /// Signal the end of a synchronisation run
    Finish,

    /// Pull entities from a controller
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// jtlrpc --profile shop pull category --limit 50
    /// ```
    Pull {
        /// Controller name (e.g. category, product, customer_order)
        #[arg(value_parser = parse_controller)]
        controller: String,
        /// Maximum number of entities to pull
        #[arg(short, long, default_value_t = DEFAULT_PULL_LIMIT)]
        limit: u32,
    },

    /// Push entities to a controller
    ///
    /// For the `image` controller, local files referenced by `filename` are uploaded
    /// in a zip archive.
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// jtlrpc push manufacturer --body '[{"id": ["", 4], "name": "ACME"}]'
    /// ```
    Push {
        #[arg(value_parser = parse_controller)]
        controller: String,
        /// JSON array of entities
        #[arg(long, value_parser = parse_entities)]
        body: Entities,
    },

    /// Delete entities through a controller
    Delete {
        #[arg(value_parser = parse_controller)]
        controller: String,
        /// JSON array of entities
        #[arg(long, value_parser = parse_entities)]
        body: Entities,
    },

    /// Acknowledge pulled entities
    Ack {
        /// JSON object ({"identities": {...}, "checksums": [...]})
        #[arg(long, value_parser = parse_body)]
        body: serde_json::Value,
    },

    /// Show how many entities a controller has available for pulling
    Statistic {
        #[arg(value_parser = parse_controller)]
        controller: String,
    },

    /// Manage saved connection profiles
    Profile {
        #[command(subcommand)]
        sub: ProfileCommands,
    },
}

/// A JSON array of entities given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Entities(pub Vec<serde_json::Value>);

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Save the given --url and --token under a name
    Save {
        /// Profile name
        name: String,
    },
    /// List saved profiles
    List,
    /// Remove a saved profile
    Remove {
        /// Profile name
        name: String,
    },
}

fn parse_format(value: &str) -> Result<ResponseFormat, String> {
    value.parse().map_err(|e| format!("{e}"))
}

fn parse_controller(value: &str) -> Result<String, String> {
    if value.trim().is_empty() || value.contains('.') {
        return Err(format!(
            "Invalid controller: '{value}'. Expected a bare controller name like 'category'"
        ));
    }

    Ok(value.to_string())
}

fn parse_timeout(value: &str) -> Result<Duration, String> {
    let seconds: u64 = value
        .parse()
        .map_err(|_| format!("Invalid timeout: '{value}'. Expected a number of seconds"))?;

    if seconds == 0 {
        return Err("Timeout must be at least one second".to_string());
    }

    Ok(Duration::from_secs(seconds))
}

fn parse_body(value: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(value).map_err(|e| format!("Invalid JSON: {e}"))
}

fn parse_entities(value: &str) -> Result<Entities, String> {
    match parse_body(value)? {
        serde_json::Value::Array(entities) => Ok(Entities(entities)),
        _ => Err("Body must be a JSON array of entities".to_string()),
    }
}
