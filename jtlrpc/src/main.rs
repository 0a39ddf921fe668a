//! # jtlrpc CLI Entry Point
//!
//! The main executable for the jtlrpc tool. This file drives the application lifecycle:
//!
//! 1. **Initialization**: Parses command-line arguments using [`cli::Cli`] and installs the log subscriber.
//! 2. **Connection**: Resolves the endpoint URL and token from flags, environment or a saved profile.
//! 3. **Execution**: Delegates the request to a `jtlrpc_core` [`ConnectorClient`].
//! 4. **Presentation**: Formats and prints the result or error to standard output/error.

mod cli;
mod config;
mod formatter;

use clap::Parser;
use cli::{Cli, Commands, ConnectionArgs, Entities, ProfileCommands};
use config::{ConfigManager, Profile};
use formatter::{FormattedString, GenericError, ProfileList};
use jtlrpc_core::{
    ConnectorClient, HttpTransport, ResponseFormat,
    model::Ack,
    reqwest,
};
use serde_json::Value;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let connection = args.connection;
    let format = args.format;

    match args.command {
        Commands::Profile { sub } => run_profile(&connection, sub),
        Commands::Auth => authenticate(&connection, format).await,
        Commands::Identify => {
            let mut client = connect_or_exit(&connection, format);
            let identification = client.identify().await.unwrap_or_else(|e| exit_with(e));
            println!("{}", FormattedString::from(identification));
        }
        Commands::Features => {
            let mut client = connect_or_exit(&connection, format);
            let features = client.features().await.unwrap_or_else(|e| exit_with(e));
            println!("{}", FormattedString::from(features));
        }
        Commands::Clear => {
            let mut client = connect_or_exit(&connection, format);
            let cleared = client.clear().await.unwrap_or_else(|e| exit_with(e));
            println!("{}", FormattedString::from(Value::Bool(cleared)));
        }
        Commands::Finish => {
            let mut client = connect_or_exit(&connection, format);
            let result = client.finish().await.unwrap_or_else(|e| exit_with(e));
            println!("{}", FormattedString::from(result));
        }
        Commands::Pull { controller, limit } => {
            let mut client = connect_or_exit(&connection, format);
            let response = client
                .pull(&controller, limit)
                .await
                .unwrap_or_else(|e| exit_with(e));
            println!("{}", FormattedString::from(response));
        }
        Commands::Push {
            controller,
            body: Entities(mut entities),
        } => {
            // `image` entities get their files bundled by the client.
            let mut client = connect_or_exit(&connection, format);
            let response = client
                .push(&controller, &mut entities)
                .await
                .unwrap_or_else(|e| exit_with(e));
            println!("{}", FormattedString::from(response));
        }
        Commands::Delete {
            controller,
            body: Entities(entities),
        } => {
            let mut client = connect_or_exit(&connection, format);
            let response = client
                .delete(&controller, &entities)
                .await
                .unwrap_or_else(|e| exit_with(e));
            println!("{}", FormattedString::from(response));
        }
        Commands::Ack { body } => {
            let ack: Ack = serde_json::from_value(body)
                .unwrap_or_else(|e| exit_with(GenericError("Invalid ack body", e)));

            let mut client = connect_or_exit(&connection, format);
            let result = client.ack(&ack).await.unwrap_or_else(|e| exit_with(e));
            println!("{}", FormattedString::from(result));
        }
        Commands::Statistic { controller } => {
            let mut client = connect_or_exit(&connection, format);
            let available = client
                .statistic(&controller)
                .await
                .unwrap_or_else(|e| exit_with(e));
            println!("{}", FormattedString::from(Value::from(available)));
        }
    }
}

fn init_tracing(verbose: bool) {
    // RUST_LOG wins over -v
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_with(err: impl Into<FormattedString>) -> ! {
    eprintln!("{}", err.into());
    process::exit(1);
}

/// Endpoint URL and token, with explicit flags taking precedence over the profile.
fn resolve_connection(args: &ConnectionArgs) -> anyhow::Result<(String, String)> {
    let profile = match &args.profile {
        Some(name) => {
            let config = ConfigManager::new()?.load()?;
            let profile = config
                .profile(name)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("No profile named '{name}'"))?;
            Some(profile)
        }
        None => None,
    };

    let url = args
        .url
        .clone()
        .or_else(|| profile.as_ref().map(|p| p.url.clone()))
        .ok_or_else(|| anyhow::anyhow!("No endpoint URL given (use --url or --profile)"))?;

    let token = args
        .token
        .clone()
        .or_else(|| profile.map(|p| p.token))
        .ok_or_else(|| {
            anyhow::anyhow!("No token given (use --token, JTLRPC_TOKEN or --profile)")
        })?;

    Ok((url, token))
}

fn connect_or_exit(args: &ConnectionArgs, format: ResponseFormat) -> ConnectorClient {
    let (url, token) = resolve_connection(args).unwrap_or_else(|e| exit_with(e));
    tracing::debug!(%url, profile = ?args.profile, "using connector endpoint");

    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = args.timeout {
        builder = builder.timeout(timeout);
    }
    let http = builder
        .build()
        .unwrap_or_else(|e| exit_with(GenericError("Failed to build HTTP client", e)));

    match HttpTransport::with_client(http, &url) {
        Ok(transport) => ConnectorClient::with_transport(token, transport).with_response_format(format),
        Err(err) => exit_with(GenericError("Connection Error", err)),
    }
}

async fn authenticate(args: &ConnectionArgs, format: ResponseFormat) {
    let mut client = connect_or_exit(args, format);

    if let Err(err) = client.authenticate().await {
        exit_with(err);
    }

    if client.is_authenticated().await {
        println!("{}", FormattedString("Authenticated.".to_string()));
    } else {
        exit_with(GenericError(
            "Authentication Failed",
            "the connector rejected the new session",
        ));
    }
}

fn run_profile(args: &ConnectionArgs, sub: ProfileCommands) {
    let manager = ConfigManager::new().unwrap_or_else(|e| exit_with(e));
    let mut config = manager.load().unwrap_or_else(|e| exit_with(e));

    match sub {
        ProfileCommands::List => {
            println!("{}", FormattedString::from(ProfileList(config.profiles)));
            return;
        }
        ProfileCommands::Save { name } => {
            let (Some(url), Some(token)) = (args.url.clone(), args.token.clone()) else {
                exit_with(GenericError(
                    "Cannot save profile",
                    "both --url and --token are required",
                ));
            };
            config.upsert(Profile {
                name: name.clone(),
                url,
                token,
            });
            println!("{}", FormattedString(format!("Saved profile '{name}'.")));
        }
        ProfileCommands::Remove { name } => {
            if !config.remove(&name) {
                exit_with(GenericError("Unknown profile", name));
            }
            println!("{}", FormattedString(format!("Removed profile '{name}'.")));
        }
    }

    if let Err(err) = manager.save(&config) {
        exit_with(err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_nothing_missing() {
        let args = ConnectionArgs {
            url: Some("http://shop/".to_string()),
            token: Some("t".to_string()),
            ..Default::default()
        };

        assert_eq!(
            resolve_connection(&args).unwrap(),
            ("http://shop/".to_string(), "t".to_string())
        );
    }

    #[test]
    fn test_missing_url_is_an_error() {
        let args = ConnectionArgs {
            token: Some("t".to_string()),
            ..Default::default()
        };

        assert!(resolve_connection(&args).is_err());
    }
}
