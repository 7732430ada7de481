// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Clipcast - a Telegram bot that republishes TikTok videos to Twitter/X.
//!
//! This is the binary entry point.

mod serve;

use clap::{Parser, Subcommand};

/// Clipcast - republish TikTok videos to Twitter/X via Telegram.
#[derive(Parser, Debug)]
#[command(name = "clipcast", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bot.
    Serve,
    /// Print the resolved configuration (credentials redacted).
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match clipcast_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            clipcast_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("clipcast serve failed: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            print_config(config);
        }
        None => {
            println!("clipcast: use --help for available commands");
        }
    }
}

/// Prints the resolved configuration as TOML with secrets replaced by
/// set/unset markers.
fn print_config(mut config: clipcast_config::ClipcastConfig) {
    let redact = |value: &mut Option<String>| {
        *value = value.as_ref().map(|_| "<set>".to_string());
    };
    redact(&mut config.telegram.bot_token);
    redact(&mut config.twitter.consumer_key);
    redact(&mut config.twitter.consumer_secret);
    redact(&mut config.twitter.access_token);
    redact(&mut config.twitter.access_token_secret);

    match toml::to_string_pretty(&config) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => {
            eprintln!("failed to render config: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Defaults need no config file.
        let config = clipcast_config::load_and_validate_str("").expect("defaults must be valid");
        assert_eq!(config.bot.name, "clipcast");
    }
}
