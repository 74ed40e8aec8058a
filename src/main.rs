//! Backoffice Gate Command Line Tool
//!
//! This binary runs the back-office gate server, or hashes an admin password
//! for the configuration.

use std::io::BufRead;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;

use backoffice_gate::common::{init_logger, GateError, Result};
use backoffice_gate::config::{log_config, ConfigLoader, ConfigValidator, Environment, GateConfig};
use backoffice_gate::crypto::hash_password;
use backoffice_gate::{start_server, APP_NAME, VERSION};

/// Backoffice Gate: admin sessions, request signing and correlated logging
#[derive(Parser, Debug)]
#[clap(author, version = VERSION, about, long_about = None)]
struct Args {
    /// Load configuration from a JSON file
    #[clap(long)]
    config_file: Option<PathBuf>,

    /// Listen address
    #[clap(short, long)]
    listen: Option<SocketAddr>,

    /// Log level (error, warn, info, debug, trace)
    #[clap(long)]
    log_level: Option<String>,

    /// Environment (development, production)
    #[clap(long)]
    environment: Option<Environment>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read a password from stdin and print its Argon2id hash
    HashPassword,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(Command::HashPassword) = args.command {
        init_logger("warn");
        return print_password_hash();
    }

    // Sources: defaults < config file < environment < command line
    let config = GateConfig::load(args.config_file.as_deref())?.with_overrides(
        args.listen,
        args.log_level,
        args.environment,
    );

    // Initialize logger
    init_logger(&config.log_level);

    info!("Starting {} v{}", APP_NAME, VERSION);

    // Validate the final configuration
    config.validate()?;
    log_config(&config);

    info!("Back-office gate ready, press Ctrl+C to stop");

    start_server(config).await
}

/// Hash one line read from stdin
fn print_password_hash() -> Result<()> {
    let password = read_password(std::io::stdin().lock())?;
    let hash = hash_password(&password)?;
    println!("{}", hash);
    Ok(())
}

/// Read the first line, without its line ending
fn read_password(mut reader: impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;

    let password = line.trim_end_matches(|c| c == '\r' || c == '\n');
    if password.is_empty() {
        return Err(GateError::Input("password must not be empty".to_string()));
    }
    Ok(password.to_string())
}
