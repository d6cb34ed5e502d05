//! connpanel entry point.

use std::{error::Error, process};

use clap::Parser;
use connpanel::{
    cli::{Cli, formatting::format_error},
    tracing_config,
};
use tracing::{Level, info, span};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    };

    let _guard = if cli.is_long_running() {
        let guard = tracing_config::init(&config.general)?;
        Some(guard)
    } else {
        tracing_config::init_cli_mode()?;
        None
    };

    let _span = span!(Level::INFO, "connpanel").entered();
    if cli.is_long_running() {
        info!("Starting connpanel");
    }

    match cli.execute(&config).await {
        Ok(output) => {
            if !output.trim().is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    }
}
