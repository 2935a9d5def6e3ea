//! Comptoir client CLI

use std::process;

use comptoir_app::config::ConfigError;

use crate::cli::Cli;

mod cli;

#[tokio::main]
pub async fn main() {
    let cli = match Cli::load() {
        Ok(cli) => cli,
        Err(ConfigError::Parse(error)) => error.exit(),
        Err(error) => {
            eprintln!("Configuration error: {error}");
            process::exit(2);
        }
    };

    if let Err(error) = cli.run().await {
        eprintln!("{error}");
        process::exit(1);
    }
}
