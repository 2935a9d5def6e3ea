use clap::{Args, Subcommand};
use tracing::info;

use comptoir::prelude::{BarLog, BarStatus};
use comptoir_app::{context::AppContext, errors::AppError};

#[derive(Debug, Args)]
pub(crate) struct BarCommand {
    #[command(subcommand)]
    command: BarSubcommand,
}

#[derive(Debug, Subcommand)]
enum BarSubcommand {
    /// Show whether the bar is open
    Status,

    /// Open the bar
    Open,

    /// Close the bar
    Close,

    /// Set the message customers see while the bar is closed
    Message {
        /// Closing message
        message: String,
    },

    /// List recorded openings
    Openings,
}

pub(crate) async fn run(command: BarCommand, context: &AppContext) -> Result<(), AppError> {
    let bar = context.bar.as_ref();

    match command.command {
        BarSubcommand::Status => {}
        BarSubcommand::Open => {
            bar.open().await?;
            info!("bar opened");
        }
        BarSubcommand::Close => {
            bar.close().await?;
            info!("bar closed");
        }
        BarSubcommand::Message { message } => {
            bar.set_closing_message(&message).await?;
            info!(%message, "closing message updated");
        }
        BarSubcommand::Openings => {
            let log = BarLog::from_openings(bar.openings().await?);

            for opening in log.openings() {
                match opening.end {
                    Some(end) => println!("{} -> {end}", opening.begin),
                    None => println!("{} -> still open", opening.begin),
                }
            }

            return Ok(());
        }
    }

    print_status(&bar.status().await?);

    Ok(())
}

fn print_status(status: &BarStatus) {
    match (status.is_open, status.open_since) {
        (true, Some(since)) => println!("open since {since}"),
        (true, None) => println!("open"),
        (false, _) => println!("closed"),
    }

    if let Some(message) = &status.closing_message {
        println!("closing message: {message}");
    }
}
