use clap::{Parser, Subcommand};

use comptoir_app::{
    config::{ApiConfig, ConfigError, LoggingConfig, StorageConfig},
    context::AppContext,
    errors::AppError,
    observability,
};

mod bar;
mod cart;
mod catalog;
mod order;
mod staff;

#[derive(Debug, Parser)]
#[command(name = "comptoir-app", about = "Comptoir bar ordering client", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    api: ApiConfig,

    #[command(flatten)]
    storage: StorageConfig,

    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List products and whether the bar takes orders
    Catalog,

    /// Inspect or edit the local cart
    Cart(cart::CartCommand),

    /// Submit the cart and open its payment session
    Checkout(order::CheckoutArgs),

    /// Read the payment status of an order
    Status(order::StatusArgs),

    /// Find and serve orders
    Staff(staff::StaffCommand),

    /// Manage the bar's opening
    Bar(bar::BarCommand),
}

impl Cli {
    /// Load configuration from `.env`, environment and CLI arguments.
    pub(crate) fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        let cli = Self::try_parse()?;

        cli.api.validate()?;

        Ok(cli)
    }

    pub(crate) async fn run(self) -> Result<(), AppError> {
        observability::init(&self.logging)?;

        let context = AppContext::from_config(&self.api)?;

        match self.command {
            Commands::Catalog => catalog::run(&context).await,
            Commands::Cart(command) => cart::run(command, &context, &self.storage).await,
            Commands::Checkout(args) => order::checkout(args, &context, &self.storage).await,
            Commands::Status(args) => order::status(args, &context).await,
            Commands::Staff(command) => staff::run(command, &context).await,
            Commands::Bar(command) => bar::run(command, &context).await,
        }
    }
}
