use clap::{Args, Subcommand};

use comptoir::prelude::{Order, Receipt};
use comptoir_app::{context::AppContext, errors::AppError};

#[derive(Debug, Args)]
pub(crate) struct StaffCommand {
    #[command(subcommand)]
    command: StaffSubcommand,
}

#[derive(Debug, Subcommand)]
enum StaffSubcommand {
    /// List every order
    Orders,

    /// Show the order a receipt was issued for
    Lookup {
        /// Receipt code, as encoded in the customer's QR code
        receipt: String,
    },

    /// Mark the order of a receipt as served
    Served {
        /// Receipt code
        receipt: String,

        /// Mark it as not served instead
        #[arg(long)]
        undo: bool,
    },
}

pub(crate) async fn run(command: StaffCommand, context: &AppContext) -> Result<(), AppError> {
    let desk = context.staff_desk();

    match command.command {
        StaffSubcommand::Orders => {
            let orders = desk.orders().await?;

            if orders.is_empty() {
                println!("no orders found");
            }

            for order in &orders {
                print_order(order);
            }
        }
        StaffSubcommand::Lookup { receipt } => {
            print_order(&desk.lookup(&Receipt::new(receipt)).await?);
        }
        StaffSubcommand::Served { receipt, undo } => {
            let mut order = desk.lookup(&Receipt::new(receipt)).await?;

            if !desk.set_served(&mut order, !undo).await? {
                println!("nothing to change");
            }

            print_order(&order);
        }
    }

    Ok(())
}

fn print_order(order: &Order) {
    println!(
        "order {}  {}  {}  receipt {}  {}",
        order.id(),
        order
            .created_at()
            .map_or_else(|| "-".to_string(), |created_at| created_at.to_string()),
        order.email().unwrap_or("-"),
        order.receipt().map_or("-", |receipt| receipt.as_str()),
        if order.served() { "served" } else { "not served" },
    );
}
