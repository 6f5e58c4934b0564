mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pantry::config::Config;
use pantry_inventory::CategoryTag;
use time::Date;

use cli::{App, ShoppingCommand, parse_amount, parse_expiry};

/// pantry - kitchen inventory kept by conversation
#[derive(Parser)]
#[command(name = "pantry")]
#[command(about = "Track what is in the kitchen from short messages", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile table headers and exit
    Migrate,
    /// Add a quantity of a product
    Add {
        user: String,
        name: String,
        #[arg(value_parser = parse_amount, allow_negative_numbers = true)]
        quantity: f64,
        unit: String,
        /// Expiry date (YYYY-MM-DD), used when the product is new
        #[arg(long, value_parser = parse_expiry)]
        expiry: Option<Date>,
        /// Override the inferred category (frozen-raw, frozen-ready, none)
        #[arg(long)]
        category: Option<CategoryTag>,
    },
    /// Remove a quantity of a product
    Remove {
        user: String,
        name: String,
        #[arg(value_parser = parse_amount, allow_negative_numbers = true)]
        quantity: f64,
        unit: String,
    },
    /// List products
    List {
        user: String,
        #[arg(long)]
        category: Option<CategoryTag>,
    },
    /// Find products by name
    Find { user: String, term: String },
    /// Products expiring soon
    Expiring {
        user: String,
        #[arg(long)]
        days: Option<i64>,
    },
    /// Consumed and added totals over the last days
    Stats {
        user: String,
        #[arg(long)]
        days: Option<i64>,
    },
    /// Manage the shopping list
    Shopping {
        #[command(subcommand)]
        command: ShoppingCommand,
    },
    /// Send one message through the assistant
    Say {
        user: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Chat with the assistant, one message per stdin line
    Chat { user: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    pantry::observability::init_observability(
        &config.observability.log_level,
        config.observability.json,
    )?;

    run(config, cli.command).await
}

#[tracing::instrument(skip(config))]
async fn run(config: Config, command: Commands) -> Result<()> {
    let app = App::open(config).await?;

    match command {
        Commands::Migrate => {
            for (table, outcome) in &app.report {
                println!("{table}: {outcome:?}");
            }
            Ok(())
        }
        Commands::Add {
            user,
            name,
            quantity,
            unit,
            expiry,
            category,
        } => cli::add(&app, &user, &name, quantity, &unit, expiry, category).await,
        Commands::Remove {
            user,
            name,
            quantity,
            unit,
        } => cli::remove(&app, &user, &name, quantity, &unit).await,
        Commands::List { user, category } => cli::list(&app, &user, category).await,
        Commands::Find { user, term } => cli::find(&app, &user, &term).await,
        Commands::Expiring { user, days } => cli::expiring(&app, &user, days).await,
        Commands::Stats { user, days } => cli::stats(&app, &user, days).await,
        Commands::Shopping { command } => cli::shopping(&app, command).await,
        Commands::Say { user, text } => cli::say(&app, &user, &text.join(" ")).await,
        Commands::Chat { user } => cli::chat(&app, user).await,
    }
}
