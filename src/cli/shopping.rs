use anyhow::Result;
use clap::Subcommand;
use pantry::assistant::shopping_reply;
use pantry_shopping::shopping_line;

use super::{App, parse_amount};

#[derive(Subcommand, Debug)]
pub enum ShoppingCommand {
    /// Put an item on the shopping list
    Add {
        user: String,
        item: String,
        #[arg(long, default_value = "1", value_parser = parse_amount)]
        quantity: f64,
        #[arg(long, default_value = "")]
        unit: String,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// Show the shopping list
    List { user: String },
    /// Remove the first item matching a search term
    Remove { user: String, term: String },
}

pub async fn shopping(app: &App, command: ShoppingCommand) -> Result<()> {
    match command {
        ShoppingCommand::Add {
            user,
            item,
            quantity,
            unit,
            note,
        } => {
            let item = app.shopping.add(&user, &item, quantity, &unit, &note).await?;
            println!("Added to shopping list: {}", item.item);
        }
        ShoppingCommand::List { user } => {
            let items = app.shopping.list(&user).await?;
            println!("{}", shopping_reply(&items));
        }
        ShoppingCommand::Remove { user, term } => match app.shopping.remove(&user, &term).await? {
            Some(removed) => println!("Removed from shopping list: {}", shopping_line(&removed)),
            None => println!("Didn't find {term} in shopping list"),
        },
    }

    Ok(())
}
