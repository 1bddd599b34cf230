use anyhow::{anyhow, Result};
use checkout::Selector;
use clap::{Parser, Subcommand};
use shared::catalog::{Catalog, CATALOG};

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the sizes and flavors on offer.
    Catalog {
        #[arg(long)]
        json: bool,
    },
    /// Print the checkout link the shop would navigate to for a selection.
    CheckoutLink {
        #[arg(long)]
        size: String,
        #[arg(long)]
        flavor: String,
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        base_url: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Catalog { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&CATALOG)?);
            } else {
                print!("{}", catalog_table(&CATALOG));
            }
        }
        Command::CheckoutLink {
            size,
            flavor,
            base_url,
        } => {
            println!("{}", checkout_link(&size, &flavor, &base_url)?);
        }
    }

    Ok(())
}

fn catalog_table(catalog: &Catalog) -> String {
    let mut out = String::from("sizes:\n");
    for size in catalog.sizes() {
        out.push_str(&format!(
            "  {:<8} {:<24} {}\n",
            size.id, size.display_name, size.unit_price
        ));
    }
    out.push_str("flavors:\n");
    for flavor in catalog.flavors() {
        out.push_str(&format!(
            "  {:<11} {:<20} {}\n",
            flavor.id, flavor.display_name, flavor.description
        ));
    }
    out
}

fn checkout_link(size: &str, flavor: &str, base_url: &str) -> Result<String> {
    let mut selector = Selector::new(&CATALOG);
    selector
        .select_size(size)
        .map_err(|err| anyhow!(err.message))?;
    selector
        .select_flavor(flavor)
        .map_err(|err| anyhow!(err.message))?;
    let query = selector.attempt_order().map_err(|err| anyhow!(err.message))?;
    Ok(format!(
        "{}{}",
        base_url.trim_end_matches('/'),
        query.checkout_path()
    ))
}
