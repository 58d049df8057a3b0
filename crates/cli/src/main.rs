//! Kirana CLI - database migrations and seeding for the callable functions.
//!
//! # Usage
//!
//! ```bash
//! # Create the documents table
//! kirana-cli migrate
//!
//! # Create a store owned by an account
//! kirana-cli seed store --id S1 --name "Fresh Mart" --owner U_owner
//!
//! # Create a buyer profile
//! kirana-cli seed profile --uid U_buyer --name Asha --phone 9999999999
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "kirana-cli")]
#[command(author, version, about = "Kirana functions CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Write documents into the functions database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Create or replace a store document
    Store {
        /// Store document id
        #[arg(long)]
        id: String,

        /// Store display name
        #[arg(long)]
        name: String,

        /// Account id of the store owner
        #[arg(long)]
        owner: String,
    },
    /// Create or replace a buyer profile document
    Profile {
        /// Account id of the buyer
        #[arg(long)]
        uid: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Contact phone number
        #[arg(long)]
        phone: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Store { id, name, owner } => {
                commands::seed::store(&id, &name, &owner).await?;
            }
            SeedTarget::Profile { uid, name, phone } => {
                commands::seed::profile(&uid, &name, &phone).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_seed_store() {
        let cli = Cli::try_parse_from([
            "kirana-cli", "seed", "store", "--id", "S1", "--name", "Fresh Mart", "--owner",
            "U_owner",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Seed {
                target: SeedTarget::Store { ref id, .. }
            }) if id == "S1"
        ));
    }
}
