//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! kirana-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `FUNCTIONS_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! # Migration Files
//!
//! `crates/functions/migrations/`, embedded at compile time.

use kirana_functions::store::create_pool;

use super::{CommandError, database_url};

/// Run the functions database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails or
/// a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to functions database...");
    let pool = create_pool(&database_url).await?;

    tracing::info!("Running functions migrations...");
    sqlx::migrate!("../functions/migrations").run(&pool).await?;

    tracing::info!("Functions migrations complete!");
    Ok(())
}
