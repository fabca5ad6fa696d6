//! Database migration runner for Conciliador.
//!
//! Usage:
//!   migrator up      - Apply the payroll and journal schemas
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show which migrations are applied
//!   migrator fresh   - Drop all tables and re-run migrations
//!
//! Reads `DATABASE_URL` from the environment or a `.env` file.

use conciliador_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // sea-orm-migration installs its own subscriber
    cli::run_cli(Migrator).await;
}
