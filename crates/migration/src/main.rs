//! Migration CLI: `up`, `down`, `fresh`, `refresh`, `reset`, `status`.
//!
//! Reads `DATABASE_URL` from the environment.
use sea_orm_migration::prelude::*;

#[async_std::main]
async fn main() {
    cli::run_cli(migration::Migrator).await;
}
