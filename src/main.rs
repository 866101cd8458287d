use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use slotbook_api::config::ApiConfig;
use slotbook_db::{
    PgSlotStore, create_pool,
    schema::{initialize_database, seed_slots},
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    slotbook_api::init_tracing(config.log_level)?;

    // Create database connection pool
    let db_pool = create_pool(&config.database_url, config.db_max_connections).await?;

    // Make sure the table exists and the booking horizon is populated
    initialize_database(&db_pool).await?;
    let inserted = seed_slots(
        &db_pool,
        config.slot_horizon_days,
        config.slot_open_hour,
        config.slot_close_hour,
    )
    .await?;
    info!(inserted, "Slot table ready");

    // Start API server
    slotbook_api::start_server(config, Arc::new(PgSlotStore::new(db_pool))).await?;

    Ok(())
}
