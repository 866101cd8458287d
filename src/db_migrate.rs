use chrono::Utc;
use color_eyre::eyre::Result;
use dotenv::dotenv;
use slotbook_api::config::ApiConfig;
use slotbook_core::windows::generate_daily_windows;
use slotbook_db::{PgSlotStore, SlotStore, create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let config = ApiConfig::from_env()?;

    println!("Connecting to database...");
    let db_pool = create_pool(&config.database_url, config.db_max_connections).await?;

    println!("Initializing database schema...");
    initialize_database(&db_pool).await?;

    let windows = generate_daily_windows(
        Utc::now().date_naive(),
        config.slot_horizon_days,
        config.slot_open_hour,
        config.slot_close_hour,
    );
    let generated = windows.len();
    let store = PgSlotStore::new(db_pool);
    let inserted = store.seed(windows).await?;
    println!(
        "Seeded {} of {} slots over the next {} days.",
        inserted, generated, config.slot_horizon_days
    );

    println!("Database initialization completed successfully.");
    Ok(())
}
