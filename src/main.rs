use dotenvy::dotenv;
use std::{env, sync::Arc};
use support_desk::{
    bot::{self, Desk},
    config::{self, database},
    errors::{Error, Result},
    store::SqlStore,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the environment
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load guild ids, board options and tunables
    let settings = config::load_default_config()
        .inspect_err(|e| error!("Critical error loading configuration: {}", e))?;
    info!(
        ticket_kinds = settings.ticket_kinds.len(),
        application_kinds = settings.application_kinds.len(),
        "Successfully loaded configuration."
    );

    // 4. Connect to the database and make sure every table exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    let desk = Arc::new(Desk::new(
        SqlStore::new(db),
        settings.desk.promotion_threshold,
    ));

    // 5. Run the bot
    // DISCORD_BOT_TOKEN is loaded here, directly before use
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, Arc::new(settings), desk).await
}
