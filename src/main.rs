use clap::Parser;
use dotenvy::dotenv;
use plastic_weighlog::{
    cli::{
        Cli,
        handlers::{self, CommandContext},
    },
    config::{self, database},
    core::category,
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    let cli = Cli::parse();

    // 3. Load the application configuration (defaults when the file is missing)
    let app_config = config::categories::load_config_or_default(&cli.config)
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed configured plastic categories
    let seeded = category::seed_categories(&db, &app_config.categories)
        .await
        .inspect_err(|e| error!("Failed to seed categories: {}", e))?;
    if seeded > 0 {
        info!("Seeded {} plastic categories", seeded);
    }

    // 6. Run the requested command
    let ctx = CommandContext {
        db: &db,
        config: &app_config,
        today: chrono::Local::now().date_naive(),
    };
    let output = handlers::run(&ctx, cli.command)
        .await
        .inspect_err(|e| error!("Command failed: {}", e))?;
    println!("{output}");

    Ok(())
}
