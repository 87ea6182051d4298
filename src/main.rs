use std::process::ExitCode;

use tracing::{error, info};

use deptstock::{Config, Database, WebServer};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let config = match Config::load_with_env(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {CONFIG_PATH}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = deptstock::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        deptstock::logging::init_console_only(&config.logging.level);
    }

    info!("deptstock - departmental inventory tracker");

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> deptstock::Result<()> {
    config.validate()?;

    let db = Database::open(&config.database.path).await?;
    let seeded = db.seed_departments().await?;
    if seeded > 0 {
        info!(seeded, "Seeded default departments");
    }

    let server = WebServer::new(&config, db)?;
    info!("Server configured on {}", server.addr());
    server.run().await
}
