use dotenvy::dotenv;
use std::env;
use student_grades::{
    api, config, console,
    core::service::GradeService,
    errors::{Error, Result},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env file first so RUST_LOG from it reaches the filter
    let dotenv_loaded = dotenv().is_ok();

    // 2. Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    info!("Loaded .env file: {}", dotenv_loaded);

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Failed to load application configuration: {}", e))?;
    info!("Successfully processed application configuration.");

    // 4. Initialize database
    let db = config::database::init_database(&app_config.database.url)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;
    let service = GradeService::new(db);

    // 5. Run the selected front end
    match env::args().nth(1).as_deref() {
        None | Some("serve") => api::serve(service, &app_config.server)
            .await
            .inspect_err(|e| error!("HTTP server stopped: {}", e)),
        Some("console") => console::run_stdio(&service).await,
        Some(other) => {
            error!("Unknown mode {:?}; expected `serve` or `console`", other);
            Err(Error::Config {
                message: format!("Unknown mode: {other}"),
            })
        }
    }
}
