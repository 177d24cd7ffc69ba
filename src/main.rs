//! Wiring & DI. Entry point: bootstrap the store, inject into services, run UI.
//! No business logic here.

use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uni_reg::adapters::persistence::SqliteStore;
use uni_reg::adapters::ui::menu::MenuInputPort;
use uni_reg::ports::{InputPort, StorePort};
use uni_reg::shared::config::AppConfig;
use uni_reg::usecases::{CourseService, EnrollmentService, ReportService, StudentService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    uni_reg::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_default();
    let data_dir = PathBuf::from(cfg.data_dir_or_default());
    info!(path = %data_dir.display(), "data directory");

    // Startup connectivity check: a store that cannot open is fatal.
    let store = SqliteStore::connect(&data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("SQLite connect failed: {}", e))?;
    let store: Arc<dyn StorePort> = Arc::new(store);

    // --- Services (explicit store handle, no hidden globals) ---
    let students = Arc::new(StudentService::new(Arc::clone(&store)));
    let courses = Arc::new(CourseService::new(Arc::clone(&store)));
    let enrollment = Arc::new(EnrollmentService::new(Arc::clone(&store)));
    let reports = Arc::new(ReportService::new(Arc::clone(&store)));

    // --- Run (main menu until exit) ---
    let input: Arc<dyn InputPort> =
        Arc::new(MenuInputPort::new(students, courses, enrollment, reports));
    input.run().await.map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
