use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use ocr::OcrClient;
use server::ServerState;
use settings::{Ocr, Store};

mod settings;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "expenses={level},server={level},engine={level},ocr={level}",
            level = settings.app.level
        ))
        .init();

    let engine = build_engine(&settings.store).await?;
    let ocr = build_ocr(&settings.ocr)?;

    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    server::run(ServerState::new(engine, ocr), &addr).await?;

    Ok(())
}

async fn build_engine(store: &Store) -> Result<engine::Engine, BoxError> {
    let builder = engine::Engine::builder();
    let builder = match store {
        Store::Memory => {
            tracing::info!("Using in-memory store, data is lost on exit");
            builder.database(connect("sqlite::memory:").await?)
        }
        Store::Sqlite { path } => {
            tracing::info!("Using sqlite store at {path}");
            builder.database(connect(&format!("sqlite:{path}?mode=rwc")).await?)
        }
        Store::Rest { url, key } => {
            tracing::info!("Using REST store at {url}");
            builder.store(engine::RestStore::new(url, key)?)
        }
    };

    Ok(builder.build()?)
}

async fn connect(url: &str) -> Result<sea_orm::DatabaseConnection, BoxError> {
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}

fn build_ocr(config: &Ocr) -> Result<Option<OcrClient>, BoxError> {
    let Some(api_key) = config.api_key.as_deref().filter(|key| !key.trim().is_empty()) else {
        tracing::warn!("OCR API key not configured, receipt extraction is disabled");
        return Ok(None);
    };

    let mut builder = OcrClient::builder()
        .api_key(api_key)
        .timeout(Duration::from_secs(config.timeout_secs));
    if let Some(endpoint) = &config.endpoint {
        builder = builder.endpoint(endpoint);
    }

    Ok(Some(builder.build()?))
}
