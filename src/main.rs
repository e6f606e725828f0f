use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{app_router, AppState};
use guia_core::constants::DEFAULT_OUTPUT_DIR;
use guia_core::{
    resolve_source_file, unmapped_policy_from_env_value, CoreConfig, GuideService, RecordStore,
};

/// Main entry point for the GUIA application
///
/// Loads the asset table once, then serves the REST API until the process is stopped.
/// A source table that cannot be loaded is fatal: the server never starts.
///
/// # Environment Variables
/// - `GUIA_REST_ADDR`: REST server address (default: "0.0.0.0:5001")
/// - `GUIA_SOURCE_FILE`: CSV export of the asset spreadsheet (default: "patrimonio.csv")
/// - `GUIA_OUTPUT_DIR`: Directory generated guides are written to (default: "static")
/// - `GUIA_UNMAPPED_CHARS`: `reject` (default) or `replace` for characters the PDF cannot encode
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid or the source table cannot be loaded,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("guia_run=info".parse()?)
                .add_directive("guia_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("GUIA_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:5001".into());

    let source_file = resolve_source_file(std::env::var("GUIA_SOURCE_FILE").ok().map(PathBuf::from))?;
    let output_dir = std::env::var("GUIA_OUTPUT_DIR").unwrap_or_else(|_| DEFAULT_OUTPUT_DIR.into());
    let unmapped_policy = unmapped_policy_from_env_value(std::env::var("GUIA_UNMAPPED_CHARS").ok())?;

    let store = match RecordStore::from_csv_path(&source_file) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("failed to load source table: {}", e);
            anyhow::bail!("cannot start without the asset table: {}", e);
        }
    };
    if store.is_empty() {
        tracing::warn!("asset table {} has no records", source_file.display());
    }

    let cfg = Arc::new(CoreConfig::new(PathBuf::from(output_dir), unmapped_policy)?);

    let app = app_router(AppState {
        guide_service: GuideService::new(cfg, Arc::new(store)),
    });

    tracing::info!("++ Starting GUIA REST on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
