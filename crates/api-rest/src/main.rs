//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging when you only want the REST server
//! (with OpenAPI/Swagger UI). Deployments normally run the workspace's main
//! `hms-run` binary, which does the same bootstrapping.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use hms_core::{config::token_ttl_hours_from_env_value, CoreConfig, Datastore, MemoryStore};
use hms_types::NonEmptyText;

/// Main entry point for the HMS REST API server.
///
/// Starts the REST API server on the configured address (default:
/// 0.0.0.0:3000).
///
/// # Environment Variables
/// - `HMS_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `HMS_JWT_SECRET`: Token signing secret (a development fallback is used
///   when unset, with a warning)
/// - `HMS_TOKEN_TTL_HOURS`: Access-token lifetime (default: 24)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration values are invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("hms_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("HMS_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("-- Starting HMS REST API on {}", addr);

    let jwt_secret = match std::env::var("HMS_JWT_SECRET") {
        Ok(secret) => secret,
        Err(_) => {
            tracing::warn!("HMS_JWT_SECRET not set; using an insecure development secret");
            "hms-dev-secret-change-me".into()
        }
    };
    let token_ttl_hours =
        token_ttl_hours_from_env_value(std::env::var("HMS_TOKEN_TTL_HOURS").ok())?;

    let cfg = Arc::new(CoreConfig::new(
        NonEmptyText::new(jwt_secret)?,
        token_ttl_hours,
    )?);
    let store: Arc<dyn Datastore> = Arc::new(MemoryStore::new());

    let app = api_rest::router(AppState::new(cfg, store));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
