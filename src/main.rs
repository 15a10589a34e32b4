//! Main HMS server binary.
//!
//! Boots the REST API: resolves configuration from the environment once,
//! builds the in-process datastore and services, and serves the router from
//! the `api-rest` crate.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use hms_core::{config::token_ttl_hours_from_env_value, CoreConfig, Datastore, MemoryStore};
use hms_types::NonEmptyText;

/// Main entry point for the HMS application.
///
/// # Environment Variables
/// - `HMS_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `HMS_JWT_SECRET`: Token signing secret (a development fallback is used
///   when unset, with a warning)
/// - `HMS_TOKEN_TTL_HOURS`: Access-token lifetime (default: 24)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If startup or the running server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hms=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("hms_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("HMS_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("++ Starting HMS REST on {}", rest_addr);

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

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
