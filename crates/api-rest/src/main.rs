//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful during development when you want the REST server and Swagger UI without the workspace
//! runner. The workspace's main `opord-run` binary serves the same router.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use opord_core::OpordConfig;

/// Main entry point for the OPORD REST API server
///
/// # Environment Variables
/// - `OPORD_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `OPENAI_*`, `GOOGLE_*`: see `opord_core::config`
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the environment holds an invalid value,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("opord_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("OPORD_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let config = OpordConfig::from_env_values(|key| std::env::var(key).ok())?;
    let state = AppState::from_config(&config)?;

    tracing::info!(
        ai_enabled = state.service.ai_available(),
        slides_enabled = state.slides_enabled,
        "-- Starting OPORD REST API on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
