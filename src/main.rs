use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use opord_core::OpordConfig;

/// Main entry point for the OPORD application
///
/// Starts the REST server (form defaults, generation and Slides export) with Swagger UI at
/// `/swagger-ui`.
///
/// # Environment Variables
/// - `OPORD_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `OPENAI_API_KEY`: enables AI enrichment when set to a real key
/// - `OPENAI_MODEL`: default model (default: "gpt-4o")
/// - `OPENAI_BASE_URL`: OpenAI-compatible endpoint
/// - `OPORD_HTTP_TIMEOUT_SECS`: timeout for outbound HTTP calls (default: 60)
/// - `GOOGLE_CREDENTIALS_FILE`: OAuth client secrets; enables Slides export
/// - `GOOGLE_TOKEN_FILE`: cached user token (default: "token.json")
/// - `GOOGLE_SLIDES_TEMPLATE_ID`: template presentation to copy instead of building slides
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("opord=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("OPORD_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let config = OpordConfig::from_env_values(|key| std::env::var(key).ok())?;
    let state = AppState::from_config(&config)?;

    tracing::info!("++ Starting OPORD REST on {}", rest_addr);
    if !state.service.ai_available() {
        tracing::info!("OPENAI_API_KEY not set; AI enrichment disabled");
    }
    if !state.slides_enabled {
        tracing::info!("Google credentials not found; Slides export disabled");
    }

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
