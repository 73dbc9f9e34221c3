use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use weatherwise_server::{configuration, routes, state};

const DEFAULT_LOG_FILTER: &str = "weatherwise=info,weatherwise_server=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Local overrides first; dotenv never replaces a variable that is already set
    dotenv::from_filename(".env.local").ok();
    dotenv::dotenv().ok();

    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    // Load configuration
    let settings = configuration::Settings::new()?;
    let address = settings.server.bind_address();
    info!("Using model {}", settings.provider.model);
    if settings.weather.api_key.is_none() {
        info!("OPENWEATHER_API_KEY is not set, weather questions will be answered without live data");
    }

    // Create app state
    let state = state::AppState::from_settings(settings)?;

    // Create router with CORS support
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::configure(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
