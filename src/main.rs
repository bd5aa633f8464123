use anyhow::Result;
use job_board::core::ConfigManager;
use job_board::start_web_server;

use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("job_board=info,rocket::server=off"));

    // JSON lines for log shipping, human-readable otherwise
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_current_span(false).with_span_list(false))
            .init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = ConfigManager::load()?;

    info!("Starting recruitment job board API");
    info!("Environment: {}", config.environment);
    info!("Server port: {}", config.server.port);

    start_web_server(config.server).await
}
