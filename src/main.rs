use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kado_relay::config::Config;
use kado_relay::hardware::HardwareChannel;
use kado_relay::llm::OpenAiClient;
use kado_relay::relay::RelayServer;
use kado_relay::routes::configure_routes;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kado_relay=info,warp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    if config.openai.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; every question will get the fallback answer");
    }
    let completion = Arc::new(OpenAiClient::new(&config.openai)?);
    let hardware = Arc::new(HardwareChannel::open(&config.serial));
    let relay = Arc::new(RelayServer::new(completion, hardware));

    let routes = configure_routes(relay, config.public_dir.clone());

    info!(port = config.port, public_dir = %config.public_dir.display(), "Starting server on http://0.0.0.0:{}", config.port);
    info!("Visitors must join the same network and open this machine's IP address");
    warp::serve(routes).run(([0, 0, 0, 0], config.port)).await;

    Ok(())
}
