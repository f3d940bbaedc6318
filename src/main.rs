use log::info;
use prediction_gateway::backend::Dispatcher;
use prediction_gateway::{web, GatewayConfig, PredictionGateway};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Read once at startup; the backend address flows from here into the dispatcher
    let config = GatewayConfig::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    match &config.source {
        Some(path) => info!("[config] loaded from {:?}", path),
        None => info!("[config] no config file, using defaults and environment"),
    }

    let dispatcher = Dispatcher::new(&config.backend)?;
    let gateway = PredictionGateway::new(dispatcher);

    web::start_server(&config.server, gateway).await?;
    Ok(())
}
