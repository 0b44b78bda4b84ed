use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use tripflow::assembler::RoutePlanner;
use tripflow::config::TripflowConfig;
use tripflow::gazetteer::Gazetteer;
use tripflow::geocode::PhotonClient;
use tripflow::intent::IntentExtractor;
use tripflow::llm::OllamaClient;
use tripflow::ocr;
use tripflow::resolver::CoordinateResolver;
use tripflow::web;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = TripflowConfig::from_env();

    let gazetteer = Arc::new(Gazetteer::load(&config.gazetteer.path));
    tracing::info!("Gazetteer ready with {} entries", gazetteer.len());

    let model = Arc::new(OllamaClient::new(&config.llm)?);
    let geocoder = Arc::new(PhotonClient::new(&config.geocoding)?);

    let planner = Arc::new(RoutePlanner::new(
        IntentExtractor::new(model),
        CoordinateResolver::new(gazetteer, geocoder),
        ocr::default_recognizer(),
    ));

    web::run(planner, &config.server).await;
    Ok(())
}
