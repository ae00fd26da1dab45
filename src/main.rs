//! Permamap - upload manifest generator
//!
//! Builds the canonical manifest mapping archived recordings to their
//! permanent-storage transactions.

use permamap_core::{pipeline, Config, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Parse CLI arguments and resolve environment settings
    let config = Config::from_cli();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&settings.log_level);

    tracing::debug!("resolved storage gateway: {}", settings.gateway_url);

    // Run the pipeline
    if let Err(err) = pipeline::run(&config, &settings).await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
