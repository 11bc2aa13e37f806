//! Plant Growth Tracker web front end.
//!
//! ```text
//!     Browser ──▶ /            static page (public/)
//!             ──▶ /api/...     route table ──▶ upstream API (API_BASE_URL)
//!             ──▶ /media/...   image files  ──▶ upstream /static/...
//! ```
//!
//! Configuration comes from `PLANT_TRACKER_CONFIG` (a TOML file), then the
//! `PORT` and `API_BASE_URL` environment variables.

use plant_tracker_web::config;
use plant_tracker_web::lifecycle::startup;
use plant_tracker_web::observability::logging;
use plant_tracker_web::Shutdown;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match config::load_from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("plant-tracker-web: {e}");
            return Err(e.into());
        }
    };

    logging::init(&config.observability)?;

    tracing::info!("plant-tracker-web v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address(),
        upstream = %config.upstream.base_url,
        static_dir = %config.server.static_dir,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    startup::run(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
