use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trip_replay::bootstrap::{bootstrap, BootstrapOutcome};
use trip_replay::config::AppConfig;
use trip_replay::input::FileTripSource;
use trip_replay::render::TraceSurface;

const USAGE: &str = "usage: trip-replay <trip-file> [config.json]";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args_os().skip(1);
    let trip_path = args.next().map(PathBuf::from).context(USAGE)?;
    let config_path = args.next().map(PathBuf::from);

    let config = AppConfig::load(config_path.as_deref())?;
    info!(
        interval_ms = config.tick_interval_ms,
        max_zoom = config.history_max_zoom,
        tiles = %config.map.tile_url,
        "Starting trip replay"
    );

    let [width, height] = config.map.viewport;
    let surface = Arc::new(Mutex::new(TraceSurface::new(width, height)));
    let mut source = FileTripSource::new(&trip_path);

    let session = match bootstrap(&mut source, surface, &config).await? {
        BootstrapOutcome::Started(session) => session,
        BootstrapOutcome::NoPositions { records_seen } => {
            let summary = serde_json::json!({
                "trip": trip_path.display().to_string(),
                "records": records_seen,
                "positions": 0,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
            return Ok(());
        }
    };

    tokio::select! {
        finished = session.playback.wait_finished() => {
            finished?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, stopping playback");
            session.playback.stop().await?;
        }
    }

    let path_len = session.path_len;
    let (status, rendered) = session.finish().await?;

    let summary = serde_json::json!({
        "trip": trip_path.display().to_string(),
        "positions": path_len,
        "state": format!("{:?}", status.state),
        "cursor": status.cursor,
        "rendered": rendered,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
