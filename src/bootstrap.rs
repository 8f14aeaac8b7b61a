//! Session bootstrap: from a trip source to a running replay.
//!
//! Waits for the source to deliver the whole trip, draws the static route,
//! fits the map to it once and starts playback with a renderer attached.
//! A trip without a single usable fix starts nothing and is reported back
//! as [`BootstrapOutcome::NoPositions`].

use crate::config::AppConfig;
use crate::input::TripSource;
use crate::playback::{spawn_playback, PlaybackHandle, PlaybackStatus};
use crate::render::vehicle::RenderSummary;
use crate::render::{MapSurface, Marker, VehicleRenderer};
use crate::trip::{load_trip, LoadOutcome, TripPath};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// A replay in progress
pub struct ReplaySession {
    pub playback: PlaybackHandle,
    pub renderer: JoinHandle<RenderSummary>,
    pub path_len: usize,
}

impl ReplaySession {
    /// Wait for playback to end, then for the renderer to draw everything
    pub async fn finish(self) -> Result<(PlaybackStatus, RenderSummary)> {
        let status = self.playback.wait_finished().await?;
        info!(state = ?status.state, cursor = status.cursor, "Replay finished");
        // Shutting the driver down closes the event channel, which ends the renderer
        self.playback.shutdown().await;
        let summary = self.renderer.await.context("Renderer task failed")?;
        Ok((status, summary))
    }
}

#[derive(Debug)]
pub enum BootstrapOutcome<T> {
    Started(T),
    /// Source delivered records but none was a position fix
    NoPositions { records_seen: usize },
}

/// Draw start/end markers and the full route, then fit the map to it
pub fn draw_static_route<S: MapSurface>(surface: &mut S, path: &TripPath, config: &AppConfig) {
    let (Some(first), Some(last), Some(bounds)) = (path.first(), path.last(), path.bounds()) else {
        return;
    };

    surface.add_marker(&Marker::new(first, config.icons.endpoint.clone()));
    surface.add_marker(&Marker::new(last, config.icons.endpoint.clone()));
    surface.draw_polyline(&path.coordinates(), &config.route);
    surface.fit_bounds(bounds, None);
}

/// Load a trip from `source` and start replaying it on `surface`
pub async fn bootstrap<S>(
    source: &mut dyn TripSource,
    surface: Arc<Mutex<S>>,
    config: &AppConfig,
) -> Result<BootstrapOutcome<ReplaySession>>
where
    S: MapSurface + 'static,
{
    surface
        .lock()
        .await
        .set_view(config.map.center, config.map.zoom);

    let records = source
        .fetch()
        .await
        .with_context(|| format!("Failed to load trip from {}", source.name()))?;

    let path = match load_trip(&records) {
        LoadOutcome::Ready(path) => path,
        LoadOutcome::Empty { records_seen } => {
            warn!(source = %source.name(), records_seen, "Trip has no valid positions, not starting playback");
            return Ok(BootstrapOutcome::NoPositions { records_seen });
        }
    };

    if let Some((from, to)) = path.time_range() {
        info!(%from, %to, "Trip time range");
    }
    draw_static_route(&mut *surface.lock().await, &path, config);

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let renderer = VehicleRenderer::new(surface, config.icons.vehicle.clone());
    let renderer = tokio::spawn(renderer.run(event_rx));

    let playback = spawn_playback(config.playback(), event_tx);
    let path_len = path.len();
    playback.load(path).await?;

    Ok(BootstrapOutcome::Started(ReplaySession {
        playback,
        renderer,
        path_len,
    }))
}
