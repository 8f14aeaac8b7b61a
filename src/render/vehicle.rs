use crate::playback::{PlaybackEvent, PositionUpdate};
use crate::render::{Icon, MapSurface, Marker, MarkerId, RotatedMarker};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

/// Counters reported when a renderer finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct RenderSummary {
    pub positions_drawn: usize,
    pub sessions: usize,
}

/// Draws the moving vehicle from playback events
///
/// Exactly one vehicle marker is live at a time. Each position removes the
/// old marker before placing a new one, then refits the map to everything
/// traveled so far.
pub struct VehicleRenderer<S: MapSurface> {
    surface: Arc<Mutex<S>>,
    icon: Icon,
    current: Option<MarkerId>,
    summary: RenderSummary,
}

impl<S: MapSurface> VehicleRenderer<S> {
    pub fn new(surface: Arc<Mutex<S>>, icon: Icon) -> Self {
        Self {
            surface,
            icon,
            current: None,
            summary: RenderSummary::default(),
        }
    }

    pub fn current_marker(&self) -> Option<MarkerId> {
        self.current
    }

    pub fn summary(&self) -> RenderSummary {
        self.summary
    }

    /// React to a single playback event
    pub async fn apply(&mut self, event: &PlaybackEvent) {
        match event {
            PlaybackEvent::Started { path_len } => {
                self.clear().await;
                self.summary.sessions += 1;
                info!(positions = path_len, "Vehicle replay started");
            }
            PlaybackEvent::Position(update) => self.draw(update).await,
            PlaybackEvent::Paused { cursor } => info!(cursor, "Vehicle replay paused"),
            PlaybackEvent::Resumed { cursor } => info!(cursor, "Vehicle replay resumed"),
            PlaybackEvent::Stopped { cursor } => info!(cursor, "Vehicle replay stopped"),
            PlaybackEvent::Completed { path_len } => info!(positions = path_len, "Vehicle replay complete"),
        }
    }

    /// Consume events until the playback side hangs up
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<PlaybackEvent>) -> RenderSummary {
        while let Some(event) = events.recv().await {
            self.apply(&event).await;
        }
        debug!(positions = self.summary.positions_drawn, "Event channel closed, renderer exiting");
        self.summary
    }

    async fn draw(&mut self, update: &PositionUpdate) {
        let vehicle = RotatedMarker::new(Marker::new(update.coordinate, self.icon.clone()), update.heading);

        let mut surface = self.surface.lock().await;
        if let Some(old) = self.current.take() {
            surface.remove_marker(old);
        }
        self.current = Some(surface.add_marker(vehicle.marker()));
        surface.fit_bounds(update.bounds, Some(update.max_zoom));
        self.summary.positions_drawn += 1;
    }

    async fn clear(&mut self) {
        if let Some(old) = self.current.take() {
            self.surface.lock().await.remove_marker(old);
        }
    }
}
