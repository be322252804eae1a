use protocol::request::SearchRequest;
use protocol::response::SearchResults;
use render::renderer::{RenderSummary, TileRenderer};
use render::surface::{GeometryHandle, MapSurface};
use tracing::{debug, warn};

use crate::tracker::ViewportTracker;

/// Identifies one viewport-triggered query cycle.
///
/// Monotonically increasing; later cycles supersede earlier ones. Small and
/// copyable so the host can carry it alongside the in-flight request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CycleId(pub u64);

/// Lifecycle of the current cycle.
///
/// Rendering happens synchronously inside `complete`, so `Rendering` is
/// only ever observed from within that call; between calls the session sits
/// in `Idle` or `Querying`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Querying,
    Rendering,
}

/// Failure of one search-backend request, as reported by the host's
/// transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Non-2xx status from the search endpoint.
    Status { code: u16 },
    /// Connection or transport failure before any response arrived.
    Transport { message: String },
    /// The response body did not decode as a search response.
    Decode { message: String },
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::Status { code } => write!(f, "search backend returned status {code}"),
            BackendError::Transport { message } => write!(f, "transport failure: {message}"),
            BackendError::Decode { message } => write!(f, "undecodable response: {message}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// A query the host should send to the search backend.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedQuery {
    pub cycle: CycleId,
    pub request: SearchRequest,
}

/// Outcome of delivering a cycle's response to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Rendered(RenderSummary),
    /// A newer cycle already rendered; this response was discarded.
    Stale,
    /// Backend failure; the previous geometries stay on the map.
    Failed,
}

/// Orchestrates viewport snapshots, query cycles, and rendering.
///
/// Single-threaded by construction: the host calls into the session from
/// its UI event loop, and the session never blocks. Out-of-order responses
/// are handled by the stale guard in [`complete`], which compares against
/// the last cycle that actually rendered, so quick pans cannot end with an
/// older response overwriting a fresher render.
///
/// [`complete`]: MapSession::complete
#[derive(Debug)]
pub struct MapSession {
    tracker: ViewportTracker,
    renderer: TileRenderer,
    state: CycleState,
    next_cycle: u64,
    latest_issued: Option<CycleId>,
    last_rendered: Option<CycleId>,
}

impl MapSession {
    pub fn new(initial_zoom: u8) -> Self {
        Self {
            tracker: ViewportTracker::new(initial_zoom),
            renderer: TileRenderer::new(),
            state: CycleState::Idle,
            next_cycle: 1,
            latest_issued: None,
            last_rendered: None,
        }
    }

    pub fn tracker(&self) -> &ViewportTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut ViewportTracker {
        &mut self.tracker
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    /// The map settled after a pan/zoom: start a new query cycle for the
    /// current viewport. Any cycle still in flight is superseded.
    pub fn on_tiles_loaded(&mut self) -> IssuedQuery {
        if self.state == CycleState::Querying
            && let Some(prev) = self.latest_issued
        {
            debug!(superseded = prev.0, "superseding in-flight query cycle");
        }

        let cycle = CycleId(self.next_cycle);
        self.next_cycle += 1;
        self.latest_issued = Some(cycle);
        self.state = CycleState::Querying;

        IssuedQuery {
            cycle,
            request: SearchRequest::for_viewport(&self.tracker.snapshot()),
        }
    }

    /// Whether `cycle` is still the latest issued. The host may use this to
    /// drop (or abort) the network call for superseded cycles.
    pub fn is_current(&self, cycle: CycleId) -> bool {
        self.latest_issued == Some(cycle)
    }

    /// Deliver the outcome of a cycle's backend request.
    pub fn complete<S: MapSurface>(
        &mut self,
        surface: &mut S,
        cycle: CycleId,
        outcome: Result<SearchResults, BackendError>,
    ) -> CycleOutcome {
        if let Some(rendered) = self.last_rendered
            && cycle <= rendered
        {
            debug!(cycle = cycle.0, "discarding stale response");
            return CycleOutcome::Stale;
        }

        match outcome {
            Ok(results) => {
                self.state = CycleState::Rendering;
                let summary = self.renderer.render(surface, &results);
                if summary.skipped_cells > 0 {
                    warn!(
                        cycle = cycle.0,
                        skipped = summary.skipped_cells,
                        "dropped buckets with unparseable cell keys"
                    );
                }
                self.last_rendered = Some(cycle);
                self.settle(cycle);
                CycleOutcome::Rendered(summary)
            }
            Err(error) => {
                // Keep the last good render on screen; the next settled
                // viewport change retries naturally.
                warn!(cycle = cycle.0, error = %error, "search request failed; keeping previous geometries");
                self.settle(cycle);
                CycleOutcome::Failed
            }
        }
    }

    /// Forward a marker click to the renderer.
    pub fn on_marker_click<S: MapSurface>(
        &mut self,
        surface: &mut S,
        handle: GeometryHandle,
    ) -> bool {
        self.renderer.on_marker_click(surface, handle)
    }

    pub fn renderer(&self) -> &TileRenderer {
        &self.renderer
    }

    /// Back to `Idle` unless a newer cycle is still in flight.
    fn settle(&mut self, cycle: CycleId) {
        if self.latest_issued == Some(cycle) {
            self.state = CycleState::Idle;
        } else {
            self.state = CycleState::Querying;
        }
    }
}
