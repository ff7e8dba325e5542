use crate::error::TransportError;
use crate::presentation::{MediaSource, PresentationSurface};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use url::Url;

/// Notifications from a running segment engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The first manifest was fetched and parsed; playback can begin.
    ManifestParsed { segments: usize, live: bool },

    /// A manifest or segment request failed. The engine keeps polling.
    Error(String),

    /// The playlist carried `#EXT-X-ENDLIST` and every segment was appended.
    Ended,
}

/// A client-side segment fetcher attached to a presentation surface.
pub trait SegmentEngine: Send + Sync {
    fn stop(&self);
}

pub trait SegmentEngineFactory: Send + Sync {
    /// Starts fetching `manifest` and appending its segments to `surface`.
    fn start(
        &self,
        manifest: Url,
        surface: Arc<dyn PresentationSurface>,
        events: mpsc::Sender<EngineEvent>,
    ) -> Result<Box<dyn SegmentEngine>, TransportError>;
}

/// How a segmented-pull session ended up attached to the surface.
pub enum SegmentedPlayback {
    /// The surface plays the manifest itself. Connected immediately.
    Native,
    /// An engine feeds segments. Connected once the manifest is parsed.
    Engine(Box<dyn SegmentEngine>),
}

impl SegmentedPlayback {
    pub fn stop(&self) {
        if let SegmentedPlayback::Engine(engine) = self {
            engine.stop();
        }
    }
}

/// Binds the manifest to the surface, natively when it can, otherwise through
/// an engine from `factory`.
pub fn attach_segmented(
    manifest: Url,
    surface: &Arc<dyn PresentationSurface>,
    factory: Option<&Arc<dyn SegmentEngineFactory>>,
    events: mpsc::Sender<EngineEvent>,
) -> Result<SegmentedPlayback, TransportError> {
    if surface.supports_native_hls() {
        info!("Surface plays HLS natively, assigning {}", manifest);
        surface.set_source(MediaSource::Manifest(manifest));
        return Ok(SegmentedPlayback::Native);
    }

    let Some(factory) = factory else {
        return Err(TransportError::SegmentedPlaybackUnsupported);
    };

    info!("Attaching segment engine to {}", manifest);
    surface.set_source(MediaSource::SegmentFeed(manifest.clone()));
    let engine = factory.start(manifest, surface.clone(), events)?;
    Ok(SegmentedPlayback::Engine(engine))
}
