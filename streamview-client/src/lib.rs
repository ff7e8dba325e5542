pub mod config;
pub mod controller;
pub mod error;
pub mod logbook;
pub mod presentation;
pub mod signaling;
pub mod stats;
pub mod transport;

pub use config::{ConnectRequest, ViewerConfig};
pub use controller::{Affordance, AffordanceAction, Collaborators, ControllerSnapshot, ViewerController};
pub use error::{ViewerError, ViewerResult};
pub use logbook::{LogBook, LogEntry, LogLevel, LogSink};
pub use presentation::{MediaKind, MediaSegment, MediaSource, PlaybackEvent, PresentationSurface, RemoteStream};
pub use streamview_core::{DerivedStats, SessionStatus, TransportKind};
