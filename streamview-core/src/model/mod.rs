mod session;
mod signaling;
mod stats;
mod stream;

pub use session::{SessionId, SessionStatus, TransportKind};
pub use signaling::{IceServerConfig, SignalMessage};
pub use stats::{DerivedStats, StatsSample};
pub use stream::{StreamStats, StreamSummary};
