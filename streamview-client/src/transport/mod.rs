mod endpoints;
mod hls_engine;
mod peer;
mod rtc_peer;
mod segmented;

pub use endpoints::*;
pub use hls_engine::*;
pub use peer::*;
pub use rtc_peer::*;
pub use segmented::*;
