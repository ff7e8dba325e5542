mod channel;
mod connector;
mod ws_connector;

pub use channel::*;
pub use connector::*;
pub use ws_connector::*;
