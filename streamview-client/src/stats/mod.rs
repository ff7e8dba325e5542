mod sampler;
mod stream_info;

pub use sampler::*;
pub use stream_info::*;
