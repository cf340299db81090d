//! Chunk streaming along the depth axis: active window, recycling, and background prefetch.
#![forbid(unsafe_code)]

mod config;
mod prefetch;
mod streamer;

pub use config::StreamConfig;
pub use prefetch::{Lattice, LatticePrefetcher};
pub use streamer::{ChunkStreamer, StepReport, StreamStats};
