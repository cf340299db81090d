//! Chunk storage: lattice layout, shared topology, pooled chunks, and the upload sink seam.
#![forbid(unsafe_code)]

mod chunk;
pub mod lattice;
mod pool;
pub mod sink;

pub use chunk::{Chunk, ChunkId};
pub use lattice::{GridSpec, build_indices, build_texcoords, fill_lattice, fill_lattice_par};
pub use pool::ChunkPool;
pub use sink::{MemoryBuffer, MemorySink, UploadSink};
