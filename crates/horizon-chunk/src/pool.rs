use crate::chunk::{Chunk, ChunkId};
use crate::lattice::GridSpec;
use crate::sink::UploadSink;

/// Free list of retired chunks, reused last-in first-out.
///
/// A chunk is either held by the caller or sitting here, never both. Chunks are
/// never freed before the pool itself is dropped.
pub struct ChunkPool<H> {
    free: Vec<Chunk<H>>,
    grid: GridSpec,
    constructed: u32,
}

impl<H> ChunkPool<H> {
    pub fn new(grid: GridSpec) -> Self {
        Self {
            free: Vec::new(),
            grid,
            constructed: 0,
        }
    }

    /// Take a retired chunk, or construct one (fresh storage and sink allocation)
    /// when none is available.
    pub fn acquire<S>(&mut self, sink: &mut S) -> Chunk<H>
    where
        S: UploadSink<Handle = H>,
    {
        if let Some(chunk) = self.free.pop() {
            return chunk;
        }
        let id = ChunkId(self.constructed);
        self.constructed += 1;
        let handle = sink.allocate(self.grid.byte_len());
        log::debug!(target: "stream", "pool constructed chunk {:?} ({} bytes)", id, self.grid.byte_len());
        Chunk::new(id, &self.grid, handle)
    }

    /// Return a chunk for reuse. The chunk must not already be pooled.
    pub fn release(&mut self, chunk: Chunk<H>) {
        debug_assert!(
            self.free.iter().all(|c| c.id() != chunk.id()),
            "chunk {:?} released twice",
            chunk.id()
        );
        self.free.push(chunk);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Number of chunk objects this pool has ever built.
    #[inline]
    pub fn constructed(&self) -> u32 {
        self.constructed
    }

    #[inline]
    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn ids(&self) -> impl Iterator<Item = ChunkId> + '_ {
        self.free.iter().map(|c| c.id())
    }
}
