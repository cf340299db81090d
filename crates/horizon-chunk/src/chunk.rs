use horizon_geom::Aabb;
use horizon_terrain::HeightSampler;

use crate::lattice::{GridSpec, fill_lattice, fill_lattice_par};
use crate::sink::UploadSink;

/// Identity of a constructed chunk object, stable across recycling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(pub u32);

/// One streamed terrain tile: a position buffer plus the sink handle it is
/// uploaded into. Both are sized once at construction and reused in place.
pub struct Chunk<H> {
    id: ChunkId,
    generation: u64,
    positions: Vec<f32>,
    bounds: Aabb,
    handle: H,
}

impl<H> Chunk<H> {
    pub(crate) fn new(id: ChunkId, grid: &GridSpec, handle: H) -> Self {
        Self {
            id,
            generation: 0,
            positions: vec![0.0; grid.float_count()],
            bounds: Aabb::EMPTY,
            handle,
        }
    }

    #[inline]
    pub fn id(&self) -> ChunkId {
        self.id
    }

    /// Generation of the last fill. Meaningless for a chunk that was never filled.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    #[inline]
    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// Regenerate every vertex for `generation`.
    pub fn fill(&mut self, grid: &GridSpec, sampler: &HeightSampler, generation: u64, parallel: bool) {
        self.bounds = if parallel {
            fill_lattice_par(grid, sampler, generation, &mut self.positions)
        } else {
            fill_lattice(grid, sampler, generation, &mut self.positions)
        };
        self.generation = generation;
    }

    /// Install a lattice generated elsewhere and hand back the previous storage
    /// so it can be reused. Lengths must match.
    pub fn swap_positions(&mut self, positions: Vec<f32>, bounds: Aabb, generation: u64) -> Vec<f32> {
        assert_eq!(
            positions.len(),
            self.positions.len(),
            "prefilled lattice has wrong size"
        );
        self.bounds = bounds;
        self.generation = generation;
        std::mem::replace(&mut self.positions, positions)
    }

    /// Push the current positions to the sink (full replace).
    pub fn upload<S>(&mut self, sink: &mut S)
    where
        S: UploadSink<Handle = H>,
    {
        sink.upload(&mut self.handle, &self.positions);
    }
}

impl<H> std::fmt::Debug for Chunk<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("id", &self.id)
            .field("generation", &self.generation)
            .field("vertices", &self.vertex_count())
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}
