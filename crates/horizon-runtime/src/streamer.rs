use std::collections::VecDeque;

use horizon_chunk::{
    Chunk, ChunkPool, GridSpec, UploadSink, build_indices, build_texcoords,
};
use horizon_terrain::{HeightSampler, TerrainConfig};

use crate::config::StreamConfig;
use crate::prefetch::LatticePrefetcher;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Chunks retired (and replaced) during this step.
    pub retired: usize,
    /// The viewer is still past the front boundary after hitting the retire limit.
    pub behind: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub created: u64,
    pub retired: u64,
    pub constructed: u32,
    pub pooled: usize,
    pub max_retired_in_step: usize,
}

/// Owns the sliding window of live chunks along `-z`.
///
/// The window holds exactly `render_n` chunks once initialized, ordered by
/// generation with no gaps; the front chunk is the one nearest the origin.
/// Storage cycles between the window and the pool and is never freed while
/// the streamer lives.
pub struct ChunkStreamer<H> {
    grid: GridSpec,
    render_n: usize,
    retire_limit: usize,
    parallel_fill: bool,
    sampler: HeightSampler,
    pool: ChunkPool<H>,
    window: VecDeque<Chunk<H>>,
    next_generation: u64,
    retired: u64,
    max_retired_in_step: usize,
    indices: Vec<u32>,
    texcoords: Vec<f32>,
    prefetch: Option<LatticePrefetcher>,
    initialized: bool,
}

impl<H> ChunkStreamer<H> {
    pub fn new(cfg: &StreamConfig, terrain: &TerrainConfig) -> Self {
        debug_assert!(cfg.validate().is_ok());
        let grid = cfg.grid();
        let sampler = HeightSampler::from_config(terrain);
        let prefetch = if cfg.prefetch {
            match LatticePrefetcher::spawn(grid, terrain.seed, terrain.height_params()) {
                Ok(mut p) => {
                    p.request(0, vec![0.0; grid.float_count()]);
                    Some(p)
                }
                Err(e) => {
                    log::warn!("prefetch worker unavailable ({}); generating inline", e);
                    None
                }
            }
        } else {
            None
        };
        log::info!(
            target: "stream",
            "streamer: {}x{} cells, depth {} per chunk, window {}, retire limit {}, prefetch {}",
            grid.rows,
            grid.cols,
            grid.depth_span(),
            cfg.render_n,
            cfg.retire_limit(),
            prefetch.is_some()
        );
        Self {
            grid,
            render_n: cfg.render_n,
            retire_limit: cfg.retire_limit(),
            parallel_fill: cfg.parallel_fill,
            sampler,
            pool: ChunkPool::new(grid),
            window: VecDeque::with_capacity(cfg.render_n),
            next_generation: 0,
            retired: 0,
            max_retired_in_step: 0,
            indices: build_indices(&grid),
            texcoords: build_texcoords(&grid),
            prefetch,
            initialized: false,
        }
    }

    #[inline]
    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    #[inline]
    pub fn render_n(&self) -> usize {
        self.render_n
    }

    /// Triangle list shared by every chunk.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn texcoords(&self) -> &[f32] {
        &self.texcoords
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Active chunks, nearest to the origin first.
    pub fn iter(&self) -> impl Iterator<Item = &Chunk<H>> {
        self.window.iter()
    }

    #[inline]
    pub fn front(&self) -> Option<&Chunk<H>> {
        self.window.front()
    }

    #[inline]
    pub fn back(&self) -> Option<&Chunk<H>> {
        self.window.back()
    }

    pub fn generations(&self) -> Vec<u64> {
        self.window.iter().map(|c| c.generation()).collect()
    }

    /// Generation the next created chunk will receive.
    #[inline]
    pub fn next_generation(&self) -> u64 {
        self.next_generation
    }

    #[inline]
    pub fn pool(&self) -> &ChunkPool<H> {
        &self.pool
    }

    /// Depth the viewer must pass for the front chunk to be retired.
    pub fn front_boundary(&self) -> Option<f64> {
        self.window
            .front()
            .map(|c| self.grid.trailing_boundary(c.generation()))
    }

    pub fn stats(&self) -> StreamStats {
        StreamStats {
            created: self.next_generation,
            retired: self.retired,
            constructed: self.pool.constructed(),
            pooled: self.pool.len(),
            max_retired_in_step: self.max_retired_in_step,
        }
    }

    /// Fill the window with generations `0..render_n`. No-op once initialized.
    pub fn initialize<S>(&mut self, sink: &mut S)
    where
        S: UploadSink<Handle = H>,
    {
        if self.is_initialized() {
            log::warn!(target: "stream", "initialize called on a live window; ignoring");
            return;
        }
        while self.window.len() < self.render_n {
            self.create_chunk(sink);
        }
        self.initialized = true;
        log::info!(
            target: "stream",
            "window initialized with generations {}..{}",
            self.next_generation - self.render_n as u64,
            self.next_generation
        );
    }

    /// Build the chunk for the next generation at the far end of the window.
    fn create_chunk<S>(&mut self, sink: &mut S) -> &Chunk<H>
    where
        S: UploadSink<Handle = H>,
    {
        let generation = self.next_generation;
        let mut chunk = self.pool.acquire(sink);
        let prefetched = self.prefetch.as_mut().and_then(|p| p.take(generation));
        match prefetched {
            Some(lattice) => {
                let spare = chunk.swap_positions(lattice.positions, lattice.bounds, generation);
                if let Some(p) = self.prefetch.as_mut() {
                    p.request(generation + 1, spare);
                }
            }
            None => {
                if self.prefetch.take().is_some() {
                    log::warn!(target: "stream", "prefetch lost at generation {}; generating inline", generation);
                }
                chunk.fill(&self.grid, &self.sampler, generation, self.parallel_fill);
            }
        }
        chunk.upload(sink);
        self.next_generation += 1;
        log::trace!(
            target: "stream",
            "created generation {} in chunk {:?} (y {:.0}..{:.0})",
            generation,
            chunk.id(),
            chunk.bounds().min.y,
            chunk.bounds().max.y
        );
        self.window.push_back(chunk);
        &self.window[self.window.len() - 1]
    }

    /// Retire chunks the viewer has moved past and replace each with a new one
    /// at the far end. By default every crossed chunk is retired in one call
    /// (up to `max_catch_up`); without catch-up at most one chunk moves per call.
    /// Does nothing before `initialize`.
    pub fn step<S>(&mut self, viewer_depth: f32, sink: &mut S) -> StepReport
    where
        S: UploadSink<Handle = H>,
    {
        let mut report = StepReport::default();
        if !self.initialized {
            log::warn!(target: "stream", "step called before initialize; ignoring");
            return report;
        }
        if !viewer_depth.is_finite() {
            log::warn!(target: "stream", "ignoring non-finite viewer depth {}", viewer_depth);
            return report;
        }
        let depth = f64::from(viewer_depth);
        while let Some(boundary) = self.front_boundary() {
            if depth >= boundary {
                break;
            }
            if report.retired == self.retire_limit {
                report.behind = true;
                break;
            }
            let Some(front) = self.window.pop_front() else {
                break;
            };
            log::debug!(
                target: "stream",
                "retiring generation {} (viewer {:.1} < boundary {:.1})",
                front.generation(),
                viewer_depth,
                boundary
            );
            self.pool.release(front);
            self.create_chunk(sink);
            report.retired += 1;
        }
        if report.retired > 0 {
            self.retired += report.retired as u64;
            self.max_retired_in_step = self.max_retired_in_step.max(report.retired);
            if report.retired > 1 || report.behind {
                log::warn!(
                    target: "stream",
                    "viewer crossed {} chunk boundaries in one step{}",
                    report.retired,
                    if report.behind { " and is still behind" } else { "" }
                );
            }
        }
        debug_assert!(self.check_invariants().is_ok());
        report
    }

    /// Window size, contiguous generations, and pool/window disjointness.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.is_initialized() && self.window.len() != self.render_n {
            return Err(format!(
                "window holds {} chunks, expected {}",
                self.window.len(),
                self.render_n
            ));
        }
        for (a, b) in self.window.iter().zip(self.window.iter().skip(1)) {
            if b.generation() != a.generation() + 1 {
                return Err(format!(
                    "generation gap: {} followed by {}",
                    a.generation(),
                    b.generation()
                ));
            }
        }
        if let Some(back) = self.window.back() {
            if back.generation() + 1 != self.next_generation {
                return Err(format!(
                    "last generation {} does not precede counter {}",
                    back.generation(),
                    self.next_generation
                ));
            }
        }
        for id in self.pool.ids() {
            if self.window.iter().any(|c| c.id() == id) {
                return Err(format!("chunk {:?} is both pooled and active", id));
            }
        }
        Ok(())
    }
}
