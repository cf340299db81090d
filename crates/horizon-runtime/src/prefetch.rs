use std::io;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded};
use horizon_chunk::{GridSpec, fill_lattice};
use horizon_geom::Aabb;
use horizon_terrain::{HeightParams, HeightSampler};

struct LatticeJob {
    generation: u64,
    positions: Vec<f32>,
}

/// A filled lattice handed back by the worker.
pub struct Lattice {
    pub generation: u64,
    pub positions: Vec<f32>,
    pub bounds: Aabb,
}

/// Single background worker that fills the next chunk's lattice ahead of time.
///
/// At most one job is in flight. Buffers travel back and forth through the
/// channels, so once the first spare buffer exists nothing is allocated.
pub struct LatticePrefetcher {
    job_tx: Option<Sender<LatticeJob>>,
    res_rx: Receiver<Lattice>,
    worker: Option<JoinHandle<()>>,
    in_flight: Option<u64>,
}

impl LatticePrefetcher {
    pub fn spawn(grid: GridSpec, seed: i32, params: HeightParams) -> io::Result<Self> {
        let (job_tx, job_rx) = bounded::<LatticeJob>(1);
        let (res_tx, res_rx) = bounded::<Lattice>(1);
        let worker = thread::Builder::new()
            .name("horizon-prefetch".to_string())
            .spawn(move || {
                let sampler = HeightSampler::new(seed, params);
                while let Ok(job) = job_rx.recv() {
                    let LatticeJob {
                        generation,
                        mut positions,
                    } = job;
                    let bounds = fill_lattice(&grid, &sampler, generation, &mut positions);
                    log::trace!(target: "stream", "prefetched generation {}", generation);
                    if res_tx
                        .send(Lattice {
                            generation,
                            positions,
                            bounds,
                        })
                        .is_err()
                    {
                        break;
                    }
                }
            })?;
        Ok(Self {
            job_tx: Some(job_tx),
            res_rx,
            worker: Some(worker),
            in_flight: None,
        })
    }

    #[inline]
    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    /// Queue `generation` to be filled into `positions`. Returns false (and
    /// drops the buffer) if a job is already in flight or the worker is gone.
    pub fn request(&mut self, generation: u64, positions: Vec<f32>) -> bool {
        if self.in_flight.is_some() {
            log::warn!(target: "stream", "prefetch request for {} while {:?} in flight", generation, self.in_flight);
            return false;
        }
        let Some(tx) = self.job_tx.as_ref() else {
            return false;
        };
        if tx.send(LatticeJob { generation, positions }).is_err() {
            log::warn!(target: "stream", "prefetch worker stopped; generation {} not queued", generation);
            return false;
        }
        self.in_flight = Some(generation);
        true
    }

    /// Wait for the in-flight lattice. Returns `None` if nothing for
    /// `generation` is in flight or the worker died.
    pub fn take(&mut self, generation: u64) -> Option<Lattice> {
        if self.in_flight != Some(generation) {
            return None;
        }
        self.in_flight = None;
        match self.res_rx.recv() {
            Ok(lattice) => {
                debug_assert_eq!(lattice.generation, generation);
                Some(lattice)
            }
            Err(_) => {
                log::warn!(target: "stream", "prefetch worker disconnected while filling {}", generation);
                None
            }
        }
    }
}

impl Drop for LatticePrefetcher {
    fn drop(&mut self) {
        self.job_tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!(target: "stream", "prefetch worker panicked");
            }
        }
    }
}
