use std::time::{Duration, Instant};

use horizon_chunk::MemorySink;
use horizon_runtime::{ChunkStreamer, StreamStats};

use crate::camera::FlyThrough;
use crate::config::AppConfig;

#[derive(Clone, Debug)]
pub struct HeadlessReport {
    pub frames: u64,
    pub final_depth: f32,
    pub stats: StreamStats,
    pub generations: (u64, u64),
    pub allocations: usize,
    pub uploads: usize,
    pub bytes_uploaded: u64,
    pub behind_frames: u64,
    pub elapsed: Duration,
}

/// Drive the streamer with the scripted camera for `frames` frames without a window.
pub fn run(cfg: &AppConfig, frames: u64) -> HeadlessReport {
    let mut sink = MemorySink::new();
    let mut streamer = ChunkStreamer::new(&cfg.stream, &cfg.terrain);
    let mut cam = FlyThrough::new(cfg.camera.clone());
    let started = Instant::now();
    streamer.initialize(&mut sink);

    let mut behind_frames = 0u64;
    for _ in 0..frames {
        let report = streamer.step(cam.depth(), &mut sink);
        if report.behind {
            behind_frames += 1;
        }
        if report.retired > 0 {
            log::debug!(
                target: "stream",
                "[tick {}] depth {:.0}: retired {}, window {:?}",
                cam.tick(),
                cam.depth(),
                report.retired,
                streamer.front().map(|c| c.generation())
            );
        }
        cam.advance();
    }

    let generations = match (streamer.front(), streamer.back()) {
        (Some(f), Some(b)) => (f.generation(), b.generation()),
        _ => (0, 0),
    };
    let report = HeadlessReport {
        frames,
        final_depth: cam.depth(),
        stats: streamer.stats(),
        generations,
        allocations: sink.allocations(),
        uploads: sink.uploads(),
        bytes_uploaded: sink.bytes_uploaded(),
        behind_frames,
        elapsed: started.elapsed(),
    };
    log::info!(
        "headless: {} frames in {:.2?}, depth {:.0}, window {}..={}, created {}, retired {}, constructed {}, uploads {} ({} KiB)",
        report.frames,
        report.elapsed,
        report.final_depth,
        report.generations.0,
        report.generations.1,
        report.stats.created,
        report.stats.retired,
        report.stats.constructed,
        report.uploads,
        report.bytes_uploaded / 1024
    );
    if report.behind_frames > 0 {
        log::warn!("viewer outran the streamer on {} frames", report.behind_frames);
    }
    report
}
