use horizon_chunk::{GridSpec, MemoryBuffer, MemorySink, fill_lattice};
use horizon_runtime::{ChunkStreamer, StreamConfig};
use horizon_terrain::{HeightSampler, TerrainConfig};

fn tiny_config() -> StreamConfig {
    StreamConfig {
        rows: 2,
        cols: 2,
        cell_size: 1.0,
        render_n: 2,
        ..StreamConfig::default()
    }
}

fn make(cfg: &StreamConfig) -> (ChunkStreamer<MemoryBuffer>, MemorySink) {
    let mut sink = MemorySink::new();
    let mut s = ChunkStreamer::new(cfg, &TerrainConfig::default());
    s.initialize(&mut sink);
    (s, sink)
}

#[test]
fn initialize_creates_ascending_window() {
    let (s, sink) = make(&tiny_config());
    assert_eq!(s.generations(), vec![0, 1]);
    assert_eq!(s.next_generation(), 2);
    assert_eq!(sink.allocations(), 2);
    assert_eq!(sink.uploads(), 2);
    assert!(s.check_invariants().is_ok());

    // Generation 0 spans the origin; generation 1 lies entirely further down -z.
    let g0 = s.front().unwrap().bounds();
    let g1 = s.back().unwrap().bounds();
    assert_eq!((g0.min.z, g0.max.z), (-1.0, 1.0));
    assert_eq!((g1.min.z, g1.max.z), (-3.0, -1.0));
    assert!(g0.min.z > g1.min.z);
}

#[test]
fn step_past_front_boundary_retires_front() {
    let (mut s, mut sink) = make(&tiny_config());
    assert_eq!(s.front_boundary(), Some(-1.0));
    let report = s.step(-1.5, &mut sink);
    assert_eq!(report.retired, 1);
    assert!(!report.behind);
    assert_eq!(s.generations(), vec![1, 2]);
    // The retired chunk was immediately reused for generation 2.
    assert!(s.pool().is_empty());
    assert_eq!(s.pool().constructed(), 2);
    assert_eq!(sink.allocations(), 2);
    assert_eq!(sink.uploads(), 3);
    assert_eq!(s.front_boundary(), Some(-3.0));
}

#[test]
fn step_before_boundary_changes_nothing() {
    let (mut s, mut sink) = make(&tiny_config());
    let ids: Vec<_> = s.iter().map(|c| c.id()).collect();
    for depth in [5.0, 0.0, -0.5, -1.0] {
        let report = s.step(depth, &mut sink);
        assert_eq!(report.retired, 0);
    }
    assert_eq!(s.generations(), vec![0, 1]);
    assert_eq!(s.iter().map(|c| c.id()).collect::<Vec<_>>(), ids);
    assert_eq!(sink.allocations(), 2);
    assert_eq!(sink.uploads(), 2);
    assert!(s.pool().is_empty());
}

#[test]
fn non_finite_depth_is_ignored() {
    let (mut s, mut sink) = make(&tiny_config());
    assert_eq!(s.step(f32::NEG_INFINITY, &mut sink).retired, 0);
    assert_eq!(s.step(f32::NAN, &mut sink).retired, 0);
    assert_eq!(s.generations(), vec![0, 1]);
}

#[test]
fn catch_up_retires_every_crossed_chunk() {
    let (mut s, mut sink) = make(&tiny_config());
    // Boundaries: gen0 -1, gen1 -3, gen2 -5, gen3 -7.
    let report = s.step(-6.0, &mut sink);
    assert_eq!(report.retired, 3);
    assert_eq!(s.generations(), vec![3, 4]);
    assert_eq!(s.stats().max_retired_in_step, 3);
    assert_eq!(s.pool().constructed(), 2);
    assert!(s.check_invariants().is_ok());
}

#[test]
fn without_catch_up_one_chunk_per_step() {
    let cfg = StreamConfig {
        catch_up: false,
        ..tiny_config()
    };
    let (mut s, mut sink) = make(&cfg);
    let report = s.step(-6.0, &mut sink);
    assert_eq!(report.retired, 1);
    assert!(report.behind);
    assert_eq!(s.generations(), vec![1, 2]);
    assert_eq!(s.step(-6.0, &mut sink).retired, 1);
    assert_eq!(s.step(-6.0, &mut sink).retired, 1);
    let last = s.step(-6.0, &mut sink);
    assert_eq!(last.retired, 0);
    assert!(!last.behind);
    assert_eq!(s.generations(), vec![3, 4]);
}

#[test]
fn catch_up_limit_reports_behind() {
    let cfg = StreamConfig {
        max_catch_up: 2,
        ..tiny_config()
    };
    let (mut s, mut sink) = make(&cfg);
    let report = s.step(-6.0, &mut sink);
    assert_eq!(report.retired, 2);
    assert!(report.behind);
    assert_eq!(s.step(-6.0, &mut sink).retired, 1);
    assert_eq!(s.generations(), vec![3, 4]);
}

#[test]
fn initialize_twice_is_noop() {
    let (mut s, mut sink) = make(&tiny_config());
    s.initialize(&mut sink);
    assert_eq!(s.generations(), vec![0, 1]);
    assert_eq!(sink.allocations(), 2);
}

#[test]
fn step_before_initialize_creates_nothing() {
    let cfg = tiny_config();
    let mut sink = MemorySink::new();
    let mut s: ChunkStreamer<MemoryBuffer> = ChunkStreamer::new(&cfg, &TerrainConfig::default());
    assert!(!s.is_initialized());
    assert_eq!(s.step(-100.0, &mut sink).retired, 0);
    assert!(s.is_empty());
    assert_eq!(sink.allocations(), 0);

    s.initialize(&mut sink);
    assert_eq!(s.generations(), vec![0, 1]);
    s.initialize(&mut sink);
    let report = s.step(100.0, &mut sink);
    assert_eq!(report.retired, 0);
    assert_eq!(s.len(), cfg.render_n);
    assert!(s.check_invariants().is_ok());
}

#[test]
fn fly_through_conserves_chunks() {
    // Reference camera: z = 5100 - 40 * tick.
    let cfg = StreamConfig::default();
    let (mut s, mut sink) = make(&cfg);
    let mut retired = 0u64;
    for tick in 0..2000u32 {
        let z = 5100.0 - tick as f32 * 40.0;
        let report = s.step(z, &mut sink);
        assert!(report.retired <= 1);
        retired += report.retired as u64;
        assert!(s.check_invariants().is_ok());
        assert_eq!(s.len(), cfg.render_n);
    }
    assert!(retired > 0);
    let stats = s.stats();
    assert_eq!(stats.retired, retired);
    assert_eq!(stats.created, cfg.render_n as u64 + retired);
    assert_eq!(stats.constructed as usize, cfg.render_n);
    assert_eq!(sink.allocations(), cfg.render_n);
    assert_eq!(sink.uploads() as u64, cfg.render_n as u64 + retired);
}

#[test]
fn recycled_chunk_is_fully_overwritten() {
    let cfg = StreamConfig {
        rows: 6,
        cols: 4,
        cell_size: 50.0,
        render_n: 3,
        ..StreamConfig::default()
    };
    let (mut s, mut sink) = make(&cfg);
    let front_id = s.front().unwrap().id();
    let boundary = s.front_boundary().unwrap() as f32;
    s.step(boundary - 1.0, &mut sink);
    let back = s.back().unwrap();
    assert_eq!(back.id(), front_id);
    assert_eq!(back.generation(), 3);
    assert!(s.iter().all(|c| c.generation() <= back.generation()));

    let grid: GridSpec = cfg.grid();
    let sampler = HeightSampler::from_config(&TerrainConfig::default());
    let mut expect = vec![0.0; grid.float_count()];
    fill_lattice(&grid, &sampler, 3, &mut expect);
    assert_eq!(back.positions(), &expect[..]);
    // The sink saw the refilled data, not the stale generation-0 lattice.
    assert_eq!(back.handle().data(), &expect[..]);
    assert_eq!(back.handle().uploads(), 2);
}

#[test]
fn topology_is_shared_and_in_range() {
    let (s, _sink) = make(&StreamConfig::default());
    let n = s.grid().vertex_count() as u32;
    assert_eq!(s.indices().len(), s.grid().index_count());
    assert!(s.indices().iter().all(|&i| i < n));
    for c in s.iter() {
        assert_eq!(c.vertex_count() as u32, n);
    }
}

fn run_depths(cfg: &StreamConfig, depths: &[f32]) -> Vec<Vec<f32>> {
    let (mut s, mut sink) = make(cfg);
    for &d in depths {
        s.step(d, &mut sink);
    }
    s.iter().map(|c| c.positions().to_vec()).collect()
}

#[test]
fn prefetch_and_parallel_fill_match_inline() {
    let base = StreamConfig {
        rows: 8,
        cols: 6,
        cell_size: 100.0,
        render_n: 4,
        ..StreamConfig::default()
    };
    let depths: Vec<f32> = (0..60).map(|t| 400.0 - t as f32 * 250.0).collect();
    let inline = run_depths(&base, &depths);
    let prefetch = run_depths(
        &StreamConfig {
            prefetch: true,
            ..base.clone()
        },
        &depths,
    );
    let parallel = run_depths(
        &StreamConfig {
            parallel_fill: true,
            ..base.clone()
        },
        &depths,
    );
    assert_eq!(inline, prefetch);
    assert_eq!(inline, parallel);
}
