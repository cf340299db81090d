use horizon_chunk::{ChunkPool, GridSpec, MemorySink, build_indices, build_texcoords};
use horizon_terrain::{HeightParams, HeightSampler};
use proptest::prelude::*;

fn dim() -> impl Strategy<Value = usize> {
    1usize..=24
}

proptest! {
    // Every index points inside the lattice and each cell emits two triangles
    #[test]
    fn indices_in_range(rows in dim(), cols in dim()) {
        let g = GridSpec::from_cell_size(rows, cols, 10.0);
        let idx = build_indices(&g);
        prop_assert_eq!(idx.len(), g.index_count());
        prop_assert!(idx.iter().all(|&i| (i as usize) < g.vertex_count()));
        // No degenerate triangles
        for tri in idx.chunks_exact(3) {
            prop_assert!(tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2]);
        }
    }

    // Topology depends only on the grid dimensions
    #[test]
    fn indices_independent_of_cell_size(rows in dim(), cols in dim(), a in 0.5f32..500.0, b in 0.5f32..500.0) {
        let ga = GridSpec::from_cell_size(rows, cols, a);
        let gb = GridSpec::from_cell_size(rows, cols, b);
        prop_assert_eq!(build_indices(&ga), build_indices(&gb));
        prop_assert_eq!(build_texcoords(&ga).len(), ga.vertex_count() * 2);
    }

    // idx(row, col) is a bijection onto [0, vertex_count)
    #[test]
    fn idx_is_unique_and_in_range(rows in dim(), cols in dim()) {
        let g = GridSpec::from_cell_size(rows, cols, 1.0);
        let mut seen = vec![false; g.vertex_count()];
        for row in 0..=rows {
            for col in 0..=cols {
                let i = g.idx(row, col);
                prop_assert!(i < g.vertex_count());
                prop_assert!(!seen[i]);
                seen[i] = true;
            }
        }
        prop_assert!(seen.into_iter().all(|b| b));
    }

    // Refilling a recycled chunk leaves nothing from the previous generation
    #[test]
    fn refill_overwrites_all_vertices(rows in 1usize..8, cols in 1usize..8, g0 in 0u64..1000, dg in 1u64..50) {
        let grid = GridSpec::from_cell_size(rows, cols, 100.0);
        let sampler = HeightSampler::new(5, HeightParams::default());
        let mut sink = MemorySink::new();
        let mut pool = ChunkPool::new(grid);
        let mut chunk = pool.acquire(&mut sink);
        chunk.fill(&grid, &sampler, g0, false);
        pool.release(chunk);
        let mut chunk = pool.acquire(&mut sink);
        chunk.fill(&grid, &sampler, g0 + dg, false);

        let mut fresh = pool.acquire(&mut sink);
        fresh.fill(&grid, &sampler, g0 + dg, false);
        prop_assert_eq!(chunk.positions(), fresh.positions());
        prop_assert_eq!(chunk.generation(), g0 + dg);
        prop_assert_eq!(chunk.vertex_count(), grid.vertex_count());
    }
}
