//! Vertex lattice layout and fill.
//!
//! A chunk is an `(rows+1) x (cols+1)` lattice of `(x, y, z)` positions laid out
//! row-major: vertex `(row, col)` lives at index `row * (cols + 1) + col`, i.e.
//! floats `[3 * idx, 3 * idx + 3)`. Rows advance along `+z`, columns along `+x`.
//! Chunk `g` is shifted by `-g * depth_span` along `z`.

use horizon_geom::{Aabb, Vec3};
use horizon_terrain::HeightSampler;
use rayon::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
    pub rows: usize,
    pub cols: usize,
    pub x_min: f32,
    pub x_max: f32,
    pub z_min: f32,
    pub z_max: f32,
}

impl GridSpec {
    /// Grid of `rows x cols` square cells of side `cell_size`, centered on the origin.
    pub fn from_cell_size(rows: usize, cols: usize, cell_size: f32) -> Self {
        debug_assert!(rows > 0 && cols > 0);
        let half_w = cols as f32 / 2.0 * cell_size;
        let half_h = rows as f32 / 2.0 * cell_size;
        Self {
            rows,
            cols,
            x_min: -half_w,
            x_max: half_w,
            z_min: -half_h,
            z_max: half_h,
        }
    }

    #[inline]
    pub fn row_len(&self) -> usize {
        self.cols + 1
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        (self.rows + 1) * (self.cols + 1)
    }

    #[inline]
    pub fn float_count(&self) -> usize {
        self.vertex_count() * 3
    }

    /// Size of one chunk's position buffer in bytes.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.float_count() * std::mem::size_of::<f32>()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.rows * self.cols * 6
    }

    #[inline]
    pub fn width_span(&self) -> f32 {
        self.x_max - self.x_min
    }

    /// Depth covered by one chunk; also the distance between consecutive generations.
    #[inline]
    pub fn depth_span(&self) -> f32 {
        self.z_max - self.z_min
    }

    #[inline]
    pub fn idx(&self, row: usize, col: usize) -> usize {
        row * self.row_len() + col
    }

    #[inline]
    pub fn x_at(&self, col: usize) -> f32 {
        let t = col as f64 / self.cols as f64;
        (t * f64::from(self.width_span()) + f64::from(self.x_min)) as f32
    }

    #[inline]
    pub fn z_at(&self, row: usize, generation: u64) -> f32 {
        let t = row as f64 / self.rows as f64;
        let span = f64::from(self.depth_span());
        let z = t * span + f64::from(self.z_min);
        (z + span * -(generation as f64)) as f32
    }

    /// Depth of the edge a chunk leaves behind once the viewer has passed it.
    #[inline]
    pub fn trailing_boundary(&self, generation: u64) -> f64 {
        f64::from(self.z_min) + f64::from(self.depth_span()) * -(generation as f64)
    }
}

/// Triangle list shared by every chunk: two triangles per cell, counter-clockwise
/// seen from `+y`.
pub fn build_indices(grid: &GridSpec) -> Vec<u32> {
    let mut out = Vec::with_capacity(grid.index_count());
    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let i0 = grid.idx(row, col) as u32;
            let i1 = i0 + 1;
            let i2 = grid.idx(row + 1, col) as u32;
            let i3 = i2 + 1;
            out.extend_from_slice(&[i3, i1, i0, i0, i2, i3]);
        }
    }
    out
}

/// Per-vertex `(col, row)` texture coordinates, one texel repeat per cell.
pub fn build_texcoords(grid: &GridSpec) -> Vec<f32> {
    let mut out = Vec::with_capacity(grid.vertex_count() * 2);
    for row in 0..=grid.rows {
        for col in 0..=grid.cols {
            out.push(col as f32);
            out.push(row as f32);
        }
    }
    out
}

fn fill_row(
    grid: &GridSpec,
    sampler: &HeightSampler,
    generation: u64,
    row: usize,
    out: &mut [f32],
) -> Aabb {
    let z = grid.z_at(row, generation);
    let mut bounds = Aabb::EMPTY;
    for (col, slot) in out.chunks_exact_mut(3).enumerate() {
        let x = grid.x_at(col);
        let y = sampler.height(x, z);
        slot.copy_from_slice(&[x, y, z]);
        bounds.include(Vec3::new(x, y, z));
    }
    bounds
}

/// Overwrite every position in `out` with the lattice of `generation`.
/// Returns the bounds of the written vertices.
pub fn fill_lattice(
    grid: &GridSpec,
    sampler: &HeightSampler,
    generation: u64,
    out: &mut [f32],
) -> Aabb {
    assert_eq!(out.len(), grid.float_count(), "lattice buffer size mismatch");
    out.chunks_exact_mut(grid.row_len() * 3)
        .enumerate()
        .fold(Aabb::EMPTY, |acc, (row, row_out)| {
            acc.union(fill_row(grid, sampler, generation, row, row_out))
        })
}

/// Same output as [`fill_lattice`], rows filled on the rayon pool.
pub fn fill_lattice_par(
    grid: &GridSpec,
    sampler: &HeightSampler,
    generation: u64,
    out: &mut [f32],
) -> Aabb {
    assert_eq!(out.len(), grid.float_count(), "lattice buffer size mismatch");
    out.par_chunks_exact_mut(grid.row_len() * 3)
        .enumerate()
        .map(|(row, row_out)| fill_row(grid, sampler, generation, row, row_out))
        .reduce(|| Aabb::EMPTY, Aabb::union)
}
