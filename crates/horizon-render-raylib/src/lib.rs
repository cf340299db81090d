//! Raylib-backed upload sink and chunk drawing.
// Unsafe is required for Raylib mesh/model upload operations in this crate.

use std::ffi::c_void;

use horizon_chunk::{Chunk, UploadSink};
use horizon_geom::Aabb;
use raylib::prelude::*;

pub mod conv {
    use horizon_geom::{Aabb, Vec3};

    pub fn vec3_to_rl(v: Vec3) -> raylib::prelude::Vector3 {
        raylib::prelude::Vector3::new(v.x, v.y, v.z)
    }

    pub fn aabb_to_rl(bb: Aabb) -> raylib::core::math::BoundingBox {
        raylib::core::math::BoundingBox::new(vec3_to_rl(bb.min), vec3_to_rl(bb.max))
    }
}

/// Largest vertex count addressable by Raylib's 16-bit index buffers.
pub const MAX_MESH_VERTICES: usize = u16::MAX as usize + 1;

/// Index and texcoord data shared by every chunk mesh.
#[derive(Clone, Debug)]
pub struct MeshTopology {
    indices: Vec<u16>,
    texcoords: Vec<f32>,
    vertex_count: usize,
}

impl MeshTopology {
    pub fn new(indices: &[u32], texcoords: &[f32], vertex_count: usize) -> Result<Self, String> {
        if vertex_count > MAX_MESH_VERTICES {
            return Err(format!(
                "chunk has {} vertices; raylib meshes hold at most {}",
                vertex_count, MAX_MESH_VERTICES
            ));
        }
        if indices.len() % 3 != 0 {
            return Err(format!("index count {} is not a triangle list", indices.len()));
        }
        if texcoords.len() != vertex_count * 2 {
            return Err(format!(
                "expected {} texcoord floats, got {}",
                vertex_count * 2,
                texcoords.len()
            ));
        }
        let mut narrow = Vec::with_capacity(indices.len());
        for &i in indices {
            if i as usize >= vertex_count {
                return Err(format!("index {} out of range for {} vertices", i, vertex_count));
            }
            narrow.push(i as u16);
        }
        Ok(Self {
            indices: narrow,
            texcoords: texcoords.to_vec(),
            vertex_count,
        })
    }

    #[inline]
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// GPU model backing one chunk. Created once per chunk and rewritten in place.
pub struct ChunkMesh {
    pub model: raylib::core::models::Model,
    pub vertex_count: usize,
}

/// Upload sink bound to the Raylib context for the duration of a frame.
pub struct RaylibSink<'a> {
    rl: &'a mut RaylibHandle,
    thread: &'a RaylibThread,
    topology: &'a MeshTopology,
}

impl<'a> RaylibSink<'a> {
    pub fn new(rl: &'a mut RaylibHandle, thread: &'a RaylibThread, topology: &'a MeshTopology) -> Self {
        Self { rl, thread, topology }
    }
}

impl UploadSink for RaylibSink<'_> {
    type Handle = ChunkMesh;

    fn allocate(&mut self, byte_len: usize) -> ChunkMesh {
        let v_count = byte_len / (3 * std::mem::size_of::<f32>());
        assert_eq!(
            v_count,
            self.topology.vertex_count,
            "chunk buffer does not match mesh topology"
        );
        let topo = self.topology;
        let mut raw: raylib::ffi::Mesh = unsafe { std::mem::zeroed() };
        raw.vertexCount = v_count as i32;
        raw.triangleCount = topo.triangle_count() as i32;
        unsafe {
            let vbytes = (v_count * 3 * std::mem::size_of::<f32>()) as u32;
            let tbytes = (v_count * 2 * std::mem::size_of::<f32>()) as u32;
            let ibytes = (topo.indices.len() * std::mem::size_of::<u16>()) as u32;
            raw.vertices = raylib::ffi::MemAlloc(vbytes) as *mut f32;
            raw.texcoords = raylib::ffi::MemAlloc(tbytes) as *mut f32;
            raw.indices = raylib::ffi::MemAlloc(ibytes) as *mut u16;
            std::ptr::write_bytes(raw.vertices, 0, v_count * 3);
            std::ptr::copy_nonoverlapping(topo.texcoords.as_ptr(), raw.texcoords, v_count * 2);
            std::ptr::copy_nonoverlapping(topo.indices.as_ptr(), raw.indices, topo.indices.len());
        }
        let mut mesh = unsafe { raylib::core::models::Mesh::from_raw(raw) };
        // Dynamic so per-generation rewrites go through UpdateMeshBuffer.
        unsafe {
            mesh.upload(true);
        }
        let model = match self
            .rl
            .load_model_from_mesh(self.thread, unsafe { mesh.make_weak() })
        {
            Ok(model) => model,
            Err(e) => panic!("failed to create chunk model: {e}"),
        };
        log::debug!(target: "render", "allocated chunk mesh: {} vertices, {} bytes", v_count, byte_len);
        ChunkMesh {
            model,
            vertex_count: v_count,
        }
    }

    fn upload(&mut self, handle: &mut ChunkMesh, vertices: &[f32]) {
        assert_eq!(
            vertices.len(),
            handle.vertex_count * 3,
            "upload must replace the whole buffer"
        );
        let bytes = std::mem::size_of_val(vertices);
        unsafe {
            let mesh = &mut *handle.model.meshes;
            std::ptr::copy_nonoverlapping(vertices.as_ptr(), mesh.vertices, vertices.len());
            raylib::ffi::UpdateMeshBuffer(*mesh, 0, vertices.as_ptr() as *const c_void, bytes as i32, 0);
        }
    }
}

/// Draw one chunk. `scale` maps world units into the view volume.
pub fn draw_chunk<D: RaylibDraw3D>(
    d3: &mut D,
    chunk: &Chunk<ChunkMesh>,
    scale: f32,
    wireframe: bool,
    color: Color,
) {
    let model = &chunk.handle().model;
    if wireframe {
        d3.draw_model_wires(model, Vector3::zero(), scale, color);
    } else {
        d3.draw_model(model, Vector3::zero(), scale, color);
    }
}

pub fn draw_chunk_bounds<D: RaylibDraw3D>(d3: &mut D, chunk: &Chunk<ChunkMesh>, scale: f32, color: Color) {
    let bb = chunk.bounds();
    if bb.is_empty() {
        return;
    }
    d3.draw_bounding_box(conv::aabb_to_rl(Aabb::new(bb.min * scale, bb.max * scale)), color);
}
