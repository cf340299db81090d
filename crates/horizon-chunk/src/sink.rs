//! Seam between chunk storage and whatever holds vertex buffers for drawing.

/// Receives chunk vertex buffers.
///
/// `allocate` is called once per constructed chunk with the final buffer size;
/// `upload` replaces the whole buffer and must be visible to the next draw.
/// Failures inside a sink are resource exhaustion and are not reported back.
pub trait UploadSink {
    type Handle;

    fn allocate(&mut self, byte_len: usize) -> Self::Handle;

    fn upload(&mut self, handle: &mut Self::Handle, vertices: &[f32]);
}

/// CPU-side buffer produced by [`MemorySink`].
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryBuffer {
    data: Vec<f32>,
    uploads: u32,
}

impl MemoryBuffer {
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn uploads(&self) -> u32 {
        self.uploads
    }
}

/// Upload sink that keeps buffers in main memory. Used by the headless driver
/// and by tests; counts every call so callers can check allocation behavior.
#[derive(Debug, Default)]
pub struct MemorySink {
    allocations: usize,
    uploads: usize,
    bytes_uploaded: u64,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn allocations(&self) -> usize {
        self.allocations
    }

    #[inline]
    pub fn uploads(&self) -> usize {
        self.uploads
    }

    #[inline]
    pub fn bytes_uploaded(&self) -> u64 {
        self.bytes_uploaded
    }
}

impl UploadSink for MemorySink {
    type Handle = MemoryBuffer;

    fn allocate(&mut self, byte_len: usize) -> MemoryBuffer {
        debug_assert_eq!(byte_len % std::mem::size_of::<f32>(), 0);
        self.allocations += 1;
        MemoryBuffer {
            data: vec![0.0; byte_len / std::mem::size_of::<f32>()],
            uploads: 0,
        }
    }

    fn upload(&mut self, handle: &mut MemoryBuffer, vertices: &[f32]) {
        assert_eq!(
            handle.data.len(),
            vertices.len(),
            "upload must replace the whole buffer"
        );
        handle.data.copy_from_slice(vertices);
        handle.uploads += 1;
        self.uploads += 1;
        self.bytes_uploaded += std::mem::size_of_val(vertices) as u64;
    }
}
