//! Mesh management module.
//!
//! This module defines the [`Mesh`] struct, which pairs CPU-side [`Geometry`] with the GPU
//! objects built from it. Every attribute lives in its own tightly packed buffer bound to a
//! fixed slot from [`AttributeSlots`](crate::config::AttributeSlots):
//!
//! | attribute | components | source array        |
//! |-----------|------------|---------------------|
//! | position  | 3 × f32    | `positions`         |
//! | normal    | 3 × f32    | `normals` (if any)  |
//! | uv        | 2 × f32    | `uvs` (if any)      |
//! | color     | 4 × f32    | `colors` (if any)   |
//!
//! Uploads always replace the previous generation of buffers. Cloning a mesh copies only its
//! geometry; the clone has to be uploaded before it can be drawn.

use std::sync::Arc;

use crate::abs::device::{BufferTarget, DeviceBuffer, DeviceVertexArray, DrawMode, GpuDevice};
use crate::abs::shader::ShaderProgram;
use crate::config::MeshConfig;
use crate::error::{MeshError, Result};
use crate::geometry::Geometry;

/// GPU objects of one upload.
struct MeshBuffers<D: GpuDevice> {
    // Field order is drop order: buffers go before the vertex array that references them.
    _positions: DeviceBuffer<D>,
    normals: Option<DeviceBuffer<D>>,
    uvs: Option<DeviceBuffer<D>>,
    colors: Option<DeviceBuffer<D>>,
    _indices: DeviceBuffer<D>,
    vao: DeviceVertexArray<D>,
    index_count: usize,
}

/// Represents a mesh with its geometry and, once uploaded, its GPU buffers.
pub struct Mesh<D: GpuDevice = glow::Context> {
    gl: Arc<D>,
    config: MeshConfig,
    geometry: Geometry,
    buffers: Option<MeshBuffers<D>>,
    stale: bool,
}

impl<D: GpuDevice> Mesh<D> {
    /// Creates an empty mesh with the default attribute slots.
    pub fn new(gl: &Arc<D>) -> Self {
        Self::with_config(gl, MeshConfig::default())
    }

    pub fn with_config(gl: &Arc<D>, config: MeshConfig) -> Self {
        Self {
            gl: Arc::clone(gl),
            config,
            geometry: Geometry::default(),
            buffers: None,
            stale: false,
        }
    }

    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Gives write access to the arrays. The mesh must be uploaded again before the next
    /// [`Mesh::render`].
    pub fn geometry_mut(&mut self) -> &mut Geometry {
        self.stale = true;
        &mut self.geometry
    }

    /// Replaces all arrays at once.
    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.stale = true;
        self.geometry = geometry;
    }

    /// Empties all arrays. GPU buffers are left as they are.
    pub fn clear(&mut self) {
        self.stale = true;
        self.geometry.clear();
    }

    pub fn is_uploaded(&self) -> bool {
        self.buffers.is_some()
    }

    /// Returns `true` if the arrays changed since the last upload.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Number of indices in the current index buffer.
    pub fn index_count(&self) -> Option<usize> {
        self.buffers.as_ref().map(|buffers| buffers.index_count)
    }

    fn release_buffers(&mut self) {
        if self.buffers.take().is_some() {
            log::trace!("Released mesh buffers");
        }
    }

    /// Uploads the geometry, replacing any buffers from a previous upload.
    ///
    /// If the index array is empty it is first filled with `0..vertex_count`, so
    /// face-ordered vertex streams draw as-is.
    ///
    /// # Panics
    ///
    /// Panics if the mesh has no positions, or if an attribute array or index breaks the
    /// length invariant of [`Geometry::validate`].
    pub fn upload(&mut self) -> Result<()> {
        assert!(!self.geometry.positions.is_empty(), "No vertices in this mesh");
        if let Err(e) = self.geometry.validate() {
            panic!("Invalid mesh geometry: {e}");
        }

        self.release_buffers();

        let synthesized = self.geometry.fill_sequential_indices();
        let buffers = self.build_buffers();

        // Leave no binding behind, even when an allocation failed halfway.
        self.gl.bind_vertex_array(None);
        self.gl.bind_buffer(BufferTarget::Array, None);
        self.gl.bind_buffer(BufferTarget::ElementArray, None);

        let buffers = buffers.map_err(MeshError::Device)?;
        log::debug!(
            "Uploaded mesh: {} vertices, {} indices{}, normals: {}, uvs: {}, colors: {}",
            self.geometry.vertex_count(),
            buffers.index_count,
            if synthesized { " (sequential)" } else { "" },
            buffers.normals.is_some(),
            buffers.uvs.is_some(),
            buffers.colors.is_some(),
        );
        self.buffers = Some(buffers);
        self.stale = false;
        Ok(())
    }

    fn build_buffers(&self) -> std::result::Result<MeshBuffers<D>, String> {
        let gl = &self.gl;
        let slots = self.config.slots;
        let usage = self.config.usage.gl_enum();
        let geometry = &self.geometry;

        let vao = DeviceVertexArray::new(gl)?;
        vao.bind();

        let attrib = |data: &[u8], slot: u32, components: i32| {
            let buffer = DeviceBuffer::with_data(gl, BufferTarget::Array, data, usage)?;
            gl.enable_float_attrib(slot, components);
            Ok::<_, String>(buffer)
        };

        let positions = attrib(bytemuck::cast_slice(&geometry.positions), slots.position, 3)?;
        let normals = (!geometry.normals.is_empty())
            .then(|| attrib(bytemuck::cast_slice(&geometry.normals), slots.normal, 3))
            .transpose()?;
        let uvs = (!geometry.uvs.is_empty())
            .then(|| attrib(bytemuck::cast_slice(&geometry.uvs), slots.uv, 2))
            .transpose()?;
        let colors = (!geometry.colors.is_empty())
            .then(|| attrib(bytemuck::cast_slice(&geometry.colors), slots.color, 4))
            .transpose()?;

        // Bound while the vertex array is, so the binding is recorded in it.
        let indices = DeviceBuffer::with_data(
            gl,
            BufferTarget::ElementArray,
            bytemuck::cast_slice(&geometry.indices),
            usage,
        )?;

        Ok(MeshBuffers {
            _positions: positions,
            normals,
            uvs,
            colors,
            _indices: indices,
            vao,
            index_count: geometry.indices.len(),
        })
    }

    /// Draws the mesh with one indexed draw call over the whole index buffer.
    ///
    /// `program` is made current first; it has to declare inputs at this mesh's attribute
    /// slots.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the mesh was never uploaded or changed since its last
    /// upload. Release builds log the problem and skip the draw.
    pub fn render(&self, mode: DrawMode, program: &ShaderProgram<D>) {
        let buffers = match &self.buffers {
            Some(buffers) if !self.stale => buffers,
            _ => {
                let reason = if self.buffers.is_none() {
                    "was never uploaded"
                } else {
                    "changed since its last upload"
                };
                if cfg!(debug_assertions) {
                    panic!("Mesh {reason}");
                }
                log::error!("Skipping draw: mesh {reason}");
                return;
            }
        };

        program.use_program();
        buffers.vao.bind();
        self.gl.draw_elements(mode, draw_count(buffers.index_count));
        self.gl.bind_vertex_array(None);
    }
}

/// GL takes the element count as a signed int.
///
/// # Panics
///
/// Panics if the count does not fit, rather than drawing a truncated index buffer.
fn draw_count(index_count: usize) -> i32 {
    i32::try_from(index_count).expect("Index buffer is too large for a single draw call")
}

impl<D: GpuDevice> Clone for Mesh<D> {
    /// Copies the geometry only. The clone owns no GPU buffers until it is uploaded.
    fn clone(&self) -> Self {
        Self {
            gl: Arc::clone(&self.gl),
            config: self.config,
            geometry: self.geometry.clone(),
            buffers: None,
            stale: true,
        }
    }
}
