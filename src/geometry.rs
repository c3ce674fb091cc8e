//! CPU-side geometry.
//!
//! [`Geometry`] is the passive data model shared by the procedural
//! generators, the ASE importer and the buffer uploader. It holds one array
//! per vertex attribute plus an index array. Non-position attributes are
//! either empty or exactly as long as the position array.

use glam::{Vec2, Vec3, Vec4};

use crate::error::{MeshError, Result};

/// Vertex attribute arrays and indices of a mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub colors: Vec<Vec4>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties all five arrays.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.colors.clear();
        self.indices.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Checks that every non-empty attribute matches the position count and
    /// that every index points at an existing vertex.
    pub fn validate(&self) -> Result<()> {
        let expected = self.positions.len();
        let lengths = [
            ("normal", self.normals.len()),
            ("uv", self.uvs.len()),
            ("color", self.colors.len()),
        ];
        for (attribute, len) in lengths {
            if len != 0 && len != expected {
                return Err(MeshError::AttributeLength {
                    attribute,
                    len,
                    expected,
                });
            }
        }

        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= expected) {
            return Err(MeshError::IndexOutOfRange {
                what: "element",
                index: index as i64,
                len: expected,
            });
        }

        Ok(())
    }

    /// Replaces an empty index array with `0..vertex_count`, so a
    /// face-ordered vertex stream can go through the indexed draw path.
    /// Returns `true` if indices were generated.
    pub fn fill_sequential_indices(&mut self) -> bool {
        if !self.indices.is_empty() {
            return false;
        }
        self.indices.extend(0..index_limit(self.positions.len()));
        true
    }
}

/// Converts a vertex count to the exclusive end of a `u32` index range.
///
/// # Panics
///
/// Panics if the vertices cannot all be addressed by a `u32` index.
fn index_limit(vertex_count: usize) -> u32 {
    u32::try_from(vertex_count).expect("Mesh has more vertices than a u32 index can address")
}
