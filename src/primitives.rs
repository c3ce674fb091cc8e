//! Built-in procedural shapes.

use glam::{Vec3, vec2, vec3};

use crate::abs::{GpuDevice, Mesh};
use crate::error::Result;
use crate::geometry::Geometry;

/// A horizontal square with corners at `(±size, 0, ±size)`, facing up.
///
/// # Panics
///
/// Panics if `size` is not positive.
pub fn plane(size: f32) -> Geometry {
    assert!(size > 0.0, "Plane size must be positive, got {size}");

    Geometry {
        positions: vec![
            vec3(size, 0.0, size),
            vec3(-size, 0.0, size),
            vec3(-size, 0.0, -size),
            vec3(size, 0.0, -size),
        ],
        normals: vec![Vec3::Y; 4],
        uvs: vec![vec2(1.0, 1.0), vec2(0.0, 1.0), vec2(0.0, 0.0), vec2(1.0, 0.0)],
        colors: Vec::new(),
        indices: vec![0, 2, 1, 0, 3, 2],
    }
}

impl<D: GpuDevice> Mesh<D> {
    /// Replaces the mesh with [`plane`] and uploads it.
    pub fn create_plane(&mut self, size: f32) -> Result<()> {
        self.set_geometry(plane(size));
        self.upload()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::RecordingDevice;

    #[test]
    fn test_plane_layout() {
        for size in [0.25, 1.0, 64.0] {
            let geometry = plane(size);
            assert_eq!(
                geometry.positions,
                vec![
                    vec3(size, 0.0, size),
                    vec3(-size, 0.0, size),
                    vec3(-size, 0.0, -size),
                    vec3(size, 0.0, -size),
                ]
            );
            assert!(geometry.normals.iter().all(|n| *n == vec3(0.0, 1.0, 0.0)));
            assert_eq!(geometry.normals.len(), 4);
            assert_eq!(geometry.indices, vec![0, 2, 1, 0, 3, 2]);
            assert!(geometry.colors.is_empty());
            assert!(geometry.validate().is_ok());
        }
    }

    #[test]
    fn test_plane_faces_up() {
        let geometry = plane(2.0);
        for tri in geometry.indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|i| geometry.positions[tri[i] as usize]);
            let normal = (b - a).cross(c - a).normalize();
            assert_eq!(normal, Vec3::Y);
        }
    }

    #[test]
    #[should_panic(expected = "Plane size must be positive")]
    fn test_plane_rejects_zero() {
        plane(0.0);
    }

    #[test]
    fn test_create_plane_uploads() {
        let gl = Arc::new(RecordingDevice::default());
        let mut mesh = Mesh::new(&gl);
        mesh.geometry_mut().colors = vec![glam::Vec4::ONE; 9];

        mesh.create_plane(3.0).unwrap();

        assert!(mesh.is_uploaded());
        assert!(!mesh.is_stale());
        assert_eq!(mesh.geometry(), &plane(3.0));
        assert_eq!(mesh.index_count(), Some(6));
        // positions, normals, uvs, indices
        assert_eq!(gl.live_buffers(), 4);
        assert_eq!(gl.enabled_slots(gl.sole_vertex_array()), vec![0, 1, 2]);
    }
}
