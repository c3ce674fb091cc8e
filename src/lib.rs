//! meshkit: CPU geometry, ASE import and OpenGL buffer management for meshes.
//!
//! A [`Mesh`] is filled either procedurally ([`Mesh::create_plane`]) or from an ASCII Scene
//! Export file ([`Mesh::read_ase`]), uploaded into one buffer per vertex attribute
//! ([`Mesh::upload`]) and drawn with a single indexed draw call ([`Mesh::render`]).

pub mod abs;
pub mod ase;
pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod parser;
pub mod primitives;

#[cfg(test)]
pub(crate) mod testing;

pub use abs::{DrawMode, GpuDevice, Mesh, ShaderProgram};
pub use config::{AseOptions, AttributeSlots, BufferUsage, MeshConfig, ViewerConfig};
pub use error::{MeshError, Result};
pub use geometry::Geometry;
