//! This module contains the GPU-facing components of the crate,
//! including the device abstraction, shader management, and mesh handling.

#[cfg(feature = "viewer")]
pub mod app;
pub mod device;
pub mod mesh;
pub mod shader;

#[cfg(feature = "viewer")]
pub use app::*;
pub use device::*;
pub use mesh::*;
pub use shader::*;
