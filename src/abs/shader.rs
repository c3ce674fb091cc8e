//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for managing shaders on a
//! [`GpuDevice`], and the [`Uniform`] trait for setting uniform variables.
//!
//! A program that draws meshes must declare its vertex inputs at the locations given by the
//! mesh's [`AttributeSlots`](crate::config::AttributeSlots).

use std::sync::Arc;

use glam::{Mat4, Vec4};

use crate::abs::device::{GpuDevice, ShaderStage};
use crate::error::{MeshError, Result};

/// Represents an individual compiled shader.
pub struct Shader<D: GpuDevice = glow::Context> {
    gl: Arc<D>,
    id: D::Shader,
    stage: ShaderStage,
}

impl<D: GpuDevice> Shader<D> {
    /// Compiles a new shader from the given source code.
    pub fn new(gl: &Arc<D>, stage: ShaderStage, source: &str) -> Result<Self> {
        let id = gl
            .compile_shader(stage, source)
            .map_err(|log| MeshError::Device(format!("{stage:?} shader: {log}")))?;
        Ok(Self {
            gl: Arc::clone(gl),
            id,
            stage,
        })
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl<D: GpuDevice> Drop for Shader<D> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.id);
    }
}

/// Represents a uniform variable in a shader program.
pub trait Uniform {
    /// Sets the value of the uniform variable in the given shader program.
    fn set_uniform<D: GpuDevice>(&self, gl: &D, program: D::Program, name: &str);
}

impl Uniform for f32 {
    fn set_uniform<D: GpuDevice>(&self, gl: &D, program: D::Program, name: &str) {
        gl.uniform_f32(program, name, *self);
    }
}

impl Uniform for Vec4 {
    fn set_uniform<D: GpuDevice>(&self, gl: &D, program: D::Program, name: &str) {
        gl.uniform_vec4(program, name, self.to_array());
    }
}

impl Uniform for Mat4 {
    fn set_uniform<D: GpuDevice>(&self, gl: &D, program: D::Program, name: &str) {
        gl.uniform_mat4(program, name, &self.to_cols_array());
    }
}

impl<T: Uniform> Uniform for &T {
    fn set_uniform<D: GpuDevice>(&self, gl: &D, program: D::Program, name: &str) {
        (*self).set_uniform(gl, program, name);
    }
}

/// Represents a shader program composed of multiple shaders.
pub struct ShaderProgram<D: GpuDevice = glow::Context> {
    gl: Arc<D>,
    id: D::Program,
}

impl<D: GpuDevice> ShaderProgram<D> {
    /// Links a new shader program from the given shaders.
    pub fn new(gl: &Arc<D>, shaders: &[&Shader<D>]) -> Result<Self> {
        let ids: Vec<D::Shader> = shaders.iter().map(|shader| shader.id).collect();
        let id = gl
            .link_program(&ids)
            .map_err(|log| MeshError::Device(format!("program link: {log}")))?;
        Ok(Self {
            gl: Arc::clone(gl),
            id,
        })
    }

    /// Compiles a vertex and fragment shader and links them.
    pub fn from_sources(gl: &Arc<D>, vertex: &str, fragment: &str) -> Result<Self> {
        let vert = Shader::new(gl, ShaderStage::Vertex, vertex)?;
        let frag = Shader::new(gl, ShaderStage::Fragment, fragment)?;
        Self::new(gl, &[&vert, &frag])
    }

    pub fn id(&self) -> D::Program {
        self.id
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        self.gl.use_program(Some(self.id));
    }

    /// Sets a uniform variable in the shader program.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        value.set_uniform(&*self.gl, self.id, name);
    }
}

impl<D: GpuDevice> Drop for ShaderProgram<D> {
    fn drop(&mut self) {
        self.gl.delete_program(self.id);
    }
}
