//! The slice of OpenGL the mesh layer talks to.
//!
//! [`GpuDevice`] is implemented for [`glow::Context`]; meshes and shader
//! programs hold an `Arc` of it, the same way the rest of the engine shares
//! its GL context. [`DeviceBuffer`] and [`DeviceVertexArray`] are move-only
//! owners of one GL object each and delete it when dropped.

use std::fmt::Debug;
use std::sync::Arc;

use glow::HasContext;
use serde::Deserialize;

/// Binding point of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Array,
    ElementArray,
}

impl BufferTarget {
    pub fn gl_enum(self) -> u32 {
        match self {
            BufferTarget::Array => glow::ARRAY_BUFFER,
            BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
        }
    }
}

/// Primitive topology handed straight to `glDrawElements`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    Points = glow::POINTS as isize,
    Lines = glow::LINES as isize,
    LineStrip = glow::LINE_STRIP as isize,
    LineLoop = glow::LINE_LOOP as isize,
    Triangles = glow::TRIANGLES as isize,
    TriangleStrip = glow::TRIANGLE_STRIP as isize,
    TriangleFan = glow::TRIANGLE_FAN as isize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex = glow::VERTEX_SHADER as isize,
    Fragment = glow::FRAGMENT_SHADER as isize,
}

/// GL entry points used by meshes and shader programs.
///
/// All calls act on whatever context is current on the calling thread.
pub trait GpuDevice {
    type Buffer: Copy + Debug + PartialEq;
    type VertexArray: Copy + Debug + PartialEq;
    type Shader: Copy + Debug;
    type Program: Copy + Debug + PartialEq;

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    fn delete_vertex_array(&self, vao: Self::VertexArray);
    fn bind_vertex_array(&self, vao: Option<Self::VertexArray>);

    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn delete_buffer(&self, buffer: Self::Buffer);
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>);
    /// Replaces the whole store of the buffer bound to `target`.
    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: u32);

    /// Points `slot` at the bound array buffer as tightly packed `f32`s and
    /// enables it.
    fn enable_float_attrib(&self, slot: u32, components: i32);

    /// Draws `count` `u32` indices of the bound element buffer from offset 0.
    fn draw_elements(&self, mode: DrawMode, count: i32);

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<Self::Shader, String>;
    fn delete_shader(&self, shader: Self::Shader);
    fn link_program(&self, shaders: &[Self::Shader]) -> Result<Self::Program, String>;
    fn delete_program(&self, program: Self::Program);
    fn use_program(&self, program: Option<Self::Program>);

    fn uniform_f32(&self, program: Self::Program, name: &str, value: f32);
    fn uniform_vec4(&self, program: Self::Program, name: &str, value: [f32; 4]);
    fn uniform_mat4(&self, program: Self::Program, name: &str, value: &[f32; 16]);
}

impl GpuDevice for glow::Context {
    type Buffer = glow::Buffer;
    type VertexArray = glow::VertexArray;
    type Shader = glow::Shader;
    type Program = glow::Program;

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        unsafe { HasContext::create_vertex_array(self) }
    }

    fn delete_vertex_array(&self, vao: Self::VertexArray) {
        unsafe { HasContext::delete_vertex_array(self, vao) }
    }

    fn bind_vertex_array(&self, vao: Option<Self::VertexArray>) {
        unsafe { HasContext::bind_vertex_array(self, vao) }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { HasContext::create_buffer(self) }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { HasContext::delete_buffer(self, buffer) }
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>) {
        unsafe { HasContext::bind_buffer(self, target.gl_enum(), buffer) }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: u32) {
        unsafe { self.buffer_data_u8_slice(target.gl_enum(), data, usage) }
    }

    fn enable_float_attrib(&self, slot: u32, components: i32) {
        unsafe {
            self.vertex_attrib_pointer_f32(slot, components, glow::FLOAT, false, 0, 0);
            self.enable_vertex_attrib_array(slot);
        }
    }

    fn draw_elements(&self, mode: DrawMode, count: i32) {
        unsafe { HasContext::draw_elements(self, mode as u32, count, glow::UNSIGNED_INT, 0) }
    }

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<Self::Shader, String> {
        unsafe {
            let shader = self.create_shader(stage as u32)?;
            self.shader_source(shader, source);
            HasContext::compile_shader(self, shader);

            if !self.get_shader_compile_status(shader) {
                let log = self.get_shader_info_log(shader);
                HasContext::delete_shader(self, shader);
                return Err(log);
            }

            Ok(shader)
        }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn link_program(&self, shaders: &[Self::Shader]) -> Result<Self::Program, String> {
        unsafe {
            let program = self.create_program()?;

            for shader in shaders {
                self.attach_shader(program, *shader);
            }

            HasContext::link_program(self, program);

            if !self.get_program_link_status(program) {
                let log = self.get_program_info_log(program);
                HasContext::delete_program(self, program);
                return Err(log);
            }

            for shader in shaders {
                self.detach_shader(program, *shader);
            }

            Ok(program)
        }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { HasContext::use_program(self, program) }
    }

    fn uniform_f32(&self, program: Self::Program, name: &str, value: f32) {
        unsafe {
            if let Some(loc) = self.get_uniform_location(program, name) {
                self.uniform_1_f32(Some(&loc), value);
            }
        }
    }

    fn uniform_vec4(&self, program: Self::Program, name: &str, value: [f32; 4]) {
        unsafe {
            if let Some(loc) = self.get_uniform_location(program, name) {
                self.uniform_4_f32(Some(&loc), value[0], value[1], value[2], value[3]);
            }
        }
    }

    fn uniform_mat4(&self, program: Self::Program, name: &str, value: &[f32; 16]) {
        unsafe {
            if let Some(loc) = self.get_uniform_location(program, name) {
                self.uniform_matrix_4_f32_slice(Some(&loc), false, value);
            }
        }
    }
}

/// A GL buffer object, deleted on drop.
pub struct DeviceBuffer<D: GpuDevice> {
    gl: Arc<D>,
    id: D::Buffer,
}

impl<D: GpuDevice> DeviceBuffer<D> {
    /// Creates a buffer, binds it to `target` and fills it with `data`.
    /// The buffer stays bound.
    pub fn with_data(
        gl: &Arc<D>,
        target: BufferTarget,
        data: &[u8],
        usage: u32,
    ) -> Result<Self, String> {
        let id = gl.create_buffer()?;
        gl.bind_buffer(target, Some(id));
        gl.buffer_data(target, data, usage);
        Ok(Self {
            gl: Arc::clone(gl),
            id,
        })
    }

    pub fn id(&self) -> D::Buffer {
        self.id
    }
}

impl<D: GpuDevice> Drop for DeviceBuffer<D> {
    fn drop(&mut self) {
        self.gl.delete_buffer(self.id);
    }
}

/// A GL vertex array object, deleted on drop.
pub struct DeviceVertexArray<D: GpuDevice> {
    gl: Arc<D>,
    id: D::VertexArray,
}

impl<D: GpuDevice> DeviceVertexArray<D> {
    pub fn new(gl: &Arc<D>) -> Result<Self, String> {
        let id = gl.create_vertex_array()?;
        Ok(Self {
            gl: Arc::clone(gl),
            id,
        })
    }

    pub fn id(&self) -> D::VertexArray {
        self.id
    }

    pub fn bind(&self) {
        self.gl.bind_vertex_array(Some(self.id));
    }
}

impl<D: GpuDevice> Drop for DeviceVertexArray<D> {
    fn drop(&mut self) {
        self.gl.delete_vertex_array(self.id);
    }
}
