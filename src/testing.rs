//! A [`GpuDevice`] that records state instead of talking to a driver.
//!
//! It hands out increasing integer names, keeps track of which objects are
//! alive, what each buffer holds, which buffer every vertex array slot points
//! at, and every draw call issued.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use crate::abs::{BufferTarget, DrawMode, GpuDevice, ShaderStage};

#[derive(Debug, Clone, PartialEq)]
pub struct Draw {
    pub mode: DrawMode,
    pub count: i32,
    pub vertex_array: Option<u32>,
    pub program: Option<u32>,
    pub element_buffer: Option<u32>,
}

#[derive(Debug, Default)]
struct VertexArrayState {
    /// slot -> (buffer, components)
    attribs: HashMap<u32, (u32, i32)>,
    element_buffer: Option<u32>,
}

#[derive(Default)]
pub struct RecordingDevice {
    next_id: Cell<u32>,
    buffers_left: Cell<Option<usize>>,
    buffers: RefCell<HashMap<u32, Vec<u8>>>,
    usages: RefCell<HashMap<u32, u32>>,
    vertex_arrays: RefCell<HashMap<u32, VertexArrayState>>,
    shaders: RefCell<HashSet<u32>>,
    programs: RefCell<HashSet<u32>>,
    bound_vao: Cell<Option<u32>>,
    bound_array: Cell<Option<u32>>,
    bound_element: Cell<Option<u32>>,
    current_program: Cell<Option<u32>>,
    draws: RefCell<Vec<Draw>>,
    uniforms: RefCell<HashMap<String, Vec<f32>>>,
}

impl RecordingDevice {
    fn next(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    /// Makes `create_buffer` fail once `n` more buffers have been created.
    pub fn fail_buffer_creation_after(&self, n: usize) {
        self.buffers_left.set(Some(n));
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.borrow().len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.vertex_arrays.borrow().len()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.borrow().len()
    }

    pub fn live_shaders(&self) -> usize {
        self.shaders.borrow().len()
    }

    pub fn buffer_contents(&self, buffer: u32) -> Option<Vec<u8>> {
        self.buffers.borrow().get(&buffer).cloned()
    }

    pub fn buffer_usage(&self, buffer: u32) -> Option<u32> {
        self.usages.borrow().get(&buffer).copied()
    }

    pub fn bound_vertex_array(&self) -> Option<u32> {
        self.bound_vao.get()
    }

    pub fn bound_array_buffer(&self) -> Option<u32> {
        self.bound_array.get()
    }

    pub fn current_program(&self) -> Option<u32> {
        self.current_program.get()
    }

    /// Buffer and component count bound to `slot` of `vao`.
    pub fn attrib(&self, vao: u32, slot: u32) -> Option<(u32, i32)> {
        self.vertex_arrays
            .borrow()
            .get(&vao)
            .and_then(|state| state.attribs.get(&slot).copied())
    }

    pub fn enabled_slots(&self, vao: u32) -> Vec<u32> {
        let mut slots: Vec<u32> = self
            .vertex_arrays
            .borrow()
            .get(&vao)
            .map(|state| state.attribs.keys().copied().collect())
            .unwrap_or_default();
        slots.sort_unstable();
        slots
    }

    pub fn element_buffer(&self, vao: u32) -> Option<u32> {
        self.vertex_arrays
            .borrow()
            .get(&vao)
            .and_then(|state| state.element_buffer)
    }

    /// The only live vertex array.
    pub fn sole_vertex_array(&self) -> u32 {
        let vaos = self.vertex_arrays.borrow();
        assert_eq!(vaos.len(), 1, "expected exactly one vertex array");
        *vaos.keys().next().unwrap()
    }

    pub fn draws(&self) -> Vec<Draw> {
        self.draws.borrow().clone()
    }

    pub fn uniform(&self, name: &str) -> Option<Vec<f32>> {
        self.uniforms.borrow().get(name).cloned()
    }
}

/// Reinterprets a little-endian byte buffer as `f32`s.
pub fn as_f32s(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

pub fn as_u32s(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

impl GpuDevice for RecordingDevice {
    type Buffer = u32;
    type VertexArray = u32;
    type Shader = u32;
    type Program = u32;

    fn create_vertex_array(&self) -> Result<u32, String> {
        let id = self.next();
        self.vertex_arrays
            .borrow_mut()
            .insert(id, VertexArrayState::default());
        Ok(id)
    }

    fn delete_vertex_array(&self, vao: u32) {
        assert!(
            self.vertex_arrays.borrow_mut().remove(&vao).is_some(),
            "double delete of vertex array {vao}"
        );
        if self.bound_vao.get() == Some(vao) {
            self.bound_vao.set(None);
        }
    }

    fn bind_vertex_array(&self, vao: Option<u32>) {
        if let Some(id) = vao {
            assert!(
                self.vertex_arrays.borrow().contains_key(&id),
                "bind of dead vertex array {id}"
            );
        }
        self.bound_vao.set(vao);
    }

    fn create_buffer(&self) -> Result<u32, String> {
        if let Some(left) = self.buffers_left.get() {
            if left == 0 {
                return Err("out of buffer names".to_string());
            }
            self.buffers_left.set(Some(left - 1));
        }
        let id = self.next();
        self.buffers.borrow_mut().insert(id, Vec::new());
        Ok(id)
    }

    fn delete_buffer(&self, buffer: u32) {
        assert!(
            self.buffers.borrow_mut().remove(&buffer).is_some(),
            "double delete of buffer {buffer}"
        );
        self.usages.borrow_mut().remove(&buffer);
        if self.bound_array.get() == Some(buffer) {
            self.bound_array.set(None);
        }
        if self.bound_element.get() == Some(buffer) {
            self.bound_element.set(None);
        }
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<u32>) {
        if let Some(id) = buffer {
            assert!(
                self.buffers.borrow().contains_key(&id),
                "bind of dead buffer {id}"
            );
        }
        match target {
            BufferTarget::Array => self.bound_array.set(buffer),
            BufferTarget::ElementArray => {
                self.bound_element.set(buffer);
                // Element buffer bindings are vertex array state.
                if let Some(vao) = self.bound_vao.get() {
                    if let Some(state) = self.vertex_arrays.borrow_mut().get_mut(&vao) {
                        state.element_buffer = buffer;
                    }
                }
            }
        }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: u32) {
        let bound = match target {
            BufferTarget::Array => self.bound_array.get(),
            BufferTarget::ElementArray => self.bound_element.get(),
        };
        let id = bound.expect("buffer_data with nothing bound");
        self.buffers.borrow_mut().insert(id, data.to_vec());
        self.usages.borrow_mut().insert(id, usage);
    }

    fn enable_float_attrib(&self, slot: u32, components: i32) {
        let vao = self
            .bound_vao
            .get()
            .expect("attribute setup with no vertex array bound");
        let buffer = self
            .bound_array
            .get()
            .expect("attribute setup with no array buffer bound");
        self.vertex_arrays
            .borrow_mut()
            .get_mut(&vao)
            .expect("vertex array is alive")
            .attribs
            .insert(slot, (buffer, components));
    }

    fn draw_elements(&self, mode: DrawMode, count: i32) {
        let vertex_array = self.bound_vao.get();
        let element_buffer = vertex_array.and_then(|vao| self.element_buffer(vao));
        self.draws.borrow_mut().push(Draw {
            mode,
            count,
            vertex_array,
            program: self.current_program.get(),
            element_buffer,
        });
    }

    fn compile_shader(&self, _stage: ShaderStage, source: &str) -> Result<u32, String> {
        if source.contains("syntax error") {
            return Err("0:1: syntax error".to_string());
        }
        let id = self.next();
        self.shaders.borrow_mut().insert(id);
        Ok(id)
    }

    fn delete_shader(&self, shader: u32) {
        assert!(self.shaders.borrow_mut().remove(&shader));
    }

    fn link_program(&self, shaders: &[u32]) -> Result<u32, String> {
        if shaders.is_empty() {
            return Err("no shaders attached".to_string());
        }
        let id = self.next();
        self.programs.borrow_mut().insert(id);
        Ok(id)
    }

    fn delete_program(&self, program: u32) {
        assert!(self.programs.borrow_mut().remove(&program));
        if self.current_program.get() == Some(program) {
            self.current_program.set(None);
        }
    }

    fn use_program(&self, program: Option<u32>) {
        self.current_program.set(program);
    }

    fn uniform_f32(&self, _program: u32, name: &str, value: f32) {
        self.uniforms
            .borrow_mut()
            .insert(name.to_string(), vec![value]);
    }

    fn uniform_vec4(&self, _program: u32, name: &str, value: [f32; 4]) {
        self.uniforms
            .borrow_mut()
            .insert(name.to_string(), value.to_vec());
    }

    fn uniform_mat4(&self, _program: u32, name: &str, value: &[f32; 16]) {
        self.uniforms
            .borrow_mut()
            .insert(name.to_string(), value.to_vec());
    }
}
