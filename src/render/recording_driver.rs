// Stand-in driver for tests: hands out ids and records every call.

use gl::types::*;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::ffi::CStr;
use std::rc::Rc;

use super::driver::ShaderDriver;
use super::shaders::Stage;

/// Sources containing this directive fail to compile, as they would on a real driver.
pub const COMPILE_FAILURE_MARKER: &str = "#error";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CompileShader(Stage, GLuint),
    DeleteShader(GLuint),
    LinkProgram(GLuint),
    DeleteProgram(GLuint),
    UseProgram(GLuint),
    UniformLocation(String),
    Uniform1i(GLint, i32),
    Uniform1f(GLint, f32),
    Uniform4f(GLint, [f32; 4]),
}

#[derive(Default)]
struct Inner {
    calls: RefCell<Vec<Call>>,
    last_id: Cell<GLuint>,
    failed_shaders: RefCell<HashSet<GLuint>>,
    fail_link: Cell<bool>,
    active_uniforms: RefCell<Vec<String>>,
    sources: RefCell<Vec<String>>,
}

/// Clones share one call log, so a test keeps a handle while the program owns another.
#[derive(Clone, Default)]
pub struct RecordingDriver {
    inner: Rc<Inner>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_link() -> Self {
        let driver = Self::new();
        driver.inner.fail_link.set(true);
        driver
    }

    pub fn with_uniforms(names: &[&str]) -> Self {
        let driver = Self::new();
        *driver.inner.active_uniforms.borrow_mut() =
            names.iter().map(|name| name.to_string()).collect();
        driver
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.calls.borrow().clone()
    }

    /// Every source handed to `compile_shader`, in order.
    pub fn sources(&self) -> Vec<String> {
        self.inner.sources.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.inner.calls.borrow_mut().clear();
    }

    fn record(&self, call: Call) {
        self.inner.calls.borrow_mut().push(call);
    }

    fn next_id(&self) -> GLuint {
        let id = self.inner.last_id.get() + 1;
        self.inner.last_id.set(id);
        id
    }
}

impl ShaderDriver for RecordingDriver {
    fn compile_shader(&self, stage: Stage, source: &CStr) -> GLuint {
        let shader = self.next_id();
        let source = source.to_string_lossy().into_owned();
        if source.contains(COMPILE_FAILURE_MARKER) {
            self.inner.failed_shaders.borrow_mut().insert(shader);
        }
        self.inner.sources.borrow_mut().push(source);
        self.record(Call::CompileShader(stage, shader));
        shader
    }

    fn compile_status(&self, shader: GLuint) -> bool {
        !self.inner.failed_shaders.borrow().contains(&shader)
    }

    fn shader_info_log(&self, _shader: GLuint) -> String {
        "0:1(1): error: #error directive".to_string()
    }

    fn delete_shader(&self, shader: GLuint) {
        self.record(Call::DeleteShader(shader));
    }

    fn link_program(&self, _vertex: GLuint, _fragment: GLuint) -> GLuint {
        let program = self.next_id();
        self.record(Call::LinkProgram(program));
        program
    }

    fn link_status(&self, _program: GLuint) -> bool {
        !self.inner.fail_link.get()
    }

    fn program_info_log(&self, _program: GLuint) -> String {
        "error: vertex output 'ourColor' not read by fragment stage".to_string()
    }

    fn delete_program(&self, program: GLuint) {
        self.record(Call::DeleteProgram(program));
    }

    fn use_program(&self, program: GLuint) {
        self.record(Call::UseProgram(program));
    }

    fn uniform_location(&self, _program: GLuint, name: &CStr) -> GLint {
        let name = name.to_string_lossy().into_owned();
        let location = self
            .inner
            .active_uniforms
            .borrow()
            .iter()
            .position(|active| *active == name)
            .map_or(-1, |index| index as GLint);
        self.record(Call::UniformLocation(name));
        location
    }

    fn uniform_1i(&self, location: GLint, value: i32) {
        self.record(Call::Uniform1i(location, value));
    }

    fn uniform_1f(&self, location: GLint, value: f32) {
        self.record(Call::Uniform1f(location, value));
    }

    fn uniform_4f(&self, location: GLint, value: [f32; 4]) {
        self.record(Call::Uniform4f(location, value));
    }
}
