// driver.rs - the GL calls a shader program makes, behind one trait

use gl::types::*;
use std::ffi::CStr;
use std::ptr;

use super::shaders::Stage;

/// Size of the buffer driver info logs are read into. One byte goes to the
/// terminating NUL, so at most 511 characters of a log survive.
pub const INFO_LOG_CAPACITY: usize = 512;

/// Shader and program object calls. `GlDriver` forwards to the loaded GL
/// function table; the build and uniform logic only ever talks to this.
pub trait ShaderDriver {
    /// Creates a stage object, uploads `source` and compiles it.
    fn compile_shader(&self, stage: Stage, source: &CStr) -> GLuint;
    fn compile_status(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    /// Creates a program, attaches both stages and links it.
    fn link_program(&self, vertex: GLuint, fragment: GLuint) -> GLuint;
    fn link_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn delete_program(&self, program: GLuint);

    fn use_program(&self, program: GLuint);
    /// -1 when `name` is not an active uniform.
    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint;
    fn uniform_1i(&self, location: GLint, value: i32);
    fn uniform_1f(&self, location: GLint, value: f32);
    fn uniform_4f(&self, location: GLint, value: [f32; 4]);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GlDriver;

impl ShaderDriver for GlDriver {
    fn compile_shader(&self, stage: Stage, source: &CStr) -> GLuint {
        unsafe {
            let shader = gl::CreateShader(stage.gl_enum());
            gl::ShaderSource(shader, 1, &source.as_ptr(), ptr::null());
            gl::CompileShader(shader);
            shader
        }
    }

    fn compile_status(&self, shader: GLuint) -> bool {
        let mut success = 1;
        unsafe {
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        }
        success != 0
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        read_info_log(|capacity, written, buffer| unsafe {
            gl::GetShaderInfoLog(shader, capacity, written, buffer)
        })
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) };
    }

    fn link_program(&self, vertex: GLuint, fragment: GLuint) -> GLuint {
        unsafe {
            let program = gl::CreateProgram();
            gl::AttachShader(program, vertex);
            gl::AttachShader(program, fragment);
            gl::LinkProgram(program);
            program
        }
    }

    fn link_status(&self, program: GLuint) -> bool {
        let mut success = 1;
        unsafe {
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
        }
        success != 0
    }

    fn program_info_log(&self, program: GLuint) -> String {
        read_info_log(|capacity, written, buffer| unsafe {
            gl::GetProgramInfoLog(program, capacity, written, buffer)
        })
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) };
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) };
    }

    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint {
        unsafe { gl::GetUniformLocation(program, name.as_ptr()) }
    }

    fn uniform_1i(&self, location: GLint, value: i32) {
        unsafe { gl::Uniform1i(location, value) };
    }

    fn uniform_1f(&self, location: GLint, value: f32) {
        unsafe { gl::Uniform1f(location, value) };
    }

    fn uniform_4f(&self, location: GLint, value: [f32; 4]) {
        unsafe { gl::Uniform4f(location, value[0], value[1], value[2], value[3]) };
    }
}

fn read_info_log(fetch: impl FnOnce(GLsizei, *mut GLsizei, *mut GLchar)) -> String {
    let mut buffer = vec![0u8; INFO_LOG_CAPACITY];
    let mut written: GLsizei = 0;
    fetch(
        INFO_LOG_CAPACITY as GLsizei,
        &mut written,
        buffer.as_mut_ptr() as *mut GLchar,
    );
    info_log_to_string(&buffer, written)
}

fn info_log_to_string(buffer: &[u8], written: GLsizei) -> String {
    let len = (written.max(0) as usize).min(buffer.len().saturating_sub(1));
    String::from_utf8_lossy(&buffer[..len]).trim_end().to_string()
}
