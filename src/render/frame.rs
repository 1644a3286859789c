use gl::types::*;
use log::error;

/// Viewport rectangle in framebuffer pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    /// Covers the whole framebuffer. `None` while either side is zero,
    /// which is what a minimized window reports.
    pub fn for_framebuffer(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        Some(Self {
            x: 0,
            y: 0,
            width: i32::try_from(width).ok()?,
            height: i32::try_from(height).ok()?,
        })
    }

    pub fn apply(&self) {
        unsafe {
            gl::Viewport(self.x, self.y, self.width, self.height);
        }
    }
}

pub fn clear(color: [f32; 4]) {
    unsafe {
        gl::ClearColor(color[0], color[1], color[2], color[3]);
        gl::Clear(gl::COLOR_BUFFER_BIT);
    }
}

/// Drains the GL error queue, logging every entry. Returns whether anything was queued.
pub fn check_gl_error(context: &str) -> bool {
    let mut found = false;
    loop {
        let code = unsafe { gl::GetError() };
        if code == gl::NO_ERROR {
            break;
        }
        error!("GL error after {}: {} (0x{:04X})", context, gl_error_name(code), code);
        found = true;
    }
    found
}

pub fn gl_error_name(code: GLenum) -> &'static str {
    match code {
        gl::INVALID_ENUM => "GL_INVALID_ENUM",
        gl::INVALID_VALUE => "GL_INVALID_VALUE",
        gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
        gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        _ => "unknown GL error",
    }
}
