pub mod state;

use anyhow::{anyhow, bail, Context, Result};
use gl::types::GLenum;
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{debug, error, info, warn};
use raw_window_handle::HasRawWindowHandle;
use std::{
    ffi::{CStr, CString},
    num::NonZeroU32,
    ptr,
};
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::{Event, KeyEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopWindowTarget},
    keyboard::PhysicalKey,
    window::{Window, WindowBuilder},
};

use crate::{
    config::{AppConfig, RenderConfig},
    render::{
        driver::{GlDriver, ShaderDriver},
        frame::{self, Viewport},
        mesh::{TriangleMesh, TRIANGLE_VERTICES},
        shaders::{triangle_shaders, ShaderProgram},
    },
};
pub use state::{AppState, LoopState};

pub struct App {
    // GL objects come first so they drop before the context they live in
    triangle: Option<TriangleMesh>,
    shader: Option<ShaderProgram>,
    loop_state: LoopState,
    config: AppConfig,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
}

impl App {
    /// Creates the window and a current GL context with its function table loaded.
    pub fn new(event_loop: &EventLoop<()>, config: AppConfig) -> Result<Self> {
        let mut loop_state = LoopState::new();
        let window_config = &config.window;

        let window_builder = WindowBuilder::new()
            .with_title(window_config.title.as_str())
            .with_inner_size(LogicalSize::new(window_config.width, window_config.height))
            .with_resizable(true);

        let template = ConfigTemplateBuilder::new();
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(event_loop, template, |configs| {
                configs
                    .max_by_key(|candidate| candidate.num_samples())
                    // glutin errors out before calling the picker with no configs
                    .expect("display offered no GL configs")
            })
            .map_err(|e| anyhow!("Failed to create window: {}", e))?;

        let window = window.context("Display builder returned no window")?;
        let raw_window_handle = window.raw_window_handle();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(
                window_config.gl_major,
                window_config.gl_minor,
            ))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .context("Failed to create OpenGL context")?;

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
            .context("Failed to create GL surface")?;

        let gl_context = gl_context
            .make_current(&gl_surface)
            .context("Failed to make context current")?;

        // Load OpenGL functions
        gl::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(&symbol) as *const _,
            Err(_) => ptr::null(),
        });

        if !(gl::CreateShader::is_loaded()
            && gl::GenVertexArrays::is_loaded()
            && gl::DrawArrays::is_loaded()
            && gl::Viewport::is_loaded())
        {
            bail!("Failed to load OpenGL function pointers");
        }

        info!(
            "OpenGL {} ({}, {})",
            gl_string(gl::VERSION),
            gl_string(gl::VENDOR),
            gl_string(gl::RENDERER)
        );

        let interval = if window_config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = gl_surface.set_swap_interval(&gl_context, interval) {
            warn!("Failed to set swap interval: {}", e);
        }

        loop_state.mark_ready();

        Ok(Self {
            triangle: None,
            shader: None,
            loop_state,
            config,
            gl_surface,
            gl_context,
            window,
        })
    }

    /// Builds the shader program, uploads the triangle and sets the first viewport.
    pub fn start(&mut self) -> Result<()> {
        let shader = build_shader_program(&self.config.rendering)?;
        let triangle = TriangleMesh::new(&TRIANGLE_VERTICES);

        let size = self.window.inner_size();
        if let Some(viewport) = Viewport::for_framebuffer(size.width, size.height) {
            viewport.apply();
        }

        frame::check_gl_error("setup");

        self.shader = Some(shader);
        self.triangle = Some(triangle);
        self.loop_state.mark_running();
        Ok(())
    }

    pub fn state(&self) -> AppState {
        self.loop_state.state()
    }

    pub fn handle_event(&mut self, event: Event<()>, elwt: &EventLoopWindowTarget<()>) {
        match event {
            Event::WindowEvent { event, .. } => self.handle_window_event(event),
            Event::AboutToWait => {
                if self.loop_state.should_close() {
                    elwt.exit();
                } else {
                    self.window.request_redraw();
                }
            }
            Event::LoopExiting => self.shutdown(),
            _ => (),
        }
    }

    fn handle_window_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.loop_state.request_close(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            } => {
                self.loop_state.handle_key(key, state);
            }
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::RedrawRequested => self.render(),
            _ => (),
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let (Some(width), Some(height), Some(viewport)) = (
            NonZeroU32::new(size.width),
            NonZeroU32::new(size.height),
            Viewport::for_framebuffer(size.width, size.height),
        ) else {
            debug!("Ignoring resize to {}x{}", size.width, size.height);
            return;
        };

        self.gl_surface.resize(&self.gl_context, width, height);
        viewport.apply();
        self.window.request_redraw();
    }

    fn render(&mut self) {
        let (Some(shader), Some(triangle)) = (&self.shader, &self.triangle) else {
            return;
        };

        frame::clear(self.config.rendering.clear_color);
        shader.set_used();
        triangle.draw();

        if self.config.rendering.debug_gl_errors {
            frame::check_gl_error("draw");
        }

        if let Err(e) = self.gl_surface.swap_buffers(&self.gl_context) {
            error!("Failed to swap buffers: {}", e);
        }
    }

    /// Releases the vertex array, vertex buffer and program while the context is still current.
    fn shutdown(&mut self) {
        if self.loop_state.state() == AppState::Terminated {
            return;
        }

        drop(self.triangle.take());
        drop(self.shader.take());
        info!("Released GPU resources");
        self.loop_state.mark_terminated();
    }
}

/// Prefers the configured shader files, falling back to the built-in pair
/// when they are missing or do not build. A broken built-in pair is fatal.
pub fn build_shader_program(rendering: &RenderConfig) -> Result<ShaderProgram> {
    build_shader_program_with(GlDriver, rendering)
}

pub fn build_shader_program_with<D: ShaderDriver + Clone>(
    driver: D,
    rendering: &RenderConfig,
) -> Result<ShaderProgram<D>> {
    if let Some((vertex_path, fragment_path)) = rendering.shader_paths() {
        match ShaderProgram::build_from_files(driver.clone(), vertex_path, fragment_path) {
            Ok(program) => {
                info!(
                    "Using shaders {} and {}",
                    vertex_path.display(),
                    fragment_path.display()
                );
                return Ok(program);
            }
            Err(e) => warn!("{}; falling back to built-in shaders", e),
        }
    }

    ShaderProgram::build(
        driver,
        triangle_shaders::VERTEX_SRC,
        triangle_shaders::FRAGMENT_SRC,
    )
    .context("Built-in triangle shader failed to build")
}

fn gl_string(name: GLenum) -> String {
    unsafe {
        let ptr = gl::GetString(name);
        if ptr.is_null() {
            return "unknown".to_string();
        }
        CStr::from_ptr(ptr as *const _).to_string_lossy().into_owned()
    }
}

/// Runs the demo until the window is closed or escape is pressed.
pub fn run(config: AppConfig) -> Result<()> {
    let event_loop = EventLoopBuilder::new()
        .build()
        .context("Failed to create event loop")?;

    let mut app = App::new(&event_loop, config)?;
    app.start()?;

    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run(move |event, elwt| app.handle_event(event, elwt))?;

    Ok(())
}
