use log::info;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Uninitialized,
    /// Window, context and GL function table are live.
    Ready,
    /// Shader and geometry uploaded, frames are being drawn.
    Running,
    Terminated,
}

/// Lifecycle stage plus the close flag the render loop polls.
#[derive(Debug)]
pub struct LoopState {
    state: AppState,
    close_requested: bool,
}

impl Default for LoopState {
    fn default() -> Self {
        Self {
            state: AppState::Uninitialized,
            close_requested: false,
        }
    }
}

impl LoopState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn mark_ready(&mut self) {
        self.transition(AppState::Ready);
    }

    pub fn mark_running(&mut self) {
        self.transition(AppState::Running);
    }

    pub fn mark_terminated(&mut self) {
        self.transition(AppState::Terminated);
    }

    fn transition(&mut self, next: AppState) {
        info!("App state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Escape is the only key with a binding. Returns whether close is now requested.
    pub fn handle_key(&mut self, key: KeyCode, state: ElementState) -> bool {
        if key == KeyCode::Escape && state == ElementState::Pressed {
            self.request_close();
        }
        self.close_requested
    }

    pub fn request_close(&mut self) {
        if !self.close_requested {
            info!("Close requested");
        }
        self.close_requested = true;
    }

    pub fn should_close(&self) -> bool {
        self.close_requested
    }
}
