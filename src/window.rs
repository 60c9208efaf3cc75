use crate::{
    config::WindowConfig,
    error::{DemoError, Result},
    gl_wrappers,
    input::Key,
};
use glfw::{
    fail_on_errors, Action, Context as _, GlfwReceiver, OpenGlProfileHint, PWindow, SwapInterval,
    WindowEvent, WindowHint, WindowMode,
};
use std::ffi::CStr;

const CONTEXT_VERSION: WindowHint = WindowHint::ContextVersion(4, 0);
const OPENGL_PROFILE: WindowHint = WindowHint::OpenGlProfile(OpenGlProfileHint::Core);
const FORWARD_COMPAT: WindowHint = WindowHint::OpenGlForwardCompat(true);
const RESIZABLE: WindowHint = WindowHint::Resizable(false);
const MODE: WindowMode<'_> = WindowMode::Windowed;

pub struct Window {
    window: PWindow,
    receiver: GlfwReceiver<(f64, WindowEvent)>,
}

impl Window {
    /// Creates the window, makes its context current and loads OpenGL.
    pub fn new(config: &WindowConfig) -> Result<Self> {
        let mut glfw = glfw::init(fail_on_errors!())?;
        glfw.window_hint(CONTEXT_VERSION);
        glfw.window_hint(OPENGL_PROFILE);
        glfw.window_hint(FORWARD_COMPAT);
        glfw.window_hint(RESIZABLE);

        let (mut window, receiver) = glfw
            .create_window(config.width, config.height, &config.title, MODE)
            .ok_or(DemoError::WindowCreation {
                width: config.width,
                height: config.height,
            })?;
        window.make_current();
        window.set_framebuffer_size_polling(true);
        glfw.set_swap_interval(if config.vsync {
            SwapInterval::Sync(1)
        } else {
            SwapInterval::None
        });

        load_gl();
        log::info!("OpenGL {}", gl_version());

        let framebuffer_size = window.get_framebuffer_size();
        gl_wrappers::viewport(framebuffer_size.0, framebuffer_size.1);
        unsafe { gl::Enable(gl::DEPTH_TEST) };

        Ok(Self { window, receiver })
    }

    pub fn is_open(&self) -> bool {
        !self.window.should_close()
    }

    pub fn set_should_close(&mut self, value: bool) {
        self.window.set_should_close(value);
    }

    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.window.get_key(key.into()) == Action::Press
    }

    /// Polls GLFW and keeps the viewport in sync with the framebuffer.
    pub fn poll_events(&mut self) {
        self.window.glfw.poll_events();
        for (_, event) in glfw::flush_messages(&self.receiver) {
            if let WindowEvent::FramebufferSize(w, h) = event {
                if w == 0 || h == 0 {
                    continue;
                }
                log::debug!("Framebuffer resized to {}x{}", w, h);
                gl_wrappers::viewport(w, h);
            }
        }
    }

    pub fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    /// Seconds since GLFW was initialized.
    pub fn time(&self) -> f64 {
        self.window.glfw.get_time()
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        gl_loader::end_gl();
    }
}

fn load_gl() {
    gl_loader::init_gl();
    gl::load_with(|symbol| gl_loader::get_proc_address(symbol) as *const _);
}

fn gl_version() -> String {
    let version = unsafe { gl::GetString(gl::VERSION) };
    if version.is_null() {
        return "unknown".to_string();
    }
    unsafe { CStr::from_ptr(version.cast()) }
        .to_string_lossy()
        .into_owned()
}
