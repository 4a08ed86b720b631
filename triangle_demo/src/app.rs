/// Demo application - winit event loop driving TriangleRenderer

use std::path::PathBuf;
use triangle_engine::triangle::TriangleRenderer;
use triangle_engine::triangle::render::{PipelineConfig, RendererConfig};
use triangle_engine::{engine_error, engine_info, engine_warn};
use triangle_engine_renderer_d3d12::triangle::D3d12GraphicsDevice;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

const WINDOW_TITLE: &str = "DX12 Triangle";

/// Exit code when the window is closed normally
const EXIT_OK: i32 = 0;
/// Exit code for initialization or frame errors
const EXIT_FAILURE: i32 = 1;

/// Run the demo to completion and return the process exit code
pub fn run() -> i32 {
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            engine_error!("triangle::demo", "Failed to create event loop: {}", e);
            return EXIT_FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DemoApp::new(demo_config());
    if let Err(e) = event_loop.run_app(&mut app) {
        engine_error!("triangle::demo", "Event loop failed: {}", e);
        return EXIT_FAILURE;
    }

    app.exit_code.unwrap_or(EXIT_OK)
}

fn demo_config() -> RendererConfig {
    RendererConfig {
        app_name: WINDOW_TITLE.to_string(),
        pipeline: Some(PipelineConfig::basic_hlsl(shader_dir())),
        ..Default::default()
    }
}

/// First `shaders/` directory holding `basic.hlsl`: working directory,
/// then next to the executable, then the crate sources
fn shader_dir() -> PathBuf {
    let mut candidates = vec![PathBuf::from("shaders")];
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|exe| exe.parent().map(|dir| dir.join("shaders"))) {
        candidates.push(exe_dir);
    }
    candidates.push(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("shaders"));

    match candidates.iter().find(|dir| dir.join("basic.hlsl").is_file()) {
        Some(dir) => dir.clone(),
        None => {
            engine_warn!("triangle::demo", "basic.hlsl not found, falling back to ./shaders");
            PathBuf::from("shaders")
        }
    }
}

struct DemoApp {
    // Dropped before the window it presents to
    renderer: TriangleRenderer,
    window: Option<Window>,
    exit_code: Option<i32>,
}

impl DemoApp {
    fn new(config: RendererConfig) -> Self {
        Self {
            renderer: TriangleRenderer::new(config),
            window: None,
            exit_code: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(e) = self.renderer.cleanup() {
            engine_warn!("triangle::demo", "Cleanup after failure: {}", e);
        }
        self.exit_code = Some(EXIT_FAILURE);
        event_loop.exit();
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> triangle_engine::triangle::Result<()> {
        let config = self.renderer.config();
        let attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(config.width, config.height));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => window,
            Err(e) => triangle_engine::engine_bail!("triangle::demo", InitializationFailed,
                "Failed to create window: {}", e),
        };

        let device = D3d12GraphicsDevice::new(config.validation)?;
        self.renderer.initialize(Box::new(device), &window)?;

        // The surface may not match the requested size (DPI scaling)
        let size = window.inner_size();
        self.renderer.resize(size.width, size.height)?;

        self.window = Some(window);
        Ok(())
    }
}

impl ApplicationHandler for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match self.initialize(event_loop) {
            Ok(()) => engine_info!("triangle::demo", "{} running", WINDOW_TITLE),
            Err(e) => {
                engine_error!("triangle::demo", "Initialization failed: {}", e);
                self.fail(event_loop);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                if let Err(e) = self.renderer.cleanup() {
                    engine_error!("triangle::demo", "Cleanup failed: {}", e);
                    self.exit_code = Some(EXIT_FAILURE);
                }
                engine_info!("triangle::demo", "Closed after {} frames", self.renderer.frames_rendered());
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Err(e) = self.renderer.resize(size.width, size.height) {
                    engine_error!("triangle::demo", "Resize to {}x{} failed: {}", size.width, size.height, e);
                    self.fail(event_loop);
                }
            }
            _ => {}
        }
    }

    /// No events pending: render one frame
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_code.is_some() || !self.renderer.is_initialized() {
            return;
        }

        if let Err(e) = self.renderer.render_frame() {
            engine_error!("triangle::demo", "Frame failed: {}", e);
            self.fail(event_loop);
        }
    }
}
