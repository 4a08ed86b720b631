//! DX12 Triangle - windowed demo for triangle_engine
//!
//! Opens a 1280x720 window and renders the triangle until the window is closed.

#[cfg(windows)]
mod app;

#[cfg(windows)]
fn main() {
    std::process::exit(app::run());
}

#[cfg(not(windows))]
fn main() {
    triangle_engine::engine_error!("triangle::demo", "The Direct3D 12 demo only runs on Windows");
    std::process::exit(1);
}
