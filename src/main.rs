mod app;
mod board;
mod config;
mod gpu;
mod render;

use anyhow::Context;
use winit::event_loop::{ControlFlow, EventLoop};

use crate::app::App;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    // Frames are driven by redraw requests, so the loop can sleep otherwise
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new();
    event_loop.run_app(&mut app).context("Event loop error")?;

    Ok(())
}
