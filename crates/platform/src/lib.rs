//! Platform layer: window, event loop and input for the viewer.

use anyhow::Result;
use winit::event_loop::{ControlFlow, EventLoop};

pub mod controller;
pub mod input;
pub mod stage;
pub mod viewer;

pub use stage::{Stage, ViewerOptions};
pub use viewer::Viewer;

/// Opens the viewer window and runs until it is closed.
///
/// Returns the error that aborted initialisation, if any.
pub fn run(options: ViewerOptions) -> Result<()> {
    log::info!(
        "Stage: {}, backends: {:?}, window: {}x{}",
        options.stage,
        options.backends,
        options.width,
        options.height
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut viewer = Viewer::new(options);
    event_loop
        .run_app(&mut viewer)
        .map_err(|e| anyhow::anyhow!("Event loop error: {e:?}"))?;

    match viewer.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
