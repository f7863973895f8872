pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod notification;
pub mod scene;
pub mod state;
pub mod storage;
pub mod ui;
pub use error::{AppError, AppResult};

use std::path::PathBuf;

/// Entrypoint used by the binary. `initial_layout` is opened once the window is up.
pub fn run(initial_layout: Option<PathBuf>) -> AppResult<()> {
    logging::init();
    tracing::info!("starting layoutdesk");

    let app = app::App::new(initial_layout);
    app.start()?;

    tracing::info!("shutdown complete");
    Ok(())
}
