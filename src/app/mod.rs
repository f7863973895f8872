mod bootstrap;
mod editor_history;
mod editor_runtime;
mod input_bridge;
mod runtime_css;
mod runtime_support;

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::Application;

use crate::error::{AppError, AppResult};
use crate::ui::LAYOUT_TOKENS;

use self::bootstrap::bootstrap_app_runtime;
use self::editor_runtime::build_editor_window;
use self::runtime_css::install_runtime_css;

const APPLICATION_ID: &str = "io.github.layoutdesk";

/// Only argv[0] goes to GTK; the layout path is handled before GTK starts.
fn gtk_launch_args() -> Vec<String> {
    vec![std::env::args()
        .next()
        .unwrap_or_else(|| String::from("layoutdesk"))]
}

pub struct App {
    initial_layout: Option<PathBuf>,
}

impl App {
    pub fn new(initial_layout: Option<PathBuf>) -> Self {
        Self { initial_layout }
    }

    pub fn start(&self) -> AppResult<()> {
        let bootstrap = Rc::new(bootstrap_app_runtime());
        let initial_layout = self.initial_layout.clone();

        tracing::info!("starting gtk runtime");
        let application = Application::new(
            Some(APPLICATION_ID),
            gtk4::gio::ApplicationFlags::NON_UNIQUE,
        );

        let activate_once = Rc::new(Cell::new(false));
        application.connect_activate(move |app| {
            if activate_once.replace(true) {
                tracing::debug!("ignoring duplicate gtk activate signal");
                return;
            }
            install_runtime_css(LAYOUT_TOKENS);
            let session = build_editor_window(app, &bootstrap, LAYOUT_TOKENS);
            session.present();
            if let Some(path) = initial_layout.as_deref() {
                tracing::info!(path = %path.display(), "opening layout from command line");
                session.open_layout(path);
            }
        });

        let exit_code = application.run_with_args(&gtk_launch_args());
        if exit_code != gtk4::glib::ExitCode::SUCCESS {
            return Err(AppError::Gtk(i32::from(exit_code)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gtk_receives_only_the_program_name() {
        assert_eq!(gtk_launch_args().len(), 1);
    }
}
