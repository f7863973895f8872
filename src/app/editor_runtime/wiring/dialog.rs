use std::path::{Path, PathBuf};

use gtk4::prelude::*;
use gtk4::{gio, glib, FileDialog, FileFilter};

use super::super::EditorSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilePurpose {
    OpenLayout,
    SaveLayout,
    ExportHtml,
    InsertImage,
}

impl FilePurpose {
    fn title(self) -> &'static str {
        match self {
            Self::OpenLayout => "Open Layout",
            Self::SaveLayout => "Save Layout",
            Self::ExportHtml => "Export HTML",
            Self::InsertImage => "Insert Image",
        }
    }

    fn accept_label(self) -> &'static str {
        match self {
            Self::OpenLayout => "_Open",
            Self::SaveLayout => "_Save",
            Self::ExportHtml => "_Export",
            Self::InsertImage => "_Insert",
        }
    }

    fn is_save(self) -> bool {
        matches!(self, Self::SaveLayout | Self::ExportHtml)
    }

    /// Extension appended to a save target picked without one.
    fn extension(self) -> Option<&'static str> {
        match self {
            Self::OpenLayout | Self::SaveLayout => Some("json"),
            Self::ExportHtml => Some("html"),
            Self::InsertImage => None,
        }
    }

    fn initial_name(self) -> Option<&'static str> {
        match self {
            Self::SaveLayout => Some("layout.json"),
            Self::ExportHtml => Some("layout.html"),
            Self::OpenLayout | Self::InsertImage => None,
        }
    }

    fn filter(self) -> FileFilter {
        let filter = FileFilter::new();
        match self {
            Self::OpenLayout | Self::SaveLayout => {
                filter.set_name(Some("JSON layout"));
                filter.add_suffix("json");
            }
            Self::ExportHtml => {
                filter.set_name(Some("HTML page"));
                filter.add_suffix("html");
                filter.add_suffix("htm");
            }
            Self::InsertImage => {
                filter.set_name(Some("Images"));
                filter.add_pixbuf_formats();
            }
        }
        filter
    }
}

fn with_default_extension(path: PathBuf, purpose: FilePurpose) -> PathBuf {
    match purpose.extension() {
        Some(extension) if purpose.is_save() && path.extension().is_none() => {
            path.with_extension(extension)
        }
        _ => path,
    }
}

fn run_file_dialog(session: &EditorSession, purpose: FilePurpose) {
    let dialog = FileDialog::new();
    dialog.set_title(purpose.title());
    dialog.set_modal(true);
    dialog.set_accept_label(Some(purpose.accept_label()));

    let filter = purpose.filter();
    let all_files = FileFilter::new();
    all_files.set_name(Some("All files"));
    all_files.add_pattern("*");
    let filters = gio::ListStore::new::<FileFilter>();
    filters.append(&filter);
    filters.append(&all_files);
    dialog.set_filters(Some(&filters));
    dialog.set_default_filter(Some(&filter));

    if let Some(dir) = session.layout_dir.borrow().as_deref() {
        dialog.set_initial_folder(Some(&gio::File::for_path(dir)));
    }
    if let Some(name) = purpose.initial_name() {
        dialog.set_initial_name(Some(name));
    }

    session.dialog_open.set(true);
    let callback_session = session.clone();
    let on_result = move |result: Result<gio::File, glib::Error>| {
        callback_session.dialog_open.set(false);
        let path = match result {
            Ok(file) => file.path(),
            Err(err) => {
                tracing::debug!(%err, ?purpose, "file dialog dismissed");
                None
            }
        };
        let Some(path) = path else {
            return;
        };
        let path = with_default_extension(path, purpose);
        dispatch_file_choice(&callback_session, purpose, &path);
    };

    if purpose.is_save() {
        dialog.save(Some(&session.window), gio::Cancellable::NONE, on_result);
    } else {
        dialog.open(Some(&session.window), gio::Cancellable::NONE, on_result);
    }
}

fn dispatch_file_choice(session: &EditorSession, purpose: FilePurpose, path: &Path) {
    tracing::info!(?purpose, path = %path.display(), "file chosen");
    match purpose {
        FilePurpose::OpenLayout => session.open_layout(path),
        FilePurpose::SaveLayout => session.save_layout(path),
        FilePurpose::ExportHtml => session.export_html(path),
        FilePurpose::InsertImage => session.insert_image(path),
    }
}

pub(in crate::app::editor_runtime) fn open_layout_dialog(session: &EditorSession) {
    run_file_dialog(session, FilePurpose::OpenLayout);
}

pub(in crate::app::editor_runtime) fn save_layout_dialog(session: &EditorSession) {
    run_file_dialog(session, FilePurpose::SaveLayout);
}

pub(in crate::app::editor_runtime) fn export_html_dialog(session: &EditorSession) {
    run_file_dialog(session, FilePurpose::ExportHtml);
}

pub(in crate::app::editor_runtime) fn insert_image_dialog(session: &EditorSession) {
    run_file_dialog(session, FilePurpose::InsertImage);
}
