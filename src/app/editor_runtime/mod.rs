use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use gtk4::pango::prelude::FontFamilyExt;
use gtk4::prelude::*;
use gtk4::{
    Align, Application, ApplicationWindow, Box as GtkBox, DrawingArea, Label, Orientation,
    ScrolledWindow,
};

use crate::error::{AppError, AppResult};
use crate::export::generate_html;
use crate::scene::{
    HistoryStep, Point, Rect, Scene, SceneHistory, SceneItem, Size, SnapGuides,
    DEFAULT_TEXT_PLACEHOLDER,
};
use crate::state::{InteractionEvent, StateMachine};
use crate::storage;
use crate::ui::{StyleTokens, CANVAS_PALETTE};

use super::bootstrap::{font_family_choices, AppBootstrap};
use super::editor_history::EditorHistoryRuntime;
use super::runtime_support::ToastRuntime;

mod canvas;
mod toolbar;
mod window;
mod wiring;

use self::canvas::{configure_canvas_draw, CanvasDrawDeps, ImageCache};

const WINDOW_TITLE: &str = "Layout Desk";
const EXPORT_SUCCESS_MESSAGE: &str = "HTML exported successfully.";

type SelectionRefresh = Rc<dyn Fn()>;
type SelectionRefreshSlot = Rc<RefCell<Option<SelectionRefresh>>>;

/// Editor commands reachable from menus, shortcuts and the context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum EditorCommand {
    OpenLayout,
    SaveLayout,
    ExportHtml,
    InsertImage,
    InsertText,
    Undo,
    Redo,
    Group,
    Ungroup,
    DeleteSelection,
    SelectAll,
    ClearSelection,
    Quit,
}

/// What the primary button is doing between press and release.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum PointerGesture {
    #[default]
    Idle,
    Drag {
        id: u64,
        origin: Point,
    },
    Resize {
        id: u64,
        original: Size,
    },
    RubberBand {
        anchor: Point,
        extend: bool,
    },
}

/// Everything the signal handlers of one editor window share.
#[derive(Clone)]
pub(super) struct EditorSession {
    window: ApplicationWindow,
    canvas: DrawingArea,
    scene: Rc<RefCell<Scene>>,
    history: EditorHistoryRuntime,
    machine: Rc<RefCell<StateMachine>>,
    pointer: Rc<Cell<PointerGesture>>,
    press_snapshot: Rc<RefCell<Option<Vec<SceneItem>>>>,
    text_edit_snapshot: Rc<RefCell<Option<Vec<SceneItem>>>>,
    guides: Rc<Cell<SnapGuides>>,
    rubber_band: Rc<Cell<Option<Rect>>>,
    hovered_text: Rc<Cell<Option<u64>>>,
    layout_dir: Rc<RefCell<Option<PathBuf>>>,
    image_cache: ImageCache,
    dialog_open: Rc<Cell<bool>>,
    toast: ToastRuntime,
    selection_refresh: SelectionRefreshSlot,
}

impl EditorSession {
    pub(super) fn present(&self) {
        self.window.present();
        self.canvas.grab_focus();
    }

    fn show_status(&self, message: impl Into<String>) {
        self.toast.show(message);
    }

    fn report_failure(&self, action: &str, err: &AppError) {
        tracing::warn!(%err, action, "editor operation failed");
        self.show_status(format!("could not {action}: {err}"));
    }

    /// Redraws the canvas and resyncs the style toolbar with the selection.
    fn refresh(&self) {
        self.canvas.queue_draw();
        let refresh = self.selection_refresh.borrow().clone();
        if let Some(refresh) = refresh {
            refresh();
        }
    }

    fn transition(&self, event: InteractionEvent) {
        if let Err(err) = self.machine.borrow_mut().transition(event) {
            tracing::debug!(%err, "interaction event ignored");
        }
    }

    /// Runs a scene mutation with an undo snapshot taken beforehand. The snapshot is
    /// only kept when the item list actually changed.
    fn apply_change<R>(&self, change: impl FnOnce(&mut Scene) -> R) -> R {
        let snapshot = self.history.snapshot();
        let result = {
            let mut scene = self.scene.borrow_mut();
            change(&mut scene)
        };
        self.history.record_if_changed(snapshot);
        self.refresh();
        result
    }

    fn begin_text_edit(&self, id: u64) -> bool {
        if self.scene.borrow().editing_text_id() == Some(id) {
            return true;
        }
        self.finish_text_edit();
        let snapshot = self.history.snapshot();
        match self.enter_text_edit(id) {
            Ok(()) => {
                *self.text_edit_snapshot.borrow_mut() = Some(snapshot);
                self.show_status(format!("editing text box #{id}"));
                self.refresh();
                true
            }
            Err(err) => {
                tracing::debug!(%err, "text edit not started");
                false
            }
        }
    }

    /// Puts the scene and the interaction state into text editing together.
    fn enter_text_edit(&self, id: u64) -> AppResult<()> {
        self.scene.borrow_mut().begin_text_edit(id)?;
        let entered = self
            .machine
            .borrow_mut()
            .transition(InteractionEvent::BeginTextEdit);
        if let Err(err) = entered {
            self.scene.borrow_mut().end_text_edit();
            return Err(err.into());
        }
        Ok(())
    }

    /// Leaves text edit mode, if active, and records the whole editing session as one
    /// undo step.
    fn finish_text_edit(&self) {
        let ended = self.scene.borrow_mut().end_text_edit();
        if self.machine.borrow().state().captures_keyboard() {
            self.transition(InteractionEvent::EndTextEdit);
        }
        let snapshot = self.text_edit_snapshot.borrow_mut().take();
        if let Some(snapshot) = snapshot {
            self.history.record_if_changed(snapshot);
        }
        if let Some(id) = ended {
            tracing::debug!(id, "text edit finished");
            self.refresh();
        }
    }

    pub(super) fn run(&self, command: EditorCommand) {
        tracing::debug!(?command, "editor command");
        self.finish_text_edit();
        match command {
            EditorCommand::OpenLayout => wiring::open_layout_dialog(self),
            EditorCommand::SaveLayout => wiring::save_layout_dialog(self),
            EditorCommand::ExportHtml => wiring::export_html_dialog(self),
            EditorCommand::InsertImage => wiring::insert_image_dialog(self),
            EditorCommand::InsertText => {
                let id = self.apply_change(|scene| {
                    let id = scene.add_text(DEFAULT_TEXT_PLACEHOLDER);
                    scene.select_only(id);
                    id
                });
                self.show_status(format!("text box #{id} added"));
            }
            EditorCommand::Undo => self.apply_history(HistoryStep::Undo),
            EditorCommand::Redo => self.apply_history(HistoryStep::Redo),
            EditorCommand::Group => match self.group_selection() {
                Ok(id) => self.show_status(format!("group #{id} created")),
                Err(err) => self.show_status(err.to_string()),
            },
            EditorCommand::Ungroup => {
                let released = self.apply_change(Scene::ungroup_selected);
                if released.is_empty() {
                    self.show_status("no group selected");
                } else {
                    self.show_status(format!("{} items ungrouped", released.len()));
                }
            }
            EditorCommand::DeleteSelection => {
                let removed = self.apply_change(Scene::delete_selected);
                if removed > 0 {
                    self.show_status(format!("{removed} items deleted"));
                }
            }
            EditorCommand::SelectAll => {
                self.scene.borrow_mut().select_all();
                self.refresh();
            }
            EditorCommand::ClearSelection => {
                self.scene.borrow_mut().clear_selection();
                self.refresh();
            }
            EditorCommand::Quit => self.window.close(),
        }
    }

    fn group_selection(&self) -> AppResult<u64> {
        Ok(self.apply_change(Scene::group_selected)?)
    }

    /// Moves a top-level item, such as the first selected one from the X/Y spins.
    fn move_item_to(&self, id: u64, position: Point) -> AppResult<()> {
        Ok(self.apply_change(|scene| scene.set_item_position(id, position))?)
    }

    fn apply_history(&self, step: HistoryStep) {
        let message = self.history.apply(step);
        self.guides.set(SnapGuides::default());
        self.rubber_band.set(None);
        self.pointer.set(PointerGesture::Idle);
        self.show_status(message);
        self.refresh();
    }

    fn set_show_grid(&self, show_grid: bool) {
        self.scene.borrow_mut().set_show_grid(show_grid);
        self.canvas.queue_draw();
    }

    fn set_snap_to_grid(&self, snap_to_grid: bool) {
        self.scene.borrow_mut().set_snap_to_grid(snap_to_grid);
    }

    /// Replaces the scene with the layout at `path`. An unreadable or malformed file
    /// leaves the scene as it is.
    pub(super) fn open_layout(&self, path: &Path) {
        self.finish_text_edit();
        match self.load_layout_file(path) {
            Ok((count, 0)) => self.show_status(format!("loaded {count} items")),
            Ok((count, skipped)) => {
                self.show_status(format!("loaded {count} items, skipped {skipped}"));
            }
            Err(err) => self.report_failure("open layout", &err),
        }
    }

    /// Returns the number of loaded and skipped entries.
    fn load_layout_file(&self, path: &Path) -> AppResult<(usize, usize)> {
        let loaded = storage::load_layout(path)?;
        let count = loaded.items.len();
        *self.layout_dir.borrow_mut() = path.parent().map(Path::to_path_buf);
        self.image_cache.borrow_mut().clear();
        self.machine.borrow_mut().reset();
        self.apply_change(|scene| scene.adopt_items(loaded.items));
        Ok((count, loaded.skipped))
    }

    fn save_layout(&self, path: &Path) {
        let saved = storage::save_layout(&self.scene.borrow(), path).map_err(AppError::from);
        match saved {
            Ok(()) => self.show_status(format!("layout saved to {}", path.display())),
            Err(err) => self.report_failure("save layout", &err),
        }
    }

    fn export_html(&self, path: &Path) {
        match self.write_html_file(path) {
            Ok(()) => {
                crate::notification::send(EXPORT_SUCCESS_MESSAGE);
                self.show_status(EXPORT_SUCCESS_MESSAGE);
            }
            Err(err) => self.report_failure("export html", &err),
        }
    }

    fn write_html_file(&self, path: &Path) -> AppResult<()> {
        let html = generate_html(&self.scene.borrow());
        storage::write_html(path, &html)?;
        Ok(())
    }

    fn insert_image(&self, path: &Path) {
        let source = path.to_string_lossy().into_owned();
        let Some((_, natural_size)) = storage::resolve_image_source(&source, None) else {
            tracing::warn!(path = %path.display(), "image not inserted");
            self.show_status(format!("could not open image {}", path.display()));
            return;
        };
        let id = self.apply_change(|scene| {
            let id = scene.add_image(source, natural_size);
            scene.select_only(id);
            id
        });
        self.show_status(format!("image #{id} added"));
    }
}

fn available_font_families(widget: &impl IsA<gtk4::Widget>) -> Vec<String> {
    widget
        .pango_context()
        .list_families()
        .iter()
        .map(|family| family.name().to_string())
        .collect()
}

pub(super) fn build_editor_window(
    app: &Application,
    bootstrap: &AppBootstrap,
    tokens: StyleTokens,
) -> EditorSession {
    let scene = bootstrap.new_scene();
    let scene_rect = scene.rect();
    let scene = Rc::new(RefCell::new(scene));
    let machine = Rc::new(RefCell::new(StateMachine::new()));

    let window = ApplicationWindow::new(app);
    window.add_css_class("layoutdesk-root");
    window.set_title(Some(WINDOW_TITLE));
    window.set_default_size(tokens.window_initial_width, tokens.window_initial_height);
    window.set_size_request(tokens.window_min_width, tokens.window_min_height);

    let canvas = DrawingArea::new();
    canvas.add_css_class("layout-canvas");
    canvas.set_content_width(scene_rect.width.ceil() as i32);
    canvas.set_content_height(scene_rect.height.ceil() as i32);
    canvas.set_halign(Align::Start);
    canvas.set_valign(Align::Start);
    canvas.set_focusable(true);

    let scroller = ScrolledWindow::new();
    scroller.add_css_class("canvas-scroller");
    scroller.set_hexpand(true);
    scroller.set_vexpand(true);
    scroller.set_child(Some(&canvas));

    let status_label = Label::new(None);
    status_label.add_css_class("status-line");
    status_label.set_xalign(0.0);
    status_label.set_visible(false);

    let session = EditorSession {
        window: window.clone(),
        canvas: canvas.clone(),
        scene: scene.clone(),
        history: EditorHistoryRuntime {
            scene: scene.clone(),
            history: Rc::new(RefCell::new(SceneHistory::default())),
            machine: machine.clone(),
        },
        machine,
        pointer: Rc::new(Cell::new(PointerGesture::Idle)),
        press_snapshot: Rc::new(RefCell::new(None)),
        text_edit_snapshot: Rc::new(RefCell::new(None)),
        guides: Rc::new(Cell::new(SnapGuides::default())),
        rubber_band: Rc::new(Cell::new(None)),
        hovered_text: Rc::new(Cell::new(None)),
        layout_dir: Rc::new(RefCell::new(None)),
        image_cache: ImageCache::default(),
        dialog_open: Rc::new(Cell::new(false)),
        toast: ToastRuntime::new(&status_label, tokens.toast_duration_ms),
        selection_refresh: Rc::new(RefCell::new(None)),
    };

    let families = font_family_choices(
        available_font_families(&window),
        &bootstrap.config.default_font_family,
    );
    let style_toolbar = toolbar::build_style_toolbar(tokens, families);
    style_toolbar.connect_handlers(&session);
    {
        let style_toolbar = style_toolbar.clone();
        let scene = scene.clone();
        *session.selection_refresh.borrow_mut() = Some(Rc::new(move || {
            style_toolbar.sync_from_scene(&scene.borrow());
        }));
    }

    window::install_window_actions(&session);
    let menu_bar = window::build_menu_bar();

    configure_canvas_draw(
        &canvas,
        CanvasDrawDeps {
            scene,
            guides: session.guides.clone(),
            rubber_band: session.rubber_band.clone(),
            hovered_text: session.hovered_text.clone(),
            layout_dir: session.layout_dir.clone(),
            image_cache: session.image_cache.clone(),
            palette: CANVAS_PALETTE,
        },
    );
    wiring::connect_canvas_gestures(&session);
    wiring::connect_context_menu(&session);
    wiring::connect_key_handling(&session);

    let root = GtkBox::new(Orientation::Vertical, 0);
    root.append(&menu_bar);
    root.append(style_toolbar.root());
    root.append(&scroller);
    root.append(&status_label);
    window.set_child(Some(&root));

    session.refresh();
    tracing::info!(
        width = scene_rect.width,
        height = scene_rect.height,
        "editor window built"
    );
    session
}
