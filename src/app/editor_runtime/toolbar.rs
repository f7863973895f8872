use std::cell::Cell;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{
    Align, Box as GtkBox, Button, ColorDialog, ColorDialogButton, DropDown, Orientation,
    Separator, SpinButton, ToggleButton,
};

use crate::scene::{Color, Point, Scene, TEXT_FONT_SIZE_MAX, TEXT_FONT_SIZE_MIN};
use crate::ui::{icon_button, icon_toggle_button, labeled_spin_button, StyleTokens};

use super::{EditorCommand, EditorSession};

const POSITION_MIN: f64 = 0.0;
const POSITION_MAX: f64 = 5_000.0;
const DEFAULT_FONT_SIZE: f64 = 14.0;

const TOOLBAR_COMMANDS: [(EditorCommand, &str, &str); 6] = [
    (EditorCommand::OpenLayout, "document-open-symbolic", "Open layout (Ctrl+O)"),
    (EditorCommand::SaveLayout, "document-save-symbolic", "Save layout (Ctrl+S)"),
    (EditorCommand::InsertImage, "insert-image-symbolic", "Insert image (Ctrl+I)"),
    (EditorCommand::InsertText, "insert-text-symbolic", "Insert text (Ctrl+T)"),
    (EditorCommand::Undo, "edit-undo-symbolic", "Undo (Ctrl+Z)"),
    (EditorCommand::Redo, "edit-redo-symbolic", "Redo (Ctrl+Shift+Z)"),
];

/// Font, color and position controls for the first selected item.
#[derive(Clone)]
pub(super) struct StyleToolbar {
    root: GtkBox,
    command_buttons: Rc<Vec<(EditorCommand, Button)>>,
    font_family: DropDown,
    families: Rc<Vec<String>>,
    font_size: SpinButton,
    bold: ToggleButton,
    color: ColorDialogButton,
    position_x: SpinButton,
    position_y: SpinButton,
    syncing: Rc<Cell<bool>>,
}

pub(super) fn build_style_toolbar(tokens: StyleTokens, families: Vec<String>) -> StyleToolbar {
    let control_size = i32::from(tokens.control_size);
    let root = GtkBox::new(Orientation::Horizontal, tokens.spacing_8);
    root.add_css_class("style-toolbar");

    let command_buttons = TOOLBAR_COMMANDS
        .iter()
        .map(|(command, icon_name, tooltip)| {
            let button = icon_button(icon_name, tooltip, control_size, &["toolbar-command"]);
            root.append(&button);
            (*command, button)
        })
        .collect::<Vec<_>>();
    root.append(&Separator::new(Orientation::Vertical));

    let family_names = families.iter().map(String::as_str).collect::<Vec<_>>();
    let font_family = DropDown::from_strings(&family_names);
    font_family.set_tooltip_text(Some("Font family"));
    font_family.set_valign(Align::Center);
    root.append(&font_family);

    let (font_size_box, font_size) = labeled_spin_button(
        "Size",
        f64::from(TEXT_FONT_SIZE_MIN),
        f64::from(TEXT_FONT_SIZE_MAX),
        tokens.font_size_spin_width,
        tokens.spacing_4,
    );
    font_size.set_value(DEFAULT_FONT_SIZE);
    root.append(&font_size_box);

    let bold = icon_toggle_button("format-text-bold-symbolic", "Bold", control_size, &[]);
    root.append(&bold);

    let color_dialog = ColorDialog::new();
    color_dialog.set_with_alpha(false);
    color_dialog.set_title("Text color");
    let color = ColorDialogButton::new(Some(color_dialog));
    color.set_tooltip_text(Some("Text color"));
    color.set_valign(Align::Center);
    color.set_rgba(&rgba_from_color(Color::BLACK));
    root.append(&color);
    root.append(&Separator::new(Orientation::Vertical));

    let (position_x_box, position_x) = labeled_spin_button(
        "X",
        POSITION_MIN,
        POSITION_MAX,
        tokens.position_spin_width,
        tokens.spacing_4,
    );
    let (position_y_box, position_y) = labeled_spin_button(
        "Y",
        POSITION_MIN,
        POSITION_MAX,
        tokens.position_spin_width,
        tokens.spacing_4,
    );
    root.append(&position_x_box);
    root.append(&position_y_box);

    let toolbar = StyleToolbar {
        root,
        command_buttons: Rc::new(command_buttons),
        font_family,
        families: Rc::new(families),
        font_size,
        bold,
        color,
        position_x,
        position_y,
        syncing: Rc::new(Cell::new(false)),
    };
    toolbar.set_text_controls_sensitive(false);
    toolbar.set_position_controls_sensitive(false);
    toolbar
}

impl StyleToolbar {
    pub(super) fn root(&self) -> &GtkBox {
        &self.root
    }

    fn set_text_controls_sensitive(&self, sensitive: bool) {
        self.font_family.set_sensitive(sensitive);
        self.font_size.set_sensitive(sensitive);
        self.bold.set_sensitive(sensitive);
        self.color.set_sensitive(sensitive);
    }

    fn set_position_controls_sensitive(&self, sensitive: bool) {
        self.position_x.set_sensitive(sensitive);
        self.position_y.set_sensitive(sensitive);
    }

    /// Shows the first selected text item's font and the first selected item's
    /// position. Widget signals fired by this are not applied back to the scene.
    pub(super) fn sync_from_scene(&self, scene: &Scene) {
        self.syncing.set(true);

        let text = scene.first_selected_text();
        self.set_text_controls_sensitive(text.is_some());
        if let Some(text) = text {
            let family_position = self
                .families
                .iter()
                .position(|family| family == &text.font.family)
                .and_then(|index| u32::try_from(index).ok())
                .unwrap_or(gtk4::INVALID_LIST_POSITION);
            self.font_family.set_selected(family_position);
            self.font_size.set_value(f64::from(text.font.point_size));
            self.bold.set_active(text.font.bold);
            self.color.set_rgba(&rgba_from_color(text.color));
        }

        let position = scene.first_selected().map(|item| item.position());
        self.set_position_controls_sensitive(position.is_some());
        if let Some(position) = position {
            self.position_x.set_value(position.x);
            self.position_y.set_value(position.y);
        }

        self.syncing.set(false);
    }

    pub(super) fn connect_handlers(&self, session: &EditorSession) {
        for (command, button) in self.command_buttons.iter() {
            let session = session.clone();
            let command = *command;
            button.connect_clicked(move |_| session.run(command));
        }

        {
            let session = session.clone();
            let syncing = self.syncing.clone();
            let families = self.families.clone();
            self.font_family.connect_selected_notify(move |dropdown| {
                if syncing.get() {
                    return;
                }
                let Some(family) = usize::try_from(dropdown.selected())
                    .ok()
                    .and_then(|index| families.get(index))
                else {
                    return;
                };
                session.apply_change(|scene| scene.set_selected_font_family(family));
            });
        }
        {
            let session = session.clone();
            let syncing = self.syncing.clone();
            self.font_size.connect_value_changed(move |spin| {
                if syncing.get() {
                    return;
                }
                let point_size = u32::try_from(spin.value_as_int()).unwrap_or(TEXT_FONT_SIZE_MIN);
                session.apply_change(|scene| scene.set_selected_font_size(point_size));
            });
        }
        {
            let session = session.clone();
            let syncing = self.syncing.clone();
            self.bold.connect_toggled(move |button| {
                if syncing.get() {
                    return;
                }
                let bold = button.is_active();
                session.apply_change(|scene| scene.set_selected_font_bold(bold));
            });
        }
        {
            let session = session.clone();
            let syncing = self.syncing.clone();
            self.color.connect_rgba_notify(move |button| {
                if syncing.get() {
                    return;
                }
                let color = color_from_rgba(&button.rgba());
                session.apply_change(|scene| scene.set_selected_text_color(color));
            });
        }
        {
            let session = session.clone();
            let syncing = self.syncing.clone();
            self.position_x.connect_value_changed(move |spin| {
                if !syncing.get() {
                    move_first_selected(&session, Some(spin.value()), None);
                }
            });
        }
        {
            let session = session.clone();
            let syncing = self.syncing.clone();
            self.position_y.connect_value_changed(move |spin| {
                if !syncing.get() {
                    move_first_selected(&session, None, Some(spin.value()));
                }
            });
        }
    }
}

fn move_first_selected(session: &EditorSession, x: Option<f64>, y: Option<f64>) {
    let target = {
        let scene = session.scene.borrow();
        scene
            .first_selected()
            .map(|item| (item.id(), item.position()))
    };
    let Some((id, position)) = target else {
        return;
    };
    let target = Point::new(x.unwrap_or(position.x), y.unwrap_or(position.y));
    if let Err(err) = session.move_item_to(id, target) {
        tracing::debug!(%err, "position not applied");
    }
}

fn rgba_from_color(color: Color) -> gtk4::gdk::RGBA {
    let (r, g, b) = color.rgb_f64();
    gtk4::gdk::RGBA::new(r as f32, g as f32, b as f32, 1.0)
}

fn color_from_rgba(rgba: &gtk4::gdk::RGBA) -> Color {
    let channel = |value: f32| (f64::from(value).clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::new(channel(rgba.red()), channel(rgba.green()), channel(rgba.blue()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_from_rgba_rounds_and_clamps_channels() {
        let rgba = gtk4::gdk::RGBA::new(1.2, 0.5, -0.1, 1.0);
        assert_eq!(color_from_rgba(&rgba), Color::new(255, 128, 0));
    }

    #[test]
    fn rgba_from_color_keeps_channels() {
        let rgba = rgba_from_color(Color::new(255, 0, 51));
        assert_eq!(rgba.red(), 1.0);
        assert_eq!(rgba.green(), 0.0);
        assert!((rgba.blue() - 0.2).abs() < 1e-6);
        assert_eq!(rgba.alpha(), 1.0);
    }
}
