use gtk4::glib::Propagation;
use gtk4::prelude::*;
use gtk4::{EventControllerKey, PropagationPhase};

use crate::app::input_bridge::{normalize_shortcut_key, normalize_text_key, shortcut_modifiers};
use crate::input::{resolve_shortcut, InputContext, ShortcutAction, TextInputAction, TextInputEvent};

use super::super::{EditorCommand, EditorSession};

fn editor_command_for(action: ShortcutAction) -> Option<EditorCommand> {
    let command = match action {
        ShortcutAction::Undo => EditorCommand::Undo,
        ShortcutAction::Redo => EditorCommand::Redo,
        ShortcutAction::DeleteSelection => EditorCommand::DeleteSelection,
        ShortcutAction::SelectAll => EditorCommand::SelectAll,
        ShortcutAction::ClearSelection => EditorCommand::ClearSelection,
        ShortcutAction::Group => EditorCommand::Group,
        ShortcutAction::Ungroup => EditorCommand::Ungroup,
        ShortcutAction::InsertText => EditorCommand::InsertText,
        ShortcutAction::InsertImage => EditorCommand::InsertImage,
        ShortcutAction::OpenLayout => EditorCommand::OpenLayout,
        ShortcutAction::SaveLayout => EditorCommand::SaveLayout,
        ShortcutAction::ExportHtml => EditorCommand::ExportHtml,
        ShortcutAction::TextEdit(_) | ShortcutAction::Nudge { .. } => return None,
    };
    Some(command)
}

/// Window-wide key handling in the capture phase, so text editing on the canvas
/// sees keys before focused widgets do.
pub(in crate::app::editor_runtime) fn connect_key_handling(session: &EditorSession) {
    let key_controller = EventControllerKey::new();
    key_controller.set_propagation_phase(PropagationPhase::Capture);
    let press_session = session.clone();
    key_controller.connect_key_pressed(move |_, key, keycode, modifier| {
        handle_key_press(&press_session, key, keycode, modifier)
    });
    session.window.add_controller(key_controller);
}

fn handle_key_press(
    session: &EditorSession,
    key: gtk4::gdk::Key,
    keycode: u32,
    modifier: gtk4::gdk::ModifierType,
) -> Propagation {
    let canvas_focused = session.canvas.has_focus();
    let text_editing = canvas_focused && session.scene.borrow().is_editing_text();
    let shortcut_key = if text_editing {
        normalize_text_key(key)
    } else {
        normalize_shortcut_key(key, keycode)
    };
    let Some(shortcut_key) = shortcut_key else {
        return Propagation::Proceed;
    };

    let context = InputContext {
        dialog_open: session.dialog_open.get(),
        text_editing,
        canvas_focused,
    };
    let Some(action) = resolve_shortcut(shortcut_key, shortcut_modifiers(modifier), context) else {
        return Propagation::Proceed;
    };
    tracing::trace!(?action, "shortcut resolved");
    handle_shortcut_action(session, action);
    Propagation::Stop
}

fn handle_shortcut_action(session: &EditorSession, action: ShortcutAction) {
    match action {
        ShortcutAction::TextEdit(TextInputEvent::Escape) => session.finish_text_edit(),
        ShortcutAction::TextEdit(event) => {
            let applied = session.scene.borrow_mut().apply_text_input(event);
            if applied == TextInputAction::NoTextTarget {
                session.finish_text_edit();
            }
            session.canvas.queue_draw();
        }
        ShortcutAction::Nudge { dx, dy } => {
            session.apply_change(|scene| scene.move_selected_by(f64::from(dx), f64::from(dy)));
        }
        other => {
            if let Some(command) = editor_command_for(other) {
                session.run(command);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_shortcuts_map_to_dialog_commands() {
        assert_eq!(
            editor_command_for(ShortcutAction::OpenLayout),
            Some(EditorCommand::OpenLayout)
        );
        assert_eq!(
            editor_command_for(ShortcutAction::ExportHtml),
            Some(EditorCommand::ExportHtml)
        );
    }

    #[test]
    fn text_and_nudge_actions_are_not_commands() {
        assert_eq!(
            editor_command_for(ShortcutAction::TextEdit(TextInputEvent::Enter)),
            None
        );
        assert_eq!(editor_command_for(ShortcutAction::Nudge { dx: 1, dy: 0 }), None);
    }
}
