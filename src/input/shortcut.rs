use super::TextInputEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKey {
    Character(char),
    Enter,
    Escape,
    Delete,
    Backspace,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShortcutModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl ShortcutModifiers {
    pub const fn new(ctrl: bool, shift: bool) -> Self {
        Self { ctrl, shift }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputContext {
    pub dialog_open: bool,
    pub text_editing: bool,
    pub canvas_focused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    TextEdit(TextInputEvent),
    Undo,
    Redo,
    DeleteSelection,
    Nudge { dx: i32, dy: i32 },
    SelectAll,
    ClearSelection,
    Group,
    Ungroup,
    InsertText,
    InsertImage,
    OpenLayout,
    SaveLayout,
    ExportHtml,
}

/// Distance moved by an arrow key; Shift multiplies it.
pub const NUDGE_STEP: i32 = 1;
pub const NUDGE_STEP_LARGE: i32 = 10;

fn resolve_text_shortcut(key: ShortcutKey, modifiers: ShortcutModifiers) -> Option<ShortcutAction> {
    let event = match (key, modifiers.ctrl) {
        (ShortcutKey::Character(c), false) => TextInputEvent::Character(c),
        (ShortcutKey::Enter, false) => TextInputEvent::Enter,
        (ShortcutKey::Backspace, _) => TextInputEvent::Backspace,
        (ShortcutKey::Left, _) => TextInputEvent::CursorLeft,
        (ShortcutKey::Right, _) => TextInputEvent::CursorRight,
        (ShortcutKey::Up, _) => TextInputEvent::CursorUp,
        (ShortcutKey::Down, _) => TextInputEvent::CursorDown,
        (ShortcutKey::Escape, _) => TextInputEvent::Escape,
        _ => return None,
    };
    Some(ShortcutAction::TextEdit(event))
}

fn resolve_nudge(key: ShortcutKey, modifiers: ShortcutModifiers) -> Option<ShortcutAction> {
    let step = if modifiers.shift {
        NUDGE_STEP_LARGE
    } else {
        NUDGE_STEP
    };
    let (dx, dy) = match key {
        ShortcutKey::Left => (-step, 0),
        ShortcutKey::Right => (step, 0),
        ShortcutKey::Up => (0, -step),
        ShortcutKey::Down => (0, step),
        _ => return None,
    };
    Some(ShortcutAction::Nudge { dx, dy })
}

fn resolve_command_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
) -> Option<ShortcutAction> {
    match (key, modifiers.ctrl, modifiers.shift) {
        (ShortcutKey::Character('z'), true, false) => Some(ShortcutAction::Undo),
        (ShortcutKey::Character('z'), true, true) | (ShortcutKey::Character('y'), true, _) => {
            Some(ShortcutAction::Redo)
        }
        (ShortcutKey::Character('g'), true, false) => Some(ShortcutAction::Group),
        (ShortcutKey::Character('g'), true, true) => Some(ShortcutAction::Ungroup),
        (ShortcutKey::Character('a'), true, _) => Some(ShortcutAction::SelectAll),
        (ShortcutKey::Character('t'), true, _) => Some(ShortcutAction::InsertText),
        (ShortcutKey::Character('i'), true, _) => Some(ShortcutAction::InsertImage),
        (ShortcutKey::Character('o'), true, _) => Some(ShortcutAction::OpenLayout),
        (ShortcutKey::Character('s'), true, _) => Some(ShortcutAction::SaveLayout),
        (ShortcutKey::Character('e'), true, _) => Some(ShortcutAction::ExportHtml),
        _ => None,
    }
}

fn resolve_canvas_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
) -> Option<ShortcutAction> {
    match (key, modifiers.ctrl) {
        (ShortcutKey::Delete | ShortcutKey::Backspace, false) => {
            Some(ShortcutAction::DeleteSelection)
        }
        (ShortcutKey::Escape, false) => Some(ShortcutAction::ClearSelection),
        (ShortcutKey::Left | ShortcutKey::Right | ShortcutKey::Up | ShortcutKey::Down, false) => {
            resolve_nudge(key, modifiers)
        }
        _ => resolve_command_shortcut(key, modifiers),
    }
}

/// Maps a key press to an editor action. An open dialog swallows everything, a text box
/// in edit mode takes every editing key, and canvas-only keys (delete, arrows, escape)
/// need the canvas to have focus so toolbar fields keep their own keys.
pub fn resolve_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
    context: InputContext,
) -> Option<ShortcutAction> {
    if context.dialog_open {
        return None;
    }

    if context.text_editing {
        return resolve_text_shortcut(key, modifiers);
    }

    if context.canvas_focused {
        return resolve_canvas_shortcut(key, modifiers);
    }

    resolve_command_shortcut(key, modifiers)
}
