mod shortcut;
mod text_input;

pub use shortcut::{
    resolve_shortcut, InputContext, ShortcutAction, ShortcutKey, ShortcutModifiers, NUDGE_STEP,
    NUDGE_STEP_LARGE,
};
pub use text_input::{resolve_text_input, TextInputAction, TextInputEvent};
