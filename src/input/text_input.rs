#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInputEvent {
    Character(char),
    Backspace,
    Enter,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInputAction {
    InsertCharacter(char),
    DeleteBackward,
    InsertLineBreak,
    MoveCursor,
    ExitFocus,
    NoTextTarget,
    NoAction,
}

impl TextInputAction {
    /// Whether applying the action changed the text content.
    pub const fn edits_content(self) -> bool {
        matches!(
            self,
            Self::InsertCharacter(_) | Self::DeleteBackward | Self::InsertLineBreak
        )
    }
}

pub fn resolve_text_input(event: TextInputEvent, has_text_target: bool) -> TextInputAction {
    if !has_text_target {
        return TextInputAction::NoTextTarget;
    }

    match event {
        TextInputEvent::Character(c) if c.is_control() => TextInputAction::NoAction,
        TextInputEvent::Character(c) => TextInputAction::InsertCharacter(c),
        TextInputEvent::Backspace => TextInputAction::DeleteBackward,
        TextInputEvent::Enter => TextInputAction::InsertLineBreak,
        TextInputEvent::CursorLeft
        | TextInputEvent::CursorRight
        | TextInputEvent::CursorUp
        | TextInputEvent::CursorDown => TextInputAction::MoveCursor,
        TextInputEvent::Escape => TextInputAction::ExitFocus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_target_short_circuits_every_event() {
        for event in [
            TextInputEvent::Character('a'),
            TextInputEvent::Backspace,
            TextInputEvent::Escape,
        ] {
            assert_eq!(
                resolve_text_input(event, false),
                TextInputAction::NoTextTarget
            );
        }
    }

    #[test]
    fn editing_keys_resolve_to_content_actions() {
        assert_eq!(
            resolve_text_input(TextInputEvent::Character('가'), true),
            TextInputAction::InsertCharacter('가')
        );
        assert_eq!(
            resolve_text_input(TextInputEvent::Enter, true),
            TextInputAction::InsertLineBreak
        );
        assert_eq!(
            resolve_text_input(TextInputEvent::CursorUp, true),
            TextInputAction::MoveCursor
        );
        assert_eq!(
            resolve_text_input(TextInputEvent::Escape, true),
            TextInputAction::ExitFocus
        );
        assert!(TextInputAction::DeleteBackward.edits_content());
        assert!(!TextInputAction::MoveCursor.edits_content());
    }

    #[test]
    fn control_characters_are_ignored() {
        assert_eq!(
            resolve_text_input(TextInputEvent::Character('\u{7}'), true),
            TextInputAction::NoAction
        );
    }
}
