use crate::input::{ShortcutKey, ShortcutModifiers};

fn named_key(key: gtk4::gdk::Key) -> Option<ShortcutKey> {
    match key {
        gtk4::gdk::Key::Return | gtk4::gdk::Key::KP_Enter => Some(ShortcutKey::Enter),
        gtk4::gdk::Key::Escape => Some(ShortcutKey::Escape),
        gtk4::gdk::Key::Delete | gtk4::gdk::Key::KP_Delete => Some(ShortcutKey::Delete),
        gtk4::gdk::Key::BackSpace => Some(ShortcutKey::Backspace),
        gtk4::gdk::Key::Left | gtk4::gdk::Key::KP_Left => Some(ShortcutKey::Left),
        gtk4::gdk::Key::Right | gtk4::gdk::Key::KP_Right => Some(ShortcutKey::Right),
        gtk4::gdk::Key::Up | gtk4::gdk::Key::KP_Up => Some(ShortcutKey::Up),
        gtk4::gdk::Key::Down | gtk4::gdk::Key::KP_Down => Some(ShortcutKey::Down),
        _ => None,
    }
}

fn shortcut_character_from_keycode(keycode: u32) -> Option<char> {
    // XKB keycodes (evdev + 8), so Ctrl shortcuts work under non-latin layouts.
    match keycode {
        52 => Some('z'),
        29 => Some('y'),
        42 => Some('g'),
        38 => Some('a'),
        28 => Some('t'),
        31 => Some('i'),
        32 => Some('o'),
        39 => Some('s'),
        26 => Some('e'),
        _ => None,
    }
}

/// Key for command resolution: letters folded to lowercase ASCII, falling back to the
/// hardware keycode when the keyval is not ASCII.
pub(super) fn normalize_shortcut_key(key: gtk4::gdk::Key, keycode: u32) -> Option<ShortcutKey> {
    if let Some(named) = named_key(key) {
        return Some(named);
    }

    let keyval_shortcut = key
        .to_unicode()
        .filter(|character| !character.is_control())
        .map(|character| ShortcutKey::Character(character.to_ascii_lowercase()));
    match keyval_shortcut {
        Some(ShortcutKey::Character(character)) if character.is_ascii() => {
            Some(ShortcutKey::Character(character))
        }
        Some(_) | None => shortcut_character_from_keycode(keycode).map(ShortcutKey::Character),
    }
}

/// Key for text entry: characters keep their case and script.
pub(super) fn normalize_text_key(key: gtk4::gdk::Key) -> Option<ShortcutKey> {
    if let Some(named) = named_key(key) {
        return Some(named);
    }
    key.to_unicode()
        .filter(|character| !character.is_control())
        .map(ShortcutKey::Character)
}

pub(super) fn shortcut_modifiers(modifier: gtk4::gdk::ModifierType) -> ShortcutModifiers {
    ShortcutModifiers::new(
        modifier.contains(gtk4::gdk::ModifierType::CONTROL_MASK),
        modifier.contains(gtk4::gdk::ModifierType::SHIFT_MASK),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_shortcut_key_falls_back_to_hardware_keycode_for_letters() {
        assert_eq!(
            normalize_shortcut_key(gtk4::gdk::Key::Hangul, 52),
            Some(ShortcutKey::Character('z'))
        );
        assert_eq!(
            normalize_shortcut_key(gtk4::gdk::Key::Hangul, 42),
            Some(ShortcutKey::Character('g'))
        );
        assert_eq!(normalize_shortcut_key(gtk4::gdk::Key::Hangul, 999), None);
    }

    #[test]
    fn normalize_shortcut_key_lowercases_ascii_keyvals() {
        assert_eq!(
            normalize_shortcut_key(gtk4::gdk::Key::G, 999),
            Some(ShortcutKey::Character('g'))
        );
        assert_eq!(
            normalize_shortcut_key(gtk4::gdk::Key::Escape, 52),
            Some(ShortcutKey::Escape)
        );
        assert_eq!(
            normalize_shortcut_key(gtk4::gdk::Key::KP_Left, 0),
            Some(ShortcutKey::Left)
        );
    }

    #[test]
    fn normalize_text_key_preserves_case() {
        assert_eq!(
            normalize_text_key(gtk4::gdk::Key::A),
            Some(ShortcutKey::Character('A'))
        );
        assert_eq!(
            normalize_text_key(gtk4::gdk::Key::space),
            Some(ShortcutKey::Character(' '))
        );
        assert_eq!(
            normalize_text_key(gtk4::gdk::Key::BackSpace),
            Some(ShortcutKey::Backspace)
        );
        assert_eq!(normalize_text_key(gtk4::gdk::Key::Shift_L), None);
    }

    #[test]
    fn shortcut_modifiers_read_ctrl_and_shift() {
        let modifiers = shortcut_modifiers(
            gtk4::gdk::ModifierType::CONTROL_MASK | gtk4::gdk::ModifierType::SHIFT_MASK,
        );
        assert_eq!(modifiers, ShortcutModifiers::new(true, true));
        assert_eq!(
            shortcut_modifiers(gtk4::gdk::ModifierType::ALT_MASK),
            ShortcutModifiers::default()
        );
    }
}
