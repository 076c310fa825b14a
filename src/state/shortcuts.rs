// Undo/redo key bindings: Cmd/Ctrl+Z undoes, Cmd/Ctrl+Shift+Z redoes.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
}

/// Raw key-down data, decoupled from `web_sys::KeyboardEvent` so it can be built in tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub repeat: bool,
}

impl KeyInput {
    pub fn from_event(e: &web_sys::KeyboardEvent) -> Self {
        Self {
            key: e.key(),
            meta: e.meta_key(),
            ctrl: e.ctrl_key(),
            shift: e.shift_key(),
            repeat: e.repeat(),
        }
    }
}

/// Which binding a chord matches, regardless of auto-repeat. Callers use this to
/// suppress the browser's own undo even for events they will not act on.
pub fn resolve(input: &KeyInput) -> Option<ShortcutAction> {
    if !(input.meta || input.ctrl) || !input.key.eq_ignore_ascii_case("z") {
        return None;
    }
    Some(if input.shift {
        ShortcutAction::Redo
    } else {
        ShortcutAction::Undo
    })
}

/// Edge-triggered variant: one action per physical key press. Auto-repeat
/// events from a held key are dropped. macOS withholds `keyup` for keys pressed
/// while Cmd is down, so a release-based latch would swallow the second Cmd+Z;
/// the `repeat` flag is the reliable edge.
pub fn on_press(input: &KeyInput) -> Option<ShortcutAction> {
    if input.repeat {
        return None;
    }
    resolve(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(key: &str, meta: bool, ctrl: bool, shift: bool) -> KeyInput {
        KeyInput {
            key: key.into(),
            meta,
            ctrl,
            shift,
            repeat: false,
        }
    }

    #[test]
    fn resolves_undo_and_redo_chords() {
        assert_eq!(resolve(&chord("z", true, false, false)), Some(ShortcutAction::Undo));
        assert_eq!(resolve(&chord("Z", true, false, true)), Some(ShortcutAction::Redo));
        assert_eq!(resolve(&chord("z", false, true, false)), Some(ShortcutAction::Undo));
        assert_eq!(resolve(&chord("z", false, true, true)), Some(ShortcutAction::Redo));
    }

    #[test]
    fn ignores_plain_and_other_keys() {
        assert_eq!(resolve(&chord("z", false, false, false)), None);
        assert_eq!(resolve(&chord("z", false, false, true)), None);
        assert_eq!(resolve(&chord("y", true, false, false)), None);
        assert_eq!(resolve(&chord("Meta", true, false, false)), None);
    }

    #[test]
    fn auto_repeat_does_not_fire() {
        let held = KeyInput {
            repeat: true,
            ..chord("z", true, false, false)
        };
        assert_eq!(resolve(&held), Some(ShortcutAction::Undo));
        assert_eq!(on_press(&held), None);
    }

    #[test]
    fn every_fresh_press_fires() {
        let undo = chord("z", true, false, false);
        assert_eq!(on_press(&undo), Some(ShortcutAction::Undo));
        assert_eq!(on_press(&undo), Some(ShortcutAction::Undo));
    }
}
