//! Keyboard shortcuts and how they are shown on each platform

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Step navigation uses Cmd on macOS and Ctrl elsewhere
#[cfg(target_os = "macos")]
const STEP_MODIFIER: KeyModifiers = KeyModifiers::SUPER;

#[cfg(not(target_os = "macos"))]
const STEP_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

#[cfg(target_os = "macos")]
const STEP_PREFIX: &str = "Cmd";

#[cfg(not(target_os = "macos"))]
const STEP_PREFIX: &str = "Ctrl";

/// A modifier + letter chord
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    key: char,
    modifiers: KeyModifiers,
    prefix: &'static str,
}

impl Shortcut {
    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == KeyCode::Char(self.key) && key.modifiers.contains(self.modifiers)
    }

    /// Display form for help text, e.g. `Ctrl+S`
    pub fn label(&self) -> String {
        format!("{}+{}", self.prefix, self.key.to_ascii_uppercase())
    }
}

/// Ctrl+C quits on every platform
pub const QUIT: Shortcut = Shortcut {
    key: 'c',
    modifiers: KeyModifiers::CONTROL,
    prefix: "Ctrl",
};

/// Ctrl+S saves on every platform
pub const SAVE: Shortcut = Shortcut {
    key: 's',
    modifiers: KeyModifiers::CONTROL,
    prefix: "Ctrl",
};

pub const NEXT: Shortcut = Shortcut {
    key: 'n',
    modifiers: STEP_MODIFIER,
    prefix: STEP_PREFIX,
};

pub const PREVIOUS: Shortcut = Shortcut {
    key: 'p',
    modifiers: STEP_MODIFIER,
    prefix: STEP_PREFIX,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_is_ctrl_everywhere() {
        assert_eq!(SAVE.label(), "Ctrl+S");
        assert!(SAVE.matches(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        assert!(!SAVE.matches(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_step_shortcuts_use_platform_modifier() {
        assert_eq!(NEXT.label(), format!("{STEP_PREFIX}+N"));
        assert!(NEXT.matches(&KeyEvent::new(KeyCode::Char('n'), STEP_MODIFIER)));
        assert!(!NEXT.matches(&KeyEvent::new(KeyCode::Char('p'), STEP_MODIFIER)));
        assert!(PREVIOUS.matches(&KeyEvent::new(
            KeyCode::Char('p'),
            STEP_MODIFIER | KeyModifiers::SHIFT
        )));
    }
}
