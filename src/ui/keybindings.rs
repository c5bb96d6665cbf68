use std::collections::HashMap;

use winit::keyboard::KeyCode;

/// Modifier flags for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModifierFlags {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl ModifierFlags {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };
}

/// A key combination: modifier flags + a physical key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub modifiers: ModifierFlags,
    pub key: KeyCode,
}

impl KeyCombo {
    /// Plain key, no modifiers.
    pub const fn plain(key: KeyCode) -> Self {
        Self {
            modifiers: ModifierFlags::NONE,
            key,
        }
    }

    pub const fn shift(key: KeyCode) -> Self {
        Self {
            modifiers: ModifierFlags::SHIFT,
            key,
        }
    }

    pub const fn alt(key: KeyCode) -> Self {
        Self {
            modifiers: ModifierFlags::ALT,
            key,
        }
    }

    /// Same key with Alt released.
    pub const fn without_alt(self) -> Self {
        Self {
            modifiers: ModifierFlags {
                alt: false,
                ..self.modifiers
            },
            key: self.key,
        }
    }
}

/// Actions an `EntryList` performs in response to key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Select the previous navigable target.
    StepUp,
    /// Select the next navigable target.
    StepDown,
    /// Previous sub-target, else collapse, else select the enclosing group.
    StepOut { recursive: bool },
    /// Next sub-target, else expand.
    StepIn { recursive: bool },
    /// Tab order.
    FocusNext,
    FocusPrev,
    PageUp,
    PageDown,
    Home,
    End,
    NextMatch,
    PrevMatch,
    ToggleCaseSensitive,
    ToggleRegex,
    ToggleFilter,
    /// Drop drag and capture state (Escape, or a modal overlay opening).
    CancelGestures,
}

impl Action {
    /// Actions that may preempt the focused entry when Alt is held.
    pub fn is_navigation(self) -> bool {
        matches!(
            self,
            Action::StepUp | Action::StepDown | Action::StepOut { .. } | Action::StepIn { .. }
        )
    }
}

/// Configurable keyboard shortcut map.
pub struct KeyBindings {
    map: HashMap<KeyCombo, Action>,
}

impl KeyBindings {
    pub fn defaults() -> Self {
        let bindings = [
            (KeyCombo::plain(KeyCode::ArrowUp), Action::StepUp),
            (KeyCombo::plain(KeyCode::ArrowDown), Action::StepDown),
            (
                KeyCombo::plain(KeyCode::ArrowLeft),
                Action::StepOut { recursive: false },
            ),
            (
                KeyCombo::shift(KeyCode::ArrowLeft),
                Action::StepOut { recursive: true },
            ),
            (
                KeyCombo::plain(KeyCode::ArrowRight),
                Action::StepIn { recursive: false },
            ),
            (
                KeyCombo::shift(KeyCode::ArrowRight),
                Action::StepIn { recursive: true },
            ),
            (KeyCombo::plain(KeyCode::Tab), Action::FocusNext),
            (KeyCombo::shift(KeyCode::Tab), Action::FocusPrev),
            (KeyCombo::plain(KeyCode::PageUp), Action::PageUp),
            (KeyCombo::plain(KeyCode::PageDown), Action::PageDown),
            (KeyCombo::plain(KeyCode::Home), Action::Home),
            (KeyCombo::plain(KeyCode::End), Action::End),
            (KeyCombo::plain(KeyCode::F3), Action::NextMatch),
            (KeyCombo::shift(KeyCode::F3), Action::PrevMatch),
            (KeyCombo::alt(KeyCode::KeyC), Action::ToggleCaseSensitive),
            (KeyCombo::alt(KeyCode::KeyR), Action::ToggleRegex),
            (KeyCombo::alt(KeyCode::KeyF), Action::ToggleFilter),
            (KeyCombo::plain(KeyCode::Escape), Action::CancelGestures),
        ];
        Self {
            map: bindings.into_iter().collect(),
        }
    }

    /// Look up the action for a key combination.
    pub fn lookup(&self, combo: KeyCombo) -> Option<Action> {
        self.map.get(&combo).copied()
    }

    /// Rebind `combo`. Returns the action it was previously bound to.
    pub fn bind(&mut self, combo: KeyCombo, action: Action) -> Option<Action> {
        self.map.insert(combo, action)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_exist() {
        let kb = KeyBindings::defaults();
        assert_eq!(
            kb.lookup(KeyCombo::plain(KeyCode::ArrowDown)),
            Some(Action::StepDown)
        );
        assert_eq!(
            kb.lookup(KeyCombo::shift(KeyCode::ArrowRight)),
            Some(Action::StepIn { recursive: true })
        );
        assert_eq!(
            kb.lookup(KeyCombo::alt(KeyCode::KeyR)),
            Some(Action::ToggleRegex)
        );
    }

    #[test]
    fn unbound_key_returns_none() {
        let kb = KeyBindings::defaults();
        assert_eq!(kb.lookup(KeyCombo::plain(KeyCode::KeyZ)), None);
        assert_eq!(kb.lookup(KeyCombo::alt(KeyCode::ArrowDown)), None);
    }

    #[test]
    fn alt_strips_to_navigation() {
        let kb = KeyBindings::defaults();
        let combo = KeyCombo::alt(KeyCode::ArrowUp).without_alt();
        assert_eq!(combo, KeyCombo::plain(KeyCode::ArrowUp));
        assert!(kb.lookup(combo).is_some_and(Action::is_navigation));
        assert!(!Action::FocusNext.is_navigation());
    }

    #[test]
    fn rebinding_replaces_previous_action() {
        let mut kb = KeyBindings::defaults();
        assert_eq!(kb.bind(KeyCombo::plain(KeyCode::Enter), Action::NextMatch), None);
        assert_eq!(
            kb.lookup(KeyCombo::plain(KeyCode::Enter)),
            Some(Action::NextMatch)
        );
        let previous = kb.bind(KeyCombo::plain(KeyCode::F3), Action::End);
        assert_eq!(previous, Some(Action::NextMatch));
        assert_eq!(kb.lookup(KeyCombo::plain(KeyCode::F3)), Some(Action::End));
    }
}
