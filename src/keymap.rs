//! Declarative key binding table.
//!
//! Keys are matched on code plus modifiers; the first matching row wins. The
//! table only names commands, it never decides guards: whether Backspace on a
//! non-empty node deletes a character or removes the node is up to the caller
//! and [`crate::edit::dispatch`].

use crate::edit::Command;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// A key code with the modifiers held, normalised for matching.
pub struct Key {
    /// The key itself.
    pub code: KeyCode,
    /// Modifiers held while it was pressed.
    pub modifiers: KeyModifiers,
}

impl Key {
    #[must_use]
    /// A key with the given modifiers.
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    #[must_use]
    /// Shift is implied by the character for printable keys and by `BackTab`,
    /// so it is dropped there. Terminals disagree on whether they report it.
    pub fn normalize(self) -> Self {
        match self.code {
            KeyCode::Char(_) | KeyCode::BackTab => Self {
                modifiers: self.modifiers - KeyModifiers::SHIFT,
                ..self
            },
            KeyCode::Tab if self.modifiers.contains(KeyModifiers::SHIFT) => Self {
                code: KeyCode::BackTab,
                modifiers: self.modifiers - KeyModifiers::SHIFT,
            },
            _ => self,
        }
    }
}

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        Self::new(event.code, event.modifiers).normalize()
    }
}

const NONE: KeyModifiers = KeyModifiers::NONE;
const ALT: KeyModifiers = KeyModifiers::ALT;
const CTRL: KeyModifiers = KeyModifiers::CONTROL;
const SUPER: KeyModifiers = KeyModifiers::SUPER;

const STANDARD: &[(Key, Command)] = &[
    (Key::new(KeyCode::Up, NONE), Command::NavigatePrev),
    (Key::new(KeyCode::Down, NONE), Command::NavigateNext),
    (Key::new(KeyCode::Up, ALT), Command::SwapPrev),
    (Key::new(KeyCode::Down, ALT), Command::SwapNext),
    (Key::new(KeyCode::Up, CTRL), Command::SwapPrev),
    (Key::new(KeyCode::Down, CTRL), Command::SwapNext),
    (Key::new(KeyCode::Up, SUPER), Command::SwapPrev),
    (Key::new(KeyCode::Down, SUPER), Command::SwapNext),
    (Key::new(KeyCode::Enter, NONE), Command::Enter),
    (Key::new(KeyCode::Tab, NONE), Command::Indent),
    (Key::new(KeyCode::BackTab, NONE), Command::Unindent),
    (Key::new(KeyCode::Backspace, NONE), Command::Backspace),
    (Key::new(KeyCode::Esc, NONE), Command::Exit),
    (Key::new(KeyCode::Char('.'), ALT), Command::Toggle),
    (Key::new(KeyCode::Char('.'), SUPER), Command::Toggle),
];

const VIM: &[(Key, Command)] = &[
    (Key::new(KeyCode::Char('j'), ALT), Command::NavigateNext),
    (Key::new(KeyCode::Char('k'), ALT), Command::NavigatePrev),
    (Key::new(KeyCode::Char('l'), ALT), Command::Expand),
    (Key::new(KeyCode::Char('h'), ALT), Command::Collapse),
];

#[derive(Clone, Debug)]
/// An ordered list of key bindings.
pub struct Keymap {
    bindings: Vec<(Key, Command)>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::standard(true)
    }
}

impl Keymap {
    #[must_use]
    /// The standard bindings, plus Meta+J/K/H/L when `vim` is set.
    pub fn standard(vim: bool) -> Self {
        let mut bindings = STANDARD.to_vec();
        if vim {
            bindings.extend_from_slice(VIM);
        }
        Self { bindings }
    }

    #[must_use]
    /// The command bound to `key`, if any.
    pub fn lookup(&self, key: Key) -> Option<Command> {
        let key = key.normalize();
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, command)| *command)
    }

    #[must_use]
    /// Convenience for a raw terminal event.
    pub fn command_for(&self, event: KeyEvent) -> Option<Command> {
        self.lookup(Key::from(event))
    }

    /// Bind `key` to `command` ahead of every existing binding.
    pub fn bind(&mut self, key: Key, command: Command) {
        self.bindings.insert(0, (key.normalize(), command));
    }

    #[must_use]
    /// Every key bound to `command`, in table order.
    pub fn keys_for(&self, command: Command) -> Vec<Key> {
        self.bindings
            .iter()
            .filter(|(_, bound)| *bound == command)
            .map(|(key, _)| *key)
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/keymap.rs"]
mod tests;
