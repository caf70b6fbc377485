use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Message, Tab};

/// A declarative keybinding map that can be composed and extended.
#[derive(Clone)]
pub struct Keymap {
    bindings: Vec<(KeyCode, KeyModifiers, Message)>,
}

impl Keymap {
    pub const fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Add a key binding with no modifiers.
    pub fn bind(mut self, code: KeyCode, message: Message) -> Self {
        self.bindings.push((code, KeyModifiers::NONE, message));
        self
    }

    /// Add a key binding with Ctrl modifier.
    pub fn bind_ctrl(mut self, code: KeyCode, message: Message) -> Self {
        self.bindings.push((code, KeyModifiers::CONTROL, message));
        self
    }

    /// Look up a message for a key event.
    /// Later bindings take precedence over earlier ones. Shift is ignored so
    /// `G` and `S-Tab` match plain bindings; Ctrl must match exactly.
    pub fn get(&self, event: &KeyEvent) -> Option<Message> {
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        self.bindings
            .iter()
            .rev()
            .find(|(code, mods, _)| {
                *code == event.code && mods.contains(KeyModifiers::CONTROL) == ctrl
            })
            .map(|(_, _, msg)| msg.clone())
    }

    /// Extend this keymap with another. The other keymap's bindings take precedence.
    pub fn extend(mut self, other: Self) -> Self {
        self.bindings.extend(other.bindings);
        self
    }

    /// Find the first key bound to a specific message.
    pub fn find_key(&self, message: &Message) -> Option<(KeyCode, KeyModifiers)> {
        self.bindings
            .iter()
            .find(|(_, _, msg)| msg == message)
            .map(|(code, mods, _)| (*code, *mods))
    }
}

/// Format a key binding for display in help text.
pub fn format_key(code: KeyCode, mods: KeyModifiers) -> String {
    let key_str = match code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "S-Tab".to_string(),
        _ => "?".to_string(),
    };
    if mods.contains(KeyModifiers::CONTROL) {
        format!("C-{key_str}")
    } else {
        key_str
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

/// Keybindings that work on both tabs.
pub fn global_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('q'), Message::Quit)
        .bind_ctrl(KeyCode::Char('c'), Message::Quit)
        .bind(KeyCode::Char('`'), Message::ToggleDebug)
        .bind(KeyCode::Char('?'), Message::ToggleHelp)
        .bind(KeyCode::Char('H'), Message::PrevTab)
        .bind(KeyCode::Char('L'), Message::NextTab)
        .bind(KeyCode::Tab, Message::NextTab)
        .bind(KeyCode::BackTab, Message::PrevTab)
        .bind(KeyCode::Char('n'), Message::OpenNameEditor)
        .bind(KeyCode::Char('r'), Message::Retry)
}

/// Keybindings for the help overlay popup.
fn help_overlay_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('?'), Message::ToggleHelp)
        .bind(KeyCode::Esc, Message::ToggleHelp)
        .bind(KeyCode::Char('q'), Message::ToggleHelp)
        .bind_ctrl(KeyCode::Char('c'), Message::ToggleHelp)
}

/// Non-character keys of the name editor. Printable characters are text input.
pub fn name_editor_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Enter, Message::SubmitName)
        .bind(KeyCode::Esc, Message::CloseNameEditor)
        .bind_ctrl(KeyCode::Char('c'), Message::CloseNameEditor)
        .bind(KeyCode::Tab, Message::NameNextField)
        .bind(KeyCode::BackTab, Message::NameNextField)
        .bind(KeyCode::Up, Message::NameNextField)
        .bind(KeyCode::Down, Message::NameNextField)
        .bind(KeyCode::Backspace, Message::NameBackspace)
}

fn navigation_keymap() -> Keymap {
    Keymap::new()
        .bind(KeyCode::Char('j'), Message::SelectNext)
        .bind(KeyCode::Down, Message::SelectNext)
        .bind(KeyCode::Char('k'), Message::SelectPrev)
        .bind(KeyCode::Up, Message::SelectPrev)
        .bind(KeyCode::Char('g'), Message::SelectFirst)
        .bind(KeyCode::Char('G'), Message::SelectLast)
        .bind_ctrl(KeyCode::Char('d'), Message::PageDown)
        .bind_ctrl(KeyCode::Char('u'), Message::PageUp)
}

/// Home tab keybindings. Digits toggle the category at that position.
pub fn home_keymap() -> Keymap {
    let keymap = navigation_keymap()
        .bind(KeyCode::Char('l'), Message::Like)
        .bind(KeyCode::Enter, Message::Like)
        .bind(KeyCode::Char('u'), Message::Unlike);
    ('1'..='9')
        .enumerate()
        .fold(keymap, |keymap, (index, digit)| {
            keymap.bind(KeyCode::Char(digit), Message::ToggleCategory(index))
        })
}

pub fn likes_keymap() -> Keymap {
    navigation_keymap()
        .bind(KeyCode::Char('u'), Message::Unlike)
        .bind(KeyCode::Char('x'), Message::Unlike)
}

pub fn handle_key(key: KeyEvent, app: &App) -> Option<Message> {
    // Name editor captures all input while open
    if app.name_editor.is_some() {
        return name_editor_keymap().get(&key).or_else(|| match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Message::NameInput(c))
            }
            _ => None,
        });
    }

    // Help overlay takes priority when open
    if app.help_overlay {
        return help_overlay_keymap().get(&key);
    }

    // Global keys first
    if let Some(msg) = global_keymap().get(&key) {
        return Some(msg);
    }

    match app.tab {
        Tab::Home => home_keymap().get(&key),
        Tab::Likes => likes_keymap().get(&key),
    }
}
