//! Help text generated from the keymaps, so labels never drift from bindings.

use crate::app::Message;
use crate::keys::{Keymap, format_key};

/// A single help item representing one or more related actions.
pub struct HelpItem {
    /// Messages to look up keys for.
    messages: Vec<Message>,
    /// Joins the keys: "/" for alternatives, "-" for a numbered range.
    separator: &'static str,
    label: &'static str,
}

impl HelpItem {
    pub fn new(message: Message, label: &'static str) -> Self {
        Self {
            messages: vec![message],
            separator: "/",
            label,
        }
    }

    /// Paired actions, e.g. j/k for next/prev.
    pub fn pair(first: Message, second: Message, label: &'static str) -> Self {
        Self {
            messages: vec![first, second],
            separator: "/",
            label,
        }
    }

    /// The two ends of a numbered run of bindings, shown as `1-9`.
    pub fn range(first: Message, last: Message, label: &'static str) -> Self {
        Self {
            messages: vec![first, last],
            separator: "-",
            label,
        }
    }

    fn keys(&self, keymap: &Keymap) -> Option<String> {
        let keys: Vec<String> = self
            .messages
            .iter()
            .filter_map(|msg| {
                keymap
                    .find_key(msg)
                    .map(|(code, mods)| format_key(code, mods))
            })
            .collect();
        if keys.is_empty() {
            None
        } else {
            Some(keys.join(self.separator))
        }
    }

    /// Format this help item using the given keymap.
    /// Returns None if no keys are bound for any of the messages.
    pub fn format(&self, keymap: &Keymap) -> Option<String> {
        self.keys(keymap)
            .map(|keys| format!("{}:{}", keys, self.label))
    }

    /// Returns (`keys_string`, label) for the overlay, or None if unbound.
    pub fn format_for_overlay(&self, keymap: &Keymap) -> Option<(String, &'static str)> {
        self.keys(keymap).map(|keys| (keys, self.label))
    }
}

/// A collection of help items for a specific context.
pub struct HelpConfig {
    pub expanded: Vec<HelpItem>,
    pub compact: Vec<HelpItem>,
}

impl HelpConfig {
    pub fn format(&self, keymap: &Keymap, show_expanded: bool) -> String {
        let items = if show_expanded {
            &self.expanded
        } else {
            &self.compact
        };
        items
            .iter()
            .filter_map(|item| item.format(keymap))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

pub fn home_help() -> HelpConfig {
    use Message::{
        Like, NextTab, OpenNameEditor, PrevTab, Quit, SelectNext, SelectPrev, ToggleCategory,
        ToggleHelp, Unlike,
    };
    HelpConfig {
        expanded: vec![
            HelpItem::pair(SelectNext, SelectPrev, "nav"),
            HelpItem::new(Like, "like"),
            HelpItem::new(Unlike, "unlike"),
            HelpItem::range(ToggleCategory(0), ToggleCategory(8), "category"),
            HelpItem::new(OpenNameEditor, "name"),
            HelpItem::pair(PrevTab, NextTab, "tabs"),
            HelpItem::new(Quit, "quit"),
        ],
        compact: vec![
            HelpItem::new(Like, "like"),
            HelpItem::range(ToggleCategory(0), ToggleCategory(8), "category"),
            HelpItem::new(OpenNameEditor, "name"),
            HelpItem::new(ToggleHelp, "help"),
            HelpItem::new(Quit, "quit"),
        ],
    }
}

pub fn likes_help() -> HelpConfig {
    use Message::{NextTab, PrevTab, Quit, SelectNext, SelectPrev, ToggleHelp, Unlike};
    HelpConfig {
        expanded: vec![
            HelpItem::pair(SelectNext, SelectPrev, "nav"),
            HelpItem::new(Unlike, "unlike"),
            HelpItem::pair(PrevTab, NextTab, "tabs"),
            HelpItem::new(Quit, "quit"),
        ],
        compact: vec![
            HelpItem::new(Unlike, "unlike"),
            HelpItem::pair(PrevTab, NextTab, "tabs"),
            HelpItem::new(ToggleHelp, "help"),
            HelpItem::new(Quit, "quit"),
        ],
    }
}

pub fn name_editor_help() -> HelpConfig {
    use Message::{CloseNameEditor, NameNextField, SubmitName};
    let items = || {
        vec![
            HelpItem::new(NameNextField, "switch field"),
            HelpItem::new(SubmitName, "fetch"),
            HelpItem::new(CloseNameEditor, "cancel"),
        ]
    };
    HelpConfig {
        expanded: items(),
        compact: items(),
    }
}

/// Help items for the home tab overlay.
pub fn home_overlay_items() -> Vec<HelpItem> {
    use Message::{
        Like, NextTab, OpenNameEditor, PageDown, PageUp, PrevTab, Quit, Retry, SelectFirst,
        SelectLast, SelectNext, SelectPrev, ToggleCategory, ToggleDebug, ToggleHelp, Unlike,
    };
    vec![
        HelpItem::pair(SelectNext, SelectPrev, "navigate"),
        HelpItem::pair(SelectFirst, SelectLast, "top/bottom"),
        HelpItem::pair(PageDown, PageUp, "page down/up"),
        HelpItem::new(Like, "like joke"),
        HelpItem::new(Unlike, "unlike joke"),
        HelpItem::range(
            ToggleCategory(0),
            ToggleCategory(8),
            "toggle category (first 9)",
        ),
        HelpItem::new(OpenNameEditor, "change name"),
        HelpItem::pair(PrevTab, NextTab, "switch tabs"),
        HelpItem::new(Retry, "retry failed load"),
        HelpItem::new(ToggleDebug, "debug"),
        HelpItem::new(Quit, "quit"),
        HelpItem::new(ToggleHelp, "close"),
    ]
}

/// Help items for the likes tab overlay.
pub fn likes_overlay_items() -> Vec<HelpItem> {
    use Message::{
        NextTab, OpenNameEditor, PrevTab, Quit, SelectFirst, SelectLast, SelectNext, SelectPrev,
        ToggleDebug, ToggleHelp, Unlike,
    };
    vec![
        HelpItem::pair(SelectNext, SelectPrev, "navigate"),
        HelpItem::pair(SelectFirst, SelectLast, "top/bottom"),
        HelpItem::new(Unlike, "unlike joke"),
        HelpItem::new(OpenNameEditor, "change name"),
        HelpItem::pair(PrevTab, NextTab, "switch tabs"),
        HelpItem::new(ToggleDebug, "debug"),
        HelpItem::new(Quit, "quit"),
        HelpItem::new(ToggleHelp, "close"),
    ]
}
