use crossterm::event::KeyEvent;

/// Terminal input, reduced to what the main loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Tick,
    Resize,
}
