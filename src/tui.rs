use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::time::{Interval, MissedTickBehavior};

use crate::event::Event;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Enters raw mode and the alternate screen. A panic hook restores the
/// terminal before the panic message prints.
pub fn init() -> Result<Tui> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));

    enable_raw_mode().context("Failed to enable raw mode")?;
    execute!(io::stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    Ok(terminal)
}

pub fn restore() -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(io::stdout(), LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    Ok(())
}

/// Merges crossterm input with a steady tick that drives the spinner and
/// lets the main loop drain background results while the user is idle.
pub struct EventHandler {
    stream: EventStream,
    ticks: Interval,
}

impl EventHandler {
    pub fn new(tick_ms: u64) -> Self {
        let mut ticks = tokio::time::interval(Duration::from_millis(tick_ms));
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            stream: EventStream::new(),
            ticks,
        }
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            tokio::select! {
                _ = self.ticks.tick() => return Ok(Event::Tick),
                maybe_event = self.stream.next() => {
                    match maybe_event {
                        Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                            return Ok(Event::Key(key));
                        }
                        Some(Ok(CrosstermEvent::Resize(_, _))) => return Ok(Event::Resize),
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                        None => anyhow::bail!("Terminal event stream closed"),
                    }
                }
            }
        }
    }
}
