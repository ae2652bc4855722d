use color_eyre::eyre::WrapErr;
use ratatui::crossterm::{
    event::{
        self, Event as CrosstermEvent, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::supports_keyboard_enhancement,
};
use std::{
    io::stdout,
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::{Duration, Instant},
};

/// Redraw rate. The game's frame clock turns each redraw into however many
/// simulation ticks are due.
const FRAME_RATE: f64 = 60.0;

#[derive(Clone, Debug)]
pub enum Event {
    /// Time to advance and redraw, stamped when emitted
    Tick(Instant),
    /// Keyboard, mouse and paste events
    Crossterm(CrosstermEvent),
    App(AppEvent),
}

#[derive(Clone, Debug)]
pub enum AppEvent {
    Quit,
    /// New terminal size in cells
    TerminalResize(u16, u16),
}

/// Key release reporting, popped again on drop
struct KeyboardEnhancement {
    active: bool,
}

impl KeyboardEnhancement {
    fn push() -> color_eyre::Result<Self> {
        let active = matches!(supports_keyboard_enhancement(), Ok(true));
        if active {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )
            .wrap_err("failed to enable keyboard enhancement")?;
        }
        log::info!("key release events: {active}");
        Ok(Self { active })
    }
}

impl Drop for KeyboardEnhancement {
    fn drop(&mut self) {
        if self.active {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
    }
}

/// Merges terminal input and the frame timer into one channel.
///
/// Expects raw mode to be on already (`ratatui::init`).
pub struct EventHandler {
    tx: Sender<Event>,
    rx: Receiver<Event>,
    keyboard: KeyboardEnhancement,
}

impl EventHandler {
    pub fn new() -> color_eyre::Result<Self> {
        let keyboard = KeyboardEnhancement::push()?;
        let (tx, rx) = mpsc::channel();

        let forward = tx.clone();
        thread::Builder::new()
            .name("terminal-events".into())
            .spawn(move || {
                if let Err(e) = forward_events(&forward) {
                    log::error!("event thread stopped: {e:?}");
                }
            })
            .wrap_err("failed to spawn event thread")?;

        Ok(Self { tx, rx, keyboard })
    }

    /// Whether the terminal reports key releases
    pub fn keyboard_enhanced(&self) -> bool {
        self.keyboard.active
    }

    /// Block until the next event
    pub fn next(&self) -> color_eyre::Result<Event> {
        self.rx.recv().wrap_err("event channel closed")
    }

    pub fn send(&mut self, app_event: AppEvent) {
        let _ = self.tx.send(Event::App(app_event));
    }
}

/// Runs on the event thread until the receiving side is dropped
fn forward_events(tx: &Sender<Event>) -> color_eyre::Result<()> {
    let frame = Duration::from_secs_f64(1.0 / FRAME_RATE);
    let mut next_frame = Instant::now() + frame;

    loop {
        let now = Instant::now();
        if now >= next_frame {
            // Skip frames we slept through instead of bursting them
            next_frame = (next_frame + frame).max(now);
            if tx.send(Event::Tick(now)).is_err() {
                return Ok(());
            }
        }

        let wait = next_frame.saturating_duration_since(Instant::now());
        if !event::poll(wait).wrap_err("failed to poll for crossterm events")? {
            continue;
        }

        let event = match event::read().wrap_err("failed to read crossterm event")? {
            CrosstermEvent::Resize(width, height) => {
                Event::App(AppEvent::TerminalResize(width, height))
            }
            other => Event::Crossterm(other),
        };
        if tx.send(event).is_err() {
            return Ok(());
        }
    }
}
