use std::ops::ControlFlow;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, SystemTime};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

use crate::keymap;
use crate::trainer::{Command, Trainer};

/// Raw input worth waking the app for
#[derive(Clone, Debug)]
pub enum TerminalEvent {
    Key(KeyEvent),
    Resize,
}

/// What the app loop acts on: a trainer command, or just a redraw
/// (resize, timer tick, unbound key)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyorEvent {
    Command(Command),
    Redraw,
}

pub trait TerminalEventSource {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<TerminalEvent, RecvTimeoutError>;
}

/// Reads crossterm events on a background thread
pub struct CrosstermEventSource {
    rx: Receiver<TerminalEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) => TerminalEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => TerminalEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    log::error!("terminal event reader stopped: {e}");
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TerminalEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Events fed through a channel, for driving the app without a terminal
pub struct TestEventSource {
    rx: Receiver<TerminalEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<TerminalEvent>) -> Self {
        Self { rx }
    }
}

impl TerminalEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TerminalEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Turns terminal input into trainer commands, one event at a time
pub struct Runner<E: TerminalEventSource> {
    event_source: E,
    tick: Duration,
}

impl<E: TerminalEventSource> Runner<E> {
    pub fn new(event_source: E, tick: Duration) -> Self {
        Self { event_source, tick }
    }

    /// Blocks up to one tick. Anything that is not a bound key asks for a redraw.
    pub fn step(&self) -> KeyorEvent {
        match self.event_source.recv_timeout(self.tick) {
            Ok(TerminalEvent::Key(key)) => {
                keymap::command_for(key).map_or(KeyorEvent::Redraw, KeyorEvent::Command)
            }
            Ok(TerminalEvent::Resize) | Err(_) => KeyorEvent::Redraw,
        }
    }

    /// Wait for the next event and apply it to `trainer`. Breaks on quit.
    pub fn drive(&self, trainer: &mut Trainer) -> ControlFlow<()> {
        match self.step() {
            KeyorEvent::Command(Command::Quit) => ControlFlow::Break(()),
            KeyorEvent::Command(command) => {
                trainer.handle(command, SystemTime::now());
                ControlFlow::Continue(())
            }
            KeyorEvent::Redraw => ControlFlow::Continue(()),
        }
    }
}
