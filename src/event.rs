use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub enum InputEvent {
    Line(String),
    Tick,
    Eof,
}

/// Feeds stdin lines and periodic ticks into one channel so the driver loop
/// can wait on both.
pub struct EventHandler {
    rx: mpsc::Receiver<InputEvent>,
    _tx: mpsc::Sender<InputEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let _tx = tx.clone();

        let line_tx = tx.clone();
        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line_tx.send(InputEvent::Line(line)).is_err() {
                    return;
                }
            }
            let _ = line_tx.send(InputEvent::Eof);
        });

        thread::spawn(move || {
            loop {
                thread::sleep(tick_rate);
                if tx.send(InputEvent::Tick).is_err() {
                    return;
                }
            }
        });

        Self { rx, _tx }
    }

    pub fn next(&self) -> anyhow::Result<InputEvent> {
        Ok(self.rx.recv()?)
    }
}
