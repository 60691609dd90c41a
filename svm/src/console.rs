use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

/// Result of waiting for a line of input
#[derive(Debug, PartialEq, Eq)]
pub enum InputEvent {
    Line(String),
    Timeout,
    Closed,
}

/// Line-buffered input delivered over a channel, so the caller can keep
/// checking for signals while it waits.
pub struct Console {
    lines: Receiver<String>,
}

impl Console {
    pub fn new(lines: Receiver<String>) -> Self {
        Self { lines }
    }

    /// Read stdin on a background thread, one line at a time.
    pub fn stdin() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || read_lines(io::stdin().lock(), tx));
        Self::new(rx)
    }

    pub fn poll_line(&self, timeout: Duration) -> InputEvent {
        match self.lines.recv_timeout(timeout) {
            Ok(line) => InputEvent::Line(line),
            Err(RecvTimeoutError::Timeout) => InputEvent::Timeout,
            Err(RecvTimeoutError::Disconnected) => InputEvent::Closed,
        }
    }
}

fn read_lines<R: BufRead>(reader: R, tx: Sender<String>) {
    for line in reader.lines() {
        match line {
            Ok(line) => {
                if tx.send(line).is_err() {
                    break;
                }
            }
            Err(e) => {
                log::warn!("Failed to read input: {e}");
                break;
            }
        }
    }
}
