//! 操作员停止信号 (Operator stop signal)
//!
//! A single stop event ends capture; it is observed at the top of each cycle.
//! The signal travels over a channel so the watcher thread shares no state
//! with the loop.

use std::io::BufRead;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};

/// Sending half, for tests and embedding callers.
pub struct StopTrigger {
    tx: Sender<()>,
}

impl StopTrigger {
    pub fn stop(&self) {
        let _ = self.tx.try_send(());
    }
}

/// Receiving half. Latches once observed: after `requested` first returns
/// true it keeps returning true.
pub struct StopSignal {
    rx: Receiver<()>,
    latched: bool,
}

impl StopSignal {
    pub fn requested(&mut self) -> bool {
        if self.latched {
            return true;
        }
        match self.rx.try_recv() {
            Ok(()) => {
                self.latched = true;
                true
            }
            // a hung-up watcher is not a stop request
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => false,
        }
    }

    /// Stop signal driven by stdin: fires on a `q` line. EOF ends the watcher
    /// without firing, so a piped or detached stdin never aborts a run.
    pub fn from_stdin() -> Self {
        let (trigger, signal) = stop_channel();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(text) if text.trim().eq_ignore_ascii_case("q") => {
                        trigger.stop();
                        break;
                    }
                    Ok(_) => continue,
                    Err(_) => break,
                }
            }
        });
        signal
    }
}

/// A connected trigger/signal pair.
pub fn stop_channel() -> (StopTrigger, StopSignal) {
    let (tx, rx) = bounded(1);
    (StopTrigger { tx }, StopSignal { rx, latched: false })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untriggered_is_not_requested() {
        let (_trigger, mut signal) = stop_channel();
        assert!(!signal.requested());
        assert!(!signal.requested());
    }

    #[test]
    fn test_trigger_latches() {
        let (trigger, mut signal) = stop_channel();
        trigger.stop();
        assert!(signal.requested());
        // stays stopped even though the channel drained
        assert!(signal.requested());
    }

    #[test]
    fn test_dropped_trigger_is_not_a_stop() {
        let (trigger, mut signal) = stop_channel();
        drop(trigger);
        assert!(!signal.requested());
    }

    #[test]
    fn test_double_stop_is_harmless() {
        let (trigger, mut signal) = stop_channel();
        trigger.stop();
        trigger.stop();
        assert!(signal.requested());
    }
}
