use std::sync::Arc;

use tokio::sync::broadcast::{Receiver, Sender};
use tokio::sync::Mutex;

/// Broadcasts the end-of-run signal to every virtual user.
///
/// The orchestrator arms a timer for the configured run duration and calls [DeadlineHandle::expire]
/// when it fires. Virtual users only observe the signal between iterations, so work that is in
/// flight when the deadline passes is allowed to finish.
#[derive(Debug, Clone)]
pub struct DeadlineHandle {
    sender: Sender<()>,
}

impl Default for DeadlineHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl DeadlineHandle {
    pub fn new() -> Self {
        Self {
            sender: tokio::sync::broadcast::channel(1).0,
        }
    }

    pub fn expire(&self) {
        if let Err(e) = self.sender.send(()) {
            // Will fail if nobody is listening for the deadline, in which case the log message
            // can be ignored.
            log::warn!("Failed to send deadline signal: {e:?}");
        }
    }

    pub fn new_listener(&self) -> DeadlineListener {
        DeadlineListener::new(self.sender.subscribe())
    }
}

#[derive(Clone, Debug)]
pub struct DeadlineListener {
    receiver: Arc<Mutex<Receiver<()>>>,
}

impl DeadlineListener {
    pub(crate) fn new(receiver: Receiver<()>) -> Self {
        Self {
            receiver: Arc::new(Mutex::new(receiver)),
        }
    }

    /// Point in time check whether the run deadline has passed. Once this returns true the caller
    /// must stop starting new work so that the run can wind down.
    pub fn is_expired(&mut self) -> bool {
        match self.receiver.try_lock() {
            Ok(mut guard) => {
                match guard.try_recv() {
                    Ok(_) => true,
                    Err(tokio::sync::broadcast::error::TryRecvError::Closed) => true,
                    // If the receiver is empty or lagged then the deadline has not passed.
                    Err(_) => false,
                }
            }
            Err(_) => false,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listener_sees_expiry_once_signalled() {
        let handle = DeadlineHandle::new();
        let mut listener = handle.new_listener();

        assert!(!listener.is_expired());
        handle.expire();
        assert!(listener.is_expired());
    }

    #[tokio::test]
    async fn listeners_created_before_expiry_all_observe_it() {
        let handle = DeadlineHandle::new();
        let mut first = handle.new_listener();
        let mut second = handle.new_listener();

        handle.expire();

        assert!(first.is_expired());
        assert!(second.is_expired());
    }
}
