//! Change notification for session observers.

use clasher_core::session::SessionState;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Fan-out of session snapshots to every subscribed receiver.
///
/// Senders whose receiver was dropped are pruned on the next broadcast.
#[derive(Default)]
pub(crate) struct SessionObservers {
    senders: Vec<UnboundedSender<SessionState>>,
}

impl SessionObservers {
    pub(crate) fn subscribe(&mut self) -> UnboundedReceiver<SessionState> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.push(tx);
        rx
    }

    pub(crate) fn broadcast(&mut self, state: &SessionState) {
        self.senders.retain(|tx| tx.send(state.clone()).is_ok());
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.senders.len()
    }
}
