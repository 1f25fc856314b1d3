//! In-process command channel adapter.
//!
//! Bridges the dispatch loop to whatever transport task owns the network
//! socket: the transport pushes raw inbound messages through the
//! [`TransportHandle`] and drains structured replies from it, while the
//! engine side implements [`CommandChannelPort`] over a pair of mpsc
//! queues. Keeps the single-threaded dispatch invariant — messages are
//! handled one at a time in arrival order.

use std::sync::mpsc::{channel, Receiver, Sender};

use crate::app::events::CommandReply;
use crate::app::ports::CommandChannelPort;

/// Engine-side endpoint, polled by the dispatch loop.
pub struct QueueChannel {
    inbox: Receiver<String>,
    outbox: Sender<CommandReply>,
}

/// Transport-side endpoint.
pub struct TransportHandle {
    /// Push one raw inbound command message.
    pub messages: Sender<String>,
    /// Drain replies for publication on the status topic.
    pub replies: Receiver<CommandReply>,
}

/// Create a connected channel/handle pair.
pub fn queue_channel() -> (QueueChannel, TransportHandle) {
    let (msg_tx, msg_rx) = channel();
    let (reply_tx, reply_rx) = channel();
    (
        QueueChannel {
            inbox: msg_rx,
            outbox: reply_tx,
        },
        TransportHandle {
            messages: msg_tx,
            replies: reply_rx,
        },
    )
}

impl CommandChannelPort for QueueChannel {
    fn poll_message(&mut self) -> Option<String> {
        self.inbox.try_recv().ok()
    }

    fn publish_reply(&mut self, reply: &CommandReply) {
        // A gone transport only loses the reply, never the engine state.
        let _ = self.outbox.send(reply.clone());
    }
}
