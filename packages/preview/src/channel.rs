//! Message port between the editor and one preview frame instance.
//!
//! Delivery is fire-and-forget. Once the other end is gone (the frame
//! unmounted or reloaded) posted messages are dropped; nothing is queued for
//! the next instance, acknowledged or retried. Order is FIFO per direction.

use crate::message::PreviewMessage;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// One end of a preview channel
#[derive(Debug)]
pub struct FramePort {
    name: &'static str,
    tx: UnboundedSender<PreviewMessage>,
    rx: UnboundedReceiver<PreviewMessage>,
}

/// Connected `(host, frame)` ports
pub fn channel() -> (FramePort, FramePort) {
    let (to_frame, frame_inbox) = mpsc::unbounded_channel();
    let (to_host, host_inbox) = mpsc::unbounded_channel();

    let host = FramePort {
        name: "host",
        tx: to_frame,
        rx: host_inbox,
    };
    let frame = FramePort {
        name: "frame",
        tx: to_host,
        rx: frame_inbox,
    };
    (host, frame)
}

impl FramePort {
    /// Post without waiting; returns whether the message left this port
    pub fn post(&self, message: impl Into<PreviewMessage>) -> bool {
        match self.tx.send(message.into()) {
            Ok(()) => true,
            Err(mpsc::error::SendError(dropped)) => {
                debug!(port = self.name, kind = message_kind(&dropped), "Peer gone, message dropped");
                false
            }
        }
    }

    /// Next inbound message; `None` once the peer is gone and the inbox is drained
    pub async fn recv(&mut self) -> Option<PreviewMessage> {
        self.rx.recv().await
    }

    /// Next inbound message if one is already waiting
    pub fn try_recv(&mut self) -> Option<PreviewMessage> {
        match self.rx.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

fn message_kind(message: &PreviewMessage) -> &'static str {
    match message {
        PreviewMessage::Update(_) => "PREVIEW_UPDATE",
        PreviewMessage::Ready => "PREVIEW_READY",
    }
}
