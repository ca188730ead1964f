//! Thread boundary between frame producers and the dashboard thread.
//!
//! Producers (the parsing front end, or the demo generator) own a
//! [`FrameSender`]; the dashboard drains the matching [`FrameReceiver`] in
//! [`Dashboard::process_incoming`](crate::dashboard::Dashboard::process_incoming).

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use std::time::Duration;

use crate::error::{DashboardError, Result};
use crate::types::Frame;

/// Messages sent from a producer to the dashboard thread.
#[derive(Debug, Clone)]
pub enum FrameMessage {
    /// One decoded frame
    Frame(Frame),
    /// The producer has stopped
    Shutdown,
}

/// Channel capacity for frames (producer → dashboard).
/// 1,000 frames ≈ 10s at 100 Hz.
pub const FRAME_CHANNEL_CAPACITY: usize = 1_000;

/// Create a connected sender/receiver pair
pub fn frame_channel() -> (FrameSender, FrameReceiver) {
    frame_channel_with_capacity(FRAME_CHANNEL_CAPACITY)
}

pub fn frame_channel_with_capacity(capacity: usize) -> (FrameSender, FrameReceiver) {
    let (tx, rx) = bounded(capacity);
    (FrameSender { tx }, FrameReceiver { rx })
}

/// Producer-side handle
#[derive(Debug, Clone)]
pub struct FrameSender {
    tx: Sender<FrameMessage>,
}

impl FrameSender {
    /// Send a frame, blocking while the channel is full
    pub fn send(&self, frame: Frame) -> Result<()> {
        self.tx
            .send(FrameMessage::Frame(frame))
            .map_err(|_| DashboardError::Channel("dashboard receiver dropped".to_string()))
    }

    /// Send a frame without blocking.
    ///
    /// Returns `Ok(false)` when the channel is full and the frame was dropped.
    pub fn try_send(&self, frame: Frame) -> Result<bool> {
        match self.tx.try_send(FrameMessage::Frame(frame)) {
            Ok(()) => Ok(true),
            Err(TrySendError::Full(_)) => Ok(false),
            Err(TrySendError::Disconnected(_)) => {
                Err(DashboardError::Channel("dashboard receiver dropped".to_string()))
            }
        }
    }

    /// Tell the dashboard no more frames will follow
    pub fn shutdown(&self) {
        let _ = self.tx.send(FrameMessage::Shutdown);
    }
}

/// Dashboard-side handle
#[derive(Debug)]
pub struct FrameReceiver {
    rx: Receiver<FrameMessage>,
}

impl FrameReceiver {
    /// Drain all pending messages.
    pub fn drain(&self) -> Vec<FrameMessage> {
        let mut msgs = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            msgs.push(msg);
        }
        msgs
    }

    /// Try to receive a single message without blocking.
    pub fn try_recv(&self) -> Option<FrameMessage> {
        self.rx.try_recv().ok()
    }

    /// Wait up to `timeout` for a message.
    ///
    /// Every sender being dropped is reported as [`FrameMessage::Shutdown`].
    pub fn recv_timeout(&self, timeout: Duration) -> Option<FrameMessage> {
        match self.rx.recv_timeout(timeout) {
            Ok(msg) => Some(msg),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(FrameMessage::Shutdown),
        }
    }

    /// Underlying channel, for use in `crossbeam_channel::select!`
    pub fn channel(&self) -> &Receiver<FrameMessage> {
        &self.rx
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
