//! Channel-backed message transport.
//!
//! An in-process transport built on tokio channels. The embedding side holds
//! a [`ChannelRemote`] to observe outgoing messages and feed replies in; the
//! core sees an ordinary [`MessageTransport`]. Used by the test suite and by
//! anyone wiring Trall into a larger chat frontend.

use super::{AudioPayload, AudioProfile, MessageHandle, MessageTransport};
use crate::error::{Result, TrallError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

/// Something the core sent through the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Text {
        handle: MessageHandle,
        text: String,
    },
    Audio {
        handle: MessageHandle,
        payload: AudioPayload,
    },
    Deleted {
        handle: MessageHandle,
    },
}

/// In-process transport half handed to the core.
pub struct ChannelTransport {
    profile: AudioProfile,
    events: mpsc::UnboundedSender<TransportEvent>,
    replies: Mutex<mpsc::UnboundedReceiver<String>>,
    next_id: AtomicU64,
}

/// Remote half held by the embedding side.
pub struct ChannelRemote {
    events: mpsc::UnboundedReceiver<TransportEvent>,
    replies: mpsc::UnboundedSender<String>,
}

impl ChannelTransport {
    /// Create a connected transport/remote pair.
    pub fn pair(profile: AudioProfile) -> (Self, ChannelRemote) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();

        let transport = Self {
            profile,
            events: events_tx,
            replies: Mutex::new(replies_rx),
            next_id: AtomicU64::new(1),
        };
        let remote = ChannelRemote {
            events: events_rx,
            replies: replies_tx,
        };
        (transport, remote)
    }

    fn next_handle(&self) -> MessageHandle {
        MessageHandle(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn emit(&self, event: TransportEvent) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| TrallError::Transport("remote side closed".to_string()))
    }
}

impl ChannelRemote {
    /// Feed a reply into the transport, as if the user had typed it.
    pub fn reply(&self, text: impl Into<String>) {
        let _ = self.replies.send(text.into());
    }

    /// Receive the next outgoing event, if the transport is still alive.
    pub async fn next_event(&mut self) -> Option<TransportEvent> {
        self.events.recv().await
    }

    /// Drain every event sent so far without waiting.
    pub fn drain_events(&mut self) -> Vec<TransportEvent> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            out.push(event);
        }
        out
    }
}

#[async_trait]
impl MessageTransport for ChannelTransport {
    fn audio_profile(&self) -> AudioProfile {
        self.profile
    }

    async fn send_text(&self, text: &str) -> Result<MessageHandle> {
        let handle = self.next_handle();
        self.emit(TransportEvent::Text {
            handle: handle.clone(),
            text: text.to_string(),
        })?;
        Ok(handle)
    }

    async fn send_audio(&self, payload: AudioPayload) -> Result<MessageHandle> {
        let handle = self.next_handle();
        self.emit(TransportEvent::Audio {
            handle: handle.clone(),
            payload,
        })?;
        Ok(handle)
    }

    async fn await_reply(&self, timeout: Duration) -> Result<Option<String>> {
        let mut replies = self.replies.lock().await;
        match tokio::time::timeout(timeout, replies.recv()).await {
            Err(_) => Ok(None),
            Ok(reply) => Ok(reply),
        }
    }

    async fn delete_message(&self, handle: &MessageHandle) -> Result<()> {
        self.emit(TransportEvent::Deleted {
            handle: handle.clone(),
        })
    }
}
