//! Message transport abstraction for Trall.
//!
//! Provides a trait-based interface for the chat-style surface the jukebox
//! talks through. The core never formats anything fancier than plain text;
//! delivery, reply collection and message deletion all go through this seam.

mod channel;
mod console;

pub use channel::{ChannelRemote, ChannelTransport, TransportEvent};
pub use console::ConsoleTransport;

use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

/// What kind of audio a transport can accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioProfile {
    /// Accepts a direct file reference in any format.
    Any,
    /// Only accepts a narrowband voice codec; audio must be re-encoded.
    Narrowband,
}

/// Opaque handle to a delivered message, usable for later deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHandle(pub u64);

/// Audio delivered to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioPayload {
    /// Direct reference to a file on disk.
    File(PathBuf),
    /// An encoded buffer with an explicit MIME tag.
    Encoded { data: Vec<u8>, mime: String },
}

/// Trait for message transport implementations.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// The audio constraint of this transport.
    fn audio_profile(&self) -> AudioProfile;

    /// Deliver a plain text message.
    async fn send_text(&self, text: &str) -> Result<MessageHandle>;

    /// Deliver an audio payload.
    async fn send_audio(&self, payload: AudioPayload) -> Result<MessageHandle>;

    /// Wait for the next reply, or None if the timeout elapses first.
    async fn await_reply(&self, timeout: Duration) -> Result<Option<String>>;

    /// Delete a previously sent message. Callers treat this as best-effort.
    async fn delete_message(&self, handle: &MessageHandle) -> Result<()>;
}
