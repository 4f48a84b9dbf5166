//! Console-backed message transport.
//!
//! Messages go to stdout and replies are read line-by-line from stdin, which
//! makes the selection exchange usable straight from a terminal.

use super::{AudioPayload, AudioProfile, MessageHandle, MessageTransport};
use crate::error::{Result, TrallError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Transport that talks to the local terminal.
pub struct ConsoleTransport {
    next_id: AtomicU64,
}

impl ConsoleTransport {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
        }
    }

    fn next_handle(&self) -> MessageHandle {
        MessageHandle(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ConsoleTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageTransport for ConsoleTransport {
    fn audio_profile(&self) -> AudioProfile {
        AudioProfile::Any
    }

    async fn send_text(&self, text: &str) -> Result<MessageHandle> {
        println!("{}", text);
        Ok(self.next_handle())
    }

    async fn send_audio(&self, payload: AudioPayload) -> Result<MessageHandle> {
        match payload {
            AudioPayload::File(path) => println!("[audio] {}", path.display()),
            AudioPayload::Encoded { data, mime } => {
                println!("[audio] {} ({} bytes)", mime, data.len())
            }
        }
        Ok(self.next_handle())
    }

    async fn await_reply(&self, timeout: Duration) -> Result<Option<String>> {
        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());

        match tokio::time::timeout(timeout, reader.read_line(&mut line)).await {
            Err(_) => Ok(None),
            Ok(Ok(0)) => Ok(None),
            Ok(Ok(_)) => Ok(Some(line.trim().to_string())),
            Ok(Err(e)) => Err(TrallError::Transport(e.to_string())),
        }
    }

    async fn delete_message(&self, _handle: &MessageHandle) -> Result<()> {
        // A terminal line can't be unsent.
        Ok(())
    }
}
