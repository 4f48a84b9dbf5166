//! Playback dispatch for Trall.
//!
//! Given a selected catalog entry, decide how to hand it to the destination
//! transport. Most transports take a direct file reference; a narrowband
//! transport needs the raw audio resampled to fixed-rate mono PCM and then
//! pushed through a voice codec before delivery. The resample and encode
//! steps are optional collaborators: when they are absent or fail, the
//! dispatch reports `PlaybackFailed` instead of crashing the invocation.

mod ffmpeg;

pub use ffmpeg::{FfmpegAmrEncoder, FfmpegResampler};

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::{Result, TrallError};
use crate::transport::{AudioPayload, AudioProfile, MessageHandle, MessageTransport};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Trait for the external resample step (raw audio to fixed-rate PCM).
#[async_trait]
pub trait Resampler: Send + Sync {
    /// Convert `audio` to signed 16-bit little-endian PCM at the given
    /// sample rate and channel count.
    async fn resample(&self, audio: &[u8], rate: u32, channels: u32) -> Result<Vec<u8>>;
}

/// Trait for the external narrowband encode step (PCM to a voice codec).
#[async_trait]
pub trait NarrowbandEncoder: Send + Sync {
    /// Encode s16le PCM at `sample_rate` into the codec's container format.
    async fn encode(&self, pcm: &[u8], sample_rate: u32) -> Result<Vec<u8>>;

    /// MIME tag attached to the delivered buffer.
    fn mime(&self) -> &str;
}

/// Routes a selected file to a transport, transcoding when required.
pub struct PlaybackDispatcher {
    catalog: Catalog,
    resampler: Option<Arc<dyn Resampler>>,
    encoder: Option<Arc<dyn NarrowbandEncoder>>,
    sample_rate: u32,
    channels: u32,
}

impl PlaybackDispatcher {
    pub fn new(catalog: Catalog, sample_rate: u32, channels: u32) -> Self {
        Self {
            catalog,
            resampler: None,
            encoder: None,
            sample_rate,
            channels,
        }
    }

    /// Attach a resample collaborator.
    pub fn with_resampler(mut self, resampler: Arc<dyn Resampler>) -> Self {
        self.resampler = Some(resampler);
        self
    }

    /// Attach a narrowband encode collaborator.
    pub fn with_encoder(mut self, encoder: Arc<dyn NarrowbandEncoder>) -> Self {
        self.encoder = Some(encoder);
        self
    }

    /// Deliver `entry` to `transport`.
    ///
    /// `status` is the handle of a previously sent "sending..." notice; it is
    /// deleted best-effort after a successful delivery and any cleanup
    /// failure is swallowed.
    pub async fn dispatch(
        &self,
        entry: &CatalogEntry,
        transport: &dyn MessageTransport,
        status: Option<&MessageHandle>,
    ) -> Result<MessageHandle> {
        let path = self.catalog.resolve(entry);

        let payload = match transport.audio_profile() {
            AudioProfile::Any => AudioPayload::File(path),
            AudioProfile::Narrowband => match self.narrowband_payload(&path).await {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("narrowband pipeline failed for {}: {}", path.display(), e);
                    return Err(TrallError::PlaybackFailed(e.to_string()));
                }
            },
        };

        let handle = match transport.send_audio(payload).await {
            Ok(handle) => handle,
            Err(e) => {
                warn!("audio delivery failed for {}: {}", entry.raw_name, e);
                return Err(TrallError::PlaybackFailed(e.to_string()));
            }
        };

        if let Some(status) = status {
            if let Err(e) = transport.delete_message(status).await {
                debug!("status message cleanup failed (ignored): {}", e);
            }
        }

        Ok(handle)
    }

    /// Read, resample and encode a file for a narrowband transport.
    async fn narrowband_payload(&self, path: &std::path::Path) -> Result<AudioPayload> {
        let resampler = self
            .resampler
            .as_ref()
            .ok_or_else(|| TrallError::PlaybackFailed("no resampler configured".to_string()))?;
        let encoder = self
            .encoder
            .as_ref()
            .ok_or_else(|| TrallError::PlaybackFailed("no encoder configured".to_string()))?;

        let audio = tokio::fs::read(path).await?;
        let pcm = resampler
            .resample(&audio, self.sample_rate, self.channels)
            .await?;
        let encoded = encoder.encode(&pcm, self.sample_rate).await?;
        debug!(
            "encoded {} ({} -> {} bytes, {})",
            path.display(),
            audio.len(),
            encoded.len(),
            encoder.mime()
        );

        Ok(AudioPayload::Encoded {
            data: encoded,
            mime: encoder.mime().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{ChannelTransport, TransportEvent};
    use std::time::Duration;

    struct FakeResampler;

    #[async_trait]
    impl Resampler for FakeResampler {
        async fn resample(&self, audio: &[u8], _rate: u32, _channels: u32) -> Result<Vec<u8>> {
            Ok(audio.to_vec())
        }
    }

    struct FakeEncoder;

    #[async_trait]
    impl NarrowbandEncoder for FakeEncoder {
        async fn encode(&self, pcm: &[u8], _sample_rate: u32) -> Result<Vec<u8>> {
            let mut out = b"#!AMR\n".to_vec();
            out.extend_from_slice(pcm);
            Ok(out)
        }

        fn mime(&self) -> &str {
            "audio/amr"
        }
    }

    fn entry(name: &str) -> CatalogEntry {
        CatalogEntry {
            raw_name: name.to_string(),
            display_name: name.rsplit_once('.').map(|(s, _)| s.to_string()).unwrap(),
        }
    }

    #[tokio::test]
    async fn direct_profile_gets_file_reference() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::new(dir.path());
        let dispatcher = PlaybackDispatcher::new(catalog, 8000, 1);
        let (transport, mut remote) = ChannelTransport::pair(AudioProfile::Any);

        dispatcher
            .dispatch(&entry("a.mp3"), &transport, None)
            .await
            .unwrap();

        match remote.next_event().await.unwrap() {
            TransportEvent::Audio { payload, .. } => {
                assert_eq!(payload, AudioPayload::File(dir.path().join("a.mp3")));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn narrowband_profile_goes_through_both_steps() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.mp3"), b"rawbytes").unwrap();
        let dispatcher = PlaybackDispatcher::new(Catalog::new(dir.path()), 8000, 1)
            .with_resampler(Arc::new(FakeResampler))
            .with_encoder(Arc::new(FakeEncoder));
        let (transport, mut remote) = ChannelTransport::pair(AudioProfile::Narrowband);

        dispatcher
            .dispatch(&entry("a.mp3"), &transport, None)
            .await
            .unwrap();

        match remote.next_event().await.unwrap() {
            TransportEvent::Audio { payload, .. } => match payload {
                AudioPayload::Encoded { data, mime } => {
                    assert_eq!(mime, "audio/amr");
                    assert_eq!(data, b"#!AMR\nrawbytes".to_vec());
                }
                other => panic!("unexpected payload: {:?}", other),
            },
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_collaborators_fail_gracefully() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.mp3"), b"rawbytes").unwrap();
        let dispatcher = PlaybackDispatcher::new(Catalog::new(dir.path()), 8000, 1);
        let (transport, _remote) = ChannelTransport::pair(AudioProfile::Narrowband);

        let err = dispatcher
            .dispatch(&entry("a.mp3"), &transport, None)
            .await
            .unwrap_err();
        assert!(matches!(err, TrallError::PlaybackFailed(_)));
    }

    #[tokio::test]
    async fn unreadable_file_is_playback_failure_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = PlaybackDispatcher::new(Catalog::new(dir.path()), 8000, 1)
            .with_resampler(Arc::new(FakeResampler))
            .with_encoder(Arc::new(FakeEncoder));
        let (transport, _remote) = ChannelTransport::pair(AudioProfile::Narrowband);

        let err = dispatcher
            .dispatch(&entry("missing.mp3"), &transport, None)
            .await
            .unwrap_err();
        assert!(matches!(err, TrallError::PlaybackFailed(_)));
    }

    #[tokio::test]
    async fn status_message_is_deleted_after_delivery() {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = PlaybackDispatcher::new(Catalog::new(dir.path()), 8000, 1);
        let (transport, mut remote) = ChannelTransport::pair(AudioProfile::Any);

        let status = transport.send_text("Sending...").await.unwrap();
        remote.next_event().await.unwrap();

        dispatcher
            .dispatch(&entry("a.mp3"), &transport, Some(&status))
            .await
            .unwrap();

        let events = remote.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, TransportEvent::Deleted { handle } if *handle == status)));
    }

    #[tokio::test]
    async fn status_cleanup_failure_is_swallowed() {
        struct DropDeletes {
            inner: ChannelTransport,
        }

        #[async_trait]
        impl MessageTransport for DropDeletes {
            fn audio_profile(&self) -> AudioProfile {
                self.inner.audio_profile()
            }
            async fn send_text(&self, text: &str) -> Result<MessageHandle> {
                self.inner.send_text(text).await
            }
            async fn send_audio(&self, payload: AudioPayload) -> Result<MessageHandle> {
                self.inner.send_audio(payload).await
            }
            async fn await_reply(&self, timeout: Duration) -> Result<Option<String>> {
                self.inner.await_reply(timeout).await
            }
            async fn delete_message(&self, _handle: &MessageHandle) -> Result<()> {
                Err(TrallError::Transport("deletion unsupported".to_string()))
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let dispatcher = PlaybackDispatcher::new(Catalog::new(dir.path()), 8000, 1);
        let (inner, _remote) = ChannelTransport::pair(AudioProfile::Any);
        let transport = DropDeletes { inner };

        let status = MessageHandle(42);
        // Delivery must still succeed even though cleanup errors.
        dispatcher
            .dispatch(&entry("a.mp3"), &transport, Some(&status))
            .await
            .unwrap();
    }
}
