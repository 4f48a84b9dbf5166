//! ffmpeg-backed resample and narrowband encode collaborators.
//!
//! Both steps shell out to ffmpeg through scratch files. ffmpeg needs a
//! seekable input to probe arbitrary container formats, so the buffers are
//! staged in a per-call temp directory that cleans itself up on drop.

use super::{NarrowbandEncoder, Resampler};
use crate::error::{Result, TrallError};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

async fn run_ffmpeg(args: Vec<String>, what: &str) -> Result<()> {
    let result = Command::new("ffmpeg")
        .args(&args)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(TrallError::PlaybackFailed(format!("{} failed: {}", what, err)))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(TrallError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(TrallError::PlaybackFailed(format!("{} error: {}", what, e))),
    }
}

fn arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Resampler that shells out to ffmpeg, producing s16le PCM.
pub struct FfmpegResampler;

#[async_trait]
impl Resampler for FfmpegResampler {
    async fn resample(&self, audio: &[u8], rate: u32, channels: u32) -> Result<Vec<u8>> {
        let scratch = tempfile::tempdir()?;
        let src = scratch.path().join("in");
        let dst = scratch.path().join("out.pcm");
        tokio::fs::write(&src, audio).await?;

        debug!("resampling {} bytes to {} Hz / {} ch", audio.len(), rate, channels);

        run_ffmpeg(
            vec![
                "-i".into(), arg(&src),
                "-f".into(), "s16le".into(),
                "-acodec".into(), "pcm_s16le".into(),
                "-ar".into(), rate.to_string(),
                "-ac".into(), channels.to_string(),
                "-y".into(),
                "-loglevel".into(), "error".into(),
                arg(&dst),
            ],
            "resample",
        )
        .await?;

        Ok(tokio::fs::read(&dst).await?)
    }
}

/// Narrowband encoder producing AMR-NB, the 8 kHz mono voice codec.
pub struct FfmpegAmrEncoder;

#[async_trait]
impl NarrowbandEncoder for FfmpegAmrEncoder {
    async fn encode(&self, pcm: &[u8], sample_rate: u32) -> Result<Vec<u8>> {
        let scratch = tempfile::tempdir()?;
        let src = scratch.path().join("in.pcm");
        let dst = scratch.path().join("out.amr");
        tokio::fs::write(&src, pcm).await?;

        run_ffmpeg(
            vec![
                "-f".into(), "s16le".into(),
                "-ar".into(), sample_rate.to_string(),
                "-ac".into(), "1".into(),
                "-i".into(), arg(&src),
                // AMR-NB only takes 8 kHz mono input.
                "-ar".into(), "8000".into(),
                "-ac".into(), "1".into(),
                "-c:a".into(), "libopencore_amrnb".into(),
                "-y".into(),
                "-loglevel".into(), "error".into(),
                arg(&dst),
            ],
            "narrowband encode",
        )
        .await?;

        Ok(tokio::fs::read(&dst).await?)
    }

    fn mime(&self) -> &str {
        "audio/amr"
    }
}
