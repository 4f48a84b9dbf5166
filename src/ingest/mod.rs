//! Streaming upload pipeline for Trall.
//!
//! Walks `PermissionCheck -> SizeProbe -> StreamOpen -> SniffFirstChunk ->
//! {Abort, Commit}`. The first received chunk decides everything: content
//! classification and the destination filename happen before any byte lands
//! on disk, and an abort at any stage drops the in-flight stream (closing
//! the connection) and the temp-file guard (removing partial writes). The
//! remote body is never buffered whole; chunks are written as they arrive.

pub mod sniff;

use crate::config::UploadSettings;
use crate::error::{Result, TrallError};
use crate::fetch::RemoteFetcher;
use futures::StreamExt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// One upload request.
#[derive(Debug, Clone)]
pub struct IngestTask {
    /// Direct URL of the remote audio file.
    pub source_url: String,
    /// Caller-supplied base name. None generates `<uploader>-<millis>`.
    pub requested_name: Option<String>,
}

/// Streams a remote file into the catalog after validating it.
pub struct IngestPipeline {
    target_dir: PathBuf,
    settings: UploadSettings,
    fetcher: Arc<dyn RemoteFetcher>,
}

impl IngestPipeline {
    pub fn new(
        target_dir: impl Into<PathBuf>,
        settings: UploadSettings,
        fetcher: Arc<dyn RemoteFetcher>,
    ) -> Self {
        Self {
            target_dir: target_dir.into(),
            settings,
            fetcher,
        }
    }

    /// Run the pipeline for one task. On success the file is fully written
    /// and visible at the returned path; on any failure no file exists.
    pub async fn run(&self, task: &IngestTask, requester: &str) -> Result<PathBuf> {
        self.check_permission(requester)?;
        self.probe_size(&task.source_url).await?;

        let mut stream = self.fetcher.stream_get(&task.source_url).await?;

        // Classification looks at the first chunk only; anything else aborts
        // the transfer before a file is created.
        let first_chunk = match stream.next().await {
            None => return Err(TrallError::NotAudio),
            Some(Err(e)) => return Err(e),
            Some(Ok(chunk)) => chunk,
        };
        let sniffed = sniff::sniff_audio(&first_chunk).ok_or(TrallError::NotAudio)?;
        debug!("sniffed {} from first chunk ({} bytes)", sniffed.mime, first_chunk.len());

        let base_name = match &task.requested_name {
            Some(name) => name.clone(),
            None => format!("{}-{}", requester, chrono::Utc::now().timestamp_millis()),
        };
        let file_name = format!("{}.{}", base_name, sniffed.ext);
        let final_path = self.target_dir.join(&file_name);

        if final_path.exists() {
            return Err(TrallError::NameCollision(file_name));
        }

        // Commit: spool into a temp file next to the destination, then
        // atomically rename. The guard removes partial writes on any error.
        let mut temp = tempfile::Builder::new()
            .prefix(".trall-upload-")
            .tempfile_in(&self.target_dir)
            .map_err(|e| TrallError::TransferFailed(e.to_string()))?;

        temp.write_all(&first_chunk)
            .map_err(|e| TrallError::TransferFailed(e.to_string()))?;
        let mut written = first_chunk.len() as u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            temp.write_all(&chunk)
                .map_err(|e| TrallError::TransferFailed(e.to_string()))?;
            written += chunk.len() as u64;
        }

        temp.persist_noclobber(&final_path).map_err(|e| {
            if e.error.kind() == std::io::ErrorKind::AlreadyExists {
                // Lost the race to another upload of the same name.
                TrallError::NameCollision(file_name.clone())
            } else {
                TrallError::TransferFailed(e.error.to_string())
            }
        })?;

        info!("ingested {} ({} bytes, {})", file_name, written, sniffed.mime);
        Ok(final_path)
    }

    fn check_permission(&self, requester: &str) -> Result<()> {
        if !self.settings.enabled {
            return Err(TrallError::UploadDisabled);
        }
        // An empty allow-list means everyone may upload.
        if !self.settings.allow_list.is_empty()
            && !self.settings.allow_list.iter().any(|id| id == requester)
        {
            return Err(TrallError::NotAuthorized(requester.to_string()));
        }
        Ok(())
    }

    /// Reject oversized resources before transferring any body byte. Only
    /// applies when a limit is configured and the server advertises a size.
    async fn probe_size(&self, url: &str) -> Result<()> {
        let Some(limit) = self.settings.max_bytes else {
            return Ok(());
        };
        let metadata = self.fetcher.head(url).await?;
        if let Some(advertised) = metadata.content_length {
            if advertised > limit {
                return Err(TrallError::TooLarge { advertised, limit });
            }
        }
        Ok(())
    }
}
