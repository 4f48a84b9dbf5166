//! Invocation boundary for Trall.
//!
//! The orchestrator wires the catalog, session, dispatcher and ingest
//! pipeline together and is the one place where the error taxonomy is
//! recovered: every failure below this point is logged with its cause and
//! turned into a short user-facing notice. Each call is one independent
//! logical task; nothing here is shared between concurrent invocations
//! except the catalog directory itself.

use crate::catalog::Catalog;
use crate::config::Settings;
use crate::error::Result;
use crate::fetch::{HttpFetcher, RemoteFetcher};
use crate::ingest::{IngestPipeline, IngestTask};
use crate::playback::{FfmpegAmrEncoder, FfmpegResampler, PlaybackDispatcher};
use crate::session::{render_results, Outcome, SelectionSession};
use crate::transport::MessageTransport;
use std::sync::Arc;
use tracing::{info, warn};

/// Coordinates one search/select/play or upload invocation.
pub struct Orchestrator {
    settings: Settings,
    catalog: Catalog,
    dispatcher: PlaybackDispatcher,
    ingest: IngestPipeline,
}

impl Orchestrator {
    /// Create an orchestrator with the default collaborators: HTTP fetch
    /// and the ffmpeg-backed narrowband pipeline.
    pub fn new(settings: Settings) -> Result<Self> {
        let catalog = Catalog::new(settings.catalog_dir());
        let dispatcher = PlaybackDispatcher::new(
            catalog.clone(),
            settings.playback.sample_rate,
            settings.playback.channels,
        )
        .with_resampler(Arc::new(FfmpegResampler))
        .with_encoder(Arc::new(FfmpegAmrEncoder));
        let ingest = IngestPipeline::new(
            settings.catalog_dir(),
            settings.upload.clone(),
            Arc::new(HttpFetcher::new()),
        );

        Ok(Self {
            settings,
            catalog,
            dispatcher,
            ingest,
        })
    }

    /// Swap the remote fetcher, for embedders that bring their own transport
    /// stack.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn RemoteFetcher>) -> Self {
        self.ingest = IngestPipeline::new(
            self.settings.catalog_dir(),
            self.settings.upload.clone(),
            fetcher,
        );
        self
    }

    /// The catalog this orchestrator reads from.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Search the catalog, run the selection exchange and play the pick.
    ///
    /// Errors from the taxonomy are recovered here into a short notice; the
    /// returned error is reserved for a dead transport.
    pub async fn run_search(&self, pattern: &str, transport: &dyn MessageTransport) -> Result<()> {
        if let Err(e) = self.search_and_play(pattern, transport).await {
            warn!("search invocation failed: {}", e);
            transport.send_text(e.user_message()).await?;
        }
        Ok(())
    }

    async fn search_and_play(&self, pattern: &str, transport: &dyn MessageTransport) -> Result<()> {
        let results = self.catalog.search(pattern).await?;

        let timeout = self.settings.reply_timeout();
        let cancel = &self.settings.session.cancel_keyword;
        let Some(listing) = render_results(&results, timeout, cancel) else {
            transport.send_text("Nothing found").await?;
            return Ok(());
        };
        transport.send_text(&listing).await?;

        let session = SelectionSession::open(results.len(), timeout, cancel.clone());
        match session.await_choice(transport).await? {
            // Silence on timeout is deliberate: the session just ends.
            Outcome::TimedOut => Ok(()),
            Outcome::Cancelled => {
                transport.send_text("Playback cancelled").await?;
                Ok(())
            }
            Outcome::Invalid => {
                transport.send_text("Invalid selection").await?;
                Ok(())
            }
            Outcome::Selected(n) => {
                let entry = &results[n - 1];
                info!("selected {} for playback", entry.raw_name);
                let status = transport.send_text("Sending...").await?;
                self.dispatcher
                    .dispatch(entry, transport, Some(&status))
                    .await?;
                Ok(())
            }
        }
    }

    /// Stream a remote file into the catalog.
    pub async fn run_upload(
        &self,
        url: &str,
        name: Option<String>,
        requester: &str,
        transport: &dyn MessageTransport,
    ) -> Result<()> {
        let task = IngestTask {
            source_url: url.to_string(),
            requested_name: name,
        };

        match self.ingest.run(&task, requester).await {
            Ok(path) => {
                info!("upload by {} committed to {}", requester, path.display());
                transport.send_text("Upload successful").await?;
            }
            Err(e) => {
                warn!("upload invocation failed: {}", e);
                transport.send_text(e.user_message()).await?;
            }
        }
        Ok(())
    }
}
