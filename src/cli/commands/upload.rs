//! Upload command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::transport::ConsoleTransport;
use anyhow::Result;

/// Run the upload command: stream a remote file into the catalog.
pub async fn run_upload(
    url: &str,
    name: Option<String>,
    uploader: Option<String>,
    settings: Settings,
) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let transport = ConsoleTransport::new();
    let uploader = uploader.unwrap_or_else(|| "local".to_string());

    let spinner = Output::spinner("Uploading...");
    let result = orchestrator
        .run_upload(url, name, &uploader, &transport)
        .await;
    spinner.finish_and_clear();

    result?;
    Ok(())
}
