//! Search command implementation.

use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::transport::ConsoleTransport;
use anyhow::Result;

/// Run the search command: list matches, read one pick from stdin, play it.
pub async fn run_search(pattern: &str, settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let transport = ConsoleTransport::new();

    orchestrator.run_search(pattern, &transport).await?;
    Ok(())
}
