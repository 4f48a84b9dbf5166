//! Trall - a chat-style jukebox for a local audio catalog.
//!
//! The name "Trall" comes from the Norwegian word for humming a tune.
//!
//! # Overview
//!
//! Trall lets you:
//! - Search a directory of audio files by name and pick a result to play
//! - Deliver the pick either as a direct file or re-encoded for a
//!   narrowband voice transport
//! - Add new files to the catalog by streaming them from a direct URL,
//!   with magic-byte validation before anything touches disk
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `catalog` - Directory listing, filtering and ordering
//! - `session` - The one-shot numbered-list selection exchange
//! - `playback` - Delivery of a selected file, with optional transcoding
//! - `fetch` - Remote resource probing and streaming
//! - `ingest` - The streaming upload pipeline
//! - `transport` - Message transport abstraction (console, channel)
//! - `orchestrator` - Invocation boundary wiring it all together
//!
//! # Example
//!
//! ```rust,no_run
//! use trall::config::Settings;
//! use trall::orchestrator::Orchestrator;
//! use trall::transport::ConsoleTransport;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!     let transport = ConsoleTransport::new();
//!
//!     orchestrator.run_search("OTHERWORLDLY", &transport).await?;
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod ingest;
pub mod orchestrator;
pub mod playback;
pub mod session;
pub mod transport;

pub use error::{Result, TrallError};
