//! Remote fetch abstraction for Trall.
//!
//! The ingestion pipeline never talks HTTP directly; it consumes this
//! two-call contract: a metadata-only probe, then a streaming read. The
//! stream is cancelled by dropping it, which aborts the connection, so
//! every early exit in the pipeline releases the transfer automatically.

mod http;

pub use http::HttpFetcher;

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

/// A stream of body chunks from a remote resource.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Metadata from a HEAD-style probe.
#[derive(Debug, Clone, Copy)]
pub struct RemoteMetadata {
    /// Advertised body size, when the server reports one.
    pub content_length: Option<u64>,
}

/// Trait for remote resource access.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// Probe the resource without transferring its body.
    async fn head(&self, url: &str) -> Result<RemoteMetadata>;

    /// Open a streaming read of the resource body.
    async fn stream_get(&self, url: &str) -> Result<ByteStream>;
}
