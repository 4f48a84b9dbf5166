//! Catalog index for Trall.
//!
//! The catalog is a single configured directory treated as the universe of
//! playable audio files. Nothing is cached: every search re-reads the
//! directory, and selection re-resolves the path from the entry name, so a
//! result may go stale between search and playback without breaking anything.

use crate::error::{Result, TrallError};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One playable file in the catalog.
///
/// `display_name` is `raw_name` with the final extension segment stripped;
/// it is what the user searches against and sees in the numbered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Literal directory-listing entry name.
    pub raw_name: String,
    /// `raw_name` without its final `.ext` segment.
    pub display_name: String,
}

impl CatalogEntry {
    fn from_raw(raw_name: String) -> Self {
        let display_name = match raw_name.rfind('.') {
            Some(idx) => raw_name[..idx].to_string(),
            None => raw_name.clone(),
        };
        Self {
            raw_name,
            display_name,
        }
    }
}

/// Read-only view of the configured audio directory.
#[derive(Debug, Clone)]
pub struct Catalog {
    dir: PathBuf,
}

impl Catalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The configured catalog directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Search the catalog for entries whose display name matches `pattern`.
    ///
    /// The pattern is a regular expression matched anywhere in the display
    /// name. Results are sorted ascending by display-name length; ties keep
    /// directory enumeration order. An empty result is not an error.
    pub async fn search(&self, pattern: &str) -> Result<Vec<CatalogEntry>> {
        let regex = Regex::new(pattern)
            .map_err(|e| TrallError::InvalidPattern(e.to_string()))?;

        let mut read_dir = tokio::fs::read_dir(&self.dir).await.map_err(|e| {
            TrallError::DirectoryUnavailable(format!("{}: {}", self.dir.display(), e))
        })?;

        let mut entries = Vec::new();
        while let Some(dir_entry) = read_dir.next_entry().await.map_err(|e| {
            TrallError::DirectoryUnavailable(format!("{}: {}", self.dir.display(), e))
        })? {
            let file_type = match dir_entry.file_type().await {
                Ok(ft) => ft,
                Err(_) => continue,
            };
            if file_type.is_dir() {
                continue;
            }

            let raw_name = match dir_entry.file_name().into_string() {
                Ok(name) => name,
                // Non-UTF-8 names can't be rendered or replied to; skip them.
                Err(_) => continue,
            };

            let entry = CatalogEntry::from_raw(raw_name);
            if regex.is_match(&entry.display_name) {
                entries.push(entry);
            }
        }

        // Stable sort keeps enumeration order on equal lengths.
        entries.sort_by_key(|e| e.display_name.chars().count());

        debug!("search {:?} matched {} entries", pattern, entries.len());
        Ok(entries)
    }

    /// Resolve an entry back to its absolute path inside the catalog.
    pub fn resolve(&self, entry: &CatalogEntry) -> PathBuf {
        self.dir.join(&entry.raw_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_catalog(names: &[&str]) -> (tempfile::TempDir, Catalog) {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let catalog = Catalog::new(dir.path());
        (dir, catalog)
    }

    #[tokio::test]
    async fn matches_filter_and_length_order() {
        let (_dir, catalog) = make_catalog(&["abc.wav", "a.mp3", "ab.mp3", "zzz.flac"]);

        let result = catalog.search("a").await.unwrap();
        let names: Vec<&str> = result.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["a", "ab", "abc"]);
    }

    #[tokio::test]
    async fn match_everything_returns_all_sorted() {
        let (_dir, catalog) = make_catalog(&["abc.wav", "a.mp3", "zz.flac"]);

        let result = catalog.search("").await.unwrap();
        let lengths: Vec<usize> = result
            .iter()
            .map(|e| e.display_name.chars().count())
            .collect();
        assert_eq!(result.len(), 3);
        let mut sorted = lengths.clone();
        sorted.sort_unstable();
        assert_eq!(lengths, sorted);
    }

    #[tokio::test]
    async fn no_match_is_empty_not_error() {
        let (_dir, catalog) = make_catalog(&["a.mp3"]);
        let result = catalog.search("nothing-here").await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn pattern_matches_display_name_not_extension() {
        let (_dir, catalog) = make_catalog(&["song.mp3"]);
        // "mp3" only appears in the stripped extension.
        let result = catalog.search("mp3").await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn name_without_dot_keeps_full_name() {
        let (_dir, catalog) = make_catalog(&["plainname"]);
        let result = catalog.search("plain").await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].display_name, "plainname");
        assert_eq!(result[0].raw_name, "plainname");
    }

    #[tokio::test]
    async fn directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.mp3"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("albums")).unwrap();
        let catalog = Catalog::new(dir.path());

        let result = catalog.search("").await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].raw_name, "a.mp3");
    }

    #[tokio::test]
    async fn invalid_regex_is_caller_error() {
        let (_dir, catalog) = make_catalog(&["a.mp3"]);
        let err = catalog.search("[unclosed").await.unwrap_err();
        assert!(matches!(err, TrallError::InvalidPattern(_)));
    }

    #[tokio::test]
    async fn missing_directory_is_unavailable() {
        let catalog = Catalog::new("/definitely/not/here");
        let err = catalog.search("a").await.unwrap_err();
        assert!(matches!(err, TrallError::DirectoryUnavailable(_)));
    }

    #[tokio::test]
    async fn resolve_joins_raw_name() {
        let (_dir, catalog) = make_catalog(&["a.mp3"]);
        let result = catalog.search("a").await.unwrap();
        let path = catalog.resolve(&result[0]);
        assert_eq!(path, catalog.dir().join("a.mp3"));
    }
}
