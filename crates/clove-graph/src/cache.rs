//! Parse memoization across incremental passes.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::parse::parse_source;
use crate::record::{SourceRecord, fingerprint};

/// Memoizes parsed records keyed by request and content fingerprint.
#[derive(Debug, Default)]
pub struct ParseCache {
    entries: FxHashMap<PathBuf, SourceRecord>,
    hits: usize,
    misses: usize,
}

impl ParseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `source`, reusing the cached record when the content is unchanged.
    pub fn parse(&mut self, request: &Path, source: &str) -> SourceRecord {
        let hash = fingerprint(source);
        if let Some(record) = self.entries.get(request) {
            if record.fingerprint == hash && &*record.source == source {
                self.hits += 1;
                trace!(path = %request.display(), "parse cache hit");
                return record.clone();
            }
        }

        self.misses += 1;
        let record = parse_source(request, source);
        self.entries.insert(request.to_path_buf(), record.clone());
        record
    }

    pub fn invalidate(&mut self, request: &Path) -> bool {
        self.entries.remove(request).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }
}
