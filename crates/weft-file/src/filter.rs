//! Acceptance filters deciding which discovered entries become messages.
//!
//! Filters compose into a [`FilterChain`]: an ordered logical AND with
//! short-circuit. An entry must satisfy every filter, and a filter is only
//! consulted when all filters before it accepted. The two filters every
//! polling assembly uses are [`PatternFilter`] (glob on the file name) and
//! [`AcceptOnceFilter`] (process-lifetime dedup).

use std::collections::HashSet;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::entry::FileEntry;
use crate::error::{SourceError, SourceResult};

/// A predicate over a candidate directory entry.
///
/// Implementations may be stateful; [`AcceptOnceFilter`] records every entry
/// it accepts.
pub trait EntryFilter: Send + Sync {
    /// Returns `true` if the entry should pass this filter.
    fn accept(&self, entry: &FileEntry) -> bool;
}

// ============================================================================
// Pattern Filter
// ============================================================================

/// Accepts entries whose file name matches a glob pattern (e.g. `*.txt`).
#[derive(Debug)]
pub struct PatternFilter {
    pattern: glob::Pattern,
}

impl PatternFilter {
    /// Compiles the glob pattern.
    ///
    /// # Errors
    ///
    /// [`SourceError::Pattern`] if the pattern is not valid glob syntax.
    pub fn new(pattern: &str) -> SourceResult<Self> {
        let compiled = glob::Pattern::new(pattern).map_err(|e| SourceError::Pattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { pattern: compiled })
    }
}

impl EntryFilter for PatternFilter {
    fn accept(&self, entry: &FileEntry) -> bool {
        self.pattern.matches(&entry.file_name())
    }
}

// ============================================================================
// Accept-Once Filter
// ============================================================================

/// Accepts each entry identity exactly once for the lifetime of the process.
///
/// The identity is the entry path. The set grows monotonically and is never
/// pruned: a file that reappears under a previously-seen path, even with
/// new contents, is not reprocessed.
#[derive(Default)]
pub struct AcceptOnceFilter {
    seen: Mutex<HashSet<PathBuf>>,
}

impl AcceptOnceFilter {
    /// Creates a filter with an empty identity set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of identities recorded so far.
    pub fn seen_count(&self) -> usize {
        self.seen.lock().len()
    }
}

impl EntryFilter for AcceptOnceFilter {
    fn accept(&self, entry: &FileEntry) -> bool {
        self.seen.lock().insert(entry.path().to_path_buf())
    }
}

// ============================================================================
// Filter Chain
// ============================================================================

/// An ordered AND-composition of [`EntryFilter`]s.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn EntryFilter>>,
}

impl FilterChain {
    /// Creates an empty chain, which accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a filter (builder style).
    pub fn with(mut self, filter: impl EntryFilter + 'static) -> Self {
        self.push(filter);
        self
    }

    /// Appends a filter.
    pub fn push(&mut self, filter: impl EntryFilter + 'static) {
        self.filters.push(Box::new(filter));
    }

    /// Moves every filter out of `other` onto the end of this chain.
    pub fn append(&mut self, other: &mut FilterChain) {
        self.filters.append(&mut other.filters);
    }

    /// Returns `true` if every filter accepts the entry.
    ///
    /// Evaluation short-circuits: filters after the first rejection are not
    /// consulted, so a stateful filter never records an entry an earlier
    /// filter rejected.
    pub fn accept(&self, entry: &FileEntry) -> bool {
        self.filters.iter().all(|filter| filter.accept(entry))
    }

    /// Number of filters in the chain.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns `true` if the chain holds no filters.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_pattern_filter_matches_glob() {
        let filter = PatternFilter::new("*.txt").unwrap();
        assert!(filter.accept(&FileEntry::new("/watch/a.txt")));
        assert!(!filter.accept(&FileEntry::new("/watch/a.md")));
        assert!(!filter.accept(&FileEntry::new("/watch/txt")));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err = PatternFilter::new("[").unwrap_err();
        assert!(matches!(err, SourceError::Pattern { .. }));
    }

    #[test]
    fn test_accept_once_dedups_by_path() {
        let filter = AcceptOnceFilter::new();
        let entry = FileEntry::new("/watch/a.txt");

        assert!(filter.accept(&entry));
        assert!(!filter.accept(&entry));
        assert!(filter.accept(&FileEntry::new("/watch/b.txt")));
        assert_eq!(filter.seen_count(), 2);
    }

    struct Counting(Arc<AtomicUsize>);

    impl EntryFilter for Counting {
        fn accept(&self, _entry: &FileEntry) -> bool {
            self.0.fetch_add(1, Ordering::SeqCst);
            true
        }
    }

    #[test]
    fn test_chain_short_circuits_after_rejection() {
        let consulted = Arc::new(AtomicUsize::new(0));
        let mut chain = FilterChain::new();
        chain.push(PatternFilter::new("*.txt").unwrap());
        chain.push(Counting(Arc::clone(&consulted)));

        assert!(!chain.accept(&FileEntry::new("/watch/skip.md")));
        assert_eq!(consulted.load(Ordering::SeqCst), 0);

        assert!(chain.accept(&FileEntry::new("/watch/take.txt")));
        assert_eq!(consulted.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_chain_accepts_everything() {
        let chain = FilterChain::new();
        assert!(chain.accept(&FileEntry::new("/watch/anything")));
    }
}
