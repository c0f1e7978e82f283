//! ResourceArc Wrappers
//!
//! Parsed documents stay in Rust memory; Elixir holds an opaque reference.

use crate::config::FingerprintConfig;
use crate::dom::Document;
use crate::fingerprint::Fingerprinter;
use crate::index::FingerprintIndex;
use crate::resolve::LocationPathResolver;
use lru::LruCache;
use rustler::ResourceArc;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// Indexes kept per document, one per requested depth
const INDEX_CACHE_SIZE: usize = 4;

/// A parsed document with everything derived from it
///
/// The document is immutable, so views need no locking. Indexes are built on
/// first use and reused for the same depth.
pub struct DocumentResource {
    pub doc: Document,
    pub config: FingerprintConfig,
    pub resolver: LocationPathResolver,
    indexes: Mutex<LruCache<usize, Arc<FingerprintIndex>>>,
}

impl DocumentResource {
    pub fn new(doc: Document, config: FingerprintConfig) -> Self {
        let resolver = LocationPathResolver::new(config.selector_cache_size);
        let capacity = NonZeroUsize::new(INDEX_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);
        DocumentResource {
            doc,
            config,
            resolver,
            indexes: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn fingerprinter(&self) -> Fingerprinter<'_, Document> {
        Fingerprinter::new(&self.doc, &self.config)
    }

    /// Index at `depth`, built once per depth
    pub fn index(&self, depth: usize) -> Arc<FingerprintIndex> {
        if let Some(index) = self.lock_indexes().get(&depth) {
            return Arc::clone(index);
        }

        // built without holding the lock; two callers may build the same depth
        let index = Arc::new(FingerprintIndex::build(
            &self.fingerprinter(),
            depth,
            self.config.index_kind,
        ));
        self.lock_indexes().put(depth, Arc::clone(&index));
        index
    }

    fn lock_indexes(&self) -> std::sync::MutexGuard<'_, LruCache<usize, Arc<FingerprintIndex>>> {
        self.indexes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[rustler::resource_impl]
impl rustler::Resource for DocumentResource {}

/// Type alias for document ResourceArc
pub type DocumentRef = ResourceArc<DocumentResource>;
