use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use serde_json::Value;

use storepulse_catalog::RawProduct;

use super::{RecordSource, SourceBatch, SourceConnection, SourceError};

/// In-memory record source.
///
/// Intended for tests/dev. Tracks open connections so callers can check that
/// every load released its connection, and can be switched to unavailable to
/// exercise the failure path.
#[derive(Debug, Default)]
pub struct InMemorySource {
    batch: RwLock<SourceBatch>,
    unavailable: AtomicBool,
    open: AtomicUsize,
}

impl InMemorySource {
    pub fn new(documents: Vec<RawProduct>) -> Self {
        Self {
            batch: RwLock::new(SourceBatch {
                documents,
                unparseable: 0,
            }),
            ..Self::default()
        }
    }

    /// Build from raw JSON values; values that do not decode into a document
    /// are counted as unparseable, as a file source would.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        let source = Self::default();
        source.replace_values(values);
        source
    }

    /// Swap the stored documents (simulates the upstream data changing).
    pub fn replace_values(&self, values: impl IntoIterator<Item = Value>) {
        let mut batch = SourceBatch::default();
        for v in values {
            match serde_json::from_value::<RawProduct>(v) {
                Ok(doc) => batch.documents.push(doc),
                Err(_) => batch.unparseable += 1,
            }
        }
        if let Ok(mut slot) = self.batch.write() {
            *slot = batch;
        }
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }
}

struct InMemoryConnection<'a> {
    source: &'a InMemorySource,
}

impl SourceConnection for InMemoryConnection<'_> {
    fn fetch_products(&mut self) -> Result<SourceBatch, SourceError> {
        if self.source.unavailable.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable(
                "in-memory source went away mid-load".to_string(),
            ));
        }
        self.source
            .batch
            .read()
            .map(|b| b.clone())
            .map_err(|_| SourceError::Unavailable("lock poisoned".to_string()))
    }
}

impl Drop for InMemoryConnection<'_> {
    fn drop(&mut self) {
        self.source.open.fetch_sub(1, Ordering::SeqCst);
    }
}

impl RecordSource for InMemorySource {
    fn connect(&self) -> Result<Box<dyn SourceConnection + '_>, SourceError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable(
                "in-memory source is switched off".to_string(),
            ));
        }
        self.open.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemoryConnection { source: self }))
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
