//! Raw record source boundary.
//!
//! A source hands out a connection for the duration of one load; the
//! connection is released when it is dropped, on success and error paths
//! alike. Sources never normalize anything: they return raw documents and
//! leave validation to `storepulse-catalog`.

pub mod in_memory;
pub mod json_file;

use std::path::PathBuf;

use thiserror::Error;

use storepulse_catalog::RawProduct;

pub use in_memory::InMemorySource;
pub use json_file::JsonFileSource;

/// Documents fetched in one pass over a source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceBatch {
    pub documents: Vec<RawProduct>,
    /// Entries the source could not even decode into a document.
    pub unparseable: u64,
}

/// Source operation error.
///
/// These are **infrastructure errors**; bad data inside a document is never
/// an error here.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed source: {0}")]
    Malformed(String),
}

/// An open connection to a source.
pub trait SourceConnection {
    /// Fetch every product document.
    fn fetch_products(&mut self) -> Result<SourceBatch, SourceError>;
}

/// A place product documents come from.
pub trait RecordSource: Send + Sync {
    /// Acquire a connection. Dropping it releases the underlying resource.
    fn connect(&self) -> Result<Box<dyn SourceConnection + '_>, SourceError>;

    /// Short human-readable description, used in logs.
    fn describe(&self) -> String;
}

impl<S: RecordSource + ?Sized> RecordSource for std::sync::Arc<S> {
    fn connect(&self) -> Result<Box<dyn SourceConnection + '_>, SourceError> {
        (**self).connect()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
