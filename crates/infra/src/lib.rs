//! Infrastructure layer: record sources, snapshot loading, caching, config.

pub mod cache;
pub mod config;
pub mod loader;
pub mod source;

pub use cache::SnapshotCache;
pub use config::{ConfigError, Settings};
pub use loader::{load_snapshot, CatalogSnapshot, LoadDiagnostics, LoadError, LoadSettings};
pub use source::{
    InMemorySource, JsonFileSource, RecordSource, SourceBatch, SourceConnection, SourceError,
};
