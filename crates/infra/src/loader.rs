//! Full-corpus load: source → normalize → derive → snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use storepulse_analytics::derive_all;
use storepulse_catalog::{NormalizationRules, Normalizer, ProductRecord, SkipCounts};
use storepulse_core::{DateBounds, LoadId};

use crate::source::{RecordSource, SourceError};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("snapshot cache lock poisoned")]
    CachePoisoned,
}

/// Parameters of a full load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadSettings {
    pub rules: NormalizationRules,
    /// Bounds used when no event in the load carries a valid date.
    pub fallback_bounds: DateBounds,
}

/// What happened to the documents of one load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadDiagnostics {
    /// Documents decoded by the source.
    pub documents_seen: u64,
    pub records_accepted: u64,
    /// Documents excluded for an out-of-range price.
    pub documents_rejected: u64,
    /// Entries the source could not decode at all.
    pub unparseable_documents: u64,
    /// Accepted records without a usable price (segment Undetermined).
    pub unpriced_records: u64,
    pub skips: SkipCounts,
}

/// One normalized and derived load of the whole catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub load_id: LoadId,
    pub loaded_at: DateTime<Utc>,
    pub records: Vec<ProductRecord>,
    pub bounds: DateBounds,
    pub bounds_from_data: bool,
    pub diagnostics: LoadDiagnostics,
}

/// Load every document from `source` and build a snapshot.
///
/// The source connection is held only for the fetch and is released before
/// normalization starts, whether the fetch succeeded or not.
pub fn load_snapshot(
    source: &dyn RecordSource,
    settings: &LoadSettings,
) -> Result<CatalogSnapshot, LoadError> {
    let batch = {
        let mut conn = source.connect()?;
        conn.fetch_products()?
    };

    let normalizer = Normalizer::new(settings.rules.clone());
    let mut diagnostics = LoadDiagnostics {
        documents_seen: batch.documents.len() as u64,
        unparseable_documents: batch.unparseable,
        ..LoadDiagnostics::default()
    };

    let mut records = Vec::with_capacity(batch.documents.len());
    for doc in &batch.documents {
        let outcome = normalizer.normalize(doc);
        diagnostics.skips.merge(&outcome.skips);
        match outcome.record {
            Ok(record) => {
                if record.price.is_none() {
                    diagnostics.unpriced_records += 1;
                }
                records.push(record);
            }
            Err(reason) => {
                tracing::debug!(?reason, "document rejected");
                diagnostics.documents_rejected += 1;
            }
        }
    }
    diagnostics.records_accepted = records.len() as u64;

    let derived = derive_all(records, settings.fallback_bounds);
    if !derived.bounds_from_data {
        tracing::warn!(
            min = %derived.bounds.min(),
            max = %derived.bounds.max(),
            "no dated events in load; using fallback bounds"
        );
    }

    let snapshot = CatalogSnapshot {
        load_id: LoadId::new(),
        loaded_at: Utc::now(),
        records: derived.records,
        bounds: derived.bounds,
        bounds_from_data: derived.bounds_from_data,
        diagnostics,
    };

    let d = &snapshot.diagnostics;
    tracing::info!(
        load_id = %snapshot.load_id,
        source = %source.describe(),
        documents = d.documents_seen,
        accepted = d.records_accepted,
        rejected = d.documents_rejected,
        unparseable = d.unparseable_documents,
        "catalog loaded"
    );
    if !d.skips.is_clean() {
        tracing::warn!(
            load_id = %snapshot.load_id,
            skipped_events = d.skips.skipped_events(),
            invalid_date = d.skips.invalid_date,
            missing_date = d.skips.missing_date,
            not_an_object = d.skips.not_an_object,
            malformed_quantity = d.skips.malformed_quantity,
            malformed_history = d.skips.malformed_history,
            truncated_events = d.skips.truncated_events,
            "skipped malformed history data"
        );
    }

    Ok(snapshot)
}
