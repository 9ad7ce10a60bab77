//! Date-range filtering.

use storepulse_catalog::ProductRecord;
use storepulse_core::DateWindow;

use crate::derive::derive_metrics;

/// Copy of `record` restricted to events inside `window`, with metrics
/// recomputed from the kept events. The input is left untouched.
pub fn filter_record(record: &ProductRecord, window: &DateWindow) -> ProductRecord {
    let history: Vec<_> = record
        .history
        .iter()
        .filter(|e| window.contains(e.date))
        .copied()
        .collect();

    ProductRecord {
        id: record.id.clone(),
        name: record.name.clone(),
        category: record.category.clone(),
        price: record.price,
        promotion: record.promotion.clone(),
        metrics: derive_metrics(record.price, &history),
        history,
        segment: record.segment,
    }
}
