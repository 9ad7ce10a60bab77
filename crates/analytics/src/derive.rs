//! Metric derivation.

use storepulse_catalog::{Metrics, ProductRecord, StockEvent};
use storepulse_core::DateBounds;

/// Sum a history into [`Metrics`].
///
/// Revenue figures are zero when the price is unknown. Arithmetic saturates
/// instead of wrapping.
pub fn derive_metrics(price: Option<u64>, history: &[StockEvent]) -> Metrics {
    let (total_sold, total_restocked) = history.iter().fold((0u64, 0u64), |(sold, restocked), e| {
        (
            sold.saturating_add(e.units_sold),
            restocked.saturating_add(e.units_restocked),
        )
    });
    let price = price.unwrap_or(0);

    Metrics {
        total_sold,
        total_restocked,
        revenue: price.saturating_mul(total_sold),
        stock_revenue: price.saturating_mul(total_restocked),
    }
}

/// Recompute a record's metrics from its full history.
pub fn derive(mut record: ProductRecord) -> ProductRecord {
    record.metrics = derive_metrics(record.price, &record.history);
    record
}

/// A full load with metrics derived and its global date bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedLoad {
    pub records: Vec<ProductRecord>,
    pub bounds: DateBounds,
    /// `false` when no record had a dated event and `bounds` is the fallback.
    pub bounds_from_data: bool,
}

/// Derive every record and compute the global min/max event date.
pub fn derive_all(records: Vec<ProductRecord>, fallback: DateBounds) -> DerivedLoad {
    let records: Vec<ProductRecord> = records.into_iter().map(derive).collect();
    let observed = DateBounds::from_dates(records.iter().flat_map(|r| r.event_dates()));

    DerivedLoad {
        bounds: observed.unwrap_or(fallback),
        bounds_from_data: observed.is_some(),
        records,
    }
}
