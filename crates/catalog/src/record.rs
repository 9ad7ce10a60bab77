use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use storepulse_core::{DomainError, ProductId};

/// One dated stock movement for a product.
///
/// Quantities are already normalized: rounded to whole units and clamped at 0.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEvent {
    pub date: NaiveDate,
    pub units_sold: u64,
    pub units_restocked: u64,
}

impl StockEvent {
    pub fn new(date: NaiveDate, units_sold: u64, units_restocked: u64) -> Self {
        Self {
            date,
            units_sold,
            units_restocked,
        }
    }
}

/// Aggregates derived from a product's movement history.
///
/// Always recomputed from the history it describes, never patched.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub total_sold: u64,
    pub total_restocked: u64,
    /// price × total_sold
    pub revenue: u64,
    /// price × total_restocked
    pub stock_revenue: u64,
}

/// Price tier assigned by the segmenter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Low,
    Medium,
    High,
    /// The product has no usable price.
    Undetermined,
}

impl Segment {
    /// Tiers shown in every breakdown, in display order.
    pub const CANONICAL: [Segment; 3] = [Segment::Low, Segment::Medium, Segment::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Low => "low",
            Segment::Medium => "medium",
            Segment::High => "high",
            Segment::Undetermined => "undetermined",
        }
    }
}

impl core::fmt::Display for Segment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Segment {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Segment::Low),
            "medium" => Ok(Segment::Medium),
            "high" => Ok(Segment::High),
            "undetermined" => Ok(Segment::Undetermined),
            other => Err(DomainError::validation(format!(
                "segment must be one of: low, medium, high, undetermined (got {other:?})"
            ))),
        }
    }
}

/// A product with its normalized movement history and derived figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    /// Unit price in whole currency units; `None` when the source had no
    /// usable price.
    pub price: Option<u64>,
    pub promotion: String,
    /// Source order, which is chronological but not guaranteed sorted.
    pub history: Vec<StockEvent>,
    pub metrics: Metrics,
    /// Set by the segmenter; `None` until then.
    pub segment: Option<Segment>,
}

impl ProductRecord {
    pub fn new(id: ProductId, name: impl Into<String>, price: Option<u64>) -> Self {
        Self {
            id,
            name: name.into(),
            category: String::new(),
            price,
            promotion: String::new(),
            history: Vec::new(),
            metrics: Metrics::default(),
            segment: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_promotion(mut self, promotion: impl Into<String>) -> Self {
        self.promotion = promotion.into();
        self
    }

    pub fn with_history(mut self, history: Vec<StockEvent>) -> Self {
        self.history = history;
        self
    }

    pub fn event_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.history.iter().map(|e| e.date)
    }
}
