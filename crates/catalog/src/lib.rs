//! Product catalog model.
//!
//! This crate holds the record types every pipeline stage works on and the
//! normalization that turns loosely-typed source documents into them. It is
//! deterministic domain logic only (no IO, no HTTP, no storage).

pub mod normalize;
pub mod record;

pub use normalize::{
    DocumentOutcome, EventCheck, NormalizationRules, Normalizer, RawProduct, RejectReason,
    SkipCounts, SkipReason,
};
pub use record::{Metrics, ProductRecord, Segment, StockEvent};
