//! Source document normalization.
//!
//! Source documents are loosely typed: quantities arrive as numbers, numeric
//! strings or scientific notation, dates may be malformed, history entries may
//! not even be objects. Every event is checked into a tagged [`EventCheck`]
//! and every skip is counted, so nothing is dropped invisibly.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use storepulse_core::{parse_iso_date, ProductId};

use crate::record::{ProductRecord, StockEvent};

/// Raw product document as exposed by a record source.
///
/// Fields are kept as JSON values so a single bad field never fails the whole
/// document at deserialization time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProduct {
    #[serde(default, alias = "_id")]
    pub id: Value,
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub category: Value,
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub promotion: Value,
    #[serde(default)]
    pub stock_history: Value,
}

/// Parameters for turning raw documents into records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationRules {
    /// Known prices below this are raised to it.
    pub price_floor: u64,
    /// Documents priced at or above this are rejected (exclusive bound).
    pub max_price: u64,
    /// Only the first `max_history_events` history entries are considered.
    pub max_history_events: usize,
}

impl Default for NormalizationRules {
    fn default() -> Self {
        Self {
            price_floor: 1000,
            max_price: 1_000_000_000,
            max_history_events: 100,
        }
    }
}

/// Why a history entry was dropped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotAnObject,
    MissingDate,
    InvalidDate,
}

/// Outcome of validating one history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventCheck {
    /// A usable event. `malformed_fields` counts quantity fields that were
    /// present but unparseable and therefore contributed 0.
    Valid {
        event: StockEvent,
        malformed_fields: u8,
    },
    Skipped(SkipReason),
}

/// Why a whole document was excluded from a load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    PriceOutOfRange { price: f64 },
}

/// Per-reason skip counters, summed across a load.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipCounts {
    pub not_an_object: u64,
    pub missing_date: u64,
    pub invalid_date: u64,
    pub malformed_quantity: u64,
    pub malformed_history: u64,
    pub truncated_events: u64,
}

impl SkipCounts {
    pub fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::NotAnObject => self.not_an_object += 1,
            SkipReason::MissingDate => self.missing_date += 1,
            SkipReason::InvalidDate => self.invalid_date += 1,
        }
    }

    /// Events dropped entirely (truncation excluded).
    pub fn skipped_events(&self) -> u64 {
        self.not_an_object + self.missing_date + self.invalid_date
    }

    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }

    pub fn merge(&mut self, other: &SkipCounts) {
        self.not_an_object += other.not_an_object;
        self.missing_date += other.missing_date;
        self.invalid_date += other.invalid_date;
        self.malformed_quantity += other.malformed_quantity;
        self.malformed_history += other.malformed_history;
        self.truncated_events += other.truncated_events;
    }
}

/// Result of normalizing one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOutcome {
    pub record: Result<ProductRecord, RejectReason>,
    pub skips: SkipCounts,
}

/// Applies [`NormalizationRules`] to raw documents.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    rules: NormalizationRules,
}

impl Normalizer {
    pub fn new(rules: NormalizationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &NormalizationRules {
        &self.rules
    }

    /// Normalize a document. Derived metrics are left at zero.
    pub fn normalize(&self, raw: &RawProduct) -> DocumentOutcome {
        let mut skips = SkipCounts::default();

        let price = match parse_number(&raw.price) {
            Number::Value(p) => {
                if p <= 0.0 || p >= self.rules.max_price as f64 {
                    return DocumentOutcome {
                        record: Err(RejectReason::PriceOutOfRange { price: p }),
                        skips,
                    };
                }
                Some((p.round() as u64).max(self.rules.price_floor))
            }
            Number::Absent | Number::Malformed => None,
        };

        let entries: &[Value] = match &raw.stock_history {
            Value::Array(items) => items,
            Value::Null => &[],
            _ => {
                skips.malformed_history += 1;
                &[]
            }
        };

        let cap = self.rules.max_history_events;
        if entries.len() > cap {
            skips.truncated_events += (entries.len() - cap) as u64;
        }

        let mut history = Vec::with_capacity(entries.len().min(cap));
        for entry in entries.iter().take(cap) {
            match check_event(entry) {
                EventCheck::Valid {
                    event,
                    malformed_fields,
                } => {
                    skips.malformed_quantity += u64::from(malformed_fields);
                    history.push(event);
                }
                EventCheck::Skipped(reason) => skips.record(reason),
            }
        }

        let record = ProductRecord::new(ProductId::new(id_text(&raw.id)), text(&raw.name), price)
            .with_category(text(&raw.category))
            .with_promotion(text(&raw.promotion))
            .with_history(history);

        DocumentOutcome {
            record: Ok(record),
            skips,
        }
    }
}

/// Validate one history entry.
///
/// An entry without a strict `YYYY-MM-DD` date is dropped entirely; a
/// malformed quantity only zeroes that field.
pub fn check_event(entry: &Value) -> EventCheck {
    let Value::Object(fields) = entry else {
        return EventCheck::Skipped(SkipReason::NotAnObject);
    };

    let date = match fields.get("date") {
        None | Some(Value::Null) => return EventCheck::Skipped(SkipReason::MissingDate),
        Some(Value::String(s)) => match parse_iso_date(s) {
            Some(d) => d,
            None => return EventCheck::Skipped(SkipReason::InvalidDate),
        },
        Some(_) => return EventCheck::Skipped(SkipReason::InvalidDate),
    };

    let mut malformed_fields = 0u8;
    let mut quantity = |key: &str| match parse_number(field(fields, key)) {
        Number::Value(v) => clamp_units(v),
        Number::Absent => 0,
        Number::Malformed => {
            malformed_fields += 1;
            0
        }
    };
    let units_sold = quantity("stock_decreased");
    let units_restocked = quantity("stock_increased");

    EventCheck::Valid {
        event: StockEvent::new(date, units_sold, units_restocked),
        malformed_fields,
    }
}

static NULL: Value = Value::Null;

fn field<'a>(fields: &'a Map<String, Value>, key: &str) -> &'a Value {
    fields.get(key).unwrap_or(&NULL)
}

enum Number {
    Absent,
    Malformed,
    Value(f64),
}

/// Numbers arrive as JSON numbers or strings (`"12"`, `"1.2e1"`).
fn parse_number(value: &Value) -> Number {
    let parsed = match value {
        Value::Null => return Number::Absent,
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Number::Value(v),
        _ => Number::Malformed,
    }
}

/// Round to the nearest whole unit; negatives become 0.
fn clamp_units(v: f64) -> u64 {
    let rounded = v.round();
    if rounded <= 0.0 { 0 } else { rounded as u64 }
}

fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Ids may be plain strings/numbers or extended-JSON `{"$oid": "..."}`.
fn id_text(value: &Value) -> String {
    match value {
        Value::Object(map) => match map.get("$oid") {
            Some(Value::String(oid)) => oid.clone(),
            _ => text(value),
        },
        other => text(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn raw(doc: Value) -> RawProduct {
        serde_json::from_value(doc).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn numeric_strings_and_scientific_notation_are_rounded() {
        let check = check_event(&json!({
            "date": "2025-03-05",
            "stock_decreased": "2.6",
            "stock_increased": 1.2e1,
        }));
        assert_eq!(
            check,
            EventCheck::Valid {
                event: StockEvent::new(d(2025, 3, 5), 3, 12),
                malformed_fields: 0,
            }
        );

        let check = check_event(&json!({"date": "2025-03-05", "stock_decreased": "1e2"}));
        let EventCheck::Valid { event, .. } = check else { panic!("expected valid") };
        assert_eq!(event.units_sold, 100);
        assert_eq!(event.units_restocked, 0);
    }

    #[test]
    fn negative_quantities_clamp_to_zero() {
        let check = check_event(&json!({"date": "2025-03-05", "stock_decreased": -4, "stock_increased": "-0.2"}));
        let EventCheck::Valid { event, malformed_fields } = check else { panic!("expected valid") };
        assert_eq!(event.units_sold, 0);
        assert_eq!(event.units_restocked, 0);
        assert_eq!(malformed_fields, 0);
    }

    #[test]
    fn malformed_quantity_zeroes_only_that_field() {
        let check = check_event(&json!({"date": "2025-03-05", "stock_decreased": "lots", "stock_increased": 7}));
        assert_eq!(
            check,
            EventCheck::Valid {
                event: StockEvent::new(d(2025, 3, 5), 0, 7),
                malformed_fields: 1,
            }
        );
    }

    #[test]
    fn invalid_or_missing_dates_drop_the_event() {
        assert_eq!(
            check_event(&json!({"date": "2025-13-40", "stock_decreased": 3})),
            EventCheck::Skipped(SkipReason::InvalidDate)
        );
        assert_eq!(
            check_event(&json!({"date": 20250305, "stock_decreased": 3})),
            EventCheck::Skipped(SkipReason::InvalidDate)
        );
        assert_eq!(
            check_event(&json!({"stock_decreased": 3})),
            EventCheck::Skipped(SkipReason::MissingDate)
        );
        assert_eq!(check_event(&json!("2025-03-05")), EventCheck::Skipped(SkipReason::NotAnObject));
    }

    #[test]
    fn price_is_rounded_and_floored() {
        let n = Normalizer::default();
        let out = n.normalize(&raw(json!({"_id": "a", "price": 499.6})));
        assert_eq!(out.record.unwrap().price, Some(1000));

        let out = n.normalize(&raw(json!({"_id": "b", "price": "25000.4"})));
        assert_eq!(out.record.unwrap().price, Some(25000));
    }

    #[test]
    fn missing_or_unparseable_price_is_kept_as_unknown() {
        let n = Normalizer::default();
        assert_eq!(n.normalize(&raw(json!({"_id": "a"}))).record.unwrap().price, None);
        assert_eq!(
            n.normalize(&raw(json!({"_id": "a", "price": "n/a"}))).record.unwrap().price,
            None
        );
    }

    #[test]
    fn out_of_range_price_rejects_document() {
        let n = Normalizer::default();
        let out = n.normalize(&raw(json!({"_id": "a", "price": 0})));
        assert_eq!(out.record, Err(RejectReason::PriceOutOfRange { price: 0.0 }));

        let out = n.normalize(&raw(json!({"_id": "a", "price": 1_000_000_000u64})));
        assert!(out.record.is_err());
    }

    #[test]
    fn history_is_capped_and_skips_are_counted() {
        let n = Normalizer::new(NormalizationRules {
            max_history_events: 3,
            ..NormalizationRules::default()
        });
        let out = n.normalize(&raw(json!({
            "_id": {"$oid": "65f1"},
            "name": "Robusta",
            "category": "coffee",
            "price": 50000,
            "stock_history": [
                {"date": "2025-03-01", "stock_decreased": 2},
                {"date": "2025-13-40", "stock_decreased": 3},
                {"date": "2025-03-03", "stock_decreased": "x", "stock_increased": 5},
                {"date": "2025-03-04", "stock_decreased": 9},
            ]
        })));

        let record = out.record.unwrap();
        assert_eq!(record.id.as_str(), "65f1");
        assert_eq!(record.history.len(), 2);
        assert_eq!(out.skips.invalid_date, 1);
        assert_eq!(out.skips.malformed_quantity, 1);
        assert_eq!(out.skips.truncated_events, 1);
        assert_eq!(out.skips.skipped_events(), 1);
    }

    #[test]
    fn non_array_history_is_counted_and_treated_as_empty() {
        let out = Normalizer::default().normalize(&raw(json!({"_id": 7, "price": 2000, "stock_history": "[]"})));
        let record = out.record.unwrap();
        assert_eq!(record.id.as_str(), "7");
        assert!(record.history.is_empty());
        assert_eq!(out.skips.malformed_history, 1);
    }

    #[test]
    fn skip_counts_merge() {
        let mut a = SkipCounts { invalid_date: 1, ..SkipCounts::default() };
        let b = SkipCounts { invalid_date: 2, not_an_object: 1, ..SkipCounts::default() };
        a.merge(&b);
        assert_eq!(a.invalid_date, 3);
        assert_eq!(a.skipped_events(), 4);
        assert!(!a.is_clean());
    }
}
