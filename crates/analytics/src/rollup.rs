//! Per-segment rollup with percentage-of-total breakdowns.

use serde::{Deserialize, Serialize};

use storepulse_catalog::{ProductRecord, Segment};

use crate::mode::Mode;
use crate::segment::SegmentLabels;

/// One slice of the breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRow {
    pub segment: Segment,
    pub label: String,
    pub revenue: u64,
    pub quantity: u64,
    /// 0..=100; 0 when the revenue total is 0.
    pub revenue_pct: f64,
    /// 0..=100; 0 when the quantity total is 0.
    pub quantity_pct: f64,
}

/// Fixed three-row breakdown: Low, Medium, High, in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRollup {
    pub mode: Mode,
    pub rows: Vec<SegmentRow>,
    pub total_revenue: u64,
    pub total_quantity: u64,
    /// Records left out of the rows (Undetermined or never segmented).
    pub undetermined: usize,
}

impl SegmentRollup {
    pub fn row(&self, segment: Segment) -> Option<&SegmentRow> {
        self.rows.iter().find(|r| r.segment == segment)
    }
}

fn pct(value: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * value as f64 / total as f64
    }
}

/// Group segmented records by tier and sum the mode's `(revenue, quantity)`.
///
/// All three canonical tiers are always present, zero-filled when absent.
pub fn rollup(records: &[ProductRecord], mode: Mode, labels: &SegmentLabels) -> SegmentRollup {
    let mut sums = [(0u64, 0u64); 3];
    let mut undetermined = 0usize;

    for r in records {
        let slot = match r.segment {
            Some(Segment::Low) => 0,
            Some(Segment::Medium) => 1,
            Some(Segment::High) => 2,
            Some(Segment::Undetermined) | None => {
                undetermined += 1;
                continue;
            }
        };
        let (revenue, quantity) = &mut sums[slot];
        *revenue = revenue.saturating_add(mode.revenue(&r.metrics));
        *quantity = quantity.saturating_add(mode.quantity(&r.metrics));
    }

    let total_revenue = sums.iter().fold(0u64, |acc, (rev, _)| acc.saturating_add(*rev));
    let total_quantity = sums.iter().fold(0u64, |acc, (_, qty)| acc.saturating_add(*qty));

    let rows = Segment::CANONICAL
        .iter()
        .zip(sums)
        .map(|(&segment, (revenue, quantity))| SegmentRow {
            segment,
            label: labels.label(segment).to_string(),
            revenue,
            quantity,
            revenue_pct: pct(revenue, total_revenue),
            quantity_pct: pct(quantity, total_quantity),
        })
        .collect();

    SegmentRollup {
        mode,
        rows,
        total_revenue,
        total_quantity,
        undetermined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive;
    use crate::segment::Segmenter;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use storepulse_catalog::StockEvent;
    use storepulse_core::ProductId;

    fn rec(id: &str, price: Option<u64>, sold: u64, restocked: u64) -> ProductRecord {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        derive(
            ProductRecord::new(ProductId::new(id), id, price)
                .with_history(vec![StockEvent::new(date, sold, restocked)]),
        )
    }

    fn segmented(mut rs: Vec<ProductRecord>) -> Vec<ProductRecord> {
        Segmenter::default().assign(&mut rs);
        rs
    }

    #[test]
    fn sales_breakdown_example() {
        let rs = segmented(vec![
            rec("a", Some(1000), 5, 0),
            rec("b", Some(2000), 0, 0),
            rec("c", Some(9000), 10, 0),
        ]);
        let out = rollup(&rs, Mode::Sales, &SegmentLabels::default());

        let revenue: Vec<u64> = out.rows.iter().map(|r| r.revenue).collect();
        assert_eq!(revenue, vec![5000, 0, 90000]);
        assert_eq!(out.total_revenue, 95000);
        assert!((out.rows[0].revenue_pct - 5.263).abs() < 0.01);
        assert_eq!(out.rows[1].revenue_pct, 0.0);
        assert!((out.rows[2].revenue_pct - 94.737).abs() < 0.01);
        assert_eq!(out.rows[0].quantity, 5);
        assert_eq!(out.rows[2].quantity, 10);
    }

    #[test]
    fn stock_mode_uses_restock_figures() {
        let rs = segmented(vec![rec("a", Some(1000), 5, 2), rec("b", Some(3000), 1, 4)]);
        let out = rollup(&rs, Mode::Stock, &SegmentLabels::default());
        assert_eq!(out.mode, Mode::Stock);
        assert_eq!(out.row(Segment::Low).unwrap().revenue, 2000);
        assert_eq!(out.row(Segment::Low).unwrap().quantity, 2);
        assert_eq!(out.row(Segment::High).unwrap().revenue, 12000);
        assert_eq!(out.total_quantity, 6);
    }

    #[test]
    fn always_three_rows_in_order() {
        let rs = segmented(vec![rec("a", Some(5000), 3, 0), rec("b", Some(5000), 1, 0)]);
        let out = rollup(&rs, Mode::Sales, &SegmentLabels::vietnamese());
        let order: Vec<Segment> = out.rows.iter().map(|r| r.segment).collect();
        assert_eq!(order, Segment::CANONICAL.to_vec());
        assert_eq!(out.rows[1].label, "Trung bình");
        assert_eq!(out.rows[1].revenue_pct, 100.0);
        assert_eq!(out.rows[0].revenue, 0);
    }

    #[test]
    fn zero_totals_give_zero_percentages() {
        let rs = segmented(vec![rec("a", Some(1000), 0, 0), rec("b", Some(9000), 0, 0)]);
        let out = rollup(&rs, Mode::Sales, &SegmentLabels::default());
        assert!(out.rows.iter().all(|r| r.revenue_pct == 0.0 && r.quantity_pct == 0.0));

        let empty = rollup(&[], Mode::Stock, &SegmentLabels::default());
        assert_eq!(empty.rows.len(), 3);
        assert_eq!(empty.total_revenue, 0);
    }

    #[test]
    fn undetermined_records_are_counted_not_summed() {
        let rs = segmented(vec![rec("a", None, 7, 0), rec("b", Some(2000), 1, 0)]);
        let out = rollup(&rs, Mode::Sales, &SegmentLabels::default());
        assert_eq!(out.undetermined, 1);
        assert_eq!(out.total_quantity, 1);
    }

    proptest! {
        #[test]
        fn percentages_sum_to_100(items in prop::collection::vec((1000u64..100_000, 0u64..500), 1..30)) {
            let rs = segmented(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, (p, s))| rec(&format!("p{i}"), Some(*p), *s, 0))
                    .collect(),
            );
            let out = rollup(&rs, Mode::Sales, &SegmentLabels::default());
            prop_assert_eq!(out.rows.len(), 3);
            if out.total_revenue > 0 {
                let sum: f64 = out.rows.iter().map(|r| r.revenue_pct).sum();
                prop_assert!((sum - 100.0).abs() < 1e-6);
            }
            if out.total_quantity > 0 {
                let sum: f64 = out.rows.iter().map(|r| r.quantity_pct).sum();
                prop_assert!((sum - 100.0).abs() < 1e-6);
            }
        }
    }
}
