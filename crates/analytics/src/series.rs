use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use storepulse_catalog::ProductRecord;

use crate::mode::Mode;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub quantity: u64,
    /// Σ price × units for the day (0 contribution from unpriced products).
    pub revenue: u64,
}

/// Per-day totals over the events the records carry.
///
/// Callers pass records already restricted to the window they want plotted.
/// Only dates with at least one event appear; output is sorted by date.
pub fn daily_series(records: &[ProductRecord], mode: Mode) -> Vec<DailyPoint> {
    let mut days: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();

    for r in records {
        let price = r.price.unwrap_or(0);
        for e in &r.history {
            let units = match mode {
                Mode::Sales => e.units_sold,
                Mode::Stock => e.units_restocked,
            };
            let (quantity, revenue) = days.entry(e.date).or_default();
            *quantity = quantity.saturating_add(units);
            *revenue = revenue.saturating_add(price.saturating_mul(units));
        }
    }

    days.into_iter()
        .map(|(date, (quantity, revenue))| DailyPoint {
            date,
            quantity,
            revenue,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive;
    use storepulse_catalog::StockEvent;
    use storepulse_core::ProductId;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn rec(id: &str, price: Option<u64>, events: Vec<StockEvent>) -> ProductRecord {
        derive(ProductRecord::new(ProductId::new(id), id, price).with_history(events))
    }

    #[test]
    fn groups_by_date_in_order() {
        let rs = vec![
            rec("a", Some(1000), vec![StockEvent::new(d(3), 2, 1), StockEvent::new(d(1), 1, 0)]),
            rec("b", Some(5000), vec![StockEvent::new(d(3), 1, 4)]),
            rec("c", None, vec![StockEvent::new(d(2), 6, 0)]),
        ];

        let sales = daily_series(&rs, Mode::Sales);
        assert_eq!(
            sales,
            vec![
                DailyPoint { date: d(1), quantity: 1, revenue: 1000 },
                DailyPoint { date: d(2), quantity: 6, revenue: 0 },
                DailyPoint { date: d(3), quantity: 3, revenue: 7000 },
            ]
        );

        let stock = daily_series(&rs, Mode::Stock);
        assert_eq!(stock[2], DailyPoint { date: d(3), quantity: 5, revenue: 21000 });
        assert_eq!(stock[0].quantity, 0);
    }

    #[test]
    fn series_revenue_adds_up_to_record_revenue() {
        let rs = vec![
            rec("a", Some(1200), vec![StockEvent::new(d(3), 2, 1), StockEvent::new(d(9), 7, 0)]),
            rec("b", Some(3300), vec![StockEvent::new(d(4), 1, 4)]),
        ];
        let total: u64 = daily_series(&rs, Mode::Sales).iter().map(|p| p.revenue).sum();
        let expected: u64 = rs.iter().map(|r| r.metrics.revenue).sum();
        assert_eq!(total, expected);
    }
}
