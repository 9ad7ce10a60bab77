use serde::{Deserialize, Serialize};

use storepulse_catalog::ProductRecord;

use crate::mode::Mode;

/// Headline figures for a filtered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub mode: Mode,
    pub record_count: usize,
    /// Revenue (Sales) or stock revenue (Stock).
    pub total_revenue: u64,
    /// Units sold (Sales) or units restocked (Stock).
    pub total_quantity: u64,
    /// Mean price over products with activity in this mode; 0 when none.
    pub average_price: f64,
    /// Name of the product with the highest quantity; `None` when nothing moved.
    pub top_product: Option<String>,
}

/// Compute the KPI block.
///
/// "Activity" means units sold > 0 in Sales mode and stock revenue > 0 in
/// Stock mode. Ties for top product go to the earliest record.
pub fn compute_kpis(records: &[ProductRecord], mode: Mode) -> Kpis {
    let total_revenue = records
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(mode.revenue(&r.metrics)));
    let total_quantity = records
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(mode.quantity(&r.metrics)));

    let active_prices: Vec<u64> = records
        .iter()
        .filter(|r| match mode {
            Mode::Sales => r.metrics.total_sold > 0,
            Mode::Stock => r.metrics.stock_revenue > 0,
        })
        .filter_map(|r| r.price)
        .collect();
    let average_price = if active_prices.is_empty() {
        0.0
    } else {
        active_prices.iter().map(|&p| p as f64).sum::<f64>() / active_prices.len() as f64
    };

    let top_product = if total_quantity == 0 {
        None
    } else {
        records
            .iter()
            .fold(None::<&ProductRecord>, |best, r| match best {
                Some(b) if mode.quantity(&b.metrics) >= mode.quantity(&r.metrics) => Some(b),
                _ => Some(r),
            })
            .map(|r| r.name.clone())
    };

    Kpis {
        mode,
        record_count: records.len(),
        total_revenue,
        total_quantity,
        average_price,
        top_product,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive;
    use chrono::NaiveDate;
    use storepulse_catalog::StockEvent;
    use storepulse_core::ProductId;

    fn rec(name: &str, price: Option<u64>, sold: u64, restocked: u64) -> ProductRecord {
        let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        derive(
            ProductRecord::new(ProductId::new(name), name, price)
                .with_history(vec![StockEvent::new(date, sold, restocked)]),
        )
    }

    #[test]
    fn sales_kpis() {
        let rs = vec![
            rec("espresso", Some(2000), 4, 1),
            rec("mocha", Some(4000), 0, 3),
            rec("latte", Some(3000), 6, 0),
        ];
        let k = compute_kpis(&rs, Mode::Sales);
        assert_eq!(k.record_count, 3);
        assert_eq!(k.total_revenue, 8000 + 18000);
        assert_eq!(k.total_quantity, 10);
        assert_eq!(k.average_price, 2500.0);
        assert_eq!(k.top_product.as_deref(), Some("latte"));
    }

    #[test]
    fn stock_kpis() {
        let rs = vec![rec("espresso", Some(2000), 4, 1), rec("mocha", Some(4000), 0, 3)];
        let k = compute_kpis(&rs, Mode::Stock);
        assert_eq!(k.total_revenue, 2000 + 12000);
        assert_eq!(k.total_quantity, 4);
        assert_eq!(k.average_price, 3000.0);
        assert_eq!(k.top_product.as_deref(), Some("mocha"));
    }

    #[test]
    fn empty_and_idle_sets() {
        let k = compute_kpis(&[], Mode::Sales);
        assert_eq!(k.total_revenue, 0);
        assert_eq!(k.average_price, 0.0);
        assert_eq!(k.top_product, None);

        let idle = vec![rec("a", Some(1000), 0, 0)];
        assert_eq!(compute_kpis(&idle, Mode::Sales).top_product, None);
    }

    #[test]
    fn ties_go_to_first_record() {
        let rs = vec![rec("first", Some(1000), 5, 0), rec("second", Some(1000), 5, 0)];
        assert_eq!(compute_kpis(&rs, Mode::Sales).top_product.as_deref(), Some("first"));
    }
}
