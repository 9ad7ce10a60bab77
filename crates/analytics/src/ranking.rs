use serde::{Deserialize, Serialize};

use storepulse_catalog::ProductRecord;
use storepulse_core::ProductId;

use crate::mode::Mode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedProduct {
    pub id: ProductId,
    pub name: String,
    pub quantity: u64,
    pub revenue: u64,
}

/// Slowest movers among products with activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlowMovers {
    Listed { products: Vec<RankedProduct> },
    /// Too few active products to compare.
    InsufficientData { active_products: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRanking {
    pub mode: Mode,
    pub limit: usize,
    pub top: Vec<RankedProduct>,
    pub slow: SlowMovers,
}

/// Rank products with a positive mode quantity.
///
/// - `top`: up to `limit`, highest quantity first.
/// - `slow`: with at least `limit` active products, the `limit` lowest
///   (ascending). Below that, sales mode lists every product except the
///   best seller when there are at least 2; stock mode needs the full
///   `limit`. Otherwise [`SlowMovers::InsufficientData`].
///
/// Sorts are stable, so ties keep input order.
pub fn rank_products(records: &[ProductRecord], mode: Mode, limit: usize) -> ProductRanking {
    let active: Vec<RankedProduct> = records
        .iter()
        .filter(|r| mode.quantity(&r.metrics) > 0)
        .map(|r| RankedProduct {
            id: r.id.clone(),
            name: r.name.clone(),
            quantity: mode.quantity(&r.metrics),
            revenue: mode.revenue(&r.metrics),
        })
        .collect();

    let mut top = active.clone();
    top.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    top.truncate(limit);

    let minimum = match mode {
        Mode::Sales => 2,
        Mode::Stock => limit.max(1),
    };

    let slow = if active.len() < minimum {
        SlowMovers::InsufficientData {
            active_products: active.len(),
        }
    } else {
        let mut ascending = active;
        ascending.sort_by_key(|p| p.quantity);
        if ascending.len() >= limit {
            ascending.truncate(limit);
        } else {
            ascending.pop();
        }
        SlowMovers::Listed {
            products: ascending,
        }
    };

    ProductRanking {
        mode,
        limit,
        top,
        slow,
    }
}
