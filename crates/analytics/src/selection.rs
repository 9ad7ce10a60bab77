use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use storepulse_catalog::{ProductRecord, Segment};

/// Optional narrowing applied on top of the date window.
///
/// `None` on a field means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub category: Option<String>,
    pub product: Option<String>,
    pub segment: Option<Segment>,
}

impl Selection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.segment = Some(segment);
        self
    }

    /// Category and product name match (applied before segmentation).
    pub fn matches_catalog(&self, record: &ProductRecord) -> bool {
        self.category.as_deref().is_none_or(|c| record.category == c)
            && self.product.as_deref().is_none_or(|p| record.name == p)
    }

    /// Segment match (applied after segmentation).
    pub fn matches_segment(&self, record: &ProductRecord) -> bool {
        self.segment.is_none_or(|s| record.segment == Some(s))
    }
}

/// Values a caller can choose from when building a [`Selection`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub products: Vec<String>,
}

/// Sorted distinct categories and product names (empty strings left out).
pub fn filter_options(records: &[ProductRecord]) -> FilterOptions {
    let categories: BTreeSet<&str> = records
        .iter()
        .map(|r| r.category.as_str())
        .filter(|c| !c.is_empty())
        .collect();
    let products: BTreeSet<&str> = records
        .iter()
        .map(|r| r.name.as_str())
        .filter(|n| !n.is_empty())
        .collect();

    FilterOptions {
        categories: categories.into_iter().map(str::to_string).collect(),
        products: products.into_iter().map(str::to_string).collect(),
    }
}
