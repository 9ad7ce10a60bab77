//! Price segmentation.
//!
//! Tiers come from a cascade:
//! 1. distinct quantile cutoffs → Low / Medium / High
//! 2. equal cutoffs but a price spread → split at the min/max midpoint,
//!    Low / High only
//! 3. a single price → everything Medium
//!
//! Records without a price are Undetermined and never feed the quantiles.

use serde::{Deserialize, Serialize};

use storepulse_catalog::{ProductRecord, Segment};

use crate::quantile::{quantile, QuantileProfile};

/// Which branch of the cascade produced the tiers, with its cutoffs.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentThresholds {
    /// No priced records.
    Empty,
    Percentile { lower: f64, upper: f64 },
    Midpoint { midpoint: f64 },
    Uniform { price: f64 },
}

impl SegmentThresholds {
    /// Compute thresholds from the known prices.
    pub fn from_prices(prices: &[u64], profile: &QuantileProfile) -> Self {
        let mut sorted: Vec<f64> = prices.iter().map(|&p| p as f64).collect();
        sorted.sort_by(f64::total_cmp);

        let (Some(lower), Some(upper)) = (
            quantile(&sorted, profile.lower()),
            quantile(&sorted, profile.upper()),
        ) else {
            return SegmentThresholds::Empty;
        };

        if lower != upper {
            return SegmentThresholds::Percentile { lower, upper };
        }

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        if min == max {
            SegmentThresholds::Uniform { price: min }
        } else {
            SegmentThresholds::Midpoint {
                midpoint: (min + max) / 2.0,
            }
        }
    }

    pub fn classify(&self, price: Option<u64>) -> Segment {
        let Some(price) = price else {
            return Segment::Undetermined;
        };
        let price = price as f64;
        match *self {
            SegmentThresholds::Empty => Segment::Undetermined,
            SegmentThresholds::Percentile { lower, upper } => {
                if price <= lower {
                    Segment::Low
                } else if price <= upper {
                    Segment::Medium
                } else {
                    Segment::High
                }
            }
            SegmentThresholds::Midpoint { midpoint } => {
                if price < midpoint {
                    Segment::Low
                } else {
                    Segment::High
                }
            }
            SegmentThresholds::Uniform { .. } => Segment::Medium,
        }
    }
}

/// Display labels for the four tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentLabels {
    pub low: String,
    pub medium: String,
    pub high: String,
    pub undetermined: String,
}

impl SegmentLabels {
    pub fn english() -> Self {
        Self {
            low: "Low".to_string(),
            medium: "Medium".to_string(),
            high: "High".to_string(),
            undetermined: "Undetermined".to_string(),
        }
    }

    pub fn vietnamese() -> Self {
        Self {
            low: "Thấp".to_string(),
            medium: "Trung bình".to_string(),
            high: "Cao".to_string(),
            undetermined: "Không xác định".to_string(),
        }
    }

    /// Label set for a locale code (`en`, `vi`).
    pub fn for_locale(locale: &str) -> Option<Self> {
        match locale.trim().to_lowercase().as_str() {
            "en" => Some(Self::english()),
            "vi" => Some(Self::vietnamese()),
            _ => None,
        }
    }

    pub fn label(&self, segment: Segment) -> &str {
        match segment {
            Segment::Low => &self.low,
            Segment::Medium => &self.medium,
            Segment::High => &self.high,
            Segment::Undetermined => &self.undetermined,
        }
    }
}

impl Default for SegmentLabels {
    fn default() -> Self {
        Self::english()
    }
}

/// Assigns a [`Segment`] to every record of a set.
#[derive(Debug, Copy, Clone, Default)]
pub struct Segmenter {
    profile: QuantileProfile,
}

impl Segmenter {
    pub fn new(profile: QuantileProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &QuantileProfile {
        &self.profile
    }

    /// Thresholds for the set, without assigning anything.
    pub fn thresholds(&self, records: &[ProductRecord]) -> SegmentThresholds {
        let prices: Vec<u64> = records.iter().filter_map(|r| r.price).collect();
        SegmentThresholds::from_prices(&prices, &self.profile)
    }

    /// Segment every record in place and return the thresholds used.
    ///
    /// An empty slice is left as is.
    pub fn assign(&self, records: &mut [ProductRecord]) -> SegmentThresholds {
        let thresholds = self.thresholds(records);
        for r in records.iter_mut() {
            r.segment = Some(thresholds.classify(r.price));
        }
        thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use storepulse_core::ProductId;

    fn priced(prices: &[Option<u64>]) -> Vec<ProductRecord> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| ProductRecord::new(ProductId::new(format!("p{i}")), format!("p{i}"), *p))
            .collect()
    }

    fn segments(records: &[ProductRecord]) -> Vec<Segment> {
        records.iter().map(|r| r.segment.unwrap()).collect()
    }

    #[test]
    fn percentile_split() {
        let mut rs = priced(&[Some(1000), Some(2000), Some(9000)]);
        let t = Segmenter::default().assign(&mut rs);
        assert_eq!(t, SegmentThresholds::Percentile { lower: 1500.0, upper: 5500.0 });
        assert_eq!(segments(&rs), vec![Segment::Low, Segment::Medium, Segment::High]);
    }

    #[test]
    fn boundaries_are_inclusive_on_the_lower_tier() {
        let t = SegmentThresholds::Percentile { lower: 1500.0, upper: 5500.0 };
        assert_eq!(t.classify(Some(1500)), Segment::Low);
        assert_eq!(t.classify(Some(1501)), Segment::Medium);
        assert_eq!(t.classify(Some(5500)), Segment::Medium);
        assert_eq!(t.classify(Some(5501)), Segment::High);
    }

    #[test]
    fn identical_prices_are_all_medium() {
        let mut rs = priced(&[Some(5000), Some(5000), Some(5000)]);
        let t = Segmenter::default().assign(&mut rs);
        assert_eq!(t, SegmentThresholds::Uniform { price: 5000.0 });
        assert_eq!(segments(&rs), vec![Segment::Medium; 3]);
    }

    #[test]
    fn equal_cutoffs_fall_back_to_midpoint() {
        // quartiles of [1000, 5000 x5, 9000] are both 5000
        let mut rs = priced(&[
            Some(1000),
            Some(5000),
            Some(5000),
            Some(5000),
            Some(5000),
            Some(5000),
            Some(9000),
        ]);
        let t = Segmenter::default().assign(&mut rs);
        assert_eq!(t, SegmentThresholds::Midpoint { midpoint: 5000.0 });
        assert_eq!(
            segments(&rs),
            vec![
                Segment::Low,
                Segment::High,
                Segment::High,
                Segment::High,
                Segment::High,
                Segment::High,
                Segment::High,
            ]
        );
    }

    #[test]
    fn unknown_prices_are_undetermined_and_ignored_by_quantiles() {
        let mut rs = priced(&[None, Some(1000), Some(2000), Some(9000), None]);
        let t = Segmenter::default().assign(&mut rs);
        assert_eq!(t, SegmentThresholds::Percentile { lower: 1500.0, upper: 5500.0 });
        assert_eq!(
            segments(&rs),
            vec![
                Segment::Undetermined,
                Segment::Low,
                Segment::Medium,
                Segment::High,
                Segment::Undetermined,
            ]
        );
    }

    #[test]
    fn empty_input_is_a_no_op() {
        let mut rs: Vec<ProductRecord> = Vec::new();
        assert_eq!(Segmenter::default().assign(&mut rs), SegmentThresholds::Empty);
        assert!(rs.is_empty());
    }

    #[test]
    fn tertile_profile_moves_cutoffs() {
        let rs = priced(&[Some(1000), Some(2000), Some(3000), Some(4000)]);
        let t = Segmenter::new(QuantileProfile::TERTILE).thresholds(&rs);
        let SegmentThresholds::Percentile { lower, upper } = t else { panic!("expected percentile") };
        assert!((lower - 1990.0).abs() < 1e-9);
        assert!((upper - 3010.0).abs() < 1e-9);
    }

    #[test]
    fn labels_by_locale() {
        let vi = SegmentLabels::for_locale("vi").unwrap();
        assert_eq!(vi.label(Segment::Medium), "Trung bình");
        assert_eq!(SegmentLabels::default().label(Segment::High), "High");
        assert!(SegmentLabels::for_locale("fr").is_none());
    }

    proptest! {
        #[test]
        fn every_record_gets_exactly_one_segment(prices in prop::collection::vec(prop::option::of(1000u64..1_000_000), 1..40)) {
            let mut rs = priced(&prices);
            Segmenter::default().assign(&mut rs);
            for r in &rs {
                let s = r.segment;
                prop_assert!(s.is_some());
                prop_assert_eq!(s == Some(Segment::Undetermined), r.price.is_none());
            }
        }
    }
}
