use serde::{Deserialize, Serialize};

use storepulse_core::{DomainError, DomainResult, ValueObject};

/// Quantile of an ascending-sorted sample using linear interpolation between
/// the two nearest ranks (position `(n - 1) * q`).
///
/// Returns `None` for an empty sample.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Lower/upper cutoffs used to split prices into three tiers.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileProfile {
    lower: f64,
    upper: f64,
}

impl QuantileProfile {
    /// Quartiles: 0.25 / 0.75.
    pub const STANDARD: QuantileProfile = QuantileProfile {
        lower: 0.25,
        upper: 0.75,
    };

    /// Tertiles: 0.33 / 0.67.
    pub const TERTILE: QuantileProfile = QuantileProfile {
        lower: 0.33,
        upper: 0.67,
    };

    pub fn new(lower: f64, upper: f64) -> DomainResult<Self> {
        let in_unit = |q: f64| q.is_finite() && (0.0..=1.0).contains(&q);
        if !in_unit(lower) || !in_unit(upper) {
            return Err(DomainError::invalid_quantiles(format!(
                "cutoffs must lie in [0, 1] (lower={lower}, upper={upper})"
            )));
        }
        if lower >= upper {
            return Err(DomainError::invalid_quantiles(format!(
                "lower cutoff must be below upper (lower={lower}, upper={upper})"
            )));
        }
        Ok(Self { lower, upper })
    }

    /// Look up a named profile (`standard`, `tertile`).
    pub fn named(name: &str) -> DomainResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "standard" | "quartile" => Ok(Self::STANDARD),
            "tertile" => Ok(Self::TERTILE),
            other => Err(DomainError::invalid_quantiles(format!(
                "unknown quantile profile {other:?} (expected standard or tertile)"
            ))),
        }
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }
}

impl ValueObject for QuantileProfile {}

impl Default for QuantileProfile {
    fn default() -> Self {
        Self::STANDARD
    }
}
