use serde::{Deserialize, Serialize};

use storepulse_catalog::Metrics;
use storepulse_core::DomainError;

/// Which side of the movement history a report looks at.
///
/// Both modes report a `(revenue, quantity)` pair so consumers render the
/// same shapes either way.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// revenue / units sold
    #[default]
    Sales,
    /// stock revenue / units restocked
    Stock,
}

impl Mode {
    pub fn quantity(&self, metrics: &Metrics) -> u64 {
        match self {
            Mode::Sales => metrics.total_sold,
            Mode::Stock => metrics.total_restocked,
        }
    }

    pub fn revenue(&self, metrics: &Metrics) -> u64 {
        match self {
            Mode::Sales => metrics.revenue,
            Mode::Stock => metrics.stock_revenue,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Sales => "sales",
            Mode::Stock => "stock",
        }
    }
}

impl core::str::FromStr for Mode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sales" => Ok(Mode::Sales),
            "stock" => Ok(Mode::Stock),
            other => Err(DomainError::validation(format!(
                "mode must be one of: sales, stock (got {other:?})"
            ))),
        }
    }
}
