use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use storepulse_analytics::{DashboardQuery, DashboardReport, Mode, SegmentRollup, Selection};
use storepulse_catalog::Segment;
use storepulse_core::{parse_iso_date, DateBounds, DateWindow, DomainError, LoadId};
use storepulse_infra::LoadDiagnostics;

// -------------------------
// Request DTOs
// -------------------------

/// Query string shared by the report endpoints. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub start: Option<String>,
    pub end: Option<String>,
    pub mode: Option<String>,
    pub category: Option<String>,
    pub product: Option<String>,
    pub segment: Option<String>,
}

impl ReportParams {
    /// Resolve into a query against a snapshot with `bounds`.
    ///
    /// Missing dates come from `default_window`, widened so a single given
    /// date never produces an inverted window. Only two explicit dates can be
    /// rejected as inverted. The window is clamped to the bounds; a window
    /// entirely outside them is kept as is and simply matches no events.
    pub fn to_query(
        &self,
        bounds: &DateBounds,
        default_window: DateWindow,
    ) -> Result<DashboardQuery, DomainError> {
        let start = parse_date("start", self.start.as_deref())?;
        let end = parse_date("end", self.end.as_deref())?;
        let requested = match (start, end) {
            (Some(start), Some(end)) => DateWindow::new(start, end)?,
            (Some(start), None) => DateWindow::new(start, default_window.end().max(start))?,
            (None, Some(end)) => DateWindow::new(default_window.start().min(end), end)?,
            (None, None) => default_window,
        };
        let window = bounds.clamp(requested).unwrap_or(requested);

        let mode = match non_empty(self.mode.as_deref()) {
            Some(m) => m.parse::<Mode>()?,
            None => Mode::default(),
        };

        let mut selection = Selection::all();
        if let Some(c) = non_empty(self.category.as_deref()) {
            selection = selection.with_category(c);
        }
        if let Some(p) = non_empty(self.product.as_deref()) {
            selection = selection.with_product(p);
        }
        if let Some(s) = non_empty(self.segment.as_deref()) {
            selection = selection.with_segment(s.parse::<Segment>()?);
        }

        Ok(DashboardQuery::new(window, mode).with_selection(selection))
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, DomainError> {
    match non_empty(raw) {
        None => Ok(None),
        Some(s) => parse_iso_date(s).map(Some).ok_or_else(|| {
            DomainError::validation(format!("{field} must be a YYYY-MM-DD date (got {s:?})"))
        }),
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub load_id: LoadId,
    pub loaded_at: DateTime<Utc>,
    pub bounds: DateBounds,
    #[serde(flatten)]
    pub report: DashboardReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentsResponse {
    pub load_id: LoadId,
    pub window: DateWindow,
    pub mode: Mode,
    pub segments: SegmentRollup,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionsResponse {
    pub bounds: DateBounds,
    pub bounds_from_data: bool,
    pub default_window: DateWindow,
    pub categories: Vec<String>,
    pub products: Vec<String>,
    pub modes: Vec<Mode>,
    pub segments: Vec<SegmentOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentOption {
    pub segment: Segment,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsResponse {
    pub load_id: LoadId,
    pub loaded_at: DateTime<Utc>,
    pub source: String,
    pub record_count: usize,
    pub bounds: DateBounds,
    pub bounds_from_data: bool,
    pub cache_ttl_secs: u64,
    pub diagnostics: LoadDiagnostics,
}
