//! Calendar-date windows.
//!
//! Movement events carry a calendar date with no time-of-day. Every stage that
//! restricts history works on a closed `[start, end]` window of such dates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// The only accepted wire format for event dates.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a strict `YYYY-MM-DD` date.
///
/// Returns `None` for anything else, including single-digit months/days and
/// out-of-range components such as `2025-13-40`.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let bytes = raw.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT).ok()
}

/// Closed date interval `[start, end]` with `start <= end`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> DomainResult<Self> {
        if start > end {
            return Err(DomainError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl ValueObject for DateWindow {}

/// Earliest and latest event date observed in a full load.
///
/// Bounds every date-range selection made against that load.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    min: NaiveDate,
    max: NaiveDate,
}

impl DateBounds {
    pub fn new(min: NaiveDate, max: NaiveDate) -> DomainResult<Self> {
        if min > max {
            return Err(DomainError::InvalidWindow {
                start: min,
                end: max,
            });
        }
        Ok(Self { min, max })
    }

    /// Fold a set of dates into bounds; `None` when the set is empty.
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Option<Self> {
        dates.into_iter().fold(None, |acc, d| match acc {
            None => Some(Self { min: d, max: d }),
            Some(b) => Some(Self {
                min: b.min.min(d),
                max: b.max.max(d),
            }),
        })
    }

    pub fn min(&self) -> NaiveDate {
        self.min
    }

    pub fn max(&self) -> NaiveDate {
        self.max
    }

    pub fn as_window(&self) -> DateWindow {
        DateWindow {
            start: self.min,
            end: self.max,
        }
    }

    /// Intersect `window` with the bounds.
    ///
    /// `None` when the window lies entirely outside.
    pub fn clamp(&self, window: DateWindow) -> Option<DateWindow> {
        let start = window.start.max(self.min);
        let end = window.end.min(self.max);
        (start <= end).then_some(DateWindow { start, end })
    }

    /// The preferred window clamped to the bounds, or the whole bounds when
    /// the preferred window does not overlap them.
    pub fn default_selection(&self, preferred: DateWindow) -> DateWindow {
        self.clamp(preferred).unwrap_or_else(|| self.as_window())
    }
}

impl ValueObject for DateBounds {}
