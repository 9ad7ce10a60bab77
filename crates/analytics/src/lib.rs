//! `storepulse-analytics`
//!
//! **Responsibility:** the aggregation and segmentation pipeline.
//!
//! Every stage is a pure function over product records:
//! - `derive`: movement history → sold/restocked totals and revenue
//! - `window`: restrict history to a date window and recompute
//! - `segment`: quantile-based price tiers
//! - `rollup`: per-tier totals with percentage-of-total
//!
//! `pipeline` chains them (plus KPIs, rankings and the daily series) into
//! one parameterized dashboard report. No IO happens here.

pub mod derive;
pub mod kpi;
pub mod mode;
pub mod pipeline;
pub mod quantile;
pub mod ranking;
pub mod rollup;
pub mod segment;
pub mod selection;
pub mod series;
pub mod window;

pub use derive::{derive, derive_all, derive_metrics, DerivedLoad};
pub use kpi::{compute_kpis, Kpis};
pub use mode::Mode;
pub use pipeline::{DashboardPipeline, DashboardQuery, DashboardReport};
pub use quantile::{quantile, QuantileProfile};
pub use ranking::{rank_products, ProductRanking, RankedProduct, SlowMovers};
pub use rollup::{rollup, SegmentRollup, SegmentRow};
pub use segment::{SegmentLabels, SegmentThresholds, Segmenter};
pub use selection::{filter_options, FilterOptions, Selection};
pub use series::{daily_series, DailyPoint};
pub use window::filter_record;
