//! The dashboard pipeline: Filter → Segment → Rollup over derived records,
//! plus the KPI, ranking and daily-series views of the same set.
//!
//! Order of operations for one query:
//! 1. keep records matching the category/product selection
//! 2. restrict each record's history to the window (metrics recomputed)
//! 3. segment the resulting set by price
//! 4. roll the set up by segment
//! 5. apply the segment selection, then compute KPIs, rankings, series and
//!    detail rows from what is left
//!
//! The rollup in step 4 is taken before the segment selection so the
//! breakdown always describes the whole selected set.

use serde::{Deserialize, Serialize};

use storepulse_catalog::ProductRecord;
use storepulse_core::DateWindow;

use crate::kpi::{compute_kpis, Kpis};
use crate::mode::Mode;
use crate::quantile::QuantileProfile;
use crate::ranking::{rank_products, ProductRanking};
use crate::rollup::{rollup, SegmentRollup};
use crate::segment::{SegmentLabels, SegmentThresholds, Segmenter};
use crate::selection::Selection;
use crate::series::{daily_series, DailyPoint};
use crate::window::filter_record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardQuery {
    pub window: DateWindow,
    pub mode: Mode,
    pub selection: Selection,
}

impl DashboardQuery {
    pub fn new(window: DateWindow, mode: Mode) -> Self {
        Self {
            window,
            mode,
            selection: Selection::all(),
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub window: DateWindow,
    pub mode: Mode,
    pub selection: Selection,
    pub thresholds: SegmentThresholds,
    pub kpis: Kpis,
    pub ranking: ProductRanking,
    pub daily: Vec<DailyPoint>,
    pub segments: SegmentRollup,
    pub products: Vec<ProductRecord>,
}

/// Filtered and segmented records, before the segment selection.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSet {
    pub records: Vec<ProductRecord>,
    pub thresholds: SegmentThresholds,
}

/// One parameterized pipeline; quantile cutoffs and labels are configuration.
#[derive(Debug, Clone)]
pub struct DashboardPipeline {
    segmenter: Segmenter,
    labels: SegmentLabels,
    ranking_limit: usize,
}

impl Default for DashboardPipeline {
    fn default() -> Self {
        Self::new(QuantileProfile::default(), SegmentLabels::default())
    }
}

impl DashboardPipeline {
    pub fn new(profile: QuantileProfile, labels: SegmentLabels) -> Self {
        Self {
            segmenter: Segmenter::new(profile),
            labels,
            ranking_limit: 5,
        }
    }

    pub fn with_ranking_limit(mut self, limit: usize) -> Self {
        self.ranking_limit = limit;
        self
    }

    pub fn labels(&self) -> &SegmentLabels {
        &self.labels
    }

    pub fn profile(&self) -> &QuantileProfile {
        self.segmenter.profile()
    }

    /// Steps 1-3: select, window, segment.
    pub fn prepare(&self, records: &[ProductRecord], query: &DashboardQuery) -> PreparedSet {
        let mut selected: Vec<ProductRecord> = records
            .iter()
            .filter(|r| query.selection.matches_catalog(r))
            .map(|r| filter_record(r, &query.window))
            .collect();
        let thresholds = self.segmenter.assign(&mut selected);

        PreparedSet {
            records: selected,
            thresholds,
        }
    }

    /// Steps 1-4 only.
    pub fn segments(&self, records: &[ProductRecord], query: &DashboardQuery) -> SegmentRollup {
        let prepared = self.prepare(records, query);
        rollup(&prepared.records, query.mode, &self.labels)
    }

    pub fn run(&self, records: &[ProductRecord], query: &DashboardQuery) -> DashboardReport {
        let PreparedSet {
            records: prepared,
            thresholds,
        } = self.prepare(records, query);

        let segments = rollup(&prepared, query.mode, &self.labels);

        let products: Vec<ProductRecord> = prepared
            .into_iter()
            .filter(|r| query.selection.matches_segment(r))
            .collect();

        DashboardReport {
            window: query.window,
            mode: query.mode,
            selection: query.selection.clone(),
            thresholds,
            kpis: compute_kpis(&products, query.mode),
            ranking: rank_products(&products, query.mode, self.ranking_limit),
            daily: daily_series(&products, query.mode),
            segments,
            products,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive;
    use crate::ranking::SlowMovers;
    use chrono::NaiveDate;
    use storepulse_catalog::{Segment, StockEvent};
    use storepulse_core::ProductId;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn rec(name: &str, category: &str, price: u64, events: Vec<StockEvent>) -> ProductRecord {
        derive(
            ProductRecord::new(ProductId::new(name), name, Some(price))
                .with_category(category)
                .with_history(events),
        )
    }

    fn catalog() -> Vec<ProductRecord> {
        vec![
            rec("house blend", "coffee", 1000, vec![
                StockEvent::new(d(3, 1), 5, 10),
                StockEvent::new(d(4, 15), 50, 0),
            ]),
            rec("green tea", "tea", 2000, vec![StockEvent::new(d(3, 2), 0, 4)]),
            rec("single origin", "coffee", 9000, vec![
                StockEvent::new(d(3, 3), 10, 2),
                StockEvent::new(d(3, 4), 0, 1),
            ]),
        ]
    }

    fn march() -> DateWindow {
        DateWindow::new(d(3, 1), d(3, 31)).unwrap()
    }

    #[test]
    fn full_report_for_a_window() {
        let p = DashboardPipeline::default();
        let report = p.run(&catalog(), &DashboardQuery::new(march(), Mode::Sales));

        // april sale of house blend is outside the window
        assert_eq!(report.kpis.total_quantity, 15);
        assert_eq!(report.kpis.total_revenue, 5000 + 90000);
        assert_eq!(report.kpis.top_product.as_deref(), Some("single origin"));

        let revenue: Vec<u64> = report.segments.rows.iter().map(|r| r.revenue).collect();
        assert_eq!(revenue, vec![5000, 0, 90000]);

        assert_eq!(report.daily.len(), 4);
        assert_eq!(report.daily[0].date, d(3, 1));
        assert_eq!(report.products.len(), 3);
        assert!(report.products.iter().all(|r| r.segment.is_some()));
        assert!(matches!(report.ranking.slow, SlowMovers::Listed { .. }));
    }

    #[test]
    fn category_selection_segments_the_selected_set() {
        let p = DashboardPipeline::default();
        let q = DashboardQuery::new(march(), Mode::Sales)
            .with_selection(Selection::all().with_category("coffee"));
        let report = p.run(&catalog(), &q);

        assert_eq!(report.products.len(), 2);
        // quartiles over {1000, 9000}: 3000 / 7000
        assert_eq!(
            report.thresholds,
            SegmentThresholds::Percentile { lower: 3000.0, upper: 7000.0 }
        );
        let segs: Vec<_> = report.products.iter().map(|r| r.segment.unwrap()).collect();
        assert_eq!(segs, vec![Segment::Low, Segment::High]);
    }

    #[test]
    fn segment_selection_narrows_views_but_not_rollup() {
        let p = DashboardPipeline::default();
        let q = DashboardQuery::new(march(), Mode::Sales)
            .with_selection(Selection::all().with_segment(Segment::High));
        let report = p.run(&catalog(), &q);

        assert_eq!(report.products.len(), 1);
        assert_eq!(report.products[0].name, "single origin");
        assert_eq!(report.kpis.total_revenue, 90000);
        assert_eq!(report.segments.total_revenue, 95000);
    }

    #[test]
    fn empty_selection_is_not_an_error() {
        let p = DashboardPipeline::default();
        let q = DashboardQuery::new(march(), Mode::Stock)
            .with_selection(Selection::all().with_category("pastries"));
        let report = p.run(&catalog(), &q);

        assert!(report.products.is_empty());
        assert_eq!(report.kpis.total_quantity, 0);
        assert_eq!(report.segments.rows.len(), 3);
        assert!(report.daily.is_empty());
        assert_eq!(report.thresholds, SegmentThresholds::Empty);
    }

    #[test]
    fn stock_mode_report() {
        let p = DashboardPipeline::new(QuantileProfile::TERTILE, SegmentLabels::vietnamese());
        let report = p.run(&catalog(), &DashboardQuery::new(march(), Mode::Stock));
        assert_eq!(report.kpis.total_quantity, 17);
        assert_eq!(report.kpis.top_product.as_deref(), Some("house blend"));
        assert_eq!(report.segments.rows[0].label, "Thấp");
    }

    #[test]
    fn report_serializes_tagged_outcomes() {
        let report = DashboardPipeline::default().run(&catalog(), &DashboardQuery::new(march(), Mode::Sales));
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["mode"], "sales");
        assert_eq!(v["thresholds"]["kind"], "percentile");
        assert_eq!(v["ranking"]["slow"]["status"], "listed");
        assert_eq!(v["segments"]["rows"][2]["segment"], "high");
    }

    #[test]
    fn input_records_are_not_mutated() {
        let records = catalog();
        let before = records.clone();
        let _ = DashboardPipeline::default().run(&records, &DashboardQuery::new(march(), Mode::Sales));
        assert_eq!(records, before);
    }
}
