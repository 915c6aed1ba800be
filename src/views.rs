// 🔄 View Synchronizer
// Turns (Dataset, Selection) into the declarative inputs each view renders
// from. One call rebuilds every view input together, so no chart or table can
// show stale filter state. Pure and idempotent: equal selections produce
// equal outputs, and each call hands back fresh instances the caller swaps in
// wholesale, dropping the previous generation.

use serde::Serialize;

use crate::data::{Dataset, GrowthField, Metric};
use crate::metrics::{
    classify_change, format_scaled, growth_bar_bucket, percent_change, scale, trend_line,
    ChangeStatus, GrowthBucket,
};
use crate::selection::Selection;

// ============================================================================
// PALETTE
// ============================================================================

/// Chart color scheme, hex. The UI layer maps these to terminal colors.
pub const CHART_COLORS: [&str; 5] = ["#1FB8CD", "#FFC185", "#B4413C", "#ECEBD5", "#5D878F"];

const COLOR_PRIMARY: &str = CHART_COLORS[0];
const COLOR_ACCENT: &str = CHART_COLORS[1];
const COLOR_ALERT: &str = CHART_COLORS[2];
const COLOR_DEEP: &str = CHART_COLORS[4];

// ============================================================================
// VIEW INPUTS
// ============================================================================

/// One line-chart series: ordered points aligned with the year labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<f64>,
    pub color: &'static str,
}

/// Trend/line chart input. `years` and every series are index-aligned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChartInput {
    pub title: String,
    pub x_title: &'static str,
    pub y_title: String,
    pub years: Vec<i32>,
    pub series: Vec<Series>,
}

/// One growth bar, colored by its own bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthBar {
    pub value: f64,
    pub bucket: GrowthBucket,
    pub color: &'static str,
}

/// One growth-chart series across the selected years.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthSeries {
    pub label: &'static str,
    pub bars: Vec<GrowthBar>,
}

/// Growth/bar chart input. `years` and every series are index-aligned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChartInput {
    pub title: String,
    pub years: Vec<i32>,
    pub series: Vec<GrowthSeries>,
}

/// One slice of the structure breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: &'static str,
    /// Raw thousand-RUB value, not unit-scaled.
    pub value: f64,
    /// Percent share of the year's total, one decimal. None if the total is 0.
    pub share: Option<f64>,
    pub color: &'static str,
}

/// Structure/pie chart input. Empty slices when the year is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureChartInput {
    pub title: String,
    pub slices: Vec<Slice>,
}

/// One metrics-table row comparing the dataset's last year to its first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub label: &'static str,
    /// Display-ready latest-year value; millions keep one decimal.
    pub current: String,
    /// Display-ready first-year value; millions keep one decimal.
    pub baseline: String,
    /// Percent change of the raw values; None when the baseline is zero.
    pub change: Option<f64>,
    pub status: ChangeStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub unit_label: &'static str,
    pub current_year: i32,
    pub baseline_year: i32,
    pub rows: Vec<TableRow>,
}

/// Everything the dashboard renders, rebuilt as one unit per selection change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardViews {
    pub trend: LineChartInput,
    pub growth: BarChartInput,
    pub structure: StructureChartInput,
    pub table: TableView,
}

// ============================================================================
// SYNCHRONIZER
// ============================================================================

pub fn build_views(dataset: &Dataset, selection: &Selection) -> DashboardViews {
    DashboardViews {
        trend: build_trend(dataset, selection),
        growth: build_growth(dataset, selection),
        structure: build_structure(dataset, selection),
        table: build_table(dataset, selection),
    }
}

pub fn build_trend(dataset: &Dataset, selection: &Selection) -> LineChartInput {
    let metric = selection.metric;
    let units = selection.units;

    let filtered: Vec<_> = dataset
        .records()
        .iter()
        .filter(|r| selection.years.contains(&r.year))
        .collect();
    let years: Vec<i32> = filtered.iter().map(|r| r.year).collect();
    let values: Vec<f64> = filtered
        .iter()
        .map(|r| scale(metric.value_of(r), units))
        .collect();

    let mut series = vec![Series {
        label: metric.label().to_string(),
        points: values.clone(),
        color: COLOR_PRIMARY,
    }];

    if selection.show_trend {
        if let Some(fitted) = trend_line(&years, &values) {
            series.push(Series {
                label: "Trend".to_string(),
                points: fitted,
                color: COLOR_ALERT,
            });
        }
    }

    LineChartInput {
        title: format!("{} ({})", metric.label(), units.label()),
        x_title: "Year",
        y_title: format!("Value ({})", units.label()),
        years,
        series,
    }
}

pub fn build_growth(dataset: &Dataset, selection: &Selection) -> BarChartInput {
    let filtered: Vec<_> = dataset
        .growth()
        .iter()
        .filter(|g| selection.years.contains(&g.year))
        .collect();
    let years: Vec<i32> = filtered.iter().map(|g| g.year).collect();

    let series = GrowthField::ALL
        .iter()
        .map(|field| GrowthSeries {
            label: field.label(),
            bars: filtered
                .iter()
                .map(|row| {
                    let value = field.value_of(row);
                    let bucket = growth_bar_bucket(value);
                    GrowthBar {
                        value,
                        bucket,
                        color: bucket_color(bucket),
                    }
                })
                .collect(),
        })
        .collect();

    BarChartInput {
        title: "Growth rates of key figures (%)".to_string(),
        years,
        series,
    }
}

fn bucket_color(bucket: GrowthBucket) -> &'static str {
    match bucket {
        GrowthBucket::Extreme => COLOR_ALERT,
        GrowthBucket::Positive => COLOR_PRIMARY,
        GrowthBucket::NonPositive => COLOR_DEEP,
    }
}

pub fn build_structure(dataset: &Dataset, selection: &Selection) -> StructureChartInput {
    let record = match dataset.record_for_year(selection.structure_year) {
        Some(r) => r,
        // Missing year: placeholder input, nothing to slice
        None => {
            return StructureChartInput {
                title: format!("Asset structure, {} (no data)", selection.structure_year),
                slices: Vec::new(),
            }
        }
    };

    let total = record.long_term_assets + record.short_term_assets;
    let slices = vec![
        Slice {
            label: "Long-term assets",
            value: record.long_term_assets,
            share: slice_share(record.long_term_assets, total),
            color: COLOR_PRIMARY,
        },
        Slice {
            label: "Short-term assets",
            value: record.short_term_assets,
            share: slice_share(record.short_term_assets, total),
            color: COLOR_ACCENT,
        },
    ];

    StructureChartInput {
        title: format!("Asset structure, {}", record.year),
        slices,
    }
}

fn slice_share(value: f64, total: f64) -> Option<f64> {
    if total == 0.0 {
        return None;
    }
    Some(crate::metrics::round1(value / total * 100.0))
}

pub fn build_table(dataset: &Dataset, selection: &Selection) -> TableView {
    let units = selection.units;
    let (first, last) = match (dataset.records().first(), dataset.records().last()) {
        (Some(f), Some(l)) => (f, l),
        _ => {
            return TableView {
                unit_label: units.label(),
                current_year: 0,
                baseline_year: 0,
                rows: Vec::new(),
            }
        }
    };

    let rows = Metric::ALL
        .iter()
        .map(|metric| {
            let current_raw = metric.value_of(last);
            let baseline_raw = metric.value_of(first);
            let change = percent_change(current_raw, baseline_raw);
            TableRow {
                label: metric.label(),
                current: format_scaled(current_raw, units),
                baseline: format_scaled(baseline_raw, units),
                change,
                status: change.map(classify_change).unwrap_or(ChangeStatus::Neutral),
            }
        })
        .collect();

    TableView {
        unit_label: units.label(),
        current_year: last.year,
        baseline_year: first.year,
        rows,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FinancialRecord, GrowthRecord};
    use crate::selection::{SelectionEvent, Units};

    fn baked_selection() -> (Dataset, Selection) {
        let dataset = Dataset::baked();
        let selection = Selection::all_years(&dataset);
        (dataset, selection)
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let (dataset, selection) = baked_selection();
        let first = build_views(&dataset, &selection);
        let second = build_views(&dataset, &selection);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_selection_yields_empty_series() {
        let (dataset, mut selection) = baked_selection();
        selection.apply(&dataset, SelectionEvent::ClearYears);

        let views = build_views(&dataset, &selection);
        assert!(views.trend.years.is_empty());
        assert_eq!(views.trend.series.len(), 1); // metric series only, no trend
        assert!(views.trend.series[0].points.is_empty());
        assert!(views.growth.years.is_empty());
        for series in &views.growth.series {
            assert!(series.bars.is_empty());
        }
    }

    #[test]
    fn test_trend_series_present_with_enough_points() {
        let (dataset, selection) = baked_selection();
        let trend = build_trend(&dataset, &selection);
        assert_eq!(trend.series.len(), 2);
        assert_eq!(trend.series[1].label, "Trend");
        assert_eq!(trend.series[1].points.len(), 8);
    }

    #[test]
    fn test_trend_skipped_for_single_point() {
        let (dataset, mut selection) = baked_selection();
        selection.apply(&dataset, SelectionEvent::ClearYears);
        selection.apply(&dataset, SelectionEvent::ToggleYear(2020));

        let trend = build_trend(&dataset, &selection);
        assert_eq!(trend.years, vec![2020]);
        assert_eq!(trend.series.len(), 1);
    }

    #[test]
    fn test_trend_respects_units() {
        let (dataset, mut selection) = baked_selection();
        selection.apply(&dataset, SelectionEvent::ToggleUnits);

        let trend = build_trend(&dataset, &selection);
        assert_eq!(trend.series[0].points[0], 9.0); // 9037 -> 9.0 mln
        assert!(trend.title.contains("million RUB"));
    }

    #[test]
    fn test_growth_bars_colored_by_bucket() {
        let (dataset, selection) = baked_selection();
        let growth = build_growth(&dataset, &selection);

        // fixed assets 2022: 99.63 -> extreme
        let fixed = &growth.series[1];
        assert_eq!(fixed.label, "Fixed assets");
        let idx_2022 = growth.years.iter().position(|&y| y == 2022).unwrap();
        assert_eq!(fixed.bars[idx_2022].bucket, GrowthBucket::Extreme);
        assert_eq!(fixed.bars[idx_2022].color, CHART_COLORS[2]);

        // total balance 2019: exactly 0 -> non-positive color
        let total = &growth.series[0];
        let idx_2019 = growth.years.iter().position(|&y| y == 2019).unwrap();
        assert_eq!(total.bars[idx_2019].bucket, GrowthBucket::NonPositive);
        assert_eq!(total.bars[idx_2019].color, CHART_COLORS[4]);
    }

    #[test]
    fn test_structure_shares_sum_to_hundred() {
        let (dataset, selection) = baked_selection();
        let structure = build_structure(&dataset, &selection);
        assert_eq!(structure.slices.len(), 2);

        let total: f64 = structure.slices.iter().filter_map(|s| s.share).sum();
        assert!((total - 100.0).abs() < 0.2, "shares sum to ~100, got {total}");
    }

    #[test]
    fn test_structure_missing_year_is_placeholder() {
        let (dataset, mut selection) = baked_selection();
        // bypass event validation to simulate a stale control value
        selection.structure_year = 1999;

        let structure = build_structure(&dataset, &selection);
        assert!(structure.slices.is_empty());
        assert!(structure.title.contains("no data"));
    }

    #[test]
    fn test_table_compares_first_and_last_year() {
        let (dataset, selection) = baked_selection();
        let table = build_table(&dataset, &selection);

        assert_eq!(table.baseline_year, 2016);
        assert_eq!(table.current_year, 2023);
        assert_eq!(table.rows.len(), 5);

        let total = &table.rows[0];
        assert_eq!(total.label, "Total balance");
        assert_eq!(total.current, "16823");
        assert_eq!(total.baseline, "9037");
        assert_eq!(total.change, Some(86.2));
        assert_eq!(total.status, ChangeStatus::Positive);
    }

    #[test]
    fn test_table_zero_baseline_renders_placeholder() {
        let records = vec![
            FinancialRecord {
                year: 2016,
                total_balance: 100.0,
                fixed_assets: 10.0,
                equity: 0.0,
                long_term_assets: 60.0,
                short_term_assets: 40.0,
            },
            FinancialRecord {
                year: 2017,
                total_balance: 120.0,
                fixed_assets: 12.0,
                equity: 5.0,
                long_term_assets: 70.0,
                short_term_assets: 50.0,
            },
        ];
        let growth = vec![GrowthRecord {
            year: 2017,
            total_balance_growth: 20.0,
            fixed_assets_growth: 20.0,
            equity_growth: 0.0,
        }];
        let dataset = Dataset::new(records, growth);
        let selection = Selection::all_years(&dataset);

        let table = build_table(&dataset, &selection);
        let equity = table.rows.iter().find(|r| r.label == "Equity").unwrap();
        assert_eq!(equity.change, None);
        assert_eq!(equity.status, ChangeStatus::Neutral);
    }

    #[test]
    fn test_table_scales_values_in_millions() {
        let (dataset, mut selection) = baked_selection();
        selection.units = Units::Millions;

        let table = build_table(&dataset, &selection);
        assert_eq!(table.unit_label, "million RUB");
        assert_eq!(table.rows[0].current, "16.8");
        assert_eq!(table.rows[0].baseline, "9.0");
        // change computed from raw values, not the scaled ones
        assert_eq!(table.rows[0].change, Some(86.2));
    }

    #[test]
    fn test_table_millions_keep_one_decimal() {
        // 9037 thousand is exactly 9.0 million; the display string must not
        // collapse to "9"
        let (dataset, mut selection) = baked_selection();
        selection.units = Units::Millions;

        let table = build_table(&dataset, &selection);
        assert_eq!(table.rows[0].baseline, "9.0");
        for row in &table.rows {
            assert!(
                row.current.contains('.') && row.baseline.contains('.'),
                "million values carry a decimal, got {} / {}",
                row.current,
                row.baseline
            );
        }
    }

    #[test]
    fn test_views_follow_year_filter() {
        let (dataset, mut selection) = baked_selection();
        selection.apply(&dataset, SelectionEvent::ToggleYear(2016));
        selection.apply(&dataset, SelectionEvent::ToggleYear(2023));

        let views = build_views(&dataset, &selection);
        assert_eq!(views.trend.years, vec![2017, 2018, 2019, 2020, 2021, 2022]);
        // 2016 never had a growth row, so only 2023 drops out here
        assert_eq!(views.growth.years, vec![2017, 2018, 2019, 2020, 2021, 2022]);
    }
}
