// 📊 Balance Sheet Dataset - Fixed Annual Figures
// Immutable yearly records plus the independently authored growth-rate table

use serde::{Deserialize, Serialize};

// ============================================================================
// RECORDS
// ============================================================================

/// One year's balance-sheet snapshot, in thousand-RUB units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub year: i32,
    pub total_balance: f64,
    pub fixed_assets: f64,
    pub equity: f64,
    pub long_term_assets: f64,
    pub short_term_assets: f64,
}

/// Year-over-year growth rates, in percent.
///
/// Authored alongside the balance figures rather than recomputed from them,
/// so a row may not reconcile exactly with a percent change of the raw
/// records. Treated as the authoritative source throughout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    pub year: i32,
    pub total_balance_growth: f64,
    pub fixed_assets_growth: f64,
    pub equity_growth: f64,
}

// ============================================================================
// METRIC SELECTORS
// ============================================================================

/// The five balance-sheet fields a chart or table row can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    TotalBalance,
    FixedAssets,
    Equity,
    LongTermAssets,
    ShortTermAssets,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::TotalBalance,
        Metric::FixedAssets,
        Metric::Equity,
        Metric::LongTermAssets,
        Metric::ShortTermAssets,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::TotalBalance => "Total balance",
            Metric::FixedAssets => "Fixed assets",
            Metric::Equity => "Equity",
            Metric::LongTermAssets => "Long-term assets",
            Metric::ShortTermAssets => "Short-term assets",
        }
    }

    pub fn value_of(&self, record: &FinancialRecord) -> f64 {
        match self {
            Metric::TotalBalance => record.total_balance,
            Metric::FixedAssets => record.fixed_assets,
            Metric::Equity => record.equity,
            Metric::LongTermAssets => record.long_term_assets,
            Metric::ShortTermAssets => record.short_term_assets,
        }
    }

    /// Next metric in display order, wrapping around.
    pub fn next(&self) -> Metric {
        let idx = Metric::ALL.iter().position(|m| m == self).unwrap_or(0);
        Metric::ALL[(idx + 1) % Metric::ALL.len()]
    }
}

/// The three fields tracked by the growth-rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthField {
    TotalBalance,
    FixedAssets,
    Equity,
}

impl GrowthField {
    pub const ALL: [GrowthField; 3] = [
        GrowthField::TotalBalance,
        GrowthField::FixedAssets,
        GrowthField::Equity,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GrowthField::TotalBalance => "Total balance",
            GrowthField::FixedAssets => "Fixed assets",
            GrowthField::Equity => "Equity",
        }
    }

    pub fn value_of(&self, record: &GrowthRecord) -> f64 {
        match self {
            GrowthField::TotalBalance => record.total_balance_growth,
            GrowthField::FixedAssets => record.fixed_assets_growth,
            GrowthField::Equity => record.equity_growth,
        }
    }
}

// ============================================================================
// DATASET
// ============================================================================

/// The full immutable dataset: yearly records ascending by unique year, plus
/// growth rows keyed one-to-one with every year except the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<FinancialRecord>,
    growth: Vec<GrowthRecord>,
}

impl Dataset {
    pub fn new(records: Vec<FinancialRecord>, growth: Vec<GrowthRecord>) -> Self {
        Dataset { records, growth }
    }

    /// The baked-in 2016-2023 figures.
    pub fn baked() -> Self {
        let records = vec![
            record(2016, 9037.0, 5365.0, 4507.0, 5521.0, 3516.0),
            record(2017, 9693.0, 5719.0, 4311.0, 5749.0, 3944.0),
            record(2018, 9277.0, 5037.0, 3449.0, 5151.0, 4126.0),
            record(2019, 9277.0, 5037.0, 3449.0, 5151.0, 4126.0),
            record(2020, 10469.0, 4326.0, 2521.0, 4423.0, 6046.0),
            record(2021, 11774.0, 4802.0, 3129.0, 4985.0, 7253.0),
            record(2022, 11847.0, 9586.0, 3386.0, 9677.0, 7146.0),
            record(2023, 16823.0, 10285.0, 7463.0, 10339.0, 7349.0),
        ];
        let growth = vec![
            growth_row(2017, 7.26, 6.60, -4.35),
            growth_row(2018, -4.29, -11.93, -20.00),
            growth_row(2019, 0.00, 0.00, 0.00),
            growth_row(2020, 12.85, -14.12, -26.91),
            growth_row(2021, 12.47, 11.00, 24.12),
            growth_row(2022, 0.62, 99.63, 8.21),
            growth_row(2023, 42.00, 7.29, 120.41),
        ];
        Dataset { records, growth }
    }

    pub fn records(&self) -> &[FinancialRecord] {
        &self.records
    }

    pub fn growth(&self) -> &[GrowthRecord] {
        &self.growth
    }

    pub fn years(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.year).collect()
    }

    pub fn record_for_year(&self, year: i32) -> Option<&FinancialRecord> {
        self.records.iter().find(|r| r.year == year)
    }

    pub fn growth_for_year(&self, year: i32) -> Option<&GrowthRecord> {
        self.growth.iter().find(|g| g.year == year)
    }

    pub fn first_year(&self) -> Option<i32> {
        self.records.first().map(|r| r.year)
    }

    pub fn last_year(&self) -> Option<i32> {
        self.records.last().map(|r| r.year)
    }
}

fn record(
    year: i32,
    total_balance: f64,
    fixed_assets: f64,
    equity: f64,
    long_term_assets: f64,
    short_term_assets: f64,
) -> FinancialRecord {
    FinancialRecord {
        year,
        total_balance,
        fixed_assets,
        equity,
        long_term_assets,
        short_term_assets,
    }
}

fn growth_row(
    year: i32,
    total_balance_growth: f64,
    fixed_assets_growth: f64,
    equity_growth: f64,
) -> GrowthRecord {
    GrowthRecord {
        year,
        total_balance_growth,
        fixed_assets_growth,
        equity_growth,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baked_dataset_shape() {
        let dataset = Dataset::baked();
        assert_eq!(dataset.records().len(), 8);
        assert_eq!(dataset.growth().len(), 7);
        assert_eq!(dataset.first_year(), Some(2016));
        assert_eq!(dataset.last_year(), Some(2023));
    }

    #[test]
    fn test_years_ascending_and_unique() {
        let years = Dataset::baked().years();
        for pair in years.windows(2) {
            assert!(pair[0] < pair[1], "years must be ascending and unique");
        }
    }

    #[test]
    fn test_every_growth_year_resolves_to_a_record() {
        let dataset = Dataset::baked();
        for row in dataset.growth() {
            assert!(
                dataset.record_for_year(row.year).is_some(),
                "growth year {} has no balance record",
                row.year
            );
        }
    }

    #[test]
    fn test_first_year_has_no_growth_row() {
        let dataset = Dataset::baked();
        assert!(dataset.growth_for_year(2016).is_none());
        assert!(dataset.growth_for_year(2017).is_some());
    }

    #[test]
    fn test_metric_accessors() {
        let dataset = Dataset::baked();
        let r2016 = dataset.record_for_year(2016).unwrap();
        assert_eq!(Metric::TotalBalance.value_of(r2016), 9037.0);
        assert_eq!(Metric::Equity.value_of(r2016), 4507.0);

        let g2023 = dataset.growth_for_year(2023).unwrap();
        assert_eq!(GrowthField::Equity.value_of(g2023), 120.41);
    }

    #[test]
    fn test_metric_cycle_wraps() {
        let mut metric = Metric::TotalBalance;
        for _ in 0..Metric::ALL.len() {
            metric = metric.next();
        }
        assert_eq!(metric, Metric::TotalBalance);
    }

    #[test]
    fn test_missing_year_lookup() {
        let dataset = Dataset::baked();
        assert!(dataset.record_for_year(1999).is_none());
        assert!(dataset.growth_for_year(2024).is_none());
    }
}
