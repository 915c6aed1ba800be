// 📝 Analytics Summary - Narrative Highlights
// Computed over the FULL dataset, never the year filter: average growth,
// best/worst years, and the count of extreme swings.

use serde::Serialize;

use crate::data::{Dataset, GrowthField};
use crate::metrics::round1;

/// Threshold (percent, absolute) above which a swing counts as extreme.
const EXTREME_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    /// Mean total-balance growth across the period, one decimal.
    pub avg_growth: f64,
    pub latest_year: i32,
    pub latest_growth: f64,
    pub max_year: i32,
    pub max_growth: f64,
    pub min_year: i32,
    pub min_growth: f64,
    /// Growth rows where any field exceeds the threshold in absolute value.
    pub extreme_changes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummarySection {
    pub heading: &'static str,
    pub body: String,
}

impl AnalyticsSummary {
    /// None when the dataset carries no growth rows.
    pub fn compute(dataset: &Dataset) -> Option<Self> {
        let growth = dataset.growth();
        let first = growth.first()?;
        let latest = growth.last()?;

        let sum: f64 = growth.iter().map(|g| g.total_balance_growth).sum();
        let avg_growth = round1(sum / growth.len() as f64);

        // first occurrence wins ties, so comparisons are strict
        let mut max = first;
        let mut min = first;
        for row in growth {
            if row.total_balance_growth > max.total_balance_growth {
                max = row;
            }
            if row.total_balance_growth < min.total_balance_growth {
                min = row;
            }
        }

        let extreme_changes = growth
            .iter()
            .filter(|row| {
                GrowthField::ALL
                    .iter()
                    .any(|field| field.value_of(row).abs() > EXTREME_THRESHOLD)
            })
            .count();

        Some(AnalyticsSummary {
            avg_growth,
            latest_year: latest.year,
            latest_growth: latest.total_balance_growth,
            max_year: max.year,
            max_growth: max.total_balance_growth,
            min_year: min.year,
            min_growth: min.total_balance_growth,
            extreme_changes,
        })
    }

    /// The four fixed narrative sections. Display-only.
    pub fn sections(&self) -> Vec<SummarySection> {
        vec![
            SummarySection {
                heading: "Growth dynamics",
                body: format!(
                    "Total balance changed by {:.1}% in {}. Average growth over \
                     the period: {:.1}% per year.",
                    self.latest_growth, self.latest_year, self.avg_growth
                ),
            },
            SummarySection {
                heading: "Extreme changes",
                body: format!(
                    "Strongest growth recorded in {} (+{:.1}%), deepest decline \
                     in {} ({:.1}%).",
                    self.max_year, self.max_growth, self.min_year, self.min_growth
                ),
            },
            SummarySection {
                heading: "Structural shifts",
                body: format!(
                    "{} period(s) show abrupt swings above {:.0}% in at least \
                     one figure and deserve a closer look.",
                    self.extreme_changes, EXTREME_THRESHOLD
                ),
            },
            SummarySection {
                heading: "Overall trend",
                body: "The company shows positive momentum over the period, with \
                       stretches of stabilization followed by strong growth in \
                       the most recent years."
                    .to_string(),
            },
        ]
    }
}

// ============================================================================
// TESTS
// ============================================================================
