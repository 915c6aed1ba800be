// 📐 Derived Metrics Engine
// Pure arithmetic over the dataset: unit scaling, percent change,
// least-squares trend fitting and growth-bucket classification.

use serde::{Deserialize, Serialize};

use crate::selection::Units;

// ============================================================================
// SCALING
// ============================================================================

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Scale a thousand-unit value for display.
///
/// Thousands pass through untouched; millions divide by 1000 and round to one
/// decimal. Sign is always preserved.
pub fn scale(value: f64, units: Units) -> f64 {
    match units {
        Units::Thousands => value,
        Units::Millions => round1(value / 1000.0),
    }
}

/// Display string for a scaled value. Millions always carry one decimal.
pub fn format_scaled(value: f64, units: Units) -> String {
    match units {
        Units::Thousands => format!("{}", scale(value, units)),
        Units::Millions => format!("{:.1}", scale(value, units)),
    }
}

// ============================================================================
// PERCENT CHANGE
// ============================================================================

/// `(current - baseline) / baseline * 100`, one-decimal rounding.
///
/// Returns `None` when the baseline is zero; callers render a placeholder
/// instead of propagating NaN into any view.
pub fn percent_change(current: f64, baseline: f64) -> Option<f64> {
    if baseline == 0.0 {
        return None;
    }
    Some(round1((current - baseline) / baseline * 100.0))
}

/// Three-way status of a percent change. Exactly 0 is Neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeStatus {
    Positive,
    Negative,
    Neutral,
}

impl ChangeStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ChangeStatus::Positive => "Growth",
            ChangeStatus::Negative => "Decline",
            ChangeStatus::Neutral => "Stable",
        }
    }
}

pub fn classify_change(percent: f64) -> ChangeStatus {
    if percent == 0.0 {
        ChangeStatus::Neutral
    } else if percent > 0.0 {
        ChangeStatus::Positive
    } else {
        ChangeStatus::Negative
    }
}

// ============================================================================
// TREND LINE
// ============================================================================

/// Ordinary least-squares linear fit over the selected points, returning the
/// fitted value at each x.
///
/// Returns `None` for fewer than two points, mismatched inputs, or a zero
/// denominator (all x identical); callers skip the trend series entirely.
pub fn trend_line(years: &[i32], values: &[f64]) -> Option<Vec<f64>> {
    let n = years.len();
    if n < 2 || n != values.len() {
        return None;
    }

    let nf = n as f64;
    let sum_x: f64 = years.iter().map(|&x| x as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = years
        .iter()
        .zip(values.iter())
        .map(|(&x, &y)| x as f64 * y)
        .sum();
    let sum_xx: f64 = years.iter().map(|&x| (x as f64) * (x as f64)).sum();

    let denominator = nf * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }

    let slope = (nf * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / nf;

    Some(years.iter().map(|&x| slope * x as f64 + intercept).collect())
}

// ============================================================================
// GROWTH BAR BUCKETS
// ============================================================================

/// Color bucket for a growth-rate bar.
///
/// Note: exactly 0% lands in `NonPositive`, unlike `classify_change` which
/// has a separate neutral bucket. The source dashboard did the same; kept
/// as-is rather than silently unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthBucket {
    Extreme,
    Positive,
    NonPositive,
}

pub fn growth_bar_bucket(percent: f64) -> GrowthBucket {
    if percent.abs() > 50.0 {
        GrowthBucket::Extreme
    } else if percent > 0.0 {
        GrowthBucket::Positive
    } else {
        GrowthBucket::NonPositive
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_thousands_is_identity() {
        assert_eq!(scale(9037.0, Units::Thousands), 9037.0);
        assert_eq!(scale(-250.0, Units::Thousands), -250.0);
    }

    #[test]
    fn test_scale_millions_divides_and_rounds() {
        assert_eq!(scale(9037.0, Units::Millions), 9.0);
        assert_eq!(scale(16823.0, Units::Millions), 16.8);
        assert_eq!(scale(-1550.0, Units::Millions), -1.6);
    }

    #[test]
    fn test_format_scaled() {
        assert_eq!(format_scaled(9037.0, Units::Thousands), "9037");
        assert_eq!(format_scaled(9037.0, Units::Millions), "9.0");
    }

    #[test]
    fn test_percent_change_formula() {
        assert_eq!(percent_change(110.0, 100.0), Some(10.0));
        // 2018 vs 2017 total balance from the baked data
        assert_eq!(percent_change(9277.0, 9693.0), Some(-4.3));
        assert_eq!(percent_change(100.0, 100.0), Some(0.0));
    }

    #[test]
    fn test_percent_change_zero_baseline() {
        assert_eq!(percent_change(42.0, 0.0), None);
        assert_eq!(percent_change(0.0, 0.0), None);
    }

    #[test]
    fn test_classify_change_buckets() {
        assert_eq!(classify_change(0.0), ChangeStatus::Neutral);
        assert_eq!(classify_change(42.0), ChangeStatus::Positive);
        assert_eq!(classify_change(-4.29), ChangeStatus::Negative);
    }

    #[test]
    fn test_trend_line_unit_slope() {
        // y = x - 2016 over three points: fitted values are exactly [0, 1, 2]
        let fitted = trend_line(&[2016, 2017, 2018], &[0.0, 1.0, 2.0]).unwrap();
        let expected = [0.0, 1.0, 2.0];
        for (got, want) in fitted.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-6, "got {got}, want {want}");
        }
    }

    #[test]
    fn test_trend_line_too_few_points() {
        assert!(trend_line(&[2016], &[9037.0]).is_none());
        assert!(trend_line(&[], &[]).is_none());
    }

    #[test]
    fn test_trend_line_degenerate_x() {
        // identical x values: denominator is zero, no fit
        assert!(trend_line(&[2016, 2016], &[1.0, 2.0]).is_none());
    }

    #[test]
    fn test_trend_line_mismatched_lengths() {
        assert!(trend_line(&[2016, 2017], &[1.0]).is_none());
    }

    #[test]
    fn test_growth_bar_buckets() {
        assert_eq!(growth_bar_bucket(99.63), GrowthBucket::Extreme);
        assert_eq!(growth_bar_bucket(-120.41), GrowthBucket::Extreme);
        assert_eq!(growth_bar_bucket(12.85), GrowthBucket::Positive);
        assert_eq!(growth_bar_bucket(-4.29), GrowthBucket::NonPositive);
        // exactly zero stays in the non-positive bucket
        assert_eq!(growth_bar_bucket(0.0), GrowthBucket::NonPositive);
        // exactly 50 is not extreme
        assert_eq!(growth_bar_bucket(50.0), GrowthBucket::Positive);
    }
}
