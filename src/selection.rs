// 🎛️ Selection State - Typed Filter Events
// The user-controlled filter driving every view: selected years, unit mode,
// chart metric, structure year and the trend toggle. Control changes arrive
// as typed SelectionEvent messages applied synchronously.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::data::{Dataset, Metric};

// ============================================================================
// UNITS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Units {
    Thousands,
    Millions,
}

impl Units {
    pub fn label(&self) -> &'static str {
        match self {
            Units::Thousands => "thousand RUB",
            Units::Millions => "million RUB",
        }
    }

    pub fn toggled(&self) -> Units {
        match self {
            Units::Thousands => Units::Millions,
            Units::Millions => Units::Thousands,
        }
    }
}

// ============================================================================
// SELECTION
// ============================================================================

/// Page-session filter state. Lives only in memory; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Years feeding the trend and growth charts. May be empty.
    pub years: BTreeSet<i32>,
    pub units: Units,
    /// Field shown on the trend chart.
    pub metric: Metric,
    /// Year shown on the structure breakdown.
    pub structure_year: i32,
    pub show_trend: bool,
}

impl Selection {
    /// Default selection: every year checked, thousands, total balance,
    /// latest year for the structure view, trend visible.
    pub fn all_years(dataset: &Dataset) -> Self {
        Selection {
            years: dataset.years().into_iter().collect(),
            units: Units::Thousands,
            metric: Metric::TotalBalance,
            structure_year: dataset.last_year().unwrap_or(0),
            show_trend: true,
        }
    }

    /// Apply one control change. Events naming a year absent from the
    /// dataset are dropped (missing-year lookups fail safe).
    pub fn apply(&mut self, dataset: &Dataset, event: SelectionEvent) {
        match event {
            SelectionEvent::ToggleYear(year) => {
                if dataset.record_for_year(year).is_none() {
                    return;
                }
                if !self.years.remove(&year) {
                    self.years.insert(year);
                }
            }
            SelectionEvent::SelectAllYears => {
                self.years = dataset.years().into_iter().collect();
            }
            SelectionEvent::ClearYears => {
                self.years.clear();
            }
            SelectionEvent::SetUnits(units) => {
                self.units = units;
            }
            SelectionEvent::ToggleUnits => {
                self.units = self.units.toggled();
            }
            SelectionEvent::SetMetric(metric) => {
                self.metric = metric;
            }
            SelectionEvent::CycleMetric => {
                self.metric = self.metric.next();
            }
            SelectionEvent::ToggleTrend => {
                self.show_trend = !self.show_trend;
            }
            SelectionEvent::SetStructureYear(year) => {
                if dataset.record_for_year(year).is_some() {
                    self.structure_year = year;
                }
            }
            SelectionEvent::CycleStructureYear => {
                let years = dataset.years();
                if years.is_empty() {
                    return;
                }
                let idx = years
                    .iter()
                    .position(|&y| y == self.structure_year)
                    .map(|i| (i + 1) % years.len())
                    .unwrap_or(0);
                self.structure_year = years[idx];
            }
        }
    }

    /// Selected years in ascending order.
    pub fn sorted_years(&self) -> Vec<i32> {
        self.years.iter().copied().collect()
    }
}

// ============================================================================
// EVENTS
// ============================================================================

/// One discrete control change. Consumed synchronously by the view
/// synchronizer; there are no implicit listeners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SelectionEvent {
    ToggleYear(i32),
    SelectAllYears,
    ClearYears,
    SetUnits(Units),
    ToggleUnits,
    SetMetric(Metric),
    CycleMetric,
    ToggleTrend,
    SetStructureYear(i32),
    CycleStructureYear,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selects_everything() {
        let dataset = Dataset::baked();
        let selection = Selection::all_years(&dataset);
        assert_eq!(selection.years.len(), 8);
        assert_eq!(selection.units, Units::Thousands);
        assert_eq!(selection.metric, Metric::TotalBalance);
        assert_eq!(selection.structure_year, 2023);
        assert!(selection.show_trend);
    }

    #[test]
    fn test_toggle_year_in_and_out() {
        let dataset = Dataset::baked();
        let mut selection = Selection::all_years(&dataset);

        selection.apply(&dataset, SelectionEvent::ToggleYear(2019));
        assert!(!selection.years.contains(&2019));

        selection.apply(&dataset, SelectionEvent::ToggleYear(2019));
        assert!(selection.years.contains(&2019));
    }

    #[test]
    fn test_unknown_year_events_are_dropped() {
        let dataset = Dataset::baked();
        let mut selection = Selection::all_years(&dataset);

        selection.apply(&dataset, SelectionEvent::ToggleYear(1999));
        assert_eq!(selection.years.len(), 8);

        selection.apply(&dataset, SelectionEvent::SetStructureYear(2050));
        assert_eq!(selection.structure_year, 2023);
    }

    #[test]
    fn test_clear_and_select_all() {
        let dataset = Dataset::baked();
        let mut selection = Selection::all_years(&dataset);

        selection.apply(&dataset, SelectionEvent::ClearYears);
        assert!(selection.years.is_empty());

        selection.apply(&dataset, SelectionEvent::SelectAllYears);
        assert_eq!(selection.years.len(), 8);
    }

    #[test]
    fn test_units_toggle() {
        let dataset = Dataset::baked();
        let mut selection = Selection::all_years(&dataset);

        selection.apply(&dataset, SelectionEvent::ToggleUnits);
        assert_eq!(selection.units, Units::Millions);
        selection.apply(&dataset, SelectionEvent::ToggleUnits);
        assert_eq!(selection.units, Units::Thousands);
    }

    #[test]
    fn test_cycle_structure_year_wraps() {
        let dataset = Dataset::baked();
        let mut selection = Selection::all_years(&dataset);
        assert_eq!(selection.structure_year, 2023);

        selection.apply(&dataset, SelectionEvent::CycleStructureYear);
        assert_eq!(selection.structure_year, 2016);

        selection.apply(&dataset, SelectionEvent::CycleStructureYear);
        assert_eq!(selection.structure_year, 2017);
    }

    #[test]
    fn test_sorted_years_ascending() {
        let dataset = Dataset::baked();
        let mut selection = Selection::all_years(&dataset);
        selection.apply(&dataset, SelectionEvent::ClearYears);
        selection.apply(&dataset, SelectionEvent::ToggleYear(2021));
        selection.apply(&dataset, SelectionEvent::ToggleYear(2017));
        assert_eq!(selection.sorted_years(), vec![2017, 2021]);
    }
}
