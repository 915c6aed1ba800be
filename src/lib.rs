// Balance Dashboard - Core Library
// Derived analytics and view synchronization over a fixed set of annual
// balance-sheet figures. The TUI and report binary render what these
// modules compute.

pub mod data;
pub mod metrics;
pub mod selection;
pub mod summary;
pub mod views;

// Re-export commonly used types
pub use data::{Dataset, FinancialRecord, GrowthField, GrowthRecord, Metric};
pub use metrics::{
    classify_change, format_scaled, growth_bar_bucket, percent_change, scale, trend_line,
    ChangeStatus, GrowthBucket,
};
pub use selection::{Selection, SelectionEvent, Units};
pub use summary::{AnalyticsSummary, SummarySection};
pub use views::{
    build_views, BarChartInput, DashboardViews, GrowthBar, GrowthSeries, LineChartInput, Series,
    Slice, StructureChartInput, TableRow, TableView, CHART_COLORS,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
