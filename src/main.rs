// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use std::env;

use balance_dashboard::{build_views, AnalyticsSummary, Dataset, Selection, VERSION};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "report" {
        let as_json = args.iter().any(|a| a == "--json");
        run_report(as_json)?;
    } else {
        run_ui_mode()?;
    }

    Ok(())
}

/// Non-interactive mode: print the metrics table and analytics summary, or
/// dump the declarative view inputs as JSON.
fn run_report(as_json: bool) -> Result<()> {
    let dataset = Dataset::baked();
    let selection = Selection::all_years(&dataset);
    let views = build_views(&dataset, &selection);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    println!("📊 Balance Sheet Report (v{})", VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "\n{:<20} {:>10} {:>10} {:>9}  Status ({})",
        "Metric", views.table.current_year, views.table.baseline_year, "Change", views.table.unit_label
    );
    for row in &views.table.rows {
        let change = match row.change {
            Some(v) if v > 0.0 => format!("+{:.1}%", v),
            Some(v) => format!("{:.1}%", v),
            None => "—".to_string(),
        };
        println!(
            "{:<20} {:>10} {:>10} {:>9}  {}",
            row.label,
            row.current,
            row.baseline,
            change,
            row.status.label()
        );
    }

    if let Some(summary) = AnalyticsSummary::compute(&dataset) {
        for section in summary.sections() {
            println!("\n{}", section.heading);
            println!("  {}", section.body);
        }
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode() -> Result<()> {
    println!("🖥️  Loading Balance Dashboard v{}...\n", VERSION);

    let dataset = Dataset::baked();
    println!(
        "✓ Loaded {} annual records, {} growth rows\n",
        dataset.records().len(),
        dataset.growth().len()
    );
    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(dataset);
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode() -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print a report: cargo run report");
    std::process::exit(1);
}
