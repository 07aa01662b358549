//! Plain-text tables for terminal output.

use std::fmt::Write;

use costgrid_common::{
    DriverKey, DriverSet, MONTHS_PER_YEAR, format_cell, format_column_total, format_fixed,
    format_grouped, format_millions, format_signed_pct, month_label,
};
use costgrid_engine::{GridSummary, ScenarioImpact, WaterfallBar};
use costgrid_report::DashboardKpis;

const ID_WIDTH: usize = 4;
const DESCRIPTION_WIDTH: usize = 20;
const MONTH_WIDTH: usize = 9;
const TOTAL_WIDTH: usize = 11;

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
        clipped.push('~');
        clipped
    }
}

/// Monthly grid with a lock marker, row totals, a column-total footer and
/// the grand total.
pub fn grid_table(summary: &GridSummary) -> String {
    let mut out = String::new();

    let _ = write!(out, "{:<ID_WIDTH$} {:<DESCRIPTION_WIDTH$}", "ID", "Description");
    for month in 0..MONTHS_PER_YEAR {
        let _ = write!(out, " {:>MONTH_WIDTH$}", month_label(month).unwrap_or("?"));
    }
    let _ = writeln!(out, " {:>TOTAL_WIDTH$}", "Total");

    for row in &summary.rows {
        let marker = if row.is_locked { "*" } else { "" };
        let description = clip(&format!("{}{marker}", row.description), DESCRIPTION_WIDTH);
        let _ = write!(out, "{:<ID_WIDTH$} {description:<DESCRIPTION_WIDTH$}", row.id);
        for value in row.values.iter() {
            let _ = write!(out, " {:>MONTH_WIDTH$}", format_cell(value));
        }
        let _ = writeln!(out, " {:>TOTAL_WIDTH$}", format_grouped(row.total));
    }

    let _ = write!(out, "{:<ID_WIDTH$} {:<DESCRIPTION_WIDTH$}", "", "Total");
    for total in summary.column_totals {
        let _ = write!(out, " {:>MONTH_WIDTH$}", format_column_total(total));
    }
    let _ = writeln!(out, " {:>TOTAL_WIDTH$}", format_grouped(summary.grand_total));

    let split = &summary.split;
    let _ = writeln!(
        out,
        "OpEx {} ({}%)  CapEx {} ({}%)  * locked",
        format_grouped(split.opex),
        format_fixed(split.opex_pct, 1),
        format_grouped(split.capex),
        format_fixed(split.capex_pct, 1),
    );
    out
}

/// One line per bridge step: base, visible bar, running level, tooltip.
pub fn bridge_table(bars: &[WaterfallBar]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16} {:>8} {:>8} {:>10} {:>8}",
        "Step", "Base", "Bar", "Level", "Label"
    );
    for bar in bars {
        let _ = writeln!(
            out,
            "{:<16} {:>8} {:>8} {:>10} {:>8}",
            clip(&bar.name, 16),
            format_fixed(bar.float, 2),
            format_fixed(bar.bar, 2),
            format_fixed(bar.cumulative, 2),
            bar.tooltip(),
        );
    }
    out
}

/// Dashboard cards, the driver panel and the scenario impact preview.
pub fn kpi_panel(kpis: &DashboardKpis, drivers: &DriverSet, impact: &ScenarioImpact) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Total budget       {}",
        format_millions(kpis.total_budget / 1_000_000.0, 1)
    );
    let _ = writeln!(
        out,
        "Last year actuals  {}",
        format_millions(kpis.last_year_actuals / 1_000_000.0, 1)
    );
    let _ = writeln!(
        out,
        "YoY change         {}",
        kpis.yoy_change_pct
            .map(|pct| format_signed_pct(pct, 1))
            .unwrap_or_else(|| "n/a".to_string())
    );
    let _ = writeln!(
        out,
        "Submitted          {}/{}",
        kpis.submitted, kpis.departments
    );
    let _ = writeln!(
        out,
        "Approvals due      {} ({} in review)",
        kpis.approvals_due,
        format_millions(kpis.pending_review_amount / 1_000_000.0, 1)
    );
    let _ = writeln!(
        out,
        "OpEx / CapEx       {}% / {}%",
        format_fixed(kpis.spend_split.opex_pct, 1),
        format_fixed(kpis.spend_split.capex_pct, 1)
    );

    let _ = writeln!(out);
    for key in DriverKey::ALL {
        let _ = writeln!(out, "{:<20} {}", key.as_str(), drivers.value_of(key));
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Scenario impact    {} ({}, gauge {}%)",
        impact.label(),
        if impact.over_budget { "over budget" } else { "within budget" },
        format_fixed(impact.gauge_pct, 0)
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use costgrid_engine::BudgetState;
    use costgrid_report::DepartmentRegistry;

    #[test]
    fn grid_shows_totals_and_lock_markers() {
        let text = grid_table(&BudgetState::seeded().summary());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1 + 5 + 1 + 1);
        assert!(lines[0].contains("Jan") && lines[0].contains("Dec"));
        assert!(lines[1].starts_with("c1") && lines[1].contains("Base Salaries*"));
        assert!(lines[1].contains("154,500"));
        assert!(lines[6].contains("216.5k"));
        assert!(lines[6].contains("266.5k"));
        assert!(lines[6].contains("2,698,000"));
    }

    #[test]
    fn zero_cells_render_blank() {
        let text = grid_table(&BudgetState::seeded().summary());
        let server_row = text.lines().find(|l| l.starts_with("c4")).unwrap();
        assert_eq!(server_row.matches("50,000").count(), 2);
        assert!(!server_row.contains(" 0 "));
    }

    #[test]
    fn bridge_lists_every_step() {
        let text = bridge_table(&BudgetState::seeded().bridge());
        assert_eq!(text.lines().count(), 7);
        let savings = text.lines().find(|l| l.starts_with("Savings")).unwrap();
        assert!(savings.contains("12.50") && savings.contains("$-0.5M"));
    }

    #[test]
    fn kpi_panel_reports_figures() {
        let state = BudgetState::seeded();
        let kpis = DashboardKpis::compute(&DepartmentRegistry::seeded(), &state.summary());
        let text = kpi_panel(&kpis, state.drivers(), &state.impact());
        assert!(text.contains("$13.2M"));
        assert!(text.contains("+7.3%"));
        assert!(text.contains("Approvals due      2 ($1.8M in review)"));
        assert!(text.contains("headcount            12"));
        assert!(text.contains("0.00M (within budget"));
    }
}
