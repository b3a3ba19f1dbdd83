use std::fmt::Write;

use crate::core::{Checkpoint, InflationBreakdown, PeriodTable, ProjectionReport, Summary};

const LABEL_WIDTH: usize = 20;
const COLUMN_WIDTH: usize = 18;

/// Plain-text rendering of a report for the terminal. `period` selects which
/// inflation breakdown is shown.
pub fn render_text_report(report: &ProjectionReport, period: Checkpoint) -> String {
    let mut out = String::new();
    let scenario = &report.projection.scenario;

    let _ = writeln!(
        out,
        "Savings projection over {} months (inflation {}% p.a.)",
        report.projection.horizon_months,
        scenario.inflation_rate_percent()
    );
    out.push('\n');
    write_summary(&mut out, &report.summary);

    if let Some(breakdown) = report.inflation.iter().find(|b| b.checkpoint == period) {
        out.push('\n');
        write_inflation(&mut out, breakdown);
    }

    out.push('\n');
    write_table(&mut out, &report.table);
    out
}

fn write_summary(out: &mut String, summary: &Summary) {
    let _ = writeln!(
        out,
        "{:<LABEL_WIDTH$}{} ({})",
        "Principal paid",
        summary.principal_display,
        summary.principal_note
    );
    for card in &summary.cards {
        let _ = writeln!(
            out,
            "{:<LABEL_WIDTH$}{} ({} profit)",
            card.label, card.value_display, card.profit_display
        );
    }
}

fn write_inflation(out: &mut String, breakdown: &InflationBreakdown) {
    let _ = writeln!(
        out,
        "Inflation impact after {} (price level {})",
        breakdown.label, breakdown.inflation_factor_display
    );
    for card in &breakdown.cards {
        let verdict = if card.is_gain { "real gain" } else { "real loss" };
        let _ = writeln!(out, "  {} [{verdict}]", card.label);
        for (label, value) in [
            ("Principal", &card.principal_display),
            ("Nominal value", &card.nominal_value_display),
            ("Nominal profit", &card.nominal_profit_display),
            ("Real value", &card.real_value_display),
            ("Real gain/loss", &card.real_profit_display),
            ("Approx. real rate", &card.approx_real_rate_display),
        ] {
            let _ = writeln!(out, "    {label:<LABEL_WIDTH$}{value}");
        }
    }
    let _ = writeln!(out, "  * {}", breakdown.footnote);
}

fn write_table(out: &mut String, table: &PeriodTable) {
    for header in &table.headers {
        let _ = write!(out, "{header:<COLUMN_WIDTH$}");
    }
    out.push('\n');

    for row in &table.rows {
        let _ = write!(
            out,
            "{:<COLUMN_WIDTH$}{:<COLUMN_WIDTH$}",
            row.label, row.principal_display
        );
        for cell in &row.cells {
            let _ = write!(out, "{:<COLUMN_WIDTH$}", cell.value_display);
        }
        out.push('\n');
    }
}
