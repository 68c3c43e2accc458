//! ASCII bar chart of the monthly breakdown.
//!
//! This is intentionally "dumb" (fixed-width bars), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)

use crate::domain::QuoteBreakdown;

const LABEL_WIDTH: usize = 22;

/// Render one horizontal bar per component, scaled to the largest.
///
/// Non-zero components always get at least one cell so they stay visible.
pub fn render_breakdown_chart(breakdown: &QuoteBreakdown, width: usize) -> String {
    let width = width.max(10);
    let rows = breakdown.labeled();
    let total: f64 = rows.iter().map(|(_, v)| v.max(0.0)).sum();
    let max = rows.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);

    let mut out = String::new();
    out.push_str("Monthly payment breakdown:\n");
    for (label, value) in rows {
        let cells = bar_cells(value, max, width);
        let share = if total > 0.0 { value.max(0.0) / total * 100.0 } else { 0.0 };
        out.push_str(
            format!(
                "{label:<LABEL_WIDTH$} |{:<width$}| {share:>5.1}%\n",
                "#".repeat(cells)
            )
            .as_str(),
        );
    }
    out
}

fn bar_cells(value: f64, max: f64, width: usize) -> usize {
    if !(value > 0.0 && max > 0.0) {
        return 0;
    }
    let cells = (value / max * width as f64).round() as usize;
    cells.clamp(1, width)
}
