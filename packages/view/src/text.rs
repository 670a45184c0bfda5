//! Plain-text rendering of the panels for terminal output.

use std::fmt::Write as _;

use crate::details::{DetailsView, Gauge};
use crate::results::ResultsView;

/// Renders the results panel as numbered lines.
#[must_use]
pub fn render_results(view: &ResultsView) -> String {
    let mut out = String::new();

    match view {
        ResultsView::Loading { .. } => out.push_str("Searching...\n"),
        ResultsView::Error { message } => {
            let _ = writeln!(out, "{message}");
        }
        ResultsView::Empty { title, hint } => {
            let _ = writeln!(out, "{title}\n{hint}");
        }
        ResultsView::List { rows } => {
            for (i, row) in rows.iter().enumerate() {
                let marker = if row.selected { '*' } else { ' ' };
                let _ = writeln!(out, "{marker}{:>2}. {}", i + 1, row.name);
                if let Some(placeholder) = row.placeholder {
                    let _ = writeln!(out, "     {placeholder}");
                }
                for feature in &row.features {
                    let check = if feature.present { "[x]" } else { "[ ]" };
                    let _ = writeln!(out, "     {check} {}", feature.feature);
                }
            }
        }
    }

    out
}

fn render_gauge(out: &mut String, gauge: &Gauge) {
    let _ = writeln!(
        out,
        "{}: {} / {} {} [{}]",
        gauge.label, gauge.available, gauge.total, gauge.unit_label, gauge.tier
    );
    if let Some(description) = &gauge.description {
        let _ = writeln!(out, "  {description}");
    }
}

/// Renders the details panel.
#[must_use]
pub fn render_details(view: &DetailsView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}\n{}\n", view.name, view.summary);

    render_gauge(&mut out, &view.accommodation);
    if !view.hotels.is_empty() {
        out.push_str("  Suggested hotels:\n");
        for hotel in &view.hotels {
            let _ = writeln!(out, "  - {} ({})", hotel.name, hotel.price_range);
            let _ = writeln!(out, "    {}", hotel.booking_url);
        }
    }

    render_gauge(&mut out, &view.parking);
    for example in &view.parking_examples {
        let _ = writeln!(out, "  - {example}");
    }

    if view.catering.shown {
        out.push_str("Catering options:\n");
        for example in &view.catering.examples {
            let _ = writeln!(out, "  - {example}");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::details::details_view;
    use crate::results::results_view;
    use crate::test_support::{area, session_with};

    #[test]
    fn lists_rows_with_checklist() {
        let mut session = session_with(vec![area("a", 48.0, 2.0), area("b", 49.0, 3.0)]);
        session.select_area("b").unwrap();

        let text = render_results(&results_view(&session));
        assert!(text.contains("  1. Area a"));
        assert!(text.contains("* 2. Area b"));
        assert!(text.contains("[x] cobblestone streets"));
        assert!(text.contains("[ ] river view"));
    }

    #[test]
    fn empty_state_prints_title_and_hint() {
        let text = render_results(&results_view(&session_with(Vec::new())));
        assert!(text.starts_with("No locations found\n"));
    }

    #[test]
    fn details_include_gauges_and_links() {
        let text = render_details(&details_view(&area("a", 48.0, 2.0), true));
        assert!(text.contains("Accommodation: 120 / 200 Rooms Available [green]"));
        assert!(text.contains("Parking: 1 / 4 Lots / Garages [red]"));
        assert!(text.contains("https://www.booking.com/searchresults.html?ss="));
        assert!(text.contains("Catering options:\n  - Chez Janou"));
    }
}
