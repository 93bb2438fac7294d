use crate::{
    projector::{SignalRow, StatusClass},
    view::ListView,
};

const HEADERS: [&str; 8] = [
    "Time", "Symbol", "Action", "Price", "SL/TP", "Lot Size", "Status", "Account",
];

const EMPTY_TITLE: &str = "No Active Signals";
const EMPTY_DESCRIPTION: &str =
    "No trading signals are currently active. Signals will appear here when received from MT5.";
const RETRY_HINT: &str = "Type 'r' and press Enter to try again.";

/// Plain-text rendering of a `ListView`, optionally with ANSI colors.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRenderer {
    ansi: bool,
}

impl TableRenderer {
    pub fn new(ansi: bool) -> Self {
        Self { ansi }
    }

    pub fn render(&self, view: &ListView) -> String {
        let mut out = String::new();
        match view {
            ListView::Loading => out.push_str("Loading signals...\n"),
            ListView::Empty => {
                out.push_str(&format!("{}\n{}\n", EMPTY_TITLE, EMPTY_DESCRIPTION));
            }
            ListView::Failed { message, rows } => {
                out.push_str(&format!("Error Occurred: {}\n{}\n", message, RETRY_HINT));
                if !rows.is_empty() {
                    out.push_str("Showing last loaded signals:\n");
                    self.render_rows(rows, &mut out);
                }
            }
            ListView::Rows { rows, refreshing } => {
                out.push_str(&format!(
                    "Live Signal Monitor ({} signals){}\n",
                    rows.len(),
                    if *refreshing { " - refreshing" } else { "" }
                ));
                self.render_rows(rows, &mut out);
            }
        }
        out
    }

    fn render_rows(&self, rows: &[SignalRow], out: &mut String) {
        let cells: Vec<[String; 8]> = rows.iter().map(row_cells).collect();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header: Vec<String> = HEADERS
            .iter()
            .zip(widths)
            .map(|(h, w)| pad(h, w))
            .collect();
        out.push_str(header.join(" | ").trim_end());
        out.push('\n');
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join("-+-"));
        out.push('\n');

        for (row, cell) in rows.iter().zip(&cells) {
            let line: Vec<String> = cell
                .iter()
                .zip(widths)
                .enumerate()
                .map(|(column, (text, width))| {
                    let padded = pad(text, width);
                    match column {
                        2 => self.paint(&padded, if row.action_is_buy { "32" } else { "31" }),
                        6 => self.paint(&padded, ansi_code(row.status_class)),
                        _ => padded,
                    }
                })
                .collect();
            out.push_str(line.join(" | ").trim_end());
            out.push('\n');
        }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if self.ansi {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }
}

fn row_cells(row: &SignalRow) -> [String; 8] {
    [
        row.time.clone(),
        row.symbol.clone(),
        format!("{} {}", row.arrow.glyph(), row.action),
        row.price.clone(),
        format!("{} / {}", row.stop_loss, row.take_profit),
        row.lot_size.clone(),
        row.status.clone(),
        row.account.clone(),
    ]
}

fn ansi_code(class: StatusClass) -> &'static str {
    match class {
        StatusClass::Positive => "32",
        StatusClass::Pending => "33",
        StatusClass::Negative => "31",
        StatusClass::Neutral => "90",
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projector::Projector;
    use common::models::Signal;
    use serde_json::json;

    fn sample_rows() -> Vec<SignalRow> {
        let signal = Signal::from_value(json!({
            "id": 7,
            "timestamp": "2024-01-15T10:30:00Z",
            "symbol": "EURUSD",
            "action": "SELL",
            "price": "1.2345",
            "status": "FAILED",
            "account_number": "12345678"
        }))
        .unwrap();
        vec![Projector::default().project(&signal)]
    }

    #[test]
    fn test_render_rows_plain() {
        let view = ListView::Rows {
            rows: sample_rows(),
            refreshing: false,
        };
        let text = TableRenderer::new(false).render(&view);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Live Signal Monitor (1 signals)");
        assert!(lines[1].starts_with("Time     | Symbol | Action"));
        assert!(lines[3].contains("10:30:00 | EURUSD | ▼ SELL | 1.23450 | 0.00000 / 0.00000"));
        assert!(lines[3].ends_with("FAILED | 12345678"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_render_colors_when_enabled() {
        let view = ListView::Rows {
            rows: sample_rows(),
            refreshing: true,
        };
        let text = TableRenderer::new(true).render(&view);
        assert!(text.contains("refreshing"));
        assert!(text.contains("\x1b[31m"));
    }

    #[test]
    fn test_render_panels() {
        let renderer = TableRenderer::default();
        assert_eq!(renderer.render(&ListView::Loading), "Loading signals...\n");
        assert!(renderer.render(&ListView::Empty).starts_with(EMPTY_TITLE));

        let failed = renderer.render(&ListView::Failed {
            message: "Backend unavailable".to_string(),
            rows: sample_rows(),
        });
        assert!(failed.starts_with("Error Occurred: Backend unavailable\n"));
        assert!(failed.contains(RETRY_HINT));
        assert!(failed.contains("EURUSD"));
    }
}
