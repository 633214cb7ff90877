use super::ui;
use crate::core::{Board, BoardRow};
use chrono::Local;
use comfy_table::Cell;

fn currency_label(row: &BoardRow) -> String {
    format!("{} {}", row.currency.flag, row.currency.code)
}

fn status_line(board: &Board) -> String {
    let state = board.rate_state();
    let synced = state.last_update.map_or_else(
        || "never".to_string(),
        |ts| ts.with_timezone(&Local).format("%H:%M:%S").to_string(),
    );
    let mut line = format!("Last sync: {synced}");
    if state.loading {
        line.push_str(" (refreshing…)");
    }
    ui::style_text(&line, ui::StyleType::Subtle)
}

/// Shown instead of the rows until the first rates arrive, so untouched
/// rows never read as real zeros.
fn loading_placeholder(board: &Board) -> String {
    format!(
        "{}\n{}\n\n{}",
        ui::style_text("Currency Board", ui::StyleType::Title),
        status_line(board),
        ui::style_text(
            &format!("Initializing rates for {}…", board.codes().join(", ")),
            ui::StyleType::Highlight
        )
    )
}

/// Renders the tracked rows, the lifted overlay and any rate sources.
pub fn render_board(board: &Board) -> String {
    if !board.is_ready() {
        return loading_placeholder(board);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Currency"),
        ui::header_cell("Name"),
        ui::header_cell("Value"),
    ]);

    for (index, row) in board.rows().iter().enumerate() {
        let position = (index + 1).to_string();
        let name = if row.is_base {
            format!("{} (base)", row.currency.name)
        } else {
            row.currency.name.to_string()
        };

        if row.lifted {
            // The row stays in place as a faded placeholder
            table.add_row(vec![
                ui::subtle_cell(&position),
                ui::subtle_cell(&currency_label(row)),
                ui::subtle_cell(&name),
                ui::subtle_cell(&format!("{}{}", row.currency.symbol, row.value)),
            ]);
        } else {
            table.add_row(vec![
                Cell::new(position),
                Cell::new(currency_label(row)),
                Cell::new(name),
                ui::amount_cell(
                    &format!("{}{}", row.currency.symbol, row.value),
                    row.is_base,
                ),
            ]);
        }
    }

    let mut output = format!(
        "{}\n{}\n\n",
        ui::style_text("Currency Board", ui::StyleType::Title),
        status_line(board)
    );
    output.push_str(&table.to_string());

    if let Some(lifted) = board.lifted_row() {
        let target = board
            .drag()
            .over()
            .filter(|over| *over != lifted.currency.code)
            .map_or_else(|| "its own slot".to_string(), str::to_string);
        output.push_str(&format!(
            "\n\n{} {}{} → over {}",
            ui::style_text(&format!("⇅ {}", currency_label(&lifted)), ui::StyleType::Highlight),
            lifted.currency.symbol,
            lifted.value,
            target
        ));
    }

    let sources = &board.rate_state().sources;
    if !sources.is_empty() {
        output.push_str(&format!(
            "\n\n{}",
            ui::style_text("Sources", ui::StyleType::Subtle)
        ));
        for source in sources {
            output.push_str(&format!("\n  {} <{}>", source.label(), source.uri));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::selection::STORAGE_KEY;
    use crate::core::{ConversionState, ExchangeRateTable, GroundingSource, RateState};
    use crate::store::MemoryStore;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn board() -> Board {
        let store = Arc::new(MemoryStore::with_entry(STORAGE_KEY, r#"["USD","EUR"]"#));
        let mut board = Board::load(store, ConversionState::default());
        board.set_rates(RateState {
            rates: ExchangeRateTable::new("USD", HashMap::from([("EUR".to_string(), 2.0)])),
            sources: vec![GroundingSource {
                uri: "https://example.com/fx".to_string(),
                title: String::new(),
            }],
            loading: true,
            last_update: None,
        });
        board
    }

    #[test]
    fn test_render_rows_and_sources() {
        let output = render_board(&board());
        assert!(output.contains("USD"));
        assert!(output.contains("US Dollar (base)"));
        assert!(output.contains("$100.00"));
        assert!(output.contains("€200.00"));
        assert!(output.contains("Last sync: never (refreshing…)"));
        assert!(output.contains("example.com <https://example.com/fx>"));
    }

    #[test]
    fn test_render_placeholder_until_rates_arrive() {
        let store = Arc::new(MemoryStore::with_entry(STORAGE_KEY, r#"["USD","EUR"]"#));
        let mut board = Board::load(store, ConversionState::default());

        let output = render_board(&board);
        assert!(output.contains("Initializing rates for USD, EUR…"));
        assert!(output.contains("Last sync: never"));
        assert!(!output.contains("0.00"));

        board.set_rates(RateState {
            rates: ExchangeRateTable::new("USD", HashMap::from([("EUR".to_string(), 2.0)])),
            ..RateState::default()
        });
        let output = render_board(&board);
        assert!(!output.contains("Initializing"));
        assert!(output.contains("€200.00"));
    }

    #[test]
    fn test_render_lifted_overlay() {
        let mut board = board();
        board.keyboard_lift("EUR");
        let output = render_board(&board);
        assert!(output.contains("€200.00 → over its own slot"));

        board.keyboard_step(-1);
        let output = render_board(&board);
        assert!(output.contains("→ over USD"));
    }
}
