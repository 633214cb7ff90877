use super::ui;
use crate::core::Board;
use crate::core::currency::{ALL_CURRENCIES, resolve};
use anyhow::{Result, bail};
use comfy_table::Cell;

/// Where a `move` should put a tracked currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveTarget {
    /// Drop onto another tracked currency (pointer style).
    Onto(String),
    /// Shift by a number of rows, negative is up (keyboard style).
    By(isize),
}

pub fn list(board: &Board) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Currency"),
        ui::header_cell("Name"),
        ui::header_cell("Region"),
    ]);
    for (index, row) in board.rows().iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(format!("{} {}", row.currency.flag, row.currency.code)),
            Cell::new(row.currency.name),
            Cell::new(row.currency.region),
        ]);
    }
    table.to_string()
}

pub fn catalog(board: &Board) -> String {
    let addable = board.addable();
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Name"),
        ui::header_cell("Symbol"),
        ui::header_cell("Tracked"),
    ]);
    for currency in ALL_CURRENCIES.iter() {
        let tracked = !addable.iter().any(|c| c.code == currency.code);
        table.add_row(vec![
            Cell::new(format!("{} {}", currency.flag, currency.code)),
            Cell::new(currency.name),
            Cell::new(currency.symbol),
            if tracked {
                Cell::new("yes")
            } else {
                ui::subtle_cell("-")
            },
        ]);
    }
    table.to_string()
}

pub fn add(board: &mut Board, code: &str) -> Result<String> {
    let currency = board.add(code)?;
    Ok(format!("Added {} {}", currency.code, currency.name))
}

pub fn remove(board: &mut Board, code: &str) -> Result<String> {
    let currency = board.remove(code)?;
    Ok(format!("Removed {} {}", currency.code, currency.name))
}

fn tracked_code(board: &Board, input: &str) -> Result<&'static str> {
    let currency = resolve(input)?;
    if !board.codes().iter().any(|c| c == currency.code) {
        bail!("{} is not tracked", currency.code);
    }
    Ok(currency.code)
}

/// Runs a full drag gesture for `code` and reports the new order.
pub fn move_currency(board: &mut Board, code: &str, target: &MoveTarget) -> Result<String> {
    let active = tracked_code(board, code)?;
    let moved = match target {
        MoveTarget::Onto(over) => {
            let over = tracked_code(board, over)?;
            board.drag_start(active);
            board.drag_over(Some(over));
            board.drag_end(active, Some(over))
        }
        MoveTarget::By(steps) => {
            board.keyboard_lift(active);
            board.keyboard_step(*steps);
            board.keyboard_drop()
        }
    };

    let order = board.codes().join(", ");
    if moved {
        Ok(format!("Moved {active}: {order}"))
    } else {
        Ok(format!("{active} stays in place: {order}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConversionState;
    use crate::core::selection::STORAGE_KEY;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn board() -> Board {
        let store = Arc::new(MemoryStore::with_entry(
            STORAGE_KEY,
            r#"["USD","EUR","GBP","JPY"]"#,
        ));
        Board::load(store, ConversionState::default())
    }

    #[test]
    fn test_list_and_catalog() {
        let board = board();
        let listed = list(&board);
        assert!(listed.contains("British Pound"));
        assert!(!listed.contains("Thai Baht"));

        let catalog = catalog(&board);
        assert!(catalog.contains("Thai Baht"));
        assert_eq!(catalog.matches("yes").count(), 4);
    }

    #[test]
    fn test_add_remove_messages() {
        let mut board = board();
        assert_eq!(add(&mut board, "thb").unwrap(), "Added THB Thai Baht");
        assert_eq!(remove(&mut board, "GBP").unwrap(), "Removed GBP British Pound");
        assert!(remove(&mut board, "USD").is_err());
    }

    #[test]
    fn test_move_onto() {
        let mut board = board();
        let message = move_currency(&mut board, "usd", &MoveTarget::Onto("gbp".into())).unwrap();
        assert_eq!(message, "Moved USD: EUR, GBP, USD, JPY");
        assert!(board.drag().lifted().is_none());

        let message = move_currency(&mut board, "EUR", &MoveTarget::Onto("EUR".into())).unwrap();
        assert_eq!(message, "EUR stays in place: EUR, GBP, USD, JPY");

        let err = move_currency(&mut board, "EUR", &MoveTarget::Onto("THB".into())).unwrap_err();
        assert_eq!(err.to_string(), "THB is not tracked");
    }

    #[test]
    fn test_move_by() {
        let mut board = board();
        let message = move_currency(&mut board, "JPY", &MoveTarget::By(-2)).unwrap();
        assert_eq!(message, "Moved JPY: USD, JPY, EUR, GBP");

        let message = move_currency(&mut board, "USD", &MoveTarget::By(-1)).unwrap();
        assert_eq!(message, "USD stays in place: USD, JPY, EUR, GBP");

        let message = move_currency(&mut board, "USD", &MoveTarget::By(99)).unwrap();
        assert_eq!(message, "Moved USD: JPY, EUR, GBP, USD");
    }

    #[test]
    fn test_move_by_extreme_counts() {
        let mut board = board();
        let message = move_currency(&mut board, "EUR", &MoveTarget::By(isize::MAX)).unwrap();
        assert_eq!(message, "Moved EUR: USD, GBP, JPY, EUR");

        let message = move_currency(&mut board, "EUR", &MoveTarget::By(isize::MIN)).unwrap();
        assert_eq!(message, "Moved EUR: EUR, USD, GBP, JPY");

        let message = move_currency(&mut board, "EUR", &MoveTarget::By(isize::MIN)).unwrap();
        assert_eq!(message, "EUR stays in place: EUR, USD, GBP, JPY");
        assert!(board.drag().lifted().is_none());
    }
}
