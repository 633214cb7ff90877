//! The board: everything the converter view shows, and the transitions
//! that change it.

use anyhow::{Result, bail};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::convert::convert;
use super::currency::{ALL_CURRENCIES, Currency, REFERENCE_CURRENCY, find, resolve};
use super::rates::RateState;
use super::reorder::ReorderController;
use super::selection::SelectionStore;
use crate::store::KeyValueStore;

pub const DEFAULT_BASE_AMOUNT: &str = "100.00";

/// What the user typed and in which currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionState {
    pub base_code: String,
    pub base_amount: String,
}

impl Default for ConversionState {
    fn default() -> Self {
        Self {
            base_code: REFERENCE_CURRENCY.to_string(),
            base_amount: DEFAULT_BASE_AMOUNT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardRow {
    pub currency: &'static Currency,
    pub value: String,
    pub is_base: bool,
    pub lifted: bool,
}

pub struct Board {
    selection: SelectionStore,
    conversion: ConversionState,
    rates: RateState,
    drag: ReorderController,
}

impl Board {
    /// Loads the persisted selection. A base currency that is not tracked
    /// is replaced by the first tracked one.
    pub fn load(store: Arc<dyn KeyValueStore>, mut conversion: ConversionState) -> Self {
        let selection = SelectionStore::load(store);
        if !selection.contains(&conversion.base_code) {
            if let Some(first) = selection.codes().first() {
                warn!(
                    requested = %conversion.base_code,
                    using = %first,
                    "Base currency is not tracked"
                );
                conversion.base_code = first.clone();
            }
        }
        Self {
            selection,
            conversion,
            rates: RateState::default(),
            drag: ReorderController::new(),
        }
    }

    pub fn codes(&self) -> &[String] {
        self.selection.codes()
    }

    pub fn conversion(&self) -> &ConversionState {
        &self.conversion
    }

    pub fn rate_state(&self) -> &RateState {
        &self.rates
    }

    pub fn drag(&self) -> &ReorderController {
        &self.drag
    }

    /// Rows are usable once any rates have arrived.
    pub fn is_ready(&self) -> bool {
        !self.rates.rates.is_empty()
    }

    /// Replaces rates and sources wholesale.
    pub fn set_rates(&mut self, state: RateState) {
        debug!(
            count = state.rates.len(),
            loading = state.loading,
            "Applying rate state"
        );
        self.rates = state;
    }

    /// Typing into a row makes that row the base.
    pub fn set_value(&mut self, code: &str, amount: &str) -> Result<()> {
        if !self.selection.contains(code) {
            bail!("{code} is not tracked");
        }
        self.conversion = ConversionState {
            base_code: code.to_string(),
            base_amount: amount.to_string(),
        };
        Ok(())
    }

    /// Catalog entries that are not tracked yet.
    pub fn addable(&self) -> Vec<&'static Currency> {
        ALL_CURRENCIES
            .iter()
            .filter(|c| !self.selection.contains(c.code))
            .collect()
    }

    pub fn add(&mut self, code: &str) -> Result<&'static Currency> {
        let currency = resolve(code)?;
        if !self.addable().iter().any(|c| c.code == currency.code) {
            bail!("{} is already tracked", currency.code);
        }
        self.selection.add(currency.code);
        info!(code = currency.code, "Added currency");
        Ok(currency)
    }

    pub fn remove(&mut self, code: &str) -> Result<&'static Currency> {
        let currency = resolve(code)?;
        if currency.code == self.conversion.base_code {
            bail!("Cannot remove the base currency {}", currency.code);
        }
        if !self.selection.remove(currency.code) {
            bail!("{} is not tracked", currency.code);
        }
        info!(code = currency.code, "Removed currency");
        Ok(currency)
    }

    pub fn reorder(&mut self, from_id: &str, to_id: &str) -> bool {
        self.selection.reorder(from_id, to_id)
    }

    pub fn drag_start(&mut self, id: &str) {
        self.drag.on_drag_start(id);
    }

    pub fn drag_over(&mut self, id: Option<&str>) {
        self.drag.on_drag_over(id);
    }

    pub fn drag_end(&mut self, active_id: &str, over_id: Option<&str>) -> bool {
        self.drag
            .on_drag_end(&mut self.selection, active_id, over_id)
    }

    pub fn drag_cancel(&mut self) {
        self.drag.on_drag_cancel();
    }

    pub fn keyboard_lift(&mut self, id: &str) {
        self.drag.keyboard_lift(id);
    }

    pub fn keyboard_step(&mut self, steps: isize) -> Option<String> {
        self.drag
            .keyboard_step(self.selection.codes(), steps)
            .map(str::to_string)
    }

    pub fn keyboard_drop(&mut self) -> bool {
        self.drag.keyboard_drop(&mut self.selection)
    }

    pub fn value_for(&self, code: &str) -> String {
        convert(
            &self.rates.rates,
            &self.conversion.base_code,
            &self.conversion.base_amount,
            code,
        )
    }

    fn row(&self, currency: &'static Currency) -> BoardRow {
        BoardRow {
            currency,
            value: self.value_for(currency.code),
            is_base: currency.code == self.conversion.base_code,
            lifted: self.drag.lifted() == Some(currency.code),
        }
    }

    /// Tracked currencies in order, each with its converted value.
    pub fn rows(&self) -> Vec<BoardRow> {
        self.selection
            .codes()
            .iter()
            .filter_map(|code| find(code))
            .map(|currency| self.row(currency))
            .collect()
    }

    /// The row drawn in the floating overlay while dragging.
    pub fn lifted_row(&self) -> Option<BoardRow> {
        self.drag.lifted().and_then(find).map(|c| self.row(c))
    }
}
