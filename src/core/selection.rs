//! Ordered list of tracked currency codes and its persistence.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use super::currency::{DEFAULT_SELECTION, is_known};
use crate::store::KeyValueStore;

pub const STORAGE_KEY: &str = "selected_codes";

/// Moves the element at `from` to `to`, shifting everything in between.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

fn default_codes() -> Vec<String> {
    DEFAULT_SELECTION.iter().map(|c| c.to_string()).collect()
}

/// Turns a stored payload into a valid selection, or `None` if nothing
/// usable is in it.
fn parse_stored(payload: &str) -> Option<Vec<String>> {
    let Value::Array(items) = serde_json::from_str::<Value>(payload).ok()? else {
        return None;
    };

    let mut codes: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        match item.as_str() {
            Some(code) if is_known(code) && !codes.iter().any(|c| c == code) => {
                codes.push(code.to_string())
            }
            _ => debug!(?item, "Dropping stored selection entry"),
        }
    }

    if codes.is_empty() { None } else { Some(codes) }
}

/// Tracked currencies in display order, written through to storage after
/// every change.
pub struct SelectionStore {
    codes: Vec<String>,
    store: Arc<dyn KeyValueStore>,
}

impl SelectionStore {
    /// Reads the persisted selection, falling back to the defaults.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let codes = match store.get(STORAGE_KEY) {
            Ok(Some(payload)) => parse_stored(&payload).unwrap_or_else(|| {
                debug!("Stored selection unusable, using defaults");
                default_codes()
            }),
            Ok(None) => default_codes(),
            Err(e) => {
                warn!(error = %e, "Failed to read stored selection, using defaults");
                default_codes()
            }
        };
        debug!(?codes, "Loaded selection");
        Self { codes, store }
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn position(&self, code: &str) -> Option<usize> {
        self.codes.iter().position(|c| c == code)
    }

    /// Appends `code`. Returns whether the list changed.
    pub fn add(&mut self, code: &str) -> bool {
        if !is_known(code) || self.contains(code) {
            debug!(code, "Ignoring add");
            return false;
        }
        self.codes.push(code.to_string());
        self.persist();
        true
    }

    /// Drops `code`. Returns whether the list changed.
    pub fn remove(&mut self, code: &str) -> bool {
        let Some(index) = self.position(code) else {
            return false;
        };
        self.codes.remove(index);
        self.persist();
        true
    }

    /// Moves `from_id` to the slot currently held by `to_id`.
    pub fn reorder(&mut self, from_id: &str, to_id: &str) -> bool {
        if from_id == to_id {
            return false;
        }
        let (Some(from), Some(to)) = (self.position(from_id), self.position(to_id)) else {
            debug!(from_id, to_id, "Ignoring reorder with unknown id");
            return false;
        };
        array_move(&mut self.codes, from, to);
        self.persist();
        true
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.codes)
            .map_err(anyhow::Error::from)
            .and_then(|payload| self.store.set(STORAGE_KEY, &payload));
        if let Err(e) = result {
            warn!(error = %e, "Failed to persist selection");
        }
    }
}
