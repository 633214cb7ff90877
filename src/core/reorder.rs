//! Drag-and-drop state machine for reordering tracked currencies.
//!
//! Pointer and keyboard input produce the same start/end contract: a drag
//! starts on one id, optionally hovers over another, and ends either in a
//! drop (which may reorder) or a cancel (which never does).

use tracing::debug;

use super::selection::SelectionStore;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        active: String,
        over: Option<String>,
    },
}

#[derive(Debug, Default)]
pub struct ReorderController {
    state: DragState,
}

impl ReorderController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// The element currently lifted out of the list, if any.
    pub fn lifted(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { active, .. } => Some(active),
            DragState::Idle => None,
        }
    }

    pub fn over(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { over, .. } => over.as_deref(),
            DragState::Idle => None,
        }
    }

    pub fn on_drag_start(&mut self, id: &str) {
        debug!(id, "Drag start");
        self.state = DragState::Dragging {
            active: id.to_string(),
            over: None,
        };
    }

    pub fn on_drag_over(&mut self, id: Option<&str>) {
        if let DragState::Dragging { over, .. } = &mut self.state {
            *over = id.map(str::to_string);
        }
    }

    /// Finishes a drag. Reorders when dropped on a different element and
    /// always returns to idle. Returns whether the selection changed.
    pub fn on_drag_end(
        &mut self,
        selection: &mut SelectionStore,
        active_id: &str,
        over_id: Option<&str>,
    ) -> bool {
        self.state = DragState::Idle;
        let moved = match over_id {
            Some(over) if over != active_id => selection.reorder(active_id, over),
            _ => false,
        };
        debug!(active_id, ?over_id, moved, "Drag end");
        moved
    }

    pub fn on_drag_cancel(&mut self) {
        debug!("Drag cancelled");
        self.state = DragState::Idle;
    }

    /// Keyboard pick-up: lifts `id` and starts hovering over itself.
    pub fn keyboard_lift(&mut self, id: &str) {
        self.on_drag_start(id);
        self.on_drag_over(Some(id));
    }

    /// Moves the keyboard drop target `steps` rows (negative is up),
    /// clamped to the ends of `codes`. Returns the new target.
    pub fn keyboard_step(&mut self, codes: &[String], steps: isize) -> Option<&str> {
        let DragState::Dragging { active, over } = &mut self.state else {
            return None;
        };
        let current = over.as_deref().unwrap_or(active.as_str());
        let index = codes.iter().position(|c| c == current)?;
        let last = codes.len().saturating_sub(1) as isize;
        let target = (index as isize).saturating_add(steps).clamp(0, last) as usize;
        *over = Some(codes[target].clone());
        over.as_deref()
    }

    /// Keyboard drop: ends the drag at the current keyboard target.
    pub fn keyboard_drop(&mut self, selection: &mut SelectionStore) -> bool {
        let DragState::Dragging { active, over } = std::mem::take(&mut self.state) else {
            return false;
        };
        self.on_drag_end(selection, &active, over.as_deref())
    }

    pub fn keyboard_cancel(&mut self) {
        self.on_drag_cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::selection::STORAGE_KEY;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn selection(payload: &str) -> SelectionStore {
        SelectionStore::load(Arc::new(MemoryStore::with_entry(STORAGE_KEY, payload)))
    }

    #[test]
    fn test_pointer_drag_reorders() {
        let mut list = selection(r#"["USD","EUR","GBP"]"#);
        let mut controller = ReorderController::new();

        controller.on_drag_start("USD");
        assert_eq!(controller.lifted(), Some("USD"));
        controller.on_drag_over(Some("GBP"));
        assert_eq!(controller.over(), Some("GBP"));

        assert!(controller.on_drag_end(&mut list, "USD", Some("GBP")));
        assert_eq!(list.codes(), ["EUR", "GBP", "USD"]);
        assert_eq!(controller.state(), &DragState::Idle);
        assert!(controller.lifted().is_none());
    }

    #[test]
    fn test_drop_outside_or_on_self_is_noop() {
        let mut list = selection(r#"["USD","EUR","GBP"]"#);
        let mut controller = ReorderController::new();

        controller.on_drag_start("EUR");
        assert!(!controller.on_drag_end(&mut list, "EUR", None));
        assert_eq!(controller.state(), &DragState::Idle);

        controller.on_drag_start("EUR");
        assert!(!controller.on_drag_end(&mut list, "EUR", Some("EUR")));

        controller.on_drag_start("EUR");
        assert!(!controller.on_drag_end(&mut list, "EUR", Some("JPY")));
        assert_eq!(controller.state(), &DragState::Idle);

        assert_eq!(list.codes(), ["USD", "EUR", "GBP"]);
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let mut controller = ReorderController::new();
        controller.on_drag_start("EUR");
        controller.on_drag_cancel();
        assert_eq!(controller.state(), &DragState::Idle);
    }

    #[test]
    fn test_drag_over_ignored_when_idle() {
        let mut controller = ReorderController::new();
        controller.on_drag_over(Some("EUR"));
        assert_eq!(controller.state(), &DragState::Idle);
        assert!(controller.over().is_none());
    }

    #[test]
    fn test_keyboard_reorder() {
        let mut list = selection(r#"["USD","EUR","GBP","JPY"]"#);
        let mut controller = ReorderController::new();

        controller.keyboard_lift("USD");
        assert_eq!(controller.over(), Some("USD"));
        assert_eq!(controller.keyboard_step(list.codes(), 1), Some("EUR"));
        assert_eq!(controller.keyboard_step(list.codes(), 1), Some("GBP"));

        assert!(controller.keyboard_drop(&mut list));
        assert_eq!(list.codes(), ["EUR", "GBP", "USD", "JPY"]);
        assert_eq!(controller.state(), &DragState::Idle);
    }

    #[test]
    fn test_keyboard_step_clamps_at_ends() {
        let list = selection(r#"["USD","EUR","GBP"]"#);
        let mut controller = ReorderController::new();

        controller.keyboard_lift("EUR");
        assert_eq!(controller.keyboard_step(list.codes(), -5), Some("USD"));
        assert_eq!(controller.keyboard_step(list.codes(), 10), Some("GBP"));
    }

    #[test]
    fn test_keyboard_step_extreme_counts_clamp() {
        let list = selection(r#"["USD","EUR","GBP"]"#);
        let mut controller = ReorderController::new();

        controller.keyboard_lift("EUR");
        assert_eq!(controller.keyboard_step(list.codes(), isize::MAX), Some("GBP"));
        assert_eq!(controller.keyboard_step(list.codes(), isize::MAX), Some("GBP"));
        assert_eq!(controller.keyboard_step(list.codes(), isize::MIN), Some("USD"));
        assert_eq!(controller.keyboard_step(list.codes(), isize::MIN), Some("USD"));
    }

    #[test]
    fn test_keyboard_drop_in_place_and_cancel() {
        let mut list = selection(r#"["USD","EUR","GBP"]"#);
        let mut controller = ReorderController::new();

        controller.keyboard_lift("EUR");
        assert!(!controller.keyboard_drop(&mut list));

        controller.keyboard_lift("EUR");
        controller.keyboard_step(list.codes(), 1);
        controller.keyboard_cancel();
        assert!(!controller.keyboard_drop(&mut list));
        assert_eq!(list.codes(), ["USD", "EUR", "GBP"]);
    }

    #[test]
    fn test_keyboard_step_when_idle() {
        let list = selection(r#"["USD","EUR"]"#);
        let mut controller = ReorderController::new();
        assert!(controller.keyboard_step(list.codes(), 1).is_none());
    }
}
