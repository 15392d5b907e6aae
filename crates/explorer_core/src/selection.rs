//! Selection state shared by mouse, keyboard and touch front-ends, plus the
//! drag payload that a drop turns into a move.

use shared::{domain::NodeId, error::FsError};
use storage::NodeStore;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    Toggled,
    /// Outside multi-select a tap behaves like a double click.
    Open(NodeId),
}

#[derive(Debug, Default, Clone)]
pub struct SelectionController {
    selected: Vec<NodeId>,
    drag_payload: Option<Vec<NodeId>>,
    multi_select: bool,
}

impl SelectionController {
    pub fn selected(&self) -> &[NodeId] {
        &self.selected
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selected.contains(&id)
    }

    pub fn in_multi_select(&self) -> bool {
        self.multi_select
    }

    pub fn drag_payload(&self) -> Option<&[NodeId]> {
        self.drag_payload.as_deref()
    }

    pub fn select_exclusive(&mut self, id: NodeId) {
        self.selected.clear();
        self.selected.push(id);
    }

    pub fn select_toggle(&mut self, id: NodeId) {
        if let Some(index) = self.selected.iter().position(|selected| *selected == id) {
            self.selected.remove(index);
        } else {
            self.selected.push(id);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Dragging a selected item carries the whole selection; dragging
    /// anything else carries just that item.
    pub fn begin_drag(&mut self, id: NodeId) -> &[NodeId] {
        let payload = if self.is_selected(id) {
            self.selected.clone()
        } else {
            vec![id]
        };
        debug!(source = %id, count = payload.len(), "drag started");
        self.drag_payload.insert(payload).as_slice()
    }

    pub fn cancel_drag(&mut self) {
        self.drag_payload = None;
    }

    /// Completes the active drag onto `target`. Without an active drag this is
    /// a no-op. The payload is consumed whether or not the drop is accepted.
    pub fn drop_on(&mut self, store: &mut NodeStore, target: NodeId) -> Result<usize, FsError> {
        let Some(payload) = self.drag_payload.take() else {
            return Ok(0);
        };
        if !store.get(target).is_some_and(|node| node.is_folder()) {
            warn!(target = %target, "drop rejected: target is not a folder");
            return Err(FsError::InvalidDrop {
                target,
                reason: "target is not a folder",
            });
        }
        if payload.contains(&target) {
            warn!(target = %target, "drop rejected: target is being dragged");
            return Err(FsError::InvalidDrop {
                target,
                reason: "target is part of the dragged items",
            });
        }
        let moved = store.move_nodes(&payload, target)?;
        self.selected.clear();
        Ok(moved)
    }

    pub fn long_press(&mut self, id: NodeId) {
        self.multi_select = true;
        self.select_exclusive(id);
    }

    pub fn tap(&mut self, id: NodeId) -> TapOutcome {
        if self.multi_select {
            self.select_toggle(id);
            TapOutcome::Toggled
        } else {
            TapOutcome::Open(id)
        }
    }

    pub fn exit_multi_select(&mut self) {
        self.multi_select = false;
        self.selected.clear();
    }

    /// Forgets ids that no longer exist in `store`.
    pub fn prune(&mut self, store: &NodeStore) {
        self.selected.retain(|id| store.contains(*id));
        if let Some(payload) = self.drag_payload.as_mut() {
            payload.retain(|id| store.contains(*id));
        }
    }
}

#[cfg(test)]
#[path = "tests/selection_tests.rs"]
mod tests;
