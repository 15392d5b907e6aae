use shared::{
    domain::{Clipboard, ClipboardAction, NodeId},
    error::FsError,
};
use storage::NodeStore;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteOutcome {
    /// Clipboard was empty.
    Nothing,
    Moved(usize),
    Copied(Vec<NodeId>),
}

#[derive(Debug, Default, Clone)]
pub struct ClipboardController {
    contents: Option<Clipboard>,
}

impl ClipboardController {
    pub fn contents(&self) -> Option<&Clipboard> {
        self.contents.as_ref()
    }

    pub fn copy(&mut self, ids: &[NodeId]) -> bool {
        self.replace(ClipboardAction::Copy, ids)
    }

    pub fn cut(&mut self, ids: &[NodeId]) -> bool {
        self.replace(ClipboardAction::Cut, ids)
    }

    fn replace(&mut self, action: ClipboardAction, ids: &[NodeId]) -> bool {
        if ids.is_empty() {
            return false;
        }
        let mut item_ids: Vec<NodeId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !item_ids.contains(id) {
                item_ids.push(*id);
            }
        }
        debug!(?action, count = item_ids.len(), "clipboard replaced");
        self.contents = Some(Clipboard { action, item_ids });
        true
    }

    /// Cut contents are moved into `target` and the clipboard is cleared.
    /// Copy contents are cloned and stay on the clipboard for further pastes.
    /// A rejected move leaves the clipboard untouched.
    pub fn paste(
        &mut self,
        store: &mut NodeStore,
        target: NodeId,
        copy_suffix: &str,
    ) -> Result<PasteOutcome, FsError> {
        let Some(clipboard) = self.contents.as_ref() else {
            return Ok(PasteOutcome::Nothing);
        };
        match clipboard.action {
            ClipboardAction::Cut => {
                let moved = store.move_nodes(&clipboard.item_ids, target)?;
                self.contents = None;
                Ok(PasteOutcome::Moved(moved))
            }
            ClipboardAction::Copy => {
                let created = store.clone_into(&clipboard.item_ids, target, copy_suffix)?;
                Ok(PasteOutcome::Copied(created))
            }
        }
    }

    pub fn clear(&mut self) {
        self.contents = None;
    }

    /// Drops ids that no longer exist in `store`; an emptied clipboard is cleared.
    pub fn prune(&mut self, store: &NodeStore) {
        if let Some(clipboard) = self.contents.as_mut() {
            clipboard.item_ids.retain(|id| store.contains(*id));
            if clipboard.item_ids.is_empty() {
                self.contents = None;
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/clipboard_tests.rs"]
mod tests;
