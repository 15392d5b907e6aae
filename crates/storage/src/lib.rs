//! In-memory node store for the simulated file system.
//!
//! Nodes live in an id-indexed map with a parent -> ordered children index
//! alongside it, so lookups and listings never scan the whole tree.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::{
    domain::{initial_tree, FileType, Node, NodeId, DESKTOP_ID, FIRST_GENERATED_ID, TRASH_ID},
    error::FsError,
    file_type::{resolve_file_type, unrecognized_extension},
};
use tracing::{debug, warn};

const EMPTY_FILE_SIZE: &str = "0 KB";
const ARCHIVE_SIZE: &str = "compressed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RenameOutcome {
    /// Blank names are ignored and the node keeps its current name.
    Unchanged,
    Renamed {
        file_type: FileType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unrecognized_extension: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct NodeStore {
    nodes: BTreeMap<NodeId, Node>,
    children: HashMap<NodeId, Vec<NodeId>>,
    roots: Vec<NodeId>,
    trash_id: NodeId,
    restore_target: NodeId,
    next_id: i64,
}

impl Default for NodeStore {
    fn default() -> Self {
        let mut store = Self::empty(TRASH_ID, DESKTOP_ID);
        for node in initial_tree() {
            store.attach(node);
        }
        store
    }
}

impl NodeStore {
    fn empty(trash_id: NodeId, restore_target: NodeId) -> Self {
        Self {
            nodes: BTreeMap::new(),
            children: HashMap::new(),
            roots: Vec::new(),
            trash_id,
            restore_target,
            next_id: FIRST_GENERATED_ID,
        }
    }

    /// Builds a store from an arbitrary node set. Every parent must exist and
    /// be a folder, the parent graph must be acyclic, and both the trash and
    /// the restore target must be folders in the set.
    pub fn from_nodes(
        nodes: Vec<Node>,
        trash_id: NodeId,
        restore_target: NodeId,
    ) -> Result<Self, FsError> {
        let mut by_id: HashMap<NodeId, &Node> = HashMap::with_capacity(nodes.len());
        for node in &nodes {
            if by_id.insert(node.id, node).is_some() {
                return Err(FsError::DuplicateId(node.id));
            }
        }
        for node in &nodes {
            if let Some(parent_id) = node.parent_id {
                let parent = by_id
                    .get(&parent_id)
                    .ok_or(FsError::NodeNotFound(parent_id))?;
                if !parent.is_folder() {
                    return Err(FsError::NotAFolder(parent_id));
                }
            }
        }
        for required in [trash_id, restore_target] {
            let node = by_id.get(&required).ok_or(FsError::NodeNotFound(required))?;
            if !node.is_folder() {
                return Err(FsError::NotAFolder(required));
            }
        }
        for node in &nodes {
            let mut hops = 0;
            let mut cursor = node.parent_id;
            while let Some(parent_id) = cursor {
                hops += 1;
                if hops > nodes.len() {
                    return Err(FsError::WouldCreateCycle {
                        moved: node.id,
                        target: parent_id,
                    });
                }
                cursor = by_id.get(&parent_id).and_then(|parent| parent.parent_id);
            }
        }

        let mut store = Self::empty(trash_id, restore_target);
        for node in nodes {
            store.attach(node);
        }
        Ok(store)
    }

    pub fn trash_id(&self) -> NodeId {
        self.trash_id
    }

    pub fn restore_target(&self) -> NodeId {
        self.restore_target
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.roots.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn child_ids(&self, parent_id: NodeId) -> &[NodeId] {
        self.children
            .get(&parent_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Children of `parent_id` in the order they arrived in the folder.
    pub fn children(&self, parent_id: NodeId) -> Vec<&Node> {
        self.child_ids(parent_id)
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect()
    }

    pub fn has_child_named(&self, parent_id: NodeId, name: &str) -> bool {
        self.child_ids(parent_id)
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .any(|node| node.name_matches(name))
    }

    pub fn find_folder_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes
            .values()
            .find(|node| node.is_folder() && node.name == name)
    }

    pub fn is_in_trash(&self, id: NodeId) -> bool {
        self.nodes
            .get(&id)
            .is_some_and(|node| node.parent_id == Some(self.trash_id))
    }

    /// Path from the topmost ancestor down to `id`, inclusive.
    pub fn breadcrumbs(&self, id: NodeId) -> Vec<&Node> {
        let mut path = Vec::new();
        let mut cursor = self.nodes.get(&id);
        while let Some(node) = cursor {
            path.push(node);
            if path.len() > self.nodes.len() {
                break;
            }
            cursor = node.parent_id.and_then(|parent_id| self.nodes.get(&parent_id));
        }
        path.reverse();
        path
    }

    /// Number of hops from `id` up to its root, or `None` for unknown ids.
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        let crumbs = self.breadcrumbs(id);
        (!crumbs.is_empty()).then(|| crumbs.len() - 1)
    }

    /// True when `ancestor` appears on the parent chain of `id`. A node is not
    /// its own descendant.
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut hops = 0;
        let mut cursor = self.nodes.get(&id).and_then(|node| node.parent_id);
        while let Some(parent_id) = cursor {
            if parent_id == ancestor {
                return true;
            }
            hops += 1;
            if hops > self.nodes.len() {
                return false;
            }
            cursor = self.nodes.get(&parent_id).and_then(|node| node.parent_id);
        }
        false
    }

    /// Case-insensitive name search across the whole tree. Parentless
    /// containers (drive root, trash) are never results.
    pub fn search(&self, query: &str) -> Vec<&Node> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.nodes
            .values()
            .filter(|node| !node.is_root() && node.name.to_lowercase().contains(&query))
            .collect()
    }

    /// `id` and every node below it, parents before children.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            for child in self.child_ids(current).iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    pub fn create_folder(&mut self, parent_id: NodeId, name: &str) -> Result<NodeId, FsError> {
        self.require_folder(parent_id)?;
        let id = self.generate_id();
        let mut node = Node::folder(id, Some(parent_id), name);
        node.date_modified = Some(Utc::now());
        self.attach(node);
        debug!(node_id = %id, parent_id = %parent_id, name, "created folder");
        Ok(id)
    }

    pub fn create_file(&mut self, parent_id: NodeId, name: &str) -> Result<NodeId, FsError> {
        self.require_folder(parent_id)?;
        let id = self.generate_id();
        let mut node = Node::file(id, parent_id, name, resolve_file_type(name), EMPTY_FILE_SIZE);
        node.date_modified = Some(Utc::now());
        let file_type = node.file_type;
        self.attach(node);
        debug!(node_id = %id, parent_id = %parent_id, name, ?file_type, "created file");
        Ok(id)
    }

    pub fn rename(&mut self, id: NodeId, new_name: &str) -> Result<RenameOutcome, FsError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Ok(RenameOutcome::Unchanged);
        }
        let node = self.nodes.get_mut(&id).ok_or(FsError::NodeNotFound(id))?;
        if !node.is_folder() {
            node.file_type = resolve_file_type(new_name);
        }
        let unrecognized = unrecognized_extension(new_name);
        node.name = new_name.to_string();
        node.date_modified = Some(Utc::now());
        debug!(node_id = %id, name = new_name, file_type = ?node.file_type, "renamed node");
        Ok(RenameOutcome::Renamed {
            file_type: node.file_type,
            unrecognized_extension: unrecognized,
        })
    }

    /// Reparents every id under `target_id`. The whole move is rejected when
    /// the target is one of the moved nodes or lies anywhere beneath one, and
    /// no protected node may end up in the trash or in a folder inside it.
    pub fn move_nodes(&mut self, ids: &[NodeId], target_id: NodeId) -> Result<usize, FsError> {
        if ids.is_empty() {
            return Ok(0);
        }
        self.require_folder(target_id)?;
        let into_trash = self.is_in_trash_area(target_id);
        for &id in ids {
            if !self.contains(id) {
                return Err(FsError::NodeNotFound(id));
            }
            if id == target_id {
                return Err(FsError::InvalidDrop {
                    target: target_id,
                    reason: "target is part of the moved selection",
                });
            }
            if id == self.trash_id {
                return Err(FsError::InvalidDrop {
                    target: target_id,
                    reason: "the trash cannot be moved",
                });
            }
            if into_trash {
                if let Some(node) = self.first_protected_in(id) {
                    warn!(node_id = %node.id, name = %node.name, "refused to move system node to trash");
                    return Err(FsError::PermissionDenied {
                        id: node.id,
                        name: node.name.clone(),
                    });
                }
            }
            if self.is_descendant_of(target_id, id) {
                warn!(moved = %id, target = %target_id, "rejected move into own descendant");
                return Err(FsError::WouldCreateCycle {
                    moved: id,
                    target: target_id,
                });
            }
        }

        let mut moved = 0;
        for id in dedup(ids) {
            self.reparent(id, target_id);
            moved += 1;
        }
        debug!(count = moved, target = %target_id, "moved nodes");
        Ok(moved)
    }

    /// Moves nodes into the trash. A single protected node anywhere in the
    /// batch, or anywhere beneath a batch member, rejects the whole operation
    /// and leaves the tree untouched.
    pub fn soft_delete(&mut self, ids: &[NodeId]) -> Result<usize, FsError> {
        for &id in ids {
            if !self.contains(id) {
                return Err(FsError::NodeNotFound(id));
            }
            if id == self.trash_id {
                continue;
            }
            if let Some(node) = self.first_protected_in(id) {
                warn!(node_id = %node.id, name = %node.name, "refused to delete system node");
                return Err(FsError::PermissionDenied {
                    id: node.id,
                    name: node.name.clone(),
                });
            }
        }

        let trash_id = self.trash_id;
        let mut moved = 0;
        for id in dedup(ids) {
            if id == trash_id || self.is_in_trash(id) {
                continue;
            }
            self.reparent(id, trash_id);
            moved += 1;
        }
        debug!(count = moved, "moved nodes to trash");
        Ok(moved)
    }

    /// Permanently removes nodes sitting directly in the trash, together with
    /// everything beneath them.
    pub fn hard_delete(&mut self, ids: &[NodeId]) -> Result<usize, FsError> {
        for &id in ids {
            let node = self.nodes.get(&id).ok_or(FsError::NodeNotFound(id))?;
            if node.parent_id != Some(self.trash_id) {
                return Err(FsError::NotInTrash(id));
            }
            if let Some(node) = self.first_protected_in(id) {
                warn!(node_id = %node.id, name = %node.name, "refused to purge system node");
                return Err(FsError::PermissionDenied {
                    id: node.id,
                    name: node.name.clone(),
                });
            }
        }

        let mut removed = 0;
        for id in dedup(ids) {
            let doomed = self.subtree(id);
            if doomed.is_empty() {
                continue;
            }
            self.detach_from_parent(id);
            for node_id in doomed {
                self.children.remove(&node_id);
                if self.nodes.remove(&node_id).is_some() {
                    removed += 1;
                }
            }
        }
        debug!(count = removed, "permanently deleted nodes");
        Ok(removed)
    }

    pub fn restore(&mut self, ids: &[NodeId]) -> Result<usize, FsError> {
        let target = self.restore_target;
        self.require_folder(target)?;
        for &id in ids {
            if !self.contains(id) {
                return Err(FsError::NodeNotFound(id));
            }
            if !self.is_in_trash(id) {
                return Err(FsError::NotInTrash(id));
            }
        }
        let mut restored = 0;
        for id in dedup(ids) {
            self.reparent(id, target);
            restored += 1;
        }
        debug!(count = restored, target = %target, "restored nodes from trash");
        Ok(restored)
    }

    /// Adds one archive node for the selection to `parent_id`. The archived
    /// nodes themselves stay where they are.
    pub fn archive(
        &mut self,
        ids: &[NodeId],
        parent_id: NodeId,
        name: &str,
    ) -> Result<Option<NodeId>, FsError> {
        if ids.is_empty() {
            return Ok(None);
        }
        for &id in ids {
            if !self.contains(id) {
                return Err(FsError::NodeNotFound(id));
            }
        }
        self.require_folder(parent_id)?;
        let id = self.generate_id();
        let mut node = Node::file(id, parent_id, name, FileType::Archive, ARCHIVE_SIZE);
        node.date_modified = Some(Utc::now());
        self.attach(node);
        debug!(node_id = %id, parent_id = %parent_id, sources = ids.len(), "created archive");
        Ok(Some(id))
    }

    /// Clones each source under `target_id` with a fresh id and `suffix`
    /// appended to its name. Folder clones bring a copy of their contents.
    /// Sources that no longer exist are skipped.
    pub fn clone_into(
        &mut self,
        ids: &[NodeId],
        target_id: NodeId,
        suffix: &str,
    ) -> Result<Vec<NodeId>, FsError> {
        self.require_folder(target_id)?;
        let now = Utc::now();
        let mut created = Vec::new();
        for source_id in dedup(ids) {
            let plan: Vec<Node> = self
                .subtree(source_id)
                .into_iter()
                .filter_map(|id| self.nodes.get(&id).cloned())
                .collect();
            let mut remap: HashMap<NodeId, NodeId> = HashMap::with_capacity(plan.len());
            for (index, mut node) in plan.into_iter().enumerate() {
                let new_id = self.generate_id();
                remap.insert(node.id, new_id);
                node.id = new_id;
                node.date_modified = Some(now);
                if index == 0 {
                    node.parent_id = Some(target_id);
                    node.name = format!("{}{}", node.name, suffix);
                    created.push(new_id);
                } else {
                    node.parent_id = node.parent_id.and_then(|old| remap.get(&old).copied());
                }
                self.attach(node);
            }
        }
        debug!(count = created.len(), target = %target_id, "pasted copies");
        Ok(created)
    }

    /// Inserts scripted nodes with fixed ids. Parents must already exist or
    /// appear earlier in the batch. All-or-nothing.
    pub fn seed(&mut self, nodes: &[Node]) -> Result<usize, FsError> {
        let mut batch_folders: HashSet<NodeId> = HashSet::new();
        let mut batch_ids: HashSet<NodeId> = HashSet::new();
        for node in nodes {
            if self.contains(node.id) || !batch_ids.insert(node.id) {
                return Err(FsError::DuplicateId(node.id));
            }
            if let Some(parent_id) = node.parent_id {
                if !batch_folders.contains(&parent_id) {
                    self.require_folder(parent_id)?;
                }
            }
            if node.is_folder() {
                batch_folders.insert(node.id);
            }
        }
        for node in nodes {
            self.attach(node.clone());
        }
        debug!(count = nodes.len(), "seeded nodes");
        Ok(nodes.len())
    }

    /// The trash itself or any folder beneath it.
    pub fn is_in_trash_area(&self, id: NodeId) -> bool {
        id == self.trash_id || self.is_descendant_of(id, self.trash_id)
    }

    /// First protected node in the subtree rooted at `id`, parents first.
    fn first_protected_in(&self, id: NodeId) -> Option<&Node> {
        self.subtree(id)
            .into_iter()
            .filter_map(|node_id| self.nodes.get(&node_id))
            .find(|node| node.is_system)
    }

    fn require_folder(&self, id: NodeId) -> Result<&Node, FsError> {
        let node = self.nodes.get(&id).ok_or(FsError::NodeNotFound(id))?;
        if !node.is_folder() {
            return Err(FsError::NotAFolder(id));
        }
        Ok(node)
    }

    fn generate_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn attach(&mut self, node: Node) {
        let id = node.id;
        match node.parent_id {
            Some(parent_id) => self.children.entry(parent_id).or_default().push(id),
            None => self.roots.push(id),
        }
        if id.0 >= self.next_id {
            self.next_id = id.0 + 1;
        }
        self.nodes.insert(id, node);
    }

    fn detach_from_parent(&mut self, id: NodeId) {
        let parent_id = self.nodes.get(&id).and_then(|node| node.parent_id);
        match parent_id {
            Some(parent_id) => {
                if let Some(siblings) = self.children.get_mut(&parent_id) {
                    siblings.retain(|sibling| *sibling != id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }
    }

    fn reparent(&mut self, id: NodeId, target_id: NodeId) {
        self.detach_from_parent(id);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent_id = Some(target_id);
        }
        self.children.entry(target_id).or_default().push(id);
    }
}

fn dedup(ids: &[NodeId]) -> Vec<NodeId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
