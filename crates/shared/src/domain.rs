use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(NodeId);
id_newtype!(LevelId);

pub const ROOT_ID: NodeId = NodeId(1);
pub const USERS_ID: NodeId = NodeId(2);
pub const LEARNER_ID: NodeId = NodeId(3);
pub const DESKTOP_ID: NodeId = NodeId(4);
pub const DOCUMENTS_ID: NodeId = NodeId(5);
pub const WORK_ID: NodeId = NodeId(6);
pub const PROJECTS_ID: NodeId = NodeId(7);
pub const TRASH_ID: NodeId = NodeId(8);

/// First id handed out by the store's generator. Scripted seed sets use ids
/// below this so an injected node can never collide with a generated one.
pub const FIRST_GENERATED_ID: i64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Folder,
    Image,
    Text,
    Pdf,
    Video,
    Code,
    Presentation,
    Spreadsheet,
    Audio,
    App,
    Archive,
    System,
    Unknown,
}

impl FileType {
    pub fn is_folder(self) -> bool {
        self == FileType::Folder
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub parent_id: Option<NodeId>,
    pub name: String,
    pub file_type: FileType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<DateTime<Utc>>,
}

impl Node {
    pub fn folder(id: NodeId, parent_id: Option<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id,
            parent_id,
            name: name.into(),
            file_type: FileType::Folder,
            size: None,
            is_system: false,
            date_modified: None,
        }
    }

    pub fn file(
        id: NodeId,
        parent_id: NodeId,
        name: impl Into<String>,
        file_type: FileType,
        size: impl Into<String>,
    ) -> Self {
        Self {
            id,
            parent_id: Some(parent_id),
            name: name.into(),
            file_type,
            size: Some(size.into()),
            is_system: false,
            date_modified: None,
        }
    }

    pub fn system(mut self) -> Self {
        self.is_system = true;
        self
    }

    pub fn is_folder(&self) -> bool {
        self.file_type.is_folder()
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn name_matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// The drive layout every session starts from.
pub fn initial_tree() -> Vec<Node> {
    vec![
        Node::folder(ROOT_ID, None, "C:").system(),
        Node::folder(USERS_ID, Some(ROOT_ID), "Users").system(),
        Node::folder(LEARNER_ID, Some(USERS_ID), "Learner").system(),
        Node::folder(DESKTOP_ID, Some(LEARNER_ID), "Desktop").system(),
        Node::folder(DOCUMENTS_ID, Some(LEARNER_ID), "Documents").system(),
        Node::folder(WORK_ID, Some(DOCUMENTS_ID), "Work"),
        Node::folder(PROJECTS_ID, Some(WORK_ID), "Projects"),
        Node::folder(TRASH_ID, None, "Recycle Bin").system(),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipboardAction {
    Copy,
    Cut,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clipboard {
    pub action: ClipboardAction,
    pub item_ids: Vec<NodeId>,
}

impl Clipboard {
    pub fn contains(&self, id: NodeId) -> bool {
        self.item_ids.contains(&id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelState {
    pub current_level: LevelId,
    pub current_step: usize,
    pub completed: bool,
}
