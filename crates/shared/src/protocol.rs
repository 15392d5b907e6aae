use serde::{Deserialize, Serialize};

use crate::{
    domain::{Clipboard, LevelId, LevelState, Node, NodeId},
    error::ErrorReport,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Command {
    CreateFolder,
    CreateFile,
    Rename {
        id: NodeId,
        name: String,
    },
    Move {
        ids: Vec<NodeId>,
        target: NodeId,
    },
    Copy,
    Cut,
    Paste,
    /// Soft delete of the selection; permanent when the working folder is the trash.
    Delete,
    HardDelete,
    Restore,
    Archive,
    SelectExclusive {
        id: NodeId,
    },
    SelectToggle {
        id: NodeId,
    },
    ClearSelection,
    SetWorkingFolder {
        id: NodeId,
    },
    NavigateUp,
    Open {
        id: NodeId,
    },
    SetSearchQuery {
        query: String,
    },
    AcknowledgeLevelComplete,
    LongPress {
        id: NodeId,
    },
    Tap {
        id: NodeId,
    },
    ExitMultiSelect,
    DragStart {
        id: NodeId,
    },
    Drop {
        target: NodeId,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateFolder => "create_folder",
            Command::CreateFile => "create_file",
            Command::Rename { .. } => "rename",
            Command::Move { .. } => "move",
            Command::Copy => "copy",
            Command::Cut => "cut",
            Command::Paste => "paste",
            Command::Delete => "delete",
            Command::HardDelete => "hard_delete",
            Command::Restore => "restore",
            Command::Archive => "archive",
            Command::SelectExclusive { .. } => "select_exclusive",
            Command::SelectToggle { .. } => "select_toggle",
            Command::ClearSelection => "clear_selection",
            Command::SetWorkingFolder { .. } => "set_working_folder",
            Command::NavigateUp => "navigate_up",
            Command::Open { .. } => "open",
            Command::SetSearchQuery { .. } => "set_search_query",
            Command::AcknowledgeLevelComplete => "acknowledge_level_complete",
            Command::LongPress { .. } => "long_press",
            Command::Tap { .. } => "tap",
            Command::ExitMultiSelect => "exit_multi_select",
            Command::DragStart { .. } => "drag_start",
            Command::Drop { .. } => "drop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Success,
    Info,
}

/// Transient message for the modal presenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TutorialPhase {
    InStep { level: LevelId, step: usize },
    LevelComplete { level: LevelId },
    Completed,
}

/// What the instruction panel renders for the active step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressView {
    pub phase: TutorialPhase,
    pub level_state: LevelState,
    pub level_title: String,
    pub level_description: String,
    pub step_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_drop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pro_tip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusView {
    pub current_folder: NodeId,
    pub breadcrumbs: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub search_query: String,
    pub items: Vec<Node>,
    pub selection: Vec<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clipboard: Option<Clipboard>,
    pub progress: ProgressView,
}

/// One line of output from a scripted front-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SessionEvent {
    Notification(Notification),
    Rejected {
        command: String,
        error: ErrorReport,
    },
    Status(Box<StatusView>),
}
