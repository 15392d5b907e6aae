use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    PermissionDenied,
    UnrecognizedExtension,
    InvalidDrop,
    EmptyOperation,
    NotFound,
    Validation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("cannot delete system node {id} ({name})")]
    PermissionDenied { id: NodeId, name: String },
    #[error("node {0} does not exist")]
    NodeNotFound(NodeId),
    #[error("node {0} is not a folder")]
    NotAFolder(NodeId),
    #[error("cannot drop onto {target}: {reason}")]
    InvalidDrop { target: NodeId, reason: &'static str },
    #[error("moving {moved} into {target} would make it its own ancestor")]
    WouldCreateCycle { moved: NodeId, target: NodeId },
    #[error("node {0} is not in the trash")]
    NotInTrash(NodeId),
    #[error("node id {0} is already taken")]
    DuplicateId(NodeId),
    #[error("cannot create items in {0}")]
    ReadOnlyLocation(NodeId),
}

impl FsError {
    pub fn code(&self) -> ErrorCode {
        match self {
            FsError::PermissionDenied { .. } => ErrorCode::PermissionDenied,
            FsError::InvalidDrop { .. } | FsError::WouldCreateCycle { .. } => {
                ErrorCode::InvalidDrop
            }
            FsError::NodeNotFound(_) => ErrorCode::NotFound,
            FsError::NotAFolder(_)
            | FsError::NotInTrash(_)
            | FsError::DuplicateId(_)
            | FsError::ReadOnlyLocation(_) => ErrorCode::Validation,
        }
    }
}

/// Serializable form of a rejected command, for front-ends that speak JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorReport {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<&FsError> for ErrorReport {
    fn from(value: &FsError) -> Self {
        Self::new(value.code(), value.to_string())
    }
}

impl From<FsError> for ErrorReport {
    fn from(value: FsError) -> Self {
        Self::from(&value)
    }
}
