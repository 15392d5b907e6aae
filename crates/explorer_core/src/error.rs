use shared::error::{ErrorCode, ErrorReport, FsError};
use thiserror::Error;
use tutorial::TutorialError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Fs(#[from] FsError),
    #[error(transparent)]
    Tutorial(#[from] TutorialError),
}

impl SessionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::Fs(err) => err.code(),
            SessionError::Tutorial(_) => ErrorCode::Validation,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport::new(self.code(), self.to_string())
    }
}
