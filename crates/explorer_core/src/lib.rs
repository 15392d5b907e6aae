pub mod clipboard;
pub mod error;
pub mod input;
pub mod selection;
pub mod session;
pub mod settings;

pub use error::SessionError;
pub use session::ExplorerSession;
pub use settings::{load_settings, Settings};
