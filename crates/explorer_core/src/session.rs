//! One learner's explorer: the node store, clipboard, selection and tutorial
//! wired behind a single command entry point.
//!
//! Every command, accepted or rejected, is followed by a tutorial
//! re-evaluation. Modal messages go out on a bounded channel; a full channel
//! drops the message rather than blocking the caller.

use std::time::Instant;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use shared::{
    domain::{Clipboard, FileType, LevelState, Node, NodeId},
    error::FsError,
    protocol::{Command, Notification, ProgressView, Severity, StatusView},
};
use storage::{NodeStore, RenameOutcome};
use tracing::{debug, info, warn};
use tutorial::{curriculum, Observation, TutorialEngine, Transition};

use crate::{
    clipboard::{ClipboardController, PasteOutcome},
    error::SessionError,
    input::{translate_key, translate_pointer, KeyInput, PointerInput},
    selection::{SelectionController, TapOutcome},
    settings::Settings,
};

pub struct ExplorerSession {
    settings: Settings,
    store: NodeStore,
    clipboard: ClipboardController,
    selection: SelectionController,
    tutorial: TutorialEngine,
    current_folder: NodeId,
    search_query: String,
    renaming: Option<NodeId>,
    denied_delete: Option<NodeId>,
    notifications: Sender<Notification>,
}

impl ExplorerSession {
    pub fn new(settings: Settings) -> Result<(Self, Receiver<Notification>), SessionError> {
        Self::with_store(settings, NodeStore::default())
    }

    /// Starts a session over an existing tree, opened at the store's restore
    /// target (the desktop).
    pub fn with_store(
        settings: Settings,
        store: NodeStore,
    ) -> Result<(Self, Receiver<Notification>), SessionError> {
        let tutorial = TutorialEngine::new(
            curriculum(),
            settings.start_level(),
            settings.step_advance_delay(),
        )?;
        let (tx, rx) = bounded(settings.notification_capacity.max(1));
        let current_folder = store.restore_target();
        let mut session = Self {
            settings,
            store,
            clipboard: ClipboardController::default(),
            selection: SelectionController::default(),
            tutorial,
            current_folder,
            search_query: String::new(),
            renaming: None,
            denied_delete: None,
            notifications: tx,
        };
        session.settle(Instant::now());
        info!(level = %session.tutorial.level_state().current_level, "explorer session started");
        Ok((session, rx))
    }

    pub fn execute(&mut self, command: Command) -> Result<(), SessionError> {
        self.execute_at(command, Instant::now())
    }

    /// Runs `command` as if it happened at `now`, then re-evaluates the
    /// tutorial against the resulting state.
    pub fn execute_at(&mut self, command: Command, now: Instant) -> Result<(), SessionError> {
        let name = command.name();
        self.denied_delete = None;

        let result = self.apply(command);
        match &result {
            Ok(()) => debug!(command = name, "command applied"),
            Err(SessionError::Fs(FsError::PermissionDenied { id, name: node_name })) => {
                self.denied_delete = Some(*id);
                self.notify(Notification::new(
                    "Permission Denied",
                    format!(
                        "You cannot delete system files like \"{node_name}\". This keeps your computer safe!"
                    ),
                    Severity::Error,
                ));
            }
            Err(SessionError::Fs(err @ (FsError::InvalidDrop { .. } | FsError::WouldCreateCycle { .. }))) => {
                debug!(command = name, error = %err, "drop ignored");
            }
            Err(err) => warn!(command = name, error = %err, "command rejected"),
        }

        self.selection.prune(&self.store);
        self.clipboard.prune(&self.store);
        self.settle(now);
        result
    }

    pub fn apply_pointer(&mut self, input: PointerInput) -> Result<(), SessionError> {
        for command in translate_pointer(input, &self.selection) {
            self.execute(command)?;
        }
        Ok(())
    }

    pub fn apply_key(&mut self, input: KeyInput) -> Result<(), SessionError> {
        for command in translate_key(input, &self.selection) {
            self.execute(command)?;
        }
        Ok(())
    }

    /// Applies a tutorial advance whose pacing delay has elapsed by `now`.
    pub fn tick(&mut self, now: Instant) {
        if let Some(transition) = self.tutorial.tick(now) {
            self.on_transition(transition);
            self.settle(now);
        }
    }

    /// Deadline of the scheduled tutorial advance, if one is waiting.
    pub fn pending_advance(&self) -> Option<Instant> {
        self.tutorial.pending_advance()
    }

    fn apply(&mut self, command: Command) -> Result<(), SessionError> {
        match command {
            Command::CreateFolder => {
                let parent = self.creatable_folder()?;
                let id = self
                    .store
                    .create_folder(parent, &self.settings.default_folder_name)?;
                self.begin_rename(id);
            }
            Command::CreateFile => {
                let parent = self.creatable_folder()?;
                let id = self
                    .store
                    .create_file(parent, &self.settings.default_file_name)?;
                self.begin_rename(id);
            }
            Command::Rename { id, name } => {
                let outcome = self.store.rename(id, &name)?;
                self.renaming = None;
                if let RenameOutcome::Renamed {
                    unrecognized_extension: Some(ext),
                    ..
                } = outcome
                {
                    self.notify(Notification::new(
                        "Unknown File Type",
                        format!(
                            "The system doesn't recognize \".{ext}\". Try using standard extensions like .txt, .jpg, or .pdf to make the file readable!"
                        ),
                        Severity::Info,
                    ));
                }
            }
            Command::Move { ids, target } => {
                self.store.move_nodes(&ids, target)?;
            }
            Command::Copy => {
                self.clipboard.copy(self.selection.selected());
            }
            Command::Cut => {
                self.clipboard.cut(self.selection.selected());
            }
            Command::Paste => {
                if self.clipboard.contents().is_none() {
                    return Ok(());
                }
                let target = self.creatable_folder()?;
                let outcome =
                    self.clipboard
                        .paste(&mut self.store, target, &self.settings.copy_suffix)?;
                if let PasteOutcome::Copied(created) = outcome {
                    debug!(count = created.len(), target = %target, "pasted copies");
                }
            }
            Command::Delete => {
                let ids = self.selection.selected().to_vec();
                if self.current_folder == self.store.trash_id() {
                    self.store.hard_delete(&ids)?;
                } else {
                    self.store.soft_delete(&ids)?;
                }
                self.selection.clear();
            }
            Command::HardDelete => {
                let ids = self.selection.selected().to_vec();
                self.store.hard_delete(&ids)?;
                self.selection.clear();
            }
            Command::Restore => {
                let ids = self.selection.selected().to_vec();
                if !ids.is_empty() && self.current_folder != self.store.trash_id() {
                    return Err(FsError::NotInTrash(self.current_folder).into());
                }
                self.store.restore(&ids)?;
                self.selection.clear();
            }
            Command::Archive => {
                let parent = self.creatable_folder()?;
                self.store.archive(
                    self.selection.selected(),
                    parent,
                    &self.settings.archive_name,
                )?;
            }
            Command::SelectExclusive { id } => {
                self.require_node(id)?;
                self.selection.select_exclusive(id);
            }
            Command::SelectToggle { id } => {
                self.require_node(id)?;
                self.selection.select_toggle(id);
            }
            Command::ClearSelection => self.selection.clear(),
            Command::SetWorkingFolder { id } => self.navigate(id)?,
            Command::NavigateUp => {
                let parent = self
                    .store
                    .get(self.current_folder)
                    .and_then(|node| node.parent_id);
                if let Some(parent) = parent {
                    self.navigate(parent)?;
                }
            }
            Command::Open { id } => self.open(id)?,
            Command::SetSearchQuery { query } => {
                self.search_query = query;
                self.selection.clear();
            }
            Command::AcknowledgeLevelComplete => {
                self.tutorial.acknowledge_level_complete()?;
                self.current_folder = self.store.restore_target();
                self.search_query.clear();
                self.selection.clear();
                self.renaming = None;
            }
            Command::LongPress { id } => {
                self.require_node(id)?;
                self.selection.long_press(id);
            }
            Command::Tap { id } => {
                self.require_node(id)?;
                if let TapOutcome::Open(id) = self.selection.tap(id) {
                    self.open(id)?;
                }
            }
            Command::ExitMultiSelect => self.selection.exit_multi_select(),
            Command::DragStart { id } => {
                self.require_node(id)?;
                self.selection.begin_drag(id);
            }
            Command::Drop { target } => {
                self.selection.drop_on(&mut self.store, target)?;
            }
        }
        Ok(())
    }

    /// Folder new items land in. The trash and search results are views, not
    /// places to create things.
    fn creatable_folder(&self) -> Result<NodeId, FsError> {
        if self.store.is_in_trash_area(self.current_folder) || !self.search_query.trim().is_empty()
        {
            return Err(FsError::ReadOnlyLocation(self.current_folder));
        }
        Ok(self.current_folder)
    }

    fn begin_rename(&mut self, id: NodeId) {
        self.selection.select_exclusive(id);
        self.renaming = Some(id);
    }

    fn require_node(&self, id: NodeId) -> Result<&Node, FsError> {
        self.store.get(id).ok_or(FsError::NodeNotFound(id))
    }

    fn navigate(&mut self, id: NodeId) -> Result<(), FsError> {
        if !self.require_node(id)?.is_folder() {
            return Err(FsError::NotAFolder(id));
        }
        self.current_folder = id;
        self.search_query.clear();
        self.selection.clear();
        self.renaming = None;
        debug!(folder = %id, "navigated");
        Ok(())
    }

    fn open(&mut self, id: NodeId) -> Result<(), FsError> {
        let file_type = self.require_node(id)?.file_type;
        match file_type {
            FileType::Folder => self.navigate(id),
            FileType::System => {
                self.notify(Notification::new(
                    "System File",
                    "This file cannot be opened directly.",
                    Severity::Info,
                ));
                Ok(())
            }
            file_type => {
                debug!(node_id = %id, ?file_type, "opened file");
                Ok(())
            }
        }
    }

    /// Injects any pending seed and evaluates until the tutorial stops moving.
    fn settle(&mut self, now: Instant) {
        loop {
            if let Err(err) = self.tutorial.inject_pending_seed(&mut self.store) {
                warn!(error = %err, "could not inject level seed");
            }
            let obs = Observation {
                store: &self.store,
                current_folder: self.current_folder,
                clipboard: self.clipboard.contents(),
                search_query: &self.search_query,
                denied_delete: self.denied_delete,
            };
            match self.tutorial.evaluate(&obs, now) {
                Some(transition) => self.on_transition(transition),
                None => break,
            }
        }
    }

    fn on_transition(&mut self, transition: Transition) {
        debug!(?transition, "tutorial transition");
        if transition == Transition::CurriculumCompleted {
            self.notify(Notification::new(
                "Simulation Complete!",
                "You are now a Certified File Manager! You've learned organization, extensions, search, and security.",
                Severity::Success,
            ));
        }
    }

    fn notify(&self, notification: Notification) {
        match self.notifications.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                warn!(title = %dropped.title, "notification queue is full; dropping message");
            }
            Err(TrySendError::Disconnected(_)) => {
                debug!("notification receiver dropped");
            }
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.store.get(id)
    }

    pub fn children(&self, folder: NodeId) -> Vec<&Node> {
        self.store.children(folder)
    }

    /// Search results while a query is active, otherwise the working folder.
    pub fn visible_items(&self) -> Vec<&Node> {
        if self.search_query.trim().is_empty() {
            self.store.children(self.current_folder)
        } else {
            self.store.search(&self.search_query)
        }
    }

    pub fn breadcrumbs(&self) -> Vec<&Node> {
        self.store.breadcrumbs(self.current_folder)
    }

    pub fn current_folder(&self) -> NodeId {
        self.current_folder
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn selection(&self) -> &[NodeId] {
        self.selection.selected()
    }

    pub fn in_multi_select(&self) -> bool {
        self.selection.in_multi_select()
    }

    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.clipboard.contents()
    }

    /// Node freshly created and waiting for its name to be edited in place.
    pub fn renaming(&self) -> Option<NodeId> {
        self.renaming
    }

    pub fn level_state(&self) -> LevelState {
        self.tutorial.level_state()
    }

    pub fn progress(&self) -> ProgressView {
        self.tutorial.progress()
    }

    pub fn status(&self) -> StatusView {
        StatusView {
            current_folder: self.current_folder,
            breadcrumbs: self
                .breadcrumbs()
                .into_iter()
                .map(|node| node.name.clone())
                .collect(),
            search_query: self.search_query.clone(),
            items: self.visible_items().into_iter().cloned().collect(),
            selection: self.selection.selected().to_vec(),
            clipboard: self.clipboard.contents().cloned(),
            progress: self.progress(),
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
