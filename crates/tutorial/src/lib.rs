//! Scripted lesson progression.
//!
//! The engine walks a fixed curriculum of levels, each an ordered list of
//! steps guarded by a completion predicate. Predicates are evaluated against
//! an [`Observation`] of the live session after every command. Satisfying a
//! predicate schedules an advance that becomes due after a short pacing delay
//! and is applied by [`TutorialEngine::tick`].

use std::{
    collections::HashSet,
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use shared::{
    domain::{Clipboard, LevelId, LevelState, Node, NodeId},
    error::FsError,
    protocol::{ProgressView, TutorialPhase},
};
use storage::NodeStore;
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod curriculum;

pub use curriculum::curriculum;

/// Everything a step predicate is allowed to look at.
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    pub store: &'a NodeStore,
    pub current_folder: NodeId,
    pub clipboard: Option<&'a Clipboard>,
    pub search_query: &'a str,
    /// Protected node the most recent delete attempt was refused on.
    pub denied_delete: Option<NodeId>,
}

impl<'a> Observation<'a> {
    pub fn search_results(&self) -> Vec<&'a Node> {
        self.store.search(self.search_query)
    }
}

pub type Predicate = fn(&Observation<'_>) -> bool;

#[derive(Debug, Clone)]
pub struct LevelStep {
    pub instruction: &'static str,
    pub knowledge_drop: &'static str,
    pub pro_tip: Option<&'static str>,
    pub action_prompt: Option<&'static str>,
    pub is_complete: Predicate,
}

#[derive(Debug, Clone)]
pub struct LevelConfig {
    pub id: LevelId,
    pub title: &'static str,
    pub description: &'static str,
    pub steps: Vec<LevelStep>,
    /// Nodes injected into the tree when the level begins. The first node
    /// doubles as the sentinel that marks the set as already present.
    pub seed: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "transition", rename_all = "snake_case")]
pub enum Transition {
    StepAdvanced { level: LevelId, step: usize },
    LevelCompleted { level: LevelId },
    CurriculumCompleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TutorialError {
    #[error("curriculum has no levels")]
    EmptyCurriculum,
    #[error("level {0} has no steps")]
    EmptyLevel(LevelId),
    #[error("unknown level {0}")]
    UnknownLevel(LevelId),
    #[error("no level completion is awaiting acknowledgement (phase: {phase:?})")]
    NotAwaitingAcknowledgement { phase: TutorialPhase },
}

#[derive(Debug)]
pub struct TutorialEngine {
    levels: Vec<LevelConfig>,
    level_index: usize,
    state: LevelState,
    phase: TutorialPhase,
    advance_delay: Duration,
    pending_advance: Option<Instant>,
    /// Levels whose seed set has been placed; a level is seeded on entry only.
    seeded: HashSet<LevelId>,
}

impl TutorialEngine {
    /// Starts at step 0 of `start_level`.
    pub fn new(
        levels: Vec<LevelConfig>,
        start_level: LevelId,
        advance_delay: Duration,
    ) -> Result<Self, TutorialError> {
        if levels.is_empty() {
            return Err(TutorialError::EmptyCurriculum);
        }
        if let Some(level) = levels.iter().find(|level| level.steps.is_empty()) {
            return Err(TutorialError::EmptyLevel(level.id));
        }
        let level_index = levels
            .iter()
            .position(|level| level.id == start_level)
            .ok_or(TutorialError::UnknownLevel(start_level))?;

        Ok(Self {
            levels,
            level_index,
            state: LevelState {
                current_level: start_level,
                current_step: 0,
                completed: false,
            },
            phase: TutorialPhase::InStep {
                level: start_level,
                step: 0,
            },
            advance_delay,
            pending_advance: None,
            seeded: HashSet::new(),
        })
    }

    pub fn level_state(&self) -> LevelState {
        self.state
    }

    pub fn phase(&self) -> TutorialPhase {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase == TutorialPhase::Completed
    }

    pub fn current_level(&self) -> &LevelConfig {
        &self.levels[self.level_index]
    }

    /// The active step, or `None` once the level or the curriculum is done.
    pub fn current_step(&self) -> Option<&LevelStep> {
        match self.phase {
            TutorialPhase::InStep { step, .. } => self.current_level().steps.get(step),
            _ => None,
        }
    }

    pub fn pending_advance(&self) -> Option<Instant> {
        self.pending_advance
    }

    /// Checks the active step against `obs`. A satisfied step schedules an
    /// advance at `now + advance_delay`; with no delay it is applied at once.
    pub fn evaluate(&mut self, obs: &Observation<'_>, now: Instant) -> Option<Transition> {
        if self.pending_advance.is_some() {
            return None;
        }
        let step = self.current_step()?;
        if !(step.is_complete)(obs) {
            return None;
        }
        debug!(
            level = %self.state.current_level,
            step = self.state.current_step,
            delay_ms = self.advance_delay.as_millis() as u64,
            "step satisfied; advance scheduled"
        );
        self.pending_advance = Some(now + self.advance_delay);
        self.tick(now)
    }

    /// Applies a scheduled advance once its deadline has passed.
    pub fn tick(&mut self, now: Instant) -> Option<Transition> {
        let due = self.pending_advance.is_some_and(|deadline| now >= deadline);
        if !due {
            return None;
        }
        self.pending_advance = None;
        Some(self.advance())
    }

    fn advance(&mut self) -> Transition {
        let level = self.state.current_level;
        let next_step = self.state.current_step + 1;

        if next_step < self.current_level().steps.len() {
            self.state.current_step = next_step;
            self.phase = TutorialPhase::InStep {
                level,
                step: next_step,
            };
            info!(level = %level, step = next_step, "tutorial step advanced");
            return Transition::StepAdvanced {
                level,
                step: next_step,
            };
        }

        if self.level_index + 1 < self.levels.len() {
            self.phase = TutorialPhase::LevelComplete { level };
            info!(level = %level, "tutorial level complete");
            return Transition::LevelCompleted { level };
        }

        self.state.completed = true;
        self.phase = TutorialPhase::Completed;
        info!(level = %level, "tutorial curriculum completed");
        Transition::CurriculumCompleted
    }

    /// Moves from a completed level to the first step of the next one.
    pub fn acknowledge_level_complete(&mut self) -> Result<LevelId, TutorialError> {
        if !matches!(self.phase, TutorialPhase::LevelComplete { .. }) {
            return Err(TutorialError::NotAwaitingAcknowledgement { phase: self.phase });
        }
        self.level_index += 1;
        let next = self.current_level().id;
        self.state = LevelState {
            current_level: next,
            current_step: 0,
            completed: false,
        };
        self.phase = TutorialPhase::InStep {
            level: next,
            step: 0,
        };
        info!(level = %next, "tutorial level started");
        Ok(next)
    }

    /// Seed set the active level still needs, if it begins with one.
    pub fn pending_seed(&self) -> Option<&[Node]> {
        match self.phase {
            TutorialPhase::InStep { step: 0, .. } => {
                let seed = self.current_level().seed.as_slice();
                (!seed.is_empty()).then_some(seed)
            }
            _ => None,
        }
    }

    /// Injects the pending seed set into `store` the first time its level is
    /// entered. Nothing is added once the level has been seeded or while its
    /// sentinel node is present, so seed nodes the learner deletes stay gone.
    /// Seed nodes whose parent has since been removed land in the store's
    /// restore target instead. Returns the number of nodes added.
    pub fn inject_pending_seed(&mut self, store: &mut NodeStore) -> Result<usize, FsError> {
        let level = self.state.current_level;
        if self.seeded.contains(&level) {
            return Ok(0);
        }
        let Some(seed) = self.pending_seed() else {
            return Ok(0);
        };
        if store.contains(seed[0].id) {
            self.seeded.insert(level);
            return Ok(0);
        }

        let batch: Vec<Node> = seed
            .iter()
            .map(|node| {
                let mut node = node.clone();
                let parent_known = node.parent_id.map_or(true, |parent_id| {
                    store.get(parent_id).is_some_and(Node::is_folder)
                        || seed.iter().any(|other| other.id == parent_id)
                });
                if !parent_known {
                    warn!(
                        node_id = %node.id,
                        "seed parent is gone; placing seed node in the restore target"
                    );
                    node.parent_id = Some(store.restore_target());
                }
                node
            })
            .collect();

        let added = store.seed(&batch)?;
        self.seeded.insert(level);
        info!(%level, count = added, "injected level seed");
        Ok(added)
    }

    pub fn progress(&self) -> ProgressView {
        let level = self.current_level();
        let step = self.current_step();
        ProgressView {
            phase: self.phase,
            level_state: self.state,
            level_title: level.title.to_string(),
            level_description: level.description.to_string(),
            step_count: level.steps.len(),
            instruction: step.map(|step| step.instruction.to_string()),
            knowledge_drop: step.map(|step| step.knowledge_drop.to_string()),
            pro_tip: step.and_then(|step| step.pro_tip).map(str::to_string),
            action_prompt: step.and_then(|step| step.action_prompt).map(str::to_string),
        }
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
