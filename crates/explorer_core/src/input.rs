//! Per-modality adapters. Mouse, keyboard and touch gestures all collapse
//! into the same [`Command`] stream the session executes.

use serde::{Deserialize, Serialize};
use shared::{domain::NodeId, protocol::Command};

use crate::selection::SelectionController;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum PointerInput {
    Click { id: NodeId, modifier: bool },
    DoubleClick { id: NodeId },
    BackgroundClick,
    ContextMenu { id: NodeId },
    LongPress { id: NodeId },
    Tap { id: NodeId },
    DragStart { id: NodeId },
    Drop { target: NodeId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyInput {
    Delete,
    Copy,
    Cut,
    Paste,
    Escape,
    Backspace,
}

pub fn translate_pointer(input: PointerInput, selection: &SelectionController) -> Vec<Command> {
    match input {
        PointerInput::Click { id, modifier: false } => vec![Command::SelectExclusive { id }],
        PointerInput::Click { id, modifier: true } => vec![Command::SelectToggle { id }],
        PointerInput::DoubleClick { id } => vec![Command::Open { id }],
        PointerInput::BackgroundClick => vec![Command::ClearSelection],
        // The menu acts on the selection, so an unselected target becomes it.
        PointerInput::ContextMenu { id } if selection.is_selected(id) => Vec::new(),
        PointerInput::ContextMenu { id } => vec![Command::SelectExclusive { id }],
        PointerInput::LongPress { id } => vec![Command::LongPress { id }],
        PointerInput::Tap { id } => vec![Command::Tap { id }],
        PointerInput::DragStart { id } => vec![Command::DragStart { id }],
        PointerInput::Drop { target } => vec![Command::Drop { target }],
    }
}

pub fn translate_key(input: KeyInput, selection: &SelectionController) -> Vec<Command> {
    match input {
        KeyInput::Delete => vec![Command::Delete],
        KeyInput::Copy => vec![Command::Copy],
        KeyInput::Cut => vec![Command::Cut],
        KeyInput::Paste => vec![Command::Paste],
        KeyInput::Escape if selection.in_multi_select() => vec![Command::ExitMultiSelect],
        KeyInput::Escape => vec![Command::ClearSelection],
        KeyInput::Backspace => vec![Command::NavigateUp],
    }
}
