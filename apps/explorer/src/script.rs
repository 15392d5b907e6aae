//! Line-oriented command scripts: one JSON command per line, blank lines and
//! `#` comments ignored.

use anyhow::{Context, Result};
use shared::protocol::Command;

pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let command = serde_json::from_str(line)
        .with_context(|| format!("line {line_no}: invalid command {line:?}"))?;
    Ok(Some(command))
}
