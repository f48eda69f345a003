use crate::error::StripError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side of a target `#if`/`#else` pair gets removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ControlFlowBranch {
    /// Remove the if-branch, keep the else-branch.
    If,
    /// Remove the else-branch, keep the if-branch.
    #[default]
    Else,
    /// Remove the whole block.
    Both,
}

impl ControlFlowBranch {
    pub const ALL: [ControlFlowBranch; 3] = [
        ControlFlowBranch::If,
        ControlFlowBranch::Else,
        ControlFlowBranch::Both,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ControlFlowBranch::If => "IF",
            ControlFlowBranch::Else => "ELSE",
            ControlFlowBranch::Both => "BOTH",
        }
    }
}

impl fmt::Display for ControlFlowBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlFlowBranch {
    type Err = StripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ControlFlowBranch::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StripError::InvalidBranch(s.to_string()))
    }
}

/// A fully parsed target block. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacroBlock {
    pub start_line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub else_line: Option<usize>,
    pub end_line: usize,
    pub body: String,
}

impl MacroBlock {
    pub fn has_else(&self) -> bool {
        self.else_line.is_some()
    }
}

/// Accumulator for the target block currently being parsed.
#[derive(Debug, Default)]
pub struct IncompleteBlock {
    pub start_line: Option<usize>,
    pub else_line: Option<usize>,
    pub end_line: Option<usize>,
    pub body: String,
}

impl IncompleteBlock {
    pub fn push_text(&mut self, line: &str) {
        self.body.push_str(line);
    }

    /// Freeze the accumulator. Returns `None` while the opening or closing
    /// line is still unknown.
    pub fn finish(self) -> Option<MacroBlock> {
        Some(MacroBlock {
            start_line: self.start_line?,
            else_line: self.else_line,
            end_line: self.end_line?,
            body: self.body,
        })
    }
}
