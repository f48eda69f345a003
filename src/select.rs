use crate::block::{ControlFlowBranch, MacroBlock};
use std::collections::BTreeSet;

/// Line numbers of `block` that must go for the given branch policy.
///
/// The guard directives are always included. Without an `#else` the body is
/// kept whatever the policy says.
pub fn removal_lines(block: &MacroBlock, branch: ControlFlowBranch) -> BTreeSet<usize> {
    let mut lines = BTreeSet::from([block.start_line, block.end_line]);
    if let Some(else_line) = block.else_line {
        match branch {
            ControlFlowBranch::If => lines.extend(block.start_line..=else_line),
            ControlFlowBranch::Else => lines.extend(else_line..block.end_line),
            ControlFlowBranch::Both => lines.extend(block.start_line..block.end_line),
        }
    }
    lines
}

pub fn removal_set(blocks: &[MacroBlock], branch: ControlFlowBranch) -> BTreeSet<usize> {
    blocks
        .iter()
        .flat_map(|b| removal_lines(b, branch))
        .collect()
}
