use crate::block::{IncompleteBlock, MacroBlock};
use crate::error::StripError;
use crate::state::ParseState::{self, *};
use log::{debug, trace};

pub const GENERIC_IF: &str = "#if";
pub const GENERIC_ELSE: &str = "#else";
pub const GENERIC_END: &str = "#endif";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Target,
    If,
    Else,
    End,
    Other,
}

fn classify(line: &str, target: &str) -> LineKind {
    if line.starts_with(target) {
        LineKind::Target
    } else if line.starts_with(GENERIC_IF) {
        LineKind::If
    } else if line.starts_with(GENERIC_ELSE) {
        LineKind::Else
    } else if line.starts_with(GENERIC_END) {
        LineKind::End
    } else {
        LineKind::Other
    }
}

/// Stack machine over the conditional directives of one input.
struct Parser<'t> {
    target: &'t str,
    /// Open regions, each with the line that opened it.
    stack: Vec<(ParseState, usize)>,
    current: IncompleteBlock,
    blocks: Vec<MacroBlock>,
}

impl<'t> Parser<'t> {
    fn new(target: &'t str) -> Self {
        Parser {
            target,
            stack: Vec::new(),
            current: IncompleteBlock::default(),
            blocks: Vec::new(),
        }
    }

    fn target_count(&self) -> usize {
        self.stack.iter().filter(|(s, _)| *s == InTargetIf).count()
    }

    fn any_target_active(&self) -> bool {
        self.target_count() > 0
    }

    fn is_single_target_active(&self) -> bool {
        self.target_count() == 1
    }

    fn peek(&self) -> ParseState {
        self.stack.last().map_or(NotInTarget, |(s, _)| *s)
    }

    fn push(&mut self, state: ParseState, line_num: usize) {
        trace!("line {}: push {:?} (depth {})", line_num, state, self.stack.len() + 1);
        self.stack.push((state, line_num));
    }

    fn consume(&mut self, line_num: usize, line: &str) -> Result<(), StripError> {
        match classify(line, self.target) {
            LineKind::Target => self.consume_target_if(line_num, line),
            LineKind::If => self.consume_generic_if(line_num, line),
            LineKind::Else => self.consume_else(line_num, line)?,
            LineKind::End => self.consume_end(line_num, line)?,
            LineKind::Other => {
                if self.is_single_target_active() {
                    self.current.push_text(line);
                }
            }
        }
        Ok(())
    }

    fn consume_target_if(&mut self, line_num: usize, line: &str) {
        if !self.any_target_active() {
            self.current.start_line = Some(line_num);
        }
        self.current.push_text(line);
        self.push(InTargetIf, line_num);
    }

    fn consume_generic_if(&mut self, line_num: usize, line: &str) {
        if self.any_target_active() {
            self.current.push_text(line);
        }
        self.push(InGenericIf, line_num);
    }

    fn consume_else(&mut self, line_num: usize, line: &str) -> Result<(), StripError> {
        let top = self.peek();
        if !top.can_transition(InElse) {
            let reason = match top {
                InElse => "#else follows another #else",
                _ => "#else without matching #if",
            };
            return Err(StripError::Malformed {
                line: line_num,
                reason: reason.to_string(),
            });
        }
        if self.any_target_active() {
            self.current.push_text(line);
            // Only the outermost target's own #else splits the block.
            if top == InTargetIf && self.is_single_target_active() {
                self.current.else_line = Some(line_num);
            }
        }
        self.push(InElse, line_num);
        Ok(())
    }

    fn consume_end(&mut self, line_num: usize, line: &str) -> Result<(), StripError> {
        let top = self.peek();
        if !top.can_transition(InEnd) {
            return Err(StripError::Malformed {
                line: line_num,
                reason: "#endif without matching #if".to_string(),
            });
        }
        let in_target = self.any_target_active();
        let in_single_target = self.is_single_target_active();

        let popped = self.stack.pop();
        trace!("line {}: pop {:?}", line_num, popped);
        // An #else region closes together with the #if it belongs to.
        if matches!(popped, Some((InElse, _))) {
            let paired = self.stack.pop();
            debug_assert!(paired.is_some_and(|(s, _)| s.is_open_if()));
        }

        if in_target {
            self.current.push_text(line);
            if in_single_target && !self.any_target_active() {
                self.current.end_line = Some(line_num);
                let finished = std::mem::take(&mut self.current).finish();
                if let Some(block) = finished {
                    debug!(
                        "found block at lines {}-{} (else: {:?})",
                        block.start_line, block.end_line, block.else_line
                    );
                    self.blocks.push(block);
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<MacroBlock>, StripError> {
        match self.stack.last() {
            Some(&(_, line)) => Err(StripError::Unclosed { line }),
            None => Ok(self.blocks),
        }
    }
}

/// Find every outermost block opened by a line starting with `target`.
///
/// `lines` are consumed once, numbered from 1. Nested target occurrences and
/// unrelated `#if` blocks are folded into the enclosing block.
pub fn get_blocks<I, S>(lines: I, target: &str) -> Result<Vec<MacroBlock>, StripError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if target.is_empty() {
        return Err(StripError::EmptyTarget);
    }
    let mut parser = Parser::new(target);
    for (idx, line) in lines.into_iter().enumerate() {
        parser.consume(idx + 1, line.as_ref())?;
    }
    parser.finish()
}
