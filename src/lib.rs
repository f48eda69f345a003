pub mod block;
pub mod config;
pub mod error;
pub mod lines;
pub mod parse;
pub mod render;
pub mod select;
pub mod sources;
pub mod state;

pub use block::{ControlFlowBranch, MacroBlock};
pub use error::StripError;
pub use parse::get_blocks;

use lines::split_lines;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

#[derive(Debug, Clone)]
pub struct StripOptions {
    /// Comment removed lines out instead of deleting them.
    pub comment: bool,
    pub branch: ControlFlowBranch,
    pub comment_prefix: String,
}

impl Default for StripOptions {
    fn default() -> Self {
        StripOptions {
            comment: true,
            branch: ControlFlowBranch::Else,
            comment_prefix: render::DEFAULT_COMMENT_PREFIX.to_string(),
        }
    }
}

impl StripOptions {
    pub fn from_config(config: &config::Config) -> Self {
        StripOptions {
            comment: !config.remove,
            branch: config.branch,
            comment_prefix: config.comment_prefix.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stripped {
    pub text: String,
    pub blocks: usize,
}

/// Remove (or comment out) every block guarded by `target`.
///
/// The input is left alone; on a parse error nothing is produced.
pub fn strip(text: &str, target: &str, options: &StripOptions) -> Result<Stripped, StripError> {
    let blocks = get_blocks(split_lines(text), target)?;
    let removal = select::removal_set(&blocks, options.branch);
    let prefix = options.comment.then_some(options.comment_prefix.as_str());
    let text = render::render(split_lines(text), &removal, prefix);
    Ok(Stripped {
        text,
        blocks: blocks.len(),
    })
}

/// Human-readable listing of the blocks found in `text`.
pub fn describe(text: &str, target: &str) -> Result<String, StripError> {
    let blocks = get_blocks(split_lines(text), target)?;
    let mut output = String::new();
    for block in &blocks {
        output.push_str(&format!("lines: {} - {}\n", block.start_line, block.end_line));
        output.push_str(&block.body);
        output.push('\n');
    }
    Ok(output)
}

/// The blocks found in `text` as a JSON array.
pub fn describe_json(text: &str, target: &str) -> Result<String, StripError> {
    let blocks = get_blocks(split_lines(text), target)?;
    let mut json = serde_json::to_string_pretty(&blocks).map_err(io::Error::from)?;
    json.push('\n');
    Ok(json)
}

/// A handle that can be read, rewound and overwritten in place.
pub trait Rewrite: Read + Write + Seek {
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl Rewrite for File {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

impl Rewrite for Cursor<Vec<u8>> {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        let len = usize::try_from(len).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        self.get_mut().truncate(len);
        Ok(())
    }
}

/// Strip `handle` in place and return the number of blocks processed.
///
/// The whole handle is read from its start; on a parse error it is not
/// written to.
pub fn replace<H: Rewrite>(handle: &mut H, target: &str, options: &StripOptions) -> Result<usize, StripError> {
    handle.seek(SeekFrom::Start(0))?;
    let mut text = String::new();
    handle.read_to_string(&mut text)?;

    let stripped = strip(&text, target, options)?;

    handle.seek(SeekFrom::Start(0))?;
    handle.write_all(stripped.text.as_bytes())?;
    handle.truncate(stripped.text.len() as u64)?;
    handle.flush()?;
    log::debug!("rewrote {} bytes ({} blocks)", stripped.text.len(), stripped.blocks);
    Ok(stripped.blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TARGET: &str = "#if TARGET";
    const SIMPLE: &str = "#if TARGET\na\n#else\nb\n#endif\n";

    fn opts(comment: bool, branch: ControlFlowBranch) -> StripOptions {
        StripOptions {
            comment,
            branch,
            ..StripOptions::default()
        }
    }

    #[test]
    fn test_strip_remove_else() {
        let result = strip(SIMPLE, TARGET, &opts(false, ControlFlowBranch::Else)).unwrap();
        assert_eq!(result.text, "a\n");
        assert_eq!(result.blocks, 1);
    }

    #[test]
    fn test_strip_comment_else() {
        let result = strip(SIMPLE, TARGET, &opts(true, ControlFlowBranch::Else)).unwrap();
        assert_eq!(result.text, "// #if TARGET\na\n// #else\n// b\n// #endif\n");
        assert_eq!(result.blocks, 1);
    }

    #[test]
    fn test_strip_if_and_both() {
        let result = strip(SIMPLE, TARGET, &opts(false, ControlFlowBranch::If)).unwrap();
        assert_eq!(result.text, "b\n");
        let result = strip(SIMPLE, TARGET, &opts(false, ControlFlowBranch::Both)).unwrap();
        assert_eq!(result.text, "");
    }

    #[test]
    fn test_strip_nested_generic_both() {
        let input = "#if TARGET\n#if X\nc\n#endif\n#endif\n";
        let result = strip(input, TARGET, &opts(false, ControlFlowBranch::Both)).unwrap();
        // No #else, so only the guard lines go.
        assert_eq!(result.text, "#if X\nc\n#endif\n");
        assert_eq!(result.blocks, 1);
    }

    #[test]
    fn test_strip_error_produces_nothing() {
        let err = strip("a\n#endif\n", TARGET, &StripOptions::default()).unwrap_err();
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_strip_keeps_missing_final_newline() {
        let result = strip("x\n#if TARGET\ny\n#endif\nz", TARGET, &opts(false, ControlFlowBranch::Else)).unwrap();
        assert_eq!(result.text, "x\ny\nz");
    }

    #[test]
    fn test_describe() {
        let report = describe(SIMPLE, TARGET).unwrap();
        assert_eq!(report, "lines: 1 - 5\n#if TARGET\na\n#else\nb\n#endif\n\n");
    }

    #[test]
    fn test_describe_no_blocks() {
        assert_eq!(describe("int x;\n", TARGET).unwrap(), "");
    }

    #[test]
    fn test_describe_json() {
        let json = describe_json(SIMPLE, TARGET).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["start_line"], 1);
        assert_eq!(value[0]["else_line"], 3);
        assert_eq!(value[0]["end_line"], 5);
        assert!(value.as_array().is_some_and(|a| a.len() == 1));
    }

    #[test]
    fn test_replace_cursor_truncates() {
        let mut handle = Cursor::new(SIMPLE.as_bytes().to_vec());
        handle.seek(SeekFrom::End(0)).unwrap();
        let count = replace(&mut handle, TARGET, &opts(false, ControlFlowBranch::Else)).unwrap();
        assert_eq!(count, 1);
        assert_eq!(handle.into_inner(), b"a\n".to_vec());
    }

    #[test]
    fn test_replace_error_leaves_source() {
        let original = "#if TARGET\na\n";
        let mut handle = Cursor::new(original.as_bytes().to_vec());
        let err = replace(&mut handle, TARGET, &StripOptions::default()).unwrap_err();
        assert!(matches!(err, StripError::Unclosed { line: 1 }));
        assert_eq!(handle.into_inner(), original.as_bytes().to_vec());
    }

    #[test]
    fn test_options_from_config() {
        let mut config = config::Config::default();
        config.remove = true;
        config.branch = ControlFlowBranch::If;
        let options = StripOptions::from_config(&config);
        assert!(!options.comment);
        assert_eq!(options.branch, ControlFlowBranch::If);
        assert_eq!(options.comment_prefix, "// ");
    }
}
