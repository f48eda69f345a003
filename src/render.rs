use std::collections::BTreeSet;

pub const DEFAULT_COMMENT_PREFIX: &str = "// ";

/// Second pass over the input. Lines listed in `removal` are commented out
/// with `comment_prefix`, or dropped when it is `None`.
pub fn render<'a, I>(lines: I, removal: &BTreeSet<usize>, comment_prefix: Option<&str>) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    for (idx, line) in lines.into_iter().enumerate() {
        if !removal.contains(&(idx + 1)) {
            out.push_str(line);
            continue;
        }
        if let Some(prefix) = comment_prefix {
            out.push_str(prefix);
            out.push_str(line);
        }
    }
    out
}
