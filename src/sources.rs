use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};

/// Expand `inputs` into source files. Directories are walked recursively and
/// only paths matching `pattern` are kept; files named explicitly are always
/// kept.
pub fn list_sources(inputs: &[PathBuf], pattern: &Regex) -> io::Result<Vec<PathBuf>> {
    let mut out: Vec<PathBuf> = Vec::new();

    for p in inputs {
        if p.is_dir() {
            walk(p, pattern, &mut out)?;
        } else if p.is_file() {
            out.push(p.clone());
        } else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file or directory: {}", p.display()),
            ));
        }
    }

    out.sort();
    out.dedup();
    Ok(out)
}

fn walk(dir: &Path, pattern: &Regex, out: &mut Vec<PathBuf>) -> io::Result<()> {
    let mut found: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let sub_path = entry?.path();
        if sub_path.is_dir() {
            walk(&sub_path, pattern, &mut found)?;
        } else if sub_path.is_file() {
            if let Some(path_str) = sub_path.to_str() {
                if pattern.is_match(path_str) {
                    found.push(sub_path);
                }
            }
        }
    }
    found.sort();
    out.extend(found);
    Ok(())
}
