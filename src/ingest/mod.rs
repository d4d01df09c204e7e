mod qrels;
mod run_file;

pub use qrels::load_qrels;
pub use run_file::load_run;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

/// Topic numbers and ranks: plain decimal digits, nothing else.
fn parse_natural(field: &str) -> Option<u32> {
    if field.is_empty() || !field.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

fn read_lines(path: &Path, kind: &str) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("cannot open {kind} file \"{}\"", path.display()))?;
    let lines: Vec<String> = raw.lines().map(ToOwned::to_owned).collect();
    if lines.is_empty() {
        bail!("{kind} file \"{}\" is empty", path.display());
    }
    Ok(lines)
}
