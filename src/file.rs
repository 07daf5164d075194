use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::selector::RankedProblem;

/// Write slugs one per line, in ranked order.
pub fn save_slugs(ranked: &[RankedProblem], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut contents = String::new();
    for item in ranked {
        contents.push_str(&item.slug);
        contents.push('\n');
    }
    fs::write(path, contents)?;
    Ok(())
}

/// Read slugs or numeric ids, one per line, skipping blanks.
pub fn load_slugs(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
