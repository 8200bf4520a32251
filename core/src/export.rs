//! Pairwise notes export
//!
//! Every 2-combination of the deduplicated components becomes one
//! `;`-delimited line in `notes.csv`, ready for flashcard import.

use std::path::{Path, PathBuf};

use crate::pair::PairComponent;
use crate::Result;

/// One line per 2-combination: `feature1;word1;feature2;word2`.
///
/// Combinations are enumerated in lexicographic index order over the input
/// sequence: (0,1), (0,2), …, (0,n-1), (1,2), ….
pub fn pair_lines(components: &[PairComponent]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, first) in components.iter().enumerate() {
        for second in &components[i + 1..] {
            lines.push(format!(
                "{};{};{};{}",
                first.distinctive_feature, first.word, second.distinctive_feature, second.word
            ));
        }
    }
    lines
}

/// Write `notes.csv` into `export_dir` and return its path.
pub fn write_notes(components: &[PairComponent], export_dir: &Path) -> Result<PathBuf> {
    let path = export_dir.join("notes.csv");
    let content = pair_lines(components).join("\n");
    std::fs::write(&path, content.trim())?;
    Ok(path)
}
