use crate::error::{GfResult, GridError};
use crate::scorer::{BigramEntry, BigramTable};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Symbol names for characters that have no printable key label.
pub fn symbol_name(c: char) -> String {
    match c {
        ' ' => "space".to_string(),
        '\n' => "enter".to_string(),
        other => other.to_string(),
    }
}

/// Raw character bigram counts in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct BigramCounts {
    order: Vec<(char, char)>,
    counts: HashMap<(char, char), u64>,
    total: u64,
}

impl BigramCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts adjacent character pairs of one text. Text is lowercased and
    /// `\r\n` is folded to `\n`; pairs never span two calls.
    pub fn add_text(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n").to_lowercase();
        let mut chars = normalized.chars();
        let Some(mut prev) = chars.next() else { return };

        for c in chars {
            let key = (prev, c);
            let slot = self.counts.entry(key).or_insert(0);
            if *slot == 0 {
                self.order.push(key);
            }
            *slot += 1;
            self.total += 1;
            prev = c;
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn distinct(&self) -> usize {
        self.order.len()
    }

    /// Maximum-likelihood probabilities over every counted pair, then filtered
    /// to pairs whose symbols are both in `counted`. Filtered mass is not
    /// redistributed.
    pub fn to_table(&self, counted: &HashSet<&str>) -> BigramTable {
        if self.total == 0 {
            return BigramTable::default();
        }
        let total = self.total as f64;

        let entries = self
            .order
            .iter()
            .filter_map(|&(a, b)| {
                let (first, second) = (symbol_name(a), symbol_name(b));
                if !counted.contains(first.as_str()) || !counted.contains(second.as_str()) {
                    return None;
                }
                let count = self.counts.get(&(a, b)).copied().unwrap_or(0);
                Some(BigramEntry {
                    first,
                    second,
                    probability: count as f64 / total,
                })
            })
            .collect();
        BigramTable::new(entries)
    }
}

/// `*.txt` files directly inside `dir`, sorted by path.
pub fn text_files<P: AsRef<Path>>(dir: P) -> GfResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(GridError::Corpus(format!(
            "Directory '{}' does not exist",
            dir.display()
        )));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(GridError::Corpus(format!(
            "No .txt files found in '{}'",
            dir.display()
        )));
    }
    Ok(files)
}

/// Reads every text file in `dir` and estimates the bigram table for `counted`.
pub fn build_bigram_table<P: AsRef<Path>>(dir: P, counted: &[String]) -> GfResult<BigramTable> {
    let files = text_files(&dir)?;
    info!("Reading corpus: {} files in {}", files.len(), dir.as_ref().display());

    let mut counts = BigramCounts::new();
    for path in &files {
        debug!("Processing {}", path.display());
        let bytes = fs::read(path)?;
        counts.add_text(&String::from_utf8_lossy(&bytes));
    }

    let counted: HashSet<&str> = counted.iter().map(String::as_str).collect();
    let table = counts.to_table(&counted);
    info!(
        "Corpus: {} bigrams ({} distinct), {} retained covering {:.4} of the mass",
        counts.total(),
        counts.distinct(),
        table.len(),
        table.total_probability()
    );
    Ok(table)
}
