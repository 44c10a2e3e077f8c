use crate::error::GfResult;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BigramEntry {
    pub first: String,
    pub second: String,
    pub probability: f64,
}

impl BigramEntry {
    pub fn new(first: &str, second: &str, probability: f64) -> Self {
        Self {
            first: first.to_string(),
            second: second.to_string(),
            probability,
        }
    }
}

/// Ordered `(first, second) -> probability` entries. Entry order is preserved so
/// the probability vector stays aligned with the per-bigram distance vector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BigramTable {
    entries: Vec<BigramEntry>,
}

impl BigramTable {
    pub fn new(entries: Vec<BigramEntry>) -> Self {
        Self { entries }
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = ((&'a str, &'a str), f64)>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|((a, b), p)| BigramEntry::new(a, b, p))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[BigramEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn probs_vec(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.probability).collect()
    }

    pub fn total_probability(&self) -> f64 {
        self.entries.iter().map(|e| e.probability).sum()
    }

    /// Keeps only pairs whose members are both counted. Probabilities are not
    /// renormalised.
    pub fn retain_counted(&self, counted: &HashSet<&str>) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|e| counted.contains(e.first.as_str()) && counted.contains(e.second.as_str()))
                .cloned()
                .collect(),
        }
    }

    pub fn load_csv<P: AsRef<Path>>(path: P) -> GfResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Reads `first,second,probability` rows (header required). Symbol fields
    /// are taken verbatim since a symbol may itself be whitespace.
    pub fn from_reader<R: Read>(reader: R) -> GfResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let mut entries = Vec::new();
        for record in rdr.deserialize() {
            let entry: BigramEntry = record?;
            entries.push(entry);
        }
        debug!("Loaded {} bigram entries", entries.len());
        Ok(Self { entries })
    }

    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> GfResult<()> {
        let file = File::create(path)?;
        self.to_writer(file)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> GfResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for entry in &self.entries {
            wtr.serialize(entry)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reader_parses_rows_in_order() {
        let data = "first , second , probability\nx,y,0.7\ny,x,0.3\n";
        let table = BigramTable::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0], BigramEntry::new("x", "y", 0.7));
        assert_eq!(table.probs_vec(), vec![0.7, 0.3]);
    }

    #[test]
    fn test_whitespace_symbols_survive_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bigrams.csv");
        let table = BigramTable::new(vec![
            BigramEntry::new("\t", "a", 0.5),
            BigramEntry::new("a", " ", 0.25),
        ]);

        table.save_csv(&path).unwrap();
        let loaded = BigramTable::load_csv(&path).unwrap();

        assert_eq!(loaded.entries(), table.entries());
        assert_eq!(loaded.entries()[0].first, "\t");
        assert_eq!(loaded.entries()[1].second, " ");
    }

    #[test]
    fn test_reader_rejects_bad_probability() {
        let data = "first,second,probability\nx,y,lots\n";
        assert!(BigramTable::from_reader(Cursor::new(data)).is_err());
    }

    #[test]
    fn test_retain_counted_keeps_order_and_mass() {
        let table = BigramTable::from_pairs([
            (("a", "b"), 0.5),
            (("a", "?"), 0.2),
            (("b", "a"), 0.3),
        ]);
        let counted: HashSet<&str> = ["a", "b"].into_iter().collect();
        let kept = table.retain_counted(&counted);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept.entries()[1].first, "b");
        assert!((kept.total_probability() - 0.8).abs() < 1e-12);
    }
}
