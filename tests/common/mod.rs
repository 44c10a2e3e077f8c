#![allow(dead_code)]

use gridforge::layouts::LayoutDefinition;
use gridforge::scorer::BigramTable;

/// Builder for small layout definitions used across tests.
pub struct DefBuilder {
    def: LayoutDefinition,
}

impl DefBuilder {
    /// A single row of `width` free cells.
    pub fn row(width: usize) -> Self {
        Self {
            def: LayoutDefinition {
                name: "test".to_string(),
                template: vec![vec![None; width]],
                counted: Vec::new(),
                permutable: Vec::new(),
            },
        }
    }

    pub fn grid(rows: &[&[Option<&str>]]) -> Self {
        Self {
            def: LayoutDefinition {
                name: "test".to_string(),
                template: rows
                    .iter()
                    .map(|r| r.iter().map(|c| c.map(str::to_string)).collect())
                    .collect(),
                counted: Vec::new(),
                permutable: Vec::new(),
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.def.name = name.to_string();
        self
    }

    /// Symbols that are both counted and searched.
    pub fn permutable(mut self, symbols: &[&str]) -> Self {
        for s in symbols {
            self.def.permutable.push(s.to_string());
            if !self.def.counted.iter().any(|c| c == s) {
                self.def.counted.push(s.to_string());
            }
        }
        self
    }

    /// Symbols that are scored but stay where the template puts them.
    pub fn counted(mut self, symbols: &[&str]) -> Self {
        for s in symbols {
            if !self.def.counted.iter().any(|c| c == s) {
                self.def.counted.push(s.to_string());
            }
        }
        self
    }

    pub fn build(self) -> LayoutDefinition {
        self.def
    }
}

pub fn table(pairs: &[(&str, &str, f64)]) -> BigramTable {
    BigramTable::from_pairs(pairs.iter().map(|&(a, b, p)| ((a, b), p)))
}

pub fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Eight symbols on a 2x5 grid with two fixed service keys.
pub fn small_keyboard() -> (LayoutDefinition, BigramTable) {
    let def = DefBuilder::grid(&[
        &[Some("esc"), None, None, None, None],
        &[None, None, None, None, Some("space")],
    ])
    .name("small")
    .permutable(&["a", "b", "c", "d", "e", "f", "g", "h"])
    .counted(&["space"])
    .build();

    let bigrams = table(&[
        ("a", "b", 0.20),
        ("b", "a", 0.10),
        ("c", "d", 0.15),
        ("e", "space", 0.15),
        ("space", "a", 0.10),
        ("f", "g", 0.10),
        ("g", "h", 0.10),
        ("h", "a", 0.10),
    ]);
    (def, bigrams)
}
