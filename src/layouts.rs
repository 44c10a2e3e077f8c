use crate::error::GfResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum_macros::{Display, EnumIter, EnumString};

/// A search problem as supplied by the user: template plus symbol sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDefinition {
    #[serde(default)]
    pub name: String,
    /// `null` marks a free cell.
    pub template: Vec<Vec<Option<String>>>,
    pub counted: Vec<String>,
    pub permutable: Vec<String>,
}

impl LayoutDefinition {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn free_count(&self) -> usize {
        self.template.iter().flatten().filter(|c| c.is_none()).count()
    }
}

#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum Preset {
    EnHex,
    RuHex,
}

const PUNCT_EN: [&str; 9] = [".", ",", "!", "?", "-", ":", ";", "(", ")"];

// 7x7 hex keyboard. `None` cells are searched, named cells are service keys.
const HEX_TEMPLATE: [[Option<&str>; 7]; 7] = [
    [Some("inv"), Some("lang"), None, None, None, None, Some("?123")],
    [Some("settings"), None, None, None, None, None, Some("backspace")],
    [Some("inv"), None, None, None, None, None, None],
    [None, None, None, Some("space"), None, None, Some("enter")],
    [Some("inv"), None, None, None, None, None, None],
    [Some("move"), None, None, None, None, None, Some("capslock")],
    [Some("inv"), Some("exit"), None, None, None, None, Some("shift")],
];

impl Preset {
    pub fn definition(&self) -> LayoutDefinition {
        let template = HEX_TEMPLATE
            .iter()
            .map(|row| row.iter().map(|c| c.map(str::to_string)).collect())
            .collect();

        let permutable: Vec<String> = match self {
            Self::EnHex => ('a'..='z')
                .map(|c| c.to_string())
                .chain(PUNCT_EN.iter().map(|s| s.to_string()))
                .collect(),
            // а..я, then ё
            Self::RuHex => (0x430u32..0x450)
                .filter_map(char::from_u32)
                .chain(std::iter::once('ё'))
                .map(|c| c.to_string())
                .chain([".".to_string(), ",".to_string()])
                .collect(),
        };

        let mut counted = permutable.clone();
        counted.push("space".to_string());
        counted.push("enter".to_string());

        LayoutDefinition {
            name: self.to_string(),
            template,
            counted,
            permutable,
        }
    }
}
