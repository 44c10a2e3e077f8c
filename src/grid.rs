use crate::error::{GfResult, GridError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Interned symbol. `EMPTY` marks a cell that holds nothing.
pub type Code = u16;
pub const EMPTY: Code = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Symbol name <-> code table. Code 0 is reserved for `EMPTY`.
#[derive(Debug, Clone)]
pub struct Alphabet {
    names: Vec<String>,
    index: HashMap<String, Code>,
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            names: vec![String::new()],
            index: HashMap::new(),
        }
    }
}

impl Alphabet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails once every non-empty code is taken.
    pub fn intern(&mut self, name: &str) -> GfResult<Code> {
        if let Some(&code) = self.index.get(name) {
            return Ok(code);
        }
        let code = Code::try_from(self.names.len()).map_err(|_| {
            GridError::config(format!("alphabet holds more than {} symbols", Code::MAX))
        })?;
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), code);
        Ok(code)
    }

    pub fn code(&self, name: &str) -> Option<Code> {
        self.index.get(name).copied()
    }

    pub fn name(&self, code: Code) -> &str {
        self.names
            .get(code as usize)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Number of codes including the reserved empty code.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.len() <= 1
    }
}

/// Membership mask over codes, plus the members in insertion order.
#[derive(Debug, Clone, Default)]
pub struct SymbolSet {
    mask: Vec<bool>,
    members: Vec<Code>,
}

impl SymbolSet {
    pub fn new(codes: &[Code]) -> Self {
        let mut set = Self::default();
        for &c in codes {
            set.insert(c);
        }
        set
    }

    pub fn insert(&mut self, code: Code) {
        if code == EMPTY || self.contains(code) {
            return;
        }
        let idx = code as usize;
        if idx >= self.mask.len() {
            self.mask.resize(idx + 1, false);
        }
        self.mask[idx] = true;
        self.members.push(code);
    }

    #[inline(always)]
    pub fn contains(&self, code: Code) -> bool {
        self.mask.get(code as usize).copied().unwrap_or(false)
    }

    pub fn members(&self) -> &[Code] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A row-major grid of symbol codes with a fixed shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Layout {
    rows: usize,
    cols: usize,
    cells: Vec<Code>,
}

impl Layout {
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<Code>) -> GfResult<Self> {
        if rows * cols != cells.len() {
            return Err(GridError::config(format!(
                "{} cells cannot form a {}x{} grid",
                cells.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, cells })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Code] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Code] {
        &mut self.cells
    }

    #[inline(always)]
    pub fn pos(&self, index: usize) -> Pos {
        Pos::new(index / self.cols, index % self.cols)
    }

    pub fn to_names(&self, alphabet: &Alphabet) -> Vec<Vec<String>> {
        self.cells
            .chunks(self.cols.max(1))
            .map(|row| row.iter().map(|&c| alphabet.name(c).to_string()).collect())
            .collect()
    }
}

/// The search template: fixed cells carry a code, free cells are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Code>>,
}

impl Template {
    /// Interns every fixed symbol of a nested template into `alphabet`.
    pub fn from_rows(rows: &[Vec<Option<String>>], alphabet: &mut Alphabet) -> GfResult<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(GridError::config("Template must have at least one cell"));
        }
        if let Some(bad) = rows.iter().position(|r| r.len() != width) {
            return Err(GridError::config(format!(
                "Template row {} has {} cells, expected {}",
                bad,
                rows[bad].len(),
                width
            )));
        }

        let cells = rows
            .iter()
            .flatten()
            .map(|cell| cell.as_deref().map(|name| alphabet.intern(name)).transpose())
            .collect::<GfResult<Vec<_>>>()?;

        Ok(Self {
            rows: height,
            cols: width,
            cells,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Option<Code>] {
        &self.cells
    }

    pub fn is_free(&self, index: usize) -> bool {
        self.cells[index].is_none()
    }

    pub fn free_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    pub fn fixed_codes(&self) -> impl Iterator<Item = Code> + '_ {
        self.cells.iter().filter_map(|c| *c)
    }

    /// A layout with every free cell left `EMPTY`.
    pub fn blank(&self) -> Layout {
        Layout {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(|c| c.unwrap_or(EMPTY)).collect(),
        }
    }
}
