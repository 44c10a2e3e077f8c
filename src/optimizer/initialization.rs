use crate::grid::{Layout, SymbolSet, Template};
use fastrand::Rng;

/// Shuffles the permutable symbols into the free cells in row-major order.
///
/// Fixed cells pass through. Surplus symbols are dropped and surplus free cells
/// stay `EMPTY`; `Problem::new` rejects both cases before a search starts.
pub fn random_layout(template: &Template, permutable: &SymbolSet, rng: &mut Rng) -> Layout {
    let mut pool = permutable.members().to_vec();
    rng.shuffle(&mut pool);

    let mut layout = template.blank();
    let cells = layout.cells_mut();
    for (i, cell) in template.cells().iter().enumerate() {
        if cell.is_none() {
            match pool.pop() {
                Some(code) => cells[i] = code,
                None => break,
            }
        }
    }
    layout
}
