use crate::grid::{Layout, SymbolSet};
use fastrand::Rng;

/// Swap mutation over free cells.
///
/// Each free cell is swapped with probability `1 / len` against a uniformly
/// chosen other free cell. Returns `true` if the layout changed.
pub fn mutate_swap(layout: &mut Layout, permutable: &SymbolSet, rng: &mut Rng) -> bool {
    let size = layout.len();
    let cells = layout.cells_mut();

    let free_count = cells.iter().filter(|&&c| permutable.contains(c)).count();
    if free_count < 2 {
        return false;
    }

    let indpb = 1.0 / size as f64;
    let mut changed = false;

    for i in 0..size {
        if !permutable.contains(cells[i]) || rng.f64() >= indpb {
            continue;
        }

        // Draw from the other `size - 1` indices until one lands on a free cell.
        let j = loop {
            let mut j = rng.usize(0..size - 1);
            if j >= i {
                j += 1;
            }
            if permutable.contains(cells[j]) {
                break j;
            }
        };

        cells.swap(i, j);
        changed = true;
    }

    changed
}
