use crate::error::{GfResult, GridError};
use crate::grid::{Code, Layout, SymbolSet};
use fastrand::Rng;
use std::collections::HashMap;

/// Partially Mapped Crossover (PMX) restricted to free cells.
///
/// Picks two distinct cut points and delegates to [`pmx_at`]. Layouts with
/// fewer than two cells come back as plain copies.
pub fn crossover_pmx(
    p1: &Layout,
    p2: &Layout,
    permutable: &SymbolSet,
    rng: &mut Rng,
) -> GfResult<(Layout, Layout)> {
    check_shapes(p1, p2)?;
    let len = p1.len();
    if len < 2 {
        return Ok((p1.clone(), p2.clone()));
    }

    let a = rng.usize(0..len);
    let mut b = rng.usize(0..len - 1);
    if b >= a {
        b += 1;
    }
    let (a, b) = if a < b { (a, b) } else { (b, a) };

    pmx_at(p1, p2, permutable, a, b)
}

/// PMX with explicit inclusive cut points `a <= b`.
///
/// Child 1 takes parent 2's free symbols inside `[a, b]` and parent 1's outside;
/// symbols outside the segment that collide with it are remapped through the
/// segment until unique. Child 2 mirrors this. Cells holding non-permutable
/// symbols keep their parent's value.
pub fn pmx_at(
    p1: &Layout,
    p2: &Layout,
    permutable: &SymbolSet,
    a: usize,
    b: usize,
) -> GfResult<(Layout, Layout)> {
    check_shapes(p1, p2)?;
    let g1 = p1.cells();
    let g2 = p2.cells();
    let len = g1.len();
    let b = b.min(len.saturating_sub(1));

    let free: Vec<bool> = g1.iter().map(|&c| permutable.contains(c)).collect();
    for (i, (&c1, &c2)) in g1.iter().zip(g2).enumerate() {
        if free[i] != permutable.contains(c2) {
            return Err(GridError::PartitionMismatch { index: i });
        }
        if !free[i] && c1 != c2 {
            return Err(GridError::PartitionMismatch { index: i });
        }
    }

    let mut c1 = g1.to_vec();
    let mut c2 = g2.to_vec();

    // symbol placed in the child's segment -> its segment position
    let mut seg1: HashMap<Code, usize> = HashMap::new();
    let mut seg2: HashMap<Code, usize> = HashMap::new();

    if a <= b && len > 0 {
        for i in (a..=b).filter(|&i| free[i]) {
            c1[i] = g2[i];
            c2[i] = g1[i];
            seg1.insert(g2[i], i);
            seg2.insert(g1[i], i);
        }
    }

    for i in (0..len).filter(|&i| free[i] && (i < a || i > b)) {
        c1[i] = resolve(g1[i], &seg1, g1, len, i)?;
        c2[i] = resolve(g2[i], &seg2, g2, len, i)?;
    }

    let (rows, cols) = p1.shape();
    Ok((
        Layout::from_cells(rows, cols, c1)?,
        Layout::from_cells(rows, cols, c2)?,
    ))
}

/// Follows the PMX mapping chain until `value` no longer collides with the segment.
#[inline(always)]
fn resolve(
    mut value: Code,
    segment: &HashMap<Code, usize>,
    own: &[Code],
    len: usize,
    index: usize,
) -> GfResult<Code> {
    let mut hops = 0;
    while let Some(&j) = segment.get(&value) {
        value = own[j];
        hops += 1;
        // a chain longer than the layout means the parent repeats a symbol
        if hops > len {
            return Err(GridError::NotPermutation { index });
        }
    }
    Ok(value)
}

fn check_shapes(p1: &Layout, p2: &Layout) -> GfResult<()> {
    if p1.shape() != p2.shape() {
        return Err(GridError::ShapeMismatch {
            left: p1.shape(),
            right: p2.shape(),
        });
    }
    Ok(())
}
