use super::{Direction, Individual};
use fastrand::Rng;

/// Tournament selection with replacement.
///
/// Runs `k` tournaments of `tourn_size` uniformly drawn contestants and clones
/// each winner. Ties go to the contestant drawn first.
pub fn tournament(
    population: &[Individual],
    k: usize,
    tourn_size: usize,
    direction: Direction,
    rng: &mut Rng,
) -> Vec<Individual> {
    if population.is_empty() {
        return Vec::new();
    }
    let n = population.len();

    (0..k)
        .map(|_| {
            let mut best = &population[rng.usize(0..n)];
            for _ in 1..tourn_size.max(1) {
                let challenger = &population[rng.usize(0..n)];
                if direction.is_better(
                    challenger.rank_value(direction),
                    best.rank_value(direction),
                ) {
                    best = challenger;
                }
            }
            best.clone()
        })
        .collect()
}
