use super::{Direction, Individual};

/// The best `capacity` individuals ever observed, best first.
///
/// Stores independent clones, skips unevaluated individuals, and never holds
/// two entries with the same layout.
#[derive(Debug, Clone)]
pub struct HallOfFame {
    capacity: usize,
    direction: Direction,
    items: Vec<Individual>,
}

impl HallOfFame {
    pub fn new(capacity: usize, direction: Direction) -> Self {
        Self {
            capacity,
            direction,
            items: Vec::with_capacity(capacity + 1),
        }
    }

    pub fn update(&mut self, population: &[Individual]) {
        if self.capacity == 0 {
            return;
        }
        for ind in population {
            let Some(fit) = ind.fitness() else { continue };

            if self.items.len() == self.capacity {
                let worst = self.items[self.items.len() - 1].rank_value(self.direction);
                if !self.direction.is_better(fit, worst) {
                    continue;
                }
            }
            if self.items.iter().any(|h| h.layout == ind.layout) {
                continue;
            }

            // Insert after equal-fitness entries so older items win ties.
            let at = self.items.partition_point(|h| {
                !self.direction.is_better(fit, h.rank_value(self.direction))
            });
            self.items.insert(at, ind.clone());
            self.items.truncate(self.capacity);
        }
    }

    pub fn best(&self) -> Option<&Individual> {
        self.items.first()
    }

    pub fn items(&self) -> &[Individual] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Individual> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Layout;

    fn ind(code: u16, fitness: f64) -> Individual {
        let mut i = Individual::new(Layout::from_cells(1, 1, vec![code]).unwrap());
        i.set_fitness(fitness);
        i
    }

    fn fits(hof: &HallOfFame) -> Vec<f64> {
        hof.items().iter().filter_map(Individual::fitness).collect()
    }

    #[test]
    fn test_keeps_best_k_sorted() {
        let mut hof = HallOfFame::new(2, Direction::Minimize);
        hof.update(&[ind(1, 3.0), ind(2, 1.0), ind(3, 2.0)]);
        assert_eq!(fits(&hof), vec![1.0, 2.0]);

        hof.update(&[ind(4, 0.5)]);
        assert_eq!(fits(&hof), vec![0.5, 1.0]);
        assert_eq!(hof.best().unwrap().layout.cells(), &[4]);
    }

    #[test]
    fn test_maximize_orders_descending() {
        let mut hof = HallOfFame::new(3, Direction::Maximize);
        hof.update(&[ind(1, 3.0), ind(2, 1.0), ind(3, 2.0), ind(4, 0.0)]);
        assert_eq!(fits(&hof), vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_duplicate_layouts_are_skipped() {
        let mut hof = HallOfFame::new(3, Direction::Minimize);
        hof.update(&[ind(1, 1.0), ind(1, 1.0), ind(2, 2.0)]);
        assert_eq!(hof.len(), 2);
    }

    #[test]
    fn test_unevaluated_are_ignored() {
        let mut hof = HallOfFame::new(2, Direction::Minimize);
        let raw = Individual::new(Layout::from_cells(1, 1, vec![9]).unwrap());
        hof.update(&[raw]);
        assert!(hof.is_empty());
    }

    #[test]
    fn test_holds_clones() {
        let mut pop = vec![ind(1, 1.0)];
        let mut hof = HallOfFame::new(1, Direction::Minimize);
        hof.update(&pop);
        pop[0].invalidate();
        assert_eq!(hof.best().unwrap().fitness(), Some(1.0));
    }
}
