use super::crossover::crossover_pmx;
use super::hall_of_fame::HallOfFame;
use super::initialization::random_layout;
use super::mutation::mutate_swap;
use super::selection::tournament;
use super::{Direction, Individual};
use crate::config::SearchParams;
use crate::error::{GfResult, GridError};
use crate::scorer::Scorer;
use fastrand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationOptions {
    pub population_size: usize,
    pub max_generation: usize,
    pub p_crossover: f64,
    pub p_mutation: f64,
    pub tourn_size: usize,
    pub hall_of_fame_size: usize,
    pub direction: Direction,
    pub parallel_eval: bool,
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        Self::from(&SearchParams::default())
    }
}

impl From<&SearchParams> for OptimizationOptions {
    fn from(cfg: &SearchParams) -> Self {
        Self {
            population_size: cfg.population_size,
            max_generation: cfg.max_generation,
            p_crossover: cfg.p_crossover,
            p_mutation: cfg.p_mutation,
            tourn_size: cfg.tourn_size,
            hall_of_fame_size: cfg.hall_of_fame_size,
            direction: if cfg.maximize {
                Direction::Maximize
            } else {
                Direction::Minimize
            },
            parallel_eval: cfg.parallel_eval,
        }
    }
}

/// One logbook row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub evaluations: usize,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

impl GenerationStats {
    fn collect(generation: usize, evaluations: usize, population: &[Individual]) -> Self {
        let values: Vec<f64> = population.iter().filter_map(Individual::fitness).collect();
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let mean = if values.is_empty() {
            f64::NAN
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        };
        Self {
            generation,
            evaluations,
            min,
            mean,
            max,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub best: Individual,
    pub hall_of_fame: Vec<Individual>,
    pub logbook: Vec<GenerationStats>,
}

/// Receives one call per finished generation (generation 0 included).
/// Returning `false` stops the search after that generation.
pub trait ProgressCallback: Send + Sync {
    fn on_generation(&self, stats: &GenerationStats, best: &Individual) -> bool;
}

pub struct SilentProgress;

impl ProgressCallback for SilentProgress {
    fn on_generation(&self, _stats: &GenerationStats, _best: &Individual) -> bool {
        true
    }
}

pub struct Optimizer {
    scorer: Arc<Scorer>,
    options: OptimizationOptions,
}

impl Optimizer {
    pub fn new(scorer: Arc<Scorer>, options: OptimizationOptions) -> Self {
        Self { scorer, options }
    }

    /// Elitist generational search. The same seed and options always yield the
    /// same result, with or without parallel evaluation.
    pub fn run<CB: ProgressCallback>(
        &self,
        seed: Option<u64>,
        callback: &CB,
    ) -> GfResult<OptimizationResult> {
        let opts = &self.options;
        if opts.population_size == 0 {
            return Err(GridError::config("population_size must be at least 1"));
        }

        let problem = self.scorer.problem();
        let direction = opts.direction;
        let mut rng = match seed {
            Some(s) => Rng::with_seed(s),
            None => Rng::new(),
        };

        // 1. Initial population
        let mut population: Vec<Individual> = (0..opts.population_size)
            .map(|_| {
                Individual::new(random_layout(
                    &problem.template,
                    &problem.permutable,
                    &mut rng,
                ))
            })
            .collect();

        let mut hof = HallOfFame::new(opts.hall_of_fame_size, direction);
        let mut logbook = Vec::with_capacity(opts.max_generation + 1);

        let evaluations = self.evaluate(&mut population)?;
        hof.update(&population);
        let stats = GenerationStats::collect(0, evaluations, &population);
        let mut keep_going = self.record(stats, &population, &hof, &mut logbook, callback);

        // 2. Generations
        for generation in 1..=opts.max_generation {
            if !keep_going {
                info!("Search stopped by callback after generation {}", generation - 1);
                break;
            }

            let mut offspring = tournament(
                &population,
                opts.population_size,
                opts.tourn_size,
                direction,
                &mut rng,
            );
            self.vary(&mut offspring, &mut rng)?;

            let evaluations = self.evaluate(&mut offspring)?;
            apply_elitism(&mut offspring, &hof, direction);
            hof.update(&offspring);
            population = offspring;

            let stats = GenerationStats::collect(generation, evaluations, &population);
            keep_going = self.record(stats, &population, &hof, &mut logbook, callback);
        }

        let best = match hof.best() {
            Some(b) => b.clone(),
            None => best_of(&population, direction).clone(),
        };

        Ok(OptimizationResult {
            best,
            hall_of_fame: hof.into_items(),
            logbook,
        })
    }

    /// Crossover on consecutive pairs, then mutation on each child. Fitness
    /// caches are dropped only where the layout actually changed.
    fn vary(&self, offspring: &mut [Individual], rng: &mut Rng) -> GfResult<()> {
        let permutable = &self.scorer.problem().permutable;

        for pair in offspring.chunks_exact_mut(2) {
            if rng.f64() < self.options.p_crossover {
                let (c1, c2) = crossover_pmx(&pair[0].layout, &pair[1].layout, permutable, rng)?;
                for (ind, child) in pair.iter_mut().zip([c1, c2]) {
                    if ind.layout != child {
                        ind.layout = child;
                        ind.invalidate();
                    }
                }
            }
        }

        for ind in offspring.iter_mut() {
            if rng.f64() < self.options.p_mutation && mutate_swap(&mut ind.layout, permutable, rng)
            {
                ind.invalidate();
            }
        }
        Ok(())
    }

    /// Scores every individual with an empty cache. Returns how many were scored.
    fn evaluate(&self, population: &mut [Individual]) -> GfResult<usize> {
        let pending = population.iter().filter(|i| !i.is_evaluated()).count();
        let scorer = &self.scorer;

        if self.options.parallel_eval {
            population
                .par_iter_mut()
                .filter(|ind| !ind.is_evaluated())
                .try_for_each(|ind| -> GfResult<()> {
                    let fit = scorer.score(&ind.layout)?;
                    ind.set_fitness(fit);
                    Ok(())
                })?;
        } else {
            for ind in population.iter_mut().filter(|i| !i.is_evaluated()) {
                let fit = scorer.score(&ind.layout)?;
                ind.set_fitness(fit);
            }
        }
        Ok(pending)
    }

    fn record<CB: ProgressCallback>(
        &self,
        stats: GenerationStats,
        population: &[Individual],
        hof: &HallOfFame,
        logbook: &mut Vec<GenerationStats>,
        callback: &CB,
    ) -> bool {
        info!(
            "gen {:>4} | evals {:>4} | min {:.5} | mean {:.5} | max {:.5}",
            stats.generation, stats.evaluations, stats.min, stats.mean, stats.max
        );
        let best = hof
            .best()
            .unwrap_or_else(|| best_of(population, self.options.direction));
        let keep_going = callback.on_generation(&stats, best);
        logbook.push(stats);
        keep_going
    }
}

/// Overwrites the `k` worst offspring with the hall-of-fame's best `k`.
fn apply_elitism(offspring: &mut [Individual], hof: &HallOfFame, direction: Direction) {
    let k = hof.len().min(offspring.len());
    if k == 0 {
        return;
    }

    let mut order: Vec<usize> = (0..offspring.len()).collect();
    order.sort_by(|&a, &b| {
        direction.cmp_best_first(
            offspring[a].rank_value(direction),
            offspring[b].rank_value(direction),
        )
    });

    for (&slot, elite) in order.iter().rev().take(k).zip(hof.items()) {
        offspring[slot] = elite.clone();
    }
    debug!("Elitism: reinserted {} hall-of-fame individuals", k);
}

fn best_of(population: &[Individual], direction: Direction) -> &Individual {
    let mut best = &population[0];
    for ind in &population[1..] {
        if direction.is_better(ind.rank_value(direction), best.rank_value(direction)) {
            best = ind;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DistanceMetric;
    use crate::grid::Layout;
    use crate::layouts::LayoutDefinition;
    use crate::scorer::{BigramTable, Problem};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn scorer() -> Arc<Scorer> {
        let names = ["a", "b", "c", "d", "e", "f"];
        let def = LayoutDefinition {
            name: "row".into(),
            template: vec![vec![None; 6]],
            counted: names.iter().map(|s| s.to_string()).collect(),
            permutable: names.iter().map(|s| s.to_string()).collect(),
        };
        let table = BigramTable::from_pairs([
            (("a", "b"), 0.4),
            (("b", "c"), 0.3),
            (("c", "d"), 0.2),
            (("e", "f"), 0.1),
        ]);
        let problem = Problem::new(&def, &table).unwrap();
        Arc::new(Scorer::with_metric(problem, DistanceMetric::default()))
    }

    fn options() -> OptimizationOptions {
        OptimizationOptions {
            population_size: 12,
            max_generation: 15,
            ..Default::default()
        }
    }

    struct StopAfter(usize, AtomicUsize);

    impl ProgressCallback for StopAfter {
        fn on_generation(&self, _stats: &GenerationStats, _best: &Individual) -> bool {
            self.1.fetch_add(1, Ordering::SeqCst) + 1 < self.0
        }
    }

    #[test]
    fn test_logbook_covers_every_generation() {
        let result = Optimizer::new(scorer(), options())
            .run(Some(1), &SilentProgress)
            .unwrap();
        assert_eq!(result.logbook.len(), 16);
        assert_eq!(result.logbook[0].evaluations, 12);
        assert_eq!(result.hall_of_fame.len(), 1);
        assert!(result.best.fitness().is_some());
    }

    #[test]
    fn test_callback_can_stop() {
        let cb = StopAfter(3, AtomicUsize::new(0));
        let result = Optimizer::new(scorer(), options()).run(Some(2), &cb).unwrap();
        assert_eq!(result.logbook.len(), 3);
    }

    #[test]
    fn test_zero_generations_returns_initial_best() {
        let opts = OptimizationOptions {
            max_generation: 0,
            ..options()
        };
        let result = Optimizer::new(scorer(), opts).run(Some(3), &SilentProgress).unwrap();
        assert_eq!(result.logbook.len(), 1);
        assert_eq!(result.best.fitness(), Some(result.logbook[0].min));
    }

    #[test]
    fn test_empty_population_is_rejected() {
        let opts = OptimizationOptions {
            population_size: 0,
            ..options()
        };
        assert!(Optimizer::new(scorer(), opts)
            .run(Some(0), &SilentProgress)
            .is_err());
    }

    #[test]
    fn test_elitism_replaces_worst() {
        let mk = |code: u16, fit: f64| {
            let mut i = Individual::new(Layout::from_cells(1, 1, vec![code]).unwrap());
            i.set_fitness(fit);
            i
        };
        let mut hof = HallOfFame::new(1, Direction::Minimize);
        hof.update(&[mk(9, 0.1)]);

        let mut offspring = vec![mk(1, 1.0), mk(2, 5.0), mk(3, 2.0)];
        apply_elitism(&mut offspring, &hof, Direction::Minimize);
        assert_eq!(offspring[1].layout.cells(), &[9]);
        assert_eq!(offspring[0].layout.cells(), &[1]);
    }
}
