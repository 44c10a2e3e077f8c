pub mod bigrams;
pub mod engine;

pub use self::bigrams::{BigramEntry, BigramTable};

use crate::error::{GfResult, GridError};
use crate::geometry::DistanceMetric;
use crate::grid::{Alphabet, Code, Layout, SymbolSet, Template, EMPTY};
use crate::layouts::LayoutDefinition;
use std::collections::HashSet;
use tracing::debug;

/// Bigram table compiled against an alphabet.
#[derive(Debug, Clone, Default)]
pub struct BigramIndex {
    pub pairs: Vec<(Code, Code)>,
    pub probs: Vec<f64>,
}

/// Read-only, validated search problem shared by every individual of a run.
#[derive(Debug, Clone)]
pub struct Problem {
    pub name: String,
    pub alphabet: Alphabet,
    pub template: Template,
    pub counted: SymbolSet,
    pub permutable: SymbolSet,
    pub bigrams: BigramIndex,
}

impl Problem {
    /// Validates the definition against the table. All violations are
    /// collected into a single `GridError::Config`.
    pub fn new(def: &LayoutDefinition, table: &BigramTable) -> GfResult<Self> {
        let mut errors = Vec::new();
        let mut alphabet = Alphabet::new();

        let template = Template::from_rows(&def.template, &mut alphabet)?;

        if def.counted.is_empty() {
            errors.push("counted symbol set must not be empty".to_string());
        }
        if def.permutable.is_empty() {
            errors.push("permutable symbol set must not be empty".to_string());
        }

        let mut seen = HashSet::new();
        for p in &def.permutable {
            if !seen.insert(p.as_str()) {
                errors.push(format!("permutable symbol '{}' is listed twice", p));
            }
        }

        let counted_names: HashSet<&str> = def.counted.iter().map(String::as_str).collect();
        for p in &def.permutable {
            if !counted_names.contains(p.as_str()) {
                errors.push(format!("permutable symbol '{}' is not counted", p));
            }
        }

        let counted_codes = def
            .counted
            .iter()
            .map(|s| alphabet.intern(s))
            .collect::<GfResult<Vec<Code>>>()?;
        let permutable_codes = def
            .permutable
            .iter()
            .map(|s| alphabet.intern(s))
            .collect::<GfResult<Vec<Code>>>()?;
        let counted = SymbolSet::new(&counted_codes);
        let permutable = SymbolSet::new(&permutable_codes);

        for code in template.fixed_codes() {
            if permutable.contains(code) {
                errors.push(format!(
                    "fixed cell holds permutable symbol '{}'",
                    alphabet.name(code)
                ));
            }
        }

        let free = template.free_count();
        if free != permutable.len() {
            errors.push(format!(
                "template has {} free cells but {} permutable symbols",
                free,
                permutable.len()
            ));
        }

        let placeable: HashSet<Code> = template
            .fixed_codes()
            .chain(permutable.members().iter().copied())
            .collect();

        let mut bigrams = BigramIndex::default();
        let mut reported = HashSet::new();
        let mut unknown = HashSet::new();
        for entry in table.entries() {
            if !entry.probability.is_finite() || entry.probability < 0.0 {
                errors.push(format!(
                    "bigram ({}, {}) has invalid probability {}",
                    entry.first, entry.second, entry.probability
                ));
                continue;
            }
            let mut pair = [EMPTY; 2];
            for (slot, name) in pair.iter_mut().zip([&entry.first, &entry.second]) {
                match alphabet.code(name) {
                    Some(code) if counted.contains(code) => {
                        if !placeable.contains(&code) && reported.insert(code) {
                            errors.push(format!(
                                "counted symbol '{}' has no cell in the template",
                                name
                            ));
                        }
                        *slot = code;
                    }
                    _ => {
                        if unknown.insert(name.as_str()) {
                            errors.push(format!("bigram symbol '{}' is not counted", name));
                        }
                    }
                }
            }
            bigrams.pairs.push((pair[0], pair[1]));
            bigrams.probs.push(entry.probability);
        }

        if !errors.is_empty() {
            return Err(GridError::Config(errors));
        }

        debug!(
            "Problem '{}': {}x{} grid, {} free cells, {} bigrams",
            def.name,
            template.shape().0,
            template.shape().1,
            free,
            bigrams.pairs.len()
        );

        Ok(Self {
            name: def.name.clone(),
            alphabet,
            template,
            counted,
            permutable,
            bigrams,
        })
    }

    /// Converts a nested symbol grid into a layout over this problem's alphabet.
    pub fn layout_from_names(&self, rows: &[Vec<String>]) -> GfResult<Layout> {
        let (h, w) = self.template.shape();
        if rows.len() != h || rows.iter().any(|r| r.len() != w) {
            return Err(GridError::ShapeMismatch {
                left: (h, w),
                right: (rows.len(), rows.first().map(|r| r.len()).unwrap_or(0)),
            });
        }
        let mut cells = Vec::with_capacity(h * w);
        for name in rows.iter().flatten() {
            let code = self
                .alphabet
                .code(name)
                .ok_or_else(|| GridError::config(format!("unknown symbol '{}'", name)))?;
            cells.push(code);
        }
        Layout::from_cells(h, w, cells)
    }
}

/// Objective over a layout. Implement this to plug in a custom objective; any
/// extra arguments live on the implementing value.
pub trait FitnessFunction: Send + Sync {
    fn evaluate(&self, problem: &Problem, layout: &Layout) -> GfResult<f64>;
}

impl<F> FitnessFunction for F
where
    F: Fn(&Problem, &Layout) -> GfResult<f64> + Send + Sync,
{
    fn evaluate(&self, problem: &Problem, layout: &Layout) -> GfResult<f64> {
        self(problem, layout)
    }
}

/// Probability-weighted travel distance: `sum(p(x,y) * min_dist(x,y))`.
#[derive(Debug, Clone, Default)]
pub struct WeightedDistance {
    pub metric: DistanceMetric,
}

impl WeightedDistance {
    pub fn new(metric: DistanceMetric) -> Self {
        Self { metric }
    }
}

impl FitnessFunction for WeightedDistance {
    fn evaluate(&self, problem: &Problem, layout: &Layout) -> GfResult<f64> {
        let dists = engine::distance_vector(problem, layout, &self.metric)?;
        Ok(engine::weighted_average(&problem.bigrams.probs, &dists))
    }
}

pub struct Scorer {
    problem: Problem,
    fitness: Box<dyn FitnessFunction>,
}

impl Scorer {
    pub fn new(problem: Problem, fitness: Box<dyn FitnessFunction>) -> Self {
        Self { problem, fitness }
    }

    pub fn with_metric(problem: Problem, metric: DistanceMetric) -> Self {
        Self::new(problem, Box::new(WeightedDistance::new(metric)))
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn score(&self, layout: &Layout) -> GfResult<f64> {
        self.fitness.evaluate(&self.problem, layout)
    }
}
