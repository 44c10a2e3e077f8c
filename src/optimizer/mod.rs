pub mod crossover;
pub mod hall_of_fame;
pub mod initialization;
pub mod mutation;
pub mod runner;
pub mod selection;

pub use self::hall_of_fame::HallOfFame;
pub use self::runner::{
    GenerationStats, OptimizationOptions, OptimizationResult, Optimizer, ProgressCallback,
    SilentProgress,
};

use crate::grid::Layout;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Whether lower or higher fitness wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Minimize,
    Maximize,
}

impl Direction {
    #[inline(always)]
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Self::Minimize => a < b,
            Self::Maximize => a > b,
        }
    }

    /// Orders fitness values best first.
    pub fn cmp_best_first(self, a: f64, b: f64) -> Ordering {
        match self {
            Self::Minimize => a.total_cmp(&b),
            Self::Maximize => b.total_cmp(&a),
        }
    }

    /// Fitness that loses against every real value.
    pub fn worst(self) -> f64 {
        match self {
            Self::Minimize => f64::INFINITY,
            Self::Maximize => f64::NEG_INFINITY,
        }
    }
}

/// One candidate layout with its lazily computed fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    pub layout: Layout,
    fitness: Option<f64>,
}

impl Individual {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            fitness: None,
        }
    }

    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    pub fn set_fitness(&mut self, value: f64) {
        self.fitness = Some(value);
    }

    pub fn invalidate(&mut self) {
        self.fitness = None;
    }

    /// Fitness for ranking; unevaluated individuals rank last.
    #[inline(always)]
    pub fn rank_value(&self, direction: Direction) -> f64 {
        self.fitness.unwrap_or_else(|| direction.worst())
    }
}
