use crate::error::{GfResult, GridError};
use crate::geometry::{DistanceMetric, MetricKind, A_H_DEFAULT, A_S_DEFAULT, B_H_DEFAULT};
use crate::optimizer::OptimizationOptions;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[command(flatten)]
    #[serde(default)]
    pub search: SearchParams,
    #[command(flatten)]
    #[serde(default)]
    pub geometry: GeometryParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchParams {
    #[arg(long, default_value_t = 50)]
    pub population_size: usize,
    #[arg(long, default_value_t = 50)]
    pub max_generation: usize,
    #[arg(long, default_value_t = 0.9)]
    pub p_crossover: f64,
    #[arg(long, default_value_t = 0.2)]
    pub p_mutation: f64,
    #[arg(long, default_value_t = 3)]
    pub tourn_size: usize,
    #[arg(long, default_value_t = 1)]
    pub hall_of_fame_size: usize,

    /// Search for the highest fitness instead of the lowest
    #[arg(long, default_value_t = false)]
    pub maximize: bool,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Score each generation on the rayon thread pool
    #[arg(long, default_value_t = false)]
    pub parallel_eval: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generation: 50,
            p_crossover: 0.9,
            p_mutation: 0.2,
            tourn_size: 3,
            hall_of_fame_size: 1,
            maximize: false,
            seed: None,
            parallel_eval: false,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeometryParams {
    #[arg(long, default_value_t = MetricKind::Square)]
    pub fitness: MetricKind,

    /// Half side of a square key
    #[arg(long, default_value_t = A_S_DEFAULT)]
    pub a_s: f64,
    /// Hex key centre to the middle of its side
    #[arg(long, default_value_t = A_H_DEFAULT)]
    pub a_h: f64,
    /// Hex key centre to the middle of the side shared with the next row
    #[arg(long, default_value_t = B_H_DEFAULT)]
    pub b_h: f64,
}

impl Default for GeometryParams {
    fn default() -> Self {
        Self {
            fitness: MetricKind::Square,
            a_s: A_S_DEFAULT,
            a_h: A_H_DEFAULT,
            b_h: B_H_DEFAULT,
        }
    }
}

/// Validated, immutable run settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub options: OptimizationOptions,
    pub metric: DistanceMetric,
    pub seed: Option<u64>,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> GfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overwrites fields with values the user typed on the command line, leaving
    /// file-provided values in place for everything else.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(search.population_size);
        update_if_present!(search.max_generation);
        update_if_present!(search.p_crossover);
        update_if_present!(search.p_mutation);
        update_if_present!(search.tourn_size);
        update_if_present!(search.hall_of_fame_size);
        update_if_present!(search.maximize);
        update_if_present!(search.seed);
        update_if_present!(search.parallel_eval);

        update_if_present!(geometry.fitness);
        update_if_present!(geometry.a_s);
        update_if_present!(geometry.a_h);
        update_if_present!(geometry.b_h);
    }

    /// Checks every parameter and reports all violations at once.
    pub fn validate(&self) -> GfResult<Settings> {
        let s = &self.search;
        let g = &self.geometry;
        let mut errors = Vec::new();

        for (name, value) in [
            ("population_size", s.population_size),
            ("tourn_size", s.tourn_size),
            ("hall_of_fame_size", s.hall_of_fame_size),
        ] {
            if value == 0 {
                errors.push(format!("{} must be at least 1", name));
            }
        }

        for (name, value) in [("p_crossover", s.p_crossover), ("p_mutation", s.p_mutation)] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(format!("{} must be within [0, 1], got {}", name, value));
            }
        }

        for (name, value) in [("a_s", g.a_s), ("a_h", g.a_h), ("b_h", g.b_h)] {
            if !value.is_finite() || value <= 0.0 {
                errors.push(format!("{} must be a positive finite number, got {}", name, value));
            }
        }

        if !errors.is_empty() {
            return Err(GridError::Config(errors));
        }

        Ok(Settings {
            options: OptimizationOptions::from(s),
            metric: DistanceMetric::from_kind(g.fitness, g.a_s, g.a_h, g.b_h),
            seed: s.seed,
        })
    }
}
