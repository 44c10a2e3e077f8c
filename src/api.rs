use crate::config::{Config, Settings};
use crate::corpus;
use crate::error::GfResult;
use crate::layouts::{LayoutDefinition, Preset};
use crate::optimizer::{GenerationStats, Individual, Optimizer, ProgressCallback};
use crate::scorer::{BigramTable, Problem, Scorer};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Where a layout definition comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutSource {
    File(PathBuf),
    Preset(Preset),
}

impl LayoutSource {
    pub fn resolve(&self) -> GfResult<LayoutDefinition> {
        match self {
            Self::File(path) => {
                let mut def = LayoutDefinition::load_from_file(path)?;
                if def.name.is_empty() {
                    def.name = path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_default();
                }
                Ok(def)
            }
            Self::Preset(p) => Ok(p.definition()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankedLayout {
    pub fitness: f64,
    pub rows: Vec<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationReport {
    pub layout_name: String,
    pub best: RankedLayout,
    pub hall_of_fame: Vec<RankedLayout>,
    pub logbook: Vec<GenerationStats>,
}

/// Service: estimate the bigram table of a corpus directory for a definition.
pub fn fit_bigrams<P: AsRef<Path>>(def: &LayoutDefinition, corpus_dir: P) -> GfResult<BigramTable> {
    corpus::build_bigram_table(corpus_dir, &def.counted)
}

/// Service: validate everything up front and build the shared scorer.
pub fn prepare(
    def: &LayoutDefinition,
    table: &BigramTable,
    config: &Config,
) -> GfResult<(Arc<Scorer>, Settings)> {
    let settings = config.validate()?;
    let problem = Problem::new(def, table)?;
    let scorer = Scorer::with_metric(problem, settings.metric.clone());
    Ok((Arc::new(scorer), settings))
}

/// Service: run the search and render the result with symbol names.
pub fn optimize<CB: ProgressCallback>(
    def: &LayoutDefinition,
    table: &BigramTable,
    config: &Config,
    callback: &CB,
) -> GfResult<OptimizationReport> {
    let (scorer, settings) = prepare(def, table, config)?;
    optimize_with_scorer(scorer, &settings, callback)
}

/// Same as [`optimize`] but with a caller-built scorer, e.g. one carrying a
/// custom `FitnessFunction`.
pub fn optimize_with_scorer<CB: ProgressCallback>(
    scorer: Arc<Scorer>,
    settings: &Settings,
    callback: &CB,
) -> GfResult<OptimizationReport> {
    info!(
        "Optimizing '{}': population {}, {} generations",
        scorer.problem().name,
        settings.options.population_size,
        settings.options.max_generation
    );

    let optimizer = Optimizer::new(scorer.clone(), settings.options.clone());
    let result = optimizer.run(settings.seed, callback)?;

    let problem = scorer.problem();
    let rank = |ind: &Individual| RankedLayout {
        fitness: ind.fitness().unwrap_or(f64::NAN),
        rows: ind.layout.to_names(&problem.alphabet),
    };

    Ok(OptimizationReport {
        layout_name: problem.name.clone(),
        best: rank(&result.best),
        hall_of_fame: result.hall_of_fame.iter().map(rank).collect(),
        logbook: result.logbook,
    })
}

/// Service: score a user-supplied layout given as symbol names.
pub fn score_layout(
    def: &LayoutDefinition,
    table: &BigramTable,
    config: &Config,
    rows: &[Vec<String>],
) -> GfResult<f64> {
    let (scorer, _) = prepare(def, table, config)?;
    let layout = scorer.problem().layout_from_names(rows)?;
    scorer.score(&layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::SilentProgress;

    fn def() -> LayoutDefinition {
        LayoutDefinition {
            name: "mini".into(),
            template: vec![vec![Some("#".to_string()), None, None, None]],
            counted: vec!["a".into(), "b".into(), "c".into()],
            permutable: vec!["a".into(), "b".into(), "c".into()],
        }
    }

    #[test]
    fn test_optimize_report_uses_symbol_names() {
        let table = BigramTable::from_pairs([(("a", "c"), 1.0)]);
        let mut cfg = Config::default();
        cfg.search.population_size = 10;
        cfg.search.max_generation = 10;
        cfg.search.seed = Some(5);

        let report = optimize(&def(), &table, &cfg, &SilentProgress).unwrap();
        assert_eq!(report.layout_name, "mini");
        assert_eq!(report.best.rows[0][0], "#");
        assert_eq!(report.best.fitness, 1.0, "a and c should end up adjacent");
        assert_eq!(report.logbook.len(), 11);
    }

    #[test]
    fn test_score_layout() {
        let table = BigramTable::from_pairs([(("a", "c"), 1.0)]);
        let rows = vec![vec!["#".into(), "a".into(), "b".into(), "c".into()]];
        let score = score_layout(&def(), &table, &Config::default(), &rows).unwrap();
        assert_eq!(score, 2.0);
    }

    #[test]
    fn test_preset_source() {
        let def = LayoutSource::Preset(Preset::EnHex).resolve().unwrap();
        assert_eq!(def.name, "en_hex");
    }
}
