use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

use super::record::{DriverSeasonRecord, ScoredRecord};
use super::table::SeasonTable;
use crate::error::{PipelineError, Result};
use crate::model::{ChampionModel, FeatureImportance, FeatureMatrix, FEATURE_COLUMNS};

/// Scored rows in upload order.
pub type ScoredTable = Vec<ScoredRecord>;

/// Binds a shared model to the scoring operations.
#[derive(Clone)]
pub struct ScoringPipeline {
    model: Arc<dyn ChampionModel>,
}

impl ScoringPipeline {
    pub fn new(model: Arc<dyn ChampionModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &dyn ChampionModel {
        self.model.as_ref()
    }

    pub fn score(&self, table: &SeasonTable) -> Result<ScoredTable> {
        score(table, self.model.as_ref())
    }

    pub fn simulate(&self, points: f64, wins: u32, podiums: u32) -> Result<f64> {
        simulate(points, wins, podiums, self.model.as_ref())
    }

    pub fn insights(&self) -> Option<Vec<FeatureImportance>> {
        insights(self.model.as_ref())
    }
}

/// Build the model input from records, always in training order.
pub fn feature_matrix(records: &[DriverSeasonRecord]) -> FeatureMatrix {
    FeatureMatrix::new(
        &FEATURE_COLUMNS,
        records.iter().map(DriverSeasonRecord::features).collect(),
    )
}

/// Attach P(champion) to every row. Output order and length match the input.
///
/// Each probability comes from its own row; values across a table are not
/// normalized and need not sum to 1.
pub fn score(table: &SeasonTable, model: &dyn ChampionModel) -> Result<ScoredTable> {
    let matrix = feature_matrix(&table.records);
    let probs = model.predict_proba(&matrix)?;

    if probs.len() != table.records.len() {
        return Err(PipelineError::Inference(format!(
            "model returned {} rows for {} inputs",
            probs.len(),
            table.records.len()
        )));
    }

    let scored = table
        .records
        .iter()
        .zip(probs)
        .enumerate()
        .map(|(i, (record, pair))| {
            let p = pair[1];
            if !(0.0..=1.0).contains(&p) {
                return Err(PipelineError::Inference(format!(
                    "row {}: probability {} outside [0, 1]",
                    i + 1,
                    p
                )));
            }
            Ok(ScoredRecord::new(record.clone(), p))
        })
        .collect::<Result<ScoredTable>>()?;

    debug!(model = model.name(), rows = scored.len(), "scored table");
    Ok(scored)
}

/// Row with the highest probability. Ties go to the earliest row.
pub fn pick_champion(scored: &[ScoredRecord]) -> Result<&ScoredRecord> {
    let mut best: Option<&ScoredRecord> = None;
    for row in scored {
        match best {
            Some(b) if row.win_probability <= b.win_probability => {}
            _ => best = Some(row),
        }
    }
    best.ok_or(PipelineError::EmptyTable)
}

/// Leaderboard: descending by probability, equal rows keep upload order.
pub fn rank(scored: &[ScoredRecord]) -> Vec<&ScoredRecord> {
    let mut ranked: Vec<&ScoredRecord> = scored.iter().collect();
    ranked.sort_by(|a, b| {
        b.win_probability
            .partial_cmp(&a.win_probability)
            .unwrap_or(Ordering::Equal)
    });
    ranked
}

/// Find both drivers for a head-to-head view.
///
/// Matching is exact. When a driver appears on several rows the first row
/// wins. Fails naming every driver that has no row.
pub fn compare<'a>(
    scored: &'a [ScoredRecord],
    driver_a: &str,
    driver_b: &str,
) -> Result<(&'a ScoredRecord, &'a ScoredRecord)> {
    let find = |name: &str| scored.iter().find(|r| r.record.driver == name);

    match (find(driver_a), find(driver_b)) {
        (Some(a), Some(b)) => Ok((a, b)),
        (a, b) => {
            let mut drivers = Vec::new();
            if a.is_none() {
                drivers.push(driver_a.to_string());
            }
            if b.is_none() && (driver_b != driver_a || a.is_some()) {
                drivers.push(driver_b.to_string());
            }
            Err(PipelineError::NotFound { drivers })
        }
    }
}

/// Score one manually entered season line.
///
/// Any non-negative value is accepted, including combinations no real season
/// could produce. Range limits belong to the caller.
pub fn simulate(points: f64, wins: u32, podiums: u32, model: &dyn ChampionModel) -> Result<f64> {
    let record = DriverSeasonRecord::new("simulated", "", points, wins, podiums);
    record.check().map_err(PipelineError::InvalidInput)?;

    let scored = score(&SeasonTable::from_records(vec![record]), model)?;
    scored
        .first()
        .map(|s| s.win_probability)
        .ok_or_else(|| PipelineError::Inference("model returned no rows".to_string()))
}

/// Model importances, most important first.
pub fn insights(model: &dyn ChampionModel) -> Option<Vec<FeatureImportance>> {
    let mut importances = model.feature_importances()?;
    importances.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(Ordering::Equal)
    });
    Some(importances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::{ConstantModel, MonotoneModel};

    /// Returns fixed probabilities in order, ignoring features.
    struct FixedModel {
        probs: Vec<f64>,
        features: Vec<String>,
    }

    impl FixedModel {
        fn new(probs: Vec<f64>) -> Self {
            Self {
                probs,
                features: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            }
        }
    }

    impl ChampionModel for FixedModel {
        fn name(&self) -> &str {
            "fixed"
        }

        fn features(&self) -> &[String] {
            &self.features
        }

        fn predict_proba(&self, _features: &FeatureMatrix) -> Result<Vec<[f64; 2]>> {
            Ok(self.probs.iter().map(|p| [1.0 - p, *p]).collect())
        }

        fn feature_importances(&self) -> Option<Vec<FeatureImportance>> {
            Some(
                [("points", 0.2), ("wins", 0.5), ("podiums", 0.3)]
                    .iter()
                    .map(|(f, i)| FeatureImportance {
                        feature: f.to_string(),
                        importance: *i,
                    })
                    .collect(),
            )
        }
    }

    fn scenario_table() -> SeasonTable {
        SeasonTable::from_records(vec![
            DriverSeasonRecord::new("A", "X", 400.0, 10, 15),
            DriverSeasonRecord::new("B", "Y", 200.0, 2, 5),
        ])
    }

    fn table_of(n: usize) -> SeasonTable {
        SeasonTable::from_records(
            (0..n)
                .map(|i| DriverSeasonRecord::new(&format!("D{}", i), "T", 100.0, 1, 1))
                .collect(),
        )
    }

    fn drivers(rows: &[&ScoredRecord]) -> Vec<String> {
        rows.iter().map(|r| r.record.driver.clone()).collect()
    }

    #[test]
    fn test_score_preserves_count_and_range() {
        let table = SeasonTable::from_records(vec![
            DriverSeasonRecord::new("A", "X", 0.0, 0, 0),
            DriverSeasonRecord::new("B", "Y", 600.0, 25, 25),
            DriverSeasonRecord::new("C", "Z", 250.0, 3, 9),
        ]);
        let scored = score(&table, &MonotoneModel::new()).unwrap();
        assert_eq!(scored.len(), table.len());
        for (row, input) in scored.iter().zip(&table.records) {
            assert!((0.0..=1.0).contains(&row.win_probability));
            assert_eq!(&row.record, input);
        }
    }

    #[test]
    fn test_score_empty_table() {
        let scored = score(&SeasonTable::default(), &MonotoneModel::new()).unwrap();
        assert!(scored.is_empty());
    }

    #[test]
    fn test_score_attaches_rounded_percentage() {
        let scored = score(&table_of(1), &ConstantModel::new(0.87534)).unwrap();
        assert_eq!(scored[0].win_probability, 0.87534);
        assert_eq!(scored[0].win_percentage, 87.53);
    }

    #[test]
    fn test_score_rejects_row_count_mismatch() {
        let err = score(&table_of(3), &FixedModel::new(vec![0.1, 0.2])).unwrap_err();
        assert!(matches!(err, PipelineError::Inference(_)));
    }

    #[test]
    fn test_score_rejects_out_of_range_probability() {
        let err = score(&table_of(2), &FixedModel::new(vec![0.1, 1.5])).unwrap_err();
        assert!(err.to_string().contains("row 2"));
        let err = score(&table_of(1), &FixedModel::new(vec![f64::NAN])).unwrap_err();
        assert!(matches!(err, PipelineError::Inference(_)));
    }

    #[test]
    fn test_scenario_ranks_stronger_season_first() {
        let scored = score(&scenario_table(), &MonotoneModel::new()).unwrap();
        let ranked = rank(&scored);
        assert_eq!(drivers(&ranked), vec!["A", "B"]);
        assert_eq!(pick_champion(&scored).unwrap().driver(), "A");
    }

    #[test]
    fn test_rank_descending_and_stable_for_ties() {
        let scored = score(&table_of(5), &FixedModel::new(vec![0.2, 0.7, 0.2, 0.9, 0.7])).unwrap();
        let ranked = rank(&scored);
        assert_eq!(drivers(&ranked), vec!["D3", "D1", "D4", "D0", "D2"]);
        for pair in ranked.windows(2) {
            assert!(pair[0].win_probability >= pair[1].win_probability);
        }
    }

    #[test]
    fn test_rank_is_permutation() {
        let scored = score(&table_of(4), &FixedModel::new(vec![0.4, 0.1, 0.3, 0.2])).unwrap();
        let mut ranked = drivers(&rank(&scored));
        ranked.sort();
        assert_eq!(ranked, vec!["D0", "D1", "D2", "D3"]);
    }

    #[test]
    fn test_pick_champion_first_of_ties() {
        let scored = score(&table_of(3), &FixedModel::new(vec![0.5, 0.8, 0.8])).unwrap();
        assert_eq!(pick_champion(&scored).unwrap().driver(), "D1");
    }

    #[test]
    fn test_pick_champion_matches_rank_head() {
        let probs = vec![0.3, 0.3, 0.05, 0.3];
        let scored = score(&table_of(4), &FixedModel::new(probs)).unwrap();
        assert_eq!(pick_champion(&scored).unwrap(), rank(&scored)[0]);
    }

    #[test]
    fn test_pick_champion_empty() {
        assert!(matches!(pick_champion(&[]), Err(PipelineError::EmptyTable)));
    }

    #[test]
    fn test_compare_independent_of_order() {
        let table = SeasonTable::from_records(vec![
            DriverSeasonRecord::new("Bob", "Y", 200.0, 2, 5),
            DriverSeasonRecord::new("Carl", "Z", 100.0, 0, 1),
            DriverSeasonRecord::new("Alice", "X", 400.0, 10, 15),
        ]);
        let scored = score(&table, &MonotoneModel::new()).unwrap();
        let (a, b) = compare(&scored, "Alice", "Bob").unwrap();
        assert_eq!(a.record, table.records[2]);
        assert_eq!(b.record, table.records[0]);
    }

    #[test]
    fn test_compare_first_match_wins() {
        let table = SeasonTable::from_records(vec![
            DriverSeasonRecord::new("Alice", "X", 400.0, 10, 15),
            DriverSeasonRecord::new("Bob", "Y", 200.0, 2, 5),
            DriverSeasonRecord::new("Alice", "W", 10.0, 0, 0),
        ]);
        let scored = score(&table, &MonotoneModel::new()).unwrap();
        let (a, _) = compare(&scored, "Alice", "Bob").unwrap();
        assert_eq!(a.record.team, "X");
    }

    #[test]
    fn test_compare_names_every_missing_driver() {
        let scored = score(&scenario_table(), &MonotoneModel::new()).unwrap();

        match compare(&scored, "A", "Zed") {
            Err(PipelineError::NotFound { drivers }) => assert_eq!(drivers, vec!["Zed"]),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
        match compare(&scored, "Nobody", "Zed") {
            Err(PipelineError::NotFound { drivers }) => {
                assert_eq!(drivers, vec!["Nobody", "Zed"])
            }
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
        match compare(&scored, "Ghost", "Ghost") {
            Err(PipelineError::NotFound { drivers }) => assert_eq!(drivers, vec!["Ghost"]),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_compare_is_case_sensitive() {
        let scored = score(&scenario_table(), &MonotoneModel::new()).unwrap();
        assert!(compare(&scored, "a", "B").is_err());
    }

    #[test]
    fn test_simulate_deterministic() {
        let model = MonotoneModel::new();
        let first = simulate(350.0, 5, 10, &model).unwrap();
        let second = simulate(350.0, 5, 10, &model).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_simulate_matches_score() {
        let model = MonotoneModel::new();
        let table = SeasonTable::from_records(vec![DriverSeasonRecord::new("A", "X", 400.0, 10, 15)]);
        let scored = score(&table, &model).unwrap();
        assert_eq!(simulate(400.0, 10, 15, &model).unwrap(), scored[0].win_probability);
    }

    #[test]
    fn test_simulate_accepts_implausible_input() {
        // More wins than the points could allow
        let p = simulate(0.0, 25, 0, &MonotoneModel::new()).unwrap();
        assert!((0.0..=1.0).contains(&p));
        assert!(simulate(10_000.0, 0, 0, &MonotoneModel::new()).is_ok());
    }

    #[test]
    fn test_simulate_rejects_negative_points() {
        assert!(matches!(
            simulate(-10.0, 0, 0, &MonotoneModel::new()),
            Err(PipelineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_insights_sorted_descending() {
        let imp = insights(&FixedModel::new(vec![])).unwrap();
        let names: Vec<&str> = imp.iter().map(|i| i.feature.as_str()).collect();
        assert_eq!(names, vec!["wins", "podiums", "points"]);
    }

    #[test]
    fn test_insights_unavailable() {
        assert!(insights(&MonotoneModel::new()).is_none());
    }

    #[test]
    fn test_upload_scored_with_loaded_artifact() {
        let path = std::env::temp_dir().join("f1_predictor_test_engine_model.json");
        std::fs::write(
            &path,
            r#"{"format_version": 1, "name": "xgb", "features": ["points", "wins", "podiums"],
                "estimator": {"kind": "tree_ensemble", "base_margin": -1.0, "trees": [
                  {"nodes": [{"split": 1, "split_condition": 6.0, "yes": 1, "no": 2},
                             {"leaf": -1.0}, {"leaf": 3.0}]}]}}"#,
        )
        .unwrap();
        let cache = crate::model::ModelCache::new(path.clone());
        let pipeline = ScoringPipeline::new(cache.get_or_load().unwrap());

        let table = crate::scoring::read_table(
            "driver,team,points,wins,podiums\n\
             NOR,McLaren,374,4,13\n\
             VER,Red Bull,437,9,14\n\
             LEC,Ferrari,356,3,13\n"
                .as_bytes(),
            10,
        )
        .unwrap();
        let scored = pipeline.score(&table).unwrap();
        assert_eq!(pick_champion(&scored).unwrap().driver(), "VER");
        assert_eq!(drivers(&rank(&scored)), vec!["VER", "NOR", "LEC"]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_pipeline_delegates_to_model() {
        let pipeline = ScoringPipeline::new(Arc::new(MonotoneModel::new()));
        let scored = pipeline.score(&scenario_table()).unwrap();
        assert_eq!(pick_champion(&scored).unwrap().driver(), "A");
        assert!(pipeline.simulate(400.0, 10, 15).unwrap() > pipeline.simulate(200.0, 2, 5).unwrap());
        assert_eq!(pipeline.model().name(), "monotone");
    }
}
