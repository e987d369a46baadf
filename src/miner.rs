use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
    time::Instant,
};

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    config::MiningConfig,
    database::TransactionDatabase,
    error::{Error, Result},
    itemsets::{intersection, levelwise},
    metrics::ExecutionMetrics,
    recommend::{self, RecommendationEntry},
    rules::{self, RuleSet},
    table::SupportTable,
    tidset::TidIndex,
};

/// Largest support difference two tables may show and still agree.
pub const SUPPORT_TOLERANCE: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Breadth-first, Apriori style.
    Levelwise,
    /// Depth-first over tidsets, Eclat style.
    Intersection,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::Levelwise, Strategy::Intersection];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Levelwise => "levelwise",
            Strategy::Intersection => "intersection",
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "levelwise" | "apriori" => Ok(Strategy::Levelwise),
            "intersection" | "eclat" => Ok(Strategy::Intersection),
            _ => Err(Error::UnknownStrategy(name.to_owned())),
        }
    }
}

/// Everything one run produced. Owned by the caller.
#[derive(Clone, Debug, Serialize)]
pub struct MiningRun {
    pub table: SupportTable,
    pub rules: RuleSet,
    pub metrics: ExecutionMetrics,
}

impl MiningRun {
    pub fn strategy(&self) -> Strategy {
        self.metrics.strategy
    }

    pub fn recommend(&self, item: &str, limit: usize) -> Vec<RecommendationEntry> {
        recommend::recommend(&self.rules, item, limit)
    }
}

/// Both strategies run over the same transactions.
#[derive(Clone, Debug, Serialize)]
pub struct Comparison {
    pub levelwise: MiningRun,
    pub intersection: MiningRun,
    #[serde(skip)]
    recommendation_limit: usize,
}

impl Comparison {
    /// Suggestions from both runs, averaged per item.
    pub fn recommend(&self, item: &str) -> Vec<RecommendationEntry> {
        recommend::merge(
            &self.levelwise.recommend(item, usize::MAX),
            &self.intersection.recommend(item, usize::MAX),
            self.recommendation_limit,
        )
    }

    /// Whether both runs found the same itemsets with the same supports.
    pub fn agree(&self) -> bool {
        self.levelwise
            .table
            .agrees_with(&self.intersection.table, SUPPORT_TOLERANCE)
    }

    pub fn metrics(&self) -> [&ExecutionMetrics; 2] {
        [&self.levelwise.metrics, &self.intersection.metrics]
    }
}

/// Runs discovery and rule generation with one validated configuration.
///
/// A miner keeps no results between runs; it can be shared across threads.
#[derive(Clone, Debug)]
pub struct Miner {
    config: MiningConfig,
}

impl Miner {
    pub fn new(config: MiningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MiningConfig {
        &self.config
    }

    #[instrument(skip(self, transactions), fields(n_transactions = transactions.len()))]
    pub fn run(&self, strategy: Strategy, transactions: &TransactionDatabase) -> MiningRun {
        let config = &self.config;
        let started = Instant::now();

        let (table, rules) = match strategy {
            Strategy::Levelwise => {
                let table = levelwise::discover_with(
                    transactions,
                    config.min_support,
                    config.max_len,
                    config.candidate_generation,
                );
                let rules = rules::generate_with(&table, config.min_confidence, transactions);
                (table, rules)
            }
            Strategy::Intersection => {
                let index = TidIndex::build(transactions);
                let table =
                    intersection::discover_indexed(&index, config.min_support, config.max_len);
                let rules = rules::generate_with(&table, config.min_confidence, &index);
                (table, rules)
            }
        };

        let metrics = ExecutionMetrics::new(strategy, started.elapsed(), &table, &rules);
        info!(%metrics, "mining run finished");

        MiningRun {
            table,
            rules,
            metrics,
        }
    }

    /// Run both strategies side by side.
    pub fn compare(&self, transactions: &TransactionDatabase) -> Comparison {
        let (levelwise, intersection) = rayon::join(
            || self.run(Strategy::Levelwise, transactions),
            || self.run(Strategy::Intersection, transactions),
        );

        Comparison {
            levelwise,
            intersection,
            recommendation_limit: self.config.recommendation_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ConfigError, itemset};

    fn transactions() -> TransactionDatabase {
        vec![
            vec!["bread", "milk"],
            vec!["bread", "diaper", "beer", "eggs"],
            vec!["milk", "diaper", "beer", "cola"],
            vec!["bread", "milk", "diaper", "beer"],
            vec!["bread", "milk", "diaper", "cola"],
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn strategy_names() {
        assert_eq!("apriori".parse::<Strategy>(), Ok(Strategy::Levelwise));
        assert_eq!("eclat".parse::<Strategy>(), Ok(Strategy::Intersection));
        assert_eq!(
            "fpgrowth".parse::<Strategy>(),
            Err(Error::UnknownStrategy("fpgrowth".to_owned()))
        );
        for strategy in Strategy::ALL {
            assert_eq!(strategy.name().parse::<Strategy>(), Ok(strategy));
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert_eq!(
            Miner::new(MiningConfig::new(0.0, 0.5)).err(),
            Some(Error::Config(ConfigError::MinSupport(0.0)))
        );
    }

    #[test]
    fn run_records_metrics() {
        let miner = Miner::new(MiningConfig::new(0.6, 0.6)).unwrap();

        for strategy in Strategy::ALL {
            let run = miner.run(strategy, &transactions());

            assert_eq!(run.strategy(), strategy);
            assert_eq!(run.metrics.itemset_count, 8);
            assert_eq!(run.metrics.rule_count, 8);
            assert_eq!(run.table.len(), run.metrics.itemset_count);
            assert_eq!(run.rules.len(), run.metrics.rule_count);
        }
    }

    #[test]
    fn comparison_agrees_and_merges() {
        let miner = Miner::new(MiningConfig::new(0.6, 0.6).with_recommendation_limit(2)).unwrap();

        let comparison = miner.compare(&transactions());

        assert!(comparison.agree());
        assert_eq!(comparison.levelwise.rules, comparison.intersection.rules);
        assert_eq!(comparison.metrics()[1].strategy, Strategy::Intersection);

        let merged = comparison.recommend("beer");
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].item, "diaper");
        assert!((merged[0].confidence - 1.0).abs() < SUPPORT_TOLERANCE);
        assert_eq!(comparison.recommend("diaper").len(), 2);
        assert!(comparison.recommend("caviar").is_empty());
    }

    #[test]
    fn empty_database_runs_cleanly() {
        let miner = Miner::new(MiningConfig::default()).unwrap();

        let comparison = miner.compare(&TransactionDatabase::default());

        assert!(comparison.levelwise.table.is_empty());
        assert!(comparison.intersection.rules.is_empty());
        assert!(comparison.agree());
    }

    #[test]
    fn max_len_reaches_discovery() {
        let miner = Miner::new(MiningConfig::new(0.2, 0.0).with_max_len(2)).unwrap();

        let run = miner.run(Strategy::Intersection, &transactions());

        assert_eq!(run.table.max_len(), 2);
        assert!(run.table.contains(&itemset!["beer", "eggs"]));
    }

    #[test]
    fn run_serializes() {
        let miner = Miner::new(MiningConfig::new(0.6, 0.6)).unwrap();
        let run = miner.run(Strategy::Levelwise, &transactions());

        let json = serde_json::to_value(&run).unwrap();

        assert_eq!(json["rules"].as_array().map(Vec::len), Some(8));
        assert_eq!(json["table"]["2"].as_array().map(Vec::len), Some(4));
        assert_eq!(json["metrics"]["strategy"], serde_json::json!("levelwise"));
    }
}
