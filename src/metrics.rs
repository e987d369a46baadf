use std::{
    fmt::{self, Display, Formatter},
    time::Duration,
};

use serde::{Serialize, Serializer};

use crate::{miner::Strategy, rules::RuleSet, table::SupportTable};

/// What one mining run produced and how long it took.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExecutionMetrics {
    pub strategy: Strategy,
    /// Discovery plus rule generation.
    #[serde(rename = "execution_time_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
    pub rule_count: usize,
    /// Frequent itemsets over all sizes.
    pub itemset_count: usize,
}

impl ExecutionMetrics {
    pub fn new(
        strategy: Strategy,
        elapsed: Duration,
        table: &SupportTable,
        rules: &RuleSet,
    ) -> Self {
        Self {
            strategy,
            elapsed,
            rule_count: rules.len(),
            itemset_count: table.len(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

impl Display for ExecutionMetrics {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} itemsets, {} rules in {:.3} ms",
            self.strategy,
            self.itemset_count,
            self.rule_count,
            self.elapsed_ms()
        )
    }
}

fn as_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64() * 1000.0)
}
