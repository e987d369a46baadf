//! Frequent itemset mining and association rules for market-basket data.
//!
//! Two discovery strategies fill the same [`SupportTable`]: a breadth-first
//! search that counts pruned candidates level by level
//! ([`itemsets::levelwise`]), and a depth-first search that intersects
//! per-item transaction sets ([`itemsets::intersection`]). Rules and
//! recommendations are derived from whichever table a run produced.
//!
//! ```
//! use basket::{Miner, MiningConfig, TransactionDatabase};
//!
//! let transactions: TransactionDatabase = vec![
//!     vec!["bread", "milk"],
//!     vec!["bread", "diaper", "beer", "eggs"],
//!     vec!["milk", "diaper", "beer", "cola"],
//!     vec!["bread", "milk", "diaper", "beer"],
//!     vec!["bread", "milk", "diaper", "cola"],
//! ]
//! .into_iter()
//! .collect();
//!
//! let miner = Miner::new(MiningConfig::new(0.6, 0.6))?;
//! let comparison = miner.compare(&transactions);
//!
//! assert!(comparison.agree());
//! assert_eq!(comparison.recommend("beer")[0].item, "diaper");
//! # Ok::<(), basket::Error>(())
//! ```

pub mod combi;
mod config;
mod database;
mod error;
mod itemset;
pub mod itemsets;
mod metrics;
mod miner;
pub mod recommend;
pub mod rules;
mod table;
mod tidset;
pub mod types;
#[cfg(feature = "python")]
mod wrapper;

pub use combi::CandidateGeneration;
pub use config::{
    MiningConfig, DEFAULT_MIN_CONFIDENCE, DEFAULT_MIN_SUPPORT, DEFAULT_RECOMMENDATION_LIMIT,
};
pub use database::{DatabaseStats, TransactionDatabase};
pub use error::{ConfigError, Error, Result};
pub use itemset::Itemset;
pub use metrics::ExecutionMetrics;
pub use miner::{Comparison, Miner, MiningRun, Strategy, SUPPORT_TOLERANCE};
pub use recommend::RecommendationEntry;
pub use rules::{Rule, RuleSet};
pub use table::{meets_support, SupportSource, SupportTable};
pub use tidset::{TidIndex, TidSet};
pub use types::Item;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn basket(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(wrapper::mine, m)?)?;
    m.add_function(wrap_pyfunction!(wrapper::recommend, m)?)?;
    Ok(())
}
