use pyo3::{
    exceptions::PyValueError,
    prelude::*,
    types::{PyDict, PyFrozenSet, PyList},
};

use crate::{
    config::MiningConfig,
    database::TransactionDatabase,
    error::Error,
    metrics::ExecutionMetrics,
    miner::{Miner, Strategy},
    recommend::RecommendationEntry,
    rules::RuleSet,
    table::SupportTable,
};

macro_rules! pyfrozenset {
    ($py:expr, $x:expr) => {
        PyFrozenSet::new_bound($py, $x.iter())?
    };
}

impl From<Error> for PyErr {
    fn from(error: Error) -> Self {
        PyValueError::new_err(error.to_string())
    }
}

/// Mine frequent itemsets and rules with one strategy.
#[pyfunction]
#[pyo3(signature = (transactions, min_support=0.2, min_confidence=0.5, strategy="levelwise", max_len=None))]
pub fn mine<'py>(
    py: Python<'py>,
    transactions: Vec<Vec<String>>,
    min_support: f64,
    min_confidence: f64,
    strategy: &str,
    max_len: Option<usize>,
) -> PyResult<Bound<'py, PyDict>> {
    let strategy: Strategy = strategy.parse()?;
    let config = MiningConfig {
        max_len,
        ..MiningConfig::new(min_support, min_confidence)
    };
    let miner = Miner::new(config)?;
    let transactions: TransactionDatabase = transactions.into_iter().collect();

    let run = py.allow_threads(|| miner.run(strategy, &transactions));

    let result = PyDict::new_bound(py);
    result.set_item("itemsets", convert_support_table(py, &run.table)?)?;
    result.set_item("rules", convert_rules(py, &run.rules)?)?;
    result.set_item("metrics", convert_metrics(py, &run.metrics)?)?;
    Ok(result)
}

/// Suggestions for `item`, averaged over both strategies.
#[pyfunction]
#[pyo3(signature = (transactions, item, min_support=0.2, min_confidence=0.5, limit=10))]
pub fn recommend<'py>(
    py: Python<'py>,
    transactions: Vec<Vec<String>>,
    item: &str,
    min_support: f64,
    min_confidence: f64,
    limit: usize,
) -> PyResult<Bound<'py, PyList>> {
    let miner = Miner::new(
        MiningConfig::new(min_support, min_confidence).with_recommendation_limit(limit),
    )?;
    let transactions: TransactionDatabase = transactions.into_iter().collect();

    let comparison = py.allow_threads(|| miner.compare(&transactions));

    convert_recommendations(py, &comparison.recommend(item))
}

/// `{size: {frozenset(itemset): support}}`
pub fn convert_support_table<'py>(
    py: Python<'py>,
    table: &SupportTable,
) -> PyResult<Bound<'py, PyDict>> {
    let py_levels = PyDict::new_bound(py);
    for (&size, itemset_counts) in table.levels() {
        let py_itemset_counts = PyDict::new_bound(py);
        for (itemset, &count) in itemset_counts {
            py_itemset_counts.set_item(pyfrozenset!(py, itemset), table.fraction(count))?;
        }
        py_levels.set_item(size, py_itemset_counts)?;
    }
    Ok(py_levels)
}

pub fn convert_rules<'py>(py: Python<'py>, rules: &RuleSet) -> PyResult<Bound<'py, PyList>> {
    let py_rules = PyList::empty_bound(py);
    for rule in rules {
        let py_rule = PyDict::new_bound(py);
        py_rule.set_item("antecedent", pyfrozenset!(py, rule.antecedent))?;
        py_rule.set_item("consequent", pyfrozenset!(py, rule.consequent))?;
        py_rule.set_item("support", rule.support)?;
        py_rule.set_item("confidence", rule.confidence)?;
        py_rule.set_item("lift", rule.lift)?;
        py_rules.append(py_rule)?;
    }
    Ok(py_rules)
}

pub fn convert_metrics<'py>(
    py: Python<'py>,
    metrics: &ExecutionMetrics,
) -> PyResult<Bound<'py, PyDict>> {
    let py_metrics = PyDict::new_bound(py);
    py_metrics.set_item("strategy", metrics.strategy.name())?;
    py_metrics.set_item("execution_time", metrics.elapsed_ms())?;
    py_metrics.set_item("num_rules", metrics.rule_count)?;
    py_metrics.set_item("num_frequent_itemsets", metrics.itemset_count)?;
    Ok(py_metrics)
}

pub fn convert_recommendations<'py>(
    py: Python<'py>,
    recommendations: &[RecommendationEntry],
) -> PyResult<Bound<'py, PyList>> {
    let py_recommendations = PyList::empty_bound(py);
    for entry in recommendations {
        let py_entry = PyDict::new_bound(py);
        py_entry.set_item("item", &entry.item)?;
        py_entry.set_item("confidence", entry.confidence)?;
        py_entry.set_item("support", entry.support)?;
        py_entry.set_item("lift", entry.lift)?;
        py_recommendations.append(py_entry)?;
    }
    Ok(py_recommendations)
}
