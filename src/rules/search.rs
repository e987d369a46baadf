use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{info, instrument};

use crate::{
    itemset::Itemset,
    rules::{Rule, RuleSet},
    table::{SupportSource, SupportTable},
};

/// Falls back to nothing.
struct NoFallback;

impl SupportSource for NoFallback {
    fn support(&self, _: &Itemset) -> Option<f64> {
        None
    }
}

/// Generate rules based on frequent itemsets.
pub fn generate(table: &SupportTable, min_confidence: f64) -> RuleSet {
    search(table, min_confidence, &NoFallback)
}

/// Like [`generate`], asking `fallback` for supports the table does not hold.
pub fn generate_with<S>(table: &SupportTable, min_confidence: f64, fallback: &S) -> RuleSet
where
    S: SupportSource + Sync,
{
    search(table, min_confidence, fallback)
}

#[instrument(skip(table, fallback), fields(itemsets = table.len()))]
fn search(
    table: &SupportTable,
    min_confidence: f64,
    fallback: &(dyn SupportSource + Sync),
) -> RuleSet {
    let itemsets: Vec<(&Itemset, f64)> = table
        .sizes()
        .filter(|&size| size > 1)
        .flat_map(|size| table.sorted_level(size))
        .map(|(itemset, count)| (itemset, table.fraction(count)))
        .collect();

    let rules: RuleSet = itemsets
        .par_iter()
        .map(|&(itemset, support)| bfs(itemset, support, min_confidence, table, fallback))
        .collect::<Vec<Vec<Rule>>>()
        .into_iter()
        .flatten()
        .collect();

    info!(rules = rules.len(), "rule generation finished");
    rules
}

/// Given a frequent itemset, find the rules it can be split into.
///
/// Consequents grow one item at a time. Moving an item from the antecedent to
/// the consequent can only lower confidence, so a consequent is tried only
/// when every consequent one item smaller made it into a rule.
fn bfs(
    itemset: &Itemset,
    support: f64,
    min_confidence: f64,
    table: &SupportTable,
    fallback: &(dyn SupportSource + Sync),
) -> Vec<Rule> {
    let mut final_rules = vec![];
    let mut parents: HashSet<Itemset> = HashSet::new();

    for size in 1..itemset.len() {
        let mut accepted: HashSet<Itemset> = HashSet::new();

        for consequent in itemset.subsets(size) {
            if size > 1 && !consequent.subsets(size - 1).all(|parent| parents.contains(&parent)) {
                continue;
            }

            let antecedent = itemset.difference(&consequent);
            let antecedent_support = match lookup(&antecedent, table, fallback) {
                Some(antecedent_support) if antecedent_support > 0.0 => antecedent_support,
                _ => continue,
            };

            let confidence = support / antecedent_support;
            if confidence < min_confidence {
                continue;
            }

            let lift = match lookup(&consequent, table, fallback) {
                Some(consequent_support) if consequent_support > 0.0 => {
                    confidence / consequent_support
                }
                _ => 0.0,
            };

            accepted.insert(consequent.clone());
            final_rules.push(Rule {
                antecedent,
                consequent,
                support,
                confidence,
                lift,
            });
        }

        if accepted.is_empty() {
            break;
        }
        parents = accepted;
    }

    final_rules
}

fn lookup(
    itemset: &Itemset,
    table: &SupportTable,
    fallback: &(dyn SupportSource + Sync),
) -> Option<f64> {
    table.support(itemset).or_else(|| fallback.support(itemset))
}
