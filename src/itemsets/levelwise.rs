#![allow(non_snake_case)]

//! Breadth-first (Apriori) discovery: one pass over the transactions per
//! itemset size, counting only candidates whose subsets are all frequent.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::{
    combi::{generate_candidates, CandidateGeneration},
    database::TransactionDatabase,
    itemset::Itemset,
    table::{meets_support, SupportTable},
    types::{ItemCounts, ItemsetCounts, ItemsetLength},
};

const APPROX_NUM_UNIQUE_ITEMS: usize = 1024; // arbitrary

/// Frequent itemsets of every size.
pub fn discover(transactions: &TransactionDatabase, min_support: f64) -> SupportTable {
    discover_with(
        transactions,
        min_support,
        None,
        CandidateGeneration::default(),
    )
}

/// Frequent itemsets of at most `max_len` items, with the chosen candidate
/// generation.
#[instrument(skip(transactions), fields(n_transactions = transactions.len()))]
pub fn discover_with(
    transactions: &TransactionDatabase,
    min_support: f64,
    max_len: Option<ItemsetLength>,
    generation: CandidateGeneration,
) -> SupportTable {
    let N = transactions.len();
    let mut table = SupportTable::new(N);

    if N == 0 || max_len == Some(0) {
        return table;
    }

    // 1-itemset
    let frequent_1_itemset_counts: ItemsetCounts = count_items(transactions)
        .into_iter()
        .filter(|&(_, count)| meets_support(count, N, min_support))
        .map(|(item, count)| (Itemset::singleton(item), count))
        .collect();
    debug!(size = 1, frequent = frequent_1_itemset_counts.len(), "counted itemsets");
    table.insert_level(1, frequent_1_itemset_counts);

    // k-itemset, k >= 2
    let mut working: Vec<&Itemset> = transactions.iter().collect();
    let mut size = 2;
    while max_len.map_or(true, |max| size <= max) {
        let candidates = match table.level(size - 1) {
            Some(prev) => generate_candidates(prev, size, generation),
            None => break,
        };
        if candidates.is_empty() {
            break;
        }

        working.retain(|transaction| transaction.len() >= size);
        let num_candidates = candidates.len();
        let frequent_itemset_counts = count_candidates(candidates, &working, N, min_support);
        debug!(
            size,
            candidates = num_candidates,
            frequent = frequent_itemset_counts.len(),
            "counted itemsets"
        );

        if frequent_itemset_counts.is_empty() {
            break;
        }
        table.insert_level(size, frequent_itemset_counts);
        size += 1;
    }

    info!(
        itemsets = table.len(),
        max_len = table.max_len(),
        "levelwise discovery finished"
    );
    table
}

/// Occurrences of every item, one scan.
fn count_items(transactions: &TransactionDatabase) -> ItemCounts<'_> {
    let mut item_counts: ItemCounts = HashMap::with_capacity(APPROX_NUM_UNIQUE_ITEMS);

    for transaction in transactions {
        for item in transaction {
            *item_counts.entry(item.as_str()).or_insert(0) += 1;
        }
    }

    item_counts
}

/// Count every candidate against the transactions and keep the frequent ones.
fn count_candidates(
    candidates: Vec<Itemset>,
    transactions: &[&Itemset],
    N: usize,
    min_support: f64,
) -> ItemsetCounts {
    candidates
        .into_par_iter()
        .filter_map(|candidate| {
            let candidate_count = transactions
                .iter()
                .filter(|transaction| candidate.is_subset(transaction))
                .count();
            if meets_support(candidate_count, N, min_support) {
                Some((candidate, candidate_count))
            } else {
                None
            }
        })
        .collect()
}
