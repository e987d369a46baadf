//! Depth-first (Eclat) discovery: itemsets sharing a prefix are extended by
//! intersecting their tidsets, so each support is known as soon as the
//! itemset is formed and no candidate ever needs pruning.

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::{
    database::TransactionDatabase,
    itemset::Itemset,
    table::{meets_support, SupportTable},
    tidset::{TidIndex, TidSet},
    types::ItemsetLength,
};

/// An itemset together with the transactions containing it.
type Member = (Itemset, TidSet);

/// Frequent itemsets of every size.
pub fn discover(transactions: &TransactionDatabase, min_support: f64) -> SupportTable {
    discover_with(transactions, min_support, None)
}

/// Frequent itemsets of at most `max_len` items.
pub fn discover_with(
    transactions: &TransactionDatabase,
    min_support: f64,
    max_len: Option<ItemsetLength>,
) -> SupportTable {
    let index = TidIndex::build(transactions);
    discover_indexed(&index, min_support, max_len)
}

/// Mine from a prebuilt index, so the caller can reuse it afterwards.
#[instrument(
    skip(index),
    fields(n_transactions = index.transaction_count(), n_items = index.len())
)]
pub fn discover_indexed(
    index: &TidIndex,
    min_support: f64,
    max_len: Option<ItemsetLength>,
) -> SupportTable {
    let transaction_count = index.transaction_count();
    let mut table = SupportTable::new(transaction_count);

    if transaction_count == 0 || max_len == Some(0) {
        return table;
    }

    let mut frequent: Vec<Member> = index
        .iter()
        .filter(|(_, tids)| meets_support(tids.len(), transaction_count, min_support))
        .map(|(item, tids)| (Itemset::singleton(item.as_str()), tids.clone()))
        .collect();
    frequent.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
    debug!(size = 1, frequent = frequent.len(), "collected frequent items");

    for (itemset, tids) in &frequent {
        table.insert(itemset.clone(), tids.len());
    }

    let search = Search {
        transaction_count,
        min_support,
        max_len,
    };
    if frequent.len() >= 2 && search.may_grow(1) {
        let extended = (0..frequent.len())
            .into_par_iter()
            .map(|i| {
                let mut branch = SupportTable::new(transaction_count);
                search.extend(&frequent, i, &mut branch);
                branch
            })
            .reduce(|| SupportTable::new(transaction_count), SupportTable::merge);
        table = table.merge(extended);
    }

    info!(
        itemsets = table.len(),
        max_len = table.max_len(),
        "intersection discovery finished"
    );
    table
}

struct Search {
    transaction_count: usize,
    min_support: f64,
    max_len: Option<ItemsetLength>,
}

impl Search {
    /// Whether itemsets of `size` may still be extended by one item.
    fn may_grow(&self, size: ItemsetLength) -> bool {
        self.max_len.map_or(true, |max| size < max)
    }

    /// Join `class[i]` with every later member of its class, record the
    /// frequent unions, and recurse into the class they form.
    fn extend(&self, class: &[Member], i: usize, table: &mut SupportTable) {
        let (prefix, prefix_tids) = &class[i];

        let next: Vec<Member> = class[i + 1..]
            .iter()
            .filter_map(|(other, other_tids)| {
                let tids = prefix_tids.intersect(other_tids);
                if meets_support(tids.len(), self.transaction_count, self.min_support) {
                    Some((prefix.union(other), tids))
                } else {
                    None
                }
            })
            .collect();

        for (itemset, tids) in &next {
            table.insert(itemset.clone(), tids.len());
        }

        if next.len() < 2 || !self.may_grow(prefix.len() + 1) {
            return;
        }
        for j in 0..next.len() {
            self.extend(&next, j, table);
        }
    }
}
