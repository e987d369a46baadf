use std::{collections::BTreeSet, slice};

use serde::Serialize;

use crate::{
    itemset::Itemset,
    table::SupportSource,
    types::{Item, SupportCount, Tid},
};

/// The transactions handed to a mining run.
///
/// Items are expected to be cleaned already. Duplicates inside one
/// transaction collapse, empty transactions are kept and count towards the
/// support denominator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionDatabase {
    transactions: Vec<Itemset>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DatabaseStats {
    pub transactions: usize,
    pub unique_items: usize,
    pub total_items: usize,
}

impl TransactionDatabase {
    pub fn new(transactions: Vec<Itemset>) -> Self {
        Self { transactions }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, tid: Tid) -> Option<&Itemset> {
        self.transactions.get(tid)
    }

    pub fn iter(&self) -> slice::Iter<'_, Itemset> {
        self.transactions.iter()
    }

    /// Distinct items over all transactions, sorted.
    pub fn items(&self) -> BTreeSet<&str> {
        self.transactions
            .iter()
            .flat_map(|transaction| transaction.iter().map(Item::as_str))
            .collect()
    }

    /// Number of transactions containing every item of `itemset`.
    pub fn support_count(&self, itemset: &Itemset) -> SupportCount {
        self.transactions
            .iter()
            .filter(|transaction| itemset.is_subset(transaction))
            .count()
    }

    pub fn stats(&self) -> DatabaseStats {
        DatabaseStats {
            transactions: self.len(),
            unique_items: self.items().len(),
            total_items: self.transactions.iter().map(Itemset::len).sum(),
        }
    }
}

impl<T, S> FromIterator<T> for TransactionDatabase
where
    T: IntoIterator<Item = S>,
    S: Into<Item>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Itemset::new).collect())
    }
}

impl<'a> IntoIterator for &'a TransactionDatabase {
    type Item = &'a Itemset;
    type IntoIter = slice::Iter<'a, Itemset>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}

/// Recount by scanning every transaction.
impl SupportSource for TransactionDatabase {
    fn support(&self, itemset: &Itemset) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.support_count(itemset) as f64 / self.len() as f64)
    }
}
