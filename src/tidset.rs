use std::collections::HashMap;

use bitvec::prelude::*;

use crate::{
    database::TransactionDatabase,
    itemset::Itemset,
    table::SupportSource,
    types::{Item, Tid},
};

/// The transactions containing an item or an itemset, one bit per transaction.
///
/// A tidset is never changed once built; [`TidSet::intersect`] returns a new
/// one, so branches of a depth-first search can share them freely.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TidSet {
    bits: BitVec<usize, Lsb0>,
    len: usize,
}

impl TidSet {
    pub fn empty(universe: usize) -> Self {
        Self {
            bits: BitVec::repeat(false, universe),
            len: 0,
        }
    }

    /// Every transaction of a database with `universe` transactions.
    pub fn full(universe: usize) -> Self {
        Self {
            bits: BitVec::repeat(true, universe),
            len: universe,
        }
    }

    pub fn from_tids(universe: usize, tids: impl IntoIterator<Item = Tid>) -> Self {
        let mut bits: BitVec<usize, Lsb0> = BitVec::repeat(false, universe);
        for tid in tids {
            bits.set(tid, true);
        }
        let len = bits.count_ones();
        Self { bits, len }
    }

    /// Number of transactions in the set.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of transactions in the database the set was built over.
    pub fn universe(&self) -> usize {
        self.bits.len()
    }

    pub fn contains(&self, tid: Tid) -> bool {
        self.bits.get(tid).map_or(false, |bit| *bit)
    }

    pub fn iter(&self) -> impl Iterator<Item = Tid> + '_ {
        self.bits.iter_ones()
    }

    pub fn intersect(&self, other: &TidSet) -> TidSet {
        let mut bits = self.bits.clone();
        bits &= other.bits.as_bitslice();
        let len = bits.count_ones();
        Self { bits, len }
    }
}

/// One [`TidSet`] per distinct item, built in a single scan.
#[derive(Clone, Debug, Default)]
pub struct TidIndex {
    transaction_count: usize,
    tidsets: HashMap<Item, TidSet>,
}

impl TidIndex {
    pub fn build(transactions: &TransactionDatabase) -> Self {
        let transaction_count = transactions.len();

        let mut occurrences: HashMap<&str, Vec<Tid>> = HashMap::new();
        for (tid, transaction) in transactions.iter().enumerate() {
            for item in transaction {
                occurrences.entry(item.as_str()).or_default().push(tid);
            }
        }

        let tidsets = occurrences
            .into_iter()
            .map(|(item, tids)| (item.to_owned(), TidSet::from_tids(transaction_count, tids)))
            .collect();

        Self {
            transaction_count,
            tidsets,
        }
    }

    pub fn transaction_count(&self) -> usize {
        self.transaction_count
    }

    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.tidsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tidsets.is_empty()
    }

    pub fn get(&self, item: &str) -> Option<&TidSet> {
        self.tidsets.get(item)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Item, &TidSet)> {
        self.tidsets.iter()
    }

    /// Transactions containing every item of `itemset`, by intersection.
    /// An item missing from the index yields an empty set.
    pub fn tidset_of(&self, itemset: &Itemset) -> TidSet {
        let mut acc = TidSet::full(self.transaction_count);
        for item in itemset {
            match self.tidsets.get(item) {
                Some(tids) => acc = acc.intersect(tids),
                None => return TidSet::empty(self.transaction_count),
            }
        }
        acc
    }
}

/// Recount by intersecting per-item tidsets.
impl SupportSource for TidIndex {
    fn support(&self, itemset: &Itemset) -> Option<f64> {
        if self.transaction_count == 0 {
            return None;
        }
        let count = match itemset.as_slice() {
            [item] => self.tidsets.get(item).map_or(0, TidSet::len),
            _ => self.tidset_of(itemset).len(),
        };
        Some(count as f64 / self.transaction_count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itemset;

    fn db() -> TransactionDatabase {
        vec![
            vec!["bread", "milk"],
            vec!["bread", "diaper", "beer"],
            vec!["milk", "diaper", "beer"],
            vec!["bread", "milk", "diaper", "beer"],
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn intersection_allocates_a_new_set() {
        let a = TidSet::from_tids(6, [0, 1, 3, 5]);
        let b = TidSet::from_tids(6, [1, 2, 3]);

        let both = a.intersect(&b);

        assert_eq!(both.iter().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(both.len(), 2);
        assert_eq!(a.len(), 4);
        assert_eq!(b.len(), 3);
        assert!(both.contains(3));
        assert!(!both.contains(5));
        assert!(!both.contains(42));
    }

    #[test]
    fn index_has_one_tidset_per_item() {
        let index = TidIndex::build(&db());

        assert_eq!(index.len(), 4);
        assert_eq!(index.transaction_count(), 4);
        assert_eq!(
            index.get("beer").map(|tids| tids.iter().collect::<Vec<_>>()),
            Some(vec![1, 2, 3])
        );
        assert!(index.get("cola").is_none());
    }

    #[test]
    fn support_matches_a_scan() {
        let db = db();
        let index = TidIndex::build(&db);

        for itemset in [
            itemset!["bread"],
            itemset!["bread", "milk"],
            itemset!["diaper", "beer", "milk"],
            itemset!["bread", "cola"],
        ] {
            assert_eq!(index.support(&itemset), db.support(&itemset), "{}", itemset);
        }
        assert_eq!(index.tidset_of(&itemset![]).len(), 4);
    }

    #[test]
    fn empty_database_has_no_support() {
        let index = TidIndex::build(&TransactionDatabase::default());

        assert!(index.is_empty());
        assert_eq!(index.support(&itemset!["bread"]), None);
    }
}
