use std::collections::{btree_map, BTreeMap};

use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::{
    itemset::Itemset,
    types::{ItemsetCounts, ItemsetLength, SupportCount},
};

/// Anything that can tell the support of an itemset.
///
/// Rule generation falls back to one of these when an itemset it needs is
/// not recorded in the [`SupportTable`].
pub trait SupportSource {
    /// Support as a fraction of all transactions, or `None` when unknown.
    fn support(&self, itemset: &Itemset) -> Option<f64>;
}

/// Whether `count` transactions out of `transaction_count` reach `min_support`.
///
/// Both discovery strategies go through here so they agree on borderline
/// itemsets.
pub fn meets_support(
    count: SupportCount,
    transaction_count: usize,
    min_support: f64,
) -> bool {
    transaction_count > 0 && count as f64 / transaction_count as f64 >= min_support
}

/// Frequent itemsets grouped by size.
///
/// Counts are stored with the number of transactions they were taken from;
/// supports are derived as `count / transaction_count`. A size is present only
/// when at least one itemset of that size is frequent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SupportTable {
    transaction_count: usize,
    levels: BTreeMap<ItemsetLength, ItemsetCounts>,
}

impl SupportTable {
    pub fn new(transaction_count: usize) -> Self {
        Self {
            transaction_count,
            levels: BTreeMap::new(),
        }
    }

    pub fn transaction_count(&self) -> usize {
        self.transaction_count
    }

    pub(crate) fn insert(&mut self, itemset: Itemset, count: SupportCount) {
        self.levels
            .entry(itemset.len())
            .or_default()
            .insert(itemset, count);
    }

    pub(crate) fn insert_level(&mut self, size: ItemsetLength, counts: ItemsetCounts) {
        if counts.is_empty() {
            return;
        }
        debug_assert!(counts.keys().all(|itemset| itemset.len() == size));
        self.levels.entry(size).or_default().extend(counts);
    }

    pub(crate) fn merge(mut self, other: SupportTable) -> SupportTable {
        for (size, counts) in other.levels {
            self.insert_level(size, counts);
        }
        self
    }

    pub fn count(&self, itemset: &Itemset) -> Option<SupportCount> {
        self.levels.get(&itemset.len())?.get(itemset).copied()
    }

    pub fn support(&self, itemset: &Itemset) -> Option<f64> {
        self.count(itemset).map(|count| self.fraction(count))
    }

    pub fn contains(&self, itemset: &Itemset) -> bool {
        self.count(itemset).is_some()
    }

    pub fn level(&self, size: ItemsetLength) -> Option<&ItemsetCounts> {
        self.levels.get(&size)
    }

    /// Sizes that hold at least one itemset, ascending.
    pub fn sizes(&self) -> impl Iterator<Item = ItemsetLength> + '_ {
        self.levels.keys().copied()
    }

    pub fn levels(&self) -> btree_map::Iter<'_, ItemsetLength, ItemsetCounts> {
        self.levels.iter()
    }

    /// Size of the largest frequent itemset, 0 for an empty table.
    pub fn max_len(&self) -> ItemsetLength {
        self.levels.keys().next_back().copied().unwrap_or(0)
    }

    /// Number of frequent itemsets over all sizes.
    pub fn len(&self) -> usize {
        self.levels.values().map(|counts| counts.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Itemset, f64)> + '_ {
        self.levels
            .values()
            .flat_map(|counts| counts.iter())
            .map(move |(itemset, &count)| (itemset, self.fraction(count)))
    }

    /// Itemsets of one size in lexicographic order.
    pub fn sorted_level(&self, size: ItemsetLength) -> Vec<(&Itemset, SupportCount)> {
        let mut entries: Vec<(&Itemset, SupportCount)> = self
            .level(size)
            .map(|counts| counts.iter().map(|(itemset, &count)| (itemset, count)).collect())
            .unwrap_or_default();
        entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        entries
    }

    /// Same itemsets with supports no further apart than `tolerance`.
    pub fn agrees_with(&self, other: &SupportTable, tolerance: f64) -> bool {
        self.len() == other.len()
            && self.iter().all(|(itemset, support)| {
                other
                    .support(itemset)
                    .map_or(false, |theirs| (support - theirs).abs() <= tolerance)
            })
    }

    /// Whether every subset of every recorded itemset is recorded too.
    pub fn is_downward_closed(&self) -> bool {
        self.levels.iter().filter(|(size, _)| **size > 1).all(|(&size, counts)| {
            counts.keys().all(|itemset| {
                itemset
                    .subsets(size - 1)
                    .all(|subset| self.contains(&subset))
            })
        })
    }

    pub(crate) fn fraction(&self, count: SupportCount) -> f64 {
        count as f64 / self.transaction_count as f64
    }
}

impl SupportSource for SupportTable {
    fn support(&self, itemset: &Itemset) -> Option<f64> {
        SupportTable::support(self, itemset)
    }
}

#[derive(Serialize)]
struct SupportEntry<'a> {
    itemset: &'a Itemset,
    support: f64,
}

impl Serialize for SupportTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.levels.len()))?;
        for size in self.sizes() {
            let entries: Vec<SupportEntry<'_>> = self
                .sorted_level(size)
                .into_iter()
                .map(|(itemset, count)| SupportEntry {
                    itemset,
                    support: self.fraction(count),
                })
                .collect();
            map.serialize_entry(&size, &entries)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itemset;
    use maplit::hashmap;

    fn table() -> SupportTable {
        let mut table = SupportTable::new(4);
        table.insert_level(
            1,
            hashmap! {
                itemset!["a"] => 3,
                itemset!["b"] => 3,
                itemset!["c"] => 2,
            },
        );
        table.insert_level(
            2,
            hashmap! {
                itemset!["a", "b"] => 2,
                itemset!["a", "c"] => 2,
            },
        );
        table
    }

    #[test]
    fn supports_are_fractions_of_the_transaction_count() {
        let table = table();

        assert_eq!(table.support(&itemset!["a"]), Some(0.75));
        assert_eq!(table.support(&itemset!["c", "a"]), Some(0.5));
        assert_eq!(table.count(&itemset!["b", "c"]), None);
        assert_eq!(table.len(), 5);
        assert_eq!(table.max_len(), 2);
        assert_eq!(table.sizes().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn empty_levels_are_not_recorded() {
        let mut table = table();
        table.insert_level(3, hashmap! {});

        assert!(table.level(3).is_none());
        assert_eq!(table.max_len(), 2);
        assert!(SupportTable::new(0).is_empty());
    }

    #[test]
    fn threshold_is_inclusive() {
        assert!(meets_support(3, 5, 0.6));
        assert!(!meets_support(2, 5, 0.6));
        assert!(!meets_support(0, 0, 0.1));
    }

    #[test]
    fn downward_closure() {
        let mut table = table();
        assert!(table.is_downward_closed());

        table.insert(itemset!["b", "d"], 1);
        assert!(!table.is_downward_closed());
    }

    #[test]
    fn merge_and_agreement() {
        let mut left = SupportTable::new(4);
        left.insert(itemset!["a"], 3);
        let mut right = SupportTable::new(4);
        right.insert(itemset!["b"], 3);
        right.insert(itemset!["a", "b"], 2);

        let merged = left.merge(right);

        assert_eq!(merged.len(), 3);
        assert!(!merged.agrees_with(&table(), 1e-9));
        assert!(table().agrees_with(&table(), 0.0));
    }

    #[test]
    fn serializes_sorted_by_size_and_itemset() {
        let json = serde_json::to_value(table()).unwrap();

        assert_eq!(json["1"][0]["itemset"], serde_json::json!(["a"]));
        assert_eq!(json["2"][1]["itemset"], serde_json::json!(["a", "c"]));
        assert_eq!(json["2"][1]["support"], serde_json::json!(0.5));
    }
}
