use std::{cmp::Ordering, fmt, slice};

use itertools::Itertools;
use serde::Serialize;

use crate::types::Item;

/// Build an [`Itemset`] from a list of items.
///
/// ```
/// use basket::itemset;
///
/// assert_eq!(itemset!["milk", "bread"], itemset!["bread", "milk", "bread"]);
/// ```
#[macro_export]
macro_rules! itemset {
    () => {
        $crate::Itemset::default()
    };
    ($($x:expr),+ $(,)?) => {
        $crate::Itemset::new([$($x),+])
    };
}

/// A set of items.
///
/// Items are kept sorted and unique, so two itemsets holding the same items
/// compare and hash equal no matter in which order they were built.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Itemset(Vec<Item>);

impl Itemset {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Item>,
    {
        let mut items: Vec<Item> = items.into_iter().map(Into::into).collect();
        items.sort_unstable();
        items.dedup();
        Self(items)
    }

    pub fn singleton(item: impl Into<Item>) -> Self {
        Self(vec![item.into()])
    }

    /// caller guarantees `items` is strictly increasing
    pub(crate) fn from_sorted(items: Vec<Item>) -> Self {
        debug_assert!(items.windows(2).all(|pair| pair[0] < pair[1]));
        Self(items)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Item> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Item] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Item> {
        self.0
    }

    pub fn contains(&self, item: &str) -> bool {
        self.0
            .binary_search_by(|probe| probe.as_str().cmp(item))
            .is_ok()
    }

    /// Whether every item of `self` is also in `other`.
    pub fn is_subset(&self, other: &Itemset) -> bool {
        if self.len() > other.len() {
            return false;
        }

        let mut theirs = other.0.iter();
        'ours: for item in &self.0 {
            for candidate in theirs.by_ref() {
                match candidate.cmp(item) {
                    Ordering::Less => continue,
                    Ordering::Equal => continue 'ours,
                    Ordering::Greater => return false,
                }
            }
            return false;
        }
        true
    }

    pub fn is_disjoint(&self, other: &Itemset) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            match self.0[i].cmp(&other.0[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => return false,
            }
        }
        true
    }

    pub fn union(&self, other: &Itemset) -> Itemset {
        Self(self.0.iter().merge(other.0.iter()).dedup().cloned().collect())
    }

    pub fn difference(&self, other: &Itemset) -> Itemset {
        Self(
            self.0
                .iter()
                .filter(|item| !other.contains(item))
                .cloned()
                .collect(),
        )
    }

    /// All subsets of the given size, in lexicographic order.
    pub fn subsets(&self, size: usize) -> impl Iterator<Item = Itemset> + '_ {
        self.0.iter().cloned().combinations(size).map(Self)
    }

    /// Split into the leading items and the greatest item.
    pub fn split_last(&self) -> Option<(&Item, &[Item])> {
        self.0.split_last()
    }
}

impl<S: Into<Item>> FromIterator<S> for Itemset {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a Itemset {
    type Item = &'a Item;
    type IntoIter = slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Itemset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.iter().join(", "))
    }
}
