use std::collections::BTreeSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    itemset::Itemset,
    types::{Item, ItemsetCounts, ItemsetLength},
};

/// How the level-wise search proposes candidates of the next size.
///
/// Both produce the same frequent itemsets once pruned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateGeneration {
    /// Join frequent itemsets that share all but their last item.
    #[default]
    PrefixJoin,
    /// Every combination of the items still present in the previous level.
    Universe,
}

/// Size-`size` candidates whose every `size - 1` subset is in `prev`.
pub fn generate_candidates(
    prev: &ItemsetCounts,
    size: ItemsetLength,
    generation: CandidateGeneration,
) -> Vec<Itemset> {
    let candidates = match generation {
        CandidateGeneration::PrefixJoin => join_step(prev.keys().collect()),
        CandidateGeneration::Universe => universe_step(prev, size),
    };
    prune_step(candidates, prev)
}

/// https://github.com/tommyod/Efficient-Apriori/blob/master/efficient_apriori/itemsets.py
pub fn join_step(mut itemsets: Vec<&Itemset>) -> Vec<Itemset> {
    if itemsets.is_empty() {
        return vec![];
    }

    itemsets.sort_unstable();

    let mut final_itemsets: Vec<Itemset> = Vec::with_capacity(itemsets.len());
    let mut tail_items: Vec<&Item> = Vec::with_capacity(itemsets.len());

    let mut i = 0;
    while i < itemsets.len() {
        let mut skip = 1;

        let (itemset_last, itemset_first) = match itemsets[i].split_last() {
            Some(split) => split,
            None => {
                i += 1;
                continue;
            }
        };

        tail_items.clear();
        tail_items.push(itemset_last);

        for itemset_n in &itemsets[i + 1..] {
            match itemset_n.split_last() {
                Some((itemset_n_last, itemset_n_first)) if itemset_n_first == itemset_first => {
                    tail_items.push(itemset_n_last);
                    skip += 1;
                }
                _ => break,
            }
        }

        for (&a, &b) in tail_items.iter().tuple_combinations() {
            let mut candidate: Vec<Item> = Vec::with_capacity(itemset_first.len() + 2);
            candidate.extend(itemset_first.iter().cloned());
            candidate.push(a.clone());
            candidate.push(b.clone());
            final_itemsets.push(Itemset::from_sorted(candidate));
        }

        i += skip;
    }

    final_itemsets
}

/// All `size`-combinations over the items appearing in `prev`.
pub fn universe_step(prev: &ItemsetCounts, size: ItemsetLength) -> Vec<Itemset> {
    let items: BTreeSet<&Item> = prev.keys().flat_map(|itemset| itemset.iter()).collect();

    items
        .into_iter()
        .combinations(size)
        .map(|combi| Itemset::from_sorted(combi.into_iter().cloned().collect()))
        .collect()
}

/// Drop candidates with a subset that is not frequent.
pub fn prune_step(candidates: Vec<Itemset>, prev: &ItemsetCounts) -> Vec<Itemset> {
    candidates
        .into_iter()
        .filter(|candidate| has_frequent_subsets(candidate, prev))
        .collect()
}

fn has_frequent_subsets(candidate: &Itemset, prev: &ItemsetCounts) -> bool {
    let size = candidate.len();
    size < 2
        || candidate
            .subsets(size - 1)
            .all(|subset| prev.contains_key(&subset))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::itemset;

    fn counts(itemsets: Vec<Itemset>) -> ItemsetCounts {
        itemsets.into_iter().map(|itemset| (itemset, 1)).collect()
    }

    fn sorted(mut itemsets: Vec<Itemset>) -> Vec<Itemset> {
        itemsets.sort_unstable();
        itemsets
    }

    #[test]
    fn test_join_step() {
        let itemsets = vec![
            itemset!["a", "b", "c"],
            itemset!["a", "b", "d"],
            itemset!["a", "c", "d"],
            itemset!["a", "c", "e"],
            itemset!["b", "c", "d"],
        ];
        let y = join_step(itemsets.iter().collect());
        assert_eq!(y.len(), 2);
        assert!(y.contains(&itemset!["a", "b", "c", "d"]));
        assert!(y.contains(&itemset!["a", "c", "d", "e"]));
    }

    #[test]
    fn test_join_step_2() {
        let itemsets = vec![
            itemset!["a", "b"],
            itemset!["b", "c"],
            itemset!["a", "c"],
            itemset!["a", "d"],
            itemset!["c", "d"],
        ];
        let y = join_step(itemsets.iter().collect());
        assert_eq!(
            sorted(y),
            vec![
                itemset!["a", "b", "c"],
                itemset!["a", "b", "d"],
                itemset!["a", "c", "d"],
            ]
        );
    }

    #[test]
    fn join_of_singletons_is_every_pair() {
        let itemsets = vec![itemset!["c"], itemset!["a"], itemset!["b"]];
        let y = join_step(itemsets.iter().collect());
        assert_eq!(
            sorted(y),
            vec![itemset!["a", "b"], itemset!["a", "c"], itemset!["b", "c"]]
        );
        assert!(join_step(vec![]).is_empty());
    }

    #[test]
    fn prune_drops_candidates_with_infrequent_subsets() {
        let prev = counts(vec![
            itemset!["a", "b", "c"],
            itemset!["a", "b", "d"],
            itemset!["a", "c", "d"],
            itemset!["a", "c", "e"],
            itemset!["b", "c", "d"],
        ]);

        let candidates = generate_candidates(&prev, 4, CandidateGeneration::PrefixJoin);

        assert_eq!(candidates, vec![itemset!["a", "b", "c", "d"]]);
    }

    #[test]
    fn both_generations_agree() {
        let prev = counts(vec![
            itemset!["a", "b"],
            itemset!["b", "c"],
            itemset!["a", "c"],
            itemset!["a", "d"],
            itemset!["c", "d"],
        ]);

        let joined = sorted(generate_candidates(&prev, 3, CandidateGeneration::PrefixJoin));
        let universe = sorted(generate_candidates(&prev, 3, CandidateGeneration::Universe));

        assert_eq!(joined, vec![itemset!["a", "b", "c"], itemset!["a", "c", "d"]]);
        assert_eq!(joined, universe);
    }

    #[test]
    fn universe_step_enumerates_every_combination() {
        let prev = counts(vec![itemset!["a"], itemset!["b"], itemset!["c"], itemset!["d"]]);

        assert_eq!(universe_step(&prev, 2).len(), 6);
        assert_eq!(universe_step(&prev, 3).len(), 4);
        assert!(universe_step(&prev, 5).is_empty());
    }
}
