use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::{rules::RuleSet, types::Item};

/// One suggested item, carrying the metrics of the rule that suggested it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecommendationEntry {
    pub item: Item,
    pub confidence: f64,
    pub support: f64,
    pub lift: f64,
}

/// Items suggested by rules whose antecedent holds `item`, best confidence
/// first, each item once.
///
/// An item that appears in no antecedent gets no suggestions.
pub fn recommend(rules: &RuleSet, item: &str, limit: usize) -> Vec<RecommendationEntry> {
    let mut suggestions: Vec<RecommendationEntry> = rules
        .with_antecedent(item)
        .flat_map(|rule| {
            rule.consequent.iter().map(move |suggested| RecommendationEntry {
                item: suggested.clone(),
                confidence: rule.confidence,
                support: rule.support,
                lift: rule.lift,
            })
        })
        .collect();

    rank(&mut suggestions);

    let mut seen: HashSet<Item> = HashSet::with_capacity(suggestions.len());
    suggestions.retain(|entry| seen.insert(entry.item.clone()));
    suggestions.truncate(limit);

    debug!(item, suggestions = suggestions.len(), "ranked recommendations");
    suggestions
}

/// Combine two ranked lists by item.
///
/// Items on both lists get the mean of each metric; items on one list keep
/// their own values.
pub fn merge(
    first: &[RecommendationEntry],
    second: &[RecommendationEntry],
    limit: usize,
) -> Vec<RecommendationEntry> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut tallies: Vec<Tally<'_>> = Vec::new();

    for entry in first.iter().chain(second) {
        match positions.get(entry.item.as_str()) {
            Some(&position) => tallies[position].add(entry),
            None => {
                positions.insert(entry.item.as_str(), tallies.len());
                tallies.push(Tally::new(entry));
            }
        }
    }

    let mut merged: Vec<RecommendationEntry> = tallies.into_iter().map(Tally::mean).collect();
    rank(&mut merged);
    merged.truncate(limit);
    merged
}

/// Confidence descending; equal confidences keep their order.
fn rank(entries: &mut [RecommendationEntry]) {
    entries.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
}

struct Tally<'a> {
    item: &'a str,
    confidence: f64,
    support: f64,
    lift: f64,
    seen: usize,
}

impl<'a> Tally<'a> {
    fn new(entry: &'a RecommendationEntry) -> Self {
        Self {
            item: &entry.item,
            confidence: entry.confidence,
            support: entry.support,
            lift: entry.lift,
            seen: 1,
        }
    }

    fn add(&mut self, entry: &RecommendationEntry) {
        self.confidence += entry.confidence;
        self.support += entry.support;
        self.lift += entry.lift;
        self.seen += 1;
    }

    fn mean(self) -> RecommendationEntry {
        let seen = self.seen as f64;
        RecommendationEntry {
            item: self.item.to_owned(),
            confidence: self.confidence / seen,
            support: self.support / seen,
            lift: self.lift / seen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{itemset, rules::Rule};

    fn rule(antecedent: &[&str], consequent: &[&str], confidence: f64) -> Rule {
        Rule {
            antecedent: antecedent.iter().copied().collect(),
            consequent: consequent.iter().copied().collect(),
            support: 0.4,
            confidence,
            lift: confidence * 2.0,
        }
    }

    fn entry(item: &str, confidence: f64, support: f64, lift: f64) -> RecommendationEntry {
        RecommendationEntry {
            item: item.to_owned(),
            confidence,
            support,
            lift,
        }
    }

    fn items(entries: &[RecommendationEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.item.as_str()).collect()
    }

    fn rules() -> RuleSet {
        vec![
            rule(&["bread"], &["milk"], 0.5),
            rule(&["bread"], &["beer", "diaper"], 0.7),
            rule(&["bread", "eggs"], &["milk"], 0.9),
            rule(&["milk"], &["bread"], 0.6),
            rule(&["bread"], &["cola"], 0.7),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn best_confidence_per_item_first() {
        let recommendations = recommend(&rules(), "bread", 10);

        assert_eq!(items(&recommendations), vec!["milk", "beer", "diaper", "cola"]);
        assert_eq!(recommendations[0].confidence, 0.9);
        assert_eq!(recommendations[1].lift, 1.4);
    }

    #[test]
    fn truncates_to_limit() {
        assert_eq!(items(&recommend(&rules(), "bread", 2)), vec!["milk", "beer"]);
        assert!(recommend(&rules(), "bread", 0).is_empty());
    }

    #[test]
    fn unknown_item_gets_nothing() {
        assert!(recommend(&rules(), "cola", 10).is_empty());
        assert!(recommend(&rules(), "caviar", 10).is_empty());
        assert!(recommend(&RuleSet::default(), "bread", 10).is_empty());
    }

    #[test]
    fn merge_averages_shared_items() {
        let first = vec![entry("milk", 0.9, 0.4, 1.2), entry("beer", 0.5, 0.2, 1.0)];
        let second = vec![entry("beer", 0.7, 0.4, 2.0), entry("cola", 0.6, 0.1, 0.5)];

        let merged = merge(&first, &second, 10);

        assert_eq!(items(&merged), vec!["milk", "beer", "cola"]);
        let beer = &merged[1];
        assert!((beer.confidence - 0.6).abs() < 1e-12);
        assert!((beer.support - 0.3).abs() < 1e-12);
        assert!((beer.lift - 1.5).abs() < 1e-12);
        assert_eq!(merged[0], first[0]);
    }

    #[test]
    fn merge_of_identical_lists_is_unchanged() {
        let list = recommend(&rules(), "bread", 10);

        assert_eq!(merge(&list, &list, 10), list);
        assert_eq!(merge(&list, &[], 1), list[..1].to_vec());
        assert!(merge(&[], &[], 5).is_empty());
    }

    #[test]
    fn query_item_is_never_suggested() {
        let rules: RuleSet = vec![Rule {
            antecedent: itemset!["bread"],
            consequent: itemset!["milk"],
            support: 0.5,
            confidence: 1.0,
            lift: 1.0,
        }]
        .into_iter()
        .collect();

        assert!(recommend(&rules, "bread", 5)
            .iter()
            .all(|entry| entry.item != "bread"));
    }
}
