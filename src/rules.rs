//! Association rules drawn from a [`crate::SupportTable`].

mod rule;
mod search;

use std::{slice, vec};

use serde::Serialize;

pub use rule::Rule;
pub use search::{generate, generate_with};

/// Rules from one mining run, in generation order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn as_slice(&self) -> &[Rule] {
        &self.rules
    }

    pub fn into_vec(self) -> Vec<Rule> {
        self.rules
    }

    /// Rules whose antecedent holds `item`.
    pub fn with_antecedent<'a>(&'a self, item: &'a str) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules
            .iter()
            .filter(move |rule| rule.antecedent.contains(item))
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for RuleSet {
    type Item = Rule;
    type IntoIter = vec::IntoIter<Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
