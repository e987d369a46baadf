use std::fmt::{Display, Formatter, Result};

use serde::Serialize;

use crate::itemset::Itemset;

/// `antecedent => consequent`, drawn from one frequent itemset.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Rule {
    pub antecedent: Itemset,
    pub consequent: Itemset,
    /// Support of antecedent and consequent together.
    pub support: f64,
    pub confidence: f64,
    /// 0 when the consequent's support is unknown or zero.
    pub lift: f64,
}

impl Rule {
    /// The frequent itemset the rule was split from.
    pub fn itemset(&self) -> Itemset {
        self.antecedent.union(&self.consequent)
    }

    /// Whether antecedent and consequent are disjoint and together make up `itemset`.
    pub fn is_split_of(&self, itemset: &Itemset) -> bool {
        !self.antecedent.is_empty()
            && !self.consequent.is_empty()
            && self.antecedent.is_disjoint(&self.consequent)
            && self.antecedent.len() + self.consequent.len() == itemset.len()
            && self.itemset() == *itemset
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "{} => {} (support {:.3}, confidence {:.3}, lift {:.3})",
            self.antecedent, self.consequent, self.support, self.confidence, self.lift
        )
    }
}
