use std::collections::HashMap;

use crate::itemset::Itemset;

/// An already-normalized item identifier.
pub type Item = String;

/// Index of a transaction inside a [`crate::TransactionDatabase`].
pub type Tid = usize;

pub type ItemsetLength = usize;
pub type SupportCount = usize;

pub type ItemCounts<'l> = HashMap<&'l str, SupportCount>;
pub type ItemsetCounts = HashMap<Itemset, SupportCount>;
