//! Frequent itemset discovery. Both strategies fill a [`crate::SupportTable`]
//! with the same itemsets and supports.

pub mod intersection;
pub mod levelwise;
