//! The composite filter applied to the in-memory transaction collection.
//!
//! Ledger and report pages load the whole collection and select from it with
//! this predicate on every render; nothing is precomputed or cached.

use serde::Deserialize;
use time::Date;

use super::{Transaction, TransactionKind};

/// The sentinel category value meaning "no category constraint".
pub const ALL_CATEGORIES: &str = "all";

/// A composite filter over transactions.
///
/// All provided constraints must hold for a transaction to match; absent
/// constraints are vacuously true. The date range is only active when both
/// bounds are present, matching the reference behavior: a single bound is
/// ignored rather than treated as a half-open range.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionFilter {
    /// Case-insensitive substring matched against the description or category.
    pub search: Option<String>,
    /// Exact category match. `None` or the sentinel "all" means no constraint.
    pub category: Option<String>,
    /// Restrict to credits or debits, for type-scoped views.
    pub kind: Option<TransactionKind>,
    /// Start of the date range, inclusive.
    pub from: Option<Date>,
    /// End of the date range, inclusive.
    pub to: Option<Date>,
}

impl TransactionFilter {
    /// Whether `transaction` satisfies every provided constraint.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.matches_search(transaction)
            && self.matches_category(transaction)
            && self.matches_kind(transaction)
            && self.matches_date_range(transaction)
    }

    /// Select the matching subset of `transactions`, preserving their order.
    pub fn select(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|transaction| self.matches(transaction))
            .cloned()
            .collect()
    }

    fn matches_search(&self, transaction: &Transaction) -> bool {
        let Some(search) = self.search.as_deref() else {
            return true;
        };

        // An empty search box matches everything.
        let needle = search.to_lowercase();
        transaction.description.to_lowercase().contains(&needle)
            || transaction.category.to_lowercase().contains(&needle)
    }

    fn matches_category(&self, transaction: &Transaction) -> bool {
        match self.category.as_deref() {
            None | Some(ALL_CATEGORIES) | Some("") => true,
            Some(category) => transaction.category == category,
        }
    }

    fn matches_kind(&self, transaction: &Transaction) -> bool {
        self.kind.is_none_or(|kind| transaction.kind == kind)
    }

    fn matches_date_range(&self, transaction: &Transaction) -> bool {
        // Both bounds are required for the range to take effect.
        match (self.from, self.to) {
            (Some(from), Some(to)) => from <= transaction.date && transaction.date <= to,
            _ => true,
        }
    }
}
