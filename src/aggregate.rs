//! Summary figures derived from the transaction collection.
//!
//! Provides pure functions computing kind totals, net balance, per-category
//! breakdowns, percentages, and chronological running balances. Everything
//! here is recomputed from scratch on every render over the currently
//! filtered set; no derived value is cached or maintained incrementally,
//! because both filter membership and ordering affect every prefix value.
//!
//! Amounts that arrived from storage as `NaN` (see
//! [crate::transaction::map_transaction_row]) contribute zero everywhere, so
//! a single bad row cannot poison a report.

use crate::transaction::{Transaction, TransactionKind};

/// Clamp a stored amount to something safe to sum.
fn finite_or_zero(amount: f64) -> f64 {
    if amount.is_finite() { amount } else { 0.0 }
}

/// Sum of amounts over records of the given kind. Zero for empty input.
pub fn total_by_kind(transactions: &[Transaction], kind: TransactionKind) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.kind == kind)
        .map(|transaction| finite_or_zero(transaction.amount))
        .sum()
}

/// Total credit minus total debit.
pub fn net_balance(transactions: &[Transaction]) -> f64 {
    total_by_kind(transactions, TransactionKind::Credit)
        - total_by_kind(transactions, TransactionKind::Debit)
}

/// The summed amount and record count for one (kind, category) group.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The kind shared by every record in the group.
    pub kind: TransactionKind,
    /// The category label shared by every record in the group.
    pub category: String,
    /// Unsigned sum of the group's amounts.
    pub amount: f64,
    /// How many records fell into the group.
    pub count: usize,
}

/// Group transactions by (kind, category) pair.
///
/// Groups are ordered by descending amount; ties keep the order in which the
/// group was first encountered (the sort is stable).
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut groups: Vec<CategoryTotal> = Vec::new();

    for transaction in transactions {
        let group = groups
            .iter_mut()
            .find(|group| group.kind == transaction.kind && group.category == transaction.category);

        match group {
            Some(group) => {
                group.amount += finite_or_zero(transaction.amount);
                group.count += 1;
            }
            None => groups.push(CategoryTotal {
                kind: transaction.kind,
                category: transaction.category.clone(),
                amount: finite_or_zero(transaction.amount),
                count: 1,
            }),
        }
    }

    groups.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    groups
}

/// A group's share of its kind's total, as a percentage.
///
/// Guarded against division by zero: when the kind total is zero the share is
/// reported as `0` rather than `NaN` or infinity.
pub fn percent_of_kind_total(group_amount: f64, kind_total: f64) -> f64 {
    if kind_total == 0.0 || !kind_total.is_finite() {
        return 0.0;
    }

    (finite_or_zero(group_amount) / kind_total) * 100.0
}

/// Order transactions chronologically and pair each with the balance after it.
///
/// Records are sorted ascending by date (stable, so same-day records keep
/// their original order), then each credit adds its amount and each debit
/// subtracts its amount from a signed prefix sum. The balance paired with a
/// record is the sum over it and everything before it.
pub fn running_balance(transactions: &[Transaction]) -> Vec<(Transaction, f64)> {
    let mut ordered = transactions.to_vec();
    ordered.sort_by_key(|transaction| transaction.date);

    let mut balance = 0.0;
    ordered
        .into_iter()
        .map(|transaction| {
            balance += transaction.kind.signed(finite_or_zero(transaction.amount));
            (transaction, balance)
        })
        .collect()
}

/// Mean unsigned amount per record. Zero for empty input.
pub fn average_per_transaction(transactions: &[Transaction]) -> f64 {
    if transactions.is_empty() {
        return 0.0;
    }

    let total: f64 = transactions
        .iter()
        .map(|transaction| finite_or_zero(transaction.amount))
        .sum();

    total / transactions.len() as f64
}
