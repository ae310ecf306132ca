//! Suggested transaction categories.
//!
//! Categories are free-form labels: the suggested sets below are offered in
//! the forms via a datalist, but any non-empty text the user enters is stored
//! as-is. A stricter vocabulary would silently change which records a report
//! includes, so the looseness is deliberate.

use crate::transaction::TransactionKind;

/// The category given to stored rows that have none.
pub const DEFAULT_CATEGORY: &str = "General";

/// Suggested categories for money coming in.
pub const CREDIT_CATEGORIES: &[&str] = &["Fee", "Donation", "Grant", "Other"];

/// Suggested categories for money going out.
pub const DEBIT_CATEGORIES: &[&str] = &["Salary", "Rent", "Bills", "Supplies", "Other"];

/// The suggested categories for a transaction kind.
pub fn suggested_categories(kind: TransactionKind) -> &'static [&'static str] {
    match kind {
        TransactionKind::Credit => CREDIT_CATEGORIES,
        TransactionKind::Debit => DEBIT_CATEGORIES,
    }
}
