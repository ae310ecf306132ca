//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row, types::ValueRef};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, UtcOffset};

use crate::{
    Error,
    category::DEFAULT_CATEGORY,
    database_id::{DatabaseId, TransactionId},
    dates::{normalize_date_text, parse_canonical_date},
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction brings money in or sends money out.
///
/// The kind determines the sign applied during aggregation: credits add to the
/// balance, debits subtract from it. Amounts themselves are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money received, e.g. a fee payment or donation.
    Credit,
    /// Money paid out, e.g. a salary or rent payment.
    Debit,
}

impl TransactionKind {
    /// The lowercase string stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }

    /// The capitalized label shown in tables and badges.
    pub fn label(self) -> &'static str {
        match self {
            Self::Credit => "Credit",
            Self::Debit => "Debit",
        }
    }

    /// Apply this kind's sign to a positive amount.
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            Self::Credit => amount,
            Self::Debit => -amount,
        }
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            other => Err(Error::InvalidKind(other.to_owned())),
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single financial record: money received (credit) or paid out (debit).
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseId,
    /// Whether the transaction is a credit or a debit.
    pub kind: TransactionKind,
    /// The amount of money received or paid. Always positive; the direction
    /// is carried by `kind`.
    pub amount: f64,
    /// The category label, e.g. "Fee" or "Salary". Free-form text.
    pub category: String,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The calendar day the transaction happened.
    pub date: Date,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(kind: TransactionKind, amount: f64, date: Date) -> TransactionBuilder {
        TransactionBuilder {
            kind,
            amount,
            date,
            category: DEFAULT_CATEGORY.to_owned(),
            description: String::new(),
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Optional fields default to sensible values: the category falls back to
/// "General" and the description to an empty string. The builder is validated
/// when it is handed to [create_transaction] or [update_transaction].
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// Whether the transaction is a credit or a debit.
    pub kind: TransactionKind,
    /// The monetary amount. Must be a positive, finite number.
    pub amount: f64,
    /// The calendar day the transaction happened.
    pub date: Date,
    /// The category label. Must not be empty once trimmed.
    pub category: String,
    /// A human-readable description of the transaction.
    pub description: String,
}

impl TransactionBuilder {
    /// Set the category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Check the invariants that must hold before the transaction is stored.
    ///
    /// # Errors
    /// Returns an [Error::NonPositiveAmount] if the amount is zero, negative,
    /// or not finite, or an [Error::EmptyCategory] if the category is blank.
    fn validate(&self) -> Result<(), Error> {
        if !(self.amount.is_finite() && self.amount > 0.0) {
            return Err(Error::NonPositiveAmount(self.amount));
        }

        if self.category.trim().is_empty() {
            return Err(Error::EmptyCategory);
        }

        Ok(())
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if the amount is not a positive, finite number,
/// - or [Error::EmptyCategory] if the category is blank,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    builder.validate()?;

    let transaction = connection
        .prepare(
            "INSERT INTO transactions (kind, amount, category, description, tx_date)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, kind, amount, category, description, tx_date, created_at",
        )?
        .query_row(
            (
                builder.kind.as_str(),
                builder.amount,
                builder.category.trim(),
                builder.description,
                builder.date,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, kind, amount, category, description, tx_date, created_at
             FROM transactions WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve the full transaction collection, most recent day first.
///
/// This is the whole-collection reload that follows every mutation: list and
/// report pages always work from a fresh copy of the authoritative set.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, kind, amount, category, description, tx_date, created_at
             FROM transactions
             ORDER BY tx_date DESC, created_at DESC, id DESC",
        )?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Replace the stored fields of transaction `id` with the builder's values.
///
/// The update is wholesale: kind, amount, category, description, and date are
/// all overwritten. The ID and creation timestamp never change.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a stored transaction,
/// - or the same validation errors as [create_transaction],
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<(), Error> {
    builder.validate()?;

    let rows_affected = connection.execute(
        "UPDATE transactions
         SET kind = ?1, amount = ?2, category = ?3, description = ?4, tx_date = ?5
         WHERE id = ?6",
        (
            builder.kind.as_str(),
            builder.amount,
            builder.category.trim(),
            builder.description,
            builder.date,
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Delete transaction `id`. The deletion is irreversible.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a stored transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM transactions WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM transactions;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the transactions table in the database.
///
/// The `amount` column deliberately has no type so that rows written by other
/// tools (text amounts included) survive the round trip; [map_transaction_row]
/// owns the coercion back to a number.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transactions_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT NOT NULL CHECK (kind IN ('credit', 'debit')),
            amount NOT NULL,
            category TEXT,
            description TEXT NOT NULL DEFAULT '',
            tx_date TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(tx_date, created_at);",
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
///
/// The decode is total over optional fields, mirroring the shape tolerance of
/// the original store:
/// - a text or integer `amount` is coerced to a float; an unparseable amount
///   becomes `NaN`, which the aggregation engine counts as zero,
/// - a missing category becomes "General",
/// - a missing or malformed `tx_date` falls back to the day of `created_at`.
///
/// Only a structurally broken row (missing ID or kind) is an error.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;

    let kind_text: String = row.get(1)?;
    let kind = kind_text.parse::<TransactionKind>().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("invalid transaction kind {kind_text:?}").into(),
        )
    })?;

    let amount = coerce_amount(row.get_ref(2)?);
    let category: Option<String> = row.get(3)?;
    let description: Option<String> = row.get(4)?;
    let tx_date: Option<String> = row.get(5)?;
    let created_at: String = row.get(6)?;

    Ok(Transaction {
        id,
        kind,
        amount,
        category: category
            .filter(|category| !category.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned()),
        description: description.unwrap_or_default(),
        date: resolve_date(tx_date.as_deref(), &created_at),
    })
}

/// Coerce a stored amount to a float, whatever type the column holds.
fn coerce_amount(value: ValueRef) -> f64 {
    match value {
        ValueRef::Real(amount) => amount,
        ValueRef::Integer(amount) => amount as f64,
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|text| text.trim().parse().ok())
            .unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

/// Resolve a row's calendar day: the explicit date if it is usable, otherwise
/// the day the row was created.
fn resolve_date(tx_date: Option<&str>, created_at: &str) -> Date {
    if let Some(text) = tx_date
        && let Ok(date) = parse_canonical_date(&normalize_date_text(text, UtcOffset::UTC))
    {
        return date;
    }

    parse_canonical_date(&normalize_date_text(created_at, UtcOffset::UTC)).unwrap_or_else(|_| {
        tracing::warn!("transaction row has no usable date, created_at = {created_at:?}");
        OffsetDateTime::UNIX_EPOCH.date()
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        transaction::{
            Transaction, TransactionKind, count_transactions, create_transaction,
            get_all_transactions, get_transaction,
        },
    };

    use super::{delete_transaction, update_transaction};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let amount = 50_000.0;

        let result = create_transaction(
            Transaction::build(TransactionKind::Credit, amount, date!(2024 - 12 - 15))
                .category("Fee")
                .description("Term fees, class 5"),
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.amount, amount);
                assert_eq!(transaction.kind, TransactionKind::Credit);
                assert_eq!(transaction.category, "Fee");
                assert_eq!(transaction.date, date!(2024 - 12 - 15));
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_rejects_non_positive_amounts() {
        let conn = get_test_connection();
        let today = date!(2024 - 12 - 15);

        for amount in [0.0, -45.0, f64::NAN, f64::INFINITY] {
            let result = create_transaction(
                Transaction::build(TransactionKind::Debit, amount, today).category("Bills"),
                &conn,
            );

            assert!(
                matches!(result, Err(Error::NonPositiveAmount(_))),
                "amount {amount} should have been rejected"
            );
        }

        assert_eq!(count_transactions(&conn).unwrap(), 0);
    }

    #[test]
    fn create_rejects_blank_category() {
        let conn = get_test_connection();

        let result = create_transaction(
            Transaction::build(TransactionKind::Credit, 100.0, date!(2024 - 12 - 15))
                .category("  \t"),
            &conn,
        );

        assert_eq!(result, Err(Error::EmptyCategory));
    }

    #[test]
    fn update_replaces_fields_wholesale() {
        let conn = get_test_connection();
        let transaction = create_transaction(
            Transaction::build(TransactionKind::Credit, 100.0, date!(2024 - 01 - 01))
                .category("Fee"),
            &conn,
        )
        .unwrap();

        update_transaction(
            transaction.id,
            Transaction::build(TransactionKind::Debit, 250.0, date!(2024 - 02 - 02))
                .category("Rent")
                .description("February rent"),
            &conn,
        )
        .expect("Could not update transaction");

        let updated = get_transaction(transaction.id, &conn).unwrap();
        assert_eq!(updated.kind, TransactionKind::Debit);
        assert_eq!(updated.amount, 250.0);
        assert_eq!(updated.category, "Rent");
        assert_eq!(updated.description, "February rent");
        assert_eq!(updated.date, date!(2024 - 02 - 02));
        assert_eq!(updated.id, transaction.id);
    }

    #[test]
    fn update_missing_transaction_fails() {
        let conn = get_test_connection();

        let result = update_transaction(
            999,
            Transaction::build(TransactionKind::Credit, 1.0, date!(2024 - 01 - 01)),
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn delete_missing_transaction_fails() {
        let conn = get_test_connection();

        let result = delete_transaction(999, &conn);

        assert_eq!(result, Err(Error::DeleteMissingTransaction));
    }

    #[test]
    fn get_all_returns_most_recent_day_first() {
        let conn = get_test_connection();
        for (amount, date) in [
            (1.0, date!(2024 - 01 - 02)),
            (2.0, date!(2024 - 01 - 03)),
            (3.0, date!(2024 - 01 - 01)),
        ] {
            create_transaction(Transaction::build(TransactionKind::Credit, amount, date), &conn)
                .unwrap();
        }

        let transactions = get_all_transactions(&conn).unwrap();

        let dates: Vec<_> = transactions.iter().map(|t| t.date).collect();
        assert_eq!(
            dates,
            vec![date!(2024 - 01 - 03), date!(2024 - 01 - 02), date!(2024 - 01 - 01)]
        );
    }
}

#[cfg(test)]
mod mapper_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::db::initialize;

    use super::get_transaction;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn text_amount_is_coerced_to_a_number() {
        let conn = get_test_connection();
        conn.execute(
            "INSERT INTO transactions (kind, amount, tx_date) VALUES ('credit', '1234.5', '2024-06-15')",
            (),
        )
        .unwrap();

        let transaction = get_transaction(1, &conn).unwrap();

        assert_eq!(transaction.amount, 1234.5);
    }

    #[test]
    fn unparseable_amount_becomes_nan() {
        let conn = get_test_connection();
        conn.execute(
            "INSERT INTO transactions (kind, amount, tx_date) VALUES ('debit', 'oops', '2024-06-15')",
            (),
        )
        .unwrap();

        let transaction = get_transaction(1, &conn).unwrap();

        assert!(transaction.amount.is_nan());
    }

    #[test]
    fn missing_category_defaults_to_general() {
        let conn = get_test_connection();
        conn.execute(
            "INSERT INTO transactions (kind, amount, tx_date) VALUES ('credit', 10, '2024-06-15')",
            (),
        )
        .unwrap();

        let transaction = get_transaction(1, &conn).unwrap();

        assert_eq!(transaction.category, "General");
    }

    #[test]
    fn missing_date_falls_back_to_creation_day() {
        let conn = get_test_connection();
        conn.execute(
            "INSERT INTO transactions (kind, amount, created_at) \
             VALUES ('credit', 10, '2024-06-15 08:30:00')",
            (),
        )
        .unwrap();

        let transaction = get_transaction(1, &conn).unwrap();

        assert_eq!(transaction.date, date!(2024 - 06 - 15));
    }

    #[test]
    fn malformed_date_falls_back_to_creation_day() {
        let conn = get_test_connection();
        conn.execute(
            "INSERT INTO transactions (kind, amount, tx_date, created_at) \
             VALUES ('credit', 10, 'soon', '2024-06-15 08:30:00')",
            (),
        )
        .unwrap();

        let transaction = get_transaction(1, &conn).unwrap();

        assert_eq!(transaction.date, date!(2024 - 06 - 15));
    }
}
