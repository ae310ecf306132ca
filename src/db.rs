//! Sets up the application's database schema.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, auth::create_user_table, transaction::create_transactions_table};

/// Create the application's tables if they do not exist.
///
/// The tables are created in a single exclusive transaction so that two
/// server processes pointed at the same file cannot interleave schema
/// statements.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_transactions_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod db_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_creates_tables() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        let table_count: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master \
                 WHERE type = 'table' AND name IN ('user', 'transactions')",
                (),
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(table_count, 2);
    }

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();
        initialize(&connection).unwrap();
    }
}
