//! Code for creating the user table and fetching the app's single user row.
//!
//! The app is operated by the school's bursar and protected by a single
//! password, so the user table holds at most one row.

use rusqlite::Connection;

use crate::{Error, auth::PasswordHash, database_id::DatabaseId};

/// A user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: DatabaseId,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn create_user(password_hash: PasswordHash, connection: &Connection) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (password) VALUES (?1)",
        (password_hash.as_ref(),),
    )?;

    let id = connection.last_insert_rowid();

    Ok(User { id, password_hash })
}

/// Get the user from the database.
///
/// # Errors
///
/// This function will return an error if:
/// - no password has been registered yet.
/// - there was an error trying to access the database.
pub fn get_user(db_connection: &Connection) -> Result<User, Error> {
    db_connection
        .prepare("SELECT id, password FROM user LIMIT 1")?
        .query_row((), |row| {
            let id = row.get(0)?;
            let raw_password_hash: String = row.get(1)?;

            Ok(User {
                id,
                password_hash: PasswordHash::new_unchecked(&raw_password_hash),
            })
        })
        .map_err(|error| error.into())
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_users(connection: &Connection) -> Result<usize, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM user;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Replace the stored password hash, creating the user row if it does not
/// exist yet.
///
/// Used by the password reset tool and exposed through the library root.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn set_password(password_hash: PasswordHash, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1",
        (password_hash.as_ref(),),
    )?;

    if rows_affected == 0 {
        create_user(password_hash, connection)?;
    }

    Ok(())
}
