//! Transaction management for the record-keeping application.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - The composite filter predicate used by the ledger and report pages
//! - View handlers for transaction-related web pages

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod filter;
mod form;
mod ledger_page;
mod new_page;

pub use core::{
    Transaction, TransactionBuilder, TransactionKind, create_transaction, create_transactions_table,
    get_all_transactions, get_transaction, map_transaction_row,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use filter::TransactionFilter;
pub use ledger_page::{get_credits_page, get_debits_page};
pub use new_page::get_new_transaction_page;

#[cfg(test)]
pub use core::count_transactions;
