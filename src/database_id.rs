/// Database row identifier.
pub type DatabaseId = i64;
/// Database row identifier for a transaction.
pub type TransactionId = DatabaseId;
