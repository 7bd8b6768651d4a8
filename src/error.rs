use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BankError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Insufficient funds in account {account} for {requested}")]
    InsufficientFunds { account: u64, requested: Decimal },
    #[error("Account {0} is not active")]
    AccountInactive(u64),
    #[error("Duplicate: {0}")]
    Duplicate(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDbError(#[from] rocksdb::Error),
}

impl BankError {
    pub fn not_found(entity: &'static str, id: u64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// Business-rule outcomes that end a movement as FAILED instead of
    /// failing the call.
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            Self::InsufficientFunds { .. } | Self::AccountInactive(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BankError>;
