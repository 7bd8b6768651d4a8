use crate::domain::account::{Account, AccountId};
use crate::domain::card::{Card, CardId};
use crate::domain::client::{Client, ClientId};
use crate::domain::loan::{Loan, LoanId};
use crate::domain::ports::{
    AccountStore, CardStore, ClientStore, Commit, CommitStore, LoanStore, Stores,
    TransactionStore,
};
use crate::domain::transaction::{Transaction, TransactionId};
use crate::error::{BankError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Column Family for storing account states.
pub const CF_ACCOUNTS: &str = "accounts";
/// Column Family for storing transaction history.
pub const CF_TRANSACTIONS: &str = "transactions";
pub const CF_LOANS: &str = "loans";
pub const CF_CLIENTS: &str = "clients";
pub const CF_CARDS: &str = "cards";
/// Column Family holding the last identifier handed out per entity.
pub const CF_SEQUENCES: &str = "sequences";

const COLUMN_FAMILIES: [&str; 6] = [
    CF_ACCOUNTS,
    CF_TRANSACTIONS,
    CF_LOANS,
    CF_CLIENTS,
    CF_CARDS,
    CF_SEQUENCES,
];

/// A persistent store implementation using RocksDB.
///
/// Every entity lives in its own Column Family keyed by its big-endian id,
/// with JSON values. Identifier sequences survive restarts, so a reopened
/// database keeps numbering where the previous run stopped.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    sequence_lock: Arc<Mutex<()>>,
}

fn internal(message: String) -> BankError {
    BankError::InternalError(Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        message,
    )))
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path, creating
    /// any missing column families.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = COLUMN_FAMILIES
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()));
        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            sequence_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Every entity store backed by this database.
    pub fn stores(&self) -> Stores {
        Stores {
            accounts: Arc::new(self.clone()),
            transactions: Arc::new(self.clone()),
            loans: Arc::new(self.clone()),
            clients: Arc::new(self.clone()),
            cards: Arc::new(self.clone()),
            commits: Arc::new(self.clone()),
        }
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            BankError::InternalError(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    fn next_sequence(&self, entity: &str) -> Result<u64> {
        let _guard = self
            .sequence_lock
            .lock()
            .map_err(|_| internal("sequence lock poisoned".to_string()))?;
        let cf = self.cf(CF_SEQUENCES)?;
        let current = match self.db.get_cf(cf, entity.as_bytes())? {
            Some(bytes) => {
                let raw: [u8; 8] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| internal(format!("corrupt {entity} sequence")))?;
                u64::from_be_bytes(raw)
            }
            None => 0,
        };
        let next = current + 1;
        self.db.put_cf(cf, entity.as_bytes(), next.to_be_bytes())?;
        Ok(next)
    }

    fn put_json<T: Serialize>(&self, cf_name: &str, id: u64, value: &T) -> Result<()> {
        let mut batch = WriteBatch::default();
        self.batch_json(&mut batch, cf_name, id, value)?;
        self.db.write(batch)?;
        Ok(())
    }

    fn batch_json<T: Serialize>(
        &self,
        batch: &mut WriteBatch,
        cf_name: &str,
        id: u64,
        value: &T,
    ) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = serde_json::to_vec(value)
            .map_err(|e| internal(format!("Serialization error: {e}")))?;
        batch.put_cf(cf, id.to_be_bytes(), bytes);
        Ok(())
    }

    fn get_json<T: DeserializeOwned>(&self, cf_name: &str, id: u64) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(cf, id.to_be_bytes())? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| internal(format!("Deserialization error: {e}"))),
            None => Ok(None),
        }
    }

    /// Reads a whole column family; big-endian keys keep id order.
    fn scan_json<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut rows = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            let row = serde_json::from_slice(&value)
                .map_err(|e| internal(format!("Failed to deserialize {cf_name}: {e}")))?;
            rows.push(row);
        }
        Ok(rows)
    }
}

#[async_trait]
impl AccountStore for RocksDBStore {
    async fn next_id(&self) -> Result<AccountId> {
        self.next_sequence(CF_ACCOUNTS)
    }

    async fn store(&self, account: Account) -> Result<()> {
        self.put_json(CF_ACCOUNTS, account.id, &account)
    }

    async fn get(&self, id: AccountId) -> Result<Option<Account>> {
        self.get_json(CF_ACCOUNTS, id)
    }

    async fn get_all(&self) -> Result<Vec<Account>> {
        self.scan_json(CF_ACCOUNTS)
    }
}

#[async_trait]
impl TransactionStore for RocksDBStore {
    async fn next_id(&self) -> Result<TransactionId> {
        self.next_sequence(CF_TRANSACTIONS)
    }

    async fn store(&self, tx: Transaction) -> Result<()> {
        self.put_json(CF_TRANSACTIONS, tx.id, &tx)
    }

    async fn get(&self, id: TransactionId) -> Result<Option<Transaction>> {
        self.get_json(CF_TRANSACTIONS, id)
    }

    async fn get_all(&self) -> Result<Vec<Transaction>> {
        self.scan_json(CF_TRANSACTIONS)
    }

    async fn find_by_account(&self, account: AccountId) -> Result<Vec<Transaction>> {
        let all: Vec<Transaction> = self.scan_json(CF_TRANSACTIONS)?;
        Ok(all
            .into_iter()
            .filter(|tx| tx.movement.involves(account))
            .collect())
    }
}

#[async_trait]
impl LoanStore for RocksDBStore {
    async fn next_id(&self) -> Result<LoanId> {
        self.next_sequence(CF_LOANS)
    }

    async fn store(&self, loan: Loan) -> Result<()> {
        self.put_json(CF_LOANS, loan.id, &loan)
    }

    async fn get(&self, id: LoanId) -> Result<Option<Loan>> {
        self.get_json(CF_LOANS, id)
    }

    async fn get_all(&self) -> Result<Vec<Loan>> {
        self.scan_json(CF_LOANS)
    }
}

#[async_trait]
impl ClientStore for RocksDBStore {
    async fn next_id(&self) -> Result<ClientId> {
        self.next_sequence(CF_CLIENTS)
    }

    async fn store(&self, client: Client) -> Result<()> {
        self.put_json(CF_CLIENTS, client.id, &client)
    }

    async fn get(&self, id: ClientId) -> Result<Option<Client>> {
        self.get_json(CF_CLIENTS, id)
    }

    async fn get_all(&self) -> Result<Vec<Client>> {
        self.scan_json(CF_CLIENTS)
    }

    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Client>> {
        let all: Vec<Client> = self.scan_json(CF_CLIENTS)?;
        Ok(all.into_iter().find(|client| client.tax_id == tax_id))
    }

    async fn delete(&self, id: ClientId) -> Result<bool> {
        let cf = self.cf(CF_CLIENTS)?;
        if self.db.get_cf(cf, id.to_be_bytes())?.is_none() {
            return Ok(false);
        }
        self.db.delete_cf(cf, id.to_be_bytes())?;
        Ok(true)
    }
}

#[async_trait]
impl CardStore for RocksDBStore {
    async fn next_id(&self) -> Result<CardId> {
        self.next_sequence(CF_CARDS)
    }

    async fn store(&self, card: Card) -> Result<()> {
        self.put_json(CF_CARDS, card.id, &card)
    }

    async fn get(&self, id: CardId) -> Result<Option<Card>> {
        self.get_json(CF_CARDS, id)
    }

    async fn get_all(&self) -> Result<Vec<Card>> {
        self.scan_json(CF_CARDS)
    }
}

#[async_trait]
impl CommitStore for RocksDBStore {
    /// One `WriteBatch` across the account, transaction and loan column
    /// families; RocksDB applies it entirely or not at all.
    async fn commit(&self, commit: Commit) -> Result<()> {
        let mut batch = WriteBatch::default();
        for account in &commit.accounts {
            self.batch_json(&mut batch, CF_ACCOUNTS, account.id, account)?;
        }
        if let Some(tx) = &commit.transaction {
            self.batch_json(&mut batch, CF_TRANSACTIONS, tx.id, tx)?;
        }
        if let Some(loan) = &commit.loan {
            self.batch_json(&mut batch, CF_LOANS, loan.id, loan)?;
        }
        self.db.write(batch)?;
        Ok(())
    }
}
