use crate::domain::account::{Account, AccountId};
use crate::domain::card::{Card, CardId};
use crate::domain::client::{Client, ClientId};
use crate::domain::loan::{Loan, LoanId};
use crate::domain::ports::{
    AccountStore, CardStore, ClientStore, Commit, CommitStore, LoanStore, Stores,
    TransactionStore,
};
use crate::domain::transaction::{Transaction, TransactionId};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Shared map plus an id sequence starting at 1.
///
/// Uses `Arc<RwLock<BTreeMap<u64, T>>>` so clones share state and listings
/// come back in id order.
struct Table<T> {
    rows: Arc<RwLock<BTreeMap<u64, T>>>,
    sequence: Arc<AtomicU64>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Arc::default(),
            sequence: Arc::default(),
        }
    }
}

impl<T> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            sequence: Arc::clone(&self.sequence),
        }
    }
}

impl<T: Clone> Table<T> {
    fn next_id(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn insert(&self, id: u64, row: T) {
        self.rows.write().await.insert(id, row);
    }

    async fn remove(&self, id: u64) -> bool {
        self.rows.write().await.remove(&id).is_some()
    }

    async fn get(&self, id: u64) -> Option<T> {
        self.rows.read().await.get(&id).cloned()
    }

    async fn all(&self) -> Vec<T> {
        self.rows.read().await.values().cloned().collect()
    }

    async fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows
            .read()
            .await
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }
}

/// A thread-safe in-memory store for accounts.
///
/// Ideal for testing or single-run batches where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: Table<Account>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn next_id(&self) -> Result<AccountId> {
        Ok(self.accounts.next_id())
    }

    async fn store(&self, account: Account) -> Result<()> {
        self.accounts.insert(account.id, account).await;
        Ok(())
    }

    async fn get(&self, id: AccountId) -> Result<Option<Account>> {
        Ok(self.accounts.get(id).await)
    }

    async fn get_all(&self) -> Result<Vec<Account>> {
        Ok(self.accounts.all().await)
    }
}

/// A thread-safe in-memory store for transactions.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    transactions: Table<Transaction>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn next_id(&self) -> Result<TransactionId> {
        Ok(self.transactions.next_id())
    }

    async fn store(&self, tx: Transaction) -> Result<()> {
        self.transactions.insert(tx.id, tx).await;
        Ok(())
    }

    async fn get(&self, id: TransactionId) -> Result<Option<Transaction>> {
        Ok(self.transactions.get(id).await)
    }

    async fn get_all(&self) -> Result<Vec<Transaction>> {
        Ok(self.transactions.all().await)
    }

    async fn find_by_account(&self, account: AccountId) -> Result<Vec<Transaction>> {
        Ok(self
            .transactions
            .filter(|tx| tx.movement.involves(account))
            .await)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryLoanStore {
    loans: Table<Loan>,
}

impl InMemoryLoanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoanStore for InMemoryLoanStore {
    async fn next_id(&self) -> Result<LoanId> {
        Ok(self.loans.next_id())
    }

    async fn store(&self, loan: Loan) -> Result<()> {
        self.loans.insert(loan.id, loan).await;
        Ok(())
    }

    async fn get(&self, id: LoanId) -> Result<Option<Loan>> {
        Ok(self.loans.get(id).await)
    }

    async fn get_all(&self) -> Result<Vec<Loan>> {
        Ok(self.loans.all().await)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryClientStore {
    clients: Table<Client>,
}

impl InMemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientStore for InMemoryClientStore {
    async fn next_id(&self) -> Result<ClientId> {
        Ok(self.clients.next_id())
    }

    async fn store(&self, client: Client) -> Result<()> {
        self.clients.insert(client.id, client).await;
        Ok(())
    }

    async fn get(&self, id: ClientId) -> Result<Option<Client>> {
        Ok(self.clients.get(id).await)
    }

    async fn get_all(&self) -> Result<Vec<Client>> {
        Ok(self.clients.all().await)
    }

    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Client>> {
        Ok(self
            .clients
            .filter(|client| client.tax_id == tax_id)
            .await
            .into_iter()
            .next())
    }

    async fn delete(&self, id: ClientId) -> Result<bool> {
        Ok(self.clients.remove(id).await)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryCardStore {
    cards: Table<Card>,
}

impl InMemoryCardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CardStore for InMemoryCardStore {
    async fn next_id(&self) -> Result<CardId> {
        Ok(self.cards.next_id())
    }

    async fn store(&self, card: Card) -> Result<()> {
        self.cards.insert(card.id, card).await;
        Ok(())
    }

    async fn get(&self, id: CardId) -> Result<Option<Card>> {
        Ok(self.cards.get(id).await)
    }

    async fn get_all(&self) -> Result<Vec<Card>> {
        Ok(self.cards.all().await)
    }
}

/// Writes a [`Commit`] into the account, transaction and loan tables it
/// shares with their stores.
#[derive(Clone)]
pub struct InMemoryCommitStore {
    accounts: Table<Account>,
    transactions: Table<Transaction>,
    loans: Table<Loan>,
}

impl InMemoryCommitStore {
    pub fn new(
        accounts: &InMemoryAccountStore,
        transactions: &InMemoryTransactionStore,
        loans: &InMemoryLoanStore,
    ) -> Self {
        Self {
            accounts: accounts.accounts.clone(),
            transactions: transactions.transactions.clone(),
            loans: loans.loans.clone(),
        }
    }
}

#[async_trait]
impl CommitStore for InMemoryCommitStore {
    async fn commit(&self, commit: Commit) -> Result<()> {
        // Every guard is held before the first insert, always in this order,
        // so readers see all of the commit or none of it.
        let mut accounts = self.accounts.rows.write().await;
        let mut transactions = self.transactions.rows.write().await;
        let mut loans = self.loans.rows.write().await;

        for account in commit.accounts {
            accounts.insert(account.id, account);
        }
        if let Some(tx) = commit.transaction {
            transactions.insert(tx.id, tx);
        }
        if let Some(loan) = commit.loan {
            loans.insert(loan.id, loan);
        }
        Ok(())
    }
}

/// Fresh, empty in-memory stores for every entity.
pub fn in_memory_stores() -> Stores {
    let accounts = InMemoryAccountStore::new();
    let transactions = InMemoryTransactionStore::new();
    let loans = InMemoryLoanStore::new();
    let commits = InMemoryCommitStore::new(&accounts, &transactions, &loans);
    Stores {
        accounts: Arc::new(accounts),
        transactions: Arc::new(transactions),
        loans: Arc::new(loans),
        clients: Arc::new(InMemoryClientStore::new()),
        cards: Arc::new(InMemoryCardStore::new()),
        commits: Arc::new(commits),
    }
}
