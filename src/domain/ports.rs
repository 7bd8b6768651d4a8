use super::account::{Account, AccountId};
use super::card::{Card, CardId};
use super::client::{Client, ClientId};
use super::loan::{Loan, LoanId};
use super::transaction::{Transaction, TransactionId};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Reserves the next account identifier.
    async fn next_id(&self) -> Result<AccountId>;
    async fn store(&self, account: Account) -> Result<()>;
    async fn get(&self, id: AccountId) -> Result<Option<Account>>;
    async fn get_all(&self) -> Result<Vec<Account>>;
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn next_id(&self) -> Result<TransactionId>;
    async fn store(&self, tx: Transaction) -> Result<()>;
    async fn get(&self, id: TransactionId) -> Result<Option<Transaction>>;
    async fn get_all(&self) -> Result<Vec<Transaction>>;
    /// Transactions where `account` is the source or the destination.
    async fn find_by_account(&self, account: AccountId) -> Result<Vec<Transaction>>;
}

#[async_trait]
pub trait LoanStore: Send + Sync {
    async fn next_id(&self) -> Result<LoanId>;
    async fn store(&self, loan: Loan) -> Result<()>;
    async fn get(&self, id: LoanId) -> Result<Option<Loan>>;
    async fn get_all(&self) -> Result<Vec<Loan>>;
}

#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn next_id(&self) -> Result<ClientId>;
    async fn store(&self, client: Client) -> Result<()>;
    async fn get(&self, id: ClientId) -> Result<Option<Client>>;
    async fn get_all(&self) -> Result<Vec<Client>>;
    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Client>>;
    /// Removes the client; `false` when there was nothing to remove.
    async fn delete(&self, id: ClientId) -> Result<bool>;
}

#[async_trait]
pub trait CardStore: Send + Sync {
    async fn next_id(&self) -> Result<CardId>;
    async fn store(&self, card: Card) -> Result<()>;
    async fn get(&self, id: CardId) -> Result<Option<Card>>;
    async fn get_all(&self) -> Result<Vec<Card>>;
}

/// Everything one ledger operation writes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Commit {
    pub accounts: Vec<Account>,
    pub transaction: Option<Transaction>,
    /// A loan whose decision depends on the movement in the same commit.
    pub loan: Option<Loan>,
}

/// Persists a [`Commit`] as one unit of work: every row lands or none does.
#[async_trait]
pub trait CommitStore: Send + Sync {
    async fn commit(&self, commit: Commit) -> Result<()>;
}

pub type SharedAccountStore = Arc<dyn AccountStore>;
pub type SharedTransactionStore = Arc<dyn TransactionStore>;
pub type SharedLoanStore = Arc<dyn LoanStore>;
pub type SharedClientStore = Arc<dyn ClientStore>;
pub type SharedCardStore = Arc<dyn CardStore>;
pub type SharedCommitStore = Arc<dyn CommitStore>;

/// The full set of stores a [`crate::application::bank::Bank`] runs on.
#[derive(Clone)]
pub struct Stores {
    pub accounts: SharedAccountStore,
    pub transactions: SharedTransactionStore,
    pub loans: SharedLoanStore,
    pub clients: SharedClientStore,
    pub cards: SharedCardStore,
    pub commits: SharedCommitStore,
}
