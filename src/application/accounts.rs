use super::locks::AccountLocks;
use crate::domain::account::{Account, AccountId, Balance};
use crate::domain::ports::SharedAccountStore;
use crate::error::{BankError, Result};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::info;

/// Opening, lookup and closing of accounts. Balances only move through the
/// ledger.
pub struct AccountService {
    accounts: SharedAccountStore,
    locks: AccountLocks,
    openings: Mutex<()>,
}

fn require(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(BankError::validation(format!("{field} must not be blank")))
    } else {
        Ok(value.to_string())
    }
}

impl AccountService {
    pub fn new(accounts: SharedAccountStore, locks: AccountLocks) -> Self {
        Self {
            accounts,
            locks,
            openings: Mutex::new(()),
        }
    }

    pub async fn open_checking(
        &self,
        number: &str,
        branch: &str,
        overdraft_limit: Decimal,
    ) -> Result<Account> {
        if overdraft_limit < Decimal::ZERO {
            return Err(BankError::validation("Overdraft limit must not be negative"));
        }
        let (number, branch) = (require(number, "Account number")?, require(branch, "Branch")?);
        self.open(&number, &branch, |id| {
            Account::checking(id, &number, &branch, Balance::new(overdraft_limit))
        })
        .await
    }

    pub async fn open_savings(
        &self,
        number: &str,
        branch: &str,
        annual_yield_rate: Decimal,
    ) -> Result<Account> {
        if annual_yield_rate < Decimal::ZERO {
            return Err(BankError::validation("Annual yield rate must not be negative"));
        }
        let (number, branch) = (require(number, "Account number")?, require(branch, "Branch")?);
        self.open(&number, &branch, |id| {
            Account::savings(id, &number, &branch, annual_yield_rate)
        })
        .await
    }

    async fn open(
        &self,
        number: &str,
        branch: &str,
        build: impl FnOnce(AccountId) -> Account,
    ) -> Result<Account> {
        let _opening = self.openings.lock().await;
        let taken = self
            .accounts
            .get_all()
            .await?
            .into_iter()
            .any(|existing| existing.number == number && existing.branch == branch);
        if taken {
            return Err(BankError::Duplicate(format!(
                "Account number {number} already exists in branch {branch}"
            )));
        }

        let account = build(self.accounts.next_id().await?);
        self.accounts.store(account.clone()).await?;
        info!(account = account.id, kind = account.kind.as_str(), "Account opened");
        Ok(account)
    }

    pub async fn get_account(&self, id: AccountId) -> Result<Account> {
        self.accounts
            .get(id)
            .await?
            .ok_or_else(|| BankError::not_found("Account", id))
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.accounts.get_all().await
    }

    /// Closes the account; later movements touching it end FAILED.
    pub async fn close_account(&self, id: AccountId) -> Result<Account> {
        let _lock = self.locks.acquire(&[id]).await;
        let mut account = self.get_account(id).await?;
        account.close()?;
        self.accounts.store(account.clone()).await?;
        info!(account = account.id, "Account closed");
        Ok(account)
    }
}
