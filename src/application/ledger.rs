use super::locks::AccountLocks;
use crate::domain::account::{Account, AccountId, Amount};
use crate::domain::loan::Loan;
use crate::domain::ports::{
    Commit, SharedAccountStore, SharedCommitStore, SharedTransactionStore,
};
use crate::domain::transaction::{
    Movement, Transaction, TransactionId, TransactionKind, TransactionStatus,
};
use crate::error::{BankError, Result};
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

/// A movement as submitted by a caller whose shape is not yet trusted.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    pub kind: String,
    pub amount: Decimal,
    pub description: String,
    pub source: Option<AccountId>,
    pub destination: Option<AccountId>,
}

impl TransactionRequest {
    /// Checks which account references the kind requires and builds the
    /// typed movement. A deposit credits `destination`.
    pub fn to_movement(&self) -> Result<(Movement, Amount)> {
        let kind: TransactionKind = self.kind.parse()?;
        let amount = Amount::new(self.amount)?;
        let required = |id: Option<AccountId>, field: &str| {
            id.ok_or_else(|| {
                BankError::validation(format!("{field} account is required for {kind}"))
            })
        };
        let movement = match kind {
            TransactionKind::Deposit => Movement::Deposit {
                account: required(self.destination, "destination")?,
            },
            TransactionKind::Withdrawal => Movement::Withdrawal {
                account: required(self.source, "source")?,
            },
            TransactionKind::Transfer => Movement::Transfer {
                source: required(self.source, "source")?,
                destination: required(self.destination, "destination")?,
            },
        };
        Ok((movement, amount))
    }
}

/// Applies deposits, withdrawals and transfers to account balances.
///
/// Every processed movement produces a persisted [`Transaction`]. Business
/// rule outcomes (insufficient funds, inactive account) end it FAILED and
/// are returned as a normal result; malformed requests, unknown accounts and
/// storage errors fail the call itself and record nothing.
///
/// The mutated accounts and the record are written as one [`Commit`], so a
/// storage failure never leaves a balance change without its record.
pub struct LedgerEngine {
    accounts: SharedAccountStore,
    transactions: SharedTransactionStore,
    commits: SharedCommitStore,
    locks: AccountLocks,
}

impl LedgerEngine {
    pub fn new(
        accounts: SharedAccountStore,
        transactions: SharedTransactionStore,
        commits: SharedCommitStore,
        locks: AccountLocks,
    ) -> Self {
        Self {
            accounts,
            transactions,
            commits,
            locks,
        }
    }

    pub async fn process_transaction(&self, request: TransactionRequest) -> Result<Transaction> {
        let (movement, amount) = request.to_movement()?;
        self.execute(movement, amount, request.description).await
    }

    /// Runs one movement start to finish under the locks of every account it
    /// touches: load, validate, mutate, then persist accounts and record.
    pub async fn execute(
        &self,
        movement: Movement,
        amount: Amount,
        description: String,
    ) -> Result<Transaction> {
        self.execute_with_loan(movement, amount, description, None)
            .await
    }

    /// Like [`execute`](Self::execute), and writes `loan` in the same commit
    /// when the movement concludes. A FAILED movement leaves `loan` unsaved.
    #[instrument(skip_all, fields(kind = %movement.kind(), amount = %amount))]
    pub async fn execute_with_loan(
        &self,
        movement: Movement,
        amount: Amount,
        description: String,
        loan: Option<Loan>,
    ) -> Result<Transaction> {
        if let Movement::Transfer {
            source,
            destination,
        } = movement
            && source == destination
        {
            return Err(BankError::validation(
                "Transfer source and destination must differ",
            ));
        }

        let _locks = self.locks.acquire(&movement.accounts()).await;

        let outcome = match movement {
            Movement::Deposit { account } => {
                let mut account = self.load(account).await?;
                account.credit(amount).map(|()| vec![account])
            }
            Movement::Withdrawal { account } => {
                let mut account = self.load(account).await?;
                account.debit(amount).map(|()| vec![account])
            }
            Movement::Transfer {
                source,
                destination,
            } => {
                let mut source = self.load(source).await?;
                let mut destination = self.load(destination).await?;
                source
                    .debit(amount)
                    .and_then(|()| destination.credit(amount))
                    .map(|()| vec![source, destination])
            }
        };
        let outcome = match outcome {
            Err(e) if !e.is_business_rule() => return Err(e),
            outcome => outcome,
        };

        let id = self.transactions.next_id().await?;
        let mut tx = Transaction::pending(id, movement, amount, description);

        let commit = match outcome {
            Ok(accounts) => {
                tx.conclude()?;
                Commit {
                    accounts,
                    transaction: Some(tx.clone()),
                    loan,
                }
            }
            Err(e) => {
                tx.fail(e.to_string())?;
                Commit {
                    transaction: Some(tx.clone()),
                    ..Commit::default()
                }
            }
        };
        self.commits.commit(commit).await?;

        match &tx.failure_reason {
            None => info!(tx = tx.id, "Transaction concluded"),
            Some(reason) => warn!(tx = tx.id, %reason, "Transaction failed"),
        }
        Ok(tx)
    }

    async fn load(&self, id: AccountId) -> Result<Account> {
        self.accounts
            .get(id)
            .await?
            .ok_or_else(|| BankError::not_found("Account", id))
    }

    pub async fn get_transaction(&self, id: TransactionId) -> Result<Transaction> {
        self.transactions
            .get(id)
            .await?
            .ok_or_else(|| BankError::not_found("Transaction", id))
    }

    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        self.transactions.get_all().await
    }

    /// Every transaction where `account` is source or destination, by id.
    pub async fn statement(&self, account: AccountId) -> Result<Vec<Transaction>> {
        self.load(account).await?;
        let mut txs = self.transactions.find_by_account(account).await?;
        txs.sort_by_key(|tx| tx.id);
        Ok(txs)
    }

    /// Count of FAILED records, mostly useful for batch summaries.
    pub async fn failed_count(&self) -> Result<usize> {
        Ok(self
            .transactions
            .get_all()
            .await?
            .iter()
            .filter(|tx| tx.status == TransactionStatus::Failed)
            .count())
    }
}
