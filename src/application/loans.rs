use super::ledger::LedgerEngine;
use crate::config::BankConfig;
use crate::domain::account::{AccountId, Amount};
use crate::domain::client::ClientId;
use crate::domain::loan::{Loan, LoanId, LoanTerms};
use crate::domain::ports::{SharedAccountStore, SharedClientStore, SharedLoanStore};
use crate::domain::transaction::{Movement, TransactionStatus};
use crate::error::{BankError, Result};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct LoanRequest {
    pub requested_amount: Decimal,
    pub monthly_interest_rate: Decimal,
    pub installment_count: u32,
    pub borrower: ClientId,
    pub credit_account: AccountId,
}

/// Loan request, approval and rejection.
pub struct LoanEngine {
    loans: SharedLoanStore,
    clients: SharedClientStore,
    accounts: SharedAccountStore,
    ledger: Arc<LedgerEngine>,
    config: BankConfig,
    /// Serializes decisions so a loan leaves PENDING exactly once.
    decisions: Mutex<()>,
}

impl LoanEngine {
    pub fn new(
        loans: SharedLoanStore,
        clients: SharedClientStore,
        accounts: SharedAccountStore,
        ledger: Arc<LedgerEngine>,
        config: BankConfig,
    ) -> Self {
        Self {
            loans,
            clients,
            accounts,
            ledger,
            config,
            decisions: Mutex::new(()),
        }
    }

    #[instrument(skip_all, fields(borrower = request.borrower, amount = %request.requested_amount))]
    pub async fn request_loan(&self, request: LoanRequest) -> Result<Loan> {
        let terms = LoanTerms {
            requested_amount: request.requested_amount,
            monthly_interest_rate: request.monthly_interest_rate,
            installment_count: request.installment_count,
        };
        terms.validate()?;

        if self.clients.get(request.borrower).await?.is_none() {
            return Err(BankError::not_found("Client", request.borrower));
        }
        if self.accounts.get(request.credit_account).await?.is_none() {
            return Err(BankError::not_found("Account", request.credit_account));
        }

        let id = self.loans.next_id().await?;
        let loan = Loan::request(id, terms, request.borrower, request.credit_account)?;
        self.loans.store(loan.clone()).await?;

        info!(
            loan = loan.id,
            total = %loan.total_amount,
            installment = %loan.installment_amount,
            "Loan requested"
        );
        Ok(loan)
    }

    #[instrument(skip(self))]
    pub async fn approve_loan(&self, id: LoanId, approved_amount: Decimal) -> Result<Loan> {
        let _decision = self.decisions.lock().await;
        let mut loan = self.get_loan(id).await?;
        loan.approve(approved_amount)?;

        if self.config.credit_on_approval {
            self.disburse(&loan, approved_amount).await?;
        } else {
            self.loans.store(loan.clone()).await?;
        }
        info!(loan = loan.id, approved = %approved_amount, "Loan approved");
        Ok(loan)
    }

    /// Credits the approved amount to the loan's account as a DEPOSIT,
    /// saving the approved loan together with the credit.
    async fn disburse(&self, loan: &Loan, approved_amount: Decimal) -> Result<()> {
        let amount = Amount::new(approved_amount)?;
        let tx = self
            .ledger
            .execute_with_loan(
                Movement::Deposit {
                    account: loan.credit_account,
                },
                amount,
                format!("Loan {} disbursement", loan.id),
                Some(loan.clone()),
            )
            .await?;

        if tx.status == TransactionStatus::Failed {
            warn!(loan = loan.id, tx = tx.id, "Loan disbursement failed");
            return Err(BankError::validation(format!(
                "Loan {} could not be credited to account {}: {}",
                loan.id,
                loan.credit_account,
                tx.failure_reason.unwrap_or_default()
            )));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn reject_loan(&self, id: LoanId, reason: Option<&str>) -> Result<Loan> {
        let _decision = self.decisions.lock().await;
        let mut loan = self.get_loan(id).await?;
        loan.reject(reason)?;
        self.loans.store(loan.clone()).await?;
        info!(loan = loan.id, "Loan rejected");
        Ok(loan)
    }

    pub async fn get_loan(&self, id: LoanId) -> Result<Loan> {
        self.loans
            .get(id)
            .await?
            .ok_or_else(|| BankError::not_found("Loan", id))
    }

    pub async fn list_loans(&self) -> Result<Vec<Loan>> {
        self.loans.get_all().await
    }
}
