use super::account::AccountId;
use super::client::ClientId;
use crate::error::BankError;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

pub type LoanId = u64;

/// Decimal places kept on derived loan amounts.
pub const MONEY_SCALE: u32 = 2;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoanStatus {
    Pending,
    Approved,
    Rejected,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

/// Loan terms as submitted by the borrower.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanTerms {
    pub requested_amount: Decimal,
    /// Fraction per month, e.g. `0.02` for 2%.
    pub monthly_interest_rate: Decimal,
    pub installment_count: u32,
}

/// Amounts derived from [`LoanTerms`] at request time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Repayment {
    pub total_amount: Decimal,
    pub installment_amount: Decimal,
}

/// `base ^ exp` by repeated squaring, `None` once the decimal range is left.
fn checked_pow(base: Decimal, mut exp: u32) -> Option<Decimal> {
    let mut result = Decimal::ONE;
    let mut square = base;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result.checked_mul(square)?;
        }
        exp >>= 1;
        if exp > 0 {
            square = square.checked_mul(square)?;
        }
    }
    Some(result)
}

fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

impl LoanTerms {
    pub fn validate(&self) -> Result<(), BankError> {
        if self.requested_amount <= Decimal::ZERO {
            return Err(BankError::validation("Requested amount must be positive"));
        }
        if self.monthly_interest_rate < Decimal::ZERO {
            return Err(BankError::validation(
                "Monthly interest rate must not be negative",
            ));
        }
        if self.installment_count == 0 {
            return Err(BankError::validation(
                "Installment count must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Compound interest over the installment horizon:
    /// `total = requested * (1 + rate) ^ installments`,
    /// `installment = total / installments`, both rounded half-up to cents.
    pub fn repayment(&self) -> Result<Repayment, BankError> {
        self.validate()?;

        let overflow = || BankError::validation("Loan terms overflow decimal range");
        let total = Decimal::ONE
            .checked_add(self.monthly_interest_rate)
            .and_then(|factor| checked_pow(factor, self.installment_count))
            .and_then(|growth| self.requested_amount.checked_mul(growth))
            .ok_or_else(overflow)?;
        let installment = total
            .checked_div(Decimal::from(self.installment_count))
            .ok_or_else(overflow)?;

        Ok(Repayment {
            total_amount: round_half_up(total),
            installment_amount: round_half_up(installment),
        })
    }
}

/// A loan request and its single decision.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Loan {
    pub id: LoanId,
    pub requested_amount: Decimal,
    pub monthly_interest_rate: Decimal,
    pub installment_count: u32,
    pub total_amount: Decimal,
    pub installment_amount: Decimal,
    pub borrower: ClientId,
    pub credit_account: AccountId,
    pub status: LoanStatus,
    pub approved_amount: Option<Decimal>,
    pub rejection_reason: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn request(
        id: LoanId,
        terms: LoanTerms,
        borrower: ClientId,
        credit_account: AccountId,
    ) -> Result<Self, BankError> {
        let repayment = terms.repayment()?;
        Ok(Self {
            id,
            requested_amount: terms.requested_amount,
            monthly_interest_rate: terms.monthly_interest_rate,
            installment_count: terms.installment_count,
            total_amount: repayment.total_amount,
            installment_amount: repayment.installment_amount,
            borrower,
            credit_account,
            status: LoanStatus::Pending,
            approved_amount: None,
            rejection_reason: None,
            requested_at: Utc::now(),
            decided_at: None,
        })
    }

    fn ensure_pending(&self) -> Result<(), BankError> {
        if self.status == LoanStatus::Pending {
            Ok(())
        } else {
            Err(BankError::validation(format!(
                "Loan {} is already {}",
                self.id,
                self.status.as_str()
            )))
        }
    }

    /// Approves the loan for `amount`, which may differ from the request.
    pub fn approve(&mut self, amount: Decimal) -> Result<(), BankError> {
        self.ensure_pending()?;
        self.status = LoanStatus::Approved;
        self.approved_amount = Some(amount);
        self.decided_at = Some(Utc::now());
        Ok(())
    }

    pub fn reject(&mut self, reason: Option<&str>) -> Result<(), BankError> {
        let reason = match reason {
            Some(reason) if !reason.trim().is_empty() => reason,
            _ => {
                return Err(BankError::validation(
                    "Rejection reason is required and must not be blank",
                ));
            }
        };
        self.ensure_pending()?;
        self.status = LoanStatus::Rejected;
        self.rejection_reason = Some(reason.to_string());
        self.decided_at = Some(Utc::now());
        Ok(())
    }
}
