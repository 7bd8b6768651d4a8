use crate::error::BankError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;

pub type AccountId = u64;

/// Signed money held by an account.
///
/// Only changes through [`Balance::checked_add`] and [`Balance::checked_sub`],
/// so an out-of-range result surfaces as `None` instead of a panic.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(Decimal);

/// A strictly positive movement amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, BankError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(BankError::validation("Amount must be positive"))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = BankError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn checked_add(self, amount: Amount) -> Option<Self> {
        self.0.checked_add(amount.0).map(Self)
    }

    pub fn checked_sub(self, amount: Amount) -> Option<Self> {
        self.0.checked_sub(amount.0).map(Self)
    }
}

impl Neg for Balance {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    Active,
    Blocked,
    Closed,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Blocked => "BLOCKED",
            Self::Closed => "CLOSED",
        }
    }
}

/// Variant-specific rules of an account.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AccountKind {
    Checking {
        /// Maximum negative balance the account may reach.
        overdraft_limit: Balance,
    },
    Savings {
        annual_yield_rate: Decimal,
        anniversary_date: NaiveDate,
    },
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking { .. } => "checking",
            Self::Savings { .. } => "savings",
        }
    }

    /// Lowest balance a debit may leave behind.
    pub fn balance_floor(&self) -> Balance {
        match self {
            Self::Checking { overdraft_limit } => -*overdraft_limit,
            Self::Savings { .. } => Balance::ZERO,
        }
    }
}

/// A customer account: the unit of value storage.
///
/// Identity, display identifiers and the opening timestamp never change after
/// creation; only `balance` and `status` move.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Account {
    pub id: AccountId,
    pub number: String,
    pub branch: String,
    pub balance: Balance,
    pub status: AccountStatus,
    pub opened_at: DateTime<Utc>,
    pub kind: AccountKind,
}

impl Account {
    pub fn checking(
        id: AccountId,
        number: impl Into<String>,
        branch: impl Into<String>,
        overdraft_limit: Balance,
    ) -> Self {
        Self::open(id, number, branch, Utc::now(), AccountKind::Checking { overdraft_limit })
    }

    /// A savings account whose yield anniversary is its opening date.
    pub fn savings(
        id: AccountId,
        number: impl Into<String>,
        branch: impl Into<String>,
        annual_yield_rate: Decimal,
    ) -> Self {
        let opened_at = Utc::now();
        let kind = AccountKind::Savings {
            annual_yield_rate,
            anniversary_date: opened_at.date_naive(),
        };
        Self::open(id, number, branch, opened_at, kind)
    }

    fn open(
        id: AccountId,
        number: impl Into<String>,
        branch: impl Into<String>,
        opened_at: DateTime<Utc>,
        kind: AccountKind,
    ) -> Self {
        Self {
            id,
            number: number.into(),
            branch: branch.into(),
            balance: Balance::ZERO,
            status: AccountStatus::Active,
            opened_at,
            kind,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    fn ensure_active(&self) -> Result<(), BankError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(BankError::AccountInactive(self.id))
        }
    }

    /// Credits funds to the balance. There is no business ceiling; a result
    /// outside the decimal range is rejected and leaves the balance as is.
    pub fn credit(&mut self, amount: Amount) -> Result<(), BankError> {
        self.ensure_active()?;
        self.balance = self.balance.checked_add(amount).ok_or_else(|| {
            BankError::validation(format!(
                "Crediting {amount} to account {} exceeds the representable balance",
                self.id
            ))
        })?;
        Ok(())
    }

    /// Debits funds if the result stays at or above the variant's floor.
    ///
    /// On rejection the balance is left untouched.
    pub fn debit(&mut self, amount: Amount) -> Result<(), BankError> {
        self.ensure_active()?;
        match self.balance.checked_sub(amount) {
            Some(remaining) if remaining >= self.kind.balance_floor() => {
                self.balance = remaining;
                Ok(())
            }
            // Below the decimal range is below any floor too.
            _ => Err(BankError::InsufficientFunds {
                account: self.id,
                requested: amount.value(),
            }),
        }
    }

    pub fn close(&mut self) -> Result<(), BankError> {
        if self.status == AccountStatus::Closed {
            return Err(BankError::validation(format!(
                "Account {} is already closed",
                self.id
            )));
        }
        self.status = AccountStatus::Closed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn amount(value: Decimal) -> Amount {
        Amount::new(value).unwrap()
    }

    #[test]
    fn test_balance_arithmetic() {
        let balance = Balance::new(dec!(10.0));
        assert_eq!(
            balance.checked_add(amount(dec!(5.0))),
            Some(Balance::new(dec!(15.0)))
        );
        assert_eq!(
            balance.checked_sub(amount(dec!(15.0))),
            Some(Balance::new(dec!(-5.0)))
        );
        assert_eq!(-balance, Balance::new(dec!(-10.0)));
        assert_eq!(Balance::new(Decimal::MAX).checked_add(amount(dec!(1))), None);
        assert_eq!(Balance::new(Decimal::MIN).checked_sub(amount(dec!(1))), None);
    }

    #[test]
    fn test_credit_overflow_is_rejected() {
        let mut account = Account::checking(6, "66666-6", "0001", Balance::ZERO);
        account.credit(amount(Decimal::MAX)).unwrap();

        assert!(matches!(
            account.credit(amount(Decimal::MAX)),
            Err(BankError::ValidationError(_))
        ));
        assert_eq!(account.balance, Balance::new(Decimal::MAX));
    }

    #[test]
    fn test_debit_below_decimal_range_is_insufficient() {
        let mut account =
            Account::checking(7, "77777-7", "0001", Balance::new(Decimal::MAX));
        account.debit(amount(Decimal::MAX)).unwrap();

        assert!(matches!(
            account.debit(amount(Decimal::MAX)),
            Err(BankError::InsufficientFunds { account: 7, .. })
        ));
        assert_eq!(account.balance, Balance::new(Decimal::MIN));
    }

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(1.0)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0.0)),
            Err(BankError::ValidationError(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-1.0)),
            Err(BankError::ValidationError(_))
        ));
    }

    #[test]
    fn test_amount_deserialization_rejects_non_positive() {
        assert!(serde_json::from_str::<Amount>("\"12.5\"").is_ok());
        assert!(serde_json::from_str::<Amount>("\"0\"").is_err());
    }

    #[test]
    fn test_credit() {
        let mut account = Account::checking(1, "11111-1", "0001", Balance::ZERO);
        account.credit(amount(dec!(10.0))).unwrap();
        assert_eq!(account.balance, Balance::new(dec!(10.0)));
    }

    #[test]
    fn test_checking_debit_within_overdraft() {
        let mut account = Account::checking(1, "11111-1", "0001", Balance::new(dec!(50)));
        account.balance = Balance::new(dec!(10));

        account.debit(amount(dec!(60))).unwrap();
        assert_eq!(account.balance, Balance::new(dec!(-50)));
    }

    #[test]
    fn test_checking_debit_beyond_overdraft() {
        let mut account = Account::checking(1, "11111-1", "0001", Balance::new(dec!(50)));
        account.balance = Balance::new(dec!(10));

        let result = account.debit(amount(dec!(60.01)));
        assert!(matches!(result, Err(BankError::InsufficientFunds { .. })));
        assert_eq!(account.balance, Balance::new(dec!(10)));
    }

    #[test]
    fn test_savings_cannot_go_negative() {
        let mut account = Account::savings(2, "22222-2", "0001", dec!(0.05));
        account.balance = Balance::new(dec!(100));

        assert!(account.debit(amount(dec!(100))).is_ok());
        assert_eq!(account.balance, Balance::ZERO);
        assert!(matches!(
            account.debit(amount(dec!(0.01))),
            Err(BankError::InsufficientFunds { .. })
        ));
        assert_eq!(account.balance, Balance::ZERO);
    }

    #[test]
    fn test_savings_anniversary_is_opening_date() {
        let account = Account::savings(2, "22222-2", "0001", dec!(0.05));
        match account.kind {
            AccountKind::Savings {
                anniversary_date, ..
            } => assert_eq!(anniversary_date, account.opened_at.date_naive()),
            AccountKind::Checking { .. } => panic!("expected savings"),
        }
    }

    #[test]
    fn test_inactive_account_rejects_mutation() {
        let mut account = Account::checking(3, "33333-3", "0001", Balance::ZERO);
        account.balance = Balance::new(dec!(100));
        account.close().unwrap();

        assert!(matches!(
            account.credit(amount(dec!(1))),
            Err(BankError::AccountInactive(3))
        ));
        assert!(matches!(
            account.debit(amount(dec!(1))),
            Err(BankError::AccountInactive(3))
        ));
        assert_eq!(account.balance, Balance::new(dec!(100)));
    }

    #[test]
    fn test_blocked_account_is_inactive() {
        let mut account = Account::savings(5, "55555-5", "0001", dec!(0.03));
        account.status = AccountStatus::Blocked;

        assert!(!account.is_active());
        assert!(matches!(
            account.credit(amount(dec!(1))),
            Err(BankError::AccountInactive(5))
        ));
        account.close().unwrap();
        assert_eq!(account.status.as_str(), "CLOSED");
    }

    #[test]
    fn test_close_twice_is_rejected() {
        let mut account = Account::checking(4, "44444-4", "0001", Balance::ZERO);
        account.close().unwrap();
        assert!(matches!(account.close(), Err(BankError::ValidationError(_))));
    }
}
