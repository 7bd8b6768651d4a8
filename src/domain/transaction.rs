use super::account::{AccountId, Amount};
use crate::error::BankError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type TransactionId = u64;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Transfer,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "DEPOSIT",
            Self::Withdrawal => "WITHDRAWAL",
            Self::Transfer => "TRANSFER",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEPOSIT" => Ok(Self::Deposit),
            "WITHDRAWAL" => Ok(Self::Withdrawal),
            "TRANSFER" => Ok(Self::Transfer),
            other => Err(BankError::validation(format!(
                "Invalid transaction kind: {other}"
            ))),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The accounts a movement touches, tagged by kind.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(tag = "kind", rename_all = "UPPERCASE")]
pub enum Movement {
    Deposit {
        account: AccountId,
    },
    Withdrawal {
        account: AccountId,
    },
    Transfer {
        source: AccountId,
        destination: AccountId,
    },
}

impl Movement {
    pub fn kind(&self) -> TransactionKind {
        match self {
            Self::Deposit { .. } => TransactionKind::Deposit,
            Self::Withdrawal { .. } => TransactionKind::Withdrawal,
            Self::Transfer { .. } => TransactionKind::Transfer,
        }
    }

    /// Account money leaves, if any.
    pub fn source(&self) -> Option<AccountId> {
        match *self {
            Self::Deposit { .. } => None,
            Self::Withdrawal { account } => Some(account),
            Self::Transfer { source, .. } => Some(source),
        }
    }

    /// Account money arrives in, if any.
    pub fn destination(&self) -> Option<AccountId> {
        match *self {
            Self::Deposit { account } => Some(account),
            Self::Withdrawal { .. } => None,
            Self::Transfer { destination, .. } => Some(destination),
        }
    }

    pub fn involves(&self, account: AccountId) -> bool {
        self.source() == Some(account) || self.destination() == Some(account)
    }

    /// Every account touched, ascending and without duplicates.
    pub fn accounts(&self) -> Vec<AccountId> {
        let mut ids: Vec<AccountId> = self.source().into_iter().chain(self.destination()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Pending,
    Concluded,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Concluded => "CONCLUDED",
            Self::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// A recorded money movement.
///
/// Created PENDING and settled exactly once into CONCLUDED or FAILED within
/// the call that processes it.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transaction {
    pub id: TransactionId,
    pub movement: Movement,
    pub amount: Amount,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl Transaction {
    pub fn pending(
        id: TransactionId,
        movement: Movement,
        amount: Amount,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            movement,
            amount,
            description: description.into(),
            timestamp: Utc::now(),
            status: TransactionStatus::Pending,
            failure_reason: None,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.movement.kind()
    }

    pub fn conclude(&mut self) -> Result<(), BankError> {
        self.settle(TransactionStatus::Concluded)
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), BankError> {
        self.settle(TransactionStatus::Failed)?;
        self.failure_reason = Some(reason.into());
        Ok(())
    }

    fn settle(&mut self, status: TransactionStatus) -> Result<(), BankError> {
        if self.status.is_terminal() {
            return Err(BankError::validation(format!(
                "Transaction {} is already {}",
                self.id,
                self.status.as_str()
            )));
        }
        self.status = status;
        Ok(())
    }
}
