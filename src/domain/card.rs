use super::account::AccountId;
use crate::error::BankError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type CardId = u64;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardStatus {
    Active,
    Blocked,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Blocked => "BLOCKED",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CardKind {
    Credit {
        credit_limit: Decimal,
        /// Day of month the bill closes, 1..=31.
        closing_day: u8,
        /// Day of month the bill is due, 1..=31.
        due_day: u8,
    },
    Debit,
}

impl CardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit { .. } => "credit",
            Self::Debit => "debit",
        }
    }
}

/// What every card needs regardless of kind.
#[derive(Debug, Clone, PartialEq)]
pub struct CardDetails {
    pub number: String,
    pub holder_name: String,
    pub account: AccountId,
    pub expires_on: NaiveDate,
}

/// A payment card drawing on one account.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Card {
    pub id: CardId,
    pub number: String,
    pub holder_name: String,
    pub account: AccountId,
    pub issued_at: DateTime<Utc>,
    pub expires_on: NaiveDate,
    pub status: CardStatus,
    pub kind: CardKind,
}

fn day_of_month(day: u8, field: &str) -> Result<u8, BankError> {
    if (1..=31).contains(&day) {
        Ok(day)
    } else {
        Err(BankError::validation(format!(
            "{field} must be between 1 and 31"
        )))
    }
}

impl Card {
    pub fn debit(id: CardId, details: CardDetails) -> Result<Self, BankError> {
        Self::issue(id, details, CardKind::Debit)
    }

    pub fn credit(
        id: CardId,
        details: CardDetails,
        credit_limit: Decimal,
        closing_day: u8,
        due_day: u8,
    ) -> Result<Self, BankError> {
        if credit_limit < Decimal::ZERO {
            return Err(BankError::validation("Credit limit must not be negative"));
        }
        let kind = CardKind::Credit {
            credit_limit,
            closing_day: day_of_month(closing_day, "Closing day")?,
            due_day: day_of_month(due_day, "Due day")?,
        };
        Self::issue(id, details, kind)
    }

    fn issue(id: CardId, details: CardDetails, kind: CardKind) -> Result<Self, BankError> {
        let number = details.number.trim();
        if !(13..=19).contains(&number.len()) || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BankError::validation(
                "Card number must be 13 to 19 digits",
            ));
        }
        let holder_name = details.holder_name.trim();
        if holder_name.is_empty() {
            return Err(BankError::validation("Card holder name must not be blank"));
        }
        let issued_at = Utc::now();
        if details.expires_on <= issued_at.date_naive() {
            return Err(BankError::validation(
                "Card expiry date must be in the future",
            ));
        }

        Ok(Self {
            id,
            number: number.to_string(),
            holder_name: holder_name.to_string(),
            account: details.account,
            issued_at,
            expires_on: details.expires_on,
            status: CardStatus::Active,
            kind,
        })
    }

    /// The number with all but the last four digits hidden.
    pub fn masked_number(&self) -> String {
        let visible = self.number.len().saturating_sub(4);
        format!("{}{}", "*".repeat(visible), &self.number[visible..])
    }

    pub fn block(&mut self) -> Result<(), BankError> {
        self.transition(CardStatus::Active, CardStatus::Blocked)
    }

    pub fn unblock(&mut self) -> Result<(), BankError> {
        self.transition(CardStatus::Blocked, CardStatus::Active)
    }

    fn transition(&mut self, from: CardStatus, to: CardStatus) -> Result<(), BankError> {
        if self.status != from {
            return Err(BankError::validation(format!(
                "Card {} is already {}",
                self.id,
                self.status.as_str()
            )));
        }
        self.status = to;
        Ok(())
    }
}
