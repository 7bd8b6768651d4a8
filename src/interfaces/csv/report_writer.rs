use crate::domain::account::Account;
use crate::domain::card::{Card, CardKind};
use crate::domain::loan::Loan;
use crate::domain::transaction::Transaction;
use crate::error::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct AccountRow<'a> {
    id: u64,
    number: &'a str,
    branch: &'a str,
    kind: &'static str,
    balance: Decimal,
    status: &'static str,
}

#[derive(Serialize)]
struct TransactionRow<'a> {
    id: u64,
    kind: &'static str,
    source: Option<u64>,
    destination: Option<u64>,
    amount: Decimal,
    status: &'static str,
    description: &'a str,
}

#[derive(Serialize)]
struct LoanRow<'a> {
    id: u64,
    borrower: u64,
    credit_account: u64,
    requested: Decimal,
    rate: Decimal,
    installments: u32,
    total: Decimal,
    installment: Decimal,
    status: &'static str,
    approved: Option<Decimal>,
    reason: Option<&'a str>,
}

/// Card numbers are masked; only the last four digits are reported.
#[derive(Serialize)]
struct CardRow<'a> {
    id: u64,
    account: u64,
    kind: &'static str,
    number: String,
    holder: &'a str,
    expires_on: NaiveDate,
    status: &'static str,
    credit_limit: Option<Decimal>,
    closing_day: Option<u8>,
    due_day: Option<u8>,
}

/// Writes end-of-run reports as CSV. Decimals are normalized, so `100.00`
/// is written as `100`.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_accounts(&mut self, accounts: &[Account]) -> Result<()> {
        if accounts.is_empty() {
            self.writer
                .write_record(["id", "number", "branch", "kind", "balance", "status"])?;
        }
        for account in accounts {
            self.writer.serialize(AccountRow {
                id: account.id,
                number: &account.number,
                branch: &account.branch,
                kind: account.kind.as_str(),
                balance: account.balance.value().normalize(),
                status: account.status.as_str(),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_transactions(&mut self, transactions: &[Transaction]) -> Result<()> {
        if transactions.is_empty() {
            self.writer.write_record([
                "id",
                "kind",
                "source",
                "destination",
                "amount",
                "status",
                "description",
            ])?;
        }
        for tx in transactions {
            self.writer.serialize(TransactionRow {
                id: tx.id,
                kind: tx.kind().as_str(),
                source: tx.movement.source(),
                destination: tx.movement.destination(),
                amount: tx.amount.value().normalize(),
                status: tx.status.as_str(),
                description: &tx.description,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_loans(&mut self, loans: &[Loan]) -> Result<()> {
        if loans.is_empty() {
            self.writer.write_record([
                "id",
                "borrower",
                "credit_account",
                "requested",
                "rate",
                "installments",
                "total",
                "installment",
                "status",
                "approved",
                "reason",
            ])?;
        }
        for loan in loans {
            self.writer.serialize(LoanRow {
                id: loan.id,
                borrower: loan.borrower,
                credit_account: loan.credit_account,
                requested: loan.requested_amount.normalize(),
                rate: loan.monthly_interest_rate.normalize(),
                installments: loan.installment_count,
                total: loan.total_amount.normalize(),
                installment: loan.installment_amount.normalize(),
                status: loan.status.as_str(),
                approved: loan.approved_amount.map(|amount| amount.normalize()),
                reason: loan.rejection_reason.as_deref(),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_cards(&mut self, cards: &[Card]) -> Result<()> {
        if cards.is_empty() {
            self.writer.write_record([
                "id",
                "account",
                "kind",
                "number",
                "holder",
                "expires_on",
                "status",
                "credit_limit",
                "closing_day",
                "due_day",
            ])?;
        }
        for card in cards {
            let (credit_limit, closing_day, due_day) = match card.kind {
                CardKind::Credit {
                    credit_limit,
                    closing_day,
                    due_day,
                } => (
                    Some(credit_limit.normalize()),
                    Some(closing_day),
                    Some(due_day),
                ),
                CardKind::Debit => (None, None, None),
            };
            self.writer.serialize(CardRow {
                id: card.id,
                account: card.account,
                kind: card.kind.as_str(),
                number: card.masked_number(),
                holder: &card.holder_name,
                expires_on: card.expires_on,
                status: card.status.as_str(),
                credit_limit,
                closing_day,
                due_day,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
