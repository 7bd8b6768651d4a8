//! Maps batch file rows onto [`Bank`] operations.

use crate::application::bank::Bank;
use crate::application::ledger::TransactionRequest;
use crate::application::loans::LoanRequest;
use crate::domain::card::CardDetails;
use crate::error::{BankError, Result};
use crate::interfaces::csv::command_reader::CommandRecord;
use chrono::{Months, NaiveDate, Utc};
use rust_decimal::Decimal;

/// Validity of a card issued without an explicit expiry date.
const DEFAULT_CARD_VALIDITY: Months = Months::new(60);

fn field<T>(value: Option<T>, name: &str, command: &str) -> Result<T> {
    value.ok_or_else(|| BankError::validation(format!("{command} requires '{name}'")))
}

fn text<'a>(value: &'a Option<String>, name: &str, command: &str) -> Result<&'a str> {
    field(value.as_deref(), name, command)
}

fn card_details(record: &CommandRecord, command: &str) -> Result<CardDetails> {
    let expires_on = match record.expires_on {
        Some(date) => date,
        None => default_expiry()?,
    };
    Ok(CardDetails {
        number: text(&record.reference, "reference", command)?.to_string(),
        holder_name: text(&record.text, "text", command)?.to_string(),
        account: field(record.account, "account", command)?,
        expires_on,
    })
}

fn default_expiry() -> Result<NaiveDate> {
    Utc::now()
        .date_naive()
        .checked_add_months(DEFAULT_CARD_VALIDITY)
        .ok_or_else(|| BankError::validation("Card expiry date out of range"))
}

/// Applies one command to the bank.
///
/// Business failures of money movements are recorded by the ledger and are
/// not errors here; everything else that goes wrong is returned.
pub async fn apply(bank: &Bank, record: CommandRecord) -> Result<()> {
    let command = record.command.trim().to_ascii_lowercase();
    let name = command.as_str();
    match name {
        "register_client" => {
            bank.clients()
                .register_client(
                    text(&record.text, "text", name)?,
                    text(&record.reference, "reference", name)?,
                    record.email.as_deref(),
                )
                .await?;
        }
        "update_client" => {
            bank.clients()
                .update_client(
                    field(record.client, "client", name)?,
                    record.text.as_deref(),
                    record.email.as_deref(),
                )
                .await?;
        }
        "delete_client" => {
            bank.clients()
                .delete_client(field(record.client, "client", name)?)
                .await?;
        }
        "issue_debit_card" => {
            bank.cards()
                .issue_debit_card(card_details(&record, name)?)
                .await?;
        }
        "issue_credit_card" => {
            bank.cards()
                .issue_credit_card(
                    card_details(&record, name)?,
                    field(record.amount, "amount", name)?,
                    field(record.closing_day, "closing_day", name)?,
                    field(record.due_day, "due_day", name)?,
                )
                .await?;
        }
        "block_card" => {
            bank.cards()
                .block_card(field(record.card, "card", name)?)
                .await?;
        }
        "unblock_card" => {
            bank.cards()
                .unblock_card(field(record.card, "card", name)?)
                .await?;
        }
        "open_checking" => {
            bank.accounts()
                .open_checking(
                    text(&record.reference, "reference", name)?,
                    text(&record.text, "text", name)?,
                    record.amount.unwrap_or(Decimal::ZERO),
                )
                .await?;
        }
        "open_savings" => {
            bank.accounts()
                .open_savings(
                    text(&record.reference, "reference", name)?,
                    text(&record.text, "text", name)?,
                    record.rate.unwrap_or(Decimal::ZERO),
                )
                .await?;
        }
        "close_account" => {
            bank.accounts()
                .close_account(field(record.account, "account", name)?)
                .await?;
        }
        "request_loan" => {
            bank.loans()
                .request_loan(LoanRequest {
                    requested_amount: field(record.amount, "amount", name)?,
                    monthly_interest_rate: field(record.rate, "rate", name)?,
                    installment_count: field(record.installments, "installments", name)?,
                    borrower: field(record.client, "client", name)?,
                    credit_account: field(record.account, "account", name)?,
                })
                .await?;
        }
        "approve_loan" => {
            bank.loans()
                .approve_loan(
                    field(record.loan, "loan", name)?,
                    field(record.amount, "amount", name)?,
                )
                .await?;
        }
        "reject_loan" => {
            bank.loans()
                .reject_loan(field(record.loan, "loan", name)?, record.text.as_deref())
                .await?;
        }
        // deposit, withdrawal, transfer; the ledger rejects unknown kinds
        _ => {
            let (source, destination) = if name == "deposit" {
                (None, record.account)
            } else {
                (record.account, record.counterparty)
            };
            bank.ledger()
                .process_transaction(TransactionRequest {
                    kind: record.command,
                    amount: field(record.amount, "amount", name)?,
                    description: record.text.unwrap_or_default(),
                    source,
                    destination,
                })
                .await?;
        }
    }
    Ok(())
}
