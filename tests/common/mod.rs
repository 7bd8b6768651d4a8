#![allow(dead_code)]

use bankcore::application::bank::Bank;
use bankcore::config::BankConfig;
use bankcore::domain::account::{AccountId, Amount};
use bankcore::domain::transaction::{Movement, TransactionStatus};
use rust_decimal::Decimal;
use std::io::Error;
use std::path::Path;

pub const HEADER: [&str; 10] = [
    "command",
    "account",
    "counterparty",
    "client",
    "loan",
    "amount",
    "rate",
    "installments",
    "reference",
    "text",
];

/// Opens `count` checking accounts with no overdraft, each funded with
/// `opening_balance`.
pub async fn funded_bank(count: usize, opening_balance: Decimal) -> (Bank, Vec<AccountId>) {
    let bank = Bank::in_memory(BankConfig::default());
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let account = bank
            .accounts()
            .open_checking(&format!("{:05}-{}", i, i % 10), "0001", Decimal::ZERO)
            .await
            .unwrap();
        let tx = bank
            .ledger()
            .execute(
                Movement::Deposit {
                    account: account.id,
                },
                Amount::new(opening_balance).unwrap(),
                "opening".to_string(),
            )
            .await
            .unwrap();
        assert_eq!(tx.status, TransactionStatus::Concluded);
        ids.push(account.id);
    }
    (bank, ids)
}

pub async fn total_balance(bank: &Bank) -> Decimal {
    bank.accounts()
        .list_accounts()
        .await
        .unwrap()
        .iter()
        .map(|account| account.balance.value())
        .sum()
}

/// Writes a batch file: `accounts` funded checking accounts followed by
/// `rows` one-unit transfers between neighbours.
pub fn generate_csv(path: &Path, accounts: usize, rows: usize) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;
    wtr.write_record(HEADER)?;

    for i in 1..=accounts {
        let number = format!("{i:05}-0");
        wtr.write_record(["open_checking", "", "", "", "", "0", "", "", &number, "0001"])?;
        wtr.write_record(["deposit", &i.to_string(), "", "", "", "100", "", "", "", ""])?;
    }
    for i in 0..rows {
        let source = (i % accounts) + 1;
        let destination = (source % accounts) + 1;
        wtr.write_record([
            "transfer",
            &source.to_string(),
            &destination.to_string(),
            "",
            "",
            "1",
            "",
            "",
            "",
            "",
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
