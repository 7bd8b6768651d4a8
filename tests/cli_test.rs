use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

const HEADER: &str =
    "command,account,counterparty,client,loan,amount,rate,installments,reference,text";

fn batch(lines: &[&str]) -> NamedTempFile {
    batch_with_header(HEADER, lines)
}

fn batch_with_header(header: &str, lines: &[&str]) -> NamedTempFile {
    let mut csv = NamedTempFile::new().unwrap();
    writeln!(csv, "{header}").unwrap();
    for line in lines {
        writeln!(csv, "{line}").unwrap();
    }
    csv
}

const SETUP: [&str; 5] = [
    "open_checking,,,,,100,,,11111-1,0001",
    "open_savings,,,,,,0.05,,22222-2,0001",
    "deposit,1,,,,50.5,,,,payroll",
    "transfer,1,2,,,20,,,,savings",
    "withdrawal,2,,,,100,,,,atm",
];

#[test]
fn test_cli_accounts_report() -> Result<(), Box<dyn std::error::Error>> {
    let csv = batch(&SETUP);

    let mut cmd = Command::new(cargo_bin!("bankcore"));
    cmd.arg(csv.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "id,number,branch,kind,balance,status",
        ))
        .stdout(predicate::str::contains("1,11111-1,0001,checking,30.5,ACTIVE"))
        .stdout(predicate::str::contains("2,22222-2,0001,savings,20,ACTIVE"));

    Ok(())
}

#[test]
fn test_cli_transactions_report() -> Result<(), Box<dyn std::error::Error>> {
    let csv = batch(&SETUP);

    let mut cmd = Command::new(cargo_bin!("bankcore"));
    cmd.arg(csv.path()).arg("--report").arg("transactions");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,DEPOSIT,,1,50.5,CONCLUDED,payroll"))
        .stdout(predicate::str::contains("2,TRANSFER,1,2,20,CONCLUDED,savings"))
        .stdout(predicate::str::contains("3,WITHDRAWAL,2,,100,FAILED,atm"));

    Ok(())
}

#[test]
fn test_cli_loans_report() -> Result<(), Box<dyn std::error::Error>> {
    let csv = batch(&[
        "register_client,,,,,,,,12345678901,Ada Lovelace",
        "open_checking,,,,,0,,,11111-1,0001",
        "request_loan,1,,1,,10000,0.02,12,,",
        "request_loan,1,,1,,500,0.01,5,,",
        "approve_loan,,,,1,9000,,,,",
        "reject_loan,,,,2,,,,,Insufficient income",
    ]);

    let mut cmd = Command::new(cargo_bin!("bankcore"));
    cmd.arg(csv.path()).arg("--report").arg("loans");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "1,1,1,10000,0.02,12,12682.42,1056.87,APPROVED,9000,",
        ))
        .stdout(predicate::str::contains("2,1,1,500,0.01,5,"))
        .stdout(predicate::str::contains("REJECTED,,Insufficient income"));

    Ok(())
}

#[test]
fn test_cli_credit_on_approval() -> Result<(), Box<dyn std::error::Error>> {
    let csv = batch(&[
        "register_client,,,,,,,,12345678901,Ada Lovelace",
        "open_checking,,,,,0,,,11111-1,0001",
        "request_loan,1,,1,,1000,0.02,12,,",
        "approve_loan,,,,1,800,,,,",
    ]);

    let mut cmd = Command::new(cargo_bin!("bankcore"));
    cmd.arg(csv.path()).arg("--credit-on-approval");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,11111-1,0001,checking,800,ACTIVE"));

    Ok(())
}

#[test]
fn test_cli_missing_input() {
    let mut cmd = Command::new(cargo_bin!("bankcore"));
    cmd.arg("does/not/exist.csv");

    cmd.assert().failure();
}

#[test]
fn test_cli_cards_report() -> Result<(), Box<dyn std::error::Error>> {
    let header = format!("{HEADER},card,email,expires_on,closing_day,due_day");
    let csv = batch_with_header(
        &header,
        &[
            "open_checking,,,,,0,,,11111-1,0001,,,,,",
            "issue_credit_card,1,,,,1500,,,4111111111111111,Ada Lovelace,,,2099-12-31,5,15",
            "issue_debit_card,1,,,,,,,5555555555554444,Ada Lovelace,,,2099-12-31,,",
            "block_card,,,,,,,,,,2,,,,",
            "issue_debit_card,1,,,,,,,5555555555554444,Ada Lovelace,,,2099-12-31,,",
        ],
    );

    let mut cmd = Command::new(cargo_bin!("bankcore"));
    cmd.arg(csv.path()).arg("--report").arg("cards");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "1,1,credit,************1111,Ada Lovelace,2099-12-31,ACTIVE,1500,5,15",
        ))
        .stdout(predicate::str::contains(
            "2,1,debit,************4444,Ada Lovelace,2099-12-31,BLOCKED,,,",
        ))
        .stdout(predicate::str::contains("3,").not())
        .stdout(predicate::str::contains("4111111111111111").not())
        .stderr(predicate::str::contains("already issued"));

    Ok(())
}

#[test]
fn test_cli_batch_summary_only_at_info() -> Result<(), Box<dyn std::error::Error>> {
    let csv = batch(&SETUP);

    let mut quiet = Command::new(cargo_bin!("bankcore"));
    quiet.arg(csv.path()).env_remove("RUST_LOG");
    quiet
        .assert()
        .success()
        .stderr(predicate::str::contains("Batch finished").not());

    let mut verbose = Command::new(cargo_bin!("bankcore"));
    verbose.arg(csv.path()).env("RUST_LOG", "info");
    verbose
        .assert()
        .success()
        .stderr(predicate::str::contains("Batch finished"));

    Ok(())
}
