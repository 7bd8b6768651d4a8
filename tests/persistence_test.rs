#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

const HEADER: &str =
    "command,account,counterparty,client,loan,amount,rate,installments,reference,text";

fn run(db_path: &std::path::Path, lines: &[&str], report: &str) -> String {
    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "{HEADER}").unwrap();
    for line in lines {
        writeln!(csv, "{line}").unwrap();
    }

    let output = Command::new(cargo_bin!("bankcore"))
        .arg(csv.path())
        .arg("--db-path")
        .arg(db_path)
        .arg("--report")
        .arg(report)
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: open an account and deposit
    let stdout1 = run(
        &db_path,
        &[
            "open_checking,,,,,0,,,11111-1,0001",
            "deposit,1,,,,100.0,,,,",
        ],
        "accounts",
    );
    assert!(stdout1.contains("1,11111-1,0001,checking,100,ACTIVE"));

    // 2. Second run: another deposit and a second account on the same DB
    let stdout2 = run(
        &db_path,
        &[
            "deposit,1,,,,50.0,,,,",
            "open_savings,,,,,,0.05,,22222-2,0001",
        ],
        "accounts",
    );
    assert!(stdout2.contains("1,11111-1,0001,checking,150,ACTIVE"));
    assert!(stdout2.contains("2,22222-2,0001,savings,0,ACTIVE"));

    // 3. Transaction ids keep counting across runs
    let stdout3 = run(&db_path, &[], "transactions");
    assert!(stdout3.contains("1,DEPOSIT,,1,100,CONCLUDED,"));
    assert!(stdout3.contains("2,DEPOSIT,,1,50,CONCLUDED,"));
}

#[test]
fn test_rocksdb_loans_survive_restart() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("loans_db");

    run(
        &db_path,
        &[
            "register_client,,,,,,,,12345678901,Ada Lovelace",
            "open_checking,,,,,0,,,11111-1,0001",
            "request_loan,1,,1,,10000,0.02,12,,",
        ],
        "loans",
    );
    let stdout = run(&db_path, &["approve_loan,,,,1,10000,,,,"], "loans");
    assert!(stdout.contains("1,1,1,10000,0.02,12,12682.42,1056.87,APPROVED,10000,"));
}
