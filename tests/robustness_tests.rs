use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[test]
fn test_malformed_csv_handling() {
    let csv_file = tempfile::NamedTempFile::new().unwrap();
    let mut wtr = csv::Writer::from_path(csv_file.path()).unwrap();
    wtr.write_record(common::HEADER).unwrap();

    wtr.write_record(["open_checking", "", "", "", "", "0", "", "", "11111-1", "0001"])
        .unwrap();
    wtr.write_record(["deposit", "1", "", "", "", "1.0", "", "", "", ""])
        .unwrap();
    // Unknown command
    wtr.write_record(["chargeback", "1", "", "", "", "1.0", "", "", "", ""])
        .unwrap();
    // Missing amount
    wtr.write_record(["deposit", "1", "", "", "", "", "", "", "", ""])
        .unwrap();
    // Text in a numeric column
    wtr.write_record(["deposit", "abc", "", "", "", "1.0", "", "", "", ""])
        .unwrap();
    // Unknown account
    wtr.write_record(["deposit", "9", "", "", "", "1.0", "", "", "", ""])
        .unwrap();
    wtr.write_record(["deposit", "1", "", "", "", "2.0", "", "", "", ""])
        .unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    let mut cmd = Command::new(cargo_bin!("bankcore"));
    cmd.arg(csv_file.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading command"))
        .stderr(predicate::str::contains("Error processing command"))
        .stderr(predicate::str::contains("Invalid transaction kind"))
        .stderr(predicate::str::contains("Account 9 not found"))
        .stdout(predicate::str::contains("1,11111-1,0001,checking,3,ACTIVE"));
}

#[test]
fn test_invalid_amounts_are_rejected() {
    let csv_file = tempfile::NamedTempFile::new().unwrap();
    let mut wtr = csv::Writer::from_path(csv_file.path()).unwrap();
    wtr.write_record(common::HEADER).unwrap();

    wtr.write_record(["open_checking", "", "", "", "", "0", "", "", "11111-1", "0001"])
        .unwrap();
    wtr.write_record(["deposit", "1", "", "", "", "0", "", "", "", ""])
        .unwrap();
    wtr.write_record(["deposit", "1", "", "", "", "-5", "", "", "", ""])
        .unwrap();
    wtr.write_record(["deposit", "1", "", "", "", "not_a_number", "", "", "", ""])
        .unwrap();
    wtr.write_record(["deposit", "1", "", "", "", "5.0", "", "", "", ""])
        .unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    let mut cmd = Command::new(cargo_bin!("bankcore"));
    cmd.arg(csv_file.path()).arg("--report").arg("transactions");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,DEPOSIT,,1,5,CONCLUDED,"))
        .stdout(predicate::str::contains("2,").not());
}
