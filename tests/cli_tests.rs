mod common;

use common::{init_db_with_volunteer, setup_test_db, vat};
use predicates::prelude::*;
use serde_json::Value;

#[test]
fn init_creates_the_database() {
    let db_path = setup_test_db("cli_init");
    vat()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Database initialized"));
    assert!(std::path::Path::new(&db_path).exists());

    // Running it again keeps the existing schema.
    vat()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();
}

#[test]
fn registered_volunteer_shows_on_the_roster() {
    let db_path = setup_test_db("cli_roster");
    init_db_with_volunteer(&db_path);

    vat()
        .args(["--db", &db_path, "user", "add", "2", "--name", "bob", "--dept", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("without an eligible role"));

    vat()
        .args(["--db", &db_path, "user", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice").and(predicate::str::contains("bob")));

    vat()
        .args(["--db", &db_path, "roster"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice Doe").and(predicate::str::contains("bob").not()));

    let out = vat()
        .args(["--db", &db_path, "roster", "--dept", "10", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let rows: Value = serde_json::from_slice(&out.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["user_id"], 1);
    assert_eq!(rows[0]["check_in_status"], "not_checked_in");
    assert_eq!(rows[0]["role"], "staff");

    vat()
        .args(["--db", &db_path, "roster", "--dept", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No eligible volunteers"));
}

#[test]
fn check_in_and_out_from_the_command_line() {
    let db_path = setup_test_db("cli_checkin");
    init_db_with_volunteer(&db_path);

    vat()
        .args(["--db", &db_path, "checkin", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked in."));

    // Already checked in: absorbed, not an error.
    vat()
        .args(["--db", &db_path, "checkin", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to do"));

    vat()
        .args(["--db", &db_path, "status", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked in"));

    vat()
        .args([
            "--db",
            &db_path,
            "checkout",
            "1",
            "--operator-id",
            "5",
            "--operator-name",
            "front desk",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked out."));

    vat()
        .args(["--db", &db_path, "checkout", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to do"));

    vat()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("check_in")
                .and(predicate::str::contains("check_out"))
                .and(predicate::str::contains("front desk")),
        );
}

#[test]
fn unknown_volunteer_fails() {
    let db_path = setup_test_db("cli_unknown");
    init_db_with_volunteer(&db_path);

    vat()
        .args(["--db", &db_path, "checkin", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not on the attendance roster"));

    vat()
        .args(["--db", &db_path, "status", "99"])
        .assert()
        .failure();
}

#[test]
fn invalid_role_is_rejected() {
    let db_path = setup_test_db("cli_role");
    vat()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    vat()
        .args(["--db", &db_path, "user", "add", "3", "--name", "carol", "--role", "boss"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid role key: boss"));
}

#[test]
fn decode_activity_tokens() {
    vat()
        .args(["decode", "a1b2c3d4e5f60718293a4b5c6d7e8f90"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Activity id: 16"));

    vat()
        .args(["decode", "not-a-token"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid activity code"));

    vat()
        .args(["decode", "0000001900000000000000000000abcd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("scan the QR code again"));
}

#[test]
fn config_print_shows_the_database_override() {
    let db_path = setup_test_db("cli_config");
    vat()
        .args(["--db", &db_path, "config", "--print"])
        .assert()
        .success()
        .stdout(predicate::str::contains(db_path.as_str()).and(predicate::str::contains("batch_size")));
}
