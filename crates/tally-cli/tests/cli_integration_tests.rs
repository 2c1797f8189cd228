/// CLI integration tests for tally
///
/// These drive the `tally` binary as a black box against a temporary
/// database selected through `TALLY_DATABASE_PATH`.
use predicates::prelude::*;

mod helpers;
use helpers::{assertions, CliTestHarness, TestFixtures};

#[test]
fn test_cli_help_and_version() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["--help"])
        .stdout(predicate::str::contains("recurring"))
        .stdout(predicate::str::contains("reschedule"));

    harness
        .run_success(&["--version"])
        .stdout(predicate::str::contains("tally"));

    harness
        .run_failure(&["invalid-command"])
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_database_path_from_environment() {
    let harness = CliTestHarness::new();
    harness
        .run_success(&["list"])
        .stdout(predicate::str::contains("No transactions found"));
    assert!(harness.db_path().exists());
    assert!(!harness.dir().join("tally.db").exists());
}

#[test]
fn test_add_one_off_and_list() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["add", "Coffee", "4.50", "--date", "2024-03-01", "--paid"])
        .stdout(predicate::str::contains("Added transaction"))
        .stdout(predicate::str::contains("4.50"));

    harness
        .run_success(&["list"])
        .stdout(assertions::has_table_headers())
        .stdout(predicate::str::contains("Coffee"))
        .stdout(predicate::str::contains("2024-03-01"));

    harness
        .run_success(&["list", "--unpaid"])
        .stdout(predicate::str::contains("No transactions found"));
}

#[test]
fn test_add_rejects_bad_input() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&["add", "Refund", "-5"])
        .stderr(assertions::has_error());
    harness
        .run_failure(&["add", "Dinner", "twelve"])
        .stderr(assertions::has_error());
    harness
        .run_failure(&["add", "Gym", "40", "--every", "fortnightly"])
        .stderr(assertions::has_error());
    harness
        .run_failure(&["add", "Gym", "40", "--every", "monthly", "--installments", "3"])
        .stderr(assertions::has_error());
    harness
        .run_failure(&["add", "Laptop", "900", "--installments", "0"])
        .stderr(predicate::str::contains("Invalid recurrence"));
}

#[test]
fn test_recurring_template_generates_series() {
    let harness = CliTestHarness::new();

    let mut args = vec!["add"];
    args.extend(TestFixtures::monthly_rent_args());
    harness
        .run_success(&args)
        .stdout(predicate::str::contains("Created recurring transaction"))
        .stdout(predicate::str::contains("Recurrence: monthly"))
        .stdout(predicate::str::contains("occurrence(s) generated"));

    harness
        .run_success(&["list", "--templates"])
        .stdout(predicate::str::contains("Rent (Template)"))
        .stdout(predicate::str::contains("2024-01-05"));

    harness
        .run_success(&["list"])
        .stdout(predicate::str::contains("2024-02-05"))
        .stdout(predicate::str::contains("2024-03-05"));
}

#[test]
fn test_installment_plan() {
    let harness = CliTestHarness::new();
    let id = harness.add(&TestFixtures::laptop_plan_args());

    harness
        .run_success(&["list", "--series", &id.to_string()[..8]])
        .stdout(predicate::str::contains("1/3"))
        .stdout(predicate::str::contains("2/3"))
        .stdout(predicate::str::contains("3/3"))
        .stdout(predicate::str::contains("2024-03-10"))
        .stdout(predicate::str::contains("2024-04-10").not());
}

#[test]
fn test_pay_cascades_to_existing_occurrence() {
    let harness = CliTestHarness::new();
    let id = harness.add(&TestFixtures::monthly_rent_args());

    harness
        .run_success(&["pay", &id.to_string()])
        .stdout(predicate::str::contains("Paid: 'Rent'"))
        .stdout(predicate::str::contains("2024-02-05 is already scheduled"));
}

#[test]
fn test_edit_transaction() {
    let harness = CliTestHarness::new();
    let id = harness.add(&["Coffee", "4.50", "--date", "2024-03-01"]);

    harness
        .run_success(&["edit", &id.to_string(), "--description", "Espresso", "--amount", "3"])
        .stdout(predicate::str::contains("Updated: 'Espresso'"));
    harness
        .run_success(&["list"])
        .stdout(predicate::str::contains("Espresso"))
        .stdout(predicate::str::contains("3.00"));

    harness
        .run_failure(&["edit", &id.to_string()])
        .stderr(predicate::str::contains("Nothing to change"));
}

#[test]
fn test_cancel_series() {
    let harness = CliTestHarness::new();
    let id = harness.add(&["Streaming", "15", "--date", "tomorrow", "--every", "monthly"]);

    harness
        .run_success(&["cancel", &id.to_string(), "--force"])
        .stdout(predicate::str::contains("Cancelled series 'Streaming'"))
        .stdout(predicate::str::contains("11 future occurrence(s) removed"));

    harness
        .run_success(&["list", "--templates"])
        .stdout(predicate::str::contains("No transactions found"));

    // No longer a template.
    harness
        .run_failure(&["cancel", &id.to_string(), "--force"])
        .stderr(predicate::str::contains("not a recurring template"));
}

#[test]
fn test_reschedule_and_renew() {
    let harness = CliTestHarness::new();
    let id = harness.add(&["Insurance", "80", "--date", "tomorrow", "--every", "monthly"]);

    harness
        .run_success(&["reschedule", &id.to_string(), "--every", "quarterly"])
        .stdout(predicate::str::contains("Rescheduled 'Insurance' to quarterly"))
        .stdout(predicate::str::contains("11 occurrence(s) removed, 3 generated"));

    harness
        .run_success(&["renew"])
        .stdout(predicate::str::contains("Renewed 1 series: 8 occurrence(s) created"));

    harness
        .run_success(&["renew"])
        .stdout(predicate::str::contains("0 occurrence(s) created"));

    harness
        .run_failure(&["reschedule", &id.to_string()])
        .stderr(predicate::str::contains("--every or --installments"));
}

#[test]
fn test_reschedule_of_past_series_is_not_backfilled() {
    let harness = CliTestHarness::new();
    let id = harness.add(&["Gym", "40", "--date", "2024-01-01", "--every", "weekly"]);
    let prefix = &id.to_string()[..8];

    harness
        .run_success(&["reschedule", prefix, "--every", "monthly"])
        .stdout(predicate::str::contains("Rescheduled 'Gym' to monthly"));
    harness.run_success(&["renew"]);

    // Elapsed weekly history stays; the monthly rule only runs forward.
    harness
        .run_success(&["list", "--series", prefix])
        .stdout(predicate::str::contains("2024-01-08"))
        .stdout(predicate::str::contains("2024-02-01").not())
        .stdout(predicate::str::contains("2024-03-01").not());
}

#[test]
fn test_id_resolution_errors() {
    let harness = CliTestHarness::new();
    harness.add(&["Coffee", "4.50"]);

    harness
        .run_failure(&["pay", "abc"])
        .stderr(predicate::str::contains("at least 4 characters"));
    harness
        .run_failure(&["pay", "zzzz"])
        .stderr(predicate::str::contains("Not found"));
}
