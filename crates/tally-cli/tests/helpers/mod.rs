use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

/// Test harness for running CLI commands against a temporary database
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    /// Create a new test harness with a temporary database
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self { temp_dir, db_path }
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("tally").expect("Failed to find tally binary");

        // Keep any tally.toml of the developer out of the picture.
        cmd.current_dir(self.temp_dir.path());
        cmd.env("TALLY_DATABASE_PATH", &self.db_path);
        cmd.env_remove("RUST_LOG");

        cmd
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Runs `add` and returns the id it reports.
    pub fn add(&self, args: &[&str]) -> Uuid {
        let mut full = vec!["add"];
        full.extend_from_slice(args);
        let output = self.run_success(&full).get_output().stdout.clone();
        first_uuid(&String::from_utf8_lossy(&output)).expect("add should print the new id")
    }
}

/// Finds the first UUID in text that may contain ANSI color codes.
pub fn first_uuid(text: &str) -> Option<Uuid> {
    let bytes = text.as_bytes();
    (0..bytes.len().saturating_sub(35)).find_map(|start| {
        text.get(start..start + 36)
            .and_then(|candidate| Uuid::parse_str(candidate).ok())
    })
}

/// Common test fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub fn monthly_rent_args() -> Vec<&'static str> {
        vec!["Rent", "1200", "--date", "2024-01-05", "--every", "monthly"]
    }

    pub fn laptop_plan_args() -> Vec<&'static str> {
        vec![
            "Laptop",
            "1,500.00",
            "--date",
            "2024-01-10",
            "--installments",
            "3",
            "--period",
            "months",
        ]
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    /// Predicate to check if output contains transaction table headers
    pub fn has_table_headers() -> impl Predicate<str> {
        predicate::str::contains("ID")
            .and(predicate::str::contains("Description"))
            .and(predicate::str::contains("Amount"))
    }

    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error").or(predicate::str::contains("error"))
    }
}
