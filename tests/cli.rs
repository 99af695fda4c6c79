// Drives the compiled binary with a throwaway database and config file.
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("wortquiz").unwrap();
        cmd.env("HOME", self.dir.path())
            .env_remove("RUST_LOG")
            .arg("--db")
            .arg(self.path("words.db"))
            .arg("--config")
            .arg(self.path("config.json"));
        cmd
    }

    fn run_ok(&self, args: &[&str], stdin: &str) -> String {
        let output = self
            .cmd()
            .args(args)
            .write_stdin(stdin)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        String::from_utf8(output).unwrap()
    }
}

fn read_config(path: &Path) -> serde_json::Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

#[test]
fn seed_then_list_categories() {
    let sandbox = Sandbox::new();
    let out = sandbox.run_ok(&["seed"], "");
    assert!(out.contains("20 Wörter importiert"), "{out}");

    let out = sandbox.run_ok(&["categories"], "");
    assert_eq!(
        out.lines().collect::<Vec<_>>(),
        vec!["Adjektive", "Essen", "Orte", "Verben", "Verkehr"]
    );
}

#[test]
fn add_show_and_delete_word() {
    let sandbox = Sandbox::new();
    let out = sandbox.run_ok(
        &["word", "add", "Bahnhof", "istasyon", "Verkehr", "-a", "der", "--wo", "am Bahnhof"],
        "",
    );
    assert!(out.contains("der Bahnhof"), "{out}");

    let out = sandbox.run_ok(&["word", "show", "1"], "");
    assert!(out.contains("Wo: am Bahnhof"), "{out}");

    let out = sandbox.run_ok(&["word", "favorite", "1"], "");
    assert!(out.contains("jetzt"), "{out}");
    let out = sandbox.run_ok(&["word", "list", "--favorites"], "");
    assert!(out.contains("★"), "{out}");

    sandbox.run_ok(&["word", "delete", "1"], "");
    sandbox
        .cmd()
        .args(["word", "show", "1"])
        .assert()
        .failure();
}

#[test]
fn quiz_reads_answers_from_stdin_and_records_the_result() {
    let sandbox = Sandbox::new();
    sandbox.run_ok(&["seed"], "");

    let out = sandbox.run_ok(
        &["quiz", "-m", "artikel", "-n", "3", "--type", "multiple", "--remember"],
        "1\n2\n3\nn\n",
    );
    assert!(out.contains("von 3 richtig"), "{out}");

    let cfg = read_config(&sandbox.path("config.json"));
    assert_eq!(cfg["mode"], "artikel");
    assert_eq!(cfg["question_count"], 3);

    let out = sandbox.run_ok(&["results"], "");
    assert!(out.contains("artikel"), "{out}");
    assert!(out.contains("1 Tests"), "{out}");
}

#[test]
fn quiz_with_no_words_reports_empty_pool() {
    let sandbox = Sandbox::new();
    let out = sandbox.run_ok(&["quiz", "-m", "wohin"], "");
    assert!(out.contains("Keine passenden Wörter"), "{out}");
}

#[test]
fn category_source_requires_a_category() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["quiz", "--source", "category"])
        .assert()
        .failure();
}

#[test]
fn favorite_list_lifecycle() {
    let sandbox = Sandbox::new();
    sandbox.run_ok(&["seed"], "");
    let out = sandbox.run_ok(&["list", "create", "Schwer"], "");
    assert!(out.contains("Liste 1"), "{out}");

    sandbox.run_ok(&["list", "add", "1", "3"], "");
    sandbox.run_ok(&["list", "add", "1", "4"], "");
    let out = sandbox.run_ok(&["list", "show", "1"], "");
    assert!(out.contains("(2 Wörter)"), "{out}");

    sandbox.run_ok(&["list", "remove", "1", "3"], "");
    let out = sandbox.run_ok(&["list", "show"], "");
    assert!(out.contains("Schwer (1 Wörter)"), "{out}");

    sandbox.run_ok(&["list", "delete", "1"], "");
    let out = sandbox.run_ok(&["list", "show"], "");
    assert!(out.trim().is_empty(), "{out}");
}
