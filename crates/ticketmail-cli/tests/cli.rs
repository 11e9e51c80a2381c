//! End-to-end tests for the ticketmail binary. None of them touch the network.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PRICE_TICKET: &str = "Supplier Name\n\
Acme Corp\n\
Supplier Number: X123\n\
Supplier Invoice Number\n\
INV-7781\n\
Total Position Difference\n\
Invoiced Qty\n";

const ARTICLE_TICKET: &str = "Supplier Name\n\
Bolt & Nut GmbH\n\
Shipping Notice Number\n\
SN-4410\n\
The goods were not ordered and moved to quarantine storage.\n";

/// Command isolated from the user's real configuration directory.
fn ticketmail(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ticketmail").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("CLOUDCONVERT_API_KEY");
    cmd
}

fn write_ticket(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn generate_plain_price_variance() {
    let dir = TempDir::new().unwrap();
    let ticket = write_ticket(&dir, "ticket.txt", PRICE_TICKET);

    ticketmail(dir.path())
        .arg("generate")
        .arg(&ticket)
        .args(["--sign-off", "Jamie Doe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dear Acme Corp (X123) team,"))
        .stdout(predicate::str::contains("INV-7781"))
        .stdout(predicate::str::contains("Kind regards,\nJamie Doe"))
        .stderr(predicate::str::contains("[SN Info]"));
}

#[test]
fn generate_html_with_subject() {
    let dir = TempDir::new().unwrap();
    let ticket = write_ticket(&dir, "ticket.txt", ARTICLE_TICKET);

    ticketmail(dir.path())
        .arg("generate")
        .arg(&ticket)
        .args(["--sign-off", "Jamie", "--format", "html", "--subject"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Subject: Articles delivered without order - Bolt &amp; Nut GmbH - SN-4410<br>",
        ))
        .stdout(predicate::str::contains("Dear Bolt &amp; Nut GmbH team,<br>"));
}

#[test]
fn generate_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let ticket = write_ticket(&dir, "ticket.txt", PRICE_TICKET);
    let output = dir.path().join("email.txt");

    ticketmail(dir.path())
        .arg("generate")
        .arg(&ticket)
        .args(["--sign-off", "Jamie", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("email written to"));

    let body = fs::read_to_string(&output).unwrap();
    assert!(body.starts_with("Dear Acme Corp (X123) team,"));
    assert!(body.ends_with("Jamie"));
}

#[test]
fn generate_requires_sign_off() {
    let dir = TempDir::new().unwrap();
    let ticket = write_ticket(&dir, "ticket.txt", PRICE_TICKET);

    ticketmail(dir.path())
        .arg("generate")
        .arg(&ticket)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No sign-off name given"));
}

#[test]
fn generate_missing_input() {
    let dir = TempDir::new().unwrap();

    ticketmail(dir.path())
        .args(["generate", "does-not-exist.txt", "--sign-off", "Jamie"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn legacy_doc_without_api_key_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    let ticket = dir.path().join("ticket.doc");
    let mut data = vec![0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
    data.extend_from_slice(&[0u8; 64]);
    fs::write(&ticket, data).unwrap();

    ticketmail(dir.path())
        .arg("generate")
        .arg(&ticket)
        .args(["--sign-off", "Jamie"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CLOUDCONVERT_API_KEY"));
}

#[test]
fn inspect_reports_fields_as_json() {
    let dir = TempDir::new().unwrap();
    let ticket = write_ticket(&dir, "ticket.txt", PRICE_TICKET);

    let output = ticketmail(dir.path())
        .arg("inspect")
        .arg(&ticket)
        .arg("--paragraphs")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["format"], "plain_text");
    assert_eq!(report["kind"], "price_variance");
    assert_eq!(report["classified_by"], "price_markers");
    assert_eq!(report["fields"]["supplier"], "Acme Corp (X123)");
    assert_eq!(report["fields"]["invoice_number"], "INV-7781");
    assert_eq!(report["paragraphs"][0], "Supplier Name");
}

#[test]
fn inspect_file_name_hint() {
    let dir = TempDir::new().unwrap();
    let ticket = write_ticket(&dir, "price-check.txt", ARTICLE_TICKET);

    let output = ticketmail(dir.path())
        .arg("inspect")
        .arg(&ticket)
        .arg("--compact")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["kind"], "price_variance");
    assert_eq!(report["classified_by"], "hint");
}

#[test]
fn batch_writes_emails_and_summary() {
    let dir = TempDir::new().unwrap();
    write_ticket(&dir, "a.txt", PRICE_TICKET);
    write_ticket(&dir, "b.txt", ARTICLE_TICKET);
    let out_dir = dir.path().join("out");
    let pattern = dir.path().join("*.txt");

    ticketmail(dir.path())
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .arg("--output-dir")
        .arg(&out_dir)
        .args(["--sign-off", "Jamie", "--summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 tickets"));

    assert!(out_dir.join("a.email.txt").exists());
    assert!(out_dir.join("b.email.txt").exists());

    let summary = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,kind"));
    assert!(summary.contains("a.txt,success,price_variance,Acme Corp (X123),INV-7781"));
    assert!(summary.contains("b.txt,success,article_not_ordered"));
}

#[test]
fn batch_rerun_skips_written_emails() {
    let dir = TempDir::new().unwrap();
    write_ticket(&dir, "a.txt", PRICE_TICKET);
    let pattern = dir.path().join("*.txt");

    for _ in 0..2 {
        ticketmail(dir.path())
            .arg("batch")
            .arg(pattern.to_str().unwrap())
            .args(["--sign-off", "Jamie"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Found 1 tickets"));
    }

    assert!(dir.path().join("a.email.txt").exists());
    assert!(!dir.path().join("a.email.email.txt").exists());
}

#[test]
fn batch_no_matches() {
    let dir = TempDir::new().unwrap();
    let pattern = dir.path().join("*.docx");

    ticketmail(dir.path())
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .args(["--sign-off", "Jamie"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files found"));
}

#[test]
fn config_set_then_used_as_sign_off() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    let ticket = write_ticket(&dir, "ticket.txt", PRICE_TICKET);

    ticketmail(dir.path())
        .args(["config", "init", "--output"])
        .arg(&config)
        .assert()
        .success();

    ticketmail(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "rendering.sign_off", "Jamie Doe"])
        .assert()
        .success();

    ticketmail(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "rendering.sign_off"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Jamie Doe\""));

    ticketmail(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("generate")
        .arg(&ticket)
        .assert()
        .success()
        .stdout(predicate::str::ends_with("Jamie Doe\n"));
}

#[test]
fn config_set_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    ticketmail(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "rendering.colour", "red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}
