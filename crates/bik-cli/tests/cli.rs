use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const REPORT: &str = "\
Raport BIK
Zobowiązania finansowe - w trakcie spłaty
Kredyt gotówkowy
BANK PRZYKŁADOWY S.A.
01.02.2020 10 000,00 PLN 5 000,00 PLN 250,00 PLN BRAK
Karta kredytowa
INNY BANK SPÓŁKA AKCYJNA
15.03.2021 ND ND ND BRAK
Zobowiązania finansowe - zamknięte
";

fn bik() -> Command {
    Command::cargo_bin("bik").unwrap()
}

fn write_report(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_parse_text_to_json() {
    let dir = TempDir::new().unwrap();
    let input = write_report(dir.path(), "raport.txt", REPORT);

    bik()
        .arg("parse")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"creditor_name\": \"BANK PRZYKŁADOWY S.A.\""))
        .stdout(predicate::str::contains("\"source\": \"raport.txt\""))
        .stdout(predicate::str::contains("\"overdue_total\": 0.0"));
}

#[test]
fn test_parse_csv_with_source_label() {
    let dir = TempDir::new().unwrap();
    let input = write_report(dir.path(), "raport.txt", REPORT);

    bik()
        .args(["parse", "--format", "csv", "--source", "jan_kowalski.pdf"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Źródło,Rodzaj_produktu,Kredytodawca"))
        .stdout(predicate::str::contains(
            "jan_kowalski.pdf,Karta kredytowa,INNY BANK SPÓŁKA AKCYJNA,15.03.2021,,,,0",
        ));
}

#[test]
fn test_parse_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let input = write_report(dir.path(), "raport.txt", REPORT);
    let output = dir.path().join("out.json");

    bik()
        .args(["parse", "--diagnostics", "--output"])
        .arg(&output)
        .arg(&input)
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["records"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["diagnostics"]["anchors_found"], 2);
}

#[test]
fn test_parse_explains_empty_result() {
    let dir = TempDir::new().unwrap();
    let input = write_report(dir.path(), "inny.txt", &"Raport BIK bez zobowiązań\n".repeat(15));

    bik()
        .arg("parse")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"))
        .stderr(predicate::str::contains("No active obligations found"))
        .stderr(predicate::str::contains("w trakcie spłaty"));
}

#[test]
fn test_parse_rejects_raw_pdf_text_file() {
    let dir = TempDir::new().unwrap();
    let input = write_report(dir.path(), "raport.txt", "%PDF-1.7\n1 0 obj\n");

    bik()
        .arg("parse")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("raw PDF"));
}

#[test]
fn test_parse_missing_file() {
    bik()
        .args(["parse", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_parse_validate_reports_issues() {
    let dir = TempDir::new().unwrap();
    let input = write_report(
        dir.path(),
        "raport.txt",
        "Zobowiązania finansowe - w trakcie spłaty\nKredyt\nBANK\n31.02.2020 100,00 PLN 200,00 PLN\n",
    );

    bik()
        .args(["parse", "--validate"])
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains("Validation issues:"))
        .stderr(predicate::str::contains("not a calendar date"))
        .stderr(predicate::str::contains("exceeds original amount"));
}

#[test]
fn test_batch_summary() {
    let dir = TempDir::new().unwrap();
    write_report(dir.path(), "a.txt", REPORT);
    write_report(dir.path(), "b.txt", REPORT);
    write_report(dir.path(), "c.txt", "Raport BIK\n");
    let out = dir.path().join("out");

    bik()
        .args(["batch", "--summary", "--jobs", "2", "--output-dir"])
        .arg(&out)
        .arg(dir.path().join("*.txt").to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 files"))
        .stdout(predicate::str::contains("Processed 3 files"));

    assert!(out.join("a.json").exists());
    assert!(out.join("b.json").exists());

    let records = fs::read_to_string(out.join("records.csv")).unwrap();
    let rows: Vec<&str> = records.lines().collect();
    assert_eq!(rows.len(), 5);
    assert!(rows[1].starts_with("a.txt,"));
    assert!(rows[3].starts_with("b.txt,"));

    let status = fs::read_to_string(out.join("status.csv")).unwrap();
    assert!(status.contains("a.txt,ok,2,"));
    assert!(status.contains("c.txt,empty,0,"));
}

#[test]
fn test_batch_same_file_names_in_different_directories() {
    let dir = TempDir::new().unwrap();
    for person in ["anna", "jan"] {
        fs::create_dir(dir.path().join(person)).unwrap();
    }
    write_report(&dir.path().join("anna"), "raport.txt", REPORT);
    write_report(&dir.path().join("jan"), "raport.txt", "Raport BIK\n");
    let out = dir.path().join("out");

    bik()
        .args(["batch", "--output-dir"])
        .arg(&out)
        .arg(dir.path().join("*").join("raport.txt").to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 2 files"));

    let written = fs::read_dir(&out).unwrap().count();
    assert_eq!(written, 2);

    let anna: serde_json::Value = serde_json::from_str(&fs::read_to_string(out.join("raport.json")).unwrap()).unwrap();
    let jan: serde_json::Value = serde_json::from_str(&fs::read_to_string(out.join("jan_raport.json")).unwrap()).unwrap();
    assert_eq!(anna.as_array().map(Vec::len), Some(2));
    assert_eq!(jan.as_array().map(Vec::len), Some(0));
}

#[test]
fn test_batch_without_matches_fails() {
    let dir = TempDir::new().unwrap();

    bik()
        .arg("batch")
        .arg(dir.path().join("*.pdf").to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files found"));
}

#[test]
fn test_config_roundtrip() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    bik()
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    bik()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "parsing.scan_direction", "forward"])
        .assert()
        .success();

    bik()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "parsing.scan_direction"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"forward\""));

    bik()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "dialect.none", "\"\""])
        .assert()
        .failure();

    bik()
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_changes_parsing() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"dialect": {"none_as_zero_slots": []}}"#).unwrap();
    let input = write_report(dir.path(), "raport.txt", REPORT);

    bik()
        .arg("--config")
        .arg(&config)
        .args(["parse", "--format", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"15\.03\.2021,,,,\r?\n").unwrap());
}
