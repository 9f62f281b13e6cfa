use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Nothing listens on the discard port, so every request is refused
const UNREACHABLE: &str = "http://127.0.0.1:9";

fn tokensift(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tokensift"));
    cmd.env_remove("TOKENSIFT_VERSION_URL")
        .env_remove("TOKENSIFT_DOCUMENT_URL")
        .env_remove("TOKENSIFT_STALE_AFTER")
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn parse_items(stdout: &[u8]) -> Vec<Value> {
    let root: Value = serde_json::from_slice(stdout).expect("single JSON object");
    root.get("items")
        .and_then(Value::as_array)
        .expect("items array")
        .clone()
}

fn titles(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .map(|v| v.get("title").and_then(Value::as_str).unwrap().to_string())
        .collect()
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn empty_query_lists_first_tokens_in_document_order() {
    let temp = tempdir().unwrap();
    let entries: Vec<String> = (0..25)
        .map(|i| format!("\"spacing-{:02}\": \"{}px\"", 24 - i, i))
        .collect();
    write_file(
        &temp.path().join("tokens.json"),
        &format!("{{{}}}", entries.join(", ")),
    );

    let assert = tokensift(temp.path()).assert().success();
    let items = parse_items(&assert.get_output().stdout);

    assert_eq!(items.len(), 20);
    assert_eq!(items[0]["title"], "spacing-24");
    assert_eq!(items[19]["title"], "spacing-05");
    assert_eq!(items[0]["subtitle"], "0px");
}

#[test]
fn fuzzy_query_ranks_substring_before_loose_matches() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("tokens.json"),
        r#"{
            "navy-blu-e": "hsl(240, 100%, 25%)",
            "dark-blue": "hsl(220, 60%, 20%)",
            "blue": "hsl(210, 90%, 50%)",
            "gap": "4px"
        }"#,
    );

    let assert = tokensift(temp.path())
        .arg("--no-sync")
        .arg("blue")
        .assert()
        .success();
    let items = parse_items(&assert.get_output().stdout);

    assert_eq!(titles(&items), vec!["blue", "dark-blue", "navy-blu-e"]);
    let first = &items[0];
    assert_eq!(first["uid"], "blue");
    assert_eq!(first["arg"], "blue");
    assert_eq!(first["autocomplete"], "blue");
    assert_eq!(first["icon"]["type"], "default");
}

#[test]
fn wrapper_document_descriptions_become_subtitles() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("tokens.json"),
        r#"{
            "tokens": {
                "$themes": [],
                "brand": {"value": "hsl(210, 80%, 40%)", "description": "Primary brand color"}
            },
            "$metadata": {"tokenSetOrder": ["global"]}
        }"#,
    );

    let assert = tokensift(temp.path()).arg("brand").assert().success();
    let items = parse_items(&assert.get_output().stdout);

    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["subtitle"], "Primary brand color");
}

#[test]
fn malformed_document_yields_empty_items() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("tokens.json"), "{not json");

    tokensift(temp.path())
        .arg("blue")
        .assert()
        .success()
        .stdout(predicate::str::diff("{\"items\":[]}\n"));
}

#[test]
fn missing_data_dir_yields_empty_items() {
    let temp = tempdir().unwrap();

    tokensift(&temp.path().join("absent"))
        .assert()
        .success()
        .stdout(predicate::str::diff("{\"items\":[]}\n"));
}

#[test]
fn existing_icon_is_referenced_by_path() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("tokens.json"),
        r#"{"color.primary": "hsl(0, 100%, 50%)"}"#,
    );
    write_file(&temp.path().join("images/color_primary.png"), "png");

    let assert = tokensift(temp.path()).arg("primary").assert().success();
    let items = parse_items(&assert.get_output().stdout);

    let icon = items[0]["icon"]["path"].as_str().unwrap();
    assert!(icon.ends_with("color_primary.png"));
}

#[test]
fn background_sync_failure_is_silent() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("tokens.json"), r#"{"blue": "4px"}"#);

    let assert = tokensift(temp.path())
        .arg("--version-url")
        .arg(UNREACHABLE)
        .arg("--document-url")
        .arg(UNREACHABLE)
        .arg("-q")
        .arg("blue")
        .assert()
        .success();
    let items = parse_items(&assert.get_output().stdout);

    assert_eq!(titles(&items), vec!["blue"]);
    assert!(!temp.path().join("last_checked").exists());
}

#[test]
fn fresh_state_skips_the_network() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("tokens.json"), r#"{"blue": "4px"}"#);
    let now = chrono::Utc::now().timestamp();
    write_file(&temp.path().join("last_checked"), &now.to_string());

    tokensift(temp.path())
        .arg("--version-url")
        .arg(UNREACHABLE)
        .arg("--document-url")
        .arg(UNREACHABLE)
        .arg("blue")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    assert_eq!(
        fs::read_to_string(temp.path().join("last_checked")).unwrap(),
        now.to_string()
    );
}

#[test]
fn update_failure_leaves_files_untouched() {
    let temp = tempdir().unwrap();
    let doc = r#"{"update-color": "hsl(0, 0%, 0%)"}"#;
    write_file(&temp.path().join("tokens.json"), doc);
    write_file(&temp.path().join("version"), "abc123");

    let assert = tokensift(temp.path())
        .arg("--version-url")
        .arg(UNREACHABLE)
        .arg("--document-url")
        .arg(UNREACHABLE)
        .arg("-q")
        .arg("update")
        .assert()
        .success();
    let items = parse_items(&assert.get_output().stdout);

    assert_eq!(titles(&items), vec!["Update failed"]);
    assert_eq!(fs::read_to_string(temp.path().join("tokens.json")).unwrap(), doc);
    assert_eq!(fs::read_to_string(temp.path().join("version")).unwrap(), "abc123");
    assert!(!temp.path().join("tokens.json.bak").exists());
    assert!(!temp.path().join("last_checked").exists());
}

#[test]
fn update_without_endpoints_reports_configuration() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("tokens.json"), r#"{"a": "1"}"#);

    let assert = tokensift(temp.path()).arg("UPDATE").assert().success();
    let items = parse_items(&assert.get_output().stdout);

    assert_eq!(titles(&items), vec!["Sync is not configured"]);
}

#[test]
fn reserved_words_other_than_update_are_searched() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("tokens.json"), r#"{"status-ok": "hsl(120, 50%, 50%)"}"#);

    let assert = tokensift(temp.path()).arg("status").assert().success();
    let items = parse_items(&assert.get_output().stdout);

    assert_eq!(titles(&items), vec!["status-ok"]);
}

#[test]
fn status_reports_sync_state() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("tokens.json"), r#"{"a": "1", "b": "2"}"#);
    write_file(&temp.path().join("version"), "0123456789ab");

    let assert = tokensift(temp.path()).arg("--status").assert().success();
    let items = parse_items(&assert.get_output().stdout);
    let titles = titles(&items);

    assert_eq!(titles[0], "Sync disabled");
    assert!(titles.contains(&"Version 0123456789ab".to_string()));
    assert!(titles.contains(&"2 tokens".to_string()));
    assert!(titles.contains(&"No backup".to_string()));
}

#[test]
fn status_conflicts_with_query() {
    let temp = tempdir().unwrap();

    tokensift(temp.path())
        .arg("--status")
        .arg("blue")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn generate_icons_writes_pngs_for_color_tokens() {
    let temp = tempdir().unwrap();
    write_file(
        &temp.path().join("tokens.json"),
        r#"{
            "brand.red": "hsl(0, 100%, 50%)",
            "fade": "linear-gradient(90deg, hsl(0, 0%, 0%), hsl(0, 0%, 100%))",
            "broken": "hsl(oops)",
            "gap": "4px"
        }"#,
    );

    let assert = tokensift(temp.path())
        .arg("--generate-icons")
        .arg("--icon-size")
        .arg("16")
        .assert()
        .success();
    let items = parse_items(&assert.get_output().stdout);

    assert_eq!(titles(&items), vec!["Generated 2 icons"]);
    let images = temp.path().join("images");
    assert!(images.join("brand_red.png").is_file());
    assert!(images.join("fade.png").is_file());
    assert!(!images.join("broken.png").exists());
    assert!(!images.join("gap.png").exists());

    // generated icons are picked up by the next search
    let assert = tokensift(temp.path()).arg("brand").assert().success();
    let items = parse_items(&assert.get_output().stdout);
    assert!(items[0]["icon"]["path"]
        .as_str()
        .unwrap()
        .ends_with("brand_red.png"));
}

#[test]
fn generate_icons_honours_icon_dir() {
    let temp = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_file(&temp.path().join("tokens.json"), r#"{"ink": "hsl(0, 0%, 10%)"}"#);

    tokensift(temp.path())
        .arg("--generate-icons")
        .arg("--icon-dir")
        .arg(out.path())
        .assert()
        .success();

    assert!(out.path().join("ink.png").is_file());
    assert!(!temp.path().join("images").exists());
}

#[test]
fn pretty_output_is_indented() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("tokens.json"), r#"{"gap": "4px"}"#);

    tokensift(temp.path())
        .arg("--pretty")
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  \"items\""));
}
