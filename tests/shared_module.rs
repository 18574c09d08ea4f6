use playchain::shared::ids::{validate_identifier_value, PlayId};
use playchain::shared::logging::{append_engine_log_line, engine_log_path};
use std::fs;
use tempfile::tempdir;

#[test]
fn play_id_accepts_identifier_characters() {
    let id = PlayId::parse("cold-outreach_v2").expect("parse");
    assert_eq!(id.as_str(), "cold-outreach_v2");
    assert_eq!(id.to_string(), "cold-outreach_v2");
}

#[test]
fn play_id_rejects_empty_and_punctuated_values() {
    assert!(PlayId::parse("").is_err());
    assert!(PlayId::parse("bad id").is_err());
    assert!(PlayId::parse("bad/id").is_err());
}

#[test]
fn identifier_validation_names_the_kind() {
    let err = validate_identifier_value("play id", "").expect_err("must fail");
    assert!(err.contains("play id"));
}

#[test]
fn engine_log_appends_lines_under_the_state_root() {
    let dir = tempdir().expect("tempdir");
    append_engine_log_line(dir.path(), "step=0 decision=run_step outcome=generated")
        .expect("append first");
    append_engine_log_line(dir.path(), "decision=run_chain outcome=succeeded")
        .expect("append second");

    let contents = fs::read_to_string(engine_log_path(dir.path())).expect("read log");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("step=0 decision=run_step outcome=generated"));
    assert!(lines[1].ends_with("decision=run_chain outcome=succeeded"));
}
