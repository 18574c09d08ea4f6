use playchain::config::{load_play, load_variables, ConfigError, ConfigProviderKind, PlayConfig};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn parses_a_full_play_file() {
    let dir = tempdir().expect("tempdir");
    let path = write_file(
        &dir,
        "play.yaml",
        r#"
id: cold-outreach
name: Cold Outreach
description: research then draft
steps:
  - name: Research
    user_template: "Research {company}"
    system_template: "You are a researcher."
  - user_template: "Draft an email using {prompt_1}"
    system_template: "You are a writer."
    model_provider: anthropic
    model_name: sonnet
"#,
    );

    let play = load_play(&path).expect("load play");
    assert_eq!(play.id.as_str(), "cold-outreach");
    assert_eq!(play.steps.len(), 2);
    assert_eq!(play.steps[0].name.as_deref(), Some("Research"));
    assert_eq!(
        play.steps[1].model_provider,
        Some(ConfigProviderKind::Anthropic)
    );
    assert_eq!(play.steps[1].model_name.as_deref(), Some("sonnet"));
}

#[test]
fn play_without_steps_fails_validation() {
    let play: PlayConfig = serde_yaml::from_str(
        r#"
id: empty-play
name: Empty
steps: []
"#,
    )
    .expect("parse play");
    let err = play.validate().expect_err("must fail");
    assert!(matches!(err, ConfigError::Play(_)));
    assert!(err.to_string().contains("at least one step"));
}

#[test]
fn empty_templates_fail_validation() {
    let play: PlayConfig = serde_yaml::from_str(
        r#"
id: p
name: P
steps:
  - user_template: "  "
    system_template: "s"
"#,
    )
    .expect("parse play");
    let err = play.validate().expect_err("must fail");
    assert!(err.to_string().contains("empty user template"));
}

#[test]
fn model_name_without_provider_fails_validation() {
    let play: PlayConfig = serde_yaml::from_str(
        r#"
id: p
name: P
steps:
  - user_template: "u"
    system_template: "s"
    model_name: sonnet
"#,
    )
    .expect("parse play");
    let err = play.validate().expect_err("must fail");
    assert!(err.to_string().contains("without a provider"));
}

#[test]
fn invalid_play_id_is_rejected_at_parse_time() {
    let result: Result<PlayConfig, _> = serde_yaml::from_str(
        r#"
id: "bad id!"
name: P
steps:
  - user_template: "u"
    system_template: "s"
"#,
    );
    let err = result.expect_err("must fail");
    assert!(err.to_string().contains("invalid play id"));
}

#[test]
fn unknown_provider_kind_is_rejected_at_parse_time() {
    let result: Result<PlayConfig, _> = serde_yaml::from_str(
        r#"
id: p
name: P
steps:
  - user_template: "u"
    system_template: "s"
    model_provider: cohere
"#,
    );
    assert!(result.is_err());
}

#[test]
fn missing_play_file_reports_the_path() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("absent.yaml");
    let err = load_play(&path).expect_err("must fail");
    match err {
        ConfigError::Read { path: reported, .. } => {
            assert!(reported.contains("absent.yaml"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn variables_file_stringifies_scalars_and_drops_empties() {
    let dir = tempdir().expect("tempdir");
    let path = write_file(
        &dir,
        "vars.yaml",
        r#"
company: Acme
headcount: 250
active: true
nickname: ""
skipped: null
"#,
    );

    let bag = load_variables(&path).expect("load variables");
    assert_eq!(bag.get("company"), Some("Acme"));
    assert_eq!(bag.get("headcount"), Some("250"));
    assert_eq!(bag.get("active"), Some("true"));
    assert!(!bag.contains("nickname"), "empty value is unset");
    assert!(!bag.contains("skipped"));
}

#[test]
fn non_scalar_variable_values_are_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = write_file(
        &dir,
        "vars.yaml",
        r#"
company:
  name: Acme
"#,
    );
    let err = load_variables(&path).expect_err("must fail");
    assert!(matches!(err, ConfigError::Variables(_)));
    assert!(err.to_string().contains("company"));
}
