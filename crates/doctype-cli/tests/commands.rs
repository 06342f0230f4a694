//! Command tests driven through argument parsing, with files in a temp dir.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tempfile::TempDir;

use doctype_cli::cli::{Cli, Command, DurationCommand};
use doctype_cli::commands::{
    run_config, run_duration, run_eval, run_layout, run_meta, run_toggle,
};
use doctype_cli::settings::{Settings, load_settings};
use doctype_cli::state::StateStore;

const TASK_FIELDS: &str = r#"{
  "name": "Task",
  "fields": [
    {"fieldname": "details_tab", "fieldtype": "Tab Break", "label": "Details"},
    {"fieldname": "subject", "fieldtype": "Data", "label": "Subject", "reqd": 1},
    {"fieldname": "status", "fieldtype": "Select", "label": "Status", "options": "Open\nClosed"},
    {"fieldname": "more", "fieldtype": "Section Break", "label": "More", "collapsible": 1},
    {"fieldname": "closed_on", "fieldtype": "Date", "label": "Closed on",
     "depends_on": "eval:doc.status==\"Closed\""},
    {"fieldname": "admin_tab", "fieldtype": "Tab Break", "label": "Admin",
     "depends_on": "eval:doc.login_user_role==\"System Manager\""},
    {"fieldname": "audit", "fieldtype": "Small Text", "label": "Audit"}
  ]
}"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("task.json"), TASK_FIELDS).unwrap();
        fs::write(
            dir.path().join("doc.json"),
            r#"{"data": {"subject": "Fix pump", "status": "Open"}}"#,
        )
        .unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn state_file(&self) -> PathBuf {
        self.path("state").join("collapse.json")
    }

    fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        settings.state.collapse_file = Some(self.state_file());
        settings
    }

    /// Parse `args` after the program name, with `{dir}` replaced by the temp dir.
    fn parse(&self, args: &[&str]) -> Cli {
        let dir = self.dir.path().display().to_string();
        let argv = std::iter::once("doctype-layout".to_string())
            .chain(args.iter().map(|arg| arg.replace("{dir}", &dir)));
        Cli::try_parse_from(argv).unwrap()
    }
}

fn layout(fixture: &Fixture, args: &[&str], settings: &Settings) -> String {
    match fixture.parse(args).command {
        Command::Layout(args) => run_layout(&args, settings).unwrap(),
        _ => unreachable!(),
    }
}

fn read_state(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn layout_outline_seeds_and_persists_collapse_state() {
    let fixture = Fixture::new();
    let settings = fixture.settings();
    let output = layout(
        &fixture,
        &[
            "layout",
            "--fields",
            "{dir}/task.json",
            "--doc",
            "{dir}/doc.json",
        ],
        &settings,
    );

    assert!(output.contains("tab details_tab \"Details\""));
    assert!(output.contains("section details_tab_more \"More\" [columns=0, collapsed]"));
    assert!(output.contains("0: closed_on <Date> [hidden]"));
    assert!(!output.contains("admin_tab"));

    let state = read_state(&fixture.state_file());
    assert_eq!(state["task"]["details_tab_more"], serde_json::json!(true));
}

#[test]
fn role_reveals_gated_tab() {
    let fixture = Fixture::new();
    let output = layout(
        &fixture,
        &[
            "layout",
            "--fields",
            "{dir}/task.json",
            "--role",
            "System Manager",
            "--no-state",
        ],
        &fixture.settings(),
    );
    assert!(output.contains("tab admin_tab \"Admin\""));
    assert!(!fixture.state_file().exists());
}

#[test]
fn layout_json_format() {
    let fixture = Fixture::new();
    let output = layout(
        &fixture,
        &[
            "layout",
            "--fields",
            "{dir}/task.json",
            "--format",
            "json",
            "--no-state",
        ],
        &fixture.settings(),
    );
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["has_tabs"], serde_json::json!(true));
    assert_eq!(value["tabs"][0]["id"], serde_json::json!("details_tab"));
    let first = &value["tabs"][0]["sections"][0]["fields"][0];
    assert_eq!(first["fieldname"], serde_json::json!("subject"));
    assert_eq!(first["mandatory"], serde_json::json!(true));
}

#[test]
fn layout_table_format_lists_fields() {
    let fixture = Fixture::new();
    let output = layout(
        &fixture,
        &[
            "layout",
            "--fields",
            "{dir}/task.json",
            "--format",
            "table",
            "--no-state",
        ],
        &fixture.settings(),
    );
    assert!(output.contains("subject"));
    assert!(output.contains("closed_on"));
    assert!(output.contains("More (collapsed)"));
}

#[test]
fn toggle_flips_and_persists() {
    let fixture = Fixture::new();
    let settings = fixture.settings();
    let args = ["toggle", "--fields", "{dir}/task.json", "--tab", "details_tab", "--section", "1"];

    let Command::Toggle(toggle) = fixture.parse(&args).command else {
        unreachable!()
    };
    assert!(!run_toggle(&toggle, &settings).unwrap());
    assert_eq!(
        read_state(&fixture.state_file())["task"]["details_tab_more"],
        serde_json::json!(false)
    );

    let output = layout(&fixture, &["layout", "--fields", "{dir}/task.json"], &settings);
    assert!(output.contains("[columns=0, expanded]"));

    assert!(run_toggle(&toggle, &settings).unwrap());
}

#[test]
fn toggle_rejects_non_collapsible_section() {
    let fixture = Fixture::new();
    let Command::Toggle(toggle) = fixture
        .parse(&["toggle", "--fields", "{dir}/task.json", "--tab", "details_tab", "--section", "0"])
        .command
    else {
        unreachable!()
    };
    let error = run_toggle(&toggle, &fixture.settings()).unwrap_err();
    assert!(error.to_string().contains("details_tab"));
    assert!(StateStore::load(&fixture.state_file()).is_empty());
}

#[test]
fn eval_prints_result() {
    let fixture = Fixture::new();
    let settings = Settings::default();
    let eval = |args: &[&str]| match fixture.parse(args).command {
        Command::Eval(args) => run_eval(&args, &settings).unwrap(),
        _ => unreachable!(),
    };

    assert_eq!(
        eval(&["eval", "eval:doc.status==\"Open\"", "--doc", "{dir}/doc.json"]),
        "true\n"
    );
    assert_eq!(
        eval(&["eval", "eval:doc.status==\"Closed\"", "--doc", "{dir}/doc.json"]),
        "false\n"
    );
    assert_eq!(
        eval(&["eval", "not an expression", "--mode", "mandatory", "--base-required"]),
        "true\n"
    );
    assert_eq!(
        eval(&["eval", "eval:doc.login_user_role==\"Auditor\"", "--role", "Auditor"]),
        "true\n"
    );
}

#[test]
fn eval_explain_shows_condition_or_error() {
    let fixture = Fixture::new();
    let settings = Settings::default();
    let eval = |args: &[&str]| match fixture.parse(args).command {
        Command::Eval(args) => run_eval(&args, &settings).unwrap(),
        _ => unreachable!(),
    };

    let explained = eval(&["eval", "eval:doc.subject", "--doc", "{dir}/doc.json", "--explain"]);
    assert!(explained.contains("condition: subject != \"\""));
    assert!(explained.contains("tree: "));
    assert!(explained.ends_with("result: true\n"));

    let broken = eval(&["eval", "eval:doc.status==\"Open", "--mode", "read-only", "--explain"]);
    assert!(broken.contains("not evaluated: "));
    assert!(broken.contains("default: false"));
    assert!(broken.ends_with("result: false\n"));
}

#[test]
fn meta_outputs_json() {
    let fixture = Fixture::new();
    fs::write(
        fixture.path("site.json"),
        r#"[
          {"fieldname": "site", "fieldtype": "Data", "label": "Site", "in_standard_filter": 1},
          {"fieldname": "photo", "fieldtype": "Attach Image", "label": "Photo [camera]",
           "description": "watermarks-fields: site"},
          {"fieldname": "lat", "fieldtype": "Data", "label": "Lat [geolocation-lat]"}
        ]"#,
    )
    .unwrap();
    let Command::Meta(args) = fixture.parse(&["meta", "--fields", "{dir}/site.json"]).command
    else {
        unreachable!()
    };
    let output = run_meta(&args, &Settings::default()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["watermarks"][0]["image_field"], serde_json::json!("photo"));
    assert_eq!(value["geolocation"][0]["kind"], serde_json::json!("lat"));
    assert_eq!(value["standard_filters"], serde_json::json!(["site"]));
}

#[test]
fn duration_commands() {
    let fixture = Fixture::new();
    let run = |args: &[&str]| match fixture.parse(args).command {
        Command::Duration(command) => run_duration(&command),
        _ => unreachable!(),
    };
    assert_eq!(run(&["duration", "parse", "1h 30m"]), "5400\n");
    assert_eq!(run(&["duration", "parse", "0s"]), "\n");
    assert_eq!(run(&["duration", "format", "5400"]), "1h 30m\n");
    assert_eq!(run(&["duration", "format"]), "\n");
    assert_eq!(
        run_duration(&DurationCommand::Format { seconds: Some(0) }),
        "0s\n"
    );
}

#[test]
fn config_init_then_load() {
    let fixture = Fixture::new();
    let config = fixture.path("conf").join("settings.toml");
    let cli = fixture.parse(&["--config", "{dir}/conf/settings.toml", "config", "init"]);
    let Command::Config(command) = &cli.command else {
        unreachable!()
    };

    let message = run_config(command, &Settings::default(), cli.config.as_deref()).unwrap();
    assert!(message.starts_with("wrote "));
    assert_eq!(load_settings(Some(&config)), Settings::default());

    let again = run_config(command, &Settings::default(), cli.config.as_deref());
    assert!(again.is_err());
}

#[test]
fn configured_roles_apply_without_role_flag() {
    let fixture = Fixture::new();
    let config = fixture.path("settings.toml");
    fs::write(
        &config,
        "[evaluation]\nroles = [\"System Manager\"]\n\n[output]\nformat = \"outline\"\n",
    )
    .unwrap();
    let mut settings = load_settings(Some(&config));
    settings.state.persist = false;

    let output = layout(&fixture, &["layout", "--fields", "{dir}/task.json"], &settings);
    assert!(output.contains("tab admin_tab \"Admin\""));
    assert!(!fixture.state_file().exists());
}

#[test]
fn unreadable_settings_fall_back_to_defaults() {
    let fixture = Fixture::new();
    let config = fixture.path("broken.toml");
    fs::write(&config, "evaluation = 3").unwrap();
    assert_eq!(load_settings(Some(&config)), Settings::default());
    assert_eq!(
        load_settings(Some(&fixture.path("absent.toml"))),
        Settings::default()
    );
}
