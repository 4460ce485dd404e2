// tests/dashboard_config.rs
use regional_dashboard::config::{DashboardConfig, ENV_API_KEY, ENV_CONFIG_PATH};
use std::{env, fs};

#[serial_test::serial]
#[test]
fn load_from_toml_and_json_paths() {
    env::set_var(ENV_API_KEY, "from-env");
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("dashboard.toml");
    fs::write(
        &p_toml,
        r#"
[sheets]
spreadsheet_id = "sheet-123"
api_key = "ENV"

[sheets.news]
name = "Noticias"
range = "A2:D"

[layout.news]
enlace = 3
min_columns = 3
"#,
    )
    .unwrap();
    let c = DashboardConfig::load_from(&p_toml).unwrap();
    assert_eq!(c.sheets.spreadsheet_id, "sheet-123");
    assert_eq!(c.sheets.api_key, "from-env");
    assert_eq!(c.sheets.news.a1(), "Noticias!A2:D");
    assert_eq!(c.sheets.events.name, "Dummy - Eventos");
    assert_eq!(c.layout.news.enlace, 3);
    assert_eq!(c.layout.news.min_columns, 3);
    assert!(c.validate().is_ok());

    let p_json = dir.path().join("dashboard.json");
    fs::write(&p_json, r#"{"sheets": {"api_key": " literal-key "}}"#).unwrap();
    let cj = DashboardConfig::load_from(&p_json).unwrap();
    assert_eq!(cj.sheets.api_key, "literal-key");

    env::remove_var(ENV_API_KEY);
}

#[serial_test::serial]
#[test]
fn broken_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("dashboard.toml");
    fs::write(&p, "[refresh]\ninterval_secs = \"soon\"").unwrap();
    assert!(DashboardConfig::load_from(&p).is_err());
    assert!(DashboardConfig::load_from(&dir.path().join("missing.toml")).is_err());
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Run in an empty CWD so the repo's own config/ is not picked up
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    env::remove_var(ENV_CONFIG_PATH);
    env::remove_var(ENV_API_KEY);

    // 1) nothing on disk -> built-in defaults, no key
    let c = DashboardConfig::load_default().unwrap();
    assert_eq!(c.sheets.demographics.a1(), "Demografia!A2:Z");
    assert!(c.validate().is_err());

    // 2) config/dashboard.json fallback
    fs::create_dir_all(tmp.path().join("config")).unwrap();
    fs::write(
        tmp.path().join("config/dashboard.json"),
        r#"{"refresh": {"interval_secs": 120}}"#,
    )
    .unwrap();
    assert_eq!(DashboardConfig::load_default().unwrap().refresh.interval_secs, 120);

    // 3) config/dashboard.toml wins over json
    fs::write(
        tmp.path().join("config/dashboard.toml"),
        "[refresh]\ninterval_secs = 90\n",
    )
    .unwrap();
    assert_eq!(DashboardConfig::load_default().unwrap().refresh.interval_secs, 90);

    // 4) env path wins over both
    let p_env = tmp.path().join("other.toml");
    fs::write(&p_env, "[refresh]\ninterval_secs = 10\n").unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    assert_eq!(DashboardConfig::load_default().unwrap().refresh.interval_secs, 10);

    // 5) env path to nowhere is an error, not a silent fallback
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("nope.toml").display().to_string());
    assert!(DashboardConfig::load_default().is_err());
    env::remove_var(ENV_CONFIG_PATH);

    env::set_current_dir(&old).unwrap();
}

#[serial_test::serial]
#[test]
fn example_config_matches_defaults() {
    env::set_var(ENV_API_KEY, "k");
    let c = DashboardConfig::load_from(std::path::Path::new("config/dashboard.example.toml"))
        .expect("example config parses");
    let d = DashboardConfig::default();
    assert_eq!(c.layout, d.layout);
    assert_eq!(c.sheets.news, d.sheets.news);
    assert_eq!(c.sheets.spreadsheet_id, d.sheets.spreadsheet_id);
    assert_eq!(c.refresh.interval_secs, d.refresh.interval_secs);
    env::remove_var(ENV_API_KEY);
}
