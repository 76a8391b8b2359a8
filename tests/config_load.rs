// tests/config_load.rs
use market_sentiment_tracker::config::{
    load_config_default, load_config_from, ClassifierKind, TrackerConfig,
};
use std::{env, fs};

#[test]
fn parse_toml_and_json_paths() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("tracker.toml");
    fs::write(
        &p_toml,
        r#"
validity_window_hours = 48
blocklist = [" Promo ", "promo", ""]

[crypto]
assets = ["Bitcoin", " Bitcoin "]
sources = ["https://example.test/q="]

[classifier]
kind = "inference"
"#,
    )
    .unwrap();
    let c = load_config_from(&p_toml).unwrap();
    assert_eq!(c.validity_window_hours, 48);
    assert_eq!(c.blocklist, vec!["promo".to_string()]);
    assert_eq!(c.crypto.assets, vec!["Bitcoin".to_string()]);
    assert_eq!(c.classifier.kind, ClassifierKind::Inference);

    let p_json = dir.path().join("tracker.json");
    fs::write(&p_json, r#"{"max_headlines_per_source": 3, "traditional": {"assets": ["Gold"]}}"#)
        .unwrap();
    let j = load_config_from(&p_json).unwrap();
    assert_eq!(j.max_headlines_per_source, 3);
    assert_eq!(j.traditional.assets, vec!["Gold".to_string()]);
    assert!(j.traditional.sources.is_empty());
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("broken.toml");
    fs::write(&p, "validity_window_hours = \"soon\"").unwrap();
    assert!(load_config_from(&p).is_err());
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not picked up.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    env::remove_var("MARKET_SENTIMENT_CONFIG");

    // 1) Nothing on disk → built-in defaults
    let d = load_config_default().unwrap();
    assert_eq!(d.validity_window_hours, TrackerConfig::default().validity_window_hours);

    // 2) config/market_sentiment.toml fallback
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("market_sentiment.toml"), "validity_window_hours = 12").unwrap();
    assert_eq!(load_config_default().unwrap().validity_window_hours, 12);

    // 3) Env var wins
    let p_env = tmp.path().join("override.json");
    fs::write(&p_env, r#"{"validity_window_hours": 6}"#).unwrap();
    env::set_var("MARKET_SENTIMENT_CONFIG", p_env.display().to_string());
    assert_eq!(load_config_default().unwrap().validity_window_hours, 6);

    // 4) Env var pointing nowhere is an error
    env::set_var("MARKET_SENTIMENT_CONFIG", tmp.path().join("missing.toml"));
    assert!(load_config_default().is_err());
    env::remove_var("MARKET_SENTIMENT_CONFIG");

    env::set_current_dir(&old).unwrap();
}
