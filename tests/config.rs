// tests/config.rs
use feed_digest::config::{load_default, load_from, DigestConfig, ENV_CONFIG_PATH};
use std::{env, fs, path::Path};

const OVERRIDES: [&str; 3] = ["TRANSLATE_TO", "DIGEST_WINDOW_DAYS", "DIGEST_MAX_ITEMS"];

fn clear_env() {
    env::remove_var(ENV_CONFIG_PATH);
    for k in OVERRIDES {
        env::remove_var(k);
    }
}

// reads a cwd-relative path; serialized with the tests that chdir
#[serial_test::serial]
#[test]
fn shipped_config_matches_builtin_defaults() {
    let cfg = load_from(Path::new("config/digest.toml")).expect("shipped config parses");
    assert_eq!(cfg, DigestConfig::default());
}

#[test]
fn bad_toml_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("digest.toml");
    fs::write(&p, "window_days = \"three\"").unwrap();
    assert!(load_from(&p).is_err());
}

#[serial_test::serial]
#[test]
fn default_uses_env_path_then_fallbacks() {
    clear_env();
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();

    // 1) nothing on disk -> built-in defaults
    assert_eq!(load_default().unwrap(), DigestConfig::default());

    // 2) ./config/digest.toml
    fs::create_dir_all(tmp.path().join("config")).unwrap();
    fs::write(tmp.path().join("config/digest.toml"), "max_items = 5").unwrap();
    assert_eq!(load_default().unwrap().max_items, 5);

    // 3) env path wins
    let p_env = tmp.path().join("other.toml");
    fs::write(&p_env, "max_items = 9").unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    assert_eq!(load_default().unwrap().max_items, 9);

    // 4) env path pointing nowhere is an error
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
    assert!(load_default().is_err());

    clear_env();
    env::set_current_dir(&old).unwrap();
}

#[serial_test::serial]
#[test]
fn env_overrides_apply_last() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("digest.toml");
    fs::write(&p, "window_days = 7\nmax_items = 20\n[translate]\ntarget_lang = \"fr\"\n").unwrap();
    env::set_var(ENV_CONFIG_PATH, p.display().to_string());
    env::set_var("TRANSLATE_TO", "ja");
    env::set_var("DIGEST_WINDOW_DAYS", "1");

    let cfg = load_default().unwrap();
    assert_eq!(cfg.translate.target_lang, "ja");
    assert_eq!(cfg.window_days, 1);
    assert_eq!(cfg.max_items, 20);

    env::set_var("DIGEST_MAX_ITEMS", "lots");
    assert!(load_default().is_err());

    clear_env();
}
