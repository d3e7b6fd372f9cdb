// ABOUTME: Tests for configuration parsing and discovery.
// ABOUTME: Verifies YAML fields, defaults, TOMCAT_HOME fallback, and init templates.

use std::fs;
use std::path::{Path, PathBuf};
use wardeploy::config::{
    CONFIG_FILENAME, CONFIG_FILENAME_DIR, Config, ConfigError, SERVER_HOME_ENV, VerifyConfig,
    init_config,
};

#[test]
fn parse_full_config() {
    let yaml = r#"
server_home: /opt/tomcat
archive: /srv/builds/shop.war
keep_backup: false
scripts:
  startup: start-shop.sh
  shutdown: stop-shop.sh
"#;

    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.server_home, Some(PathBuf::from("/opt/tomcat")));
    assert_eq!(config.archive, Some(PathBuf::from("/srv/builds/shop.war")));
    assert!(!config.keep_backup);
    assert_eq!(config.scripts.startup.as_deref(), Some("start-shop.sh"));
    assert_eq!(config.scripts.shutdown.as_deref(), Some("stop-shop.sh"));
    assert!(config.verify().is_ok());
}

#[test]
fn empty_config_uses_defaults() {
    let config = Config::from_yaml("{}").unwrap();

    assert_eq!(config, Config::default());
    assert!(config.keep_backup);
}

#[test]
fn malformed_yaml_is_a_syntax_error() {
    let err = Config::from_yaml("keep_backup: [not, a, bool]").unwrap_err();
    assert!(matches!(err, ConfigError::Syntax { .. }));
}

#[test]
fn unsafe_script_override_fails_verify() {
    let config = Config::from_yaml("scripts:\n  startup: ../../bin/evil.sh\n").unwrap();
    let err = config.verify().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));
}

#[test]
fn server_home_falls_back_to_environment() {
    let config = Config::default();

    temp_env::with_var(SERVER_HOME_ENV, Some("/usr/share/tomcat"), || {
        assert_eq!(config.server_home(), Some(PathBuf::from("/usr/share/tomcat")));
    });
}

#[test]
fn configured_server_home_wins_over_environment() {
    let config = Config::from_yaml("server_home: /opt/tomcat").unwrap();

    temp_env::with_var(SERVER_HOME_ENV, Some("/usr/share/tomcat"), || {
        assert_eq!(config.server_home(), Some(PathBuf::from("/opt/tomcat")));
    });
}

#[test]
fn empty_server_home_means_unset() {
    let config = Config::from_yaml("server_home: ''").unwrap();

    temp_env::with_var_unset(SERVER_HOME_ENV, || {
        assert_eq!(config.server_home(), None);
    });
    temp_env::with_var(SERVER_HOME_ENV, Some(""), || {
        assert_eq!(config.server_home(), None);
    });
}

#[test]
fn discover_finds_nested_config() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join(CONFIG_FILENAME_DIR);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "server_home: /opt/tomcat\n").unwrap();

    let config = Config::discover(temp.path()).unwrap();
    assert_eq!(config.server_home, Some(PathBuf::from("/opt/tomcat")));
}

#[test]
fn discover_prefers_top_level_file() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join(CONFIG_FILENAME), "keep_backup: false\n").unwrap();
    fs::write(temp.path().join("wardeploy.yaml"), "keep_backup: true\n").unwrap();

    let config = Config::discover(temp.path()).unwrap();
    assert!(!config.keep_backup);
}

#[test]
fn discover_reports_missing_file() {
    let temp = tempfile::tempdir().unwrap();

    let err = Config::discover(temp.path()).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(Config::discover_or_default(temp.path()).unwrap(), Config::default());
}

#[test]
fn broken_file_is_not_silently_defaulted() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join(CONFIG_FILENAME), "scripts: [oops").unwrap();

    let err = Config::discover_or_default(temp.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains(CONFIG_FILENAME));
}

#[test]
fn init_writes_loadable_template() {
    let temp = tempfile::tempdir().unwrap();

    let home = Path::new("/srv/tomcat9");

    let path = init_config(temp.path(), Some(home), false).unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.server_home, Some(PathBuf::from("/srv/tomcat9")));
    assert!(config.keep_backup);
}

#[test]
fn init_respects_force() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join(CONFIG_FILENAME), "keep_backup: false\n").unwrap();

    let err = init_config(temp.path(), None, false).unwrap_err();
    assert!(matches!(err, ConfigError::AlreadyExists { .. }));

    init_config(temp.path(), None, true).unwrap();
    let config = Config::discover(temp.path()).unwrap();
    assert!(config.keep_backup);
}
