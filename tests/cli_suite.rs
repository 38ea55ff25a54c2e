use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

// Helper function to initialize the command to test, isolated from the
// user's settings and cache.
fn yoink(tmp: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_yoink"));
    cmd.env("YOINK_CONFIG", tmp.path().join("no-settings.kdl"))
        .env("XDG_CACHE_HOME", tmp.path().join("xdg-cache"))
        .env_remove("YOINK_CACHE_DIR")
        .env_remove("YOINK_BACKEND");
    cmd
}

#[test]
fn test_help_command() {
    let tmp = tempfile::tempdir().unwrap();
    yoink(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("without installing"))
        .stdout(predicate::str::contains("system-wide"))
        .stdout(predicate::str::contains("--purge-cache"));
}

#[test]
fn test_short_help_uses_summary() {
    let tmp = tempfile::tempdir().unwrap();
    yoink(&tmp)
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("without installing"))
        .stdout(predicate::str::contains("system-wide").not());
}

#[test]
fn test_version_flag() {
    let tmp = tempfile::tempdir().unwrap();
    let expected = format!("yoink {}", env!("CARGO_PKG_VERSION"));

    yoink(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(expected));
}

#[test]
fn test_no_package_prints_usage_and_fails() {
    let tmp = tempfile::tempdir().unwrap();
    yoink(&tmp)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Usage: yoink"));
}

#[test]
fn test_unknown_flag_is_usage_error() {
    let tmp = tempfile::tempdir().unwrap();
    yoink(&tmp)
        .args(["--backend", "zypper", "cowsay"])
        .assert()
        .code(2);
}

#[test]
fn test_purge_cache_empties_root() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = tmp.path().join("cache");
    let nested = cache.join("apt/cowsay=latest/usr/bin");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("cowsay"), "").unwrap();
    fs::write(cache.join("apt/cowsay=latest/.yoinked"), "").unwrap();

    yoink(&tmp)
        .arg("--cache-dir")
        .arg(&cache)
        .arg("--purge-cache")
        .assert()
        .success()
        .stderr(predicate::str::contains("squeaky clean"));

    assert!(cache.is_dir());
    assert_eq!(fs::read_dir(&cache).unwrap().count(), 0);
}

#[test]
fn test_purge_missing_cache_succeeds() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = tmp.path().join("never-created");

    yoink(&tmp)
        .arg("--cache-dir")
        .arg(&cache)
        .arg("--purge-cache")
        .assert()
        .success()
        .stderr(predicate::str::contains("Tackle box empty"));

    assert!(cache.is_dir());
}

#[test]
fn test_cache_dir_from_environment() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = tmp.path().join("env-cache");
    fs::create_dir_all(cache.join("dnf")).unwrap();

    yoink(&tmp)
        .env("YOINK_CACHE_DIR", &cache)
        .arg("--purge-cache")
        .assert()
        .success();

    assert!(!cache.join("dnf").exists());
}

#[test]
fn test_invalid_package_spec() {
    let tmp = tempfile::tempdir().unwrap();
    yoink(&tmp)
        .arg("--cache-dir")
        .arg(tmp.path().join("cache"))
        .arg("cow;say")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid package spec"));
}

#[test]
fn test_no_backend_available() {
    let tmp = tempfile::tempdir().unwrap();
    let empty_path = tmp.path().join("empty-bin");
    fs::create_dir_all(&empty_path).unwrap();

    yoink(&tmp)
        .env("PATH", &empty_path)
        .arg("--cache-dir")
        .arg(tmp.path().join("cache"))
        .arg("cowsay")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "No supported package manager (apt, dnf, pacman) found",
        ));
}

#[test]
fn test_malformed_settings_file() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = tmp.path().join("settings.kdl");
    fs::write(&settings, "color \"purple\"\n").unwrap();

    yoink(&tmp)
        .env("YOINK_CONFIG", &settings)
        .arg("--purge-cache")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid value for 'color'"));
}

#[test]
fn test_completions() {
    let tmp = tempfile::tempdir().unwrap();
    yoink(&tmp)
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("yoink"));
}
