//! Cache and fetch scenarios against an in-process fake backend.
//!
//! The fake backend builds a real `<name>-1.0.tar` with `sh` + `tar` and
//! extracts it with `tar`; the runner counts every subprocess.

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use yoink::cache::CacheLayout;
use yoink::commands::run::yoink as yoink_package;
use yoink::core::types::{PackageSpec, parse_package_spec};
use yoink::error::{Result, YoinkError};
use yoink::packages::{BackendRegistry, PackageManager};
use yoink::utils::archive;
use yoink::utils::command::{CommandOutput, CommandRunner, CommandSpec, OutputMode, SystemRunner};

struct TarBackend;

impl PackageManager for TarBackend {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn version_separator(&self) -> &'static str {
        "-"
    }

    fn probe_command(&self) -> &'static str {
        "tar"
    }

    fn build_download_command(&self, versioned: &str, base: &str, _: &Path) -> Result<CommandSpec> {
        if versioned.ends_with("-broken") {
            return Ok(CommandSpec::ShellLine("echo 'no such version' >&2; exit 1".into()));
        }
        Ok(CommandSpec::ShellLine(format!(
            "mkdir -p src/bin && printf '#!/bin/sh\\necho {0}\\n' > src/bin/{0} && \
             chmod +x src/bin/{0} && tar -cf {0}-1.0.tar -C src bin && rm -rf src",
            base
        )))
    }

    fn locate_archive(&self, staging: &Path, base: &str) -> Option<PathBuf> {
        archive::first_match(staging, &[format!("{}-*.tar", archive::escape(base))])
    }

    fn build_extract_command(&self, archive: &Path, prefix: &Path) -> Result<CommandSpec> {
        Ok(CommandSpec::argv([
            "tar".to_string(),
            "-xf".to_string(),
            archive.to_string_lossy().into_owned(),
            "-C".to_string(),
            prefix.to_string_lossy().into_owned(),
        ]))
    }
}

#[derive(Default)]
struct CountingRunner {
    calls: Cell<usize>,
}

impl CommandRunner for CountingRunner {
    fn run(&self, command: &CommandSpec, cwd: Option<&Path>, mode: OutputMode) -> Result<CommandOutput> {
        self.calls.set(self.calls.get() + 1);
        SystemRunner::default().run(command, cwd, mode)
    }
}

fn setup() -> (tempfile::TempDir, CacheLayout) {
    let tmp = tempfile::tempdir().unwrap();
    let layout = CacheLayout::new(tmp.path().join("cache"));
    layout.ensure_root().unwrap();
    (tmp, layout)
}

#[test]
fn parse_splits_on_last_at() {
    assert_eq!(
        parse_package_spec("a@b@c"),
        ("a@b".to_string(), Some("c".to_string()))
    );
    assert_eq!(parse_package_spec("cowsay"), ("cowsay".to_string(), None));
}

#[test]
fn empty_cache_fetches_then_locates() {
    let (_tmp, layout) = setup();
    let runner = CountingRunner::default();
    let spec = PackageSpec::parse("foo").unwrap();

    let yoinked = yoink_package(&TarBackend, &runner, &layout, &spec, "foo").unwrap();

    assert!(yoinked.fetched);
    assert!(yoinked.executable.ends_with("bin/foo"));
    assert!(yoinked.prefix.join(".yoinked").is_file());
    assert_eq!(runner.calls.get(), 2);
}

#[test]
fn second_request_runs_no_subprocess() {
    let (_tmp, layout) = setup();
    let runner = CountingRunner::default();
    let spec = PackageSpec::parse("foo").unwrap();

    let first = yoink_package(&TarBackend, &runner, &layout, &spec, "foo").unwrap();
    let calls_after_first = runner.calls.get();
    let second = yoink_package(&TarBackend, &runner, &layout, &spec, "foo").unwrap();

    assert_eq!(runner.calls.get(), calls_after_first);
    assert!(!second.fetched);
    assert_eq!(first.executable, second.executable);
}

#[test]
fn pinned_request_refetches_beside_latest() {
    let (_tmp, layout) = setup();
    let runner = CountingRunner::default();
    let latest = PackageSpec::parse("foo").unwrap();
    let pinned = PackageSpec::parse("foo@1.0").unwrap();

    let unpinned = yoink_package(&TarBackend, &runner, &layout, &latest, "foo").unwrap();
    yoink_package(&TarBackend, &runner, &layout, &pinned, "foo").unwrap();
    let calls = runner.calls.get();
    let again = yoink_package(&TarBackend, &runner, &layout, &pinned, "foo").unwrap();

    assert_eq!(runner.calls.get(), calls + 2);
    assert!(again.fetched);
    assert_ne!(unpinned.prefix, again.prefix);
    assert!(unpinned.prefix.join(".yoinked").is_file());
}

#[test]
fn failed_download_cleans_up() {
    let (_tmp, layout) = setup();
    let runner = CountingRunner::default();
    let spec = PackageSpec::parse("foo@broken").unwrap();
    let prefix = layout.install_prefix("fake", &spec);

    let err = yoink_package(&TarBackend, &runner, &layout, &spec, "foo").unwrap_err();

    let YoinkError::DownloadFailed { failure, .. } = &err else {
        panic!("expected download failure, got {:?}", err);
    };
    assert_eq!(failure.summary(), Some("no such version"));
    assert!(!prefix.exists());
    let leftovers = fs::read_dir(layout.downloads_dir()).unwrap().count();
    assert_eq!(leftovers, 0);
}

#[test]
fn wrong_command_name_is_reported_after_fetch() {
    let (_tmp, layout) = setup();
    let runner = CountingRunner::default();
    let spec = PackageSpec::parse("foo").unwrap();

    let err = yoink_package(&TarBackend, &runner, &layout, &spec, "bar").unwrap_err();

    assert!(matches!(err, YoinkError::CommandNotFound { .. }));
    assert!(layout.install_prefix("fake", &spec).join(".yoinked").is_file());
}

#[test]
fn registry_selection_is_deterministic() {
    let mut registry = BackendRegistry::new();
    registry.register("fake", || Box::new(TarBackend));
    registry.register("other", || Box::new(TarBackend));

    let picks: Vec<_> = (0..3)
        .map(|_| registry.get_active().map(|b| b.name()))
        .collect();
    assert_eq!(picks, vec![Some("fake"); 3]);
}

#[test]
fn purge_leaves_empty_root() {
    let (_tmp, layout) = setup();
    let runner = CountingRunner::default();
    let spec = PackageSpec::parse("foo").unwrap();
    yoink_package(&TarBackend, &runner, &layout, &spec, "foo").unwrap();

    layout.purge().unwrap();

    assert!(layout.root().is_dir());
    assert_eq!(fs::read_dir(layout.root()).unwrap().count(), 0);
}
