use core_music::data::install_config::{ConfigStore, InstallConfig};
use core_music::data::paths::Paths;
use core_music::install::script::{ScriptHost, ScriptOutcome};
use core_music::install::shortcut::{shortcut_path, ShortcutTarget, SHORTCUT_FILE_NAME};
use core_music::install::{
    InstallError, InstallOption, InstallerController, ShortcutKind, ShortcutProvisioner, ShortcutStage,
};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

/// Behaves like a script host that works: the script names the link to write.
struct FakeHost;

impl ScriptHost for FakeHost {
    fn extension(&self) -> &'static str {
        ".txt"
    }

    fn render(&self, link: &Path, target: &ShortcutTarget) -> String {
        format!("{}\n{}", link.display(), target.executable_path.display())
    }

    fn run(&self, script: &Path) -> io::Result<ScriptOutcome> {
        let raw = fs::read_to_string(script)?;
        let (link, exe) = raw.split_once('\n').unwrap_or((raw.as_str(), ""));
        fs::write(link, exe)?;
        Ok(ScriptOutcome { code: Some(0), output: String::new() })
    }
}

/// Exits cleanly but never produces a shortcut.
struct SilentFailureHost;

impl ScriptHost for SilentFailureHost {
    fn extension(&self) -> &'static str {
        ".txt"
    }

    fn render(&self, _link: &Path, _target: &ShortcutTarget) -> String {
        String::new()
    }

    fn run(&self, _script: &Path) -> io::Result<ScriptOutcome> {
        Ok(ScriptOutcome { code: Some(0), output: String::new() })
    }
}

fn controller<H: ScriptHost>(root: &Path, host: H) -> InstallerController<H> {
    let paths = Paths::rooted(root);
    InstallerController::new(
        ConfigStore::new(paths.config_file.clone()),
        ShortcutProvisioner::new(paths, host),
        Duration::from_millis(500),
    )
}

fn write_config(store: &ConfigStore, cfg: &InstallConfig) {
    assert!(store.save(cfg));
}

#[test]
fn first_run_through_desktop_shortcut() {
    let tmp = tempfile::tempdir().unwrap();
    let ctl = controller(tmp.path(), FakeHost);

    assert!(ctl.needs_install());

    let msg = ctl.choose_option("desktop").unwrap();
    assert_eq!(msg, "Desktop shortcut created");

    let link = shortcut_path(&Paths::rooted(tmp.path()), ShortcutKind::Desktop);
    assert!(link.exists());
    let cfg = ctl.store().load();
    assert!(cfg.shortcut_created);
    assert!(!cfg.skip_install);
    assert_eq!(cfg.shortcut_path.as_deref(), Some(link.as_path()));

    // next start goes straight to the player
    assert!(!ctl.needs_install());
}

#[test]
fn desktop_shortcut_twice_leaves_one_file() {
    let tmp = tempfile::tempdir().unwrap();
    let ctl = controller(tmp.path(), FakeHost);
    let desktop = Paths::rooted(tmp.path()).desktop_dir;

    for _ in 0..2 {
        ctl.choose(InstallOption::Desktop).unwrap();
        let cfg = ctl.store().load();
        assert!(cfg.shortcut_created);
        assert_eq!(cfg.shortcut_path, Some(desktop.join(SHORTCUT_FILE_NAME)));
    }

    let entries: Vec<_> = fs::read_dir(&desktop).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn start_menu_choice_records_its_own_path() {
    let tmp = tempfile::tempdir().unwrap();
    let ctl = controller(tmp.path(), FakeHost);

    assert_eq!(ctl.choose_option("startmenu").unwrap(), "Start menu shortcut created");

    let expected = shortcut_path(&Paths::rooted(tmp.path()), ShortcutKind::StartMenu);
    assert_eq!(ctl.store().load().shortcut_path, Some(expected.clone()));
    assert!(expected.exists());
    assert!(!ctl.needs_install());
}

#[test]
fn choosing_none_always_ends_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let ctl = controller(tmp.path(), FakeHost);

    let priors = [
        InstallConfig::default(),
        InstallConfig {
            shortcut_created: true,
            shortcut_path: Some(tmp.path().join("old.lnk")),
            ..InstallConfig::default()
        },
        InstallConfig { skip_install: true, ..InstallConfig::default() },
    ];
    for prior in priors {
        write_config(ctl.store(), &prior);

        assert_eq!(ctl.choose_option("none").unwrap(), "Shortcut creation skipped");

        let cfg = ctl.store().load();
        assert!(cfg.skip_install);
        assert!(!cfg.shortcut_created);
    }
}

#[test]
fn skip_matches_choosing_none() {
    let tmp = tempfile::tempdir().unwrap();
    let ctl = controller(tmp.path(), FakeHost);
    ctl.choose(InstallOption::Desktop).unwrap();

    assert_eq!(ctl.skip().unwrap(), "Installation skipped");

    let cfg = ctl.store().load();
    assert!(cfg.skip_install);
    assert!(!cfg.shortcut_created);
    assert!(!ctl.needs_install());
}

#[test]
fn bogus_option_leaves_config_untouched() {
    let tmp = tempfile::tempdir().unwrap();
    let ctl = controller(tmp.path(), FakeHost);

    assert!(matches!(ctl.choose_option("bogus"), Err(InstallError::InvalidOption(_))));
    assert!(!ctl.store().path().exists());

    let mut cfg = InstallConfig::default();
    cfg.mark_shortcut(tmp.path().join("somewhere.lnk"));
    write_config(ctl.store(), &cfg);
    let before = fs::read(ctl.store().path()).unwrap();

    assert!(ctl.choose_option("bogus").is_err());

    assert_eq!(fs::read(ctl.store().path()).unwrap(), before);
}

#[test]
fn failed_provisioning_keeps_config_and_reports_stage() {
    let tmp = tempfile::tempdir().unwrap();
    let ctl = controller(tmp.path(), SilentFailureHost);
    write_config(ctl.store(), &InstallConfig::default());
    let before = fs::read(ctl.store().path()).unwrap();

    let err = ctl.choose_option("desktop").unwrap_err();

    match err {
        InstallError::Shortcut(e) => assert_eq!(e.stage, ShortcutStage::PostCheck),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fs::read(ctl.store().path()).unwrap(), before);
    assert!(ctl.needs_install());
}

#[test]
fn skip_wins_regardless_of_shortcuts_on_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let ctl = controller(tmp.path(), FakeHost);

    write_config(ctl.store(), &InstallConfig { skip_install: true, ..InstallConfig::default() });
    assert!(!ctl.needs_install());

    ctl.choose(InstallOption::Desktop).unwrap();
    write_config(
        ctl.store(),
        &InstallConfig {
            skip_install: true,
            shortcut_created: true,
            shortcut_path: Some(tmp.path().join("missing.lnk")),
            ..InstallConfig::default()
        },
    );
    assert!(!ctl.needs_install());
    // skip short-circuits before any backfill
    assert_eq!(ctl.store().load().shortcut_path, Some(tmp.path().join("missing.lnk")));
}

#[test]
fn lost_config_is_backfilled_from_desktop_shortcut() {
    let tmp = tempfile::tempdir().unwrap();
    let ctl = controller(tmp.path(), FakeHost);
    ctl.choose(InstallOption::Desktop).unwrap();
    write_config(ctl.store(), &InstallConfig::default());

    assert!(!ctl.needs_install());

    let cfg = ctl.store().load();
    assert!(cfg.shortcut_created);
    assert_eq!(
        cfg.shortcut_path,
        Some(shortcut_path(&Paths::rooted(tmp.path()), ShortcutKind::Desktop))
    );
}

#[test]
fn shortcut_deleted_by_user_is_noticed_on_next_decision() {
    let tmp = tempfile::tempdir().unwrap();
    let ctl = controller(tmp.path(), FakeHost);
    ctl.choose(InstallOption::Desktop).unwrap();
    assert!(!ctl.needs_install());

    let link = ctl.store().load().shortcut_path.unwrap();
    fs::remove_file(&link).unwrap();

    // the stale record stays until the next decision, which asks again
    assert!(ctl.store().load().shortcut_created);
    assert!(ctl.needs_install());
}

#[test]
fn removing_the_recorded_shortcut_clears_it_from_config() {
    let tmp = tempfile::tempdir().unwrap();
    let ctl = controller(tmp.path(), FakeHost);
    ctl.choose(InstallOption::StartMenu).unwrap();

    assert_eq!(ctl.remove_shortcut(ShortcutKind::Desktop).unwrap(), "No desktop shortcut to remove");
    assert!(ctl.store().load().shortcut_created);

    assert_eq!(ctl.remove_shortcut(ShortcutKind::StartMenu).unwrap(), "Removed start menu shortcut");
    let cfg = ctl.store().load();
    assert!(!cfg.shortcut_created);
    assert_eq!(cfg.shortcut_path, None);
    assert!(ctl.needs_install());
}

#[test]
fn corrupt_config_reads_as_defaults_and_is_overwritten() {
    let tmp = tempfile::tempdir().unwrap();
    let ctl = controller(tmp.path(), FakeHost);
    fs::create_dir_all(ctl.store().path().parent().unwrap()).unwrap();
    fs::write(ctl.store().path(), [0xff, 0xfe, 0x00]).unwrap();

    assert_eq!(ctl.store().load(), InstallConfig::default());
    assert!(ctl.needs_install());

    ctl.choose(InstallOption::None).unwrap();
    let raw = fs::read_to_string(ctl.store().path()).unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(&raw).is_ok());
}

#[test]
fn complete_install_uses_configured_delay() {
    let tmp = tempfile::tempdir().unwrap();
    let ctl = controller(tmp.path(), FakeHost);
    assert_eq!(ctl.complete_install().after, Duration::from_millis(500));
}
