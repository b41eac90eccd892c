mod common;

use std::fs;

use allowance_core::{
    config::{BackendKind, Config, ConfigManager, StorageSettings},
    ledger::MalformedLinePolicy,
    storage::{FileStorage, StorageBackend},
    utils::persistence::tmp_path,
    LedgerError, LedgerSession, Record,
};
use assert_fs::prelude::*;
use common::{file_session, reopen_file, temp_base};
use predicates::prelude::*;

#[test]
fn ledger_survives_restart() {
    let (mut session, path) = file_session();
    session.submit_new("2024/06/01", "3000", "allowance").unwrap();
    session.submit_new("2024/06/02", "-450", "comic, vol. 3").unwrap();
    drop(session);

    let reopened = reopen_file(&path);
    let snapshot = reopened.get_snapshot();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[0].memo(), "comic, vol. 3");
    assert_eq!(reopened.get_total_display().display, "¥2,550");
}

#[test]
fn empty_ledger_persists_as_empty_file() {
    let (mut session, path) = file_session();
    assert!(session.is_empty());
    session.submit_new("2024/06/01", "1", "").unwrap();
    session.toggle_mark(0).unwrap();
    session.request_delete_marked().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn file_content_matches_line_format() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("docs/allowance.txt");
    let storage = FileStorage::new(file.path()).unwrap();
    let mut session = LedgerSession::new(Box::new(storage), &Config::default()).unwrap();

    session.submit_new("2024/1/1", "500", "").unwrap();
    session.submit_new("2024/1/2", "-120", "juice").unwrap();

    file.assert("2024/1/2,-120,juice\n2024/1/1,500,");
    temp.child("docs/allowance.txt.tmp").assert(predicate::path::missing());
}

#[test]
fn deleting_marked_records_is_reflected_on_disk() {
    let (mut session, path) = file_session();
    for amount in ["1", "2", "3", "4", "5"] {
        session.submit_new("2024/1/1", amount, "").unwrap();
    }
    session.toggle_mark(1).unwrap();
    session.toggle_mark(3).unwrap();
    session.request_delete_marked().unwrap();

    let storage = FileStorage::new(&path).unwrap();
    assert_eq!(
        storage.load().unwrap(),
        "2024/1/1,5,\n2024/1/1,3,\n2024/1/1,1,"
    );
}

#[test]
fn malformed_lines_are_skipped_by_default() {
    let temp = temp_base();
    let path = temp.join("allowance.txt");
    fs::write(&path, "2024/1/1,100,ok\n2024/1/2,200\n\n2024/1/3,oops,bad amount\n").unwrap();

    let session = reopen_file(&path);
    assert_eq!(session.len(), 2);
    assert_eq!(session.load_warnings().len(), 1);
    assert!(session.load_warnings()[0].starts_with("line 2:"));
    assert_eq!(session.get_total_display().total, 100);
}

#[test]
fn malformed_lines_abort_when_configured() {
    let base = temp_base();
    let config = Config {
        malformed_lines: MalformedLinePolicy::Abort,
        ..Config::default()
    };
    let data = base.join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join(&config.storage.file_name), "2024/1/2,200\n").unwrap();

    let err = LedgerSession::open(&config, &base).unwrap_err();
    assert!(matches!(err, LedgerError::MalformedRecord { fields: 2, .. }));
}

#[test]
fn failed_write_keeps_previous_file() {
    let (mut session, path) = file_session();
    session.submit_new("2024/1/1", "10", "kept").unwrap();
    let original = fs::read_to_string(&path).unwrap();

    // Create directory that collides with the temp file name to force File::create to fail.
    let tmp = tmp_path(&path);
    fs::create_dir_all(&tmp).unwrap();

    let err = session.submit_new("2024/1/2", "20", "lost").unwrap_err();
    assert!(matches!(err, LedgerError::Persistence(_)));
    assert_eq!(session.len(), 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), original);

    fs::remove_dir_all(&tmp).unwrap();
    session.submit_new("2024/1/2", "20", "retried").unwrap();
    assert_eq!(reopen_file(&path).len(), 2);
}

#[test]
fn preference_backend_from_config() {
    let base = temp_base();
    let manager = ConfigManager::with_base_dir(base.clone()).unwrap();
    let mut config = manager.load().unwrap();
    config.storage.backend = BackendKind::Preferences;
    manager.save(&config).unwrap();

    let config = manager.load().unwrap();
    let mut session = LedgerSession::open(&config, manager.base_dir()).unwrap();
    session.submit_new("2024/2/1", "1000", "gift").unwrap();
    drop(session);

    let prefs = fs::read_to_string(base.join("data").join("preferences.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&prefs).unwrap();
    assert_eq!(parsed["allowance_list"], "2024/2/1,1000,gift");

    let reopened = LedgerSession::open(&config, &base).unwrap();
    assert_eq!(reopened.get_total_display().display, "¥1,000");
}

#[test]
fn overwritten_memo_with_line_break_reloads_intact() {
    let (mut session, path) = file_session();
    let record = Record::parse("2024/1/1", "10", "two\nlines").unwrap();
    session.overwrite(vec![record]).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "2024/1/1,10,two lines");
    drop(session);

    let reopened = reopen_file(&path);
    assert!(reopened.load_warnings().is_empty());
    assert_eq!(reopened.get_snapshot()[0].memo(), "two lines");
}

#[test]
fn preference_file_with_mixed_values_stays_readable() {
    let base = temp_base();
    let config = Config {
        storage: StorageSettings {
            backend: BackendKind::Preferences,
            ..StorageSettings::default()
        },
        ..Config::default()
    };
    let data = base.join("data");
    fs::create_dir_all(&data).unwrap();
    let prefs = data.join(&config.storage.preference_file);
    fs::write(
        &prefs,
        r#"{"theme":"dark","launch_count":3,"allowance_list":"2024/1/1,10,a"}"#,
    )
    .unwrap();

    let mut session = LedgerSession::open(&config, &base).unwrap();
    assert_eq!(session.get_total_display().total, 10);
    session.submit_new("2024/1/2", "5", "b").unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(&prefs).unwrap()).unwrap();
    assert_eq!(parsed["launch_count"], 3);
    assert_eq!(parsed["allowance_list"], "2024/1/2,5,b\n2024/1/1,10,a");
}
