use std::fs;
use std::path::Path;
use unirecords_core::{
    AppContext, FileState, Fields, RecordsError, Settings, ShutdownOutcome,
};

fn settings(dir: &Path, passphrase: &str) -> Settings {
    Settings::new(dir.join("records.db")).with_encryption_key(passphrase)
}

/// Starts a context, stores one department, and shuts down.
fn seed_department(settings: &Settings, name: &str) -> i64 {
    let mut context = AppContext::start(settings.clone()).unwrap();
    let id = context
        .with_facade(|facade| {
            Ok(facade
                .departments()
                .create(&Fields::new().set("name", name))?
                .dept_id)
        })
        .unwrap();
    context.shutdown().unwrap();
    id
}

fn department_names(context: &mut AppContext) -> Vec<String> {
    context
        .with_facade(|facade| {
            Ok(facade
                .departments()
                .get_all()?
                .into_iter()
                .map(|dept| dept.name)
                .collect())
        })
        .unwrap()
}

#[test]
fn shutdown_then_startup_round_trips_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path(), "secret");
    seed_department(&settings, "Astronomy");

    assert!(!settings.database_path.exists());
    let sealed = fs::read(settings.encrypted_path()).unwrap();
    assert!(sealed.starts_with(b"UREC"));
    assert!(!sealed
        .windows(b"SQLite format 3".len())
        .any(|window| window == b"SQLite format 3"));

    let mut context = AppContext::start(settings.clone()).unwrap();
    assert!(context.startup_report().decrypted);
    assert_eq!(context.file_state(), FileState::PlaintextOnly);
    assert_eq!(department_names(&mut context), ["Astronomy"]);
    assert!(matches!(
        context.shutdown().unwrap(),
        ShutdownOutcome::Encrypted {
            plaintext_removed: true
        }
    ));
}

#[test]
fn repeated_startup_reconciliation_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path(), "secret");
    seed_department(&settings, "Botany");

    let lifecycle = unirecords_core::EncryptionLifecycle::from_settings(&settings);
    lifecycle.reconcile_startup().unwrap();
    let first = fs::read(&settings.database_path).unwrap();

    let report = lifecycle.reconcile_startup().unwrap();
    assert_eq!(report.initial_state, FileState::PlaintextOnly);
    assert_eq!(lifecycle.file_state(), FileState::PlaintextOnly);
    assert_eq!(fs::read(&settings.database_path).unwrap(), first);
}

#[test]
fn crash_with_both_files_present_keeps_the_encrypted_copy() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path(), "secret");
    seed_department(&settings, "Committed");

    // Simulate a crash after encrypting but before deleting the plaintext,
    // with later uncommitted changes in the plaintext file.
    fs::write(&settings.database_path, b"stale plaintext").unwrap();

    let mut context = AppContext::start(settings.clone()).unwrap();
    let report = *context.startup_report();
    assert_eq!(report.initial_state, FileState::BothPresent);
    assert!(report.discarded_stale_plaintext);
    assert!(report.decrypted);
    assert!(!settings.encrypted_path().exists());
    assert_eq!(department_names(&mut context), ["Committed"]);
}

#[test]
fn wrong_passphrase_is_fatal_and_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    seed_department(&settings(dir.path(), "secret"), "Sealed");

    let wrong = settings(dir.path(), "not-the-secret");
    let before = fs::read(wrong.encrypted_path()).unwrap();

    let err = AppContext::start(wrong.clone()).err().unwrap();
    assert!(matches!(err, RecordsError::Crypto(_)));
    assert!(err.is_fatal());
    assert!(!wrong.database_path.exists());
    assert_eq!(fs::read(wrong.encrypted_path()).unwrap(), before);
}

#[test]
fn wrong_passphrase_after_a_crash_keeps_both_files() {
    let dir = tempfile::tempdir().unwrap();
    let good = settings(dir.path(), "secret");
    seed_department(&good, "Sealed");
    fs::write(&good.database_path, b"left behind by a crash").unwrap();
    let sealed = fs::read(good.encrypted_path()).unwrap();

    let err = AppContext::start(settings(dir.path(), "typo")).err().unwrap();
    assert!(matches!(err, RecordsError::Crypto(_)));
    assert_eq!(
        fs::read(&good.database_path).unwrap(),
        b"left behind by a crash"
    );
    assert_eq!(fs::read(good.encrypted_path()).unwrap(), sealed);

    let mut context = AppContext::start(good).unwrap();
    assert!(context.startup_report().discarded_stale_plaintext);
    assert_eq!(department_names(&mut context), ["Sealed"]);
}

#[test]
fn plaintext_seeded_database_is_adopted() {
    let dir = tempfile::tempdir().unwrap();
    let plain = Settings::new(dir.path().join("records.db"));
    {
        let mut context = AppContext::start(plain.clone()).unwrap();
        context
            .with_facade(|facade| {
                facade
                    .departments()
                    .create(&Fields::new().set("name", "Seeded"))
                    .map(|_| ())
            })
            .unwrap();
        assert_eq!(context.shutdown().unwrap(), ShutdownOutcome::Disabled);
    }
    assert_eq!(
        fs::read(&plain.database_path).unwrap().get(..15),
        Some(&b"SQLite format 3"[..])
    );

    let encrypted = plain.clone().with_encryption_key("secret");
    let mut context = AppContext::start(encrypted.clone()).unwrap();
    let report = *context.startup_report();
    assert_eq!(report.initial_state, FileState::PlaintextOnly);
    assert!(report.encrypted_plaintext && report.decrypted);
    assert_eq!(department_names(&mut context), ["Seeded"]);
    context.shutdown().unwrap();
    assert_eq!(FileState::EncryptedOnly, {
        let lifecycle = unirecords_core::EncryptionLifecycle::from_settings(&encrypted);
        lifecycle.file_state()
    });
}

#[test]
fn shutdown_without_any_connection_has_nothing_to_encrypt() {
    let dir = tempfile::tempdir().unwrap();
    let context = AppContext::start(settings(dir.path(), "secret")).unwrap();
    assert_eq!(context.file_state(), FileState::Absent);
    assert_eq!(context.shutdown().unwrap(), ShutdownOutcome::NothingToEncrypt);
}

#[test]
fn sidecar_without_passphrase_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    seed_department(&settings(dir.path(), "secret"), "Locked");

    let err = AppContext::start(Settings::new(dir.path().join("records.db")))
        .err()
        .unwrap();
    assert!(matches!(err, RecordsError::Configuration(_)));
}

#[test]
fn missing_database_directory_is_rejected_before_any_file_work() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir.path().join("missing"), "secret");
    let err = AppContext::start(settings).err().unwrap();
    assert!(matches!(err, RecordsError::Configuration(_)));
}
