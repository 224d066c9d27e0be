//! At-rest encryption lifecycle for the backing database file.
//!
//! # Responsibility
//! - Bring the backing file to plaintext-only state before any connection.
//! - Re-encrypt to encrypted-only state after every connection is released.
//!
//! # Invariants
//! - `<path>.enc` only ever appears through an atomic rename, so it is
//!   always a complete container.
//! - When both files exist the encrypted copy wins; the plaintext is stale.
//! - A failed decrypt leaves every file untouched.
//! - Only the shutdown plaintext delete may fail quietly; startup cleans up.

use crate::config::{sidecar_path, Settings};
use crate::db::ConnectionProvider;
use crate::encryption::cipher::{decrypt, encrypt, DerivedKey};
use crate::error::{RecordsError, RecordsResult};
use log::{error, info, warn};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// File-system configuration of the backing file and its sidecar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Absent,
    PlaintextOnly,
    EncryptedOnly,
    /// Left behind by a crash between a write and the matching delete.
    BothPresent,
}

impl FileState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::PlaintextOnly => "plaintext_only",
            Self::EncryptedOnly => "encrypted_only",
            Self::BothPresent => "both_present",
        }
    }
}

/// Steps taken by one startup reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupReport {
    pub initial_state: FileState,
    pub discarded_stale_plaintext: bool,
    pub encrypted_plaintext: bool,
    pub decrypted: bool,
}

/// Outcome of shutdown re-encryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// No passphrase configured.
    Disabled,
    /// No plaintext file to encrypt.
    NothingToEncrypt,
    Encrypted { plaintext_removed: bool },
}

/// Encryption lifecycle manager for one backing file.
#[derive(Debug)]
pub struct EncryptionLifecycle {
    plain_path: PathBuf,
    enc_path: PathBuf,
    staging_path: PathBuf,
    key: Option<DerivedKey>,
}

impl EncryptionLifecycle {
    /// Derives the key once from settings; no passphrase means pass-through.
    pub fn from_settings(settings: &Settings) -> Self {
        let key = settings.encryption_key.as_ref().map(DerivedKey::derive);
        Self::with_key(&settings.database_path, key)
    }

    pub fn with_key(database_path: impl Into<PathBuf>, key: Option<DerivedKey>) -> Self {
        let plain_path = database_path.into();
        let enc_path = sidecar_path(&plain_path, "enc");
        let staging_path = sidecar_path(&enc_path, "tmp");
        Self {
            plain_path,
            enc_path,
            staging_path,
            key,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.key.is_some()
    }

    pub fn plaintext_path(&self) -> &Path {
        &self.plain_path
    }

    pub fn encrypted_path(&self) -> &Path {
        &self.enc_path
    }

    pub fn file_state(&self) -> FileState {
        match (self.plain_path.exists(), self.enc_path.exists()) {
            (false, false) => FileState::Absent,
            (true, false) => FileState::PlaintextOnly,
            (false, true) => FileState::EncryptedOnly,
            (true, true) => FileState::BothPresent,
        }
    }

    /// Reconciles on-disk state so only the plaintext file remains.
    ///
    /// Must run once, before the connection provider opens the file.
    ///
    /// # Errors
    /// - `Crypto` when the sidecar cannot be authenticated or parsed; fatal,
    ///   and both files are left as they were.
    /// - `Configuration` when a sidecar exists but no passphrase is set and
    ///   there is no plaintext file to fall back to.
    /// - `FileSystem` when a read, write or delete fails.
    pub fn reconcile_startup(&self) -> RecordsResult<StartupReport> {
        let started_at = Instant::now();
        let initial_state = self.file_state();
        let mut report = StartupReport {
            initial_state,
            discarded_stale_plaintext: false,
            encrypted_plaintext: false,
            decrypted: false,
        };

        let Some(key) = self.key.as_ref() else {
            return self.pass_through(report);
        };

        info!(
            "event=encryption_startup module=encryption status=start state={}",
            initial_state.as_str()
        );
        self.remove_staging_leftover();

        if initial_state == FileState::PlaintextOnly {
            self.encrypt_plaintext(key)?;
            remove_file(&self.plain_path)?;
            report.encrypted_plaintext = true;
        }

        if self.enc_path.exists() {
            // Authenticate before touching either file.
            let container = read_file(&self.enc_path)?;
            let plaintext = decrypt(key, &container).map_err(|err| {
                error!(
                    "event=encryption_startup module=encryption status=error error_code=decrypt_failed path={} error={}",
                    self.enc_path.display(),
                    err
                );
                RecordsError::from(err)
            })?;

            if self.plain_path.exists() {
                warn!(
                    "event=encryption_startup module=encryption status=recover action=discard_stale_plaintext path={}",
                    self.plain_path.display()
                );
                report.discarded_stale_plaintext = true;
            }
            write_file(&self.plain_path, &plaintext)?;
            remove_file(&self.enc_path)?;
            report.decrypted = true;
        }

        info!(
            "event=encryption_startup module=encryption status=ok state={} duration_ms={}",
            self.file_state().as_str(),
            started_at.elapsed().as_millis()
        );
        Ok(report)
    }

    /// Releases every connection, then encrypts the plaintext file.
    ///
    /// # Errors
    /// - `Database` when the provider cannot release its handle.
    /// - `FileSystem` / `Crypto` when the sidecar cannot be produced. The
    ///   plaintext file is kept in that case.
    pub fn reconcile_shutdown(
        &self,
        provider: &mut ConnectionProvider,
    ) -> RecordsResult<ShutdownOutcome> {
        provider.dispose()?;

        let Some(key) = self.key.as_ref() else {
            info!("event=encryption_shutdown module=encryption status=skipped reason=disabled");
            return Ok(ShutdownOutcome::Disabled);
        };

        if !self.plain_path.exists() {
            warn!(
                "event=encryption_shutdown module=encryption status=skipped reason=no_plaintext path={}",
                self.plain_path.display()
            );
            return Ok(ShutdownOutcome::NothingToEncrypt);
        }

        let started_at = Instant::now();
        info!("event=encryption_shutdown module=encryption status=start");
        self.encrypt_plaintext(key)?;

        // Next startup discards a plaintext that survives here.
        let plaintext_removed = remove_plaintext_best_effort(&self.plain_path);

        info!(
            "event=encryption_shutdown module=encryption status=ok plaintext_removed={} duration_ms={}",
            plaintext_removed,
            started_at.elapsed().as_millis()
        );
        Ok(ShutdownOutcome::Encrypted { plaintext_removed })
    }

    fn pass_through(&self, report: StartupReport) -> RecordsResult<StartupReport> {
        match report.initial_state {
            FileState::EncryptedOnly => {
                error!(
                    "event=encryption_startup module=encryption status=error error_code=missing_passphrase path={}",
                    self.enc_path.display()
                );
                Err(RecordsError::Configuration(format!(
                    "encrypted database `{}` exists but no encryption passphrase is configured",
                    self.enc_path.display()
                )))
            }
            FileState::BothPresent => {
                warn!(
                    "event=encryption_startup module=encryption status=skipped reason=disabled ignored_sidecar={}",
                    self.enc_path.display()
                );
                Ok(report)
            }
            FileState::Absent | FileState::PlaintextOnly => {
                info!("event=encryption_startup module=encryption status=skipped reason=disabled");
                Ok(report)
            }
        }
    }

    fn encrypt_plaintext(&self, key: &DerivedKey) -> RecordsResult<()> {
        let plaintext = read_file(&self.plain_path)?;
        let container = encrypt(key, &plaintext)?;
        write_file(&self.staging_path, &container)?;
        fs::rename(&self.staging_path, &self.enc_path)
            .map_err(|err| RecordsError::file_system("rename", &self.staging_path, err))
    }

    fn remove_staging_leftover(&self) {
        if self.staging_path.exists() {
            if let Err(err) = fs::remove_file(&self.staging_path) {
                warn!(
                    "event=encryption_startup module=encryption status=degraded error_code=staging_delete_failed path={} error={}",
                    self.staging_path.display(),
                    err
                );
            }
        }
    }
}

fn read_file(path: &Path) -> RecordsResult<Vec<u8>> {
    fs::read(path).map_err(|err| RecordsError::file_system("read", path, err))
}

fn write_file(path: &Path, bytes: &[u8]) -> RecordsResult<()> {
    let mut file =
        File::create(path).map_err(|err| RecordsError::file_system("create", path, err))?;
    file.write_all(bytes)
        .and_then(|()| file.sync_all())
        .map_err(|err| RecordsError::file_system("write", path, err))
}

/// Deletes `path`, logging instead of failing; returns whether it is gone.
fn remove_plaintext_best_effort(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(err) => {
            warn!(
                "event=encryption_shutdown module=encryption status=degraded error_code=plaintext_delete_failed path={} error={}",
                path.display(),
                err
            );
            false
        }
    }
}

fn remove_file(path: &Path) -> RecordsResult<()> {
    fs::remove_file(path).map_err(|err| RecordsError::file_system("delete", path, err))
}
