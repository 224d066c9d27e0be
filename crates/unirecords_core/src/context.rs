//! Application lifetime: startup reconciliation, connections, shutdown.
//!
//! # Responsibility
//! - Own the settings, encryption lifecycle and connection provider for one
//!   backing file.
//! - Run startup reconciliation before any connection is opened and
//!   shutdown re-encryption after the last one is released.
//!
//! # Invariants
//! - Facades borrow the context mutably, so `shutdown()` cannot run while a
//!   facade is alive.
//! - Shutdown runs at most once; `Drop` runs it if the caller did not.

use crate::config::{get_settings, Settings};
use crate::db::ConnectionProvider;
use crate::encryption::{EncryptionLifecycle, FileState, ShutdownOutcome, StartupReport};
use crate::error::RecordsResult;
use crate::logging::init_logging;
use crate::repo::RepositoryFacade;
use log::{error, info};
use rusqlite::Connection;

pub struct AppContext {
    settings: Settings,
    lifecycle: EncryptionLifecycle,
    provider: ConnectionProvider,
    startup: StartupReport,
    shut_down: bool,
}

impl AppContext {
    /// Validates `settings`, starts file logging when a log directory is
    /// configured, and reconciles the on-disk files.
    ///
    /// # Errors
    /// - `Configuration` for unusable paths, log settings or a missing
    ///   passphrase.
    /// - `Crypto` when the encrypted file cannot be decrypted; no file is
    ///   modified in that case.
    /// - `FileSystem` when reconciliation I/O fails.
    pub fn start(settings: Settings) -> RecordsResult<Self> {
        settings.validate()?;
        if let Some(log_dir) = settings.log_dir.as_deref() {
            init_logging(&settings.log_level, log_dir)?;
        }

        let lifecycle = EncryptionLifecycle::from_settings(&settings);
        let startup = lifecycle.reconcile_startup()?;
        let provider = ConnectionProvider::new(&settings);
        info!(
            "event=app_start module=context status=ok encryption={} initial_state={}",
            lifecycle.is_enabled(),
            startup.initial_state.as_str()
        );

        Ok(Self {
            settings,
            lifecycle,
            provider,
            startup,
            shut_down: false,
        })
    }

    /// Starts with the process-wide settings read from the environment.
    pub fn from_env() -> RecordsResult<Self> {
        Self::start(get_settings()?.clone())
    }

    /// Like [`Self::start`], but terminates the process with status 1 on
    /// any startup failure.
    pub fn start_or_exit(settings: Settings) -> Self {
        match Self::start(settings) {
            Ok(context) => context,
            Err(err) => {
                error!(
                    "event=app_start module=context status=error fatal={} error={}",
                    err.is_fatal(),
                    err
                );
                eprintln!("unirecords: startup failed: {err}");
                std::process::exit(1);
            }
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn startup_report(&self) -> &StartupReport {
        &self.startup
    }

    pub fn file_state(&self) -> FileState {
        self.lifecycle.file_state()
    }

    /// Returns the shared connection, opening it on first use.
    pub fn connection(&mut self) -> RecordsResult<&Connection> {
        Ok(self.provider.get()?)
    }

    /// Begins a new unit of work and returns a facade over it.
    pub fn facade(&mut self) -> RecordsResult<RepositoryFacade<'_>> {
        let conn = self.provider.get()?;
        Ok(RepositoryFacade::new(conn)?)
    }

    /// Runs `work` in a fresh facade; commits on `Ok`, rolls back on `Err`.
    pub fn with_facade<T, F>(&mut self, work: F) -> RecordsResult<T>
    where
        F: FnOnce(&RepositoryFacade<'_>) -> RecordsResult<T>,
    {
        let facade = self.facade()?;
        match work(&facade) {
            Ok(value) => {
                if facade.unit_of_work().is_active() {
                    facade.commit()?;
                }
                Ok(value)
            }
            Err(err) => {
                if let Err(close_err) = facade.close() {
                    error!(
                        "event=facade_close module=context status=error phase=with_facade error={}",
                        close_err
                    );
                }
                Err(err)
            }
        }
    }

    /// Releases the connection and re-encrypts the backing file.
    pub fn shutdown(mut self) -> RecordsResult<ShutdownOutcome> {
        self.run_shutdown()
    }

    fn run_shutdown(&mut self) -> RecordsResult<ShutdownOutcome> {
        self.shut_down = true;
        let outcome = self.lifecycle.reconcile_shutdown(&mut self.provider)?;
        info!("event=app_shutdown module=context status=ok outcome={:?}", outcome);
        Ok(outcome)
    }
}

impl Drop for AppContext {
    fn drop(&mut self) {
        if self.shut_down {
            return;
        }
        if let Err(err) = self.run_shutdown() {
            error!(
                "event=app_shutdown module=context status=error phase=drop error={}",
                err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppContext;
    use crate::config::Settings;
    use crate::encryption::{FileState, ShutdownOutcome};
    use crate::model::Fields;

    #[test]
    fn drop_reencrypts_when_shutdown_was_not_called() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::new(dir.path().join("records.db")).with_encryption_key("k");
        {
            let mut context = AppContext::start(settings.clone()).unwrap();
            context
                .with_facade(|facade| {
                    facade
                        .departments()
                        .create(&Fields::new().set("name", "Law"))
                        .map(|_| ())
                })
                .unwrap();
        }
        assert!(!settings.database_path.exists());
        assert!(settings.encrypted_path().exists());
    }

    #[test]
    fn with_facade_rolls_back_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut context = AppContext::start(Settings::new(dir.path().join("records.db"))).unwrap();

        let result: crate::error::RecordsResult<()> = context.with_facade(|facade| {
            facade
                .departments()
                .create(&Fields::new().set("name", "Law"))?;
            facade.departments().get_by_id(999).map(|_| ())
        });
        assert!(result.is_err());

        let count = context
            .with_facade(|facade| facade.departments().count())
            .unwrap();
        assert_eq!(count, 0);
        assert_eq!(context.file_state(), FileState::PlaintextOnly);
        assert_eq!(context.shutdown().unwrap(), ShutdownOutcome::Disabled);
    }
}
