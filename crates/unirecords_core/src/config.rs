//! Process configuration for the persistence core.
//!
//! # Responsibility
//! - Resolve backing-file path, optional passphrase and feature flags.
//! - Validate file-system preconditions without side effects.
//!
//! # Invariants
//! - `get_settings()` initializes once and returns the same instance for the
//!   process lifetime.
//! - A missing or empty passphrase disables encryption entirely.
//! - The passphrase never appears in `Debug` output or logs.

use crate::error::{RecordsError, RecordsResult};
use crate::logging::default_log_level;
use once_cell::sync::OnceCell;
use std::fmt::{Debug, Formatter};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "UNIREC_DB_PATH";
pub const ENV_ENCRYPTION_KEY: &str = "DB_ENCRYPTION_KEY";
pub const ENV_FOREIGN_KEYS: &str = "UNIREC_FOREIGN_KEYS";
pub const ENV_ECHO_SQL: &str = "UNIREC_ECHO_SQL";
pub const ENV_LOG_LEVEL: &str = "UNIREC_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "UNIREC_LOG_DIR";

const DEFAULT_DB_PATH: &str = "database/university.db";

static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Encryption passphrase with redacted debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Passphrase(String);

impl Passphrase {
    /// Wraps a passphrase; returns `None` for empty input.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for Passphrase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Passphrase(<redacted>)")
    }
}

/// Immutable persistence settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Live plaintext SQLite file; the sidecar is `<path>.enc`.
    pub database_path: PathBuf,
    /// `None` disables at-rest encryption.
    pub encryption_key: Option<Passphrase>,
    pub foreign_keys_enabled: bool,
    /// Log every SQL statement at debug level.
    pub echo_sql: bool,
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` skips file logging.
    pub log_dir: Option<PathBuf>,
}

impl Settings {
    /// Builds settings for a given database path with default flags.
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            encryption_key: None,
            foreign_keys_enabled: true,
            echo_sql: false,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }

    pub fn with_encryption_key(mut self, passphrase: impl Into<String>) -> Self {
        self.encryption_key = Passphrase::new(passphrase);
        self
    }

    /// Reads settings from process environment variables.
    pub fn from_env() -> RecordsResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary key lookup.
    ///
    /// # Errors
    /// - Returns `Configuration` when a boolean flag cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> RecordsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup(ENV_DB_PATH)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let mut settings = Self::new(database_path);
        settings.encryption_key = lookup(ENV_ENCRYPTION_KEY).and_then(Passphrase::new);

        if let Some(raw) = lookup(ENV_FOREIGN_KEYS) {
            settings.foreign_keys_enabled = parse_flag(ENV_FOREIGN_KEYS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ECHO_SQL) {
            settings.echo_sql = parse_flag(ENV_ECHO_SQL, &raw)?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|value| !value.trim().is_empty()) {
            settings.log_level = level.trim().to_ascii_lowercase();
        }
        settings.log_dir = lookup(ENV_LOG_DIR)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(settings)
    }

    /// Returns the encrypted sidecar path `<database_path>.enc`.
    pub fn encrypted_path(&self) -> PathBuf {
        sidecar_path(&self.database_path, "enc")
    }

    pub fn encryption_enabled(&self) -> bool {
        self.encryption_key.is_some()
    }

    /// Checks file-system preconditions for the backing file.
    ///
    /// Pure check: nothing is created, truncated or removed.
    ///
    /// # Errors
    /// - The parent directory of the backing file does not exist.
    /// - An existing backing file cannot be opened for reading or writing.
    pub fn validate(&self) -> RecordsResult<()> {
        let parent = match self.database_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !parent.is_dir() {
            return Err(RecordsError::Configuration(format!(
                "database directory does not exist: {}",
                parent.display()
            )));
        }

        if self.database_path.exists() {
            if OpenOptions::new()
                .read(true)
                .open(&self.database_path)
                .is_err()
            {
                return Err(RecordsError::Configuration(format!(
                    "database file is not readable: {}",
                    self.database_path.display()
                )));
            }
            if OpenOptions::new()
                .write(true)
                .open(&self.database_path)
                .is_err()
            {
                return Err(RecordsError::Configuration(format!(
                    "database file is not writable: {}",
                    self.database_path.display()
                )));
            }
        }

        Ok(())
    }
}

/// Returns process-wide settings, reading the environment on first call.
///
/// # Errors
/// - Returns `Configuration` when the environment holds an invalid flag.
///   A failed initialization is not cached; the next call retries.
pub fn get_settings() -> RecordsResult<&'static Settings> {
    SETTINGS.get_or_try_init(Settings::from_env)
}

pub(crate) fn sidecar_path(path: &Path, extension: &str) -> PathBuf {
    let mut raw = path.as_os_str().to_os_string();
    raw.push(".");
    raw.push(extension);
    PathBuf::from(raw)
}

fn parse_flag(key: &str, raw: &str) -> RecordsResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        other => Err(RecordsError::Configuration(format!(
            "invalid boolean `{other}` for {key}; expected 1|0|true|false|on|off|yes|no"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{get_settings, parse_flag, sidecar_path, Passphrase, Settings};
    use super::{ENV_DB_PATH, ENV_ECHO_SQL, ENV_ENCRYPTION_KEY, ENV_FOREIGN_KEYS};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(settings.database_path, PathBuf::from("database/university.db"));
        assert!(settings.encryption_key.is_none());
        assert!(settings.foreign_keys_enabled);
        assert!(!settings.echo_sql);
    }

    #[test]
    fn lookup_overrides_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/tmp/records.db"),
            (ENV_ENCRYPTION_KEY, "secret"),
            (ENV_FOREIGN_KEYS, "off"),
            (ENV_ECHO_SQL, "TRUE"),
        ]))
        .unwrap();

        assert_eq!(settings.database_path, PathBuf::from("/tmp/records.db"));
        assert_eq!(
            settings.encryption_key.as_ref().map(Passphrase::expose),
            Some("secret")
        );
        assert!(!settings.foreign_keys_enabled);
        assert!(settings.echo_sql);
        assert_eq!(settings.encrypted_path(), PathBuf::from("/tmp/records.db.enc"));
    }

    #[test]
    fn empty_passphrase_disables_encryption() {
        let settings =
            Settings::from_lookup(lookup_from(&[(ENV_ENCRYPTION_KEY, "")])).unwrap();
        assert!(!settings.encryption_enabled());
    }

    #[test]
    fn invalid_flag_is_configuration_error() {
        let err = parse_flag(ENV_ECHO_SQL, "maybe").unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains(ENV_ECHO_SQL));
    }

    #[test]
    fn debug_output_redacts_passphrase() {
        let settings = Settings::new("db").with_encryption_key("hunter2");
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("redacted"));
    }

    #[test]
    fn validate_rejects_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::new(dir.path().join("missing").join("records.db"));
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn validate_accepts_existing_directory_without_creating_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.db");
        Settings::new(&path).validate().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn sidecar_path_appends_extension() {
        assert_eq!(
            sidecar_path(Path::new("data/uni.db"), "enc"),
            PathBuf::from("data/uni.db.enc")
        );
    }

    #[test]
    fn get_settings_returns_same_instance() {
        let first = get_settings().unwrap();
        let second = get_settings().unwrap();
        assert!(std::ptr::eq(first, second));
    }
}
