//! At-rest encryption of the backing database file.
//!
//! # Responsibility
//! - Derive the file key from the configured passphrase.
//! - Reconcile plaintext/sidecar state at startup and shutdown.
//!
//! # Invariants
//! - Without a passphrase every operation is an explicit, logged pass-through.
//! - Authentication failures are fatal and never trigger partial recovery.

mod cipher;
pub mod lifecycle;

pub use cipher::{decrypt, encrypt, CryptoError, DerivedKey, KDF_ITERATIONS, KDF_SALT, KEY_LEN};
pub use lifecycle::{EncryptionLifecycle, FileState, ShutdownOutcome, StartupReport};
