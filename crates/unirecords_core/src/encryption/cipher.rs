//! Passphrase key derivation and whole-file authenticated encryption.
//!
//! Container layout: `UREC` magic, one format-version byte, a 12-byte random
//! nonce, then the AES-256-GCM ciphertext with its 16-byte tag.

use crate::config::Passphrase;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use std::fmt::{Debug, Formatter};

pub const KDF_ITERATIONS: u32 = 100_000;
pub const KDF_SALT: &[u8] = b"university-db";
pub const KEY_LEN: usize = 32;

const MAGIC: &[u8; 4] = b"UREC";
const FORMAT_VERSION: u8 = 1;
const HEADER_LEN: usize = MAGIC.len() + 1;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Failures producing or opening an encrypted container.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    /// Tag mismatch: wrong passphrase or tampered file.
    #[error("failed to decrypt database: authentication failed (wrong DB_ENCRYPTION_KEY?)")]
    Authentication,
    #[error("encrypted database is malformed: {0}")]
    MalformedContainer(&'static str),
    #[error("encrypted database uses unsupported format version {0}")]
    UnsupportedVersion(u8),
    #[error("failed to encrypt database contents")]
    Encryption,
}

/// 256-bit symmetric key derived from the configured passphrase.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    /// Runs PBKDF2-HMAC-SHA256 with the fixed application salt.
    pub fn derive(passphrase: &Passphrase) -> Self {
        let mut key = [0u8; KEY_LEN];
        pbkdf2_hmac::<Sha256>(
            passphrase.expose().as_bytes(),
            KDF_SALT,
            KDF_ITERATIONS,
            &mut key,
        );
        Self(key)
    }

    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.0))
    }
}

impl Debug for DerivedKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(<redacted>)")
    }
}

/// Encrypts `plaintext` into a self-describing container.
pub fn encrypt(key: &DerivedKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = key
        .cipher()
        .encrypt(&nonce, plaintext)
        .map_err(|_| CryptoError::Encryption)?;

    let mut container = Vec::with_capacity(HEADER_LEN + NONCE_LEN + ciphertext.len());
    container.extend_from_slice(MAGIC);
    container.push(FORMAT_VERSION);
    container.extend_from_slice(nonce.as_slice());
    container.extend_from_slice(&ciphertext);
    Ok(container)
}

/// Opens a container produced by [`encrypt`].
///
/// # Errors
/// - `MalformedContainer` / `UnsupportedVersion` when the header is wrong.
/// - `Authentication` when the key is wrong or the payload was modified.
pub fn decrypt(key: &DerivedKey, container: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if container.len() < HEADER_LEN + NONCE_LEN + TAG_LEN {
        return Err(CryptoError::MalformedContainer("container is truncated"));
    }
    if &container[..MAGIC.len()] != MAGIC {
        return Err(CryptoError::MalformedContainer("missing container magic"));
    }
    let version = container[MAGIC.len()];
    if version != FORMAT_VERSION {
        return Err(CryptoError::UnsupportedVersion(version));
    }

    let nonce = Nonce::from_slice(&container[HEADER_LEN..HEADER_LEN + NONCE_LEN]);
    key.cipher()
        .decrypt(nonce, &container[HEADER_LEN + NONCE_LEN..])
        .map_err(|_| CryptoError::Authentication)
}
