//! API key lookup: environment variables first, then the system keyring.

use keyring::Entry;
use std::error::Error;
use std::fmt;
use tracing::{debug, warn};

const KEYRING_SERVICE: &str = "chairchat";
const KEYRING_USER: &str = "gemini-api-key";

/// Environment variables checked, in order, before the keyring.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Describes failures when attempting to access the system keyring.
///
/// Recoverable errors indicate that the credential backend was temporarily
/// unavailable (a locked keychain, a missing secret service). Permanent errors
/// surface the underlying cause directly.
#[derive(Debug)]
pub enum KeyringAccessError {
    Recoverable(keyring::Error),
    Permanent(keyring::Error),
}

impl KeyringAccessError {
    fn inner(&self) -> &keyring::Error {
        match self {
            KeyringAccessError::Recoverable(err) | KeyringAccessError::Permanent(err) => err,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, KeyringAccessError::Recoverable(_))
    }
}

impl From<keyring::Error> for KeyringAccessError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::PlatformFailure(_) | keyring::Error::NoStorageAccess(_) => {
                KeyringAccessError::Recoverable(err)
            }
            other => KeyringAccessError::Permanent(other),
        }
    }
}

impl fmt::Display for KeyringAccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner())
    }
}

impl Error for KeyringAccessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.inner())
    }
}

fn entry() -> Result<Entry, KeyringAccessError> {
    Entry::new(KEYRING_SERVICE, KEYRING_USER).map_err(KeyringAccessError::from)
}

/// First non-blank value among `values`, trimmed.
fn first_non_blank<I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    values
        .into_iter()
        .flatten()
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

pub fn api_key_from_env() -> Option<String> {
    first_non_blank(API_KEY_ENV_VARS.iter().map(|var| std::env::var(var).ok()))
}

pub fn api_key_from_keyring() -> Result<Option<String>, KeyringAccessError> {
    match entry()?.get_password() {
        Ok(key) => Ok(first_non_blank([Some(key)])),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Resolve the API key, logging (but not failing on) keyring trouble.
pub fn resolve_api_key() -> Option<String> {
    if let Some(key) = api_key_from_env() {
        debug!("using API key from environment");
        return Some(key);
    }
    match api_key_from_keyring() {
        Ok(key) => key,
        Err(err) => {
            warn!(error = %err, recoverable = err.is_recoverable(), "keyring lookup failed");
            None
        }
    }
}

pub fn store_api_key(key: &str) -> Result<(), KeyringAccessError> {
    entry()?.set_password(key.trim())?;
    Ok(())
}

/// Remove the stored key. Returns `false` when there was nothing to remove.
pub fn delete_api_key() -> Result<bool, KeyringAccessError> {
    match entry()?.delete_credential() {
        Ok(()) => Ok(true),
        Err(keyring::Error::NoEntry) => Ok(false),
        Err(err) => Err(err.into()),
    }
}
