//! Secret values and where they come from.
//!
//! [`SecretString`] keeps credentials out of logs. [`EnvSecretProvider`]
//! resolves secrets from the process environment (including `.env`), falling
//! back to one-file-per-secret in a directory such as `/run/secrets`.

use std::fmt;
use std::path::PathBuf;

use subtle::ConstantTimeEq;

use crate::traits::SecretProvider;

/// A wrapper for sensitive strings that redacts the value in Debug/Display output.
///
/// # Example
///
/// ```
/// use lotus_ahp::config::SecretString;
///
/// let secret = SecretString::new("password1");
/// assert_eq!(format!("{:?}", secret), "<REDACTED>");
/// assert_eq!(secret.expose(), "password1");
/// assert!(secret.matches("password1"));
/// ```
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    /// Creates a new `SecretString` from any string-like value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Exposes the underlying secret value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true if the secret is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compare against a candidate in constant time.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<REDACTED>")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<REDACTED>")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl Eq for SecretString {}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Resolve secrets from environment variables, then from files.
///
/// Blank values count as missing.
#[derive(Debug, Clone, Default)]
pub struct EnvSecretProvider {
    secrets_dir: Option<PathBuf>,
}

impl EnvSecretProvider {
    /// Environment-only provider.
    #[must_use]
    pub const fn new() -> Self {
        Self { secrets_dir: None }
    }

    /// Also look for `<dir>/<KEY>` files.
    #[must_use]
    pub fn with_secrets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.secrets_dir = Some(dir.into());
        self
    }

    /// Provider configured from `SECRETS_DIR`, if set.
    #[must_use]
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        match std::env::var("SECRETS_DIR") {
            Ok(dir) if !dir.trim().is_empty() => Self::new().with_secrets_dir(dir),
            _ => Self::new(),
        }
    }
}

impl SecretProvider for EnvSecretProvider {
    fn get_secret(&self, key: &str) -> Option<SecretString> {
        if let Ok(value) = std::env::var(key) {
            if !value.trim().is_empty() {
                return Some(SecretString::new(value));
            }
        }

        let dir = self.secrets_dir.as_ref()?;
        match std::fs::read_to_string(dir.join(key)) {
            Ok(contents) => {
                let value = contents.trim();
                (!value.is_empty()).then(|| SecretString::new(value))
            }
            Err(e) => {
                tracing::debug!(key, error = %e, "Secret file not readable");
                None
            }
        }
    }
}
