//! Secret-key material handling.
//!
//! The signing secret is process-wide configuration: loaded once at startup,
//! immutable for the process lifetime, and never logged.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// An owned secret string that is zeroized on drop and redacted in `Debug`.
///
/// Wraps the HMAC signing secret so it cannot accidentally reach log output
/// through a derived `Debug` impl on a containing struct.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    /// Wrap a secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the secret bytes for key derivation.
    pub fn expose(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Whether the secret is empty (unusable for signing).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

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
