//! Error types for the hdkey-ur library

use thiserror::Error;

/// Custom error type for hdkey-ur operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid BIP39 mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("Invalid fingerprint override: {0}")]
    InvalidOverride(String),

    #[error("Key derivation error: {0}")]
    Derivation(String),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl Error {
    /// Whether the error was caused by the caller's input rather than by
    /// derivation or encoding.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMnemonic(_) | Self::InvalidPath(_) | Self::InvalidOverride(_)
        )
    }
}

/// Result type for hdkey-ur operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(Error::InvalidMnemonic("checksum".into()).is_client_error());
        assert!(Error::InvalidPath("44/0".into()).is_client_error());
        assert!(Error::InvalidOverride("zz".into()).is_client_error());
        assert!(!Error::Derivation("IL >= n".into()).is_client_error());
        assert!(!Error::Encoding("cbor".into()).is_client_error());
    }
}
