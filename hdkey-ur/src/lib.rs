//! hdkey-ur - BIP-32 key export for air-gapped devices
//!
//! Derives an extended public key from a BIP-39 mnemonic and encodes it, with
//! its derivation origin, as a `ur:crypto-hdkey` Uniform Resource ready to be
//! shown as a QR code. Nothing is persisted: every export starts from the
//! mnemonic and drops all key material when it returns.

pub mod error;
pub mod crypto;
pub mod record;
pub mod transfer;
pub mod export;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use export::{decode_hdkey, export_hdkey, ExportRequest, HdKeyExport, ParentSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
