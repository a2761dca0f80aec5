//! Key derivation and management
//!
//! BIP-32 derivation paths, tree nodes and key fingerprints.

pub mod path;
pub mod fingerprint;
mod derivation;

pub use derivation::*;
pub use fingerprint::Fingerprint;
pub use path::{ChildStep, DerivationPath, HARDENED_OFFSET};
