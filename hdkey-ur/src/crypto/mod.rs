//! Cryptographic primitives and operations
//!
//! This module provides mnemonic validation, seed derivation, BIP-32 key
//! derivation and key fingerprinting.

pub mod mnemonic;
pub mod keys;

pub use mnemonic::*;
pub use keys::*;
