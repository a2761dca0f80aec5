//! Key fingerprints (first four bytes of HASH160 of a compressed public key)

use std::fmt;

use ripemd::Ripemd160;
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// A BIP-32 key fingerprint, held as a big-endian u32
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u32);

impl Fingerprint {
    pub const fn from_u32(value: u32) -> Self {
        Self(value)
    }

    /// RIPEMD160(SHA256(pubkey)) truncated to four bytes
    pub fn of_public_key(public_key: &[u8; 33]) -> Self {
        let h160 = hash160(public_key);
        Self(u32::from_be_bytes([h160[0], h160[1], h160[2], h160[3]]))
    }

    /// Parse an override given as exactly 8 hex characters
    pub fn from_hex(hex8: &str) -> Result<Self> {
        if hex8.len() != 8 {
            return Err(Error::InvalidOverride(format!(
                "{:?} must be exactly 8 hex characters",
                hex8
            )));
        }

        let mut bytes = [0u8; 4];
        hex::decode_to_slice(hex8, &mut bytes)
            .map_err(|e| Error::InvalidOverride(format!("{:?}: {}", hex8, e)))?;

        Ok(Self(u32::from_be_bytes(bytes)))
    }

    /// Parse an optional override; empty input counts as "not supplied"
    pub fn parse_override(hex8: Option<&str>) -> Result<Option<Self>> {
        match hex8.map(str::trim) {
            None | Some("") => Ok(None),
            Some(hex8) => Self::from_hex(hex8).map(Some),
        }
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn to_bytes(&self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Lower-case, zero-padded 8 character hex
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    let rip = Ripemd160::digest(sha);

    let mut out = [0u8; 20];
    out.copy_from_slice(&rip);
    out
}
