//! BIP-32 hierarchical deterministic key derivation over secp256k1

use std::fmt;

use hmac::{Hmac, Mac};
use hmac::digest::KeyInit;
use secp256k1::{All, PublicKey, Scalar, Secp256k1, SecretKey};
use sha2::Sha512;

use crate::error::{Error, Result};
use super::fingerprint::Fingerprint;
use super::path::{ChildStep, DerivationPath};

const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// A node of the BIP-32 tree: private scalar, public key and chain code
#[derive(Clone)]
pub struct HdNode {
    secret_key: SecretKey,
    public_key: PublicKey,
    chain_code: [u8; 32],
    depth: u8,
}

impl HdNode {
    /// Derive the master node from a BIP-39 seed
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        let secp = Secp256k1::new();
        let (il, ir) = hmac_sha512(MASTER_HMAC_KEY, &[seed])?;

        let secret_key = SecretKey::from_slice(&il)
            .map_err(|e| Error::Derivation(format!("Invalid master key: {}", e)))?;
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);

        Ok(Self {
            secret_key,
            public_key,
            chain_code: ir,
            depth: 0,
        })
    }

    /// Walk `path` starting from this node
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        let secp = Secp256k1::new();
        path.steps()
            .iter()
            .try_fold(self.clone(), |node, step| node.derive_child_with(&secp, *step))
    }

    /// Derive a single child
    pub fn derive_child(&self, step: ChildStep) -> Result<Self> {
        self.derive_child_with(&Secp256k1::new(), step)
    }

    fn derive_child_with(&self, secp: &Secp256k1<All>, step: ChildStep) -> Result<Self> {
        let depth = self.depth.checked_add(1)
            .ok_or_else(|| Error::Derivation("Maximum derivation depth exceeded".to_string()))?;
        let index = step.child_number().to_be_bytes();

        let (il, ir) = if step.is_hardened() {
            let private = self.secret_key.secret_bytes();
            hmac_sha512(&self.chain_code, &[&[0u8], &private, &index])?
        } else {
            hmac_sha512(&self.chain_code, &[&self.public_key.serialize(), &index])?
        };

        // IL >= n: the index is invalid, callers must not silently move on
        let tweak = Scalar::from_be_bytes(il)
            .map_err(|_| Error::Derivation(format!("Derived tweak out of range at {}", step)))?;

        let secret_key = self.secret_key.add_tweak(&tweak)
            .map_err(|e| Error::Derivation(format!("Key addition error at {}: {}", step, e)))?;
        let public_key = PublicKey::from_secret_key(secp, &secret_key);

        Ok(Self {
            secret_key,
            public_key,
            chain_code: ir,
            depth,
        })
    }

    /// Compressed SEC1 public key
    pub fn public_key(&self) -> [u8; 33] {
        self.public_key.serialize()
    }

    pub fn chain_code(&self) -> [u8; 32] {
        self.chain_code
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of_public_key(&self.public_key())
    }
}

impl fmt::Debug for HdNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HdNode")
            .field("public_key", &hex::encode(self.public_key()))
            .field("chain_code", &hex::encode(self.chain_code))
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Result<([u8; 32], [u8; 32])> {
    let mut hmac = <Hmac<Sha512> as KeyInit>::new_from_slice(key)
        .map_err(|_| Error::Derivation("HMAC error".to_string()))?;
    for part in parts {
        hmac.update(part);
    }
    let result = hmac.finalize().into_bytes();

    let mut left = [0u8; 32];
    let mut right = [0u8; 32];
    left.copy_from_slice(&result[0..32]);
    right.copy_from_slice(&result[32..64]);

    Ok((left, right))
}
