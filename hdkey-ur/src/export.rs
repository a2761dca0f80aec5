//! Mnemonic to `ur:crypto-hdkey` export
//!
//! Validates every input, derives the requested node and the node that acts as
//! its parent, and packs the result into a single-part UR.

use std::str::FromStr;

use serde::Serialize;

use crate::crypto::keys::{DerivationPath, Fingerprint, HdNode};
use crate::crypto::mnemonic::{mnemonic_to_seed, validate_mnemonic};
use crate::error::{Error, Result};
use crate::record::{self, HdKeyRecord, KeyOrigin, CRYPTO_HDKEY};
use crate::transfer::{self, DEFAULT_MAX_FRAGMENT_LEN};

/// Default export path: first Ethereum account
pub const DEFAULT_PATH: &str = "m/44'/60'/0'";

/// Which node's fingerprint is written as the parent fingerprint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParentSource {
    /// One level up from the exported path
    #[default]
    Immediate,
    /// A fixed path, regardless of the exported path's depth
    Fixed(DerivationPath),
}

impl ParentSource {
    /// Resolve the parent path for `path`
    pub fn resolve(&self, path: &DerivationPath) -> Result<DerivationPath> {
        match self {
            Self::Immediate => path.parent().ok_or_else(|| {
                Error::InvalidPath("the master node m has no parent; use a fixed parent path".to_string())
            }),
            Self::Fixed(parent) => Ok(parent.clone()),
        }
    }
}

/// `auto`, `m44h60h`, or an explicit derivation path
impl FromStr for ParentSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" | "auto" => Ok(Self::Immediate),
            "m44h60h" => Ok(Self::Fixed(DerivationPath::ethereum_account_parent())),
            path => DerivationPath::parse(path)
                .map(Self::Fixed)
                .map_err(|e| Error::InvalidPath(format!("unknown parent mode {:?}: {}", path, e))),
        }
    }
}

/// Inputs of one export
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub mnemonic: String,
    pub passphrase: String,
    pub path: String,
    pub parent_source: ParentSource,
    /// 8 hex characters; empty or `None` means "compute"
    pub master_fingerprint_override: Option<String>,
    /// 8 hex characters; empty or `None` means "compute"
    pub parent_fingerprint_override: Option<String>,
    pub max_fragment_len: usize,
}

impl ExportRequest {
    pub fn new(mnemonic: impl Into<String>) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            passphrase: String::new(),
            path: DEFAULT_PATH.to_string(),
            parent_source: ParentSource::Immediate,
            master_fingerprint_override: None,
            parent_fingerprint_override: None,
            max_fragment_len: DEFAULT_MAX_FRAGMENT_LEN,
        }
    }
}

/// Result of an export: the UR text plus values for display
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HdKeyExport {
    pub ur: String,
    #[serde(serialize_with = "serialize_display")]
    pub path: DerivationPath,
    #[serde(serialize_with = "serialize_display")]
    pub parent_path: DerivationPath,
    #[serde(rename = "masterFpHex")]
    pub master_fingerprint: Fingerprint,
    #[serde(rename = "parentFpHex")]
    pub parent_fingerprint: Fingerprint,
    #[serde(skip)]
    pub record: HdKeyRecord,
    #[serde(skip)]
    pub cbor: Vec<u8>,
}

fn serialize_display<S: serde::Serializer>(
    path: &DerivationPath,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(path)
}

/// Run the whole chain for one request.
///
/// All inputs are validated before the seed is stretched, and nothing is
/// returned unless every step succeeds.
pub fn export_hdkey(request: &ExportRequest) -> Result<HdKeyExport> {
    validate_mnemonic(&request.mnemonic)?;
    let path = DerivationPath::parse(&request.path)?;
    let parent_path = request.parent_source.resolve(&path)?;
    let master_override = Fingerprint::parse_override(request.master_fingerprint_override.as_deref())?;
    let parent_override = Fingerprint::parse_override(request.parent_fingerprint_override.as_deref())?;

    let seed = mnemonic_to_seed(&request.mnemonic, Some(&request.passphrase))?;
    let master = HdNode::from_seed(&seed)?;

    // The parent is walked from the master on its own, never reconstructed
    // from the child.
    let node = master.derive_path(&path)?;
    let parent = master.derive_path(&parent_path)?;

    let master_fingerprint = master_override.unwrap_or_else(|| master.fingerprint());
    let parent_fingerprint = parent_override.unwrap_or_else(|| parent.fingerprint());

    tracing::debug!(
        %path,
        %parent_path,
        master_fp = %master_fingerprint,
        parent_fp = %parent_fingerprint,
        master_overridden = master_override.is_some(),
        parent_overridden = parent_override.is_some(),
        "derived hd key"
    );

    let origin = KeyOrigin::new(path.clone(), master_fingerprint);
    let record = HdKeyRecord::from_node(&node, origin, parent_fingerprint);
    let cbor = record::to_cbor(&record)?;
    let ur = transfer::encode_ur(&cbor, CRYPTO_HDKEY, request.max_fragment_len)?;

    Ok(HdKeyExport {
        ur,
        path,
        parent_path,
        master_fingerprint,
        parent_fingerprint,
        record,
        cbor,
    })
}

/// Decode a `ur:crypto-hdkey` produced by [`export_hdkey`]
pub fn decode_hdkey(ur: &str) -> Result<HdKeyRecord> {
    let cbor = transfer::decode_ur(ur, CRYPTO_HDKEY)?;
    record::from_cbor(&cbor)
}
