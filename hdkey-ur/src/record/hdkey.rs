//! `crypto-hdkey`: the exported public key record

use minicbor::decode::{self, Decoder};
use minicbor::encode::{self, Encoder, Write};

use crate::crypto::keys::{Fingerprint, HdNode};
use super::{KeyOrigin, DEFAULT_NAME};

const KEY_DATA: u8 = 3;
const CHAIN_CODE: u8 = 4;
const ORIGIN: u8 = 6;
const PARENT_FINGERPRINT: u8 = 8;
const NAME: u8 = 9;

/// Extended public key with its origin, as imported by watch-only devices.
///
/// The map is always written with keys 3, 4, 6, 8, 9 in that order. Importers
/// parse it positionally, so neither the key set nor the order may change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HdKeyRecord {
    key_data: [u8; 33],
    chain_code: [u8; 32],
    origin: KeyOrigin,
    parent_fingerprint: Fingerprint,
    name: String,
}

impl HdKeyRecord {
    pub fn new(
        key_data: [u8; 33],
        chain_code: [u8; 32],
        origin: KeyOrigin,
        parent_fingerprint: Fingerprint,
    ) -> Self {
        Self {
            key_data,
            chain_code,
            origin,
            parent_fingerprint,
            name: DEFAULT_NAME.to_string(),
        }
    }

    /// Record for `node`, taking the public key and chain code from it
    pub fn from_node(node: &HdNode, origin: KeyOrigin, parent_fingerprint: Fingerprint) -> Self {
        Self::new(node.public_key(), node.chain_code(), origin, parent_fingerprint)
    }

    /// Compressed public key
    pub fn key_data(&self) -> &[u8; 33] {
        &self.key_data
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    pub fn origin(&self) -> &KeyOrigin {
        &self.origin
    }

    pub fn parent_fingerprint(&self) -> Fingerprint {
        self.parent_fingerprint
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<C> minicbor::Encode<C> for HdKeyRecord {
    fn encode<W: Write>(
        &self,
        e: &mut Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), encode::Error<W::Error>> {
        e.map(5)?;
        e.u8(KEY_DATA)?.bytes(&self.key_data)?;
        e.u8(CHAIN_CODE)?.bytes(&self.chain_code)?;
        e.u8(ORIGIN)?.encode_with(&self.origin, ctx)?;
        e.u8(PARENT_FINGERPRINT)?.u32(self.parent_fingerprint.as_u32())?;
        e.u8(NAME)?.str(&self.name)?;
        Ok(())
    }
}

fn expect_key(d: &mut Decoder<'_>, key: u8, msg: &'static str) -> Result<(), decode::Error> {
    if d.u8()? != key {
        return Err(decode::Error::message(msg));
    }
    Ok(())
}

fn fixed_bytes<const N: usize>(d: &mut Decoder<'_>, msg: &'static str) -> Result<[u8; N], decode::Error> {
    d.bytes()?
        .try_into()
        .map_err(|_| decode::Error::message(msg))
}

impl<'b, C> minicbor::Decode<'b, C> for HdKeyRecord {
    fn decode(d: &mut Decoder<'b>, ctx: &mut C) -> Result<Self, decode::Error> {
        if d.map()? != Some(5) {
            return Err(decode::Error::message("crypto-hdkey must be a map of five entries"));
        }

        expect_key(d, KEY_DATA, "expected key 3 (key data)")?;
        let key_data = fixed_bytes::<33>(d, "key data must be 33 bytes")?;

        expect_key(d, CHAIN_CODE, "expected key 4 (chain code)")?;
        let chain_code = fixed_bytes::<32>(d, "chain code must be 32 bytes")?;

        expect_key(d, ORIGIN, "expected key 6 (origin)")?;
        let origin = d.decode_with(ctx)?;

        expect_key(d, PARENT_FINGERPRINT, "expected key 8 (parent fingerprint)")?;
        let parent_fingerprint = Fingerprint::from_u32(d.u32()?);

        expect_key(d, NAME, "expected key 9 (name)")?;
        let name = d.str()?.to_string();

        Ok(Self {
            key_data,
            chain_code,
            origin,
            parent_fingerprint,
            name,
        })
    }
}
