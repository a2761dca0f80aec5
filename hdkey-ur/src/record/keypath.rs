//! `crypto-keypath` (tag 304): derivation origin of an exported key

use minicbor::data::Tag;
use minicbor::decode::{self, Decoder};
use minicbor::encode::{self, Encoder, Write};

use crate::crypto::keys::{ChildStep, DerivationPath, Fingerprint};
use super::CRYPTO_KEYPATH_TAG;

const COMPONENTS: u8 = 1;
const SOURCE_FINGERPRINT: u8 = 2;

/// Path from the source key plus the source key's fingerprint.
///
/// Encoded as `304({1: [index, hardened, ...], 2: fingerprint})`. The steps
/// stay in path order and are flattened into index/bool pairs; importing
/// devices reject the grouped or hardened-bit forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyOrigin {
    path: DerivationPath,
    source_fingerprint: Fingerprint,
}

impl KeyOrigin {
    pub fn new(path: DerivationPath, source_fingerprint: Fingerprint) -> Self {
        Self { path, source_fingerprint }
    }

    pub fn path(&self) -> &DerivationPath {
        &self.path
    }

    pub fn source_fingerprint(&self) -> Fingerprint {
        self.source_fingerprint
    }
}

impl<C> minicbor::Encode<C> for KeyOrigin {
    fn encode<W: Write>(
        &self,
        e: &mut Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), encode::Error<W::Error>> {
        e.tag(Tag::new(CRYPTO_KEYPATH_TAG))?.map(2)?;

        e.u8(COMPONENTS)?.array(2 * self.path.depth() as u64)?;
        for (index, hardened) in self.path.to_compact() {
            e.u32(index)?.bool(hardened)?;
        }

        e.u8(SOURCE_FINGERPRINT)?.u32(self.source_fingerprint.as_u32())?;

        Ok(())
    }
}

impl<'b, C> minicbor::Decode<'b, C> for KeyOrigin {
    fn decode(d: &mut Decoder<'b>, _ctx: &mut C) -> Result<Self, decode::Error> {
        if d.tag()? != Tag::new(CRYPTO_KEYPATH_TAG) {
            return Err(decode::Error::message("expected crypto-keypath tag 304"));
        }
        if d.map()? != Some(2) {
            return Err(decode::Error::message("crypto-keypath must be a map of two entries"));
        }

        if d.u8()? != COMPONENTS {
            return Err(decode::Error::message("crypto-keypath key 1 (components) must come first"));
        }
        let len = d.array()?
            .ok_or_else(|| decode::Error::message("components must be a definite-length array"))?;
        if len % 2 != 0 {
            return Err(decode::Error::message("components must be index/hardened pairs"));
        }

        let mut steps = Vec::with_capacity((len / 2) as usize);
        for _ in 0..len / 2 {
            let index = d.u32()?;
            let hardened = d.bool()?;
            let step = ChildStep::new(index, hardened)
                .map_err(|_| decode::Error::message("component index does not fit in 31 bits"))?;
            steps.push(step);
        }

        if d.u8()? != SOURCE_FINGERPRINT {
            return Err(decode::Error::message("crypto-keypath key 2 (source fingerprint) must follow"));
        }
        let source_fingerprint = Fingerprint::from_u32(d.u32()?);

        Ok(Self {
            path: DerivationPath::from_steps(steps),
            source_fingerprint,
        })
    }
}
