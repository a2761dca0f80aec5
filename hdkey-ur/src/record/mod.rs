//! CBOR records of the Blockchain Commons UR registry
//!
//! Only the subset a watch-only device needs to import an account:
//! `crypto-hdkey` and the `crypto-keypath` origin it embeds.

pub mod keypath;
pub mod hdkey;

pub use keypath::KeyOrigin;
pub use hdkey::HdKeyRecord;

use crate::error::{Error, Result};

/// UR type of an exported HD key
pub const CRYPTO_HDKEY: &str = "crypto-hdkey";

/// CBOR tag of `crypto-keypath`
pub const CRYPTO_KEYPATH_TAG: u64 = 304;

/// Label written under the `name` key of every exported record
pub const DEFAULT_NAME: &str = "AirGap - meta";

/// Encode any record to a CBOR byte vector
pub fn to_cbor<T: minicbor::Encode<()>>(value: &T) -> Result<Vec<u8>> {
    minicbor::to_vec(value).map_err(|e| Error::Encoding(e.to_string()))
}

/// Decode a record, rejecting trailing bytes
pub fn from_cbor<'b, T: minicbor::Decode<'b, ()>>(bytes: &'b [u8]) -> Result<T> {
    let mut decoder = minicbor::Decoder::new(bytes);
    let value = decoder
        .decode::<T>()
        .map_err(|e| Error::Encoding(e.to_string()))?;

    if decoder.position() != bytes.len() {
        return Err(Error::Encoding(format!(
            "{} trailing bytes after CBOR record",
            bytes.len() - decoder.position()
        )));
    }

    Ok(value)
}
