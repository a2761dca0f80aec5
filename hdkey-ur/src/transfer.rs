//! Uniform Resource (UR) text encoding for QR transfer

use ur::bytewords::{self, Style};

use crate::error::{Error, Result};

/// Fragment length used for exports; a `crypto-hdkey` record always fits.
pub const DEFAULT_MAX_FRAGMENT_LEN: usize = 400;

/// Encode `payload` as a single-part UR, upper-cased.
///
/// Fails when the payload does not fit in one fragment of
/// `max_fragment_len` bytes; use [`encode_ur_parts`] for those.
pub fn encode_ur(payload: &[u8], ur_type: &str, max_fragment_len: usize) -> Result<String> {
    if payload.len() > max_fragment_len {
        return Err(Error::Encoding(format!(
            "{} byte payload does not fit in one {} byte fragment",
            payload.len(),
            max_fragment_len
        )));
    }

    Ok(ur::encode(payload, ur_type).to_uppercase())
}

/// Encode `payload` as a UR sequence, one upper-cased part per fragment.
///
/// A payload that fits in one fragment yields a single single-part UR.
pub fn encode_ur_parts(payload: &[u8], ur_type: &str, max_fragment_len: usize) -> Result<Vec<String>> {
    if payload.len() <= max_fragment_len {
        return encode_ur(payload, ur_type, max_fragment_len).map(|part| vec![part]);
    }

    let mut encoder = ur::Encoder::new(payload, max_fragment_len, ur_type)
        .map_err(|e| Error::Encoding(e.to_string()))?;

    (0..encoder.fragment_count())
        .map(|_| {
            encoder
                .next_part()
                .map(|part| part.to_uppercase())
                .map_err(|e| Error::Encoding(e.to_string()))
        })
        .collect()
}

/// Decode a single-part UR of type `ur_type`. Case-insensitive.
pub fn decode_ur(text: &str, ur_type: &str) -> Result<Vec<u8>> {
    let text = text.trim().to_lowercase();

    let rest = text
        .strip_prefix("ur:")
        .ok_or_else(|| Error::Encoding("missing ur: scheme".to_string()))?;
    let (kind, body) = rest
        .split_once('/')
        .ok_or_else(|| Error::Encoding("missing UR type".to_string()))?;

    if kind != ur_type {
        return Err(Error::Encoding(format!("expected ur:{}, found ur:{}", ur_type, kind)));
    }
    if body.contains('/') {
        return Err(Error::Encoding("multi-part UR cannot be decoded on its own".to_string()));
    }

    bytewords::decode(body, Style::Minimal).map_err(|e| Error::Encoding(e.to_string()))
}
