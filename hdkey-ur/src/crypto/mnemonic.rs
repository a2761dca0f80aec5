//! Mnemonic phrase validation and seed derivation

use bip39::Mnemonic;
use crate::error::{Error, Result};

/// Trim, lower-case and collapse whitespace so that pasted phrases validate
/// the same way regardless of formatting.
pub fn normalize_mnemonic(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Validate a mnemonic phrase against the English wordlist and its checksum
pub fn validate_mnemonic(phrase: &str) -> Result<Mnemonic> {
    Mnemonic::parse_normalized(&normalize_mnemonic(phrase))
        .map_err(|e| Error::InvalidMnemonic(e.to_string()))
}

/// Generate a seed from a mnemonic phrase and optional passphrase.
///
/// The phrase is validated before the PBKDF2 stretch runs.
pub fn mnemonic_to_seed(phrase: &str, passphrase: Option<&str>) -> Result<[u8; 64]> {
    let mnemonic = validate_mnemonic(phrase)?;
    Ok(mnemonic.to_seed(passphrase.unwrap_or("")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_validate_mnemonic() {
        let invalid = "invalid mnemonic phrase test test test test test test test test test";

        assert!(validate_mnemonic(ABANDON).is_ok());
        assert!(matches!(validate_mnemonic(invalid), Err(Error::InvalidMnemonic(_))));
    }

    #[test]
    fn test_bad_checksum_and_word_count() {
        let bad_checksum = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";
        let eleven_words = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

        assert!(matches!(mnemonic_to_seed(bad_checksum, None), Err(Error::InvalidMnemonic(_))));
        assert!(matches!(mnemonic_to_seed(eleven_words, None), Err(Error::InvalidMnemonic(_))));
    }

    #[test]
    fn test_normalization() {
        let messy = "  ABANDON abandon\tabandon abandon abandon abandon\nabandon abandon abandon abandon abandon About  ";
        assert_eq!(normalize_mnemonic(messy), ABANDON);
        assert_eq!(
            mnemonic_to_seed(messy, None).unwrap(),
            mnemonic_to_seed(ABANDON, None).unwrap()
        );
    }

    #[test]
    fn test_mnemonic_to_seed() {
        let seed = mnemonic_to_seed(ABANDON, None).unwrap();

        // BIP39 reference vector, empty passphrase
        assert_eq!(
            hex::encode(seed),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc19a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );

        let again = mnemonic_to_seed(ABANDON, Some("")).unwrap();
        assert_eq!(seed, again);

        let salted = mnemonic_to_seed(ABANDON, Some("TREZOR")).unwrap();
        assert_ne!(seed, salted);
    }
}
