//! BIP-32 derivation path parsing

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Bit set on a child index to request hardened derivation
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// One step of a derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildStep {
    index: u32,
    hardened: bool,
}

impl ChildStep {
    /// Create a step; `index` must fit in 31 bits
    pub fn new(index: u32, hardened: bool) -> Result<Self> {
        if index >= HARDENED_OFFSET {
            return Err(Error::InvalidPath(format!("index {} does not fit in 31 bits", index)));
        }
        Ok(Self { index, hardened })
    }

    /// Non-hardened step
    pub fn normal(index: u32) -> Result<Self> {
        Self::new(index, false)
    }

    /// Hardened step
    pub fn hardened(index: u32) -> Result<Self> {
        Self::new(index, true)
    }

    /// Index without the hardened bit
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn is_hardened(&self) -> bool {
        self.hardened
    }

    /// Index as fed into CKD, with the hardened bit applied
    pub fn child_number(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED_OFFSET
        } else {
            self.index
        }
    }
}

impl fmt::Display for ChildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

/// An ordered list of derivation steps starting at the master node `m`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    steps: Vec<ChildStep>,
}

impl DerivationPath {
    /// The master node `m`
    pub fn master() -> Self {
        Self::default()
    }

    pub fn from_steps(steps: Vec<ChildStep>) -> Self {
        Self { steps }
    }

    /// The account-level Ethereum path `m/44'/60'`
    pub fn ethereum_account_parent() -> Self {
        Self {
            steps: vec![
                ChildStep { index: 44, hardened: true },
                ChildStep { index: 60, hardened: true },
            ],
        }
    }

    /// Parse `m(/<digits>'?)*`
    pub fn parse(path: &str) -> Result<Self> {
        let path = path.trim();
        let rest = path
            .strip_prefix('m')
            .ok_or_else(|| Error::InvalidPath(format!("{:?} must start with 'm'", path)))?;

        if rest.is_empty() {
            return Ok(Self::master());
        }

        let rest = rest
            .strip_prefix('/')
            .ok_or_else(|| Error::InvalidPath(format!("{:?} expected '/' after 'm'", path)))?;

        let steps = rest
            .split('/')
            .map(|segment| parse_segment(path, segment))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[ChildStep] {
        &self.steps
    }

    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    pub fn is_master(&self) -> bool {
        self.steps.is_empty()
    }

    /// The path one level up. `None` for the master node.
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.steps.split_last()?;
        Some(Self { steps: parent.to_vec() })
    }

    /// Steps as `(index, hardened)` pairs
    pub fn to_compact(&self) -> Vec<(u32, bool)> {
        self.steps.iter().map(|s| (s.index, s.hardened)).collect()
    }
}

fn parse_segment(path: &str, segment: &str) -> Result<ChildStep> {
    let (digits, hardened) = match segment.strip_suffix('\'') {
        Some(digits) => (digits, true),
        None => (segment, false),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidPath(format!(
            "{:?} has malformed component {:?}",
            path, segment
        )));
    }

    let index = digits.parse::<u32>().map_err(|_| {
        Error::InvalidPath(format!("{:?} has out-of-range index {:?}", path, segment))
    })?;

    ChildStep::new(index, hardened)
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for step in &self.steps {
            write!(f, "/{}", step)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_ethereum_account() {
        let path = DerivationPath::parse("m/44'/60'/0'").unwrap();
        assert_eq!(path.depth(), 3);
        assert_eq!(path.steps()[0], ChildStep::hardened(44).unwrap());
        assert_eq!(path.steps()[1].child_number(), 0x8000_003c);
        assert_eq!(path.to_string(), "m/44'/60'/0'");
    }

    #[test]
    fn test_parse_mixed_and_master() {
        let path: DerivationPath = " m/44'/0'/0'/0/7 ".parse().unwrap();
        assert_eq!(
            path.to_compact(),
            vec![(44, true), (0, true), (0, true), (0, false), (7, false)]
        );

        let master = DerivationPath::parse("m").unwrap();
        assert!(master.is_master());
        assert_eq!(master.to_string(), "m");
    }

    #[test]
    fn test_rejects_malformed_paths() {
        for bad in ["44/0", "m/abc", "m//0", "", "m/", "m/0/", "M/0", "m0", "m/-1", "m/1''", "m/1h", "m/ 1"] {
            assert!(
                matches!(DerivationPath::parse(bad), Err(Error::InvalidPath(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        assert!(DerivationPath::parse("m/2147483647'").is_ok());
        assert!(matches!(DerivationPath::parse("m/2147483648"), Err(Error::InvalidPath(_))));
        assert!(matches!(DerivationPath::parse("m/99999999999"), Err(Error::InvalidPath(_))));
        assert!(ChildStep::hardened(HARDENED_OFFSET).is_err());
    }

    #[test]
    fn test_parent() {
        let parent_of = |p: &str| DerivationPath::parse(p).unwrap().parent().map(|p| p.to_string());

        assert_eq!(parent_of("m"), None);
        assert_eq!(parent_of("m/44'"), Some("m".to_string()));
        assert_eq!(parent_of("m/44'/60'/0'"), Some("m/44'/60'".to_string()));
        assert_eq!(parent_of("m/44'/60'/0'/0/3"), Some("m/44'/60'/0'/0".to_string()));
    }

    proptest! {
        #[test]
        fn display_parses_back(steps in proptest::collection::vec((0u32..HARDENED_OFFSET, any::<bool>()), 0..8)) {
            let path = DerivationPath::from_steps(
                steps.iter().map(|&(i, h)| ChildStep::new(i, h).unwrap()).collect(),
            );
            let reparsed = DerivationPath::parse(&path.to_string()).unwrap();
            prop_assert_eq!(reparsed, path);
        }
    }
}
