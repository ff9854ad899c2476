//! Entity identifiers — shard / realm / number triples.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A ledger account identifier, displayed as `shard.realm.num`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct AccountId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

impl AccountId {
    /// The all-zero id. Never denotes an entity; a zero id in a request
    /// means "missing account id".
    pub const ZERO: Self = Self::new(0, 0, 0);

    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }

    /// Whether this id denotes an actual entity.
    pub fn is_set(&self) -> bool {
        *self != Self::ZERO
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

/// A token identifier, same shape as [`AccountId`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TokenId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

impl TokenId {
    /// The all-zero id, meaning "missing token id".
    pub const ZERO: Self = Self::new(0, 0, 0);

    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }

    pub fn is_set(&self) -> bool {
        *self != Self::ZERO
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

/// A single NFT: one positive serial number of a non-fungible token.
///
/// Serial numbers are immutable once minted; ownership is tracked per
/// serial.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NftId {
    pub token: TokenId,
    pub serial: u64,
}

impl NftId {
    pub const fn new(token: TokenId, serial: u64) -> Self {
        Self { token, serial }
    }
}

impl fmt::Display for NftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.token, self.serial)
    }
}

/// Error parsing a `shard.realm.num` identifier string.
#[derive(Debug, Error)]
#[error("malformed entity id: {0}")]
pub struct IdParseError(String);

fn parse_triple(s: &str) -> Result<(u64, u64, u64), IdParseError> {
    let mut parts = s.split('.');
    let mut next = || {
        parts
            .next()
            .and_then(|p| p.parse::<u64>().ok())
            .ok_or_else(|| IdParseError(s.to_string()))
    };
    let triple = (next()?, next()?, next()?);
    if parts.next().is_some() {
        return Err(IdParseError(s.to_string()));
    }
    Ok(triple)
}

impl FromStr for AccountId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (shard, realm, num) = parse_triple(s)?;
        Ok(Self { shard, realm, num })
    }
}

impl FromStr for TokenId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (shard, realm, num) = parse_triple(s)?;
        Ok(Self { shard, realm, num })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_display_roundtrip() {
        let id = AccountId::new(0, 0, 1001);
        assert_eq!(id.to_string(), "0.0.1001");
        assert_eq!("0.0.1001".parse::<AccountId>().unwrap(), id);
    }

    #[test]
    fn test_zero_id_is_not_set() {
        assert!(!AccountId::ZERO.is_set());
        assert!(!TokenId::ZERO.is_set());
        assert!(AccountId::new(0, 0, 3).is_set());
    }

    #[test]
    fn test_malformed_id_rejected() {
        assert!("0.0".parse::<AccountId>().is_err());
        assert!("0.0.1.2".parse::<AccountId>().is_err());
        assert!("a.b.c".parse::<TokenId>().is_err());
    }
}
