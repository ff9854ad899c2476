//! Public-key aliases — identifiers that can stand in for an account
//! before that account formally exists.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw alias bytes, derived from a public key by the wallet side.
///
/// The engine treats the bytes as opaque: it only compares them and hands
/// them to the account auto-creation delegate. Displayed as lowercase hex.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Alias(Vec<u8>);

impl Alias {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// An empty alias is malformed and can never bind to an account.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<&[u8]> for Alias {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}
