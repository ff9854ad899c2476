//! Opaque key material.
//!
//! Signature verification happens upstream of this engine; keys are kept
//! on account records only so a hollow account (no key yet) can be told
//! apart from a completed one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey(")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}
