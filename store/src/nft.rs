//! NFT record — one serial of a non-fungible token.

use crate::StoreError;
use meridian_types::{AccountId, NftId};
use serde::{Deserialize, Serialize};

/// State of one minted serial. The serial number itself is immutable;
/// ownership and the single-serial spender approval are the only mutable
/// fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nft {
    pub id: NftId,
    pub owner: AccountId,
    /// Single-use, single-serial allowance. Cleared when the serial moves.
    pub spender: Option<AccountId>,
}

impl Nft {
    pub fn new(id: NftId, owner: AccountId) -> Self {
        Self {
            id,
            owner,
            spender: None,
        }
    }
}

/// Trait for NFT storage operations.
pub trait NftStore {
    fn get_nft(&self, id: &NftId) -> Result<Option<Nft>, StoreError>;
    fn put_nft(&self, nft: &Nft) -> Result<(), StoreError>;

    fn exists(&self, id: &NftId) -> Result<bool, StoreError> {
        Ok(self.get_nft(id)?.is_some())
    }
}
