//! Ledger records and abstract storage traits.
//!
//! Every storage backend (persistent engines, in-memory for testing)
//! implements these traits. The transfer engine depends only on the
//! traits; writes go through the same handles (upsert-by-key), so a
//! backend can be as simple as a map.

pub mod account;
pub mod allowance;
pub mod creator;
pub mod error;
pub mod nft;
pub mod relationship;
pub mod token;

pub use account::{Account, AccountStore};
pub use allowance::AllowanceStore;
pub use creator::{AccountCreator, CreationError};
pub use error::StoreError;
pub use nft::{Nft, NftStore};
pub use relationship::{TokenRelationship, TokenRelationshipStore};
pub use token::{Token, TokenKind, TokenStore};
