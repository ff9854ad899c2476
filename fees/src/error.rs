use meridian_store::StoreError;
use meridian_types::{AccountId, TokenId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeeError {
    #[error("custom fee charging exceeded the maximum recursion depth {0}")]
    RecursionExceeded(u32),

    #[error("token {token} carries {count} custom fees, more than the maximum {max}")]
    TooManyCustomFees {
        token: TokenId,
        count: usize,
        max: usize,
    },

    #[error("custom fee schedule references unknown token {0}")]
    UnknownToken(TokenId),

    #[error("insufficient coin balance on account {0} to cover an assessed custom fee")]
    InsufficientCoinForFee(AccountId),

    #[error("insufficient balance of token {token} on account {account} to cover an assessed custom fee")]
    InsufficientTokenForFee {
        account: AccountId,
        token: TokenId,
    },

    #[error("custom fee arithmetic overflowed for token {0}")]
    FeeOverflow(TokenId),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
