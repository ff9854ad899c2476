use meridian_types::TokenId;
use thiserror::Error;

/// Structural failure of a raw transfer request. Every variant is
/// detectable without state access.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("coin adjustment is missing its account")]
    MissingCoinAccount,

    #[error("account {0} repeated in coin adjustments")]
    RepeatedCoinAccount(String),

    #[error("coin adjustments do not net to zero (sum {0})")]
    CoinSumNonZero(i128),

    #[error("token transfer list is missing its token id")]
    MissingTokenId,

    #[error("token {0} repeated across token transfer lists")]
    RepeatedTokenId(TokenId),

    #[error("transfer list for token {0} must carry exactly one non-empty kind of transfer")]
    AmbiguousTokenTransferKind(TokenId),

    #[error("adjustment for token {0} is missing its account")]
    MissingTokenAccount(TokenId),

    #[error("account {account} repeated in adjustments for token {token}")]
    RepeatedTokenAccount { token: TokenId, account: String },

    #[error("zero-amount adjustment for token {0}")]
    ZeroTokenAmount(TokenId),

    #[error("adjustments for token {token} do not net to zero (sum {sum})")]
    TokenSumNonZero { token: TokenId, sum: i128 },

    #[error("NFT exchange for token {0} is missing its sender or receiver")]
    MissingNftParty(TokenId),

    #[error("invalid serial number {serial} for token {token}")]
    InvalidNftSerial { token: TokenId, serial: i64 },

    #[error("sender and receiver are the same account for serial {serial} of token {token}")]
    NftSelfExchange { token: TokenId, serial: i64 },

    #[error("serial {serial} of token {token} repeated across the request")]
    RepeatedNftSerial { token: TokenId, serial: i64 },

    #[error("coin adjustment count {count} exceeds the configured maximum {max}")]
    TooManyCoinAdjustments { count: usize, max: usize },

    #[error("token adjustment count {count} exceeds the configured maximum {max}")]
    TooManyTokenAdjustments { count: usize, max: usize },

    #[error("NFT exchange count {count} exceeds the configured maximum {max}")]
    TooManyNftExchanges { count: usize, max: usize },

    #[error("transfer request carries no adjustments")]
    EmptyTransfer,

    #[error("coin adjustments by allowance are not supported")]
    CoinApprovalsDisabled,

    #[error("token adjustments by allowance are not supported")]
    TokenApprovalsDisabled,

    #[error("NFT exchanges by allowance are not supported")]
    NftApprovalsDisabled,

    #[error("NFT transfers are not enabled")]
    NftsDisabled,
}
