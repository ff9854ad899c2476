use meridian_fees::FeeError;
use meridian_store::{CreationError, StoreError};
use meridian_transfers::TransferError;
use meridian_types::{AccountId, NftId, TokenId};
use thiserror::Error;

/// Every way one transfer request can fail. Exactly one variant surfaces
/// per failed request, and ledger state is guaranteed unchanged.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Structural(#[from] TransferError),

    #[error(transparent)]
    Fee(#[from] FeeError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("invalid account id {0}")]
    InvalidAccount(AccountId),

    #[error("account {0} is deleted")]
    AccountDeleted(AccountId),

    #[error("account {0} is expired and pending removal")]
    AccountExpired(AccountId),

    #[error("contract {0} is expired and pending removal")]
    ContractExpired(AccountId),

    #[error("invalid token id {0}")]
    InvalidToken(TokenId),

    #[error("token {0} was deleted")]
    TokenDeleted(TokenId),

    #[error("token {0} is paused")]
    TokenPaused(TokenId),

    #[error("account {account} is not associated with token {token}")]
    TokenNotAssociated {
        account: AccountId,
        token: TokenId,
    },

    #[error("account {account} is frozen for token {token}")]
    TokenFrozen {
        account: AccountId,
        token: TokenId,
    },

    #[error("account {account} has no KYC grant for token {token}")]
    KycNotGranted {
        account: AccountId,
        token: TokenId,
    },

    #[error("invalid NFT reference {0}")]
    InvalidNft(NftId),

    #[error("account {claimed} does not own NFT {nft}")]
    WrongNftOwner { nft: NftId, claimed: AccountId },

    #[error("transfer amount exceeds the allowance granted to {spender} by {owner}")]
    AmountExceedsAllowance {
        owner: AccountId,
        spender: AccountId,
    },

    #[error("spender {spender} is not approved for NFT {nft}")]
    SpenderNotApproved { nft: NftId, spender: AccountId },

    #[error("insufficient coin balance on account {0}")]
    InsufficientCoinBalance(AccountId),

    #[error("insufficient balance of token {token} on account {account}")]
    InsufficientTokenBalance {
        account: AccountId,
        token: TokenId,
    },

    #[error("balance arithmetic overflow for account {0}")]
    BalanceOverflow(AccountId),

    #[error("account auto-creation failed: {0}")]
    AutoCreation(#[from] CreationError),
}
