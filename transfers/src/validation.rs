//! Stateless structural validation of a raw transfer request.
//!
//! Everything here is checkable without touching ledger state, so the
//! same pass can run as a pre-consensus check. Stateful checks (entity
//! usability, balances, allowances, ownership) are done by the engine.

use std::collections::HashSet;

use meridian_types::TransferParams;

use crate::error::TransferError;
use crate::request::{NftExchange, TokenTransferList, TransferRequest};

/// Validate the structure of a transfer request.
///
/// Check order: feature gates, configured ceilings (native, then
/// aggregate fungible, then aggregate NFT), emptiness, the native list,
/// then each token list in request order. The first failure terminates
/// the pass.
pub fn validate_structure(
    request: &TransferRequest,
    params: &TransferParams,
) -> Result<(), TransferError> {
    check_feature_gates(request, params)?;
    check_ceilings(request, params)?;
    if request.is_empty() {
        return Err(TransferError::EmptyTransfer);
    }
    check_coin_adjustments(request)?;

    let mut seen_tokens = HashSet::new();
    let mut seen_serials = HashSet::new();
    for list in &request.token_transfers {
        check_token_list(list, &mut seen_tokens, &mut seen_serials)?;
    }
    Ok(())
}

fn check_feature_gates(
    request: &TransferRequest,
    params: &TransferParams,
) -> Result<(), TransferError> {
    if !params.nfts_enabled && request.nft_exchange_count() > 0 {
        return Err(TransferError::NftsDisabled);
    }
    if params.allowances_enabled {
        return Ok(());
    }
    if request.coin_adjustments.iter().any(|a| a.approval) {
        return Err(TransferError::CoinApprovalsDisabled);
    }
    for list in &request.token_transfers {
        if list.adjustments.iter().any(|a| a.approval) {
            return Err(TransferError::TokenApprovalsDisabled);
        }
        if list.nft_exchanges.iter().any(|e| e.approval) {
            return Err(TransferError::NftApprovalsDisabled);
        }
    }
    Ok(())
}

fn check_ceilings(
    request: &TransferRequest,
    params: &TransferParams,
) -> Result<(), TransferError> {
    let count = request.coin_adjustments.len();
    if count > params.max_coin_adjustments {
        return Err(TransferError::TooManyCoinAdjustments {
            count,
            max: params.max_coin_adjustments,
        });
    }
    let count = request.token_adjustment_count();
    if count > params.max_token_adjustments {
        return Err(TransferError::TooManyTokenAdjustments {
            count,
            max: params.max_token_adjustments,
        });
    }
    let count = request.nft_exchange_count();
    if count > params.max_nft_exchanges {
        return Err(TransferError::TooManyNftExchanges {
            count,
            max: params.max_nft_exchanges,
        });
    }
    Ok(())
}

fn check_coin_adjustments(request: &TransferRequest) -> Result<(), TransferError> {
    let mut seen = HashSet::new();
    let mut sum: i128 = 0;
    for adjustment in &request.coin_adjustments {
        if !adjustment.account.is_set() {
            return Err(TransferError::MissingCoinAccount);
        }
        if !seen.insert(&adjustment.account) {
            return Err(TransferError::RepeatedCoinAccount(
                adjustment.account.to_string(),
            ));
        }
        sum += i128::from(adjustment.amount);
    }
    if sum != 0 {
        return Err(TransferError::CoinSumNonZero(sum));
    }
    Ok(())
}

fn check_token_list(
    list: &TokenTransferList,
    seen_tokens: &mut HashSet<meridian_types::TokenId>,
    seen_serials: &mut HashSet<(meridian_types::TokenId, i64)>,
) -> Result<(), TransferError> {
    if !list.token.is_set() {
        return Err(TransferError::MissingTokenId);
    }
    if !seen_tokens.insert(list.token) {
        return Err(TransferError::RepeatedTokenId(list.token));
    }

    // A token moves either as fungible units or as serials, never both,
    // and an empty list says nothing at all.
    if list.adjustments.is_empty() == list.nft_exchanges.is_empty() {
        return Err(TransferError::AmbiguousTokenTransferKind(list.token));
    }

    let mut seen = HashSet::new();
    let mut sum: i128 = 0;
    for adjustment in &list.adjustments {
        if !adjustment.account.is_set() {
            return Err(TransferError::MissingTokenAccount(list.token));
        }
        if adjustment.amount == 0 {
            return Err(TransferError::ZeroTokenAmount(list.token));
        }
        if !seen.insert(&adjustment.account) {
            return Err(TransferError::RepeatedTokenAccount {
                token: list.token,
                account: adjustment.account.to_string(),
            });
        }
        sum += i128::from(adjustment.amount);
    }
    if sum != 0 {
        return Err(TransferError::TokenSumNonZero {
            token: list.token,
            sum,
        });
    }

    for exchange in &list.nft_exchanges {
        check_nft_exchange(list, exchange, seen_serials)?;
    }
    Ok(())
}

fn check_nft_exchange(
    list: &TokenTransferList,
    exchange: &NftExchange,
    seen_serials: &mut HashSet<(meridian_types::TokenId, i64)>,
) -> Result<(), TransferError> {
    if !exchange.sender.is_set() || !exchange.receiver.is_set() {
        return Err(TransferError::MissingNftParty(list.token));
    }
    if exchange.serial <= 0 {
        return Err(TransferError::InvalidNftSerial {
            token: list.token,
            serial: exchange.serial,
        });
    }
    if exchange.sender == exchange.receiver {
        return Err(TransferError::NftSelfExchange {
            token: list.token,
            serial: exchange.serial,
        });
    }
    if !seen_serials.insert((list.token, exchange.serial)) {
        return Err(TransferError::RepeatedNftSerial {
            token: list.token,
            serial: exchange.serial,
        });
    }
    Ok(())
}
