//! Allowance spending for approval-flagged transfer legs.
//!
//! Computes the post-spend allowance values without writing anything;
//! the staged decrements are committed by the ledger mutator together
//! with every other mutation, so a later failure costs the owner nothing.

use std::collections::BTreeMap;

use meridian_store::{AllowanceStore, NftStore};
use meridian_transfers::TransferPlan;
use meridian_types::{AccountId, NftId, TokenId};

use crate::error::EngineError;

/// Allowance values as they will be after this request commits.
#[derive(Debug, Default)]
pub struct StagedAllowances {
    pub coin: BTreeMap<(AccountId, AccountId), u64>,
    pub tokens: BTreeMap<(AccountId, TokenId, AccountId), u64>,
}

pub struct AllowanceLedger<'a> {
    allowances: &'a dyn AllowanceStore,
    nfts: &'a dyn NftStore,
}

impl<'a> AllowanceLedger<'a> {
    pub fn new(allowances: &'a dyn AllowanceStore, nfts: &'a dyn NftStore) -> Self {
        Self { allowances, nfts }
    }

    /// Charge every approval-flagged leg of `plan` against the granted
    /// allowances. The spender is always the transaction payer.
    pub fn charge(&self, plan: &TransferPlan) -> Result<StagedAllowances, EngineError> {
        let payer = plan.payer;
        let mut staged = StagedAllowances::default();

        for delta in &plan.coins {
            if !delta.approval || delta.amount >= 0 {
                continue;
            }
            let owner = delta.account;
            let needed = delta.amount.unsigned_abs();
            let key = (owner, payer);
            let remaining = match staged.coin.get(&key) {
                Some(value) => Some(*value),
                None => self.allowances.coin_allowance(&owner, &payer)?,
            };
            match remaining {
                Some(value) if value >= needed => {
                    staged.coin.insert(key, value - needed);
                }
                // The payer spending its own funds needs no entry.
                _ if owner == payer => {}
                _ => {
                    return Err(EngineError::AmountExceedsAllowance {
                        owner,
                        spender: payer,
                    })
                }
            }
        }

        for list in &plan.tokens {
            for delta in &list.units {
                if !delta.approval || delta.amount >= 0 {
                    continue;
                }
                let owner = delta.account;
                let needed = delta.amount.unsigned_abs();
                let key = (owner, list.token, payer);
                let remaining = match staged.tokens.get(&key) {
                    Some(value) => Some(*value),
                    None => self.allowances.token_allowance(&owner, &list.token, &payer)?,
                };
                match remaining {
                    Some(value) if value >= needed => {
                        staged.tokens.insert(key, value - needed);
                    }
                    _ if owner == payer => {}
                    _ => {
                        return Err(EngineError::AmountExceedsAllowance {
                            owner,
                            spender: payer,
                        })
                    }
                }
            }

            for mv in &list.moves {
                if !mv.approval {
                    continue;
                }
                let owner = mv.sender;
                if owner == payer {
                    continue;
                }
                let id = NftId::new(list.token, mv.serial);
                let nft = self
                    .nfts
                    .get_nft(&id)?
                    .ok_or(EngineError::InvalidNft(id))?;
                // Either the single-serial approval (cleared at commit)
                // or a standing approved-for-all grant.
                if nft.spender == Some(payer) {
                    continue;
                }
                if self.allowances.approved_for_all(&owner, &list.token, &payer)? {
                    continue;
                }
                return Err(EngineError::SpenderNotApproved { nft: id, spender: payer });
            }
        }

        Ok(staged)
    }
}
