//! The custom fee assessment engine.

use std::collections::VecDeque;

use meridian_store::{AccountStore, Token, TokenKind, TokenRelationshipStore, TokenStore};
use meridian_types::{
    AccountId, CustomFee, FixedFee, FractionalFee, RoyaltyFee, TokenId, TransferParams,
};
use meridian_transfers::{AssessedFee, FeeDelta, TransferPlan};

use crate::error::FeeError;

/// One triggering transfer awaiting assessment. Level 0 triggers come
/// from the user's token lists; deeper levels are the fee transfers
/// themselves.
struct Trigger {
    token: TokenId,
    /// Sum of the credit legs of the triggering transfer.
    total_credited: u128,
    /// Credit legs in order, for carving non-net fractional fees.
    credits: Vec<(AccountId, u128)>,
    /// Effective payer for fixed and net-of-transfers fractional fees:
    /// the first debited account of the triggering transfer.
    payer: Option<AccountId>,
    /// Senders of NFT exchanges, deduplicated in request order. Only
    /// level-0 triggers carry these; royalty never chains.
    nft_senders: Vec<AccountId>,
    depth: u32,
}

/// Expands a transfer plan with the custom fees owed to collectors.
///
/// Every assessed fee becomes a balanced payer→collector pair in
/// `plan.fee_deltas` plus an [`AssessedFee`] itemization; the user's own
/// deltas are never rewritten. The assessor performs no writes.
pub struct FeeAssessor<'a> {
    tokens: &'a dyn TokenStore,
    accounts: &'a dyn AccountStore,
    relationships: &'a dyn TokenRelationshipStore,
    params: &'a TransferParams,
}

impl<'a> FeeAssessor<'a> {
    pub fn new(
        tokens: &'a dyn TokenStore,
        accounts: &'a dyn AccountStore,
        relationships: &'a dyn TokenRelationshipStore,
        params: &'a TransferParams,
    ) -> Self {
        Self {
            tokens,
            accounts,
            relationships,
            params,
        }
    }

    /// Assess all custom fees for `plan`, appending the resulting deltas.
    pub fn assess(&self, plan: &mut TransferPlan) -> Result<(), FeeError> {
        let mut queue: VecDeque<Trigger> = plan
            .tokens
            .iter()
            .map(|list| {
                let mut credits = Vec::new();
                let mut total: u128 = 0;
                let mut payer = None;
                for unit in &list.units {
                    if unit.amount > 0 {
                        let amount = unit.amount as u128;
                        credits.push((unit.account, amount));
                        total += amount;
                    } else if payer.is_none() {
                        payer = Some(unit.account);
                    }
                }
                let mut nft_senders: Vec<AccountId> = Vec::new();
                for mv in &list.moves {
                    if !nft_senders.contains(&mv.sender) {
                        nft_senders.push(mv.sender);
                    }
                }
                if payer.is_none() {
                    payer = list.moves.first().map(|mv| mv.sender);
                }
                Trigger {
                    token: list.token,
                    total_credited: total,
                    credits,
                    payer,
                    nft_senders,
                    depth: 0,
                }
            })
            .collect();

        while let Some(trigger) = queue.pop_front() {
            let token = self
                .tokens
                .get_token(&trigger.token)?
                .ok_or(FeeError::UnknownToken(trigger.token))?;
            if token.custom_fees.is_empty() {
                continue;
            }
            if trigger.depth > self.params.max_custom_fee_depth {
                return Err(FeeError::RecursionExceeded(self.params.max_custom_fee_depth));
            }
            if token.custom_fees.len() > self.params.max_custom_fees_per_token {
                return Err(FeeError::TooManyCustomFees {
                    token: token.id,
                    count: token.custom_fees.len(),
                    max: self.params.max_custom_fees_per_token,
                });
            }
            // Transfer-triggered only: a token with no credit leg and no
            // NFT movement assesses nothing.
            if trigger.total_credited == 0 && trigger.nft_senders.is_empty() {
                continue;
            }

            for fee in &token.custom_fees {
                match fee {
                    CustomFee::Fixed(fixed) => {
                        self.assess_fixed(fixed, &trigger, plan, &mut queue)?
                    }
                    CustomFee::Fractional(fractional) => {
                        if token.kind == TokenKind::Fungible {
                            self.assess_fractional(&token, fractional, &trigger, plan)?;
                        }
                    }
                    CustomFee::Royalty(royalty) => {
                        if token.kind == TokenKind::NonFungible {
                            self.assess_royalty(&token, royalty, &trigger, plan)?;
                        }
                    }
                }
            }
        }

        self.check_fee_payer_balances(plan)
    }

    fn assess_fixed(
        &self,
        fee: &FixedFee,
        trigger: &Trigger,
        plan: &mut TransferPlan,
        queue: &mut VecDeque<Trigger>,
    ) -> Result<(), FeeError> {
        let Some(payer) = trigger.payer else {
            return Ok(());
        };
        // Self-fee exemption: a collector never pays its own fee.
        if payer == fee.collector || fee.amount == 0 {
            return Ok(());
        }
        let amount = i64::try_from(fee.amount)
            .map_err(|_| FeeError::FeeOverflow(trigger.token))?;

        plan.fee_deltas.push(FeeDelta {
            token: fee.denomination,
            account: payer,
            amount: -amount,
        });
        plan.fee_deltas.push(FeeDelta {
            token: fee.denomination,
            account: fee.collector,
            amount,
        });
        plan.assessed_fees.push(AssessedFee {
            token: fee.denomination,
            amount: fee.amount,
            collector: fee.collector,
            payers: vec![payer],
        });

        // A fee paid in another custom-fee token is itself assessed.
        // Native fees and fees in the triggering token never chain.
        if let Some(denomination) = fee.denomination {
            if denomination != trigger.token {
                queue.push_back(Trigger {
                    token: denomination,
                    total_credited: fee.amount as u128,
                    credits: vec![(fee.collector, fee.amount as u128)],
                    payer: Some(payer),
                    nft_senders: Vec::new(),
                    depth: trigger.depth + 1,
                });
            }
        }
        Ok(())
    }

    fn assess_fractional(
        &self,
        token: &Token,
        fee: &FractionalFee,
        trigger: &Trigger,
        plan: &mut TransferPlan,
    ) -> Result<(), FeeError> {
        if trigger.total_credited == 0 {
            return Ok(());
        }
        let amount = fractional_amount(token.id, fee, trigger.total_credited)?;
        if amount == 0 {
            return Ok(());
        }

        if fee.net_of_transfers {
            let Some(payer) = trigger.payer else {
                return Ok(());
            };
            if payer == fee.collector {
                return Ok(());
            }
            let signed = i64::try_from(amount)
                .map_err(|_| FeeError::FeeOverflow(token.id))?;
            plan.fee_deltas.push(FeeDelta {
                token: Some(trigger.token),
                account: payer,
                amount: -signed,
            });
            plan.fee_deltas.push(FeeDelta {
                token: Some(trigger.token),
                account: fee.collector,
                amount: signed,
            });
            plan.assessed_fees.push(AssessedFee {
                token: Some(trigger.token),
                amount,
                collector: fee.collector,
                payers: vec![payer],
            });
            return Ok(());
        }

        // Not net of transfers: the fee comes out of what the receivers
        // were credited, in list order, never more than they received.
        let mut remaining = amount;
        let mut payers = Vec::new();
        for (account, credited) in &trigger.credits {
            if *account == fee.collector {
                continue;
            }
            let take = remaining.min(u64::try_from(*credited).unwrap_or(u64::MAX));
            if take == 0 {
                continue;
            }
            let signed = i64::try_from(take)
                .map_err(|_| FeeError::FeeOverflow(token.id))?;
            plan.fee_deltas.push(FeeDelta {
                token: Some(trigger.token),
                account: *account,
                amount: -signed,
            });
            payers.push(*account);
            remaining -= take;
            if remaining == 0 {
                break;
            }
        }
        if payers.is_empty() {
            return Ok(());
        }
        let collected = amount - remaining;
        let signed = i64::try_from(collected)
            .map_err(|_| FeeError::FeeOverflow(token.id))?;
        plan.fee_deltas.push(FeeDelta {
            token: Some(trigger.token),
            account: fee.collector,
            amount: signed,
        });
        plan.assessed_fees.push(AssessedFee {
            token: Some(trigger.token),
            amount: collected,
            collector: fee.collector,
            payers,
        });
        Ok(())
    }

    fn assess_royalty(
        &self,
        token: &Token,
        fee: &RoyaltyFee,
        trigger: &Trigger,
        plan: &mut TransferPlan,
    ) -> Result<(), FeeError> {
        // Collect the countervalue first so the appended fee deltas do
        // not feed back into the computation.
        let mut charges: Vec<(Option<TokenId>, AccountId, u64)> = Vec::new();
        for sender in &trigger.nft_senders {
            if *sender == fee.collector {
                continue;
            }
            let coin_value: u128 = plan
                .coins
                .iter()
                .filter(|d| d.account == *sender && d.amount > 0)
                .map(|d| d.amount as u128)
                .sum();
            if coin_value > 0 {
                let amount = royalty_amount(token.id, fee, coin_value)?;
                if amount > 0 {
                    charges.push((None, *sender, amount));
                }
            }
            for list in &plan.tokens {
                if list.token == trigger.token {
                    continue;
                }
                let value: u128 = list
                    .units
                    .iter()
                    .filter(|d| d.account == *sender && d.amount > 0)
                    .map(|d| d.amount as u128)
                    .sum();
                if value > 0 {
                    let amount = royalty_amount(token.id, fee, value)?;
                    if amount > 0 {
                        charges.push((Some(list.token), *sender, amount));
                    }
                }
            }
        }
        // No countervalue in the request: the royalty assesses to zero.
        for (denomination, sender, amount) in charges {
            let signed = i64::try_from(amount)
                .map_err(|_| FeeError::FeeOverflow(token.id))?;
            plan.fee_deltas.push(FeeDelta {
                token: denomination,
                account: sender,
                amount: -signed,
            });
            plan.fee_deltas.push(FeeDelta {
                token: denomination,
                account: fee.collector,
                amount: signed,
            });
            plan.assessed_fees.push(AssessedFee {
                token: denomination,
                amount,
                collector: fee.collector,
                payers: vec![sender],
            });
        }
        Ok(())
    }

    /// No partial fee collection: if any fee payer cannot cover the fees
    /// assessed on top of the user's own deltas, the whole request fails.
    fn check_fee_payer_balances(&self, plan: &TransferPlan) -> Result<(), FeeError> {
        use std::collections::BTreeMap;

        let mut fee_net: BTreeMap<(AccountId, Option<TokenId>), i128> = BTreeMap::new();
        for delta in &plan.fee_deltas {
            *fee_net.entry((delta.account, delta.token)).or_default() +=
                i128::from(delta.amount);
        }

        for ((account, denomination), net) in fee_net {
            if net >= 0 {
                continue;
            }
            match denomination {
                None => {
                    let balance = self
                        .accounts
                        .get_account(&account)?
                        .map(|a| i128::from(a.balance))
                        .unwrap_or(0);
                    let user: i128 = plan
                        .coins
                        .iter()
                        .filter(|d| d.account == account)
                        .map(|d| i128::from(d.amount))
                        .sum();
                    // A user-level shortfall is the mutator's to report;
                    // only a fee-induced one is ours.
                    if balance + user >= 0 && balance + user + net < 0 {
                        return Err(FeeError::InsufficientCoinForFee(account));
                    }
                }
                Some(token) => {
                    let Some(relationship) =
                        self.relationships.get_relationship(&account, &token)?
                    else {
                        continue;
                    };
                    let user: i128 = plan
                        .tokens
                        .iter()
                        .filter(|t| t.token == token)
                        .flat_map(|t| t.units.iter())
                        .filter(|d| d.account == account)
                        .map(|d| i128::from(d.amount))
                        .sum();
                    let balance = i128::from(relationship.balance);
                    if balance + user >= 0 && balance + user + net < 0 {
                        return Err(FeeError::InsufficientTokenForFee { account, token });
                    }
                }
            }
        }
        Ok(())
    }
}

/// `floor(numerator × credited / denominator)`, clamped to the schedule's
/// `[minimum, maximum]` after flooring.
fn fractional_amount(
    token: TokenId,
    fee: &FractionalFee,
    credited: u128,
) -> Result<u64, FeeError> {
    let raw = credited
        .checked_mul(fee.numerator as u128)
        .and_then(|product| product.checked_div(fee.denominator as u128))
        .ok_or(FeeError::FeeOverflow(token))?;
    let mut amount = raw.max(fee.minimum as u128);
    if let Some(maximum) = fee.maximum {
        amount = amount.min(maximum as u128);
    }
    u64::try_from(amount).map_err(|_| FeeError::FeeOverflow(token))
}

/// `floor(numerator × value / denominator)` of one countervalue credit.
fn royalty_amount(token: TokenId, fee: &RoyaltyFee, value: u128) -> Result<u64, FeeError> {
    let raw = value
        .checked_mul(fee.numerator as u128)
        .and_then(|product| product.checked_div(fee.denominator as u128))
        .ok_or(FeeError::FeeOverflow(token))?;
    u64::try_from(raw).map_err(|_| FeeError::FeeOverflow(token))
}
