//! The transfer orchestrator.
//!
//! Sequences the pipeline for one request and guarantees all-or-nothing
//! commit: structural validation, alias resolution, the usability gate
//! for every touched entity, allowance spending, custom fee assessment,
//! then exactly one call into the ledger mutator. Every failure before
//! that call leaves state untouched; the mutator itself stages before it
//! writes.

use meridian_fees::FeeAssessor;
use meridian_store::{
    AccountCreator, AccountStore, AllowanceStore, NftStore, TokenRelationshipStore,
    TokenStore,
};
use meridian_transfers::{
    validate_structure, AppliedTransfer, RecordSink, TransferRequest,
};
use meridian_types::TransferParams;

use crate::alias::AliasResolver;
use crate::allowance::AllowanceLedger;
use crate::error::EngineError;
use crate::mutator::LedgerMutator;
use crate::usability::UsabilityGate;

/// The explicit state handle one request executes against. The caller
/// owns it for the duration of the request; nothing here is a singleton.
pub struct TransferExecutor<'a> {
    accounts: &'a dyn AccountStore,
    tokens: &'a dyn TokenStore,
    relationships: &'a dyn TokenRelationshipStore,
    nfts: &'a dyn NftStore,
    allowances: &'a dyn AllowanceStore,
    creator: &'a dyn AccountCreator,
    params: &'a TransferParams,
}

impl<'a> TransferExecutor<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        accounts: &'a dyn AccountStore,
        tokens: &'a dyn TokenStore,
        relationships: &'a dyn TokenRelationshipStore,
        nfts: &'a dyn NftStore,
        allowances: &'a dyn AllowanceStore,
        creator: &'a dyn AccountCreator,
        params: &'a TransferParams,
    ) -> Self {
        Self {
            accounts,
            tokens,
            relationships,
            nfts,
            allowances,
            creator,
            params,
        }
    }

    /// Execute one transfer request atomically, reporting the applied
    /// adjustments to `sink` on success.
    pub fn execute(
        &self,
        request: &TransferRequest,
        sink: &mut dyn RecordSink,
    ) -> Result<AppliedTransfer, EngineError> {
        match self.run(request, sink) {
            Ok(applied) => {
                tracing::debug!(
                    adjustments = applied.adjustments.len(),
                    fees = applied.assessed_fees.len(),
                    "transfer committed"
                );
                Ok(applied)
            }
            Err(error) => {
                tracing::debug!(error = %error, "transfer rejected");
                Err(error)
            }
        }
    }

    fn run(
        &self,
        request: &TransferRequest,
        sink: &mut dyn RecordSink,
    ) -> Result<AppliedTransfer, EngineError> {
        validate_structure(request, self.params)?;

        let mut resolver = AliasResolver::new(self.accounts, self.creator);
        let mut plan = resolver.resolve(request)?;

        let mut gate = UsabilityGate::new(self.accounts, self.tokens, self.params);
        gate.check_account(plan.payer)?;
        for delta in &plan.coins {
            gate.check_account(delta.account)?;
        }
        for list in &plan.tokens {
            gate.check_token(list.token)?;
            for delta in &list.units {
                gate.check_account(delta.account)?;
            }
            for mv in &list.moves {
                gate.check_account(mv.sender)?;
                gate.check_account(mv.receiver)?;
            }
        }

        let staged_allowances =
            AllowanceLedger::new(self.allowances, self.nfts).charge(&plan)?;

        FeeAssessor::new(self.tokens, self.accounts, self.relationships, self.params)
            .assess(&mut plan)?;
        // Fee collectors and fee denominations are touched entities too.
        for delta in &plan.fee_deltas {
            gate.check_account(delta.account)?;
            if let Some(token) = delta.token {
                gate.check_token(token)?;
            }
        }

        let applied = LedgerMutator::new(
            self.accounts,
            self.relationships,
            self.nfts,
            self.allowances,
        )
        .apply(&plan, &staged_allowances)?;

        sink.record(&applied);
        Ok(applied)
    }
}
