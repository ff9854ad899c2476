//! Transfer parameters — the governable knobs read once per request.
//!
//! Can be loaded from a TOML file via [`TransferParams::from_toml_file`]
//! or built programmatically (e.g. for tests). Every field has a network
//! default so a params file only needs to name what it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use thiserror::Error;

/// Configuration consumed by the transfer engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransferParams {
    /// Maximum native-currency entries per request.
    #[serde(default = "default_max_coin_adjustments")]
    pub max_coin_adjustments: usize,

    /// Maximum fungible-token entries per request, aggregated across all
    /// token transfer lists.
    #[serde(default = "default_max_token_adjustments")]
    pub max_token_adjustments: usize,

    /// Maximum NFT entries per request, aggregated across all token
    /// transfer lists.
    #[serde(default = "default_max_nft_exchanges")]
    pub max_nft_exchanges: usize,

    /// Whether spending through pre-authorized allowances is enabled.
    #[serde(default = "default_true")]
    pub allowances_enabled: bool,

    /// Whether non-fungible tokens are enabled at all.
    #[serde(default = "default_true")]
    pub nfts_enabled: bool,

    /// Maximum depth of fee-on-fee chaining when a custom fee is paid in
    /// another custom-fee token.
    #[serde(default = "default_max_custom_fee_depth")]
    pub max_custom_fee_depth: u32,

    /// Maximum number of custom fee entries honored on one token.
    #[serde(default = "default_max_custom_fees_per_token")]
    pub max_custom_fees_per_token: usize,

    /// Whether expired-and-pending-removal plain accounts are barred from
    /// transfers (the auto-renew grace-period gate).
    #[serde(default)]
    pub expire_accounts: bool,

    /// Same gate, independently configurable for contract accounts.
    #[serde(default)]
    pub expire_contracts: bool,
}

impl TransferParams {
    /// Network defaults — the intended live configuration.
    pub fn defaults() -> Self {
        Self {
            max_coin_adjustments: default_max_coin_adjustments(),
            max_token_adjustments: default_max_token_adjustments(),
            max_nft_exchanges: default_max_nft_exchanges(),
            allowances_enabled: true,
            nfts_enabled: true,
            max_custom_fee_depth: default_max_custom_fee_depth(),
            max_custom_fees_per_token: default_max_custom_fees_per_token(),
            expire_accounts: false,
            expire_contracts: false,
        }
    }

    /// Parse params from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ParamsError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load params from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

impl Default for TransferParams {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Error loading a params file.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("failed to read params file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse params file: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_max_coin_adjustments() -> usize {
    10
}

fn default_max_token_adjustments() -> usize {
    10
}

fn default_max_nft_exchanges() -> usize {
    10
}

fn default_max_custom_fee_depth() -> u32 {
    2
}

fn default_max_custom_fees_per_token() -> usize {
    10
}

fn default_true() -> bool {
    true
}
