//! Account auto-creation delegate.
//!
//! When a transfer participant is an alias with no bound account, the
//! engine delegates creation of the hollow account to this capability.
//! The real implementation is the node's create-account handler; tests
//! inject a deterministic fake.

use meridian_types::{AccountId, Alias};
use thiserror::Error;

/// Failure reported by the creation delegate. Passed through to the
/// caller verbatim, never swallowed by the engine.
#[derive(Clone, Debug, Error)]
pub enum CreationError {
    #[error("alias is malformed")]
    MalformedAlias,

    #[error("account auto-creation limit reached")]
    CreationLimitReached,

    #[error("{0}")]
    Other(String),
}

/// Capability to materialize a new hollow account owning `alias`.
///
/// The delegate persists the account record itself and returns the new
/// account number. Invoked at most once per distinct alias per request.
pub trait AccountCreator {
    fn create_hollow_account(&self, alias: &Alias) -> Result<AccountId, CreationError>;
}
