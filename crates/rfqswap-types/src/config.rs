//! Configuration types for the settlement engine.

use std::borrow::Cow;

use alloy_primitives::{Address, U256};
use alloy_sol_types::Eip712Domain;
use serde::{Deserialize, Serialize};

use crate::{Result, SwapError, constants};

/// EIP-712 domain the engine signs orders under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomainConfig {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    /// Address of the settlement contract itself.
    pub verifying_contract: Address,
}

impl DomainConfig {
    /// Build the typed-data domain.
    #[must_use]
    pub fn domain(&self) -> Eip712Domain {
        Eip712Domain::new(
            Some(Cow::Owned(self.name.clone())),
            Some(Cow::Owned(self.version.clone())),
            Some(U256::from(self.chain_id)),
            Some(self.verifying_contract),
            None,
        )
    }
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            name: constants::DEFAULT_DOMAIN_NAME.to_string(),
            version: constants::DEFAULT_DOMAIN_VERSION.to_string(),
            chain_id: constants::DEFAULT_CHAIN_ID,
            verifying_contract: Address::ZERO,
        }
    }
}

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementConfig {
    #[serde(default)]
    pub domain: DomainConfig,
    /// Token that wraps the native asset (deposit/withdraw 1:1).
    pub wrapped_native: Address,
    /// Gas forwarded with native payouts and refunds.
    #[serde(default = "default_native_gas_stipend")]
    pub native_gas_stipend: u64,
    /// Reject partial amounts on all-or-nothing quotes instead of filling
    /// them in full.
    #[serde(default)]
    pub strict_partial_fills: bool,
}

fn default_native_gas_stipend() -> u64 {
    constants::DEFAULT_NATIVE_GAS_STIPEND
}

impl SettlementConfig {
    /// Config with default domain and stipend for the engine deployed at
    /// `engine` and the given wrapped native token.
    #[must_use]
    pub fn new(engine: Address, wrapped_native: Address) -> Self {
        Self {
            domain: DomainConfig {
                verifying_contract: engine,
                ..DomainConfig::default()
            },
            wrapped_native,
            native_gas_stipend: constants::DEFAULT_NATIVE_GAS_STIPEND,
            strict_partial_fills: false,
        }
    }

    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.domain.verifying_contract.is_zero() {
            return Err(SwapError::Configuration(
                "domain.verifyingContract must be a non-zero address".to_string(),
            ));
        }
        if self.wrapped_native.is_zero() {
            return Err(SwapError::Configuration(
                "wrappedNative must be a non-zero address".to_string(),
            ));
        }
        if self.domain.name.is_empty() {
            return Err(SwapError::Configuration(
                "domain.name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
