//! Maker authentication.
//!
//! Two modes, picked by the entry point the taker calls:
//!
//! - **ECDSA**: the signer is recovered from a 65-byte `r || s || v`
//!   signature over the order hash and must equal `order.maker`.
//! - **Contract signer**: the contract living at `order.maker` is asked to
//!   validate an opaque blob against the order hash and must answer with the
//!   ERC-1271 magic value.
//!
//! Verification never touches ledger state; the engine runs it before the
//! nonce is consumed.

use std::{collections::HashMap, fmt, sync::Arc};

use alloy_primitives::{Address, B256, FixedBytes, Signature};
use rfqswap_types::{
    Order, Result, SwapError,
    constants::{ECDSA_SIGNATURE_LEN, ERC1271_MAGIC_VALUE},
};

/// Signature-validation callback of a maker contract.
pub trait ContractSigner: Send + Sync {
    /// Returns [`ERC1271_MAGIC_VALUE`] when `signature` authorizes `hash`.
    ///
    /// Any other value, or an error, rejects the signature.
    fn is_valid_signature(&self, hash: B256, signature: &[u8]) -> Result<FixedBytes<4>>;
}

/// Signature material supplied with a fill.
#[derive(Debug, Clone, Copy)]
pub enum OrderSignature<'a> {
    /// Raw recoverable signature by an externally-owned maker.
    Ecdsa(&'a [u8]),
    /// Blob handed to the maker contract's callback.
    Contract(&'a [u8]),
}

/// Recover the address that signed `hash`.
///
/// Fails with [`SwapError::BadSignature`] on malformed input or when recovery
/// yields the zero address.
pub fn recover_signer(hash: B256, signature: &[u8]) -> Result<Address> {
    if signature.len() != ECDSA_SIGNATURE_LEN {
        return Err(SwapError::BadSignature);
    }
    let signature = Signature::from_raw(signature).map_err(|_| SwapError::BadSignature)?;
    let signer = signature
        .recover_address_from_prehash(&hash)
        .map_err(|_| SwapError::BadSignature)?;
    if signer.is_zero() {
        return Err(SwapError::BadSignature);
    }
    Ok(signer)
}

/// Authenticates makers; owns the registry of contract signers.
#[derive(Default, Clone)]
pub struct SignatureVerifier {
    contract_signers: HashMap<Address, Arc<dyn ContractSigner>>,
}

impl SignatureVerifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the validation callback for the contract at `account`.
    pub fn register_contract_signer(&mut self, account: Address, signer: Arc<dyn ContractSigner>) {
        self.contract_signers.insert(account, signer);
    }

    /// Check that `signature` authorizes `order` (whose digest is `hash`).
    pub fn verify(&self, order: &Order, hash: B256, signature: OrderSignature<'_>) -> Result<()> {
        match signature {
            OrderSignature::Ecdsa(bytes) => {
                let signer = recover_signer(hash, bytes)?;
                if signer != order.maker {
                    tracing::debug!(
                        maker = %order.maker,
                        recovered = %signer,
                        order_hash = %hash,
                        "Recovered signer does not match maker"
                    );
                    return Err(SwapError::BadSignature);
                }
                Ok(())
            }
            OrderSignature::Contract(blob) => {
                let Some(contract) = self.contract_signers.get(&order.maker) else {
                    tracing::debug!(maker = %order.maker, "Maker has no signature callback");
                    return Err(SwapError::BadSignature);
                };
                match contract.is_valid_signature(hash, blob) {
                    Ok(magic) if magic.0 == ERC1271_MAGIC_VALUE => Ok(()),
                    _ => Err(SwapError::BadSignature),
                }
            }
        }
    }
}

impl fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("contract_signers", &self.contract_signers.keys().collect::<Vec<_>>())
            .finish()
    }
}
