//! EIP-712 hashing of orders and token permits.
//!
//! Signatures are produced over these digests, so the struct definitions below
//! are a wire contract: field order and Solidity types must not change.

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::{Eip712Domain, SolStruct, eip712_domain, sol};

use crate::Order;
use crate::constants::{PERMIT_DOMAIN_NAME, PERMIT_DOMAIN_VERSION};

sol! {
    /// Typed-data image of an [`Order`](crate::Order).
    #[derive(Debug)]
    struct OrderRFQ {
        uint256 constraints;
        address maker;
        address makerAsset;
        address takerAsset;
        uint256 makingAmount;
        uint256 takingAmount;
    }

    /// ERC-2612 style approval signed by a token holder.
    #[derive(Debug)]
    struct Permit {
        address owner;
        address spender;
        uint256 value;
        uint256 nonce;
        uint256 deadline;
    }
}

impl From<&Order> for OrderRFQ {
    fn from(order: &Order) -> Self {
        Self {
            constraints: order.constraints.0,
            maker: order.maker,
            makerAsset: order.maker_asset,
            takerAsset: order.taker_asset,
            makingAmount: order.making_amount,
            takingAmount: order.taking_amount,
        }
    }
}

/// Domain-separated digest of `order`; this is what makers sign.
#[must_use]
pub fn order_hash(order: &Order, domain: &Eip712Domain) -> B256 {
    OrderRFQ::from(order).eip712_signing_hash(domain)
}

/// EIP-712 domain of the token living at `asset`, used for permits.
#[must_use]
pub fn permit_domain(asset: Address, chain_id: u64) -> Eip712Domain {
    eip712_domain! {
        name: PERMIT_DOMAIN_NAME,
        version: PERMIT_DOMAIN_VERSION,
        chain_id: chain_id,
        verifying_contract: asset,
    }
}

/// Digest a token holder signs to approve `spender` via permit.
#[must_use]
pub fn permit_hash(
    asset: Address,
    chain_id: u64,
    owner: Address,
    spender: Address,
    value: U256,
    nonce: U256,
    deadline: u64,
) -> B256 {
    Permit {
        owner,
        spender,
        value,
        nonce,
        deadline: U256::from(deadline),
    }
    .eip712_signing_hash(&permit_domain(asset, chain_id))
}
