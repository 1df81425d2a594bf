//! Journaled asset ledger.
//!
//! Holds every piece of state a fill can touch:
//! 1. Invalidator words per `(maker, slot)`
//! 2. Token balances and allowances
//! 3. Permit nonces per `(token, owner)`
//! 4. Native balances (the wrapped-native token is backed 1:1 by the native
//!    balance of its own contract address)
//! 5. The `OrderFilled` event log
//!
//! Writes made while a [`Checkpoint`] is open are journaled and undone by
//! [`Ledger::checkpoint_revert`], so a failed call leaves no trace.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use rfqswap_ingress::recover_signer;
use rfqswap_types::{
    OrderFilled, PermitPayload, Result, SwapError, constants::NATIVE_ASSET, permit_hash,
};

use crate::journal::{Checkpoint, Journal, JournalEntry};
use crate::supply_conservation::SupplyConservation;

/// In-memory stand-in for chain state.
#[derive(Debug, Default)]
pub struct Ledger {
    invalidators: HashMap<(Address, U256), U256>,
    /// Per-(asset, holder) balances.
    balances: HashMap<(Address, Address), U256>,
    /// Per-(asset, owner, spender) allowances.
    allowances: HashMap<(Address, Address, Address), U256>,
    permit_nonces: HashMap<(Address, Address), U256>,
    native: HashMap<Address, U256>,
    events: Vec<OrderFilled>,
    supply: SupplyConservation,
    journal: Journal,
}

/// `current + amount`, failing instead of wrapping or capping.
fn credit(current: U256, amount: U256) -> Result<U256> {
    current
        .checked_add(amount)
        .ok_or(SwapError::ArithmeticOverflow)
}

fn store<K: std::hash::Hash + Eq>(map: &mut HashMap<K, U256>, key: K, value: U256) {
    if value.is_zero() {
        map.remove(&key);
    } else {
        map.insert(key, value);
    }
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------
    // Checkpoints
    // -----------------------------------------------------------------

    /// Open a revertible scope. Scopes nest.
    pub fn checkpoint(&mut self) -> Checkpoint {
        self.journal.checkpoint(self.events.len())
    }

    /// Close the innermost scope, keeping its writes.
    pub fn checkpoint_commit(&mut self) {
        self.journal.commit();
    }

    /// Close the innermost scope, undoing every write made inside it.
    pub fn checkpoint_revert(&mut self, checkpoint: Checkpoint) {
        for entry in self.journal.revert(checkpoint) {
            match entry {
                JournalEntry::Invalidator {
                    maker,
                    slot,
                    previous,
                } => store(&mut self.invalidators, (maker, slot), previous),
                JournalEntry::Balance {
                    asset,
                    holder,
                    previous,
                } => store(&mut self.balances, (asset, holder), previous),
                JournalEntry::Allowance {
                    asset,
                    owner,
                    spender,
                    previous,
                } => store(&mut self.allowances, (asset, owner, spender), previous),
                JournalEntry::PermitNonce {
                    asset,
                    owner,
                    previous,
                } => store(&mut self.permit_nonces, (asset, owner), previous),
                JournalEntry::Native { account, previous } => {
                    store(&mut self.native, account, previous);
                }
                JournalEntry::Supply {
                    asset,
                    minted,
                    burned,
                } => self.supply.restore(asset, minted, burned),
            }
        }
        self.events.truncate(checkpoint.events_len);
    }

    /// Number of open checkpoints.
    #[must_use]
    pub fn checkpoint_depth(&self) -> usize {
        self.journal.depth()
    }

    // -----------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------

    #[must_use]
    pub fn invalidator(&self, maker: Address, slot: U256) -> U256 {
        self.invalidators
            .get(&(maker, slot))
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn balance(&self, asset: Address, holder: Address) -> U256 {
        self.balances
            .get(&(asset, holder))
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn allowance(&self, asset: Address, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(asset, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn permit_nonce(&self, asset: Address, owner: Address) -> U256 {
        self.permit_nonces
            .get(&(asset, owner))
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn native_balance(&self, account: Address) -> U256 {
        self.native.get(&account).copied().unwrap_or_default()
    }

    /// Every `OrderFilled` record, oldest first.
    #[must_use]
    pub fn events(&self) -> &[OrderFilled] {
        &self.events
    }

    #[must_use]
    pub fn supply(&self) -> &SupplyConservation {
        &self.supply
    }

    // -----------------------------------------------------------------
    // Journaled writes
    // -----------------------------------------------------------------

    pub(crate) fn set_invalidator(&mut self, maker: Address, slot: U256, word: U256) {
        let previous = self.invalidator(maker, slot);
        self.journal.record(JournalEntry::Invalidator {
            maker,
            slot,
            previous,
        });
        store(&mut self.invalidators, (maker, slot), word);
    }

    fn set_balance(&mut self, asset: Address, holder: Address, value: U256) {
        let previous = self.balance(asset, holder);
        self.journal.record(JournalEntry::Balance {
            asset,
            holder,
            previous,
        });
        store(&mut self.balances, (asset, holder), value);
    }

    fn set_allowance(&mut self, asset: Address, owner: Address, spender: Address, value: U256) {
        let previous = self.allowance(asset, owner, spender);
        self.journal.record(JournalEntry::Allowance {
            asset,
            owner,
            spender,
            previous,
        });
        store(&mut self.allowances, (asset, owner, spender), value);
    }

    fn set_native(&mut self, account: Address, value: U256) {
        let previous = self.native_balance(account);
        self.journal
            .record(JournalEntry::Native { account, previous });
        store(&mut self.native, account, value);
    }

    fn record_supply(&mut self, asset: Address) {
        let (minted, burned) = self.supply.totals(asset);
        self.journal.record(JournalEntry::Supply {
            asset,
            minted,
            burned,
        });
    }

    // -----------------------------------------------------------------
    // Token operations
    // -----------------------------------------------------------------

    /// Credit `amount` of a fresh `asset` issue to `to`.
    ///
    /// Fails with [`SwapError::ArithmeticOverflow`] when the total ever
    /// minted would exceed `U256::MAX`; every balance is bounded by it.
    pub fn mint(&mut self, asset: Address, to: Address, amount: U256) -> Result<()> {
        let (minted, _) = self.supply.totals(asset);
        credit(minted, amount)?;
        let balance = credit(self.balance(asset, to), amount)?;
        self.set_balance(asset, to, balance);
        self.record_supply(asset);
        self.supply.record_mint(asset, amount);
        Ok(())
    }

    /// Remove `amount` of `asset` from circulation.
    pub fn burn(&mut self, asset: Address, from: Address, amount: U256) -> Result<()> {
        let available = self.balance(asset, from);
        if available < amount {
            return Err(SwapError::InsufficientBalance {
                asset,
                holder: from,
                needed: amount,
                available,
            });
        }
        self.set_balance(asset, from, available - amount);
        self.record_supply(asset);
        self.supply.record_burn(asset, amount);
        Ok(())
    }

    pub fn approve(&mut self, asset: Address, owner: Address, spender: Address, value: U256) {
        self.set_allowance(asset, owner, spender, value);
    }

    /// Move `amount` of `asset` between holders.
    pub fn transfer(&mut self, asset: Address, from: Address, to: Address, amount: U256) -> Result<()> {
        let available = self.balance(asset, from);
        if available < amount {
            return Err(SwapError::InsufficientBalance {
                asset,
                holder: from,
                needed: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }
        let credited = credit(self.balance(asset, to), amount)?;
        self.set_balance(asset, from, available - amount);
        self.set_balance(asset, to, credited);
        Ok(())
    }

    /// Move `amount` of `from`'s `asset` on `spender`'s authority.
    ///
    /// An allowance of `U256::MAX` is never decremented. A holder spending
    /// their own balance needs no allowance.
    pub fn transfer_from(
        &mut self,
        asset: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()> {
        if spender != from {
            let allowed = self.allowance(asset, from, spender);
            if allowed < amount {
                return Err(SwapError::InsufficientAllowance {
                    asset,
                    owner: from,
                    needed: amount,
                    available: allowed,
                });
            }
            if allowed != U256::MAX {
                self.set_allowance(asset, from, spender, allowed - amount);
            }
        }
        self.transfer(asset, from, to, amount)
    }

    /// Apply a signed approval of `spender` over `owner`'s `asset`.
    pub fn permit(
        &mut self,
        asset: Address,
        owner: Address,
        spender: Address,
        payload: &PermitPayload,
        now: u64,
        chain_id: u64,
    ) -> Result<()> {
        if payload.deadline < now {
            return Err(SwapError::PermitExpired {
                deadline: payload.deadline,
            });
        }
        let nonce = self.permit_nonce(asset, owner);
        let digest = permit_hash(
            asset,
            chain_id,
            owner,
            spender,
            payload.value,
            nonce,
            payload.deadline,
        );
        match recover_signer(digest, &payload.signature) {
            Ok(signer) if signer == owner => {}
            _ => return Err(SwapError::InvalidPermit { owner }),
        }

        self.journal.record(JournalEntry::PermitNonce {
            asset,
            owner,
            previous: nonce,
        });
        self.permit_nonces
            .insert((asset, owner), nonce.saturating_add(U256::from(1u8)));
        self.set_allowance(asset, owner, spender, payload.value);
        tracing::debug!(%asset, %owner, %spender, value = %payload.value, "Permit applied");
        Ok(())
    }

    // -----------------------------------------------------------------
    // Native value
    // -----------------------------------------------------------------

    /// Credit fresh native value to `account`.
    pub fn fund_native(&mut self, account: Address, amount: U256) -> Result<()> {
        let (minted, _) = self.supply.totals(NATIVE_ASSET);
        credit(minted, amount)?;
        let balance = credit(self.native_balance(account), amount)?;
        self.set_native(account, balance);
        self.record_supply(NATIVE_ASSET);
        self.supply.record_mint(NATIVE_ASSET, amount);
        Ok(())
    }

    pub fn transfer_native(&mut self, from: Address, to: Address, amount: U256) -> Result<()> {
        let available = self.native_balance(from);
        if available < amount {
            return Err(SwapError::InsufficientNativeBalance {
                account: from,
                needed: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }
        let credited = credit(self.native_balance(to), amount)?;
        self.set_native(from, available - amount);
        self.set_native(to, credited);
        Ok(())
    }

    /// Wrap `amount` of `account`'s native value into `wrapped`.
    pub fn deposit_native(&mut self, wrapped: Address, account: Address, amount: U256) -> Result<()> {
        self.transfer_native(account, wrapped, amount)?;
        self.mint(wrapped, account, amount)
    }

    /// Unwrap `amount` of `account`'s `wrapped` balance back to native value.
    pub fn withdraw_native(&mut self, wrapped: Address, account: Address, amount: U256) -> Result<()> {
        self.burn(wrapped, account, amount)?;
        self.transfer_native(wrapped, account, amount)
    }

    // -----------------------------------------------------------------
    // Events & invariants
    // -----------------------------------------------------------------

    pub(crate) fn emit(&mut self, event: OrderFilled) {
        self.events.push(event);
    }

    /// Verify supply conservation for `asset` ([`NATIVE_ASSET`] for native
    /// value).
    pub fn verify_supply(&self, asset: Address) -> Result<()> {
        let actual = if asset == NATIVE_ASSET {
            self.native
                .values()
                .fold(U256::ZERO, |acc, v| acc.saturating_add(*v))
        } else {
            self.balances
                .iter()
                .filter(|((a, _), _)| *a == asset)
                .fold(U256::ZERO, |acc, (_, v)| acc.saturating_add(*v))
        };
        self.supply.verify(asset, actual)
    }

    /// Verify supply conservation for every asset ever issued.
    pub fn verify_all_supply(&self) -> Result<()> {
        for asset in self.supply.tracked_assets() {
            self.verify_supply(asset)?;
        }
        Ok(())
    }
}
