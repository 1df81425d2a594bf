//! Fill orchestrator and cancellation entry points.
//!
//! Every public call runs inside one ledger checkpoint: it either completes
//! or leaves no observable change. A fill proceeds in this order:
//! 1. Authenticate the maker and escrow attached native value
//! 2. Admit the caller and check expiry
//! 3. Consume the nonce (before any hook can run)
//! 4. Compute amounts, run the maker pre-interaction
//! 5. Leg 1: maker asset to the target
//! 6. Taker interaction, optionally improving the taking amount
//! 7. Leg 2: taker asset to the maker
//! 8. Maker post-interaction, then emit `OrderFilled`

use std::{collections::HashMap, fmt, sync::Arc};

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::Eip712Domain;
use rfqswap_ingress::{
    ContractSigner, OrderSignature, SignatureVerifier, authorize_caller, check_freshness,
};
use rfqswap_types::{
    FillInput, FillOutcome, Interaction, Order, OrderFilled, PermitPayload, Result,
    SettlementConfig, SwapError, order_hash,
};

use crate::amounts::{FillAmounts, compute_fill_amounts};
use crate::hooks::{
    MakerHookCall, MakerInteraction, NativeReceiver, TakerInteraction, TakerInteractionCall,
};
use crate::invalidator::{self, Invalidator};
use crate::ledger::Ledger;

/// Who is calling and how much native value they attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    pub value: U256,
}

impl CallContext {
    #[must_use]
    pub fn new(caller: Address) -> Self {
        Self {
            caller,
            value: U256::ZERO,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

/// The settlement engine: ledger state plus the hooks it calls out to.
pub struct SwapEngine {
    config: SettlementConfig,
    domain: Eip712Domain,
    verifier: SignatureVerifier,
    ledger: Ledger,
    /// Ledger time in unix seconds, used for expiry and permit deadlines.
    timestamp: u64,
    maker_hooks: HashMap<Address, Arc<dyn MakerInteraction>>,
    taker_hooks: HashMap<Address, Arc<dyn TakerInteraction>>,
    native_receivers: HashMap<Address, Arc<dyn NativeReceiver>>,
}

impl SwapEngine {
    /// Create an engine with an empty ledger and the clock at the current
    /// wall time.
    pub fn new(config: SettlementConfig) -> Result<Self> {
        config.validate()?;
        let domain = config.domain.domain();
        let timestamp = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default();
        tracing::info!(
            engine = %config.domain.verifying_contract,
            chain_id = config.domain.chain_id,
            wrapped_native = %config.wrapped_native,
            "Swap engine initialized"
        );
        Ok(Self {
            config,
            domain,
            verifier: SignatureVerifier::new(),
            ledger: Ledger::new(),
            timestamp,
            maker_hooks: HashMap::new(),
            taker_hooks: HashMap::new(),
            native_receivers: HashMap::new(),
        })
    }

    // -----------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------

    pub fn register_contract_signer(&mut self, account: Address, signer: Arc<dyn ContractSigner>) {
        self.verifier.register_contract_signer(account, signer);
    }

    pub fn register_maker_interaction(&mut self, maker: Address, hook: Arc<dyn MakerInteraction>) {
        self.maker_hooks.insert(maker, hook);
    }

    pub fn register_taker_interaction(&mut self, target: Address, hook: Arc<dyn TakerInteraction>) {
        self.taker_hooks.insert(target, hook);
    }

    pub fn register_native_receiver(&mut self, account: Address, receiver: Arc<dyn NativeReceiver>) {
        self.native_receivers.insert(account, receiver);
    }

    // -----------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------

    /// Account the engine holds assets and allowances under.
    #[must_use]
    pub fn address(&self) -> Address {
        self.config.domain.verifying_contract
    }

    #[must_use]
    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    #[must_use]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    /// Raw invalidator word of `maker` at `slot`.
    #[must_use]
    pub fn invalidator_view(&self, maker: Address, slot: U256) -> U256 {
        invalidator::view(&self.ledger, maker, slot)
    }

    #[must_use]
    pub fn is_nonce_used(&self, maker: Address, nonce: U256) -> bool {
        invalidator::is_nonce_used(&self.ledger, maker, nonce)
    }

    /// Digest makers sign for `order` under this engine's domain.
    #[must_use]
    pub fn order_hash(&self, order: &Order) -> B256 {
        order_hash(order, &self.domain)
    }

    #[must_use]
    pub fn domain_separator(&self) -> B256 {
        self.domain.separator()
    }

    #[must_use]
    pub fn events(&self) -> &[OrderFilled] {
        self.ledger.events()
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Direct ledger access for funding accounts and approvals.
    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    // -----------------------------------------------------------------
    // Cancellation
    // -----------------------------------------------------------------

    /// Invalidate a single nonce of the caller's quotes.
    pub fn cancel(&mut self, caller: Address, nonce: U256) -> Result<()> {
        self.atomically("cancel", |engine| {
            engine.invalidate_nonces(caller, nonce, U256::ZERO)
        })
    }

    /// Invalidate `nonce` together with every nonce of its slot selected by
    /// `additional_mask`.
    pub fn cancel_bulk(&mut self, caller: Address, nonce: U256, additional_mask: U256) -> Result<()> {
        self.atomically("cancel_bulk", |engine| {
            engine.invalidate_nonces(caller, nonce, additional_mask)
        })
    }

    fn invalidate_nonces(&mut self, maker: Address, nonce: U256, mask: U256) -> Result<()> {
        let word = Invalidator::new(&mut self.ledger)
            .invalidate(maker, nonce, mask)
            .map_err(|_| SwapError::InvalidatedOrder)?;
        tracing::info!(%maker, %nonce, %mask, %word, "Nonces invalidated");
        Ok(())
    }

    // -----------------------------------------------------------------
    // Fills
    // -----------------------------------------------------------------

    /// Fill `order` for the caller, paying the maker asset to the caller.
    pub fn fill(
        &mut self,
        ctx: CallContext,
        order: &Order,
        signature: &[u8],
        input: FillInput,
    ) -> Result<FillOutcome> {
        self.fill_to(ctx, order, signature, input, Address::ZERO, None)
    }

    /// Fill `order`, paying the maker asset to `target` (zero means the
    /// caller) and routing through `interaction` between the legs.
    pub fn fill_to(
        &mut self,
        ctx: CallContext,
        order: &Order,
        signature: &[u8],
        input: FillInput,
        target: Address,
        interaction: Option<&Interaction>,
    ) -> Result<FillOutcome> {
        self.atomically("fill", |engine| {
            engine.settle(
                ctx,
                order,
                OrderSignature::Ecdsa(signature),
                input,
                target,
                interaction,
            )
        })
    }

    /// Apply the caller's permit over the taker asset, then fill.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_with_permit(
        &mut self,
        ctx: CallContext,
        order: &Order,
        signature: &[u8],
        input: FillInput,
        target: Address,
        interaction: Option<&Interaction>,
        permit: &PermitPayload,
    ) -> Result<FillOutcome> {
        self.atomically("fill_with_permit", |engine| {
            engine.apply_permit(ctx.caller, order.taker_asset, permit)?;
            engine.settle(
                ctx,
                order,
                OrderSignature::Ecdsa(signature),
                input,
                target,
                interaction,
            )
        })
    }

    /// Fill a quote whose maker is a contract validating `signature` itself.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_contract_order(
        &mut self,
        ctx: CallContext,
        order: &Order,
        signature: &[u8],
        input: FillInput,
        target: Address,
        interaction: Option<&Interaction>,
        permit: Option<&PermitPayload>,
    ) -> Result<FillOutcome> {
        self.atomically("fill_contract_order", |engine| {
            if let Some(permit) = permit {
                engine.apply_permit(ctx.caller, order.taker_asset, permit)?;
            }
            engine.settle(
                ctx,
                order,
                OrderSignature::Contract(signature),
                input,
                target,
                interaction,
            )
        })
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    /// Run `call` inside a checkpoint; revert everything it wrote on error.
    fn atomically<T>(
        &mut self,
        operation: &'static str,
        call: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let checkpoint = self.ledger.checkpoint();
        match call(self) {
            Ok(value) => {
                self.ledger.checkpoint_commit();
                Ok(value)
            }
            Err(err) => {
                self.ledger.checkpoint_revert(checkpoint);
                tracing::warn!(operation, error = %err, "Call reverted");
                Err(err)
            }
        }
    }

    fn apply_permit(&mut self, owner: Address, asset: Address, permit: &PermitPayload) -> Result<()> {
        let spender = self.address();
        self.ledger.permit(
            asset,
            owner,
            spender,
            permit,
            self.timestamp,
            self.config.domain.chain_id,
        )
    }

    /// Pay native value out of the engine, honouring the receiver's verdict.
    fn send_native(&mut self, to: Address, amount: U256) -> Result<()> {
        let engine = self.address();
        self.ledger.transfer_native(engine, to, amount)?;
        if let Some(receiver) = self.native_receivers.get(&to) {
            if !receiver.receive(engine, amount, self.config.native_gas_stipend) {
                return Err(SwapError::ETHTransferFailed { to });
            }
        }
        Ok(())
    }

    fn maker_hook(&self, maker: Address) -> Result<Arc<dyn MakerInteraction>> {
        self.maker_hooks
            .get(&maker)
            .cloned()
            .ok_or_else(|| SwapError::InteractionFailed {
                target: maker,
                reason: "maker has no interaction callbacks".to_string(),
            })
    }

    fn settle(
        &mut self,
        ctx: CallContext,
        order: &Order,
        signature: OrderSignature<'_>,
        input: FillInput,
        target: Address,
        interaction: Option<&Interaction>,
    ) -> Result<FillOutcome> {
        let order_hash = self.order_hash(order);
        self.verifier.verify(order, order_hash, signature)?;

        let engine = self.address();
        if !ctx.value.is_zero() {
            self.ledger.transfer_native(ctx.caller, engine, ctx.value)?;
        }

        let target = if target.is_zero() { ctx.caller } else { target };
        authorize_caller(order, ctx.caller)?;
        check_freshness(order, self.timestamp)?;

        Invalidator::new(&mut self.ledger)
            .invalidate(order.maker, U256::from(order.nonce()), U256::ZERO)
            .map_err(|_| SwapError::InvalidatedOrder)?;

        let FillAmounts {
            making_amount,
            mut taking_amount,
        } = compute_fill_amounts(order, &input, self.config.strict_partial_fills)?;
        tracing::debug!(
            %order_hash,
            requested = %input.amount,
            is_making_amount = input.is_making_amount,
            %making_amount,
            %taking_amount,
            "Fill amounts computed"
        );

        if order.constraints.need_pre_interaction_call() {
            let hook = self.maker_hook(order.maker)?;
            tracing::debug!(%order_hash, maker = %order.maker, "Calling maker pre-interaction");
            hook.pre_interaction(
                self,
                &MakerHookCall {
                    order_hash,
                    order,
                    taker: ctx.caller,
                    target,
                    making_amount,
                    taking_amount,
                },
            )?;
        }

        // Leg 1: maker asset to the target.
        let wrapped_native = self.config.wrapped_native;
        if order.maker_asset == wrapped_native && input.need_unwrap_weth {
            self.ledger
                .transfer_from(order.maker_asset, engine, order.maker, engine, making_amount)?;
            self.ledger
                .withdraw_native(wrapped_native, engine, making_amount)?;
            self.send_native(target, making_amount)?;
        } else {
            self.ledger
                .transfer_from(order.maker_asset, engine, order.maker, target, making_amount)?;
        }

        if let Some(interaction) = interaction {
            let hook = self
                .taker_hooks
                .get(&interaction.target)
                .cloned()
                .ok_or_else(|| SwapError::InteractionFailed {
                    target: interaction.target,
                    reason: "no taker interaction at target".to_string(),
                })?;
            tracing::debug!(%order_hash, target = %interaction.target, "Calling taker interaction");
            let offered = hook.fill_interaction(
                self,
                &TakerInteractionCall {
                    taker: ctx.caller,
                    order_hash,
                    maker: order.maker,
                    maker_asset: order.maker_asset,
                    taker_asset: order.taker_asset,
                    making_amount,
                    taking_amount,
                    data: &interaction.data,
                },
            )?;
            if offered > taking_amount && order.constraints.allow_improve_rate_via_interaction() {
                tracing::debug!(%order_hash, quoted = %taking_amount, %offered, "Rate improved");
                taking_amount = offered;
            }
        }

        // Leg 2: taker asset to the maker.
        if order.taker_asset == wrapped_native && !ctx.value.is_zero() {
            if ctx.value < taking_amount {
                return Err(SwapError::InvalidMsgValue {
                    attached: ctx.value,
                    required: taking_amount,
                });
            }
            self.ledger
                .deposit_native(wrapped_native, engine, taking_amount)?;
            self.ledger
                .transfer(wrapped_native, engine, order.maker, taking_amount)?;
            let excess = ctx.value - taking_amount;
            if !excess.is_zero() {
                tracing::debug!(caller = %ctx.caller, %excess, "Refunding excess native value");
                self.send_native(ctx.caller, excess)?;
            }
        } else {
            if !ctx.value.is_zero() {
                return Err(SwapError::InvalidMsgValue {
                    attached: ctx.value,
                    required: U256::ZERO,
                });
            }
            self.ledger
                .transfer_from(order.taker_asset, engine, ctx.caller, order.maker, taking_amount)?;
        }

        if order.constraints.need_post_interaction_call() {
            let hook = self.maker_hook(order.maker)?;
            tracing::debug!(%order_hash, maker = %order.maker, "Calling maker post-interaction");
            hook.post_interaction(
                self,
                &MakerHookCall {
                    order_hash,
                    order,
                    taker: ctx.caller,
                    target,
                    making_amount,
                    taking_amount,
                },
            )?;
        }

        self.ledger.emit(OrderFilled {
            order_hash,
            making_amount,
        });
        tracing::info!(
            %order_hash,
            maker = %order.maker,
            taker = %ctx.caller,
            %target,
            %making_amount,
            %taking_amount,
            "Order filled"
        );

        Ok(FillOutcome {
            making_amount,
            taking_amount,
            order_hash,
        })
    }
}

impl fmt::Debug for SwapEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapEngine")
            .field("address", &self.address())
            .field("timestamp", &self.timestamp)
            .field("verifier", &self.verifier)
            .field("maker_hooks", &self.maker_hooks.keys().collect::<Vec<_>>())
            .field("taker_hooks", &self.taker_hooks.keys().collect::<Vec<_>>())
            .field(
                "native_receivers",
                &self.native_receivers.keys().collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
