//! Exchange Engine: fixed-rate swaps between base currency and tokens
//!
//! Owns every token ledger it creates, the rate/counter registry, and the
//! base-currency balances (including its own custody). Each token moves
//! through `Unregistered → Registered (no rates) → Active (rates set)`.
//!
//! Every mutating operation runs inside [`Exchange::atomically`]: either it
//! completes and its events are logged, or all state is restored to the
//! checkpoint taken before it started. Checkpoints are journals of the
//! records an operation overwrites, so their cost tracks the operation and
//! not the engine's history. Internal bookkeeping (token moves, counters) is
//! always finished before the outbound base-currency payment, so a failing
//! payment rolls back a fully-booked operation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use types::fee::FeeFraction;
use types::ids::{contract_address, is_null, Address};
use types::numeric::{checked_add, checked_mul, scaled_divide, Amount, DEFAULT_DIVISION_ACCURACY};

use crate::errors::ExchangeError;
use crate::events::{Buy, ContractEvent, NewToken, RatesUpdate, Sale};
use crate::factory::{TokenConfig, TokenFactory};
use crate::ledger::{LedgerCheckpoint, TokenLedger};
use crate::native::{NativeCheckpoint, NativeLedger, ValueReceiver};
use crate::security::Ownable;

/// Engine-wide parameters, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeConfig {
    /// Accuracy constant for scaled division
    pub division_accuracy: Amount,
    /// Owner's share of every buy payment
    pub owner_fee: FeeFraction,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            division_accuracy: DEFAULT_DIVISION_ACCURACY,
            owner_fee: FeeFraction::default(),
        }
    }
}

/// Rates and trade counters for one token.
///
/// Rates are base-currency units per token unit; zero means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenListing {
    pub buy_rate: Amount,
    pub sell_rate: Amount,
    pub buys: Amount,
    pub sales: Amount,
}

/// Token metadata snapshot for the reporting layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: Amount,
}

/// Mutable engine state.
#[derive(Debug)]
struct ExchangeState {
    /// Registered tokens in registration order
    supported: Vec<Address>,
    /// Rates and counters, keyed by token
    listings: HashMap<Address, TokenListing>,
    ledgers: HashMap<Address, TokenLedger>,
    factory: TokenFactory,
    native: NativeLedger,
    /// Emitted events log (append-only)
    events: Vec<ContractEvent>,
}

/// Undo information for one open [`Exchange::atomically`] call.
#[derive(Debug)]
struct Frame {
    supported: usize,
    events: usize,
    factory: TokenFactory,
    native: NativeCheckpoint,
    /// Listings as they were before this frame first wrote them
    listings: HashMap<Address, Option<TokenListing>>,
    /// Ledgers first touched in this frame; `None` if created in it
    ledgers: HashMap<Address, Option<LedgerCheckpoint>>,
}

/// The exchange engine.
#[derive(Debug)]
pub struct Exchange {
    address: Address,
    ownership: Ownable,
    config: ExchangeConfig,
    state: ExchangeState,
    /// Open atomic calls, innermost last
    frames: Vec<Frame>,
}

impl Exchange {
    /// Create an engine administered by `owner`.
    ///
    /// The engine's own address is derived from `owner` at nonce 0.
    pub fn new(owner: Address, config: ExchangeConfig) -> Result<Self, ExchangeError> {
        if is_null(&owner) {
            return Err(ExchangeError::InvalidConfig(
                "owner must not be the zero address".to_string(),
            ));
        }
        if config.division_accuracy.is_zero() {
            return Err(ExchangeError::InvalidConfig(
                "division accuracy must be non-zero".to_string(),
            ));
        }

        let address = contract_address(&owner, 0);
        info!(
            exchange = %address,
            owner = %owner,
            division_accuracy = %config.division_accuracy,
            owner_fee = %config.owner_fee.raw(),
            "exchange deployed"
        );

        Ok(Self {
            address,
            ownership: Ownable::new(owner),
            config,
            state: ExchangeState {
                supported: Vec::new(),
                listings: HashMap::new(),
                ledgers: HashMap::new(),
                factory: TokenFactory::new(address),
                native: NativeLedger::new(),
                events: Vec::new(),
            },
            frames: Vec::new(),
        })
    }

    /// Run `op` as one atomic operation.
    ///
    /// On error, every ledger, balance, counter and event log is restored to
    /// its state before `op` ran. Calls may nest; an inner failure only
    /// reverts the inner call. Receive hooks are not rolled back.
    pub fn atomically<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, ExchangeError>,
    ) -> Result<T, ExchangeError> {
        let frame = Frame {
            supported: self.state.supported.len(),
            events: self.state.events.len(),
            factory: self.state.factory.clone(),
            native: self.state.native.checkpoint(),
            listings: HashMap::new(),
            ledgers: HashMap::new(),
        };
        self.frames.push(frame);

        let result = op(self);

        if let Some(frame) = self.frames.pop() {
            match &result {
                Ok(_) => self.commit_frame(frame),
                Err(err) => {
                    warn!(error = %err, "operation reverted");
                    self.revert_frame(frame);
                }
            }
        }
        result
    }

    // ───────────────────────── Administration ─────────────────────────

    /// Create a new token, minting its supply into exchange custody. Owner-only.
    ///
    /// Every call creates a distinct token, even with an identical config.
    pub fn create_token(
        &mut self,
        caller: Address,
        config: TokenConfig,
    ) -> Result<Address, ExchangeError> {
        self.ownership.only_owner(&caller)?;

        self.atomically(|ex| {
            let ledger = ex.state.factory.create_token(config)?;
            let token = ledger.address();

            info!(
                token = %token,
                symbol = ledger.symbol(),
                supply = %ledger.total_supply(),
                "token created"
            );

            ex.state.supported.push(token);
            ex.touch_listing(token);
            if let Some(frame) = ex.frames.last_mut() {
                frame.ledgers.insert(token, None);
            }
            ex.state.ledgers.insert(token, ledger);
            ex.emit(ContractEvent::NewToken(NewToken { token }));
            Ok(token)
        })
    }

    /// Overwrite buy/sell rates for `token`. Owner-only.
    ///
    /// Rates are not validated; a zero buy rate makes buys fail on division.
    pub fn setup_rates(
        &mut self,
        caller: Address,
        token: Address,
        buy_rate: Amount,
        sell_rate: Amount,
    ) -> Result<ContractEvent, ExchangeError> {
        self.ownership.only_owner(&caller)?;

        let listing = self.touch_listing(token);
        listing.buy_rate = buy_rate;
        listing.sell_rate = sell_rate;

        info!(token = %token, buy_rate = %buy_rate, sell_rate = %sell_rate, "rates updated");
        Ok(self.emit(ContractEvent::RatesUpdate(RatesUpdate {
            token,
            buy_rate,
            sell_rate,
        })))
    }

    // ───────────────────────── Trading ─────────────────────────

    /// Buy `token` with `paid` base currency sent by `caller`.
    ///
    /// The whole payment enters custody; the owner fee is paid out of it and
    /// any part not matched by whole tokens is kept, not refunded.
    pub fn buy_tokens(
        &mut self,
        caller: Address,
        token: Address,
        paid: Amount,
    ) -> Result<ContractEvent, ExchangeError> {
        self.atomically(|ex| ex.execute_buy(caller, token, paid))
    }

    /// Sell `tokens_amount` of `token` back to the exchange.
    ///
    /// `caller` must have approved the exchange as spender beforehand. Fails
    /// with `InvalidAmount(0)` while the token's sell rate is zero.
    pub fn sell_tokens(
        &mut self,
        caller: Address,
        token: Address,
        tokens_amount: Amount,
    ) -> Result<ContractEvent, ExchangeError> {
        self.atomically(|ex| ex.execute_sale(caller, token, tokens_amount))
    }

    fn execute_buy(
        &mut self,
        caller: Address,
        token: Address,
        paid: Amount,
    ) -> Result<ContractEvent, ExchangeError> {
        let tokens_amount = self.tokens_amount_to_buy(&token, paid)?;
        self.state.native.attach(caller, self.address, paid)?;

        let available = self.max_exchange_token(&token);
        debug!(token = %token, paid = %paid, tokens_amount = %tokens_amount, available = %available, "buy quote");
        if tokens_amount > available {
            return Err(ExchangeError::InvalidAmount {
                amount: tokens_amount,
            });
        }

        let fee = self.config.owner_fee.apply(paid)?;

        let exchange = self.address;
        let ledger = self.ledger_mut(token)?;
        ledger.transfer(exchange, caller, tokens_amount)?;
        let listing = self.touch_listing(token);
        listing.buys = checked_add(listing.buys, Amount::from(1u64))?;

        self.state
            .native
            .send(exchange, self.ownership.owner(), fee)?;

        info!(buyer = %caller, token = %token, amount = %tokens_amount, fee = %fee, "tokens bought");
        Ok(self.emit(ContractEvent::Buy(Buy {
            buyer: caller,
            token,
            amount: tokens_amount,
        })))
    }

    fn execute_sale(
        &mut self,
        caller: Address,
        token: Address,
        tokens_amount: Amount,
    ) -> Result<ContractEvent, ExchangeError> {
        self.require_supported(&token)?;

        // No sell rate yet: selling is paused, not free.
        let sell_rate = self.sell_rate(&token);
        if sell_rate.is_zero() {
            return Err(ExchangeError::InvalidAmount {
                amount: Amount::ZERO,
            });
        }

        let eth_amount = checked_mul(tokens_amount, sell_rate)?;
        let available = self.max_exchange_eth();
        debug!(token = %token, tokens_amount = %tokens_amount, eth_amount = %eth_amount, available = %available, "sale quote");
        if eth_amount > available {
            return Err(ExchangeError::InvalidAmount { amount: eth_amount });
        }

        let exchange = self.address;
        let ledger = self.ledger_mut(token)?;
        ledger.transfer_from(exchange, caller, exchange, tokens_amount)?;
        let listing = self.touch_listing(token);
        listing.sales = checked_add(listing.sales, Amount::from(1u64))?;

        self.state.native.send(exchange, caller, eth_amount)?;

        info!(seller = %caller, token = %token, amount = %tokens_amount, paid_out = %eth_amount, "tokens sold");
        Ok(self.emit(ContractEvent::Sale(Sale {
            seller: caller,
            token,
            amount: tokens_amount,
        })))
    }

    // ───────────────────────── Queries ─────────────────────────

    /// Tokens a buy paying `paid` would receive, without trading.
    pub fn tokens_amount_to_buy(&self, token: &Address, paid: Amount) -> Result<Amount, ExchangeError> {
        self.require_supported(token)?;
        Ok(scaled_divide(
            paid,
            self.buy_rate(token),
            self.config.division_accuracy,
        )?)
    }

    pub fn buy_rate(&self, token: &Address) -> Amount {
        self.listing(token).map(|l| l.buy_rate).unwrap_or_default()
    }

    pub fn sell_rate(&self, token: &Address) -> Amount {
        self.listing(token).map(|l| l.sell_rate).unwrap_or_default()
    }

    /// Number of successful buys of `token`.
    pub fn buys_amount(&self, token: &Address) -> Amount {
        self.listing(token).map(|l| l.buys).unwrap_or_default()
    }

    /// Number of successful sales of `token`.
    pub fn sales_amount(&self, token: &Address) -> Amount {
        self.listing(token).map(|l| l.sales).unwrap_or_default()
    }

    /// Base currency in custody: the ceiling for a single sale payout.
    pub fn max_exchange_eth(&self) -> Amount {
        self.state.native.balance_of(&self.address)
    }

    /// Tokens in custody: the ceiling for a single buy.
    pub fn max_exchange_token(&self, token: &Address) -> Amount {
        self.token(token)
            .map(|ledger| ledger.balance_of(&self.address))
            .unwrap_or_default()
    }

    /// Registered tokens, in registration order.
    pub fn supported_tokens(&self) -> &[Address] {
        &self.state.supported
    }

    pub fn is_supported(&self, token: &Address) -> bool {
        self.state.ledgers.contains_key(token)
    }

    pub fn listing(&self, token: &Address) -> Option<&TokenListing> {
        self.state.listings.get(token)
    }

    pub fn token(&self, token: &Address) -> Option<&TokenLedger> {
        self.state.ledgers.get(token)
    }

    pub fn token_info(&self, token: &Address) -> Option<TokenInfo> {
        self.token(token).map(|ledger| TokenInfo {
            address: ledger.address(),
            name: ledger.name().to_string(),
            symbol: ledger.symbol().to_string(),
            decimals: ledger.decimals(),
            total_supply: ledger.total_supply(),
        })
    }

    /// Mutable access to a registered ledger for holder operations
    /// (`transfer`, `approve`, `transfer_from`).
    pub fn ledger_mut(&mut self, token: Address) -> Result<&mut TokenLedger, ExchangeError> {
        let ledger = self
            .state
            .ledgers
            .get_mut(&token)
            .ok_or(ExchangeError::InvalidToken { token })?;

        if let Some(frame) = self.frames.last_mut() {
            frame
                .ledgers
                .entry(token)
                .or_insert_with(|| Some(ledger.checkpoint()));
        }
        Ok(ledger)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.ownership.owner()
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    // ───────────────────────── Base currency ─────────────────────────

    pub fn native_balance(&self, account: &Address) -> Amount {
        self.state.native.balance_of(account)
    }

    /// Issue base currency to `account` (genesis allocation / faucet).
    pub fn fund_account(&mut self, account: Address, amount: Amount) -> Result<(), ExchangeError> {
        self.state.native.credit(account, amount)
    }

    /// Move value attached to a call from `from` into contract `to`.
    ///
    /// Unlike an outbound payment, the recipient's receive hook is not
    /// consulted.
    pub fn attach_value(&mut self, from: Address, to: Address, amount: Amount) -> Result<(), ExchangeError> {
        self.state.native.attach(from, to, amount)
    }

    /// Attach a receive hook that decides whether `account` accepts payments.
    pub fn register_receiver(&mut self, account: Address, receiver: Arc<dyn ValueReceiver>) {
        self.state.native.register_receiver(account, receiver);
    }

    // ───────────────────────── Events ─────────────────────────

    /// Get all events emitted by the exchange itself.
    pub fn events(&self) -> &[ContractEvent] {
        &self.state.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.state.events)
    }

    // ───────────────────────── Internal ─────────────────────────

    fn require_supported(&self, token: &Address) -> Result<(), ExchangeError> {
        if !self.is_supported(token) {
            return Err(ExchangeError::InvalidToken { token: *token });
        }
        Ok(())
    }

    /// Listing for `token`, recording its prior value in the open frame.
    fn touch_listing(&mut self, token: Address) -> &mut TokenListing {
        if let Some(frame) = self.frames.last_mut() {
            let listings = &self.state.listings;
            frame
                .listings
                .entry(token)
                .or_insert_with(|| listings.get(&token).cloned());
        }
        self.state.listings.entry(token).or_default()
    }

    /// Hand a finished frame's undo records to its parent, or release the
    /// journals once the outermost call completes.
    fn commit_frame(&mut self, frame: Frame) {
        match self.frames.last_mut() {
            Some(parent) => {
                for (token, prior) in frame.listings {
                    parent.listings.entry(token).or_insert(prior);
                }
                for (token, checkpoint) in frame.ledgers {
                    parent.ledgers.entry(token).or_insert(checkpoint);
                }
            }
            None => {
                for token in frame.ledgers.keys() {
                    if let Some(ledger) = self.state.ledgers.get_mut(token) {
                        ledger.commit();
                    }
                }
                self.state.native.commit();
            }
        }
    }

    fn revert_frame(&mut self, frame: Frame) {
        for (token, checkpoint) in frame.ledgers {
            match checkpoint {
                Some(checkpoint) => {
                    if let Some(ledger) = self.state.ledgers.get_mut(&token) {
                        ledger.revert(checkpoint);
                    }
                }
                None => {
                    self.state.ledgers.remove(&token);
                }
            }
        }
        for (token, prior) in frame.listings {
            match prior {
                Some(listing) => {
                    self.state.listings.insert(token, listing);
                }
                None => {
                    self.state.listings.remove(&token);
                }
            }
        }
        self.state.native.revert(frame.native);
        self.state.supported.truncate(frame.supported);
        self.state.events.truncate(frame.events);
        self.state.factory = frame.factory;
    }

    fn emit(&mut self, event: ContractEvent) -> ContractEvent {
        self.state.events.push(event.clone());
        event
    }
}
