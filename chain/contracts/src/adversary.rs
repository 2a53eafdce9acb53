//! Adversarial counterparty (test double)
//!
//! A contract that holds tokens happily but refuses every base-currency
//! payment sent to it. Used to exercise the exchange's rollback path when a
//! sale payout cannot be delivered.

use std::sync::Arc;

use types::ids::{contract_address, Address};
use types::numeric::Amount;

use crate::errors::ExchangeError;
use crate::events::ContractEvent;
use crate::exchange::Exchange;
use crate::native::ValueReceiver;

/// Buys tokens and immediately tries to sell them back, while refusing the
/// sale proceeds.
#[derive(Debug, Clone)]
pub struct RejectingSeller {
    address: Address,
    token: Address,
}

impl RejectingSeller {
    /// Deploy from `deployer` at `nonce`, trading `token` on `exchange`.
    pub fn deploy(exchange: &mut Exchange, deployer: Address, nonce: u64, token: Address) -> Self {
        let seller = Self {
            address: contract_address(&deployer, nonce),
            token,
        };
        exchange.register_receiver(seller.address, Arc::new(seller.clone()));
        seller
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// In one atomic call: take `paid` from `caller`, buy tokens with it,
    /// approve the exchange and sell the whole token balance back.
    ///
    /// With a non-zero sell rate the sale payout is refused, so this returns
    /// `TransferFailed` and leaves no trace on the exchange.
    pub fn buy_and_sell_tokens(
        &self,
        exchange: &mut Exchange,
        caller: Address,
        paid: Amount,
    ) -> Result<ContractEvent, ExchangeError> {
        let me = self.address;
        let token = self.token;

        exchange.atomically(|ex| {
            ex.attach_value(caller, me, paid)?;
            ex.buy_tokens(me, token, paid)?;

            let spender = ex.address();
            let ledger = ex.ledger_mut(token)?;
            let balance = ledger.balance_of(&me);
            ledger.approve(me, spender, balance)?;

            ex.sell_tokens(me, token, balance)
        })
    }
}

impl ValueReceiver for RejectingSeller {
    fn accepts(&self, _from: &Address, _amount: Amount) -> bool {
        false
    }
}
