//! Base-currency (native coin) balances
//!
//! Tracks how much base currency every account holds, including the
//! exchange's own custody. Outbound payments consult the recipient's
//! [`ValueReceiver`] hook, if one is registered; accounts without a hook
//! always accept.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use types::errors::MathError;
use types::ids::Address;
use types::numeric::Amount;

use crate::errors::ExchangeError;

/// Receive hook for accounts that run code when paid.
pub trait ValueReceiver: fmt::Debug + Send + Sync {
    /// Return `false` to refuse an incoming payment of `amount` from `from`.
    fn accepts(&self, from: &Address, amount: Amount) -> bool;
}

/// Position in the balance undo journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeCheckpoint {
    journal: usize,
    /// This checkpoint started the journal
    opened: bool,
}

/// Native coin balances for every account.
///
/// Receive hooks are configuration and are not journaled.
#[derive(Debug, Clone, Default)]
pub struct NativeLedger {
    balances: HashMap<Address, Amount>,
    receivers: HashMap<Address, Arc<dyn ValueReceiver>>,
    /// Prior balances, oldest first; `None` when no checkpoint is open
    journal: Option<Vec<(Address, Option<Amount>)>>,
}

impl NativeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `account`; zero if never written.
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// Credit newly issued base currency to `account` (genesis/faucet).
    pub fn credit(&mut self, account: Address, amount: Amount) -> Result<(), ExchangeError> {
        let current = self.balance_of(&account);
        let updated = current.checked_add(amount).ok_or(MathError::Overflow)?;
        self.set_balance(account, updated);
        Ok(())
    }

    /// Attach a receive hook to `account`.
    pub fn register_receiver(&mut self, account: Address, receiver: Arc<dyn ValueReceiver>) {
        self.receivers.insert(account, receiver);
    }

    /// Move value attached to a call from `from` to `to`.
    ///
    /// Fails with `InsufficientFunds` if `from` cannot cover `amount`. The
    /// recipient's hook is not consulted: the value is an argument of a
    /// call the recipient is executing, not an unsolicited payment.
    pub fn attach(&mut self, from: Address, to: Address, amount: Amount) -> Result<(), ExchangeError> {
        self.move_value(from, to, amount)
    }

    /// Pay `amount` from `from` to `to`.
    ///
    /// Fails with `TransferFailed` if `from` cannot cover the amount or the
    /// recipient's hook refuses it.
    pub fn send(&mut self, from: Address, to: Address, amount: Amount) -> Result<(), ExchangeError> {
        let refused = self
            .receivers
            .get(&to)
            .is_some_and(|receiver| !receiver.accepts(&from, amount));

        if refused || self.balance_of(&from) < amount {
            return Err(ExchangeError::TransferFailed {
                recipient: to,
                amount,
            });
        }

        self.move_value(from, to, amount)
    }

    /// Mark the current balances, opening the journal if needed.
    pub fn checkpoint(&mut self) -> NativeCheckpoint {
        let opened = self.journal.is_none();
        NativeCheckpoint {
            journal: self.journal.get_or_insert_with(Vec::new).len(),
            opened,
        }
    }

    /// Undo every balance change made since `checkpoint`.
    pub fn revert(&mut self, checkpoint: NativeCheckpoint) {
        if let Some(journal) = self.journal.as_mut() {
            let undo = journal.split_off(checkpoint.journal.min(journal.len()));
            for (account, prior) in undo.into_iter().rev() {
                match prior {
                    Some(balance) => {
                        self.balances.insert(account, balance);
                    }
                    None => {
                        self.balances.remove(&account);
                    }
                }
            }
        }
        if checkpoint.opened {
            self.journal = None;
        }
    }

    /// Keep every change and close the journal.
    pub fn commit(&mut self) {
        self.journal = None;
    }

    /// Sum of all balances.
    pub fn total(&self) -> Result<Amount, ExchangeError> {
        self.balances
            .values()
            .try_fold(Amount::ZERO, |acc, b| acc.checked_add(*b))
            .ok_or_else(|| MathError::Overflow.into())
    }

    fn move_value(&mut self, from: Address, to: Address, amount: Amount) -> Result<(), ExchangeError> {
        let from_balance = self.balance_of(&from);
        if from_balance < amount {
            return Err(ExchangeError::InsufficientFunds { requested: amount });
        }
        if from == to {
            return Ok(());
        }

        let to_balance = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(MathError::Overflow)?;

        self.set_balance(from, from_balance - amount);
        self.set_balance(to, to_balance);
        Ok(())
    }

    fn set_balance(&mut self, account: Address, amount: Amount) {
        let prior = self.balances.insert(account, amount);
        if let Some(journal) = self.journal.as_mut() {
            journal.push((account, prior));
        }
    }
}
