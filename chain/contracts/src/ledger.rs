//! Token Ledger: balances and allowances for a single fungible token
//!
//! - Entire supply minted once, at construction, to a non-null holder
//! - Total supply fixed for the ledger's lifetime
//! - Transfers and transfers-from are check-then-mutate: a failing call
//!   leaves balances, allowances and the event log untouched
//! - An allowance equal to [`INFINITE_ALLOWANCE`] is never decremented
//! - While a checkpoint is open, every overwritten record is journaled so the
//!   ledger can be reverted to that checkpoint

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use types::errors::MathError;
use types::ids::{is_null, Address, NULL_ADDRESS};
use types::numeric::{Amount, INFINITE_ALLOWANCE};

use crate::errors::ExchangeError;
use crate::events::{Approval, ContractEvent, Transfer};

/// Fixed token metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Position in a ledger's undo journal and event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerCheckpoint {
    journal: usize,
    events: usize,
    /// This checkpoint started the journal
    opened: bool,
}

/// Prior value of one overwritten record.
#[derive(Debug, Clone)]
enum Change {
    Balance(Address, Option<Amount>),
    Allowance((Address, Address), Option<Amount>),
}

/// Ledger for one fungible token.
///
/// Balance and allowance records are created lazily on first write and
/// never deleted; a zero balance is a valid record.
#[derive(Debug, Clone)]
pub struct TokenLedger {
    /// Identity of this ledger
    address: Address,
    metadata: TokenMetadata,
    total_supply: Amount,
    /// Balances: holder -> amount
    balances: HashMap<Address, Amount>,
    /// Allowances: (owner, spender) -> amount
    allowances: HashMap<(Address, Address), Amount>,
    /// Emitted events log (append-only)
    events: Vec<ContractEvent>,
    /// Undo journal; `None` when no checkpoint is open
    journal: Option<Vec<Change>>,
}

impl TokenLedger {
    /// Create a ledger and mint `initial_supply` to `supply_owner`.
    ///
    /// Fails with `ZeroAddressMint` if `supply_owner` is the null identity.
    pub fn new(
        address: Address,
        metadata: TokenMetadata,
        initial_supply: Amount,
        supply_owner: Address,
    ) -> Result<Self, ExchangeError> {
        if is_null(&supply_owner) {
            return Err(ExchangeError::ZeroAddressMint);
        }

        let mut balances = HashMap::new();
        balances.insert(supply_owner, initial_supply);

        let mint = ContractEvent::Transfer(Transfer {
            token: address,
            from: NULL_ADDRESS,
            to: supply_owner,
            value: initial_supply,
        });

        Ok(Self {
            address,
            metadata,
            total_supply: initial_supply,
            balances,
            allowances: HashMap::new(),
            events: vec![mint],
            journal: None,
        })
    }

    // ───────────────────────── Queries ─────────────────────────

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Balance of `account`; zero if never written.
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// Amount `spender` may move out of `owner`'s balance.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Iterate over every balance record.
    pub fn holders(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter()
    }

    // ───────────────────────── Transfers ─────────────────────────

    /// Move `amount` from `caller` to `to`.
    pub fn transfer(
        &mut self,
        caller: Address,
        to: Address,
        amount: Amount,
    ) -> Result<ContractEvent, ExchangeError> {
        self.move_balance(caller, to, amount)?;
        Ok(self.emit_transfer(caller, to, amount))
    }

    /// Set the allowance of `spender` over `caller`'s balance to exactly `amount`.
    pub fn approve(
        &mut self,
        caller: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<ContractEvent, ExchangeError> {
        if is_null(&caller) || is_null(&spender) {
            return Err(ExchangeError::ZeroAddressApprove {
                owner: caller,
                spender,
            });
        }

        self.set_allowance((caller, spender), amount);

        let event = ContractEvent::Approval(Approval {
            token: self.address,
            owner: caller,
            spender,
            value: amount,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    /// Move `amount` from `from` to `to` on behalf of `caller` (the spender).
    ///
    /// Allowance is checked before balance. A finite allowance is reduced by
    /// `amount`; the infinite sentinel is left as is.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<ContractEvent, ExchangeError> {
        let allowance = self.allowance(&from, &caller);
        let infinite = allowance == INFINITE_ALLOWANCE;
        if !infinite && allowance < amount {
            return Err(ExchangeError::InsufficientAllowance { requested: amount });
        }

        self.move_balance(from, to, amount)?;

        if !infinite {
            self.set_allowance((from, caller), allowance - amount);
        }

        Ok(self.emit_transfer(from, to, amount))
    }

    // ───────────────────────── Events ─────────────────────────

    /// Get all emitted events.
    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Checkpoints ─────────────────────────

    /// Mark the current state, opening the undo journal if needed.
    pub fn checkpoint(&mut self) -> LedgerCheckpoint {
        let opened = self.journal.is_none();
        let journal = self.journal.get_or_insert_with(Vec::new);
        LedgerCheckpoint {
            journal: journal.len(),
            events: self.events.len(),
            opened,
        }
    }

    /// Undo every change made since `checkpoint`.
    pub fn revert(&mut self, checkpoint: LedgerCheckpoint) {
        if let Some(journal) = self.journal.as_mut() {
            let undo = journal.split_off(checkpoint.journal.min(journal.len()));
            for change in undo.into_iter().rev() {
                match change {
                    Change::Balance(account, prior) => restore(&mut self.balances, account, prior),
                    Change::Allowance(key, prior) => restore(&mut self.allowances, key, prior),
                }
            }
        }
        self.events.truncate(checkpoint.events);
        if checkpoint.opened {
            self.journal = None;
        }
    }

    /// Keep every change and close the journal.
    pub fn commit(&mut self) {
        self.journal = None;
    }

    // ───────────────────────── Internal ─────────────────────────

    fn move_balance(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), ExchangeError> {
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
            journal.push(Change::Balance(account, prior));
        }
    }

    fn set_allowance(&mut self, key: (Address, Address), amount: Amount) {
        let prior = self.allowances.insert(key, amount);
        if let Some(journal) = self.journal.as_mut() {
            journal.push(Change::Allowance(key, prior));
        }
    }

    fn emit_transfer(&mut self, from: Address, to: Address, value: Amount) -> ContractEvent {
        let event = ContractEvent::Transfer(Transfer {
            token: self.address,
            from,
            to,
            value,
        });
        self.events.push(event.clone());
        event
    }
}

fn restore<K: std::hash::Hash + Eq, V>(map: &mut HashMap<K, V>, key: K, prior: Option<V>) {
    match prior {
        Some(value) => {
            map.insert(key, value);
        }
        None => {
            map.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Address {
        Address::repeat_byte(0xa1)
    }

    fn bob() -> Address {
        Address::repeat_byte(0xb0)
    }

    fn setup_ledger() -> TokenLedger {
        TokenLedger::new(
            Address::repeat_byte(0x70),
            TokenMetadata {
                name: "Test token".to_string(),
                symbol: "TST".to_string(),
                decimals: 18,
            },
            Amount::from(1_000u64),
            alice(),
        )
        .unwrap()
    }

    #[test]
    fn test_mint_to_supply_owner() {
        let ledger = setup_ledger();
        assert_eq!(ledger.balance_of(&alice()), Amount::from(1_000u64));
        assert_eq!(ledger.total_supply(), Amount::from(1_000u64));
        assert_eq!(ledger.symbol(), "TST");
        assert!(matches!(
            ledger.events()[0],
            ContractEvent::Transfer(Transfer { from, .. }) if from == NULL_ADDRESS
        ));
    }

    #[test]
    fn test_mint_to_zero_address_rejected() {
        let result = TokenLedger::new(
            Address::repeat_byte(0x70),
            setup_ledger().metadata().clone(),
            Amount::from(1u64),
            Address::ZERO,
        );
        assert!(matches!(result, Err(ExchangeError::ZeroAddressMint)));
    }

    #[test]
    fn test_transfer_to_self_keeps_balance() {
        let mut ledger = setup_ledger();
        ledger.transfer(alice(), alice(), Amount::from(10u64)).unwrap();
        assert_eq!(ledger.balance_of(&alice()), Amount::from(1_000u64));
    }

    #[test]
    fn test_zero_balance_record_persists() {
        let mut ledger = setup_ledger();
        ledger.transfer(alice(), bob(), Amount::from(1_000u64)).unwrap();
        assert_eq!(ledger.balance_of(&alice()), Amount::ZERO);
        assert_eq!(ledger.holders().count(), 2);
    }

    #[test]
    fn test_approve_overwrites() {
        let mut ledger = setup_ledger();
        ledger.approve(alice(), bob(), Amount::from(10u64)).unwrap();
        ledger.approve(alice(), bob(), Amount::from(3u64)).unwrap();
        assert_eq!(ledger.allowance(&alice(), &bob()), Amount::from(3u64));
    }

    #[test]
    fn test_transfer_from_decrements_finite_allowance() {
        let mut ledger = setup_ledger();
        ledger.approve(alice(), bob(), Amount::from(10u64)).unwrap();
        ledger
            .transfer_from(bob(), alice(), bob(), Amount::from(4u64))
            .unwrap();
        assert_eq!(ledger.allowance(&alice(), &bob()), Amount::from(6u64));
        assert_eq!(ledger.balance_of(&bob()), Amount::from(4u64));
    }

    #[test]
    fn test_transfer_from_allowance_checked_before_balance() {
        let mut ledger = setup_ledger();
        let result = ledger.transfer_from(bob(), alice(), bob(), Amount::from(5_000u64));
        assert_eq!(
            result,
            Err(ExchangeError::InsufficientAllowance {
                requested: Amount::from(5_000u64)
            })
        );
    }

    #[test]
    fn test_failed_transfer_emits_nothing() {
        let mut ledger = setup_ledger();
        let before = ledger.events().len();
        let result = ledger.transfer(bob(), alice(), Amount::from(1u64));
        assert_eq!(
            result,
            Err(ExchangeError::InsufficientFunds {
                requested: Amount::from(1u64)
            })
        );
        assert_eq!(ledger.events().len(), before);
    }

    #[test]
    fn test_drain_events() {
        let mut ledger = setup_ledger();
        ledger.transfer(alice(), bob(), Amount::from(1u64)).unwrap();
        let events = ledger.drain_events();
        assert_eq!(events.len(), 2);
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn test_revert_restores_balances_allowances_and_events() {
        let mut ledger = setup_ledger();
        ledger.approve(alice(), bob(), Amount::from(10u64)).unwrap();
        let events = ledger.events().len();

        let checkpoint = ledger.checkpoint();
        ledger
            .transfer_from(bob(), alice(), bob(), Amount::from(4u64))
            .unwrap();
        ledger.approve(bob(), alice(), Amount::from(1u64)).unwrap();
        ledger.revert(checkpoint);

        assert_eq!(ledger.balance_of(&alice()), Amount::from(1_000u64));
        assert_eq!(ledger.balance_of(&bob()), Amount::ZERO);
        assert_eq!(ledger.allowance(&alice(), &bob()), Amount::from(10u64));
        assert_eq!(ledger.allowance(&bob(), &alice()), Amount::ZERO);
        assert_eq!(ledger.holders().count(), 1);
        assert_eq!(ledger.events().len(), events);
    }

    #[test]
    fn test_nested_checkpoints_revert_independently() {
        let mut ledger = setup_ledger();
        let outer = ledger.checkpoint();
        ledger.transfer(alice(), bob(), Amount::from(1u64)).unwrap();

        let inner = ledger.checkpoint();
        ledger.transfer(alice(), bob(), Amount::from(2u64)).unwrap();
        ledger.revert(inner);
        assert_eq!(ledger.balance_of(&bob()), Amount::from(1u64));

        ledger.revert(outer);
        assert_eq!(ledger.balance_of(&bob()), Amount::ZERO);
    }

    #[test]
    fn test_commit_keeps_changes() {
        let mut ledger = setup_ledger();
        ledger.checkpoint();
        ledger.transfer(alice(), bob(), Amount::from(1u64)).unwrap();
        ledger.commit();

        // Nothing left to undo once committed.
        let checkpoint = ledger.checkpoint();
        ledger.revert(checkpoint);
        assert_eq!(ledger.balance_of(&bob()), Amount::from(1u64));
    }
}
