use std::collections::BTreeMap;

use thiserror::Error;
use tracing::info;

use crate::{address::Address, genesis::Genesis, units::Amount};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    Transfer {
        from: Address,
        to: Address,
        value: Amount,
    },
    Approval {
        owner: Address,
        spender: Address,
        value: Amount,
    },
}

impl LedgerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::Transfer { .. } => "Transfer",
            LedgerEvent::Approval { .. } => "Approval",
        }
    }

    /// Indexed accounts, in declaration order.
    pub fn topics(&self) -> [Address; 2] {
        match *self {
            LedgerEvent::Transfer { from, to, .. } => [from, to],
            LedgerEvent::Approval { owner, spender, .. } => [owner, spender],
        }
    }

    pub fn value(&self) -> Amount {
        match *self {
            LedgerEvent::Transfer { value, .. } | LedgerEvent::Approval { value, .. } => value,
        }
    }
}

/// Which endpoint of an operation was the zero address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroAddressRole {
    Sender,
    Recipient,
    Owner,
    Spender,
}

impl ZeroAddressRole {
    pub fn reason(self) -> &'static str {
        match self {
            ZeroAddressRole::Sender => "transfer from the zero address",
            ZeroAddressRole::Recipient => "transfer to the zero address",
            ZeroAddressRole::Owner => "approve from the zero address",
            ZeroAddressRole::Spender => "approve to the zero address",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowanceShortfall {
    /// `transferFrom` asked for more than was approved.
    Spend,
    /// `decreaseAllowance` would go below zero.
    Decrease,
}

impl AllowanceShortfall {
    pub fn reason(self) -> &'static str {
        match self {
            AllowanceShortfall::Spend => "transfer amount exceeds allowance",
            AllowanceShortfall::Decrease => "decreased allowance below zero",
        }
    }
}

/// Reasons an operation is rejected. The display strings are part of the
/// observable contract and are matched verbatim by callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("{}", role.reason())]
    ZeroAddress { role: ZeroAddressRole },
    #[error("transfer amount exceeds balance")]
    InsufficientBalance { required: Amount, available: Amount },
    #[error("{}", shortfall.reason())]
    InsufficientAllowance {
        shortfall: AllowanceShortfall,
        required: Amount,
        available: Amount,
    },
    #[error("{reason}")]
    InvalidArgument { reason: &'static str },
    #[error("balance overflow")]
    BalanceOverflow,
    #[error("increased allowance overflows")]
    AllowanceOverflow,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Sum of balances {sum} does not match total supply {total_supply}")]
    SupplyMismatch { sum: Amount, total_supply: Amount },
    #[error("Sum of balances overflows")]
    BalanceSumOverflow,
    #[error("Zero address holds a balance of {0}")]
    ZeroAddressBalance(Amount),
}

fn zero_address(role: ZeroAddressRole) -> LedgerError {
    LedgerError::ZeroAddress { role }
}

/// Fungible token ledger.
///
/// Every mutation goes through two steps: a `handle_*` method validates the
/// request against the current state and produces events without touching
/// anything, then `commit` applies those events and appends them to
/// the log. A rejected request therefore leaves the ledger untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    address: Address,
    name: String,
    symbol: String,
    decimals: u8,
    total_supply: Amount,
    balances: BTreeMap<Address, Amount>,
    allowances: BTreeMap<(Address, Address), Amount>,
    events: Vec<LedgerEvent>,
}

impl Ledger {
    /// Creates the ledger and mints the whole initial supply to the beneficiary.
    pub fn initialize(genesis: Genesis) -> Result<Self, LedgerError> {
        let Genesis {
            contract,
            name,
            symbol,
            decimals,
            initial_supply,
            beneficiary,
        } = genesis;
        if beneficiary.is_zero() {
            return Err(LedgerError::InvalidArgument {
                reason: "mint to the zero address",
            });
        }
        info!(%contract, %name, %symbol, %initial_supply, %beneficiary, "initializing ledger");
        let mut ledger = Self {
            address: contract,
            name,
            symbol,
            decimals,
            total_supply: Amount::zero(),
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            events: Vec::new(),
        };
        ledger.commit(vec![LedgerEvent::Transfer {
            from: Address::ZERO,
            to: beneficiary,
            value: initial_supply,
        }]);
        Ok(ledger)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    pub fn balance_of(&self, account: Address) -> Amount {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> Amount {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Accounts with a nonzero balance, ordered by address.
    pub fn balances(&self) -> impl Iterator<Item = (Address, Amount)> + '_ {
        self.balances.iter().map(|(account, amount)| (*account, *amount))
    }

    /// Every event emitted since initialization, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn transfer(
        &mut self,
        caller: Address,
        to: Address,
        amount: Amount,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        let events = self.handle_transfer(caller, to, amount)?;
        Ok(self.commit(events))
    }

    pub fn approve(
        &mut self,
        caller: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        let events = self.handle_approve(caller, spender, amount)?;
        Ok(self.commit(events))
    }

    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        let events = self.handle_transfer_from(caller, from, to, amount)?;
        Ok(self.commit(events))
    }

    pub fn increase_allowance(
        &mut self,
        caller: Address,
        spender: Address,
        delta: Amount,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        let events = self.handle_increase_allowance(caller, spender, delta)?;
        Ok(self.commit(events))
    }

    pub fn decrease_allowance(
        &mut self,
        caller: Address,
        spender: Address,
        delta: Amount,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        let events = self.handle_decrease_allowance(caller, spender, delta)?;
        Ok(self.commit(events))
    }

    pub fn handle_transfer(
        &self,
        caller: Address,
        to: Address,
        amount: Amount,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.check_endpoints(caller, to)?;
        self.check_movement(caller, to, amount)?;
        Ok(vec![LedgerEvent::Transfer {
            from: caller,
            to,
            value: amount,
        }])
    }

    pub fn handle_approve(
        &self,
        caller: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        Ok(vec![Self::approval(caller, spender, amount)?])
    }

    pub fn handle_transfer_from(
        &self,
        caller: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.check_endpoints(from, to)?;
        let available = self.allowance(from, caller);
        if available < amount {
            return Err(LedgerError::InsufficientAllowance {
                shortfall: AllowanceShortfall::Spend,
                required: amount,
                available,
            });
        }
        self.check_movement(from, to, amount)?;
        // Transfer must precede Approval.
        Ok(vec![
            LedgerEvent::Transfer {
                from,
                to,
                value: amount,
            },
            Self::approval(from, caller, available - amount)?,
        ])
    }

    pub fn handle_increase_allowance(
        &self,
        caller: Address,
        spender: Address,
        delta: Amount,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        let allowance = self
            .allowance(caller, spender)
            .checked_add(delta)
            .ok_or(LedgerError::AllowanceOverflow)?;
        Ok(vec![Self::approval(caller, spender, allowance)?])
    }

    pub fn handle_decrease_allowance(
        &self,
        caller: Address,
        spender: Address,
        delta: Amount,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        let available = self.allowance(caller, spender);
        let allowance =
            available
                .checked_sub(delta)
                .ok_or(LedgerError::InsufficientAllowance {
                    shortfall: AllowanceShortfall::Decrease,
                    required: delta,
                    available,
                })?;
        Ok(vec![Self::approval(caller, spender, allowance)?])
    }

    fn approval(
        owner: Address,
        spender: Address,
        value: Amount,
    ) -> Result<LedgerEvent, LedgerError> {
        if owner.is_zero() {
            return Err(zero_address(ZeroAddressRole::Owner));
        }
        if spender.is_zero() {
            return Err(zero_address(ZeroAddressRole::Spender));
        }
        Ok(LedgerEvent::Approval {
            owner,
            spender,
            value,
        })
    }

    fn check_endpoints(&self, from: Address, to: Address) -> Result<(), LedgerError> {
        if from.is_zero() {
            return Err(zero_address(ZeroAddressRole::Sender));
        }
        if to.is_zero() {
            return Err(zero_address(ZeroAddressRole::Recipient));
        }
        Ok(())
    }

    fn check_movement(&self, from: Address, to: Address, amount: Amount) -> Result<(), LedgerError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                required: amount,
                available,
            });
        }
        if from != to {
            self.balance_of(to)
                .checked_add(amount)
                .ok_or(LedgerError::BalanceOverflow)?;
        }
        Ok(())
    }

    /// Applies validated events in order and appends them to the log.
    fn commit(&mut self, events: Vec<LedgerEvent>) -> Vec<LedgerEvent> {
        for event in &events {
            self.apply(event);
        }
        self.events.extend(events.iter().cloned());
        events
    }

    /// Applies a single event. Events are the source of truth, so no validation
    /// happens here: the zero address on either side of a transfer mints or
    /// burns supply.
    fn apply(&mut self, event: &LedgerEvent) {
        match *event {
            LedgerEvent::Transfer { from, to, value } => {
                if from.is_zero() {
                    self.total_supply += value;
                } else {
                    let balance = self.balance_of(from) - value;
                    store(&mut self.balances, from, balance);
                }
                if to.is_zero() {
                    self.total_supply -= value;
                } else {
                    let balance = self.balance_of(to) + value;
                    store(&mut self.balances, to, balance);
                }
            }
            LedgerEvent::Approval {
                owner,
                spender,
                value,
            } => store(&mut self.allowances, (owner, spender), value),
        }
    }

    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let zero_balance = self.balance_of(Address::ZERO);
        if !zero_balance.is_zero() {
            return Err(InvariantViolation::ZeroAddressBalance(zero_balance));
        }
        let sum = self
            .balances
            .values()
            .try_fold(Amount::zero(), |acc, balance| acc.checked_add(*balance))
            .ok_or(InvariantViolation::BalanceSumOverflow)?;
        if sum != self.total_supply {
            return Err(InvariantViolation::SupplyMismatch {
                sum,
                total_supply: self.total_supply,
            });
        }
        Ok(())
    }
}

// zero values are pruned so that "absent" and "zero" are one state
fn store<K: Ord>(map: &mut BTreeMap<K, Amount>, key: K, value: Amount) {
    if value.is_zero() {
        map.remove(&key);
    } else {
        map.insert(key, value);
    }
}
