use serde::Deserialize;
use thiserror::Error;

use crate::{
    address::Address,
    genesis::Genesis,
    units::{Amount, UnitsError, parse_units},
};

/// Operation names accepted from external call scripts.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Transfer,
    Approve,
    TransferFrom,
    IncreaseAllowance,
    DecreaseAllowance,
    BalanceOf,
    TotalSupply,
    Allowance,
    Name,
    Symbol,
    Decimals,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Initialize(Genesis),
    Transfer {
        to: Address,
        amount: Amount,
    },
    Approve {
        spender: Address,
        amount: Amount,
    },
    TransferFrom {
        from: Address,
        to: Address,
        amount: Amount,
    },
    IncreaseAllowance {
        spender: Address,
        delta: Amount,
    },
    DecreaseAllowance {
        spender: Address,
        delta: Amount,
    },
    BalanceOf {
        account: Address,
    },
    TotalSupply,
    Allowance {
        owner: Address,
        spender: Address,
    },
    Name,
    Symbol,
    Decimals,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Initialize(_) => "initialize",
            Operation::Transfer { .. } => "transfer",
            Operation::Approve { .. } => "approve",
            Operation::TransferFrom { .. } => "transferFrom",
            Operation::IncreaseAllowance { .. } => "increaseAllowance",
            Operation::DecreaseAllowance { .. } => "decreaseAllowance",
            Operation::BalanceOf { .. } => "balanceOf",
            Operation::TotalSupply => "totalSupply",
            Operation::Allowance { .. } => "allowance",
            Operation::Name => "name",
            Operation::Symbol => "symbol",
            Operation::Decimals => "decimals",
        }
    }

    /// Read-only operations never change state or emit events.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Operation::BalanceOf { .. }
                | Operation::TotalSupply
                | Operation::Allowance { .. }
                | Operation::Name
                | Operation::Symbol
                | Operation::Decimals
        )
    }
}

/// An operation together with the identity invoking it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub caller: Address,
    pub operation: Operation,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Caller is required for {kind:?}")]
    CallerRequired { kind: OperationKind },
    #[error("Argument `{name}` is required for {kind:?}")]
    ArgumentRequired {
        kind: OperationKind,
        name: &'static str,
    },
    #[error("Amount is required for {kind:?}")]
    AmountRequired { kind: OperationKind },
    #[error(transparent)]
    InvalidAmount(#[from] UnitsError),
    #[error("Malformed call: {reason}")]
    MalformedCall { reason: String },
    #[error("ledger is already initialized")]
    AlreadyInitialized,
    #[error("ledger is not initialized, cannot execute {operation}")]
    NotInitialized { operation: &'static str },
}

/// Positional arguments of a call as they arrive from outside, before
/// they are bound to an [`Operation`].
#[derive(Debug, Clone, Default)]
pub struct RawCall<'a> {
    pub caller: Option<Address>,
    pub arg1: Option<Address>,
    pub arg2: Option<Address>,
    pub amount: Option<&'a str>,
}

impl Call {
    pub fn new(caller: Address, operation: Operation) -> Self {
        Self { caller, operation }
    }

    /// Read-only calls do not depend on the caller.
    pub fn query(operation: Operation) -> Self {
        Self::new(Address::ZERO, operation)
    }

    /// Binds positional arguments to `kind`. Amounts are given in whole tokens
    /// and scaled by `decimals`.
    pub fn parse(
        kind: OperationKind,
        raw: RawCall<'_>,
        decimals: u8,
    ) -> Result<Self, CommandError> {
        let arg = |value: Option<Address>, name| {
            value.ok_or(CommandError::ArgumentRequired { kind, name })
        };
        let amount = || -> Result<Amount, CommandError> {
            let text = raw.amount.ok_or(CommandError::AmountRequired { kind })?;
            Ok(parse_units(text, decimals)?)
        };
        let operation = match kind {
            OperationKind::Transfer => Operation::Transfer {
                to: arg(raw.arg1, "to")?,
                amount: amount()?,
            },
            OperationKind::Approve => Operation::Approve {
                spender: arg(raw.arg1, "spender")?,
                amount: amount()?,
            },
            OperationKind::TransferFrom => Operation::TransferFrom {
                from: arg(raw.arg1, "from")?,
                to: arg(raw.arg2, "to")?,
                amount: amount()?,
            },
            OperationKind::IncreaseAllowance => Operation::IncreaseAllowance {
                spender: arg(raw.arg1, "spender")?,
                delta: amount()?,
            },
            OperationKind::DecreaseAllowance => Operation::DecreaseAllowance {
                spender: arg(raw.arg1, "spender")?,
                delta: amount()?,
            },
            OperationKind::BalanceOf => Operation::BalanceOf {
                account: arg(raw.arg1, "account")?,
            },
            OperationKind::TotalSupply => Operation::TotalSupply,
            OperationKind::Allowance => Operation::Allowance {
                owner: arg(raw.arg1, "owner")?,
                spender: arg(raw.arg2, "spender")?,
            },
            OperationKind::Name => Operation::Name,
            OperationKind::Symbol => Operation::Symbol,
            OperationKind::Decimals => Operation::Decimals,
        };
        if operation.is_query() {
            return Ok(Self::new(raw.caller.unwrap_or_default(), operation));
        }
        let caller = raw.caller.ok_or(CommandError::CallerRequired { kind })?;
        Ok(Self::new(caller, operation))
    }
}
