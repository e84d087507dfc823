use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::{
    address::Address,
    command::{Call, CommandError, Operation},
    ledger::{LedgerError, LedgerEvent},
    units::Amount,
};

pub mod in_memory_processor;
pub mod shared;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    CommandErr(#[from] CommandError),
    #[error(transparent)]
    LedgerErr(#[from] LedgerError),
}

/// Value returned by a successful call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Bool(bool),
    Amount(Amount),
    Text(String),
    Decimals(u8),
    Address(Address),
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Bool(value) => write!(f, "{value}"),
            Output::Amount(value) => write!(f, "{value}"),
            Output::Text(value) => write!(f, "{value}"),
            Output::Decimals(value) => write!(f, "{value}"),
            Output::Address(value) => write!(f, "{value}"),
        }
    }
}

/// Event as observed from outside the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub emitter: Address,
    pub name: &'static str,
    pub topics: Vec<Address>,
    pub data: Amount,
}

impl EventRecord {
    pub fn new(emitter: Address, event: &LedgerEvent) -> Self {
        Self {
            emitter,
            name: event.name(),
            topics: event.topics().to_vec(),
            data: event.value(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub output: Output,
    pub events: Vec<EventRecord>,
}

/// Outcome of a call. A reverted call carries the reason and no events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub reverted: bool,
    pub reason: Option<String>,
    pub output: Option<Output>,
    pub events: Vec<EventRecord>,
}

impl Receipt {
    pub fn from_result(result: Result<Execution, ProcessError>) -> Self {
        match result {
            Ok(Execution { output, events }) => Self {
                reverted: false,
                reason: None,
                output: Some(output),
                events,
            },
            Err(err) => {
                debug!(%err, "call reverted");
                Self {
                    reverted: true,
                    reason: Some(err.to_string()),
                    output: None,
                    events: Vec::new(),
                }
            }
        }
    }
}

pub trait LedgerProcessor {
    /// Applies a call. Either every effect of the call is applied or none is.
    fn execute(&mut self, call: Call) -> Result<Execution, ProcessError>;

    /// Answers a read-only operation without touching state.
    fn query(&self, operation: &Operation) -> Result<Output, ProcessError>;

    fn process(&mut self, call: Call) -> Receipt {
        Receipt::from_result(self.execute(call))
    }
}
