use tracing::debug;

use crate::{
    command::{Call, CommandError, Operation},
    genesis::Genesis,
    ledger::{Ledger, LedgerEvent},
};

use super::{EventRecord, Execution, LedgerProcessor, Output, ProcessError};

/// Holds at most one ledger, created by an `Initialize` call.
#[derive(Debug, Default)]
pub struct InMemoryLedgerProcessor {
    ledger: Option<Ledger>,
}

impl InMemoryLedgerProcessor {
    pub fn ledger(&self) -> Option<&Ledger> {
        self.ledger.as_ref()
    }

    fn ledger_ref(&self, operation: &'static str) -> Result<&Ledger, CommandError> {
        self.ledger
            .as_ref()
            .ok_or(CommandError::NotInitialized { operation })
    }

    fn ledger_mut(&mut self, operation: &'static str) -> Result<&mut Ledger, CommandError> {
        self.ledger
            .as_mut()
            .ok_or(CommandError::NotInitialized { operation })
    }

    fn initialize(&mut self, genesis: Genesis) -> Result<Execution, ProcessError> {
        if self.ledger.is_some() {
            return Err(CommandError::AlreadyInitialized.into());
        }
        let ledger = Ledger::initialize(genesis)?;
        let execution = Execution {
            output: Output::Address(ledger.address()),
            events: Self::records(&ledger, ledger.events()),
        };
        self.ledger = Some(ledger);
        Ok(execution)
    }

    fn records(ledger: &Ledger, events: &[LedgerEvent]) -> Vec<EventRecord> {
        events
            .iter()
            .map(|event| EventRecord::new(ledger.address(), event))
            .collect()
    }
}

impl LedgerProcessor for InMemoryLedgerProcessor {
    fn execute(&mut self, call: Call) -> Result<Execution, ProcessError> {
        let Call { caller, operation } = call;
        let name = operation.name();
        debug!(%caller, operation = name, "executing call");

        let events = match operation {
            Operation::Initialize(genesis) => return self.initialize(genesis),
            Operation::Transfer { to, amount } => {
                self.ledger_mut(name)?.transfer(caller, to, amount)?
            }
            Operation::Approve { spender, amount } => {
                self.ledger_mut(name)?.approve(caller, spender, amount)?
            }
            Operation::TransferFrom { from, to, amount } => self
                .ledger_mut(name)?
                .transfer_from(caller, from, to, amount)?,
            Operation::IncreaseAllowance { spender, delta } => self
                .ledger_mut(name)?
                .increase_allowance(caller, spender, delta)?,
            Operation::DecreaseAllowance { spender, delta } => self
                .ledger_mut(name)?
                .decrease_allowance(caller, spender, delta)?,
            query => {
                return Ok(Execution {
                    output: self.query(&query)?,
                    events: Vec::new(),
                });
            }
        };
        let ledger = self.ledger_ref(name)?;
        Ok(Execution {
            output: Output::Bool(true),
            events: Self::records(ledger, &events),
        })
    }

    fn query(&self, operation: &Operation) -> Result<Output, ProcessError> {
        let ledger = self.ledger_ref(operation.name())?;
        let output = match *operation {
            Operation::BalanceOf { account } => Output::Amount(ledger.balance_of(account)),
            Operation::TotalSupply => Output::Amount(ledger.total_supply()),
            Operation::Allowance { owner, spender } => {
                Output::Amount(ledger.allowance(owner, spender))
            }
            Operation::Name => Output::Text(ledger.name().to_string()),
            Operation::Symbol => Output::Text(ledger.symbol().to_string()),
            Operation::Decimals => Output::Decimals(ledger.decimals()),
            _ => {
                return Err(CommandError::MalformedCall {
                    reason: format!("{} is not a query", operation.name()),
                }
                .into());
            }
        };
        Ok(output)
    }
}
