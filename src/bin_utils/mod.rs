//! Replay driver: creates a ledger from a [`Genesis`] record, feeds it the calls
//! of a CSV script line by line and writes the final holder balances as CSV.
//! Rows that fail are handed to the caller's error printer and do not stop
//! the replay.

use std::io::{Read, Write};

use crate::{
    command::{Call, CommandError, Operation},
    genesis::Genesis,
    processor::{
        LedgerProcessor, ProcessError, in_memory_processor::InMemoryLedgerProcessor,
    },
    units::format_units,
};
use anyhow::{Context, Result};
use csv_parser::CsvCallParser;
use csv_printer::{BalanceRow, print_balances};
use tracing::info;
pub mod csv_parser;
pub mod csv_printer;

pub struct Service<'w, R, W: 'w> {
    pub genesis: Genesis,
    pub input: R,
    pub output: &'w mut W,
    pub error_printer: Box<dyn FnMut(u64, ProcessError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let decimals = self.genesis.decimals;
        let deployer = self.genesis.beneficiary;
        let mut processor = InMemoryLedgerProcessor::default();
        processor
            .execute(Call::new(deployer, Operation::Initialize(self.genesis)))
            .context("Failed to initialize ledger")?;

        for (line, row) in CsvCallParser::new(self.input) {
            let call = row
                .map_err(|err| CommandError::MalformedCall {
                    reason: err.to_string(),
                })
                .and_then(|row| Call::parse(row.kind, row.raw_call(), decimals));
            let call = match call {
                Ok(call) => call,
                Err(err) => {
                    (self.error_printer)(line, err.into());
                    continue;
                }
            };
            let is_query = call.operation.is_query();
            match processor.execute(call) {
                Ok(execution) if is_query => {
                    info!(line, output = %execution.output, "query answered");
                }
                Ok(_) => {}
                Err(err) => (self.error_printer)(line, err),
            }
        }

        let ledger = processor
            .ledger()
            .context("Ledger disappeared after initialization")?;
        print_balances(
            self.output,
            ledger.balances().map(|(account, balance)| BalanceRow {
                account,
                balance: format_units(balance, decimals),
            }),
        )
    }
}
