use std::{fs::File, io::Read, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    address::Address,
    units::{Amount, amount_serde},
};

pub const DEFAULT_DECIMALS: u8 = 18;

fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

#[derive(Debug, Error)]
pub enum GenesisError {
    #[error("Failed to read genesis: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse genesis: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything a ledger is created from. Immutable once the ledger exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
    /// Ledger identity, reported as the emitter of every event.
    pub contract: Address,
    pub name: String,
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    #[serde(with = "amount_serde")]
    pub initial_supply: Amount,
    pub beneficiary: Address,
}

impl Genesis {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, GenesisError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GenesisError> {
        Self::from_reader(File::open(path)?)
    }
}
