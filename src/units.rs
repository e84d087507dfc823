use std::str::FromStr;

use primitive_types::U256;
use rust_decimal::Decimal;
use thiserror::Error;

/// Token amount in base units.
pub type Amount = U256;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitsError {
    #[error("`{input}` is not a valid amount: {reason}")]
    Malformed { input: String, reason: String },
    #[error("`{input}` must not be negative")]
    Negative { input: String },
    #[error("`{input}` has more than {decimals} fractional digits")]
    TooPrecise { input: String, decimals: u8 },
    #[error("`{input}` does not fit into 256 bits")]
    Overflow { input: String },
}

fn pow10(exp: u32) -> Option<Amount> {
    (0..exp).try_fold(Amount::one(), |acc, _| acc.checked_mul(Amount::from(10u8)))
}

/// Converts a human readable token amount (`"1.5"`) into base units,
/// scaling it by `10^decimals`.
pub fn parse_units(input: &str, decimals: u8) -> Result<Amount, UnitsError> {
    let value = Decimal::from_str(input.trim()).map_err(|err| UnitsError::Malformed {
        input: input.to_string(),
        reason: err.to_string(),
    })?;
    if value.is_zero() {
        return Ok(Amount::zero());
    }
    if value.is_sign_negative() {
        return Err(UnitsError::Negative {
            input: input.to_string(),
        });
    }
    let value = value.normalize();
    let scale = value.scale();
    if scale > u32::from(decimals) {
        return Err(UnitsError::TooPrecise {
            input: input.to_string(),
            decimals,
        });
    }
    let overflow = || UnitsError::Overflow {
        input: input.to_string(),
    };
    let factor = pow10(u32::from(decimals) - scale).ok_or_else(overflow)?;
    Amount::from(value.mantissa().unsigned_abs())
        .checked_mul(factor)
        .ok_or_else(overflow)
}

/// Renders base units as a token amount with trailing fractional zeros removed.
pub fn format_units(amount: Amount, decimals: u8) -> String {
    let digits = amount.to_string();
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return digits;
    }
    let (int, frac) = if digits.len() > decimals {
        let (int, frac) = digits.split_at(digits.len() - decimals);
        (int.to_string(), frac.to_string())
    } else {
        ("0".to_string(), format!("{digits:0>decimals$}"))
    };
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        int
    } else {
        format!("{int}.{frac}")
    }
}

/// Serde adapter storing an [`Amount`] as a decimal string of base units,
/// so large supplies survive JSON untouched.
pub mod amount_serde {
    use serde::{Deserialize, Deserializer, Serializer, de};

    use super::Amount;

    pub fn serialize<S>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(amount)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Amount, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Amount::from_dec_str(raw.trim())
            .map_err(|err| de::Error::custom(format!("invalid amount `{raw}`: {err:?}")))
    }
}
