/// 20-byte account identifiers and the reserved zero address.
pub mod address;

/// Token amounts: 256-bit base units, conversion from and to human readable
/// token units, and a decimal-string serde adapter.
pub mod units;

/// Initialization record a ledger is created from.
pub mod genesis;

/// Balance and allowance state of a single token.
/// State is modified using events, which are created by handling requests,
/// so a rejected request never leaves a partial update behind.
pub mod ledger;

/// Closed set of operations a ledger understands, plus parsing from
/// positional arguments.
pub mod command;

/// Call interface: executes [`command::Call`]s against a ledger and turns the
/// outcome into a [`processor::Receipt`].
///
/// NOTE: the trait exists so the in memory implementation can be wrapped,
/// e.g. by the thread-safe [`processor::shared::SharedLedgerProcessor`].
pub mod processor;

/// Replays a CSV call script against a fresh ledger. Used by the binary and
/// the integration tests.
pub mod bin_utils;
