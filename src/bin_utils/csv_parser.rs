use std::io::Read;

use crate::{
    address::Address,
    command::{OperationKind, RawCall},
};
use csv::{DeserializeRecordsIntoIter, Trim};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CallRow {
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub caller: Option<Address>,
    pub arg1: Option<Address>,
    pub arg2: Option<Address>,
    pub amount: Option<String>,
}

impl CallRow {
    pub fn raw_call(&self) -> RawCall<'_> {
        RawCall {
            caller: self.caller,
            arg1: self.arg1,
            arg2: self.arg2,
            amount: self.amount.as_deref(),
        }
    }
}

/// Parses a call script in CSV format, yielding each row with its line number.
pub struct CsvCallParser<R> {
    iter: DeserializeRecordsIntoIter<R, CallRow>,
}

impl<R> CsvCallParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        Self {
            iter: reader.into_deserialize(),
        }
    }
}

impl<R> Iterator for CsvCallParser<R>
where
    R: Read,
{
    type Item = (u64, Result<CallRow, csv::Error>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rows() {
        let input = "\
type,caller,arg1,arg2,amount
transfer, 0x0000000000000000000000000000000000000001, 0x0000000000000000000000000000000000000002,,1.5
total_supply
balance_of,,0x0000000000000000000000000000000000000002
";
        let rows: Vec<_> = CsvCallParser::new(input.as_bytes()).collect();
        assert_eq!(rows.len(), 3);

        let (_, row) = &rows[0];
        let row = row.as_ref().unwrap();
        assert_eq!(row.kind, OperationKind::Transfer);
        assert_eq!(row.caller, Some(Address::from_low_u64(1)));
        assert_eq!(row.arg1, Some(Address::from_low_u64(2)));
        assert_eq!(row.arg2, None);
        assert_eq!(row.amount.as_deref(), Some("1.5"));

        let (_, row) = &rows[1];
        assert_eq!(row.as_ref().unwrap().kind, OperationKind::TotalSupply);

        let (_, row) = &rows[2];
        let row = row.as_ref().unwrap();
        assert_eq!(row.caller, None);
        assert_eq!(row.arg1, Some(Address::from_low_u64(2)));
    }

    #[test]
    fn malformed_row_is_reported() {
        let input = "type,caller,arg1,arg2,amount\nmint,0x01,,,1\n";
        let rows: Vec<_> = CsvCallParser::new(input.as_bytes()).collect();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].1.is_err());
    }
}
