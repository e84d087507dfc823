use std::{
    cell::RefCell,
    rc::Rc,
    str::from_utf8,
};

use token_ledger::{
    address::Address,
    bin_utils::Service,
    genesis::Genesis,
    processor::ProcessError,
    units::Amount,
};

const TEST_FILE: &str = include_str!("calls.csv");

fn genesis() -> Genesis {
    Genesis {
        contract: Address::from_low_u64(0xc0de),
        name: "MyToken".to_string(),
        symbol: "MT".to_string(),
        decimals: 18,
        initial_supply: Amount::from(1_000_000_000u64) * Amount::exp10(18),
        beneficiary: Address::from_low_u64(1),
    }
}

#[test]
fn replay_calls() {
    let mut output = Vec::new();
    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&errors);
    let service = Service {
        genesis: genesis(),
        input: TEST_FILE.as_bytes(),
        output: &mut output,
        error_printer: Box::new(move |line, err: ProcessError| {
            sink.borrow_mut().push((line, err.to_string()))
        }),
    };
    service.run().unwrap();

    // balances are ordered by address
    let lines: Vec<&str> = from_utf8(&output).unwrap().lines().collect();
    assert_eq!(
        lines,
        vec![
            "account,balance",
            "0x0000000000000000000000000000000000000001,999999849.5",
            "0x0000000000000000000000000000000000000002,100.5",
            "0x0000000000000000000000000000000000000003,50",
        ]
    );

    let errors = errors.borrow();
    let reasons: Vec<(u64, &str)> = errors
        .iter()
        .map(|(line, reason)| (*line, reason.as_str()))
        .collect();
    assert_eq!(
        reasons,
        vec![
            (3, "transfer amount exceeds balance"),
            (4, "transfer to the zero address"),
            (6, "transfer amount exceeds allowance"),
            (8, "decreased allowance below zero"),
            (14, "Argument `spender` is required for Approve"),
        ]
    );
}

#[test]
fn zero_beneficiary_fails_to_start() {
    let mut output = Vec::new();
    let service = Service {
        genesis: Genesis {
            beneficiary: Address::ZERO,
            ..genesis()
        },
        input: TEST_FILE.as_bytes(),
        output: &mut output,
        error_printer: Box::new(|_, _| {}),
    };
    let err = service.run().unwrap_err();
    assert_eq!(err.root_cause().to_string(), "mint to the zero address");
    assert!(output.is_empty());
}
