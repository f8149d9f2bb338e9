use std::collections::HashMap;

use ethvm_interpreter::Fork;
use ethvm_jsontests::{run_test, Test};

fn load(json: &str) -> HashMap<String, Test> {
	serde_json::from_str(json).unwrap()
}

const EMPTY_LOGS: &str = "0x1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347";

fn fixture(code: &str, gas: &str, out: &str, logs: &str, post_storage: &str) -> String {
	format!(
		r#"{{
			"test": {{
				"env": {{
					"currentCoinbase": "0x2adc25665018aa1fe0e6bc666dac8fc2697ff9ba",
					"currentDifficulty": "0x0100",
					"currentGasLimit": "0x0f4240",
					"currentNumber": "0x00",
					"currentTimestamp": "0x01"
				}},
				"exec": {{
					"address": "0x0f572e5295c57f15886f9b263e2f6d2d6c7b5ec6",
					"caller": "0xcd1722f3947def4cf144679da39c4c32bdc35681",
					"code": "{code}",
					"data": "0x",
					"gas": "0x0186a0",
					"gasPrice": "0x5af3107a4000",
					"origin": "0xcd1722f3947def4cf144679da39c4c32bdc35681",
					"value": "0x0de0b6b3a7640000"
				}},
				"pre": {{
					"0x0f572e5295c57f15886f9b263e2f6d2d6c7b5ec6": {{
						"balance": "0x152d02c7e14af6800000",
						"code": "{code}",
						"nonce": "0x00",
						"storage": {{}}
					}}
				}},
				"gas": "{gas}",
				"out": "{out}",
				"logs": "{logs}",
				"post": {{
					"0x0f572e5295c57f15886f9b263e2f6d2d6c7b5ec6": {{
						"balance": "0x152d02c7e14af6800000",
						"code": "{code}",
						"nonce": "0x00",
						"storage": {{{post_storage}}}
					}}
				}}
			}}
		}}"#
	)
}

#[test]
fn add_then_sstore_istanbul() {
	// PUSH1 1; PUSH1 2; ADD; PUSH1 0; SSTORE — a fresh set costs 20000
	let tests = load(&fixture(
		"0x6001600201600055",
		"0x13874",
		"0x",
		EMPTY_LOGS,
		r#""0x00": "0x03""#,
	));

	for test in tests.values() {
		run_test(test, Fork::Istanbul).unwrap();
	}
}

#[test]
fn add_then_sstore_berlin_charges_cold_slot() {
	let tests = load(&fixture(
		"0x6001600201600055",
		"0x13040",
		"0x",
		EMPTY_LOGS,
		r#""0x00": "0x03""#,
	));

	for test in tests.values() {
		run_test(test, Fork::Berlin).unwrap();
	}
}

#[test]
fn sstore_clear_applies_capped_refund() {
	// PUSH1 0; PUSH1 0; SSTORE — clearing the slot earns the 15000
	// refund, capped at half the 5006 gas used
	let json = r#"{
		"sstore_clear": {
			"env": {
				"currentCoinbase": "0x2adc25665018aa1fe0e6bc666dac8fc2697ff9ba",
				"currentDifficulty": "0x0100",
				"currentGasLimit": "0x0f4240",
				"currentNumber": "0x00",
				"currentTimestamp": "0x01"
			},
			"exec": {
				"address": "0x0f572e5295c57f15886f9b263e2f6d2d6c7b5ec6",
				"caller": "0xcd1722f3947def4cf144679da39c4c32bdc35681",
				"code": "0x6000600055",
				"data": "0x",
				"gas": "0x0186a0",
				"gasPrice": "0x5af3107a4000",
				"origin": "0xcd1722f3947def4cf144679da39c4c32bdc35681",
				"value": "0x00"
			},
			"pre": {
				"0x0f572e5295c57f15886f9b263e2f6d2d6c7b5ec6": {
					"balance": "0x152d02c7e14af6800000",
					"code": "0x6000600055",
					"nonce": "0x00",
					"storage": { "0x00": "0x01" }
				}
			},
			"gas": "0x17cd9",
			"out": "0x",
			"logs": "0x1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347",
			"post": {
				"0x0f572e5295c57f15886f9b263e2f6d2d6c7b5ec6": {
					"balance": "0x152d02c7e14af6800000",
					"code": "0x6000600055",
					"nonce": "0x00",
					"storage": {}
				}
			}
		}
	}"#;

	for test in load(json).values() {
		run_test(test, Fork::Istanbul).unwrap();
	}
}

#[test]
fn log0_hash() {
	// PUSH1 0; PUSH1 0; LOG0
	let tests = load(&fixture(
		"0x60006000a0",
		"0x18523",
		"0x",
		"0xea63b4dbbdbca1bd985580a0c3b6f35a4955d4d4cf0b4d903003cdfc4c40ba1c",
		"",
	));

	for test in tests.values() {
		run_test(test, Fork::Istanbul).unwrap();
	}
}

#[test]
fn sha3_of_fresh_memory() {
	// PUSH1 32; PUSH1 0; SHA3 — 30 + 6 for one word, plus 3 expansion
	let tests = load(&fixture(
		"0x6020600020",
		"0x18673",
		"0x",
		EMPTY_LOGS,
		"",
	));

	for test in tests.values() {
		run_test(test, Fork::Istanbul).unwrap();
	}
}

#[test]
fn mstore_return() {
	// PUSH1 0xff; PUSH1 0; MSTORE; PUSH1 0x20; PUSH1 0; RETURN
	let tests = load(&fixture(
		"0x60ff60005260206000f3",
		"0x1868e",
		"0x00000000000000000000000000000000000000000000000000000000000000ff",
		EMPTY_LOGS,
		"",
	));

	for test in tests.values() {
		run_test(test, Fork::Istanbul).unwrap();
	}
}

#[test]
fn out_of_gas_has_no_post_section() {
	let json = r#"{
		"oog": {
			"env": {
				"currentCoinbase": "0x2adc25665018aa1fe0e6bc666dac8fc2697ff9ba",
				"currentDifficulty": "0x0100",
				"currentGasLimit": "0x0f4240",
				"currentNumber": "0x00",
				"currentTimestamp": "0x01"
			},
			"exec": {
				"address": "0x0f572e5295c57f15886f9b263e2f6d2d6c7b5ec6",
				"caller": "0xcd1722f3947def4cf144679da39c4c32bdc35681",
				"code": "0x6001",
				"data": "0x",
				"gas": "0x02",
				"gasPrice": "0x5af3107a4000",
				"origin": "0xcd1722f3947def4cf144679da39c4c32bdc35681",
				"value": "0x00"
			},
			"pre": {}
		}
	}"#;

	for test in load(json).values() {
		run_test(test, Fork::Istanbul).unwrap();
	}
}

#[test]
fn identity_precompile_through_call() {
	// CALLDATACOPY the input to memory, CALL the identity contract,
	// return its output: stored word survives the round trip.
	//
	// PUSH1 0x20; PUSH1 0; PUSH1 0; CALLDATACOPY
	// PUSH1 0x20 (retLen); PUSH1 0x20 (retOff); PUSH1 0x20 (argsLen);
	// PUSH1 0 (argsOff); PUSH1 0 (value); PUSH1 4 (to); PUSH3 0xffffff;
	// CALL; POP
	// PUSH1 0x20; PUSH1 0x20; RETURN
	let code = "0x6020600060003760206020602060006000600462fffffff15060206020f3";

	let json = format!(
		r#"{{
			"identity": {{
				"env": {{
					"currentCoinbase": "0x2adc25665018aa1fe0e6bc666dac8fc2697ff9ba",
					"currentDifficulty": "0x0100",
					"currentGasLimit": "0x0f4240",
					"currentNumber": "0x00",
					"currentTimestamp": "0x01"
				}},
				"exec": {{
					"address": "0x0f572e5295c57f15886f9b263e2f6d2d6c7b5ec6",
					"caller": "0xcd1722f3947def4cf144679da39c4c32bdc35681",
					"code": "{code}",
					"data": "0x000000000000000000000000000000000000000000000000000000000000002a",
					"gas": "0x0186a0",
					"gasPrice": "0x5af3107a4000",
					"origin": "0xcd1722f3947def4cf144679da39c4c32bdc35681",
					"value": "0x00"
				}},
				"pre": {{}},
				"out": "0x000000000000000000000000000000000000000000000000000000000000002a",
				"logs": "{EMPTY_LOGS}",
				"post": {{}}
			}}
		}}"#
	);

	for test in load(&json).values() {
		run_test(test, Fork::Istanbul).unwrap();
	}
}
