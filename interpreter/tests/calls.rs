mod common;

use common::{TestAccount, TestBackend};
use ethvm_interpreter::eval::create_address;
use ethvm_interpreter::{
	execute, CallKind, Fork, Message, OverlayedHost, StatusCode,
};
use primitive_types::{H160, H256, U256};

fn caller() -> H160 {
	H160::repeat_byte(0xca)
}

fn contract() -> H160 {
	H160::repeat_byte(0x42)
}

fn callee() -> H160 {
	H160::repeat_byte(0xbb)
}

/// `PUSH1 1; PUSH1 0; SSTORE; STOP`
const SSTORE_CODE: &str = "600160005500";
/// `PUSH1 1; PUSH1 0; SSTORE; PUSH1 0x20; PUSH1 0; REVERT`
const SSTORE_REVERT_CODE: &str = "600160005560206000fd";
/// `CALLER; PUSH1 0; SSTORE; STOP`
const STORE_CALLER_CODE: &str = "33600055 00";

/// Build caller code performing one call-family operation against
/// `target` and returning the pushed status word.
fn call_then_return(opcode: u8, target: H160, value: u8) -> Vec<u8> {
	let mut code = Vec::new();
	// out_len, out_off, in_len, in_off
	code.extend_from_slice(&[0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00]);
	if opcode == 0xf1 || opcode == 0xf2 {
		code.extend_from_slice(&[0x60, value]);
	}
	code.push(0x73); // PUSH20 target
	code.extend_from_slice(target.as_bytes());
	code.extend_from_slice(&[0x62, 0xff, 0xff, 0xff]); // PUSH3 gas
	code.push(opcode);
	// MSTORE the status word and return it
	code.extend_from_slice(&[0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xf3]);
	code
}

fn backend_with(code_hex: &str) -> TestBackend {
	TestBackend::default()
		.with_account(
			contract(),
			TestAccount {
				balance: U256::from(1_000_000u64),
				..Default::default()
			},
		)
		.with_account(
			callee(),
			TestAccount {
				code: hex::decode(code_hex.replace(' ', "")).unwrap(),
				..Default::default()
			},
		)
}

fn message(gas: u64) -> Message {
	Message::call(caller(), contract(), U256::zero(), Vec::new(), gas)
}

fn status_word(output: &[u8]) -> U256 {
	U256::from_big_endian(output)
}

#[test]
fn call_commits_child_writes() {
	let mut host = OverlayedHost::new(backend_with(SSTORE_CODE));
	let result = execute(
		&mut host,
		Fork::Berlin,
		message(1_000_000),
		call_then_return(0xf1, callee(), 0),
	);

	assert_eq!(result.status, StatusCode::Success);
	assert_eq!(status_word(&result.output), U256::one());

	let (_, changeset) = host.deconstruct();
	assert_eq!(
		changeset.storages.get(&(callee(), H256::zero())),
		Some(&H256::from_low_u64_be(1))
	);
}

#[test]
fn reverted_child_leaves_no_trace() {
	let mut host = OverlayedHost::new(backend_with(SSTORE_REVERT_CODE));
	let result = execute(
		&mut host,
		Fork::Berlin,
		message(1_000_000),
		call_then_return(0xf1, callee(), 0),
	);

	// the parent survives and sees a zero status word
	assert_eq!(result.status, StatusCode::Success);
	assert_eq!(status_word(&result.output), U256::zero());

	let (_, changeset) = host.deconstruct();
	assert!(changeset.storages.is_empty());
	assert!(changeset.logs.is_empty());
	// the slot warmed inside the reverted frame is cold again, while the
	// account warmed by the caller itself stays warm
	assert!(!changeset.accessed.contains(&(callee(), Some(H256::zero()))));
	assert!(changeset.accessed.contains(&(callee(), None)));
}

#[test]
fn static_frame_rejects_storage_writes() {
	let mut host = OverlayedHost::new(backend_with(SSTORE_CODE));
	let result = execute(
		&mut host,
		Fork::Berlin,
		message(1_000_000),
		call_then_return(0xfa, callee(), 0),
	);

	assert_eq!(result.status, StatusCode::Success);
	assert_eq!(status_word(&result.output), U256::zero());

	let (_, changeset) = host.deconstruct();
	assert!(changeset.storages.is_empty());
}

#[test]
fn call_at_depth_limit_pushes_zero() {
	let mut host = OverlayedHost::new(backend_with(SSTORE_CODE));
	let mut msg = message(1_000_000);
	msg.depth = 1024;

	let result = execute(
		&mut host,
		Fork::Berlin,
		msg,
		call_then_return(0xf1, callee(), 0),
	);

	assert_eq!(result.status, StatusCode::Success);
	assert_eq!(status_word(&result.output), U256::zero());

	let (_, changeset) = host.deconstruct();
	assert!(changeset.storages.is_empty());
}

#[test]
fn over_depth_message_is_rejected() {
	let mut host = OverlayedHost::new(backend_with(SSTORE_CODE));
	let mut msg = message(1_000_000);
	msg.depth = 1025;

	let result = execute(&mut host, Fork::Berlin, msg, vec![0x00]);
	assert_eq!(result.status, StatusCode::CallDepthExceeded);
}

#[test]
fn insufficient_balance_pushes_zero_and_continues() {
	let backend = TestBackend::default().with_account(
		callee(),
		TestAccount {
			code: hex::decode(SSTORE_CODE).unwrap(),
			..Default::default()
		},
	);
	let mut host = OverlayedHost::new(backend);

	// the caller account has no balance at all
	let result = execute(
		&mut host,
		Fork::Berlin,
		message(1_000_000),
		call_then_return(0xf1, callee(), 1),
	);

	assert_eq!(result.status, StatusCode::Success);
	assert_eq!(status_word(&result.output), U256::zero());
}

#[test]
fn delegatecall_preserves_caller_and_address() {
	let mut host = OverlayedHost::new(backend_with(STORE_CALLER_CODE));
	let result = execute(
		&mut host,
		Fork::Berlin,
		message(1_000_000),
		call_then_return(0xf4, callee(), 0),
	);

	assert_eq!(result.status, StatusCode::Success);
	assert_eq!(status_word(&result.output), U256::one());

	let (_, changeset) = host.deconstruct();
	// the write lands on the delegating contract, recording its caller
	assert_eq!(
		changeset.storages.get(&(contract(), H256::zero())),
		Some(&H256::from(caller()))
	);
	assert_eq!(changeset.storages.get(&(callee(), H256::zero())), None);
}

#[test]
fn callcode_executes_in_own_context() {
	let mut host = OverlayedHost::new(backend_with(SSTORE_CODE));
	let result = execute(
		&mut host,
		Fork::Berlin,
		message(1_000_000),
		call_then_return(0xf2, callee(), 0),
	);

	assert_eq!(result.status, StatusCode::Success);
	assert_eq!(status_word(&result.output), U256::one());

	let (_, changeset) = host.deconstruct();
	assert_eq!(
		changeset.storages.get(&(contract(), H256::zero())),
		Some(&H256::from_low_u64_be(1))
	);
}

#[test]
fn create_deploys_and_bumps_nonces() {
	let mut host = OverlayedHost::new(backend_with(SSTORE_CODE));

	// PUSH1 0; PUSH1 0; PUSH1 0; CREATE, then return the address word
	let code = hex::decode("600060006000f060005260206000f3").unwrap();
	let result = execute(&mut host, Fork::Berlin, message(1_000_000), code);

	assert_eq!(result.status, StatusCode::Success);
	let created = create_address(contract(), 0);
	assert_eq!(status_word(&result.output), U256::from(created.as_bytes()));

	let (_, changeset) = host.deconstruct();
	assert_eq!(changeset.nonces.get(&contract()), Some(&1));
	// EIP-161: fresh contracts start at nonce one
	assert_eq!(changeset.nonces.get(&created), Some(&1));
}

#[test]
fn create_in_static_frame_fails() {
	let mut host = OverlayedHost::new(backend_with(SSTORE_CODE));
	let mut msg = message(1_000_000);
	msg.kind = CallKind::StaticCall;
	msg.is_static = true;

	let code = hex::decode("600060006000f060005260206000f3").unwrap();
	let result = execute(&mut host, Fork::Berlin, msg, code);
	assert_eq!(result.status, StatusCode::StaticModeViolation);
}

#[test]
fn returndata_tracks_last_call() {
	// callee returns 32 bytes of 0xff
	let callee_code = "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff60005260206000f3";
	let mut host = OverlayedHost::new(backend_with(callee_code));

	// call, then RETURNDATASIZE; PUSH1 0; MSTORE; return that word
	let mut code = Vec::new();
	code.extend_from_slice(&[0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00, 0x60, 0x00]);
	code.push(0x73);
	code.extend_from_slice(callee().as_bytes());
	code.extend_from_slice(&[0x62, 0xff, 0xff, 0xff, 0xf1]);
	code.push(0x50); // POP the status
	code.extend_from_slice(&[0x3d, 0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xf3]);

	let result = execute(&mut host, Fork::Berlin, message(1_000_000), code);
	assert_eq!(result.status, StatusCode::Success);
	assert_eq!(status_word(&result.output), U256::from(32));
}
