mod common;

use common::{TestAccount, TestBackend};
use ethvm_interpreter::{
	execute, execute_with, Fork, Frame, Message, NoPrecompiles, Opcode, OverlayedHost, StatusCode,
	StepListener,
};
use primitive_types::{H160, H256, U256};

fn caller() -> H160 {
	H160::repeat_byte(0xca)
}

fn contract() -> H160 {
	H160::repeat_byte(0x42)
}

fn message(gas: u64) -> Message {
	Message::call(caller(), contract(), U256::zero(), Vec::new(), gas)
}

fn run_code(fork: Fork, code: &str, gas: u64) -> ethvm_interpreter::ExecutionResult {
	let backend = TestBackend::default();
	let mut host = OverlayedHost::new(backend);
	execute(&mut host, fork, message(gas), hex::decode(code).unwrap())
}

/// Records the stack top after every instruction.
struct StackTracer {
	last_top: Option<H256>,
	steps: usize,
}

impl StepListener for StackTracer {
	fn on_step(&mut self, frame: &Frame, _opcode: Opcode, _position: usize) -> bool {
		self.last_top = frame.stack.data().last().cloned();
		self.steps += 1;
		false
	}
}

#[test]
fn simple_add() {
	let backend = TestBackend::default();
	let mut host = OverlayedHost::new(backend);
	let mut tracer = StackTracer {
		last_top: None,
		steps: 0,
	};

	// PUSH1 1; PUSH1 2; ADD
	let result = execute_with(
		&mut host,
		Fork::Berlin,
		&NoPrecompiles,
		&mut tracer,
		message(100_000),
		hex::decode("6001600201").unwrap(),
	);

	assert_eq!(result.status, StatusCode::Success);
	assert_eq!(result.gas_left, 100_000 - 9);
	assert!(result.output.is_empty());
	assert_eq!(tracer.steps, 3);
	assert_eq!(tracer.last_top, Some(H256::from_low_u64_be(3)));
}

#[test]
fn out_of_gas_on_push() {
	let result = run_code(Fork::Berlin, "6001", 2);
	assert_eq!(result.status, StatusCode::OutOfGas);
	assert_eq!(result.gas_left, 0);
}

#[test]
fn stack_underflow_on_pop() {
	let result = run_code(Fork::Berlin, "50", 100_000);
	assert_eq!(result.status, StatusCode::StackUnderflow);
	assert_eq!(result.gas_left, 0);
}

#[test]
fn invalid_instruction_burns_gas() {
	let result = run_code(Fork::Berlin, "fe", 100_000);
	assert_eq!(result.status, StatusCode::InvalidInstruction);
	assert_eq!(result.gas_left, 0);
}

#[test]
fn undefined_instruction() {
	// 0x0c is unassigned in every fork
	let result = run_code(Fork::Berlin, "0c", 100_000);
	assert_eq!(result.status, StatusCode::UndefinedInstruction);
	// SHL before Constantinople is undefined, after it underflows
	let result = run_code(Fork::Byzantium, "1b", 100_000);
	assert_eq!(result.status, StatusCode::UndefinedInstruction);
	let result = run_code(Fork::Constantinople, "1b", 100_000);
	assert_eq!(result.status, StatusCode::StackUnderflow);
}

#[test]
fn jump_into_push_immediate_fails() {
	// PUSH1 1; JUMP; STOP; JUMPDEST; STOP — target 1 is the PUSH immediate
	let result = run_code(Fork::Berlin, "600156005b00", 100_000);
	assert_eq!(result.status, StatusCode::BadJumpDestination);
	assert_eq!(result.gas_left, 0);
}

#[test]
fn jump_to_reachable_jumpdest_succeeds() {
	// PUSH1 4; JUMP; STOP; JUMPDEST; STOP
	let result = run_code(Fork::Berlin, "600456005b00", 100_000);
	assert_eq!(result.status, StatusCode::Success);
}

#[test]
fn jumpi_not_taken_ignores_bad_destination() {
	// PUSH1 0; PUSH1 7; JUMPI; STOP — condition is zero, fall through
	let result = run_code(Fork::Berlin, "600060075700", 100_000);
	assert_eq!(result.status, StatusCode::Success);
}

#[test]
fn memory_expansion_and_return() {
	let backend = TestBackend::default();
	let mut host = OverlayedHost::new(backend);

	// PUSH1 0xff; PUSH1 0; MSTORE; PUSH1 0x20; PUSH1 0; RETURN
	let result = execute(
		&mut host,
		Fork::Berlin,
		message(100_000),
		hex::decode("60ff60005260206000f3").unwrap(),
	);

	assert_eq!(result.status, StatusCode::Success);
	assert_eq!(result.output.len(), 32);
	assert_eq!(result.output, {
		let mut expected = vec![0u8; 32];
		expected[31] = 0xff;
		expected
	});
	// 4 pushes, MSTORE, plus one word of expansion
	assert_eq!(result.gas_left, 100_000 - (3 + 3 + 3 + 3 + 3 + 3));
}

#[test]
fn revert_preserves_output_and_rolls_back_storage() {
	let backend = TestBackend::default().with_account(
		contract(),
		TestAccount {
			balance: U256::zero(),
			nonce: 0,
			code: Vec::new(),
			storage: Default::default(),
		},
	);
	let mut host = OverlayedHost::new(backend);

	// PUSH1 1; PUSH1 0; SSTORE; PUSH1 0x20; PUSH1 0; REVERT
	let result = execute(
		&mut host,
		Fork::Berlin,
		message(100_000),
		hex::decode("600160005560206000fd").unwrap(),
	);

	assert_eq!(result.status, StatusCode::Revert);
	assert_eq!(result.output, vec![0u8; 32]);
	// gas was consumed, not restored
	assert!(result.gas_left < 100_000);
}

#[test]
fn empty_code_is_immediate_success() {
	let result = run_code(Fork::Berlin, "", 12_345);
	assert_eq!(result.status, StatusCode::Success);
	assert_eq!(result.gas_left, 12_345);
	assert!(result.output.is_empty());
}

#[test]
fn stack_overflow_at_limit() {
	// JUMPDEST; PUSH1 1; PUSH1 0; JUMP — pushes forever
	let result = run_code(Fork::Berlin, "5b6001600056", 10_000_000);
	assert_eq!(result.status, StatusCode::StackOverflow);
}

#[test]
fn determinism() {
	let code = "60ff60005260206000f3";
	let first = run_code(Fork::Istanbul, code, 100_000);
	let second = run_code(Fork::Istanbul, code, 100_000);
	assert_eq!(first.status, second.status);
	assert_eq!(first.gas_left, second.gas_left);
	assert_eq!(first.output, second.output);
}

#[test]
fn listener_can_halt_execution() {
	struct HaltAfter(usize);

	impl StepListener for HaltAfter {
		fn on_step(&mut self, _frame: &Frame, _opcode: Opcode, _position: usize) -> bool {
			self.0 -= 1;
			self.0 == 0
		}
	}

	let backend = TestBackend::default();
	let mut host = OverlayedHost::new(backend);
	let mut listener = HaltAfter(2);

	let result = execute_with(
		&mut host,
		Fork::Berlin,
		&NoPrecompiles,
		&mut listener,
		message(100_000),
		hex::decode("6001600201").unwrap(),
	);

	assert_eq!(result.status, StatusCode::Halted);
}

#[test]
fn sload_warm_cold_pricing() {
	// PUSH1 0; SLOAD; POP; PUSH1 0; SLOAD — cold then warm
	let code = "60005450600054";
	let result = run_code(Fork::Berlin, code, 100_000);
	assert_eq!(result.status, StatusCode::Success);
	assert_eq!(result.gas_left, 100_000 - (3 + 2100 + 2 + 3 + 100));

	// pre-Berlin the two loads cost the same
	let result = run_code(Fork::Istanbul, code, 100_000);
	assert_eq!(result.status, StatusCode::Success);
	assert_eq!(result.gas_left, 100_000 - (3 + 800 + 2 + 3 + 800));
}

#[test]
fn status_codes_are_stable() {
	assert_eq!(StatusCode::Success.code(), 0);
	assert_eq!(StatusCode::Failure.code(), 1);
	assert_eq!(StatusCode::Revert.code(), 2);
	assert_eq!(StatusCode::OutOfGas.code(), 3);
	assert_eq!(StatusCode::InvalidInstruction.code(), 4);
	assert_eq!(StatusCode::UndefinedInstruction.code(), 5);
	assert_eq!(StatusCode::StackOverflow.code(), 6);
	assert_eq!(StatusCode::StackUnderflow.code(), 7);
	assert_eq!(StatusCode::BadJumpDestination.code(), 8);
	assert_eq!(StatusCode::InvalidMemoryAccess.code(), 9);
	assert_eq!(StatusCode::CallDepthExceeded.code(), 10);
	assert_eq!(StatusCode::StaticModeViolation.code(), 11);
	assert_eq!(StatusCode::PrecompileFailure.code(), 12);
	assert_eq!(StatusCode::ContractValidationFailure.code(), 13);
	assert_eq!(StatusCode::ArgumentOutOfRange.code(), 14);
	assert_eq!(StatusCode::Halted.code(), 17);
	assert_eq!(StatusCode::InternalError.code(), -1);
	assert_eq!(StatusCode::Rejected.code(), -2);
	assert_eq!(StatusCode::OutOfMemory.code(), -3);
}
