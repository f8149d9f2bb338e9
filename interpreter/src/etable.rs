//! The fork-indexed opcode dispatch table.

use crate::eval;
use crate::fork::Config;
use crate::interpreter::{Handle, StepListener};
use crate::opcode::Opcode;
use crate::runtime::Host;
use crate::{error::ExitResult, Frame};

/// Outcome of a single evaluated instruction.
#[derive(Debug)]
pub enum Control {
	/// Advance the program counter by the given number of bytes.
	Continue(usize),
	/// Jump to the given position, subject to destination validation.
	Jump(usize),
	/// Halt the frame with the given result.
	Exit(ExitResult),
}

/// Evaluation function of one opcode.
pub type Efn<H, L> = fn(&mut Frame, &mut Handle<'_, H, L>, usize) -> Control;

/// A table entry: the handler plus the static facts the run loop checks
/// before dispatching to it.
pub struct InstructionMeta<H, L> {
	/// Evaluation function.
	pub eval: Efn<H, L>,
	/// Minimum stack depth required.
	pub min_stack: usize,
	/// Whether the instruction modifies world state and is therefore
	/// rejected inside a static frame.
	pub writes_state: bool,
}

impl<H, L> Clone for InstructionMeta<H, L> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<H, L> Copy for InstructionMeta<H, L> {}

/// Dispatch table of one fork: opcode byte to handler. Bytes without an
/// entry halt with `UndefinedInstruction`.
pub struct OpcodeTable<H, L>([Option<InstructionMeta<H, L>>; 256]);

impl<H: Host, L: StepListener> OpcodeTable<H, L> {
	/// Build the table of the fork described by `config`.
	#[must_use]
	pub fn for_config(config: &Config) -> Self {
		let mut table = Self([None; 256]);

		table.set(Opcode::STOP, eval::eval_stop, 0, false);
		table.set(Opcode::ADD, eval::eval_add, 2, false);
		table.set(Opcode::MUL, eval::eval_mul, 2, false);
		table.set(Opcode::SUB, eval::eval_sub, 2, false);
		table.set(Opcode::DIV, eval::eval_div, 2, false);
		table.set(Opcode::SDIV, eval::eval_sdiv, 2, false);
		table.set(Opcode::MOD, eval::eval_mod, 2, false);
		table.set(Opcode::SMOD, eval::eval_smod, 2, false);
		table.set(Opcode::ADDMOD, eval::eval_addmod, 3, false);
		table.set(Opcode::MULMOD, eval::eval_mulmod, 3, false);
		table.set(Opcode::EXP, eval::eval_exp, 2, false);
		table.set(Opcode::SIGNEXTEND, eval::eval_signextend, 2, false);

		table.set(Opcode::LT, eval::eval_lt, 2, false);
		table.set(Opcode::GT, eval::eval_gt, 2, false);
		table.set(Opcode::SLT, eval::eval_slt, 2, false);
		table.set(Opcode::SGT, eval::eval_sgt, 2, false);
		table.set(Opcode::EQ, eval::eval_eq, 2, false);
		table.set(Opcode::ISZERO, eval::eval_iszero, 1, false);
		table.set(Opcode::AND, eval::eval_and, 2, false);
		table.set(Opcode::OR, eval::eval_or, 2, false);
		table.set(Opcode::XOR, eval::eval_xor, 2, false);
		table.set(Opcode::NOT, eval::eval_not, 1, false);
		table.set(Opcode::BYTE, eval::eval_byte, 2, false);

		if config.eip145_bitwise_shifting {
			table.set(Opcode::SHL, eval::eval_shl, 2, false);
			table.set(Opcode::SHR, eval::eval_shr, 2, false);
			table.set(Opcode::SAR, eval::eval_sar, 2, false);
		}

		table.set(Opcode::SHA3, eval::eval_sha3, 2, false);

		table.set(Opcode::ADDRESS, eval::eval_address, 0, false);
		table.set(Opcode::BALANCE, eval::eval_balance, 1, false);
		table.set(Opcode::ORIGIN, eval::eval_origin, 0, false);
		table.set(Opcode::CALLER, eval::eval_caller, 0, false);
		table.set(Opcode::CALLVALUE, eval::eval_callvalue, 0, false);
		table.set(Opcode::CALLDATALOAD, eval::eval_calldataload, 1, false);
		table.set(Opcode::CALLDATASIZE, eval::eval_calldatasize, 0, false);
		table.set(Opcode::CALLDATACOPY, eval::eval_calldatacopy, 3, false);
		table.set(Opcode::CODESIZE, eval::eval_codesize, 0, false);
		table.set(Opcode::CODECOPY, eval::eval_codecopy, 3, false);
		table.set(Opcode::GASPRICE, eval::eval_gasprice, 0, false);
		table.set(Opcode::EXTCODESIZE, eval::eval_extcodesize, 1, false);
		table.set(Opcode::EXTCODECOPY, eval::eval_extcodecopy, 4, false);

		if config.eip211_return_data {
			table.set(Opcode::RETURNDATASIZE, eval::eval_returndatasize, 0, false);
			table.set(Opcode::RETURNDATACOPY, eval::eval_returndatacopy, 3, false);
		}
		if config.eip1052_ext_code_hash {
			table.set(Opcode::EXTCODEHASH, eval::eval_extcodehash, 1, false);
		}

		table.set(Opcode::BLOCKHASH, eval::eval_blockhash, 1, false);
		table.set(Opcode::COINBASE, eval::eval_coinbase, 0, false);
		table.set(Opcode::TIMESTAMP, eval::eval_timestamp, 0, false);
		table.set(Opcode::NUMBER, eval::eval_number, 0, false);
		table.set(Opcode::DIFFICULTY, eval::eval_difficulty, 0, false);
		table.set(Opcode::GASLIMIT, eval::eval_gaslimit, 0, false);

		if config.eip1344_chain_id {
			table.set(Opcode::CHAINID, eval::eval_chainid, 0, false);
		}
		if config.eip1884_self_balance {
			table.set(Opcode::SELFBALANCE, eval::eval_selfbalance, 0, false);
		}

		table.set(Opcode::POP, eval::eval_pop, 1, false);
		table.set(Opcode::MLOAD, eval::eval_mload, 1, false);
		table.set(Opcode::MSTORE, eval::eval_mstore, 2, false);
		table.set(Opcode::MSTORE8, eval::eval_mstore8, 2, false);
		table.set(Opcode::SLOAD, eval::eval_sload, 1, false);
		table.set(Opcode::SSTORE, eval::eval_sstore, 2, true);
		table.set(Opcode::JUMP, eval::eval_jump, 1, false);
		table.set(Opcode::JUMPI, eval::eval_jumpi, 2, false);
		table.set(Opcode::PC, eval::eval_pc, 0, false);
		table.set(Opcode::MSIZE, eval::eval_msize, 0, false);
		table.set(Opcode::GAS, eval::eval_gas, 0, false);
		table.set(Opcode::JUMPDEST, eval::eval_jumpdest, 0, false);

		table.set_push();
		table.set_dup_swap();
		table.set_log();

		table.set(Opcode::CREATE, eval::eval_create, 3, true);
		table.set(Opcode::CALL, eval::eval_call, 7, false);
		table.set(Opcode::CALLCODE, eval::eval_callcode, 7, false);
		table.set(Opcode::RETURN, eval::eval_return, 2, false);
		if config.eip7_delegate_call {
			table.set(Opcode::DELEGATECALL, eval::eval_delegatecall, 6, false);
		}
		if config.eip1014_create2 {
			table.set(Opcode::CREATE2, eval::eval_create2, 4, true);
		}
		if config.eip214_static_call {
			table.set(Opcode::STATICCALL, eval::eval_staticcall, 6, false);
		}
		if config.eip140_revert {
			table.set(Opcode::REVERT, eval::eval_revert, 2, false);
		}
		table.set(Opcode::INVALID, eval::eval_invalid, 0, false);
		table.set(Opcode::SELFDESTRUCT, eval::eval_selfdestruct, 1, true);

		table
	}

	fn set(&mut self, opcode: Opcode, eval: Efn<H, L>, min_stack: usize, writes_state: bool) {
		self.0[opcode.as_usize()] = Some(InstructionMeta {
			eval,
			min_stack,
			writes_state,
		});
	}

	fn set_push(&mut self) {
		for (n, eval) in eval::push_evals::<H, L>().into_iter().enumerate() {
			self.0[Opcode::PUSH1.as_usize() + n] = Some(InstructionMeta {
				eval,
				min_stack: 0,
				writes_state: false,
			});
		}
	}

	fn set_dup_swap(&mut self) {
		for (n, eval) in eval::dup_evals::<H, L>().into_iter().enumerate() {
			self.0[Opcode::DUP1.as_usize() + n] = Some(InstructionMeta {
				eval,
				min_stack: n + 1,
				writes_state: false,
			});
		}
		for (n, eval) in eval::swap_evals::<H, L>().into_iter().enumerate() {
			self.0[Opcode::SWAP1.as_usize() + n] = Some(InstructionMeta {
				eval,
				min_stack: n + 2,
				writes_state: false,
			});
		}
	}

	fn set_log(&mut self) {
		for (n, eval) in eval::log_evals::<H, L>().into_iter().enumerate() {
			self.0[Opcode::LOG0.as_usize() + n] = Some(InstructionMeta {
				eval,
				min_stack: n + 2,
				writes_state: true,
			});
		}
	}
}

impl<H, L> OpcodeTable<H, L> {
	/// Look up the entry of an opcode.
	#[inline]
	pub fn get(&self, opcode: Opcode) -> Option<&InstructionMeta<H, L>> {
		self.0[opcode.as_usize()].as_ref()
	}
}
