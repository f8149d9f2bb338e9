//! Gas accounting for the run loop.
//!
//! Every instruction is charged before its handler executes: first the
//! flat cost of the opcode (when it has one), otherwise a dynamically
//! computed cost that may inspect the stack and the host (copy lengths,
//! keccak words, warm/cold access, the `SSTORE` schedule), then the
//! memory expansion the instruction is about to perform.

pub mod consts;
pub mod costs;

use primitive_types::{H256, U256};

use self::consts::*;
use crate::error::{ExitError, ExitException};
use crate::fork::Config;
use crate::opcode::Opcode;
use crate::runtime::Host;
use crate::utils::h256_to_h160;
use crate::Frame;

/// Flat cost of an opcode, or `None` when the cost is dynamic.
#[must_use]
pub const fn static_cost(opcode: Opcode) -> Option<u64> {
	Some(match opcode {
		Opcode::STOP | Opcode::INVALID => G_ZERO,
		Opcode::ADD | Opcode::SUB | Opcode::NOT | Opcode::LT | Opcode::GT | Opcode::SLT
		| Opcode::SGT | Opcode::EQ | Opcode::ISZERO | Opcode::AND | Opcode::OR | Opcode::XOR
		| Opcode::BYTE | Opcode::SHL | Opcode::SHR | Opcode::SAR | Opcode::CALLDATALOAD => {
			G_VERYLOW
		}
		Opcode::MUL | Opcode::DIV | Opcode::SDIV | Opcode::MOD | Opcode::SMOD
		| Opcode::SIGNEXTEND | Opcode::SELFBALANCE => G_LOW,
		Opcode::ADDMOD | Opcode::MULMOD | Opcode::JUMP => G_MID,
		Opcode::JUMPI => G_HIGH,
		Opcode::ADDRESS | Opcode::ORIGIN | Opcode::CALLER | Opcode::CALLVALUE
		| Opcode::CALLDATASIZE | Opcode::CODESIZE | Opcode::GASPRICE | Opcode::COINBASE
		| Opcode::TIMESTAMP | Opcode::NUMBER | Opcode::DIFFICULTY | Opcode::GASLIMIT
		| Opcode::CHAINID | Opcode::RETURNDATASIZE | Opcode::POP | Opcode::PC | Opcode::MSIZE
		| Opcode::GAS => G_BASE,
		Opcode::JUMPDEST => G_JUMPDEST,
		Opcode::BLOCKHASH => G_BLOCKHASH,
		_ => {
			if opcode.is_push().is_some()
				|| (opcode.0 >= Opcode::DUP1.0 && opcode.0 <= Opcode::SWAP16.0)
			{
				G_VERYLOW
			} else {
				return None;
			}
		}
	})
}

/// The memory range an instruction is about to touch, for expansion
/// charging.
#[derive(Debug, Clone, Copy)]
struct MemoryCost {
	offset: U256,
	len: U256,
}

impl MemoryCost {
	/// Of two ranges, the one reaching further.
	fn join(self, other: MemoryCost) -> MemoryCost {
		if self.len == U256::zero() {
			return other;
		}
		if other.len == U256::zero() {
			return self;
		}

		let self_end = self.offset.saturating_add(self.len);
		let other_end = other.offset.saturating_add(other.len);
		if self_end >= other_end { self } else { other }
	}

	/// Total memory cost of the grown buffer, `None` for a zero-length
	/// access.
	fn cost(&self) -> Result<Option<u64>, ExitError> {
		if self.len == U256::zero() {
			return Ok(None);
		}

		let end = self
			.offset
			.checked_add(self.len)
			.ok_or(ExitException::OutOfGas)?;
		if end > U256::from(usize::MAX) {
			return Err(ExitException::OutOfGas.into());
		}

		let words = (end.as_u64() + 31) / 32;
		Ok(Some(costs::memory_gas(words)?))
	}
}

/// Charge the full gas of the instruction at `opcode` against the
/// frame's meter, before the handler runs.
pub(crate) fn charge<H: Host>(
	frame: &mut Frame,
	host: &mut H,
	config: &Config,
	opcode: Opcode,
) -> Result<(), ExitError> {
	if let Some(cost) = static_cost(opcode) {
		return frame.gasometer.record_cost(cost);
	}

	let (cost, refund, memory, call_gas) = dynamic_gas(frame, host, config, opcode)?;

	frame.gasometer.record_cost(cost)?;
	frame.gasometer.record_refund(refund);

	if let Some(memory) = memory {
		if let Some(new_cost) = memory.cost()? {
			frame.gasometer.record_memory_cost(new_cost)?;
		}
	}

	if let Some(gas_operand) = call_gas {
		costs::call_extra_check(gas_operand, frame.gasometer.gas(), config)?;
	}

	Ok(())
}

type DynamicGas = (u64, i64, Option<MemoryCost>, Option<U256>);

fn dynamic_gas<H: Host>(
	frame: &mut Frame,
	host: &mut H,
	config: &Config,
	opcode: Opcode,
) -> Result<DynamicGas, ExitError> {
	let address = frame.context.address;
	let stack = &frame.stack;
	let peek = |i: usize| -> Result<H256, ExitError> { Ok(stack.peek(i)?) };
	let peek_u256 = |i: usize| -> Result<U256, ExitError> {
		Ok(U256::from_big_endian(&stack.peek(i)?[..]))
	};

	let mut refund = 0i64;
	let mut memory = None;
	let mut call_gas = None;

	let cost = match opcode {
		Opcode::EXP => costs::exp_cost(peek_u256(1)?, config)?,

		Opcode::SHA3 => {
			memory = Some(MemoryCost {
				offset: peek_u256(0)?,
				len: peek_u256(1)?,
			});
			costs::sha3_cost(peek_u256(1)?)?
		}

		Opcode::BALANCE => {
			let target = h256_to_h160(peek(0)?);
			let is_cold = host.warm_up_account(target);
			costs::address_access_cost(is_cold, config.gas_balance(), config)
		}

		Opcode::EXTCODESIZE => {
			let target = h256_to_h160(peek(0)?);
			let is_cold = host.warm_up_account(target);
			costs::address_access_cost(is_cold, config.gas_ext_code(), config)
		}

		Opcode::EXTCODEHASH => {
			let target = h256_to_h160(peek(0)?);
			let is_cold = host.warm_up_account(target);
			costs::address_access_cost(is_cold, config.gas_ext_code_hash(), config)
		}

		Opcode::EXTCODECOPY => {
			let target = h256_to_h160(peek(0)?);
			let is_cold = host.warm_up_account(target);
			memory = Some(MemoryCost {
				offset: peek_u256(1)?,
				len: peek_u256(3)?,
			});
			costs::extcodecopy_cost(peek_u256(3)?, is_cold, config)?
		}

		Opcode::CALLDATACOPY | Opcode::CODECOPY | Opcode::RETURNDATACOPY => {
			memory = Some(MemoryCost {
				offset: peek_u256(0)?,
				len: peek_u256(2)?,
			});
			costs::copy_cost(peek_u256(2)?)?
		}

		Opcode::MLOAD | Opcode::MSTORE => {
			memory = Some(MemoryCost {
				offset: peek_u256(0)?,
				len: U256::from(32),
			});
			G_VERYLOW
		}

		Opcode::MSTORE8 => {
			memory = Some(MemoryCost {
				offset: peek_u256(0)?,
				len: U256::one(),
			});
			G_VERYLOW
		}

		Opcode::SLOAD => {
			let key = peek(0)?;
			let is_cold = host.warm_up_storage(address, key);
			costs::sload_cost(is_cold, config)
		}

		Opcode::SSTORE => {
			let key = peek(0)?;
			let new = peek(1)?;
			let is_cold = host.warm_up_storage(address, key);
			let original = host.committed_storage(address, key);
			let current = host.storage(address, key);

			refund = costs::sstore_refund(original, current, new, config);
			costs::sstore_cost(
				original,
				current,
				new,
				frame.gasometer.gas(),
				is_cold,
				config,
			)?
		}

		Opcode::LOG0 | Opcode::LOG1 | Opcode::LOG2 | Opcode::LOG3 | Opcode::LOG4 => {
			let n = opcode.0 - Opcode::LOG0.0;
			memory = Some(MemoryCost {
				offset: peek_u256(0)?,
				len: peek_u256(1)?,
			});
			costs::log_cost(n, peek_u256(1)?)?
		}

		Opcode::CREATE => {
			memory = Some(MemoryCost {
				offset: peek_u256(1)?,
				len: peek_u256(2)?,
			});
			G_CREATE
		}

		Opcode::CREATE2 => {
			memory = Some(MemoryCost {
				offset: peek_u256(1)?,
				len: peek_u256(2)?,
			});
			costs::create2_cost(peek_u256(2)?)?
		}

		Opcode::RETURN | Opcode::REVERT => {
			memory = Some(MemoryCost {
				offset: peek_u256(0)?,
				len: peek_u256(1)?,
			});
			G_ZERO
		}

		Opcode::SELFDESTRUCT => {
			let target = h256_to_h160(peek(0)?);
			let is_cold = host.warm_up_account(target);
			let target_exists = if config.eip161_empty_check {
				!host.is_empty(target)
			} else {
				host.exists(target)
			};

			refund = costs::selfdestruct_refund(host.deleted(address));
			costs::selfdestruct_cost(host.balance(address), is_cold, target_exists, config)
		}

		Opcode::CALL | Opcode::CALLCODE => {
			let value = peek_u256(2)?;
			if opcode == Opcode::CALL && frame.is_static && value != U256::zero() {
				return Err(ExitException::StaticModeViolation.into());
			}

			let target = h256_to_h160(peek(1)?);
			let is_cold = host.warm_up_account(target);
			let new_account = if config.eip161_empty_check {
				host.is_empty(target)
			} else {
				!host.exists(target)
			};

			memory = Some(
				MemoryCost {
					offset: peek_u256(3)?,
					len: peek_u256(4)?,
				}
				.join(MemoryCost {
					offset: peek_u256(5)?,
					len: peek_u256(6)?,
				}),
			);
			call_gas = Some(peek_u256(0)?);
			costs::call_cost(
				value,
				is_cold,
				true,
				opcode == Opcode::CALL,
				new_account,
				config,
			)
		}

		Opcode::DELEGATECALL | Opcode::STATICCALL => {
			let target = h256_to_h160(peek(1)?);
			let is_cold = host.warm_up_account(target);
			let new_account = if config.eip161_empty_check {
				host.is_empty(target)
			} else {
				!host.exists(target)
			};

			memory = Some(
				MemoryCost {
					offset: peek_u256(2)?,
					len: peek_u256(3)?,
				}
				.join(MemoryCost {
					offset: peek_u256(4)?,
					len: peek_u256(5)?,
				}),
			);
			call_gas = Some(peek_u256(0)?);
			costs::call_cost(
				U256::zero(),
				is_cold,
				false,
				opcode == Opcode::STATICCALL,
				new_account,
				config,
			)
		}

		_ => return Err(ExitException::UndefinedInstruction(opcode).into()),
	};

	Ok((cost, refund, memory, call_gas))
}
