//! Opcode evaluation implementations.

#[macro_use]
mod macros;
mod arithmetic;
mod bitwise;
pub mod call_create;
mod misc;
mod system;

use core::ops::{BitAnd, BitOr, BitXor};

use primitive_types::U256;

use crate::error::ExitSucceed;
use crate::etable::{Control, Efn};
use crate::interpreter::{Handle, StepListener};
use crate::runtime::{CallKind, Host};
use crate::Frame;

pub use self::call_create::{create2_address, create_address};

/// `STOP`
pub fn eval_stop<H: Host, L: StepListener>(
	_frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	Control::Exit(ExitSucceed::Stopped.into())
}

/// `ADD`
pub fn eval_add<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op2_u256_tuple!(frame, overflowing_add)
}

/// `MUL`
pub fn eval_mul<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op2_u256_tuple!(frame, overflowing_mul)
}

/// `SUB`
pub fn eval_sub<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op2_u256_tuple!(frame, overflowing_sub)
}

/// `DIV`
pub fn eval_div<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op2_u256_fn!(frame, self::arithmetic::div)
}

/// `SDIV`
pub fn eval_sdiv<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op2_u256_fn!(frame, self::arithmetic::sdiv)
}

/// `MOD`
pub fn eval_mod<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op2_u256_fn!(frame, self::arithmetic::rem)
}

/// `SMOD`
pub fn eval_smod<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op2_u256_fn!(frame, self::arithmetic::srem)
}

/// `ADDMOD`
pub fn eval_addmod<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op3_u256_fn!(frame, self::arithmetic::addmod)
}

/// `MULMOD`
pub fn eval_mulmod<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op3_u256_fn!(frame, self::arithmetic::mulmod)
}

/// `EXP`
pub fn eval_exp<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op2_u256_fn!(frame, self::arithmetic::exp)
}

/// `SIGNEXTEND`
pub fn eval_signextend<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op2_u256_fn!(frame, self::arithmetic::signextend)
}

/// `LT`
pub fn eval_lt<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op2_u256_bool_ref!(frame, lt)
}

/// `GT`
pub fn eval_gt<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op2_u256_bool_ref!(frame, gt)
}

/// `SLT`
pub fn eval_slt<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op2_u256_fn!(frame, self::bitwise::slt)
}

/// `SGT`
pub fn eval_sgt<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op2_u256_fn!(frame, self::bitwise::sgt)
}

/// `EQ`
pub fn eval_eq<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op2_u256_bool_ref!(frame, eq)
}

/// `ISZERO`
pub fn eval_iszero<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op1_u256_fn!(frame, self::bitwise::iszero)
}

/// `AND`
pub fn eval_and<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op2_u256!(frame, bitand)
}

/// `OR`
pub fn eval_or<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op2_u256!(frame, bitor)
}

/// `XOR`
pub fn eval_xor<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op2_u256!(frame, bitxor)
}

/// `NOT`
pub fn eval_not<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op1_u256_fn!(frame, self::bitwise::not)
}

/// `BYTE`
pub fn eval_byte<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op2_u256_fn!(frame, self::bitwise::byte)
}

/// `SHL`
pub fn eval_shl<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op2_u256_fn!(frame, self::bitwise::shl)
}

/// `SHR`
pub fn eval_shr<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op2_u256_fn!(frame, self::bitwise::shr)
}

/// `SAR`
pub fn eval_sar<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	op2_u256_fn!(frame, self::bitwise::sar)
}

/// `SHA3`
pub fn eval_sha3<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::sha3(frame)
}

/// `ADDRESS`
pub fn eval_address<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::address(frame)
}

/// `BALANCE`
pub fn eval_balance<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::balance(frame, handle.host)
}

/// `ORIGIN`
pub fn eval_origin<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::origin(frame, handle.host)
}

/// `CALLER`
pub fn eval_caller<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::caller(frame)
}

/// `CALLVALUE`
pub fn eval_callvalue<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::callvalue(frame)
}

/// `CALLDATALOAD`
pub fn eval_calldataload<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::misc::calldataload(frame)
}

/// `CALLDATASIZE`
pub fn eval_calldatasize<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::misc::calldatasize(frame)
}

/// `CALLDATACOPY`
pub fn eval_calldatacopy<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::misc::calldatacopy(frame)
}

/// `CODESIZE`
pub fn eval_codesize<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::misc::codesize(frame)
}

/// `CODECOPY`
pub fn eval_codecopy<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::misc::codecopy(frame)
}

/// `GASPRICE`
pub fn eval_gasprice<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::gasprice(frame, handle.host)
}

/// `EXTCODESIZE`
pub fn eval_extcodesize<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::extcodesize(frame, handle.host)
}

/// `EXTCODECOPY`
pub fn eval_extcodecopy<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::extcodecopy(frame, handle.host)
}

/// `RETURNDATASIZE`
pub fn eval_returndatasize<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::returndatasize(frame)
}

/// `RETURNDATACOPY`
pub fn eval_returndatacopy<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::returndatacopy(frame)
}

/// `EXTCODEHASH`
pub fn eval_extcodehash<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::extcodehash(frame, handle.host)
}

/// `BLOCKHASH`
pub fn eval_blockhash<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::blockhash(frame, handle.host)
}

/// `COINBASE`
pub fn eval_coinbase<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::coinbase(frame, handle.host)
}

/// `TIMESTAMP`
pub fn eval_timestamp<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::timestamp(frame, handle.host)
}

/// `NUMBER`
pub fn eval_number<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::number(frame, handle.host)
}

/// `DIFFICULTY`
pub fn eval_difficulty<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::difficulty(frame, handle.host)
}

/// `GASLIMIT`
pub fn eval_gaslimit<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::gaslimit(frame, handle.host)
}

/// `CHAINID`
pub fn eval_chainid<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::chainid(frame, handle.host)
}

/// `SELFBALANCE`
pub fn eval_selfbalance<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::selfbalance(frame, handle.host)
}

/// `POP`
pub fn eval_pop<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::misc::pop(frame)
}

/// `MLOAD`
pub fn eval_mload<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::misc::mload(frame)
}

/// `MSTORE`
pub fn eval_mstore<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::misc::mstore(frame)
}

/// `MSTORE8`
pub fn eval_mstore8<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::misc::mstore8(frame)
}

/// `SLOAD`
pub fn eval_sload<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::sload(frame, handle.host)
}

/// `SSTORE`
pub fn eval_sstore<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::sstore(frame, handle.host)
}

/// `JUMP`
pub fn eval_jump<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::misc::jump(frame)
}

/// `JUMPI`
pub fn eval_jumpi<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::misc::jumpi(frame)
}

/// `PC`
pub fn eval_pc<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	position: usize,
) -> Control {
	self::misc::pc(frame, position)
}

/// `MSIZE`
pub fn eval_msize<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::misc::msize(frame)
}

/// `GAS`
pub fn eval_gas<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::gas(frame)
}

/// `JUMPDEST`
pub fn eval_jumpdest<H: Host, L: StepListener>(
	_frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	Control::Continue(1)
}

macro_rules! eval_push {
	($($num:expr),*) => {
		$(paste::paste! {
			/// `PUSHn`
			pub fn [<eval_push $num>]<H: Host, L: StepListener>(
				frame: &mut Frame,
				_handle: &mut Handle<'_, H, L>,
				position: usize,
			) -> Control {
				self::misc::push(frame, $num, position)
			}
		})*
	};
}

eval_push! {
	1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16,
	17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32
}

macro_rules! eval_dup {
	($($num:expr),*) => {
		$(paste::paste! {
			/// `DUPn`
			pub fn [<eval_dup $num>]<H: Host, L: StepListener>(
				frame: &mut Frame,
				_handle: &mut Handle<'_, H, L>,
				_position: usize,
			) -> Control {
				self::misc::dup(frame, $num)
			}
		})*
	};
}

eval_dup! { 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16 }

macro_rules! eval_swap {
	($($num:expr),*) => {
		$(paste::paste! {
			/// `SWAPn`
			pub fn [<eval_swap $num>]<H: Host, L: StepListener>(
				frame: &mut Frame,
				_handle: &mut Handle<'_, H, L>,
				_position: usize,
			) -> Control {
				self::misc::swap(frame, $num)
			}
		})*
	};
}

eval_swap! { 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16 }

macro_rules! eval_log {
	($($num:expr),*) => {
		$(paste::paste! {
			/// `LOGn`
			pub fn [<eval_log $num>]<H: Host, L: StepListener>(
				frame: &mut Frame,
				handle: &mut Handle<'_, H, L>,
				_position: usize,
			) -> Control {
				self::system::log(frame, $num, handle.host)
			}
		})*
	};
}

eval_log! { 0, 1, 2, 3, 4 }

/// `CREATE`
pub fn eval_create<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::call_create::create(frame, handle, CallKind::Create)
}

/// `CREATE2`
pub fn eval_create2<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::call_create::create(frame, handle, CallKind::Create2)
}

/// `CALL`
pub fn eval_call<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::call_create::call(frame, handle, CallKind::Call)
}

/// `CALLCODE`
pub fn eval_callcode<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::call_create::call(frame, handle, CallKind::CallCode)
}

/// `DELEGATECALL`
pub fn eval_delegatecall<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::call_create::call(frame, handle, CallKind::DelegateCall)
}

/// `STATICCALL`
pub fn eval_staticcall<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::call_create::call(frame, handle, CallKind::StaticCall)
}

/// `RETURN`
pub fn eval_return<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::misc::ret(frame)
}

/// `REVERT`
pub fn eval_revert<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::misc::revert(frame)
}

/// `INVALID`
pub fn eval_invalid<H: Host, L: StepListener>(
	frame: &mut Frame,
	_handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::invalid(frame)
}

/// `SELFDESTRUCT`
pub fn eval_selfdestruct<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	_position: usize,
) -> Control {
	self::system::selfdestruct(frame, handle.host)
}

/// The `PUSH1`..`PUSH32` family, indexed by immediate size minus one.
pub(crate) fn push_evals<H: Host, L: StepListener>() -> [Efn<H, L>; 32] {
	[
		eval_push1, eval_push2, eval_push3, eval_push4, eval_push5, eval_push6, eval_push7,
		eval_push8, eval_push9, eval_push10, eval_push11, eval_push12, eval_push13, eval_push14,
		eval_push15, eval_push16, eval_push17, eval_push18, eval_push19, eval_push20, eval_push21,
		eval_push22, eval_push23, eval_push24, eval_push25, eval_push26, eval_push27, eval_push28,
		eval_push29, eval_push30, eval_push31, eval_push32,
	]
}

/// The `DUP1`..`DUP16` family.
pub(crate) fn dup_evals<H: Host, L: StepListener>() -> [Efn<H, L>; 16] {
	[
		eval_dup1, eval_dup2, eval_dup3, eval_dup4, eval_dup5, eval_dup6, eval_dup7, eval_dup8,
		eval_dup9, eval_dup10, eval_dup11, eval_dup12, eval_dup13, eval_dup14, eval_dup15,
		eval_dup16,
	]
}

/// The `SWAP1`..`SWAP16` family.
pub(crate) fn swap_evals<H: Host, L: StepListener>() -> [Efn<H, L>; 16] {
	[
		eval_swap1, eval_swap2, eval_swap3, eval_swap4, eval_swap5, eval_swap6, eval_swap7,
		eval_swap8, eval_swap9, eval_swap10, eval_swap11, eval_swap12, eval_swap13, eval_swap14,
		eval_swap15, eval_swap16,
	]
}

/// The `LOG0`..`LOG4` family.
pub(crate) fn log_evals<H: Host, L: StepListener>() -> [Efn<H, L>; 5] {
	[eval_log0, eval_log1, eval_log2, eval_log3, eval_log4]
}
