//! Core execution layer for the ethvm EVM implementation.
//!
//! The crate is organized leaves-first: [`Stack`], [`Memory`] and
//! [`Gasometer`] are the per-frame resources, [`OpcodeTable`] maps opcode
//! bytes to handlers for a given fork, the [`runtime`] module defines the
//! world-state surface ([`runtime::Host`]) together with the buffering
//! [`OverlayedHost`], and [`execute`] ties everything into the
//! fetch-decode-execute loop.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod error;
mod etable;
pub mod eval;
mod fork;
pub mod gas;
mod gasometer;
mod interpreter;
mod memory;
mod opcode;
mod overlay;
pub mod runtime;
mod stack;
pub mod utils;
mod valids;

pub use crate::error::{
	ExitError, ExitException, ExitFatal, ExitResult, ExitSucceed, StatusCode,
};
pub use crate::etable::{Control, Efn, InstructionMeta, OpcodeTable};
pub use crate::fork::{Config, Fork};
pub use crate::gasometer::Gasometer;
pub use crate::interpreter::{
	execute, execute_with, ExecutionResult, Handle, NoListener, StepListener,
};
pub use crate::memory::Memory;
pub use crate::opcode::Opcode;
pub use crate::overlay::{OverlayedChangeSet, OverlayedHost};
pub use crate::runtime::{
	Backend, CallKind, Context, Environment, Host, Log, Message, NoPrecompiles, PrecompileOutcome,
	PrecompileSet, Transfer,
};
pub use crate::stack::Stack;
pub use crate::valids::Valids;

use alloc::rc::Rc;
use alloc::vec::Vec;

/// A single execution frame. Each nested call or create runs in a frame of
/// its own, owning its stack, memory and gas meter exclusively.
pub struct Frame {
	code: Rc<Vec<u8>>,
	data: Rc<Vec<u8>>,
	/// Bytes returned by this frame through `RETURN` or `REVERT`.
	pub retval: Vec<u8>,
	/// Return buffer of the most recent sub-call, read by the
	/// `RETURNDATA*` opcodes. Cleared at every call boundary.
	pub retbuf: Vec<u8>,
	/// Frame memory.
	pub memory: Memory,
	/// Frame operand stack.
	pub stack: Stack,
	/// Frame gas meter.
	pub gasometer: Gasometer,
	/// Execution context: the executing address, its caller and the
	/// apparent transferred value.
	pub context: Context,
	/// Call depth of this frame, starting at zero.
	pub depth: u32,
	/// Whether this frame is a descendant of a `STATICCALL`.
	pub is_static: bool,
}

impl Frame {
	/// Create a new frame executing `code` over `data`.
	pub fn new(
		code: Rc<Vec<u8>>,
		data: Rc<Vec<u8>>,
		gas_limit: u64,
		context: Context,
		depth: u32,
		is_static: bool,
		config: &Config,
	) -> Self {
		Self {
			code,
			data,
			retval: Vec::new(),
			retbuf: Vec::new(),
			memory: Memory::new(config.memory_limit()),
			stack: Stack::new(config.stack_limit()),
			gasometer: Gasometer::new(gas_limit),
			context,
			depth,
			is_static,
		}
	}

	/// Frame code.
	pub fn code(&self) -> &[u8] {
		&self.code
	}

	/// Frame input data.
	pub fn data(&self) -> &[u8] {
		&self.data
	}
}
