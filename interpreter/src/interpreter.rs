//! The fetch-decode-execute loop.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::mem;

use crate::error::{
	ExitError, ExitException, ExitResult, ExitSucceed, StatusCode,
};
use crate::etable::{Control, OpcodeTable};
use crate::fork::{Config, Fork};
use crate::gas;
use crate::opcode::Opcode;
use crate::runtime::{Context, Host, Message, NoPrecompiles, PrecompileSet};
use crate::valids::Valids;
use crate::Frame;

/// Hook invoked after every executed instruction. Implementations
/// returning `true` terminate the frame with status `Halted`; this is
/// the only supported external cancellation.
///
/// The run loop is monomorphized over the listener, so a [`NoListener`]
/// costs nothing.
pub trait StepListener {
	fn on_step(&mut self, frame: &Frame, opcode: Opcode, position: usize) -> bool;
}

/// A listener observing nothing.
pub struct NoListener;

impl StepListener for NoListener {
	#[inline]
	fn on_step(&mut self, _frame: &Frame, _opcode: Opcode, _position: usize) -> bool {
		false
	}
}

/// Everything an instruction handler can reach besides its frame. Passed
/// down unchanged on the nested call path, so the host never holds a
/// back-reference to the interpreter.
pub struct Handle<'h, H, L> {
	/// The world state surface.
	pub host: &'h mut H,
	/// The active fork configuration.
	pub config: &'static Config,
	/// The dispatch table of the active fork.
	pub table: &'h OpcodeTable<H, L>,
	/// The precompiled contracts reachable from call opcodes.
	pub precompiles: &'h dyn PrecompileSet,
	/// The step listener.
	pub listener: &'h mut L,
}

/// Typed result of one execution, as returned by [`execute`].
#[derive(Clone, Debug)]
pub struct ExecutionResult {
	/// Status code, with the stable integer values of
	/// [`StatusCode::code`].
	pub status: StatusCode,
	/// The precise exit reason behind the status.
	pub exit: ExitResult,
	/// Gas remaining. Zero for every status except `Success` and
	/// `Revert`, which hand unused gas back.
	pub gas_left: u64,
	/// Accumulated refund, to be applied (capped) at the transaction
	/// boundary by the caller.
	pub gas_refund: i64,
	/// Output bytes. Only `Success` and `Revert` produce output.
	pub output: Vec<u8>,
}

impl ExecutionResult {
	/// Gas remaining once the capped refund is applied, the way a
	/// transaction boundary settles it: at most `used / quotient` of the
	/// accumulated refund counter is handed back.
	pub fn gas_left_with_refund(&self, gas_limit: u64, config: &Config) -> u64 {
		let used = gas_limit.saturating_sub(self.gas_left);
		let refund = core::cmp::min(
			used / config.max_refund_quotient(),
			self.gas_refund.max(0) as u64,
		);
		self.gas_left + refund
	}
}

/// Execute `code` against `message`, resolving the fork to its opcode
/// table and gas schedule. No precompiles, no tracing.
pub fn execute<H: Host>(
	host: &mut H,
	fork: Fork,
	message: Message,
	code: Vec<u8>,
) -> ExecutionResult {
	execute_with(host, fork, &NoPrecompiles, &mut NoListener, message, code)
}

/// [`execute`], with an explicit precompile set and step listener.
pub fn execute_with<H: Host, L: StepListener>(
	host: &mut H,
	fork: Fork,
	precompiles: &dyn PrecompileSet,
	listener: &mut L,
	message: Message,
	code: Vec<u8>,
) -> ExecutionResult {
	let config = fork.config();

	if message.depth > config.call_stack_limit() {
		let exit: ExitResult = Err(ExitException::CallDepthExceeded.into());
		return ExecutionResult {
			status: StatusCode::from(&exit),
			exit,
			gas_left: 0,
			gas_refund: 0,
			output: Vec::new(),
		};
	}

	let table = OpcodeTable::<H, L>::for_config(config);
	let context = Context {
		address: message.destination,
		caller: message.sender,
		apparent_value: message.value,
	};
	let mut frame = Frame::new(
		Rc::new(code),
		Rc::new(message.input),
		message.gas,
		context,
		message.depth,
		message.is_static,
		config,
	);

	let mut handle = Handle {
		host,
		config,
		table: &table,
		precompiles,
		listener,
	};

	let result = run(&mut frame, &mut handle);
	finish(frame, result)
}

/// Run a frame to completion against the handle. Used both for the
/// outermost frame and, recursively, by the call and create handlers.
pub(crate) fn run<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
) -> ExitResult {
	let valids = Valids::new(frame.code());
	let table = handle.table;
	let mut position = 0usize;

	loop {
		// running off the end of code is an implicit STOP
		if position >= frame.code().len() {
			return Ok(ExitSucceed::Stopped);
		}

		let opcode = Opcode(frame.code()[position]);
		let Some(meta) = table.get(opcode) else {
			return Err(ExitException::UndefinedInstruction(opcode).into());
		};
		let meta = *meta;

		if frame.stack.len() < meta.min_stack {
			return Err(ExitException::StackUnderflow.into());
		}
		if meta.writes_state && frame.is_static {
			return Err(ExitException::StaticModeViolation.into());
		}

		gas::charge(frame, handle.host, handle.config, opcode)?;

		let control = (meta.eval)(frame, handle, position);

		if handle.listener.on_step(frame, opcode, position) {
			return Err(ExitException::Halted.into());
		}

		match control {
			Control::Continue(n) => position += n,
			Control::Jump(dest) => {
				if valids.is_valid(dest) {
					position = dest;
				} else {
					return Err(ExitException::BadJumpDestination.into());
				}
			}
			Control::Exit(result) => return result,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloc::vec;

	#[test]
	fn refund_is_capped_by_gas_used() {
		let result = ExecutionResult {
			status: StatusCode::Success,
			exit: Ok(ExitSucceed::Stopped),
			gas_left: 90_000,
			gas_refund: 15_000,
			output: vec![],
		};

		// only half the used gas may return as refund
		let config = Fork::Berlin.config();
		assert_eq!(result.gas_left_with_refund(100_000, config), 95_000);

		let small_refund = ExecutionResult {
			gas_refund: 2_000,
			..result
		};
		assert_eq!(small_refund.gas_left_with_refund(100_000, config), 92_000);
	}
}

fn finish(mut frame: Frame, result: ExitResult) -> ExecutionResult {
	// exceptional halts consume the frame's gas; success and revert hand
	// the rest back
	match &result {
		Ok(_) | Err(ExitError::Reverted) => {}
		Err(_) => frame.gasometer.burn(),
	}

	let output = match &result {
		Ok(ExitSucceed::Returned) | Err(ExitError::Reverted) => mem::take(&mut frame.retval),
		_ => Vec::new(),
	};

	ExecutionResult {
		status: StatusCode::from(&result),
		gas_left: frame.gasometer.gas(),
		gas_refund: frame.gasometer.refunded_gas(),
		output,
		exit: result,
	}
}
