//! Exit reasons and the stable status codes exposed to callers.

use crate::opcode::Opcode;

/// Outcome of a frame, either a success reason or an error.
pub type ExitResult = Result<ExitSucceed, ExitError>;

/// Exit reason of a non-successful frame.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExitError {
	/// A normal EVM exceptional halt. Consumes all gas of the frame.
	Exception(ExitException),
	/// An explicit `REVERT`. The frame's output is preserved and unused
	/// gas is returned to the caller.
	Reverted,
	/// An error outside normal EVM semantics, such as the host running
	/// out of memory. Never caught by a parent frame.
	Fatal(ExitFatal),
}

/// Exit success reason.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExitSucceed {
	/// An explicit `STOP`, or execution ran off the end of code.
	Stopped,
	/// An explicit `RETURN`.
	Returned,
	/// An explicit `SELFDESTRUCT`.
	SelfDestructed,
}

/// Exceptional halt reason.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExitException {
	/// Gas charge exceeded the remaining gas.
	OutOfGas,
	/// The designated invalid opcode `0xfe` was executed.
	InvalidInstruction,
	/// An opcode byte with no handler at the executing fork.
	UndefinedInstruction(Opcode),
	/// Push at the stack limit.
	StackOverflow,
	/// Pop or peek past the bottom of the stack.
	StackUnderflow,
	/// Jump target is not a reachable `JUMPDEST`.
	BadJumpDestination,
	/// A memory or return-data range is out of bounds.
	InvalidMemoryAccess,
	/// A call or create was attempted beyond the depth limit.
	CallDepthExceeded,
	/// A state-modifying opcode inside a static frame.
	StaticModeViolation,
	/// A precompiled contract rejected its input.
	PrecompileFailure,
	/// Created code failed deployment validation.
	ContractValidation,
	/// An operand is outside the range an operation accepts.
	ArgumentOutOfRange,
	/// Not enough balance to perform a transfer.
	OutOfFund,
	/// Create destination already has code or a nonce.
	CreateCollision,
	/// Nonce reached its maximum value.
	MaxNonce,
	/// Execution was stopped by a step listener.
	Halted,
}

/// Fatal error reason.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExitFatal {
	/// The host cannot allocate the memory the frame requires.
	OutOfMemory,
	/// The execution request was rejected before the first instruction.
	Rejected,
	/// An internal invariant was violated. Surfaced, never hidden.
	Internal(&'static str),
}

impl From<ExitError> for ExitResult {
	fn from(err: ExitError) -> Self {
		Err(err)
	}
}

impl From<ExitSucceed> for ExitResult {
	fn from(s: ExitSucceed) -> Self {
		Ok(s)
	}
}

impl From<ExitException> for ExitError {
	fn from(e: ExitException) -> Self {
		Self::Exception(e)
	}
}

impl From<ExitException> for ExitResult {
	fn from(e: ExitException) -> Self {
		Err(ExitError::Exception(e))
	}
}

impl From<ExitFatal> for ExitError {
	fn from(e: ExitFatal) -> Self {
		Self::Fatal(e)
	}
}

impl From<ExitFatal> for ExitResult {
	fn from(e: ExitFatal) -> Self {
		Err(ExitError::Fatal(e))
	}
}

#[cfg(feature = "std")]
impl std::fmt::Display for ExitError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self)
	}
}

#[cfg(feature = "std")]
impl std::error::Error for ExitError {}

/// Status code of an [`crate::ExecutionResult`]. The integer values are
/// stable and part of the public interface.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(i32)]
pub enum StatusCode {
	Success = 0,
	Failure = 1,
	Revert = 2,
	OutOfGas = 3,
	InvalidInstruction = 4,
	UndefinedInstruction = 5,
	StackOverflow = 6,
	StackUnderflow = 7,
	BadJumpDestination = 8,
	InvalidMemoryAccess = 9,
	CallDepthExceeded = 10,
	StaticModeViolation = 11,
	PrecompileFailure = 12,
	ContractValidationFailure = 13,
	ArgumentOutOfRange = 14,
	Halted = 17,
	InternalError = -1,
	Rejected = -2,
	OutOfMemory = -3,
}

impl StatusCode {
	/// The stable integer value of the status code.
	#[must_use]
	pub const fn code(self) -> i32 {
		self as i32
	}

	/// Whether the status represents a successfully committed frame.
	#[must_use]
	pub const fn is_success(self) -> bool {
		matches!(self, Self::Success)
	}
}

impl From<&ExitResult> for StatusCode {
	fn from(result: &ExitResult) -> Self {
		match result {
			Ok(_) => Self::Success,
			Err(ExitError::Reverted) => Self::Revert,
			Err(ExitError::Exception(e)) => match e {
				ExitException::OutOfGas => Self::OutOfGas,
				ExitException::InvalidInstruction => Self::InvalidInstruction,
				ExitException::UndefinedInstruction(_) => Self::UndefinedInstruction,
				ExitException::StackOverflow => Self::StackOverflow,
				ExitException::StackUnderflow => Self::StackUnderflow,
				ExitException::BadJumpDestination => Self::BadJumpDestination,
				ExitException::InvalidMemoryAccess => Self::InvalidMemoryAccess,
				ExitException::CallDepthExceeded => Self::CallDepthExceeded,
				ExitException::StaticModeViolation => Self::StaticModeViolation,
				ExitException::PrecompileFailure => Self::PrecompileFailure,
				ExitException::ContractValidation => Self::ContractValidationFailure,
				ExitException::ArgumentOutOfRange => Self::ArgumentOutOfRange,
				ExitException::Halted => Self::Halted,
				ExitException::OutOfFund
				| ExitException::CreateCollision
				| ExitException::MaxNonce => Self::Failure,
			},
			Err(ExitError::Fatal(f)) => match f {
				ExitFatal::OutOfMemory => Self::OutOfMemory,
				ExitFatal::Rejected => Self::Rejected,
				ExitFatal::Internal(_) => Self::InternalError,
			},
		}
	}
}
