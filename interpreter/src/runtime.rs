//! The world-state surface the interpreter executes against.
//!
//! The interpreter is agnostic of how state is stored. An authoritative,
//! read-only [`Backend`] supplies accounts; during execution all mutation
//! goes through a [`Host`], which buffers writes transactionally (see
//! [`crate::OverlayedHost`]) so that nested frames can commit or discard
//! atomically.

use alloc::vec::Vec;

use primitive_types::{H160, H256, U256};

use crate::error::ExitError;
use crate::fork::Config;

/// Kind of a call message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CallKind {
	Call,
	CallCode,
	DelegateCall,
	StaticCall,
	Create,
	Create2,
}

/// A message initiating one execution frame.
#[derive(Clone, Debug)]
pub struct Message {
	/// Kind of the message.
	pub kind: CallKind,
	/// Call depth of the frame the message creates.
	pub depth: u32,
	/// Gas available to the frame.
	pub gas: u64,
	/// Account the message originates from.
	pub sender: H160,
	/// Account the message executes as.
	pub destination: H160,
	/// Value transferred with, or apparent to, the message.
	pub value: U256,
	/// Input data of the frame.
	pub input: Vec<u8>,
	/// Salt of a `CREATE2` message.
	pub salt: Option<H256>,
	/// Whether the frame executes under static restrictions.
	pub is_static: bool,
}

impl Message {
	/// A plain depth-zero call message, the common entry shape.
	pub fn call(sender: H160, destination: H160, value: U256, input: Vec<u8>, gas: u64) -> Self {
		Self {
			kind: CallKind::Call,
			depth: 0,
			gas,
			sender,
			destination,
			value,
			input,
			salt: None,
			is_static: false,
		}
	}
}

/// Execution context of a frame.
#[derive(Clone, Debug)]
pub struct Context {
	/// The executing address.
	pub address: H160,
	/// The calling address.
	pub caller: H160,
	/// The apparent value, as observed by `CALLVALUE`.
	pub apparent_value: U256,
}

/// A log record emitted by `LOG0`..`LOG4`. Immutable once recorded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Log {
	/// Address the log was emitted from.
	pub address: H160,
	/// Zero to four topic words.
	pub topics: Vec<H256>,
	/// Opaque payload.
	pub data: Vec<u8>,
}

/// Transfer from source to target, with given value.
#[derive(Clone, Debug)]
pub struct Transfer {
	/// Source address.
	pub source: H160,
	/// Target address.
	pub target: H160,
	/// Transferred value.
	pub value: U256,
}

/// Block and transaction environment, read-only during execution.
pub trait Environment {
	/// Hash of a historical block.
	fn block_hash(&self, number: U256) -> H256;
	/// Current block number.
	fn block_number(&self) -> U256;
	/// Current block beneficiary.
	fn block_coinbase(&self) -> H160;
	/// Current block timestamp.
	fn block_timestamp(&self) -> U256;
	/// Current block difficulty.
	fn block_difficulty(&self) -> U256;
	/// Current block gas limit.
	fn block_gas_limit(&self) -> U256;
	/// Chain identifier.
	fn chain_id(&self) -> U256;
	/// Transaction origin.
	fn origin(&self) -> H160;
	/// Transaction gas price.
	fn gas_price(&self) -> U256;
}

/// Authoritative world state underneath the overlay. Only read during
/// execution; all writes land in overlays.
pub trait Backend: Environment {
	/// Whether an account exists.
	fn exists(&self, address: H160) -> bool;
	/// Balance of an account, zero when absent.
	fn balance(&self, address: H160) -> U256;
	/// Nonce of an account, zero when absent.
	fn nonce(&self, address: H160) -> u64;
	/// Code of an account, empty when absent.
	fn code(&self, address: H160) -> Vec<u8>;
	/// Storage value of an account at a key, zero when absent.
	fn storage(&self, address: H160, key: H256) -> H256;
}

/// The full world surface a frame executes against: read-through state
/// access, buffered writes, warm-access bookkeeping, and the snapshot
/// machinery call frames use for atomicity.
pub trait Host: Environment {
	/// Whether an account exists.
	fn exists(&self, address: H160) -> bool;
	/// Whether an account is empty: zero balance, zero nonce, no code.
	fn is_empty(&self, address: H160) -> bool;
	/// Balance of an account.
	fn balance(&self, address: H160) -> U256;
	/// Nonce of an account.
	fn nonce(&self, address: H160) -> u64;
	/// Code of an account.
	fn code(&self, address: H160) -> Vec<u8>;
	/// Code size of an account.
	fn code_size(&self, address: H160) -> U256 {
		U256::from(self.code(address).len())
	}
	/// Code hash of an account; zero for absent or empty accounts.
	fn code_hash(&self, address: H160) -> H256;
	/// Current storage value.
	fn storage(&self, address: H160, key: H256) -> H256;
	/// Storage value as of the start of the transaction, needed by the
	/// net `SSTORE` schedule.
	fn committed_storage(&self, address: H160, key: H256) -> H256;
	/// Whether an account was marked for destruction this transaction.
	fn deleted(&self, address: H160) -> bool;

	/// Buffer a storage write.
	fn set_storage(&mut self, address: H160, key: H256, value: H256);
	/// Buffer a code write.
	fn set_code(&mut self, address: H160, code: Vec<u8>);
	/// Buffer a balance overwrite.
	fn set_balance(&mut self, address: H160, balance: U256);
	/// Add to an account balance.
	fn deposit(&mut self, target: H160, value: U256);
	/// Subtract from an account balance, failing on insufficient funds.
	fn withdrawal(&mut self, source: H160, value: U256) -> Result<(), ExitError>;
	/// Move value between accounts.
	fn transfer(&mut self, transfer: Transfer) -> Result<(), ExitError> {
		self.withdrawal(transfer.source, transfer.value)?;
		self.deposit(transfer.target, transfer.value);
		Ok(())
	}
	/// Increment an account nonce.
	fn inc_nonce(&mut self, address: H160) -> Result<(), ExitError>;
	/// Clear the storage of an account about to be created.
	fn reset_storage(&mut self, address: H160);
	/// Record a log.
	fn log(&mut self, log: Log);
	/// Move the full balance of `address` to `beneficiary` and mark the
	/// account for destruction at the end of the transaction.
	fn selfdestruct(&mut self, address: H160, beneficiary: H160) -> Result<(), ExitError>;

	/// Mark an account warm. Returns whether it was cold.
	fn warm_up_account(&mut self, address: H160) -> bool;
	/// Mark a storage slot warm. Returns whether it was cold.
	fn warm_up_storage(&mut self, address: H160, key: H256) -> bool;

	/// Open a nested write buffer and return a handle to restore it.
	fn snapshot(&mut self) -> usize;
	/// Merge the newest write buffer into its parent.
	fn commit(&mut self);
	/// Discard write buffers down to the given snapshot handle.
	fn revert_to(&mut self, snapshot: usize);
}

/// Outcome of running a precompiled contract.
pub struct PrecompileOutcome {
	/// Exit reason of the precompile frame.
	pub result: crate::error::ExitResult,
	/// Gas left from the forwarded gas.
	pub gas_left: u64,
	/// Output bytes.
	pub output: Vec<u8>,
}

/// The precompiled contracts available to call opcodes. Keyed by address;
/// availability and pricing depend on the fork configuration.
pub trait PrecompileSet {
	/// Execute the precompile at `address`, or return `None` when the
	/// address is not a precompile under `config`.
	fn execute(
		&self,
		address: H160,
		input: &[u8],
		gas_limit: u64,
		config: &Config,
	) -> Option<PrecompileOutcome>;
}

/// An empty precompile set.
pub struct NoPrecompiles;

impl PrecompileSet for NoPrecompiles {
	fn execute(
		&self,
		_address: H160,
		_input: &[u8],
		_gas_limit: u64,
		_config: &Config,
	) -> Option<PrecompileOutcome> {
		None
	}
}
