//! Transactional overlay over an authoritative backend.
//!
//! Writes land in the newest substate; reads cascade substate by substate
//! down to the backend. Call frames snapshot before entering a child and
//! either commit (merging the child substate into its parent) or revert
//! (dropping it). Warm-access marks live in the substates too, so a
//! reverted frame also reverts the addresses and slots it warmed.

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::mem;

use primitive_types::{H160, H256, U256};
use sha3::{Digest, Keccak256};

use crate::error::{ExitError, ExitException};
use crate::runtime::{Backend, Environment, Host, Log};

/// Everything a finished transaction wants to write back to the
/// authoritative store, drained out of an [`OverlayedHost`].
#[derive(Clone, Debug)]
pub struct OverlayedChangeSet {
	/// Logs recorded by committed frames.
	pub logs: Vec<Log>,
	/// Final balances of touched accounts.
	pub balances: BTreeMap<H160, U256>,
	/// Final codes of created accounts.
	pub codes: BTreeMap<H160, Vec<u8>>,
	/// Final nonces of touched accounts.
	pub nonces: BTreeMap<H160, u64>,
	/// Accounts whose storage was cleared before (re-)creation.
	pub storage_resets: BTreeSet<H160>,
	/// Final storage writes.
	pub storages: BTreeMap<(H160, H256), H256>,
	/// Accounts destroyed by `SELFDESTRUCT`.
	pub deletes: BTreeSet<H160>,
	/// Addresses and storage slots warmed during the transaction.
	pub accessed: BTreeSet<(H160, Option<H256>)>,
}

/// A [`Host`] buffering all writes in a stack of substates on top of a
/// read-only [`Backend`].
pub struct OverlayedHost<B> {
	backend: B,
	substate: Box<Substate>,
	depth: usize,
}

impl<B: Backend> OverlayedHost<B> {
	/// Wrap a backend with an empty overlay.
	pub fn new(backend: B) -> Self {
		Self {
			backend,
			substate: Box::new(Substate::new()),
			depth: 0,
		}
	}

	/// The wrapped backend.
	pub fn backend(&self) -> &B {
		&self.backend
	}

	/// Drain the overlay into a change set, returning the backend. Any
	/// still-open substates are committed first.
	pub fn deconstruct(mut self) -> (B, OverlayedChangeSet) {
		while self.depth > 0 {
			self.commit();
		}

		let substate = *self.substate;
		(
			self.backend,
			OverlayedChangeSet {
				logs: substate.logs,
				balances: substate.balances,
				codes: substate.codes,
				nonces: substate.nonces,
				storage_resets: substate.storage_resets,
				storages: substate.storages,
				deletes: substate.deletes,
				accessed: substate.accessed,
			},
		)
	}
}

impl<B: Environment> Environment for OverlayedHost<B> {
	fn block_hash(&self, number: U256) -> H256 {
		self.backend.block_hash(number)
	}

	fn block_number(&self) -> U256 {
		self.backend.block_number()
	}

	fn block_coinbase(&self) -> H160 {
		self.backend.block_coinbase()
	}

	fn block_timestamp(&self) -> U256 {
		self.backend.block_timestamp()
	}

	fn block_difficulty(&self) -> U256 {
		self.backend.block_difficulty()
	}

	fn block_gas_limit(&self) -> U256 {
		self.backend.block_gas_limit()
	}

	fn chain_id(&self) -> U256 {
		self.backend.chain_id()
	}

	fn origin(&self) -> H160 {
		self.backend.origin()
	}

	fn gas_price(&self) -> U256 {
		self.backend.gas_price()
	}
}

impl<B: Backend> Host for OverlayedHost<B> {
	fn exists(&self, address: H160) -> bool {
		if let Some(exists) = self.substate.known_exists(address) {
			exists
		} else {
			self.backend.exists(address)
		}
	}

	fn is_empty(&self, address: H160) -> bool {
		self.balance(address) == U256::zero()
			&& self.nonce(address) == 0
			&& self.code(address).is_empty()
	}

	fn balance(&self, address: H160) -> U256 {
		if let Some(balance) = self.substate.known_balance(address) {
			balance
		} else {
			self.backend.balance(address)
		}
	}

	fn nonce(&self, address: H160) -> u64 {
		if let Some(nonce) = self.substate.known_nonce(address) {
			nonce
		} else {
			self.backend.nonce(address)
		}
	}

	fn code(&self, address: H160) -> Vec<u8> {
		if let Some(code) = self.substate.known_code(address) {
			code
		} else {
			self.backend.code(address)
		}
	}

	fn code_hash(&self, address: H160) -> H256 {
		if !self.exists(address) || self.is_empty(address) {
			return H256::zero();
		}

		H256::from_slice(Keccak256::digest(self.code(address)).as_slice())
	}

	fn storage(&self, address: H160, key: H256) -> H256 {
		if let Some(value) = self.substate.known_storage(address, key) {
			value
		} else {
			self.backend.storage(address, key)
		}
	}

	fn committed_storage(&self, address: H160, key: H256) -> H256 {
		if let Some(value) = self.substate.known_committed_storage(address) {
			value
		} else {
			self.backend.storage(address, key)
		}
	}

	fn deleted(&self, address: H160) -> bool {
		self.substate.deleted(address)
	}

	fn set_storage(&mut self, address: H160, key: H256, value: H256) {
		self.substate.storages.insert((address, key), value);
	}

	fn set_code(&mut self, address: H160, code: Vec<u8>) {
		self.substate.codes.insert(address, code);
	}

	fn set_balance(&mut self, address: H160, balance: U256) {
		self.substate.balances.insert(address, balance);
	}

	fn deposit(&mut self, target: H160, value: U256) {
		if value == U256::zero() {
			return;
		}

		let current = self.balance(target);
		self.substate
			.balances
			.insert(target, current.saturating_add(value));
	}

	fn withdrawal(&mut self, source: H160, value: U256) -> Result<(), ExitError> {
		if value == U256::zero() {
			return Ok(());
		}

		let current = self.balance(source);
		if current < value {
			return Err(ExitException::OutOfFund.into());
		}
		self.substate.balances.insert(source, current - value);
		Ok(())
	}

	fn inc_nonce(&mut self, address: H160) -> Result<(), ExitError> {
		let nonce = self.nonce(address);
		if nonce == u64::MAX {
			return Err(ExitException::MaxNonce.into());
		}
		self.substate.nonces.insert(address, nonce + 1);
		Ok(())
	}

	fn reset_storage(&mut self, address: H160) {
		self.substate.storage_resets.insert(address);
	}

	fn log(&mut self, log: Log) {
		self.substate.logs.push(log);
	}

	fn selfdestruct(&mut self, address: H160, beneficiary: H160) -> Result<(), ExitError> {
		let balance = self.balance(address);
		self.deposit(beneficiary, balance);
		// a self-beneficiary burns the balance
		self.set_balance(address, U256::zero());
		self.substate.deletes.insert(address);
		Ok(())
	}

	fn warm_up_account(&mut self, address: H160) -> bool {
		let was_cold = !self.substate.accessed_contains(address, None);
		self.substate.accessed.insert((address, None));
		was_cold
	}

	fn warm_up_storage(&mut self, address: H160, key: H256) -> bool {
		let was_cold = !self.substate.accessed_contains(address, Some(key));
		self.substate.accessed.insert((address, Some(key)));
		was_cold
	}

	fn snapshot(&mut self) -> usize {
		let mut parent = Box::new(Substate::new());
		mem::swap(&mut parent, &mut self.substate);
		self.substate.parent = Some(parent);
		self.depth += 1;
		self.depth
	}

	fn commit(&mut self) {
		self.pop_substate(true);
	}

	fn revert_to(&mut self, snapshot: usize) {
		while self.depth >= snapshot && self.depth > 0 {
			self.pop_substate(false);
		}
	}
}

impl<B> OverlayedHost<B> {
	fn pop_substate(&mut self, keep: bool) {
		let Some(mut parent) = self.substate.parent.take() else {
			return;
		};
		mem::swap(&mut parent, &mut self.substate);
		let child = parent;
		self.depth -= 1;

		if !keep {
			return;
		}

		self.substate.logs.extend(child.logs);
		self.substate.balances.extend(child.balances);
		self.substate.codes.extend(child.codes);
		self.substate.nonces.extend(child.nonces);
		self.substate.storage_resets.extend(child.storage_resets);
		self.substate.storages.extend(child.storages);
		self.substate.deletes.extend(child.deletes);
		self.substate.accessed.extend(child.accessed);
	}
}

struct Substate {
	parent: Option<Box<Substate>>,
	logs: Vec<Log>,
	balances: BTreeMap<H160, U256>,
	codes: BTreeMap<H160, Vec<u8>>,
	nonces: BTreeMap<H160, u64>,
	storage_resets: BTreeSet<H160>,
	storages: BTreeMap<(H160, H256), H256>,
	deletes: BTreeSet<H160>,
	accessed: BTreeSet<(H160, Option<H256>)>,
}

impl Substate {
	fn new() -> Self {
		Self {
			parent: None,
			logs: Vec::new(),
			balances: BTreeMap::new(),
			codes: BTreeMap::new(),
			nonces: BTreeMap::new(),
			storage_resets: BTreeSet::new(),
			storages: BTreeMap::new(),
			deletes: BTreeSet::new(),
			accessed: BTreeSet::new(),
		}
	}

	fn known_balance(&self, address: H160) -> Option<U256> {
		if let Some(balance) = self.balances.get(&address) {
			Some(*balance)
		} else if let Some(parent) = self.parent.as_ref() {
			parent.known_balance(address)
		} else {
			None
		}
	}

	fn known_code(&self, address: H160) -> Option<Vec<u8>> {
		if let Some(code) = self.codes.get(&address) {
			Some(code.clone())
		} else if let Some(parent) = self.parent.as_ref() {
			parent.known_code(address)
		} else {
			None
		}
	}

	fn known_nonce(&self, address: H160) -> Option<u64> {
		if let Some(nonce) = self.nonces.get(&address) {
			Some(*nonce)
		} else if let Some(parent) = self.parent.as_ref() {
			parent.known_nonce(address)
		} else {
			None
		}
	}

	fn known_storage(&self, address: H160, key: H256) -> Option<H256> {
		if let Some(value) = self.storages.get(&(address, key)) {
			Some(*value)
		} else if self.storage_resets.contains(&address) {
			Some(H256::zero())
		} else if let Some(parent) = self.parent.as_ref() {
			parent.known_storage(address, key)
		} else {
			None
		}
	}

	// The pre-transaction value is the backend's, unless the account's
	// storage was wiped for a re-create inside this transaction.
	fn known_committed_storage(&self, address: H160) -> Option<H256> {
		if self.storage_resets.contains(&address) {
			Some(H256::zero())
		} else if let Some(parent) = self.parent.as_ref() {
			parent.known_committed_storage(address)
		} else {
			None
		}
	}

	fn known_exists(&self, address: H160) -> Option<bool> {
		if self.balances.contains_key(&address)
			|| self.nonces.contains_key(&address)
			|| self.codes.contains_key(&address)
		{
			Some(true)
		} else if let Some(parent) = self.parent.as_ref() {
			parent.known_exists(address)
		} else {
			None
		}
	}

	fn deleted(&self, address: H160) -> bool {
		if self.deletes.contains(&address) {
			true
		} else if let Some(parent) = self.parent.as_ref() {
			parent.deleted(address)
		} else {
			false
		}
	}

	fn accessed_contains(&self, address: H160, key: Option<H256>) -> bool {
		if self.accessed.contains(&(address, key)) {
			true
		} else if let Some(parent) = self.parent.as_ref() {
			parent.accessed_contains(address, key)
		} else {
			false
		}
	}
}
