use std::collections::BTreeMap;

use ethvm_interpreter::runtime::{Backend, Environment};
use ethvm_interpreter::OverlayedChangeSet;
use primitive_types::{H160, H256, U256};

#[derive(Clone, Debug)]
pub struct InMemoryEnvironment {
	pub block_hashes: BTreeMap<U256, H256>,
	pub block_number: U256,
	pub block_coinbase: H160,
	pub block_timestamp: U256,
	pub block_difficulty: U256,
	pub block_gas_limit: U256,
	pub chain_id: U256,
	pub origin: H160,
	pub gas_price: U256,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InMemoryAccount {
	pub balance: U256,
	pub code: Vec<u8>,
	pub nonce: u64,
	pub storage: BTreeMap<H256, H256>,
}

/// Authoritative store for test execution, wrapped by the overlay.
#[derive(Clone, Debug)]
pub struct InMemoryBackend {
	pub environment: InMemoryEnvironment,
	pub state: BTreeMap<H160, InMemoryAccount>,
}

impl InMemoryBackend {
	/// Write a finished transaction's change set back into the store.
	pub fn apply_change_set(&mut self, changeset: &OverlayedChangeSet) {
		for address in changeset.storage_resets.clone() {
			self.state.entry(address).or_default().storage = BTreeMap::new();
		}

		for ((address, key), value) in changeset.storages.clone() {
			let account = self.state.entry(address).or_default();

			if value == H256::zero() {
				account.storage.remove(&key);
			} else {
				account.storage.insert(key, value);
			}
		}

		for (address, balance) in changeset.balances.clone() {
			self.state.entry(address).or_default().balance = balance;
		}

		for (address, code) in changeset.codes.clone() {
			self.state.entry(address).or_default().code = code;
		}

		for (address, nonce) in changeset.nonces.clone() {
			self.state.entry(address).or_default().nonce = nonce;
		}

		for address in changeset.deletes.clone() {
			self.state.remove(&address);
		}
	}
}

impl Environment for InMemoryBackend {
	fn block_hash(&self, number: U256) -> H256 {
		self.environment
			.block_hashes
			.get(&number)
			.cloned()
			.unwrap_or_default()
	}

	fn block_number(&self) -> U256 {
		self.environment.block_number
	}

	fn block_coinbase(&self) -> H160 {
		self.environment.block_coinbase
	}

	fn block_timestamp(&self) -> U256 {
		self.environment.block_timestamp
	}

	fn block_difficulty(&self) -> U256 {
		self.environment.block_difficulty
	}

	fn block_gas_limit(&self) -> U256 {
		self.environment.block_gas_limit
	}

	fn chain_id(&self) -> U256 {
		self.environment.chain_id
	}

	fn origin(&self) -> H160 {
		self.environment.origin
	}

	fn gas_price(&self) -> U256 {
		self.environment.gas_price
	}
}

impl Backend for InMemoryBackend {
	fn exists(&self, address: H160) -> bool {
		self.state.contains_key(&address)
	}

	fn balance(&self, address: H160) -> U256 {
		self.state
			.get(&address)
			.map(|acc| acc.balance)
			.unwrap_or_default()
	}

	fn nonce(&self, address: H160) -> u64 {
		self.state
			.get(&address)
			.map(|acc| acc.nonce)
			.unwrap_or_default()
	}

	fn code(&self, address: H160) -> Vec<u8> {
		self.state
			.get(&address)
			.map(|acc| acc.code.clone())
			.unwrap_or_default()
	}

	fn storage(&self, address: H160, key: H256) -> H256 {
		self.state
			.get(&address)
			.and_then(|acc| acc.storage.get(&key).cloned())
			.unwrap_or_default()
	}
}
