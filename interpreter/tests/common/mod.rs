use std::collections::BTreeMap;

use ethvm_interpreter::runtime::{Backend, Environment};
use primitive_types::{H160, H256, U256};

#[derive(Clone, Debug, Default)]
pub struct TestAccount {
	pub balance: U256,
	pub nonce: u64,
	pub code: Vec<u8>,
	pub storage: BTreeMap<H256, H256>,
}

/// Minimal authoritative store for interpreter tests.
#[derive(Clone, Debug)]
pub struct TestBackend {
	pub accounts: BTreeMap<H160, TestAccount>,
	pub block_number: U256,
	pub block_timestamp: U256,
	pub block_difficulty: U256,
	pub block_gas_limit: U256,
	pub block_coinbase: H160,
	pub chain_id: U256,
	pub origin: H160,
	pub gas_price: U256,
}

impl Default for TestBackend {
	fn default() -> Self {
		Self {
			accounts: BTreeMap::new(),
			block_number: U256::from(1),
			block_timestamp: U256::from(1_600_000_000u64),
			block_difficulty: U256::from(0x0200_0000u64),
			block_gas_limit: U256::from(10_000_000u64),
			block_coinbase: H160::repeat_byte(0xcb),
			chain_id: U256::one(),
			origin: H160::repeat_byte(0xee),
			gas_price: U256::one(),
		}
	}
}

impl TestBackend {
	pub fn with_account(mut self, address: H160, account: TestAccount) -> Self {
		self.accounts.insert(address, account);
		self
	}
}

impl Environment for TestBackend {
	fn block_hash(&self, _number: U256) -> H256 {
		H256::zero()
	}

	fn block_number(&self) -> U256 {
		self.block_number
	}

	fn block_coinbase(&self) -> H160 {
		self.block_coinbase
	}

	fn block_timestamp(&self) -> U256 {
		self.block_timestamp
	}

	fn block_difficulty(&self) -> U256 {
		self.block_difficulty
	}

	fn block_gas_limit(&self) -> U256 {
		self.block_gas_limit
	}

	fn chain_id(&self) -> U256 {
		self.chain_id
	}

	fn origin(&self) -> H160 {
		self.origin
	}

	fn gas_price(&self) -> U256 {
		self.gas_price
	}
}

impl Backend for TestBackend {
	fn exists(&self, address: H160) -> bool {
		self.accounts.contains_key(&address)
	}

	fn balance(&self, address: H160) -> U256 {
		self.accounts
			.get(&address)
			.map(|acc| acc.balance)
			.unwrap_or_default()
	}

	fn nonce(&self, address: H160) -> u64 {
		self.accounts
			.get(&address)
			.map(|acc| acc.nonce)
			.unwrap_or_default()
	}

	fn code(&self, address: H160) -> Vec<u8> {
		self.accounts
			.get(&address)
			.map(|acc| acc.code.clone())
			.unwrap_or_default()
	}

	fn storage(&self, address: H160, key: H256) -> H256 {
		self.accounts
			.get(&address)
			.and_then(|acc| acc.storage.get(&key).cloned())
			.unwrap_or_default()
	}
}
