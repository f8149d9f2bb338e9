//! Serde model of the VMTests format, with quantity and byte-string
//! fields kept in their 0x-hex form and decoded on demand.

use std::collections::{BTreeMap, HashMap};

use primitive_types::{H160, H256, U256};
use serde::{Deserialize, Serialize};

use crate::in_memory::{InMemoryAccount, InMemoryEnvironment};

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Test {
	pub env: Env,
	pub exec: Exec,
	pub pre: HashMap<String, Account>,
	pub gas: Option<String>,
	pub out: Option<String>,
	pub logs: Option<String>,
	pub post: Option<HashMap<String, Account>>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Env {
	pub current_coinbase: String,
	pub current_difficulty: String,
	pub current_gas_limit: String,
	pub current_number: String,
	pub current_timestamp: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Exec {
	pub address: String,
	pub caller: String,
	pub code: String,
	pub data: String,
	pub gas: String,
	pub gas_price: String,
	pub origin: String,
	pub value: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Account {
	pub balance: String,
	pub code: String,
	pub nonce: String,
	pub storage: HashMap<String, String>,
}

pub fn unwrap_to_u256(s: &str) -> U256 {
	let s = s.trim_start_matches("0x");
	if s.is_empty() {
		U256::zero()
	} else {
		U256::from_str_radix(s, 16).expect("hex quantity")
	}
}

pub fn unwrap_to_h256(s: &str) -> H256 {
	let mut ret = H256::zero();
	unwrap_to_u256(s).to_big_endian(&mut ret[..]);
	ret
}

pub fn unwrap_to_h160(s: &str) -> H160 {
	let bytes = unwrap_to_vec(s);
	H160::from_slice(&bytes)
}

pub fn unwrap_to_vec(s: &str) -> Vec<u8> {
	let s = s.trim_start_matches("0x");
	if s.is_empty() {
		Vec::new()
	} else {
		hex::decode(s).expect("hex bytes")
	}
}

impl Account {
	pub fn unwrap_to_account(&self) -> InMemoryAccount {
		InMemoryAccount {
			balance: unwrap_to_u256(&self.balance),
			code: unwrap_to_vec(&self.code),
			nonce: unwrap_to_u256(&self.nonce).low_u64(),
			storage: self
				.storage
				.iter()
				.filter_map(|(k, v)| {
					let value = unwrap_to_h256(v);
					(value != H256::zero()).then_some((unwrap_to_h256(k), value))
				})
				.collect(),
		}
	}
}

impl Test {
	pub fn unwrap_to_pre_state(&self) -> BTreeMap<H160, InMemoryAccount> {
		self.pre
			.iter()
			.map(|(k, v)| (unwrap_to_h160(k), v.unwrap_to_account()))
			.collect()
	}

	pub fn unwrap_to_post_state(&self) -> BTreeMap<H160, InMemoryAccount> {
		self.post
			.as_ref()
			.expect("test has a post state")
			.iter()
			.map(|(k, v)| (unwrap_to_h160(k), v.unwrap_to_account()))
			.collect()
	}

	pub fn unwrap_to_environment(&self) -> InMemoryEnvironment {
		InMemoryEnvironment {
			block_hashes: BTreeMap::new(),
			block_number: unwrap_to_u256(&self.env.current_number),
			block_coinbase: unwrap_to_h160(&self.env.current_coinbase),
			block_timestamp: unwrap_to_u256(&self.env.current_timestamp),
			block_difficulty: unwrap_to_u256(&self.env.current_difficulty),
			block_gas_limit: unwrap_to_u256(&self.env.current_gas_limit),
			chain_id: U256::one(),
			origin: unwrap_to_h160(&self.exec.origin),
			gas_price: unwrap_to_u256(&self.exec.gas_price),
		}
	}

	pub fn unwrap_to_code(&self) -> Vec<u8> {
		unwrap_to_vec(&self.exec.code)
	}

	pub fn unwrap_to_data(&self) -> Vec<u8> {
		unwrap_to_vec(&self.exec.data)
	}

	pub fn unwrap_to_gas_limit(&self) -> u64 {
		unwrap_to_u256(&self.exec.gas).low_u64()
	}

	pub fn unwrap_to_post_gas(&self) -> u64 {
		unwrap_to_u256(self.gas.as_ref().expect("test has a gas expectation")).low_u64()
	}

	pub fn unwrap_to_return_value(&self) -> Vec<u8> {
		self.out.as_ref().map(|out| unwrap_to_vec(out)).unwrap_or_default()
	}

	pub fn unwrap_to_logs_hash(&self) -> Option<H256> {
		self.logs.as_ref().map(|logs| unwrap_to_h256(logs))
	}

	pub fn unwrap_to_address(&self) -> H160 {
		unwrap_to_h160(&self.exec.address)
	}

	pub fn unwrap_to_caller(&self) -> H160 {
		unwrap_to_h160(&self.exec.caller)
	}

	pub fn unwrap_to_value(&self) -> U256 {
		unwrap_to_u256(&self.exec.value)
	}
}
