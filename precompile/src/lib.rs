//! Standard EVM precompiled contracts.
//!
//! The set and the pricing are fork-dependent: the four Frontier
//! contracts are always reachable, modexp and the alt-bn128 trio arrive
//! at Byzantium, Blake2 F at Istanbul, and Istanbul/Berlin reprice the
//! curve operations and modexp.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

macro_rules! try_some {
	($e:expr) => {
		match $e {
			Ok(v) => v,
			Err(err) => return (Err(err.into()), Vec::new()),
		}
	};
}

mod blake2;
mod bn128;
mod modexp;
mod simple;

use alloc::vec::Vec;

use ethvm_interpreter::error::ExitResult;
use ethvm_interpreter::runtime::{PrecompileOutcome, PrecompileSet};
use ethvm_interpreter::{Config, Gasometer};
use primitive_types::H160;

pub use crate::blake2::Blake2F;
pub use crate::bn128::{Bn128Add, Bn128Mul, Bn128Pairing};
pub use crate::modexp::Modexp;
pub use crate::simple::{ECRecover, Identity, Ripemd160, Sha256};

/// A precompiled contract: a pure function of its input, charging gas
/// against what the call forwarded.
pub trait PurePrecompile {
	fn execute(&self, input: &[u8], gasometer: &mut Gasometer, config: &Config)
		-> (ExitResult, Vec<u8>);
}

/// The standard, fork-gated precompile set.
#[derive(Default)]
pub struct StandardPrecompileSet;

impl StandardPrecompileSet {
	const MAX_INDEX: u64 = 9;

	fn index_of(address: H160) -> Option<u64> {
		if address[0..12] != [0u8; 12] {
			return None;
		}

		let index = u64::from_be_bytes(address[12..20].try_into().ok()?);
		(index >= 1 && index <= Self::MAX_INDEX).then_some(index)
	}
}

impl PrecompileSet for StandardPrecompileSet {
	fn execute(
		&self,
		address: H160,
		input: &[u8],
		gas_limit: u64,
		config: &Config,
	) -> Option<PrecompileOutcome> {
		let index = Self::index_of(address)?;
		let mut gasometer = Gasometer::new(gas_limit);

		let (result, output) = match index {
			1 => ECRecover.execute(input, &mut gasometer, config),
			2 => Sha256.execute(input, &mut gasometer, config),
			3 => Ripemd160.execute(input, &mut gasometer, config),
			4 => Identity.execute(input, &mut gasometer, config),
			5 if config.eip198_modexp_precompile => {
				Modexp.execute(input, &mut gasometer, config)
			}
			6 if config.eip196_ec_add_mul_precompile => {
				Bn128Add.execute(input, &mut gasometer, config)
			}
			7 if config.eip196_ec_add_mul_precompile => {
				Bn128Mul.execute(input, &mut gasometer, config)
			}
			8 if config.eip197_ec_pairing_precompile => {
				Bn128Pairing.execute(input, &mut gasometer, config)
			}
			9 if config.eip152_blake_2f_precompile => {
				Blake2F.execute(input, &mut gasometer, config)
			}
			_ => return None,
		};

		Some(PrecompileOutcome {
			result,
			gas_left: gasometer.gas(),
			output,
		})
	}
}

/// Linear `base + word·ceil(len/32)` cost shared by the hash and
/// identity contracts.
fn linear_cost(len: usize, base: u64, word: u64) -> u64 {
	base + word * ((len as u64 + 31) / 32)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn address_parsing() {
		assert_eq!(
			StandardPrecompileSet::index_of(H160::from_low_u64_be(1)),
			Some(1)
		);
		assert_eq!(
			StandardPrecompileSet::index_of(H160::from_low_u64_be(9)),
			Some(9)
		);
		assert_eq!(StandardPrecompileSet::index_of(H160::from_low_u64_be(0)), None);
		assert_eq!(
			StandardPrecompileSet::index_of(H160::from_low_u64_be(10)),
			None
		);
		assert_eq!(StandardPrecompileSet::index_of(H160::repeat_byte(0x01)), None);
	}

	#[test]
	fn fork_gating() {
		let set = StandardPrecompileSet;
		let modexp = H160::from_low_u64_be(5);

		assert!(set
			.execute(modexp, &[], 100_000, &Config::homestead())
			.is_none());
		assert!(set
			.execute(modexp, &[], 100_000, &Config::byzantium())
			.is_some());
	}
}
