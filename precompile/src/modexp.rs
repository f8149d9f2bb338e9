//! Big-integer modular exponentiation.

use alloc::{vec, vec::Vec};
use core::cmp::max;

use ethvm_interpreter::error::{ExitException, ExitResult, ExitSucceed};
use ethvm_interpreter::{Config, Gasometer};
use num::{BigUint, Integer, One, ToPrimitive, Zero};

use crate::PurePrecompile;

pub struct Modexp;

const MIN_GAS_COST: u64 = 200;

fn repriced_gas_cost(
	base_length: u64,
	mod_length: u64,
	exponent: &BigUint,
	exponent_bytes: &[u8],
	mod_is_even: bool,
) -> u64 {
	let max_length = max(base_length, mod_length);
	let words = (max_length + 7) / 8;
	let multiplication_complexity = words * words;

	let iteration_count = iteration_count(exponent, exponent_bytes);
	max(MIN_GAS_COST, multiplication_complexity * iteration_count / 3)
		.saturating_mul(if mod_is_even { 20 } else { 1 })
}

fn original_gas_cost(
	base_length: u64,
	mod_length: u64,
	exponent: &BigUint,
	exponent_bytes: &[u8],
) -> u64 {
	fn multiplication_complexity(x: u64) -> u64 {
		if x <= 64 {
			x * x
		} else if x <= 1024 {
			x * x / 4 + 96 * x - 3072
		} else {
			x * x / 16 + 480 * x - 199_680
		}
	}

	let max_length = max(base_length, mod_length);
	let iterations = max(iteration_count(exponent, exponent_bytes), 1);
	multiplication_complexity(max_length).saturating_mul(iterations) / 20
}

fn iteration_count(exponent: &BigUint, exponent_bytes: &[u8]) -> u64 {
	let exp_length = exponent_bytes.len() as u64;

	let count = if exp_length <= 32 && exponent.is_zero() {
		0
	} else if exp_length <= 32 {
		exponent.bits() - 1
	} else {
		// the head is the first 32 bytes of the exponent, the tail
		// contributes 8 bits per byte
		let exponent_head = BigUint::from_bytes_be(&exponent_bytes[..32]);
		8 * (exp_length - 32) + exponent_head.bits().saturating_sub(1)
	};

	max(count, 1)
}

/// Copy bytes from input to target; the missing bytes of a short input
/// read as zero.
fn read_input(source: &[u8], target: &mut [u8], source_offset: &mut usize) {
	let offset = *source_offset;
	*source_offset += target.len();

	if source.len() <= offset {
		return;
	}

	let len = core::cmp::min(target.len(), source.len() - offset);
	target[..len].copy_from_slice(&source[offset..][..len]);
}

impl PurePrecompile for Modexp {
	fn execute(
		&self,
		input: &[u8],
		gasometer: &mut Gasometer,
		config: &Config,
	) -> (ExitResult, Vec<u8>) {
		let mut input_offset = 0;

		let mut base_len_buf = [0u8; 32];
		read_input(input, &mut base_len_buf, &mut input_offset);
		let mut exp_len_buf = [0u8; 32];
		read_input(input, &mut exp_len_buf, &mut input_offset);
		let mut mod_len_buf = [0u8; 32];
		read_input(input, &mut mod_len_buf, &mut input_offset);

		let max_size = BigUint::from(1024u32);

		let base_len_big = BigUint::from_bytes_be(&base_len_buf);
		let exp_len_big = BigUint::from_bytes_be(&exp_len_buf);
		let mod_len_big = BigUint::from_bytes_be(&mod_len_buf);
		if base_len_big > max_size || exp_len_big > max_size || mod_len_big > max_size {
			try_some!(Err(ExitException::ArgumentOutOfRange));
		}

		// bounds checked right above
		let base_len = base_len_big.to_usize().unwrap_or(0);
		let exp_len = exp_len_big.to_usize().unwrap_or(0);
		let mod_len = mod_len_big.to_usize().unwrap_or(0);

		if base_len == 0 && mod_len == 0 {
			try_some!(gasometer.record_cost(MIN_GAS_COST));
			return (ExitSucceed::Returned.into(), Vec::new());
		}

		let mut base_buf = vec![0u8; base_len];
		read_input(input, &mut base_buf, &mut input_offset);
		let base = BigUint::from_bytes_be(&base_buf);

		let mut exp_buf = vec![0u8; exp_len];
		read_input(input, &mut exp_buf, &mut input_offset);
		let exponent = BigUint::from_bytes_be(&exp_buf);

		let mut mod_buf = vec![0u8; mod_len];
		read_input(input, &mut mod_buf, &mut input_offset);
		let modulus = BigUint::from_bytes_be(&mod_buf);

		let gas_cost = if config.eip2565_lower_modexp {
			repriced_gas_cost(
				base_len as u64,
				mod_len as u64,
				&exponent,
				&exp_buf,
				modulus.is_even(),
			)
		} else {
			original_gas_cost(base_len as u64, mod_len as u64, &exponent, &exp_buf)
		};
		try_some!(gasometer.record_cost(gas_cost));

		if mod_len == 0 {
			return (ExitSucceed::Returned.into(), Vec::new());
		}

		let r = if modulus.is_zero() || modulus.is_one() {
			BigUint::zero()
		} else {
			base.modpow(&exponent, &modulus)
		};

		// left-pad the answer to the length of the modulus
		let bytes = r.to_bytes_be();
		if bytes.len() > mod_len {
			return (ExitException::PrecompileFailure.into(), Vec::new());
		}

		let mut ret = vec![0u8; mod_len - bytes.len()];
		ret.extend_from_slice(&bytes[..]);
		(ExitSucceed::Returned.into(), ret)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	// 3 ** 0xffff mod (2**256 - 2**32 - 977), a vector from the proposal
	// that introduced the contract
	#[test]
	fn known_vector() {
		let input = hex::decode(concat!(
			"0000000000000000000000000000000000000000000000000000000000000001",
			"0000000000000000000000000000000000000000000000000000000000000002",
			"0000000000000000000000000000000000000000000000000000000000000020",
			"03",
			"ffff",
			"fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f"
		))
		.unwrap();

		let mut gasometer = Gasometer::new(10_000_000);
		let (result, output) = Modexp.execute(&input, &mut gasometer, &Config::berlin());
		assert!(result.is_ok());
		assert_eq!(
			hex::encode(output),
			"a7a3b4f555dbd467f6362da18bb9e362cf8f36353e2abc66391d46b68b8a1a1b"
		);
	}

	#[test]
	fn zero_modulus_returns_empty() {
		let input = [0u8; 96];
		let mut gasometer = Gasometer::new(10_000);
		let (result, output) = Modexp.execute(&input, &mut gasometer, &Config::berlin());
		assert!(result.is_ok());
		assert!(output.is_empty());
	}

	#[test]
	fn oversized_length_is_rejected() {
		let mut input = [0u8; 96];
		input[0] = 0xff;
		let mut gasometer = Gasometer::new(10_000);
		let (result, _) = Modexp.execute(&input, &mut gasometer, &Config::berlin());
		assert!(result.is_err());
	}
}
