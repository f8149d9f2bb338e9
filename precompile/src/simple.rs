//! The four original precompiles: ecrecover, SHA-256, RIPEMD-160 and
//! identity.

use alloc::vec::Vec;
use core::cmp::min;

use ethvm_interpreter::error::ExitResult;
use ethvm_interpreter::{Config, ExitSucceed, Gasometer};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use sha2::Digest;
use sha3::Keccak256;

use crate::{linear_cost, PurePrecompile};

pub struct ECRecover;

const G_ECRECOVER: u64 = 3000;

impl PurePrecompile for ECRecover {
	fn execute(
		&self,
		input: &[u8],
		gasometer: &mut Gasometer,
		_config: &Config,
	) -> (ExitResult, Vec<u8>) {
		try_some!(gasometer.record_cost(G_ECRECOVER));

		let mut padded = [0u8; 128];
		let len = min(input.len(), 128);
		padded[..len].copy_from_slice(&input[..len]);

		// an undecodable signature is a successful empty answer, not an
		// error
		let output = recover(&padded).unwrap_or_default();
		(Ok(ExitSucceed::Returned), output)
	}
}

fn recover(padded: &[u8; 128]) -> Option<Vec<u8>> {
	let hash = &padded[0..32];
	let v = &padded[32..64];

	if v[..31] != [0u8; 31] || !matches!(v[31], 27 | 28) {
		return None;
	}

	let recovery_id = RecoveryId::try_from(v[31] - 27).ok()?;
	let signature = Signature::from_slice(&padded[64..128]).ok()?;
	let key = VerifyingKey::recover_from_prehash(hash, &signature, recovery_id).ok()?;

	// keccak of the uncompressed point, sans the 0x04 tag, low 20 bytes
	let encoded = key.to_encoded_point(false);
	let digest = Keccak256::digest(&encoded.as_bytes()[1..]);

	let mut output = alloc::vec![0u8; 32];
	output[12..32].copy_from_slice(&digest[12..32]);
	Some(output)
}

pub struct Sha256;

impl PurePrecompile for Sha256 {
	fn execute(
		&self,
		input: &[u8],
		gasometer: &mut Gasometer,
		_config: &Config,
	) -> (ExitResult, Vec<u8>) {
		try_some!(gasometer.record_cost(linear_cost(input.len(), 60, 12)));

		let digest = sha2::Sha256::digest(input);
		(Ok(ExitSucceed::Returned), digest.to_vec())
	}
}

pub struct Ripemd160;

impl PurePrecompile for Ripemd160 {
	fn execute(
		&self,
		input: &[u8],
		gasometer: &mut Gasometer,
		_config: &Config,
	) -> (ExitResult, Vec<u8>) {
		try_some!(gasometer.record_cost(linear_cost(input.len(), 600, 120)));

		let digest = ripemd::Ripemd160::digest(input);
		let mut output = alloc::vec![0u8; 32];
		output[12..32].copy_from_slice(&digest);
		(Ok(ExitSucceed::Returned), output)
	}
}

pub struct Identity;

impl PurePrecompile for Identity {
	fn execute(
		&self,
		input: &[u8],
		gasometer: &mut Gasometer,
		_config: &Config,
	) -> (ExitResult, Vec<u8>) {
		try_some!(gasometer.record_cost(linear_cost(input.len(), 15, 3)));

		(Ok(ExitSucceed::Returned), input.to_vec())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn identity_echoes_input() {
		let mut gasometer = Gasometer::new(100);
		let (result, output) =
			Identity.execute(&[1, 2, 3], &mut gasometer, &Config::berlin());
		assert!(result.is_ok());
		assert_eq!(output, alloc::vec![1, 2, 3]);
		assert_eq!(gasometer.gas(), 100 - 18);
	}

	#[test]
	fn identity_out_of_gas() {
		let mut gasometer = Gasometer::new(10);
		let (result, output) =
			Identity.execute(&[1, 2, 3], &mut gasometer, &Config::berlin());
		assert!(result.is_err());
		assert!(output.is_empty());
	}

	#[test]
	fn sha256_known_vector() {
		let mut gasometer = Gasometer::new(1000);
		let (result, output) = Sha256.execute(b"abc", &mut gasometer, &Config::berlin());
		assert!(result.is_ok());
		assert_eq!(
			hex::encode(output),
			"ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
		);
	}

	#[test]
	fn ripemd_known_vector() {
		let mut gasometer = Gasometer::new(1000);
		let (result, output) = Ripemd160.execute(b"abc", &mut gasometer, &Config::berlin());
		assert!(result.is_ok());
		assert_eq!(
			hex::encode(&output[12..]),
			"8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"
		);
	}

	#[test]
	fn ecrecover_rejects_bad_v() {
		let mut gasometer = Gasometer::new(10_000);
		let mut input = [0u8; 128];
		input[63] = 29;
		let (result, output) = ECRecover.execute(&input, &mut gasometer, &Config::berlin());
		assert!(result.is_ok());
		assert!(output.is_empty());
	}
}
