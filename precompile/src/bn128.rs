//! alt-bn128 curve addition, scalar multiplication and pairing check.

use alloc::vec::Vec;

use ethvm_interpreter::error::{ExitError, ExitException, ExitResult, ExitSucceed};
use ethvm_interpreter::{Config, Gasometer};
use primitive_types::U256;

use crate::PurePrecompile;

/// Copy bytes from input to target; a short input reads as zero.
fn read_input(source: &[u8], target: &mut [u8], offset: usize) {
	if source.len() <= offset {
		return;
	}

	let len = core::cmp::min(target.len(), source.len() - offset);
	target[..len].copy_from_slice(&source[offset..][..len]);
}

fn read_fr(input: &[u8], start: usize) -> Result<bn::Fr, ExitError> {
	let mut buf = [0u8; 32];
	read_input(input, &mut buf, start);

	bn::Fr::from_slice(&buf).map_err(|_| ExitException::PrecompileFailure.into())
}

fn read_point(input: &[u8], start: usize) -> Result<bn::G1, ExitError> {
	use bn::{AffineG1, Fq, Group, G1};

	let mut px_buf = [0u8; 32];
	let mut py_buf = [0u8; 32];
	read_input(input, &mut px_buf, start);
	read_input(input, &mut py_buf, start + 32);

	let px = Fq::from_slice(&px_buf).map_err(|_| ExitException::PrecompileFailure)?;
	let py = Fq::from_slice(&py_buf).map_err(|_| ExitException::PrecompileFailure)?;

	Ok(if px == Fq::zero() && py == Fq::zero() {
		G1::zero()
	} else {
		AffineG1::new(px, py)
			.map_err(|_| ExitException::PrecompileFailure)?
			.into()
	})
}

fn write_point(point: bn::G1) -> Result<Vec<u8>, ExitError> {
	use bn::AffineG1;

	let mut buf = [0u8; 64];
	if let Some(affine) = AffineG1::from_jacobian(point) {
		// the point at infinity stays all-zero
		affine
			.x()
			.to_big_endian(&mut buf[0..32])
			.map_err(|_| ExitException::PrecompileFailure)?;
		affine
			.y()
			.to_big_endian(&mut buf[32..64])
			.map_err(|_| ExitException::PrecompileFailure)?;
	}

	Ok(buf.to_vec())
}

pub struct Bn128Add;

impl PurePrecompile for Bn128Add {
	fn execute(
		&self,
		input: &[u8],
		gasometer: &mut Gasometer,
		config: &Config,
	) -> (ExitResult, Vec<u8>) {
		let cost = if config.eip1108_ec_repricing { 150 } else { 500 };
		try_some!(gasometer.record_cost(cost));

		let p1 = try_some!(read_point(input, 0));
		let p2 = try_some!(read_point(input, 64));

		let buf = try_some!(write_point(p1 + p2));
		(ExitSucceed::Returned.into(), buf)
	}
}

pub struct Bn128Mul;

impl PurePrecompile for Bn128Mul {
	fn execute(
		&self,
		input: &[u8],
		gasometer: &mut Gasometer,
		config: &Config,
	) -> (ExitResult, Vec<u8>) {
		let cost = if config.eip1108_ec_repricing {
			6_000
		} else {
			40_000
		};
		try_some!(gasometer.record_cost(cost));

		let p = try_some!(read_point(input, 0));
		let fr = try_some!(read_fr(input, 64));

		let buf = try_some!(write_point(p * fr));
		(ExitSucceed::Returned.into(), buf)
	}
}

pub struct Bn128Pairing;

impl PurePrecompile for Bn128Pairing {
	fn execute(
		&self,
		input: &[u8],
		gasometer: &mut Gasometer,
		config: &Config,
	) -> (ExitResult, Vec<u8>) {
		use bn::{pairing_batch, AffineG1, AffineG2, Fq, Fq2, Group, Gt, G1, G2};

		let (base, per_pair) = if config.eip1108_ec_repricing {
			(45_000, 34_000)
		} else {
			(100_000, 80_000)
		};

		if input.len() % 192 > 0 {
			try_some!(gasometer.record_cost(base));
			return (ExitException::PrecompileFailure.into(), Vec::new());
		}

		// each pair is a G1 point followed by a G2 point, affine
		// coordinates
		let elements = input.len() / 192;
		try_some!(gasometer.record_cost(base + per_pair * elements as u64));

		let mut pairs = Vec::new();
		for idx in 0..elements {
			let chunk = &input[idx * 192..idx * 192 + 192];

			let a_x = try_some!(
				Fq::from_slice(&chunk[0..32]).map_err(|_| ExitException::PrecompileFailure)
			);
			let a_y = try_some!(
				Fq::from_slice(&chunk[32..64]).map_err(|_| ExitException::PrecompileFailure)
			);
			let b_a_y = try_some!(
				Fq::from_slice(&chunk[64..96]).map_err(|_| ExitException::PrecompileFailure)
			);
			let b_a_x = try_some!(
				Fq::from_slice(&chunk[96..128]).map_err(|_| ExitException::PrecompileFailure)
			);
			let b_b_y = try_some!(
				Fq::from_slice(&chunk[128..160]).map_err(|_| ExitException::PrecompileFailure)
			);
			let b_b_x = try_some!(
				Fq::from_slice(&chunk[160..192]).map_err(|_| ExitException::PrecompileFailure)
			);

			let b_a = Fq2::new(b_a_x, b_a_y);
			let b_b = Fq2::new(b_b_x, b_b_y);
			let b = if b_a.is_zero() && b_b.is_zero() {
				G2::zero()
			} else {
				G2::from(try_some!(AffineG2::new(b_a, b_b)
					.map_err(|_| ExitException::PrecompileFailure)))
			};
			let a = if a_x.is_zero() && a_y.is_zero() {
				G1::zero()
			} else {
				G1::from(try_some!(AffineG1::new(a_x, a_y)
					.map_err(|_| ExitException::PrecompileFailure)))
			};
			pairs.push((a, b));
		}

		let answer = if pairing_batch(&pairs) == Gt::one() {
			U256::one()
		} else {
			U256::zero()
		};

		let mut buf = [0u8; 32];
		answer.to_big_endian(&mut buf);
		(ExitSucceed::Returned.into(), buf.to_vec())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn add_identity() {
		// adding the point at infinity to itself
		let mut gasometer = Gasometer::new(10_000);
		let (result, output) =
			Bn128Add.execute(&[0u8; 128], &mut gasometer, &Config::istanbul());
		assert!(result.is_ok());
		assert_eq!(output, alloc::vec![0u8; 64]);
		assert_eq!(gasometer.gas(), 10_000 - 150);
	}

	#[test]
	fn pre_istanbul_pricing() {
		let mut gasometer = Gasometer::new(10_000);
		let (result, _) = Bn128Add.execute(&[0u8; 128], &mut gasometer, &Config::byzantium());
		assert!(result.is_ok());
		assert_eq!(gasometer.gas(), 10_000 - 500);
	}

	#[test]
	fn empty_pairing_is_one() {
		let mut gasometer = Gasometer::new(100_000);
		let (result, output) = Bn128Pairing.execute(&[], &mut gasometer, &Config::istanbul());
		assert!(result.is_ok());
		assert_eq!(output[31], 1);
		assert_eq!(gasometer.gas(), 100_000 - 45_000);
	}

	#[test]
	fn ragged_pairing_input_fails() {
		let mut gasometer = Gasometer::new(100_000);
		let (result, _) = Bn128Pairing.execute(&[0u8; 191], &mut gasometer, &Config::istanbul());
		assert!(result.is_err());
	}
}
