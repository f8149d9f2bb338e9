use primitive_types::U256;

use crate::utils::{I256, Sign};

#[inline]
pub fn slt(op1: U256, op2: U256) -> U256 {
	let op1: I256 = op1.into();
	let op2: I256 = op2.into();

	if op1 < op2 { U256::one() } else { U256::zero() }
}

#[inline]
pub fn sgt(op1: U256, op2: U256) -> U256 {
	let op1: I256 = op1.into();
	let op2: I256 = op2.into();

	if op1 > op2 { U256::one() } else { U256::zero() }
}

#[inline]
pub fn iszero(op1: U256) -> U256 {
	if op1 == U256::zero() {
		U256::one()
	} else {
		U256::zero()
	}
}

#[inline]
pub fn not(op1: U256) -> U256 {
	!op1
}

/// Byte `op1` of `op2`, counted from the most significant end.
#[inline]
pub fn byte(op1: U256, op2: U256) -> U256 {
	if op1 >= U256::from(32) {
		return U256::zero();
	}

	U256::from(op2.byte(31 - op1.as_usize()))
}

#[inline]
pub fn shl(shift: U256, value: U256) -> U256 {
	if value == U256::zero() || shift >= U256::from(256) {
		U256::zero()
	} else {
		value << shift.as_usize()
	}
}

#[inline]
pub fn shr(shift: U256, value: U256) -> U256 {
	if value == U256::zero() || shift >= U256::from(256) {
		U256::zero()
	} else {
		value >> shift.as_usize()
	}
}

#[inline]
pub fn sar(shift: U256, value: U256) -> U256 {
	let value = I256::from(value);

	if value == I256::zero() || shift >= U256::from(256) {
		match value.0 {
			// shifted all the way out, the sign remains
			Sign::Plus | Sign::Zero => U256::zero(),
			Sign::Minus => I256(Sign::Minus, U256::one()).into(),
		}
	} else {
		let shift = shift.as_usize();

		match value.0 {
			Sign::Plus | Sign::Zero => value.1 >> shift,
			Sign::Minus => {
				let shifted = ((value.1.overflowing_sub(U256::one()).0) >> shift)
					.overflowing_add(U256::one())
					.0;
				I256(Sign::Minus, shifted).into()
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn neg(v: u64) -> U256 {
		!U256::from(v) + U256::one()
	}

	#[test]
	fn byte_counts_from_msb() {
		let value = U256::from_big_endian(&{
			let mut bytes = [0u8; 32];
			bytes[0] = 0xaa;
			bytes[31] = 0xbb;
			bytes
		});
		assert_eq!(byte(U256::zero(), value), U256::from(0xaa));
		assert_eq!(byte(U256::from(31), value), U256::from(0xbb));
		assert_eq!(byte(U256::from(32), value), U256::zero());
	}

	#[test]
	fn sar_keeps_sign() {
		assert_eq!(sar(U256::from(1), neg(4)), neg(2));
		assert_eq!(sar(U256::from(500), neg(4)), U256::MAX);
		assert_eq!(sar(U256::from(500), U256::from(4)), U256::zero());
		assert_eq!(sar(U256::from(2), U256::from(8)), U256::from(2));
	}

	#[test]
	fn oversized_shifts() {
		assert_eq!(shl(U256::from(256), U256::MAX), U256::zero());
		assert_eq!(shr(U256::from(256), U256::MAX), U256::zero());
		assert_eq!(shl(U256::from(1), U256::one()), U256::from(2));
	}
}
