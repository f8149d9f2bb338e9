use primitive_types::{U256, U512};

use crate::utils::I256;

#[inline]
pub fn div(op1: U256, op2: U256) -> U256 {
	if op2 == U256::zero() {
		U256::zero()
	} else {
		op1 / op2
	}
}

#[inline]
pub fn sdiv(op1: U256, op2: U256) -> U256 {
	let op1: I256 = op1.into();
	let op2: I256 = op2.into();
	(op1 / op2).into()
}

#[inline]
pub fn rem(op1: U256, op2: U256) -> U256 {
	if op2 == U256::zero() {
		U256::zero()
	} else {
		op1 % op2
	}
}

#[inline]
pub fn srem(op1: U256, op2: U256) -> U256 {
	if op2 == U256::zero() {
		U256::zero()
	} else {
		let op1: I256 = op1.into();
		let op2: I256 = op2.into();
		(op1 % op2).into()
	}
}

#[inline]
pub fn addmod(op1: U256, op2: U256, op3: U256) -> U256 {
	if op3 == U256::zero() {
		return U256::zero();
	}

	let op1 = U512::from(op1);
	let op2 = U512::from(op2);
	let op3 = U512::from(op3);
	narrow((op1 + op2) % op3)
}

#[inline]
pub fn mulmod(op1: U256, op2: U256, op3: U256) -> U256 {
	if op3 == U256::zero() {
		return U256::zero();
	}

	let op1 = U512::from(op1);
	let op2 = U512::from(op2);
	let op3 = U512::from(op3);
	narrow((op1 * op2) % op3)
}

// The remainder is always smaller than the 256-bit modulus.
fn narrow(value: U512) -> U256 {
	U256::try_from(value).unwrap_or_else(|_| U256::zero())
}

#[inline]
pub fn exp(op1: U256, op2: U256) -> U256 {
	let mut base = op1;
	let mut power = op2;
	let mut ret = U256::one();

	while power != U256::zero() {
		if power & U256::one() != U256::zero() {
			ret = ret.overflowing_mul(base).0;
		}
		power >>= 1;
		base = base.overflowing_mul(base).0;
	}

	ret
}

/// Extend the sign bit of the low `op1 + 1` bytes of `op2` across the
/// full word.
#[inline]
pub fn signextend(op1: U256, op2: U256) -> U256 {
	if op1 >= U256::from(32) {
		return op2;
	}

	let bit_index = 8 * op1.as_usize() + 7;
	let mask = (U256::one() << bit_index) - U256::one();
	if op2.bit(bit_index) {
		op2 | !mask
	} else {
		op2 & mask
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn neg(v: u64) -> U256 {
		!U256::from(v) + U256::one()
	}

	#[test]
	fn division_by_zero_is_zero() {
		assert_eq!(div(U256::from(7), U256::zero()), U256::zero());
		assert_eq!(sdiv(neg(7), U256::zero()), U256::zero());
		assert_eq!(rem(U256::from(7), U256::zero()), U256::zero());
		assert_eq!(srem(neg(7), U256::zero()), U256::zero());
	}

	#[test]
	fn signed_ops_use_twos_complement() {
		assert_eq!(sdiv(neg(6), U256::from(2)), neg(3));
		assert_eq!(srem(neg(7), U256::from(2)), neg(1));
	}

	#[test]
	fn modular_ops_widen() {
		// (2^256 - 1) + (2^256 - 1) mod (2^256 - 1) is 0, not wrapped
		assert_eq!(addmod(U256::MAX, U256::MAX, U256::MAX), U256::zero());
		assert_eq!(
			mulmod(U256::MAX, U256::MAX, U256::from(12)),
			(U512::from(U256::MAX) * U512::from(U256::MAX) % U512::from(12))
				.try_into()
				.unwrap()
		);
		assert_eq!(addmod(U256::one(), U256::one(), U256::zero()), U256::zero());
	}

	#[test]
	fn exp_wraps() {
		assert_eq!(exp(U256::from(2), U256::from(10)), U256::from(1024));
		assert_eq!(exp(U256::from(2), U256::from(256)), U256::zero());
		assert_eq!(exp(U256::zero(), U256::zero()), U256::one());
	}

	#[test]
	fn signextend_from_byte() {
		assert_eq!(signextend(U256::zero(), U256::from(0x7f)), U256::from(0x7f));
		assert_eq!(signextend(U256::zero(), U256::from(0x80)), neg(0x80));
		assert_eq!(
			signextend(U256::from(100), U256::from(0x80)),
			U256::from(0x80)
		);
	}
}
