//! Cost formulas for the dynamically priced opcodes.

use primitive_types::{H256, U256};

use super::consts::*;
use crate::error::{ExitError, ExitException};
use crate::fork::Config;

/// Total cost of memory of the given size in 32-byte words:
/// `3·w + w²/512`, rounded down.
pub fn memory_gas(words: u64) -> Result<u64, ExitError> {
	let square = words.checked_mul(words).ok_or(ExitException::OutOfGas)?;
	G_MEMORY
		.checked_mul(words)
		.and_then(|linear| linear.checked_add(square / 512))
		.ok_or_else(|| ExitException::OutOfGas.into())
}

fn words_of(len: U256) -> Result<u64, ExitError> {
	if len > U256::from(u64::MAX - 31) {
		return Err(ExitException::OutOfGas.into());
	}
	Ok((len.as_u64() + 31) / 32)
}

pub fn sha3_cost(len: U256) -> Result<u64, ExitError> {
	G_SHA3
		.checked_add(
			G_SHA3WORD
				.checked_mul(words_of(len)?)
				.ok_or(ExitException::OutOfGas)?,
		)
		.ok_or_else(|| ExitException::OutOfGas.into())
}

pub fn copy_cost(len: U256) -> Result<u64, ExitError> {
	G_VERYLOW
		.checked_add(
			G_COPY
				.checked_mul(words_of(len)?)
				.ok_or(ExitException::OutOfGas)?,
		)
		.ok_or_else(|| ExitException::OutOfGas.into())
}

pub fn extcodecopy_cost(len: U256, is_cold: bool, config: &Config) -> Result<u64, ExitError> {
	address_access_cost(is_cold, config.gas_ext_code(), config)
		.checked_add(
			G_COPY
				.checked_mul(words_of(len)?)
				.ok_or(ExitException::OutOfGas)?,
		)
		.ok_or_else(|| ExitException::OutOfGas.into())
}

pub fn log_cost(n: u8, len: U256) -> Result<u64, ExitError> {
	if len > U256::from(u64::MAX) {
		return Err(ExitException::OutOfGas.into());
	}

	G_LOG
		.checked_add(
			G_LOGDATA
				.checked_mul(len.as_u64())
				.ok_or(ExitException::OutOfGas)?,
		)
		.and_then(|gas| gas.checked_add(G_LOGTOPIC * u64::from(n)))
		.ok_or_else(|| ExitException::OutOfGas.into())
}

pub fn exp_cost(power: U256, config: &Config) -> Result<u64, ExitError> {
	if power == U256::zero() {
		return Ok(G_EXP);
	}

	let bytes = (power.bits() as u64 + 7) / 8;
	G_EXP
		.checked_add(
			config
				.gas_expbyte()
				.checked_mul(bytes)
				.ok_or(ExitException::OutOfGas)?,
		)
		.ok_or_else(|| ExitException::OutOfGas.into())
}

pub fn create2_cost(len: U256) -> Result<u64, ExitError> {
	G_CREATE
		.checked_add(
			G_SHA3WORD
				.checked_mul(words_of(len)?)
				.ok_or(ExitException::OutOfGas)?,
		)
		.ok_or_else(|| ExitException::OutOfGas.into())
}

/// Account access cost: the flat per-fork price, or the warm/cold price
/// once access accounting is in effect.
pub fn address_access_cost(is_cold: bool, base: u64, config: &Config) -> u64 {
	if config.eip2929_increase_state_access_gas {
		if is_cold {
			config.gas_account_access_cold()
		} else {
			config.gas_storage_read_warm()
		}
	} else {
		base
	}
}

pub fn sload_cost(is_cold: bool, config: &Config) -> u64 {
	if config.eip2929_increase_state_access_gas && is_cold {
		config.gas_sload_cold()
	} else {
		config.gas_sload()
	}
}

/// `SSTORE` cost under the schedule in effect: the legacy set/reset
/// pricing, or net metering against the original (pre-transaction)
/// value, with the cold-slot surcharge on top once access accounting is
/// in effect.
pub fn sstore_cost(
	original: H256,
	current: H256,
	new: H256,
	gas: u64,
	is_cold: bool,
	config: &Config,
) -> Result<u64, ExitError> {
	if config.eip1706_sstore_stipend_check && gas <= config.call_stipend() {
		return Err(ExitException::OutOfGas.into());
	}

	let base = if config.sstore_net_gas_metering {
		if new == current {
			config.gas_sload()
		} else if original == current {
			if original == H256::zero() {
				config.gas_sstore_set()
			} else {
				config.gas_sstore_reset()
			}
		} else {
			config.gas_sload()
		}
	} else if current == H256::zero() && new != H256::zero() {
		config.gas_sstore_set()
	} else {
		config.gas_sstore_reset()
	};

	let surcharge = if is_cold { config.gas_sload_cold() } else { 0 };
	Ok(base + surcharge)
}

/// `SSTORE` refund under the schedule in effect.
pub fn sstore_refund(original: H256, current: H256, new: H256, config: &Config) -> i64 {
	let zero = H256::zero();

	if config.sstore_net_gas_metering {
		if current == new {
			return 0;
		}

		let clears = config.refund_sstore_clears();
		if original == current {
			if original != zero && new == zero {
				clears
			} else {
				0
			}
		} else {
			let mut refund = 0i64;
			if original != zero {
				if current == zero {
					refund -= clears;
				} else if new == zero {
					refund += clears;
				}
			}
			if new == original {
				if original == zero {
					refund += (config.gas_sstore_set() - config.gas_sload()) as i64;
				} else {
					refund += (config.gas_sstore_reset() - config.gas_sload()) as i64;
				}
			}
			refund
		}
	} else if current != zero && new == zero {
		config.refund_sstore_clears()
	} else {
		0
	}
}

pub fn call_cost(
	value: U256,
	is_cold: bool,
	is_call_or_callcode: bool,
	is_call_or_staticcall: bool,
	new_account: bool,
	config: &Config,
) -> u64 {
	let transfers_value = value != U256::zero();
	address_access_cost(is_cold, config.gas_call(), config)
		+ xfer_cost(is_call_or_callcode, transfers_value)
		+ new_cost(is_call_or_staticcall, new_account, transfers_value, config)
}

fn xfer_cost(is_call_or_callcode: bool, transfers_value: bool) -> u64 {
	if is_call_or_callcode && transfers_value {
		G_CALLVALUE
	} else {
		0
	}
}

fn new_cost(
	is_call_or_staticcall: bool,
	new_account: bool,
	transfers_value: bool,
	config: &Config,
) -> u64 {
	if !is_call_or_staticcall {
		return 0;
	}

	let chargeable = if config.eip161_empty_check {
		transfers_value && new_account
	} else {
		new_account
	};

	if chargeable { G_NEWACCOUNT } else { 0 }
}

/// Before the 63/64 rule, a call naming more gas than remains is an
/// error rather than a cap.
pub fn call_extra_check(gas: U256, after_gas: u64, config: &Config) -> Result<(), ExitError> {
	if !config.eip150_call_l64_after_gas && gas > U256::from(after_gas) {
		return Err(ExitException::OutOfGas.into());
	}
	Ok(())
}

pub fn selfdestruct_cost(
	value: U256,
	is_cold: bool,
	target_exists: bool,
	config: &Config,
) -> u64 {
	let should_charge_topup = if config.eip161_empty_check {
		value != U256::zero() && !target_exists
	} else {
		!target_exists
	};

	let topup = if should_charge_topup {
		config.gas_selfdestruct_new_account()
	} else {
		0
	};

	let surcharge = if is_cold {
		config.gas_account_access_cold()
	} else {
		0
	};

	config.gas_selfdestruct() + topup + surcharge
}

pub fn selfdestruct_refund(already_removed: bool) -> i64 {
	if already_removed { 0 } else { R_SELFDESTRUCT }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn h(v: u8) -> H256 {
		H256::from_low_u64_be(u64::from(v))
	}

	#[test]
	fn quadratic_memory_cost() {
		assert_eq!(memory_gas(0).unwrap(), 0);
		assert_eq!(memory_gas(1).unwrap(), 3);
		assert_eq!(memory_gas(32).unwrap(), 98);
		assert!(memory_gas(u64::MAX).is_err());
	}

	#[test]
	fn legacy_sstore_schedule() {
		let config = Config::frontier();
		let gas = 100_000;
		// fresh set
		assert_eq!(
			sstore_cost(h(0), h(0), h(1), gas, false, &config).unwrap(),
			20000
		);
		// overwrite
		assert_eq!(
			sstore_cost(h(0), h(1), h(2), gas, false, &config).unwrap(),
			5000
		);
		// clear refunds
		assert_eq!(sstore_refund(h(1), h(1), h(0), &config), 15000);
		assert_eq!(sstore_refund(h(0), h(0), h(1), &config), 0);
	}

	#[test]
	fn istanbul_net_metering() {
		let config = Config::istanbul();
		let gas = 100_000;
		// no-op write costs an sload
		assert_eq!(
			sstore_cost(h(1), h(1), h(1), gas, false, &config).unwrap(),
			800
		);
		// dirty write costs an sload
		assert_eq!(
			sstore_cost(h(1), h(2), h(3), gas, false, &config).unwrap(),
			800
		);
		// restoring the original value refunds the difference
		assert_eq!(sstore_refund(h(1), h(2), h(1), &config), 5000 - 800);
		// stipend guard
		assert!(sstore_cost(h(0), h(0), h(1), 2300, false, &config).is_err());
	}

	#[test]
	fn berlin_cold_surcharges() {
		let config = Config::berlin();
		let gas = 100_000;
		assert_eq!(sload_cost(true, &config), 2100);
		assert_eq!(sload_cost(false, &config), 100);
		assert_eq!(
			sstore_cost(h(1), h(1), h(2), gas, true, &config).unwrap(),
			2900 + 2100
		);
		assert_eq!(
			sstore_cost(h(1), h(1), h(1), gas, false, &config).unwrap(),
			100
		);
		assert_eq!(sstore_refund(h(1), h(2), h(1), &config), 2900 - 100);
	}

	#[test]
	fn exp_cost_counts_exponent_bytes() {
		let config = Config::frontier();
		assert_eq!(exp_cost(U256::zero(), &config).unwrap(), 10);
		assert_eq!(exp_cost(U256::from(255), &config).unwrap(), 20);
		assert_eq!(exp_cost(U256::from(256), &config).unwrap(), 30);

		let spurious = Config::spurious_dragon();
		assert_eq!(exp_cost(U256::from(256), &spurious).unwrap(), 110);
	}
}
