use crate::error::{ExitError, ExitException};

/// Per-frame gas meter. A single remaining counter: charging deducts, a
/// charge past the remaining gas fails with `OutOfGas` and leaves the
/// meter unchanged. Refunds accumulate separately and are applied only at
/// the transaction boundary, outside the interpreter.
#[derive(Clone, Debug)]
pub struct Gasometer {
	gas_limit: u64,
	used_gas: u64,
	refunded_gas: i64,
	last_cost: u64,
	memory_cost: u64,
}

impl Gasometer {
	/// Create a new gas meter with the given limit.
	pub fn new(gas_limit: u64) -> Self {
		Self {
			gas_limit,
			used_gas: 0,
			refunded_gas: 0,
			last_cost: 0,
			memory_cost: 0,
		}
	}

	/// Gas limit the meter was created with.
	pub fn gas_limit(&self) -> u64 {
		self.gas_limit
	}

	/// Remaining gas.
	pub fn gas(&self) -> u64 {
		self.gas_limit - self.used_gas
	}

	/// Total gas used so far.
	pub fn used_gas(&self) -> u64 {
		self.used_gas
	}

	/// Accumulated refund counter.
	pub fn refunded_gas(&self) -> i64 {
		self.refunded_gas
	}

	/// The most recent successful charge. Trace and debug only.
	pub fn last_cost(&self) -> u64 {
		self.last_cost
	}

	/// Charge an explicit cost.
	#[inline]
	pub fn record_cost(&mut self, cost: u64) -> Result<(), ExitError> {
		if cost > self.gas() {
			return Err(ExitException::OutOfGas.into());
		}
		self.used_gas += cost;
		self.last_cost = cost;
		Ok(())
	}

	/// Accumulate a refund (or un-refund, when negative).
	pub fn record_refund(&mut self, refund: i64) {
		self.refunded_gas += refund;
	}

	/// Charge for memory growth. `new_cost` is the total memory cost of
	/// the grown size; only the increase over the already-charged cost is
	/// deducted. Memory never shrinks, so a smaller cost charges nothing.
	pub fn record_memory_cost(&mut self, new_cost: u64) -> Result<(), ExitError> {
		if new_cost <= self.memory_cost {
			return Ok(());
		}

		let delta = new_cost - self.memory_cost;
		self.record_cost(delta)?;
		self.memory_cost = new_cost;
		Ok(())
	}

	/// Consume all remaining gas, used by exceptional halts and the
	/// designated invalid instruction.
	pub fn burn(&mut self) {
		self.used_gas = self.gas_limit;
		self.refunded_gas = 0;
	}

	/// Return unused gas of a finished child frame to this meter.
	pub fn reclaim(&mut self, unused: u64) {
		self.used_gas = self.used_gas.saturating_sub(unused);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn failed_charge_leaves_meter_unchanged() {
		let mut gasometer = Gasometer::new(10);
		gasometer.record_cost(4).unwrap();
		assert_eq!(
			gasometer.record_cost(7),
			Err(ExitException::OutOfGas.into())
		);
		assert_eq!(gasometer.gas(), 6);
		assert_eq!(gasometer.last_cost(), 4);
	}

	#[test]
	fn memory_cost_charges_delta_only() {
		let mut gasometer = Gasometer::new(100);
		gasometer.record_memory_cost(9).unwrap();
		assert_eq!(gasometer.gas(), 91);
		gasometer.record_memory_cost(15).unwrap();
		assert_eq!(gasometer.gas(), 85);
		// shrinking never refunds
		gasometer.record_memory_cost(9).unwrap();
		assert_eq!(gasometer.gas(), 85);
	}

	#[test]
	fn burn_discards_refunds() {
		let mut gasometer = Gasometer::new(100);
		gasometer.record_refund(15000);
		gasometer.burn();
		assert_eq!(gasometer.gas(), 0);
		assert_eq!(gasometer.refunded_gas(), 0);
	}
}
