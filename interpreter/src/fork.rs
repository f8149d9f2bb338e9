//! Fork enumeration and the per-fork configuration it resolves to.

/// Named protocol revisions the interpreter can execute under. Each pins
/// an opcode set and a gas schedule.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Fork {
	Frontier,
	Homestead,
	TangerineWhistle,
	SpuriousDragon,
	Byzantium,
	Constantinople,
	Petersburg,
	Istanbul,
	Berlin,
}

impl Fork {
	/// The configuration in effect at this fork.
	#[must_use]
	pub const fn config(self) -> &'static Config {
		match self {
			Self::Frontier => &FRONTIER,
			Self::Homestead => &HOMESTEAD,
			Self::TangerineWhistle => &TANGERINE_WHISTLE,
			Self::SpuriousDragon => &SPURIOUS_DRAGON,
			Self::Byzantium => &BYZANTIUM,
			Self::Constantinople => &CONSTANTINOPLE,
			Self::Petersburg => &PETERSBURG,
			Self::Istanbul => &ISTANBUL,
			Self::Berlin => &BERLIN,
		}
	}
}

static FRONTIER: Config = Config::frontier();
static HOMESTEAD: Config = Config::homestead();
static TANGERINE_WHISTLE: Config = Config::tangerine_whistle();
static SPURIOUS_DRAGON: Config = Config::spurious_dragon();
static BYZANTIUM: Config = Config::byzantium();
static CONSTANTINOPLE: Config = Config::constantinople();
static PETERSBURG: Config = Config::petersburg();
static ISTANBUL: Config = Config::istanbul();
static BERLIN: Config = Config::berlin();

/// Per-fork feature switches. Gas numbers derive from these through the
/// accessor methods below.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Config {
	/// Contract creation fails when the code deposit cannot be paid.
	pub eip2_create_fails_on_deposit: bool,
	/// Has `DELEGATECALL`.
	pub eip7_delegate_call: bool,
	/// IO-heavy gas increases of EIP-150.
	pub eip150_gas_increase: bool,
	/// Forward at most 63/64 of remaining gas on calls and creates
	/// instead of failing when more is requested.
	pub eip150_call_l64_after_gas: bool,
	/// `EXP` per-byte cost increase.
	pub eip160_exp_increase: bool,
	/// Empty accounts are treated as non-existent for new-account
	/// charges.
	pub eip161_empty_check: bool,
	/// Created contracts start with nonce one.
	pub eip161_create_increase_nonce: bool,
	/// Deployed code size limit.
	pub eip170_create_contract_limit: bool,
	/// Has `REVERT`.
	pub eip140_revert: bool,
	/// Has `RETURNDATASIZE`/`RETURNDATACOPY`.
	pub eip211_return_data: bool,
	/// Has `STATICCALL`.
	pub eip214_static_call: bool,
	/// Modexp precompile.
	pub eip198_modexp_precompile: bool,
	/// EC add/mul precompiles.
	pub eip196_ec_add_mul_precompile: bool,
	/// EC pairing precompile.
	pub eip197_ec_pairing_precompile: bool,
	/// Has `SHL`/`SHR`/`SAR`.
	pub eip145_bitwise_shifting: bool,
	/// Has `CREATE2`.
	pub eip1014_create2: bool,
	/// Has `EXTCODEHASH`.
	pub eip1052_ext_code_hash: bool,
	/// Net gas metering for `SSTORE`.
	pub sstore_net_gas_metering: bool,
	/// `SSTORE` fails when less than the call stipend remains.
	pub eip1706_sstore_stipend_check: bool,
	/// Trie-size-dependent repricing of `SLOAD`, `BALANCE` and
	/// `EXTCODEHASH`.
	pub eip1884_trie_repricing: bool,
	/// Has `SELFBALANCE`.
	pub eip1884_self_balance: bool,
	/// Has `CHAINID`.
	pub eip1344_chain_id: bool,
	/// Blake2 F precompile.
	pub eip152_blake_2f_precompile: bool,
	/// Cheaper EC add/mul/pairing.
	pub eip1108_ec_repricing: bool,
	/// Warm/cold account and storage access accounting.
	pub eip2929_increase_state_access_gas: bool,
	/// Cheaper modexp pricing.
	pub eip2565_lower_modexp: bool,
}

impl Config {
	/// Frontier configuration.
	pub const fn frontier() -> Config {
		Config {
			eip2_create_fails_on_deposit: false,
			eip7_delegate_call: false,
			eip150_gas_increase: false,
			eip150_call_l64_after_gas: false,
			eip160_exp_increase: false,
			eip161_empty_check: false,
			eip161_create_increase_nonce: false,
			eip170_create_contract_limit: false,
			eip140_revert: false,
			eip211_return_data: false,
			eip214_static_call: false,
			eip198_modexp_precompile: false,
			eip196_ec_add_mul_precompile: false,
			eip197_ec_pairing_precompile: false,
			eip145_bitwise_shifting: false,
			eip1014_create2: false,
			eip1052_ext_code_hash: false,
			sstore_net_gas_metering: false,
			eip1706_sstore_stipend_check: false,
			eip1884_trie_repricing: false,
			eip1884_self_balance: false,
			eip1344_chain_id: false,
			eip152_blake_2f_precompile: false,
			eip1108_ec_repricing: false,
			eip2929_increase_state_access_gas: false,
			eip2565_lower_modexp: false,
		}
	}

	/// Homestead configuration.
	pub const fn homestead() -> Config {
		let mut config = Self::frontier();
		config.eip2_create_fails_on_deposit = true;
		config.eip7_delegate_call = true;
		config
	}

	/// Tangerine Whistle configuration.
	pub const fn tangerine_whistle() -> Config {
		let mut config = Self::homestead();
		config.eip150_gas_increase = true;
		config.eip150_call_l64_after_gas = true;
		config
	}

	/// Spurious Dragon configuration.
	pub const fn spurious_dragon() -> Config {
		let mut config = Self::tangerine_whistle();
		config.eip160_exp_increase = true;
		config.eip161_empty_check = true;
		config.eip161_create_increase_nonce = true;
		config.eip170_create_contract_limit = true;
		config
	}

	/// Byzantium configuration.
	pub const fn byzantium() -> Config {
		let mut config = Self::spurious_dragon();
		config.eip140_revert = true;
		config.eip211_return_data = true;
		config.eip214_static_call = true;
		config.eip198_modexp_precompile = true;
		config.eip196_ec_add_mul_precompile = true;
		config.eip197_ec_pairing_precompile = true;
		config
	}

	/// Constantinople configuration, including the net `SSTORE` metering
	/// that Petersburg later removed.
	pub const fn constantinople() -> Config {
		let mut config = Self::byzantium();
		config.eip145_bitwise_shifting = true;
		config.eip1014_create2 = true;
		config.eip1052_ext_code_hash = true;
		config.sstore_net_gas_metering = true;
		config
	}

	/// Petersburg configuration.
	pub const fn petersburg() -> Config {
		let mut config = Self::constantinople();
		config.sstore_net_gas_metering = false;
		config
	}

	/// Istanbul configuration.
	pub const fn istanbul() -> Config {
		let mut config = Self::petersburg();
		config.sstore_net_gas_metering = true;
		config.eip1706_sstore_stipend_check = true;
		config.eip1884_trie_repricing = true;
		config.eip1884_self_balance = true;
		config.eip1344_chain_id = true;
		config.eip152_blake_2f_precompile = true;
		config.eip1108_ec_repricing = true;
		config
	}

	/// Berlin configuration.
	pub const fn berlin() -> Config {
		let mut config = Self::istanbul();
		config.eip2929_increase_state_access_gas = true;
		config.eip2565_lower_modexp = true;
		config
	}
}

impl Config {
	/// Gas paid for `EXTCODESIZE` and `EXTCODECOPY`, before warm/cold
	/// accounting.
	pub const fn gas_ext_code(&self) -> u64 {
		if self.eip150_gas_increase { 700 } else { 20 }
	}

	/// Gas paid for `EXTCODEHASH`, before warm/cold accounting.
	pub const fn gas_ext_code_hash(&self) -> u64 {
		if self.eip1884_trie_repricing { 700 } else { 400 }
	}

	/// Gas paid for `BALANCE`, before warm/cold accounting.
	pub const fn gas_balance(&self) -> u64 {
		if self.eip1884_trie_repricing {
			700
		} else if self.eip150_gas_increase {
			400
		} else {
			20
		}
	}

	/// Gas paid for a warm `SLOAD`. Under net `SSTORE` metering this is
	/// also the dirty-write cost.
	pub const fn gas_sload(&self) -> u64 {
		if self.eip2929_increase_state_access_gas {
			100
		} else if self.eip1884_trie_repricing {
			800
		} else if self.eip150_gas_increase {
			200
		} else {
			50
		}
	}

	/// Additional gas paid for a cold `SLOAD`.
	pub const fn gas_sload_cold(&self) -> u64 {
		if self.eip2929_increase_state_access_gas {
			2100
		} else {
			0
		}
	}

	/// Gas paid for `SSTORE` setting a zero slot to non-zero.
	pub const fn gas_sstore_set(&self) -> u64 {
		20000
	}

	/// Gas paid for an `SSTORE` reset.
	pub const fn gas_sstore_reset(&self) -> u64 {
		if self.eip2929_increase_state_access_gas {
			2900
		} else {
			5000
		}
	}

	/// Refund for an `SSTORE` clearing a slot.
	pub const fn refund_sstore_clears(&self) -> i64 {
		15000
	}

	/// Gas paid for the `CALL` family, before warm/cold accounting.
	pub const fn gas_call(&self) -> u64 {
		if self.eip150_gas_increase { 700 } else { 40 }
	}

	/// Gas paid per byte of `EXP` exponent.
	pub const fn gas_expbyte(&self) -> u64 {
		if self.eip160_exp_increase { 50 } else { 10 }
	}

	/// Gas paid for `SELFDESTRUCT`.
	pub const fn gas_selfdestruct(&self) -> u64 {
		if self.eip150_gas_increase { 5000 } else { 0 }
	}

	/// Gas paid for `SELFDESTRUCT` naming a fresh beneficiary.
	pub const fn gas_selfdestruct_new_account(&self) -> u64 {
		if self.eip150_gas_increase { 25000 } else { 0 }
	}

	/// Gas paid for a cold account access.
	pub const fn gas_account_access_cold(&self) -> u64 {
		if self.eip2929_increase_state_access_gas {
			2600
		} else {
			0
		}
	}

	/// Gas paid for a warm account access.
	pub const fn gas_storage_read_warm(&self) -> u64 {
		if self.eip2929_increase_state_access_gas {
			100
		} else {
			0
		}
	}

	/// Divisor of the refund cap applied at the transaction boundary.
	pub const fn max_refund_quotient(&self) -> u64 {
		2
	}

	/// Gas retained by the callee of a value-bearing call.
	pub const fn call_stipend(&self) -> u64 {
		2300
	}

	/// Operand stack depth limit.
	pub const fn stack_limit(&self) -> usize {
		1024
	}

	/// Hard memory size limit.
	pub const fn memory_limit(&self) -> usize {
		usize::MAX
	}

	/// Call depth limit.
	pub const fn call_stack_limit(&self) -> u32 {
		1024
	}

	/// Deployed code size limit, if any.
	pub const fn create_contract_limit(&self) -> Option<usize> {
		if self.eip170_create_contract_limit {
			Some(0x6000)
		} else {
			None
		}
	}
}
