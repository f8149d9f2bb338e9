use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ethvm_interpreter::runtime::{Environment, Host};
use ethvm_interpreter::{
	execute_with, Fork, Message, NoListener, OverlayedHost, StatusCode,
};
use ethvm_precompile::StandardPrecompileSet;
use primitive_types::H160;

use crate::error::{Error, TestError};
use crate::hash::logs_hash;
use crate::in_memory::InMemoryBackend;
use crate::types::Test;

/// Run every test of a VMTests JSON file at the given fork.
pub fn run_file(path: &Path, fork: Fork) -> Result<usize, Error> {
	let tests: HashMap<String, Test> =
		serde_json::from_reader(BufReader::new(File::open(path)?))?;

	let mut completed = 0;
	for (name, test) in tests {
		run_test(&test, fork).map_err(|err| Error::Test(name, err))?;
		completed += 1;
	}

	Ok(completed)
}

/// Run a single test at the given fork.
pub fn run_test(test: &Test, fork: Fork) -> Result<(), TestError> {
	let backend = InMemoryBackend {
		environment: test.unwrap_to_environment(),
		state: test.unwrap_to_pre_state(),
	};
	let mut host = OverlayedHost::new(backend);
	let config = fork.config();

	let address = test.unwrap_to_address();
	let caller = test.unwrap_to_caller();

	// the transaction-start access list: origin, target, precompiles
	if config.eip2929_increase_state_access_gas {
		let origin = host.origin();
		host.warm_up_account(origin);
		host.warm_up_account(caller);
		host.warm_up_account(address);
		for index in 1..=9u64 {
			host.warm_up_account(H160::from_low_u64_be(index));
		}
	}

	let message = Message::call(
		caller,
		address,
		test.unwrap_to_value(),
		test.unwrap_to_data(),
		test.unwrap_to_gas_limit(),
	);

	let result = execute_with(
		&mut host,
		fork,
		&StandardPrecompileSet,
		&mut NoListener,
		message,
		test.unwrap_to_code(),
	);

	// a test without a post section expects the execution to fail
	if test.post.is_none() {
		return if result.status == StatusCode::Success {
			Err(TestError::UnexpectedSuccess(result.status))
		} else {
			Ok(())
		};
	}

	if result.status != StatusCode::Success {
		return Err(TestError::UnexpectedFailure(result.status));
	}

	if test.gas.is_some() {
		// the gas expectation is settled at the transaction boundary,
		// with the refund counter applied under its cap
		let expected = test.unwrap_to_post_gas();
		let got = result.gas_left_with_refund(test.unwrap_to_gas_limit(), config);
		if got != expected {
			return Err(TestError::GasMismatch { expected, got });
		}
	}

	let expected_out = test.unwrap_to_return_value();
	if result.output != expected_out {
		return Err(TestError::OutputMismatch {
			expected: expected_out,
			got: result.output,
		});
	}

	let (mut backend, changeset) = host.deconstruct();

	if let Some(expected) = test.unwrap_to_logs_hash() {
		let got = logs_hash(&changeset.logs);
		if got != expected {
			return Err(TestError::LogsMismatch { expected, got });
		}
	}

	backend.apply_change_set(&changeset);

	// the post section enumerates the complete resulting state, so the
	// comparison runs both ways
	let post = test.unwrap_to_post_state();

	for (address, expected) in &post {
		let got = backend.state.get(address).cloned().unwrap_or_default();

		if got.balance != expected.balance {
			return Err(TestError::StateMismatch(*address, "balance"));
		}
		if got.nonce != expected.nonce {
			return Err(TestError::StateMismatch(*address, "nonce"));
		}
		if got.code != expected.code {
			return Err(TestError::StateMismatch(*address, "code"));
		}
		for key in expected.storage.keys().chain(got.storage.keys()) {
			let got_value = got.storage.get(key).cloned().unwrap_or_default();
			let expected_value = expected.storage.get(key).cloned().unwrap_or_default();
			if got_value != expected_value {
				return Err(TestError::StorageMismatch(*address, *key));
			}
		}
	}

	for address in backend.state.keys() {
		if !post.contains_key(address) {
			return Err(TestError::UnexpectedAccount(*address));
		}
	}

	Ok(())
}
