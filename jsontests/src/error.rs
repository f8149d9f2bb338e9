use ethvm_interpreter::StatusCode;
use primitive_types::{H160, H256};
use thiserror::Error;

/// Mismatch between an execution and the test's expectations.
#[derive(Error, Debug)]
pub enum TestError {
	#[error("expected a failure, got {0:?}")]
	UnexpectedSuccess(StatusCode),
	#[error("expected success, got {0:?}")]
	UnexpectedFailure(StatusCode),
	#[error("remaining gas mismatch: expected {expected}, got {got}")]
	GasMismatch { expected: u64, got: u64 },
	#[error("output mismatch: expected 0x{}, got 0x{}", hex::encode(expected), hex::encode(got))]
	OutputMismatch { expected: Vec<u8>, got: Vec<u8> },
	#[error("account {0:?} field {1} differs from post state")]
	StateMismatch(H160, &'static str),
	#[error("account {0:?} not present in the post state")]
	UnexpectedAccount(H160),
	#[error("storage mismatch at {0:?} key {1:?}")]
	StorageMismatch(H160, H256),
	#[error("logs hash mismatch: expected {expected:?}, got {got:?}")]
	LogsMismatch { expected: H256, got: H256 },
}

/// Driver-level error.
#[derive(Error, Debug)]
pub enum Error {
	#[error("io error")]
	IO(#[from] std::io::Error),
	#[error("json error")]
	JSON(#[from] serde_json::Error),
	#[error("test {0} failed: {1}")]
	Test(String, TestError),
}
