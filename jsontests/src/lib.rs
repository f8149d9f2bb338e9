//! Driver for the Ethereum VMTests JSON format.
//!
//! A test supplies a block environment, a message (`exec`), a pre state
//! and expectations: the post state, remaining gas, output bytes and the
//! keccak of the RLP-encoded log list.

mod error;
mod hash;
mod in_memory;
mod run;
mod types;

pub use crate::error::{Error, TestError};
pub use crate::hash::logs_hash;
pub use crate::in_memory::{InMemoryAccount, InMemoryBackend, InMemoryEnvironment};
pub use crate::run::{run_file, run_test};
pub use crate::types::{Account, Env, Exec, Test};

use ethvm_interpreter::Fork;

/// Parse a fork name as used on the command line.
pub fn parse_fork(name: &str) -> Option<Fork> {
	Some(match name.to_lowercase().as_str() {
		"frontier" => Fork::Frontier,
		"homestead" => Fork::Homestead,
		"tangerinewhistle" | "eip150" => Fork::TangerineWhistle,
		"spuriousdragon" | "eip158" => Fork::SpuriousDragon,
		"byzantium" => Fork::Byzantium,
		"constantinople" => Fork::Constantinople,
		"petersburg" | "constantinoplefix" => Fork::Petersburg,
		"istanbul" => Fork::Istanbul,
		"berlin" => Fork::Berlin,
		_ => return None,
	})
}
