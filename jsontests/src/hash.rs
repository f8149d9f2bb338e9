use ethvm_interpreter::Log;
use primitive_types::H256;
use rlp::RlpStream;
use sha3::{Digest, Keccak256};

/// Keccak of the RLP-encoded log list, the `logs` expectation of the
/// VMTests format.
pub fn logs_hash(logs: &[Log]) -> H256 {
	let mut stream = RlpStream::new_list(logs.len());
	for log in logs {
		stream.begin_list(3);
		stream.append(&log.address);
		stream.begin_list(log.topics.len());
		for topic in &log.topics {
			stream.append(topic);
		}
		stream.append(&log.data);
	}

	H256::from_slice(Keccak256::digest(stream.out()).as_slice())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_log_list() {
		// keccak(rlp([]))
		assert_eq!(
			logs_hash(&[]),
			"1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347"
				.parse()
				.unwrap()
		);
	}
}
