use alloc::vec::Vec;

use primitive_types::{H256, U256};
use sha3::{Digest, Keccak256};

use crate::error::{ExitException, ExitSucceed};
use crate::etable::Control;
use crate::runtime::{Host, Log};
use crate::utils::h256_to_h160;
use crate::Frame;

pub fn sha3(frame: &mut Frame) -> Control {
	pop_u256!(frame, from, len);

	try_or_fail!(frame.memory.resize_offset(from, len));
	let data = if len == U256::zero() {
		Vec::new()
	} else {
		let from = as_usize_or_fail!(from);
		let len = as_usize_or_fail!(len);

		frame.memory.get(from, len)
	};

	let ret = Keccak256::digest(data.as_slice());
	push!(frame, H256::from_slice(ret.as_slice()));

	Control::Continue(1)
}

pub fn address(frame: &mut Frame) -> Control {
	let ret = H256::from(frame.context.address);
	push!(frame, ret);

	Control::Continue(1)
}

pub fn balance<H: Host>(frame: &mut Frame, host: &H) -> Control {
	pop!(frame, address);
	push_u256!(frame, host.balance(h256_to_h160(address)));

	Control::Continue(1)
}

pub fn selfbalance<H: Host>(frame: &mut Frame, host: &H) -> Control {
	push_u256!(frame, host.balance(frame.context.address));

	Control::Continue(1)
}

pub fn origin<H: Host>(frame: &mut Frame, host: &H) -> Control {
	let ret = H256::from(host.origin());
	push!(frame, ret);

	Control::Continue(1)
}

pub fn caller(frame: &mut Frame) -> Control {
	let ret = H256::from(frame.context.caller);
	push!(frame, ret);

	Control::Continue(1)
}

pub fn callvalue(frame: &mut Frame) -> Control {
	push_u256!(frame, frame.context.apparent_value);

	Control::Continue(1)
}

pub fn gasprice<H: Host>(frame: &mut Frame, host: &H) -> Control {
	push_u256!(frame, host.gas_price());

	Control::Continue(1)
}

pub fn extcodesize<H: Host>(frame: &mut Frame, host: &H) -> Control {
	pop!(frame, address);
	push_u256!(frame, host.code_size(h256_to_h160(address)));

	Control::Continue(1)
}

pub fn extcodehash<H: Host>(frame: &mut Frame, host: &H) -> Control {
	pop!(frame, address);
	push!(frame, host.code_hash(h256_to_h160(address)));

	Control::Continue(1)
}

pub fn extcodecopy<H: Host>(frame: &mut Frame, host: &H) -> Control {
	pop!(frame, address);
	pop_u256!(frame, memory_offset, code_offset, len);

	try_or_fail!(frame.memory.resize_offset(memory_offset, len));
	if len == U256::zero() {
		return Control::Continue(1);
	}

	let code = host.code(h256_to_h160(address));
	match frame
		.memory
		.copy_large(memory_offset, code_offset, len, &code)
	{
		Ok(()) => Control::Continue(1),
		Err(e) => Control::Exit(e.into()),
	}
}

pub fn returndatasize(frame: &mut Frame) -> Control {
	let size = U256::from(frame.retbuf.len());
	push_u256!(frame, size);

	Control::Continue(1)
}

pub fn returndatacopy(frame: &mut Frame) -> Control {
	pop_u256!(frame, memory_offset, data_offset, len);

	try_or_fail!(frame.memory.resize_offset(memory_offset, len));
	// reading past the return buffer is a hard failure, not zero-fill
	if data_offset
		.checked_add(len)
		.map_or(true, |end| end > U256::from(frame.retbuf.len()))
	{
		return Control::Exit(ExitException::InvalidMemoryAccess.into());
	}

	if len == U256::zero() {
		return Control::Continue(1);
	}

	let retbuf = core::mem::take(&mut frame.retbuf);
	let control = match frame
		.memory
		.copy_large(memory_offset, data_offset, len, &retbuf)
	{
		Ok(()) => Control::Continue(1),
		Err(e) => Control::Exit(e.into()),
	};
	frame.retbuf = retbuf;

	control
}

pub fn blockhash<H: Host>(frame: &mut Frame, host: &H) -> Control {
	pop_u256!(frame, number);
	push!(frame, host.block_hash(number));

	Control::Continue(1)
}

pub fn coinbase<H: Host>(frame: &mut Frame, host: &H) -> Control {
	push!(frame, H256::from(host.block_coinbase()));
	Control::Continue(1)
}

pub fn timestamp<H: Host>(frame: &mut Frame, host: &H) -> Control {
	push_u256!(frame, host.block_timestamp());
	Control::Continue(1)
}

pub fn number<H: Host>(frame: &mut Frame, host: &H) -> Control {
	push_u256!(frame, host.block_number());
	Control::Continue(1)
}

pub fn difficulty<H: Host>(frame: &mut Frame, host: &H) -> Control {
	push_u256!(frame, host.block_difficulty());
	Control::Continue(1)
}

pub fn gaslimit<H: Host>(frame: &mut Frame, host: &H) -> Control {
	push_u256!(frame, host.block_gas_limit());
	Control::Continue(1)
}

pub fn chainid<H: Host>(frame: &mut Frame, host: &H) -> Control {
	push_u256!(frame, host.chain_id());
	Control::Continue(1)
}

pub fn sload<H: Host>(frame: &mut Frame, host: &H) -> Control {
	pop!(frame, key);
	let value = host.storage(frame.context.address, key);
	push!(frame, value);

	Control::Continue(1)
}

pub fn sstore<H: Host>(frame: &mut Frame, host: &mut H) -> Control {
	pop!(frame, key, value);
	host.set_storage(frame.context.address, key, value);

	Control::Continue(1)
}

pub fn gas(frame: &mut Frame) -> Control {
	push_u256!(frame, U256::from(frame.gasometer.gas()));

	Control::Continue(1)
}

pub fn log<H: Host>(frame: &mut Frame, n: u8, host: &mut H) -> Control {
	pop_u256!(frame, offset, len);

	try_or_fail!(frame.memory.resize_offset(offset, len));
	let data = if len == U256::zero() {
		Vec::new()
	} else {
		let offset = as_usize_or_fail!(offset);
		let len = as_usize_or_fail!(len);

		frame.memory.get(offset, len)
	};

	let mut topics = Vec::new();
	for _ in 0..(n as usize) {
		match frame.stack.pop() {
			Ok(value) => topics.push(value),
			Err(e) => return Control::Exit(e.into()),
		}
	}

	host.log(Log {
		address: frame.context.address,
		topics,
		data,
	});

	Control::Continue(1)
}

pub fn selfdestruct<H: Host>(frame: &mut Frame, host: &mut H) -> Control {
	pop!(frame, target);

	match host.selfdestruct(frame.context.address, h256_to_h160(target)) {
		Ok(()) => Control::Exit(ExitSucceed::SelfDestructed.into()),
		Err(e) => Control::Exit(Err(e)),
	}
}

pub fn invalid(frame: &mut Frame) -> Control {
	// the designated invalid instruction burns everything
	frame.gasometer.burn();
	Control::Exit(ExitException::InvalidInstruction.into())
}
