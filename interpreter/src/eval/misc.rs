use alloc::vec::Vec;
use core::cmp::min;

use primitive_types::{H256, U256};

use crate::error::{ExitError, ExitException, ExitSucceed};
use crate::etable::Control;
use crate::Frame;

#[inline]
pub fn codesize(frame: &mut Frame) -> Control {
	let size = U256::from(frame.code().len());
	push_u256!(frame, size);
	Control::Continue(1)
}

#[inline]
pub fn codecopy(frame: &mut Frame) -> Control {
	pop_u256!(frame, memory_offset, code_offset, len);

	try_or_fail!(frame.memory.resize_offset(memory_offset, len));
	if len == U256::zero() {
		return Control::Continue(1);
	}

	let code = frame.code.clone();
	match frame
		.memory
		.copy_large(memory_offset, code_offset, len, &code)
	{
		Ok(()) => Control::Continue(1),
		Err(e) => Control::Exit(e.into()),
	}
}

#[inline]
pub fn calldataload(frame: &mut Frame) -> Control {
	pop_u256!(frame, index);

	let mut load = [0u8; 32];
	#[allow(clippy::needless_range_loop)]
	for i in 0..32 {
		if let Some(p) = index.checked_add(U256::from(i)) {
			if p <= U256::from(usize::MAX) {
				let p = p.as_usize();
				if p < frame.data().len() {
					load[i] = frame.data()[p];
				}
			}
		}
	}

	push!(frame, H256::from(load));
	Control::Continue(1)
}

#[inline]
pub fn calldatasize(frame: &mut Frame) -> Control {
	let len = U256::from(frame.data().len());
	push_u256!(frame, len);
	Control::Continue(1)
}

#[inline]
pub fn calldatacopy(frame: &mut Frame) -> Control {
	pop_u256!(frame, memory_offset, data_offset, len);

	try_or_fail!(frame.memory.resize_offset(memory_offset, len));
	if len == U256::zero() {
		return Control::Continue(1);
	}

	let data = frame.data.clone();
	match frame
		.memory
		.copy_large(memory_offset, data_offset, len, &data)
	{
		Ok(()) => Control::Continue(1),
		Err(e) => Control::Exit(e.into()),
	}
}

#[inline]
pub fn pop(frame: &mut Frame) -> Control {
	pop!(frame, _val);
	Control::Continue(1)
}

#[inline]
pub fn mload(frame: &mut Frame) -> Control {
	pop_u256!(frame, index);
	try_or_fail!(frame.memory.resize_offset(index, U256::from(32)));
	let index = as_usize_or_fail!(index);
	let value = H256::from_slice(&frame.memory.get(index, 32)[..]);
	push!(frame, value);
	Control::Continue(1)
}

#[inline]
pub fn mstore(frame: &mut Frame) -> Control {
	pop_u256!(frame, index);
	pop!(frame, value);
	try_or_fail!(frame.memory.resize_offset(index, U256::from(32)));
	let index = as_usize_or_fail!(index);
	match frame.memory.set(index, &value[..], Some(32)) {
		Ok(()) => Control::Continue(1),
		Err(e) => Control::Exit(e.into()),
	}
}

#[inline]
pub fn mstore8(frame: &mut Frame) -> Control {
	pop_u256!(frame, index, value);
	try_or_fail!(frame.memory.resize_offset(index, U256::one()));
	let index = as_usize_or_fail!(index);
	let value = (value.low_u32() & 0xff) as u8;
	match frame.memory.set(index, &[value], Some(1)) {
		Ok(()) => Control::Continue(1),
		Err(e) => Control::Exit(e.into()),
	}
}

#[inline]
pub fn jump(frame: &mut Frame) -> Control {
	pop_u256!(frame, dest);
	let dest = as_usize_or_fail!(dest, ExitException::BadJumpDestination);

	Control::Jump(dest)
}

#[inline]
pub fn jumpi(frame: &mut Frame) -> Control {
	pop_u256!(frame, dest);
	pop!(frame, value);

	if value == H256::zero() {
		Control::Continue(1)
	} else {
		let dest = as_usize_or_fail!(dest, ExitException::BadJumpDestination);
		Control::Jump(dest)
	}
}

#[inline]
pub fn pc(frame: &mut Frame, position: usize) -> Control {
	push_u256!(frame, U256::from(position));
	Control::Continue(1)
}

#[inline]
pub fn msize(frame: &mut Frame) -> Control {
	push_u256!(frame, frame.memory.effective_len());
	Control::Continue(1)
}

#[inline]
pub fn push(frame: &mut Frame, n: usize, position: usize) -> Control {
	let end = min(position + 1 + n, frame.code().len());
	let slice = &frame.code()[(position + 1)..end];
	let mut val = [0u8; 32];
	val[(32 - n)..(32 - n + slice.len())].copy_from_slice(slice);

	let result = H256(val);
	push!(frame, result);
	Control::Continue(1 + n)
}

#[inline]
pub fn dup(frame: &mut Frame, n: usize) -> Control {
	let value = match frame.stack.peek(n - 1) {
		Ok(value) => value,
		Err(e) => return Control::Exit(e.into()),
	};
	push!(frame, value);
	Control::Continue(1)
}

#[inline]
pub fn swap(frame: &mut Frame, n: usize) -> Control {
	let val1 = match frame.stack.peek(0) {
		Ok(value) => value,
		Err(e) => return Control::Exit(e.into()),
	};
	let val2 = match frame.stack.peek(n) {
		Ok(value) => value,
		Err(e) => return Control::Exit(e.into()),
	};
	try_or_fail!(frame.stack.set(0, val2));
	try_or_fail!(frame.stack.set(n, val1));
	Control::Continue(1)
}

#[inline]
pub fn ret(frame: &mut Frame) -> Control {
	match output_range(frame) {
		Ok(output) => {
			frame.retval = output;
			Control::Exit(ExitSucceed::Returned.into())
		}
		Err(e) => Control::Exit(Err(e)),
	}
}

#[inline]
pub fn revert(frame: &mut Frame) -> Control {
	match output_range(frame) {
		Ok(output) => {
			frame.retval = output;
			Control::Exit(ExitError::Reverted.into())
		}
		Err(e) => Control::Exit(Err(e)),
	}
}

fn output_range(frame: &mut Frame) -> Result<Vec<u8>, ExitError> {
	let start = U256::from_big_endian(&frame.stack.pop()?[..]);
	let len = U256::from_big_endian(&frame.stack.pop()?[..]);
	frame.memory.resize_offset(start, len)?;

	if len == U256::zero() {
		return Ok(Vec::new());
	}

	let start = crate::utils::u256_to_usize(start)?;
	let len = crate::utils::u256_to_usize(len)?;
	Ok(frame.memory.get(start, len))
}
