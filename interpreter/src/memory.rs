use alloc::vec::Vec;
use core::cmp::min;

use primitive_types::U256;

use crate::error::{ExitException, ExitFatal};

/// Volatile frame memory: a byte buffer whose length is always a multiple
/// of 32 and only ever grows. Reads past the end observe zeros; writes
/// force growth, whose gas is charged by the opcode before the access.
#[derive(Clone, Debug)]
pub struct Memory {
	data: Vec<u8>,
	limit: usize,
}

impl Memory {
	/// Create a new memory with the given hard size limit.
	pub fn new(limit: usize) -> Self {
		Self {
			data: Vec::new(),
			limit,
		}
	}

	/// Memory size limit.
	pub fn limit(&self) -> usize {
		self.limit
	}

	/// Current memory size in bytes, always a multiple of 32.
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Whether no memory has been touched yet.
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Current memory size as a word, for `MSIZE`.
	pub fn effective_len(&self) -> U256 {
		U256::from(self.data.len())
	}

	/// Grow memory to cover `[offset, offset + len)`, rounded up to the
	/// next multiple of 32. A zero-length access never grows memory.
	pub fn resize_offset(&mut self, offset: U256, len: U256) -> Result<(), ExitException> {
		if len == U256::zero() {
			return Ok(());
		}

		let end = offset
			.checked_add(len)
			.ok_or(ExitException::InvalidMemoryAccess)?;
		self.resize_end(end)
	}

	/// Grow memory to cover `[0, end)`, rounded up to the next multiple
	/// of 32.
	pub fn resize_end(&mut self, end: U256) -> Result<(), ExitException> {
		if end > U256::from(self.limit) {
			return Err(ExitException::InvalidMemoryAccess);
		}

		let end = end.as_usize();
		if end <= self.data.len() {
			return Ok(());
		}

		let new_len = end
			.checked_add(31)
			.ok_or(ExitException::InvalidMemoryAccess)?
			/ 32 * 32;
		self.data.resize(new_len, 0);
		Ok(())
	}

	/// Read `size` bytes at `offset`, zero-filled past the current
	/// length. Never grows memory.
	pub fn get(&self, offset: usize, size: usize) -> Vec<u8> {
		let mut ret = Vec::new();
		ret.resize(size, 0);

		if offset < self.data.len() {
			let copy = min(size, self.data.len() - offset);
			ret[..copy].copy_from_slice(&self.data[offset..offset + copy]);
		}

		ret
	}

	/// Write `value` at `offset`, zero-filling up to `target_size` when
	/// the value is shorter. The covered range must already be inside the
	/// resized region.
	pub fn set(
		&mut self,
		offset: usize,
		value: &[u8],
		target_size: Option<usize>,
	) -> Result<(), ExitFatal> {
		let target_size = target_size.unwrap_or(value.len());
		if target_size == 0 {
			return Ok(());
		}

		let end = offset
			.checked_add(target_size)
			.ok_or(ExitFatal::OutOfMemory)?;
		if end > self.limit {
			return Err(ExitFatal::OutOfMemory);
		}

		if self.data.len() < end {
			self.data.resize(end, 0);
		}

		let copy = min(target_size, value.len());
		self.data[offset..offset + copy].copy_from_slice(&value[..copy]);
		for byte in &mut self.data[offset + copy..end] {
			*byte = 0;
		}

		Ok(())
	}

	/// Copy from an external byte slice into memory, with untrusted
	/// word-sized offsets. Source bytes past the end of `data` read as
	/// zero.
	pub fn copy_large(
		&mut self,
		memory_offset: U256,
		data_offset: U256,
		len: U256,
		data: &[u8],
	) -> Result<(), ExitFatal> {
		if len == U256::zero() {
			return Ok(());
		}

		let memory_offset = if memory_offset > U256::from(usize::MAX) {
			return Err(ExitFatal::OutOfMemory);
		} else {
			memory_offset.as_usize()
		};

		let ulen = if len > U256::from(usize::MAX) {
			return Err(ExitFatal::OutOfMemory);
		} else {
			len.as_usize()
		};

		let data = if let Some(end) = data_offset.checked_add(len) {
			if data_offset > U256::from(usize::MAX) {
				&[]
			} else {
				let data_offset = data_offset.as_usize();
				let end = min(end.low_u64() as usize, data.len());
				if data_offset > data.len() {
					&[]
				} else {
					&data[data_offset..end]
				}
			}
		} else {
			&[]
		};

		self.set(memory_offset, data, Some(ulen))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn grows_in_word_multiples() {
		let mut memory = Memory::new(usize::MAX);
		memory.resize_offset(U256::from(10), U256::from(1)).unwrap();
		assert_eq!(memory.len(), 32);
		memory.resize_offset(U256::from(32), U256::from(1)).unwrap();
		assert_eq!(memory.len(), 64);
	}

	#[test]
	fn zero_length_access_does_not_grow() {
		let mut memory = Memory::new(usize::MAX);
		memory
			.resize_offset(U256::from(1000), U256::zero())
			.unwrap();
		assert_eq!(memory.len(), 0);
	}

	#[test]
	fn reads_past_end_are_zero() {
		let mut memory = Memory::new(usize::MAX);
		memory.resize_offset(U256::zero(), U256::from(32)).unwrap();
		memory.set(0, &[0xff], None).unwrap();
		assert_eq!(memory.get(0, 2), alloc::vec![0xff, 0x00]);
		assert_eq!(memory.get(100, 2), alloc::vec![0x00, 0x00]);
	}

	#[test]
	fn copy_zero_fills_source_overrun() {
		let mut memory = Memory::new(usize::MAX);
		memory.resize_offset(U256::zero(), U256::from(32)).unwrap();
		memory
			.copy_large(U256::zero(), U256::from(2), U256::from(4), &[1, 2, 3, 4])
			.unwrap();
		assert_eq!(memory.get(0, 4), alloc::vec![3, 4, 0, 0]);
	}
}
