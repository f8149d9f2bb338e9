//! `CALL`-family and `CREATE`-family handlers.
//!
//! Each constructs a child message, forwards gas under the 63/64 rule,
//! opens a host snapshot and recursively re-enters the run loop. The
//! snapshot commits on child success and is discarded otherwise; gas
//! consumed by the child is never rolled back.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cmp::min;
use core::mem;

use primitive_types::{H160, H256, U256};
use rlp::RlpStream;
use sha3::{Digest, Keccak256};

use crate::error::{ExitError, ExitException, ExitFatal};
use crate::etable::Control;
use crate::gas::consts::G_CODEDEPOSIT;
use crate::interpreter::{run, Handle, StepListener};
use crate::runtime::{CallKind, Context, Host, Transfer};
use crate::utils::h256_to_h160;
use crate::Frame;

/// Contract address of a `CREATE`: `keccak(rlp([sender, nonce]))[12..]`.
#[must_use]
pub fn create_address(caller: H160, nonce: u64) -> H160 {
	let mut stream = RlpStream::new_list(2);
	stream.append(&caller);
	stream.append(&nonce);
	let hash = Keccak256::digest(&stream.out());
	h256_to_h160(H256::from_slice(hash.as_slice()))
}

/// Contract address of a `CREATE2`:
/// `keccak(0xff ∥ sender ∥ salt ∥ keccak(init_code))[12..]`.
#[must_use]
pub fn create2_address(caller: H160, salt: H256, init_code: &[u8]) -> H160 {
	let code_hash = Keccak256::digest(init_code);
	let mut hasher = Keccak256::new();
	hasher.update([0xff]);
	hasher.update(&caller[..]);
	hasher.update(&salt[..]);
	hasher.update(code_hash);
	h256_to_h160(H256::from_slice(hasher.finalize().as_slice()))
}

pub fn call<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	kind: CallKind,
) -> Control {
	frame.retbuf = Vec::new();

	pop_u256!(frame, gas);
	pop!(frame, to);
	let value = match kind {
		CallKind::Call | CallKind::CallCode => {
			pop_u256!(frame, value);
			value
		}
		_ => U256::zero(),
	};
	pop_u256!(frame, in_offset, in_len, out_offset, out_len);

	try_or_fail!(frame.memory.resize_offset(in_offset, in_len));
	try_or_fail!(frame.memory.resize_offset(out_offset, out_len));

	let input = if in_len == U256::zero() {
		Vec::new()
	} else {
		let in_offset = as_usize_or_fail!(in_offset);
		let in_len = as_usize_or_fail!(in_len);
		frame.memory.get(in_offset, in_len)
	};

	let target = h256_to_h160(to);
	let config = handle.config;
	let self_address = frame.context.address;

	// 63/64 forwarding; before it, asking for more than remains is an
	// error caught during the gas charge.
	let after_gas = frame.gasometer.gas();
	let forwarded = if config.eip150_call_l64_after_gas {
		let l64 = after_gas - after_gas / 64;
		if gas > U256::from(l64) {
			l64
		} else {
			gas.as_u64()
		}
	} else {
		gas.as_u64()
	};

	try_or_fail!(frame.gasometer.record_cost(forwarded));

	let has_value = value != U256::zero() && matches!(kind, CallKind::Call | CallKind::CallCode);
	let child_gas = if has_value {
		forwarded + config.call_stipend()
	} else {
		forwarded
	};

	// a too-deep or underfunded call never executes; the child gas
	// (stipend included) flows back
	if frame.depth + 1 > config.call_stack_limit()
		|| (has_value && handle.host.balance(self_address) < value)
	{
		frame.gasometer.reclaim(child_gas);
		push!(frame, H256::zero());
		return Control::Continue(1);
	}

	let (child_context, transfer) = match kind {
		CallKind::Call => (
			Context {
				address: target,
				caller: self_address,
				apparent_value: value,
			},
			Some(Transfer {
				source: self_address,
				target,
				value,
			}),
		),
		CallKind::CallCode => (
			Context {
				address: self_address,
				caller: self_address,
				apparent_value: value,
			},
			Some(Transfer {
				source: self_address,
				target: self_address,
				value,
			}),
		),
		CallKind::DelegateCall => (
			Context {
				address: self_address,
				caller: frame.context.caller,
				apparent_value: frame.context.apparent_value,
			},
			None,
		),
		CallKind::StaticCall => (
			Context {
				address: target,
				caller: self_address,
				apparent_value: U256::zero(),
			},
			None,
		),
		CallKind::Create | CallKind::Create2 => {
			return Control::Exit(ExitFatal::Internal("create routed to call handler").into());
		}
	};
	let is_static = frame.is_static || kind == CallKind::StaticCall;

	let snapshot = handle.host.snapshot();

	if let Some(transfer) = transfer {
		if handle.host.transfer(transfer).is_err() {
			handle.host.revert_to(snapshot);
			frame.gasometer.reclaim(child_gas);
			push!(frame, H256::zero());
			return Control::Continue(1);
		}
	}

	if let Some(outcome) = handle
		.precompiles
		.execute(target, &input, child_gas, config)
	{
		match outcome.result {
			Ok(_) => {
				handle.host.commit();
				frame.gasometer.reclaim(outcome.gas_left);
				frame.retbuf = outcome.output;
				let target_len = min(out_len, U256::from(frame.retbuf.len()));
				let retbuf = mem::take(&mut frame.retbuf);
				let pushed = match frame
					.memory
					.copy_large(out_offset, U256::zero(), target_len, &retbuf)
				{
					Ok(()) => frame.stack.push(one()),
					Err(_) => frame.stack.push(H256::zero()),
				};
				frame.retbuf = retbuf;
				try_or_fail!(pushed);
			}
			Err(_) => {
				// a failed precompile consumes everything forwarded
				handle.host.revert_to(snapshot);
				push!(frame, H256::zero());
			}
		}
		return Control::Continue(1);
	}

	let code = handle.host.code(target);
	let mut child = Frame::new(
		Rc::new(code),
		Rc::new(input),
		child_gas,
		child_context,
		frame.depth + 1,
		is_static,
		config,
	);
	let result = run(&mut child, handle);
	frame.retbuf = mem::take(&mut child.retval);

	match result {
		Ok(_) => {
			handle.host.commit();
			frame.gasometer.reclaim(child.gasometer.gas());
			frame.gasometer.record_refund(child.gasometer.refunded_gas());

			let target_len = min(out_len, U256::from(frame.retbuf.len()));
			let retbuf = mem::take(&mut frame.retbuf);
			let pushed = match frame
				.memory
				.copy_large(out_offset, U256::zero(), target_len, &retbuf)
			{
				Ok(()) => frame.stack.push(one()),
				Err(_) => frame.stack.push(H256::zero()),
			};
			frame.retbuf = retbuf;
			try_or_fail!(pushed);
		}
		Err(ExitError::Reverted) => {
			handle.host.revert_to(snapshot);
			frame.gasometer.reclaim(child.gasometer.gas());

			push!(frame, H256::zero());
			let target_len = min(out_len, U256::from(frame.retbuf.len()));
			let retbuf = mem::take(&mut frame.retbuf);
			let _ = frame
				.memory
				.copy_large(out_offset, U256::zero(), target_len, &retbuf);
			frame.retbuf = retbuf;
		}
		Err(ExitError::Exception(_)) => {
			handle.host.revert_to(snapshot);
			push!(frame, H256::zero());
		}
		Err(ExitError::Fatal(e)) => {
			handle.host.revert_to(snapshot);
			return Control::Exit(Err(e.into()));
		}
	}

	Control::Continue(1)
}

pub fn create<H: Host, L: StepListener>(
	frame: &mut Frame,
	handle: &mut Handle<'_, H, L>,
	kind: CallKind,
) -> Control {
	frame.retbuf = Vec::new();

	pop_u256!(frame, value, code_offset, code_len);
	let salt = if kind == CallKind::Create2 {
		pop!(frame, salt);
		Some(salt)
	} else {
		None
	};

	try_or_fail!(frame.memory.resize_offset(code_offset, code_len));
	let init_code = if code_len == U256::zero() {
		Vec::new()
	} else {
		let code_offset = as_usize_or_fail!(code_offset);
		let code_len = as_usize_or_fail!(code_len);
		frame.memory.get(code_offset, code_len)
	};

	let config = handle.config;
	let caller = frame.context.address;

	let after_gas = frame.gasometer.gas();
	let forwarded = if config.eip150_call_l64_after_gas {
		after_gas - after_gas / 64
	} else {
		after_gas
	};
	try_or_fail!(frame.gasometer.record_cost(forwarded));

	if frame.depth + 1 > config.call_stack_limit() || handle.host.balance(caller) < value {
		frame.gasometer.reclaim(forwarded);
		push!(frame, H256::zero());
		return Control::Continue(1);
	}

	let nonce = handle.host.nonce(caller);
	if nonce == u64::MAX {
		frame.gasometer.reclaim(forwarded);
		push!(frame, H256::zero());
		return Control::Continue(1);
	}

	let address = match salt {
		Some(salt) => create2_address(caller, salt, &init_code),
		None => create_address(caller, nonce),
	};

	handle.host.warm_up_account(address);
	try_or_fail!(handle.host.inc_nonce(caller));

	// a collision consumes the forwarded gas
	if handle.host.nonce(address) != 0 || handle.host.code_size(address) != U256::zero() {
		push!(frame, H256::zero());
		return Control::Continue(1);
	}

	let snapshot = handle.host.snapshot();
	handle.host.reset_storage(address);
	if config.eip161_create_increase_nonce {
		try_or_fail!(handle.host.inc_nonce(address));
	}
	if handle
		.host
		.transfer(Transfer {
			source: caller,
			target: address,
			value,
		})
		.is_err()
	{
		handle.host.revert_to(snapshot);
		frame.gasometer.reclaim(forwarded);
		push!(frame, H256::zero());
		return Control::Continue(1);
	}

	let child_context = Context {
		address,
		caller,
		apparent_value: value,
	};
	let mut child = Frame::new(
		Rc::new(init_code),
		Rc::new(Vec::new()),
		forwarded,
		child_context,
		frame.depth + 1,
		frame.is_static,
		config,
	);
	let result = run(&mut child, handle);

	match result {
		Ok(_) => {
			let code = mem::take(&mut child.retval);
			match deposit_code(&code, &mut child, config) {
				Ok(deployed) => {
					if deployed {
						handle.host.set_code(address, code);
					}
					handle.host.commit();
					frame.gasometer.reclaim(child.gasometer.gas());
					frame.gasometer.record_refund(child.gasometer.refunded_gas());
					push!(frame, H256::from(address));
				}
				Err(_) => {
					handle.host.revert_to(snapshot);
					push!(frame, H256::zero());
				}
			}
		}
		Err(ExitError::Reverted) => {
			handle.host.revert_to(snapshot);
			frame.gasometer.reclaim(child.gasometer.gas());
			frame.retbuf = mem::take(&mut child.retval);
			push!(frame, H256::zero());
		}
		Err(ExitError::Exception(_)) => {
			handle.host.revert_to(snapshot);
			push!(frame, H256::zero());
		}
		Err(ExitError::Fatal(e)) => {
			handle.host.revert_to(snapshot);
			return Control::Exit(Err(e.into()));
		}
	}

	Control::Continue(1)
}

/// Charge the code deposit against the child's remaining gas and apply
/// deployment validation. `Ok(false)` is the Frontier quirk: deposit
/// unaffordable, the account stays alive with empty code.
fn deposit_code(code: &[u8], child: &mut Frame, config: &crate::Config) -> Result<bool, ExitError> {
	if let Some(limit) = config.create_contract_limit() {
		if code.len() > limit {
			return Err(ExitException::ContractValidation.into());
		}
	}

	let cost = (code.len() as u64).saturating_mul(G_CODEDEPOSIT);
	match child.gasometer.record_cost(cost) {
		Ok(()) => Ok(true),
		Err(e) => {
			if config.eip2_create_fails_on_deposit {
				Err(e)
			} else {
				Ok(false)
			}
		}
	}
}

fn one() -> H256 {
	H256::from_low_u64_be(1)
}
