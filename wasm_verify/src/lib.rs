// Copyright 2026 the Wasm Verify Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `wasm_verify`: a type and structure verifier for WebAssembly function
//! bodies.
//!
//! Given a decoded instruction view, the body's declared result types, and a
//! module context (function types, functions, tables, memories, globals,
//! data/element segments, declared function references), the verifier
//! decides whether the body is well-typed, covering the reference-type,
//! tail-call, SIMD, and atomic-threads instruction sets. As a side effect it
//! resolves branches: each branching instruction is annotated in place with
//! the operand-stack range to erase on the taken edge and the pc delta to
//! its jump anchor.
//!
//! Decoding, execution, and constant-expression evaluation live elsewhere;
//! this crate only consumes pre-decoded instructions and an already
//! populated module context.
//!
//! ## Example
//!
//! ```
//! extern crate alloc;
//!
//! use wasm_verify::asm::BodyBuilder;
//! use wasm_verify::types::{FuncType, ValType};
//! use wasm_verify::verifier::BodyVerifier;
//!
//! let mut v = BodyVerifier::new();
//! v.module.add_type(FuncType::new(&[ValType::I32], &[ValType::I32]));
//! v.module.add_func(0, false);
//! v.add_local(ValType::I32, true); // the parameter
//!
//! let mut b = BodyBuilder::new();
//! b.local_get(0);
//! b.call(0);
//! b.end();
//! let mut body = b.finish()?;
//!
//! v.validate(&mut body, &[ValType::I32])?;
//! # Ok::<(), alloc::boxed::Box<dyn core::error::Error>>(())
//! ```

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

pub mod asm;
pub mod instr;
pub mod module;
pub mod opcode;
pub mod types;
pub mod verifier;
