// Copyright 2026 the Wasm Verify Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The decoded instruction view consumed by the verifier.
//!
//! An [`Instruction`] carries an opcode, the source byte offset reported in
//! diagnostics, and the opcode's immediates. One flat struct serves every
//! opcode: only the fields an opcode's encoding defines are meaningful, the
//! rest stay at their defaults. This shape exists because the verifier writes
//! branch resolution back into the instruction in place (the erase range and
//! pc delta in [`JumpTarget`], and `stack_offset` for local accesses); a
//! per-opcode enum would force the runtime to re-match for those fields.
//!
//! Structured instructions (`block`, `loop`, `if`) carry `jump_end` (and for
//! `if` also `jump_else`) as forward deltas, in instruction units, to their
//! matching `end` and `else`. A decoder fills these while matching the
//! nesting; [`crate::asm::BodyBuilder`] does the same for hand-built bodies.

use alloc::vec::Vec;

use crate::opcode::Opcode;
use crate::types::ValType;

/// A block signature immediate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BlockType {
    /// `[] -> []`.
    #[default]
    Empty,
    /// `[] -> [vt]`.
    Val(ValType),
    /// The function type at this index.
    TypeIndex(u32),
}

/// A branch edge with its resolved metadata.
///
/// `target_index` is the label depth immediate from the encoding. The
/// remaining fields are written by the verifier: how much of the operand
/// stack to erase on the taken edge, and the signed pc delta, in instruction
/// units, from the branch to its jump anchor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct JumpTarget {
    /// Label depth, counted from the innermost frame.
    pub target_index: u32,
    /// Operand-stack depth at which erasure starts on the taken edge.
    pub stack_erase_begin: u32,
    /// Operand-stack depth at which erasure stops (the label arity).
    pub stack_erase_end: u32,
    /// Signed instruction-count delta to the jump anchor.
    pub pc_offset: i32,
}

impl JumpTarget {
    /// An unresolved edge to the label at `depth`.
    #[must_use]
    pub fn to_label(depth: u32) -> Self {
        Self {
            target_index: depth,
            ..Self::default()
        }
    }
}

/// A decoded instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// The opcode.
    pub opcode: Opcode,
    /// Byte offset in the original module, for diagnostics.
    pub offset: u32,
    /// Block signature (`block`, `loop`, `if`).
    pub block_type: BlockType,
    /// Primary index immediate: function, type, table, memory, global,
    /// local, data, or element index depending on the opcode.
    pub target_index: u32,
    /// Secondary index immediate: the table for `call_indirect`, the source
    /// for `*.copy`, the data/element segment for `*.init`.
    pub source_index: u32,
    /// Forward delta to the matching `else` (`if` only; equals `jump_end`
    /// when there is no `else` arm).
    pub jump_else: u32,
    /// Forward delta to the matching `end` (`block`, `loop`, `if`).
    pub jump_end: u32,
    /// Branch edge for `br`, `br_if`, `br_on_null`, `br_on_non_null`.
    pub jump: JumpTarget,
    /// Branch edges for `br_table`; the default label is last.
    pub label_list: Vec<JumpTarget>,
    /// Reference type immediate (`ref.null`).
    pub val_type: ValType,
    /// Type annotation list (typed `select`).
    pub val_type_list: Vec<ValType>,
    /// Alignment exponent for memory accesses.
    pub mem_align: u32,
    /// Static address offset for memory accesses.
    pub mem_offset: u64,
    /// Lane index for SIMD lane accesses.
    pub mem_lane: u8,
    /// 128-bit immediate (`v128.const`, `i8x16.shuffle`).
    pub num: u128,
    /// Written by the verifier for `local.*`: the operand-stack slot of the
    /// local, counted as `|stack| + (|locals| - index)`.
    pub stack_offset: u32,
}

impl Instruction {
    /// A bare instruction with all immediates at their defaults.
    #[must_use]
    pub fn new(opcode: Opcode, offset: u32) -> Self {
        Self {
            opcode,
            offset,
            block_type: BlockType::Empty,
            target_index: 0,
            source_index: 0,
            jump_else: 0,
            jump_end: 0,
            jump: JumpTarget::default(),
            label_list: Vec::new(),
            val_type: ValType::I32,
            val_type_list: Vec::new(),
            mem_align: 0,
            mem_offset: 0,
            mem_lane: 0,
            num: 0,
            stack_offset: 0,
        }
    }
}
