// Copyright 2026 the Wasm Verify Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type and structure verification for WebAssembly function bodies.
//!
//! [`BodyVerifier::validate`] walks a decoded instruction view against the
//! module context and the body's declared result types, simulating the
//! abstract stack machine symbolically: an operand stack of types layered
//! over a stack of control frames, with the polymorphic bottom taking over
//! once a frame goes unreachable. Validation also resolves branches: each
//! branching instruction gets its operand-erase range and its pc delta to
//! the jump anchor written back in place, and `local.*` instructions get
//! their stack slot, so the interpreter never recomputes label targets.
//!
//! The first failing instruction aborts validation; the error carries the
//! failure kind plus the instruction's opcode and source offset.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::instr::{BlockType, Instruction, JumpTarget};
use crate::module::ModuleContext;
use crate::opcode::Opcode;
use crate::types::ValType::{F32, F64, I32, I64, V128};
use crate::types::{HeapType, RefType, StackType, ValType};

/// Detail for a [`ErrorKind::TypeCheckFailed`] failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeCheckError {
    /// A popped operand did not match the expected type.
    Mismatch {
        /// The type required at this use.
        expected: ValType,
        /// The type actually found.
        found: ValType,
    },
    /// Two type sequences disagreed in length or pointwise.
    Arity {
        /// The required sequence.
        expected: Vec<ValType>,
        /// The sequence actually found.
        found: Vec<ValType>,
    },
    /// The operand stack was popped below the current frame floor.
    StackUnderflow,
    /// A frame was closed or queried with no frame open.
    ControlUnderflow,
    /// Operands remained above the frame floor when the frame closed.
    UnbalancedStack {
        /// How many operands were left over.
        remaining: u32,
    },
}

struct TypeList<'a>(&'a [ValType]);

impl fmt::Display for TypeList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, t) in self.0.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{t}")?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for TypeCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mismatch { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::Arity { expected, found } => {
                write!(
                    f,
                    "expected {}, found {}",
                    TypeList(expected),
                    TypeList(found)
                )
            }
            Self::StackUnderflow => write!(f, "operand stack underflow"),
            Self::ControlUnderflow => write!(f, "control stack underflow"),
            Self::UnbalancedStack { remaining } => {
                write!(f, "{remaining} operands left on stack at block end")
            }
        }
    }
}

/// A body validation failure kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A function type index out of range.
    InvalidFuncTypeIdx {
        /// The out-of-range index.
        index: u32,
        /// Number of declared function types.
        bound: u32,
    },
    /// A function index out of range.
    InvalidFuncIdx {
        /// The out-of-range index.
        index: u32,
        /// Number of declared functions.
        bound: u32,
    },
    /// A table index out of range, or a table of non-function element type
    /// used for an indirect call.
    InvalidTableIdx {
        /// The offending index.
        index: u32,
        /// Number of declared tables.
        bound: u32,
    },
    /// A memory index out of range.
    InvalidMemoryIdx {
        /// The out-of-range index.
        index: u32,
        /// Number of declared memories.
        bound: u32,
    },
    /// A global index out of range.
    InvalidGlobalIdx {
        /// The out-of-range index.
        index: u32,
        /// Number of declared globals.
        bound: u32,
    },
    /// A local index out of range.
    InvalidLocalIdx {
        /// The out-of-range index.
        index: u32,
        /// Number of declared locals (parameters included).
        bound: u32,
    },
    /// A label depth with no matching control frame.
    InvalidLabelIdx {
        /// The out-of-range depth.
        index: u32,
        /// Number of open frames.
        bound: u32,
    },
    /// A data segment index out of range.
    InvalidDataIdx {
        /// The out-of-range index.
        index: u32,
        /// Number of declared data segments.
        bound: u32,
    },
    /// An element segment index out of range.
    InvalidElemIdx {
        /// The out-of-range index.
        index: u32,
        /// Number of declared element segments.
        bound: u32,
    },
    /// A SIMD lane index out of range.
    InvalidLaneIdx {
        /// The out-of-range lane.
        index: u32,
        /// The lane count for this access width.
        bound: u32,
    },
    /// `ref.func` on a function never declared as referenceable.
    InvalidRefIdx {
        /// The undeclared function index.
        index: u32,
    },
    /// An alignment exponent wider than the access.
    InvalidAlignment {
        /// The encoded alignment exponent.
        align: u32,
        /// The natural alignment (access width in bytes).
        natural: u32,
    },
    /// A typed `select` whose annotation list is not a single type.
    InvalidResultArity {
        /// The annotation count.
        count: u32,
    },
    /// `br_on_null`/`br_on_non_null` precondition violated.
    InvalidBrRefType,
    /// `local.get` on a local not initialized on this path.
    InvalidUninitLocal {
        /// The local index.
        index: u32,
    },
    /// `global.set` on an immutable global.
    ImmutableGlobal {
        /// The global index.
        index: u32,
    },
    /// An operand-stack or signature mismatch.
    TypeCheckFailed(TypeCheckError),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFuncTypeIdx { index, bound } => {
                write!(f, "function type index {index} out of range (bound {bound})")
            }
            Self::InvalidFuncIdx { index, bound } => {
                write!(f, "function index {index} out of range (bound {bound})")
            }
            Self::InvalidTableIdx { index, bound } => {
                write!(f, "invalid table index {index} (bound {bound})")
            }
            Self::InvalidMemoryIdx { index, bound } => {
                write!(f, "memory index {index} out of range (bound {bound})")
            }
            Self::InvalidGlobalIdx { index, bound } => {
                write!(f, "global index {index} out of range (bound {bound})")
            }
            Self::InvalidLocalIdx { index, bound } => {
                write!(f, "local index {index} out of range (bound {bound})")
            }
            Self::InvalidLabelIdx { index, bound } => {
                write!(f, "label depth {index} out of range (bound {bound})")
            }
            Self::InvalidDataIdx { index, bound } => {
                write!(f, "data segment index {index} out of range (bound {bound})")
            }
            Self::InvalidElemIdx { index, bound } => {
                write!(f, "element segment index {index} out of range (bound {bound})")
            }
            Self::InvalidLaneIdx { index, bound } => {
                write!(f, "lane index {index} out of range (bound {bound})")
            }
            Self::InvalidRefIdx { index } => {
                write!(f, "function {index} is not a declared reference")
            }
            Self::InvalidAlignment { align, natural } => {
                write!(
                    f,
                    "alignment 2^{align} exceeds natural alignment {natural}"
                )
            }
            Self::InvalidResultArity { count } => {
                write!(f, "select annotation must be one type, got {count}")
            }
            Self::InvalidBrRefType => write!(f, "branch expects a reference of the label type"),
            Self::InvalidUninitLocal { index } => {
                write!(f, "local {index} read before initialization")
            }
            Self::ImmutableGlobal { index } => write!(f, "global {index} is immutable"),
            Self::TypeCheckFailed(e) => write!(f, "type check failed: {e}"),
        }
    }
}

impl core::error::Error for ErrorKind {}

/// A body validation failure, annotated with the failing instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyError {
    /// The failure kind.
    pub kind: ErrorKind,
    /// Opcode of the failing instruction.
    pub opcode: Opcode,
    /// Source byte offset of the failing instruction.
    pub offset: u32,
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}: {}", self.opcode, self.offset, self.kind)
    }
}

impl core::error::Error for VerifyError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.kind)
    }
}

fn mismatch(expected: ValType, found: ValType) -> ErrorKind {
    ErrorKind::TypeCheckFailed(TypeCheckError::Mismatch { expected, found })
}

fn arity_mismatch(expected: Vec<ValType>, found: Vec<ValType>) -> ErrorKind {
    ErrorKind::TypeCheckFailed(TypeCheckError::Arity { expected, found })
}

fn stack_underflow() -> ErrorKind {
    ErrorKind::TypeCheckFailed(TypeCheckError::StackUnderflow)
}

fn control_underflow() -> ErrorKind {
    ErrorKind::TypeCheckFailed(TypeCheckError::ControlUnderflow)
}

// Mismatch reports render the polymorphic slot as i32.
fn shown(t: StackType) -> ValType {
    t.known().unwrap_or(I32)
}

/// A declared local (parameters included).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Local {
    /// The local's value type.
    pub val_type: ValType,
    /// Whether the local is initialized on the current path.
    pub is_init: bool,
}

/// An open structured-control frame.
#[derive(Clone, Debug)]
struct CtrlFrame {
    start_types: Vec<ValType>,
    end_types: Vec<ValType>,
    /// Instruction position used as the origin for branch pc deltas: the
    /// `loop` header for loops, the matching `end` otherwise.
    jump_anchor: usize,
    opcode: Opcode,
    /// Operand-stack size at frame entry (the floor while the frame lives).
    height: usize,
    /// Local-init log length at frame entry.
    init_watermark: usize,
    unreachable: bool,
}

impl CtrlFrame {
    /// The operand types expected at a branch into this frame.
    fn label_types(&self) -> &[ValType] {
        if self.opcode == Opcode::Loop {
            &self.start_types
        } else {
            &self.end_types
        }
    }
}

fn resolve_jump(target: &mut JumpTarget, remain: u32, arity: u32, anchor: usize, at: usize) {
    target.stack_erase_begin = remain + arity;
    target.stack_erase_end = arity;
    target.pc_offset = (anchor as i64 - at as i64) as i32;
}

/// Validates function bodies against a module context.
///
/// The module context is populated once per module via the `add_*` methods
/// on [`BodyVerifier::module`] and persists across bodies. Per-body state
/// (locals, returns, the operand and control stacks) is cleared by
/// [`BodyVerifier::reset`]; declare locals with [`BodyVerifier::add_local`]
/// between `reset` and [`BodyVerifier::validate`].
#[derive(Clone, Debug, Default)]
pub struct BodyVerifier {
    /// Module-level declarations shared by all bodies of the module.
    pub module: ModuleContext,
    locals: Vec<Local>,
    local_inits: Vec<u32>,
    returns: Vec<ValType>,
    vals: Vec<StackType>,
    ctrls: Vec<CtrlFrame>,
}

impl BodyVerifier {
    /// Creates a verifier with an empty module context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears per-body state; module-level declarations persist.
    pub fn reset(&mut self) {
        self.locals.clear();
        self.local_inits.clear();
        self.returns.clear();
        self.vals.clear();
        self.ctrls.clear();
    }

    /// Clears per-body state and the module context.
    pub fn reset_module(&mut self) {
        self.reset();
        self.module = ModuleContext::default();
    }

    /// Declares the next local (parameters first, then locals, in order).
    ///
    /// Parameters pass `initialized = true`. Defaultable locals start
    /// initialized as well; non-defaultable reference locals must be written
    /// before their first `local.get`.
    pub fn add_local(&mut self, val_type: ValType, initialized: bool) {
        let is_init = initialized || val_type.is_defaultable();
        self.locals.push(Local { val_type, is_init });
        if is_init {
            self.local_inits.push(self.locals.len() as u32 - 1);
        }
    }

    /// The declared locals, parameters included.
    #[must_use]
    pub fn locals(&self) -> &[Local] {
        &self.locals
    }

    /// Validates a function body against the declared result types.
    ///
    /// On success, branch and local instructions in `instrs` carry their
    /// resolved metadata. On failure, metadata writes already performed for
    /// earlier instructions remain; call [`BodyVerifier::reset`] before
    /// reusing the verifier either way.
    pub fn validate(
        &mut self,
        instrs: &mut [Instruction],
        returns: &[ValType],
    ) -> Result<(), VerifyError> {
        self.returns = returns.to_vec();
        self.vals.clear();
        self.ctrls.clear();

        let Some(last) = instrs.len().checked_sub(1) else {
            return Ok(());
        };
        let rets = self.returns.clone();
        self.push_ctrl(&[], &rets, last, Opcode::End);

        for idx in 0..instrs.len() {
            if let Err(kind) = self.check_instr(instrs, idx) {
                return Err(VerifyError {
                    kind,
                    opcode: instrs[idx].opcode,
                    offset: instrs[idx].offset,
                });
            }
        }
        Ok(())
    }

    // Operand stack.

    fn push_type(&mut self, t: StackType) {
        self.vals.push(t);
    }

    fn push_val_types(&mut self, types: &[ValType]) {
        for &t in types {
            self.vals.push(StackType::Val(t));
        }
    }

    fn push_stack_types(&mut self, types: &[StackType]) {
        self.vals.extend_from_slice(types);
    }

    /// Pops one entry. At the frame floor this yields `Unknown` if the frame
    /// is unreachable and underflows otherwise.
    fn pop_any(&mut self) -> Result<StackType, ErrorKind> {
        let frame = self.ctrls.last().ok_or_else(control_underflow)?;
        if self.vals.len() == frame.height {
            if frame.unreachable {
                return Ok(StackType::Unknown);
            }
            return Err(stack_underflow());
        }
        self.vals.pop().ok_or_else(stack_underflow)
    }

    /// Pops one entry and requires it to match `expected`. An `Unknown` pop
    /// matches vacuously and is returned as `expected`.
    fn pop_expect(&mut self, expected: ValType) -> Result<StackType, ErrorKind> {
        match self.pop_any()? {
            StackType::Unknown => Ok(StackType::Val(expected)),
            StackType::Val(found) => {
                if self.module.match_type(expected, found) {
                    Ok(StackType::Val(found))
                } else {
                    Err(mismatch(expected, found))
                }
            }
        }
    }

    /// Pops `types` in reverse order.
    fn pop_types(&mut self, types: &[ValType]) -> Result<(), ErrorKind> {
        for &t in types.iter().rev() {
            self.pop_expect(t)?;
        }
        Ok(())
    }

    fn stack_trans(&mut self, take: &[ValType], put: &[ValType]) -> Result<(), ErrorKind> {
        self.pop_types(take)?;
        self.push_val_types(put);
        Ok(())
    }

    // Control stack.

    fn push_ctrl(&mut self, input: &[ValType], output: &[ValType], anchor: usize, opcode: Opcode) {
        self.ctrls.push(CtrlFrame {
            start_types: input.to_vec(),
            end_types: output.to_vec(),
            jump_anchor: anchor,
            opcode,
            height: self.vals.len(),
            init_watermark: self.local_inits.len(),
            unreachable: false,
        });
        self.push_val_types(input);
    }

    /// Closes the innermost frame: pops its end types, requires the operand
    /// stack back at the frame floor, and rolls back locals first
    /// initialized inside the frame.
    fn pop_ctrl(&mut self) -> Result<CtrlFrame, ErrorKind> {
        let Some(top) = self.ctrls.last() else {
            return Err(control_underflow());
        };
        let end_types = top.end_types.clone();
        let height = top.height;
        let watermark = top.init_watermark;

        self.pop_types(&end_types)?;
        if self.vals.len() != height {
            return Err(ErrorKind::TypeCheckFailed(TypeCheckError::UnbalancedStack {
                remaining: (self.vals.len() - height) as u32,
            }));
        }

        for &idx in &self.local_inits[watermark..] {
            if let Some(local) = self.locals.get_mut(idx as usize) {
                local.is_init = false;
            }
        }
        self.local_inits.truncate(watermark);

        self.ctrls.pop().ok_or_else(control_underflow)
    }

    /// Truncates the operand stack to the frame floor and marks the frame
    /// polymorphic.
    fn mark_unreachable(&mut self) -> Result<(), ErrorKind> {
        let Some(frame) = self.ctrls.last_mut() else {
            return Err(control_underflow());
        };
        let height = frame.height;
        frame.unreachable = true;
        self.vals.truncate(height);
        Ok(())
    }

    /// Converts a label depth to a control-stack position.
    fn ctrl_at(&self, depth: u32) -> Result<usize, ErrorKind> {
        if depth as usize >= self.ctrls.len() {
            return Err(ErrorKind::InvalidLabelIdx {
                index: depth,
                bound: self.ctrls.len() as u32,
            });
        }
        Ok(self.ctrls.len() - 1 - depth as usize)
    }

    // Immediate checks.

    fn resolve_block_type(&self, bt: BlockType) -> Result<(Vec<ValType>, Vec<ValType>), ErrorKind> {
        match bt {
            BlockType::Empty => Ok((Vec::new(), Vec::new())),
            BlockType::Val(vt) => {
                self.module.validate_val_type(vt)?;
                Ok((Vec::new(), vec![vt]))
            }
            BlockType::TypeIndex(idx) => match self.module.types.get(idx as usize) {
                Some(ft) => Ok((ft.params.clone(), ft.results.clone())),
                None => Err(ErrorKind::InvalidFuncTypeIdx {
                    index: idx,
                    bound: self.module.types.len() as u32,
                }),
            },
        }
    }

    fn func_type(&self, type_idx: u32) -> Result<(Vec<ValType>, Vec<ValType>), ErrorKind> {
        match self.module.types.get(type_idx as usize) {
            Some(ft) => Ok((ft.params.clone(), ft.results.clone())),
            None => Err(ErrorKind::InvalidFuncTypeIdx {
                index: type_idx,
                bound: self.module.types.len() as u32,
            }),
        }
    }

    fn table_elem(&self, table_idx: u32) -> Result<ValType, ErrorKind> {
        match self.module.tables.get(table_idx as usize) {
            Some(&t) => Ok(t),
            None => Err(ErrorKind::InvalidTableIdx {
                index: table_idx,
                bound: self.module.tables.len() as u32,
            }),
        }
    }

    /// Checks the table used by an indirect call: in range and of function
    /// reference element type.
    fn check_call_table(&self, table_idx: u32) -> Result<(), ErrorKind> {
        let bad = ErrorKind::InvalidTableIdx {
            index: table_idx,
            bound: self.module.tables.len() as u32,
        };
        match self.module.tables.get(table_idx as usize) {
            Some(&t) if t.is_func_ref() => Ok(()),
            _ => Err(bad),
        }
    }

    fn check_mem(&self, mem_idx: u32) -> Result<(), ErrorKind> {
        if mem_idx >= self.module.mems {
            return Err(ErrorKind::InvalidMemoryIdx {
                index: mem_idx,
                bound: self.module.mems,
            });
        }
        Ok(())
    }

    fn mem_trans(
        &mut self,
        mem_idx: u32,
        take: &[ValType],
        put: &[ValType],
    ) -> Result<(), ErrorKind> {
        self.check_mem(mem_idx)?;
        self.stack_trans(take, put)
    }

    fn check_lane(&self, lane: u8, bound: u32) -> Result<(), ErrorKind> {
        if u32::from(lane) >= bound {
            return Err(ErrorKind::InvalidLaneIdx {
                index: u32::from(lane),
                bound,
            });
        }
        Ok(())
    }

    fn lane_trans(
        &mut self,
        lane: u8,
        bound: u32,
        take: &[ValType],
        put: &[ValType],
    ) -> Result<(), ErrorKind> {
        self.check_lane(lane, bound)?;
        self.stack_trans(take, put)
    }

    /// Memory access: bounds-checks the memory, then requires the alignment
    /// exponent to satisfy `2^align <= bits/8`.
    fn check_align(&self, mem_idx: u32, align: u32, bits: u32) -> Result<(), ErrorKind> {
        self.check_mem(mem_idx)?;
        let natural = bits / 8;
        if align > 31 || (1u64 << align) > u64::from(natural) {
            return Err(ErrorKind::InvalidAlignment { align, natural });
        }
        Ok(())
    }

    fn align_trans(
        &mut self,
        mem_idx: u32,
        align: u32,
        bits: u32,
        take: &[ValType],
        put: &[ValType],
    ) -> Result<(), ErrorKind> {
        self.check_align(mem_idx, align, bits)?;
        self.stack_trans(take, put)
    }

    fn align_lane_trans(
        &mut self,
        mem_idx: u32,
        align: u32,
        lane: u8,
        bits: u32,
        take: &[ValType],
        put: &[ValType],
    ) -> Result<(), ErrorKind> {
        self.check_align(mem_idx, align, bits)?;
        self.lane_trans(lane, 128 / bits, take, put)
    }

    // Per-opcode rules.

    #[allow(clippy::too_many_lines, reason = "one arm group per opcode class")]
    fn check_instr(&mut self, instrs: &mut [Instruction], idx: usize) -> Result<(), ErrorKind> {
        let opcode = instrs[idx].opcode;
        let block_type = instrs[idx].block_type;
        let target_index = instrs[idx].target_index;
        let source_index = instrs[idx].source_index;
        let jump_else = instrs[idx].jump_else;
        let jump_end = instrs[idx].jump_end;
        let mem_align = instrs[idx].mem_align;
        let mem_lane = instrs[idx].mem_lane;
        let num = instrs[idx].num;

        match opcode {
            // Control.
            Opcode::Unreachable => self.mark_unreachable(),
            Opcode::Nop | Opcode::AtomicFence => Ok(()),

            Opcode::Block | Opcode::Loop | Opcode::If => {
                let (t1, t2) = self.resolve_block_type(block_type)?;
                if opcode == Opcode::If {
                    self.pop_expect(I32)?;
                }
                self.pop_types(&t1)?;
                // Branches into a loop re-enter its header; everything else
                // lands on the matching end.
                let anchor = if opcode == Opcode::Loop {
                    idx
                } else {
                    idx + jump_end as usize
                };
                let if_without_else = opcode == Opcode::If && jump_else == jump_end;
                self.push_ctrl(&t1, &t2, anchor, opcode);
                if if_without_else && !self.module.match_types(&t2, &t1) {
                    return Err(arity_mismatch(t2, t1));
                }
                Ok(())
            }

            Opcode::Else => {
                let frame = self.pop_ctrl()?;
                self.push_ctrl(
                    &frame.start_types,
                    &frame.end_types,
                    frame.jump_anchor,
                    Opcode::Else,
                );
                Ok(())
            }

            Opcode::End => {
                let frame = self.pop_ctrl()?;
                self.push_val_types(&frame.end_types);
                Ok(())
            }

            Opcode::Br => {
                let d = self.ctrl_at(instrs[idx].jump.target_index)?;
                let label = self.ctrls[d].label_types().to_vec();
                self.pop_types(&label)?;
                let remain = (self.vals.len() - self.ctrls[d].height) as u32;
                let anchor = self.ctrls[d].jump_anchor;
                resolve_jump(
                    &mut instrs[idx].jump,
                    remain,
                    label.len() as u32,
                    anchor,
                    idx,
                );
                self.mark_unreachable()
            }

            Opcode::BrIf => {
                let d = self.ctrl_at(instrs[idx].jump.target_index)?;
                self.pop_expect(I32)?;
                let label = self.ctrls[d].label_types().to_vec();
                self.pop_types(&label)?;
                let remain = (self.vals.len() - self.ctrls[d].height) as u32;
                let anchor = self.ctrls[d].jump_anchor;
                resolve_jump(
                    &mut instrs[idx].jump,
                    remain,
                    label.len() as u32,
                    anchor,
                    idx,
                );
                self.push_val_types(&label);
                Ok(())
            }

            Opcode::BrTable => {
                self.pop_expect(I32)?;
                // The decoder always emits at least the default label.
                let Some(default) = instrs[idx].label_list.last() else {
                    return Err(ErrorKind::InvalidLabelIdx { index: 0, bound: 0 });
                };
                let m = self.ctrl_at(default.target_index)?;
                let default_label = self.ctrls[m].label_types().to_vec();

                for li in 0..instrs[idx].label_list.len() - 1 {
                    let n = self.ctrl_at(instrs[idx].label_list[li].target_index)?;
                    let label = self.ctrls[n].label_types().to_vec();
                    if default_label.len() != label.len() {
                        return Err(arity_mismatch(default_label, label));
                    }
                    // Pop and recapture so the next label sees the same
                    // operands, preserving the polymorphic slots.
                    let mut captured = vec![StackType::Unknown; label.len()];
                    for k in (0..label.len()).rev() {
                        let popped = self.pop_expect(label[k])?;
                        let polymorphic = self.ctrls.last().is_some_and(|f| f.unreachable);
                        captured[k] = if polymorphic {
                            StackType::Unknown
                        } else {
                            popped
                        };
                    }
                    let remain = (self.vals.len() - self.ctrls[n].height) as u32;
                    let anchor = self.ctrls[n].jump_anchor;
                    resolve_jump(
                        &mut instrs[idx].label_list[li],
                        remain,
                        label.len() as u32,
                        anchor,
                        idx,
                    );
                    self.push_stack_types(&captured);
                }

                self.pop_types(&default_label)?;
                let remain = (self.vals.len() - self.ctrls[m].height) as u32;
                let anchor = self.ctrls[m].jump_anchor;
                let last = instrs[idx].label_list.len() - 1;
                resolve_jump(
                    &mut instrs[idx].label_list[last],
                    remain,
                    default_label.len() as u32,
                    anchor,
                    idx,
                );
                self.mark_unreachable()
            }

            Opcode::BrOnNull => {
                let d = self.ctrl_at(target_index)?;
                let label = self.ctrls[d].label_types().to_vec();
                let popped = self.pop_any()?;
                let StackType::Val(vt) = popped else {
                    // Polymorphic: the branch is unreachable, nothing to do.
                    return Ok(());
                };
                let Some(rt) = vt.as_ref_type() else {
                    return Err(ErrorKind::InvalidBrRefType);
                };
                self.pop_types(&label)?;
                let remain = (self.vals.len() - self.ctrls[d].height) as u32;
                let anchor = self.ctrls[d].jump_anchor;
                resolve_jump(
                    &mut instrs[idx].jump,
                    remain,
                    label.len() as u32,
                    anchor,
                    idx,
                );
                self.push_val_types(&label);
                self.push_type(StackType::Val(ValType::Ref(rt.as_non_null())));
                Ok(())
            }

            Opcode::BrOnNonNull => {
                let d = self.ctrl_at(target_index)?;
                let mut label = self.ctrls[d].label_types().to_vec();
                // On the taken edge the last label operand is the non-null
                // reference; here we consume its nullable form.
                let Some(last_ty) = label.pop() else {
                    return Err(ErrorKind::InvalidBrRefType);
                };
                let Some(rt) = last_ty.as_ref_type() else {
                    return Err(ErrorKind::InvalidBrRefType);
                };
                if rt.nullable {
                    return Err(ErrorKind::InvalidBrRefType);
                }
                self.pop_expect(ValType::Ref(rt.as_nullable()))
                    .map_err(|_| ErrorKind::InvalidBrRefType)?;
                self.pop_types(&label)
                    .map_err(|_| ErrorKind::InvalidBrRefType)?;
                let remain = (self.vals.len() - self.ctrls[d].height) as u32;
                let arity = label.len() as u32 + 1;
                let anchor = self.ctrls[d].jump_anchor;
                resolve_jump(&mut instrs[idx].jump, remain, arity, anchor, idx);
                self.push_val_types(&label);
                Ok(())
            }

            Opcode::Return => {
                let returns = self.returns.clone();
                self.pop_types(&returns)?;
                self.mark_unreachable()
            }

            Opcode::Call => {
                let Some(&type_idx) = self.module.funcs.get(target_index as usize) else {
                    return Err(ErrorKind::InvalidFuncIdx {
                        index: target_index,
                        bound: self.module.funcs.len() as u32,
                    });
                };
                let (params, results) = self.func_type(type_idx)?;
                self.stack_trans(&params, &results)
            }

            Opcode::CallIndirect => {
                self.check_call_table(source_index)?;
                let (params, results) = self.func_type(target_index)?;
                self.pop_expect(I32)?;
                self.stack_trans(&params, &results)
            }

            Opcode::ReturnCall => {
                let Some(&type_idx) = self.module.funcs.get(target_index as usize) else {
                    return Err(ErrorKind::InvalidFuncIdx {
                        index: target_index,
                        bound: self.module.funcs.len() as u32,
                    });
                };
                let (params, results) = self.func_type(type_idx)?;
                if !self.module.match_types(&self.returns, &results) {
                    return Err(arity_mismatch(self.returns.clone(), results));
                }
                self.pop_types(&params)?;
                self.mark_unreachable()
            }

            Opcode::ReturnCallIndirect => {
                self.check_call_table(source_index)?;
                let (params, results) = self.func_type(target_index)?;
                if !self.module.match_types(&self.returns, &results) {
                    return Err(arity_mismatch(self.returns.clone(), results));
                }
                self.pop_expect(I32)?;
                self.pop_types(&params)?;
                self.mark_unreachable()
            }

            Opcode::CallRef => {
                let (mut params, results) = self.func_type(target_index)?;
                params.push(ValType::Ref(RefType::nullable(HeapType::Index(
                    target_index,
                ))));
                self.stack_trans(&params, &results)
            }

            Opcode::ReturnCallRef => {
                let (mut params, results) = self.func_type(target_index)?;
                if !self.module.match_types(&self.returns, &results) {
                    return Err(arity_mismatch(self.returns.clone(), results));
                }
                params.push(ValType::Ref(RefType::nullable(HeapType::Index(
                    target_index,
                ))));
                self.pop_types(&params)?;
                self.mark_unreachable()
            }

            // Reference.
            Opcode::RefNull => {
                let vt = instrs[idx].val_type;
                self.module.validate_val_type(vt)?;
                self.stack_trans(&[], &[vt])
            }

            Opcode::RefIsNull => {
                let popped = self.pop_any()?;
                if let StackType::Val(vt) = popped
                    && !vt.is_ref()
                {
                    return Err(mismatch(ValType::FUNC_REF, vt));
                }
                self.stack_trans(&[], &[I32])
            }

            Opcode::RefFunc => {
                if !self.module.refs.contains(&target_index) {
                    return Err(ErrorKind::InvalidRefIdx {
                        index: target_index,
                    });
                }
                let Some(&type_idx) = self.module.funcs.get(target_index as usize) else {
                    return Err(ErrorKind::InvalidFuncIdx {
                        index: target_index,
                        bound: self.module.funcs.len() as u32,
                    });
                };
                self.stack_trans(
                    &[],
                    &[ValType::Ref(RefType::non_null(HeapType::Index(type_idx)))],
                )
            }

            Opcode::RefAsNonNull => match self.pop_any()? {
                StackType::Unknown => {
                    self.push_type(StackType::Unknown);
                    Ok(())
                }
                StackType::Val(ValType::Ref(rt)) => {
                    self.push_type(StackType::Val(ValType::Ref(rt.as_non_null())));
                    Ok(())
                }
                StackType::Val(vt) => Err(mismatch(ValType::FUNC_REF, vt)),
            },

            // Parametric.
            Opcode::Drop => {
                self.pop_any()?;
                Ok(())
            }

            Opcode::Select => {
                self.pop_expect(I32)?;
                let t1 = self.pop_any()?;
                let t2 = self.pop_any()?;
                if !t1.is_num() {
                    return Err(mismatch(I32, shown(t1)));
                }
                if !t2.is_num() {
                    return Err(mismatch(shown(t1), shown(t2)));
                }
                if t1 != t2 && t1 != StackType::Unknown && t2 != StackType::Unknown {
                    return Err(mismatch(shown(t1), shown(t2)));
                }
                self.push_type(if t1 == StackType::Unknown { t2 } else { t1 });
                Ok(())
            }

            Opcode::SelectT => {
                let list = instrs[idx].val_type_list.clone();
                let &[expected] = list.as_slice() else {
                    return Err(ErrorKind::InvalidResultArity {
                        count: list.len() as u32,
                    });
                };
                self.module.validate_val_type(expected)?;
                self.pop_types(&[expected, expected, I32])?;
                self.push_type(StackType::Val(expected));
                Ok(())
            }

            // Variable.
            Opcode::LocalGet | Opcode::LocalSet | Opcode::LocalTee => {
                let Some(local) = self.locals.get(target_index as usize).copied() else {
                    return Err(ErrorKind::InvalidLocalIdx {
                        index: target_index,
                        bound: self.locals.len() as u32,
                    });
                };
                instrs[idx].stack_offset =
                    (self.vals.len() + (self.locals.len() - target_index as usize)) as u32;
                match opcode {
                    Opcode::LocalGet => {
                        if !local.is_init {
                            return Err(ErrorKind::InvalidUninitLocal {
                                index: target_index,
                            });
                        }
                        self.stack_trans(&[], &[local.val_type])
                    }
                    Opcode::LocalSet => {
                        self.init_local(target_index);
                        self.stack_trans(&[local.val_type], &[])
                    }
                    _ => {
                        self.init_local(target_index);
                        self.stack_trans(&[local.val_type], &[local.val_type])
                    }
                }
            }

            Opcode::GlobalGet | Opcode::GlobalSet => {
                let Some(global) = self.module.globals.get(target_index as usize).copied() else {
                    return Err(ErrorKind::InvalidGlobalIdx {
                        index: target_index,
                        bound: self.module.globals.len() as u32,
                    });
                };
                if opcode == Opcode::GlobalSet {
                    if global.mutability != crate::types::Mutability::Var {
                        return Err(ErrorKind::ImmutableGlobal {
                            index: target_index,
                        });
                    }
                    self.stack_trans(&[global.val_type], &[])
                } else {
                    self.stack_trans(&[], &[global.val_type])
                }
            }

            // Table.
            Opcode::TableGet => {
                let elem = self.table_elem(target_index)?;
                self.stack_trans(&[I32], &[elem])
            }
            Opcode::TableSet => {
                let elem = self.table_elem(target_index)?;
                self.stack_trans(&[I32, elem], &[])
            }
            Opcode::TableGrow => {
                let elem = self.table_elem(target_index)?;
                self.stack_trans(&[elem, I32], &[I32])
            }
            Opcode::TableSize => {
                self.table_elem(target_index)?;
                self.stack_trans(&[], &[I32])
            }
            Opcode::TableFill => {
                let elem = self.table_elem(target_index)?;
                self.stack_trans(&[I32, elem, I32], &[])
            }
            Opcode::TableInit => {
                let elem = self.table_elem(target_index)?;
                let Some(&seg) = self.module.elems.get(source_index as usize) else {
                    return Err(ErrorKind::InvalidElemIdx {
                        index: source_index,
                        bound: self.module.elems.len() as u32,
                    });
                };
                if !self.module.match_type(elem, seg) {
                    return Err(mismatch(elem, seg));
                }
                self.stack_trans(&[I32, I32, I32], &[])
            }
            Opcode::TableCopy => {
                let dst = self.table_elem(target_index)?;
                let src = self.table_elem(source_index)?;
                if !self.module.match_type(dst, src) {
                    return Err(mismatch(dst, src));
                }
                self.stack_trans(&[I32, I32, I32], &[])
            }
            Opcode::ElemDrop => {
                if target_index as usize >= self.module.elems.len() {
                    return Err(ErrorKind::InvalidElemIdx {
                        index: target_index,
                        bound: self.module.elems.len() as u32,
                    });
                }
                Ok(())
            }

            // Memory.
            Opcode::I32Load => self.align_trans(target_index, mem_align, 32, &[I32], &[I32]),
            Opcode::I64Load => self.align_trans(target_index, mem_align, 64, &[I32], &[I64]),
            Opcode::F32Load => self.align_trans(target_index, mem_align, 32, &[I32], &[F32]),
            Opcode::F64Load => self.align_trans(target_index, mem_align, 64, &[I32], &[F64]),
            Opcode::I32Load8S | Opcode::I32Load8U => {
                self.align_trans(target_index, mem_align, 8, &[I32], &[I32])
            }
            Opcode::I32Load16S | Opcode::I32Load16U => {
                self.align_trans(target_index, mem_align, 16, &[I32], &[I32])
            }
            Opcode::I64Load8S | Opcode::I64Load8U => {
                self.align_trans(target_index, mem_align, 8, &[I32], &[I64])
            }
            Opcode::I64Load16S | Opcode::I64Load16U => {
                self.align_trans(target_index, mem_align, 16, &[I32], &[I64])
            }
            Opcode::I64Load32S | Opcode::I64Load32U => {
                self.align_trans(target_index, mem_align, 32, &[I32], &[I64])
            }
            Opcode::I32Store => self.align_trans(target_index, mem_align, 32, &[I32, I32], &[]),
            Opcode::I64Store => self.align_trans(target_index, mem_align, 64, &[I32, I64], &[]),
            Opcode::F32Store => self.align_trans(target_index, mem_align, 32, &[I32, F32], &[]),
            Opcode::F64Store => self.align_trans(target_index, mem_align, 64, &[I32, F64], &[]),
            Opcode::I32Store8 => self.align_trans(target_index, mem_align, 8, &[I32, I32], &[]),
            Opcode::I32Store16 => self.align_trans(target_index, mem_align, 16, &[I32, I32], &[]),
            Opcode::I64Store8 => self.align_trans(target_index, mem_align, 8, &[I32, I64], &[]),
            Opcode::I64Store16 => self.align_trans(target_index, mem_align, 16, &[I32, I64], &[]),
            Opcode::I64Store32 => self.align_trans(target_index, mem_align, 32, &[I32, I64], &[]),
            Opcode::MemorySize => self.mem_trans(target_index, &[], &[I32]),
            Opcode::MemoryGrow => self.mem_trans(target_index, &[I32], &[I32]),
            Opcode::MemoryInit => {
                self.check_mem(target_index)?;
                if source_index >= self.module.datas {
                    return Err(ErrorKind::InvalidDataIdx {
                        index: source_index,
                        bound: self.module.datas,
                    });
                }
                self.stack_trans(&[I32, I32, I32], &[])
            }
            Opcode::MemoryCopy => {
                self.check_mem(source_index)?;
                self.mem_trans(target_index, &[I32, I32, I32], &[])
            }
            Opcode::MemoryFill => self.mem_trans(target_index, &[I32, I32, I32], &[]),
            Opcode::DataDrop => {
                if target_index >= self.module.datas {
                    return Err(ErrorKind::InvalidDataIdx {
                        index: target_index,
                        bound: self.module.datas,
                    });
                }
                Ok(())
            }

            // Constants.
            Opcode::I32Const => self.stack_trans(&[], &[I32]),
            Opcode::I64Const => self.stack_trans(&[], &[I64]),
            Opcode::F32Const => self.stack_trans(&[], &[F32]),
            Opcode::F64Const => self.stack_trans(&[], &[F64]),

            // Unary numeric.
            Opcode::I32Eqz => self.stack_trans(&[I32], &[I32]),
            Opcode::I64Eqz => self.stack_trans(&[I64], &[I32]),
            Opcode::I32Clz | Opcode::I32Ctz | Opcode::I32Popcnt => {
                self.stack_trans(&[I32], &[I32])
            }
            Opcode::I64Clz | Opcode::I64Ctz | Opcode::I64Popcnt => {
                self.stack_trans(&[I64], &[I64])
            }
            Opcode::F32Abs
            | Opcode::F32Neg
            | Opcode::F32Ceil
            | Opcode::F32Floor
            | Opcode::F32Trunc
            | Opcode::F32Nearest
            | Opcode::F32Sqrt => self.stack_trans(&[F32], &[F32]),
            Opcode::F64Abs
            | Opcode::F64Neg
            | Opcode::F64Ceil
            | Opcode::F64Floor
            | Opcode::F64Trunc
            | Opcode::F64Nearest
            | Opcode::F64Sqrt => self.stack_trans(&[F64], &[F64]),
            Opcode::I32WrapI64 => self.stack_trans(&[I64], &[I32]),
            Opcode::I32TruncF32S | Opcode::I32TruncF32U => self.stack_trans(&[F32], &[I32]),
            Opcode::I32TruncF64S | Opcode::I32TruncF64U => self.stack_trans(&[F64], &[I32]),
            Opcode::I64ExtendI32S | Opcode::I64ExtendI32U => self.stack_trans(&[I32], &[I64]),
            Opcode::I64TruncF32S | Opcode::I64TruncF32U => self.stack_trans(&[F32], &[I64]),
            Opcode::I64TruncF64S | Opcode::I64TruncF64U => self.stack_trans(&[F64], &[I64]),
            Opcode::F32ConvertI32S | Opcode::F32ConvertI32U => self.stack_trans(&[I32], &[F32]),
            Opcode::F32ConvertI64S | Opcode::F32ConvertI64U => self.stack_trans(&[I64], &[F32]),
            Opcode::F32DemoteF64 => self.stack_trans(&[F64], &[F32]),
            Opcode::F64ConvertI32S | Opcode::F64ConvertI32U => self.stack_trans(&[I32], &[F64]),
            Opcode::F64ConvertI64S | Opcode::F64ConvertI64U => self.stack_trans(&[I64], &[F64]),
            Opcode::F64PromoteF32 => self.stack_trans(&[F32], &[F64]),
            Opcode::I32ReinterpretF32 => self.stack_trans(&[F32], &[I32]),
            Opcode::I64ReinterpretF64 => self.stack_trans(&[F64], &[I64]),
            Opcode::F32ReinterpretI32 => self.stack_trans(&[I32], &[F32]),
            Opcode::F64ReinterpretI64 => self.stack_trans(&[I64], &[F64]),
            Opcode::I32Extend8S | Opcode::I32Extend16S => self.stack_trans(&[I32], &[I32]),
            Opcode::I64Extend8S | Opcode::I64Extend16S | Opcode::I64Extend32S => {
                self.stack_trans(&[I64], &[I64])
            }
            Opcode::I32TruncSatF32S | Opcode::I32TruncSatF32U => self.stack_trans(&[F32], &[I32]),
            Opcode::I32TruncSatF64S | Opcode::I32TruncSatF64U => self.stack_trans(&[F64], &[I32]),
            Opcode::I64TruncSatF32S | Opcode::I64TruncSatF32U => self.stack_trans(&[F32], &[I64]),
            Opcode::I64TruncSatF64S | Opcode::I64TruncSatF64U => self.stack_trans(&[F64], &[I64]),

            // Binary numeric.
            Opcode::I32Eq
            | Opcode::I32Ne
            | Opcode::I32LtS
            | Opcode::I32LtU
            | Opcode::I32GtS
            | Opcode::I32GtU
            | Opcode::I32LeS
            | Opcode::I32LeU
            | Opcode::I32GeS
            | Opcode::I32GeU => self.stack_trans(&[I32, I32], &[I32]),
            Opcode::I64Eq
            | Opcode::I64Ne
            | Opcode::I64LtS
            | Opcode::I64LtU
            | Opcode::I64GtS
            | Opcode::I64GtU
            | Opcode::I64LeS
            | Opcode::I64LeU
            | Opcode::I64GeS
            | Opcode::I64GeU => self.stack_trans(&[I64, I64], &[I32]),
            Opcode::F32Eq
            | Opcode::F32Ne
            | Opcode::F32Lt
            | Opcode::F32Gt
            | Opcode::F32Le
            | Opcode::F32Ge => self.stack_trans(&[F32, F32], &[I32]),
            Opcode::F64Eq
            | Opcode::F64Ne
            | Opcode::F64Lt
            | Opcode::F64Gt
            | Opcode::F64Le
            | Opcode::F64Ge => self.stack_trans(&[F64, F64], &[I32]),
            Opcode::I32Add
            | Opcode::I32Sub
            | Opcode::I32Mul
            | Opcode::I32DivS
            | Opcode::I32DivU
            | Opcode::I32RemS
            | Opcode::I32RemU
            | Opcode::I32And
            | Opcode::I32Or
            | Opcode::I32Xor
            | Opcode::I32Shl
            | Opcode::I32ShrS
            | Opcode::I32ShrU
            | Opcode::I32Rotl
            | Opcode::I32Rotr => self.stack_trans(&[I32, I32], &[I32]),
            Opcode::I64Add
            | Opcode::I64Sub
            | Opcode::I64Mul
            | Opcode::I64DivS
            | Opcode::I64DivU
            | Opcode::I64RemS
            | Opcode::I64RemU
            | Opcode::I64And
            | Opcode::I64Or
            | Opcode::I64Xor
            | Opcode::I64Shl
            | Opcode::I64ShrS
            | Opcode::I64ShrU
            | Opcode::I64Rotl
            | Opcode::I64Rotr => self.stack_trans(&[I64, I64], &[I64]),
            Opcode::F32Add
            | Opcode::F32Sub
            | Opcode::F32Mul
            | Opcode::F32Div
            | Opcode::F32Min
            | Opcode::F32Max
            | Opcode::F32Copysign => self.stack_trans(&[F32, F32], &[F32]),
            Opcode::F64Add
            | Opcode::F64Sub
            | Opcode::F64Mul
            | Opcode::F64Div
            | Opcode::F64Min
            | Opcode::F64Max
            | Opcode::F64Copysign => self.stack_trans(&[F64, F64], &[F64]),

            // SIMD memory.
            Opcode::V128Load => self.align_trans(target_index, mem_align, 128, &[I32], &[V128]),
            Opcode::V128Load8x8S
            | Opcode::V128Load8x8U
            | Opcode::V128Load16x4S
            | Opcode::V128Load16x4U
            | Opcode::V128Load32x2S
            | Opcode::V128Load32x2U
            | Opcode::V128Load64Splat
            | Opcode::V128Load64Zero => {
                self.align_trans(target_index, mem_align, 64, &[I32], &[V128])
            }
            Opcode::V128Load8Splat => self.align_trans(target_index, mem_align, 8, &[I32], &[V128]),
            Opcode::V128Load16Splat => {
                self.align_trans(target_index, mem_align, 16, &[I32], &[V128])
            }
            Opcode::V128Load32Splat | Opcode::V128Load32Zero => {
                self.align_trans(target_index, mem_align, 32, &[I32], &[V128])
            }
            Opcode::V128Store => self.align_trans(target_index, mem_align, 128, &[I32, V128], &[]),
            Opcode::V128Load8Lane => {
                self.align_lane_trans(target_index, mem_align, mem_lane, 8, &[I32, V128], &[V128])
            }
            Opcode::V128Load16Lane => {
                self.align_lane_trans(target_index, mem_align, mem_lane, 16, &[I32, V128], &[V128])
            }
            Opcode::V128Load32Lane => {
                self.align_lane_trans(target_index, mem_align, mem_lane, 32, &[I32, V128], &[V128])
            }
            Opcode::V128Load64Lane => {
                self.align_lane_trans(target_index, mem_align, mem_lane, 64, &[I32, V128], &[V128])
            }
            Opcode::V128Store8Lane => {
                self.align_lane_trans(target_index, mem_align, mem_lane, 8, &[I32, V128], &[])
            }
            Opcode::V128Store16Lane => {
                self.align_lane_trans(target_index, mem_align, mem_lane, 16, &[I32, V128], &[])
            }
            Opcode::V128Store32Lane => {
                self.align_lane_trans(target_index, mem_align, mem_lane, 32, &[I32, V128], &[])
            }
            Opcode::V128Store64Lane => {
                self.align_lane_trans(target_index, mem_align, mem_lane, 64, &[I32, V128], &[])
            }

            // SIMD constants and shuffles.
            Opcode::V128Const => self.stack_trans(&[], &[V128]),
            Opcode::I8x16Shuffle => {
                // Every lane byte must be < 32; check all sixteen by mask.
                const LANE_MASK: u128 = 0xe0e0_e0e0_e0e0_e0e0_e0e0_e0e0_e0e0_e0e0;
                if num & LANE_MASK != 0 {
                    let lane = (0..16)
                        .map(|i| (num >> (8 * i)) as u8)
                        .find(|&b| b >= 32)
                        .unwrap_or(32);
                    return Err(ErrorKind::InvalidLaneIdx {
                        index: u32::from(lane),
                        bound: 32,
                    });
                }
                self.stack_trans(&[V128, V128], &[V128])
            }

            // SIMD lane access.
            Opcode::I8x16ExtractLaneS | Opcode::I8x16ExtractLaneU => {
                self.lane_trans(mem_lane, 16, &[V128], &[I32])
            }
            Opcode::I8x16ReplaceLane => self.lane_trans(mem_lane, 16, &[V128, I32], &[V128]),
            Opcode::I16x8ExtractLaneS | Opcode::I16x8ExtractLaneU => {
                self.lane_trans(mem_lane, 8, &[V128], &[I32])
            }
            Opcode::I16x8ReplaceLane => self.lane_trans(mem_lane, 8, &[V128, I32], &[V128]),
            Opcode::I32x4ExtractLane => self.lane_trans(mem_lane, 4, &[V128], &[I32]),
            Opcode::I32x4ReplaceLane => self.lane_trans(mem_lane, 4, &[V128, I32], &[V128]),
            Opcode::I64x2ExtractLane => self.lane_trans(mem_lane, 2, &[V128], &[I64]),
            Opcode::I64x2ReplaceLane => self.lane_trans(mem_lane, 2, &[V128, I64], &[V128]),
            Opcode::F32x4ExtractLane => self.lane_trans(mem_lane, 4, &[V128], &[F32]),
            Opcode::F32x4ReplaceLane => self.lane_trans(mem_lane, 4, &[V128, F32], &[V128]),
            Opcode::F64x2ExtractLane => self.lane_trans(mem_lane, 2, &[V128], &[F64]),
            Opcode::F64x2ReplaceLane => self.lane_trans(mem_lane, 2, &[V128, F64], &[V128]),

            // SIMD splats.
            Opcode::I8x16Splat | Opcode::I16x8Splat | Opcode::I32x4Splat => {
                self.stack_trans(&[I32], &[V128])
            }
            Opcode::I64x2Splat => self.stack_trans(&[I64], &[V128]),
            Opcode::F32x4Splat => self.stack_trans(&[F32], &[V128]),
            Opcode::F64x2Splat => self.stack_trans(&[F64], &[V128]),

            // SIMD unary.
            Opcode::V128Not
            | Opcode::I8x16Abs
            | Opcode::I8x16Neg
            | Opcode::I8x16Popcnt
            | Opcode::I16x8Abs
            | Opcode::I16x8Neg
            | Opcode::I16x8ExtendLowI8x16S
            | Opcode::I16x8ExtendHighI8x16S
            | Opcode::I16x8ExtendLowI8x16U
            | Opcode::I16x8ExtendHighI8x16U
            | Opcode::I16x8ExtaddPairwiseI8x16S
            | Opcode::I16x8ExtaddPairwiseI8x16U
            | Opcode::I32x4Abs
            | Opcode::I32x4Neg
            | Opcode::I32x4ExtendLowI16x8S
            | Opcode::I32x4ExtendHighI16x8S
            | Opcode::I32x4ExtendLowI16x8U
            | Opcode::I32x4ExtendHighI16x8U
            | Opcode::I32x4ExtaddPairwiseI16x8S
            | Opcode::I32x4ExtaddPairwiseI16x8U
            | Opcode::I64x2Abs
            | Opcode::I64x2Neg
            | Opcode::I64x2ExtendLowI32x4S
            | Opcode::I64x2ExtendHighI32x4S
            | Opcode::I64x2ExtendLowI32x4U
            | Opcode::I64x2ExtendHighI32x4U
            | Opcode::F32x4Abs
            | Opcode::F32x4Neg
            | Opcode::F32x4Sqrt
            | Opcode::F64x2Abs
            | Opcode::F64x2Neg
            | Opcode::F64x2Sqrt
            | Opcode::I32x4TruncSatF32x4S
            | Opcode::I32x4TruncSatF32x4U
            | Opcode::F32x4ConvertI32x4S
            | Opcode::F32x4ConvertI32x4U
            | Opcode::I32x4TruncSatF64x2SZero
            | Opcode::I32x4TruncSatF64x2UZero
            | Opcode::F64x2ConvertLowI32x4S
            | Opcode::F64x2ConvertLowI32x4U
            | Opcode::F32x4DemoteF64x2Zero
            | Opcode::F64x2PromoteLowF32x4
            | Opcode::F32x4Ceil
            | Opcode::F32x4Floor
            | Opcode::F32x4Trunc
            | Opcode::F32x4Nearest
            | Opcode::F64x2Ceil
            | Opcode::F64x2Floor
            | Opcode::F64x2Trunc
            | Opcode::F64x2Nearest => self.stack_trans(&[V128], &[V128]),

            // SIMD binary.
            Opcode::I8x16Swizzle
            | Opcode::I8x16Eq
            | Opcode::I8x16Ne
            | Opcode::I8x16LtS
            | Opcode::I8x16LtU
            | Opcode::I8x16GtS
            | Opcode::I8x16GtU
            | Opcode::I8x16LeS
            | Opcode::I8x16LeU
            | Opcode::I8x16GeS
            | Opcode::I8x16GeU
            | Opcode::I16x8Eq
            | Opcode::I16x8Ne
            | Opcode::I16x8LtS
            | Opcode::I16x8LtU
            | Opcode::I16x8GtS
            | Opcode::I16x8GtU
            | Opcode::I16x8LeS
            | Opcode::I16x8LeU
            | Opcode::I16x8GeS
            | Opcode::I16x8GeU
            | Opcode::I32x4Eq
            | Opcode::I32x4Ne
            | Opcode::I32x4LtS
            | Opcode::I32x4LtU
            | Opcode::I32x4GtS
            | Opcode::I32x4GtU
            | Opcode::I32x4LeS
            | Opcode::I32x4LeU
            | Opcode::I32x4GeS
            | Opcode::I32x4GeU
            | Opcode::I64x2Eq
            | Opcode::I64x2Ne
            | Opcode::I64x2LtS
            | Opcode::I64x2GtS
            | Opcode::I64x2LeS
            | Opcode::I64x2GeS
            | Opcode::F32x4Eq
            | Opcode::F32x4Ne
            | Opcode::F32x4Lt
            | Opcode::F32x4Gt
            | Opcode::F32x4Le
            | Opcode::F32x4Ge
            | Opcode::F64x2Eq
            | Opcode::F64x2Ne
            | Opcode::F64x2Lt
            | Opcode::F64x2Gt
            | Opcode::F64x2Le
            | Opcode::F64x2Ge
            | Opcode::V128And
            | Opcode::V128Andnot
            | Opcode::V128Or
            | Opcode::V128Xor
            | Opcode::I8x16NarrowI16x8S
            | Opcode::I8x16NarrowI16x8U
            | Opcode::I8x16Add
            | Opcode::I8x16AddSatS
            | Opcode::I8x16AddSatU
            | Opcode::I8x16Sub
            | Opcode::I8x16SubSatS
            | Opcode::I8x16SubSatU
            | Opcode::I8x16MinS
            | Opcode::I8x16MinU
            | Opcode::I8x16MaxS
            | Opcode::I8x16MaxU
            | Opcode::I8x16AvgrU
            | Opcode::I16x8NarrowI32x4S
            | Opcode::I16x8NarrowI32x4U
            | Opcode::I16x8Add
            | Opcode::I16x8AddSatS
            | Opcode::I16x8AddSatU
            | Opcode::I16x8Sub
            | Opcode::I16x8SubSatS
            | Opcode::I16x8SubSatU
            | Opcode::I16x8Mul
            | Opcode::I16x8MinS
            | Opcode::I16x8MinU
            | Opcode::I16x8MaxS
            | Opcode::I16x8MaxU
            | Opcode::I16x8AvgrU
            | Opcode::I16x8ExtmulLowI8x16S
            | Opcode::I16x8ExtmulHighI8x16S
            | Opcode::I16x8ExtmulLowI8x16U
            | Opcode::I16x8ExtmulHighI8x16U
            | Opcode::I16x8Q15mulrSatS
            | Opcode::I32x4Add
            | Opcode::I32x4Sub
            | Opcode::I32x4Mul
            | Opcode::I32x4MinS
            | Opcode::I32x4MinU
            | Opcode::I32x4MaxS
            | Opcode::I32x4MaxU
            | Opcode::I32x4ExtmulLowI16x8S
            | Opcode::I32x4ExtmulHighI16x8S
            | Opcode::I32x4ExtmulLowI16x8U
            | Opcode::I32x4ExtmulHighI16x8U
            | Opcode::I64x2Add
            | Opcode::I64x2Sub
            | Opcode::I64x2Mul
            | Opcode::I64x2ExtmulLowI32x4S
            | Opcode::I64x2ExtmulHighI32x4S
            | Opcode::I64x2ExtmulLowI32x4U
            | Opcode::I64x2ExtmulHighI32x4U
            | Opcode::F32x4Add
            | Opcode::F32x4Sub
            | Opcode::F32x4Mul
            | Opcode::F32x4Div
            | Opcode::F32x4Min
            | Opcode::F32x4Max
            | Opcode::F32x4Pmin
            | Opcode::F32x4Pmax
            | Opcode::F64x2Add
            | Opcode::F64x2Sub
            | Opcode::F64x2Mul
            | Opcode::F64x2Div
            | Opcode::F64x2Min
            | Opcode::F64x2Max
            | Opcode::F64x2Pmin
            | Opcode::F64x2Pmax
            | Opcode::I32x4DotI16x8S => self.stack_trans(&[V128, V128], &[V128]),

            Opcode::V128Bitselect => self.stack_trans(&[V128, V128, V128], &[V128]),

            // SIMD tests.
            Opcode::V128AnyTrue
            | Opcode::I8x16AllTrue
            | Opcode::I8x16Bitmask
            | Opcode::I16x8AllTrue
            | Opcode::I16x8Bitmask
            | Opcode::I32x4AllTrue
            | Opcode::I32x4Bitmask
            | Opcode::I64x2AllTrue
            | Opcode::I64x2Bitmask => self.stack_trans(&[V128], &[I32]),

            // SIMD shifts.
            Opcode::I8x16Shl
            | Opcode::I8x16ShrS
            | Opcode::I8x16ShrU
            | Opcode::I16x8Shl
            | Opcode::I16x8ShrS
            | Opcode::I16x8ShrU
            | Opcode::I32x4Shl
            | Opcode::I32x4ShrS
            | Opcode::I32x4ShrU
            | Opcode::I64x2Shl
            | Opcode::I64x2ShrS
            | Opcode::I64x2ShrU => self.stack_trans(&[V128, I32], &[V128]),

            // Atomics.
            Opcode::MemoryAtomicNotify => {
                self.align_trans(target_index, mem_align, 32, &[I32, I32], &[I32])
            }
            Opcode::MemoryAtomicWait32 => {
                self.align_trans(target_index, mem_align, 32, &[I32, I32, I64], &[I32])
            }
            Opcode::MemoryAtomicWait64 => {
                self.align_trans(target_index, mem_align, 64, &[I32, I64, I64], &[I32])
            }
            Opcode::I32AtomicLoad => self.align_trans(target_index, mem_align, 32, &[I32], &[I32]),
            Opcode::I64AtomicLoad => self.align_trans(target_index, mem_align, 64, &[I32], &[I64]),
            Opcode::I32AtomicLoad8U => {
                self.align_trans(target_index, mem_align, 8, &[I32], &[I32])
            }
            Opcode::I32AtomicLoad16U => {
                self.align_trans(target_index, mem_align, 16, &[I32], &[I32])
            }
            Opcode::I64AtomicLoad8U => {
                self.align_trans(target_index, mem_align, 8, &[I32], &[I64])
            }
            Opcode::I64AtomicLoad16U => {
                self.align_trans(target_index, mem_align, 16, &[I32], &[I64])
            }
            Opcode::I64AtomicLoad32U => {
                self.align_trans(target_index, mem_align, 32, &[I32], &[I64])
            }
            Opcode::I32AtomicStore => {
                self.align_trans(target_index, mem_align, 32, &[I32, I32], &[])
            }
            Opcode::I64AtomicStore => {
                self.align_trans(target_index, mem_align, 64, &[I32, I64], &[])
            }
            Opcode::I32AtomicStore8 => {
                self.align_trans(target_index, mem_align, 8, &[I32, I32], &[])
            }
            Opcode::I32AtomicStore16 => {
                self.align_trans(target_index, mem_align, 16, &[I32, I32], &[])
            }
            Opcode::I64AtomicStore8 => {
                self.align_trans(target_index, mem_align, 8, &[I32, I64], &[])
            }
            Opcode::I64AtomicStore16 => {
                self.align_trans(target_index, mem_align, 16, &[I32, I64], &[])
            }
            Opcode::I64AtomicStore32 => {
                self.align_trans(target_index, mem_align, 32, &[I32, I64], &[])
            }

            // Atomic read-modify-write.
            Opcode::I32AtomicRmwAdd
            | Opcode::I32AtomicRmwSub
            | Opcode::I32AtomicRmwAnd
            | Opcode::I32AtomicRmwOr
            | Opcode::I32AtomicRmwXor
            | Opcode::I32AtomicRmwXchg => {
                self.align_trans(target_index, mem_align, 32, &[I32, I32], &[I32])
            }
            Opcode::I64AtomicRmwAdd
            | Opcode::I64AtomicRmwSub
            | Opcode::I64AtomicRmwAnd
            | Opcode::I64AtomicRmwOr
            | Opcode::I64AtomicRmwXor
            | Opcode::I64AtomicRmwXchg => {
                self.align_trans(target_index, mem_align, 64, &[I32, I64], &[I64])
            }
            Opcode::I32AtomicRmw8AddU
            | Opcode::I32AtomicRmw8SubU
            | Opcode::I32AtomicRmw8AndU
            | Opcode::I32AtomicRmw8OrU
            | Opcode::I32AtomicRmw8XorU
            | Opcode::I32AtomicRmw8XchgU => {
                self.align_trans(target_index, mem_align, 8, &[I32, I32], &[I32])
            }
            Opcode::I32AtomicRmw16AddU
            | Opcode::I32AtomicRmw16SubU
            | Opcode::I32AtomicRmw16AndU
            | Opcode::I32AtomicRmw16OrU
            | Opcode::I32AtomicRmw16XorU
            | Opcode::I32AtomicRmw16XchgU => {
                self.align_trans(target_index, mem_align, 16, &[I32, I32], &[I32])
            }
            Opcode::I64AtomicRmw8AddU
            | Opcode::I64AtomicRmw8SubU
            | Opcode::I64AtomicRmw8AndU
            | Opcode::I64AtomicRmw8OrU
            | Opcode::I64AtomicRmw8XorU
            | Opcode::I64AtomicRmw8XchgU => {
                self.align_trans(target_index, mem_align, 8, &[I32, I64], &[I64])
            }
            Opcode::I64AtomicRmw16AddU
            | Opcode::I64AtomicRmw16SubU
            | Opcode::I64AtomicRmw16AndU
            | Opcode::I64AtomicRmw16OrU
            | Opcode::I64AtomicRmw16XorU
            | Opcode::I64AtomicRmw16XchgU => {
                self.align_trans(target_index, mem_align, 16, &[I32, I64], &[I64])
            }
            Opcode::I64AtomicRmw32AddU
            | Opcode::I64AtomicRmw32SubU
            | Opcode::I64AtomicRmw32AndU
            | Opcode::I64AtomicRmw32OrU
            | Opcode::I64AtomicRmw32XorU
            | Opcode::I64AtomicRmw32XchgU => {
                self.align_trans(target_index, mem_align, 32, &[I32, I64], &[I64])
            }
            Opcode::I32AtomicRmwCmpxchg => {
                self.align_trans(target_index, mem_align, 32, &[I32, I32, I32], &[I32])
            }
            Opcode::I64AtomicRmwCmpxchg => {
                self.align_trans(target_index, mem_align, 64, &[I32, I64, I64], &[I64])
            }
            Opcode::I32AtomicRmw8CmpxchgU => {
                self.align_trans(target_index, mem_align, 8, &[I32, I32, I32], &[I32])
            }
            Opcode::I32AtomicRmw16CmpxchgU => {
                self.align_trans(target_index, mem_align, 16, &[I32, I32, I32], &[I32])
            }
            Opcode::I64AtomicRmw8CmpxchgU => {
                self.align_trans(target_index, mem_align, 8, &[I32, I64, I64], &[I64])
            }
            Opcode::I64AtomicRmw16CmpxchgU => {
                self.align_trans(target_index, mem_align, 16, &[I32, I64, I64], &[I64])
            }
            Opcode::I64AtomicRmw32CmpxchgU => {
                self.align_trans(target_index, mem_align, 32, &[I32, I64, I64], &[I64])
            }
        }
    }

    fn init_local(&mut self, idx: u32) {
        if let Some(local) = self.locals.get_mut(idx as usize)
            && !local.is_init
        {
            local.is_init = true;
            self.local_inits.push(idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::BodyBuilder;
    use crate::types::{FuncType, GlobalType, Mutability};

    fn verify(body: &mut [Instruction], returns: &[ValType]) -> Result<(), VerifyError> {
        BodyVerifier::new().validate(body, returns)
    }

    fn kind(err: VerifyError) -> ErrorKind {
        err.kind
    }

    #[test]
    fn empty_body_succeeds_regardless_of_returns() {
        let mut v = BodyVerifier::new();
        assert_eq!(v.validate(&mut [], &[I32]), Ok(()));
    }

    #[test]
    fn const_add_matches_returns() {
        let mut b = BodyBuilder::new();
        b.i32_const(1);
        b.i32_const(2);
        b.op(Opcode::I32Add);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(verify(&mut body, &[I32]), Ok(()));
    }

    #[test]
    fn add_underflows_on_empty_stack() {
        let mut b = BodyBuilder::new();
        b.op(Opcode::I32Add);
        b.end();
        let mut body = b.finish().unwrap();
        let err = verify(&mut body, &[]).unwrap_err();
        assert_eq!(err.opcode, Opcode::I32Add);
        assert_eq!(err.offset, 0);
        assert_eq!(
            kind(err),
            ErrorKind::TypeCheckFailed(TypeCheckError::StackUnderflow)
        );
    }

    #[test]
    fn operand_mismatch_reports_both_types() {
        let mut b = BodyBuilder::new();
        b.i32_const(0);
        b.f32_const(0);
        b.op(Opcode::I32Add);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(
            kind(verify(&mut body, &[I32]).unwrap_err()),
            ErrorKind::TypeCheckFailed(TypeCheckError::Mismatch {
                expected: I32,
                found: F32
            })
        );
    }

    #[test]
    fn unreachable_makes_the_frame_polymorphic() {
        let mut b = BodyBuilder::new();
        b.op(Opcode::Unreachable);
        b.op(Opcode::I32Add);
        b.op(Opcode::Drop);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(verify(&mut body, &[]), Ok(()));
    }

    #[test]
    fn branch_in_block_points_at_end() {
        let mut b = BodyBuilder::new();
        b.block(BlockType::Empty);
        b.br(0);
        b.end();
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(verify(&mut body, &[]), Ok(()));
        assert_eq!(body[1].jump.pc_offset, 1);
        assert_eq!(body[1].jump.stack_erase_begin, 0);
        assert_eq!(body[1].jump.stack_erase_end, 0);
    }

    #[test]
    fn branch_in_loop_points_back_at_header() {
        let mut b = BodyBuilder::new();
        b.loop_(BlockType::Empty);
        b.br(0);
        b.end();
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(verify(&mut body, &[]), Ok(()));
        assert_eq!(body[1].jump.pc_offset, -1);
    }

    #[test]
    fn branch_erase_counts_label_arity_and_extra_operands() {
        // block (result i32) with an extra i64 below the branch operand.
        let mut b = BodyBuilder::new();
        b.block(BlockType::Val(I32));
        b.i64_const(0);
        b.i32_const(1);
        b.i32_const(1);
        b.br_if(0);
        b.br(0);
        b.end();
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(verify(&mut body, &[I32]), Ok(()));
        // At br_if: stack above the block floor is [i64, i32]; arity 1.
        assert_eq!(body[4].jump.stack_erase_begin, 2);
        assert_eq!(body[4].jump.stack_erase_end, 1);
        // At br: [i64, i32] again after br_if pushed the label type back.
        assert_eq!(body[5].jump.stack_erase_begin, 2);
        assert_eq!(body[5].jump.stack_erase_end, 1);
    }

    #[test]
    fn branch_depth_out_of_range() {
        let mut b = BodyBuilder::new();
        b.br(3);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(
            kind(verify(&mut body, &[]).unwrap_err()),
            ErrorKind::InvalidLabelIdx { index: 3, bound: 1 }
        );
    }

    #[test]
    fn if_without_else_requires_matching_signature() {
        let mut b = BodyBuilder::new();
        b.i32_const(1);
        b.if_(BlockType::Val(I32));
        b.i32_const(2);
        b.end();
        b.op(Opcode::Drop);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(
            kind(verify(&mut body, &[]).unwrap_err()),
            ErrorKind::TypeCheckFailed(TypeCheckError::Arity {
                expected: vec![I32],
                found: vec![],
            })
        );
    }

    #[test]
    fn if_else_arms_check_independently() {
        let mut b = BodyBuilder::new();
        b.i32_const(1);
        b.if_(BlockType::Val(I32));
        b.i32_const(2);
        b.else_();
        b.i32_const(3);
        b.end();
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(verify(&mut body, &[I32]), Ok(()));
    }

    #[test]
    fn br_table_rejects_differing_label_arity() {
        let mut b = BodyBuilder::new();
        b.block(BlockType::Val(I32));
        b.i32_const(0);
        b.i32_const(0);
        b.br_table(&[0], 1);
        b.end();
        b.end();
        let mut body = b.finish().unwrap();
        assert!(matches!(
            kind(verify(&mut body, &[I32]).unwrap_err()),
            ErrorKind::TypeCheckFailed(TypeCheckError::Arity { .. })
        ));
    }

    #[test]
    fn br_table_resolves_every_label() {
        let mut b = BodyBuilder::new();
        b.block(BlockType::Empty);
        b.block(BlockType::Empty);
        b.i32_const(0);
        b.br_table(&[0, 1], 1);
        b.end();
        b.end();
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(verify(&mut body, &[]), Ok(()));
        // Inner block ends at 4, outer at 5, br_table sits at 3.
        assert_eq!(body[3].label_list[0].pc_offset, 1);
        assert_eq!(body[3].label_list[1].pc_offset, 2);
        assert_eq!(body[3].label_list[2].pc_offset, 2);
    }

    #[test]
    fn select_requires_same_numeric_types() {
        let mut b = BodyBuilder::new();
        b.i32_const(1);
        b.i64_const(2);
        b.i32_const(0);
        b.op(Opcode::Select);
        b.op(Opcode::Drop);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(
            kind(verify(&mut body, &[]).unwrap_err()),
            ErrorKind::TypeCheckFailed(TypeCheckError::Mismatch {
                expected: I64,
                found: I32
            })
        );
    }

    #[test]
    fn select_rejects_references() {
        let mut v = BodyVerifier::new();
        let mut b = BodyBuilder::new();
        b.ref_null(HeapType::Func);
        b.ref_null(HeapType::Func);
        b.i32_const(0);
        b.op(Opcode::Select);
        b.op(Opcode::Drop);
        b.end();
        let mut body = b.finish().unwrap();
        assert!(matches!(
            v.validate(&mut body, &[]).unwrap_err().kind,
            ErrorKind::TypeCheckFailed(TypeCheckError::Mismatch { .. })
        ));
    }

    #[test]
    fn typed_select_requires_exactly_one_annotation() {
        let mut b = BodyBuilder::new();
        b.i32_const(1);
        b.i32_const(2);
        b.i32_const(0);
        b.select_t(&[I32, I32]);
        b.op(Opcode::Drop);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(
            kind(verify(&mut body, &[]).unwrap_err()),
            ErrorKind::InvalidResultArity { count: 2 }
        );
    }

    #[test]
    fn local_get_requires_initialization() {
        let mut v = BodyVerifier::new();
        v.module.add_type(FuncType::new(&[], &[]));
        v.add_local(ValType::Ref(RefType::non_null(HeapType::Index(0))), false);
        let mut b = BodyBuilder::new();
        b.local_get(0);
        b.op(Opcode::Drop);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(
            v.validate(&mut body, &[]).unwrap_err().kind,
            ErrorKind::InvalidUninitLocal { index: 0 }
        );
    }

    #[test]
    fn local_init_rolls_back_when_the_frame_closes() {
        let mut v = BodyVerifier::new();
        v.module.add_type(FuncType::new(&[], &[]));
        v.module.add_func(0, false);
        v.module.add_ref(0);
        v.add_local(ValType::Ref(RefType::non_null(HeapType::Index(0))), false);
        let mut b = BodyBuilder::new();
        b.block(BlockType::Empty);
        b.ref_func(0);
        b.local_set(0);
        b.end();
        b.local_get(0);
        b.op(Opcode::Drop);
        b.end();
        let mut body = b.finish().unwrap();
        let err = v.validate(&mut body, &[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidUninitLocal { index: 0 });
        assert_eq!(err.opcode, Opcode::LocalGet);
    }

    #[test]
    fn local_init_survives_within_the_same_frame() {
        let mut v = BodyVerifier::new();
        v.module.add_type(FuncType::new(&[], &[]));
        v.module.add_func(0, false);
        v.module.add_ref(0);
        v.add_local(ValType::Ref(RefType::non_null(HeapType::Index(0))), false);
        let mut b = BodyBuilder::new();
        b.ref_func(0);
        b.local_set(0);
        b.local_get(0);
        b.op(Opcode::Drop);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(v.validate(&mut body, &[]), Ok(()));
    }

    #[test]
    fn local_ops_record_their_stack_slot() {
        let mut v = BodyVerifier::new();
        v.add_local(I32, true);
        v.add_local(I64, true);
        let mut b = BodyBuilder::new();
        b.i32_const(7);
        b.local_get(1);
        b.op(Opcode::Drop);
        b.local_set(0);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(v.validate(&mut body, &[]), Ok(()));
        // local.get 1 with one operand on the stack: 1 + (2 - 1).
        assert_eq!(body[1].stack_offset, 2);
        // local.set 0 with one operand on the stack: 1 + (2 - 0).
        assert_eq!(body[3].stack_offset, 3);
    }

    #[test]
    fn global_set_requires_mutability() {
        let mut v = BodyVerifier::new();
        v.module.add_global(
            GlobalType {
                val_type: I32,
                mutability: Mutability::Const,
            },
            false,
        );
        let mut b = BodyBuilder::new();
        b.i32_const(1);
        b.global_set(0);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(
            v.validate(&mut body, &[]).unwrap_err().kind,
            ErrorKind::ImmutableGlobal { index: 0 }
        );
    }

    #[test]
    fn alignment_boundary_is_exact() {
        // i32.load: natural alignment 4 bytes, exponent 2.
        for (align, ok) in [(2, true), (3, false)] {
            let mut v = BodyVerifier::new();
            v.module.add_memory();
            let mut b = BodyBuilder::new();
            b.i32_const(0);
            b.mem_op(Opcode::I32Load, align);
            b.op(Opcode::Drop);
            b.end();
            let mut body = b.finish().unwrap();
            let res = v.validate(&mut body, &[]);
            if ok {
                assert_eq!(res, Ok(()));
            } else {
                assert_eq!(
                    res.unwrap_err().kind,
                    ErrorKind::InvalidAlignment {
                        align: 3,
                        natural: 4
                    }
                );
            }
        }
    }

    #[test]
    fn huge_alignment_exponent_is_rejected() {
        let mut v = BodyVerifier::new();
        v.module.add_memory();
        let mut b = BodyBuilder::new();
        b.i32_const(0);
        b.mem_op(Opcode::I64Load, 40);
        b.op(Opcode::Drop);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(
            v.validate(&mut body, &[]).unwrap_err().kind,
            ErrorKind::InvalidAlignment {
                align: 40,
                natural: 8
            }
        );
    }

    #[test]
    fn load_without_memory_is_rejected() {
        let mut b = BodyBuilder::new();
        b.i32_const(0);
        b.mem_op(Opcode::I32Load, 2);
        b.op(Opcode::Drop);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(
            kind(verify(&mut body, &[]).unwrap_err()),
            ErrorKind::InvalidMemoryIdx { index: 0, bound: 0 }
        );
    }

    #[test]
    fn lane_bounds_follow_access_width() {
        let mut v = BodyVerifier::new();
        v.module.add_memory();
        let mut b = BodyBuilder::new();
        b.i32_const(0);
        b.v128_const(0);
        b.mem_lane_op(Opcode::V128Load64Lane, 3, 2);
        b.op(Opcode::Drop);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(
            v.validate(&mut body, &[]).unwrap_err().kind,
            ErrorKind::InvalidLaneIdx { index: 2, bound: 2 }
        );
    }

    #[test]
    fn shuffle_lane_bytes_must_stay_below_32() {
        let mut b = BodyBuilder::new();
        b.v128_const(0);
        b.v128_const(0);
        b.i8x16_shuffle(0x20 << 64);
        b.op(Opcode::Drop);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(
            kind(verify(&mut body, &[]).unwrap_err()),
            ErrorKind::InvalidLaneIdx {
                index: 32,
                bound: 32
            }
        );
    }

    #[test]
    fn call_applies_the_callee_signature() {
        let mut v = BodyVerifier::new();
        v.module.add_type(FuncType::new(&[I32, I32], &[I64]));
        v.module.add_func(0, false);
        let mut b = BodyBuilder::new();
        b.i32_const(1);
        b.i32_const(2);
        b.call(0);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(v.validate(&mut body, &[I64]), Ok(()));
    }

    #[test]
    fn call_indirect_requires_funcref_table() {
        let mut v = BodyVerifier::new();
        v.module.add_type(FuncType::new(&[], &[]));
        v.module.add_table(ValType::EXTERN_REF);
        let mut b = BodyBuilder::new();
        b.i32_const(0);
        b.call_indirect(0, 0);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(
            v.validate(&mut body, &[]).unwrap_err().kind,
            ErrorKind::InvalidTableIdx { index: 0, bound: 1 }
        );
    }

    #[test]
    fn return_call_matches_caller_returns() {
        let mut v = BodyVerifier::new();
        v.module.add_type(FuncType::new(&[], &[I64]));
        v.module.add_func(0, false);
        let mut b = BodyBuilder::new();
        b.return_call(0);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(v.validate(&mut body, &[I64]), Ok(()));

        let mut v = BodyVerifier::new();
        v.module.add_type(FuncType::new(&[], &[I64]));
        v.module.add_func(0, false);
        let mut b = BodyBuilder::new();
        b.return_call(0);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(
            v.validate(&mut body, &[I32]).unwrap_err().kind,
            ErrorKind::TypeCheckFailed(TypeCheckError::Arity {
                expected: vec![I32],
                found: vec![I64],
            })
        );
    }

    #[test]
    fn ref_func_requires_declaration() {
        let mut v = BodyVerifier::new();
        v.module.add_type(FuncType::new(&[], &[]));
        v.module.add_func(0, false);
        let mut b = BodyBuilder::new();
        b.ref_func(0);
        b.op(Opcode::Drop);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(
            v.validate(&mut body, &[]).unwrap_err().kind,
            ErrorKind::InvalidRefIdx { index: 0 }
        );
    }

    #[test]
    fn ref_as_non_null_strips_nullability() {
        let mut v = BodyVerifier::new();
        v.module.add_type(FuncType::new(&[], &[]));
        let mut b = BodyBuilder::new();
        b.ref_null(HeapType::Index(0));
        b.op(Opcode::RefAsNonNull);
        b.op(Opcode::Drop);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(v.validate(&mut body, &[]), Ok(()));
    }

    #[test]
    fn br_on_null_forwards_the_non_null_reference() {
        let mut v = BodyVerifier::new();
        let mut b = BodyBuilder::new();
        b.block(BlockType::Empty);
        b.ref_null(HeapType::Func);
        b.br_on_null(0);
        b.op(Opcode::RefIsNull);
        b.op(Opcode::Drop);
        b.end();
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(v.validate(&mut body, &[]), Ok(()));
        assert_eq!(body[2].jump.pc_offset, 3);
    }

    #[test]
    fn br_on_non_null_requires_a_non_nullable_label_tail() {
        let mut v = BodyVerifier::new();
        let mut b = BodyBuilder::new();
        b.block(BlockType::Val(I32));
        b.ref_null(HeapType::Func);
        b.br_on_non_null(0);
        b.i32_const(0);
        b.end();
        b.op(Opcode::Drop);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(
            v.validate(&mut body, &[]).unwrap_err().kind,
            ErrorKind::InvalidBrRefType
        );
    }

    #[test]
    fn block_type_index_resolves_the_signature() {
        let mut v = BodyVerifier::new();
        v.module.add_type(FuncType::new(&[I32], &[I64]));
        let mut b = BodyBuilder::new();
        b.i32_const(1);
        b.block(BlockType::TypeIndex(0));
        b.op(Opcode::Drop);
        b.i64_const(2);
        b.end();
        b.op(Opcode::Drop);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(v.validate(&mut body, &[]), Ok(()));

        let mut b = BodyBuilder::new();
        b.block(BlockType::TypeIndex(9));
        b.end();
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(
            v.validate(&mut body, &[]).unwrap_err().kind,
            ErrorKind::InvalidFuncTypeIdx { index: 9, bound: 1 }
        );
    }

    #[test]
    fn table_init_matches_segment_against_table() {
        let mut v = BodyVerifier::new();
        v.module.add_table(ValType::FUNC_REF);
        v.module.add_elem(ValType::EXTERN_REF);
        let mut b = BodyBuilder::new();
        b.i32_const(0);
        b.i32_const(0);
        b.i32_const(0);
        b.table_init(0, 0);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(
            v.validate(&mut body, &[]).unwrap_err().kind,
            ErrorKind::TypeCheckFailed(TypeCheckError::Mismatch {
                expected: ValType::FUNC_REF,
                found: ValType::EXTERN_REF
            })
        );
    }

    #[test]
    fn data_index_bounds_are_checked() {
        let mut v = BodyVerifier::new();
        v.module.add_memory();
        v.module.add_data();
        let mut b = BodyBuilder::new();
        b.i32_const(0);
        b.i32_const(0);
        b.i32_const(0);
        b.memory_init(1);
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(
            v.validate(&mut body, &[]).unwrap_err().kind,
            ErrorKind::InvalidDataIdx { index: 1, bound: 1 }
        );
    }

    #[test]
    fn revalidation_is_deterministic() {
        let mut v = BodyVerifier::new();
        let mut b = BodyBuilder::new();
        b.block(BlockType::Val(I32));
        b.i32_const(1);
        b.br(0);
        b.end();
        b.end();
        let mut body = b.finish().unwrap();
        assert_eq!(v.validate(&mut body, &[I32]), Ok(()));
        let first = body.to_vec();
        v.reset();
        assert_eq!(v.validate(&mut body, &[I32]), Ok(()));
        assert_eq!(body, first.as_slice());
    }
}
