// Copyright 2026 the Wasm Verify Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value types for the WebAssembly abstract stack machine.
//!
//! These are plain data: the verifier compares them structurally and the
//! module context ([`crate::module::ModuleContext`]) resolves concrete heap
//! type indices against the function-type table.

use alloc::vec::Vec;
use core::fmt;

/// A heap type: the pointee classification of a reference type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HeapType {
    /// Any function reference (`funcref`).
    Func,
    /// An opaque host reference (`externref`).
    Extern,
    /// A concrete function type, by index into the module's type table.
    Index(u32),
}

/// A reference type: nullability plus a heap type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RefType {
    /// Whether `null` inhabits this type.
    pub nullable: bool,
    /// The pointee classification.
    pub heap: HeapType,
}

impl RefType {
    /// A nullable reference to `heap`.
    #[must_use]
    pub const fn nullable(heap: HeapType) -> Self {
        Self {
            nullable: true,
            heap,
        }
    }

    /// A non-nullable reference to `heap`.
    #[must_use]
    pub const fn non_null(heap: HeapType) -> Self {
        Self {
            nullable: false,
            heap,
        }
    }

    /// The same heap type with nullability stripped.
    #[must_use]
    pub const fn as_non_null(self) -> Self {
        Self {
            nullable: false,
            heap: self.heap,
        }
    }

    /// The same heap type as a nullable reference.
    #[must_use]
    pub const fn as_nullable(self) -> Self {
        Self {
            nullable: true,
            heap: self.heap,
        }
    }
}

/// A WebAssembly value type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValType {
    /// 32-bit integer.
    I32,
    /// 64-bit integer.
    I64,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
    /// 128-bit vector.
    V128,
    /// Reference.
    Ref(RefType),
}

impl ValType {
    /// The plain `funcref` type (nullable reference to any function).
    pub const FUNC_REF: Self = Self::Ref(RefType::nullable(HeapType::Func));
    /// The plain `externref` type.
    pub const EXTERN_REF: Self = Self::Ref(RefType::nullable(HeapType::Extern));

    /// Returns `true` for reference types.
    #[must_use]
    pub const fn is_ref(self) -> bool {
        matches!(self, Self::Ref(_))
    }

    /// Returns `true` for numeric and vector types.
    #[must_use]
    pub const fn is_num(self) -> bool {
        !self.is_ref()
    }

    /// Returns `true` if the type has a zero value.
    ///
    /// Numeric and vector types default to zero; references default to
    /// `null`, so only nullable references are defaultable.
    #[must_use]
    pub const fn is_defaultable(self) -> bool {
        match self {
            Self::Ref(r) => r.nullable,
            _ => true,
        }
    }

    /// Returns the reference payload, if this is a reference type.
    #[must_use]
    pub const fn as_ref_type(self) -> Option<RefType> {
        match self {
            Self::Ref(r) => Some(r),
            _ => None,
        }
    }

    /// Returns `true` for function references, abstract or concrete.
    #[must_use]
    pub const fn is_func_ref(self) -> bool {
        matches!(
            self,
            Self::Ref(RefType {
                heap: HeapType::Func | HeapType::Index(_),
                ..
            })
        )
    }
}

impl fmt::Display for ValType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I32 => write!(f, "i32"),
            Self::I64 => write!(f, "i64"),
            Self::F32 => write!(f, "f32"),
            Self::F64 => write!(f, "f64"),
            Self::V128 => write!(f, "v128"),
            Self::Ref(r) => {
                let null = if r.nullable { "null " } else { "" };
                match r.heap {
                    HeapType::Func => write!(f, "(ref {null}func)"),
                    HeapType::Extern => write!(f, "(ref {null}extern)"),
                    HeapType::Index(i) => write!(f, "(ref {null}{i})"),
                }
            }
        }
    }
}

/// A function type: ordered parameter and result sequences.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FuncType {
    /// Parameter types, in order.
    pub params: Vec<ValType>,
    /// Result types, in order.
    pub results: Vec<ValType>,
}

impl FuncType {
    /// Builds a function type from parameter and result slices.
    #[must_use]
    pub fn new(params: &[ValType], results: &[ValType]) -> Self {
        Self {
            params: params.to_vec(),
            results: results.to_vec(),
        }
    }
}

/// Mutability of a global.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mutability {
    /// Immutable.
    Const,
    /// Mutable.
    Var,
}

/// A global's type and mutability.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GlobalType {
    /// The value type of the global.
    pub val_type: ValType,
    /// Whether `global.set` is permitted.
    pub mutability: Mutability,
}

/// A symbolic operand-stack entry.
///
/// `Unknown` is the polymorphic bottom: it is produced by popping at the
/// floor of an unreachable frame and matches any expected type. It is
/// deliberately not a [`ValType`], so it cannot leak into signatures.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StackType {
    /// A known value type.
    Val(ValType),
    /// The polymorphic bottom under an unreachable frame.
    Unknown,
}

impl StackType {
    /// Returns `true` for reference types; `Unknown` counts as one.
    #[must_use]
    pub const fn is_ref(self) -> bool {
        match self {
            Self::Val(v) => v.is_ref(),
            Self::Unknown => true,
        }
    }

    /// Returns `true` for numeric and vector types; `Unknown` counts as one.
    #[must_use]
    pub const fn is_num(self) -> bool {
        match self {
            Self::Val(v) => v.is_num(),
            Self::Unknown => true,
        }
    }

    /// Returns the concrete type, if known.
    #[must_use]
    pub const fn known(self) -> Option<ValType> {
        match self {
            Self::Val(v) => Some(v),
            Self::Unknown => None,
        }
    }
}

impl From<ValType> for StackType {
    fn from(v: ValType) -> Self {
        Self::Val(v)
    }
}
