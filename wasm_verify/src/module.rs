// Copyright 2026 the Wasm Verify Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Module-level context for body validation.
//!
//! A [`ModuleContext`] accumulates the declarations visible to the function
//! bodies being checked: function types, function signatures, table element
//! types, memory and data-segment counts, globals, element segments, and the
//! declared function-reference set. It is populated once per module, persists
//! across body validations, and is only read while a body is being checked.
//!
//! Structural type matching lives here because matching two concrete heap
//! type indices recurses into the function-type table.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::types::{FuncType, GlobalType, HeapType, ValType};
use crate::verifier::ErrorKind;

/// Declarations visible to the function body being checked.
#[derive(Clone, Debug, Default)]
pub struct ModuleContext {
    /// Function types, by type index.
    pub types: Vec<FuncType>,
    /// Type index per function, by function index.
    pub funcs: Vec<u32>,
    /// Element reference type per table, by table index.
    pub tables: Vec<ValType>,
    /// Number of memories.
    pub mems: u32,
    /// Globals, by global index.
    pub globals: Vec<GlobalType>,
    /// Number of data segments.
    pub datas: u32,
    /// Element-segment reference types, by segment index.
    pub elems: Vec<ValType>,
    /// Function indices that appeared in a global initializer, element
    /// segment, or export, and may therefore be taken by `ref.func`.
    pub refs: BTreeSet<u32>,
    num_import_funcs: u32,
    num_import_globals: u32,
}

impl ModuleContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a function type.
    pub fn add_type(&mut self, ty: FuncType) {
        self.types.push(ty);
    }

    /// Records a function with the given type index.
    ///
    /// An out-of-range type index is ignored: the type-section check has
    /// already failed the module, and recording the function would only let
    /// later bounds checks index past the table.
    pub fn add_func(&mut self, type_idx: u32, is_import: bool) {
        if (type_idx as usize) < self.types.len() {
            self.funcs.push(type_idx);
        }
        if is_import {
            self.num_import_funcs += 1;
        }
    }

    /// Records a table with the given element reference type.
    pub fn add_table(&mut self, elem_type: ValType) {
        self.tables.push(elem_type);
    }

    /// Records a memory.
    pub fn add_memory(&mut self) {
        self.mems += 1;
    }

    /// Records a global.
    pub fn add_global(&mut self, global: GlobalType, is_import: bool) {
        self.globals.push(global);
        if is_import {
            self.num_import_globals += 1;
        }
    }

    /// Records a data segment.
    pub fn add_data(&mut self) {
        self.datas += 1;
    }

    /// Records an element segment with the given reference type.
    pub fn add_elem(&mut self, elem_type: ValType) {
        self.elems.push(elem_type);
    }

    /// Marks a function index as a declared reference.
    pub fn add_ref(&mut self, func_idx: u32) {
        self.refs.insert(func_idx);
    }

    /// Number of imported functions recorded so far.
    #[must_use]
    pub fn num_import_funcs(&self) -> u32 {
        self.num_import_funcs
    }

    /// Number of imported globals recorded so far.
    #[must_use]
    pub fn num_import_globals(&self) -> u32 {
        self.num_import_globals
    }

    /// Bounds-checks a concrete heap type index against the type table.
    ///
    /// Non-reference types and abstract heap types validate trivially.
    pub fn validate_val_type(&self, vt: ValType) -> Result<(), ErrorKind> {
        if let ValType::Ref(r) = vt
            && let HeapType::Index(idx) = r.heap
            && idx as usize >= self.types.len()
        {
            return Err(ErrorKind::InvalidFuncTypeIdx {
                index: idx,
                bound: self.types.len() as u32,
            });
        }
        Ok(())
    }

    /// Structural matching: may a value of type `got` flow where `expected`
    /// is required?
    ///
    /// Numeric and vector types match by code equality. References require
    /// `got` to be non-nullable wherever `expected` is, then match heap
    /// types: equal abstract codes match, `funcref` admits any concrete
    /// index, and two concrete indices match by invariant pointwise equality
    /// of their parameter and result lists. The type section was validated
    /// before bodies, so the recursion terminates.
    #[must_use]
    pub fn match_type(&self, expected: ValType, got: ValType) -> bool {
        match (expected, got) {
            (ValType::Ref(e), ValType::Ref(g)) => {
                if !e.nullable && g.nullable {
                    return false;
                }
                match (e.heap, g.heap) {
                    (HeapType::Func, HeapType::Func) | (HeapType::Extern, HeapType::Extern) => true,
                    // Every concrete function type is a sub-heap-type of funcref.
                    (HeapType::Func, HeapType::Index(_)) => true,
                    (HeapType::Index(ei), HeapType::Index(gi)) => {
                        let (Some(et), Some(gt)) =
                            (self.types.get(ei as usize), self.types.get(gi as usize))
                        else {
                            return false;
                        };
                        self.match_types(&et.params, &gt.params)
                            && self.match_types(&et.results, &gt.results)
                    }
                    _ => false,
                }
            }
            (e, g) => e == g,
        }
    }

    /// Pointwise [`Self::match_type`] over equal-length sequences.
    #[must_use]
    pub fn match_types(&self, expected: &[ValType], got: &[ValType]) -> bool {
        expected.len() == got.len()
            && expected
                .iter()
                .zip(got.iter())
                .all(|(&e, &g)| self.match_type(e, g))
    }
}
