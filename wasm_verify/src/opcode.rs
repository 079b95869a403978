// Copyright 2026 the Wasm Verify Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Opcodes for the implemented WebAssembly instruction set.
//!
//! The set covers the core instructions plus the reference-type, tail-call,
//! SIMD, and atomic-threads extensions. Binary encoding and decoding are the
//! decoder's business; this enum identifies already-decoded instructions, so
//! variants carry no payload and immediates live on
//! [`crate::instr::Instruction`].

use core::fmt;

macro_rules! opcodes {
    ($($name:ident => $mnemonic:literal,)*) => {
        /// An instruction opcode.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum Opcode {
            $(
                #[doc = concat!("`", $mnemonic, "`")]
                $name,
            )*
        }

        impl Opcode {
            /// Stable, parseable instruction name.
            ///
            /// This is the text-format mnemonic and is used by error
            /// rendering.
            #[must_use]
            pub const fn mnemonic(self) -> &'static str {
                match self {
                    $(Self::$name => $mnemonic,)*
                }
            }
        }
    };
}

opcodes! {
    // Control.
    Unreachable => "unreachable",
    Nop => "nop",
    Block => "block",
    Loop => "loop",
    If => "if",
    Else => "else",
    End => "end",
    Br => "br",
    BrIf => "br_if",
    BrTable => "br_table",
    BrOnNull => "br_on_null",
    BrOnNonNull => "br_on_non_null",
    Return => "return",
    Call => "call",
    CallIndirect => "call_indirect",
    ReturnCall => "return_call",
    ReturnCallIndirect => "return_call_indirect",
    CallRef => "call_ref",
    ReturnCallRef => "return_call_ref",

    // Reference.
    RefNull => "ref.null",
    RefIsNull => "ref.is_null",
    RefFunc => "ref.func",
    RefAsNonNull => "ref.as_non_null",

    // Parametric.
    Drop => "drop",
    Select => "select",
    SelectT => "select",

    // Variable.
    LocalGet => "local.get",
    LocalSet => "local.set",
    LocalTee => "local.tee",
    GlobalGet => "global.get",
    GlobalSet => "global.set",

    // Table.
    TableGet => "table.get",
    TableSet => "table.set",
    TableInit => "table.init",
    ElemDrop => "elem.drop",
    TableCopy => "table.copy",
    TableGrow => "table.grow",
    TableSize => "table.size",
    TableFill => "table.fill",

    // Memory.
    I32Load => "i32.load",
    I64Load => "i64.load",
    F32Load => "f32.load",
    F64Load => "f64.load",
    I32Load8S => "i32.load8_s",
    I32Load8U => "i32.load8_u",
    I32Load16S => "i32.load16_s",
    I32Load16U => "i32.load16_u",
    I64Load8S => "i64.load8_s",
    I64Load8U => "i64.load8_u",
    I64Load16S => "i64.load16_s",
    I64Load16U => "i64.load16_u",
    I64Load32S => "i64.load32_s",
    I64Load32U => "i64.load32_u",
    I32Store => "i32.store",
    I64Store => "i64.store",
    F32Store => "f32.store",
    F64Store => "f64.store",
    I32Store8 => "i32.store8",
    I32Store16 => "i32.store16",
    I64Store8 => "i64.store8",
    I64Store16 => "i64.store16",
    I64Store32 => "i64.store32",
    MemorySize => "memory.size",
    MemoryGrow => "memory.grow",
    MemoryInit => "memory.init",
    DataDrop => "data.drop",
    MemoryCopy => "memory.copy",
    MemoryFill => "memory.fill",

    // Numeric constants.
    I32Const => "i32.const",
    I64Const => "i64.const",
    F32Const => "f32.const",
    F64Const => "f64.const",

    // i32 comparisons.
    I32Eqz => "i32.eqz",
    I32Eq => "i32.eq",
    I32Ne => "i32.ne",
    I32LtS => "i32.lt_s",
    I32LtU => "i32.lt_u",
    I32GtS => "i32.gt_s",
    I32GtU => "i32.gt_u",
    I32LeS => "i32.le_s",
    I32LeU => "i32.le_u",
    I32GeS => "i32.ge_s",
    I32GeU => "i32.ge_u",

    // i64 comparisons.
    I64Eqz => "i64.eqz",
    I64Eq => "i64.eq",
    I64Ne => "i64.ne",
    I64LtS => "i64.lt_s",
    I64LtU => "i64.lt_u",
    I64GtS => "i64.gt_s",
    I64GtU => "i64.gt_u",
    I64LeS => "i64.le_s",
    I64LeU => "i64.le_u",
    I64GeS => "i64.ge_s",
    I64GeU => "i64.ge_u",

    // f32 comparisons.
    F32Eq => "f32.eq",
    F32Ne => "f32.ne",
    F32Lt => "f32.lt",
    F32Gt => "f32.gt",
    F32Le => "f32.le",
    F32Ge => "f32.ge",

    // f64 comparisons.
    F64Eq => "f64.eq",
    F64Ne => "f64.ne",
    F64Lt => "f64.lt",
    F64Gt => "f64.gt",
    F64Le => "f64.le",
    F64Ge => "f64.ge",

    // i32 arithmetic.
    I32Clz => "i32.clz",
    I32Ctz => "i32.ctz",
    I32Popcnt => "i32.popcnt",
    I32Add => "i32.add",
    I32Sub => "i32.sub",
    I32Mul => "i32.mul",
    I32DivS => "i32.div_s",
    I32DivU => "i32.div_u",
    I32RemS => "i32.rem_s",
    I32RemU => "i32.rem_u",
    I32And => "i32.and",
    I32Or => "i32.or",
    I32Xor => "i32.xor",
    I32Shl => "i32.shl",
    I32ShrS => "i32.shr_s",
    I32ShrU => "i32.shr_u",
    I32Rotl => "i32.rotl",
    I32Rotr => "i32.rotr",

    // i64 arithmetic.
    I64Clz => "i64.clz",
    I64Ctz => "i64.ctz",
    I64Popcnt => "i64.popcnt",
    I64Add => "i64.add",
    I64Sub => "i64.sub",
    I64Mul => "i64.mul",
    I64DivS => "i64.div_s",
    I64DivU => "i64.div_u",
    I64RemS => "i64.rem_s",
    I64RemU => "i64.rem_u",
    I64And => "i64.and",
    I64Or => "i64.or",
    I64Xor => "i64.xor",
    I64Shl => "i64.shl",
    I64ShrS => "i64.shr_s",
    I64ShrU => "i64.shr_u",
    I64Rotl => "i64.rotl",
    I64Rotr => "i64.rotr",

    // f32 arithmetic.
    F32Abs => "f32.abs",
    F32Neg => "f32.neg",
    F32Ceil => "f32.ceil",
    F32Floor => "f32.floor",
    F32Trunc => "f32.trunc",
    F32Nearest => "f32.nearest",
    F32Sqrt => "f32.sqrt",
    F32Add => "f32.add",
    F32Sub => "f32.sub",
    F32Mul => "f32.mul",
    F32Div => "f32.div",
    F32Min => "f32.min",
    F32Max => "f32.max",
    F32Copysign => "f32.copysign",

    // f64 arithmetic.
    F64Abs => "f64.abs",
    F64Neg => "f64.neg",
    F64Ceil => "f64.ceil",
    F64Floor => "f64.floor",
    F64Trunc => "f64.trunc",
    F64Nearest => "f64.nearest",
    F64Sqrt => "f64.sqrt",
    F64Add => "f64.add",
    F64Sub => "f64.sub",
    F64Mul => "f64.mul",
    F64Div => "f64.div",
    F64Min => "f64.min",
    F64Max => "f64.max",
    F64Copysign => "f64.copysign",

    // Conversions.
    I32WrapI64 => "i32.wrap_i64",
    I32TruncF32S => "i32.trunc_f32_s",
    I32TruncF32U => "i32.trunc_f32_u",
    I32TruncF64S => "i32.trunc_f64_s",
    I32TruncF64U => "i32.trunc_f64_u",
    I64ExtendI32S => "i64.extend_i32_s",
    I64ExtendI32U => "i64.extend_i32_u",
    I64TruncF32S => "i64.trunc_f32_s",
    I64TruncF32U => "i64.trunc_f32_u",
    I64TruncF64S => "i64.trunc_f64_s",
    I64TruncF64U => "i64.trunc_f64_u",
    F32ConvertI32S => "f32.convert_i32_s",
    F32ConvertI32U => "f32.convert_i32_u",
    F32ConvertI64S => "f32.convert_i64_s",
    F32ConvertI64U => "f32.convert_i64_u",
    F32DemoteF64 => "f32.demote_f64",
    F64ConvertI32S => "f64.convert_i32_s",
    F64ConvertI32U => "f64.convert_i32_u",
    F64ConvertI64S => "f64.convert_i64_s",
    F64ConvertI64U => "f64.convert_i64_u",
    F64PromoteF32 => "f64.promote_f32",
    I32ReinterpretF32 => "i32.reinterpret_f32",
    I64ReinterpretF64 => "i64.reinterpret_f64",
    F32ReinterpretI32 => "f32.reinterpret_i32",
    F64ReinterpretI64 => "f64.reinterpret_i64",
    I32Extend8S => "i32.extend8_s",
    I32Extend16S => "i32.extend16_s",
    I64Extend8S => "i64.extend8_s",
    I64Extend16S => "i64.extend16_s",
    I64Extend32S => "i64.extend32_s",
    I32TruncSatF32S => "i32.trunc_sat_f32_s",
    I32TruncSatF32U => "i32.trunc_sat_f32_u",
    I32TruncSatF64S => "i32.trunc_sat_f64_s",
    I32TruncSatF64U => "i32.trunc_sat_f64_u",
    I64TruncSatF32S => "i64.trunc_sat_f32_s",
    I64TruncSatF32U => "i64.trunc_sat_f32_u",
    I64TruncSatF64S => "i64.trunc_sat_f64_s",
    I64TruncSatF64U => "i64.trunc_sat_f64_u",

    // SIMD memory.
    V128Load => "v128.load",
    V128Load8x8S => "v128.load8x8_s",
    V128Load8x8U => "v128.load8x8_u",
    V128Load16x4S => "v128.load16x4_s",
    V128Load16x4U => "v128.load16x4_u",
    V128Load32x2S => "v128.load32x2_s",
    V128Load32x2U => "v128.load32x2_u",
    V128Load8Splat => "v128.load8_splat",
    V128Load16Splat => "v128.load16_splat",
    V128Load32Splat => "v128.load32_splat",
    V128Load64Splat => "v128.load64_splat",
    V128Load32Zero => "v128.load32_zero",
    V128Load64Zero => "v128.load64_zero",
    V128Store => "v128.store",
    V128Load8Lane => "v128.load8_lane",
    V128Load16Lane => "v128.load16_lane",
    V128Load32Lane => "v128.load32_lane",
    V128Load64Lane => "v128.load64_lane",
    V128Store8Lane => "v128.store8_lane",
    V128Store16Lane => "v128.store16_lane",
    V128Store32Lane => "v128.store32_lane",
    V128Store64Lane => "v128.store64_lane",

    // SIMD constants and shuffles.
    V128Const => "v128.const",
    I8x16Shuffle => "i8x16.shuffle",
    I8x16Swizzle => "i8x16.swizzle",

    // SIMD lane access.
    I8x16ExtractLaneS => "i8x16.extract_lane_s",
    I8x16ExtractLaneU => "i8x16.extract_lane_u",
    I8x16ReplaceLane => "i8x16.replace_lane",
    I16x8ExtractLaneS => "i16x8.extract_lane_s",
    I16x8ExtractLaneU => "i16x8.extract_lane_u",
    I16x8ReplaceLane => "i16x8.replace_lane",
    I32x4ExtractLane => "i32x4.extract_lane",
    I32x4ReplaceLane => "i32x4.replace_lane",
    I64x2ExtractLane => "i64x2.extract_lane",
    I64x2ReplaceLane => "i64x2.replace_lane",
    F32x4ExtractLane => "f32x4.extract_lane",
    F32x4ReplaceLane => "f32x4.replace_lane",
    F64x2ExtractLane => "f64x2.extract_lane",
    F64x2ReplaceLane => "f64x2.replace_lane",

    // SIMD splats.
    I8x16Splat => "i8x16.splat",
    I16x8Splat => "i16x8.splat",
    I32x4Splat => "i32x4.splat",
    I64x2Splat => "i64x2.splat",
    F32x4Splat => "f32x4.splat",
    F64x2Splat => "f64x2.splat",

    // SIMD comparisons.
    I8x16Eq => "i8x16.eq",
    I8x16Ne => "i8x16.ne",
    I8x16LtS => "i8x16.lt_s",
    I8x16LtU => "i8x16.lt_u",
    I8x16GtS => "i8x16.gt_s",
    I8x16GtU => "i8x16.gt_u",
    I8x16LeS => "i8x16.le_s",
    I8x16LeU => "i8x16.le_u",
    I8x16GeS => "i8x16.ge_s",
    I8x16GeU => "i8x16.ge_u",
    I16x8Eq => "i16x8.eq",
    I16x8Ne => "i16x8.ne",
    I16x8LtS => "i16x8.lt_s",
    I16x8LtU => "i16x8.lt_u",
    I16x8GtS => "i16x8.gt_s",
    I16x8GtU => "i16x8.gt_u",
    I16x8LeS => "i16x8.le_s",
    I16x8LeU => "i16x8.le_u",
    I16x8GeS => "i16x8.ge_s",
    I16x8GeU => "i16x8.ge_u",
    I32x4Eq => "i32x4.eq",
    I32x4Ne => "i32x4.ne",
    I32x4LtS => "i32x4.lt_s",
    I32x4LtU => "i32x4.lt_u",
    I32x4GtS => "i32x4.gt_s",
    I32x4GtU => "i32x4.gt_u",
    I32x4LeS => "i32x4.le_s",
    I32x4LeU => "i32x4.le_u",
    I32x4GeS => "i32x4.ge_s",
    I32x4GeU => "i32x4.ge_u",
    I64x2Eq => "i64x2.eq",
    I64x2Ne => "i64x2.ne",
    I64x2LtS => "i64x2.lt_s",
    I64x2GtS => "i64x2.gt_s",
    I64x2LeS => "i64x2.le_s",
    I64x2GeS => "i64x2.ge_s",
    F32x4Eq => "f32x4.eq",
    F32x4Ne => "f32x4.ne",
    F32x4Lt => "f32x4.lt",
    F32x4Gt => "f32x4.gt",
    F32x4Le => "f32x4.le",
    F32x4Ge => "f32x4.ge",
    F64x2Eq => "f64x2.eq",
    F64x2Ne => "f64x2.ne",
    F64x2Lt => "f64x2.lt",
    F64x2Gt => "f64x2.gt",
    F64x2Le => "f64x2.le",
    F64x2Ge => "f64x2.ge",

    // SIMD bitwise.
    V128Not => "v128.not",
    V128And => "v128.and",
    V128Andnot => "v128.andnot",
    V128Or => "v128.or",
    V128Xor => "v128.xor",
    V128Bitselect => "v128.bitselect",
    V128AnyTrue => "v128.any_true",

    // i8x16 lanes.
    I8x16Abs => "i8x16.abs",
    I8x16Neg => "i8x16.neg",
    I8x16Popcnt => "i8x16.popcnt",
    I8x16AllTrue => "i8x16.all_true",
    I8x16Bitmask => "i8x16.bitmask",
    I8x16NarrowI16x8S => "i8x16.narrow_i16x8_s",
    I8x16NarrowI16x8U => "i8x16.narrow_i16x8_u",
    I8x16Shl => "i8x16.shl",
    I8x16ShrS => "i8x16.shr_s",
    I8x16ShrU => "i8x16.shr_u",
    I8x16Add => "i8x16.add",
    I8x16AddSatS => "i8x16.add_sat_s",
    I8x16AddSatU => "i8x16.add_sat_u",
    I8x16Sub => "i8x16.sub",
    I8x16SubSatS => "i8x16.sub_sat_s",
    I8x16SubSatU => "i8x16.sub_sat_u",
    I8x16MinS => "i8x16.min_s",
    I8x16MinU => "i8x16.min_u",
    I8x16MaxS => "i8x16.max_s",
    I8x16MaxU => "i8x16.max_u",
    I8x16AvgrU => "i8x16.avgr_u",

    // i16x8 lanes.
    I16x8Abs => "i16x8.abs",
    I16x8Neg => "i16x8.neg",
    I16x8Q15mulrSatS => "i16x8.q15mulr_sat_s",
    I16x8AllTrue => "i16x8.all_true",
    I16x8Bitmask => "i16x8.bitmask",
    I16x8NarrowI32x4S => "i16x8.narrow_i32x4_s",
    I16x8NarrowI32x4U => "i16x8.narrow_i32x4_u",
    I16x8ExtendLowI8x16S => "i16x8.extend_low_i8x16_s",
    I16x8ExtendHighI8x16S => "i16x8.extend_high_i8x16_s",
    I16x8ExtendLowI8x16U => "i16x8.extend_low_i8x16_u",
    I16x8ExtendHighI8x16U => "i16x8.extend_high_i8x16_u",
    I16x8Shl => "i16x8.shl",
    I16x8ShrS => "i16x8.shr_s",
    I16x8ShrU => "i16x8.shr_u",
    I16x8Add => "i16x8.add",
    I16x8AddSatS => "i16x8.add_sat_s",
    I16x8AddSatU => "i16x8.add_sat_u",
    I16x8Sub => "i16x8.sub",
    I16x8SubSatS => "i16x8.sub_sat_s",
    I16x8SubSatU => "i16x8.sub_sat_u",
    I16x8Mul => "i16x8.mul",
    I16x8MinS => "i16x8.min_s",
    I16x8MinU => "i16x8.min_u",
    I16x8MaxS => "i16x8.max_s",
    I16x8MaxU => "i16x8.max_u",
    I16x8AvgrU => "i16x8.avgr_u",
    I16x8ExtmulLowI8x16S => "i16x8.extmul_low_i8x16_s",
    I16x8ExtmulHighI8x16S => "i16x8.extmul_high_i8x16_s",
    I16x8ExtmulLowI8x16U => "i16x8.extmul_low_i8x16_u",
    I16x8ExtmulHighI8x16U => "i16x8.extmul_high_i8x16_u",
    I16x8ExtaddPairwiseI8x16S => "i16x8.extadd_pairwise_i8x16_s",
    I16x8ExtaddPairwiseI8x16U => "i16x8.extadd_pairwise_i8x16_u",

    // i32x4 lanes.
    I32x4Abs => "i32x4.abs",
    I32x4Neg => "i32x4.neg",
    I32x4AllTrue => "i32x4.all_true",
    I32x4Bitmask => "i32x4.bitmask",
    I32x4ExtendLowI16x8S => "i32x4.extend_low_i16x8_s",
    I32x4ExtendHighI16x8S => "i32x4.extend_high_i16x8_s",
    I32x4ExtendLowI16x8U => "i32x4.extend_low_i16x8_u",
    I32x4ExtendHighI16x8U => "i32x4.extend_high_i16x8_u",
    I32x4Shl => "i32x4.shl",
    I32x4ShrS => "i32x4.shr_s",
    I32x4ShrU => "i32x4.shr_u",
    I32x4Add => "i32x4.add",
    I32x4Sub => "i32x4.sub",
    I32x4Mul => "i32x4.mul",
    I32x4MinS => "i32x4.min_s",
    I32x4MinU => "i32x4.min_u",
    I32x4MaxS => "i32x4.max_s",
    I32x4MaxU => "i32x4.max_u",
    I32x4DotI16x8S => "i32x4.dot_i16x8_s",
    I32x4ExtmulLowI16x8S => "i32x4.extmul_low_i16x8_s",
    I32x4ExtmulHighI16x8S => "i32x4.extmul_high_i16x8_s",
    I32x4ExtmulLowI16x8U => "i32x4.extmul_low_i16x8_u",
    I32x4ExtmulHighI16x8U => "i32x4.extmul_high_i16x8_u",
    I32x4ExtaddPairwiseI16x8S => "i32x4.extadd_pairwise_i16x8_s",
    I32x4ExtaddPairwiseI16x8U => "i32x4.extadd_pairwise_i16x8_u",

    // i64x2 lanes.
    I64x2Abs => "i64x2.abs",
    I64x2Neg => "i64x2.neg",
    I64x2AllTrue => "i64x2.all_true",
    I64x2Bitmask => "i64x2.bitmask",
    I64x2ExtendLowI32x4S => "i64x2.extend_low_i32x4_s",
    I64x2ExtendHighI32x4S => "i64x2.extend_high_i32x4_s",
    I64x2ExtendLowI32x4U => "i64x2.extend_low_i32x4_u",
    I64x2ExtendHighI32x4U => "i64x2.extend_high_i32x4_u",
    I64x2Shl => "i64x2.shl",
    I64x2ShrS => "i64x2.shr_s",
    I64x2ShrU => "i64x2.shr_u",
    I64x2Add => "i64x2.add",
    I64x2Sub => "i64x2.sub",
    I64x2Mul => "i64x2.mul",
    I64x2ExtmulLowI32x4S => "i64x2.extmul_low_i32x4_s",
    I64x2ExtmulHighI32x4S => "i64x2.extmul_high_i32x4_s",
    I64x2ExtmulLowI32x4U => "i64x2.extmul_low_i32x4_u",
    I64x2ExtmulHighI32x4U => "i64x2.extmul_high_i32x4_u",

    // f32x4 lanes.
    F32x4Abs => "f32x4.abs",
    F32x4Neg => "f32x4.neg",
    F32x4Sqrt => "f32x4.sqrt",
    F32x4Ceil => "f32x4.ceil",
    F32x4Floor => "f32x4.floor",
    F32x4Trunc => "f32x4.trunc",
    F32x4Nearest => "f32x4.nearest",
    F32x4Add => "f32x4.add",
    F32x4Sub => "f32x4.sub",
    F32x4Mul => "f32x4.mul",
    F32x4Div => "f32x4.div",
    F32x4Min => "f32x4.min",
    F32x4Max => "f32x4.max",
    F32x4Pmin => "f32x4.pmin",
    F32x4Pmax => "f32x4.pmax",

    // f64x2 lanes.
    F64x2Abs => "f64x2.abs",
    F64x2Neg => "f64x2.neg",
    F64x2Sqrt => "f64x2.sqrt",
    F64x2Ceil => "f64x2.ceil",
    F64x2Floor => "f64x2.floor",
    F64x2Trunc => "f64x2.trunc",
    F64x2Nearest => "f64x2.nearest",
    F64x2Add => "f64x2.add",
    F64x2Sub => "f64x2.sub",
    F64x2Mul => "f64x2.mul",
    F64x2Div => "f64x2.div",
    F64x2Min => "f64x2.min",
    F64x2Max => "f64x2.max",
    F64x2Pmin => "f64x2.pmin",
    F64x2Pmax => "f64x2.pmax",

    // SIMD conversions.
    I32x4TruncSatF32x4S => "i32x4.trunc_sat_f32x4_s",
    I32x4TruncSatF32x4U => "i32x4.trunc_sat_f32x4_u",
    F32x4ConvertI32x4S => "f32x4.convert_i32x4_s",
    F32x4ConvertI32x4U => "f32x4.convert_i32x4_u",
    I32x4TruncSatF64x2SZero => "i32x4.trunc_sat_f64x2_s_zero",
    I32x4TruncSatF64x2UZero => "i32x4.trunc_sat_f64x2_u_zero",
    F64x2ConvertLowI32x4S => "f64x2.convert_low_i32x4_s",
    F64x2ConvertLowI32x4U => "f64x2.convert_low_i32x4_u",
    F32x4DemoteF64x2Zero => "f32x4.demote_f64x2_zero",
    F64x2PromoteLowF32x4 => "f64x2.promote_low_f32x4",

    // Atomics.
    AtomicFence => "atomic.fence",
    MemoryAtomicNotify => "memory.atomic.notify",
    MemoryAtomicWait32 => "memory.atomic.wait32",
    MemoryAtomicWait64 => "memory.atomic.wait64",
    I32AtomicLoad => "i32.atomic.load",
    I64AtomicLoad => "i64.atomic.load",
    I32AtomicLoad8U => "i32.atomic.load8_u",
    I32AtomicLoad16U => "i32.atomic.load16_u",
    I64AtomicLoad8U => "i64.atomic.load8_u",
    I64AtomicLoad16U => "i64.atomic.load16_u",
    I64AtomicLoad32U => "i64.atomic.load32_u",
    I32AtomicStore => "i32.atomic.store",
    I64AtomicStore => "i64.atomic.store",
    I32AtomicStore8 => "i32.atomic.store8",
    I32AtomicStore16 => "i32.atomic.store16",
    I64AtomicStore8 => "i64.atomic.store8",
    I64AtomicStore16 => "i64.atomic.store16",
    I64AtomicStore32 => "i64.atomic.store32",
    I32AtomicRmwAdd => "i32.atomic.rmw.add",
    I64AtomicRmwAdd => "i64.atomic.rmw.add",
    I32AtomicRmw8AddU => "i32.atomic.rmw8.add_u",
    I32AtomicRmw16AddU => "i32.atomic.rmw16.add_u",
    I64AtomicRmw8AddU => "i64.atomic.rmw8.add_u",
    I64AtomicRmw16AddU => "i64.atomic.rmw16.add_u",
    I64AtomicRmw32AddU => "i64.atomic.rmw32.add_u",
    I32AtomicRmwSub => "i32.atomic.rmw.sub",
    I64AtomicRmwSub => "i64.atomic.rmw.sub",
    I32AtomicRmw8SubU => "i32.atomic.rmw8.sub_u",
    I32AtomicRmw16SubU => "i32.atomic.rmw16.sub_u",
    I64AtomicRmw8SubU => "i64.atomic.rmw8.sub_u",
    I64AtomicRmw16SubU => "i64.atomic.rmw16.sub_u",
    I64AtomicRmw32SubU => "i64.atomic.rmw32.sub_u",
    I32AtomicRmwAnd => "i32.atomic.rmw.and",
    I64AtomicRmwAnd => "i64.atomic.rmw.and",
    I32AtomicRmw8AndU => "i32.atomic.rmw8.and_u",
    I32AtomicRmw16AndU => "i32.atomic.rmw16.and_u",
    I64AtomicRmw8AndU => "i64.atomic.rmw8.and_u",
    I64AtomicRmw16AndU => "i64.atomic.rmw16.and_u",
    I64AtomicRmw32AndU => "i64.atomic.rmw32.and_u",
    I32AtomicRmwOr => "i32.atomic.rmw.or",
    I64AtomicRmwOr => "i64.atomic.rmw.or",
    I32AtomicRmw8OrU => "i32.atomic.rmw8.or_u",
    I32AtomicRmw16OrU => "i32.atomic.rmw16.or_u",
    I64AtomicRmw8OrU => "i64.atomic.rmw8.or_u",
    I64AtomicRmw16OrU => "i64.atomic.rmw16.or_u",
    I64AtomicRmw32OrU => "i64.atomic.rmw32.or_u",
    I32AtomicRmwXor => "i32.atomic.rmw.xor",
    I64AtomicRmwXor => "i64.atomic.rmw.xor",
    I32AtomicRmw8XorU => "i32.atomic.rmw8.xor_u",
    I32AtomicRmw16XorU => "i32.atomic.rmw16.xor_u",
    I64AtomicRmw8XorU => "i64.atomic.rmw8.xor_u",
    I64AtomicRmw16XorU => "i64.atomic.rmw16.xor_u",
    I64AtomicRmw32XorU => "i64.atomic.rmw32.xor_u",
    I32AtomicRmwXchg => "i32.atomic.rmw.xchg",
    I64AtomicRmwXchg => "i64.atomic.rmw.xchg",
    I32AtomicRmw8XchgU => "i32.atomic.rmw8.xchg_u",
    I32AtomicRmw16XchgU => "i32.atomic.rmw16.xchg_u",
    I64AtomicRmw8XchgU => "i64.atomic.rmw8.xchg_u",
    I64AtomicRmw16XchgU => "i64.atomic.rmw16.xchg_u",
    I64AtomicRmw32XchgU => "i64.atomic.rmw32.xchg_u",
    I32AtomicRmwCmpxchg => "i32.atomic.rmw.cmpxchg",
    I64AtomicRmwCmpxchg => "i64.atomic.rmw.cmpxchg",
    I32AtomicRmw8CmpxchgU => "i32.atomic.rmw8.cmpxchg_u",
    I32AtomicRmw16CmpxchgU => "i32.atomic.rmw16.cmpxchg_u",
    I64AtomicRmw8CmpxchgU => "i64.atomic.rmw8.cmpxchg_u",
    I64AtomicRmw16CmpxchgU => "i64.atomic.rmw16.cmpxchg_u",
    I64AtomicRmw32CmpxchgU => "i64.atomic.rmw32.cmpxchg_u",
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::Opcode;

    #[test]
    fn mnemonics_are_stable() {
        assert_eq!(Opcode::Unreachable.mnemonic(), "unreachable");
        assert_eq!(Opcode::BrTable.mnemonic(), "br_table");
        assert_eq!(Opcode::I32Load8S.mnemonic(), "i32.load8_s");
        assert_eq!(Opcode::RefAsNonNull.mnemonic(), "ref.as_non_null");
        assert_eq!(Opcode::I8x16Shuffle.mnemonic(), "i8x16.shuffle");
        assert_eq!(
            Opcode::I64AtomicRmw32CmpxchgU.mnemonic(),
            "i64.atomic.rmw32.cmpxchg_u"
        );
    }
}
