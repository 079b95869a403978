// Copyright 2026 the Wasm Verify Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use wasm_verify::asm::BodyBuilder;
use wasm_verify::instr::{BlockType, Instruction};
use wasm_verify::opcode::Opcode;
use wasm_verify::types::{FuncType, ValType};
use wasm_verify::verifier::BodyVerifier;

fn bench_verify(c: &mut Criterion) {
    bench_add_chain(c);
    bench_nested_blocks(c);
    bench_branch_fan(c);
}

fn build_add_chain(len: u32) -> Vec<Instruction> {
    let mut b = BodyBuilder::new();
    b.i32_const(0);
    for i in 0..len {
        b.i32_const(i as i32);
        b.op(Opcode::I32Add);
    }
    b.end();
    b.finish().unwrap()
}

fn build_nested_blocks(depth: u32) -> Vec<Instruction> {
    let mut b = BodyBuilder::new();
    for _ in 0..depth {
        b.block(BlockType::Empty);
    }
    for _ in 0..depth {
        b.end();
    }
    b.end();
    b.finish().unwrap()
}

fn build_branch_fan(depth: u32) -> Vec<Instruction> {
    let mut b = BodyBuilder::new();
    for _ in 0..depth {
        b.block(BlockType::Empty);
    }
    b.i32_const(0);
    let labels: Vec<u32> = (0..depth).collect();
    b.br_table(&labels, 0);
    for _ in 0..depth {
        b.end();
    }
    b.end();
    b.finish().unwrap()
}

fn bench_add_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_chain");
    for &len in &[10_u32, 100, 1000] {
        let body = build_add_chain(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &body, |bench, body| {
            let mut v = BodyVerifier::new();
            bench.iter(|| {
                let mut scratch = body.clone();
                v.reset();
                v.validate(black_box(&mut scratch), &[ValType::I32]).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_nested_blocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_blocks");
    for &depth in &[8_u32, 64, 256] {
        let body = build_nested_blocks(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &body, |bench, body| {
            let mut v = BodyVerifier::new();
            bench.iter(|| {
                let mut scratch = body.clone();
                v.reset();
                v.validate(black_box(&mut scratch), &[]).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_branch_fan(c: &mut Criterion) {
    let mut group = c.benchmark_group("branch_fan");
    for &depth in &[4_u32, 32, 128] {
        let body = build_branch_fan(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &body, |bench, body| {
            let mut v = BodyVerifier::new();
            v.module.add_type(FuncType::new(&[], &[]));
            bench.iter(|| {
                let mut scratch = body.clone();
                v.reset();
                v.validate(black_box(&mut scratch), &[]).unwrap();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_verify);
criterion_main!(benches);
