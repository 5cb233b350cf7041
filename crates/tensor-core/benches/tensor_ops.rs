// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for tensor operations.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tensor_core::{conv2d, linear, maxpool2d, Shape, Tensor};

fn bench_conv2d(c: &mut Criterion) {
    let input = Tensor::new(16, 16, 1, true).unwrap();
    let weights = Tensor::new(3, 3, 4, true).unwrap();
    let bias = Tensor::new(4, 1, 1, true).unwrap();
    let mut output = Tensor::zeros(Shape::new(16, 16, 4)).unwrap();

    c.bench_function("conv2d 16x16x1 -> 16x16x4 (k=3)", |b| {
        b.iter(|| {
            conv2d(
                black_box(&input.view()),
                &weights.view(),
                Some(&bias.view()),
                &mut output,
            )
            .unwrap()
        })
    });
}

fn bench_maxpool2d(c: &mut Criterion) {
    let input = Tensor::new(16, 16, 4, true).unwrap();
    let mut output = Tensor::zeros(Shape::new(8, 8, 4)).unwrap();

    c.bench_function("maxpool2d 16x16x4 (p=2)", |b| {
        b.iter(|| maxpool2d(black_box(&input.view()), 2, &mut output).unwrap())
    });
}

fn bench_linear(c: &mut Criterion) {
    let input = Tensor::new(128, 1, 1, true).unwrap();
    let weights = Tensor::new(128, 10, 1, true).unwrap();
    let bias = Tensor::new(10, 1, 1, true).unwrap();
    let mut output = Tensor::zeros(Shape::vector(10)).unwrap();

    c.bench_function("linear 128 -> 10", |b| {
        b.iter(|| {
            linear(
                black_box(&input.view()),
                &weights.view(),
                Some(&bias.view()),
                &mut output,
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_conv2d, bench_maxpool2d, bench_linear);
criterion_main!(benches);
