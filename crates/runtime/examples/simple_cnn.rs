// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Runs one forward pass of a small CNN on random 16x16x1 input.
//!
//! ```text
//! Input(16x16x1) -> Conv1(16x16x4) -> Pool1(8x8x4) -> Conv2(8x8x8)
//!     -> Pool2(4x4x8) -> Flatten(128) -> FC(10)
//! ```
//!
//! Run with `RUST_LOG=debug` to see per-layer timing, and set
//! `SIMPLE_CNN_TRACE=1` to also log every layer's output.

use model_ir::GraphBuilder;
use runtime::{InferenceEngine, RuntimeConfig, RuntimeError};
use tensor_core::{Shape, Tensor};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), RuntimeError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let graph = GraphBuilder::new("simple-cnn", Shape::new(16, 16, 1))
        .conv2d("conv1", 4, 3)
        .relu("relu1")
        .maxpool2d("pool1", 2)
        .conv2d("conv2", 8, 3)
        .relu("relu2")
        .maxpool2d("pool2", 2)
        .flatten("flatten")
        .linear("fc", 10)
        .build()?;

    let config = RuntimeConfig {
        trace_activations: std::env::var_os("SIMPLE_CNN_TRACE").is_some(),
        ..RuntimeConfig::default()
    };
    let mut engine = InferenceEngine::from_graph(config, graph).prepare()?;

    let input = Tensor::new(16, 16, 1, true)?;
    println!("Input Tensor:\n{input}");

    println!("Running simple CNN...");
    let out = engine.run(&input)?;

    println!("Output Tensor:\n{}", out.output);
    println!(
        "Max value in output: {:.4} at index {}",
        out.prediction.value, out.prediction.index
    );
    println!("{}", out.metrics.summary());

    engine.release();
    Ok(())
}
