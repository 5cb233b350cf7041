// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # runtime
//!
//! The driver that executes a `model-ir` pipeline with `tensor-core`
//! operators.
//!
//! The runtime takes a validated `ModelGraph`, allocates every weight
//! (Xavier-initialized, optionally seeded) and activation tensor up front,
//! and then runs forward passes layer by layer, reporting the final output,
//! its arg-max and per-layer timing.
//!
//! # Type-State Pipeline
//! ```text
//! InferenceEngine<Idle> → InferenceEngine<Planned> → InferenceEngine<Ready>
//! ```
//! Transitions are compile-time checked.
//!
//! Execution is single-threaded and synchronous.

mod config;
mod engine;
mod error;
mod metrics;
mod weights;

pub use config::RuntimeConfig;
pub use engine::{EngineState, Idle, InferenceEngine, InferenceOutput, Planned, Ready};
pub use error::RuntimeError;
pub use metrics::{InferenceMetrics, LayerMetrics};
pub use weights::{LayerWeights, WeightInitializer};
