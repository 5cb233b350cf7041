// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the inference runtime.

use tensor_core::{Shape, TensorError};

/// Errors that can occur while preparing or running a pipeline.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The input tensor does not have the pipeline's input shape.
    #[error("input shape mismatch: expected {expected}, got {actual}")]
    InvalidInput { expected: Shape, actual: Shape },

    /// Allocating or initializing a layer's weights failed.
    #[error("weight initialization failed for layer '{layer}': {source}")]
    WeightInitError {
        layer: String,
        #[source]
        source: TensorError,
    },

    /// A tensor operation failed during layer execution.
    #[error("execution error in layer '{layer}': {source}")]
    ExecutionError {
        layer: String,
        #[source]
        source: TensorError,
    },

    /// An activation or input tensor could not be allocated.
    #[error("tensor allocation failed: {0}")]
    Allocation(#[from] TensorError),

    /// Pipeline loading failed.
    #[error("model error: {0}")]
    ModelError(#[from] model_ir::ModelError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}
