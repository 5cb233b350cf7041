// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor construction and operators.

use crate::Shape;

/// Errors that can occur during tensor allocation or operator execution.
///
/// Operators validate every operand before their first write, so an `Err`
/// always means the output tensor was left untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TensorError {
    /// A dimension was zero.
    #[error("invalid tensor shape {width}x{height}x{channels}: dimensions must be non-zero")]
    InvalidShape {
        width: usize,
        height: usize,
        channels: usize,
    },

    /// The buffer could not be obtained.
    #[error("failed to allocate {elements} elements: {detail}")]
    AllocationFailure { elements: usize, detail: String },

    /// A required operand has been released.
    #[error("{op}: operand '{operand}' has no data")]
    NullOperand {
        op: &'static str,
        operand: &'static str,
    },

    /// Two tensors have incompatible shapes for the requested operation.
    #[error("incompatible shapes for {op}: expected {expected}, got {actual}")]
    ShapeMismatch {
        op: &'static str,
        expected: Shape,
        actual: Shape,
    },

    /// Element counts disagree where only the total size matters.
    #[error("element count mismatch for {op}: expected {expected}, got {actual}")]
    ElementCountMismatch {
        op: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A scalar configuration value is invalid.
    #[error("invalid parameter for {op}: {detail}")]
    InvalidParameter { op: &'static str, detail: String },
}
