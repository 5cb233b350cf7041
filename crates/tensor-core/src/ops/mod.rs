// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Forward-pass operators.
//!
//! Each operation reads immutable [`TensorView`](crate::TensorView) inputs and
//! writes into a caller-allocated output [`Tensor`](crate::Tensor); no
//! operator allocates. Operands are validated before the first write, so a
//! rejected call leaves the output untouched. Rejections are logged at `warn`.

mod argmax_op;
mod conv2d_op;
mod flatten_op;
mod linear_op;
mod maxpool_op;
mod relu_op;

pub use argmax_op::{argmax, ArgMax};
pub use conv2d_op::conv2d;
pub use flatten_op::flatten;
pub use linear_op::linear;
pub use maxpool_op::{maxpool2d, pool_output_shape};
pub use relu_op::{relu, relu_inplace};

use crate::TensorError;

/// Logs a rejected call and returns the error.
pub(crate) fn reject<T>(err: TensorError) -> Result<T, TensorError> {
    tracing::warn!("{err}");
    Err(err)
}

/// Fails with [`TensorError::NullOperand`] when the operand has been released.
pub(crate) fn require_data(
    op: &'static str,
    operand: &'static str,
    num_elements: usize,
) -> Result<(), TensorError> {
    if num_elements == 0 {
        return reject(TensorError::NullOperand { op, operand });
    }
    Ok(())
}
