// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fully-connected (linear) layer.

use super::{reject, require_data};
use crate::{Tensor, TensorError, TensorView};

/// Computes `output = W · input + bias` with `input` read as a flat vector.
///
/// With `n = input.num_elements()` and `m = output.num_elements()`, `weights`
/// is an `m x n` row-major matrix: row `o` occupies `weights[o*n .. (o+1)*n]`.
/// By convention it is shaped `(width = n, height = m, 1)`, but only the
/// element count is checked, so any tensor of `m * n` elements is accepted.
///
/// # Errors
/// - [`TensorError::NullOperand`] if any operand has been released.
/// - [`TensorError::ElementCountMismatch`] if `weights` does not hold
///   `m * n` elements or `bias` does not hold `m`.
pub fn linear(
    input: &TensorView<'_>,
    weights: &TensorView<'_>,
    bias: Option<&TensorView<'_>>,
    output: &mut Tensor,
) -> Result<(), TensorError> {
    require_data("linear", "input", input.num_elements())?;
    require_data("linear", "weights", weights.num_elements())?;
    require_data("linear", "output", output.num_elements())?;

    let n = input.num_elements();
    let m = output.num_elements();

    if let Err(e) = check_weight_count(m, n, weights.num_elements()) {
        return reject(e);
    }

    let bias = match bias {
        Some(b) => {
            require_data("linear", "bias", b.num_elements())?;
            if b.num_elements() != m {
                return reject(TensorError::ElementCountMismatch {
                    op: "linear (bias)",
                    expected: m,
                    actual: b.num_elements(),
                });
            }
            Some(b.as_slice())
        }
        None => None,
    };

    let x = input.as_slice();
    let w = weights.as_slice();

    for (o, (out, row)) in output
        .as_mut_slice()
        .iter_mut()
        .zip(w.chunks_exact(n))
        .enumerate()
    {
        let dot: f32 = row.iter().zip(x).map(|(&wi, &xi)| wi * xi).sum();
        *out = dot + bias.map_or(0.0, |b| b[o]);
    }

    Ok(())
}

/// Checks that an `m x n` matrix holds `actual` elements. An `m * n` that
/// overflows can never match.
fn check_weight_count(m: usize, n: usize, actual: usize) -> Result<(), TensorError> {
    if m.checked_mul(n) == Some(actual) {
        return Ok(());
    }
    Err(TensorError::ElementCountMismatch {
        op: "linear (weights)",
        expected: m.saturating_mul(n),
        actual,
    })
}
