// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! 2-D convolution with "same" zero padding.

use super::{reject, require_data};
use crate::{Shape, Tensor, TensorError, TensorView};

/// Convolves `input` with a square kernel: `output = input * weights + bias`.
///
/// `weights` is `k x k x output.channels` with `k = weights.height`; the
/// kernel for output channel `c` is applied to every input channel and the
/// products are summed. Padding is `k / 2` on every side (integer division,
/// so even kernels pad asymmetrically). Positions outside the input read as
/// zero through the clamped accessor.
///
/// `bias`, when present, holds one value per output channel.
///
/// The output's spatial size is the caller's choice; with matching width and
/// height this is classic "same" convolution.
///
/// # Errors
/// - [`TensorError::NullOperand`] if any operand has been released.
/// - [`TensorError::ShapeMismatch`] if the kernel is not square or its
///   channel count differs from `output.channels`.
/// - [`TensorError::ElementCountMismatch`] if the bias length differs from
///   `output.channels`.
pub fn conv2d(
    input: &TensorView<'_>,
    weights: &TensorView<'_>,
    bias: Option<&TensorView<'_>>,
    output: &mut Tensor,
) -> Result<(), TensorError> {
    require_data("conv2d", "input", input.num_elements())?;
    require_data("conv2d", "weights", weights.num_elements())?;
    require_data("conv2d", "output", output.num_elements())?;

    let out_shape = *output.shape();
    let k = weights.shape().height;
    let expected_weights = Shape::new(k, k, out_shape.channels);
    if weights.shape() != &expected_weights {
        return reject(TensorError::ShapeMismatch {
            op: "conv2d (weights)",
            expected: expected_weights,
            actual: *weights.shape(),
        });
    }

    let bias = match bias {
        Some(b) => {
            require_data("conv2d", "bias", b.num_elements())?;
            if b.num_elements() != out_shape.channels {
                return reject(TensorError::ElementCountMismatch {
                    op: "conv2d (bias)",
                    expected: out_shape.channels,
                    actual: b.num_elements(),
                });
            }
            Some(b.as_slice())
        }
        None => None,
    };

    let pad = k / 2;
    let in_channels = input.shape().channels;

    for out_c in 0..out_shape.channels {
        let b = bias.map_or(0.0, |b| b[out_c]);
        for out_h in 0..out_shape.height {
            for out_w in 0..out_shape.width {
                let mut sum = 0.0f32;
                for in_c in 0..in_channels {
                    for k_h in 0..k {
                        // Rows above the input are padding.
                        let Some(in_h) = (out_h + k_h).checked_sub(pad) else {
                            continue;
                        };
                        for k_w in 0..k {
                            let Some(in_w) = (out_w + k_w).checked_sub(pad) else {
                                continue;
                            };
                            sum += input.get_clamped(in_w, in_h, in_c)
                                * weights.get_clamped(k_w, k_h, out_c);
                        }
                    }
                }
                output.set_clamped(out_w, out_h, out_c, sum + b);
            }
        }
    }

    Ok(())
}
