// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Non-overlapping 2-D max pooling.

use super::{reject, require_data};
use crate::{Shape, Tensor, TensorError, TensorView};

/// Returns the ceil-consistent pooled shape: each spatial side becomes
/// `ceil(side / pool_size)`, channels are unchanged.
///
/// # Examples
/// ```
/// use tensor_core::{pool_output_shape, Shape};
/// let s = pool_output_shape(&Shape::new(5, 4, 3), 2).unwrap();
/// assert_eq!(s, Shape::new(3, 2, 3));
/// ```
pub fn pool_output_shape(input: &Shape, pool_size: usize) -> Result<Shape, TensorError> {
    if pool_size == 0 {
        return Err(TensorError::InvalidParameter {
            op: "maxpool2d",
            detail: "pool size must be non-zero".into(),
        });
    }
    Ok(Shape::new(
        input.width.div_ceil(pool_size),
        input.height.div_ceil(pool_size),
        input.channels,
    ))
}

/// Max-pools `input` with square `pool_size x pool_size` windows, stride
/// `pool_size`.
///
/// Output cell `(w, h, c)` is the maximum of input cells
/// `(w*pool_size + kw, h*pool_size + kh, c)` that lie inside the input;
/// windows on the right/bottom edge are clipped and use fewer samples.
///
/// The caller sizes `output`. Its width and height may be anything up to
/// [`pool_output_shape`]; a window that would start past the input edge is
/// rejected.
///
/// # Errors
/// - [`TensorError::InvalidParameter`] if `pool_size` is zero.
/// - [`TensorError::ShapeMismatch`] if channel counts differ or the output
///   is larger than the ceil-consistent shape.
/// - [`TensorError::NullOperand`] if either tensor has been released.
pub fn maxpool2d(
    input: &TensorView<'_>,
    pool_size: usize,
    output: &mut Tensor,
) -> Result<(), TensorError> {
    require_data("maxpool2d", "input", input.num_elements())?;
    require_data("maxpool2d", "output", output.num_elements())?;

    let limit = match pool_output_shape(input.shape(), pool_size) {
        Ok(shape) => shape,
        Err(e) => return reject(e),
    };
    let out_shape = *output.shape();
    if out_shape.channels != limit.channels
        || out_shape.width > limit.width
        || out_shape.height > limit.height
    {
        return reject(TensorError::ShapeMismatch {
            op: "maxpool2d",
            expected: limit,
            actual: out_shape,
        });
    }

    let in_shape = *input.shape();
    for c in 0..out_shape.channels {
        for out_h in 0..out_shape.height {
            for out_w in 0..out_shape.width {
                let mut max_val = f32::MIN;
                for pool_h in 0..pool_size {
                    let in_h = out_h * pool_size + pool_h;
                    if in_h >= in_shape.height {
                        break;
                    }
                    for pool_w in 0..pool_size {
                        let in_w = out_w * pool_size + pool_w;
                        if in_w >= in_shape.width {
                            break;
                        }
                        let val = input.get_clamped(in_w, in_h, c);
                        if val > max_val {
                            max_val = val;
                        }
                    }
                }
                output.set_clamped(out_w, out_h, c, max_val);
            }
        }
    }

    Ok(())
}
