// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Arg-max over a whole tensor.

use super::require_data;
use crate::{TensorError, TensorView};

/// The maximum element of a tensor and its flat (buffer-order) index.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ArgMax {
    pub value: f32,
    pub index: usize,
}

/// Finds the largest element by a linear scan in buffer order.
///
/// Ties go to the earliest index.
///
/// # Errors
/// Returns [`TensorError::NullOperand`] if `input` has been released.
///
/// # Examples
/// ```
/// use tensor_core::{argmax, Shape, Tensor};
/// let t = Tensor::from_f32(Shape::vector(4), &[0.1, -0.5, 0.9, 0.9]).unwrap();
/// let m = argmax(&t.view()).unwrap();
/// assert_eq!((m.value, m.index), (0.9, 2));
/// ```
pub fn argmax(input: &TensorView<'_>) -> Result<ArgMax, TensorError> {
    require_data("argmax", "input", input.num_elements())?;

    let data = input.as_slice();
    let mut best = ArgMax {
        value: data[0],
        index: 0,
    };
    for (i, &x) in data.iter().enumerate().skip(1) {
        if x > best.value {
            best = ArgMax { value: x, index: i };
        }
    }
    Ok(best)
}
