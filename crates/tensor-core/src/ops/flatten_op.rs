// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Flatten: a shape-changing copy.

use super::{reject, require_data};
use crate::{Tensor, TensorError, TensorView};

/// Copies `input` into `output` in linear buffer order, without permutation.
///
/// Only the total element counts must agree; the output is typically shaped
/// `N x 1 x 1`.
///
/// # Errors
/// Returns [`TensorError::ElementCountMismatch`] if the element counts differ
/// and [`TensorError::NullOperand`] if either tensor has been released.
pub fn flatten(input: &TensorView<'_>, output: &mut Tensor) -> Result<(), TensorError> {
    require_data("flatten", "input", input.num_elements())?;
    require_data("flatten", "output", output.num_elements())?;

    if input.num_elements() != output.num_elements() {
        return reject(TensorError::ElementCountMismatch {
            op: "flatten",
            expected: input.num_elements(),
            actual: output.num_elements(),
        });
    }

    output.as_mut_slice().copy_from_slice(input.as_slice());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Shape;

    #[test]
    fn test_flatten_preserves_buffer_order() {
        let values: Vec<f32> = (0..12).map(|i| i as f32).collect();
        let input = Tensor::from_f32(Shape::new(3, 2, 2), &values).unwrap();
        let mut output = Tensor::zeros(Shape::vector(12)).unwrap();

        flatten(&input.view(), &mut output).unwrap();
        assert_eq!(output.as_slice(), values.as_slice());

        // Reading the vector back as 3x2x2 gives the original elements.
        let back = output.view_as(*input.shape()).unwrap();
        assert_eq!(back.get_clamped(2, 1, 1), input.get_clamped(2, 1, 1));
    }

    #[test]
    fn test_flatten_size_mismatch() {
        let input = Tensor::zeros(Shape::new(2, 2, 2)).unwrap();
        let mut output = Tensor::from_f32(Shape::vector(4), &[1.0; 4]).unwrap();

        let err = flatten(&input.view(), &mut output).unwrap_err();
        assert_eq!(
            err,
            TensorError::ElementCountMismatch {
                op: "flatten",
                expected: 8,
                actual: 4,
            }
        );
        assert_eq!(output.as_slice(), &[1.0; 4]);
    }

    #[test]
    fn test_flatten_released_output() {
        let input = Tensor::zeros(Shape::vector(4)).unwrap();
        let mut output = Tensor::zeros(Shape::vector(4)).unwrap();
        output.release();
        assert!(matches!(
            flatten(&input.view(), &mut output),
            Err(TensorError::NullOperand { operand: "output", .. })
        ));
    }
}
