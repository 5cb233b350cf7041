// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Rectified linear activation.

use super::{reject, require_data};
use crate::{Tensor, TensorError, TensorView};

/// Computes `output[i] = max(0, input[i])`.
///
/// Both tensors must have identical width, height and channels.
///
/// # Errors
/// Returns [`TensorError::ShapeMismatch`] if the shapes differ and
/// [`TensorError::NullOperand`] if either tensor has been released.
pub fn relu(input: &TensorView<'_>, output: &mut Tensor) -> Result<(), TensorError> {
    require_data("relu", "input", input.num_elements())?;
    require_data("relu", "output", output.num_elements())?;

    if input.shape() != output.shape() {
        return reject(TensorError::ShapeMismatch {
            op: "relu",
            expected: *input.shape(),
            actual: *output.shape(),
        });
    }

    for (d, &s) in output.as_mut_slice().iter_mut().zip(input.as_slice()) {
        *d = s.max(0.0);
    }
    Ok(())
}

/// Applies ReLU to `tensor` in place.
pub fn relu_inplace(tensor: &mut Tensor) -> Result<(), TensorError> {
    require_data("relu", "tensor", tensor.num_elements())?;
    tensor.as_mut_slice().iter_mut().for_each(|x| *x = x.max(0.0));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Shape;

    #[test]
    fn test_relu_clamps_negatives() {
        let input = Tensor::from_f32(Shape::new(2, 2, 1), &[-1.0, 0.0, 2.5, -0.1]).unwrap();
        let mut output = Tensor::zeros(Shape::new(2, 2, 1)).unwrap();

        relu(&input.view(), &mut output).unwrap();
        assert_eq!(output.as_slice(), &[0.0, 0.0, 2.5, 0.0]);
    }

    #[test]
    fn test_relu_inplace_matches_out_of_place() {
        let mut t = Tensor::from_f32(Shape::new(3, 1, 2), &[-3.0, 1.0, 2.0, -4.0, 5.0, -6.0])
            .unwrap();
        let mut out = Tensor::zeros(*t.shape()).unwrap();
        relu(&t.view(), &mut out).unwrap();

        relu_inplace(&mut t).unwrap();
        assert_eq!(t, out);
    }

    #[test]
    fn test_relu_shape_mismatch_leaves_output() {
        let input = Tensor::from_f32(Shape::new(2, 2, 1), &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let mut output = Tensor::from_f32(Shape::new(4, 1, 1), &[9.0; 4]).unwrap();

        let err = relu(&input.view(), &mut output).unwrap_err();
        assert_eq!(
            err,
            TensorError::ShapeMismatch {
                op: "relu",
                expected: Shape::new(2, 2, 1),
                actual: Shape::new(4, 1, 1),
            }
        );
        assert_eq!(output.as_slice(), &[9.0; 4]);
    }

    #[test]
    fn test_relu_inplace_rejects_released() {
        let mut t = Tensor::zeros(Shape::vector(3)).unwrap();
        t.release();
        assert!(relu_inplace(&mut t).is_err());
    }
}
