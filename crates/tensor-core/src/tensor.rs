// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Core tensor type and view abstractions.

use crate::rng::with_global_rng;
use crate::{Shape, TensorError};
use rand::Rng;

/// An owned width x height x channels tensor of `f32` stored in contiguous memory.
///
/// `Tensor` is the only data carrier of the operator set. It owns its buffer
/// exclusively and exposes read-only views via [`TensorView`].
///
/// # Memory Layout
/// Element `(w, h, c)` is stored at `c * width * height + h * width + w`.
/// The buffer is only reachable through the accessors below, never through
/// caller-side offset arithmetic.
///
/// # Lifetime
/// A tensor is created by an allocation call and may be explicitly
/// [`release`](Tensor::release)d, which frees the buffer and leaves an empty
/// (released) tensor behind. Operators reject released operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Shape,
    data: Vec<f32>,
}

impl Tensor {
    /// Allocates a `width x height x channels` tensor.
    ///
    /// The buffer is zero-initialized. With `randomize` set, every element
    /// is drawn from the global RNG (see [`randomize`](Tensor::randomize)).
    ///
    /// # Errors
    /// [`TensorError::InvalidShape`] if any dimension is zero,
    /// [`TensorError::AllocationFailure`] if the buffer cannot be obtained.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::Tensor;
    /// let t = Tensor::new(3, 2, 1, false).unwrap();
    /// assert_eq!(t.num_elements(), 6);
    /// assert!(Tensor::new(0, 2, 1, false).is_err());
    /// ```
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        randomize: bool,
    ) -> Result<Self, TensorError> {
        let mut tensor = Self::zeros(Shape::new(width, height, channels))?;
        if randomize {
            tensor.randomize();
        }
        Ok(tensor)
    }

    /// Allocates a zero-filled tensor of the given shape.
    pub fn zeros(shape: Shape) -> Result<Self, TensorError> {
        if !shape.is_valid() {
            return Err(TensorError::InvalidShape {
                width: shape.width,
                height: shape.height,
                channels: shape.channels,
            });
        }
        let elements =
            shape
                .checked_num_elements()
                .ok_or_else(|| TensorError::AllocationFailure {
                    elements: usize::MAX,
                    detail: format!("element count of {shape} overflows usize"),
                })?;

        let mut data = Vec::new();
        data.try_reserve_exact(elements)
            .map_err(|e| TensorError::AllocationFailure {
                elements,
                detail: e.to_string(),
            })?;
        data.resize(elements, 0.0);

        Ok(Self { shape, data })
    }

    /// Creates a tensor from a slice of `f32` values in buffer order.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Shape, Tensor};
    /// let t = Tensor::from_f32(Shape::vector(3), &[1.0, 2.0, 3.0]).unwrap();
    /// assert_eq!(t.as_slice(), &[1.0, 2.0, 3.0]);
    /// ```
    pub fn from_f32(shape: Shape, values: &[f32]) -> Result<Self, TensorError> {
        let mut tensor = Self::zeros(shape)?;
        if values.len() != tensor.data.len() {
            return Err(TensorError::ElementCountMismatch {
                op: "from_f32",
                expected: tensor.data.len(),
                actual: values.len(),
            });
        }
        tensor.data.copy_from_slice(values);
        Ok(tensor)
    }

    /// Refills the tensor with Xavier-scaled noise from the global RNG.
    ///
    /// Each element is uniform over `[-1, 1]` multiplied by `1 / sqrt(N)`
    /// where `N` is the element count. The global RNG is seeded on first use.
    pub fn randomize(&mut self) {
        with_global_rng(|rng| self.randomize_with(rng));
    }

    /// Same as [`randomize`](Tensor::randomize) but draws from `rng`.
    pub fn randomize_with<R: Rng>(&mut self, rng: &mut R) {
        if self.data.is_empty() {
            return;
        }
        let scale = (1.0 / self.data.len() as f32).sqrt();
        for x in self.data.iter_mut() {
            *x = rng.gen_range(-1.0f32..=1.0) * scale;
        }
    }

    /// Frees the buffer and leaves the tensor in the released state.
    ///
    /// Releasing twice is a no-op.
    pub fn release(&mut self) {
        if self.is_released() {
            return;
        }
        self.data = Vec::new();
        self.shape = Shape::empty();
    }

    /// Returns `true` after [`release`](Tensor::release).
    pub fn is_released(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn width(&self) -> usize {
        self.shape.width
    }

    pub fn height(&self) -> usize {
        self.shape.height
    }

    pub fn channels(&self) -> usize {
        self.shape.channels
    }

    /// Returns the total element count.
    pub fn num_elements(&self) -> usize {
        self.data.len()
    }

    /// Returns an immutable view over this tensor's data.
    pub fn view(&self) -> TensorView<'_> {
        TensorView {
            shape: self.shape,
            data: &self.data,
        }
    }

    /// Reinterprets the buffer under another shape with the same element count.
    ///
    /// No data is moved; this is how a flattened vector is read back with its
    /// original spatial shape.
    pub fn view_as(&self, shape: Shape) -> Result<TensorView<'_>, TensorError> {
        TensorView::from_parts(shape, &self.data)
    }

    /// Returns the buffer in linear (channel-major) order.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Returns the buffer mutably in linear (channel-major) order.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Fills the tensor with a constant value.
    pub fn fill(&mut self, value: f32) {
        self.data.iter_mut().for_each(|x| *x = value);
    }

    /// Reads `(w, h, c)`, returning `0.0` when any coordinate is out of range.
    ///
    /// The clamp is intentional: convolution relies on it for implicit zero
    /// padding. Use [`try_get`](Tensor::try_get) where an out-of-range read
    /// should be noticed.
    #[inline]
    pub fn get_clamped(&self, w: usize, h: usize, c: usize) -> f32 {
        self.try_get(w, h, c).unwrap_or(0.0)
    }

    /// Reads `(w, h, c)`, or `None` if any coordinate is out of range.
    #[inline]
    pub fn try_get(&self, w: usize, h: usize, c: usize) -> Option<f32> {
        self.shape.offset(w, h, c).map(|i| self.data[i])
    }

    /// Writes `(w, h, c)`; silently ignored when any coordinate is out of range.
    #[inline]
    pub fn set_clamped(&mut self, w: usize, h: usize, c: usize, value: f32) {
        if let Some(i) = self.shape.offset(w, h, c) {
            self.data[i] = value;
        }
    }
}

/// Drops the tensor behind `handle` and leaves `None` in its place.
///
/// Idempotent: releasing an empty handle does nothing.
pub fn release(handle: &mut Option<Tensor>) {
    if let Some(mut tensor) = handle.take() {
        tensor.release();
    }
}

/// A borrowed, read-only view over a tensor's data.
///
/// Views are zero-copy and tied to the lifetime of the source buffer,
/// enforced by the borrow checker.
#[derive(Debug, Clone, Copy)]
pub struct TensorView<'a> {
    shape: Shape,
    data: &'a [f32],
}

impl<'a> TensorView<'a> {
    /// Creates a view from a shape and a buffer of exactly that many elements.
    pub fn from_parts(shape: Shape, data: &'a [f32]) -> Result<Self, TensorError> {
        if shape.checked_num_elements() != Some(data.len()) {
            return Err(TensorError::ElementCountMismatch {
                op: "view",
                expected: shape.num_elements(),
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Returns the shape of the viewed tensor.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn num_elements(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` when the viewed tensor has been released.
    pub fn is_released(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the viewed buffer.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Reads `(w, h, c)`, returning `0.0` when any coordinate is out of range.
    #[inline]
    pub fn get_clamped(&self, w: usize, h: usize, c: usize) -> f32 {
        self.try_get(w, h, c).unwrap_or(0.0)
    }

    /// Reads `(w, h, c)`, or `None` if any coordinate is out of range.
    #[inline]
    pub fn try_get(&self, w: usize, h: usize, c: usize) -> Option<f32> {
        self.shape.offset(w, h, c).map(|i| self.data[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_zero_initialized() {
        let t = Tensor::new(4, 3, 2, false).unwrap();
        assert_eq!(t.shape(), &Shape::new(4, 3, 2));
        assert_eq!(t.num_elements(), 24);
        assert!(t.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_new_rejects_zero_dimension() {
        for (w, h, c) in [(0, 1, 1), (1, 0, 1), (1, 1, 0)] {
            let err = Tensor::new(w, h, c, false).unwrap_err();
            assert!(matches!(err, TensorError::InvalidShape { .. }));
        }
    }

    #[test]
    fn test_overflowing_shape_is_allocation_failure() {
        let err = Tensor::zeros(Shape::new(usize::MAX, 2, 1)).unwrap_err();
        assert!(matches!(err, TensorError::AllocationFailure { .. }));
    }

    #[test]
    fn test_randomized_within_xavier_bound() {
        let t = Tensor::new(3, 3, 4, true).unwrap();
        let bound = (1.0 / 36.0f32).sqrt();
        assert!(t.as_slice().iter().all(|&x| x.abs() <= bound + 1e-6));
        assert!(t.as_slice().iter().any(|&x| x != 0.0));
    }

    #[test]
    fn test_randomize_with_is_reproducible() {
        let mut a = Tensor::new(5, 5, 2, false).unwrap();
        let mut b = Tensor::new(5, 5, 2, false).unwrap();
        a.randomize_with(&mut StdRng::seed_from_u64(42));
        b.randomize_with(&mut StdRng::seed_from_u64(42));
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_from_f32_length_mismatch() {
        let err = Tensor::from_f32(Shape::new(2, 2, 1), &[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            TensorError::ElementCountMismatch {
                op: "from_f32",
                expected: 4,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_get_set_roundtrip() {
        let mut t = Tensor::new(3, 2, 2, false).unwrap();
        t.set_clamped(2, 1, 1, 7.5);
        assert_eq!(t.get_clamped(2, 1, 1), 7.5);
        assert_eq!(t.as_slice()[11], 7.5);
    }

    #[test]
    fn test_out_of_range_access_is_clamped() {
        let mut t = Tensor::new(2, 2, 1, false).unwrap();
        t.fill(1.0);
        assert_eq!(t.get_clamped(2, 0, 0), 0.0);
        assert_eq!(t.get_clamped(0, 2, 0), 0.0);
        assert_eq!(t.get_clamped(0, 0, 1), 0.0);
        assert_eq!(t.try_get(5, 5, 5), None);

        let before = t.clone();
        t.set_clamped(2, 0, 0, 9.0);
        t.set_clamped(0, 0, 3, 9.0);
        assert_eq!(t, before);
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut t = Tensor::new(2, 2, 2, true).unwrap();
        t.release();
        assert!(t.is_released());
        assert_eq!(t.shape(), &Shape::empty());
        assert_eq!(t.get_clamped(0, 0, 0), 0.0);
        t.release();
        assert!(t.is_released());
    }

    #[test]
    fn test_release_handle() {
        let mut handle = Some(Tensor::new(2, 2, 1, false).unwrap());
        release(&mut handle);
        assert!(handle.is_none());
        release(&mut handle);
        assert!(handle.is_none());
    }

    #[test]
    fn test_view_as_reinterprets() {
        let t = Tensor::from_f32(Shape::vector(6), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let v = t.view_as(Shape::new(3, 2, 1)).unwrap();
        assert_eq!(v.get_clamped(0, 1, 0), 4.0);
        assert!(t.view_as(Shape::new(4, 2, 1)).is_err());
    }

    #[test]
    fn test_view_as_overflowing_shape() {
        let t = Tensor::from_f32(Shape::vector(6), &[0.0; 6]).unwrap();
        assert_eq!(
            t.view_as(Shape::new(usize::MAX, 2, 1)).unwrap_err(),
            TensorError::ElementCountMismatch {
                op: "view",
                expected: usize::MAX,
                actual: 6,
            }
        );

        // Wrapping multiplication would give exactly 6 here.
        let wraps_to_six = Shape::new((1usize << (usize::BITS - 1)) + 3, 2, 1);
        assert!(t.view_as(wraps_to_six).is_err());
    }

    #[test]
    fn test_view_matches_tensor() {
        let mut t = Tensor::new(2, 2, 2, false).unwrap();
        t.set_clamped(1, 1, 1, 3.0);
        let v = t.view();
        assert_eq!(v.shape(), t.shape());
        assert_eq!(v.get_clamped(1, 1, 1), 3.0);
        assert_eq!(v.try_get(2, 0, 0), None);
    }
}
