// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor shape descriptors and the channel-major offset formula.

use std::fmt;

/// Describes the dimensionality of a [`crate::Tensor`]: width, height, channels.
///
/// Element `(w, h, c)` lives at linear offset `c * width * height + h * width + w`
/// (channel-major, then row, then column). Every operator agrees on this layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct Shape {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
}

impl Shape {
    /// Creates a new shape.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::Shape;
    /// let s = Shape::new(4, 3, 2);
    /// assert_eq!(s.num_elements(), 24);
    /// assert_eq!(s.offset(1, 2, 1), Some(12 + 8 + 1));
    /// ```
    pub const fn new(width: usize, height: usize, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
        }
    }

    /// Creates a `len x 1 x 1` shape, the layout used for vectors and biases.
    pub const fn vector(len: usize) -> Self {
        Self::new(len, 1, 1)
    }

    /// The shape of a released tensor.
    pub const fn empty() -> Self {
        Self::new(0, 0, 0)
    }

    /// Returns the total number of elements, saturating at `usize::MAX`.
    ///
    /// A saturated count never matches a real buffer length; use
    /// [`checked_num_elements`](Self::checked_num_elements) to detect it.
    pub fn num_elements(&self) -> usize {
        self.width
            .saturating_mul(self.height)
            .saturating_mul(self.channels)
    }

    /// Like [`num_elements`](Self::num_elements) but `None` on overflow.
    pub fn checked_num_elements(&self) -> Option<usize> {
        self.width
            .checked_mul(self.height)
            .and_then(|n| n.checked_mul(self.channels))
    }

    /// Computes the memory footprint in bytes of an `f32` buffer of this shape.
    ///
    /// Saturates at `usize::MAX`.
    pub fn size_bytes(&self) -> usize {
        self.num_elements().saturating_mul(std::mem::size_of::<f32>())
    }

    /// Like [`size_bytes`](Self::size_bytes) but `None` on overflow.
    pub fn checked_size_bytes(&self) -> Option<usize> {
        self.checked_num_elements()?
            .checked_mul(std::mem::size_of::<f32>())
    }

    /// Returns `true` when no dimension is zero.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0 && self.channels > 0
    }

    /// Returns the number of elements in one channel plane.
    pub fn plane_size(&self) -> usize {
        self.width * self.height
    }

    /// Maps `(w, h, c)` to its linear offset, or `None` if any coordinate
    /// is out of range.
    #[inline]
    pub fn offset(&self, w: usize, h: usize, c: usize) -> Option<usize> {
        if w >= self.width || h >= self.height || c >= self.channels {
            return None;
        }
        Some(c * self.width * self.height + h * self.width + w)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.channels)
    }
}

/// Convenience: `Shape::from((16, 16, 1))`.
impl From<(usize, usize, usize)> for Shape {
    fn from((width, height, channels): (usize, usize, usize)) -> Self {
        Self::new(width, height, channels)
    }
}
