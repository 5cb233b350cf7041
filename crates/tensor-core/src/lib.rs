// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! Width x height x channels `f32` tensors and the operator set for running
//! the forward pass of a small convolutional network.
//!
//! This crate provides:
//! - [`Tensor`]: an owned tensor with channel-major layout, clamped
//!   accessors, explicit release and Xavier-style random initialization.
//! - [`TensorView`]: a zero-copy read-only view, the input type of every
//!   operator.
//! - [`Shape`]: width/height/channels and the offset formula.
//! - Operators: [`conv2d`], [`linear`], [`relu`], [`relu_inplace`],
//!   [`maxpool2d`], [`flatten`], [`argmax`].
//!
//! # Design Goals
//! - Operators never allocate: outputs are pre-allocated by the caller.
//! - Every operand is validated before the first write.
//! - Clean error types via `thiserror`.

mod error;
mod ops;
mod render;
mod rng;
mod shape;
mod tensor;

pub use error::TensorError;
pub use ops::{
    argmax, conv2d, flatten, linear, maxpool2d, pool_output_shape, relu, relu_inplace, ArgMax,
};
pub use render::{Stats, FULL_DUMP_LIMIT};
pub use rng::{global_rng_initialized, seed_global_rng};
pub use shape::Shape;
pub use tensor::{release, Tensor, TensorView};
