// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Programmatic pipeline construction.

use crate::graph::Validated;
use crate::{LayerDef, LayerType, ModelError, ModelGraph};
use tensor_core::Shape;

/// Chainable builder that infers every intermediate shape from the input
/// shape and the layer configurations.
///
/// # Example
/// ```
/// use model_ir::GraphBuilder;
/// use tensor_core::Shape;
///
/// let graph = GraphBuilder::new("tiny", Shape::new(8, 8, 1))
///     .conv2d("conv", 2, 3)
///     .relu("relu")
///     .maxpool2d("pool", 2)
///     .flatten("flatten")
///     .linear("fc", 10)
///     .build()
///     .unwrap();
/// assert_eq!(graph.output_shape(), Shape::vector(10));
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    name: String,
    input_shape: Shape,
    steps: Vec<(String, LayerType)>,
}

impl GraphBuilder {
    pub fn new(name: impl Into<String>, input_shape: Shape) -> Self {
        Self {
            name: name.into(),
            input_shape,
            steps: Vec::new(),
        }
    }

    /// Appends an arbitrary layer.
    pub fn layer(mut self, name: impl Into<String>, layer_type: LayerType) -> Self {
        self.steps.push((name.into(), layer_type));
        self
    }

    /// Appends a biased, same-padded convolution.
    pub fn conv2d(self, name: impl Into<String>, out_channels: usize, kernel_size: usize) -> Self {
        self.layer(
            name,
            LayerType::Conv2d {
                out_channels,
                kernel_size,
                bias: true,
            },
        )
    }

    pub fn relu(self, name: impl Into<String>) -> Self {
        self.layer(name, LayerType::Relu)
    }

    pub fn maxpool2d(self, name: impl Into<String>, pool_size: usize) -> Self {
        self.layer(name, LayerType::MaxPool2d { pool_size })
    }

    pub fn flatten(self, name: impl Into<String>) -> Self {
        self.layer(name, LayerType::Flatten)
    }

    /// Appends a biased fully-connected layer.
    pub fn linear(self, name: impl Into<String>, out_features: usize) -> Self {
        self.layer(
            name,
            LayerType::Linear {
                out_features,
                bias: true,
            },
        )
    }

    /// Infers shapes layer by layer and returns the validated graph.
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidLayer`] for the first layer whose
    /// configuration cannot be applied to its input, or
    /// [`ModelError::InvalidGraph`] if no layers were added.
    pub fn build(self) -> Result<ModelGraph<Validated>, ModelError> {
        let mut shape = self.input_shape;
        let mut layers = Vec::with_capacity(self.steps.len());
        for (index, (name, layer_type)) in self.steps.into_iter().enumerate() {
            let layer = LayerDef::new(index, name, layer_type, shape)?;
            shape = layer.output_shape;
            layers.push(layer);
        }
        ModelGraph::new(self.name, self.input_shape, layers).validate()
    }
}
