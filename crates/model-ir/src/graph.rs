// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Pipeline graph: a linear chain of layers from input image to logits.
//!
//! # Type-State Pattern
//!
//! ```text
//! ModelGraph<Loaded>     layers assembled, not yet checked.
//!       │  .validate()
//!       ▼
//! ModelGraph<Validated>  shapes chain end to end, ready to execute.
//! ```
//!
//! The runtime only accepts `ModelGraph<Validated>`, so an engine can never
//! be prepared from a pipeline whose shapes do not line up.

use crate::{LayerDef, ModelError};
use std::collections::HashSet;
use std::fmt;
use tensor_core::Shape;

// ── Type-state markers ─────────────────────────────────────────────

/// Marker: graph has been assembled but not validated.
#[derive(Debug, Clone)]
pub struct Loaded;

/// Marker: graph has been validated and is ready for execution.
#[derive(Debug, Clone)]
pub struct Validated;

/// Sealed trait for graph states.
pub trait GraphState: fmt::Debug + Clone {}
impl GraphState for Loaded {}
impl GraphState for Validated {}

// ── ModelGraph ─────────────────────────────────────────────────────

/// An ordered sequence of layers consuming a fixed-shape input.
#[derive(Debug, Clone)]
pub struct ModelGraph<S: GraphState = Loaded> {
    /// Human-readable pipeline name (e.g., `"simple-cnn"`).
    pub name: String,
    /// Shape of the tensor fed to the first layer.
    pub input_shape: Shape,
    /// Ordered list of layer definitions.
    pub layers: Vec<LayerDef>,
    _state: std::marker::PhantomData<S>,
}

// ── Loaded state ───────────────────────────────────────────────────

impl ModelGraph<Loaded> {
    /// Creates a new graph in the `Loaded` state.
    pub fn new(name: impl Into<String>, input_shape: Shape, layers: Vec<LayerDef>) -> Self {
        Self {
            name: name.into(),
            input_shape,
            layers,
            _state: std::marker::PhantomData,
        }
    }

    /// Validates the graph and transitions to the `Validated` state.
    ///
    /// # Checks
    /// - The graph is non-empty and its input shape has no zero dimension.
    /// - Every activation and weight buffer fits in the address space.
    /// - Layer indices are consecutive starting from 0.
    /// - Layer names are non-empty and unique.
    /// - Each layer consumes exactly what its predecessor produces (the first
    ///   layer consumes the graph input).
    /// - Each layer's recorded output and weight shapes agree with what its
    ///   operator configuration implies.
    pub fn validate(self) -> Result<ModelGraph<Validated>, ModelError> {
        if self.layers.is_empty() {
            return Err(ModelError::InvalidGraph(
                "model graph contains no layers".into(),
            ));
        }
        if !self.input_shape.is_valid() {
            return Err(ModelError::InvalidGraph(format!(
                "input shape {} has a zero dimension",
                self.input_shape
            )));
        }
        if self.input_shape.checked_size_bytes().is_none() {
            return Err(ModelError::InvalidGraph(format!(
                "input shape {} overflows the address space",
                self.input_shape
            )));
        }

        let mut seen_names = HashSet::new();
        let mut expected_input = self.input_shape;
        for (i, layer) in self.layers.iter().enumerate() {
            let invalid = |detail: String| ModelError::InvalidLayer {
                layer: layer.name.clone(),
                detail,
            };

            if layer.index != i {
                return Err(invalid(format!("expected index {i}, got {}", layer.index)));
            }
            if layer.name.is_empty() {
                return Err(invalid("layer name is empty".into()));
            }
            if !seen_names.insert(layer.name.as_str()) {
                return Err(invalid("duplicate layer name".into()));
            }
            if layer.input_shape != expected_input {
                return Err(invalid(format!(
                    "input shape {} does not match upstream output {}",
                    layer.input_shape, expected_input
                )));
            }

            let output = layer.layer_type.output_shape(&layer.input_shape).map_err(invalid)?;
            if layer.output_shape != output {
                return Err(invalid(format!(
                    "recorded output shape {} but {} produces {}",
                    layer.output_shape, layer.layer_type, output
                )));
            }
            let weight_shapes = layer.layer_type.weight_shapes(&layer.input_shape).map_err(invalid)?;
            if layer.weight_shapes != weight_shapes {
                return Err(invalid("weight shapes do not match layer configuration".into()));
            }
            if layer.weight_names.len() != layer.weight_shapes.len() {
                return Err(invalid(format!(
                    "{} weight names for {} weight shapes",
                    layer.weight_names.len(),
                    layer.weight_shapes.len()
                )));
            }

            expected_input = layer.output_shape;
        }

        tracing::debug!(
            model = %self.name,
            layers = self.layers.len(),
            output = %expected_input,
            "model graph validated"
        );

        Ok(ModelGraph {
            name: self.name,
            input_shape: self.input_shape,
            layers: self.layers,
            _state: std::marker::PhantomData,
        })
    }
}

// ── Validated state ────────────────────────────────────────────────

impl ModelGraph<Validated> {
    /// Returns the total number of layers.
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Shape of the final layer's output.
    pub fn output_shape(&self) -> Shape {
        // Validation guarantees at least one layer.
        self.layers
            .last()
            .map_or(self.input_shape, |l| l.output_shape)
    }

    /// Total number of weight tensors across all layers.
    pub fn num_weight_tensors(&self) -> usize {
        self.layers.iter().map(|l| l.weight_shapes.len()).sum()
    }

    /// Returns the total estimated memory for all weights in bytes.
    pub fn total_weight_bytes(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.estimated_weight_bytes())
            .fold(0, usize::saturating_add)
    }

    /// Bytes held by the input plus one output activation per layer.
    pub fn total_activation_bytes(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.output_shape.size_bytes())
            .fold(self.input_shape.size_bytes(), usize::saturating_add)
    }

    /// Returns the estimated memory for the largest single layer.
    pub fn max_layer_bytes(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.estimated_total_bytes())
            .max()
            .unwrap_or(0)
    }

    /// Returns an iterator over the layers in execution order.
    pub fn iter_layers(&self) -> impl Iterator<Item = &LayerDef> {
        self.layers.iter()
    }

    /// Returns a reference to a layer by index.
    pub fn layer(&self, index: usize) -> Option<&LayerDef> {
        self.layers.get(index)
    }

    /// Returns a summary string describing the pipeline.
    pub fn summary(&self) -> String {
        format!(
            "Model '{}': {} -> {}, {} layers, {:.1} KB weights, largest layer {:.1} KB",
            self.name,
            self.input_shape,
            self.output_shape(),
            self.num_layers(),
            self.total_weight_bytes() as f64 / 1024.0,
            self.max_layer_bytes() as f64 / 1024.0,
        )
    }
}

// ── Shared implementations ─────────────────────────────────────────

impl<S: GraphState> fmt::Display for ModelGraph<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "ModelGraph '{}' (input {}, {} layers):",
            self.name,
            self.input_shape,
            self.layers.len()
        )?;
        for layer in &self.layers {
            writeln!(f, "  {}", layer.summary())?;
        }
        Ok(())
    }
}
