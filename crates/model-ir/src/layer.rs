// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Layer definitions for the pipeline IR.
//!
//! Each [`LayerDef`] describes one operator invocation: which operator and
//! with which scalar configuration ([`LayerType`]), the shapes of the
//! activation it consumes and produces, and the shapes of the weight tensors
//! it needs. Weight data is **not** stored here; the runtime allocates and
//! initializes it.

use crate::ModelError;
use std::fmt;
use tensor_core::{pool_output_shape, Shape};

fn default_true() -> bool {
    true
}

/// The operator a layer runs, together with its configuration.
///
/// Serialized as an internally tagged object, e.g.
/// `{"type": "conv2d", "out_channels": 4, "kernel_size": 3}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerType {
    /// Same-padded square convolution.
    #[serde(alias = "conv")]
    Conv2d {
        out_channels: usize,
        kernel_size: usize,
        #[serde(default = "default_true")]
        bias: bool,
    },
    /// Elementwise `max(0, x)`.
    Relu,
    /// Non-overlapping max pooling with stride `pool_size`.
    #[serde(alias = "maxpool", alias = "pool")]
    MaxPool2d { pool_size: usize },
    /// Reinterpret the activation as an `N x 1 x 1` vector.
    Flatten,
    /// Fully-connected layer over the flattened activation.
    #[serde(alias = "fc", alias = "dense")]
    Linear {
        out_features: usize,
        #[serde(default = "default_true")]
        bias: bool,
    },
}

impl LayerType {
    /// Returns the operator name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conv2d { .. } => "conv2d",
            Self::Relu => "relu",
            Self::MaxPool2d { .. } => "max_pool2d",
            Self::Flatten => "flatten",
            Self::Linear { .. } => "linear",
        }
    }

    /// Computes the activation shape this layer produces from `input`.
    ///
    /// Returns a human-readable reason when the configuration is unusable or
    /// the resulting buffer would not be addressable.
    pub fn output_shape(&self, input: &Shape) -> Result<Shape, String> {
        let shape = match *self {
            Self::Conv2d {
                out_channels,
                kernel_size,
                ..
            } => {
                if out_channels == 0 || kernel_size == 0 {
                    return Err("out_channels and kernel_size must be non-zero".into());
                }
                Shape::new(input.width, input.height, out_channels)
            }
            Self::Relu => *input,
            Self::MaxPool2d { pool_size } => {
                pool_output_shape(input, pool_size).map_err(|e| e.to_string())?
            }
            Self::Flatten => Shape::vector(addressable(input)?.num_elements()),
            Self::Linear { out_features, .. } => {
                if out_features == 0 {
                    return Err("out_features must be non-zero".into());
                }
                Shape::vector(out_features)
            }
        };
        addressable(&shape).copied()
    }

    /// Shapes of the weight tensors this layer needs, weight first, then bias.
    ///
    /// Fails when a weight tensor would not be addressable.
    pub fn weight_shapes(&self, input: &Shape) -> Result<Vec<Shape>, String> {
        let shapes = match *self {
            Self::Conv2d {
                out_channels,
                kernel_size,
                bias,
            } => {
                let mut shapes = vec![Shape::new(kernel_size, kernel_size, out_channels)];
                if bias {
                    shapes.push(Shape::vector(out_channels));
                }
                shapes
            }
            Self::Linear { out_features, bias } => {
                // Row-major (out_features x in_features) matrix.
                let in_features = addressable(input)?.num_elements();
                let mut shapes = vec![Shape::new(in_features, out_features, 1)];
                if bias {
                    shapes.push(Shape::vector(out_features));
                }
                shapes
            }
            Self::Relu | Self::MaxPool2d { .. } | Self::Flatten => Vec::new(),
        };
        for shape in &shapes {
            addressable(shape)?;
        }
        Ok(shapes)
    }
}

/// Rejects shapes whose byte size does not fit in `usize`.
fn addressable(shape: &Shape) -> Result<&Shape, String> {
    match shape.checked_size_bytes() {
        Some(_) => Ok(shape),
        None => Err(format!("shape {shape} overflows the address space")),
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conv2d {
                out_channels,
                kernel_size,
                ..
            } => write!(f, "conv2d(out={out_channels}, k={kernel_size})"),
            Self::MaxPool2d { pool_size } => write!(f, "max_pool2d(p={pool_size})"),
            Self::Linear { out_features, .. } => write!(f, "linear(out={out_features})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Metadata describing a single layer of the pipeline.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerDef {
    /// Unique identifier for this layer (e.g., `"conv1"`).
    pub name: String,
    /// The operator and its configuration.
    pub layer_type: LayerType,
    /// Index in the execution order (0-based).
    pub index: usize,
    /// Names of the weight tensors (`"<name>.weight"`, `"<name>.bias"`).
    pub weight_names: Vec<String>,
    /// Shapes of the weight tensors (parallel to `weight_names`).
    pub weight_shapes: Vec<Shape>,
    /// Shape of the activation this layer consumes.
    pub input_shape: Shape,
    /// Shape of the activation this layer produces.
    pub output_shape: Shape,
}

impl LayerDef {
    /// Builds a layer, inferring its output and weight shapes from `input_shape`.
    pub fn new(
        index: usize,
        name: impl Into<String>,
        layer_type: LayerType,
        input_shape: Shape,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        let output_shape = layer_type
            .output_shape(&input_shape)
            .map_err(|detail| ModelError::InvalidLayer {
                layer: name.clone(),
                detail,
            })?;
        let weight_shapes = layer_type
            .weight_shapes(&input_shape)
            .map_err(|detail| ModelError::InvalidLayer {
                layer: name.clone(),
                detail,
            })?;
        let weight_names = ["weight", "bias"]
            .iter()
            .take(weight_shapes.len())
            .map(|suffix| format!("{name}.{suffix}"))
            .collect();

        Ok(Self {
            name,
            layer_type,
            index,
            weight_names,
            weight_shapes,
            input_shape,
            output_shape,
        })
    }

    /// Estimates the memory required for this layer's weights in bytes.
    pub fn estimated_weight_bytes(&self) -> usize {
        self.weight_shapes
            .iter()
            .map(Shape::size_bytes)
            .fold(0, usize::saturating_add)
    }

    /// Estimates the memory required for this layer's activations in bytes.
    ///
    /// Counts both input and output, since both are live during execution.
    pub fn estimated_activation_bytes(&self) -> usize {
        self.input_shape
            .size_bytes()
            .saturating_add(self.output_shape.size_bytes())
    }

    /// Total estimated memory (weights + activations) for this layer.
    pub fn estimated_total_bytes(&self) -> usize {
        self.estimated_weight_bytes()
            .saturating_add(self.estimated_activation_bytes())
    }

    /// Returns a concise summary string for display.
    pub fn summary(&self) -> String {
        format!(
            "[{}] {} {}: {} -> {}, {} weight tensors ({:.1} KB)",
            self.index,
            self.name,
            self.layer_type,
            self.input_shape,
            self.output_shape,
            self.weight_names.len(),
            self.estimated_weight_bytes() as f64 / 1024.0,
        )
    }
}
