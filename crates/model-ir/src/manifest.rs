// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! JSON pipeline manifest parsing.
//!
//! The manifest lists the input shape and the layer sequence; all
//! intermediate shapes are inferred when the graph is built.
//!
//! # Format
//! ```json
//! {
//!   "name": "simple-cnn",
//!   "input": { "width": 16, "height": 16, "channels": 1 },
//!   "layers": [
//!     { "name": "conv1", "type": "conv2d", "out_channels": 4, "kernel_size": 3 },
//!     { "name": "relu1", "type": "relu" },
//!     { "name": "pool1", "type": "max_pool2d", "pool_size": 2 },
//!     { "name": "flatten", "type": "flatten" },
//!     { "name": "fc", "type": "linear", "out_features": 10 }
//!   ]
//! }
//! ```

use crate::graph::GraphState;
use crate::{LayerType, ModelError, ModelGraph};
use std::collections::HashSet;
use std::path::Path;
use tensor_core::Shape;

/// Top-level pipeline manifest.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ModelManifest {
    /// Human-readable pipeline name.
    pub name: String,
    /// Shape of the input tensor.
    pub input: Shape,
    /// Layers in execution order.
    pub layers: Vec<ManifestLayer>,
}

/// A single layer entry in the manifest.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ManifestLayer {
    /// Layer name, unique within the manifest.
    pub name: String,
    /// Operator and configuration, flattened into the same JSON object.
    #[serde(flatten)]
    pub layer_type: LayerType,
}

impl ModelManifest {
    /// Loads a manifest from a JSON file path.
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let manifest: Self = serde_json::from_str(json)?;
        Ok(manifest)
    }

    /// Captures a graph's name, input shape and layer sequence.
    pub fn from_graph<S: GraphState>(graph: &ModelGraph<S>) -> Self {
        Self {
            name: graph.name.clone(),
            input: graph.input_shape,
            layers: graph
                .layers
                .iter()
                .map(|l| ManifestLayer {
                    name: l.name.clone(),
                    layer_type: l.layer_type.clone(),
                })
                .collect(),
        }
    }

    /// Serializes the manifest as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks what can be checked without shape inference.
    ///
    /// - At least one layer is defined.
    /// - The input shape has no zero dimension.
    /// - No layer name is empty or repeated.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.layers.is_empty() {
            return Err(ModelError::InvalidGraph(
                "manifest contains no layers".into(),
            ));
        }
        if !self.input.is_valid() {
            return Err(ModelError::InvalidGraph(format!(
                "manifest input shape {} has a zero dimension",
                self.input
            )));
        }

        let mut seen_names = HashSet::new();
        for layer in &self.layers {
            if layer.name.is_empty() {
                return Err(ModelError::InvalidGraph("layer with empty name".into()));
            }
            if !seen_names.insert(layer.name.as_str()) {
                return Err(ModelError::InvalidLayer {
                    layer: layer.name.clone(),
                    detail: "duplicate layer name".into(),
                });
            }
        }

        Ok(())
    }
}
