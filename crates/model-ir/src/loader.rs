// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Pipeline loading from a JSON manifest.
//!
//! Only the architecture is loaded. Weight data is allocated and initialized
//! by the runtime when an engine is prepared.

use crate::graph::Validated;
use crate::{GraphBuilder, ModelError, ModelGraph, ModelManifest};
use std::path::Path;

/// Manifest filename looked up when [`ModelLoader::load`] is given a directory.
pub const MANIFEST_FILE: &str = "model.json";

/// Loads a pipeline description into a validated [`ModelGraph`].
///
/// # Example
/// ```no_run
/// use model_ir::ModelLoader;
/// use std::path::Path;
///
/// let graph = ModelLoader::load(Path::new("./models/simple-cnn.json")).unwrap();
/// println!("Loaded {} layers", graph.num_layers());
/// ```
pub struct ModelLoader;

impl ModelLoader {
    /// Loads and validates a pipeline.
    ///
    /// `path` is either a manifest file or a directory containing
    /// [`MANIFEST_FILE`].
    pub fn load(path: &Path) -> Result<ModelGraph<Validated>, ModelError> {
        let manifest_path = if path.is_dir() {
            path.join(MANIFEST_FILE)
        } else {
            path.to_path_buf()
        };
        tracing::info!(path = %manifest_path.display(), "loading model manifest");
        let manifest = ModelManifest::from_file(&manifest_path)?;
        Self::from_manifest(&manifest)
    }

    /// Parses and loads a pipeline from a JSON string.
    pub fn from_json(json: &str) -> Result<ModelGraph<Validated>, ModelError> {
        let manifest = ModelManifest::from_json(json)?;
        Self::from_manifest(&manifest)
    }

    /// Validates the manifest, infers every layer's shapes and returns the
    /// validated graph.
    pub fn from_manifest(manifest: &ModelManifest) -> Result<ModelGraph<Validated>, ModelError> {
        manifest.validate()?;

        let graph = manifest
            .layers
            .iter()
            .fold(
                GraphBuilder::new(manifest.name.clone(), manifest.input),
                |builder, layer| builder.layer(layer.name.clone(), layer.layer_type.clone()),
            )
            .build()?;

        tracing::info!("{}", graph.summary());
        Ok(graph)
    }
}
