// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # model-ir
//!
//! A minimal intermediate representation for sequential image-classification
//! pipelines (convolution, ReLU, max-pooling, flatten, fully-connected).
//!
//! - [`LayerType`]: the operator a layer runs and its configuration.
//! - [`LayerDef`]: one layer's shapes and weight tensor names.
//! - [`ModelGraph`]: the whole pipeline, with a **type-state pattern**
//!   (`Loaded` → `Validated`).
//! - [`GraphBuilder`]: chainable programmatic construction.
//! - [`ModelManifest`] / [`ModelLoader`]: the JSON pipeline descriptor.
//!
//! Every intermediate shape is inferred from the input shape, so a validated
//! graph is guaranteed to chain end to end.
//!
//! # Example
//! ```no_run
//! use model_ir::ModelLoader;
//! use std::path::Path;
//!
//! let graph = ModelLoader::load(Path::new("./models/simple-cnn.json")).unwrap();
//! println!("{}", graph.summary());
//! for layer in graph.iter_layers() {
//!     println!("  {}", layer.summary());
//! }
//! ```

mod builder;
mod error;
pub mod graph;
mod layer;
mod loader;
pub mod manifest;

pub use builder::GraphBuilder;
pub use error::ModelError;
pub use graph::ModelGraph;
pub use layer::{LayerDef, LayerType};
pub use loader::{ModelLoader, MANIFEST_FILE};
pub use manifest::{ManifestLayer, ModelManifest};
