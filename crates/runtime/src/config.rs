// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Runtime configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! manifest_path = "./models/simple-cnn.json"
//! seed = 42
//! enable_profiling = true
//! trace_activations = false
//! ```

use crate::{RuntimeError, WeightInitializer};
use std::path::{Path, PathBuf};

/// Configuration for the inference runtime.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RuntimeConfig {
    /// Pipeline manifest read by `InferenceEngine::load_model`.
    pub manifest_path: Option<PathBuf>,
    /// Seed for weight initialization. `None` draws from the global RNG.
    pub seed: Option<u64>,
    /// Whether to record per-layer timing metrics.
    #[serde(default = "default_true")]
    pub enable_profiling: bool,
    /// Whether to log every layer's rendered output at `debug` level.
    #[serde(default)]
    pub trace_activations: bool,
}

fn default_true() -> bool {
    true
}

impl RuntimeConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, RuntimeError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RuntimeError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, RuntimeError> {
        toml::from_str(toml_str)
            .map_err(|e| RuntimeError::ConfigError(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, RuntimeError> {
        toml::to_string_pretty(self)
            .map_err(|e| RuntimeError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Builder-style helper for setting the manifest path.
    pub fn with_manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    /// Builder-style helper for setting the weight seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Resolves the seed setting into a weight initializer.
    pub fn weight_rng(&self) -> WeightInitializer {
        match self.seed {
            Some(seed) => WeightInitializer::seeded(seed),
            None => WeightInitializer::global(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            manifest_path: None,
            seed: None,
            enable_profiling: true,
            trace_activations: false,
        }
    }
}
