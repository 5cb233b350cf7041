// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Inference profiling metrics.
//!
//! [`InferenceMetrics`] collects per-layer compute time and output sizes for
//! one forward pass.

use std::time::Duration;

/// Metrics for a single layer's execution.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LayerMetrics {
    /// Layer name.
    pub layer_name: String,
    /// Operator name (e.g. `"conv2d"`).
    pub layer_type: &'static str,
    /// Time spent executing the operator.
    pub compute_duration: Duration,
    /// Number of elements written to the layer's output.
    pub output_elements: usize,
}

/// Aggregate metrics for a complete forward pass.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct InferenceMetrics {
    /// Total wall-clock time for the run, including input checks and arg-max.
    pub total_duration: Duration,
    /// Sum of the per-layer compute durations.
    pub total_compute_duration: Duration,
    /// Per-layer metrics, in execution order. Empty when profiling is off.
    pub layer_metrics: Vec<LayerMetrics>,
    /// Number of layers executed.
    pub num_layers: usize,
}

impl InferenceMetrics {
    /// Creates an empty metrics container.
    pub fn new(num_layers: usize) -> Self {
        Self {
            num_layers,
            ..Self::default()
        }
    }

    /// Records metrics for a single layer.
    pub fn record_layer(
        &mut self,
        name: String,
        layer_type: &'static str,
        compute: Duration,
        output_elements: usize,
    ) {
        self.total_compute_duration += compute;
        self.layer_metrics.push(LayerMetrics {
            layer_name: name,
            layer_type,
            compute_duration: compute,
            output_elements,
        });
    }

    /// Finalises metrics with the total wall-clock time.
    pub fn finalise(&mut self, total: Duration) {
        self.total_duration = total;
    }

    /// The layer with the longest compute time, if any were recorded.
    pub fn slowest_layer(&self) -> Option<&LayerMetrics> {
        self.layer_metrics.iter().max_by_key(|m| m.compute_duration)
    }

    /// Returns a one-line human-readable summary.
    pub fn summary(&self) -> String {
        let mut s = format!(
            "Inference: {:.3}ms total, {} layers, {:.3}ms compute",
            self.total_duration.as_secs_f64() * 1000.0,
            self.num_layers,
            self.total_compute_duration.as_secs_f64() * 1000.0,
        );
        if let Some(slowest) = self.slowest_layer() {
            s.push_str(&format!(
                ", slowest '{}' ({}) {:.3}ms",
                slowest.layer_name,
                slowest.layer_type,
                slowest.compute_duration.as_secs_f64() * 1000.0,
            ));
        }
        s
    }
}
