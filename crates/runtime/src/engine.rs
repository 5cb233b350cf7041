// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The forward-pass engine with a type-state enforced lifecycle.
//!
//! ```text
//! InferenceEngine<Idle>
//!     │  .load_model()  /  InferenceEngine::from_graph()
//!     ▼
//! InferenceEngine<Planned>      validated pipeline, nothing allocated
//!     │  .prepare()             ▲
//!     ▼                         │ .release()
//! InferenceEngine<Ready>  ──────┘
//!     │  .run(&input)
//!     ▼
//!   InferenceOutput
//! ```
//!
//! Every weight and activation tensor is allocated in `prepare()`. A run
//! only reads the input and writes the pre-allocated activations, so
//! repeated runs never allocate beyond cloning the final output.

use crate::{InferenceMetrics, LayerWeights, RuntimeConfig, RuntimeError};
use model_ir::{graph::Validated, LayerDef, LayerType, ModelGraph, ModelLoader};
use std::time::Instant;
use tensor_core::{ArgMax, Tensor, TensorError, TensorView};

// ── Type-state markers ─────────────────────────────────────────

/// Engine is created but no pipeline is loaded.
#[derive(Debug)]
pub struct Idle;

/// A validated pipeline is loaded; no tensors are allocated.
#[derive(Debug)]
pub struct Planned {
    graph: ModelGraph<Validated>,
}

/// Weights and activations are allocated; the engine can run.
#[derive(Debug)]
pub struct Ready {
    graph: ModelGraph<Validated>,
    weights: Vec<LayerWeights>,
    /// One output tensor per layer, in execution order.
    activations: Vec<Tensor>,
}

/// Sealed trait for engine states.
pub trait EngineState: std::fmt::Debug {}
impl EngineState for Idle {}
impl EngineState for Planned {}
impl EngineState for Ready {}

// ── Inference output ───────────────────────────────────────────

/// The result of a single forward pass.
#[derive(Debug, Clone)]
pub struct InferenceOutput {
    /// The final layer's output.
    pub output: Tensor,
    /// Arg-max over `output`.
    pub prediction: ArgMax,
    /// Timing metrics for the run.
    pub metrics: InferenceMetrics,
}

// ── Engine ─────────────────────────────────────────────────────

/// The primary inference engine.
///
/// `S` is a type-state marker that enforces the lifecycle at compile time:
/// `.run()` only exists on a `Ready` engine.
///
/// # Example
/// ```no_run
/// use runtime::{InferenceEngine, RuntimeConfig};
/// use tensor_core::Tensor;
///
/// # fn example() -> Result<(), runtime::RuntimeError> {
/// let config = RuntimeConfig::default().with_manifest("./models/simple-cnn.json");
/// let mut engine = InferenceEngine::new(config).load_model()?.prepare()?;
/// let input = Tensor::new(16, 16, 1, true)?;
/// let output = engine.run(&input)?;
/// println!("class {} ({:.4})", output.prediction.index, output.prediction.value);
/// # Ok(())
/// # }
/// ```
pub struct InferenceEngine<S: EngineState = Idle> {
    config: RuntimeConfig,
    state: S,
}

// ── Idle → Planned ─────────────────────────────────────────────

impl InferenceEngine<Idle> {
    /// Creates a new engine from the given configuration.
    pub fn new(config: RuntimeConfig) -> Self {
        tracing::info!(
            seed = ?config.seed,
            profiling = config.enable_profiling,
            "engine created"
        );
        Self { config, state: Idle }
    }

    /// Loads and validates the pipeline named by `manifest_path`.
    /// Transitions to the `Planned` state.
    pub fn load_model(self) -> Result<InferenceEngine<Planned>, RuntimeError> {
        let path = self.config.manifest_path.as_deref().ok_or_else(|| {
            RuntimeError::ConfigError("no manifest_path configured".into())
        })?;
        let graph = ModelLoader::load(path)?;
        Ok(Self::from_graph(self.config, graph))
    }

    /// Wraps an already validated pipeline (built with `GraphBuilder`, say).
    pub fn from_graph(
        config: RuntimeConfig,
        graph: ModelGraph<Validated>,
    ) -> InferenceEngine<Planned> {
        tracing::info!("{}", graph.summary());
        InferenceEngine {
            config,
            state: Planned { graph },
        }
    }
}

// ── Planned → Ready ────────────────────────────────────────────

impl InferenceEngine<Planned> {
    /// Returns the pipeline graph.
    pub fn graph(&self) -> &ModelGraph<Validated> {
        &self.state.graph
    }

    /// Allocates and initializes every weight tensor and one activation
    /// tensor per layer. Transitions to the `Ready` state.
    pub fn prepare(self) -> Result<InferenceEngine<Ready>, RuntimeError> {
        let graph = self.state.graph;
        let mut init = self.config.weight_rng();

        let mut weights = Vec::with_capacity(graph.num_layers());
        let mut activations = Vec::with_capacity(graph.num_layers());
        for layer in graph.iter_layers() {
            weights.push(init.init_layer(layer)?);
            activations.push(Tensor::zeros(layer.output_shape)?);
        }

        tracing::info!(
            layers = graph.num_layers(),
            weight_bytes = graph.total_weight_bytes(),
            activation_bytes = graph.total_activation_bytes(),
            "engine prepared"
        );

        Ok(InferenceEngine {
            config: self.config,
            state: Ready {
                graph,
                weights,
                activations,
            },
        })
    }
}

// ── Ready: run inference ───────────────────────────────────────

impl InferenceEngine<Ready> {
    /// Returns the pipeline graph.
    pub fn graph(&self) -> &ModelGraph<Validated> {
        &self.state.graph
    }

    /// Borrows the weights of layer `index`.
    pub fn weights(&self, index: usize) -> Option<&LayerWeights> {
        self.state.weights.get(index)
    }

    /// Mutably borrows the weights of layer `index`, e.g. to install known
    /// values. Replacing a tensor with one of a different shape makes the
    /// next run fail with [`RuntimeError::ExecutionError`].
    pub fn weights_mut(&mut self, index: usize) -> Option<&mut LayerWeights> {
        self.state.weights.get_mut(index)
    }

    /// The output of layer `index` from the most recent run.
    pub fn activation(&self, index: usize) -> Option<&Tensor> {
        self.state.activations.get(index)
    }

    /// Runs one forward pass.
    ///
    /// Each layer reads its predecessor's activation (the first layer reads
    /// `input`) and overwrites its own. The final activation is cloned into
    /// the returned [`InferenceOutput`].
    ///
    /// # Errors
    /// - [`RuntimeError::InvalidInput`] if `input` does not have the
    ///   pipeline's input shape.
    /// - [`RuntimeError::ExecutionError`] if an operator rejects its operands
    ///   (only possible after weights were replaced via `weights_mut`).
    pub fn run(&mut self, input: &Tensor) -> Result<InferenceOutput, RuntimeError> {
        let run_start = Instant::now();
        let expected = self.state.graph.input_shape;
        if *input.shape() != expected {
            return Err(RuntimeError::InvalidInput {
                expected,
                actual: *input.shape(),
            });
        }

        let Ready {
            graph,
            weights,
            activations,
        } = &mut self.state;
        let mut metrics = InferenceMetrics::new(graph.num_layers());

        for (i, (layer, layer_weights)) in graph.iter_layers().zip(weights.iter()).enumerate() {
            let (done, rest) = activations.split_at_mut(i);
            let Some(output) = rest.first_mut() else {
                break;
            };
            let source = match done.last() {
                Some(prev) => prev.view(),
                None => input.view(),
            };

            let layer_start = Instant::now();
            execute_layer(layer, layer_weights, &source, output).map_err(|source| {
                RuntimeError::ExecutionError {
                    layer: layer.name.clone(),
                    source,
                }
            })?;
            let compute = layer_start.elapsed();

            tracing::debug!(
                layer = %layer.name,
                op = layer.layer_type.as_str(),
                elapsed_us = compute.as_micros() as u64,
                "layer executed"
            );
            if self.config.trace_activations {
                tracing::debug!(layer = %layer.name, "output:\n{output}");
            }
            if self.config.enable_profiling {
                metrics.record_layer(
                    layer.name.clone(),
                    layer.layer_type.as_str(),
                    compute,
                    output.num_elements(),
                );
            }
        }

        // A validated graph has at least one layer.
        let last = activations
            .last()
            .ok_or_else(|| model_ir::ModelError::InvalidGraph("pipeline has no layers".into()))?;
        let prediction = tensor_core::argmax(&last.view()).map_err(|source| {
            RuntimeError::ExecutionError {
                layer: "argmax".into(),
                source,
            }
        })?;

        metrics.finalise(run_start.elapsed());
        tracing::info!(
            class = prediction.index,
            score = prediction.value,
            "{}",
            metrics.summary()
        );

        Ok(InferenceOutput {
            output: last.clone(),
            prediction,
            metrics,
        })
    }

    /// Releases every weight and activation tensor and returns to `Planned`.
    pub fn release(self) -> InferenceEngine<Planned> {
        let Ready {
            graph,
            mut weights,
            mut activations,
        } = self.state;
        weights.iter_mut().for_each(LayerWeights::release);
        activations.iter_mut().for_each(Tensor::release);
        tracing::info!(model = %graph.name, "engine tensors released");

        InferenceEngine {
            config: self.config,
            state: Planned { graph },
        }
    }
}

/// Dispatches one layer to its tensor-core operator.
fn execute_layer(
    layer: &LayerDef,
    weights: &LayerWeights,
    input: &TensorView<'_>,
    output: &mut Tensor,
) -> Result<(), TensorError> {
    match layer.layer_type {
        LayerType::Conv2d { .. } => {
            let kernel = weights.weight_view("conv2d")?;
            let bias = weights.bias_view();
            tensor_core::conv2d(input, &kernel, bias.as_ref(), output)
        }
        LayerType::Relu => tensor_core::relu(input, output),
        LayerType::MaxPool2d { pool_size } => tensor_core::maxpool2d(input, pool_size, output),
        LayerType::Flatten => tensor_core::flatten(input, output),
        LayerType::Linear { .. } => {
            let matrix = weights.weight_view("linear")?;
            let bias = weights.bias_view();
            tensor_core::linear(input, &matrix, bias.as_ref(), output)
        }
    }
}

impl<S: EngineState> std::fmt::Debug for InferenceEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("state", &std::any::type_name::<S>())
            .field("seed", &self.config.seed)
            .field("profiling", &self.config.enable_profiling)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model_ir::GraphBuilder;
    use tensor_core::Shape;

    fn tiny_graph() -> ModelGraph<Validated> {
        GraphBuilder::new("tiny", Shape::new(4, 4, 1))
            .conv2d("conv", 2, 3)
            .relu("relu")
            .maxpool2d("pool", 2)
            .flatten("flatten")
            .linear("fc", 3)
            .build()
            .unwrap()
    }

    fn ready(seed: u64) -> InferenceEngine<Ready> {
        let config = RuntimeConfig::default().with_seed(seed);
        InferenceEngine::from_graph(config, tiny_graph())
            .prepare()
            .unwrap()
    }

    #[test]
    fn test_idle_to_planned() {
        let engine = InferenceEngine::from_graph(RuntimeConfig::default(), tiny_graph());
        assert_eq!(engine.graph().num_layers(), 5);
    }

    #[test]
    fn test_load_model_without_manifest() {
        let err = InferenceEngine::new(RuntimeConfig::default())
            .load_model()
            .unwrap_err();
        assert!(matches!(err, RuntimeError::ConfigError(_)));
    }

    #[test]
    fn test_prepare_allocates_everything() {
        let engine = ready(1);
        for (i, layer) in engine.graph().iter_layers().enumerate() {
            assert_eq!(*engine.activation(i).unwrap().shape(), layer.output_shape);
            let w = engine.weights(i).unwrap();
            assert_eq!(w.weight.is_some(), !layer.weight_shapes.is_empty());
        }
        assert!(engine.activation(5).is_none());
    }

    #[test]
    fn test_run() {
        let mut engine = ready(1);
        let input = Tensor::new(4, 4, 1, true).unwrap();
        let out = engine.run(&input).unwrap();

        assert_eq!(*out.output.shape(), Shape::vector(3));
        assert!(out.prediction.index < 3);
        assert_eq!(out.output.as_slice()[out.prediction.index], out.prediction.value);
        assert_eq!(out.metrics.layer_metrics.len(), 5);
        assert_eq!(out.metrics.layer_metrics[2].output_elements, 8);

        // relu output is non-negative.
        assert!(engine.activation(1).unwrap().as_slice().iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_run_is_repeatable() {
        let mut engine = ready(9);
        let input = Tensor::new(4, 4, 1, true).unwrap();
        let first = engine.run(&input).unwrap();
        let second = engine.run(&input).unwrap();
        assert_eq!(first.output, second.output);
    }

    #[test]
    fn test_run_rejects_wrong_input_shape() {
        let mut engine = ready(1);
        let input = Tensor::zeros(Shape::new(4, 4, 2)).unwrap();
        let err = engine.run(&input).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::InvalidInput { expected, actual }
                if expected == Shape::new(4, 4, 1) && actual == Shape::new(4, 4, 2)
        ));
    }

    #[test]
    fn test_bad_installed_weights() {
        let mut engine = ready(1);
        engine.weights_mut(0).unwrap().weight = Some(Tensor::zeros(Shape::new(3, 3, 5)).unwrap());
        let input = Tensor::zeros(Shape::new(4, 4, 1)).unwrap();
        let err = engine.run(&input).unwrap_err();
        assert!(matches!(err, RuntimeError::ExecutionError { ref layer, .. } if layer == "conv"));
    }

    #[test]
    fn test_profiling_disabled() {
        let config = RuntimeConfig {
            enable_profiling: false,
            ..RuntimeConfig::default()
        };
        let mut engine = InferenceEngine::from_graph(config, tiny_graph())
            .prepare()
            .unwrap();
        let out = engine.run(&Tensor::zeros(Shape::new(4, 4, 1)).unwrap()).unwrap();
        assert!(out.metrics.layer_metrics.is_empty());
        assert_eq!(out.metrics.num_layers, 5);
    }

    #[test]
    fn test_release_and_prepare_again() {
        let planned = ready(1).release();
        assert_eq!(planned.graph().num_layers(), 5);
        let mut engine = planned.prepare().unwrap();
        assert!(engine.run(&Tensor::zeros(Shape::new(4, 4, 1)).unwrap()).is_ok());
    }

    #[test]
    fn test_debug_format() {
        let engine = InferenceEngine::new(RuntimeConfig::default().with_seed(5));
        let debug = format!("{engine:?}");
        assert!(debug.contains("InferenceEngine"));
        assert!(debug.contains("Idle"));
        assert!(debug.contains("Some(5)"));
    }
}
