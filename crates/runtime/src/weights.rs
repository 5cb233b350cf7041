// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Weight allocation and initialization.
//!
//! Weights are never read from disk. [`WeightInitializer`] allocates each
//! weight tensor a layer declares and fills it with Xavier-style values,
//! either from the process-wide RNG or from a private seeded generator.

use crate::RuntimeError;
use model_ir::LayerDef;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tensor_core::{Shape, Tensor, TensorError, TensorView};

/// Source of random weight values.
#[derive(Debug, Clone)]
pub enum WeightInitializer {
    /// Draw from the global RNG (seeded from entropy on first use).
    Global,
    /// Draw from a private generator; identical seeds give identical weights.
    Seeded(StdRng),
}

impl WeightInitializer {
    pub fn global() -> Self {
        Self::Global
    }

    pub fn seeded(seed: u64) -> Self {
        Self::Seeded(StdRng::seed_from_u64(seed))
    }

    /// Allocates a tensor of `shape` and randomizes it.
    pub fn allocate(&mut self, shape: Shape) -> Result<Tensor, TensorError> {
        let mut tensor = Tensor::zeros(shape)?;
        match self {
            Self::Global => tensor.randomize(),
            Self::Seeded(rng) => tensor.randomize_with(rng),
        }
        Ok(tensor)
    }

    /// Allocates every weight tensor `layer` declares, weight first, then bias.
    pub fn init_layer(&mut self, layer: &LayerDef) -> Result<LayerWeights, RuntimeError> {
        let mut tensors = Vec::with_capacity(layer.weight_shapes.len());
        for shape in &layer.weight_shapes {
            let tensor = self
                .allocate(*shape)
                .map_err(|source| RuntimeError::WeightInitError {
                    layer: layer.name.clone(),
                    source,
                })?;
            tensors.push(tensor);
        }

        let mut tensors = tensors.into_iter();
        let weights = LayerWeights {
            weight: tensors.next(),
            bias: tensors.next(),
        };
        tracing::debug!(
            layer = %layer.name,
            bytes = weights.size_bytes(),
            "weights initialized"
        );
        Ok(weights)
    }
}

/// The parameter tensors owned by one layer.
///
/// Parameter-free layers (relu, pooling, flatten) hold neither.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerWeights {
    pub weight: Option<Tensor>,
    pub bias: Option<Tensor>,
}

impl LayerWeights {
    /// Borrows the weight tensor, or reports it missing for `op`.
    pub fn weight_view(&self, op: &'static str) -> Result<TensorView<'_>, TensorError> {
        self.weight
            .as_ref()
            .map(Tensor::view)
            .ok_or(TensorError::NullOperand {
                op,
                operand: "weights",
            })
    }

    pub fn bias_view(&self) -> Option<TensorView<'_>> {
        self.bias.as_ref().map(Tensor::view)
    }

    /// Bytes held by the weight and bias buffers.
    pub fn size_bytes(&self) -> usize {
        [&self.weight, &self.bias]
            .into_iter()
            .flatten()
            .map(|t| t.shape().size_bytes())
            .sum()
    }

    /// Releases both tensors.
    pub fn release(&mut self) {
        tensor_core::release(&mut self.weight);
        tensor_core::release(&mut self.bias);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model_ir::LayerType;

    fn conv_layer(bias: bool) -> LayerDef {
        let lt = LayerType::Conv2d {
            out_channels: 4,
            kernel_size: 3,
            bias,
        };
        LayerDef::new(0, "conv1", lt, Shape::new(16, 16, 1)).unwrap()
    }

    #[test]
    fn test_init_conv_layer() {
        let weights = WeightInitializer::seeded(3).init_layer(&conv_layer(true)).unwrap();
        let w = weights.weight.as_ref().unwrap();
        let b = weights.bias.as_ref().unwrap();
        assert_eq!(*w.shape(), Shape::new(3, 3, 4));
        assert_eq!(*b.shape(), Shape::vector(4));
        assert_eq!(weights.size_bytes(), (36 + 4) * 4);

        let bound = (1.0 / 36.0f32).sqrt();
        assert!(w.as_slice().iter().all(|v| v.abs() <= bound));
        assert!(w.as_slice().iter().any(|&v| v != 0.0));
    }

    #[test]
    fn test_init_without_bias() {
        let weights = WeightInitializer::seeded(3).init_layer(&conv_layer(false)).unwrap();
        assert!(weights.weight.is_some());
        assert!(weights.bias.is_none());
        assert!(weights.bias_view().is_none());
    }

    #[test]
    fn test_parameter_free_layer() {
        let layer = LayerDef::new(1, "relu", LayerType::Relu, Shape::new(4, 4, 1)).unwrap();
        let weights = WeightInitializer::global().init_layer(&layer).unwrap();
        assert_eq!(weights, LayerWeights::default());
        assert!(matches!(
            weights.weight_view("conv2d"),
            Err(TensorError::NullOperand { operand: "weights", .. })
        ));
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = WeightInitializer::seeded(42).init_layer(&conv_layer(true)).unwrap();
        let b = WeightInitializer::seeded(42).init_layer(&conv_layer(true)).unwrap();
        let c = WeightInitializer::seeded(43).init_layer(&conv_layer(true)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_release() {
        let mut weights = WeightInitializer::seeded(1).init_layer(&conv_layer(true)).unwrap();
        weights.release();
        assert!(weights.weight.is_none() && weights.bias.is_none());
        assert_eq!(weights.size_bytes(), 0);
        weights.release();
    }
}
