// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Property tests for tensor accessors and operators.

use proptest::prelude::*;
use tensor_core::{flatten, maxpool2d, relu, relu_inplace, Shape, Tensor};

fn small_dims() -> impl Strategy<Value = (usize, usize, usize)> {
    (1usize..8, 1usize..8, 1usize..5)
}

fn tensor_with_values() -> impl Strategy<Value = Tensor> {
    small_dims().prop_flat_map(|(w, h, c)| {
        proptest::collection::vec(-100.0f32..100.0, w * h * c)
            .prop_map(move |v| Tensor::from_f32(Shape::new(w, h, c), &v).unwrap())
    })
}

proptest! {
    #[test]
    fn fresh_tensor_is_zero((w, h, c) in small_dims()) {
        let t = Tensor::new(w, h, c, false).unwrap();
        for ci in 0..c {
            for hi in 0..h {
                for wi in 0..w {
                    prop_assert_eq!(t.get_clamped(wi, hi, ci), 0.0);
                }
            }
        }
    }

    #[test]
    fn set_then_get_roundtrips(
        (w, h, c) in small_dims(),
        seed in any::<(usize, usize, usize)>(),
        value in -1e6f32..1e6,
    ) {
        let mut t = Tensor::new(w, h, c, false).unwrap();
        let (wi, hi, ci) = (seed.0 % w, seed.1 % h, seed.2 % c);
        t.set_clamped(wi, hi, ci, value);
        prop_assert_eq!(t.get_clamped(wi, hi, ci), value);
        prop_assert_eq!(t.as_slice().iter().filter(|&&x| x != 0.0).count(), usize::from(value != 0.0));
    }

    #[test]
    fn out_of_range_access_is_inert(
        t in tensor_with_values(),
        seed in any::<(usize, usize, usize)>(),
        outside in 1u8..8,
    ) {
        // Bit i of `outside` pushes axis i past its bound; the others stay in range.
        let s = *t.shape();
        let coord = |axis: u8, raw: usize, bound: usize| {
            if outside & (1 << axis) != 0 {
                bound + raw % (usize::MAX - bound)
            } else {
                raw % bound
            }
        };
        let (w, h, c) = (
            coord(0, seed.0, s.width),
            coord(1, seed.1, s.height),
            coord(2, seed.2, s.channels),
        );
        prop_assert_eq!(t.get_clamped(w, h, c), 0.0);
        prop_assert_eq!(t.try_get(w, h, c), None);
        prop_assert_eq!(t.view().get_clamped(w, h, c), 0.0);

        let mut written = t.clone();
        written.set_clamped(w, h, c, 1.0);
        prop_assert_eq!(written, t);
    }

    #[test]
    fn relu_is_idempotent_and_non_negative(t in tensor_with_values()) {
        let mut once = Tensor::zeros(*t.shape()).unwrap();
        relu(&t.view(), &mut once).unwrap();
        prop_assert!(once.as_slice().iter().all(|&x| x >= 0.0));

        let mut twice = once.clone();
        relu_inplace(&mut twice).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn flatten_then_reshape_is_lossless(t in tensor_with_values()) {
        let mut flat = Tensor::zeros(Shape::vector(t.num_elements())).unwrap();
        flatten(&t.view(), &mut flat).unwrap();

        let back = flat.view_as(*t.shape()).unwrap();
        prop_assert_eq!(back.as_slice(), t.as_slice());
    }

    #[test]
    fn maxpool_unit_window_is_identity(t in tensor_with_values()) {
        let mut out = Tensor::zeros(*t.shape()).unwrap();
        maxpool2d(&t.view(), 1, &mut out).unwrap();
        prop_assert_eq!(out, t);
    }

    #[test]
    fn randomized_values_respect_xavier_bound((w, h, c) in small_dims()) {
        let t = Tensor::new(w, h, c, true).unwrap();
        let bound = 1.0 / ((w * h * c) as f32).sqrt();
        prop_assert!(t.as_slice().iter().all(|&x| x.abs() <= bound * (1.0 + 1e-6)));
    }
}
