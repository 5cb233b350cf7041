// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Human-readable tensor dumps for diagnostics.
//!
//! Small tensors (at most [`FULL_DUMP_LIMIT`] elements) are printed in full,
//! grouped by channel and row. Larger tensors get a size line, min/max/mean
//! statistics and a 3x3 sample of at most three channels.

use crate::{Tensor, TensorView};
use std::fmt::{self, Write};

/// Tensors with more elements than this are summarised instead of dumped.
pub const FULL_DUMP_LIMIT: usize = 100;

const SAMPLE_EDGE: usize = 3;
const SAMPLE_CHANNELS: usize = 3;

/// Summary statistics over a tensor buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

impl Stats {
    /// Computes statistics in buffer order. Returns `None` for an empty buffer.
    pub fn of(data: &[f32]) -> Option<Self> {
        let (&first, _) = data.split_first()?;
        let (min, max, sum) = data
            .iter()
            .fold((first, first, 0.0f32), |(lo, hi, sum), &x| {
                (lo.min(x), hi.max(x), sum + x)
            });
        Some(Self {
            min,
            max,
            mean: sum / data.len() as f32,
        })
    }
}

fn render_view(view: &TensorView<'_>, f: &mut impl Write) -> fmt::Result {
    if view.is_released() {
        return writeln!(f, "Tensor[released]");
    }

    let s = *view.shape();
    writeln!(f, "Tensor[{}, {}, {}] {{", s.channels, s.height, s.width)?;

    match Stats::of(view.as_slice()) {
        Some(stats) if view.num_elements() > FULL_DUMP_LIMIT => {
            writeln!(
                f,
                "  Size: {} channels × {} height × {} width = {} elements",
                s.channels,
                s.height,
                s.width,
                view.num_elements(),
            )?;
            writeln!(
                f,
                "  Statistics: min={:.4}, max={:.4}, mean={:.4}",
                stats.min, stats.max, stats.mean,
            )?;
            writeln!(f, "  Sample data (first 3×3 of each channel):")?;

            let shown = s.channels.min(SAMPLE_CHANNELS);
            for c in 0..shown {
                writeln!(f, "    Channel {c}:")?;
                for h in 0..s.height.min(SAMPLE_EDGE) {
                    write!(f, "      ")?;
                    for w in 0..s.width.min(SAMPLE_EDGE) {
                        write!(f, "{:8.4} ", view.get_clamped(w, h, c))?;
                    }
                    if s.width > SAMPLE_EDGE {
                        write!(f, "...")?;
                    }
                    writeln!(f)?;
                }
                if s.height > SAMPLE_EDGE {
                    writeln!(f, "      ...")?;
                }
                if c + 1 < s.channels {
                    writeln!(f)?;
                }
            }
            if s.channels > SAMPLE_CHANNELS {
                writeln!(f, "    ... ({} more channels)", s.channels - SAMPLE_CHANNELS)?;
            }
        }
        _ => {
            for c in 0..s.channels {
                if s.channels > 1 {
                    writeln!(f, "  Channel {c}:")?;
                }
                for h in 0..s.height {
                    write!(f, "    ")?;
                    for w in 0..s.width {
                        write!(f, "{:8.4} ", view.get_clamped(w, h, c))?;
                    }
                    writeln!(f)?;
                }
                if c + 1 < s.channels {
                    writeln!(f)?;
                }
            }
        }
    }

    writeln!(f, "}}")
}

impl fmt::Display for TensorView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_view(self, f)
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_view(&self.view(), f)
    }
}

impl Tensor {
    /// Renders the diagnostic dump into a `String`.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Shape;

    #[test]
    fn test_small_tensor_full_dump() {
        let t = Tensor::from_f32(Shape::new(2, 1, 2), &[1.0, -2.0, 3.0, 0.5]).unwrap();
        let expected = "Tensor[2, 1, 2] {\n  Channel 0:\n      1.0000  -2.0000 \n\n  Channel 1:\n      3.0000   0.5000 \n}\n";
        assert_eq!(t.render(), expected);
    }

    #[test]
    fn test_single_channel_has_no_label() {
        let t = Tensor::from_f32(Shape::new(2, 2, 1), &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let out = t.render();
        assert!(!out.contains("Channel"));
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn test_large_tensor_summary() {
        let mut t = Tensor::new(4, 4, 8, false).unwrap();
        t.set_clamped(0, 0, 0, -1.0);
        t.set_clamped(3, 3, 7, 2.0);
        let out = t.render();

        assert!(out.starts_with("Tensor[8, 4, 4] {\n"));
        assert!(out.contains("  Size: 8 channels × 4 height × 4 width = 128 elements"));
        assert!(out.contains("min=-1.0000, max=2.0000, mean=0.0078"));
        assert!(out.contains("    Channel 2:"));
        assert!(!out.contains("Channel 3:"));
        assert!(out.contains("    ... (5 more channels)"));
        assert!(out.contains("..."));
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn test_sample_reads_width_height_channel() {
        let mut t = Tensor::new(11, 10, 1, false).unwrap();
        t.set_clamped(2, 0, 0, 5.0);
        let out = t.render();
        let first_row = out
            .lines()
            .find(|l| l.starts_with("      ") && !l.trim().starts_with("..."))
            .unwrap();
        assert_eq!(first_row, "        0.0000   0.0000   5.0000 ...");
    }

    #[test]
    fn test_released_render() {
        let mut t = Tensor::new(2, 2, 1, false).unwrap();
        t.release();
        assert_eq!(t.render(), "Tensor[released]\n");
    }

    #[test]
    fn test_stats() {
        let s = Stats::of(&[1.0, -3.0, 5.0]).unwrap();
        assert_eq!(s.min, -3.0);
        assert_eq!(s.max, 5.0);
        assert!((s.mean - 1.0).abs() < 1e-6);
        assert!(Stats::of(&[]).is_none());
    }
}
