//! Uniform-width binning
//!
//! This module splits a numeric range into equal-width, half-open bins and assigns
//! values to them. The semantics follow the usual array-library conventions so bin
//! assignments are reproducible across tooling:
//!
//! - [`linspace`] produces evenly spaced edges whose last edge is exactly `stop`
//! - [`UniformBins::digitize`] returns the number of edges `<= value`
//! - [`UniformBins::bin_index`] maps that to a bin id clipped into `[0, num_bins)`
//! - [`bincount`] tallies bin ids, reporting empty bins as zero
//!
//! # Integer Ranges
//!
//! For integer-valued data with observed range `[min, max]`, [`UniformBins::spanning`]
//! places the edges over `[min, max + 1]`. The extra unit keeps `max` strictly below
//! the last edge, so it falls inside a bin instead of on the exclusive upper
//! boundary.
//!
//! # Examples
//!
//! ```
//! use std::num::NonZeroUsize;
//!
//! use c4train_stats::binning::{UniformBins, bincount};
//!
//! let bins = UniformBins::spanning(2, 8, NonZeroUsize::new(2).unwrap());
//! assert_eq!(bins.edges(), &[2.0, 5.5, 9.0]);
//!
//! let ids = [2, 2, 2, 8].map(|v| bins.bin_index(f64::from(v)));
//! assert_eq!(ids, [0, 0, 0, 1]);
//! assert_eq!(bincount(&ids, bins.num_bins()), vec![3, 1]);
//! ```

use std::num::NonZeroUsize;

/// Returns `num` evenly spaced values over the closed interval `[start, stop]`.
///
/// Each interior value is computed as `start + i * step` rather than by repeated
/// addition, and the last value is set to `stop` exactly.
///
/// # Examples
///
/// ```
/// use c4train_stats::binning::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(3.0, 7.0, 1), vec![3.0]);
/// assert!(linspace(0.0, 1.0, 0).is_empty());
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut values = (0..num)
                .map(|i| start + i as f64 * step)
                .collect::<Vec<_>>();
            values[num - 1] = stop;
            values
        }
    }
}

/// Counts occurrences of each bin id.
///
/// The result has length `max(minlength, max_id + 1)`; ids never seen count as 0.
///
/// # Examples
///
/// ```
/// use c4train_stats::binning::bincount;
///
/// assert_eq!(bincount(&[0, 2, 2], 4), vec![1, 0, 2, 0]);
/// assert_eq!(bincount(&[5], 2), vec![0, 0, 0, 0, 0, 1]);
/// assert_eq!(bincount(&[], 3), vec![0, 0, 0]);
/// ```
#[must_use]
pub fn bincount(ids: &[usize], minlength: usize) -> Vec<usize> {
    let len = ids
        .iter()
        .copied()
        .max()
        .map_or(minlength, |max_id| minlength.max(max_id + 1));
    let mut counts = vec![0; len];
    for &id in ids {
        counts[id] += 1;
    }
    counts
}

/// Equal-width bins described by their `num_bins + 1` edges.
///
/// Bin `b` covers the half-open interval `[edges[b], edges[b + 1])`.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformBins {
    edges: Vec<f64>,
}

impl UniformBins {
    /// Creates `num_bins` equal-width bins over `[start, stop]`.
    #[must_use]
    pub fn new(start: f64, stop: f64, num_bins: NonZeroUsize) -> Self {
        Self {
            edges: linspace(start, stop, num_bins.get() + 1),
        }
    }

    /// Creates bins covering every integer in `[min, max]`.
    ///
    /// Edges span `[min, max + 1]`, so both `min` and `max` fall inside a bin.
    #[must_use]
    pub fn spanning(min: u32, max: u32, num_bins: NonZeroUsize) -> Self {
        Self::new(f64::from(min), f64::from(max) + 1.0, num_bins)
    }

    #[must_use]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    #[must_use]
    pub fn num_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Number of edges less than or equal to `value`.
    ///
    /// A value in bin `b` yields `b + 1`; values below the first edge yield 0 and
    /// values at or beyond the last edge yield `num_bins + 1`.
    #[must_use]
    pub fn digitize(&self, value: f64) -> usize {
        self.edges.partition_point(|&edge| edge <= value)
    }

    /// Bin id of `value`, clipped into `[0, num_bins - 1]`.
    ///
    /// Values outside the edges are absorbed by the first or last bin.
    #[must_use]
    pub fn bin_index(&self, value: f64) -> usize {
        self.digitize(value)
            .saturating_sub(1)
            .min(self.num_bins() - 1)
    }
}
