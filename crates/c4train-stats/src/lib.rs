//! Statistical utilities for preparing Connect-4 training data.
//!
//! This crate provides the small set of numeric tools the sample-weighting code
//! builds on:
//!
//! - **Uniform binning**: Equal-width, half-open bins with clipped bin assignment
//!   and per-bin counts
//! - **Descriptive statistics**: Single-pass count, min, max, mean and standard
//!   deviation for diagnostics
//!
//! # Modules
//!
//! - [`binning`]: Bin edges, bin assignment and bin counts
//! - [`descriptive`]: Summary statistics of a batch of values
//!
//! # Examples
//!
//! ## Assigning values to bins
//!
//! ```
//! use std::num::NonZeroUsize;
//!
//! use c4train_stats::binning::{UniformBins, bincount};
//!
//! let move_counts = [0, 1, 2, 2, 3, 10, 20, 41];
//! let bins = UniformBins::spanning(0, 41, NonZeroUsize::new(6).unwrap());
//! let ids = move_counts.map(|m| bins.bin_index(f64::from(m)));
//!
//! let counts = bincount(&ids, bins.num_bins());
//! assert_eq!(counts.iter().sum::<usize>(), move_counts.len());
//! assert_eq!(counts[0], 5);
//! ```
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use c4train_stats::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new([0.5, 1.0, 1.5]).unwrap();
//! assert_eq!(stats.mean, 1.0);
//! assert_eq!(stats.range(), 1.0);
//! ```

pub mod binning;
pub mod descriptive;
