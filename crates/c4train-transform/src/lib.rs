//! Training-sample preparation for Connect-4 self-play data.
//!
//! This crate turns a raw self-play batch into what the network trainer consumes:
//! a symmetry-augmented dataset and a per-sample loss weight that compensates for
//! the over-representation of early-game positions.
//!
//! # How Preparation Works
//!
//! 1. **Mirror** - Append the left-right reflection of every sample, reversing
//!    columns of the occupancy planes and column-indexed targets
//! 2. **Move counts** - Count stones on each board as a proxy for game depth
//! 3. **Binning** - Split the observed move-count range into equal-width bins
//! 4. **Weighting** - Give each sample the inverse frequency of its bin,
//!    normalized so the weights average to 1
//!
//! # Architecture
//!
//! ```text
//! Dataset (c4train-dataset)
//!     ↓ mirror
//! Dataset with 2N samples
//!     ↓ balance
//! Sample weights (mean 1)
//!     ↓ reported to
//! Observer (tracing, recording, or nothing)
//! ```
//!
//! Transforms never mutate their input and never log directly. Diagnostics go to
//! the [`Observer`](observer::Observer) passed in by the caller;
//! [`TracingObserver`](observer::TracingObserver) forwards them to `tracing`.
//!
//! # Modules
//!
//! - [`mirror`]: Left-right reflection augmentation
//! - [`balance`]: Move-depth inverse-frequency weighting
//! - [`pipeline`]: Both steps in order, driven by a [`PrepareConfig`](config::PrepareConfig)
//! - [`config`]: Serializable settings
//! - [`observer`]: Diagnostics sinks
//!
//! # Example
//!
//! ```
//! use c4train_dataset::{Field, Position, Sample, SampleBatch};
//! use c4train_transform::{
//!     balance::{DEFAULT_NUM_BINS, balance},
//!     mirror::mirror,
//!     observer::TracingObserver,
//! };
//!
//! let dataset = [vec![3], vec![3, 3], vec![0, 1, 2, 3, 4, 5, 6]]
//!     .into_iter()
//!     .map(|moves| Position::from_moves(moves).map(|p| Sample::new(p, [1.0 / 7.0; 7], 0.0)))
//!     .collect::<Result<SampleBatch, _>>()?
//!     .build()?;
//!
//! let mut observer = TracingObserver;
//! let mirrored = mirror(&dataset, &mut observer)?;
//! let balanced = balance(&mirrored, DEFAULT_NUM_BINS, &mut observer)?;
//!
//! assert_eq!(balanced.dataset.require(Field::X)?.shape(), &[6, 6, 7, 2]);
//! assert_eq!(balanced.sample_weights.len(), 6);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod balance;
pub mod config;
pub mod mirror;
pub mod observer;
pub mod pipeline;
