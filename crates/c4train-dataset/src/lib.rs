//! Typed training-sample containers for the Connect-4 model.
//!
//! A training batch is a record of parallel arrays: every field stores one row per
//! sample, and row `i` of every field describes the same position. [`Dataset`]
//! enforces that all fields present agree on the sample count, and [`Field`] names
//! the arrays the training pipeline knows about.
//!
//! # Fields
//!
//! | Field | Shape | Required |
//! |---|---|---|
//! | `X` | (N, 6, 7, 2) | yes |
//! | `policy` | (N, 7) | yes |
//! | `value` | (N, 1) | yes |
//! | `boards` | (N, 6, 7) | no |
//! | `visits` | (N, 7) | no |
//! | `scores` | (N, 7) | no |
//! | `q` | (N, 7) | no |
//!
//! Only the leading (sample) dimension is checked; trailing shapes are the
//! producer's responsibility.
//!
//! # Building batches
//!
//! Positions are usually produced by self-play. [`Position`] replays a move list
//! with gravity and emits the occupancy planes and raw cell grid, and
//! [`SampleBatch`] assembles per-sample records into a [`Dataset`].
//!
//! ```
//! use c4train_dataset::{Field, Position, Sample, SampleBatch};
//!
//! let position = Position::from_moves([3, 3, 2])?;
//! let mut batch = SampleBatch::new();
//! batch.push(Sample::new(position, [0.0, 0.1, 0.2, 0.4, 0.2, 0.1, 0.0], 0.5));
//! let dataset = batch.build()?;
//!
//! assert_eq!(dataset.len(), 1);
//! assert_eq!(dataset.require(Field::X)?.shape(), &[1, 6, 7, 2]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::{batch::*, core::*, dataset::*, field::*};

mod batch;
pub mod core;
mod dataset;
mod field;

/// A required field is absent from a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("required field `{field}` not found in dataset")]
pub struct MissingFieldError {
    pub field: Field,
}

/// A field array cannot be stored alongside the fields already present.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum AlignmentError {
    #[display("field `{field}` has no sample axis")]
    MissingSampleAxis { field: Field },
    #[display("field `{field}` has {actual} samples, but the dataset has {expected}")]
    SampleCountMismatch {
        field: Field,
        expected: usize,
        actual: usize,
    },
}
