//! Left-right mirroring augmentation.
//!
//! Connect-4 is symmetric under horizontal reflection: reversing the columns of a
//! position and of every column-indexed target yields another valid training
//! sample with the same outcome. [`mirror`] appends the reflected copy of every
//! sample to the batch.
//!
//! # Field Handling
//!
//! | Field | Reflection |
//! |---|---|
//! | `X` | columns reversed (axis 2); rows and planes untouched |
//! | `boards` | columns reversed (axis 2) |
//! | `policy`, `visits`, `scores`, `q` | entries reversed (axis 1): 0↔6, 1↔5, 2↔4 |
//! | `value` | copied unchanged |
//!
//! # Duplicates
//!
//! Mirrored samples are appended even when they are identical to an existing
//! sample or to themselves (symmetric positions). Sample multiplicity carries the
//! search visitation frequency, so the batch is never deduplicated here; depth
//! imbalance is handled by [`balance`](crate::balance) through loss weights.

use c4train_dataset::{Dataset, Field, MissingFieldError};
use ndarray::ArrayViewD;
use serde::Serialize;

use crate::observer::Observer;

/// Diagnostics of one [`mirror`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MirrorReport {
    pub samples_before: usize,
    pub samples_after: usize,
    /// Fields present in the output, in field order.
    pub fields: Vec<Field>,
}

/// Reflects the rows of `field` left to right.
///
/// Returns a view; no data is copied. Orientation-invariant fields are returned
/// as-is.
///
/// # Panics
///
/// Panics if `rows` has fewer axes than the field's column axis requires.
#[must_use]
pub fn flip_columns(field: Field, mut rows: ArrayViewD<'_, f32>) -> ArrayViewD<'_, f32> {
    if let Some(axis) = field.column_axis() {
        rows.invert_axis(axis);
    }
    rows
}

/// Returns a new dataset holding the original samples followed by their mirror
/// images.
///
/// The input must contain `X`, `policy` and `value`; optional fields are mirrored
/// when present and stay absent otherwise. The output has `2 * N` samples, where
/// sample `N + i` is the reflection of sample `i`.
///
/// # Example
///
/// ```
/// use c4train_dataset::{Field, Position, Sample, SampleBatch};
/// use c4train_transform::mirror::mirror;
///
/// let position = Position::from_moves([0])?;
/// let policy = [0.4, 0.3, 0.1, 0.1, 0.05, 0.05, 0.0];
/// let dataset = SampleBatch::from_iter([Sample::new(position, policy, 1.0)]).build()?;
///
/// let mirrored = mirror(&dataset, &mut ())?;
/// assert_eq!(mirrored.len(), 2);
///
/// let policy = mirrored.require(Field::Policy)?;
/// assert_eq!(policy[[1, 0]], 0.0);
/// assert_eq!(policy[[1, 6]], 0.4);
/// let x = mirrored.require(Field::X)?;
/// assert_eq!(x[[1, 5, 6, 0]], 1.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn mirror<O>(dataset: &Dataset, observer: &mut O) -> Result<Dataset, MissingFieldError>
where
    O: Observer + ?Sized,
{
    dataset.require_all(Field::REQUIRED)?;

    let mirrored = dataset.append_transformed(flip_columns);

    observer.on_mirror(&MirrorReport {
        samples_before: dataset.len(),
        samples_after: mirrored.len(),
        fields: mirrored.fields().collect(),
    });
    Ok(mirrored)
}
