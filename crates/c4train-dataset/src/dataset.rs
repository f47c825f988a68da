use std::collections::{BTreeMap, btree_map};

use ndarray::{ArrayD, ArrayViewD, Axis, Slice};

use crate::{AlignmentError, Field, MissingFieldError};

/// A batch of training samples stored as parallel arrays.
///
/// Each field maps to an array whose leading axis is the sample axis. All fields
/// present share the same sample count; insertion rejects arrays that would break
/// this.
///
/// # Example
///
/// ```
/// use c4train_dataset::{Dataset, Field};
/// use ndarray::ArrayD;
///
/// let dataset = Dataset::new()
///     .with(Field::Policy, ArrayD::zeros(vec![4, 7]))?
///     .with(Field::Value, ArrayD::zeros(vec![4, 1]))?;
/// assert_eq!(dataset.len(), 4);
///
/// // A field with a different sample count is rejected.
/// assert!(dataset.clone().with(Field::Q, ArrayD::zeros(vec![3, 7])).is_err());
/// # Ok::<(), c4train_dataset::AlignmentError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    fields: BTreeMap<Field, ArrayD<f32>>,
}

impl Dataset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `array` under `field`, returning the array previously stored there.
    ///
    /// Replacing the only field present may change the sample count; otherwise the
    /// leading dimension of `array` must match the other fields.
    pub fn insert(
        &mut self,
        field: Field,
        array: ArrayD<f32>,
    ) -> Result<Option<ArrayD<f32>>, AlignmentError> {
        let Some(&actual) = array.shape().first() else {
            return Err(AlignmentError::MissingSampleAxis { field });
        };
        let expected = self
            .fields
            .iter()
            .find(|(other, _)| **other != field)
            .map(|(_, other)| other.len_of(Axis(0)));
        if let Some(expected) = expected
            && expected != actual
        {
            return Err(AlignmentError::SampleCountMismatch {
                field,
                expected,
                actual,
            });
        }
        Ok(self.fields.insert(field, array))
    }

    /// Builder form of [`Dataset::insert`].
    pub fn with(mut self, field: Field, array: ArrayD<f32>) -> Result<Self, AlignmentError> {
        self.insert(field, array)?;
        Ok(self)
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&ArrayD<f32>> {
        self.fields.get(&field)
    }

    pub fn require(&self, field: Field) -> Result<&ArrayD<f32>, MissingFieldError> {
        self.get(field).ok_or(MissingFieldError { field })
    }

    /// Checks that every field in `fields` is present, reporting the first one missing.
    pub fn require_all<I>(&self, fields: I) -> Result<(), MissingFieldError>
    where
        I: IntoIterator<Item = Field>,
    {
        fields
            .into_iter()
            .try_for_each(|field| self.require(field).map(|_| ()))
    }

    pub fn remove(&mut self, field: Field) -> Option<ArrayD<f32>> {
        self.fields.remove(&field)
    }

    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields.keys().copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Field, ArrayD<f32>> {
        self.fields.iter()
    }

    /// Number of samples, or 0 for a dataset without fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields
            .values()
            .next()
            .map_or(0, |array| array.len_of(Axis(0)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a dataset with twice the rows: every field's original rows followed by
    /// `transform(field, rows)`.
    ///
    /// Row `i` of the appended half is derived from row `i` of the original, so the
    /// result stays aligned across fields. Nothing is deduplicated.
    ///
    /// # Panics
    ///
    /// Panics if `transform` returns an array whose shape differs from its input.
    ///
    /// # Example
    ///
    /// ```
    /// use c4train_dataset::{Dataset, Field};
    /// use ndarray::{ArrayD, Axis, IxDyn};
    ///
    /// let policy = ArrayD::from_shape_vec(IxDyn(&[1, 7]), (0..7).map(|v| v as f32).collect())?;
    /// let dataset = Dataset::new().with(Field::Policy, policy)?;
    /// let doubled = dataset.append_transformed(|_, mut rows| {
    ///     rows.invert_axis(Axis(1));
    ///     rows
    /// });
    ///
    /// assert_eq!(doubled.len(), 2);
    /// let policy = doubled.get(Field::Policy).unwrap();
    /// assert_eq!(policy[[0, 0]], 0.0);
    /// assert_eq!(policy[[1, 0]], 6.0);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[must_use]
    pub fn append_transformed<F>(&self, mut transform: F) -> Self
    where
        F: for<'a> FnMut(Field, ArrayViewD<'a, f32>) -> ArrayViewD<'a, f32>,
    {
        let fields = self
            .fields
            .iter()
            .map(|(&field, rows)| {
                let appended = transform(field, rows.view());
                assert_eq!(
                    appended.shape(),
                    rows.shape(),
                    "transform changed the shape of field `{field}`"
                );
                let n = rows.len_of(Axis(0));
                let mut shape = rows.shape().to_vec();
                shape[0] = 2 * n;
                let mut out = ArrayD::zeros(shape);
                out.slice_axis_mut(Axis(0), Slice::from(..n)).assign(rows);
                out.slice_axis_mut(Axis(0), Slice::from(n..))
                    .assign(&appended);
                (field, out)
            })
            .collect();
        Self { fields }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = (&'a Field, &'a ArrayD<f32>);
    type IntoIter = btree_map::Iter<'a, Field, ArrayD<f32>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Dataset {
    type Item = (Field, ArrayD<f32>);
    type IntoIter = btree_map::IntoIter<Field, ArrayD<f32>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
