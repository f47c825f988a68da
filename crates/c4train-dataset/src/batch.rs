use ndarray::{Array2, ArrayD, Axis, stack};

use crate::{AlignmentError, COLS, Dataset, Field, PLANES, Position, ROWS};

/// One self-play position with its training targets.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub position: Position,
    pub policy: [f32; COLS],
    pub value: f32,
    pub visits: Option<[f32; COLS]>,
    pub scores: Option<[f32; COLS]>,
    pub q: Option<[f32; COLS]>,
}

impl Sample {
    #[must_use]
    pub fn new(position: Position, policy: [f32; COLS], value: f32) -> Self {
        Self {
            position,
            policy,
            value,
            visits: None,
            scores: None,
            q: None,
        }
    }

    #[must_use]
    pub fn with_visits(mut self, visits: [f32; COLS]) -> Self {
        self.visits = Some(visits);
        self
    }

    #[must_use]
    pub fn with_scores(mut self, scores: [f32; COLS]) -> Self {
        self.scores = Some(scores);
        self
    }

    #[must_use]
    pub fn with_q(mut self, q: [f32; COLS]) -> Self {
        self.q = Some(q);
        self
    }

    fn column_target(&self, field: Field) -> Option<&[f32; COLS]> {
        match field {
            Field::Visits => self.visits.as_ref(),
            Field::Scores => self.scores.as_ref(),
            Field::Q => self.q.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SampleBatchError {
    #[display("field `{field}` is present on {present} of {total} samples")]
    PartialField {
        field: Field,
        present: usize,
        total: usize,
    },
    #[display("{_0}")]
    Alignment(AlignmentError),
}

/// Accumulates samples and assembles them into a [`Dataset`].
///
/// The built dataset always carries `X`, `policy`, `value` and `boards`. Each of
/// `visits`, `scores` and `q` is included when every sample carries it and omitted
/// when none does.
#[derive(Debug, Clone, Default)]
pub struct SampleBatch {
    samples: Vec<Sample>,
}

impl SampleBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn build(&self) -> Result<Dataset, SampleBatchError> {
        let n = self.samples.len();

        let occupancy = self
            .samples
            .iter()
            .map(|s| s.position.occupancy())
            .collect::<Vec<_>>();
        let cell_codes = self
            .samples
            .iter()
            .map(|s| s.position.cell_codes())
            .collect::<Vec<_>>();

        let mut dataset = Dataset::new()
            .with(Field::X, stack_rows(&occupancy, &[n, ROWS, COLS, PLANES]))?
            .with(Field::Boards, stack_rows(&cell_codes, &[n, ROWS, COLS]))?
            .with(Field::Policy, column_rows(self.samples.iter().map(|s| &s.policy), n))?
            .with(
                Field::Value,
                Array2::from_shape_fn((n, 1), |(i, _)| self.samples[i].value).into_dyn(),
            )?;

        for field in [Field::Visits, Field::Scores, Field::Q] {
            let rows = self
                .samples
                .iter()
                .filter_map(|s| s.column_target(field))
                .collect::<Vec<_>>();
            match rows.len() {
                0 => {}
                present if present == n => {
                    dataset.insert(field, column_rows(rows, n))?;
                }
                present => {
                    return Err(SampleBatchError::PartialField {
                        field,
                        present,
                        total: n,
                    });
                }
            }
        }

        Ok(dataset)
    }
}

impl FromIterator<Sample> for SampleBatch {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

impl Extend<Sample> for SampleBatch {
    fn extend<I: IntoIterator<Item = Sample>>(&mut self, iter: I) {
        self.samples.extend(iter);
    }
}

fn stack_rows<D>(rows: &[ndarray::Array<f32, D>], empty_shape: &[usize]) -> ArrayD<f32>
where
    D: ndarray::Dimension,
{
    let views = rows.iter().map(|row| row.view()).collect::<Vec<_>>();
    match stack(Axis(0), &views) {
        Ok(stacked) => stacked.into_dyn(),
        // only an empty batch fails to stack, since every row has the board shape
        Err(_) => ArrayD::zeros(empty_shape),
    }
}

fn column_rows<'a, I>(rows: I, n: usize) -> ArrayD<f32>
where
    I: IntoIterator<Item = &'a [f32; COLS]>,
{
    let flat = rows.into_iter().flatten().copied().collect::<Vec<_>>();
    Array2::from_shape_vec((n, COLS), flat)
        .map_or_else(|_| ArrayD::zeros(vec![n, COLS]), |rows| rows.into_dyn())
}
