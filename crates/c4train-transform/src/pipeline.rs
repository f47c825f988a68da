//! Mirror-then-balance preparation of a self-play batch.

use c4train_dataset::{Dataset, MissingFieldError};
use ndarray::Array1;

use crate::{balance::balance, config::PrepareConfig, mirror::mirror, observer::Observer};

/// A batch ready for training: samples plus one loss weight per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedDataset {
    pub dataset: Dataset,
    pub sample_weights: Array1<f32>,
}

impl PreparedDataset {
    #[must_use]
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }
}

/// Optionally mirrors `dataset`, then computes move-depth weights over the result.
///
/// Weights are computed after mirroring, so a sample and its reflection always
/// share a weight.
///
/// # Example
///
/// ```
/// use c4train_dataset::{Position, Sample, SampleBatch};
/// use c4train_transform::{config::PrepareConfig, pipeline::prepare};
///
/// let dataset = [vec![0], vec![1, 1], vec![2, 2, 2]]
///     .into_iter()
///     .map(|moves| Position::from_moves(moves).map(|p| Sample::new(p, [0.0; 7], 0.0)))
///     .collect::<Result<SampleBatch, _>>()?
///     .build()?;
///
/// let prepared = prepare(&dataset, &PrepareConfig::default(), &mut ())?;
/// assert_eq!(prepared.len(), 6);
/// assert_eq!(prepared.sample_weights.len(), 6);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn prepare<O>(
    dataset: &Dataset,
    config: &PrepareConfig,
    observer: &mut O,
) -> Result<PreparedDataset, MissingFieldError>
where
    O: Observer + ?Sized,
{
    let dataset = if config.mirror {
        mirror(dataset, observer)?
    } else {
        dataset.clone()
    };
    let sample_weights = balance(&dataset, config.balance.num_bins, observer)?.sample_weights;
    Ok(PreparedDataset {
        dataset,
        sample_weights,
    })
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use c4train_dataset::{COLS, Field, Position, Sample, SampleBatch};

    use super::*;
    use crate::{config::BalanceConfig, observer::RecordingObserver};

    fn dataset() -> Dataset {
        [&[3][..], &[3, 2], &[0, 0, 0], &[1, 2, 3, 4, 5, 6, 0, 1, 2]]
            .into_iter()
            .map(|moves| {
                let position = Position::from_moves(moves.iter().copied()).unwrap();
                Sample::new(position, [1.0 / 7.0; COLS], 0.5)
            })
            .collect::<SampleBatch>()
            .build()
            .unwrap()
    }

    #[test]
    fn test_default_mirrors_then_balances() {
        let dataset = dataset();
        let mut observer = RecordingObserver::new();
        let prepared = prepare(&dataset, &PrepareConfig::default(), &mut observer).unwrap();

        assert_eq!(prepared.len(), 8);
        assert_eq!(prepared.sample_weights.len(), 8);
        assert_eq!(observer.mirror.len(), 1);
        assert_eq!(observer.balance.len(), 1);
        assert_eq!(observer.balance[0].samples, 8);
        assert_eq!(observer.balance[0].num_bins, 10);

        let n = dataset.len();
        for i in 0..n {
            assert_eq!(prepared.sample_weights[i], prepared.sample_weights[n + i]);
        }
    }

    #[test]
    fn test_without_mirroring() {
        let dataset = dataset();
        let config = PrepareConfig {
            mirror: false,
            balance: BalanceConfig {
                num_bins: NonZeroUsize::new(3).unwrap(),
            },
        };
        let mut observer = RecordingObserver::new();
        let prepared = prepare(&dataset, &config, &mut observer).unwrap();

        assert_eq!(prepared.dataset, dataset);
        assert!(observer.mirror.is_empty());
        assert_eq!(observer.balance[0].bin_counts.len(), 3);
        let mean = prepared.sample_weights.mean().unwrap();
        assert!((mean - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_field_stops_preparation() {
        let mut dataset = dataset();
        dataset.remove(Field::Value);
        let mut observer = RecordingObserver::new();
        assert_eq!(
            prepare(&dataset, &PrepareConfig::default(), &mut observer),
            Err(MissingFieldError {
                field: Field::Value
            })
        );
        assert!(observer.balance.is_empty());
    }
}
