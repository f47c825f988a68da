//! Move-depth sample weighting.
//!
//! Self-play data is heavily skewed toward early-game positions: every game passes
//! through them, few games reach deep positions. Rather than dropping or
//! resampling positions, this module keeps every sample and scales its loss
//! contribution inversely to how crowded its move-depth stratum is.
//!
//! # Algorithm
//!
//! 1. **Move count** - Count occupied cells of each sample's occupancy planes
//! 2. **Binning** - Split `[min, max + 1]` of the observed move counts into
//!    `num_bins` equal-width half-open bins and assign each sample a bin id
//! 3. **Bin weight** - `max(bin_counts) / max(bin_counts[b], 1)`, so the most
//!    populated bin gets 1 and rarer bins get proportionally more
//! 4. **Normalization** - Divide by the mean weight so the weights average to 1
//!
//! Empty bins receive a large weight that no sample uses. Normalizing to mean 1
//! redistributes loss across depths without changing its overall magnitude.
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroUsize;
//!
//! use c4train_transform::balance::MoveBalance;
//!
//! let balance = MoveBalance::compute(vec![2, 2, 2, 8], NonZeroUsize::new(2).unwrap());
//! assert_eq!(balance.bin_ids, vec![0, 0, 0, 1]);
//! assert_eq!(balance.bin_counts, vec![3, 1]);
//! assert_eq!(balance.bin_weights, vec![1.0, 3.0]);
//!
//! let weights = &balance.sample_weights;
//! assert!((weights[0] - 2.0 / 3.0).abs() < 1e-12);
//! assert!((weights[3] - 2.0).abs() < 1e-12);
//! ```

use std::num::NonZeroUsize;

use c4train_dataset::{Dataset, Field, MissingFieldError};
use c4train_stats::{
    binning::{UniformBins, bincount},
    descriptive::DescriptiveStats,
};
use ndarray::{Array1, ArrayD, Axis};
use serde::Serialize;

use crate::observer::Observer;

/// Number of move-count bins used when the caller does not choose one.
pub const DEFAULT_NUM_BINS: NonZeroUsize = NonZeroUsize::new(10).unwrap();

/// Diagnostics of one [`balance`] call.
///
/// Range and mean fields are `None` for an empty batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceReport {
    pub samples: usize,
    pub num_bins: usize,
    /// Smallest and largest move count in the batch.
    pub move_range: Option<(u32, u32)>,
    pub bin_edges: Vec<f64>,
    pub bin_counts: Vec<usize>,
    /// Smallest and largest per-bin weight before normalization, including empty bins.
    pub bin_weight_range: Option<(f64, f64)>,
    /// Mean of the returned sample weights.
    pub mean_weight: Option<f64>,
}

/// Result of [`balance`]: the input dataset and one loss weight per sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Balanced<'a> {
    /// The dataset passed to [`balance`], unchanged.
    pub dataset: &'a Dataset,
    /// Per-sample loss multipliers with mean 1.
    pub sample_weights: Array1<f32>,
}

/// Number of stones on each sample's board.
///
/// `x` holds one occupancy tensor per sample with the player planes on the last
/// axis. A cell counts as occupied when the sum of its first two planes is nonzero.
///
/// # Panics
///
/// Panics if `x` has fewer than two axes or fewer than two planes.
///
/// # Example
///
/// ```
/// use c4train_dataset::{Field, Position, Sample, SampleBatch};
/// use c4train_transform::balance::move_counts;
///
/// let batch = SampleBatch::from_iter(
///     [vec![], vec![3], vec![3, 3, 4, 0]]
///         .into_iter()
///         .map(|moves| Position::from_moves(moves).map(|p| Sample::new(p, [0.0; 7], 0.0)))
///         .collect::<Result<Vec<_>, _>>()?,
/// );
/// let dataset = batch.build()?;
/// assert_eq!(move_counts(dataset.require(Field::X)?), vec![0, 1, 4]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[must_use]
pub fn move_counts(x: &ArrayD<f32>) -> Vec<u32> {
    let plane_axis = Axis(x.ndim() - 1);
    let occupied = &x.index_axis(plane_axis, 0) + &x.index_axis(plane_axis, 1);
    occupied
        .outer_iter()
        .map(|sample| {
            let count = sample.iter().filter(|&&cell| cell != 0.0).count();
            u32::try_from(count).unwrap_or(u32::MAX)
        })
        .collect()
}

/// Every intermediate of the move-depth weighting.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveBalance {
    pub move_counts: Vec<u32>,
    /// Bin edges; `None` for an empty batch.
    pub bins: Option<UniformBins>,
    pub bin_ids: Vec<usize>,
    /// Samples per bin, `num_bins` entries.
    pub bin_counts: Vec<usize>,
    /// Weight of each bin before normalization, `num_bins` entries.
    pub bin_weights: Vec<f64>,
    /// Normalized per-sample weights with mean 1.
    pub sample_weights: Vec<f64>,
}

impl MoveBalance {
    /// Computes bin assignment and normalized weights from per-sample move counts.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn compute(move_counts: Vec<u32>, num_bins: NonZeroUsize) -> Self {
        let (Some(&min), Some(&max)) = (move_counts.iter().min(), move_counts.iter().max()) else {
            return Self {
                move_counts,
                bins: None,
                bin_ids: vec![],
                bin_counts: vec![0; num_bins.get()],
                bin_weights: vec![0.0; num_bins.get()],
                sample_weights: vec![],
            };
        };

        let bins = UniformBins::spanning(min, max, num_bins);
        let bin_ids = move_counts
            .iter()
            .map(|&m| bins.bin_index(f64::from(m)))
            .collect::<Vec<_>>();
        let bin_counts = bincount(&bin_ids, num_bins.get());

        // the fullest bin is never empty here, so it gets weight exactly 1
        let most_populated = bin_counts.iter().copied().max().unwrap_or(1) as f64;
        let bin_weights = bin_counts
            .iter()
            .map(|&count| most_populated / count.max(1) as f64)
            .collect::<Vec<_>>();

        let raw_weights = bin_ids.iter().map(|&b| bin_weights[b]).collect::<Vec<_>>();
        let mean = raw_weights.iter().sum::<f64>() / raw_weights.len() as f64;
        let sample_weights = raw_weights.iter().map(|w| w / mean).collect();

        Self {
            move_counts,
            bins: Some(bins),
            bin_ids,
            bin_counts,
            bin_weights,
            sample_weights,
        }
    }

    #[must_use]
    pub fn num_bins(&self) -> usize {
        self.bin_counts.len()
    }

    /// Smallest and largest move count, `None` for an empty batch.
    #[must_use]
    pub fn move_range(&self) -> Option<(u32, u32)> {
        let min = self.move_counts.iter().copied().min()?;
        let max = self.move_counts.iter().copied().max()?;
        Some((min, max))
    }

    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn sample_weights_f32(&self) -> Array1<f32> {
        self.sample_weights.iter().map(|&w| w as f32).collect()
    }

    fn report(&self, sample_weights: &Array1<f32>) -> BalanceReport {
        let bin_weight_range = self
            .bins
            .as_ref()
            .and(DescriptiveStats::new(self.bin_weights.iter().copied()))
            .map(|stats| (stats.min, stats.max));
        let mean_weight = DescriptiveStats::new(sample_weights.iter().map(|&w| f64::from(w)))
            .map(|stats| stats.mean);
        BalanceReport {
            samples: self.move_counts.len(),
            num_bins: self.num_bins(),
            move_range: self.move_range(),
            bin_edges: self
                .bins
                .as_ref()
                .map(|bins| bins.edges().to_vec())
                .unwrap_or_default(),
            bin_counts: self.bin_counts.clone(),
            bin_weight_range,
            mean_weight,
        }
    }
}

/// Computes per-sample loss weights that flatten the move-depth distribution.
///
/// The dataset must contain `X` with shape `(N, rows, cols, 2)`. The returned
/// [`Balanced`] borrows the same dataset and carries `N` weights with mean 1.
///
/// # Panics
///
/// Panics if `X` has fewer than two axes or fewer than two planes.
///
/// # Example
///
/// ```
/// use c4train_dataset::{Position, Sample, SampleBatch};
/// use c4train_transform::balance::{DEFAULT_NUM_BINS, balance};
///
/// let dataset = [vec![], vec![3], vec![3, 3], vec![3, 3, 3, 3, 3, 2, 2, 2]]
///     .into_iter()
///     .map(|moves| Position::from_moves(moves).map(|p| Sample::new(p, [0.0; 7], 0.0)))
///     .collect::<Result<SampleBatch, _>>()?
///     .build()?;
///
/// let balanced = balance(&dataset, DEFAULT_NUM_BINS, &mut ())?;
/// assert!(std::ptr::eq(balanced.dataset, &dataset));
/// assert_eq!(balanced.sample_weights.len(), 4);
/// assert!((balanced.sample_weights.mean().unwrap() - 1.0).abs() < 1e-6);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn balance<'a, O>(
    dataset: &'a Dataset,
    num_bins: NonZeroUsize,
    observer: &mut O,
) -> Result<Balanced<'a>, MissingFieldError>
where
    O: Observer + ?Sized,
{
    let x = dataset.require(Field::X)?;
    let balance = MoveBalance::compute(move_counts(x), num_bins);
    let sample_weights = balance.sample_weights_f32();
    observer.on_balance(&balance.report(&sample_weights));
    Ok(Balanced {
        dataset,
        sample_weights,
    })
}

#[cfg(test)]
mod tests {
    use c4train_dataset::{COLS, PLANES, Position, ROWS, Sample, SampleBatch};
    use ndarray::IxDyn;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use super::*;
    use crate::observer::RecordingObserver;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    fn mean(weights: &Array1<f32>) -> f64 {
        weights.iter().map(|&w| f64::from(w)).sum::<f64>() / weights.len() as f64
    }

    /// Plays a random legal game of `plies` moves.
    fn random_position(rng: &mut Pcg32, plies: usize) -> Position {
        let mut position = Position::EMPTY;
        for _ in 0..plies {
            let columns = position.playable_columns().collect::<Vec<_>>();
            let column = columns[rng.random_range(0..columns.len())];
            position.play(column).unwrap();
        }
        position
    }

    /// Builds a batch skewed toward the opening, like self-play output.
    fn skewed_dataset(rng: &mut Pcg32, n: usize) -> Dataset {
        (0..n)
            .map(|_| {
                let plies = if rng.random_bool(0.7) {
                    rng.random_range(0..8)
                } else {
                    rng.random_range(8..=ROWS * COLS)
                };
                Sample::new(random_position(rng, plies), [1.0 / 7.0; COLS], 0.0)
            })
            .collect::<SampleBatch>()
            .build()
            .unwrap()
    }

    #[test]
    fn test_two_bin_example() {
        let balance = MoveBalance::compute(vec![2, 2, 2, 8], nz(2));
        assert_eq!(balance.bins.as_ref().unwrap().edges(), &[2.0, 5.5, 9.0]);
        assert_eq!(balance.bin_ids, vec![0, 0, 0, 1]);
        assert_eq!(balance.bin_counts, vec![3, 1]);
        assert_eq!(balance.bin_weights, vec![1.0, 3.0]);
        for (w, expected) in balance.sample_weights.iter().zip([2.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0, 2.0]) {
            assert_close(*w, expected, 1e-12);
        }
        assert_close(balance.sample_weights.iter().sum::<f64>() / 4.0, 1.0, 1e-12);
    }

    #[test]
    fn test_balanced_bins_give_uniform_weights() {
        let balance = MoveBalance::compute(vec![2, 2, 8, 8], nz(2));
        assert_eq!(balance.bin_counts, vec![2, 2]);
        assert_eq!(balance.bin_weights, vec![1.0, 1.0]);
        assert_eq!(balance.sample_weights, vec![1.0; 4]);
    }

    #[test]
    fn test_empty_bins_get_unused_weight() {
        let balance = MoveBalance::compute(vec![0, 0, 0, 0, 9], nz(5));
        assert_eq!(balance.bin_counts, vec![4, 0, 0, 0, 1]);
        assert_eq!(balance.bin_weights, vec![1.0, 4.0, 4.0, 4.0, 4.0]);
        assert!(balance.bin_ids.iter().all(|&b| b == 0 || b == 4));
    }

    #[test]
    fn test_single_depth_does_not_fail() {
        let balance = MoveBalance::compute(vec![5; 7], DEFAULT_NUM_BINS);
        assert_eq!(balance.move_range(), Some((5, 5)));
        assert_eq!(balance.bin_ids, vec![0; 7]);
        assert_eq!(balance.bin_counts[0], 7);
        assert_eq!(balance.sample_weights, vec![1.0; 7]);
    }

    #[test]
    fn test_single_bin_gives_uniform_weights() {
        let balance = MoveBalance::compute(vec![0, 3, 3, 17, 42], nz(1));
        assert_eq!(balance.bin_counts, vec![5]);
        assert_eq!(balance.sample_weights, vec![1.0; 5]);
    }

    #[test]
    fn test_range_bounds_land_in_outer_populated_bins() {
        for num_bins in 1..=12 {
            let balance = MoveBalance::compute(vec![4, 11, 11, 29, 30], nz(num_bins));
            assert_eq!(balance.bin_ids[0], 0, "min with {num_bins} bins");
            let last = *balance.bin_ids.last().unwrap();
            assert_eq!(
                last,
                *balance.bin_ids.iter().max().unwrap(),
                "max with {num_bins} bins"
            );
            assert!(last < num_bins);
        }
    }

    #[test]
    fn test_empty_move_counts() {
        let balance = MoveBalance::compute(vec![], nz(3));
        assert!(balance.bins.is_none());
        assert!(balance.sample_weights.is_empty());
        assert_eq!(balance.bin_counts, vec![0, 0, 0]);
        assert_eq!(balance.move_range(), None);
    }

    #[test]
    fn test_move_counts_sum_both_planes() {
        let mut x = ArrayD::<f32>::zeros(IxDyn(&[3, ROWS, COLS, PLANES]));
        x[[1, 5, 0, 0]] = 1.0;
        x[[1, 5, 1, 1]] = 1.0;
        x[[2, 0, 0, 0]] = 1.0;
        x[[2, 0, 0, 1]] = 1.0;
        assert_eq!(move_counts(&x), vec![0, 2, 1]);
    }

    #[test]
    fn test_move_counts_match_positions() {
        let mut rng = Pcg32::seed_from_u64(7);
        let positions = (0..50)
            .map(|i| random_position(&mut rng, i % (ROWS * COLS + 1)))
            .collect::<Vec<_>>();
        let dataset = positions
            .iter()
            .map(|p| Sample::new(p.clone(), [0.0; COLS], 0.0))
            .collect::<SampleBatch>()
            .build()
            .unwrap();
        let counts = move_counts(dataset.get(Field::X).unwrap());
        for (count, position) in counts.iter().zip(&positions) {
            assert_eq!(*count as usize, position.stone_count());
        }
    }

    #[test]
    fn test_balance_returns_same_dataset() {
        let mut rng = Pcg32::seed_from_u64(1);
        let dataset = skewed_dataset(&mut rng, 64);
        let before = dataset.clone();
        let balanced = balance(&dataset, DEFAULT_NUM_BINS, &mut ()).unwrap();
        assert!(std::ptr::eq(balanced.dataset, &dataset));
        assert_eq!(balanced.sample_weights.len(), dataset.len());
        assert_eq!(dataset, before);
    }

    #[test]
    fn test_weights_are_positive_with_unit_mean() {
        let mut rng = Pcg32::seed_from_u64(0x5eed);
        for round in 0..20 {
            let n = rng.random_range(1..300);
            let dataset = skewed_dataset(&mut rng, n);
            let num_bins = nz(rng.random_range(1..=16));
            let balanced = balance(&dataset, num_bins, &mut ()).unwrap();

            assert_eq!(balanced.sample_weights.len(), n, "round {round}");
            assert!(
                balanced.sample_weights.iter().all(|&w| w > 0.0),
                "round {round}"
            );
            assert_close(mean(&balanced.sample_weights), 1.0, 1e-6);
        }
    }

    #[test]
    fn test_rare_depths_weigh_more() {
        let mut rng = Pcg32::seed_from_u64(3);
        let dataset = skewed_dataset(&mut rng, 500);
        let balanced = balance(&dataset, DEFAULT_NUM_BINS, &mut ()).unwrap();
        let counts = move_counts(dataset.get(Field::X).unwrap());
        let balance = MoveBalance::compute(counts, DEFAULT_NUM_BINS);

        // samples in the most crowded bin carry the smallest weight
        let crowded = (0..balance.num_bins())
            .max_by_key(|&b| balance.bin_counts[b])
            .unwrap();
        let min_weight = balanced
            .sample_weights
            .iter()
            .copied()
            .fold(f32::INFINITY, f32::min);
        for (i, &b) in balance.bin_ids.iter().enumerate() {
            if b == crowded {
                assert_eq!(balanced.sample_weights[i], min_weight);
            }
        }
    }

    #[test]
    fn test_mirroring_keeps_weights_consistent() {
        let mut rng = Pcg32::seed_from_u64(11);
        let dataset = skewed_dataset(&mut rng, 40);
        let mirrored = crate::mirror::mirror(&dataset, &mut ()).unwrap();
        let weights = balance(&mirrored, DEFAULT_NUM_BINS, &mut ())
            .unwrap()
            .sample_weights;
        let n = dataset.len();
        for i in 0..n {
            assert_eq!(weights[i], weights[n + i]);
        }
    }

    #[test]
    fn test_missing_x_fails() {
        let dataset = Dataset::new()
            .with(Field::Policy, ArrayD::zeros(IxDyn(&[2, COLS])))
            .unwrap();
        let mut observer = RecordingObserver::new();
        assert_eq!(
            balance(&dataset, DEFAULT_NUM_BINS, &mut observer),
            Err(MissingFieldError { field: Field::X })
        );
        assert!(observer.balance.is_empty());
    }

    #[test]
    fn test_empty_batch() {
        let dataset = Dataset::new()
            .with(Field::X, ArrayD::zeros(IxDyn(&[0, ROWS, COLS, PLANES])))
            .unwrap();
        let mut observer = RecordingObserver::new();
        let balanced = balance(&dataset, DEFAULT_NUM_BINS, &mut observer).unwrap();
        assert!(balanced.sample_weights.is_empty());
        let report = &observer.balance[0];
        assert_eq!(report.samples, 0);
        assert_eq!(report.move_range, None);
        assert_eq!(report.mean_weight, None);
        assert_eq!(report.bin_weight_range, None);
    }

    #[test]
    fn test_report_describes_bins() {
        let dataset = [vec![0], vec![0], vec![0, 1], vec![0, 1, 2, 3, 4, 5, 6, 0]]
            .into_iter()
            .map(|moves| Sample::new(Position::from_moves(moves).unwrap(), [0.0; COLS], 0.0))
            .collect::<SampleBatch>()
            .build()
            .unwrap();
        let mut observer = RecordingObserver::new();
        balance(&dataset, nz(2), &mut observer).unwrap();

        let report = &observer.balance[0];
        assert_eq!(report.samples, 4);
        assert_eq!(report.num_bins, 2);
        assert_eq!(report.move_range, Some((1, 8)));
        assert_eq!(report.bin_edges, vec![1.0, 5.0, 9.0]);
        assert_eq!(report.bin_counts, vec![3, 1]);
        assert_eq!(report.bin_weight_range, Some((1.0, 3.0)));
        assert_close(report.mean_weight.unwrap(), 1.0, 1e-6);

        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["bin_counts"], serde_json::json!([3, 1]));
    }
}
