/// Summary statistics of a batch of `f64` values.
///
/// Computed in a single pass without sorting, so it is cheap enough to run on every
/// weight vector handed to the trainer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptiveStats {
    /// Number of values summarized.
    pub count: usize,
    /// The minimum value.
    pub min: f64,
    /// The maximum value.
    pub max: f64,
    /// The arithmetic mean.
    pub mean: f64,
    /// The population standard deviation.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes statistics over `values`.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if there is at least one value
    /// * `None` - if `values` is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use c4train_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
    /// assert_eq!(stats.count, 8);
    /// assert_eq!(stats.min, 2.0);
    /// assert_eq!(stats.max, 9.0);
    /// assert_eq!(stats.mean, 5.0);
    /// assert_eq!(stats.std_dev, 2.0);
    ///
    /// assert!(DescriptiveStats::new(std::iter::empty()).is_none());
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        // Welford's update keeps the variance stable for long weight vectors
        let mut count = 0_usize;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut mean = 0.0;
        let mut m2 = 0.0;
        for value in values {
            count += 1;
            min = min.min(value);
            max = max.max(value);
            let delta = value - mean;
            mean += delta / count as f64;
            m2 += delta * (value - mean);
        }
        if count == 0 {
            return None;
        }
        Some(Self {
            count,
            min,
            max,
            mean,
            std_dev: (m2 / count as f64).sqrt(),
        })
    }

    /// Width of the observed range, `max - min`.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}
