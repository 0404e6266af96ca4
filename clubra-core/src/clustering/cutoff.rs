//! Edge-weight statistics and the adaptive cutoff search.

/// Mean, population standard deviation and maximum of a set of edge weights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStatistics {
    mean: f64,
    std_dev: f64,
    max: f64,
}

impl EdgeStatistics {
    /// Summarises `weights`, returning `None` when there are none.
    ///
    /// # Examples
    /// ```
    /// use clubra_core::clustering::EdgeStatistics;
    ///
    /// let stats = EdgeStatistics::from_weights(&[1.0, 3.0]).expect("non-empty");
    /// assert_eq!(stats.mean(), 2.0);
    /// assert_eq!(stats.std_dev(), 1.0);
    /// assert_eq!(stats.max(), 3.0);
    /// ```
    #[must_use]
    pub fn from_weights(weights: &[f64]) -> Option<Self> {
        if weights.is_empty() {
            return None;
        }
        let count = weights.len() as f64;
        let mean = weights.iter().sum::<f64>() / count;
        let variance = weights
            .iter()
            .map(|weight| (weight - mean) * (weight - mean))
            .sum::<f64>()
            / count;
        let max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self {
            mean,
            std_dev: variance.sqrt(),
            max,
        })
    }

    /// Returns the arithmetic mean.
    #[must_use]
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns the population standard deviation.
    #[must_use]
    pub const fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Returns the largest weight.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    fn threshold(&self, multiplier: f64) -> f64 {
        (self.mean + multiplier * self.std_dev).ceil()
    }
}

/// Outcome of the adaptive cutoff search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cutoff {
    value: f64,
    initial: f64,
    applied_multiplier: f64,
    iterations: u64,
}

impl Cutoff {
    /// Returns the cutoff: edges strictly lighter than it are merged.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Returns `⌈μ + m₀σ⌉`, the cutoff before it was bounded by the maximum
    /// weight.
    #[must_use]
    pub const fn initial(&self) -> f64 {
        self.initial
    }

    /// Returns the multiplier that produced [`Self::value`].
    #[must_use]
    pub const fn applied_multiplier(&self) -> f64 {
        self.applied_multiplier
    }

    /// Returns how many decreasing steps were applied, saturating at
    /// `u64::MAX`.
    #[must_use]
    pub const fn iterations(&self) -> u64 {
        self.iterations
    }
}

/// Steps taken by repeated subtraction before the search jumps ahead.
const STEPWISE_LIMIT: f64 = 65_536.0;

/// Largest step count whose `f64` product with the step is exact in `k`.
const MAX_STEPS: f64 = 9_007_199_254_740_992.0;

/// Computes `⌈μ + mσ⌉`, lowering `m` by `step` until the cutoff no longer
/// exceeds the heaviest edge.
///
/// With zero deviation the multiplier has no effect, so the cutoff is `⌈μ⌉`
/// clamped to the maximum weight. Up to 65 536 steps the multiplier is
/// lowered by repeated subtraction. Longer descents jump to `m - kδ` and
/// step from there, so the applied multiplier may differ from repeated
/// subtraction in its last bits. When more than 2⁵³ steps would be needed
/// the search stops at `⌊max⌋` and [`Cutoff::iterations`] saturates at
/// `u64::MAX`.
#[must_use]
pub fn adaptive_cutoff(stats: &EdgeStatistics, multiplier: f64, step: f64) -> Cutoff {
    let initial = stats.threshold(multiplier);
    if initial <= stats.max {
        return Cutoff {
            value: initial,
            initial,
            applied_multiplier: multiplier,
            iterations: 0,
        };
    }
    if stats.std_dev <= 0.0 {
        return Cutoff {
            value: stats.max,
            initial,
            applied_multiplier: multiplier,
            iterations: 0,
        };
    }

    let bound = (stats.max.floor() - stats.mean) / stats.std_dev;
    let needed = ((multiplier - bound) / step).ceil();
    if needed > MAX_STEPS {
        return Cutoff {
            value: stats.max.floor(),
            initial,
            applied_multiplier: bound,
            iterations: u64::MAX,
        };
    }
    if needed <= STEPWISE_LIMIT {
        return stepwise_cutoff(stats, multiplier, step, initial);
    }

    let skipped = (needed - 2.0).clamp(0.0, MAX_STEPS);
    let mut iterations = skipped as u64;
    let mut applied = multiplier - skipped * step;
    let mut value = stats.threshold(applied);
    while value > stats.max {
        iterations += 1;
        applied = multiplier - iterations as f64 * step;
        value = stats.threshold(applied);
    }
    Cutoff {
        value,
        initial,
        applied_multiplier: applied,
        iterations,
    }
}

fn stepwise_cutoff(stats: &EdgeStatistics, multiplier: f64, step: f64, initial: f64) -> Cutoff {
    let mut applied = multiplier;
    let mut iterations = 0;
    let mut value = initial;
    while value > stats.max {
        applied -= step;
        iterations += 1;
        value = stats.threshold(applied);
    }
    Cutoff {
        value,
        initial,
        applied_multiplier: applied,
        iterations,
    }
}
