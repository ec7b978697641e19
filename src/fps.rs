use std::fmt;

/// Default count of frame durations used to estimate frame rate.
pub const DEFAULT_WINDOW: usize = 20;

/// Estimated frame rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FpsReading {
    /// The window was never full, the rate isn't known yet.
    Warming,
    /// Frames per second, rounded to 2 decimal places.
    Steady(f64),
}

impl FpsReading {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Warming => None,
            Self::Steady(fps) => Some(*fps),
        }
    }
}

impl fmt::Display for FpsReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warming => f.write_str("NaN"),
            Self::Steady(fps) => write!(f, "{:.2}", fps),
        }
    }
}

/// Sliding window average of frame durations.
///
/// # Examples
///
/// ```
/// use frame_convolve::{FpsEstimator, FpsReading};
///
/// let mut estimator = FpsEstimator::new();
/// for _ in 0..19 {
///     assert_eq!(estimator.push(50.), FpsReading::Warming);
/// }
/// assert_eq!(estimator.push(50.), FpsReading::Steady(20.));
/// assert_eq!(estimator.push(100.).to_string(), "19.05");
/// ```
#[derive(Debug, Clone)]
pub struct FpsEstimator {
    durations: Vec<f64>,
    capacity: usize,
    cursor: usize,
    sum: f64,
}

impl Default for FpsEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsEstimator {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_WINDOW)
    }

    /// Creates estimator with window of given size.
    /// Window must contain at least one duration.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            durations: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
            sum: 0.,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Returns `true` after the window was filled for the first time.
    #[inline]
    pub fn is_steady(&self) -> bool {
        self.durations.len() == self.capacity
    }

    pub fn reset(&mut self) {
        self.durations.clear();
        self.cursor = 0;
        self.sum = 0.;
    }

    /// Adds duration of a frame in milliseconds and returns new estimation.
    pub fn push(&mut self, duration_ms: f64) -> FpsReading {
        if self.durations.len() < self.capacity {
            self.durations.push(duration_ms);
            self.sum += duration_ms;
        } else {
            let oldest = std::mem::replace(&mut self.durations[self.cursor], duration_ms);
            self.sum += duration_ms - oldest;
        }
        self.cursor = (self.cursor + 1) % self.capacity;
        if self.cursor == 0 {
            // Drop error accumulated by the running sum.
            self.sum = self.durations.iter().sum();
        }
        self.reading()
    }

    /// Current estimation.
    pub fn reading(&self) -> FpsReading {
        if !self.is_steady() {
            return FpsReading::Warming;
        }
        let average = self.sum / self.capacity as f64;
        let fps = (100_000. / average).round() / 100.;
        if !fps.is_finite() {
            return FpsReading::Steady(f64::MAX);
        }
        FpsReading::Steady(fps)
    }
}
