//! Sample statistics over cell values.

/// A bag of samples with summary statistics.
///
/// `variance` is the maximum-likelihood estimator (divides by `n`).  All
/// summaries of an empty measurement are `0.0`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Measurement {
    samples: Vec<f64>,
}

impl Measurement {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add(&mut self, sample: f64) {
        self.samples.push(sample);
    }

    #[inline]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.samples.iter().sum()
    }

    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.sum() / self.samples.len() as f64
    }

    pub fn variance(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        self.samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / self.samples.len() as f64
    }

    pub fn stdev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.samples.iter().copied().reduce(f64::min).unwrap_or(0.0)
    }

    pub fn max(&self) -> f64 {
        self.samples.iter().copied().reduce(f64::max).unwrap_or(0.0)
    }

    /// Number of samples equal to `value`.
    pub fn count_of(&self, value: f64) -> usize {
        self.samples.iter().filter(|s| **s == value).count()
    }

    /// `count mean variance stdev min max`, tab-separated.
    pub fn summary_row(&self) -> String {
        format!(
            "{}\t{:.6}\t{:.6}\t{:.6}\t{}\t{}",
            self.count(),
            self.mean(),
            self.variance(),
            self.stdev(),
            self.min(),
            self.max()
        )
    }
}

impl Extend<f64> for Measurement {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        self.samples.extend(iter);
    }
}

impl FromIterator<f64> for Measurement {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Measurement { samples: iter.into_iter().collect() }
    }
}
