//! Exponentially Weighted Moving Average

/// EWMA baseline: `value = (1 - alpha) * value + alpha * sample`
#[derive(Debug, Clone)]
pub struct Ewma {
    /// Weight given to each new sample (0-1)
    alpha: f64,
    /// Current estimate, `None` until seeded
    value: Option<f64>,
}

impl Ewma {
    /// Create a new EWMA with the given sample weight
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            value: None,
        }
    }

    /// Current estimate
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Fold a sample into the estimate. The first sample seeds it directly.
    pub fn update(&mut self, sample: f64) -> f64 {
        let next = match self.value {
            Some(current) => current * (1.0 - self.alpha) + sample * self.alpha,
            None => sample,
        };
        self.value = Some(next);
        next
    }

    /// Reset to unseeded
    pub fn reset(&mut self) {
        self.value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_seeds() {
        let mut ewma = Ewma::new(0.1);
        assert_eq!(ewma.value(), None);
        assert_eq!(ewma.update(20.0), 20.0);
    }

    #[test]
    fn test_weighting() {
        let mut ewma = Ewma::new(0.1);
        ewma.update(10.0);
        let next = ewma.update(20.0);
        // 0.9 * 10 + 0.1 * 20
        assert!((next - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_converges() {
        let mut ewma = Ewma::new(0.1);
        ewma.update(0.0);
        for _ in 0..200 {
            ewma.update(5.0);
        }
        assert!((ewma.value().unwrap() - 5.0).abs() < 1e-6);
    }
}
