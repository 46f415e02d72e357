use super::error::SamplingError;

/// Anything that can be evaluated as a cumulative distribution function.
pub trait Cdf {
    fn cdf(&self, x: f64) -> f64;
}

impl<F: Fn(f64) -> f64> Cdf for F {
    fn cdf(&self, x: f64) -> f64 {
        self(x)
    }
}

/// Numerical inverse of a CDF over a bounded support.
///
/// The CDF is tabulated once at evenly spaced points and normalized to `[0, 1]`.
/// Sampling maps a uniform variate back to the domain by binary search over the
/// probability column and linear interpolation inside the located segment.
pub struct InverseCdfSampler {
    probs: Vec<f64>,
    values: Vec<f64>,
}

impl InverseCdfSampler {
    pub const DEFAULT_RESOLUTION: usize = 1024;

    /// Normalized probabilities may dip by this much before the cdf is rejected.
    const MONOTONIC_TOLERANCE: f64 = 1e-9;

    pub fn new<C: Cdf + ?Sized>(cdf: &C, lower: f64, upper: f64) -> Result<Self, SamplingError> {
        Self::with_resolution(cdf, lower, upper, Self::DEFAULT_RESOLUTION)
    }

    pub fn with_resolution<C: Cdf + ?Sized>(
        cdf: &C,
        lower: f64,
        upper: f64,
        resolution: usize,
    ) -> Result<Self, SamplingError> {
        if !(lower.is_finite() && upper.is_finite() && lower < upper)
            || !(upper - lower).is_finite()
        {
            return Err(SamplingError::InvalidSupport { lower, upper });
        }
        if resolution < 2 {
            return Err(SamplingError::InvalidResolution(resolution));
        }

        let step = (upper - lower) / (resolution - 1) as f64;
        let mut values: Vec<f64> = (0..resolution).map(|i| lower + step * i as f64).collect();
        values[resolution - 1] = upper;

        let raw: Vec<f64> = values.iter().map(|x| cdf.cdf(*x)).collect();
        let first = raw[0];
        let last = raw[resolution - 1];
        let span = last - first;
        if !(span.is_finite() && span > 0.0) {
            return Err(SamplingError::DegenerateDistribution { span });
        }

        let mut probs = Vec::with_capacity(resolution);
        probs.push(0.0);
        for i in 1..resolution {
            if !raw[i].is_finite() {
                return Err(SamplingError::UndefinedCdf { x: values[i] });
            }
            let prev = probs[i - 1];
            // a subnormal span has no finite reciprocal
            let curr = (raw[i] - first) / span;
            if curr < prev - Self::MONOTONIC_TOLERANCE {
                return Err(SamplingError::NonMonotonicCdf {
                    x: values[i],
                    prev,
                    curr,
                });
            }
            probs.push(curr.clamp(prev, 1.0));
        }
        probs[resolution - 1] = 1.0;

        Ok(Self { probs, values })
    }

    /// Maps a uniform variate in `[0, 1)` to a value in the support.
    pub fn sample(&self, u: f64) -> Result<f64, SamplingError> {
        if !(0.0..1.0).contains(&u) {
            return Err(SamplingError::OutOfRangeVariate(u));
        }
        Ok(self.invert(u))
    }

    fn invert(&self, u: f64) -> f64 {
        // first index with p >= u; p[last] == 1.0 > u keeps it in bounds
        let hi = self.probs.partition_point(|p| *p < u);
        if hi == 0 {
            return self.values[0];
        }
        let lo = hi - 1;
        let (p0, p1) = (self.probs[lo], self.probs[hi]);
        let (x0, x1) = (self.values[lo], self.values[hi]);
        if p1 == u {
            // lower endpoint of a flat run starting at `hi`
            return x1;
        }
        let t = (u - p0) / (p1 - p0);
        (x0 + (x1 - x0) * t).clamp(x0, x1)
    }

    pub fn lower(&self) -> f64 {
        self.values[0]
    }

    pub fn upper(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    pub fn resolution(&self) -> usize {
        self.values.len()
    }
}

impl rand::distributions::Distribution<f64> for InverseCdfSampler {
    fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.invert(rng.gen::<f64>())
    }
}
