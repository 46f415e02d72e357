use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SamplingError {
    #[error("cdf spans {span} over the support, expected a positive finite span")]
    DegenerateDistribution { span: f64 },
    #[error("cdf decreases at x = {x} (normalized probability {prev} -> {curr})")]
    NonMonotonicCdf { x: f64, prev: f64, curr: f64 },
    #[error("cdf is not finite at x = {x}")]
    UndefinedCdf { x: f64 },
    #[error("uniform variate {0} is outside [0, 1)")]
    OutOfRangeVariate(f64),
    #[error("invalid support [{lower}, {upper}], expected finite bounds with lower < upper")]
    InvalidSupport { lower: f64, upper: f64 },
    #[error("table resolution {0} is too small, at least 2 points are needed")]
    InvalidResolution(usize),
}
