use crate::core::loader::InputParams;

use super::DistributionT;

/// Constant density over the support.
pub struct Uniform {
    lower: f64,
    upper: f64,
}

impl Uniform {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let (lower, upper) = super::load_support(params)?;
        Ok(Self::new(lower, upper))
    }
}

impl DistributionT for Uniform {
    fn cdf(&self, x: f64) -> f64 {
        x
    }

    fn pdf(&self, _x: f64) -> f64 {
        1.0
    }

    fn support(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}
