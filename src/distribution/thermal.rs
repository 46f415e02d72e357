use crate::core::loader::InputParams;

use super::DistributionT;

/// Thermal eccentricity distribution, density `2x`.
pub struct Thermal {
    lower: f64,
    upper: f64,
}

impl Thermal {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let (lower, upper) = super::load_support(params)?;
        if lower < 0.0 {
            anyhow::bail!(format!(
                "{} - thermal support should start at or above 0",
                params.name()
            ));
        }
        Ok(Self::new(lower, upper))
    }
}

impl DistributionT for Thermal {
    fn cdf(&self, x: f64) -> f64 {
        x * x
    }

    fn pdf(&self, x: f64) -> f64 {
        2.0 * x
    }

    fn support(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}
