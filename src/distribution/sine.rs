use crate::core::loader::InputParams;

use super::DistributionT;

/// Density `sin x`, the distribution of inclinations of randomly oriented orbits.
pub struct Sine {
    lower: f64,
    upper: f64,
}

impl Sine {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let (lower, upper) = super::load_support(params)?;
        if lower < 0.0 || upper > std::f64::consts::PI {
            anyhow::bail!(format!(
                "{} - sine support should lie within [0, pi]",
                params.name()
            ));
        }
        Ok(Self::new(lower, upper))
    }
}

impl DistributionT for Sine {
    fn cdf(&self, x: f64) -> f64 {
        1.0 - x.cos()
    }

    fn pdf(&self, x: f64) -> f64 {
        x.sin()
    }

    fn support(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}
