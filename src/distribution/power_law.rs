use crate::core::loader::InputParams;

use super::DistributionT;

/// Density `x^alpha`; `alpha = -1` is Öpik's law for binary separations.
pub struct PowerLaw {
    lower: f64,
    upper: f64,
    alpha: f64,
}

impl PowerLaw {
    pub const OPIK_ALPHA: f64 = -1.0;

    pub fn new(lower: f64, upper: f64, alpha: f64) -> Self {
        Self {
            lower,
            upper,
            alpha,
        }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let (lower, upper) = super::load_support(params)?;
        let alpha = params.get_float_or("alpha", Self::OPIK_ALPHA)?;
        if lower <= 0.0 {
            anyhow::bail!(format!(
                "{} - power law support should be strictly positive",
                params.name()
            ));
        }
        if !alpha.is_finite() {
            anyhow::bail!(format!("{} - 'alpha' should be finite", params.name()));
        }
        Ok(Self::new(lower, upper, alpha))
    }
}

impl DistributionT for PowerLaw {
    fn cdf(&self, x: f64) -> f64 {
        let exponent = self.alpha + 1.0;
        if exponent == 0.0 {
            x.ln()
        } else {
            x.powf(exponent) / exponent
        }
    }

    fn pdf(&self, x: f64) -> f64 {
        x.powf(self.alpha)
    }

    fn support(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn opik_law_is_logarithmic() {
        let dist = PowerLaw::new(200.0, 2000.0, PowerLaw::OPIK_ALPHA);
        assert_relative_eq!(dist.normalized_cdf(632.455_532_033_675_9), 0.5, epsilon = 1e-12);
        assert_relative_eq!(dist.pdf(4.0), 0.25);
    }

    #[test]
    fn salpeter_slope_normalizes() {
        let dist = PowerLaw::new(0.5, 1.5, -2.35);
        assert_relative_eq!(dist.normalized_cdf(0.5), 0.0);
        assert_relative_eq!(dist.normalized_cdf(1.5), 1.0);
        assert!(dist.normalized_cdf(1.0) > 0.5);
    }
}
