mod power_law;
mod sine;
mod tabulated;
mod thermal;
mod uniform;

pub use power_law::*;
pub use sine::*;
pub use tabulated::*;
pub use thermal::*;
pub use uniform::*;

use crate::core::{
    error::SamplingError,
    inverse_cdf::{Cdf, InverseCdfSampler},
    loader::InputParams,
};

#[enum_dispatch::enum_dispatch(Distribution)]
pub trait DistributionT: Send + Sync {
    /// Unnormalized cumulative distribution.
    fn cdf(&self, x: f64) -> f64;

    /// Unnormalized density.
    fn pdf(&self, x: f64) -> f64;

    fn support(&self) -> (f64, f64);

    /// CDF rescaled to run from 0 at the lower bound to 1 at the upper bound.
    fn normalized_cdf(&self, x: f64) -> f64 {
        let (lower, upper) = self.support();
        let first = self.cdf(lower);
        let span = self.cdf(upper) - first;
        (self.cdf(x.clamp(lower, upper)) - first) / span
    }

    fn normalized_pdf(&self, x: f64) -> f64 {
        let (lower, upper) = self.support();
        if x < lower || x > upper {
            return 0.0;
        }
        self.pdf(x) / (self.cdf(upper) - self.cdf(lower))
    }

    fn sampler(&self, resolution: usize) -> Result<InverseCdfSampler, SamplingError> {
        let (lower, upper) = self.support();
        InverseCdfSampler::with_resolution(&|x: f64| self.cdf(x), lower, upper, resolution)
    }
}

#[enum_dispatch::enum_dispatch]
pub enum Distribution {
    Uniform,
    Thermal,
    PowerLaw,
    Sine,
    Tabulated,
}

impl Cdf for Distribution {
    fn cdf(&self, x: f64) -> f64 {
        DistributionT::cdf(self, x)
    }
}

pub fn create_distribution_from_params(params: &mut InputParams) -> anyhow::Result<Distribution> {
    let ty = params.get_str("type")?;
    let name = format!("{}-{}", params.name(), ty);
    params.set_name(name.into());

    let res = match ty.as_str() {
        "uniform" => Uniform::load(params)?.into(),
        "thermal" => Thermal::load(params)?.into(),
        "power_law" => PowerLaw::load(params)?.into(),
        "sine" => Sine::load(params)?.into(),
        "tabulated" => Tabulated::load(params)?.into(),
        _ => anyhow::bail!(format!("{}: unknown type '{}'", params.name(), ty)),
    };

    params.check_unused_keys();

    Ok(res)
}

fn load_support(params: &mut InputParams) -> anyhow::Result<(f64, f64)> {
    let lower = params.get_float("lower")?;
    let upper = params.get_float("upper")?;
    if !(lower.is_finite() && upper.is_finite() && lower < upper) {
        anyhow::bail!(format!(
            "{} - support [{}, {}] should be finite with lower < upper",
            params.name(),
            lower,
            upper
        ));
    }
    Ok((lower, upper))
}
