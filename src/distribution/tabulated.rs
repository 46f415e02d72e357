use crate::core::loader::InputParams;

use super::DistributionT;

/// Piecewise-linear density given at evenly spaced points over the support.
///
/// The CDF is the running trapezoid integral of the density, so any density
/// that only exists as a formula or as measured values can be sampled.
pub struct Tabulated {
    lower: f64,
    upper: f64,
    pdf: Vec<f64>,
    cumulative: Vec<f64>,
}

impl Tabulated {
    pub fn new(lower: f64, upper: f64, pdf: Vec<f64>) -> anyhow::Result<Self> {
        if pdf.len() < 2 {
            anyhow::bail!("tabulated pdf needs at least 2 values");
        }
        if let Some(value) = pdf.iter().find(|v| !(v.is_finite() && **v >= 0.0)) {
            anyhow::bail!(format!(
                "tabulated pdf values should be finite and non-negative, got {}",
                value
            ));
        }

        let half_step = 0.5 * (upper - lower) / (pdf.len() - 1) as f64;
        let mut cumulative = Vec::with_capacity(pdf.len());
        cumulative.push(0.0);
        for i in 1..pdf.len() {
            let area = (pdf[i - 1] + pdf[i]) * half_step;
            cumulative.push(cumulative[i - 1] + area);
        }

        Ok(Self {
            lower,
            upper,
            pdf,
            cumulative,
        })
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let (lower, upper) = super::load_support(params)?;
        let pdf = params.get_float_array("pdf")?;
        Self::new(lower, upper, pdf)
            .map_err(|err| anyhow::anyhow!(format!("{} - {}", params.name(), err)))
    }

    /// Linear interpolation of `table` at `x`, clamped to the support.
    fn interpolate(&self, table: &[f64], x: f64) -> f64 {
        let t = ((x - self.lower) / (self.upper - self.lower)).clamp(0.0, 1.0);
        let pos = t * (table.len() - 1) as f64;
        let i = (pos as usize).min(table.len() - 2);
        let frac = pos - i as f64;
        table[i] + (table[i + 1] - table[i]) * frac
    }
}

impl DistributionT for Tabulated {
    fn cdf(&self, x: f64) -> f64 {
        let t = ((x - self.lower) / (self.upper - self.lower)).clamp(0.0, 1.0);
        let pos = t * (self.pdf.len() - 1) as f64;
        let i = (pos as usize).min(self.pdf.len() - 2);
        let step = (self.upper - self.lower) / (self.pdf.len() - 1) as f64;
        // exact integral of the linear density inside segment i
        let h = (pos - i as f64) * step;
        let slope = (self.pdf[i + 1] - self.pdf[i]) / step;
        self.cumulative[i] + self.pdf[i] * h + 0.5 * slope * h * h
    }

    fn pdf(&self, x: f64) -> f64 {
        self.interpolate(&self.pdf, x)
    }

    fn support(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}
