#[derive(Clone, Copy, Debug)]
pub struct Summary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl Summary {
    pub fn of(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let count = samples.len();
        let (min, max, sum) = samples.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), x| (min.min(*x), max.max(*x), sum + x),
        );
        let mean = sum / count as f64;
        let var = samples.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / count as f64;
        Some(Self {
            count,
            min,
            max,
            mean,
            std_dev: var.sqrt(),
        })
    }
}

/// Kolmogorov-Smirnov distance between the empirical distribution of `samples`
/// and a normalized `cdf`.
pub fn ks_statistic<F: Fn(f64) -> f64>(samples: &[f64], cdf: F) -> f64 {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n_inv = 1.0 / sorted.len() as f64;

    let mut d: f64 = 0.0;
    for (i, x) in sorted.iter().enumerate() {
        let f = cdf(*x);
        let below = i as f64 * n_inv;
        let above = (i + 1) as f64 * n_inv;
        d = d.max(f - below).max(above - f);
    }
    d
}

/// Asymptotic critical value of the one-sample KS test at significance `alpha`.
pub fn ks_critical_value(n: usize, alpha: f64) -> f64 {
    (-(alpha * 0.5).ln() * 0.5).sqrt() / (n as f64).sqrt()
}
