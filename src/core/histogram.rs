#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub value: f64,
}

pub struct Histogram {
    lower: f64,
    upper: f64,
    counts: Vec<u64>,
    total: u64,
}

impl Histogram {
    /// Bins `samples` into `bins` equal-width bins over `range`, or over the
    /// sample min..max when no range is given. The last bin is closed on the
    /// right; samples outside the range are not counted.
    pub fn new(samples: &[f64], bins: usize, range: Option<(f64, f64)>) -> anyhow::Result<Self> {
        if bins == 0 {
            anyhow::bail!("histogram - bin count should be positive");
        }
        if samples.is_empty() {
            anyhow::bail!("histogram - no samples to bin");
        }
        if samples.iter().any(|x| x.is_nan()) {
            anyhow::bail!("histogram - samples contain NaN");
        }

        let (mut lower, mut upper) = match range {
            Some(range) => range,
            None => samples
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                    (lo.min(*x), hi.max(*x))
                }),
        };
        if !(lower.is_finite() && upper.is_finite() && lower <= upper) {
            anyhow::bail!(format!("histogram - invalid range [{}, {}]", lower, upper));
        }
        if lower == upper {
            lower -= 0.5;
            upper += 0.5;
        }

        let mut hist = Self {
            lower,
            upper,
            counts: vec![0; bins],
            total: 0,
        };
        for x in samples {
            hist.add_sample(*x);
        }
        Ok(hist)
    }

    fn add_sample(&mut self, x: f64) {
        if x < self.lower || x > self.upper {
            return;
        }
        let bins = self.counts.len();
        let index = ((x - self.lower) / self.bin_width()) as usize;
        self.counts[index.min(bins - 1)] += 1;
        self.total += 1;
    }

    pub fn bin_width(&self) -> f64 {
        (self.upper - self.lower) / self.counts.len() as f64
    }

    pub fn range(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Number of samples that landed inside the range.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Bar heights: raw counts, or a density integrating to one; `cumulative`
    /// turns either into a running sum.
    pub fn bins(&self, density: bool, cumulative: bool) -> Vec<Bin> {
        let width = self.bin_width();
        let scale = if density && self.total > 0 {
            1.0 / (self.total as f64 * width)
        } else {
            1.0
        };

        let mut running = 0.0;
        self.counts
            .iter()
            .enumerate()
            .map(|(i, count)| {
                let mut value = *count as f64 * scale;
                if cumulative {
                    // cumulative densities sum bar areas so the last bar is one
                    running += if density { value * width } else { value };
                    value = running;
                }
                Bin {
                    lower: self.lower + width * i as f64,
                    upper: self.lower + width * (i + 1) as f64,
                    value,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn counts_use_data_range() {
        let hist = Histogram::new(&[0.0, 0.1, 0.5, 0.9, 1.0], 2, None).unwrap();
        assert_eq!(hist.range(), (0.0, 1.0));
        assert_eq!(hist.counts(), &[2, 3]);
        assert_eq!(hist.total(), 5);
    }

    #[test]
    fn explicit_range_drops_outliers() {
        let hist = Histogram::new(&[-1.0, 0.25, 0.75, 2.0], 4, Some((0.0, 1.0))).unwrap();
        assert_eq!(hist.counts(), &[0, 1, 0, 1]);
        assert_eq!(hist.total(), 2);
    }

    #[test]
    fn density_integrates_to_one() {
        let samples: Vec<f64> = (0..1000).map(|i| i as f64 / 999.0 * 4.0).collect();
        let hist = Histogram::new(&samples, 7, None).unwrap();
        let area: f64 = hist
            .bins(true, false)
            .iter()
            .map(|b| b.value * (b.upper - b.lower))
            .sum();
        assert_relative_eq!(area, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn cumulative_ends_at_total_or_one() {
        let samples = [1.0, 2.0, 2.0, 3.0];
        let hist = Histogram::new(&samples, 3, None).unwrap();
        let counts = hist.bins(false, true);
        assert_eq!(
            counts.iter().map(|b| b.value).collect::<Vec<_>>(),
            vec![1.0, 3.0, 4.0]
        );
        let density = hist.bins(true, true);
        assert_relative_eq!(density.last().unwrap().value, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn single_value_gets_unit_range() {
        let hist = Histogram::new(&[3.0, 3.0], 4, None).unwrap();
        assert_eq!(hist.range(), (2.5, 3.5));
        assert_eq!(hist.counts(), &[0, 0, 2, 0]);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Histogram::new(&[], 10, None).is_err());
        assert!(Histogram::new(&[1.0], 0, None).is_err());
        assert!(Histogram::new(&[f64::NAN], 10, None).is_err());
        assert!(Histogram::new(&[1.0], 10, Some((2.0, 1.0))).is_err());
    }
}
