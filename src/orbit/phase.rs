use std::f64::consts::PI;

use crate::core::rng::Rng;

/// Draws the orbital phase of a binary observed at a random time.
///
/// A Keplerian orbit spends more time near apastron, so the phase density is
/// `(1 - e^2)^(3/2) / (2 pi (1 + e cos(phase))^2)` on `[0, 2 pi)`. The density
/// depends on the eccentricity of each individual system, so it is sampled by
/// rejection instead of through a tabulated inverse.
pub struct PhaseSampler {
    eccentricity: f64,
    norm: f64,
    envelope: f64,
}

impl PhaseSampler {
    pub fn new(eccentricity: f64) -> anyhow::Result<Self> {
        super::check_eccentricity(eccentricity)?;
        let norm = (1.0 - eccentricity * eccentricity).powf(1.5) * 0.5 / PI;
        // the density peaks at apastron, cos(phase) = -1
        let envelope = norm / ((1.0 - eccentricity) * (1.0 - eccentricity));
        Ok(Self {
            eccentricity,
            norm,
            envelope,
        })
    }

    pub fn pdf(&self, phase: f64) -> f64 {
        let denom = 1.0 + self.eccentricity * phase.cos();
        self.norm / (denom * denom)
    }

    pub fn sample(&self, rng: &mut Rng) -> f64 {
        loop {
            let (rand_x, rand_y) = rng.uniform_2d();
            let phase = rand_x * 2.0 * PI;
            if rand_y * self.envelope <= self.pdf(phase) {
                return phase;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn pdf_integrates_to_one() {
        for e in [0.0, 0.3, 0.9] {
            let sampler = PhaseSampler::new(e).unwrap();
            let n = 20_000;
            let h = 2.0 * PI / n as f64;
            let area: f64 = (0..n).map(|i| sampler.pdf((i as f64 + 0.5) * h) * h).sum();
            assert_relative_eq!(area, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn envelope_bounds_the_pdf() {
        let sampler = PhaseSampler::new(0.7).unwrap();
        for i in 0..1000 {
            let phase = i as f64 / 1000.0 * 2.0 * PI;
            assert!(sampler.pdf(phase) <= sampler.envelope * (1.0 + 1e-12));
        }
        assert_relative_eq!(sampler.pdf(PI), sampler.envelope, epsilon = 1e-12);
    }

    #[test]
    fn eccentric_orbits_favour_apastron() {
        let sampler = PhaseSampler::new(0.8).unwrap();
        let mut rng = Rng::new(Some(11));
        let n = 10_000;
        let near_apastron = (0..n)
            .map(|_| sampler.sample(&mut rng))
            .inspect(|phase| assert!((0.0..2.0 * PI).contains(phase)))
            .filter(|phase| (phase - PI).abs() < 0.5 * PI)
            .count();
        // analytic fraction for e = 0.8 is about 0.95
        assert!(near_apastron as f64 / n as f64 > 0.9);
    }

    #[test]
    fn unbound_orbits_are_rejected() {
        assert!(PhaseSampler::new(1.0).is_err());
    }
}
