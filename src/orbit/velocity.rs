/// Dimensionless relative velocity of a binary projected on the sky,
/// `v_2d / sqrt(G M / r)`, following Hernandez (2023).
///
/// `phase` and `phase_0` are the orbital phase and the reference phase,
/// `inclination` the orbit inclination and `eccentricity` the orbit's
/// eccentricity.
pub fn v_tilde(phase: f64, phase_0: f64, inclination: f64, eccentricity: f64) -> f64 {
    let sin_incl = inclination.sin();
    let cos_rel = (phase - phase_0).cos();
    let projection = (1.0 - sin_incl * sin_incl * cos_rel * cos_rel).powf(0.25);

    let along = eccentricity * phase_0.sin() - (phase - phase_0).sin();
    let along = along * along;

    let e = eccentricity;
    let speed = ((1.0 + e * e + 2.0 * e * phase.cos() - sin_incl * sin_incl * along)
        / (1.0 + e * phase.cos()))
    .sqrt();

    projection * speed
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn face_on_circular_orbit_is_unity() {
        for phase in [0.0, 1.0, 2.0, 4.0] {
            assert_relative_eq!(v_tilde(phase, 0.3, 0.0, 0.0), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn edge_on_circular_orbit_at_node() {
        // all velocity along the line of sight at this phase
        let v = v_tilde(FRAC_PI_2, 0.0, FRAC_PI_2, 0.0);
        assert_relative_eq!(v, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn bounded_by_escape_speed() {
        for i in 0..50 {
            let phase = i as f64 * 0.13;
            let v = v_tilde(phase, 0.4, 0.7, 0.5);
            assert!(v.is_finite());
            assert!(v >= 0.0 && v <= 2f64.sqrt() + 1e-12, "v = {}", v);
        }
    }
}
