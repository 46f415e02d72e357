//! Orbital geometry of wide binaries.
//!
//! Angles are in radians, `phase` is the true anomaly measured from
//! periastron and `inclination` is measured from the line of sight normal.

mod phase;
mod velocity;

pub use phase::*;
pub use velocity::*;

/// Instantaneous separation `a (1 - e^2) / (1 + e cos(phase))`.
pub fn separation(semi_axis: f64, eccentricity: f64, phase: f64) -> f64 {
    semi_axis * (1.0 - eccentricity * eccentricity) / (1.0 + eccentricity * phase.cos())
}

/// Separation projected on the sky plane.
pub fn projected_separation(separation: f64, phase: f64, inclination: f64) -> f64 {
    let (sin_phase, cos_phase) = phase.sin_cos();
    let cos_incl = inclination.cos();
    separation * (cos_phase * cos_phase + sin_phase * sin_phase * cos_incl * cos_incl).sqrt()
}

/// Eccentricities must describe a bound orbit.
pub fn check_eccentricity(eccentricity: f64) -> anyhow::Result<()> {
    if !(0.0..1.0).contains(&eccentricity) {
        anyhow::bail!(format!(
            "eccentricity {} is outside [0, 1)",
            eccentricity
        ));
    }
    Ok(())
}
