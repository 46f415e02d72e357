use crate::{
    core::{loader::InputParams, rng::Rng},
    orbit::{self, PhaseSampler},
};

/// A column computed from columns drawn or derived before it.
pub enum Derivation {
    Separation {
        semi_axis: String,
        eccentricity: String,
        phase: String,
    },
    ProjectedSeparation {
        separation: String,
        phase: String,
        inclination: String,
    },
    OrbitalPhase {
        eccentricity: String,
        offset: Option<String>,
    },
    /// `phase` is the true anomaly, without the `phase_0` offset.
    VTilde {
        phase: String,
        phase_0: String,
        inclination: String,
        eccentricity: String,
    },
}

impl Derivation {
    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let ty = params.get_str("type")?;
        let res = match ty.as_str() {
            "separation" => Self::Separation {
                semi_axis: params.get_str("semi_axis")?,
                eccentricity: params.get_str("eccentricity")?,
                phase: params.get_str("phase")?,
            },
            "projected_separation" => Self::ProjectedSeparation {
                separation: params.get_str("separation")?,
                phase: params.get_str("phase")?,
                inclination: params.get_str("inclination")?,
            },
            "orbital_phase" => Self::OrbitalPhase {
                eccentricity: params.get_str("eccentricity")?,
                offset: if params.contains_key("offset") {
                    Some(params.get_str("offset")?)
                } else {
                    None
                },
            },
            "v_tilde" => Self::VTilde {
                phase: params.get_str("phase")?,
                phase_0: params.get_str("phase_0")?,
                inclination: params.get_str("inclination")?,
                eccentricity: params.get_str("eccentricity")?,
            },
            _ => anyhow::bail!(format!("{}: unknown type '{}'", params.name(), ty)),
        };
        Ok(res)
    }

    /// Names of the columns this derivation reads, in argument order.
    pub fn inputs(&self) -> Vec<&str> {
        match self {
            Self::Separation {
                semi_axis,
                eccentricity,
                phase,
            } => vec![semi_axis.as_str(), eccentricity.as_str(), phase.as_str()],
            Self::ProjectedSeparation {
                separation,
                phase,
                inclination,
            } => vec![separation.as_str(), phase.as_str(), inclination.as_str()],
            Self::OrbitalPhase {
                eccentricity,
                offset,
            } => {
                let mut inputs = vec![eccentricity.as_str()];
                if let Some(offset) = offset {
                    inputs.push(offset);
                }
                inputs
            }
            Self::VTilde {
                phase,
                phase_0,
                inclination,
                eccentricity,
            } => vec![
                phase.as_str(),
                phase_0.as_str(),
                inclination.as_str(),
                eccentricity.as_str(),
            ],
        }
    }

    /// Computes the column from `inputs`, given in the order of [`Self::inputs`].
    pub fn compute(&self, inputs: &[&[f64]], rng: &mut Rng) -> anyhow::Result<Vec<f64>> {
        let count = inputs.first().map_or(0, |column| column.len());
        let mut values = Vec::with_capacity(count);
        match self {
            Self::Separation { .. } => {
                for i in 0..count {
                    let e = inputs[1][i];
                    orbit::check_eccentricity(e)?;
                    values.push(orbit::separation(inputs[0][i], e, inputs[2][i]));
                }
            }
            Self::ProjectedSeparation { .. } => {
                for i in 0..count {
                    values.push(orbit::projected_separation(
                        inputs[0][i],
                        inputs[1][i],
                        inputs[2][i],
                    ));
                }
            }
            Self::OrbitalPhase { offset, .. } => {
                for i in 0..count {
                    let phase = PhaseSampler::new(inputs[0][i])?.sample(rng);
                    let shift = if offset.is_some() { inputs[1][i] } else { 0.0 };
                    values.push(phase + shift);
                }
            }
            Self::VTilde { .. } => {
                for i in 0..count {
                    let e = inputs[3][i];
                    orbit::check_eccentricity(e)?;
                    values.push(orbit::v_tilde(inputs[0][i], inputs[1][i], inputs[2][i], e));
                }
            }
        }
        Ok(values)
    }
}
