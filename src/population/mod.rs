mod derived;
mod util;

pub use derived::*;

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    core::{
        error::SamplingError,
        inverse_cdf::InverseCdfSampler,
        loader::InputParams,
        rng::{self, Rng},
        statistics::{self, Summary},
    },
    distribution::{self, Distribution, DistributionT},
    plot::{self, PlotConfig},
};

/// A column drawn from a named distribution.
pub struct Parameter {
    pub name: String,
    pub distribution: Distribution,
    pub plot: Option<PlotConfig>,
}

/// A column computed from earlier columns.
pub struct Derived {
    pub name: String,
    pub derivation: Derivation,
    pub plot: Option<PlotConfig>,
}

pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

pub struct Population {
    samples: usize,
    seed: Option<u64>,
    resolution: usize,
    output_dir: PathBuf,
    parameters: Vec<Parameter>,
    derived: Vec<Derived>,
}

impl Parameter {
    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let name = params.get_str("name")?;
        params.set_name(name.clone().into());

        let mut dist_params = params.get_object("distribution")?;
        let distribution = distribution::create_distribution_from_params(&mut dist_params)?;
        let plot = load_plot(params, &name)?;

        params.check_unused_keys();

        Ok(Self {
            name,
            distribution,
            plot,
        })
    }
}

impl Derived {
    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let name = params.get_str("name")?;
        params.set_name(name.clone().into());

        let plot = load_plot(params, &name)?;
        let derivation = Derivation::load(params)?;

        params.check_unused_keys();

        Ok(Self {
            name,
            derivation,
            plot,
        })
    }
}

fn load_plot(params: &mut InputParams, name: &str) -> anyhow::Result<Option<PlotConfig>> {
    if params.contains_key("plot") {
        let mut plot_params = params.get_object("plot")?;
        Ok(Some(PlotConfig::load(&mut plot_params, name)?))
    } else {
        Ok(None)
    }
}

impl Population {
    pub const DEFAULT_SAMPLES: usize = 10_000;
    /// Critical level of the goodness of fit check logged by [`Self::report`].
    pub const KS_ALPHA: f64 = 0.01;

    pub fn new<P: Into<PathBuf>>(samples: usize, seed: Option<u64>, output_dir: P) -> Self {
        Self {
            samples,
            seed,
            resolution: InverseCdfSampler::DEFAULT_RESOLUTION,
            output_dir: output_dir.into(),
            parameters: vec![],
            derived: vec![],
        }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let samples = params.get_int_or("samples", Self::DEFAULT_SAMPLES as i64)?;
        if samples <= 0 {
            anyhow::bail!(format!("{} - 'samples' should be positive", params.name()));
        }

        let seed = if params.contains_key("seed") {
            let seed = params.get_int("seed")?;
            if seed < 0 {
                anyhow::bail!(format!("{} - 'seed' should be non-negative", params.name()));
            }
            Some(seed as u64)
        } else {
            None
        };

        let resolution =
            params.get_int_or("resolution", InverseCdfSampler::DEFAULT_RESOLUTION as i64)?;
        if resolution < 2 {
            anyhow::bail!(format!("{} - 'resolution' should be at least 2", params.name()));
        }

        let output_dir = if params.contains_key("output_dir") {
            params.get_file_path("output_dir")?
        } else {
            params.resolve_path("plots")
        };

        let mut population = Self::new(samples as usize, seed, output_dir);
        population.set_resolution(resolution as usize);

        for mut parameter_params in params.get_object_array("parameters")? {
            population.add_parameter(Parameter::load(&mut parameter_params)?)?;
        }
        if params.contains_key("derived") {
            for mut derived_params in params.get_object_array("derived")? {
                population.add_derived(Derived::load(&mut derived_params)?)?;
            }
        }

        params.check_unused_keys();

        if population.parameters.is_empty() {
            anyhow::bail!(format!("{} - at least one parameter is needed", params.name()));
        }
        Ok(population)
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn set_samples(&mut self, samples: usize) {
        self.samples = samples;
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn set_resolution(&mut self, resolution: usize) {
        self.resolution = resolution;
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn set_output_dir<P: Into<PathBuf>>(&mut self, output_dir: P) {
        self.output_dir = output_dir.into();
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn derived(&self) -> &[Derived] {
        &self.derived
    }

    pub fn add_parameter(&mut self, parameter: Parameter) -> anyhow::Result<()> {
        self.check_new_name(&parameter.name)?;
        self.parameters.push(parameter);
        Ok(())
    }

    /// Every input of `derived` must name a column added before it.
    pub fn add_derived(&mut self, derived: Derived) -> anyhow::Result<()> {
        self.check_new_name(&derived.name)?;
        for input in derived.derivation.inputs() {
            if !self.has_column(input) {
                anyhow::bail!(format!(
                    "{} - column '{}' is not defined before it",
                    derived.name, input
                ));
            }
        }
        self.derived.push(derived);
        Ok(())
    }

    fn has_column(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
            || self.derived.iter().any(|d| d.name == name)
    }

    fn check_new_name(&self, name: &str) -> anyhow::Result<()> {
        if self.has_column(name) {
            anyhow::bail!(format!("{} - name is used more than once", name));
        }
        Ok(())
    }

    /// Draws every parameter, then computes the derived columns in order.
    ///
    /// Parameter `i` draws from its own stream seeded with
    /// `derive_seed(seed, i)`, so a seeded run gives the same columns on any
    /// number of threads.
    pub fn draw(&self) -> anyhow::Result<Vec<Column>> {
        if self.samples == 0 {
            anyhow::bail!("population - 'samples' should be positive");
        }
        let seed = match self.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<u64>();
                log::info!("population - no seed given, using {}", seed);
                seed
            }
        };

        let mut samplers = Vec::with_capacity(self.parameters.len());
        for parameter in &self.parameters {
            let sampler = parameter
                .distribution
                .sampler(self.resolution)
                .with_context(|| format!("{} - can't build sampler", parameter.name))?;
            log::debug!(
                "{} - inverse cdf over [{}, {}] with {} points",
                parameter.name,
                sampler.lower(),
                sampler.upper(),
                sampler.resolution()
            );
            samplers.push(sampler);
        }

        let progress_bar =
            util::sampling_progress_bar(self.samples as u64 * samplers.len() as u64);
        let num_threads = num_cpus::get().max(1);
        let mut columns = Vec::with_capacity(self.parameters.len() + self.derived.len());

        for (batch_index, batch) in samplers.chunks(num_threads).enumerate() {
            let results = crossbeam::scope(|scope| {
                let handles = batch
                    .iter()
                    .enumerate()
                    .map(|(i, sampler)| {
                        let index = (batch_index * num_threads + i) as u64;
                        let count = self.samples;
                        let progress_bar = progress_bar.clone();
                        scope.spawn(move |_| {
                            draw_column(sampler, count, rng::derive_seed(seed, index), &progress_bar)
                        })
                    })
                    .collect::<Vec<_>>();
                handles
                    .into_iter()
                    .map(|handle| handle.join())
                    .collect::<Vec<_>>()
            })
            .map_err(|_| anyhow::anyhow!("population - sampling thread panicked"))?;

            for (i, result) in results.into_iter().enumerate() {
                let parameter = &self.parameters[batch_index * num_threads + i];
                let values = result
                    .map_err(|_| anyhow::anyhow!("{} - sampling thread panicked", parameter.name))?
                    .with_context(|| format!("{} - sampling failed", parameter.name))?;
                columns.push(Column {
                    name: parameter.name.clone(),
                    values,
                });
            }
        }
        progress_bar.finish_and_clear();

        for (i, derived) in self.derived.iter().enumerate() {
            let inputs = derived
                .derivation
                .inputs()
                .into_iter()
                .map(|name| {
                    columns
                        .iter()
                        .find(|c| c.name == name)
                        .map(|c| c.values.as_slice())
                        .with_context(|| format!("{} - there is no column '{}'", derived.name, name))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            let index = (self.parameters.len() + i) as u64;
            let mut rng = Rng::new(Some(rng::derive_seed(seed, index)));
            let values = derived
                .derivation
                .compute(&inputs, &mut rng)
                .with_context(|| format!("{} - can't derive column", derived.name))?;
            columns.push(Column {
                name: derived.name.clone(),
                values,
            });
        }

        Ok(columns)
    }

    /// Logs summary statistics of every column, and the Kolmogorov-Smirnov
    /// distance of each drawn column to its distribution.
    pub fn report(&self, columns: &[Column]) {
        for column in columns {
            let summary = match Summary::of(&column.values) {
                Some(summary) => summary,
                None => {
                    log::warn!("{} - no samples", column.name);
                    continue;
                }
            };
            log::info!(
                "{} - count {}, min {:.6}, max {:.6}, mean {:.6}, std {:.6}",
                column.name,
                summary.count,
                summary.min,
                summary.max,
                summary.mean,
                summary.std_dev
            );

            if let Some(parameter) = self.parameters.iter().find(|p| p.name == column.name) {
                let distance = statistics::ks_statistic(&column.values, |x| {
                    parameter.distribution.normalized_cdf(x)
                });
                let critical = statistics::ks_critical_value(summary.count, Self::KS_ALPHA);
                if distance > critical {
                    log::warn!(
                        "{} - KS distance {:.6} exceeds critical value {:.6}",
                        column.name,
                        distance,
                        critical
                    );
                } else {
                    log::info!("{} - KS distance {:.6}", column.name, distance);
                }
            }
        }
    }

    /// Writes a histogram for every column with a plot config and returns the
    /// image paths. Density plots of drawn columns get their analytic density
    /// drawn over the bars.
    pub fn plot(&self, columns: &[Column]) -> anyhow::Result<Vec<PathBuf>> {
        let mut paths = vec![];
        for column in columns {
            if let Some(parameter) = self.parameters.iter().find(|p| p.name == column.name) {
                if let Some(config) = &parameter.plot {
                    let pdf: &dyn Fn(f64) -> f64 =
                        &|x: f64| parameter.distribution.normalized_pdf(x);
                    paths.push(plot::plot_histogram(
                        &column.values,
                        config,
                        &self.output_dir,
                        Some(pdf),
                    )?);
                }
            } else if let Some(derived) = self.derived.iter().find(|d| d.name == column.name) {
                if let Some(config) = &derived.plot {
                    paths.push(plot::plot_histogram(
                        &column.values,
                        config,
                        &self.output_dir,
                        None,
                    )?);
                }
            }
        }
        Ok(paths)
    }
}

fn draw_column(
    sampler: &InverseCdfSampler,
    count: usize,
    seed: u64,
    progress_bar: &indicatif::ProgressBar,
) -> Result<Vec<f64>, SamplingError> {
    let mut rng = Rng::new(Some(seed));
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        values.push(sampler.sample(rng.uniform_1d())?);
        progress_bar.inc(1);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use std::{convert::TryInto, f64::consts::PI};

    use approx::assert_relative_eq;

    use super::*;
    use crate::distribution::{PowerLaw, Thermal, Uniform};

    fn parameter(name: &str, distribution: Distribution) -> Parameter {
        Parameter {
            name: name.to_owned(),
            distribution,
            plot: None,
        }
    }

    fn binaries(samples: usize, seed: u64) -> Population {
        let mut population = Population::new(samples, Some(seed), "plots");
        population
            .add_parameter(parameter("a", PowerLaw::new(200.0, 2000.0, -1.0).into()))
            .unwrap();
        population
            .add_parameter(parameter("e", Thermal::new(0.0, 1.0).into()))
            .unwrap();
        population
            .add_parameter(parameter(
                "phi",
                Uniform::new(-PI + 0.1, PI - 0.1).into(),
            ))
            .unwrap();
        population
            .add_derived(Derived {
                name: "r".to_owned(),
                derivation: Derivation::Separation {
                    semi_axis: "a".to_owned(),
                    eccentricity: "e".to_owned(),
                    phase: "phi".to_owned(),
                },
                plot: None,
            })
            .unwrap();
        population
    }

    #[test]
    fn seeded_draws_are_reproducible() {
        let population = binaries(2000, 5489);
        let first = population.draw().unwrap();
        let second = population.draw().unwrap();
        assert_eq!(first.len(), 4);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.values, b.values);
        }
        assert_ne!(first[0].values, binaries(2000, 1).draw().unwrap()[0].values);
    }

    #[test]
    fn columns_follow_their_distributions() {
        let population = binaries(5000, 7);
        let columns = population.draw().unwrap();
        for (column, parameter) in columns.iter().zip(population.parameters()) {
            assert_eq!(column.values.len(), 5000);
            let (lower, upper) = parameter.distribution.support();
            assert!(column.values.iter().all(|v| (lower..=upper).contains(v)));
            let distance = statistics::ks_statistic(&column.values, |x| {
                parameter.distribution.normalized_cdf(x)
            });
            assert!(distance < statistics::ks_critical_value(5000, 0.001));
        }

        let r = &columns[3];
        assert_eq!(r.name, "r");
        for i in 0..5000 {
            let a = columns[0].values[i];
            let e = columns[1].values[i];
            let phi = columns[2].values[i];
            assert_relative_eq!(r.values[i], a * (1.0 - e * e) / (1.0 + e * phi.cos()));
        }
    }

    #[test]
    fn names_are_unique_and_inputs_defined() {
        let mut population = binaries(10, 1);
        assert!(population
            .add_parameter(parameter("e", Thermal::new(0.0, 1.0).into()))
            .is_err());
        assert!(population
            .add_derived(Derived {
                name: "phase".to_owned(),
                derivation: Derivation::OrbitalPhase {
                    eccentricity: "ecc".to_owned(),
                    offset: None,
                },
                plot: None,
            })
            .is_err());
        assert_eq!(population.derived().len(), 1);
    }

    #[test]
    fn overrides_replace_loaded_values() {
        let mut population = binaries(10, 1);
        population.set_samples(20);
        population.set_seed(2);
        population.set_resolution(64);
        population.set_output_dir("out");
        assert_eq!(population.samples(), 20);
        assert_eq!(population.seed(), Some(2));
        assert_eq!(population.resolution(), 64);
        assert_eq!(population.output_dir(), Path::new("out"));
        assert_eq!(population.draw().unwrap()[0].values.len(), 20);
    }

    #[test]
    fn loads_from_params() {
        let mut params: InputParams = serde_json::json!({
            "samples": 100,
            "seed": 3,
            "resolution": 256,
            "output_dir": "/tmp/binaries",
            "parameters": [
                {
                    "name": "e",
                    "distribution": { "type": "thermal", "lower": 0, "upper": 1 },
                    "plot": { "file": "e.png", "density": true }
                },
                {
                    "name": "phi_0",
                    "distribution": { "type": "uniform", "lower": 0, "upper": 6.283185307179586 }
                }
            ],
            "derived": [
                { "name": "phi", "type": "orbital_phase", "eccentricity": "e", "offset": "phi_0" }
            ]
        })
        .try_into()
        .unwrap();
        params.set_name("population".into());
        let population = Population::load(&mut params).unwrap();
        assert_eq!(population.samples(), 100);
        assert_eq!(population.seed(), Some(3));
        assert_eq!(population.resolution(), 256);
        assert_eq!(population.output_dir(), Path::new("/tmp/binaries"));
        assert_eq!(population.parameters().len(), 2);
        assert!(population.parameters()[0].plot.is_some());
        assert_eq!(population.derived()[0].name, "phi");
    }

    #[test]
    fn load_rejects_bad_populations() {
        let load = |value: serde_json::Value| {
            let mut params: InputParams = value.try_into().unwrap();
            params.set_name("population".into());
            Population::load(&mut params)
        };
        let uniform = serde_json::json!({ "type": "uniform", "lower": 0, "upper": 1 });
        assert!(load(serde_json::json!({ "parameters": [] })).is_err());
        assert!(load(serde_json::json!({
            "samples": 0,
            "parameters": [ { "name": "x", "distribution": uniform.clone() } ]
        }))
        .is_err());
        assert!(load(serde_json::json!({
            "parameters": [
                { "name": "x", "distribution": uniform.clone() },
                { "name": "x", "distribution": uniform.clone() }
            ]
        }))
        .is_err());
        assert!(load(serde_json::json!({
            "parameters": [ { "name": "x", "distribution": uniform } ],
            "derived": [ { "name": "phi", "type": "orbital_phase", "eccentricity": "e" } ]
        }))
        .is_err());
    }

    #[test]
    fn plots_configured_columns() {
        let dir = tempfile::tempdir().unwrap();
        let mut population = Population::new(500, Some(11), dir.path());
        let mut config = PlotConfig::new("thermal.png", "e");
        config.density = true;
        population
            .add_parameter(Parameter {
                name: "e".to_owned(),
                distribution: Thermal::new(0.0, 1.0).into(),
                plot: Some(config),
            })
            .unwrap();
        population
            .add_parameter(parameter("m", Uniform::new(0.5, 1.5).into()))
            .unwrap();

        let columns = population.draw().unwrap();
        population.report(&columns);
        let paths = population.plot(&columns).unwrap();
        assert_eq!(paths, vec![dir.path().join("thermal.png")]);
        assert!(paths[0].exists());
        assert!(dir.path().join("thermal.png.json").exists());
    }
}
