use std::path::PathBuf;

use structopt::StructOpt;

mod core;
mod distribution;
mod loader;
mod orbit;
mod plot;
mod population;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "binary-statistics",
    about = "Draws binary star parameter populations and histograms them"
)]
struct Options {
    /// Population JSON file
    #[structopt(parse(from_os_str))]
    config: PathBuf,
    #[structopt(long)]
    seed: Option<u64>,
    #[structopt(long)]
    samples: Option<usize>,
    /// Points of the inverse CDF table of every sampler
    #[structopt(long)]
    resolution: Option<usize>,
    #[structopt(long, parse(from_os_str))]
    output_dir: Option<PathBuf>,
    /// Only draw and report, don't write histograms
    #[structopt(long)]
    no_plot: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let options = Options::from_args();

    log::info!("Loading population from '{}'...", options.config.display());
    let mut population = loader::load_population(&options.config)?;
    if let Some(seed) = options.seed {
        population.set_seed(seed);
    }
    if let Some(samples) = options.samples {
        anyhow::ensure!(samples > 0, "'--samples' should be positive");
        population.set_samples(samples);
    }
    if let Some(resolution) = options.resolution {
        anyhow::ensure!(resolution >= 2, "'--resolution' should be at least 2");
        population.set_resolution(resolution);
    }
    if let Some(output_dir) = options.output_dir {
        population.set_output_dir(output_dir);
    }

    log::info!(
        "{} parameters, {} derived columns, {} samples each, resolution {}, seed {:?}",
        population.parameters().len(),
        population.derived().len(),
        population.samples(),
        population.resolution(),
        population.seed()
    );

    let begin_time = std::time::SystemTime::now();
    let columns = population.draw()?;
    let duration = std::time::SystemTime::now().duration_since(begin_time)?;
    log::info!("Sampling finished, time used: {:?}", duration);

    population.report(&columns);

    if !options.no_plot {
        let paths = population.plot(&columns)?;
        log::info!(
            "{} histograms written to '{}'",
            paths.len(),
            population.output_dir().display()
        );
    }

    Ok(())
}
