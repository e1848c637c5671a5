use std::{env, fs::File, io::BufReader, path::PathBuf};

use anyhow::{Context, anyhow, bail};
use coupled_regression::{
    Hyperparameters, TrainerBuilder, WeightState, synthetic::SyntheticConfig,
};
use log::info;
use serde::Deserialize;

const USAGE: &str = "Usage: coupled-regression <config.json>";

/// A training run over synthetic data.
#[derive(Debug, Deserialize)]
struct RunConfig {
    hyperparameters: Hyperparameters,
    data: SyntheticConfig,
    /// Where to write the learned weights as JSON.
    #[serde(default)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let path = config_path(env::args())?;
    let file = File::open(&path).with_context(|| format!("opening {path}"))?;
    let config: RunConfig =
        serde_json::from_reader(BufReader::new(file)).context("parsing run config")?;

    let RunConfig {
        hyperparameters,
        data,
        output,
    } = config;

    if data.k != hyperparameters.k {
        bail!(
            "data has k = {} but the hyperparameters expect k = {}",
            data.k,
            hyperparameters.k
        );
    }

    let data = data.generate()?;
    info!(samples = data.samples.len(); "generated synthetic data");

    let k = hyperparameters.k;
    let mut trainer = TrainerBuilder::new().build(hyperparameters)?;
    let outcome = trainer.train(&data.samples, WeightState::init_zero(k))?;

    println!("w0:       {:?}", outcome.w0());
    println!("w0 truth: {:?}", data.truth.w0());
    println!("w1:       {:?}", outcome.w1());
    println!("w1 truth: {:?}", data.truth.w1());
    println!(
        "distance: {} (truth {})",
        outcome.weights.segment_distance(),
        data.truth.segment_distance()
    );
    println!("losses:   {:?}", outcome.epoch_losses.as_slice());

    if let Some(path) = output {
        outcome
            .weights
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("weights written to {}", path.display());
    }

    Ok(())
}

/// Picks the single config path out of the program arguments.
fn config_path(mut args: impl Iterator<Item = String>) -> anyhow::Result<String> {
    let path = args.nth(1).ok_or_else(|| anyhow!(USAGE))?;
    if args.next().is_some() {
        bail!(USAGE);
    }

    Ok(path)
}
