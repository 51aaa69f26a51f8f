//! Run a simulation described in YAML and print the summaries as YAML.
//!
//! Usage: `cargo run --example yaml_config [path/to/config.yaml]`

use kbandits::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG: &str = r#"
steps: 500
runs: 100
seed: 7
arms:
  - kind: binomial
    n: 10
    p: 0.2
  - kind: binomial
    n: 10
    p: 0.35
  - kind: binomial
    n: 10
    p: 0.3
algorithms:
  - kind: ucb1
    c: 1.0
  - kind: ucb2
    alpha: 0.5
  - kind: softmax
    tau: 2.0
"#;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::from_path(path)?,
        None => SimulationConfig::from_yaml_str(DEFAULT_CONFIG)?,
    };

    let report = config.build_simulator()?.run();
    print!("{}", report.to_yaml()?);
    Ok(())
}
