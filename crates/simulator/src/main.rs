//! CPR Coach Simulator - Main Entry Point

use std::path::PathBuf;

use simulator::{init_logging, run_simulation, SimulationConfig, SimulatorError};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), SimulatorError> {
    init_logging();

    info!("=== CPR Coach Simulator v{} ===", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let sim = SimulationConfig::load(config_path.as_deref())?;
    let analyzer_config = sim.analyzer_config(config_path.as_deref())?;

    let report = run_simulation(&sim, analyzer_config).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
