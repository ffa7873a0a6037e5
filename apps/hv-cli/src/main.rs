use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Instant;

use hv_project::{ProjectError, VesselProject};
use hv_sim::SimError;
use hv_vessel::BalanceOutputs;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hv-cli")]
#[command(about = "Hydrovessel CLI - hydraulic storage vessel simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a project file
    Validate {
        /// Path to the project file (.yaml, .yml or .json)
        project_path: PathBuf,
    },
    /// Run a transient simulation
    Run {
        /// Path to the project file (.yaml, .yml or .json)
        project_path: PathBuf,
        /// Time step in seconds (overrides the project)
        #[arg(long)]
        dt: Option<f64>,
        /// End time in seconds (overrides the project)
        #[arg(long)]
        t_end: Option<f64>,
        /// Output CSV file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{0}")]
    Project(#[from] ProjectError),

    #[error("Simulation failed: {0}")]
    Sim(#[from] SimError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Run {
            project_path,
            dt,
            t_end,
            output,
        } => cmd_run(&project_path, dt, t_end, output.as_deref()),
    }
}

fn load_project(path: &Path) -> CliResult<VesselProject> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let project = if is_json {
        hv_project::load_json(path)?
    } else {
        hv_project::load_yaml(path)?
    };
    Ok(project)
}

fn cmd_validate(project_path: &Path) -> CliResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = load_project(project_path)?;
    let vessel = hv_project::build_vessel(&project)?;
    println!(
        "✓ Project is valid ({}: {} cushion, {} port(s))",
        vessel.name(),
        vessel.cushion_kind().as_str(),
        vessel.ports().len()
    );
    Ok(())
}

fn cmd_run(
    project_path: &Path,
    dt: Option<f64>,
    t_end: Option<f64>,
    output: Option<&Path>,
) -> CliResult<()> {
    let mut project = load_project(project_path)?;
    if let Some(dt) = dt {
        project.run.dt_s = dt;
    }
    if let Some(t_end) = t_end {
        project.run.t_end_s = t_end;
    }

    let mut model = hv_project::build_model(&project)?;
    let opts = hv_project::sim_options(&project.run);

    let start = Instant::now();
    let record = hv_sim::run_sim(&mut model, &opts)?;
    let outputs = model.sample_outputs(&record)?;
    tracing::info!(
        samples = record.t.len(),
        events = record.events.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "run complete"
    );

    let port_names: Vec<&str> = model
        .vessel()
        .ports()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    let csv = to_csv(&record.t, &record.x, &outputs, &port_names);

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Wrote {} samples ({} regime switch(es)) to {}",
            record.t.len(),
            record.events.len(),
            path.display()
        );
    } else {
        print!("{csv}");
    }
    Ok(())
}

fn to_csv(
    t: &[f64],
    x: &[hv_vessel::VesselState],
    outputs: &[BalanceOutputs],
    port_names: &[&str],
) -> String {
    let mut csv = String::from(
        "time_s,extent,level_m,liquid_volume_m3,gas_volume_m3,liquid_pressure_pa,\
         gas_pressure_pa,gas_temperature_k,gas_mass_kg,regime",
    );
    for name in port_names {
        let _ = write!(csv, ",port_{name}_pa");
    }
    csv.push('\n');

    for ((t, x), out) in t.iter().zip(x).zip(outputs) {
        let (p_gas, t_gas) = match &out.gas {
            Some(g) => (g.pressure_pa.to_string(), g.eos.t.value.to_string()),
            None => (String::new(), String::new()),
        };
        let _ = write!(
            csv,
            "{t},{},{},{},{},{},{p_gas},{t_gas},{},{}",
            x.extent,
            out.level_m,
            out.liquid_volume_m3,
            out.gas_volume_m3,
            out.liquid_pressure_pa,
            x.gas_mass_kg,
            out.regime.as_str()
        );
        for p in &out.port_pressures_pa {
            let _ = write!(csv, ",{p}");
        }
        csv.push('\n');
    }
    csv
}
